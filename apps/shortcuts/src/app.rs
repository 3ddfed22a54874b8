//! Command parsing and dispatch.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use zladxhd_steam::{
    Paths, Shortcut, User, add_shortcut, find_shortcut_by_name, find_user, get_users_with_paths,
    read_shortcuts, remove_shortcut, update_shortcut,
};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "zladxhd-shortcuts", version)]
#[command(about = "Manage the non-Steam game shortcuts of a Steam user")]
pub struct Cli {
    /// Steam user id; defaults to user_id from the config file.
    #[arg(long, global = true)]
    pub user: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// List Steam users.
    Users,
    /// Print the user's shortcuts as JSON.
    List,
    /// Print one shortcut as JSON.
    Find { name: String },
    /// Register an executable as a non-Steam game.
    Add { exe: String, name: Option<String> },
    /// Change a shortcut's launch options.
    SetLaunchOptions {
        #[arg(value_parser = parse_app_id)]
        app_id: u32,
        #[arg(allow_hyphen_values = true)]
        options: String,
    },
    /// Remove a shortcut.
    Remove {
        #[arg(value_parser = parse_app_id)]
        app_id: u32,
    },
}

/// Parses an AppID given in decimal or `0x`-prefixed hex.
fn parse_app_id(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid app id {s:?}: {e}"))
}

/// Runs one command against the configured Steam installation.
pub fn run(config: &Config, cli: Cli) -> anyhow::Result<()> {
    let paths = config.steam_paths();
    tracing::debug!(steam_dir = %paths.base_dir().display(), "using steam directory");

    if cli.command == Command::Users {
        for user in get_users_with_paths(&paths)? {
            let marker = if user.has_shortcuts() { "*" } else { " " };
            println!("{marker} {:<12} {}", user.id, user.display_name());
        }
        return Ok(());
    }

    let preferred = cli.user.as_deref().or(config.user_id.as_deref());
    let user = select_user(&paths, preferred)?;
    tracing::info!(user = %user.display_name(), "selected steam user");

    match cli.command {
        Command::Users => {}
        Command::List => {
            let shortcuts = read_shortcuts(&user.shortcuts_path())?;
            println!("{}", serde_json::to_string_pretty(&shortcuts)?);
        }
        Command::Find { name } => match find_shortcut_by_name(&user, &name)? {
            Some(shortcut) => println!("{}", serde_json::to_string_pretty(&shortcut)?),
            None => bail!("no shortcut named {name:?}"),
        },
        Command::Add { exe, name } => {
            let name = name.unwrap_or_else(|| config.shortcut_name.clone());
            let (app_id, is_new) = add_shortcut(&user, Shortcut::new(name, &exe))?;
            if is_new {
                println!("added with app id {app_id}");
            } else {
                println!("already exists with app id {app_id}");
            }
        }
        Command::SetLaunchOptions { app_id, options } => {
            let mut shortcut = read_shortcuts(&user.shortcuts_path())?
                .into_iter()
                .find(|s| s.app_id == app_id)
                .with_context(|| format!("no shortcut with app id {app_id}"))?;
            shortcut.launch_options = options;
            update_shortcut(&user, &shortcut)?;
            println!("updated {app_id}");
        }
        Command::Remove { app_id } => {
            remove_shortcut(&user, app_id)?;
            println!("removed {app_id}");
        }
    }

    Ok(())
}

/// Picks the preferred user if given, otherwise the only user on disk.
fn select_user(paths: &Paths, preferred: Option<&str>) -> anyhow::Result<User> {
    if let Some(id) = preferred {
        return Ok(find_user(paths, id)?);
    }

    let mut users = get_users_with_paths(paths)?;
    match users.len() {
        0 => bail!("no Steam users found in {}", paths.user_data_dir().display()),
        1 => Ok(users.remove(0)),
        _ => {
            let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
            bail!(
                "multiple Steam users found ({}); pass --user or set user_id in {}",
                ids.join(", "),
                crate::config::config_path().display()
            )
        }
    }
}
