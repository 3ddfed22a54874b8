//! Steam integration for the ZLADXHD installer.
//!
//! The core of this crate is the non-Steam shortcut subsystem: a codec for
//! Steam's binary key-value format ([`vdf`]), the [`Shortcut`] entity with
//! read-modify-write CRUD over `shortcuts.vdf` ([`shortcuts`]), and AppID
//! allocation in the range Steam reserves for external entries ([`app_id`]).
//!
//! Every shortcut operation reads the whole file, mutates the list in memory
//! and writes the whole file back. Nothing is cached between calls and no
//! file lock is taken: callers that may run concurrently with each other, or
//! with a running Steam client, must serialize access themselves.

pub mod app_id;
pub mod paths;
pub mod shortcuts;
pub mod text_vdf;
pub mod users;
pub mod vdf;

// Re-export primary types.
pub use app_id::{
    APP_ID_MAX, APP_ID_MIN, MAX_ALLOCATION_ATTEMPTS, allocate_app_id, generate_app_id,
};
pub use paths::Paths;
pub use shortcuts::{
    Shortcut, add_shortcut, find_shortcut_by_name, read_shortcuts, remove_shortcut,
    update_shortcut, write_shortcuts,
};
pub use users::{User, find_user, get_users_with_paths};
pub use vdf::{VdfNode, VdfObject};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam userdata directory not found")]
    NotFound,

    #[error("steam user not found: {0}")]
    UserNotFound(String),

    #[error("shortcut with app id {0} not found")]
    ShortcutNotFound(u32),

    #[error("app id {0} is outside the non-Steam range")]
    InvalidAppId(u32),

    #[error("app id {0} is already used by another shortcut")]
    AppIdConflict(u32),

    #[error("no free app id found after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    #[error("VDF parse error at offset {offset}: {reason}")]
    Parse { offset: usize, reason: String },

    #[error("VDF encode error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(String),
}
