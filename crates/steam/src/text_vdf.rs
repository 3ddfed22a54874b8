//! Text VDF (KeyValues) parser, as used by `config/loginusers.vdf`.
//!
//! ```text
//! "users"
//! {
//!     "76561197960287930"
//!     {
//!         "AccountName"     "gaben"
//!     }
//! }
//! ```
//!
//! Values are always strings. Quotes are optional for tokens without
//! whitespace, `//` starts a comment and `[$PLATFORM]` conditionals are
//! ignored.

use crate::SteamError;
use crate::vdf::{MAX_DEPTH, VdfNode, VdfObject};

#[derive(Debug, PartialEq)]
enum Token {
    Str(String),
    Open,
    Close,
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    /// Returns the next token with the byte offset it starts at.
    fn next_token(&mut self) -> Result<Option<(usize, Token)>, SteamError> {
        loop {
            while self.src.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
                self.pos += 1;
            }

            let start = self.pos;
            let Some(&b) = self.src.get(start) else {
                return Ok(None);
            };

            match b {
                b'/' if self.src.get(start + 1) == Some(&b'/') => self.skip_until(b'\n'),
                b'[' => self.skip_until(b']'),
                b'{' => {
                    self.pos += 1;
                    return Ok(Some((start, Token::Open)));
                }
                b'}' => {
                    self.pos += 1;
                    return Ok(Some((start, Token::Close)));
                }
                b'"' => return self.quoted(start).map(|s| Some((start, Token::Str(s)))),
                _ => return Ok(Some((start, Token::Str(self.bare())))),
            }
        }
    }

    fn skip_until(&mut self, end: u8) {
        while let Some(&b) = self.src.get(self.pos) {
            self.pos += 1;
            if b == end {
                break;
            }
        }
    }

    fn quoted(&mut self, start: usize) -> Result<String, SteamError> {
        let mut out = Vec::new();
        self.pos += 1;

        loop {
            let Some(&b) = self.src.get(self.pos) else {
                return Err(SteamError::Parse {
                    offset: start,
                    reason: "unterminated quoted string".into(),
                });
            };
            self.pos += 1;

            match b {
                b'"' => return Ok(String::from_utf8_lossy(&out).into_owned()),
                b'\\' => match self.src.get(self.pos) {
                    Some(&esc @ (b'\\' | b'"')) => {
                        out.push(esc);
                        self.pos += 1;
                    }
                    Some(&b'n') => {
                        out.push(b'\n');
                        self.pos += 1;
                    }
                    Some(&b't') => {
                        out.push(b'\t');
                        self.pos += 1;
                    }
                    _ => out.push(b'\\'),
                },
                _ => out.push(b),
            }
        }
    }

    fn bare(&mut self) -> String {
        let start = self.pos;
        while let Some(&b) = self.src.get(self.pos) {
            if b.is_ascii_whitespace() || matches!(b, b'{' | b'}' | b'"') {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }
}

/// Parses text VDF into its root object.
pub fn parse(input: &str) -> Result<VdfObject, SteamError> {
    let mut lexer = Lexer {
        src: input.as_bytes(),
        pos: 0,
    };
    parse_entries(&mut lexer, 0, 0)
}

fn parse_entries(
    lexer: &mut Lexer<'_>,
    depth: usize,
    opened_at: usize,
) -> Result<VdfObject, SteamError> {
    if depth > MAX_DEPTH {
        return Err(parse_error(
            opened_at,
            format!("objects nested deeper than {MAX_DEPTH} levels"),
        ));
    }

    let mut obj = VdfObject::new();

    loop {
        let key = match lexer.next_token()? {
            None if depth == 0 => return Ok(obj),
            None => {
                return Err(parse_error(
                    lexer.pos,
                    format!("unexpected end of data inside object opened at offset {opened_at}"),
                ));
            }
            Some((offset, Token::Close)) if depth == 0 => {
                return Err(parse_error(offset, "unmatched closing brace".into()));
            }
            Some((_, Token::Close)) => return Ok(obj),
            Some((offset, Token::Open)) => {
                return Err(parse_error(offset, "expected key, found '{'".into()));
            }
            Some((_, Token::Str(key))) => key,
        };

        let value = match lexer.next_token()? {
            Some((offset, Token::Open)) => {
                VdfNode::Object(parse_entries(lexer, depth + 1, offset)?)
            }
            Some((_, Token::Str(value))) => VdfNode::String(value),
            Some((offset, Token::Close)) => {
                return Err(parse_error(offset, format!("missing value for key '{key}'")));
            }
            None => {
                return Err(parse_error(
                    lexer.pos,
                    format!("missing value for key '{key}'"),
                ));
            }
        };

        obj.insert(key, value);
    }
}

fn parse_error(offset: usize, reason: String) -> SteamError {
    SteamError::Parse { offset, reason }
}
