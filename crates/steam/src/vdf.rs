//! Binary VDF (Valve key-value) codec.
//!
//! # Wire format
//!
//! ```text
//! ENTRY:   [1 byte: type marker] [key bytes] 0x00 [value]
//!   0x00 object  -> value is a sequence of entries closed by 0x08
//!   0x01 string  -> value is bytes terminated by 0x00
//!   0x02 int32   -> value is 4 bytes, little-endian
//! ROOT:    entries, closed by 0x08 (or by end of data)
//! ```
//!
//! The codec knows nothing about shortcuts; see [`crate::shortcuts`] for the
//! mapping onto the shortcut entity.

use crate::SteamError;

/// Binary VDF type markers used in shortcuts.vdf.
const VDF_TYPE_OBJECT: u8 = 0x00;
const VDF_TYPE_STRING: u8 = 0x01;
const VDF_TYPE_INT32: u8 = 0x02;
const VDF_TYPE_END: u8 = 0x08;

/// Objects nested deeper than this are rejected instead of recursing further.
pub(crate) const MAX_DEPTH: usize = 64;

/// A single value in a VDF tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VdfNode {
    String(String),
    UInt32(u32),
    Object(VdfObject),
}

impl VdfNode {
    /// Returns the text of a string node.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VdfNode::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value of an int32 node.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            VdfNode::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the children of an object node.
    pub fn as_object(&self) -> Option<&VdfObject> {
        match self {
            VdfNode::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            VdfNode::String(_) => "string",
            VdfNode::UInt32(_) => "int32",
            VdfNode::Object(_) => "object",
        }
    }
}

impl From<String> for VdfNode {
    fn from(s: String) -> Self {
        VdfNode::String(s)
    }
}

impl From<&str> for VdfNode {
    fn from(s: &str) -> Self {
        VdfNode::String(s.to_owned())
    }
}

impl From<u32> for VdfNode {
    fn from(v: u32) -> Self {
        VdfNode::UInt32(v)
    }
}

impl From<VdfObject> for VdfNode {
    fn from(obj: VdfObject) -> Self {
        VdfNode::Object(obj)
    }
}

/// An object node: unique keys, kept in insertion order.
///
/// Order is preserved so that a decoded file re-encodes the same way, but it
/// is not part of equality: two objects with the same entries in a different
/// order compare equal.
#[derive(Debug, Clone, Default)]
pub struct VdfObject {
    entries: Vec<(String, VdfNode)>,
}

impl VdfObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&VdfNode> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts a value. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<VdfNode>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VdfNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(VdfNode::as_str)
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(VdfNode::as_u32)
    }

    pub fn get_object(&self, key: &str) -> Option<&VdfObject> {
        self.get(key).and_then(VdfNode::as_object)
    }
}

impl PartialEq for VdfObject {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl Eq for VdfObject {}

impl<K: Into<String>, V: Into<VdfNode>> FromIterator<(K, V)> for VdfObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut obj = VdfObject::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

/// Decodes binary VDF data into its root object.
///
/// Empty input is an empty root. The root may end either at a closing
/// marker or at end of data; nested objects must be closed explicitly.
pub fn decode(data: &[u8]) -> Result<VdfObject, SteamError> {
    let (root, _) = parse_object(data, 0, 0)?;
    Ok(root)
}

/// Encodes a root object to binary VDF, closing it with an end marker the
/// way the Steam client does.
pub fn encode(root: &VdfObject) -> Result<Vec<u8>, SteamError> {
    let mut out = Vec::new();
    write_entries(&mut out, root)?;
    out.push(VDF_TYPE_END);
    Ok(out)
}

/// Parses the entries of one object starting at `pos`, up to and including
/// its end marker. `depth` 0 is the root.
fn parse_object(
    data: &[u8],
    mut pos: usize,
    depth: usize,
) -> Result<(VdfObject, usize), SteamError> {
    if depth > MAX_DEPTH {
        return Err(parse_error(
            pos,
            format!("objects nested deeper than {MAX_DEPTH} levels"),
        ));
    }

    let start = pos;
    let mut obj = VdfObject::new();

    loop {
        let Some(&type_byte) = data.get(pos) else {
            if depth == 0 {
                return Ok((obj, pos));
            }
            return Err(parse_error(
                pos,
                format!("unexpected end of data inside object opened at offset {start}"),
            ));
        };

        if type_byte == VDF_TYPE_END {
            if depth == 0 && pos + 1 < data.len() {
                return Err(parse_error(
                    pos,
                    format!(
                        "unmatched closing marker, {} bytes follow the root object",
                        data.len() - pos - 1
                    ),
                ));
            }
            return Ok((obj, pos + 1));
        }

        let marker_pos = pos;
        pos += 1;

        let (key, new_pos) = read_string(data, pos)?;
        pos = new_pos;

        let value = match type_byte {
            VDF_TYPE_OBJECT => {
                let (child, new_pos) = parse_object(data, pos, depth + 1)?;
                pos = new_pos;
                VdfNode::Object(child)
            }
            VDF_TYPE_STRING => {
                let (val, new_pos) = read_string(data, pos)?;
                pos = new_pos;
                VdfNode::String(val)
            }
            VDF_TYPE_INT32 => {
                let val = read_u32(data, pos, &key)?;
                pos += 4;
                VdfNode::UInt32(val)
            }
            _ => {
                return Err(parse_error(
                    marker_pos,
                    format!("unknown type marker 0x{type_byte:02x} for key '{key}'"),
                ));
            }
        };

        obj.insert(key, value);
    }
}

/// Reads a null-terminated string from data starting at pos.
fn read_string(data: &[u8], pos: usize) -> Result<(String, usize), SteamError> {
    let rest = data.get(pos..).unwrap_or_default();
    match rest.iter().position(|&b| b == 0x00) {
        Some(len) => {
            let s = String::from_utf8_lossy(&rest[..len]).into_owned();
            Ok((s, pos + len + 1))
        }
        None => Err(parse_error(pos, "unterminated string".into())),
    }
}

/// Reads a little-endian u32 value for `key` at pos.
fn read_u32(data: &[u8], pos: usize, key: &str) -> Result<u32, SteamError> {
    match data.get(pos..pos + 4) {
        Some(&[a, b, c, d]) => Ok(u32::from_le_bytes([a, b, c, d])),
        _ => Err(parse_error(
            pos,
            format!(
                "unexpected end of data reading int32 for '{key}' ({} of 4 bytes)",
                data.len().saturating_sub(pos)
            ),
        )),
    }
}

fn parse_error(offset: usize, reason: String) -> SteamError {
    SteamError::Parse { offset, reason }
}

fn write_entries(out: &mut Vec<u8>, obj: &VdfObject) -> Result<(), SteamError> {
    for (key, value) in obj.iter() {
        match value {
            VdfNode::Object(child) => {
                out.push(VDF_TYPE_OBJECT);
                write_string(out, key)?;
                write_entries(out, child)?;
                out.push(VDF_TYPE_END);
            }
            VdfNode::String(s) => {
                out.push(VDF_TYPE_STRING);
                write_string(out, key)?;
                write_string(out, s)?;
            }
            VdfNode::UInt32(v) => {
                out.push(VDF_TYPE_INT32);
                write_string(out, key)?;
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    Ok(())
}

/// Writes a null-terminated string. Interior NULs cannot be represented.
fn write_string(out: &mut Vec<u8>, s: &str) -> Result<(), SteamError> {
    if s.as_bytes().contains(&0x00) {
        return Err(SteamError::Encode(format!(
            "string contains a NUL byte: {s:?}"
        )));
    }
    out.extend_from_slice(s.as_bytes());
    out.push(0x00);
    Ok(())
}
