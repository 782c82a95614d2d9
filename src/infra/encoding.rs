//! Key/value encoding shared by every store.
//!
//! Keys are ASCII decimal record indices ("0", "1", ...) plus the
//! reserved key "length". Values are the UTF-8 JSON object
//! `{"seq": ...}`. "length" is never a valid decimal, so the two
//! key spaces cannot collide.

use crate::domain::record::Record;

/// Reserved key holding the decimal record count.
pub const LENGTH_KEY: &[u8] = b"length";

pub fn index_key(index: usize) -> Vec<u8> {
    index.to_string().into_bytes()
}

/// Parse a record key back into its index. `None` for the
/// length sentinel or anything that is not plain decimal.
pub fn parse_index_key(key: &[u8]) -> Option<usize> {
    parse_decimal(key)
}

pub fn encode_length(len: usize) -> Vec<u8> {
    len.to_string().into_bytes()
}

pub fn decode_length(raw: &[u8]) -> Option<usize> {
    parse_decimal(raw)
}

pub fn encode_record(record: &Record) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(record)
}

pub fn decode_record(raw: &[u8]) -> serde_json::Result<Record> {
    serde_json::from_slice(raw)
}

fn parse_decimal(raw: &[u8]) -> Option<usize> {
    if raw.is_empty() || !raw.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(raw).ok()?.parse().ok()
}
