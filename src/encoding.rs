//! Hex/byte/ASCII encoding helpers shared by the transcript, transport
//! messages, and session accessors.
//!
//! Each function here corresponds one-to-one to a helper in the reference's
//! `StringHelpers.hpp`.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, Spake2Error};

const HEX_PREFIX_LOWER: &str = "0x";
const HEX_PREFIX_UPPER: &str = "0X";

fn strip_prefix(s: &str) -> &str {
    if let Some(stripped) = s.strip_prefix(HEX_PREFIX_LOWER) {
        stripped
    } else if let Some(stripped) = s.strip_prefix(HEX_PREFIX_UPPER) {
        stripped
    } else {
        s
    }
}

/// Splits a hex string in half. A leading `0x`/`0X` is stripped before
/// splitting, and both halves are re-prefixed with `0x`. Fails on empty
/// input.
pub fn split_hex_in_half(input: &str) -> Result<(String, String)> {
    if input.is_empty() {
        return Err(Spake2Error::EmptyInput);
    }
    let body = strip_prefix(input);
    let midpoint = body.len() / 2;
    let (lo, hi) = body.split_at(midpoint);
    Ok((format!("{HEX_PREFIX_LOWER}{lo}"), format!("{HEX_PREFIX_LOWER}{hi}")))
}

/// Encodes `bytes` as lowercase hex, optionally prefixed with `0x`.
pub fn bin_to_hex(bytes: &[u8], with_prefix: bool) -> String {
    let body = hex::encode(bytes);
    if with_prefix {
        format!("{HEX_PREFIX_LOWER}{body}")
    } else {
        body
    }
}

/// Decodes a hex string (with an optional `0x`/`0X` prefix) into bytes.
/// An odd-length tail is reported as [`Spake2Error::InvalidEncoding`].
pub fn hex_to_bin(input: &str) -> Result<Vec<u8>> {
    let body = strip_prefix(input);
    hex::decode(body).map_err(|e| Spake2Error::InvalidEncoding(e.to_string()))
}

/// Encodes `value` in `width` bytes of little-endian order, as hex
/// characters. `width = 0` yields the empty string.
pub fn little_endian_u8s(value: u64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut buf = vec![0u8; width.max(8)];
    LittleEndian::write_u64(&mut buf[..8], value);
    bin_to_hex(&buf[..width], false)
}

/// Renders each byte of `s` as two hex characters, the ASCII-hex encoding
/// used for transport identities.
pub fn ascii_to_hex(s: &[u8], with_prefix: bool) -> String {
    bin_to_hex(s, with_prefix)
}
