//! Transcript assembly: the canonical byte string binding both identities,
//! both public keys, the shared group element, and `w`.
//!
//! Reproduces the reference's length-prefixed layout exactly, including the
//! documented oddity that the transcript is hashed as the ASCII bytes of its
//! own `0x`-prefixed hex rendering rather than as raw bytes (SPEC_FULL.md
//! §4.5, §9).

use crate::ciphersuite::HashAlgorithm;
use crate::encoding::{ascii_to_hex, little_endian_u8s};
use crate::primitives;

/// `lp8(x)`: an 8-byte little-endian length prefix.
fn length_prefixed(field: &[u8]) -> Vec<u8> {
    let mut out = hex::decode(little_endian_u8s(field.len() as u64, 8))
        .expect("little_endian_u8s always yields valid hex");
    out.extend_from_slice(field);
    out
}

/// The assembled transcript, `TT`, for one completed key-derivation phase.
pub struct Transcript {
    raw: Vec<u8>,
}

impl Transcript {
    /// Assembles `TT = lp8(|A|)||A || lp8(|B|)||B || lp8(|pA|)||pA ||
    /// lp8(|pB|)||pB || lp8(|K|)||K || lp8(|w|)||w`.
    pub fn assemble(
        client_identity: &[u8],
        server_identity: &[u8],
        client_public_key: &[u8],
        server_public_key: &[u8],
        shared_element: &[u8],
        w_bytes: &[u8],
    ) -> Self {
        let mut raw = Vec::new();
        raw.extend(length_prefixed(client_identity));
        raw.extend(length_prefixed(server_identity));
        raw.extend(length_prefixed(client_public_key));
        raw.extend(length_prefixed(server_public_key));
        raw.extend(length_prefixed(shared_element));
        raw.extend(length_prefixed(w_bytes));
        Transcript { raw }
    }

    /// The transcript's raw bytes, per the layout in SPEC_FULL.md §4.5.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The transcript rendered as its ASCII hex string, prefixed with `0x`.
    /// This is what actually gets hashed (see the module doc comment).
    pub fn ascii_hex(&self) -> String {
        ascii_to_hex(&self.raw, true)
    }

    /// `Hash(transcript)`, computed over the ASCII bytes of
    /// [`Transcript::ascii_hex`] rather than [`Transcript::raw_bytes`],
    /// matching the reference implementation's behavior.
    pub fn hash(&self, algorithm: HashAlgorithm) -> String {
        primitives::hash(algorithm, self.ascii_hex().as_bytes())
    }
}
