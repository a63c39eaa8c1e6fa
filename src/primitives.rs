//! External cryptographic primitive contracts: hash, KDF, MAC, and the
//! memory-hard password hash.
//!
//! The reference treats these as named, swappable function pointers bound
//! via maps (`hash_functions`, `key_derivation_functions`, `mac_functions`).
//! Since this port only ever instantiates one ciphersuite (§4.3 of
//! SPEC_FULL.md), the dispatch collapses to a single match per primitive
//! rather than a runtime function-pointer table.

use argon2::{Algorithm, Argon2, Params, Version};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::ciphersuite::{HashAlgorithm, KdfAlgorithm, MacAlgorithm};
use crate::encoding::bin_to_hex;
use crate::error::{Result, Spake2Error};

/// Hashes `input` and renders the digest as lowercase hex (no `0x` prefix).
pub fn hash(algorithm: HashAlgorithm, input: &[u8]) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let digest = Sha256::digest(input);
            bin_to_hex(&digest, false)
        }
    }
}

/// HKDF-Extract-then-Expand with an empty salt, `L = 32` bytes.
///
/// `info` is the caller-assembled `"ConfirmationKeys" || AAD` byte string.
pub fn kdf(algorithm: KdfAlgorithm, ikm: &[u8], info: &[u8]) -> Result<String> {
    match algorithm {
        KdfAlgorithm::HkdfSha256 => {
            let hk = hkdf::Hkdf::<Sha256>::new(None, ikm);
            let mut okm = [0u8; 32];
            hk.expand(info, &mut okm)
                .map_err(|e| Spake2Error::PrimitiveFailure(e.to_string()))?;
            Ok(bin_to_hex(&okm, false))
        }
    }
}

/// HMAC over `message` under `key`, rendered as lowercase hex.
pub fn mac(algorithm: MacAlgorithm, key: &[u8], message: &[u8]) -> Result<String> {
    match algorithm {
        MacAlgorithm::HmacSha256 => {
            let mut m = Hmac::<Sha256>::new_from_slice(key)
                .map_err(|e| Spake2Error::PrimitiveFailure(e.to_string()))?;
            m.update(message);
            Ok(bin_to_hex(&m.finalize().into_bytes(), false))
        }
    }
}

/// Compares two MAC/hex values in constant time, independent of where the
/// first mismatching byte occurs, so a verification failure leaks nothing
/// about which input diverged.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// The fixed salt used by the memory-hard password hash. Insecure against
/// cross-password precomputation; retained to reproduce the reference's
/// behavior under test (see SPEC_FULL.md §9).
pub const MHF_SALT: &[u8] = b"foo";

/// Derives `len` bytes from `password` via Argon2id at a moderate cost
/// profile, using the fixed salt above.
pub fn memory_hard_hash(password: &[u8], len: usize) -> Result<Vec<u8>> {
    // Moderate operational/memory limits, matching "the default password-hash
    // construction" contract in SPEC_FULL.md §4.4: 19 MiB memory, 2 passes,
    // 1 lane, per the RFC 9106 "Argon2id, moderate" recommendation.
    let params = Params::new(19 * 1024, 2, 1, Some(len))
        .map_err(|e| Spake2Error::PrimitiveFailure(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = vec![0u8; len];
    argon2
        .hash_password_into(password, MHF_SALT, &mut out)
        .map_err(|e| Spake2Error::PrimitiveFailure(e.to_string()))?;
    Ok(out)
}
