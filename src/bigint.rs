//! Arbitrary-precision integer and field helpers.
//!
//! The reference implementation operates directly on GMP's `mpz_t`. This port
//! keeps that choice by building on [`rug::Integer`], which wraps the same
//! library, rather than reaching for a pure-Rust bignum crate: every modular
//! reduction, inverse, and random draw below has a one-to-one correspondence
//! with an `mpz_*` call in the original source.

use rand::RngCore;
use rug::integer::Order;
use rug::ops::RemRounding;
use rug::rand::RandState;
use rug::Integer;

use crate::error::{Result, Spake2Error};

/// Number of bits per byte, spelled out for the byte-length computation
/// below (mirrors the reference's `BITS_PER_BYTE` constant).
const BITS_PER_BYTE: u32 = 8;

/// Computes `x^-1 mod p`, failing when `gcd(x, p) != 1`.
///
/// On honest SPAKE2 inputs (points already verified on-curve, primes as
/// curve moduli) this never fails; a failure indicates corrupted input or a
/// bug upstream, per the arithmetic error policy in the spec.
pub fn inverse(x: &Integer, p: &Integer) -> Result<Integer> {
    let reduced = Integer::from(x.rem_euc(p));
    match reduced.invert(p) {
        Ok(inv) => Ok(inv),
        Err(_) => Err(Spake2Error::ArithmeticFailure(x.to_string())),
    }
}

/// Returns `ceil(bit_length(n) / 8)`, i.e. the number of bytes needed to hold
/// `n` in big-endian form. Zero has byte length zero.
pub fn byte_length(n: &Integer) -> usize {
    if n.cmp0() == std::cmp::Ordering::Equal {
        return 0;
    }
    ((n.significant_bits() + BITS_PER_BYTE - 1) / BITS_PER_BYTE) as usize
}

/// Renders `n` as lowercase hex without a `0x` prefix, left-padded with `'0'`
/// to `width` characters. `width = 0` means no padding.
pub fn pad_hex(n: &Integer, width: usize) -> String {
    let digits = n.to_string_radix(16);
    if digits.len() >= width {
        digits
    } else {
        let mut padded = String::with_capacity(width);
        padded.extend(std::iter::repeat('0').take(width - digits.len()));
        padded.push_str(&digits);
        padded
    }
}

/// Interprets `bytes` as a big-endian unsigned integer.
pub fn from_be_bytes(bytes: &[u8]) -> Integer {
    Integer::from_digits(bytes, Order::MsfBe)
}

/// Renders `n` as its minimal big-endian byte representation (no padding).
pub fn to_be_bytes(n: &Integer) -> Vec<u8> {
    if n.cmp0() == std::cmp::Ordering::Equal {
        return Vec::new();
    }
    n.to_digits(Order::MsfBe)
}

/// A per-session source of uniform random integers in `[0, upper)`.
///
/// The reference seeds one process-wide `gmp_randstate_t` the first time it's
/// needed. This port instead gives every [`crate::session::Spake2Session`] its
/// own generator, seeded once from the OS CSPRNG at construction time (see
/// the redesign note in SPEC_FULL.md §9) so there is no shared mutable global
/// and nothing to serialize across threads.
pub struct UniformRandom {
    state: RandState<'static>,
}

impl UniformRandom {
    /// Builds a generator seeded from the operating system's CSPRNG.
    pub fn from_os_entropy() -> Self {
        let mut seed_bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
        let seed = from_be_bytes(&seed_bytes);
        let mut state = RandState::new();
        state.seed(&seed);
        UniformRandom { state }
    }

    /// Draws a uniform random integer in `[0, upper)`.
    pub fn below(&mut self, upper: &Integer) -> Integer {
        Integer::from(upper.random_below_ref(&mut self.state))
    }
}
