//! Ciphersuite registry: binds a named curve to fixed blinding points `M`/`N`
//! and to the hash/KDF/MAC combination used by the protocol.
//!
//! Only one ciphersuite is defined, matching the spec's scope: P-256 /
//! SHA-256 / HKDF-SHA256 / HMAC-SHA256. The enums below name the choice
//! explicitly so a second suite could be added later without reshaping
//! [`Ciphersuite`] itself.

use rug::Integer;

use crate::curve::{Curve, Point};

/// The elliptic curve backing a ciphersuite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveName {
    /// NIST P-256, as specified in SP 800-186 §3.2.1.3.
    P256,
}

/// The hash function backing a ciphersuite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-256, 32-byte digest.
    Sha256,
}

/// The key derivation function backing a ciphersuite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KdfAlgorithm {
    /// HKDF (RFC 5869) instantiated with SHA-256.
    HkdfSha256,
}

/// The message authentication code backing a ciphersuite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MacAlgorithm {
    /// HMAC (RFC 2104) instantiated with SHA-256.
    HmacSha256,
}

/// An immutable (curve, hash, kdf, mac, M, N) bundle.
///
/// Held by value inside [`crate::session::Spake2Session`]; constructing it is
/// the only place curve constants are parsed, so a session never re-derives
/// `M`/`N` per phase.
#[derive(Clone, Debug)]
pub struct Ciphersuite {
    curve: Curve,
    hash: HashAlgorithm,
    kdf: KdfAlgorithm,
    mac: MacAlgorithm,
    m: Point,
    n: Point,
}

impl Ciphersuite {
    /// The sole supported ciphersuite: P-256 / SHA-256 / HKDF / HMAC, with
    /// `M`/`N` as the RFC 9382 seed-derived points for P-256.
    pub fn p256() -> Self {
        let p = dec("115792089210356248762697446949407573530086143415290314195533631308867097853951");
        let n = dec("115792089210356248762697446949407573529996955224135760342422259061068512044369");
        let gx = hex("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296");
        let gy = hex("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5");
        let a = Integer::from(-3);
        let b = hex("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b");
        let h = Integer::from(1);

        let curve = Curve::new(
            "P-256",
            a,
            b,
            p,
            n,
            h,
            32,
            Point::affine(gx, gy),
        );

        let m = Point::affine(
            dec("61709229055687782219344352628424647386531596507379261315813478518843566432559"),
            dec("43399651700267013692148409492066214468674361939146464406474584691695279811872"),
        );
        let n_point = Point::affine(
            dec("98031458012971070369465795029179261841266230867477002166417845678366165379913"),
            dec("3544368724946236282841049099645644789675854804295951046212527731618188549095"),
        );

        Ciphersuite {
            curve,
            hash: HashAlgorithm::Sha256,
            kdf: KdfAlgorithm::HkdfSha256,
            mac: MacAlgorithm::HmacSha256,
            m,
            n: n_point,
        }
    }

    /// The underlying curve.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// The client's blinding base point, `M`.
    pub fn m(&self) -> &Point {
        &self.m
    }

    /// The server's blinding base point, `N`.
    pub fn n(&self) -> &Point {
        &self.n
    }

    /// The bound hash function.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    /// The bound key derivation function.
    pub fn kdf_algorithm(&self) -> KdfAlgorithm {
        self.kdf
    }

    /// The bound MAC function.
    pub fn mac_algorithm(&self) -> MacAlgorithm {
        self.mac
    }
}

fn dec(s: &str) -> Integer {
    Integer::from_str_radix(s, 10).expect("ciphersuite constant is valid decimal")
}

fn hex(s: &str) -> Integer {
    Integer::from_str_radix(s, 16).expect("ciphersuite constant is valid hex")
}
