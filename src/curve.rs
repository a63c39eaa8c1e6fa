//! Short-Weierstrass elliptic curve arithmetic over a prime field.
//!
//! Implements `y^2 = x^3 + a*x + b (mod p)` with affine coordinates, matching
//! the reference's `EllipticCurve`/`EllipticCurve::Point` pair one-for-one:
//! point addition, doubling, the combined `operate` dispatcher, scalar
//! multiplication by double-and-add, and negation. Curve invariants (`p`
//! prime, `G` on the curve, `n*G = infinity`) are assumed from the constants
//! in [`crate::ciphersuite`] and are not re-verified here.

use rug::ops::RemRounding;
use rug::Integer;

use crate::bigint;
use crate::error::Result;

/// A point on a short-Weierstrass curve: either the identity, or an affine
/// `(x, y)` pair with `0 <= x, y < p`.
#[derive(Clone, Debug)]
pub struct Point {
    x: Integer,
    y: Integer,
    infinity: bool,
}

impl Point {
    /// The point at infinity, the group's identity element.
    pub fn infinity() -> Self {
        Point {
            x: Integer::new(),
            y: Integer::new(),
            infinity: true,
        }
    }

    /// An affine point `(x, y)`. Callers are responsible for ensuring the
    /// point lies on the relevant curve; this constructor performs no check.
    pub fn affine(x: Integer, y: Integer) -> Self {
        Point {
            x,
            y,
            infinity: false,
        }
    }

    /// True if this is the identity element.
    pub fn is_infinity(&self) -> bool {
        self.infinity
    }

    /// The affine x-coordinate. Meaningless (zero) at infinity.
    pub fn x(&self) -> &Integer {
        &self.x
    }

    /// The affine y-coordinate. Meaningless (zero) at infinity.
    pub fn y(&self) -> &Integer {
        &self.y
    }

    /// Encodes this point as raw affine hex: `hex(x) || hex(y)`, each
    /// left-padded to `2 * field_size_bytes` hex characters.
    pub fn raw_hex(&self, field_size_bytes: usize) -> String {
        let width = field_size_bytes * 2;
        format!(
            "{}{}",
            bigint::pad_hex(&self.x, width),
            bigint::pad_hex(&self.y, width)
        )
    }

    /// Encodes this point in uncompressed SEC1-like form: a literal `04`
    /// followed by the raw affine hex, optionally prefixed with `0x`.
    pub fn uncompressed_hex(&self, field_size_bytes: usize, with_prefix: bool) -> String {
        let prefix = if with_prefix { "0x04" } else { "04" };
        format!("{}{}", prefix, self.raw_hex(field_size_bytes))
    }

    /// Raw affine byte form: a leading `0x04` byte followed by both
    /// coordinates, each left-padded to `field_size_bytes` bytes.
    pub fn uncompressed_bytes(&self, field_size_bytes: usize) -> Vec<u8> {
        let hex = self.uncompressed_hex(field_size_bytes, false);
        hex::decode(hex).expect("uncompressed_hex always yields valid hex")
    }

    /// Decodes an uncompressed SEC1-like hex string (`0x04` + two
    /// field-size-byte-padded coordinates) back into a point.
    pub fn from_uncompressed_hex(input: &str, field_size_bytes: usize) -> crate::error::Result<Self> {
        let body = crate::encoding::hex_to_bin(input)?;
        let expected_len = 1 + 2 * field_size_bytes;
        if body.len() != expected_len || body[0] != 0x04 {
            return Err(crate::error::Spake2Error::MalformedPoint(format!(
                "expected {expected_len} bytes with a 0x04 prefix, got {} bytes",
                body.len()
            )));
        }
        let (x_bytes, y_bytes) = body[1..].split_at(field_size_bytes);
        Ok(Point::affine(
            bigint::from_be_bytes(x_bytes),
            bigint::from_be_bytes(y_bytes),
        ))
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.infinity == other.infinity && (self.infinity || (self.x == other.x && self.y == other.y))
    }
}

impl Eq for Point {}

/// An immutable short-Weierstrass curve descriptor.
///
/// Constructed once from named constants (see [`crate::ciphersuite`]) and
/// read-only thereafter; the curve invariants (p prime, G on the curve, n*G =
/// infinity) are assumed, not checked.
#[derive(Clone, Debug)]
pub struct Curve {
    name: &'static str,
    a: Integer,
    b: Integer,
    p: Integer,
    n: Integer,
    h: Integer,
    field_size_bytes: usize,
    generator: Point,
}

impl Curve {
    /// Builds a curve descriptor from its defining constants.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &'static str,
        a: Integer,
        b: Integer,
        p: Integer,
        n: Integer,
        h: Integer,
        field_size_bytes: usize,
        generator: Point,
    ) -> Self {
        let a = a.rem_euc(&p);
        Curve {
            name,
            a,
            b,
            p,
            n,
            h,
            field_size_bytes,
            generator,
        }
    }

    /// The curve's name, e.g. `"P-256"`.
    pub fn name(&self) -> &str {
        self.name
    }

    /// The prime modulus `p`.
    pub fn p(&self) -> &Integer {
        &self.p
    }

    /// The curve parameter `a` (already reduced mod `p`).
    pub fn a(&self) -> &Integer {
        &self.a
    }

    /// The curve parameter `b`.
    pub fn b(&self) -> &Integer {
        &self.b
    }

    /// The group order `n`.
    pub fn n(&self) -> &Integer {
        &self.n
    }

    /// The cofactor `h`.
    pub fn h(&self) -> &Integer {
        &self.h
    }

    /// The size of the field, in bytes (`ceil(log2(p) / 8)`).
    pub fn field_size_bytes(&self) -> usize {
        self.field_size_bytes
    }

    /// The curve's defined base point, `G`.
    pub fn generator(&self) -> &Point {
        &self.generator
    }

    fn reduce(&self, v: Integer) -> Integer {
        v.rem_euc(&self.p)
    }

    /// Point doubling: `2*P`, assuming `P` is finite and `y_P != 0`.
    fn double(&self, p: &Point) -> Result<Point> {
        let two_y = self.reduce(Integer::from(&p.y * 2));
        let numerator = self.reduce(Integer::from(3) * Integer::from(p.x.pow_mod_ref(&Integer::from(2), &self.p).unwrap()) + &self.a);
        let inv = bigint::inverse(&two_y, &self.p)?;
        let s = self.reduce(numerator * inv);

        let x_r = self.reduce(Integer::from(&s * &s) - &p.x - &p.x);
        let y_r = self.reduce(&s * (Integer::from(&p.x - &x_r)) - &p.y);
        Ok(Point::affine(x_r, y_r))
    }

    /// Point addition: `P + Q`, assuming `P != Q`, neither at infinity, and
    /// `x_P != x_Q`.
    fn add(&self, p: &Point, q: &Point) -> Result<Point> {
        let dx = self.reduce(Integer::from(&q.x - &p.x));
        let dy = self.reduce(Integer::from(&q.y - &p.y));
        let inv = bigint::inverse(&dx, &self.p)?;
        let s = self.reduce(dy * inv);

        let x_r = self.reduce(Integer::from(&s * &s) - &p.x - &q.x);
        let y_r = self.reduce(&s * (Integer::from(&p.x - &x_r)) - &p.y);
        Ok(Point::affine(x_r, y_r))
    }

    /// Combined group operation. If either operand is the identity, the
    /// other is returned. If the operands are equal, doubling is performed.
    /// If they share an x-coordinate but differ in y (i.e. `Q = -P`), the
    /// identity is returned, since addition would otherwise divide by zero.
    pub fn operate(&self, p: &Point, q: &Point) -> Result<Point> {
        if p.infinity {
            return Ok(q.clone());
        }
        if q.infinity {
            return Ok(p.clone());
        }
        if p == q {
            return self.double(p);
        }
        if p.x == q.x {
            // p.y != q.y here, since p != q and x matches: Q = -P.
            return Ok(Point::infinity());
        }
        self.add(p, q)
    }

    /// Scalar multiplication `d * P` via left-to-right double-and-add.
    pub fn scalar_multiply(&self, d: &Integer, point: &Point) -> Result<Point> {
        if d.cmp0() == std::cmp::Ordering::Equal || point.infinity {
            return Ok(Point::infinity());
        }

        let bits = d.significant_bits();
        let mut t = point.clone();
        for i in (0..bits - 1).rev() {
            t = self.double(&t)?;
            if d.get_bit(i) {
                t = self.operate(&t, point)?;
            }
        }
        Ok(t)
    }

    /// The negation `-P`. `-infinity = infinity`; `-(x,y) = (x, p-y mod p)`.
    pub fn negate(&self, point: &Point) -> Point {
        if point.infinity {
            return Point::infinity();
        }
        let neg_y = self.reduce(Integer::from(&self.p - &point.y));
        Point::affine(point.x.clone(), neg_y)
    }

    /// True if `point` satisfies `y^2 = x^3 + a*x + b (mod p)`, or is the
    /// identity. Used only by tests; runtime code assumes well-formed
    /// constants and inputs per the spec.
    #[cfg(test)]
    pub fn is_on_curve(&self, point: &Point) -> bool {
        if point.infinity {
            return true;
        }
        let lhs = self.reduce(Integer::from(point.y.pow_mod_ref(&Integer::from(2), &self.p).unwrap()));
        let rhs = self.reduce(
            Integer::from(point.x.pow_mod_ref(&Integer::from(3), &self.p).unwrap()) + &self.a * &point.x + &self.b,
        );
        lhs == rhs
    }
}
