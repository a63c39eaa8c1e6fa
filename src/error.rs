//! Error types for the SPAKE2 engine.
//!
//! Mirrors the error taxonomy a caller of the reference implementation has to
//! reason about: malformed wire input, a broken cryptographic primitive,
//! protocol misuse (calling a phase out of order), and the non-fatal
//! "confirmation tags didn't match" outcome, which is reported as a `bool`
//! from [`crate::session::Spake2Session::check_protocol_complete`] rather than
//! an `Err`.

use thiserror::Error;

/// Errors surfaced by the SPAKE2 core.
#[derive(Debug, Error)]
pub enum Spake2Error {
    /// A required argument (identity, password, hex string) was empty.
    #[error("required input was empty")]
    EmptyInput,

    /// Hex decoding failed: odd-length input, or a non-hex character.
    #[error("invalid hex encoding: {0}")]
    InvalidEncoding(String),

    /// The identity echoed in a confirmation message didn't match the
    /// identity from the setup message.
    #[error("peer identity mismatch: expected `{expected}`, got `{actual}`")]
    IdentityMismatch {
        /// Identity recorded during the setup phase.
        expected: String,
        /// Identity seen in the confirmation message.
        actual: String,
    },

    /// A phase was invoked before its prerequisite phase completed.
    #[error("protocol misuse: {0}")]
    ProtocolMisuse(&'static str),

    /// A modular inverse was requested for a value not coprime to the
    /// modulus. Cannot happen on honest, on-curve inputs.
    #[error("arithmetic failure: {0} has no inverse mod the given modulus")]
    ArithmeticFailure(String),

    /// The underlying hash, KDF, MAC, or password-hash primitive failed.
    #[error("cryptographic primitive failure: {0}")]
    PrimitiveFailure(String),

    /// A point was supplied in transport messages but could not be decoded.
    #[error("malformed point encoding: {0}")]
    MalformedPoint(String),

    /// The file-based transport demo hit an I/O error.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Spake2Error>;
