//! A from-scratch SPAKE2 (RFC 9382) password-authenticated key exchange over
//! NIST P-256.
//!
//! Two parties who share a low-entropy password run [`session::Spake2Session`]
//! through three phases — setup, key derivation, confirmation — and come away
//! with a pair of high-entropy shared secrets, without ever sending the
//! password itself or anything an offline dictionary attack could grind
//! against. [`transport::FileTransport`] is one way to move the protocol's
//! two messages between parties; the [`session`] state machine itself is
//! transport-agnostic.
//!
//! ```no_run
//! use spake2_rs::session::{Mode, Spake2Session};
//!
//! # fn main() -> spake2_rs::error::Result<()> {
//! let mut client = Spake2Session::new(Mode::Client, b"alice", b"hunter2", b"")?;
//! let mut server = Spake2Session::new(Mode::Server, b"bob", b"hunter2", b"")?;
//!
//! client.setup_phase()?;
//! server.setup_phase()?;
//!
//! let client_pub = client.public_key_hex().unwrap();
//! let server_pub = server.public_key_hex().unwrap();
//! client.put_peer_public_key(b"bob", &server_pub)?;
//! server.put_peer_public_key(b"alice", &client_pub)?;
//!
//! client.key_derivation_phase()?;
//! server.key_derivation_phase()?;
//!
//! let client_conf = client.confirmation_key().unwrap().to_string();
//! let server_conf = server.confirmation_key().unwrap().to_string();
//! client.put_peer_confirmation(b"bob", &server_conf)?;
//! server.put_peer_confirmation(b"alice", &client_conf)?;
//!
//! assert!(client.check_protocol_complete()?);
//! assert!(server.check_protocol_complete()?);
//! # Ok(())
//! # }
//! ```

pub mod bigint;
pub mod ciphersuite;
pub mod curve;
pub mod encoding;
pub mod error;
pub mod primitives;
pub mod session;
pub mod transcript;
pub mod transport;
