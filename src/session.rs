//! The SPAKE2 session state machine: one `Spake2Session` per party, carried
//! through setup, key derivation, and confirmation.
//!
//! Mirrors the reference's `Spake2` class phase-by-phase (`Spake2.hpp`):
//! construct from a password and identity, compute the public share, accept
//! the peer's public share and derive the shared key material, then accept
//! and check the peer's confirmation tag. The phases are exposed as explicit
//! methods rather than one `run()` call so a transport can interleave I/O
//! between them (see [`crate::transport`]).

use rug::Integer;
use zeroize::Zeroize;

use crate::bigint::{self, UniformRandom};
use crate::ciphersuite::Ciphersuite;
use crate::curve::Point;
use crate::encoding::hex_to_bin;
use crate::error::{Result, Spake2Error};
use crate::primitives;
use crate::transcript::Transcript;

/// Which side of the exchange a session plays. Determines which of the two
/// blinding points (`M` or `N`) is used for the session's own share, and
/// which identity is treated as `A` versus `B` when the transcript is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The initiating party; uses `M` for its own share, `N` for the peer's.
    Client,
    /// The responding party; uses `N` for its own share, `M` for the peer's.
    Server,
}

/// The session's progress through the protocol. Each phase method checks the
/// session is in the state it expects and advances it on success; calling a
/// phase out of order is reported as [`Spake2Error::ProtocolMisuse`] rather
/// than silently recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, nothing computed yet.
    Fresh,
    /// `setup_phase` has run; `k_pub` is available to send.
    SetupDone,
    /// `key_derivation_phase` has run; `confirmation_key` is available to
    /// send and `expected_key` is ready to check the peer's tag against.
    KdDone,
    /// `check_protocol_complete` ran and the tags matched.
    Verified,
    /// `check_protocol_complete` ran and the tags did not match.
    Failed,
}

/// One party's view of a SPAKE2 exchange.
///
/// Secret-bearing fields (`w`, `k_pri`, and the derived key material) are
/// wiped on drop; see the `Drop` impl below and SPEC_FULL.md §9.
pub struct Spake2Session {
    mode: Mode,
    suite: Ciphersuite,
    identity: Vec<u8>,
    aad: Vec<u8>,
    state: SessionState,

    w: Integer,
    k_pri: Integer,
    k_pub: Option<Point>,

    peer_identity: Option<Vec<u8>>,
    peer_k_pub: Option<Point>,

    shared_element: Option<Point>,
    transcript: Option<Transcript>,
    transcript_hash: Option<String>,
    ke: Option<String>,
    ka: Option<String>,
    kca: Option<String>,
    kcb: Option<String>,

    confirmation_key: Option<String>,
    expected_key: Option<String>,
    peer_confirmation: Option<String>,
}

impl Spake2Session {
    /// Builds a fresh session: hashes `password` through the memory-hard
    /// password hash to get `w`, and draws a private scalar `k_pri` from the
    /// session's own CSPRNG-seeded generator.
    pub fn new(mode: Mode, identity: &[u8], password: &[u8], aad: &[u8]) -> Result<Self> {
        if identity.is_empty() || password.is_empty() {
            return Err(Spake2Error::EmptyInput);
        }
        let suite = Ciphersuite::p256();
        let w_bytes = primitives::memory_hard_hash(password, suite.curve().field_size_bytes() + 8)?;
        let w = bigint::from_be_bytes(&w_bytes).rem_euc(suite.curve().p());

        let mut rng = UniformRandom::from_os_entropy();
        let k_pri = rng.below(suite.curve().p());

        Ok(Spake2Session::assemble(mode, identity, aad, suite, w, k_pri))
    }

    /// Builds a session from an already-derived `w` and an explicit private
    /// scalar, bypassing the password hash and the session's own random
    /// draw. Intended for replaying fixed test vectors; not something normal
    /// callers need.
    pub fn from_injected_scalars(
        mode: Mode,
        identity: &[u8],
        aad: &[u8],
        w: Integer,
        k_pri: Integer,
    ) -> Result<Self> {
        if identity.is_empty() {
            return Err(Spake2Error::EmptyInput);
        }
        let suite = Ciphersuite::p256();
        Ok(Spake2Session::assemble(mode, identity, aad, suite, w, k_pri))
    }

    fn assemble(mode: Mode, identity: &[u8], aad: &[u8], suite: Ciphersuite, w: Integer, k_pri: Integer) -> Self {
        Spake2Session {
            mode,
            suite,
            identity: identity.to_vec(),
            aad: aad.to_vec(),
            state: SessionState::Fresh,
            w,
            k_pri,
            k_pub: None,
            peer_identity: None,
            peer_k_pub: None,
            shared_element: None,
            transcript: None,
            transcript_hash: None,
            ke: None,
            ka: None,
            kca: None,
            kcb: None,
            confirmation_key: None,
            expected_key: None,
            peer_confirmation: None,
        }
    }

    /// This party's role.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// This party's identity, as supplied at construction.
    pub fn identity(&self) -> &[u8] {
        &self.identity
    }

    /// Current protocol phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Own blinding base: `M` for the client, `N` for the server.
    fn own_base(&self) -> &Point {
        match self.mode {
            Mode::Client => self.suite.m(),
            Mode::Server => self.suite.n(),
        }
    }

    /// Peer's blinding base: `N` when we're the client, `M` when we're the
    /// server — the opposite of `own_base`.
    fn peer_base(&self) -> &Point {
        match self.mode {
            Mode::Client => self.suite.n(),
            Mode::Server => self.suite.m(),
        }
    }

    /// Computes `k_pub = k_pri*G + w*own_base` and advances to
    /// [`SessionState::SetupDone`].
    pub fn setup_phase(&mut self) -> Result<()> {
        if self.state != SessionState::Fresh {
            return Err(Spake2Error::ProtocolMisuse(
                "setup_phase called outside the Fresh state",
            ));
        }
        let curve = self.suite.curve();
        let x = curve.scalar_multiply(&self.k_pri, curve.generator())?;
        let w_base = curve.scalar_multiply(&self.w, self.own_base())?;
        let k_pub = curve.operate(&x, &w_base)?;
        self.k_pub = Some(k_pub);
        self.state = SessionState::SetupDone;
        Ok(())
    }

    /// This party's public share, `k_pub`, ready to hand to the transport.
    /// Available once [`Spake2Session::setup_phase`] has run.
    pub fn public_key(&self) -> Option<&Point> {
        self.k_pub.as_ref()
    }

    /// `k_pub` rendered as uncompressed hex, for handing to a transport.
    pub fn public_key_hex(&self) -> Option<String> {
        self.k_pub
            .as_ref()
            .map(|p| p.uncompressed_hex(self.suite.curve().field_size_bytes(), true))
    }

    /// Records the peer's identity and public share, delivered by whatever
    /// transport the caller is using. Can be called before or after
    /// `setup_phase`; `key_derivation_phase` requires both to have happened.
    pub fn put_peer_public_key(&mut self, peer_identity: &[u8], peer_k_pub_hex: &str) -> Result<()> {
        let point = Point::from_uncompressed_hex(peer_k_pub_hex, self.suite.curve().field_size_bytes())?;
        self.peer_identity = Some(peer_identity.to_vec());
        self.peer_k_pub = Some(point);
        Ok(())
    }

    /// Computes the shared element, the transcript and its hash, and the
    /// confirmation key pair. Advances to [`SessionState::KdDone`].
    pub fn key_derivation_phase(&mut self) -> Result<()> {
        if self.state != SessionState::SetupDone {
            return Err(Spake2Error::ProtocolMisuse(
                "key_derivation_phase called before setup_phase completed",
            ));
        }
        let peer_k_pub = self
            .peer_k_pub
            .as_ref()
            .ok_or(Spake2Error::ProtocolMisuse(
                "key_derivation_phase called before the peer's public key was delivered",
            ))?;
        let peer_identity = self
            .peer_identity
            .clone()
            .ok_or(Spake2Error::ProtocolMisuse(
                "key_derivation_phase called before the peer's identity was delivered",
            ))?;

        let curve = self.suite.curve();
        let w_peer_base = curve.scalar_multiply(&self.w, self.peer_base())?;
        let neg_w_peer_base = curve.negate(&w_peer_base);
        let t = curve.operate(peer_k_pub, &neg_w_peer_base)?;
        let h_k_pri = Integer::from(curve.h() * &self.k_pri);
        let shared = curve.scalar_multiply(&h_k_pri, &t)?;

        let field_size = curve.field_size_bytes();
        let (a_identity, b_identity, pa, pb) = match self.mode {
            Mode::Client => (
                self.identity.clone(),
                peer_identity.clone(),
                self.k_pub.as_ref().unwrap().uncompressed_bytes(field_size),
                peer_k_pub.uncompressed_bytes(field_size),
            ),
            Mode::Server => (
                peer_identity.clone(),
                self.identity.clone(),
                peer_k_pub.uncompressed_bytes(field_size),
                self.k_pub.as_ref().unwrap().uncompressed_bytes(field_size),
            ),
        };
        let shared_bytes = shared.uncompressed_bytes(field_size);
        let w_bytes = bigint::to_be_bytes(&self.w);
        let transcript = Transcript::assemble(&a_identity, &b_identity, &pa, &pb, &shared_bytes, &w_bytes);
        let transcript_hash = transcript.hash(self.suite.hash_algorithm());

        let midpoint = transcript_hash.len() / 2;
        let ke = transcript_hash[..midpoint].to_string();
        let ka = transcript_hash[midpoint..].to_string();

        let ka_bytes = hex_to_bin(&ka)?;
        let mut info = b"ConfirmationKeys".to_vec();
        info.extend_from_slice(&self.aad);
        let kcab = primitives::kdf(self.suite.kdf_algorithm(), &ka_bytes, &info)?;
        let kcab_midpoint = kcab.len() / 2;
        let kca = kcab[..kcab_midpoint].to_string();
        let kcb = kcab[kcab_midpoint..].to_string();

        let message = transcript.ascii_hex();
        let a_conf = primitives::mac(self.suite.mac_algorithm(), &hex_to_bin(&kca)?, message.as_bytes())?;
        let b_conf = primitives::mac(self.suite.mac_algorithm(), &hex_to_bin(&kcb)?, message.as_bytes())?;

        let (confirmation_key, expected_key) = match self.mode {
            Mode::Client => (a_conf, b_conf),
            Mode::Server => (b_conf, a_conf),
        };

        self.shared_element = Some(shared);
        self.transcript = Some(transcript);
        self.transcript_hash = Some(transcript_hash);
        self.ke = Some(ke);
        self.ka = Some(ka);
        self.kca = Some(kca);
        self.kcb = Some(kcb);
        self.confirmation_key = Some(confirmation_key);
        self.expected_key = Some(expected_key);
        self.state = SessionState::KdDone;
        Ok(())
    }

    /// This party's confirmation tag, ready to hand to the transport.
    /// Available once [`Spake2Session::key_derivation_phase`] has run.
    pub fn confirmation_key(&self) -> Option<&str> {
        self.confirmation_key.as_deref()
    }

    /// Records the peer's confirmation tag and identity, delivered by the
    /// transport. The identity is cross-checked against whatever identity
    /// `put_peer_public_key` recorded, if any.
    pub fn put_peer_confirmation(&mut self, peer_identity: &[u8], confirmation: &str) -> Result<()> {
        if let Some(expected) = &self.peer_identity {
            if expected.as_slice() != peer_identity {
                return Err(Spake2Error::IdentityMismatch {
                    expected: crate::encoding::bin_to_hex(expected, false),
                    actual: crate::encoding::bin_to_hex(peer_identity, false),
                });
            }
        }
        self.peer_confirmation = Some(confirmation.to_string());
        Ok(())
    }

    /// Compares the peer's confirmation tag against the expected one in
    /// constant time, and advances to [`SessionState::Verified`] or
    /// [`SessionState::Failed`] accordingly. Returns the outcome as `bool`,
    /// not an error: a tag mismatch is an expected, non-fatal protocol
    /// outcome, not a bug.
    pub fn check_protocol_complete(&mut self) -> Result<bool> {
        if self.state != SessionState::KdDone {
            return Err(Spake2Error::ProtocolMisuse(
                "check_protocol_complete called before key_derivation_phase completed",
            ));
        }
        let expected = self
            .expected_key
            .as_deref()
            .ok_or(Spake2Error::ProtocolMisuse("expected_key missing in KdDone state"))?;
        let peer = self.peer_confirmation.as_deref().ok_or(Spake2Error::ProtocolMisuse(
            "check_protocol_complete called before the peer's confirmation was delivered",
        ))?;
        let ok = primitives::constant_time_eq(expected, peer);
        self.state = if ok { SessionState::Verified } else { SessionState::Failed };
        Ok(ok)
    }

    /// The transcript hash, hex-encoded. Available once key derivation has
    /// run.
    pub fn transcript_hash(&self) -> Option<&str> {
        self.transcript_hash.as_deref()
    }

    /// The symmetric encryption/authentication key halves, `(Ke, Ka)`.
    pub fn shared_symmetric_secrets(&self) -> Option<(&str, &str)> {
        Some((self.ke.as_deref()?, self.ka.as_deref()?))
    }

    /// The confirmation MAC key halves, `(KcA, KcB)`.
    pub fn mac_keys(&self) -> Option<(&str, &str)> {
        Some((self.kca.as_deref()?, self.kcb.as_deref()?))
    }
}

impl Drop for Spake2Session {
    fn drop(&mut self) {
        // `rug::Integer` has no upstream `Zeroize` impl (SPEC_FULL.md §9), so
        // the secret scalars are copied into a zeroizable byte buffer before
        // the Integer itself is dropped; the GMP allocation behind it is
        // still freed by rug's own Drop without being wiped.
        let mut w_shadow = bigint::to_be_bytes(&self.w);
        w_shadow.zeroize();
        let mut k_pri_shadow = bigint::to_be_bytes(&self.k_pri);
        k_pri_shadow.zeroize();

        self.ke.zeroize();
        self.ka.zeroize();
        self.kca.zeroize();
        self.kcb.zeroize();
        self.confirmation_key.zeroize();
        self.expected_key.zeroize();
        self.peer_confirmation.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_handshake(
        client_identity: &[u8],
        server_identity: &[u8],
        client_password: &[u8],
        server_password: &[u8],
        aad: &[u8],
    ) -> (bool, bool) {
        let mut client = Spake2Session::new(Mode::Client, client_identity, client_password, aad).unwrap();
        let mut server = Spake2Session::new(Mode::Server, server_identity, server_password, aad).unwrap();

        client.setup_phase().unwrap();
        server.setup_phase().unwrap();

        let client_pub = client.public_key_hex().unwrap();
        let server_pub = server.public_key_hex().unwrap();
        client.put_peer_public_key(server_identity, &server_pub).unwrap();
        server.put_peer_public_key(client_identity, &client_pub).unwrap();

        client.key_derivation_phase().unwrap();
        server.key_derivation_phase().unwrap();

        let client_conf = client.confirmation_key().unwrap().to_string();
        let server_conf = server.confirmation_key().unwrap().to_string();
        client.put_peer_confirmation(server_identity, &server_conf).unwrap();
        server.put_peer_confirmation(client_identity, &client_conf).unwrap();

        (
            client.check_protocol_complete().unwrap(),
            server.check_protocol_complete().unwrap(),
        )
    }

    #[test]
    fn password_derived_w_and_k_pri_stay_below_p_not_n() {
        let session = Spake2Session::new(Mode::Client, b"alice", b"correct horse", b"aad").unwrap();
        let p = session.suite.curve().p();
        let n = session.suite.curve().n();
        assert!(&session.w < p);
        assert!(&session.k_pri < p);
        // p and n differ for P-256, so this also catches a reduction mod n.
        assert_ne!(p, n);
    }

    #[test]
    fn matching_password_and_aad_verifies_on_both_sides() {
        let (client_ok, server_ok) = run_handshake(b"alice", b"bob", b"correct horse", b"correct horse", b"aad");
        assert!(client_ok);
        assert!(server_ok);
    }

    #[test]
    fn mismatched_password_fails_on_both_sides() {
        let (client_ok, server_ok) = run_handshake(b"alice", b"bob", b"correct horse", b"wrong horse", b"aad");
        assert!(!client_ok);
        assert!(!server_ok);
    }

    #[test]
    fn mismatched_aad_fails_confirmation_even_with_matching_password() {
        let mut client = Spake2Session::new(Mode::Client, b"alice", b"pw", b"aad-one").unwrap();
        let mut server = Spake2Session::new(Mode::Server, b"bob", b"pw", b"aad-two").unwrap();

        client.setup_phase().unwrap();
        server.setup_phase().unwrap();
        let client_pub = client.public_key_hex().unwrap();
        let server_pub = server.public_key_hex().unwrap();
        client.put_peer_public_key(b"bob", &server_pub).unwrap();
        server.put_peer_public_key(b"alice", &client_pub).unwrap();
        client.key_derivation_phase().unwrap();
        server.key_derivation_phase().unwrap();

        let client_conf = client.confirmation_key().unwrap().to_string();
        let server_conf = server.confirmation_key().unwrap().to_string();
        client.put_peer_confirmation(b"bob", &server_conf).unwrap();
        server.put_peer_confirmation(b"alice", &client_conf).unwrap();

        assert!(!client.check_protocol_complete().unwrap());
        assert!(!server.check_protocol_complete().unwrap());
    }

    #[test]
    fn both_sides_derive_the_same_shared_secrets() {
        let mut client = Spake2Session::new(Mode::Client, b"alice", b"pw", b"aad").unwrap();
        let mut server = Spake2Session::new(Mode::Server, b"bob", b"pw", b"aad").unwrap();

        client.setup_phase().unwrap();
        server.setup_phase().unwrap();
        let client_pub = client.public_key_hex().unwrap();
        let server_pub = server.public_key_hex().unwrap();
        client.put_peer_public_key(b"bob", &server_pub).unwrap();
        server.put_peer_public_key(b"alice", &client_pub).unwrap();
        client.key_derivation_phase().unwrap();
        server.key_derivation_phase().unwrap();

        assert_eq!(client.transcript_hash(), server.transcript_hash());
        assert_eq!(client.shared_symmetric_secrets(), server.shared_symmetric_secrets());
        assert_eq!(client.mac_keys(), server.mac_keys());
    }

    #[test]
    fn phases_called_out_of_order_are_rejected() {
        let mut client = Spake2Session::new(Mode::Client, b"alice", b"pw", b"aad").unwrap();
        assert!(matches!(
            client.key_derivation_phase(),
            Err(Spake2Error::ProtocolMisuse(_))
        ));
        assert!(matches!(
            client.check_protocol_complete(),
            Err(Spake2Error::ProtocolMisuse(_))
        ));
    }

    #[test]
    fn injected_scalars_reproduce_expected_public_key() {
        // Using k_pri = 1 makes k_pub = G + w*M, letting the test check the
        // setup phase's arithmetic directly against curve primitives.
        let suite = Ciphersuite::p256();
        let w = Integer::from(7);
        let mut session =
            Spake2Session::from_injected_scalars(Mode::Client, b"alice", b"aad", w.clone(), Integer::from(1))
                .unwrap();
        session.setup_phase().unwrap();

        let curve = suite.curve();
        let expected = curve
            .operate(curve.generator(), &curve.scalar_multiply(&w, suite.m()).unwrap())
            .unwrap();
        assert_eq!(session.public_key(), Some(&expected));
    }

    #[test]
    fn peer_identity_mismatch_is_rejected() {
        let mut client = Spake2Session::new(Mode::Client, b"alice", b"pw", b"aad").unwrap();
        let mut server = Spake2Session::new(Mode::Server, b"bob", b"pw", b"aad").unwrap();
        client.setup_phase().unwrap();
        server.setup_phase().unwrap();
        let server_pub = server.public_key_hex().unwrap();
        client.put_peer_public_key(b"bob", &server_pub).unwrap();
        client.key_derivation_phase().unwrap();

        let result = client.put_peer_confirmation(b"mallory", "deadbeef");
        assert!(matches!(result, Err(Spake2Error::IdentityMismatch { .. })));
    }
}
