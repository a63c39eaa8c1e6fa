//! End-to-end exchanges between two independently constructed sessions,
//! covering the scenarios enumerated in SPEC_FULL.md §8: matching
//! credentials succeed, any single mismatch (password, AAD, or a corrupted
//! confirmation tag) fails on both sides, and the derived secrets are
//! internally consistent between the two parties.

use rug::Integer;

use spake2_rs::session::{Mode, Spake2Session};
use spake2_rs::transport::{FileTransport, Message};

struct Handshake {
    client: Spake2Session,
    server: Spake2Session,
}

impl Handshake {
    fn new(
        client_identity: &[u8],
        server_identity: &[u8],
        client_password: &[u8],
        server_password: &[u8],
        client_aad: &[u8],
        server_aad: &[u8],
    ) -> Self {
        let client = Spake2Session::new(Mode::Client, client_identity, client_password, client_aad).unwrap();
        let server = Spake2Session::new(Mode::Server, server_identity, server_password, server_aad).unwrap();
        Handshake { client, server }
    }

    fn run_to_confirmation(&mut self, client_identity: &[u8], server_identity: &[u8]) -> (bool, bool) {
        self.client.setup_phase().unwrap();
        self.server.setup_phase().unwrap();

        let client_pub = self.client.public_key_hex().unwrap();
        let server_pub = self.server.public_key_hex().unwrap();
        self.client.put_peer_public_key(server_identity, &server_pub).unwrap();
        self.server.put_peer_public_key(client_identity, &client_pub).unwrap();

        self.client.key_derivation_phase().unwrap();
        self.server.key_derivation_phase().unwrap();

        let client_conf = self.client.confirmation_key().unwrap().to_string();
        let server_conf = self.server.confirmation_key().unwrap().to_string();
        self.client.put_peer_confirmation(server_identity, &server_conf).unwrap();
        self.server.put_peer_confirmation(client_identity, &client_conf).unwrap();

        (
            self.client.check_protocol_complete().unwrap(),
            self.server.check_protocol_complete().unwrap(),
        )
    }
}

#[test]
fn matching_credentials_produce_mutual_confirmation() {
    let mut hs = Handshake::new(b"alice", b"bob", b"swordfish", b"swordfish", b"protocol-v1", b"protocol-v1");
    let (client_ok, server_ok) = hs.run_to_confirmation(b"alice", b"bob");
    assert!(client_ok);
    assert!(server_ok);
    assert_eq!(hs.client.transcript_hash(), hs.server.transcript_hash());
}

#[test]
fn password_mismatch_fails_both_sides() {
    let mut hs = Handshake::new(b"alice", b"bob", b"swordfish", b"seahorse", b"", b"");
    let (client_ok, server_ok) = hs.run_to_confirmation(b"alice", b"bob");
    assert!(!client_ok);
    assert!(!server_ok);
}

#[test]
fn aad_mismatch_fails_both_sides_even_with_matching_password() {
    let mut hs = Handshake::new(b"alice", b"bob", b"swordfish", b"swordfish", b"v1", b"v2");
    let (client_ok, server_ok) = hs.run_to_confirmation(b"alice", b"bob");
    assert!(!client_ok);
    assert!(!server_ok);
}

#[test]
fn corrupted_confirmation_tag_is_rejected() {
    let mut client = Spake2Session::new(Mode::Client, b"alice", b"pw", b"").unwrap();
    let mut server = Spake2Session::new(Mode::Server, b"bob", b"pw", b"").unwrap();
    client.setup_phase().unwrap();
    server.setup_phase().unwrap();
    let client_pub = client.public_key_hex().unwrap();
    let server_pub = server.public_key_hex().unwrap();
    client.put_peer_public_key(b"bob", &server_pub).unwrap();
    server.put_peer_public_key(b"alice", &client_pub).unwrap();
    client.key_derivation_phase().unwrap();
    server.key_derivation_phase().unwrap();

    let mut corrupted = server.confirmation_key().unwrap().to_string();
    corrupted.replace_range(0..2, if &corrupted[0..2] == "00" { "ff" } else { "00" });
    client.put_peer_confirmation(b"bob", &corrupted).unwrap();
    assert!(!client.check_protocol_complete().unwrap());
}

/// Replays a fixed (w, x, y) assignment through both parties and checks the
/// two independently-derived transcripts, shared secrets, and confirmation
/// tags all agree with each other. SPEC_FULL.md §8 documents that the
/// reference's published vectors are truncated in the distilled spec, so
/// this checks internal consistency rather than literal hex constants.
#[test]
fn injected_scalars_yield_internally_consistent_vectors() {
    let w = Integer::from_str_radix(
        "2ee57912099d31560d0aa08d5b06f1e6b1a1754273b7b639b4790d3b4d356f3",
        16,
    )
    .unwrap();
    let x = Integer::from_str_radix(
        "d1232c8e8693d02368976c174e2088851b8365d0d79a9eee709251c7327b7d7",
        16,
    )
    .unwrap();
    let y = Integer::from_str_radix(
        "c0b4e60faf3b5b59b3dc3cb124ad1bccb5ae0c61262d91f3f40821daf4f1b3c",
        16,
    )
    .unwrap();

    let mut client = Spake2Session::from_injected_scalars(Mode::Client, b"alice", b"vector", w.clone(), x).unwrap();
    let mut server = Spake2Session::from_injected_scalars(Mode::Server, b"bob", b"vector", w, y).unwrap();

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

    let client_conf = client.confirmation_key().unwrap().to_string();
    let server_conf = server.confirmation_key().unwrap().to_string();
    client.put_peer_confirmation(b"bob", &server_conf).unwrap();
    server.put_peer_confirmation(b"alice", &client_conf).unwrap();
    assert!(client.check_protocol_complete().unwrap());
    assert!(server.check_protocol_complete().unwrap());
}

#[test]
fn file_transport_carries_messages_between_two_sessions() {
    let dir = std::env::temp_dir().join(format!(
        "spake2-handshake-it-{:?}-{}",
        std::thread::current().id(),
        std::process::id()
    ));
    let transport = FileTransport::new(&dir).unwrap();

    let mut client = Spake2Session::new(Mode::Client, b"alice", b"pw", b"").unwrap();
    let mut server = Spake2Session::new(Mode::Server, b"bob", b"pw", b"").unwrap();

    client.setup_phase().unwrap();
    server.setup_phase().unwrap();

    transport
        .send("client_kpub", &Message::new(b"alice", &client.public_key_hex().unwrap()))
        .ok();
    transport
        .send("server_kpub", &Message::new(b"bob", &server.public_key_hex().unwrap()))
        .ok();

    let from_server = transport.try_receive("server_kpub").unwrap().unwrap();
    let from_client = transport.try_receive("client_kpub").unwrap().unwrap();
    client.put_peer_public_key(&from_server.identity, &from_server.blob_str()).unwrap();
    server.put_peer_public_key(&from_client.identity, &from_client.blob_str()).unwrap();

    client.key_derivation_phase().unwrap();
    server.key_derivation_phase().unwrap();
    assert_eq!(client.transcript_hash(), server.transcript_hash());

    std::fs::remove_dir_all(&dir).ok();
}
