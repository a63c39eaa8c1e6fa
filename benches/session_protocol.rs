use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use spake2_rs::session::{Mode, Spake2Session};

fn run_full_handshake() -> bool {
    let mut client = Spake2Session::new(Mode::Client, b"alice", b"hunter2", b"aad").unwrap();
    let mut server = Spake2Session::new(Mode::Server, b"bob", b"hunter2", b"aad").unwrap();

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

    client.check_protocol_complete().unwrap() && server.check_protocol_complete().unwrap()
}

pub fn bench_full_handshake(c: &mut Criterion) {
    c.bench_function("spake2 full handshake (both parties)", |b| {
        b.iter(|| black_box(run_full_handshake()))
    });
}

criterion_group!(benches, bench_full_handshake);
criterion_main!(benches);
