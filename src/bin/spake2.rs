//! Command-line front end for running one side of a SPAKE2 exchange against
//! a peer process, using the filesystem to pass messages between them.
//!
//! Flag names follow the reference `main.cpp`: `-s`/`--server` picks the
//! responding role, `-i`/`--identity` and `--peer-identity` name the two
//! parties, `--pw` supplies the shared password, `--aad` is optional
//! associated data mixed into the confirmation keys.

use std::process::ExitCode;
use std::time::Duration;

use structopt::StructOpt;

use spake2_rs::error::Result;
use spake2_rs::session::{Mode, Spake2Session};
use spake2_rs::transport::FileTransport;

#[derive(StructOpt)]
#[structopt(
    name = "spake2",
    about = "Run one side of a SPAKE2 (RFC 9382) password-authenticated key exchange."
)]
struct Opt {
    /// Act as the responding party instead of the initiating one.
    #[structopt(short = "s", long = "server")]
    server: bool,

    /// This party's identity.
    #[structopt(short = "i", long = "identity")]
    identity: String,

    /// The peer's identity.
    #[structopt(long = "peer-identity")]
    peer_identity: String,

    /// The shared password both parties hold.
    #[structopt(long = "pw")]
    password: String,

    /// Associated data mixed into the confirmation keys; must match on both
    /// sides for confirmation to succeed.
    #[structopt(long = "aad", default_value = "")]
    aad: String,

    /// Directory used as the rendezvous point between the two parties.
    #[structopt(long = "dir", default_value = "./spake2_transport")]
    dir: std::path::PathBuf,

    /// How long to wait for the peer's messages before giving up.
    #[structopt(long = "timeout-secs", default_value = "30")]
    timeout_secs: u64,
}

fn own_label(server: bool) -> &'static str {
    if server {
        "server"
    } else {
        "client"
    }
}

fn peer_label(server: bool) -> &'static str {
    if server {
        "client"
    } else {
        "server"
    }
}

fn run(opt: Opt) -> Result<bool> {
    let mode = if opt.server { Mode::Server } else { Mode::Client };
    let mut session = Spake2Session::new(
        mode,
        opt.identity.as_bytes(),
        opt.password.as_bytes(),
        opt.aad.as_bytes(),
    )?;
    let transport = FileTransport::new(&opt.dir)?;
    let timeout = Duration::from_secs(opt.timeout_secs);
    let poll_interval = Duration::from_millis(200);

    session.setup_phase()?;
    let own_pub = session.public_key_hex().expect("setup_phase just ran");
    transport.send(
        &format!("{}_kpub", own_label(opt.server)),
        &spake2_rs::transport::Message::new(opt.identity.as_bytes(), &own_pub),
    )?;

    let peer_pub_message = transport.receive(&format!("{}_kpub", peer_label(opt.server)), timeout, poll_interval)?;
    session.put_peer_public_key(&peer_pub_message.identity, &peer_pub_message.blob_str())?;

    session.key_derivation_phase()?;
    let own_conf = session.confirmation_key().expect("key_derivation_phase just ran").to_string();
    transport.send(
        &format!("{}_kconf", own_label(opt.server)),
        &spake2_rs::transport::Message::new(opt.identity.as_bytes(), &own_conf),
    )?;

    let peer_conf_message = transport.receive(&format!("{}_kconf", peer_label(opt.server)), timeout, poll_interval)?;
    session.put_peer_confirmation(&peer_conf_message.identity, &peer_conf_message.blob_str())?;

    session.check_protocol_complete()
}

fn main() -> ExitCode {
    let opt = Opt::from_args();
    match run(opt) {
        Ok(true) => {
            println!("spake2: key confirmed");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            eprintln!("spake2: confirmation tags did not match");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("spake2: {e}");
            ExitCode::FAILURE
        }
    }
}
