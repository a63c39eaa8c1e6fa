//! A minimal file-based transport for exchanging SPAKE2 messages out of
//! process, for the CLI binary and for demos.
//!
//! The reference wires its two parties together through bare file paths
//! passed around by convention (`spake2_<role>_kpub.key`,
//! `spake2_<role>_kconf.key`). This port keeps that file-based exchange but
//! puts it behind a small `(identity, blob)` channel abstraction
//! (SPEC_FULL.md §5, §9) instead of hardcoding path strings at every call
//! site, so a future transport (a socket, a channel) can implement the same
//! shape.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// One message exchanged between parties: an identity and an opaque blob
/// (a public key or a confirmation tag, both already hex-encoded by the
/// caller).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// The sender's identity, as raw bytes.
    pub identity: Vec<u8>,
    /// The message payload, typically a hex string's bytes.
    pub blob: Vec<u8>,
}

impl Message {
    /// Builds a message from an identity and a string payload.
    pub fn new(identity: &[u8], blob: &str) -> Self {
        Message {
            identity: identity.to_vec(),
            blob: blob.as_bytes().to_vec(),
        }
    }

    /// The payload, interpreted as UTF-8 (the only encoding this transport
    /// ever writes).
    pub fn blob_str(&self) -> String {
        String::from_utf8_lossy(&self.blob).into_owned()
    }
}

/// A directory-backed transport: each message is one file, named
/// `<label>.msg`, containing one line of the form `identity,blob` — the
/// byte-exact wire format from SPEC_FULL.md §6 (e.g.
/// `server,0x04<x-hex><y-hex>`).
///
/// Polling is used instead of a notification mechanism because the original
/// protocol runs as two independent CLI invocations with no IPC beyond the
/// filesystem; see the main binary for how the two phases interleave with
/// polling.
pub struct FileTransport {
    dir: PathBuf,
}

impl FileTransport {
    /// Opens (creating if necessary) a transport rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileTransport { dir })
    }

    fn path_for(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{label}.msg"))
    }

    /// Writes `message` under `label`, overwriting any previous value.
    pub fn send(&self, label: &str, message: &Message) -> Result<()> {
        let identity = String::from_utf8_lossy(&message.identity);
        let contents = format!("{identity},{}\n", message.blob_str());
        fs::write(self.path_for(label), contents)?;
        Ok(())
    }

    /// Reads the message under `label`, if it has been written yet.
    pub fn try_receive(&self, label: &str) -> Result<Option<Message>> {
        let path = self.path_for(label);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        let line = contents.lines().next().unwrap_or_default();
        let (identity, blob) = line
            .split_once(',')
            .ok_or_else(|| crate::error::Spake2Error::InvalidEncoding(format!("malformed transport line: {line}")))?;
        Ok(Some(Message {
            identity: identity.as_bytes().to_vec(),
            blob: blob.as_bytes().to_vec(),
        }))
    }

    /// Blocks, polling every `interval`, until the message under `label`
    /// appears or `timeout` elapses.
    pub fn receive(&self, label: &str, timeout: Duration, interval: Duration) -> Result<Message> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            if let Some(message) = self.try_receive(label)? {
                return Ok(message);
            }
            if std::time::Instant::now() >= deadline {
                return Err(crate::error::Spake2Error::ProtocolMisuse(
                    "timed out waiting for peer message",
                ));
            }
            std::thread::sleep(interval);
        }
    }

    /// The directory backing this transport.
    pub fn root(&self) -> &Path {
        &self.dir
    }
}
