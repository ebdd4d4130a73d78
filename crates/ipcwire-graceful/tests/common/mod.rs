#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::mpsc::{Receiver, Sender, channel};

use ipcwire_errors::{IpcError, IpcResult};
use ipcwire_transport::{ByteStream, Endpoint, MessageTransport, Role};
use parking_lot::Mutex;

/// In-memory transport recording what passes through it.
#[derive(Debug, Default)]
pub struct Recorder {
    pub sent: Mutex<Vec<Vec<u8>>>,
    pub fail_with_peer_closed: bool,
}

impl MessageTransport for Recorder {
    fn send(&self, payload: &[u8]) -> IpcResult<()> {
        if self.fail_with_peer_closed {
            return Err(IpcError::PeerClosed);
        }
        self.sent.lock().push(payload.to_vec());
        Ok(())
    }

    fn recv(&self) -> IpcResult<Vec<u8>> {
        self.sent.lock().pop().ok_or(IpcError::PeerClosed)
    }
}

impl ByteStream for Recorder {
    fn read(&self, max_len: usize) -> IpcResult<Vec<u8>> {
        let mut bytes = self.recv()?;
        bytes.truncate(max_len);
        Ok(bytes)
    }

    fn write(&self, data: &[u8]) -> IpcResult<()> {
        self.send(data)
    }
}

impl Endpoint for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn role(&self) -> Role {
        Role::Server
    }

    fn wait_for_client(&self) -> IpcResult<()> {
        Ok(())
    }
}

/// Transport whose `recv` blocks until released, announcing when it starts.
#[derive(Debug)]
pub struct Gate {
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

/// Handles driving a [`Gate`] from the test thread.
pub struct GateControl {
    pub entered: Receiver<()>,
    pub release: Sender<()>,
}

pub fn gate() -> (Gate, GateControl) {
    let (entered_tx, entered_rx) = channel();
    let (release_tx, release_rx) = channel();
    (
        Gate {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        },
        GateControl {
            entered: entered_rx,
            release: release_tx,
        },
    )
}

impl MessageTransport for Gate {
    fn send(&self, _payload: &[u8]) -> IpcResult<()> {
        Ok(())
    }

    fn recv(&self) -> IpcResult<Vec<u8>> {
        self.entered
            .lock()
            .send(())
            .map_err(|e| IpcError::invalid_state(e.to_string()))?;
        self.release
            .lock()
            .recv()
            .map_err(|e| IpcError::invalid_state(e.to_string()))?;
        Ok(b"released".to_vec())
    }
}
