//! Loopback IPC channel for one child generation
//!
//! The child's hook connects to `HOTRUN_IPC` once and writes one JSON object
//! per line. Lines are decoded into `ChildMessage` here; anything that does not
//! decode is logged and dropped before it reaches the supervisor.
//!
//! Once the child has exited, `IpcDrain::wait` lets the reader deliver what
//! the child wrote before its exit is reported.

use std::io::{self, BufRead, BufReader};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::application::SupervisorEvent;
use crate::domain::entities::ChildMessage;

/// Environment variable carrying the listener address
pub const IPC_ENV: &str = "HOTRUN_IPC";

const ACCEPT_POLL: Duration = Duration::from_millis(50);

/// Listener plus (once accepted) the connection of one child
pub struct IpcChannel {
    addr: SocketAddr,
    stream: Arc<Mutex<Option<TcpStream>>>,
    cancelled: Arc<AtomicBool>,
}

/// Completion of one generation's reader, waited on after the child exits
pub struct IpcDrain {
    closed: Arc<AtomicBool>,
    done: Receiver<()>,
}

impl IpcDrain {
    /// Stop accepting, then wait up to `timeout` for the reader to reach end
    /// of stream. Returns false if the connection is still open (a grandchild
    /// may have inherited it).
    pub fn wait(self, timeout: Duration) -> bool {
        self.closed.store(true, Ordering::SeqCst);
        matches!(
            self.done.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }
}

impl IpcChannel {
    /// Bind a loopback listener and start accepting in the background
    pub fn bind(generation: u64, events: Sender<SupervisorEvent>) -> io::Result<(Self, IpcDrain)> {
        let listener = TcpListener::bind(("127.0.0.1", 0))?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let stream = Arc::new(Mutex::new(None));
        let cancelled = Arc::new(AtomicBool::new(false));
        let closed = Arc::new(AtomicBool::new(false));
        let (done_tx, done) = mpsc::channel();

        let reader = Reader {
            generation,
            events,
            slot: Arc::clone(&stream),
            cancelled: Arc::clone(&cancelled),
            closed: Arc::clone(&closed),
            _done: done_tx,
        };
        thread::Builder::new()
            .name(format!("hotrun-ipc-{generation}"))
            .spawn(move || reader.serve(listener))?;

        debug!(generation, %addr, "IPC listener bound");
        let channel = Self {
            addr,
            stream,
            cancelled,
        };
        Ok((channel, IpcDrain { closed, done }))
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting and shut the connection down
    pub fn disconnect(&self) {
        if let Ok(mut guard) = self.stream.lock() {
            self.cancelled.store(true, Ordering::SeqCst);
            if let Some(stream) = guard.take() {
                let _ = stream.shutdown(Shutdown::Both);
            }
        }
    }
}

impl Drop for IpcChannel {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Accept loop and line reader of one generation; dropping it signals `IpcDrain`
struct Reader {
    generation: u64,
    events: Sender<SupervisorEvent>,
    slot: Arc<Mutex<Option<TcpStream>>>,
    cancelled: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
    _done: Sender<()>,
}

impl Reader {
    fn serve(self, listener: TcpListener) {
        let generation = self.generation;
        let stream = loop {
            if self.cancelled.load(Ordering::SeqCst) {
                return;
            }
            // a connection made just before the child exited is still accepted
            let closing = self.closed.load(Ordering::SeqCst);
            match listener.accept() {
                Ok((stream, peer)) => {
                    trace!(generation, %peer, "Child connected");
                    break stream;
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if closing {
                        return;
                    }
                    thread::sleep(ACCEPT_POLL);
                }
                Err(e) => {
                    warn!(generation, "IPC accept failed: {}", e);
                    return;
                }
            }
        };

        if let Err(e) = stream.set_nonblocking(false) {
            warn!(generation, "IPC stream setup failed: {}", e);
            return;
        }
        let reader = match stream.try_clone() {
            Ok(reader) => reader,
            Err(e) => {
                warn!(generation, "IPC stream setup failed: {}", e);
                return;
            }
        };

        {
            let Ok(mut guard) = self.slot.lock() else {
                return;
            };
            if self.cancelled.load(Ordering::SeqCst) {
                let _ = stream.shutdown(Shutdown::Both);
                return;
            }
            *guard = Some(stream);
        }

        if self
            .events
            .send(SupervisorEvent::ChildConnected { generation })
            .is_err()
        {
            return;
        }

        for line in BufReader::new(reader).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    trace!(generation, "IPC read ended: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match ChildMessage::decode(&line) {
                Ok(message) => {
                    trace!(generation, kind = message.kind(), "IPC message");
                    if self
                        .events
                        .send(SupervisorEvent::from_message(generation, message))
                        .is_err()
                    {
                        return;
                    }
                }
                Err(e) => warn!(generation, "Dropping malformed IPC message: {}", e),
            }
        }

        let _ = self
            .events
            .send(SupervisorEvent::ChildDisconnected { generation });
    }
}
