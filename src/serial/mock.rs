//! In-process stand-in for the relay device.
//!
//! Backs the `--mock` run mode and the transport tests. Every write and read
//! is recorded so callers can check what reached the wire and in which order.
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Write(Vec<u8>),
    Read { capacity: usize, returned: usize },
}

#[derive(Debug, Clone)]
enum Reply {
    Echo,
    Fixed(Vec<u8>),
    Silent,
    ZeroLength,
}

#[derive(Debug)]
struct MockState {
    reply: Reply,
    write_failure: Option<io::ErrorKind>,
    short_write: bool,
    read_failure: Option<io::ErrorKind>,
    latency: Duration,
    inbound: VecDeque<u8>,
    events: Vec<LinkEvent>,
}

/// Cloneable handle; all clones share the same simulated device.
#[derive(Debug, Clone)]
pub struct MockLink {
    state: Arc<Mutex<MockState>>,
}

impl MockLink {
    fn with_reply(reply: Reply) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                reply,
                write_failure: None,
                short_write: false,
                read_failure: None,
                latency: Duration::ZERO,
                inbound: VecDeque::new(),
                events: Vec::new(),
            })),
        }
    }

    /// Device that acknowledges each command by sending the byte back.
    pub fn echo() -> Self {
        Self::with_reply(Reply::Echo)
    }

    /// Device that answers every command with `reply`.
    pub fn replying(reply: &[u8]) -> Self {
        Self::with_reply(Reply::Fixed(reply.to_vec()))
    }

    /// Device that never answers; reads run into the timeout.
    pub fn silent() -> Self {
        Self::with_reply(Reply::Silent)
    }

    /// Device whose reads return zero bytes instead of timing out.
    pub fn zero_length() -> Self {
        Self::with_reply(Reply::ZeroLength)
    }

    pub fn failing_writes(self, kind: io::ErrorKind) -> Self {
        self.lock().write_failure = Some(kind);
        self
    }

    /// Writes report zero bytes accepted.
    pub fn short_writes(self) -> Self {
        self.lock().short_write = true;
        self
    }

    pub fn failing_reads(self, kind: io::ErrorKind) -> Self {
        self.lock().read_failure = Some(kind);
        self
    }

    /// Sleep this long inside every write and read.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = latency;
        self
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.write_failure = None;
        state.short_write = false;
        state.read_failure = None;
    }

    pub fn events(&self) -> Vec<LinkEvent> {
        self.lock().events.clone()
    }

    pub fn writes(&self) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| matches!(e, LinkEvent::Write(_)))
            .count()
    }

    pub fn reads(&self) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|e| matches!(e, LinkEvent::Read { .. }))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pause(&self) {
        let latency = self.lock().latency;
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }
    }
}

impl Write for MockLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pause();
        let mut state = self.lock();
        state.events.push(LinkEvent::Write(buf.to_vec()));

        if let Some(kind) = state.write_failure {
            return Err(io::Error::new(kind, "mock write failure"));
        }
        if state.short_write {
            return Ok(0);
        }

        match state.reply.clone() {
            Reply::Echo => state.inbound.extend(buf.iter().copied()),
            Reply::Fixed(reply) => state.inbound.extend(reply),
            Reply::Silent | Reply::ZeroLength => {}
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for MockLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.pause();
        let mut state = self.lock();

        if let Some(kind) = state.read_failure {
            state.events.push(LinkEvent::Read { capacity: buf.len(), returned: 0 });
            return Err(io::Error::new(kind, "mock read failure"));
        }
        if state.inbound.is_empty() {
            state.events.push(LinkEvent::Read { capacity: buf.len(), returned: 0 });
            return match state.reply {
                Reply::ZeroLength => Ok(0),
                _ => Err(io::Error::new(io::ErrorKind::TimedOut, "mock read timed out")),
            };
        }

        let n = buf.len().min(state.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(state.inbound.drain(..n)) {
            *slot = byte;
        }
        state.events.push(LinkEvent::Read { capacity: buf.len(), returned: n });
        Ok(n)
    }
}
