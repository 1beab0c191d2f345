//! Engine bridge over byte streams, typically a child process's stdio.
//!
//! Every message is a 4-byte little-endian length followed by a postcard
//! body. The resolver sends [`EngineRequest`]s and the engine answers each one
//! with exactly one [`EngineReply`]. The session opens with `Bind` (the reply
//! lists exported entry points), then `Construct`, then `Start`.

use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::bridge::{
    BridgeFault, EngineBridge, EngineHandle, GET_POOL_CONFIG, REQUIRED_ENTRY_POINTS, RESOLVE_REQUEST_POOL,
};

/// Largest frame accepted from the engine.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Message sent to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineRequest {
    /// List exported entry points.
    Bind,
    /// Construct the engine over two configuration files.
    Construct {
        /// Fair-scheduler allocation file.
        allocation_path: String,
        /// Llama site file.
        site_path: String,
    },
    /// Initialize the constructed engine.
    Start,
    /// Invoke a byte-in/byte-out entry point.
    Call {
        /// Entry point name.
        entry_point: String,
        /// Encoded request.
        payload: Vec<u8>,
    },
}

/// Message received from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineReply {
    /// Success, with the entry point's encoded response.
    Ok(Vec<u8>),
    /// The engine raised.
    Exception(String),
}

/// Write one length-prefixed frame.
///
/// # Errors
///
/// [`BridgeFault::Transport`] on encoding or I/O failure.
pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), BridgeFault> {
    let body = postcard::to_stdvec(message).map_err(|e| BridgeFault::Transport(format!("encode frame: {e}")))?;
    let len = u32::try_from(body.len()).map_err(|_| BridgeFault::Transport("frame too large".into()))?;
    writer
        .write_all(&len.to_le_bytes())
        .and_then(|()| writer.write_all(&body))
        .and_then(|()| writer.flush())
        .map_err(|e| BridgeFault::Transport(format!("write frame: {e}")))
}

/// Read one length-prefixed frame.
///
/// # Errors
///
/// [`BridgeFault::Transport`] on I/O failure, oversized frames or
/// undecodable bodies.
pub fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T, BridgeFault> {
    let mut len = [0u8; 4];
    reader
        .read_exact(&mut len)
        .map_err(|e| BridgeFault::Transport(format!("read frame header: {e}")))?;
    let len = u32::from_le_bytes(len) as usize;
    if len > MAX_FRAME_LEN {
        return Err(BridgeFault::Transport(format!("frame of {len} bytes exceeds {MAX_FRAME_LEN}")));
    }
    let mut body = vec![0u8; len];
    reader
        .read_exact(&mut body)
        .map_err(|e| BridgeFault::Transport(format!("read frame body: {e}")))?;
    postcard::from_bytes(&body).map_err(|e| BridgeFault::Transport(format!("decode frame: {e}")))
}

struct Channel {
    reader: Box<dyn Read + Send>,
    writer: Box<dyn Write + Send>,
    /// Set after a transport fault; the stream position is unknown from then on.
    broken: bool,
}

impl Channel {
    fn new(reader: Box<dyn Read + Send>, writer: Box<dyn Write + Send>) -> Self {
        Self {
            reader,
            writer,
            broken: false,
        }
    }

    fn exchange(&mut self, request: &EngineRequest) -> Result<EngineReply, BridgeFault> {
        if self.broken {
            return Err(BridgeFault::Transport(
                "engine session closed after an earlier transport failure".into(),
            ));
        }
        let reply = write_frame(&mut self.writer, request).and_then(|()| read_frame(&mut self.reader));
        if let Err(fault) = &reply {
            tracing::warn!(%fault, "engine session marked broken");
            self.broken = true;
        }
        reply
    }
}

/// A bound engine reachable over a pair of byte streams.
///
/// One request is in flight at a time; concurrent callers queue on an
/// internal mutex.
pub struct FramedEngine {
    channel: Mutex<Channel>,
    child: Option<Mutex<Child>>,
}

impl FramedEngine {
    /// Bind and construct an engine listening on `reader`/`writer`.
    ///
    /// # Errors
    ///
    /// [`BridgeFault::MissingEntryPoint`] if the engine does not export every
    /// required entry point, otherwise whatever `Construct` raises.
    pub fn handshake<R, W>(reader: R, writer: W, allocation_path: &Path, site_path: &Path) -> Result<Self, BridgeFault>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        Self {
            channel: Mutex::new(Channel::new(Box::new(reader), Box::new(writer))),
            child: None,
        }
        .bind_and_construct(allocation_path, site_path)
    }

    fn bind_and_construct(self, allocation_path: &Path, site_path: &Path) -> Result<Self, BridgeFault> {
        let exported: Vec<String> = postcard::from_bytes(&self.round_trip(&EngineRequest::Bind)?)
            .map_err(|e| BridgeFault::Transport(format!("decode entry points: {e}")))?;
        if let Some(missing) = REQUIRED_ENTRY_POINTS
            .iter()
            .find(|name| !exported.iter().any(|e| e == *name))
        {
            return Err(BridgeFault::MissingEntryPoint((*missing).to_string()));
        }

        self.round_trip(&EngineRequest::Construct {
            allocation_path: allocation_path.to_string_lossy().into_owned(),
            site_path: site_path.to_string_lossy().into_owned(),
        })?;
        Ok(self)
    }

    fn round_trip(&self, request: &EngineRequest) -> Result<Vec<u8>, BridgeFault> {
        match self.channel.lock().exchange(request)? {
            EngineReply::Ok(bytes) => Ok(bytes),
            EngineReply::Exception(message) => Err(BridgeFault::Exception(message)),
        }
    }

    fn call(&self, entry_point: &str, payload: &[u8]) -> Result<Vec<u8>, BridgeFault> {
        self.round_trip(&EngineRequest::Call {
            entry_point: entry_point.to_string(),
            payload: payload.to_vec(),
        })
    }
}

impl EngineHandle for FramedEngine {
    fn start(&self) -> Result<(), BridgeFault> {
        self.round_trip(&EngineRequest::Start).map(drop)
    }

    fn resolve_request_pool(&self, request: &[u8]) -> Result<Vec<u8>, BridgeFault> {
        self.call(RESOLVE_REQUEST_POOL, request)
    }

    fn get_pool_config(&self, request: &[u8]) -> Result<Vec<u8>, BridgeFault> {
        self.call(GET_POOL_CONFIG, request)
    }
}

impl Drop for FramedEngine {
    fn drop(&mut self) {
        if let Some(child) = &self.child {
            let mut child = child.lock();
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Launches the engine as a child process and speaks the frame protocol over
/// its stdin/stdout. The child's stderr is inherited.
#[derive(Debug, Clone)]
pub struct ProcessBridge {
    program: String,
    args: Vec<String>,
}

impl ProcessBridge {
    /// Bridge to `program` run without arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Split a whitespace-separated command line into program and arguments.
    ///
    /// # Errors
    ///
    /// [`BridgeFault::Unavailable`] for a blank command line.
    pub fn from_command_line(command: &str) -> Result<Self, BridgeFault> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| BridgeFault::Unavailable("empty engine command".into()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Append arguments passed to the program.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl EngineBridge for ProcessBridge {
    fn connect(&self, allocation_path: &Path, site_path: &Path) -> Result<Box<dyn EngineHandle>, BridgeFault> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| BridgeFault::Unavailable(format!("spawn `{}`: {e}", self.program)))?;
        tracing::debug!(program = %self.program, pid = child.id(), "policy engine process spawned");

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(BridgeFault::Transport("engine stdio not captured".into()));
        };
        let engine = FramedEngine {
            channel: Mutex::new(Channel::new(Box::new(BufReader::new(stdout)), Box::new(stdin))),
            child: Some(Mutex::new(child)),
        };
        Ok(Box::new(engine.bind_and_construct(allocation_path, site_path)?))
    }
}
