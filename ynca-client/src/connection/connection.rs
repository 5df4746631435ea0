//! Connection to one receiver
//!
//! # Architecture
//!
//! Opening a connection splits the transport stream into two halves, each
//! owned by a tokio task:
//!
//! - **Writer**: the command scheduler (see `scheduler.rs`), paces outbound
//!   lines and sends keep-alive probes
//! - **Reader**: reads lines, parses them into [`Message`]s and calls every
//!   registered listener synchronously
//!
//! [`Connection`] itself is a cheap handle; clones share the same link.
//! Dropping the last handle aborts both tasks.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use ynca_client::ConnectionBuilder;
//! use ynca_core::Message;
//!
//! # async fn run() -> ynca_core::YncaResult<()> {
//! let conn = ConnectionBuilder::new()
//!     .address("socket://192.168.1.50:50000")
//!     .connect()
//!     .await?;
//!
//! conn.register_listener(|msg: &Message| println!("{}", msg));
//! conn.get("MAIN", "VOL")?;
//! conn.put("MAIN", "VOL", "-30.5")?;
//!
//! conn.close().await;
//! # Ok(())
//! # }
//! ```

use super::builder::{ConnectionSettings, DisconnectNotifier};
use super::comm_log::{CommunicationLog, Direction, LogEntry};
use super::listener::{ListenerId, ListenerSet, MessageListener};
use super::scheduler::{CommandQueue, Outbound, run_writer};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use ynca_core::protocol::{format_command, format_get};
use ynca_core::{Message, YncaError, YncaResult};
use ynca_transport::TransportLayer;

/// State of the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    /// The transport failed or reached end of stream
    Disconnected,
    /// Closed by the caller
    Closed,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Connected => write!(f, "Connected"),
            LinkState::Disconnected => write!(f, "Disconnected"),
            LinkState::Closed => write!(f, "Closed"),
        }
    }
}

/// State shared between the handle and the two tasks
pub(crate) struct Shared {
    pub(crate) description: String,
    pub(crate) settings: ConnectionSettings,
    pub(crate) queue: CommandQueue,
    pub(crate) listeners: ListenerSet,
    pub(crate) comm_log: CommunicationLog,
    pub(crate) keepalive_pending: AtomicBool,
    commands_sent: AtomicU64,
    link: watch::Sender<LinkState>,
    disconnect_notifier: Option<DisconnectNotifier>,
}

impl Shared {
    /// Move from `Connected` to `Disconnected` and notify once
    ///
    /// No effect after a caller-initiated close.
    pub(crate) fn mark_disconnected(&self) {
        let changed = self.link.send_if_modified(|state| {
            if *state == LinkState::Connected {
                *state = LinkState::Disconnected;
                true
            } else {
                false
            }
        });

        if changed {
            warn!("Connection to {} lost", self.description);
            self.queue.close();
            if let Some(notifier) = &self.disconnect_notifier {
                notifier();
            }
        }
    }

    fn handle_line(&self, line: &str) {
        debug!("Received: {}", line);
        self.comm_log.record(Direction::Received, line);

        let message = Message::parse(line);

        // Pending until a model name response or a manual model name query clears it
        if message.is_keep_alive_response() && self.keepalive_pending.swap(false, Ordering::SeqCst) {
            debug!("Suppressed keep-alive response");
            return;
        }

        if message.is_unrecognized() {
            debug!("Dropping unrecognized line: {:?}", line);
            return;
        }

        self.listeners.dispatch(&message);
    }
}

/// Task handles; aborted when the last connection handle goes away
struct Tasks {
    writer: Option<JoinHandle<()>>,
    reader: Option<JoinHandle<()>>,
}

impl Drop for Tasks {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            writer.abort();
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Handle to an open YNCA link
#[derive(Clone)]
pub struct Connection {
    shared: Arc<Shared>,
    tasks: Arc<Mutex<Tasks>>,
}

impl Connection {
    /// Open `transport` and start the writer and reader tasks
    ///
    /// Two keep-alive probes are queued first: a receiver waking from
    /// standby may swallow the first line it gets.
    ///
    /// # Errors
    /// - `YncaError::ConnectionFailed` if not running inside a tokio runtime
    /// - `YncaError::Connection` if the transport cannot be opened
    pub(crate) async fn open(
        transport: &mut dyn TransportLayer,
        settings: ConnectionSettings,
        disconnect_notifier: Option<DisconnectNotifier>,
    ) -> YncaResult<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            YncaError::ConnectionFailed(format!("No tokio runtime to run the connection: {}", e))
        })?;

        let description = transport.description();
        let stream = transport.open().await.inspect_err(|e| {
            error!("Failed to open {}: {}", description, e);
        })?;
        info!("Connected to {}", description);

        let (link, _) = watch::channel(LinkState::Connected);
        let shared = Arc::new(Shared {
            description,
            comm_log: CommunicationLog::new(settings.communication_log_size),
            settings,
            queue: CommandQueue::default(),
            listeners: ListenerSet::default(),
            keepalive_pending: AtomicBool::new(false),
            commands_sent: AtomicU64::new(0),
            link,
            disconnect_notifier,
        });

        shared.queue.push(Outbound::KeepAlive);
        shared.queue.push(Outbound::KeepAlive);

        let (read_half, write_half) = tokio::io::split(stream);
        let writer = runtime.spawn(run_writer(Arc::clone(&shared), write_half));
        let reader = runtime.spawn(run_reader(Arc::clone(&shared), read_half));

        Ok(Self {
            shared,
            tasks: Arc::new(Mutex::new(Tasks {
                writer: Some(writer),
                reader: Some(reader),
            })),
        })
    }

    /// Queue a GET request
    pub fn get(&self, subunit: &str, function: &str) -> YncaResult<()> {
        self.raw(&format_get(subunit, function))
    }

    /// Queue a PUT request
    pub fn put(&self, subunit: &str, function: &str, value: &str) -> YncaResult<()> {
        self.raw(&format_command(subunit, function, value))
    }

    /// Queue a line verbatim (without terminator)
    ///
    /// The commands-sent counter is incremented here, when the line is
    /// queued, not when it is written.
    ///
    /// # Errors
    /// - `YncaError::Usage` if the line contains a line break
    /// - `YncaError::Connection` if the link is no longer connected
    pub fn raw(&self, line: &str) -> YncaResult<()> {
        if line.contains(['\r', '\n']) {
            return Err(YncaError::Usage(format!(
                "Command {:?} must be a single line",
                line
            )));
        }
        if !self.is_connected() {
            return Err(YncaError::not_connected(&format!(
                "Cannot send {:?}, connection to {} is {}",
                line,
                self.shared.description,
                *self.shared.link.borrow()
            )));
        }
        self.shared.commands_sent.fetch_add(1, Ordering::SeqCst);
        self.shared.queue.push(Outbound::Command(line.to_string()));
        Ok(())
    }

    pub fn register_listener<L>(&self, listener: L) -> ListenerId
    where
        L: MessageListener + 'static,
    {
        self.shared.listeners.register(Arc::new(listener))
    }

    /// Returns `false` if the listener was not registered
    pub fn unregister_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.unregister(id)
    }

    /// Number of commands queued since the connection was opened
    pub fn commands_sent(&self) -> u64 {
        self.shared.commands_sent.load(Ordering::SeqCst)
    }

    pub fn is_connected(&self) -> bool {
        *self.shared.link.borrow() == LinkState::Connected
    }

    /// Watch the link state
    pub fn link_state(&self) -> watch::Receiver<LinkState> {
        self.shared.link.subscribe()
    }

    /// Snapshot of the diagnostic log, oldest first
    pub fn communication_log(&self) -> Vec<LogEntry> {
        self.shared.comm_log.snapshot()
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.shared.settings
    }

    /// Transport description, e.g. `socket://192.168.1.50:50000`
    pub fn description(&self) -> &str {
        &self.shared.description
    }

    /// Close the connection
    ///
    /// Pending commands are discarded, listeners are removed and the writer
    /// is given `shutdown_timeout` to stop. Closing more than once is a
    /// no-op, and the disconnect notifier is never called for it.
    pub async fn close(&self) {
        let first_close = self.shared.link.send_if_modified(|state| {
            if *state == LinkState::Closed {
                false
            } else {
                *state = LinkState::Closed;
                true
            }
        });
        if !first_close {
            return;
        }

        info!("Closing connection to {}", self.shared.description);
        self.shared.queue.close();
        self.shared.listeners.clear();

        let writer = self.tasks.lock().writer.take();
        if let Some(mut writer) = writer {
            let timeout = self.shared.settings.shutdown_timeout;
            if tokio::time::timeout(timeout, &mut writer).await.is_err() {
                warn!("Writer did not stop within {:?}, aborting it", timeout);
                writer.abort();
            }
        }

        let reader = self.tasks.lock().reader.take();
        if let Some(reader) = reader {
            reader.abort();
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("description", &self.shared.description)
            .field("state", &*self.shared.link.borrow())
            .field("commands_sent", &self.commands_sent())
            .field("listeners", &self.shared.listeners.len())
            .finish()
    }
}

/// Reader task body; returns at end of stream or on a read error
async fn run_reader<R>(shared: Arc<Shared>, reader: R)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                info!("{} closed the connection", shared.description);
                break;
            }
            Ok(_) => {
                // Device chatter is not guaranteed to be valid UTF-8
                let text = String::from_utf8_lossy(&buf);
                let line = text.trim_end_matches(['\r', '\n']);
                if !line.is_empty() {
                    shared.handle_line(line);
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", shared.description, e);
                break;
            }
        }
    }

    shared.mark_disconnected();
}
