//! Command scheduler
//!
//! A single writer task owns the outbound half of the transport. It takes
//! items from a FIFO queue, writes them, and sleeps the command spacing after
//! every line, so the spacing also holds for keep-alive probes. When the
//! queue stays empty for the keep-alive interval a probe is sent instead.

use super::comm_log::Direction;
use super::connection::Shared;
use log::{debug, error};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Notify;
use tokio::time::Instant;
use ynca_core::protocol::{LINE_TERMINATOR, keep_alive_command};

/// Item in the outbound queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outbound {
    /// Raw line, without terminator
    Command(String),
    KeepAlive,
    /// Stop the writer
    Close,
}

/// FIFO of outbound items with an awaitable pop
#[derive(Debug, Default)]
pub(crate) struct CommandQueue {
    items: Mutex<VecDeque<Outbound>>,
    notify: Notify,
}

impl CommandQueue {
    pub(crate) fn push(&self, item: Outbound) {
        self.items.lock().push_back(item);
        self.notify.notify_one();
    }

    /// Discard pending items and put the close sentinel in front
    pub(crate) fn close(&self) {
        {
            let mut items = self.items.lock();
            items.clear();
            items.push_front(Outbound::Close);
        }
        self.notify.notify_one();
    }

    pub(crate) fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Wait up to `idle` for the next item
    ///
    /// Returns `None` when nothing arrived in time.
    pub(crate) async fn pop(&self, idle: Duration) -> Option<Outbound> {
        let deadline = Instant::now() + idle;
        loop {
            let notified = self.notify.notified();
            let next = self.items.lock().pop_front();
            if let Some(item) = next {
                return Some(item);
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return None;
            }
        }
    }
}

/// Writer task body; returns when closed or when a write fails
pub(crate) async fn run_writer<W>(shared: Arc<Shared>, mut writer: W)
where
    W: AsyncWrite + Unpin,
{
    let spacing = shared.settings.command_spacing;
    let idle = shared.settings.keep_alive_interval;

    loop {
        let line = match shared.queue.pop(idle).await {
            Some(Outbound::Command(line)) => {
                // A manual model name query owns the next model name response
                if line == keep_alive_command() {
                    shared.keepalive_pending.store(false, Ordering::SeqCst);
                }
                line
            }
            Some(Outbound::KeepAlive) | None => {
                shared.keepalive_pending.store(true, Ordering::SeqCst);
                keep_alive_command()
            }
            Some(Outbound::Close) => {
                debug!("Writer for {} stopped", shared.description);
                break;
            }
        };

        if let Err(e) = write_line(&mut writer, &line).await {
            error!("Failed to write to {}: {}", shared.description, e);
            shared.mark_disconnected();
            break;
        }
        debug!("Sent: {}", line);
        shared.comm_log.record(Direction::Sent, &line);

        tokio::time::sleep(spacing).await;
    }

    let _ = writer.shutdown().await;
}

async fn write_line<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(LINE_TERMINATOR.as_bytes()).await?;
    writer.flush().await
}
