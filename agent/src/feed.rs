//! Message feed adapter
//!
//! Bridges an asynchronous message source to a [`LogSession`]: producers push
//! [`ProtocolMessage`]s into a bounded channel and [`pump`] delivers them to
//! the session one at a time, in order.

use crate::session::LogSession;
use anyhow::{Context, Result};
use packetlog_shared::protocol::wire::CaptureReader;
use packetlog_shared::types::message::ProtocolMessage;
use std::io::Read;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub type FeedSender = mpsc::Sender<ProtocolMessage>;
pub type FeedReceiver = mpsc::Receiver<ProtocolMessage>;

/// Create a bounded feed channel
pub fn channel(capacity: usize) -> (FeedSender, FeedReceiver) {
    mpsc::channel(capacity.max(1))
}

/// Deliver every message from `rx` to the session until all senders are gone.
///
/// Returns the number of messages delivered. Whether each one is logged is up
/// to the session's state and filter.
pub async fn pump(session: Arc<LogSession>, mut rx: FeedReceiver) -> u64 {
    let mut delivered = 0u64;
    while let Some(message) = rx.recv().await {
        session.on_protocol_message(&message);
        delivered += 1;
    }
    debug!("Feed closed after {} messages", delivered);
    delivered
}

/// Stream a capture into the feed on a blocking thread.
///
/// Finishes with the number of messages sent, or the first decode error.
/// Stops early without error if the receiving side goes away.
pub fn spawn_capture_reader<R>(reader: R, tx: FeedSender) -> JoinHandle<Result<u64>>
where
    R: Read + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut capture = CaptureReader::new(reader);
        let mut sent = 0u64;
        for message in capture.by_ref() {
            let message = message.context("Failed to read capture")?;
            if tx.blocking_send(message).is_err() {
                debug!("Feed receiver dropped; stopping capture reader");
                break;
            }
            sent += 1;
        }
        info!(
            "Read {} messages from {} capture frames",
            sent,
            capture.frames_read()
        );
        Ok(sent)
    })
}
