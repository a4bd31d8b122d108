//! Event delivery channels.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Why a sink refused an event.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The receiving side is gone; no further writes can succeed.
    #[error("sink closed")]
    Closed,
}

/// A single-item delivery channel a subscriber hands to the registry.
///
/// The registry only ever holds `Arc` references to sinks; the receiving
/// side stays owned by the subscriber. A `write` may suspend (a full
/// channel, a slow consumer), which is why transceiver fan-out wraps each
/// write in a timeout.
#[async_trait]
pub trait EventSink<E: Send>: Send + Sync {
    /// Delivers one event to the subscriber.
    async fn write(&self, event: E) -> Result<(), SinkError>;
}

/// An [`EventSink`] backed by a bounded tokio mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelSink<E> {
    tx: mpsc::Sender<E>,
}

impl<E> ChannelSink<E> {
    pub fn new(tx: mpsc::Sender<E>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl<E: Send> EventSink<E> for ChannelSink<E> {
    async fn write(&self, event: E) -> Result<(), SinkError> {
        self.tx.send(event).await.map_err(|_| SinkError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (tx, mut rx) = mpsc::channel(4);
        let sink = ChannelSink::new(tx);
        sink.write(42u32).await.unwrap();
        assert_eq!(rx.recv().await, Some(42));
    }

    #[tokio::test]
    async fn test_channel_sink_closed() {
        let (tx, rx) = mpsc::channel::<u32>(1);
        drop(rx);
        let sink = ChannelSink::new(tx);
        assert!(matches!(sink.write(1).await, Err(SinkError::Closed)));
    }
}
