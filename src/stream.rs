//! Producer task and channel hand-off for decoded records.
//!
//! [`spawn_decoder`] owns the byte source on a background task and delivers
//! records over a `tokio::sync::mpsc` channel of capacity 1: at most one
//! unconsumed record exists at a time, so decoding pauses whenever no
//! consumer is ready. Records arrive in the exact order their `data:` lines
//! appeared in the stream.
//!
//! Termination:
//! - clean end of stream closes the channel after flushing any final
//!   unterminated line;
//! - a read error is delivered as the last item before the channel closes,
//!   so consumers can tell a truncated stream from clean completion;
//! - dropping the [`RecordStream`] cancels the producer: its blocked send
//!   fails, it stops reading and releases the source.
//!
//! On every exit path the source is dropped exactly once, before the channel
//! signals completion.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::sse::{LineBuffer, SseDecoder, SseRecord};

/// Error type for stream production.
///
/// Normal termination is not an error: the channel simply closes. Only a
/// failed read of the underlying byte stream is surfaced.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Reading the underlying byte stream failed
    #[error("failed to read from event stream: {0}")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Consumer handle for a decoded record sequence.
///
/// `None` from [`RecordStream::recv`] means the producer finished and the
/// source has been released. Dropping the handle cancels the producer.
#[derive(Debug)]
pub struct RecordStream {
    rx: mpsc::Receiver<Result<SseRecord, StreamError>>,
}

impl RecordStream {
    /// Receive the next record, waiting until the producer emits one.
    pub async fn recv(&mut self) -> Option<Result<SseRecord, StreamError>> {
        self.rx.recv().await
    }

    /// Drain the stream to completion, collecting all records.
    ///
    /// Stops at the first read error and returns it.
    pub async fn try_collect(mut self) -> Result<Vec<SseRecord>, StreamError> {
        let mut records = Vec::new();
        while let Some(item) = self.recv().await {
            records.push(item?);
        }
        Ok(records)
    }
}

impl Stream for RecordStream {
    type Item = Result<SseRecord, StreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Spawn a producer task decoding `source` into a [`RecordStream`].
///
/// The task takes ownership of the source; it is dropped exactly once when
/// production ends, whatever the exit path.
pub fn spawn_decoder<S, E>(source: S) -> RecordStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(decode_loop(source, tx));
    RecordStream { rx }
}

async fn decode_loop<S, E>(mut source: S, tx: mpsc::Sender<Result<SseRecord, StreamError>>)
where
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut lines = LineBuffer::new();
    let mut decoder = SseDecoder::new();

    'read: loop {
        match source.next().await {
            Some(Ok(chunk)) => {
                lines.extend(&chunk);
                while let Some(line) = lines.next_line() {
                    if let Some(record) = decoder.feed_line(&line) {
                        if tx.send(Ok(record)).await.is_err() {
                            // Consumer dropped the RecordStream; stop reading
                            tracing::debug!("record stream consumer went away, stopping decode");
                            break 'read;
                        }
                    }
                }
            }
            Some(Err(err)) => {
                tracing::warn!("event stream read failed: {err}");
                let _ = tx.send(Err(StreamError::Read(Box::new(err)))).await;
                break 'read;
            }
            None => {
                // End of stream; a final line without a terminator still counts
                if let Some(line) = lines.take_remainder() {
                    if let Some(record) = decoder.feed_line(&line) {
                        let _ = tx.send(Ok(record)).await;
                    }
                }
                tracing::debug!("event stream ended");
                break 'read;
            }
        }
    }

    // Release the source before the channel closes, so a consumer observing
    // completion never races a live stream handle
    drop(source);
}
