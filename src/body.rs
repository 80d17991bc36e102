//! Response body abstraction.
//!
//! ## Overview
//!
//! A [`Body`] is either a payload the downloader already buffered in full, or
//! a live chunk stream backed by a bounded kanal channel. The lazy document
//! accessor consumes a body exactly once, chunk by chunk, so the API is a
//! single pull method rather than a `Stream` implementation.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crawldoc::body::Body;
//!
//! let (sender, mut body) = Body::channel(8);
//! sender.send(b"<p>hi</p>".as_slice()).await?;
//! drop(sender); // clean end-of-stream
//!
//! while let Some(chunk) = body.chunk().await {
//!     let chunk = chunk?;
//!     // accumulate...
//! }
//! ```

use bytes::Bytes;
use kanal::{AsyncReceiver, AsyncSender, bounded_async};

use crate::error::BodyError;

/// A response body: fully buffered, or streamed in chunks.
pub struct Body {
    inner: BodyInner,
}

enum BodyInner {
    /// Already-buffered payload, yielded as a single chunk.
    Full(Option<Bytes>),
    /// Chunks arriving over a channel. A closed channel is end-of-stream;
    /// an `Err` chunk is a transport failure.
    Stream(AsyncReceiver<Result<Bytes, BodyError>>),
}

impl Body {
    /// An empty body.
    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    /// A body over an already-buffered payload.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Body {
            inner: BodyInner::Full(Some(bytes.into())),
        }
    }

    /// A body over a static byte slice.
    pub fn from_static(bytes: &'static [u8]) -> Self {
        Self::from_bytes(Bytes::from_static(bytes))
    }

    /// Creates a channel-backed streaming body with the given chunk capacity.
    ///
    /// Dropping the [`BodySender`] ends the stream cleanly;
    /// [`BodySender::fail`] ends it with a transport error.
    pub fn channel(capacity: usize) -> (BodySender, Body) {
        let (tx, rx) = bounded_async(capacity);
        (
            BodySender { tx },
            Body {
                inner: BodyInner::Stream(rx),
            },
        )
    }

    /// Pulls the next chunk. `None` signals end-of-stream; after that every
    /// further call also returns `None`.
    pub async fn chunk(&mut self) -> Option<Result<Bytes, BodyError>> {
        match &mut self.inner {
            BodyInner::Full(payload) => payload.take().map(Ok),
            BodyInner::Stream(rx) => rx.recv().await.ok(),
        }
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            BodyInner::Full(Some(bytes)) => write!(f, "Body::Full({} bytes)", bytes.len()),
            BodyInner::Full(None) => write!(f, "Body::Full(consumed)"),
            BodyInner::Stream(_) => write!(f, "Body::Stream"),
        }
    }
}

/// Producer half of a streaming [`Body`].
pub struct BodySender {
    tx: AsyncSender<Result<Bytes, BodyError>>,
}

impl BodySender {
    /// Sends one chunk. Fails only if the body was dropped.
    pub async fn send(&self, chunk: impl Into<Bytes>) -> Result<(), BodyError> {
        self.tx
            .send(Ok(chunk.into()))
            .await
            .map_err(|_| BodyError::Transport("body receiver dropped".into()))
    }

    /// Terminates the stream with a transport error.
    pub async fn fail(self, reason: impl Into<String>) {
        let _ = self.tx.send(Err(BodyError::Transport(reason.into()))).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn full_body_yields_once() {
        let mut body = Body::from_static(b"hello");
        let chunk = body.chunk().await.expect("one chunk").expect("ok");
        assert_eq!(&chunk[..], b"hello");
        assert!(body.chunk().await.is_none());
        assert!(body.chunk().await.is_none());
    }

    #[tokio::test]
    async fn channel_body_ends_when_sender_drops() {
        let (tx, mut body) = Body::channel(4);
        tx.send(b"ab".as_slice()).await.expect("send");
        tx.send(b"cd".as_slice()).await.expect("send");
        drop(tx);

        let mut collected = Vec::new();
        while let Some(chunk) = body.chunk().await {
            collected.extend_from_slice(&chunk.expect("ok chunk"));
        }
        assert_eq!(collected, b"abcd");
    }

    #[tokio::test]
    async fn channel_body_surfaces_transport_error() {
        let (tx, mut body) = Body::channel(4);
        tx.send(b"partial".as_slice()).await.expect("send");
        tx.fail("connection reset").await;

        assert!(body.chunk().await.expect("chunk").is_ok());
        let err = body.chunk().await.expect("chunk").unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
