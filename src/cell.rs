//! The lazy document accessor attached to eligible crawl results.
//!
//! ## Overview
//!
//! A [`DocumentHandle`] defers all body consumption until someone asks for
//! the parsed document. The first [`DocumentHandle::get`] call takes the body
//! out of the cell and spawns a single buffering task; every call made while
//! that task runs queues a waiter; once the body ends the text is parsed
//! exactly once and the outcome — success or failure — is memoized and
//! delivered to every queued waiter in the order they asked. Calls made after
//! that point get the memoized outcome immediately, without touching the
//! stream again.
//!
//! ## State machine
//!
//! ```text
//! Idle(body) --first get()--> Buffering(waiters) --stream end--> Resolved(outcome)
//! ```
//!
//! The transition into `Resolved` happens exactly once, whether the body
//! ended cleanly, errored mid-stream, or was not decodable text. A stream
//! error is deliberately normalized into the same resolved-failure shape as a
//! parse problem, so no waiter can be left hanging. The buffering task
//! carries a drop guard: if it vanishes without completing (runtime
//! shutdown, task abort), the cell resolves to
//! [`DocumentError::Aborted`] and waiters are answered rather than stranded.
//!
//! State transitions happen under a plain mutex held only for the swap,
//! never across body I/O; waiting is done on oneshot channels outside the
//! lock.
//!
//! ## Example
//!
//! ```rust,ignore
//! if let Some(handle) = result.document() {
//!     let doc = handle.get().await?;
//!     println!("{}", doc.text("title")?);
//! }
//! ```

use std::mem;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, trace};
use tokio::sync::oneshot;

use crate::body::Body;
use crate::document::Document;
use crate::error::DocumentError;

/// Outcome of the single parse, shared by every caller.
pub type DocumentResult = Result<Arc<Document>, DocumentError>;

/// Cheaply cloneable handle to one result's lazily parsed document.
#[derive(Clone)]
pub struct DocumentHandle {
    cell: Arc<DocumentCell>,
}

impl std::fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DocumentHandle")
    }
}

struct DocumentCell {
    state: Mutex<CellState>,
}

enum CellState {
    /// Nothing consumed yet; the body still sits here untouched.
    Idle(Body),
    /// The body is being drained; waiters queued in registration order.
    Buffering(Vec<oneshot::Sender<DocumentResult>>),
    /// Terminal. The memoized outcome, never rewritten.
    Resolved(DocumentResult),
}

impl DocumentHandle {
    /// Wraps a body for lazy, parse-once access. Nothing is read until the
    /// first [`get`](Self::get).
    pub fn new(body: Body) -> Self {
        DocumentHandle {
            cell: Arc::new(DocumentCell {
                state: Mutex::new(CellState::Idle(body)),
            }),
        }
    }

    /// Returns the parsed document, triggering buffering on first use.
    ///
    /// Every caller observes the same memoized outcome: the same
    /// `Arc<Document>` on success, an equivalent error on failure. Callers
    /// registered before resolution are answered in registration order;
    /// callers arriving after resolution return immediately.
    pub async fn get(&self) -> DocumentResult {
        let rx = {
            let mut state = self.cell.lock();
            match &mut *state {
                CellState::Resolved(outcome) => return outcome.clone(),
                CellState::Buffering(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    trace!("document pending, {} waiter(s) queued", waiters.len());
                    rx
                }
                CellState::Idle(_) => {
                    let (tx, rx) = oneshot::channel();
                    let previous = mem::replace(&mut *state, CellState::Buffering(vec![tx]));
                    if let CellState::Idle(body) = previous {
                        debug!("first document request, buffering body");
                        let guard = ResolveGuard {
                            cell: Some(Arc::clone(&self.cell)),
                        };
                        tokio::spawn(async move {
                            let outcome = buffer_and_parse(body).await;
                            guard.complete(outcome);
                        });
                    }
                    rx
                }
            }
        };

        // The guard resolves the cell before any sender can be dropped, so
        // this arm is a belt for the unexpected sender-vanished case.
        rx.await.unwrap_or(Err(DocumentError::Aborted))
    }

    /// Whether the outcome has been memoized yet.
    pub fn is_resolved(&self) -> bool {
        matches!(*self.cell.lock(), CellState::Resolved(_))
    }
}

impl DocumentCell {
    // The lock protects read-only or swap-only sections; a poisoned state is
    // still coherent, so recover rather than propagate.
    fn lock(&self) -> std::sync::MutexGuard<'_, CellState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Memoizes the outcome and drains waiters in registration order.
    /// Reached exactly once per cell, through [`ResolveGuard`].
    fn resolve(&self, outcome: DocumentResult) {
        let waiters = {
            let mut state = self.lock();
            match mem::replace(&mut *state, CellState::Resolved(outcome.clone())) {
                CellState::Buffering(waiters) => waiters,
                // The guard fires once, so nothing else is reachable here.
                _ => Vec::new(),
            }
        };
        debug!(
            "document resolved ({}), notifying {} waiter(s)",
            if outcome.is_ok() { "ok" } else { "error" },
            waiters.len()
        );
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Resolves the cell exactly once: with the buffering outcome on the normal
/// path, or with [`DocumentError::Aborted`] if the buffering task is dropped
/// before it completes.
struct ResolveGuard {
    cell: Option<Arc<DocumentCell>>,
}

impl ResolveGuard {
    fn complete(mut self, outcome: DocumentResult) {
        if let Some(cell) = self.cell.take() {
            cell.resolve(outcome);
        }
    }
}

impl Drop for ResolveGuard {
    fn drop(&mut self) {
        if let Some(cell) = self.cell.take() {
            debug!("buffering task dropped before completion, aborting waiters");
            cell.resolve(Err(DocumentError::Aborted));
        }
    }
}

/// Drains the body, decodes it as UTF-8, and parses it once.
async fn buffer_and_parse(mut body: Body) -> DocumentResult {
    let mut buffered = Vec::new();
    while let Some(chunk) = body.chunk().await {
        let chunk = chunk?;
        trace!("buffered {} byte chunk", chunk.len());
        buffered.extend_from_slice(&chunk);
    }
    let text =
        std::str::from_utf8(&buffered).map_err(|err| DocumentError::Decode(err.to_string()))?;
    Ok(Arc::new(Document::parse(text)))
}
