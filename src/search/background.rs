//! Running a strategy on a worker thread.
//!
//! The caller keeps control: it can poll with `try_result`, wait with a
//! bound, or cancel. A cancelled search still reports the best decision it
//! had reached. The strategy and its context travel back with the result so
//! their state carries over to the next turn.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use super::context::{CancelToken, SearchContext};
use super::{Decision, Strategy};
use crate::core::GameState;
use crate::rules::GameEngine;

/// Finished search.
pub struct SearchOutcome {
    pub decision: Decision,
    pub strategy: Box<dyn Strategy>,
    pub context: SearchContext,
}

/// Handle to one in-flight search.
pub struct BackgroundSearch {
    cancel: CancelToken,
    receiver: Receiver<SearchOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundSearch {
    /// Start `strategy` on a snapshot of `state`.
    pub fn spawn(
        mut strategy: Box<dyn Strategy>,
        engine: Arc<GameEngine>,
        state: GameState,
        context: SearchContext,
    ) -> Self {
        let cancel = context.cancel_token().clone();
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || {
            let mut context = context;
            context.begin();
            let decision = strategy.choose(&engine, &state, &mut context);
            context.finish();
            debug!(
                strategy = strategy.name(),
                nodes = context.stats().nodes,
                simulations = context.stats().simulations,
                cancelled = context.stats().cancelled,
                "background search finished"
            );
            // The receiver may already be gone if the caller gave up.
            let _ = sender.send(SearchOutcome {
                decision,
                strategy,
                context,
            });
        });
        Self {
            cancel,
            receiver,
            handle: Some(handle),
        }
    }

    /// Ask the worker to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Result if the worker is done. `None` while it is still running or if
    /// it died without reporting.
    pub fn try_result(&mut self) -> Option<SearchOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => {
                self.join();
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                None
            }
        }
    }

    /// Wait up to `bound`. On timeout the search is cancelled and its best
    /// decision so far is collected.
    pub fn wait_timeout(mut self, bound: Duration) -> Option<SearchOutcome> {
        match self.receiver.recv_timeout(bound) {
            Ok(outcome) => {
                self.join();
                Some(outcome)
            }
            Err(RecvTimeoutError::Timeout) => {
                debug!(?bound, "search over time, cancelling");
                self.cancel();
                self.wait()
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.join();
                None
            }
        }
    }

    /// Block until the worker reports.
    pub fn wait(mut self) -> Option<SearchOutcome> {
        let outcome = self.receiver.recv().ok();
        self.join();
        outcome
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("background search worker panicked");
            }
        }
    }
}

impl Drop for BackgroundSearch {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel.cancel();
        }
    }
}
