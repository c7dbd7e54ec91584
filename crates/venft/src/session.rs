use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::lookup::{LookupResult, LookupService};
use crate::query::LookupQuery;

/// Presentation state of an interactive lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LookupState {
    /// Nothing submitted yet, or the last query named no position.
    Empty,
    /// A query is in flight; the last shown result stays visible meanwhile.
    Loading {
        query: LookupQuery,
        previous: Option<LookupResult>,
    },
    Ready {
        query: LookupQuery,
        result: LookupResult,
    },
    Failed {
        query: LookupQuery,
        message: String,
    },
}

impl LookupState {
    /// The result currently on display, if any.
    pub fn result(&self) -> Option<&LookupResult> {
        match self {
            LookupState::Ready { result, .. } => Some(result),
            LookupState::Loading { previous, .. } => previous.as_ref(),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading { .. })
    }
}

/// Runs lookups for a changing query, applying only the newest response.
///
/// Every submission takes a sequence number. A response whose number is no
/// longer the latest is dropped, so a slow earlier query can never overwrite
/// the outcome of a later one.
pub struct LookupSession {
    service: Arc<LookupService>,
    latest: AtomicU64,
    state: RwLock<LookupState>,
}

impl LookupSession {
    pub fn new(service: Arc<LookupService>) -> Self {
        Self {
            service,
            latest: AtomicU64::new(0),
            state: RwLock::new(LookupState::Empty),
        }
    }

    pub async fn state(&self) -> LookupState {
        self.state.read().await.clone()
    }

    /// Run a lookup and apply its outcome.
    ///
    /// Returns the applied state, or `None` when a newer submission
    /// superseded this one before it completed.
    pub async fn submit(&self, query: LookupQuery) -> Option<LookupState> {
        // Numbering and the Loading write share one critical section, so the
        // newest number always belongs to the newest Loading state.
        let seq = {
            let mut state = self.state.write().await;
            let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            let previous = state.result().cloned();
            *state = LookupState::Loading {
                query: query.clone(),
                previous,
            };
            seq
        };

        let next = match self.service.resolve_query(&query).await {
            Ok(Some(result)) => LookupState::Ready { query, result },
            Ok(None) => LookupState::Empty,
            Err(e) => LookupState::Failed {
                query,
                message: e.to_string(),
            },
        };

        let mut state = self.state.write().await;
        if self.latest.load(Ordering::SeqCst) != seq {
            debug!(seq, "discarding superseded lookup response");
            return None;
        }
        *state = next.clone();
        Some(next)
    }
}
