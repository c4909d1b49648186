//! Conversation store: the ordered log of exchanges.
//!
//! An exchange is appended as `Pending` before its search is dispatched, so the
//! user's input is visible immediately. It then transitions exactly once, to
//! `Resolved` or `Failed`, looked up by id. Nothing is ever removed.

use std::fmt;

use chrono::{DateTime, Local};

use crate::search::BookResult;

/// Identifier of an exchange, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(u64);

impl ExchangeId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the user submitted, as recorded in the log.
///
/// Images keep only their display details; the bytes go to the search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Text(String),
    Image { file_name: String, byte_len: usize },
}

impl UserInput {
    /// One-line summary for display.
    pub fn summary(&self) -> String {
        match self {
            UserInput::Text(text) => text.clone(),
            UserInput::Image { file_name, .. } => format!("[image] {}", file_name),
        }
    }
}

/// Status of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStatus {
    Pending,
    Resolved,
    Failed,
}

/// Status together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeState {
    Pending,
    Resolved(BookResult),
    Failed { reason: String },
}

/// One request/response pair in the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub id: ExchangeId,
    pub input: UserInput,
    pub submitted_at: DateTime<Local>,
    state: ExchangeState,
}

impl Exchange {
    pub fn state(&self) -> &ExchangeState {
        &self.state
    }

    pub fn status(&self) -> ExchangeStatus {
        match self.state {
            ExchangeState::Pending => ExchangeStatus::Pending,
            ExchangeState::Resolved(_) => ExchangeStatus::Resolved,
            ExchangeState::Failed { .. } => ExchangeStatus::Failed,
        }
    }

    /// The identification, present only once resolved.
    pub fn result(&self) -> Option<&BookResult> {
        match &self.state {
            ExchangeState::Resolved(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status() == ExchangeStatus::Pending
    }
}

/// Append-only log of exchanges in insertion order.
#[derive(Debug, Default)]
pub struct ConversationLog {
    exchanges: Vec<Exchange>,
    next_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new pending exchange and return its id.
    pub fn append(&mut self, input: UserInput) -> ExchangeId {
        let id = ExchangeId(self.next_id);
        self.next_id += 1;

        tracing::info!(exchange = %id, input = %input.summary(), "Exchange appended");
        self.exchanges.push(Exchange {
            id,
            input,
            submitted_at: Local::now(),
            state: ExchangeState::Pending,
        });
        id
    }

    /// Mark an exchange as resolved.
    ///
    /// Returns false, logging a warning, if the id is unknown or the exchange
    /// has already settled.
    pub fn resolve(&mut self, id: ExchangeId, result: BookResult) -> bool {
        let title = result.title.clone();
        let settled = self.settle(id, ExchangeState::Resolved(result));
        if settled {
            tracing::info!(exchange = %id, %title, "Exchange resolved");
        }
        settled
    }

    /// Mark an exchange as failed.
    ///
    /// The reason is kept for display. Same return contract as `resolve`.
    pub fn fail(&mut self, id: ExchangeId, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        let settled = self.settle(id, ExchangeState::Failed { reason: reason.clone() });
        if settled {
            tracing::warn!(exchange = %id, %reason, "Exchange failed");
        }
        settled
    }

    fn settle(&mut self, id: ExchangeId, state: ExchangeState) -> bool {
        let Some(exchange) = self.exchanges.iter_mut().find(|e| e.id == id) else {
            tracing::warn!(exchange = %id, "No exchange with this id");
            return false;
        };

        if !exchange.is_pending() {
            tracing::warn!(exchange = %id, status = ?exchange.status(), "Exchange already settled");
            return false;
        }

        exchange.state = state;
        true
    }

    pub fn get(&self, id: ExchangeId) -> Option<&Exchange> {
        self.exchanges.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    pub fn as_slice(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Number of exchanges still waiting for the service.
    pub fn pending_count(&self) -> usize {
        self.exchanges.iter().filter(|e| e.is_pending()).count()
    }
}
