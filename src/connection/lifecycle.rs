//! Connection lifecycle state machine.
//!
//! ```text
//! Negotiating ──ChannelReady──▶ Open
//!      │                         │
//!      └────────Close──▶ Closed ◀┘
//! ```
//!
//! `Closed` is terminal. Every phase change goes through
//! [`Lifecycle::apply`], so invalid transitions are rejected instead of
//! being inferred from side effects.

use thiserror::Error;

use crate::core::MIN_SAFE_MESSAGE_SIZE;

/// Connection lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionPhase {
    /// Waiting for the underlying channel.
    Negotiating,
    /// Channel ready, data transfer allowed.
    Open,
    /// Torn down; never reopens.
    Closed,
}

/// Inputs of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The channel signalled ready.
    ChannelReady,
    /// Explicit close or channel closure.
    Close,
}

/// Result of a successful transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Negotiating → Open.
    Opened,
    /// Negotiating/Open → Closed; teardown must run.
    Closed {
        /// Whether the connection was open, i.e. whether `close` is emitted.
        was_open: bool,
    },
    /// Already closed; nothing to do.
    AlreadyClosed,
}

/// Lifecycle errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// Transition not allowed from the current phase.
    #[error("invalid transition {via:?} from {from:?}")]
    InvalidTransition {
        /// Phase the transition was attempted from.
        from: ConnectionPhase,
        /// Attempted transition.
        via: Transition,
    },

    /// Message size negotiated outside the open phase.
    #[error("max message size can only be recorded while open, phase is {0:?}")]
    NotOpen(ConnectionPhase),
}

/// Phase plus the values tied to it.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: ConnectionPhase,
    max_message_size: usize,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Start negotiating, with the safe minimum message size.
    pub fn new() -> Self {
        Self {
            phase: ConnectionPhase::Negotiating,
            max_message_size: MIN_SAFE_MESSAGE_SIZE,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Check if the connection is open.
    pub fn is_open(&self) -> bool {
        self.phase == ConnectionPhase::Open
    }

    /// Check if the connection is closed.
    pub fn is_closed(&self) -> bool {
        self.phase == ConnectionPhase::Closed
    }

    /// Negotiated maximum message size.
    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Apply a transition.
    pub fn apply(&mut self, via: Transition) -> Result<TransitionOutcome, LifecycleError> {
        let from = self.phase;
        match (from, via) {
            (ConnectionPhase::Negotiating, Transition::ChannelReady) => {
                self.phase = ConnectionPhase::Open;
                Ok(TransitionOutcome::Opened)
            }
            (ConnectionPhase::Closed, Transition::Close) => Ok(TransitionOutcome::AlreadyClosed),
            (_, Transition::Close) => {
                self.phase = ConnectionPhase::Closed;
                Ok(TransitionOutcome::Closed {
                    was_open: from == ConnectionPhase::Open,
                })
            }
            (_, Transition::ChannelReady) => Err(LifecycleError::InvalidTransition { from, via }),
        }
    }

    /// Record the negotiated size, floored at the safe minimum.
    pub fn record_max_message_size(&mut self, size: usize) -> Result<usize, LifecycleError> {
        if !self.is_open() {
            return Err(LifecycleError::NotOpen(self.phase));
        }
        self.max_message_size = size.max(MIN_SAFE_MESSAGE_SIZE);
        Ok(self.max_message_size)
    }
}
