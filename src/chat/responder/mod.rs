//! Reply composition and delay strategy.
//!
//! The [`Responder`] trait is the engine's only source of randomness, so
//! tests can substitute deterministic implementations (fixed phrase, zero
//! delay) without touching the store logic.

pub mod simulated;

use std::time::Duration;

pub use simulated::{ACKNOWLEDGEMENTS, SimulatedResponder};

/// Strategy for composing deferred bot replies.
pub trait Responder: Send + Sync {
    /// Build the reply text for the given user message.
    fn compose_reply(&self, user_text: &str) -> String;

    /// Delay to wait before the reply is appended.
    fn reply_delay(&self) -> Duration;
}
