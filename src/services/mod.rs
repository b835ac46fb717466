//! # External Service Boundary
//!
//! The two collaborators the core depends on, behind traits: a generation
//! service ("send text, get text") and a delivery service ("send message to
//! recipient or channel"). Failures stop here. Generation gets a single
//! attempt and a fixed fallback reply; delivery is fire-and-forget, logged
//! and swallowed. Neither failure rolls back state the core already
//! committed.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Trait seam extracted from the dispatch layer

pub mod discord;
pub mod openai;

use anyhow::Result;
use async_trait::async_trait;
use log::{error, warn};
use uuid::Uuid;

/// Reply substituted when the generation service fails or returns nothing.
pub const FALLBACK_REPLY: &str =
    "I seem to be at a loss for words right now. Ask me again in a moment.";

/// Where a notification goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTarget {
    Channel(u64),
    User(u64),
}

/// The remote generative-language backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// The message-delivery backend.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, target: DeliveryTarget, text: &str) -> Result<()>;
}

/// One generation attempt, no retry. Any failure (or blank completion)
/// becomes [`FALLBACK_REPLY`]; the caller never sees the error.
pub async fn generate_or_fallback(
    generator: &dyn TextGenerator,
    prompt: &str,
    request_id: Uuid,
) -> String {
    match generator.generate(prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("[{request_id}] generation returned an empty completion");
            FALLBACK_REPLY.to_string()
        }
        Err(e) => {
            error!("[{request_id}] generation failed: {e:#}");
            FALLBACK_REPLY.to_string()
        }
    }
}

/// Fire-and-forget delivery. A failed send is logged and swallowed.
pub async fn notify_best_effort(
    notifier: &dyn Notifier,
    target: DeliveryTarget,
    text: &str,
    request_id: Uuid,
) {
    if let Err(e) = notifier.send(target, text).await {
        warn!("[{request_id}] delivery to {target:?} failed: {e:#}");
    }
}
