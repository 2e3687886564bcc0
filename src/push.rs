//! # Remote Push Compatibility
//!
//! Types the core shares with the remote reminder path: a registry of opaque
//! device tokens and the classification of delivery-error codes the batch
//! sender prunes on. The sender itself runs server-side and is not part of
//! this crate; the local scheduler and the remote path may both fire on the
//! same day, and that overlap is deliberately uncoordinated.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The remote sender multicasts to at most this many tokens per request.
pub const MAX_MULTICAST_BATCH: usize = 500;

/// One registered device, keyed by its opaque token string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceToken {
    pub token: String,
}

/// Registry of device tokens consumed by the remote batch sender.
pub trait TokenRegistry: Send + Sync {
    fn list_tokens(&self) -> Result<Vec<DeviceToken>>;

    /// Remove the given tokens, returning how many were actually removed.
    fn remove_tokens(&self, tokens: &[String]) -> Result<u32>;
}

/// How the sender should react to a per-token delivery error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorClass {
    /// The token is dead or malformed; prune it from the registry.
    InvalidToken,
    /// Anything else; keep the token and retry another day.
    Transient,
}

/// Classify a delivery-error code string as reported by the push service.
pub fn classify_delivery_error(code: &str) -> DeliveryErrorClass {
    match code {
        "invalid-registration-token"
        | "registration-token-not-registered"
        | "invalid-argument" => DeliveryErrorClass::InvalidToken,
        _ => DeliveryErrorClass::Transient,
    }
}

/// Split tokens into multicast-sized batches, preserving order.
pub fn batch_tokens(tokens: &[DeviceToken]) -> Vec<&[DeviceToken]> {
    tokens.chunks(MAX_MULTICAST_BATCH).collect()
}
