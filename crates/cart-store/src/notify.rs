//! # Notifications
//!
//! One-shot, user-facing notices emitted by cart operations.
//!
//! ```text
//! add_product (new item) ──► Notice::info("Product added to cart")
//! any rejection          ──► Notice::from_error(&err)
//! everything else        ──► (silent)
//! ```
//!
//! Notifiers are fire-and-forget: a notifier that cannot deliver must not
//! fail the operation that produced the notice.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{CartError, CartErrorKind};

/// Message shown when a new product lands in the cart.
pub const PRODUCT_ADDED_MESSAGE: &str = "Product added to cart";

// =============================================================================
// Notice
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,

    /// Set for error notices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<CartErrorKind>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
            kind: None,
        }
    }

    pub fn from_error(err: &CartError) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: err.user_message().to_string(),
            kind: Some(err.kind()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Trait for delivering notices to whatever surface shows them.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(text = %notice.message, "Cart notice"),
            NoticeLevel::Error => {
                warn!(text = %notice.message, kind = ?notice.kind, "Cart notice")
            }
        }
    }
}

/// Discards notices.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Forwards notices over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelNotifier { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            debug!("Notice receiver dropped, notice discarded");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
