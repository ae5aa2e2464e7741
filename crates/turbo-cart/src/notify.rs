//! User-facing notifications (toasts).

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// A message shown to the shopper when a cart operation is rejected or fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Not enough stock for the requested amount.
    OutOfStock,
    /// Adding a product failed.
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a product amount failed.
    UpdateFailed,
}

impl Notice {
    /// The text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Notice::OutOfStock => "requested quantity out of stock",
            Notice::AddFailed => "error adding product",
            Notice::RemoveFailed => "error removing product",
            Notice::UpdateFailed => "error updating product quantity",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives notices from a [`CartStore`](crate::CartStore).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<F> NotificationSink for F
where
    F: Fn(Notice) + Send + Sync,
{
    fn notify(&self, notice: Notice) {
        self(notice)
    }
}

/// Sink that keeps every notice it receives, for callers that render them
/// after the operation returns.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain received notices.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}
