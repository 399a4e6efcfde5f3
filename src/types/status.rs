//! Definition for the [`SessionStatus`] type, implemented by an enum.

use serde::{Deserialize, Serialize};

/// Represents the lifecycle of a [`crate::session::NavigationSession`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No trip has been started, or the last one was stopped by the caller.
    Idle,
    /// Observing the position source and forwarding fixes.
    Navigating,
    /// The destination was reached; observation has ended.
    Arrived,
    /// The position source was lost; observation has ended.
    Stopped,
}

impl SessionStatus {
    /// True while fixes should still be fed to the tracker.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Navigating)
    }
}
