//! Request sequencing for callers that fire overlapping requests
//!
//! The engine never cancels a running request. A caller that issues a new
//! request while an older one is still in flight takes a ticket for each
//! and drops any result whose ticket is no longer current.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one request in issue order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Hands out increasing tickets and remembers the newest
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket
    pub fn next_ticket(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer request has been started since `ticket`
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
