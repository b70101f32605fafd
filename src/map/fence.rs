//! Sequence fencing for asynchronous vehicle fetches
//!
//! A ticket is issued when a fetch is started. When the response comes back it
//! is only displayed if no newer ticket has been applied in the meantime, so a
//! slow response can't overwrite a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic request sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Shared ticket counter, cloned into every producer
#[derive(Debug, Clone, Default)]
pub struct TicketIssuer {
    next: Arc<AtomicU64>,
}

impl TicketIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Consumer side: remembers the newest ticket applied so far
#[derive(Debug, Default)]
pub struct RequestFence {
    newest_applied: Option<Ticket>,
}

impl RequestFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for a ticket older than one already applied
    pub fn admit(&mut self, ticket: Ticket) -> bool {
        match self.newest_applied {
            Some(newest) if ticket < newest => false,
            _ => {
                self.newest_applied = Some(ticket);
                true
            }
        }
    }

    pub fn newest_applied(&self) -> Option<Ticket> {
        self.newest_applied
    }
}
