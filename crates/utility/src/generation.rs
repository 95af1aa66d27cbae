use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Hands out tickets for outgoing requests. Only the most recently issued
/// ticket is current, so a response belonging to an older ticket can be
/// recognised as stale and dropped.
#[derive(Debug, Clone, Default)]
pub struct RequestGeneration {
    latest: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
