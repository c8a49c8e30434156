//! Load generations
//!
//! Every model request takes a ticket. Only the completion holding the most
//! recently issued ticket may be applied; anything older was superseded by a
//! later selection and is dropped.

/// Ticket identifying one load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Monotonic counter of issued load requests
#[derive(Debug, Clone, Default)]
pub struct LoadGeneration {
    latest: u64,
}

impl LoadGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding all earlier ones
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Most recently issued ticket, if any
    pub fn latest(&self) -> Option<LoadTicket> {
        (self.latest > 0).then_some(LoadTicket(self.latest))
    }
}
