//! Ordering guard for overlapping asynchronous lookups
//!
//! Each field group hands out monotonically increasing tickets. A response is
//! only applied when it carries the newest ticket issued for its group, so a
//! slow answer to an old question can never overwrite a newer one.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestGroup {
    Geocoding,
    ExchangeRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub group: RequestGroup,
    pub seq: u64,
}

#[derive(Debug, Default, Clone)]
pub struct RequestSequencer {
    latest: HashMap<RequestGroup, u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding every earlier ticket of the same group
    pub fn issue(&mut self, group: RequestGroup) -> Ticket {
        let seq = self.latest.entry(group).or_insert(0);
        *seq += 1;
        Ticket { group, seq: *seq }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.get(&ticket.group) == Some(&ticket.seq)
    }

    /// Invalidate any in-flight ticket of the group without issuing a new one
    pub fn invalidate(&mut self, group: RequestGroup) {
        *self.latest.entry(group).or_insert(0) += 1;
    }
}
