//! Guards against consuming one inbound message twice.

use quotebook_core::ids::MessageId;
use std::collections::{HashSet, VecDeque};

/// Remembers recently consumed message ids so a message delivered to
/// overlapping listeners is processed once.
///
/// Bounded: the oldest id is forgotten once `capacity` is exceeded.
pub struct MessageDeduplicator {
    seen: HashSet<MessageId>,
    order: VecDeque<MessageId>,
    capacity: usize,
}

impl MessageDeduplicator {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            seen: HashSet::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns `true` the first time `id` is offered, `false` afterwards.
    pub fn first_sighting(&mut self, id: &MessageId) -> bool {
        if !self.seen.insert(id.clone()) {
            return false;
        }
        self.order.push_back(id.clone());
        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        true
    }
}
