//! `EventBus`: double-buffered, per-link event mailboxes.
//!
//! # Layout
//!
//! Both buffers are arenas of queues indexed by `LinkId`: `inbox[l]` holds
//! the names of events pending on link `l` for the step being evaluated,
//! `outbox[l]` collects what that step emits.  Behaviors never hold a
//! reference to one another, only link ids, and never see the outbox.
//!
//! A queue is a multiset in arrival order.  Presence is all evaluation asks
//! about, but duplicates are kept so traces show every emission.

use fa_core::LinkId;
use fa_model::{Event, Inbox};

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inbox:  Vec<Vec<String>>,
    outbox: Vec<Vec<String>>,
}

impl EventBus {
    /// An empty bus for a network with `link_count` links.
    pub fn new(link_count: usize) -> Self {
        Self {
            inbox:  vec![Vec::new(); link_count],
            outbox: vec![Vec::new(); link_count],
        }
    }

    /// Number of links the bus was sized for.
    pub fn link_count(&self) -> usize {
        self.inbox.len()
    }

    /// `true` if `link` addresses a queue on this bus.
    #[inline]
    pub fn has_link(&self, link: LinkId) -> bool {
        link.index() < self.inbox.len()
    }

    /// Place `event` directly into the current inbox (exogenous stimulus).
    ///
    /// # Panics
    /// Panics if the event's link is not on this bus.
    pub fn inject(&mut self, event: Event) {
        self.inbox[event.link.index()].push(event.name);
    }

    /// Queue `event` for the next step.
    ///
    /// # Panics
    /// Panics if the event's link is not on this bus.
    pub fn post(&mut self, event: Event) {
        self.outbox[event.link.index()].push(event.name);
    }

    /// End of step: the outbox becomes the inbox, the old inbox is dropped.
    ///
    /// Queue allocations are recycled.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.inbox, &mut self.outbox);
        for queue in &mut self.outbox {
            queue.clear();
        }
    }

    /// Drop every pending and queued event.
    pub fn clear(&mut self) {
        for queue in self.inbox.iter_mut().chain(self.outbox.iter_mut()) {
            queue.clear();
        }
    }

    /// Events in the current inbox, by link id then arrival order.
    pub fn pending(&self) -> Vec<Event> {
        collect(&self.inbox)
    }

    /// Events queued for the next step, by link id then arrival order.
    pub fn queued(&self) -> Vec<Event> {
        collect(&self.outbox)
    }

    /// Total number of events in the current inbox.
    pub fn pending_len(&self) -> usize {
        self.inbox.iter().map(Vec::len).sum()
    }

    /// Pending event names on one link.
    pub fn pending_on(&self, link: LinkId) -> &[String] {
        self.inbox.get(link.index()).map_or(&[], Vec::as_slice)
    }
}

impl Inbox for EventBus {
    fn contains(&self, event: &Event) -> bool {
        self.pending_on(event.link).iter().any(|name| *name == event.name)
    }

    fn is_empty(&self) -> bool {
        self.inbox.iter().all(Vec::is_empty)
    }
}

fn collect(queues: &[Vec<String>]) -> Vec<Event> {
    queues
        .iter()
        .enumerate()
        .flat_map(|(l, queue)| {
            queue.iter().map(move |name| Event::new(name.clone(), LinkId(l as u32)))
        })
        .collect()
}
