//! Events and the inbox seam used by transition evaluation.

use fa_core::LinkId;

/// A named signal on a link.  No payload beyond identity.
///
/// Events are ephemeral: one lives in exactly one step's inbox and is
/// discarded when the step ends, whether or not a transition read it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub name: String,
    pub link: LinkId,
}

impl Event {
    pub fn new(name: impl Into<String>, link: LinkId) -> Self {
        Self { name: name.into(), link }
    }
}

/// Read-only view of the events pending for the current step.
///
/// [`Behavior::evaluate`](crate::Behavior::evaluate) only ever sees an
/// `Inbox`, never the outbox being filled during the same step, which is
/// what makes a step free of intra-step causal chains.
pub trait Inbox {
    /// `true` if at least one event with this name is pending on this link.
    fn contains(&self, event: &Event) -> bool;

    /// `true` if no event is pending on any link.
    fn is_empty(&self) -> bool;
}

impl Inbox for [Event] {
    fn contains(&self, event: &Event) -> bool {
        self.iter().any(|e| e == event)
    }

    fn is_empty(&self) -> bool {
        <[Event]>::is_empty(self)
    }
}

impl Inbox for Vec<Event> {
    fn contains(&self, event: &Event) -> bool {
        self.as_slice().contains(event)
    }

    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}
