//! Link registry: declared channels and their two endpoint behaviors.
//!
//! Event delivery is addressed by link alone.  The endpoints are recorded to
//! document (and lint) the intended topology; nothing stops a behavior from
//! listening on a link it is not an endpoint of.

use std::collections::HashMap;

use fa_core::{BehaviorId, LinkId};

/// A named channel between two behaviors (`comp0`, `comp1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id:        LinkId,
    pub name:      String,
    pub endpoints: [BehaviorId; 2],
}

impl Link {
    /// `true` if `behavior` is one of the two declared endpoints.
    #[inline]
    pub fn is_endpoint(&self, behavior: BehaviorId) -> bool {
        self.endpoints.contains(&behavior)
    }
}

/// Dense, declaration-ordered storage of every link, with name lookup.
#[derive(Debug, Clone, Default)]
pub struct LinkRegistry {
    links:   Vec<Link>,
    by_name: HashMap<String, LinkId>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a link.  Returns `None` (and registers nothing) if the name
    /// is already taken.
    pub fn insert(&mut self, name: &str, endpoints: [BehaviorId; 2]) -> Option<LinkId> {
        if self.by_name.contains_key(name) {
            return None;
        }
        let id = LinkId(self.links.len() as u32);
        self.links.push(Link { id, name: name.to_owned(), endpoints });
        self.by_name.insert(name.to_owned(), id);
        Some(id)
    }

    /// Resolve a link name.
    #[inline]
    pub fn resolve(&self, name: &str) -> Option<LinkId> {
        self.by_name.get(name).copied()
    }

    /// # Panics
    /// Panics if `id` did not come from this registry.
    #[inline]
    pub fn get(&self, id: LinkId) -> &Link {
        &self.links[id.index()]
    }

    /// The link's name, or `"?"` for an id outside the registry.
    pub fn name(&self, id: LinkId) -> &str {
        self.links.get(id.index()).map_or("?", |l| l.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
