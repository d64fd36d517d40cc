//! Which entities are audited.

use std::collections::BTreeSet;

use crate::entity::EntityName;

/// Fixed set of audited entity classes.
///
/// Built once from configuration and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditRegistry {
    audited: BTreeSet<EntityName>,
}

impl AuditRegistry {
    /// Create a registry for `entities`. Duplicates collapse.
    pub fn new<I>(entities: I) -> Self
    where
        I: IntoIterator<Item = EntityName>,
    {
        Self {
            audited: entities.into_iter().collect(),
        }
    }

    /// Returns `true` if `entity` is audited.
    pub fn is_audited(&self, entity: &EntityName) -> bool {
        self.audited.contains(entity)
    }

    /// Returns `true` if any of `entities` is audited.
    pub fn any_audited<'a, I>(&self, entities: I) -> bool
    where
        I: IntoIterator<Item = &'a EntityName>,
    {
        entities.into_iter().any(|e| self.is_audited(e))
    }

    /// Audited entities in name order.
    pub fn audited_entities(&self) -> impl Iterator<Item = &EntityName> {
        self.audited.iter()
    }

    /// Number of audited entities.
    pub fn len(&self) -> usize {
        self.audited.len()
    }

    /// Returns `true` if nothing is audited.
    pub fn is_empty(&self) -> bool {
        self.audited.is_empty()
    }
}
