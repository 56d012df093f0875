//! Full-replacement reconciliation of child line items.
//!
//! Callers submit the complete desired list of line items for one
//! container (a bid version or a production plan); the planner computes
//! which persisted rows to delete, which to update, and which to insert
//! so the container converges to the submitted list. The planner is pure
//! and operates on identity sets only; the repository layer executes it.
//!
//! Execution order matters: deletes must run before updates/inserts so a
//! removed row is actually gone even when externally generated identities
//! could collide across the delete/insert boundary.

use std::collections::HashSet;

use crate::types::DbId;

/// An incoming line item that may reference an already-persisted row.
pub trait Identified {
    /// The persisted identity carried by this entry, if any. Identities
    /// not found among the container's persisted rows are treated as
    /// client-generated placeholders and discarded.
    fn id(&self) -> Option<DbId>;
}

/// The computed three-phase reconciliation.
#[derive(Debug)]
pub struct ReconcilePlan<T> {
    /// Persisted identities with no counterpart in the incoming list.
    /// Executed first.
    pub delete: Vec<DbId>,
    /// Incoming entries matched to a persisted row, paired with that
    /// row's identity.
    pub update: Vec<(DbId, T)>,
    /// Incoming entries to be inserted as new rows bound to the
    /// container. Any identity they carried has been discarded.
    pub insert: Vec<T>,
}

impl<T> ReconcilePlan<T> {
    /// True when the plan performs no writes at all (only possible for
    /// an empty incoming list against an empty container).
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.update.is_empty() && self.insert.is_empty()
    }
}

/// Partition `incoming` against the container's persisted identities.
///
/// - entries whose id is present in `existing` become updates
/// - all other entries become inserts (provisional ids dropped)
/// - persisted ids not kept by any incoming entry become deletes
///
/// An empty `incoming` list deletes everything: full-replacement
/// semantics are intentional. Unchanged entries still become updates;
/// the planner does not skip byte-identical items.
pub fn plan<T: Identified>(existing: &[DbId], incoming: Vec<T>) -> ReconcilePlan<T> {
    let existing_set: HashSet<DbId> = existing.iter().copied().collect();

    let mut kept: HashSet<DbId> = HashSet::new();
    let mut update = Vec::new();
    let mut insert = Vec::new();

    for item in incoming {
        match item.id() {
            Some(id) if existing_set.contains(&id) => {
                kept.insert(id);
                update.push((id, item));
            }
            _ => insert.push(item),
        }
    }

    // Preserve the container's persisted ordering for deletes so the
    // executed statements are deterministic.
    let delete = existing
        .iter()
        .copied()
        .filter(|id| !kept.contains(id))
        .collect();

    ReconcilePlan {
        delete,
        update,
        insert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: Option<DbId>,
        label: &'static str,
    }

    impl Identified for Item {
        fn id(&self) -> Option<DbId> {
            self.id
        }
    }

    fn item(id: Option<DbId>, label: &'static str) -> Item {
        Item { id, label }
    }

    #[test]
    fn mixed_keep_modify_add_remove() {
        // Persisted {1, 2, 3}; incoming keeps 1, modifies 2, adds one new.
        let plan = plan(
            &[1, 2, 3],
            vec![
                item(Some(1), "unchanged"),
                item(Some(2), "modified"),
                item(None, "new"),
            ],
        );

        assert_eq!(plan.delete, vec![3]);
        assert_eq!(plan.update.len(), 2);
        assert_eq!(plan.update[0].0, 1);
        assert_eq!(plan.update[1].0, 2);
        assert_eq!(plan.update[1].1.label, "modified");
        assert_eq!(plan.insert.len(), 1);
        assert_eq!(plan.insert[0].label, "new");
    }

    #[test]
    fn empty_input_deletes_everything() {
        let plan: ReconcilePlan<Item> = plan(&[10, 11, 12], vec![]);
        assert_eq!(plan.delete, vec![10, 11, 12]);
        assert!(plan.update.is_empty());
        assert!(plan.insert.is_empty());
    }

    #[test]
    fn unknown_client_id_becomes_insert() {
        // id 99 was generated client-side and never persisted.
        let plan = plan(&[1], vec![item(Some(1), "kept"), item(Some(99), "provisional")]);
        assert!(plan.delete.is_empty());
        assert_eq!(plan.update.len(), 1);
        assert_eq!(plan.insert.len(), 1);
        assert_eq!(plan.insert[0].label, "provisional");
    }

    #[test]
    fn unchanged_input_still_updates_every_item() {
        let plan = plan(&[1, 2], vec![item(Some(1), "a"), item(Some(2), "b")]);
        assert!(plan.delete.is_empty());
        assert_eq!(plan.update.len(), 2);
        assert!(plan.insert.is_empty());
    }

    #[test]
    fn empty_on_empty_is_a_no_op() {
        let plan: ReconcilePlan<Item> = plan(&[], vec![]);
        assert!(plan.is_empty());
    }
}
