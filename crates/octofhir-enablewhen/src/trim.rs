//! Repeat-instance trimming
//!
//! When a repeating item is disabled its sibling instances are trimmed back
//! to the floor, removing the highest-indexed occurrences first so
//! earlier-entered instances are preserved preferentially. Instances below
//! the floor are never removed; they are wiped instead.

use crate::navigator::{Edit, rewrite};
use crate::path::InstancePath;
use octofhir_enablewhen_model::{QuestionnaireItem, ResponseItem};
use std::sync::Arc;

/// The instance count a disabled repeating item is trimmed down to:
/// `max(minOccurs, 1)` with minOccurs defaulting to 1.
pub fn repeat_floor(item: &QuestionnaireItem) -> u32 {
    item.min_occurs().max(1)
}

/// Trim sibling occurrences of the disabled instance at `instance_path`
/// back to the floor, within the same parent container. Returns a new root
/// list sharing every untouched subtree.
pub fn trim_instances(
    roots: &[Arc<ResponseItem>],
    instance_path: &InstancePath,
    item: &QuestionnaireItem,
) -> Vec<Arc<ResponseItem>> {
    rewrite(
        roots,
        &instance_path.parent(),
        &Edit::TrimSiblings { link_id: &item.link_id, keep: repeat_floor(item) },
    )
}
