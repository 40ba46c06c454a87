//! Change-set flattening
//!
//! Converts the resolver's cleared list into a flat, externally applicable
//! list of discrete operations against the real (non-simulated) answer
//! tree. The host applies each operation as one named state transition, so
//! every change is individually observable for rendering, persistence and
//! audit.
//!
//! Only effective operations are emitted: a reset targets a populated
//! instance, a removal targets an existing instance at or above the floor.
//! That filtering is what makes re-running the engine on its own output
//! yield an empty change list.

use crate::dependents::DefinitionIndex;
use crate::navigator::find_all_instances;
use crate::path::InstancePath;
use crate::resolver::ClearedInstance;
use crate::trim::repeat_floor;
use octofhir_enablewhen_model::{
    AnswerValue, EmptyValueProvider, QuestionnaireItem, QuestionnaireResponse,
};
use std::collections::HashSet;

/// One externally applicable state transition.
#[derive(Debug, Clone)]
pub enum ChangeOp<'q> {
    /// Reset the answers of the instance at `path` to the canonical empty
    /// value of its definition.
    ResetAnswer {
        /// The instance whose answers are reset
        path: InstancePath,
        /// The definition item the instance answers
        item: &'q QuestionnaireItem,
        /// The canonical empty value for the item's type
        empty_value: Option<AnswerValue>,
    },
    /// Remove the repeat instance at `path`.
    RemoveRepeatInstance {
        /// The instance to remove
        path: InstancePath,
        /// Its repeating definition item
        item: &'q QuestionnaireItem,
    },
}

impl ChangeOp<'_> {
    /// The instance the operation targets.
    pub fn path(&self) -> &InstancePath {
        match self {
            Self::ResetAnswer { path, .. } | Self::RemoveRepeatInstance { path, .. } => path,
        }
    }

    /// linkId of the targeted definition item.
    pub fn link_id(&self) -> &str {
        match self {
            Self::ResetAnswer { item, .. } | Self::RemoveRepeatInstance { item, .. } => {
                &item.link_id
            }
        }
    }
}

/// Flatten the cleared list into ordered operations against `real`.
///
/// For each cleared instance: a reset for every populated real-tree
/// instance of the cleared definition and its descendants that correlates
/// with the cleared path; then, when the definition repeats, a removal for
/// every sibling instance at or above the floor, highest index first so the
/// surviving paths stay valid while the host applies them. Each target is
/// emitted at most once.
pub fn build_changes<'q>(
    index: &DefinitionIndex<'q>,
    real: &QuestionnaireResponse,
    cleared: &[ClearedInstance<'q>],
    empties: &dyn EmptyValueProvider,
) -> Vec<ChangeOp<'q>> {
    let mut ops = Vec::new();
    let mut reset_targets: HashSet<InstancePath> = HashSet::new();
    let mut removal_targets: HashSet<InstancePath> = HashSet::new();

    for event in cleared {
        for definition in index.subtree(event.item) {
            for (path, node) in find_all_instances(&definition.link_id, &real.item) {
                if !event.path.is_same_instance(&path) || !node.has_populated_answer() {
                    continue;
                }
                if reset_targets.insert(path.clone()) {
                    ops.push(ChangeOp::ResetAnswer {
                        path,
                        item: definition,
                        empty_value: empties.empty_value(definition),
                    });
                }
            }
        }

        if event.item.repeats {
            let floor = repeat_floor(event.item);
            let context = event.path.parent();
            let mut victims: Vec<InstancePath> = find_all_instances(&event.link_id, &real.item)
                .into_iter()
                .map(|(path, _)| path)
                .filter(|path| {
                    context.is_same_instance(path)
                        && path.last().and_then(|seg| seg.index).is_some_and(|idx| idx >= floor)
                })
                .collect();
            victims.sort_by_key(|path| std::cmp::Reverse(path.last().and_then(|seg| seg.index)));
            for path in victims {
                if removal_targets.insert(path.clone()) {
                    ops.push(ChangeOp::RemoveRepeatInstance { path, item: event.item });
                }
            }
        }
    }
    ops
}
