//! Cascade resolution
//!
//! The central recursive algorithm. Given the definition item(s) whose
//! answer was just committed, it propagates disabling to a fixpoint over a
//! simulated copy of the answer tree: dependents of the changed items are
//! re-evaluated per concrete instance, disabled instances are trimmed and
//! wiped, and the cascade recurses both on the dependents themselves and on
//! their children, threading the simulation sequentially through every step.
//!
//! The engine is pure: inputs are never mutated, every output tree is
//! freshly constructed with unchanged subtrees shared by reference, and
//! re-running it on its own output produces an empty change list.

use crate::changeset::{ChangeOp, build_changes};
use crate::clause::condition_satisfied;
use crate::dependents::DefinitionIndex;
use crate::navigator::{Edit, find_all_instances, node_at, rewrite};
use crate::path::InstancePath;
use crate::trim::trim_instances;
use log::{debug, trace};
use octofhir_enablewhen_model::{
    DefaultEmptyValues, EmptyValueProvider, Questionnaire, QuestionnaireItem,
    QuestionnaireResponse, ResponseItem,
};
use std::collections::HashSet;
use std::sync::Arc;

static DEFAULT_EMPTIES: DefaultEmptyValues = DefaultEmptyValues;

/// One disabling event recorded during resolution.
#[derive(Debug, Clone)]
pub struct ClearedInstance<'q> {
    /// The definition item that became disabled
    pub item: &'q QuestionnaireItem,
    /// Its linkId
    pub link_id: String,
    /// The concrete instance the disabling applies to
    pub path: InstancePath,
}

/// The outcome of one resolution call.
#[derive(Debug)]
pub struct Resolution<'q> {
    /// The new, independently owned answer tree
    pub response: QuestionnaireResponse,
    /// Every disabling event, in the order the cascade found them
    pub cleared: Vec<ClearedInstance<'q>>,
    /// The externally applicable operations, addressed against the input tree
    pub changes: Vec<ChangeOp<'q>>,
}

impl Resolution<'_> {
    /// Whether the resolution changed anything externally visible.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// The conditional-visibility recalculation engine for one questionnaire.
///
/// Stateless between invocations: each [`resolve`](Self::resolve) call
/// consumes a snapshot of the answer tree and returns a new tree plus the
/// change list; nothing outlives the call.
pub struct EnableWhenEngine<'q> {
    questionnaire: &'q Questionnaire,
    index: DefinitionIndex<'q>,
    empties: &'q dyn EmptyValueProvider,
}

impl<'q> EnableWhenEngine<'q> {
    /// Engine with the default canonical-empty-value provider.
    pub fn new(questionnaire: &'q Questionnaire) -> Self {
        Self::with_empty_values(questionnaire, &DEFAULT_EMPTIES)
    }

    /// Engine with a host-supplied canonical-empty-value provider.
    pub fn with_empty_values(
        questionnaire: &'q Questionnaire,
        empties: &'q dyn EmptyValueProvider,
    ) -> Self {
        Self { questionnaire, index: DefinitionIndex::new(questionnaire), empties }
    }

    /// The questionnaire this engine resolves against.
    pub fn questionnaire(&self) -> &'q Questionnaire {
        self.questionnaire
    }

    /// The definition index built for this questionnaire.
    pub fn index(&self) -> &DefinitionIndex<'q> {
        &self.index
    }

    /// Resolve one committed answer change.
    ///
    /// `changed` is the definition item(s) whose answer was committed;
    /// `response` is the current answer-tree snapshot. Neither is mutated.
    pub fn resolve(
        &self,
        changed: &[&'q QuestionnaireItem],
        response: &QuestionnaireResponse,
    ) -> Resolution<'q> {
        let mut cleared = Vec::new();
        let mut visited = HashSet::new();
        let sim = self.propagate(changed, response.item.clone(), &mut cleared, &mut visited);
        let changes = build_changes(&self.index, response, &cleared, self.empties);
        debug!(
            "resolved {} changed item(s): {} cleared instance(s), {} change op(s)",
            changed.len(),
            cleared.len(),
            changes.len()
        );
        Resolution { response: QuestionnaireResponse { item: sim }, cleared, changes }
    }

    /// [`resolve`](Self::resolve) by linkId; unknown linkIds are ignored.
    pub fn resolve_link_ids(
        &self,
        link_ids: &[&str],
        response: &QuestionnaireResponse,
    ) -> Resolution<'q> {
        let changed: Vec<&'q QuestionnaireItem> =
            link_ids.iter().filter_map(|id| self.index.get(id)).collect();
        self.resolve(&changed, response)
    }

    /// One recursion level of the cascade.
    ///
    /// Evaluates every concrete instance of every dependent of `changed`
    /// against the current simulation, trims and wipes the disabled ones,
    /// then recurses with the dependents as the new changed-set and with
    /// each dependent's children as changed-set roots (a disabled child can
    /// itself gate items referencing it).
    ///
    /// The `visited` set records disabled-processed (definition, path)
    /// pairs, and a level that disables nothing new returns without
    /// descending; together these bound recursion even if the authored
    /// enableWhen references form a cycle.
    fn propagate(
        &self,
        changed: &[&'q QuestionnaireItem],
        mut sim: Vec<Arc<ResponseItem>>,
        cleared: &mut Vec<ClearedInstance<'q>>,
        visited: &mut HashSet<(usize, InstancePath)>,
    ) -> Vec<Arc<ResponseItem>> {
        let mut dependents: Vec<&'q QuestionnaireItem> = Vec::new();
        for item in changed {
            dependents.extend(self.index.find_dependents(&item.link_id));
        }
        if dependents.is_empty() {
            return sim;
        }

        let before = cleared.len();
        for &dependent in &dependents {
            for (path, _) in find_all_instances(&dependent.link_id, &sim) {
                let key = (std::ptr::from_ref::<QuestionnaireItem>(dependent) as usize, path.clone());
                if visited.contains(&key) {
                    continue;
                }
                // This instance may already have been trimmed away while
                // processing a sibling; a removed instance needs no wipe of
                // its own, the first trim's clearing event covers it.
                if node_at(&sim, &path).is_none() {
                    trace!("{}[{path}] no longer present, skipping", dependent.link_id);
                    continue;
                }
                if condition_satisfied(dependent, &path, &sim) {
                    continue;
                }

                debug!("disabling {path}");
                visited.insert(key);
                if dependent.repeats {
                    sim = trim_instances(&sim, &path, dependent);
                }
                sim = rewrite(
                    &sim,
                    &path,
                    &Edit::Wipe { index: &self.index, empties: self.empties },
                );
                cleared.push(ClearedInstance {
                    item: dependent,
                    link_id: dependent.link_id.clone(),
                    path,
                });
            }
        }
        if cleared.len() == before {
            // Nothing newly disabled: disabling is the only effect this
            // engine propagates, so deeper levels cannot change either.
            return sim;
        }

        let unique = dedup_by_identity(&dependents);
        sim = self.propagate(&unique, sim, cleared, visited);
        for &dependent in &unique {
            if dependent.item.is_empty() {
                continue;
            }
            // A wiped descendant can itself gate items referencing it, at
            // any depth below the disabled item.
            let descendants: Vec<&'q QuestionnaireItem> =
                self.index.subtree(dependent).into_iter().skip(1).collect();
            sim = self.propagate(&descendants, sim, cleared, visited);
        }
        sim
    }
}

fn dedup_by_identity<'q>(items: &[&'q QuestionnaireItem]) -> Vec<&'q QuestionnaireItem> {
    let mut seen = HashSet::new();
    items
        .iter()
        .copied()
        .filter(|&item| seen.insert(std::ptr::from_ref::<QuestionnaireItem>(item) as usize))
        .collect()
}
