//! Read-only enablement query
//!
//! The rendering layer's view of the same logic the resolver applies:
//! whether one concrete instance of an item is currently enabled. Built on
//! instance-path correlation and condition evaluation; never mutates
//! anything.

use crate::clause::condition_satisfied;
use crate::dependents::DefinitionIndex;
use crate::path::InstancePath;
use octofhir_enablewhen_model::{Questionnaire, QuestionnaireResponse};

/// Read-only "is this item enabled" queries over one questionnaire.
pub struct EnablementQuery<'q> {
    index: DefinitionIndex<'q>,
}

impl<'q> EnablementQuery<'q> {
    /// Build the query for a questionnaire.
    pub fn new(questionnaire: &'q Questionnaire) -> Self {
        Self { index: DefinitionIndex::new(questionnaire) }
    }

    /// Whether the instance of `link_id` addressed by `path` is enabled.
    ///
    /// An item is enabled when its own conditions hold at that instance and
    /// every ancestor group's conditions hold at the corresponding ancestor
    /// context (an item inside a disabled group is disabled with it). An
    /// unknown linkId is enabled: hiding data incorrectly is worse than
    /// failing to hide it.
    pub fn is_enabled(
        &self,
        link_id: &str,
        path: &InstancePath,
        response: &QuestionnaireResponse,
    ) -> bool {
        self.index
            .ancestor_chain(link_id)
            .iter()
            .all(|definition| {
                let context = truncate_at(path, &definition.link_id);
                condition_satisfied(definition, &context, &response.item)
            })
    }
}

/// The prefix of `path` ending at `link_id`, or the whole path when the
/// linkId does not appear in it (conservative: keep all known structure).
fn truncate_at(path: &InstancePath, link_id: &str) -> InstancePath {
    match path.segments().iter().position(|seg| seg.link_id == link_id) {
        Some(pos) => path.segments()[..=pos].iter().cloned().collect(),
        None => path.clone(),
    }
}
