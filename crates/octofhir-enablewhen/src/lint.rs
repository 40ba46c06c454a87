//! Authoring lint
//!
//! Conditions the engine tolerates at runtime (by evaluating them to
//! non-matching) but that indicate questionnaire authoring mistakes. The
//! lint surfaces them ahead of time; it never fails.

use octofhir_enablewhen_model::{Questionnaire, QuestionnaireItem};
use std::collections::HashSet;
use thiserror::Error;

/// A questionnaire authoring problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthoringWarning {
    /// An enableWhen condition references a linkId that does not exist
    #[error("item '{item}' enableWhen references unknown question '{question}'")]
    UnknownTarget {
        /// linkId of the item carrying the condition
        item: String,
        /// the unresolvable question reference
        question: String,
    },
    /// An enableWhen condition references its own item
    #[error("item '{item}' enableWhen references itself")]
    SelfReference {
        /// linkId of the self-referencing item
        item: String,
    },
    /// Two items share a linkId, which must be unique within the tree
    #[error("duplicate linkId '{link_id}'")]
    DuplicateLinkId {
        /// the duplicated linkId
        link_id: String,
    },
}

/// Check a questionnaire for authoring problems the engine would otherwise
/// paper over at runtime.
pub fn lint_questionnaire(questionnaire: &Questionnaire) -> Vec<AuthoringWarning> {
    let mut known: HashSet<&str> = HashSet::new();
    let mut warnings = Vec::new();

    for item in &questionnaire.item {
        collect_link_ids(item, &mut known, &mut warnings);
    }
    for item in &questionnaire.item {
        check_references(item, &known, &mut warnings);
    }
    warnings
}

fn collect_link_ids<'q>(
    item: &'q QuestionnaireItem,
    known: &mut HashSet<&'q str>,
    warnings: &mut Vec<AuthoringWarning>,
) {
    if !known.insert(&item.link_id) {
        warnings.push(AuthoringWarning::DuplicateLinkId { link_id: item.link_id.clone() });
    }
    for child in &item.item {
        collect_link_ids(child, known, warnings);
    }
}

fn check_references(
    item: &QuestionnaireItem,
    known: &HashSet<&str>,
    warnings: &mut Vec<AuthoringWarning>,
) {
    for clause in &item.enable_when {
        if clause.question == item.link_id {
            warnings.push(AuthoringWarning::SelfReference { item: item.link_id.clone() });
        } else if !known.contains(clause.question.as_str()) {
            warnings.push(AuthoringWarning::UnknownTarget {
                item: item.link_id.clone(),
                question: clause.question.clone(),
            });
        }
    }
    for child in &item.item {
        check_references(child, known, warnings);
    }
}
