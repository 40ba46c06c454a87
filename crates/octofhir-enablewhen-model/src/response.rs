//! QuestionnaireResponse answer tree
//!
//! The mutable-by-rewrite side of the engine's two trees. Child item lists
//! are `Arc`-shared so a rewrite only reallocates the path from the root to
//! the changed node and reuses every untouched sibling subtree by reference.

use crate::error::{ModelError, ModelResult};
use crate::value::AnswerValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A FHIR R4 QuestionnaireResponse, reduced to the fields the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireResponse {
    /// Top-level items of the answer tree
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item: Vec<Arc<ResponseItem>>,
}

impl QuestionnaireResponse {
    /// Parse a response from FHIR JSON.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        serde_json::from_str(json).map_err(ModelError::from)
    }

    /// Whether any answer anywhere in the tree carries a value.
    pub fn has_populated_content(&self) -> bool {
        self.item.iter().any(|item| item.has_populated_content())
    }
}

/// One node of the answer tree. Sparse: a repeating definition item may have
/// zero or more ResponseItem occurrences as siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseItem {
    /// linkId of the definition item this node answers
    pub link_id: String,
    /// The answers given for this item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answer: Vec<Answer>,
    /// Child items hanging directly off this node (groups)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item: Vec<Arc<ResponseItem>>,
}

impl ResponseItem {
    /// Construct an empty node for the given linkId.
    pub fn new(link_id: impl Into<String>) -> Self {
        Self { link_id: link_id.into(), answer: Vec::new(), item: Vec::new() }
    }

    /// Construct a node carrying a single answer value.
    pub fn with_value(link_id: impl Into<String>, value: AnswerValue) -> Self {
        Self {
            link_id: link_id.into(),
            answer: vec![Answer::from_value(value)],
            item: Vec::new(),
        }
    }

    /// Whether this node or any descendant carries an answer value.
    pub fn has_populated_content(&self) -> bool {
        self.answer.iter().any(|a| a.has_populated_content())
            || self.item.iter().any(|item| item.has_populated_content())
    }

    /// Whether any answer on this node itself is populated.
    pub fn has_populated_answer(&self) -> bool {
        self.answer.iter().any(|a| a.value.is_some())
    }

    /// The populated values on this node, in answer order.
    pub fn answer_values(&self) -> impl Iterator<Item = &AnswerValue> {
        self.answer.iter().filter_map(|a| a.value.as_ref())
    }
}

/// One answer entry on a response item. Carries at most one typed value and,
/// in FHIR's response shape, may itself hold nested child items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// The typed value (`value[x]` choice), when populated
    #[serde(flatten)]
    pub value: Option<AnswerValue>,
    /// Child items nested under this answer value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item: Vec<Arc<ResponseItem>>,
}

impl Answer {
    /// Construct an answer carrying the given value.
    pub fn from_value(value: AnswerValue) -> Self {
        Self { value: Some(value), item: Vec::new() }
    }

    /// Whether this answer or anything nested under it carries a value.
    pub fn has_populated_content(&self) -> bool {
        self.value.is_some() || self.item.iter().any(|item| item.has_populated_content())
    }
}
