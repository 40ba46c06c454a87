//! Canonical empty values
//!
//! The engine resets answers under disabled items to the "canonical empty"
//! value of the item's type. FHIR has no populated empty literal for most
//! types, so the default provider clears the value outright; hosts that keep
//! placeholder values (an empty string field bound to a text input, say) can
//! supply their own provider.

use crate::item::{ItemType, QuestionnaireItem};
use crate::value::AnswerValue;

/// Supplies the canonical empty value per answer type.
///
/// `None` means "no value at all": the answer entry is dropped once its
/// nested content is empty too.
pub trait EmptyValueProvider {
    /// The value a reset answer of this item should carry.
    fn empty_value(&self, item: &QuestionnaireItem) -> Option<AnswerValue>;
}

/// Default provider: every type's canonical empty is the absence of a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEmptyValues;

impl EmptyValueProvider for DefaultEmptyValues {
    fn empty_value(&self, item: &QuestionnaireItem) -> Option<AnswerValue> {
        // Exhaustive so a new item type forces a decision here.
        match item.item_type {
            ItemType::Group
            | ItemType::Display
            | ItemType::Boolean
            | ItemType::Decimal
            | ItemType::Integer
            | ItemType::Date
            | ItemType::DateTime
            | ItemType::Time
            | ItemType::String
            | ItemType::Text
            | ItemType::Url
            | ItemType::Choice
            | ItemType::OpenChoice
            | ItemType::Quantity
            | ItemType::Attachment => None,
        }
    }
}
