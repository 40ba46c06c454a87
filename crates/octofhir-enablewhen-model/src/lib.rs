//! FHIR questionnaire data model for the enableWhen engine
//!
//! This crate provides:
//! - The Questionnaire definition tree (items, enableWhen conditions,
//!   repeat flags, minOccurs extension)
//! - The QuestionnaireResponse answer tree with `Arc`-shared subtrees
//! - The AnswerValue tagged union covering all FHIR answer value types
//! - The canonical-empty-value provider seam

pub mod empty;
pub mod error;
pub mod item;
pub mod response;
pub mod value;

pub use empty::{DefaultEmptyValues, EmptyValueProvider};
pub use error::{ModelError, ModelResult};
pub use item::{
    EnableBehavior, EnableWhen, EnableWhenAnswer, EnableWhenOperator, Extension, ItemType,
    MIN_OCCURS_EXTENSION, Questionnaire, QuestionnaireItem,
};
pub use response::{Answer, QuestionnaireResponse, ResponseItem};
pub use value::{AnswerValue, Attachment, Coding, Quantity};
