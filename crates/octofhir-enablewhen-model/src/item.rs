//! Questionnaire definition tree
//!
//! The read-only side of the engine's two trees: Questionnaire items with
//! their enableWhen conditions, repeat flags and minOccurs extension.

use crate::error::{ModelError, ModelResult};
use crate::value::{AnswerValue, Coding, Quantity};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Url of the FHIR minOccurs extension on Questionnaire.item.
pub const MIN_OCCURS_EXTENSION: &str =
    "http://hl7.org/fhir/StructureDefinition/questionnaire-minOccurs";

/// A FHIR R4 Questionnaire, reduced to the fields the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    /// Top-level items of the definition tree
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item: Vec<QuestionnaireItem>,
}

impl Questionnaire {
    /// Parse a questionnaire from FHIR JSON.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        serde_json::from_str(json).map_err(ModelError::from)
    }
}

/// One node of the questionnaire definition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireItem {
    /// Unique id for the item within the questionnaire
    pub link_id: String,
    /// Kind of item (group, question type, display)
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Whether the item may repeat
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub repeats: bool,
    /// Conditions controlling whether the item is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enable_when: Vec<EnableWhen>,
    /// How multiple enableWhen conditions combine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_behavior: Option<EnableBehavior>,
    /// Extensions carried on the item (minOccurs lives here)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    /// Nested items
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item: Vec<QuestionnaireItem>,
}

impl QuestionnaireItem {
    /// Construct a bare item of the given type.
    pub fn new(link_id: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            link_id: link_id.into(),
            item_type,
            repeats: false,
            enable_when: Vec::new(),
            enable_behavior: None,
            extension: Vec::new(),
            item: Vec::new(),
        }
    }

    /// Effective enableBehavior; FHIR R4 defaults to ALL when unspecified.
    pub fn enable_behavior(&self) -> EnableBehavior {
        self.enable_behavior.unwrap_or(EnableBehavior::All)
    }

    /// Minimum number of instances a repeating item must retain, read from
    /// the questionnaire-minOccurs extension. Defaults to 1.
    pub fn min_occurs(&self) -> u32 {
        self.extension
            .iter()
            .find(|ext| ext.url == MIN_OCCURS_EXTENSION)
            .and_then(|ext| ext.value_integer)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(1)
    }
}

/// Kind of questionnaire item (FHIR `item.type` codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Grouping item with no answer of its own
    #[serde(rename = "group")]
    Group,
    /// Display-only text
    #[serde(rename = "display")]
    Display,
    /// Boolean question
    #[serde(rename = "boolean")]
    Boolean,
    /// Decimal question
    #[serde(rename = "decimal")]
    Decimal,
    /// Integer question
    #[serde(rename = "integer")]
    Integer,
    /// Date question
    #[serde(rename = "date")]
    Date,
    /// DateTime question
    #[serde(rename = "dateTime")]
    DateTime,
    /// Time question
    #[serde(rename = "time")]
    Time,
    /// Short string question
    #[serde(rename = "string")]
    String,
    /// Long text question
    #[serde(rename = "text")]
    Text,
    /// Url question
    #[serde(rename = "url")]
    Url,
    /// Coded choice question
    #[serde(rename = "choice")]
    Choice,
    /// Coded choice allowing free text
    #[serde(rename = "open-choice")]
    OpenChoice,
    /// Quantity question
    #[serde(rename = "quantity")]
    Quantity,
    /// Attachment question
    #[serde(rename = "attachment")]
    Attachment,
}

/// How multiple enableWhen conditions on one item combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnableBehavior {
    /// All conditions must be satisfied (conjunction)
    #[serde(rename = "all")]
    All,
    /// Any condition may be satisfied (disjunction)
    #[serde(rename = "any")]
    Any,
}

/// One enableWhen condition: question reference, operator and operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableWhen {
    /// linkId of the question this condition depends on
    pub question: String,
    /// Comparison operator
    pub operator: EnableWhenOperator,
    /// The operand to compare against (FHIR `answer[x]` choice)
    #[serde(flatten)]
    pub answer: EnableWhenAnswer,
}

impl EnableWhen {
    /// Condition requiring `question` to carry the given answer value.
    pub fn equals(question: impl Into<String>, answer: EnableWhenAnswer) -> Self {
        Self { question: question.into(), operator: EnableWhenOperator::Equal, answer }
    }

    /// Condition on whether `question` has any answer at all.
    pub fn exists(question: impl Into<String>, populated: bool) -> Self {
        Self {
            question: question.into(),
            operator: EnableWhenOperator::Exists,
            answer: EnableWhenAnswer::Boolean(populated),
        }
    }
}

/// enableWhen comparison operators (FHIR `questionnaire-enable-operator`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnableWhenOperator {
    /// The question has (or has not) any answer
    #[serde(rename = "exists")]
    Exists,
    /// Answer equals the operand
    #[serde(rename = "=")]
    Equal,
    /// Answer differs from the operand
    #[serde(rename = "!=")]
    NotEqual,
    /// Answer is greater than the operand
    #[serde(rename = ">")]
    Greater,
    /// Answer is greater than or equal to the operand
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// Answer is less than the operand
    #[serde(rename = "<")]
    Less,
    /// Answer is less than or equal to the operand
    #[serde(rename = "<=")]
    LessOrEqual,
}

/// The typed operand of an enableWhen condition (FHIR `answer[x]` choice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnableWhenAnswer {
    /// Boolean operand
    #[serde(rename = "answerBoolean")]
    Boolean(bool),
    /// Decimal operand
    #[serde(rename = "answerDecimal")]
    Decimal(Decimal),
    /// Integer operand
    #[serde(rename = "answerInteger")]
    Integer(i32),
    /// Date operand
    #[serde(rename = "answerDate")]
    Date(NaiveDate),
    /// DateTime operand
    #[serde(rename = "answerDateTime")]
    DateTime(DateTime<FixedOffset>),
    /// Time operand
    #[serde(rename = "answerTime")]
    Time(NaiveTime),
    /// String operand
    #[serde(rename = "answerString")]
    String(String),
    /// Coding operand
    #[serde(rename = "answerCoding")]
    Coding(Coding),
    /// Quantity operand
    #[serde(rename = "answerQuantity")]
    Quantity(Quantity),
}

impl EnableWhenAnswer {
    /// View the operand as a runtime answer value for comparison.
    pub fn to_value(&self) -> AnswerValue {
        match self {
            Self::Boolean(b) => AnswerValue::Boolean(*b),
            Self::Decimal(d) => AnswerValue::Decimal(*d),
            Self::Integer(i) => AnswerValue::Integer(*i),
            Self::Date(d) => AnswerValue::Date(*d),
            Self::DateTime(dt) => AnswerValue::DateTime(*dt),
            Self::Time(t) => AnswerValue::Time(*t),
            Self::String(s) => AnswerValue::String(s.clone()),
            Self::Coding(c) => AnswerValue::Coding(c.clone()),
            Self::Quantity(q) => AnswerValue::Quantity(q.clone()),
        }
    }
}

/// A single extension on a questionnaire item, reduced to the integer value
/// form the minOccurs extension uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    /// Identifies the meaning of the extension
    pub url: String,
    /// Integer payload, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_integer: Option<i32>,
}

impl Extension {
    /// Build a minOccurs extension.
    pub fn min_occurs(value: i32) -> Self {
        Self { url: MIN_OCCURS_EXTENSION.to_string(), value_integer: Some(value) }
    }
}
