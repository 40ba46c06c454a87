//! Answer value types - runtime representation of questionnaire answers
//!
//! This module defines the AnswerValue enum and all supporting types for
//! representing FHIR R4 answer values (the `value[x]` choice on
//! QuestionnaireResponse.item.answer and the `answer[x]` choice on
//! Questionnaire.item.enableWhen).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The primary value type for questionnaire answers.
///
/// Models FHIR's `value[x]` choice as a single tagged union: exactly one
/// typed value per answer. Serde variant names follow the FHIR JSON choice
/// field names so the enum can be flattened into its carrier struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnswerValue {
    /// Boolean answer
    #[serde(rename = "valueBoolean")]
    Boolean(bool),
    /// Arbitrary precision decimal answer
    #[serde(rename = "valueDecimal")]
    Decimal(Decimal),
    /// 32-bit signed integer answer
    #[serde(rename = "valueInteger")]
    Integer(i32),
    /// Date answer (full precision)
    #[serde(rename = "valueDate")]
    Date(NaiveDate),
    /// DateTime answer with timezone offset
    #[serde(rename = "valueDateTime")]
    DateTime(DateTime<FixedOffset>),
    /// Time-of-day answer
    #[serde(rename = "valueTime")]
    Time(NaiveTime),
    /// String answer
    #[serde(rename = "valueString")]
    String(String),
    /// Coded answer from a code system
    #[serde(rename = "valueCoding")]
    Coding(Coding),
    /// Quantity answer with value and unit
    #[serde(rename = "valueQuantity")]
    Quantity(Quantity),
    /// Attachment answer
    #[serde(rename = "valueAttachment")]
    Attachment(Attachment),
}

/// A coded value from a code system (FHIR Coding).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    /// Identity of the terminology system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Symbol in syntax defined by the system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Representation defined by the system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    /// Construct a coding from a bare code.
    pub fn from_code(code: impl Into<String>) -> Self {
        Self { system: None, code: Some(code.into()), display: None }
    }
}

/// A measured amount (FHIR Quantity).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    /// Numerical magnitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    /// Unit representation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// System that defines the coded unit form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Coded form of the unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Quantity {
    /// Construct a quantity from a magnitude and unit.
    pub fn new(value: Decimal, unit: impl Into<String>) -> Self {
        Self { value: Some(value), unit: Some(unit.into()), system: None, code: None }
    }
}

/// Content referenced or embedded in an answer (FHIR Attachment, trimmed to
/// the fields the engine compares on).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Mime type of the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Uri where the data can be found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Label to display in place of the data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl AnswerValue {
    /// Try to get as Boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a numeric magnitude (integer, decimal or quantity value)
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(i) => Some(Decimal::from(*i)),
            Self::Decimal(d) => Some(*d),
            Self::Quantity(q) => q.value,
            _ => None,
        }
    }

    /// Check if this value belongs to the numeric family
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Decimal(_) | Self::Quantity(_))
    }

    /// Equality between an operand and an answer value.
    ///
    /// Returns `None` when the two values are of incomparable kinds; the
    /// caller treats that as non-matching rather than raising an error.
    /// Codings compare by code, attachments by url, quantities by magnitude.
    pub fn equals(&self, other: &Self) -> Option<bool> {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => Some(a == b),
            (Self::String(a), Self::String(b)) => Some(a == b),
            (Self::Date(a), Self::Date(b)) => Some(a == b),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a == b),
            (Self::Time(a), Self::Time(b)) => Some(a == b),
            (Self::Coding(a), Self::Coding(b)) => {
                Some(a.code.is_some() && a.code == b.code)
            }
            (Self::Attachment(a), Self::Attachment(b)) => {
                Some(a.url.is_some() && a.url == b.url)
            }
            _ if self.is_numeric() && other.is_numeric() => {
                match (self.as_decimal(), other.as_decimal()) {
                    (Some(a), Some(b)) => Some(a == b),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Ordering between an operand and an answer value.
    ///
    /// Defined for the numeric family (integers widened to decimal,
    /// quantities by magnitude) and for same-kind temporal values.
    /// Returns `None` for unordered kinds (boolean, string, coding,
    /// attachment) and for kind mismatches.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Some(a.cmp(b)),
            _ if self.is_numeric() && other.is_numeric() => {
                match (self.as_decimal(), other.as_decimal()) {
                    (Some(a), Some(b)) => Some(a.cmp(&b)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
