//! enableWhen condition evaluation
//!
//! One condition against one set of answers, and the combination of an
//! item's conditions at a concrete instance. Every "cannot evaluate" case
//! (unknown question, no correlated instance, operand/answer type mismatch)
//! is a boolean non-match, never an error.

use crate::navigator::find_all_instances;
use crate::path::InstancePath;
use octofhir_enablewhen_model::{
    AnswerValue, EnableBehavior, EnableWhen, EnableWhenOperator, QuestionnaireItem, ResponseItem,
};
use std::cmp::Ordering;
use std::sync::Arc;

/// Evaluate one condition against the populated answers of its referenced
/// question.
///
/// `exists` tests whether any answer is populated (a zero or false value is
/// populated). The comparison operators are disjunctive across multi-valued
/// answers: the condition matches if any answer satisfies it. An empty
/// answer list fails every operator except `exists` with a false operand.
pub fn clause_matches(clause: &EnableWhen, answers: &[&AnswerValue]) -> bool {
    let operand = clause.answer.to_value();
    match clause.operator {
        EnableWhenOperator::Exists => match operand.as_boolean() {
            Some(true) => !answers.is_empty(),
            Some(false) => answers.is_empty(),
            // A non-boolean exists operand is an authoring error.
            None => false,
        },
        EnableWhenOperator::Equal => {
            answers.iter().any(|answer| answer.equals(&operand) == Some(true))
        }
        EnableWhenOperator::NotEqual => {
            answers.iter().any(|answer| answer.equals(&operand) == Some(false))
        }
        EnableWhenOperator::Greater => ordered(answers, &operand, &[Ordering::Greater]),
        EnableWhenOperator::GreaterOrEqual => {
            ordered(answers, &operand, &[Ordering::Greater, Ordering::Equal])
        }
        EnableWhenOperator::Less => ordered(answers, &operand, &[Ordering::Less]),
        EnableWhenOperator::LessOrEqual => {
            ordered(answers, &operand, &[Ordering::Less, Ordering::Equal])
        }
    }
}

fn ordered(answers: &[&AnswerValue], operand: &AnswerValue, accept: &[Ordering]) -> bool {
    answers
        .iter()
        .any(|answer| answer.compare(operand).is_some_and(|ord| accept.contains(&ord)))
}

/// Whether `item`'s own enableWhen conditions hold at the instance addressed
/// by `context`. An item without conditions is always satisfied.
///
/// Each condition is evaluated against the same-instance occurrence of its
/// referenced question; a question with no correlated occurrence fails the
/// condition, even for `exists=false` (the structure the condition asks
/// about does not exist yet). Results combine per the item's enableBehavior,
/// defaulting to ALL.
pub fn condition_satisfied(
    item: &QuestionnaireItem,
    context: &InstancePath,
    roots: &[Arc<ResponseItem>],
) -> bool {
    if item.enable_when.is_empty() {
        return true;
    }

    let mut results = item.enable_when.iter().map(|clause| {
        let source = find_all_instances(&clause.question, roots)
            .into_iter()
            .find(|(path, _)| context.is_same_instance(path));
        match source {
            Some((_, node)) => {
                let answers: Vec<&AnswerValue> = node.answer_values().collect();
                clause_matches(clause, &answers)
            }
            None => false,
        }
    });

    match item.enable_behavior() {
        EnableBehavior::All => results.all(|matched| matched),
        EnableBehavior::Any => results.any(|matched| matched),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_enablewhen_model::{Coding, EnableWhenAnswer};
    use rust_decimal::Decimal;

    fn clause(operator: EnableWhenOperator, answer: EnableWhenAnswer) -> EnableWhen {
        EnableWhen { question: "q".into(), operator, answer }
    }

    #[test]
    fn exists_true_requires_a_populated_answer() {
        let c = clause(EnableWhenOperator::Exists, EnableWhenAnswer::Boolean(true));
        assert!(!clause_matches(&c, &[]));
        // A false value still counts as populated.
        assert!(clause_matches(&c, &[&AnswerValue::Boolean(false)]));
    }

    #[test]
    fn exists_false_requires_no_answer() {
        let c = clause(EnableWhenOperator::Exists, EnableWhenAnswer::Boolean(false));
        assert!(clause_matches(&c, &[]));
        assert!(!clause_matches(&c, &[&AnswerValue::Integer(0)]));
    }

    #[test]
    fn comparison_is_disjunctive_across_answers() {
        let c = clause(EnableWhenOperator::Equal, EnableWhenAnswer::Integer(7));
        let values = [AnswerValue::Integer(3), AnswerValue::Integer(7)];
        let refs: Vec<&AnswerValue> = values.iter().collect();
        assert!(clause_matches(&c, &refs));
    }

    #[test]
    fn not_equal_fails_on_type_mismatch() {
        let c = clause(EnableWhenOperator::NotEqual, EnableWhenAnswer::Integer(7));
        assert!(!clause_matches(&c, &[&AnswerValue::String("7".into())]));
    }

    #[test]
    fn ordering_against_decimal_operand() {
        let c = clause(
            EnableWhenOperator::GreaterOrEqual,
            EnableWhenAnswer::Decimal(Decimal::new(25, 1)),
        );
        assert!(clause_matches(&c, &[&AnswerValue::Integer(3)]));
        assert!(clause_matches(&c, &[&AnswerValue::Decimal(Decimal::new(25, 1))]));
        assert!(!clause_matches(&c, &[&AnswerValue::Integer(2)]));
    }

    #[test]
    fn ordering_against_datetime_operand() {
        let c = clause(
            EnableWhenOperator::Less,
            EnableWhenAnswer::DateTime("2024-06-01T12:00:00+00:00".parse().unwrap()),
        );
        let before = AnswerValue::DateTime("2024-06-01T11:59:59+00:00".parse().unwrap());
        let at = AnswerValue::DateTime("2024-06-01T12:00:00+00:00".parse().unwrap());
        assert!(clause_matches(&c, &[&before]));
        assert!(!clause_matches(&c, &[&at]));
    }

    #[test]
    fn ordering_against_time_operand() {
        let c = clause(
            EnableWhenOperator::GreaterOrEqual,
            EnableWhenAnswer::Time(chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
        );
        let cutoff = AnswerValue::Time(chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let before = AnswerValue::Time(chrono::NaiveTime::from_hms_opt(8, 59, 0).unwrap());
        assert!(clause_matches(&c, &[&cutoff]));
        assert!(!clause_matches(&c, &[&before]));
    }

    #[test]
    fn coding_ordering_never_matches() {
        let c = clause(
            EnableWhenOperator::Greater,
            EnableWhenAnswer::Coding(Coding::from_code("a")),
        );
        assert!(!clause_matches(&c, &[&AnswerValue::Coding(Coding::from_code("b"))]));
    }

    #[test]
    fn empty_answers_fail_every_comparison() {
        for operator in [
            EnableWhenOperator::Equal,
            EnableWhenOperator::NotEqual,
            EnableWhenOperator::Greater,
            EnableWhenOperator::Less,
        ] {
            let c = clause(operator, EnableWhenAnswer::Integer(1));
            assert!(!clause_matches(&c, &[]), "operator {operator:?}");
        }
    }
}
