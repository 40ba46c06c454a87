//! FHIR JSON serialization tests for the questionnaire model
//!
//! Covers:
//! - Questionnaire items with enableWhen choice operands
//! - enableBehavior default (ALL when unspecified, per FHIR R4)
//! - minOccurs extension reading
//! - QuestionnaireResponse answers, including items nested under answers

use octofhir_enablewhen_model::{
    Answer, AnswerValue, EnableBehavior, EnableWhenAnswer, EnableWhenOperator, ItemType,
    Questionnaire, QuestionnaireResponse,
};
use pretty_assertions::assert_eq;

// === Questionnaire ===

#[test]
fn parses_enable_when_with_boolean_operand() {
    let q = Questionnaire::from_json(
        r#"{
            "item": [
                {"linkId": "smoker", "type": "boolean"},
                {
                    "linkId": "packs-per-day",
                    "type": "decimal",
                    "enableWhen": [
                        {"question": "smoker", "operator": "=", "answerBoolean": true}
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    let dependent = &q.item[1];
    assert_eq!(dependent.item_type, ItemType::Decimal);
    let clause = &dependent.enable_when[0];
    assert_eq!(clause.question, "smoker");
    assert_eq!(clause.operator, EnableWhenOperator::Equal);
    assert_eq!(clause.answer, EnableWhenAnswer::Boolean(true));
}

#[test]
fn parses_coding_operand_and_behavior() {
    let q = Questionnaire::from_json(
        r#"{
            "item": [{
                "linkId": "followup",
                "type": "group",
                "enableBehavior": "any",
                "enableWhen": [
                    {"question": "status", "operator": "=", "answerCoding": {"code": "active"}},
                    {"question": "status", "operator": "exists", "answerBoolean": false}
                ]
            }]
        }"#,
    )
    .unwrap();

    let item = &q.item[0];
    assert_eq!(item.enable_behavior(), EnableBehavior::Any);
    assert_eq!(item.enable_when.len(), 2);
    assert_eq!(item.enable_when[1].operator, EnableWhenOperator::Exists);
}

#[test]
fn enable_behavior_defaults_to_all() {
    let q = Questionnaire::from_json(
        r#"{"item": [{"linkId": "g", "type": "group"}]}"#,
    )
    .unwrap();
    assert_eq!(q.item[0].enable_behavior, None);
    assert_eq!(q.item[0].enable_behavior(), EnableBehavior::All);
}

#[test]
fn reads_min_occurs_extension() {
    let q = Questionnaire::from_json(
        r#"{
            "item": [{
                "linkId": "medication",
                "type": "group",
                "repeats": true,
                "extension": [{
                    "url": "http://hl7.org/fhir/StructureDefinition/questionnaire-minOccurs",
                    "valueInteger": 2
                }]
            }]
        }"#,
    )
    .unwrap();
    assert_eq!(q.item[0].min_occurs(), 2);
}

#[test]
fn min_occurs_defaults_to_one() {
    let q = Questionnaire::from_json(
        r#"{"item": [{"linkId": "r", "type": "group", "repeats": true}]}"#,
    )
    .unwrap();
    assert_eq!(q.item[0].min_occurs(), 1);
}

// === QuestionnaireResponse ===

#[test]
fn parses_typed_answer_values() {
    let r = QuestionnaireResponse::from_json(
        r#"{
            "item": [
                {"linkId": "smoker", "answer": [{"valueBoolean": true}]},
                {"linkId": "packs-per-day", "answer": [{"valueDecimal": 2.5}]},
                {"linkId": "years", "answer": [{"valueInteger": 4}]}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(r.item[0].answer[0].value, Some(AnswerValue::Boolean(true)));
    assert_eq!(
        r.item[1].answer[0].value,
        Some(AnswerValue::Decimal("2.5".parse().unwrap()))
    );
    assert_eq!(r.item[2].answer[0].value, Some(AnswerValue::Integer(4)));
}

#[test]
fn parses_items_nested_under_answer_values() {
    let r = QuestionnaireResponse::from_json(
        r#"{
            "item": [{
                "linkId": "smoker",
                "answer": [{
                    "valueBoolean": true,
                    "item": [
                        {"linkId": "packs-per-day", "answer": [{"valueDecimal": 1.0}]}
                    ]
                }]
            }]
        }"#,
    )
    .unwrap();

    let nested = &r.item[0].answer[0].item;
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].link_id, "packs-per-day");
    assert!(r.item[0].has_populated_content());
}

#[test]
fn answer_without_value_round_trips() {
    let answer = Answer { value: None, item: Vec::new() };
    let json = serde_json::to_string(&answer).unwrap();
    assert_eq!(json, "{}");
    let back: Answer = serde_json::from_str(&json).unwrap();
    assert_eq!(back, answer);
}

#[test]
fn serializes_choice_field_names() {
    let r = QuestionnaireResponse::from_json(
        r#"{"item": [{"linkId": "b", "answer": [{"valueBoolean": false}]}]}"#,
    )
    .unwrap();
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["item"][0]["answer"][0]["valueBoolean"], false);
}
