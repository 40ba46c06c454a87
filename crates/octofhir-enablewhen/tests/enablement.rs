//! Read-only enablement query tests

use octofhir_enablewhen::{EnablementQuery, InstancePath, PathSegment};
use octofhir_enablewhen_model::{
    AnswerValue, EnableWhen, EnableWhenAnswer, ItemType, Questionnaire, QuestionnaireItem,
    QuestionnaireResponse, ResponseItem,
};
use std::sync::Arc;

fn path(segments: &[(&str, u32)]) -> InstancePath {
    segments
        .iter()
        .map(|(link_id, index)| PathSegment::indexed(*link_id, *index))
        .collect()
}

fn questionnaire() -> Questionnaire {
    let mut group = QuestionnaireItem::new("g", ItemType::Group);
    group.repeats = true;
    group
        .enable_when
        .push(EnableWhen::equals("show", EnableWhenAnswer::Boolean(true)));
    group.item.push(QuestionnaireItem::new("q", ItemType::Boolean));
    let mut dep = QuestionnaireItem::new("dep", ItemType::String);
    dep.enable_when.push(EnableWhen::equals("q", EnableWhenAnswer::Boolean(true)));
    group.item.push(dep);
    Questionnaire {
        item: vec![QuestionnaireItem::new("show", ItemType::Boolean), group],
    }
}

fn response(show: bool, q_in_g1: bool) -> QuestionnaireResponse {
    let group = |q: bool| {
        Arc::new(ResponseItem {
            link_id: "g".into(),
            answer: Vec::new(),
            item: vec![
                Arc::new(ResponseItem::with_value("q", AnswerValue::Boolean(q))),
                Arc::new(ResponseItem::with_value("dep", AnswerValue::String("x".into()))),
            ],
        })
    };
    QuestionnaireResponse {
        item: vec![
            Arc::new(ResponseItem::with_value("show", AnswerValue::Boolean(show))),
            group(true),
            group(q_in_g1),
        ],
    }
}

#[test]
fn enablement_is_per_instance() {
    let q = questionnaire();
    let query = EnablementQuery::new(&q);
    let r = response(true, false);

    assert!(query.is_enabled("dep", &path(&[("g", 0), ("dep", 0)]), &r));
    assert!(!query.is_enabled("dep", &path(&[("g", 1), ("dep", 0)]), &r));
}

#[test]
fn item_inside_disabled_group_is_disabled() {
    let q = questionnaire();
    let query = EnablementQuery::new(&q);
    let r = response(false, true);

    // dep's own condition holds in both instances, but the ancestor group
    // is disabled, which disables everything inside it.
    assert!(!query.is_enabled("dep", &path(&[("g", 0), ("dep", 0)]), &r));
    assert!(!query.is_enabled("q", &path(&[("g", 1), ("q", 0)]), &r));
}

#[test]
fn unknown_link_id_is_enabled() {
    let q = questionnaire();
    let query = EnablementQuery::new(&q);
    assert!(query.is_enabled("nope", &InstancePath::root(), &response(true, true)));
}

#[test]
fn unknown_condition_target_disables() {
    let mut gated = QuestionnaireItem::new("e", ItemType::String);
    gated.enable_when.push(EnableWhen::exists("missing", true));
    let q = Questionnaire { item: vec![gated] };
    let query = EnablementQuery::new(&q);

    let r = QuestionnaireResponse {
        item: vec![Arc::new(ResponseItem::with_value(
            "e",
            AnswerValue::String("text".into()),
        ))],
    };
    assert!(!query.is_enabled("e", &path(&[("e", 0)]), &r));
}
