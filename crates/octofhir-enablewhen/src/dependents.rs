//! Definition-tree lookup and dependency finding
//!
//! The definition tree is read-only during evaluation, so it is indexed
//! once per engine: linkId lookup, parent chains, and the reverse
//! enableWhen edges the cascade follows.

use indexmap::IndexMap;
use octofhir_enablewhen_model::{Questionnaire, QuestionnaireItem};
use std::collections::HashMap;

/// Index over one questionnaire's definition tree.
pub struct DefinitionIndex<'q> {
    items: IndexMap<&'q str, &'q QuestionnaireItem>,
    parents: HashMap<&'q str, Option<&'q str>>,
}

impl<'q> DefinitionIndex<'q> {
    /// Build the index. When a linkId occurs more than once (an authoring
    /// error surfaced by the lint), the first occurrence wins.
    pub fn new(questionnaire: &'q Questionnaire) -> Self {
        let mut index = Self { items: IndexMap::new(), parents: HashMap::new() };
        for item in &questionnaire.item {
            index.insert_subtree(item, None);
        }
        index
    }

    fn insert_subtree(&mut self, item: &'q QuestionnaireItem, parent: Option<&'q str>) {
        if !self.items.contains_key(item.link_id.as_str()) {
            self.items.insert(&item.link_id, item);
            self.parents.insert(&item.link_id, parent);
        }
        for child in &item.item {
            self.insert_subtree(child, Some(&item.link_id));
        }
    }

    /// The definition item with the given linkId.
    pub fn get(&self, link_id: &str) -> Option<&'q QuestionnaireItem> {
        self.items.get(link_id).copied()
    }

    /// Every definition item whose enableWhen contains a condition
    /// referencing `link_id`, one entry per referencing condition. Multiple
    /// conditions on one item referencing the same question are each
    /// individually significant, so nothing is deduplicated here.
    pub fn find_dependents(&self, link_id: &str) -> Vec<&'q QuestionnaireItem> {
        self.items
            .values()
            .flat_map(|item| {
                item.enable_when
                    .iter()
                    .filter(|clause| clause.question == link_id)
                    .map(move |_| *item)
            })
            .collect()
    }

    /// `item` and all of its descendants, depth-first in document order.
    pub fn subtree(&self, item: &'q QuestionnaireItem) -> Vec<&'q QuestionnaireItem> {
        let mut collected = Vec::new();
        collect_subtree(item, &mut collected);
        collected
    }

    /// The definition chain from the outermost ancestor down to `link_id`
    /// itself. Empty when the linkId is unknown.
    pub fn ancestor_chain(&self, link_id: &str) -> Vec<&'q QuestionnaireItem> {
        let mut chain = Vec::new();
        let mut current = self.get(link_id).map(|item| item.link_id.as_str());
        while let Some(id) = current {
            if let Some(item) = self.get(id) {
                chain.push(item);
            }
            current = self.parents.get(id).copied().flatten();
        }
        chain.reverse();
        chain
    }
}

fn collect_subtree<'q>(item: &'q QuestionnaireItem, out: &mut Vec<&'q QuestionnaireItem>) {
    out.push(item);
    for child in &item.item {
        collect_subtree(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofhir_enablewhen_model::{EnableWhen, EnableWhenAnswer, ItemType};

    fn questionnaire() -> Questionnaire {
        let mut group = QuestionnaireItem::new("group", ItemType::Group);
        let mut dependent = QuestionnaireItem::new("dependent", ItemType::String);
        dependent.enable_when.push(EnableWhen::equals("source", EnableWhenAnswer::Boolean(true)));
        dependent.enable_when.push(EnableWhen::exists("source", true));
        group.item.push(QuestionnaireItem::new("source", ItemType::Boolean));
        group.item.push(dependent);
        Questionnaire { item: vec![group] }
    }

    #[test]
    fn dependents_include_one_entry_per_condition() {
        let q = questionnaire();
        let index = DefinitionIndex::new(&q);
        let dependents = index.find_dependents("source");
        assert_eq!(dependents.len(), 2);
        assert!(dependents.iter().all(|item| item.link_id == "dependent"));
    }

    #[test]
    fn ancestor_chain_runs_root_first() {
        let q = questionnaire();
        let index = DefinitionIndex::new(&q);
        let chain = index.ancestor_chain("dependent");
        let ids: Vec<_> = chain.iter().map(|item| item.link_id.as_str()).collect();
        assert_eq!(ids, vec!["group", "dependent"]);
    }

    #[test]
    fn subtree_is_depth_first() {
        let q = questionnaire();
        let index = DefinitionIndex::new(&q);
        let ids: Vec<_> = index.subtree(&q.item[0]).iter().map(|i| i.link_id.as_str()).collect();
        assert_eq!(ids, vec!["group", "source", "dependent"]);
    }
}
