//! Tree navigation and structural rewriting
//!
//! Traversal primitives over the answer tree: instance enumeration with
//! per-parent repetition indices, lookup by path, and the immutable rewrite
//! used for wiping and trimming. In the answer tree children may hang
//! directly off a node or off one of its answer values; both hanging points
//! share one repetition-index space scoped to the parent node.
//!
//! Rewrites reallocate only the path from the root to the edited node;
//! untouched sibling subtrees are reused via `Arc` clones.

use crate::dependents::DefinitionIndex;
use crate::path::{InstancePath, PathSegment};
use octofhir_enablewhen_model::{Answer, EmptyValueProvider, ResponseItem};
use std::collections::HashMap;
use std::sync::Arc;

/// A located occurrence of a linkId in the answer tree.
pub type Instance = (InstancePath, Arc<ResponseItem>);

/// Find every concrete instance of `link_id` in the answer tree, with the
/// full path to each. Sibling occurrences of the same linkId get an
/// incrementing repetition index scoped to their immediate parent, counted
/// across direct children and answer-nested children in document order.
pub fn find_all_instances(link_id: &str, roots: &[Arc<ResponseItem>]) -> Vec<Instance> {
    let mut found = Vec::new();
    walk_siblings(link_id, roots.iter(), &InstancePath::root(), &mut found);
    found
}

/// The node at `path`, if the answer tree still contains it.
pub fn node_at(roots: &[Arc<ResponseItem>], path: &InstancePath) -> Option<Arc<ResponseItem>> {
    let mut segments = path.segments().iter();
    let first = segments.next()?;
    let mut node = match_sibling(roots.iter(), first)?;
    for segment in segments {
        node = match_sibling(children_of(&node), segment)?;
    }
    Some(node)
}

/// Edits applied through [`rewrite`].
pub enum Edit<'a> {
    /// Reset every answer in the subtree at the target path to the canonical
    /// empty value of its definition, dropping answer entries that become
    /// fully empty.
    Wipe {
        /// linkId lookup for the definition tree
        index: &'a DefinitionIndex<'a>,
        /// canonical-empty-value provider
        empties: &'a dyn EmptyValueProvider,
    },
    /// Remove occurrences of `link_id` beyond `keep` among the children of
    /// the node at the target path.
    TrimSiblings {
        /// linkId whose occurrences are trimmed
        link_id: &'a str,
        /// number of leading occurrences to retain
        keep: u32,
    },
}

/// Apply `edit` at `path`, returning a new root list. A path that no longer
/// exists in the tree leaves it unchanged; navigation never fails.
pub fn rewrite(roots: &[Arc<ResponseItem>], path: &InstancePath, edit: &Edit<'_>) -> Vec<Arc<ResponseItem>> {
    let segments = path.segments();
    if segments.is_empty() {
        // Root-level trim; a wipe always targets a concrete node.
        return match edit {
            Edit::TrimSiblings { link_id, keep } => {
                let mut counters: HashMap<&str, u32> = HashMap::new();
                roots
                    .iter()
                    .filter(|child| {
                        let occurrence = next_occurrence(&mut counters, &child.link_id);
                        child.link_id != *link_id || occurrence < *keep
                    })
                    .map(Arc::clone)
                    .collect()
            }
            Edit::Wipe { .. } => roots.to_vec(),
        };
    }

    let mut counters: HashMap<&str, u32> = HashMap::new();
    roots
        .iter()
        .map(|child| {
            let occurrence = next_occurrence(&mut counters, &child.link_id);
            if segment_matches(&segments[0], child, occurrence) {
                descend(child, &segments[1..], edit)
            } else {
                Arc::clone(child)
            }
        })
        .collect()
}

fn descend(node: &Arc<ResponseItem>, rest: &[PathSegment], edit: &Edit<'_>) -> Arc<ResponseItem> {
    if rest.is_empty() {
        return match edit {
            Edit::Wipe { index, empties } => Arc::new(wipe_item(node, index, *empties)),
            Edit::TrimSiblings { link_id, keep } => Arc::new(trim_children(node, link_id, *keep)),
        };
    }

    let mut counters: HashMap<&str, u32> = HashMap::new();
    let item = node
        .item
        .iter()
        .map(|c| rebuild_child(c, &mut counters, rest, edit))
        .collect();
    let answer = node
        .answer
        .iter()
        .map(|a| Answer {
            value: a.value.clone(),
            item: a
                .item
                .iter()
                .map(|c| rebuild_child(c, &mut counters, rest, edit))
                .collect(),
        })
        .collect();
    Arc::new(ResponseItem { link_id: node.link_id.clone(), answer, item })
}

fn rebuild_child<'x>(
    child: &'x Arc<ResponseItem>,
    counters: &mut HashMap<&'x str, u32>,
    rest: &[PathSegment],
    edit: &Edit<'_>,
) -> Arc<ResponseItem> {
    let occurrence = next_occurrence(counters, &child.link_id);
    if segment_matches(&rest[0], child, occurrence) {
        descend(child, &rest[1..], edit)
    } else {
        Arc::clone(child)
    }
}

fn wipe_item(node: &ResponseItem, index: &DefinitionIndex<'_>, empties: &dyn EmptyValueProvider) -> ResponseItem {
    let empty = index.get(&node.link_id).and_then(|def| empties.empty_value(def));
    let answer = node
        .answer
        .iter()
        .filter_map(|a| {
            let wiped = Answer {
                value: empty.clone(),
                item: a.item.iter().map(|c| Arc::new(wipe_item(c, index, empties))).collect(),
            };
            wiped.has_populated_content().then_some(wiped)
        })
        .collect();
    let item = node.item.iter().map(|c| Arc::new(wipe_item(c, index, empties))).collect();
    ResponseItem { link_id: node.link_id.clone(), answer, item }
}

fn trim_children(node: &ResponseItem, link_id: &str, keep: u32) -> ResponseItem {
    let mut counters: HashMap<&str, u32> = HashMap::new();
    let item = node
        .item
        .iter()
        .filter(|c| keep_child(c, &mut counters, link_id, keep))
        .map(Arc::clone)
        .collect();
    let answer = node
        .answer
        .iter()
        .map(|a| Answer {
            value: a.value.clone(),
            item: a
                .item
                .iter()
                .filter(|c| keep_child(c, &mut counters, link_id, keep))
                .map(Arc::clone)
                .collect(),
        })
        .collect();
    ResponseItem { link_id: node.link_id.clone(), answer, item }
}

fn keep_child<'x>(
    child: &'x Arc<ResponseItem>,
    counters: &mut HashMap<&'x str, u32>,
    link_id: &str,
    keep: u32,
) -> bool {
    let occurrence = next_occurrence(counters, &child.link_id);
    child.link_id != link_id || occurrence < keep
}

/// Children of a node in document order: direct items first, then items
/// nested under each answer value.
pub fn children_of(node: &ResponseItem) -> impl Iterator<Item = &Arc<ResponseItem>> {
    node.item.iter().chain(node.answer.iter().flat_map(|a| a.item.iter()))
}

fn walk_siblings<'a>(
    target: &str,
    siblings: impl Iterator<Item = &'a Arc<ResponseItem>>,
    base: &InstancePath,
    found: &mut Vec<Instance>,
) {
    let mut counters: HashMap<&'a str, u32> = HashMap::new();
    for child in siblings {
        let occurrence = next_occurrence(&mut counters, &child.link_id);
        let path = base.child(PathSegment::indexed(child.link_id.clone(), occurrence));
        if child.link_id == target {
            found.push((path.clone(), Arc::clone(child)));
        }
        walk_siblings(target, children_of(child), &path, found);
    }
}

fn match_sibling<'a>(
    siblings: impl Iterator<Item = &'a Arc<ResponseItem>>,
    segment: &PathSegment,
) -> Option<Arc<ResponseItem>> {
    let mut counters: HashMap<&'a str, u32> = HashMap::new();
    for child in siblings {
        let occurrence = next_occurrence(&mut counters, &child.link_id);
        if segment_matches(segment, child, occurrence) {
            return Some(Arc::clone(child));
        }
    }
    None
}

fn segment_matches(segment: &PathSegment, child: &ResponseItem, occurrence: u32) -> bool {
    segment.link_id == child.link_id && segment.index == Some(occurrence)
}

fn next_occurrence<'a>(counters: &mut HashMap<&'a str, u32>, link_id: &'a str) -> u32 {
    let counter = counters.entry(link_id).or_insert(0);
    let occurrence = *counter;
    *counter += 1;
    occurrence
}
