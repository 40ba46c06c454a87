//! Instance paths and same-instance correlation
//!
//! Nodes inside a tree with repeating structures are addressed by an ordered
//! list of (linkId, repetition index) segments. Correlation between two
//! paths is a partial match, not full equality: an enableWhen condition's
//! referenced question may sit at a different nesting depth than the item it
//! controls, sharing only some repeating ancestors.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// One segment of an instance path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    /// linkId of the item at this level
    pub link_id: String,
    /// Repetition index among same-linkId siblings; `None` when the
    /// structural position is not pinned to a particular repetition
    pub index: Option<u32>,
}

impl PathSegment {
    /// Segment pinned to a concrete repetition.
    pub fn indexed(link_id: impl Into<String>, index: u32) -> Self {
        Self { link_id: link_id.into(), index: Some(index) }
    }

    /// Segment not pinned to any repetition.
    pub fn unindexed(link_id: impl Into<String>) -> Self {
        Self { link_id: link_id.into(), index: None }
    }
}

/// An ordered list of segments identifying one concrete instance within the
/// answer tree. Paths produced by traversal always carry indices; paths
/// built by hand may leave segments unindexed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstancePath {
    segments: SmallVec<[PathSegment; 8]>,
}

impl InstancePath {
    /// The empty path (the tree root).
    pub fn root() -> Self {
        Self::default()
    }

    /// The segments of this path, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment, when the path is not the root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// This path extended by one segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// This path without its final segment; the parent container's path.
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Same-instance correlation.
    ///
    /// For every segment of `self` (the context) that carries a defined
    /// repetition index, the segment in `candidate` with the same linkId
    /// must carry an equal index. A candidate with no segment for that
    /// linkId still correlates: missing structural information must not
    /// incorrectly block correlation.
    pub fn is_same_instance(&self, candidate: &InstancePath) -> bool {
        self.segments
            .iter()
            .filter_map(|seg| seg.index.map(|idx| (seg.link_id.as_str(), idx)))
            .all(|(link_id, idx)| {
                candidate
                    .segments
                    .iter()
                    .find(|c| c.link_id == link_id)
                    .is_none_or(|c| c.index.is_none_or(|ci| ci == idx))
            })
    }
}

impl FromIterator<PathSegment> for InstancePath {
    fn from_iter<T: IntoIterator<Item = PathSegment>>(iter: T) -> Self {
        Self { segments: iter.into_iter().collect() }
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match seg.index {
                Some(idx) => write!(f, "{}[{}]", seg.link_id, idx)?,
                None => f.write_str(&seg.link_id)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[(&str, Option<u32>)]) -> InstancePath {
        segments
            .iter()
            .map(|(link_id, index)| PathSegment { link_id: (*link_id).into(), index: *index })
            .collect()
    }

    #[test]
    fn identical_paths_correlate() {
        let p = path(&[("group", Some(1)), ("q", Some(0))]);
        assert!(p.is_same_instance(&p.clone()));
    }

    #[test]
    fn differing_repetition_index_blocks_correlation() {
        let context = path(&[("group", Some(1)), ("q", Some(0))]);
        let candidate = path(&[("group", Some(0)), ("q", Some(0))]);
        assert!(!context.is_same_instance(&candidate));
    }

    #[test]
    fn missing_candidate_segment_correlates() {
        // The referenced question sits shallower than the controlled item.
        let context = path(&[("group", Some(1)), ("sub", Some(0)), ("q", Some(0))]);
        let candidate = path(&[("group", Some(1)), ("other", Some(0))]);
        assert!(context.is_same_instance(&candidate));
    }

    #[test]
    fn unindexed_context_segment_correlates_with_anything() {
        let context = path(&[("group", None), ("q", Some(0))]);
        let candidate = path(&[("group", Some(4)), ("q", Some(0))]);
        assert!(context.is_same_instance(&candidate));
    }

    #[test]
    fn display_renders_indices() {
        let p = path(&[("group", Some(1)), ("q", None)]);
        assert_eq!(p.to_string(), "group[1]/q");
    }
}
