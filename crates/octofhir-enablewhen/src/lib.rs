//! Conditional-visibility (enableWhen) recalculation engine
//!
//! Given that one answer in a FHIR questionnaire response has just changed,
//! this crate determines every other item that must become disabled,
//! directly or transitively, keeps the answer tree consistent by clearing
//! answers under disabled items, and trims repeating-group instances back
//! to their minimum count, with every effect scoped to the specific
//! repeated instance it applies to.
//!
//! The engine is side-effect-free: it receives a snapshot of the
//! definition tree and the answer tree and returns a new answer tree plus
//! an explicit list of changes, never mutating its inputs. Unchanged
//! subtrees of the output are shared with the input by reference.
//!
//! # Example
//!
//! ```ignore
//! use octofhir_enablewhen::EnableWhenEngine;
//! use octofhir_enablewhen_model::{Questionnaire, QuestionnaireResponse};
//!
//! let questionnaire: Questionnaire = Questionnaire::from_json(q_json)?;
//! let response = QuestionnaireResponse::from_json(r_json)?;
//!
//! let engine = EnableWhenEngine::new(&questionnaire);
//! let resolution = engine.resolve_link_ids(&["smoker"], &response);
//! for op in &resolution.changes {
//!     // apply each operation as one state transition
//! }
//! ```
//!
//! # Architecture
//!
//! - `path`: instance addressing and same-instance correlation
//! - `navigator`: answer-tree traversal and `Arc`-sharing rewrites
//! - `clause`: enableWhen condition evaluation
//! - `dependents`: definition-tree index and reverse enableWhen edges
//! - `trim`: repeat-instance trimming to the minOccurs floor
//! - `resolver`: the recursive cascade to a fixpoint
//! - `changeset`: flattening the cascade into discrete operations
//! - `enabled`: the read-only enablement query for the rendering layer
//! - `lint`: authoring checks for conditions runtime evaluation silently
//!   tolerates

pub mod changeset;
pub mod clause;
pub mod dependents;
pub mod enabled;
pub mod lint;
pub mod navigator;
pub mod path;
pub mod resolver;
pub mod trim;

// Re-export main types
pub use changeset::ChangeOp;
pub use clause::{clause_matches, condition_satisfied};
pub use dependents::DefinitionIndex;
pub use enabled::EnablementQuery;
pub use lint::{AuthoringWarning, lint_questionnaire};
pub use navigator::find_all_instances;
pub use path::{InstancePath, PathSegment};
pub use resolver::{ClearedInstance, EnableWhenEngine, Resolution};
pub use trim::repeat_floor;
