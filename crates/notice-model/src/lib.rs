//! Value types shared by the notice pruner, sorter and report extractor.
//!
//! Everything in here is plain data: lookup tables are built once by
//! `notice-sdk` and then passed around by reference.

pub mod error;
pub mod labels;
pub mod report;
pub mod rules;
pub mod schema;
pub mod version;
pub mod visual;

pub use error::{ModelError, Result};
pub use labels::{FieldLabel, LabelCatalog, LabelKind, LabelLookup, LabelTable};
pub use report::{
    AnnotatedItem, AnnotatedReport, DiagnosticReference, FAILED_PREFIX, FIRED_PREFIX, FailedAssert,
    FiredRule, ValidationReport,
};
pub use rules::{FieldPath, FieldRuleSet, PruneCategory, PruneRules};
pub use schema::{ROOT_NODE_ID, SchemaEntry, SchemaOrderTable, SequenceOrder};
pub use version::{SDK_VERSION_PREFIX, SdkVersion};
pub use visual::{DATA_SUBTREE_INDEX, NOTICE_SUB_TYPE_KEY, VisualNode};
