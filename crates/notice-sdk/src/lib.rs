//! Load-then-freeze lookup tables read from an SDK resource tree.
//!
//! ```text
//! <root>/prune-rules/prune-{TPO,UBO,TPA,TEN,CON}.json
//! <root>/sdk/<version>/fields/fields.json
//! <root>/sdk/<version>/notice-types/notice-types.json
//! <root>/sdk/<version>/translations/{field,group}_<lang>.xml
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod fields;
pub mod notice_types;
pub mod order;
pub mod paths;
pub mod registry;
pub mod rules;
pub mod translations;

pub use crate::error::{Result, SdkError};
pub use crate::notice_types::DocumentType;
pub use crate::order::load_schema_order_table;
pub use crate::registry::{SdkRegistry, SdkVersionDir, available_versions, find_version_dir};
pub use crate::rules::load_prune_rules;
pub use crate::translations::load_label_table;
