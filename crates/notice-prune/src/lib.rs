//! Visual model pruning.
//!
//! Each [`PruneCategory`](notice_model::PruneCategory) names a repeatable
//! group and the field that identifies an instance of it (an organisation
//! touch point, a beneficial owner, a tendering party, a lot tender, a
//! settled contract). An instance is removed when its identifier is
//! referenced nowhere else in the tree and every field configured for the
//! notice subtype is empty.

#![deny(unsafe_code)]

pub mod error;
pub mod occurrence;
pub mod pruner;
pub mod resolve;

pub use crate::error::{PruneError, Result};
pub use crate::occurrence::OccurrenceIndex;
pub use crate::pruner::{CategoryOutcome, PruneSummary, TreePruner};
pub use crate::resolve::{FieldStates, all_fields_empty, resolve};
