//! Validation report extraction.
//!
//! A rule-validation service returns an SVRL document listing the rules that
//! fired and the assertions that failed. [`parse_report`] turns it into an
//! [`AnnotatedReport`](notice_model::AnnotatedReport): one item per failed
//! assert (`KO-1..`) with section indices and a legend built from the field
//! and group labels of the notice's SDK version, then one item per fired
//! rule (`OK-1..`).

#![deny(unsafe_code)]

pub mod error;
pub mod extract;
pub mod legend;
pub mod svrl;

pub use crate::error::{ReportError, Result};
pub use crate::extract::{ReportExtractor, parse_report};
pub use crate::legend::{EMPTY_LEGEND, section_indices, see_reference};
pub use crate::svrl::{SVRL_ROOT, parse_svrl};
