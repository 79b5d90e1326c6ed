//! Reorders the element children of a notice so they follow the XSD
//! sequence order declared in SDK field metadata.
//!
//! Elements are only detached and appended again: nothing is created or
//! dropped, attributes keep their order, and the comments and whitespace
//! directly above an element travel with it.

#![deny(unsafe_code)]

pub mod error;
pub mod plan;
pub mod sorter;

pub use crate::error::{Result, SortError};
pub use crate::plan::{MERGED_NODES, OrderPlan};
pub use crate::sorter::{NoticeSorter, SortOutcome, VERSION_MARKER_ELEMENT};
