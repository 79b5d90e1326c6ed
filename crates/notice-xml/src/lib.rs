//! Order-preserving XML handling for notice documents.
//!
//! [`XmlDocument`] keeps every node of the source (comments, whitespace,
//! processing instructions) in an arena so elements can be reordered by
//! moving ids between child lists and written back unchanged otherwise.
//! [`path::XPath`] evaluates the path expressions found in SDK metadata.

#![deny(unsafe_code)]

pub mod document;
pub mod error;
mod parse;
pub mod path;
pub mod text;
mod write;

pub use document::{Attribute, Element, NodeId, NodeKind, XmlDocument, local_name};
pub use error::{PathError, Result, XmlError};
pub use path::{Selected, XPath, strip_predicates};
pub use text::{RawText, unescape_raw};
