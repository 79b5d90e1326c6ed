//! A small XPath 1.0 subset: location paths with child, attribute, self,
//! parent and `//` steps, and predicates built from positions, `and`, `or`,
//! `not()`, existence tests and `=` / `!=` comparisons.
//!
//! Names are compared as written in the document (`cbc:ID` matches only an
//! element whose qualified name is `cbc:ID`); no namespace resolution is done.

mod ast;
mod eval;
mod parser;

use std::fmt;

pub use ast::{Axis, CompareOp, Expr, LocationPath, NodeTest, Operand, Predicate, Step};
pub use eval::Selected;

use crate::document::{NodeId, XmlDocument};
use crate::error::{PathError, XmlError};

/// A compiled path expression, reusable across documents.
#[derive(Debug, Clone, PartialEq)]
pub struct XPath {
    source: String,
    expr: Expr,
}

impl XPath {
    pub fn compile(source: &str) -> Result<Self, PathError> {
        Ok(Self {
            source: source.to_string(),
            expr: parser::parse_expr(source)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluates the expression as a node-set from `context`.
    pub fn select(&self, doc: &XmlDocument, context: NodeId) -> Result<Vec<Selected>, XmlError> {
        match &self.expr {
            Expr::Operand(Operand::Path(path)) => {
                eval::eval_path(doc, Selected::Node(context), path)
            }
            _ => Err(PathError::Unsupported {
                expr: self.source.clone(),
                message: "expression does not select nodes".to_string(),
            }
            .into()),
        }
    }

    /// Selected elements only, in document order.
    pub fn select_elements(
        &self,
        doc: &XmlDocument,
        context: NodeId,
    ) -> Result<Vec<NodeId>, XmlError> {
        Ok(self
            .select(doc, context)?
            .into_iter()
            .filter_map(Selected::node)
            .filter(|&id| doc.is_element(id))
            .collect())
    }

    /// Boolean value of the expression, as inside a predicate.
    pub fn is_true(&self, doc: &XmlDocument, context: NodeId) -> Result<bool, XmlError> {
        eval::eval_bool(doc, Selected::Node(context), &self.expr)
    }

    /// String-value of the first selected item, or an empty string.
    pub fn string(&self, doc: &XmlDocument, context: NodeId) -> Result<String, XmlError> {
        match self.select(doc, context)?.first() {
            Some(&item) => eval::string_value(doc, item),
            None => Ok(String::new()),
        }
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl XmlDocument {
    /// Compiles `expr` and selects the matching elements from `context`.
    pub fn select_elements(&self, context: NodeId, expr: &str) -> Result<Vec<NodeId>, XmlError> {
        XPath::compile(expr)?.select_elements(self, context)
    }
}

/// Removes every bracketed predicate, honouring quotes and nesting:
/// `a[b[1]='x]']/c` becomes `a/c`.
pub fn strip_predicates(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for c in path.chars() {
        if depth > 0 {
            match quote {
                Some(open) if c == open => quote = None,
                Some(_) => {}
                None => match c {
                    '\'' | '"' => quote = Some(c),
                    '[' => depth += 1,
                    ']' => depth -= 1,
                    _ => {}
                },
            }
        } else if c == '[' {
            depth = 1;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::strip_predicates;

    #[test]
    fn strips_nested_and_quoted_predicates() {
        assert_eq!(strip_predicates("a[b[1]='x]']/c"), "a/c");
        assert_eq!(
            strip_predicates("efac:SubcontractingTerm[efbc:TermCode/@listName='applicability']"),
            "efac:SubcontractingTerm"
        );
        assert_eq!(strip_predicates("cbc:ID"), "cbc:ID");
    }
}
