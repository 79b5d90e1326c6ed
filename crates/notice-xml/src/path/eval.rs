use std::collections::{HashMap, HashSet};

use super::ast::{Axis, CompareOp, Expr, LocationPath, NodeTest, Operand, Predicate, Step};
use crate::document::{NodeId, NodeKind, XmlDocument};
use crate::error::XmlError;
use crate::text::unescape_raw;

/// One item of a node-set: a tree node or an attribute of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selected {
    Node(NodeId),
    Attribute { owner: NodeId, index: usize },
}

impl Selected {
    pub fn node(self) -> Option<NodeId> {
        match self {
            Selected::Node(id) => Some(id),
            Selected::Attribute { .. } => None,
        }
    }
}

pub(crate) fn eval_path(
    doc: &XmlDocument,
    context: Selected,
    path: &LocationPath,
) -> Result<Vec<Selected>, XmlError> {
    let mut current = if path.absolute {
        vec![Selected::Node(doc.root())]
    } else {
        vec![context]
    };

    for step in &path.steps {
        let mut seen = HashSet::new();
        let mut next = Vec::new();
        for &item in &current {
            for candidate in apply_predicates(doc, step, candidates(doc, item, step))? {
                if seen.insert(candidate) {
                    next.push(candidate);
                }
            }
        }
        current = next;
        if current.is_empty() {
            break;
        }
    }

    if path.uses_descendant_axis() {
        sort_document_order(doc, &mut current);
    }
    Ok(current)
}

fn candidates(doc: &XmlDocument, item: Selected, step: &Step) -> Vec<Selected> {
    match (step.axis, item) {
        (Axis::Child, Selected::Node(id)) => doc
            .children(id)
            .iter()
            .copied()
            .filter(|&child| node_matches(doc, child, &step.test))
            .map(Selected::Node)
            .collect(),
        (Axis::Attribute, Selected::Node(id)) => doc
            .element(id)
            .map(|element| {
                element
                    .attributes
                    .iter()
                    .enumerate()
                    .filter(|(_, attr)| match &step.test {
                        NodeTest::Name(name) => attr.name == *name,
                        NodeTest::Any | NodeTest::Node => true,
                        NodeTest::Text => false,
                    })
                    .map(|(index, _)| Selected::Attribute { owner: id, index })
                    .collect()
            })
            .unwrap_or_default(),
        (Axis::SelfNode, _) => vec![item],
        (Axis::Parent, Selected::Node(id)) => {
            doc.parent(id).map(Selected::Node).into_iter().collect()
        }
        (Axis::Parent, Selected::Attribute { owner, .. }) => vec![Selected::Node(owner)],
        (Axis::DescendantOrSelf, Selected::Node(id)) => std::iter::once(id)
            .chain(doc.descendants(id))
            .map(Selected::Node)
            .collect(),
        (Axis::DescendantOrSelf, Selected::Attribute { .. }) => vec![item],
        (Axis::Child | Axis::Attribute, Selected::Attribute { .. }) => Vec::new(),
    }
}

fn node_matches(doc: &XmlDocument, id: NodeId, test: &NodeTest) -> bool {
    match (test, doc.kind(id)) {
        (NodeTest::Name(name), NodeKind::Element(element)) => element.name == *name,
        (NodeTest::Any, NodeKind::Element(_)) => true,
        (NodeTest::Text, NodeKind::Text(_) | NodeKind::CData(_)) => true,
        (NodeTest::Node, _) => true,
        _ => false,
    }
}

fn apply_predicates(
    doc: &XmlDocument,
    step: &Step,
    mut items: Vec<Selected>,
) -> Result<Vec<Selected>, XmlError> {
    for predicate in &step.predicates {
        items = match predicate {
            Predicate::Position(position) => position
                .checked_sub(1)
                .and_then(|index| items.get(index).copied())
                .into_iter()
                .collect(),
            Predicate::Filter(expr) => {
                let mut kept = Vec::with_capacity(items.len());
                for item in items {
                    if eval_bool(doc, item, expr)? {
                        kept.push(item);
                    }
                }
                kept
            }
        };
    }
    Ok(items)
}

pub(crate) fn eval_bool(doc: &XmlDocument, context: Selected, expr: &Expr) -> Result<bool, XmlError> {
    Ok(match expr {
        Expr::Or(left, right) => eval_bool(doc, context, left)? || eval_bool(doc, context, right)?,
        Expr::And(left, right) => {
            eval_bool(doc, context, left)? && eval_bool(doc, context, right)?
        }
        Expr::Not(inner) => !eval_bool(doc, context, inner)?,
        Expr::Operand(Operand::Path(path)) => !eval_path(doc, context, path)?.is_empty(),
        Expr::Operand(Operand::Text(text)) => !text.is_empty(),
        Expr::Operand(Operand::Number(number)) => *number != 0.0,
        Expr::Compare { left, op, right } => {
            let left = atoms(doc, context, left)?;
            let right = atoms(doc, context, right)?;
            left.iter().any(|a| {
                right.iter().any(|b| match op {
                    CompareOp::Eq => a.equals(b),
                    CompareOp::Ne => !a.equals(b),
                })
            })
        }
    })
}

enum Atom {
    Text(String),
    Number(f64),
}

impl Atom {
    fn equals(&self, other: &Atom) -> bool {
        match (self, other) {
            (Atom::Text(a), Atom::Text(b)) => a == b,
            (Atom::Number(a), Atom::Number(b)) => a == b,
            (Atom::Number(n), Atom::Text(t)) | (Atom::Text(t), Atom::Number(n)) => {
                t.trim().parse::<f64>().is_ok_and(|value| value == *n)
            }
        }
    }
}

fn atoms(doc: &XmlDocument, context: Selected, operand: &Operand) -> Result<Vec<Atom>, XmlError> {
    match operand {
        Operand::Text(text) => Ok(vec![Atom::Text(text.clone())]),
        Operand::Number(number) => Ok(vec![Atom::Number(*number)]),
        Operand::Path(path) => eval_path(doc, context, path)?
            .into_iter()
            .map(|item| string_value(doc, item).map(Atom::Text))
            .collect(),
    }
}

/// XPath string-value of a node-set item.
pub(crate) fn string_value(doc: &XmlDocument, item: Selected) -> Result<String, XmlError> {
    match item {
        Selected::Attribute { owner, index } => match doc
            .element(owner)
            .and_then(|element| element.attributes.get(index))
        {
            Some(attr) => Ok(attr.value()?.into_owned()),
            None => Ok(String::new()),
        },
        Selected::Node(id) => match doc.kind(id) {
            NodeKind::Text(raw) => Ok(unescape_raw(raw, "text")?.into_owned()),
            NodeKind::CData(content) | NodeKind::Comment(content) => Ok(content.clone()),
            NodeKind::Element(_) | NodeKind::Document => doc.text_content(id),
            _ => Ok(String::new()),
        },
    }
}

fn sort_document_order(doc: &XmlDocument, items: &mut [Selected]) {
    let order: HashMap<NodeId, usize> = std::iter::once(doc.root())
        .chain(doc.descendants(doc.root()))
        .enumerate()
        .map(|(position, id)| (id, position))
        .collect();
    items.sort_by_key(|item| match *item {
        Selected::Node(id) => (order.get(&id).copied().unwrap_or(usize::MAX), 0),
        Selected::Attribute { owner, index } => {
            (order.get(&owner).copied().unwrap_or(usize::MAX), index + 1)
        }
    });
}
