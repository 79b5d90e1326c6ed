use std::collections::{HashMap, HashSet};

use notice_model::{SchemaOrderTable, SdkVersion};
use notice_xml::{NodeId, XPath, XmlDocument};
use tracing::{debug, info, info_span};

use crate::error::{Result, SortError};
use crate::plan::OrderPlan;

/// Element under the root that carries the SDK version of a notice.
pub const VERSION_MARKER_ELEMENT: &str = "cbc:CustomizationID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOutcome {
    /// Number of elements whose position among their element siblings changed.
    Sorted { moved_elements: usize },
    /// The SDK version declares no main schema; the document is untouched.
    Unsupported,
}

/// Sorts notices of the SDK version its order table was built for.
#[derive(Debug, Clone, Copy)]
pub struct NoticeSorter<'a> {
    table: &'a SchemaOrderTable,
}

impl<'a> NoticeSorter<'a> {
    pub fn new(table: &'a SchemaOrderTable) -> Self {
        Self { table }
    }

    pub fn version(&self) -> SdkVersion {
        self.table.version()
    }

    pub fn is_supported(&self) -> bool {
        self.table.main_schema_path().is_some()
    }

    /// Parses, sorts and serialises a notice.
    pub fn sort_xml(&self, xml: &str) -> Result<(String, SortOutcome)> {
        let mut doc = XmlDocument::parse(xml)?;
        let outcome = self.sort(&mut doc)?;
        let text = match outcome {
            SortOutcome::Unsupported => xml.to_string(),
            SortOutcome::Sorted { .. } => doc.to_xml_string()?,
        };
        Ok((text, outcome))
    }

    /// Reorders element children in place, from the root node down.
    pub fn sort(&self, doc: &mut XmlDocument) -> Result<SortOutcome> {
        let root = doc.document_element().ok_or(notice_xml::XmlError::MissingRoot)?;
        let root_name = doc.name(root).unwrap_or_default().to_string();
        let _span = info_span!("sort", root = %root_name).entered();

        let notice_version = self.notice_version(doc, root, &root_name)?;
        if !notice_version.same_minor(&self.table.version()) {
            return Err(SortError::VersionMismatch {
                sorter: self.table.version(),
                notice: notice_version,
            });
        }
        if !self.is_supported() {
            info!(version = %self.table.version(), "sorting not supported for version");
            return Ok(SortOutcome::Unsupported);
        }

        let root_id = self.table.root_id();
        if self.table.entry(root_id).is_none() {
            return Err(SortError::UnknownSchemaNode {
                id: root_id.to_string(),
            });
        }
        let plan = OrderPlan::build(self.table);
        let mut pass = SortPass::new(self.table, &plan);
        pass.sort_node(doc, root_id)?;
        info!(moved = pass.moved, "sorted notice");
        Ok(SortOutcome::Sorted {
            moved_elements: pass.moved,
        })
    }

    fn notice_version(&self, doc: &XmlDocument, root: NodeId, root_name: &str) -> Result<SdkVersion> {
        let marker = doc
            .find_child_element(root, VERSION_MARKER_ELEMENT)
            .ok_or_else(|| SortError::MissingVersionMarker {
                element: VERSION_MARKER_ELEMENT.to_string(),
                root: root_name.to_string(),
            })?;
        let value = doc.text_content(marker)?;
        SdkVersion::parse(&value).map_err(|source| SortError::InvalidVersionMarker { value, source })
    }
}

struct OrderedChild<'t> {
    id: &'t str,
    element: &'t str,
    order: i64,
}

/// State of one `sort` call: compiled paths and the moved-element count.
struct SortPass<'t> {
    table: &'t SchemaOrderTable,
    plan: &'t OrderPlan,
    compiled: HashMap<String, XPath>,
    moved: usize,
}

impl<'t> SortPass<'t> {
    fn new(table: &'t SchemaOrderTable, plan: &'t OrderPlan) -> Self {
        Self {
            table,
            plan,
            compiled: HashMap::new(),
            moved: 0,
        }
    }

    fn sort_node(&mut self, doc: &mut XmlDocument, id: &str) -> Result<()> {
        let (table, plan) = (self.table, self.plan);
        let child_ids = plan.children(id);
        if child_ids.is_empty() {
            return Ok(());
        }
        debug!(id, children = child_ids.len(), "sorting children");

        let mut ordered = Vec::with_capacity(child_ids.len());
        for child_id in child_ids {
            let entry = table
                .entry(child_id)
                .ok_or_else(|| SortError::UnknownSchemaNode { id: child_id.clone() })?;
            match entry.primary_order() {
                Some(order) => ordered.push(OrderedChild {
                    id: child_id,
                    element: &order.element,
                    order: order.order,
                }),
                None => debug!(parent = id, child = %child_id, "no sequence order, left in place"),
            }
        }
        // Stable: ties keep metadata order.
        ordered.sort_by_key(|child| child.order);

        let entry = table
            .entry(id)
            .ok_or_else(|| SortError::UnknownSchemaNode { id: id.to_string() })?;
        let parents = self.select(doc, doc.root(), &entry.xpath_absolute)?;
        for parent in parents {
            self.reorder_children(doc, parent, &ordered)?;
        }

        for child_id in child_ids {
            self.sort_node(doc, child_id)?;
        }
        Ok(())
    }

    fn reorder_children(
        &mut self,
        doc: &mut XmlDocument,
        parent: NodeId,
        ordered: &[OrderedChild<'_>],
    ) -> Result<()> {
        let before: Vec<NodeId> = doc.child_elements(parent).collect();
        let trailing = trailing_formatting(doc, parent);
        let mut done: HashSet<&str> = HashSet::new();
        let mut touched = false;

        for child in ordered {
            if !done.insert(child.element) {
                continue;
            }
            let matches = self.select(doc, parent, child.element)?;
            if !matches.is_empty() {
                debug!(element = child.element, id = child.id, count = matches.len(), "appending");
            }
            for element in matches {
                // Only direct children are reordered.
                if doc.parent(element) != Some(parent) {
                    continue;
                }
                for formatting in preceding_formatting(doc, element) {
                    doc.move_to_end(formatting);
                }
                doc.move_to_end(element);
                touched = true;
            }
        }

        if touched {
            for node in trailing {
                doc.move_to_end(node);
            }
            let after: Vec<NodeId> = doc.child_elements(parent).collect();
            self.moved += before
                .iter()
                .zip(&after)
                .filter(|(old, new)| old != new)
                .count();
        }
        Ok(())
    }

    fn select(&mut self, doc: &XmlDocument, context: NodeId, expr: &str) -> Result<Vec<NodeId>> {
        if !self.compiled.contains_key(expr) {
            let compiled = XPath::compile(expr).map_err(|e| SortError::Path {
                expr: expr.to_string(),
                source: e.into(),
            })?;
            self.compiled.insert(expr.to_string(), compiled);
        }
        let Some(path) = self.compiled.get(expr) else {
            return Ok(Vec::new());
        };
        path.select_elements(doc, context)
            .map_err(|source| SortError::Path {
                expr: expr.to_string(),
                source,
            })
    }
}

/// The run of comments and whitespace immediately before `element`, in
/// document order.
fn preceding_formatting(doc: &XmlDocument, element: NodeId) -> Vec<NodeId> {
    let mut run = Vec::new();
    let mut current = doc.previous_sibling(element);
    while let Some(node) = current {
        if !doc.is_formatting(node) {
            break;
        }
        run.push(node);
        current = doc.previous_sibling(node);
    }
    run.reverse();
    run
}

/// Non-element nodes after the last element child.
fn trailing_formatting(doc: &XmlDocument, parent: NodeId) -> Vec<NodeId> {
    let children = doc.children(parent);
    let start = children
        .iter()
        .rposition(|&child| doc.is_element(child))
        .map_or(0, |last| last + 1);
    children[start..].to_vec()
}
