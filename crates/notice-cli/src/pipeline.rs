//! The pipeline steps behind each subcommand, free of file and terminal I/O.

use anyhow::{Context, Result, anyhow};
use notice_model::{AnnotatedReport, LabelLookup, PruneRules, SdkVersion, VisualNode};
use notice_prune::{PruneSummary, TreePruner};
use notice_sdk::SdkRegistry;
use notice_sort::{NoticeSorter, SortOutcome};
use notice_xml::{XmlDocument, local_name};
use tracing::{info, warn};

/// Pruned visual model, serialised as pretty JSON.
#[derive(Debug, Clone)]
pub struct PrunedModel {
    pub json: String,
    pub summary: PruneSummary,
}

/// Sorted notice text; the input text when the version cannot be sorted.
#[derive(Debug, Clone)]
pub struct SortedNotice {
    pub xml: String,
    pub document_type: String,
    pub outcome: SortOutcome,
}

/// Parses a visual model, prunes it and serialises it again.
///
/// Without `sub_type` the subtype is read from the model itself.
pub fn prune_model(json: &str, rules: &PruneRules, sub_type: Option<&str>) -> Result<PrunedModel> {
    let mut root: VisualNode = serde_json::from_str(json).context("parse visual model")?;
    let pruner = TreePruner::new(rules);
    let summary = match sub_type {
        Some(sub_type) => pruner.prune(&mut root, sub_type),
        None => pruner.prune_visual_model(&mut root),
    }
    .context("prune visual model")?;
    let json = serde_json::to_string_pretty(&root).context("serialize visual model")?;
    Ok(PrunedModel { json, summary })
}

/// Sorts a notice with the order table of its version and document type.
///
/// Without `document_type` the notice root element selects the table.
pub fn sort_notice(
    xml: &str,
    registry: &SdkRegistry,
    version: SdkVersion,
    document_type: Option<&str>,
) -> Result<SortedNotice> {
    let mut doc = XmlDocument::parse(xml).context("parse notice")?;
    let document_type = match document_type {
        Some(document_type) => document_type.to_string(),
        None => {
            let root = doc
                .document_element()
                .and_then(|root| doc.name(root))
                .ok_or_else(|| anyhow!("notice has no root element"))?;
            local_name(root).to_string()
        }
    };
    let table = registry
        .order_table(version, &document_type)
        .ok_or_else(|| anyhow!("no order table for document type {document_type} in SDK {version}"))?;

    let outcome = NoticeSorter::new(table)
        .sort(&mut doc)
        .with_context(|| format!("sort {document_type} notice"))?;
    let xml = match outcome {
        SortOutcome::Sorted { moved_elements } => {
            info!(document_type = %document_type, moved_elements, "notice sorted");
            doc.to_xml_string().context("serialize notice")?
        }
        SortOutcome::Unsupported => {
            warn!(version = %version, "sorting unsupported for this version, notice left as is");
            xml.to_string()
        }
    };
    Ok(SortedNotice {
        xml,
        document_type,
        outcome,
    })
}

/// Annotates a validation report; the notice is attached when nothing failed.
pub fn annotate_report<L: LabelLookup + ?Sized>(
    svrl: &str,
    labels: &L,
    version: SdkVersion,
    lang: &str,
    notice: Option<&str>,
) -> Result<AnnotatedReport> {
    let mut report = notice_report::parse_report(svrl, &version, lang, labels)
        .context("parse validation report")?;
    if let Some(notice) = notice
        && report.attach_notice_xml(notice)
    {
        info!("validation clean, notice attached");
    }
    Ok(report)
}
