use notice_model::{
    AnnotatedItem, AnnotatedReport, FAILED_PREFIX, FIRED_PREFIX, FailedAssert, FiredRule,
    LabelLookup, SdkVersion, ValidationReport,
};
use tracing::{debug, info, info_span};

use crate::error::{ReportError, Result};
use crate::legend::{join_legend, legend_fragment, legend_identifiers, section_indices, see_reference};
use crate::svrl::parse_svrl;

/// Annotates validation reports with labels of one label source.
pub struct ReportExtractor<'a, L: ?Sized> {
    labels: &'a L,
}

impl<'a, L: LabelLookup + ?Sized> ReportExtractor<'a, L> {
    pub fn new(labels: &'a L) -> Self {
        Self { labels }
    }

    /// Parses SVRL text into failed-assert items (`KO-n`) followed by
    /// fired-rule items (`OK-n`).
    ///
    /// Fails when no labels exist for `version`/`lang` or when the report
    /// is malformed; nothing is returned for a partially read report.
    pub fn parse_report(
        &self,
        report_text: &str,
        version: &SdkVersion,
        lang: &str,
    ) -> Result<AnnotatedReport> {
        let _span = info_span!("parse_report", version = %version, lang).entered();
        if !self.labels.has_labels(version, lang) {
            return Err(ReportError::UnknownLabelSet {
                version: *version,
                lang: lang.to_string(),
            });
        }
        let report = parse_svrl(report_text)?;
        let annotated = self.annotate(&report, version, lang)?;
        info!(
            fired = annotated.total_fired,
            failed = annotated.total_failed,
            "parsed validation report"
        );
        Ok(annotated)
    }

    pub fn annotate(
        &self,
        report: &ValidationReport,
        version: &SdkVersion,
        lang: &str,
    ) -> Result<AnnotatedReport> {
        let failed = report
            .failed_asserts
            .iter()
            .enumerate()
            .map(|(i, failed)| self.failed_item(i + 1, failed, version, lang))
            .collect::<Result<Vec<_>>>()?;
        let fired = report
            .fired_rules
            .iter()
            .enumerate()
            .map(|(i, fired)| fired_item(i + 1, fired));
        Ok(AnnotatedReport {
            total_fired: report.fired_rules.len(),
            total_failed: report.failed_asserts.len(),
            items: failed.into_iter().chain(fired).collect(),
            notice_xml: None,
        })
    }

    fn failed_item(
        &self,
        number: usize,
        failed: &FailedAssert,
        version: &SdkVersion,
        lang: &str,
    ) -> Result<AnnotatedItem> {
        let indices = section_indices(&failed.location)?;
        let see = failed.see().and_then(see_reference);
        Ok(AnnotatedItem {
            index: format!("{FAILED_PREFIX}{number}"),
            id: failed.id.clone(),
            location: failed.location.clone(),
            lot_number: indices.first().copied(),
            section_indices: indices,
            test: failed.test.clone(),
            role: failed.role.clone(),
            text: Some(failed.text.clone()),
            legend: Some(self.legend(&failed.text, see, version, lang)),
            see_reference: see.map(str::to_string),
        })
    }

    /// Legend of a message: identifiers named in the text, then the `see`
    /// reference when the text does not already name it.
    pub fn legend(
        &self,
        text: &str,
        see: Option<&str>,
        version: &SdkVersion,
        lang: &str,
    ) -> String {
        let mut ids = legend_identifiers(text);
        if let Some(see) = see.filter(|see| !ids.contains(see)) {
            ids.push(see);
        }
        let fragments: Vec<String> = ids
            .into_iter()
            .filter_map(|id| {
                let label = self.labels.lookup(version, lang, id);
                if label.is_none() {
                    debug!(id, "no label for legend identifier");
                }
                legend_fragment(id, &label?)
            })
            .collect();
        join_legend(&fragments)
    }
}

fn fired_item(number: usize, fired: &FiredRule) -> AnnotatedItem {
    AnnotatedItem {
        index: format!("{FIRED_PREFIX}{number}"),
        location: fired.context.clone(),
        ..AnnotatedItem::default()
    }
}

/// Parses and annotates a report with `labels`; see
/// [`ReportExtractor::parse_report`].
pub fn parse_report<L: LabelLookup + ?Sized>(
    report_text: &str,
    version: &SdkVersion,
    lang: &str,
    labels: &L,
) -> Result<AnnotatedReport> {
    ReportExtractor::new(labels).parse_report(report_text, version, lang)
}
