use serde::{Deserialize, Serialize};

/// Prefix of items built from failed asserts.
pub const FAILED_PREFIX: &str = "KO-";
/// Prefix of items built from fired rules.
pub const FIRED_PREFIX: &str = "OK-";

/// A rule whose context matched somewhere in the notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredRule {
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReference {
    pub see: Option<String>,
}

/// An assertion that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAssert {
    pub id: Option<String>,
    pub location: String,
    pub test: Option<String>,
    pub role: Option<String>,
    pub text: String,
    pub diagnostic_reference: Option<DiagnosticReference>,
}

impl FailedAssert {
    pub fn see(&self) -> Option<&str> {
        self.diagnostic_reference.as_ref()?.see.as_deref()
    }
}

/// Parsed rule-validation (SVRL) report, items in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub fired_rules: Vec<FiredRule>,
    pub failed_asserts: Vec<FailedAssert>,
}

/// One row of the annotated report, as returned to the notice editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedItem {
    pub index: String,
    pub id: Option<String>,
    pub location: String,
    /// First section index; `-1` for a `[0]` predicate.
    pub lot_number: Option<i64>,
    #[serde(default)]
    pub section_indices: Vec<i64>,
    pub test: Option<String>,
    pub role: Option<String>,
    pub text: Option<String>,
    pub legend: Option<String>,
    pub see_reference: Option<String>,
}

impl AnnotatedItem {
    pub fn is_failure(&self) -> bool {
        self.index.starts_with(FAILED_PREFIX)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedReport {
    pub total_fired: usize,
    pub total_failed: usize,
    pub items: Vec<AnnotatedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice_xml: Option<String>,
}

impl AnnotatedReport {
    pub fn is_clean(&self) -> bool {
        self.total_failed == 0
    }

    /// Attaches the validated notice text, but only to a report without
    /// failed asserts. Returns whether the text was attached.
    pub fn attach_notice_xml(&mut self, xml: impl Into<String>) -> bool {
        if !self.is_clean() {
            return false;
        }
        self.notice_xml = Some(xml.into());
        true
    }

    pub fn failures(&self) -> impl Iterator<Item = &AnnotatedItem> {
        self.items.iter().filter(|item| item.is_failure())
    }
}
