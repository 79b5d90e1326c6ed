use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Business categories whose unused repeatable groups get pruned, in the
/// order the pruner applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PruneCategory {
    TouchPoint,
    BeneficialOwner,
    TenderingParty,
    LotTender,
    SettledContract,
}

impl PruneCategory {
    pub const ALL: [PruneCategory; 5] = [
        PruneCategory::TouchPoint,
        PruneCategory::BeneficialOwner,
        PruneCategory::TenderingParty,
        PruneCategory::LotTender,
        PruneCategory::SettledContract,
    ];

    /// Short code used in rule file names (`prune-TPO.json`).
    pub fn code(self) -> &'static str {
        match self {
            PruneCategory::TouchPoint => "TPO",
            PruneCategory::BeneficialOwner => "UBO",
            PruneCategory::TenderingParty => "TPA",
            PruneCategory::LotTender => "TEN",
            PruneCategory::SettledContract => "CON",
        }
    }

    /// Identifier of the repeatable group instances this category prunes.
    pub fn group_marker(self) -> &'static str {
        match self {
            PruneCategory::TouchPoint => "GR-Touch-Point",
            PruneCategory::BeneficialOwner => "GR-UBO",
            PruneCategory::TenderingParty => "GR-TenderingParty",
            PruneCategory::LotTender => "GR-LotTender",
            PruneCategory::SettledContract => "GR-SettledContract",
        }
    }

    /// Identifier of the field holding the group instance's technical id
    /// (`TPO-0001`, `ORG-0007`, ...).
    pub fn field_marker(self) -> &'static str {
        match self {
            PruneCategory::TouchPoint => "OPT-201-Organization-TouchPoint",
            PruneCategory::BeneficialOwner => "OPT-202-UBO",
            PruneCategory::TenderingParty => "OPT-210-Tenderer",
            PruneCategory::LotTender => "OPT-321-Tender",
            PruneCategory::SettledContract => "OPT-316-Contract",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, ModelError> {
        Self::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ModelError::UnknownCategory {
                code: code.to_string(),
            })
    }
}

impl fmt::Display for PruneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A dot-separated chain of identifiers addressing a field inside a group
/// instance: `BT-500-Organization-TouchPoint` or
/// `GR-Touch-Point-Address.BT-510(a)-Organization-TouchPoint`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidFieldPath {
                value: value.to_string(),
                message: "path is empty".to_string(),
            });
        }
        let segments: Vec<String> = trimmed.split('.').map(str::to_string).collect();
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(ModelError::InvalidFieldPath {
                value: value.to_string(),
                message: "path has an empty segment".to_string(),
            });
        }
        Ok(Self { segments })
    }

    /// Group identifiers to descend through, outermost first.
    pub fn groups(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// Identifier of the terminal field.
    pub fn field(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl TryFrom<String> for FieldPath {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(value: FieldPath) -> Self {
        value.to_string()
    }
}

/// Rule table of one category: notice subtype -> field paths that must all be
/// empty for a group instance to count as unused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRuleSet {
    by_sub_type: BTreeMap<String, BTreeSet<FieldPath>>,
}

impl FieldRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sub_type: impl Into<String>, paths: BTreeSet<FieldPath>) {
        self.by_sub_type.insert(sub_type.into(), paths);
    }

    #[must_use]
    pub fn with(mut self, sub_type: impl Into<String>, paths: &[&str]) -> Self {
        let parsed = paths
            .iter()
            .filter_map(|path| FieldPath::parse(path).ok())
            .collect();
        self.insert(sub_type, parsed);
        self
    }

    pub fn paths_for(&self, sub_type: &str) -> Option<&BTreeSet<FieldPath>> {
        self.by_sub_type.get(sub_type)
    }

    pub fn sub_types(&self) -> impl Iterator<Item = &str> {
        self.by_sub_type.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_sub_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sub_type.is_empty()
    }
}

/// All five category rule tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneRules {
    categories: BTreeMap<PruneCategory, FieldRuleSet>,
}

impl PruneRules {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, category: PruneCategory, rules: FieldRuleSet) -> Self {
        self.categories.insert(category, rules);
        self
    }

    pub fn set_category(&mut self, category: PruneCategory, rules: FieldRuleSet) {
        self.categories.insert(category, rules);
    }

    pub fn category(&self, category: PruneCategory) -> Option<&FieldRuleSet> {
        self.categories.get(&category)
    }

    pub fn paths_for(&self, category: PruneCategory, sub_type: &str) -> Option<&BTreeSet<FieldPath>> {
        self.category(category)?.paths_for(sub_type)
    }
}
