use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::version::SdkVersion;

/// Name, description and hint of a field or group in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldLabel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub hint: Option<String>,
}

impl FieldLabel {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.hint.is_none()
    }
}

/// Label kinds read from translation keys (`field|name|BT-01-notice`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelKind {
    Name,
    Description,
    Hint,
}

impl LabelKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "name" => Some(LabelKind::Name),
            "description" => Some(LabelKind::Description),
            "hint" => Some(LabelKind::Hint),
            _ => None,
        }
    }
}

/// Field and group labels of one SDK version in one language.
///
/// Field and group keys share one namespace: the asset type prefix is
/// dropped on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: HashMap<String, FieldLabel>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, kind: LabelKind, text: impl Into<String>) {
        let label = self.labels.entry(id.to_string()).or_default();
        let text = Some(text.into());
        match kind {
            LabelKind::Name => label.name = text,
            LabelKind::Description => label.description = text,
            LabelKind::Hint => label.hint = text,
        }
    }

    #[must_use]
    pub fn with(mut self, id: &str, kind: LabelKind, text: &str) -> Self {
        self.insert(id, kind, text);
        self
    }

    /// Inserts from a raw translation key like `group|name|GR-Lot`; returns
    /// false when the key is not a name/description/hint key.
    pub fn insert_translation_key(&mut self, key: &str, text: impl Into<String>) -> bool {
        let mut parts = key.splitn(3, '|');
        let (Some(first), Some(second)) = (parts.next(), parts.next()) else {
            return false;
        };
        let (kind, id) = match parts.next() {
            Some(id) => (second, id),
            None => (first, second),
        };
        match LabelKind::parse(kind) {
            Some(kind) => {
                self.insert(id, kind, text);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&FieldLabel> {
        self.labels.get(id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Lookup contract consumed by the report extractor.
pub trait LabelLookup {
    /// Whether a label set exists for the version and language at all.
    fn has_labels(&self, version: &SdkVersion, lang: &str) -> bool;

    fn lookup(&self, version: &SdkVersion, lang: &str, id: &str) -> Option<FieldLabel>;
}

/// Label tables keyed by (`major.minor` version, language code).
#[derive(Debug, Clone, Default)]
pub struct LabelCatalog {
    tables: BTreeMap<(SdkVersion, String), LabelTable>,
}

impl LabelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: SdkVersion, lang: &str, table: LabelTable) {
        self.tables
            .insert((version.without_patch(), lang.to_ascii_lowercase()), table);
    }

    #[must_use]
    pub fn with(mut self, version: SdkVersion, lang: &str, table: LabelTable) -> Self {
        self.insert(version, lang, table);
        self
    }

    pub fn table(&self, version: &SdkVersion, lang: &str) -> Option<&LabelTable> {
        self.tables
            .get(&(version.without_patch(), lang.to_ascii_lowercase()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl LabelLookup for LabelCatalog {
    fn has_labels(&self, version: &SdkVersion, lang: &str) -> bool {
        self.table(version, lang).is_some()
    }

    fn lookup(&self, version: &SdkVersion, lang: &str, id: &str) -> Option<FieldLabel> {
        self.table(version, lang)?.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_keys_drop_asset_type() {
        let mut table = LabelTable::new();
        assert!(table.insert_translation_key("field|name|BT-01-notice", "Legal basis"));
        assert!(table.insert_translation_key("group|description|GR-Lot", "A lot"));
        assert!(!table.insert_translation_key("field|something|BT-01-notice", "x"));
        assert_eq!(
            table.get("BT-01-notice").and_then(|l| l.name.as_deref()),
            Some("Legal basis")
        );
        assert_eq!(
            table.get("GR-Lot").and_then(|l| l.description.as_deref()),
            Some("A lot")
        );
    }

    #[test]
    fn catalog_ignores_patch_and_case() {
        let version = SdkVersion::new(1, 10, Some(2));
        let catalog = LabelCatalog::new().with(
            version,
            "IT",
            LabelTable::new().with("BT-1", LabelKind::Name, "Uno"),
        );
        let lookup_version = SdkVersion::new(1, 10, None);
        assert!(catalog.has_labels(&lookup_version, "it"));
        assert_eq!(
            catalog
                .lookup(&lookup_version, "it", "BT-1")
                .and_then(|l| l.name),
            Some("Uno".to_string())
        );
        assert!(catalog.lookup(&lookup_version, "it", "BT-2").is_none());
    }
}
