#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use notice_model::{
    FieldLabel, LabelCatalog, LabelLookup, PruneRules, SchemaOrderTable, SdkVersion,
};
use tracing::{debug, info};

use crate::error::{Result, SdkError};
use crate::fields::FieldsFile;
use crate::notice_types::{DocumentType, NoticeTypesFile};
use crate::paths;
use crate::rules::load_prune_rules;
use crate::translations::load_label_table;

/// An SDK version directory found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkVersionDir {
    pub version: SdkVersion,
    pub path: PathBuf,
}

/// Lists the version directories under `sdk_dir`, sorted by version.
/// Directories whose name is not a version are skipped.
pub fn available_versions(sdk_dir: &Path) -> Result<Vec<SdkVersionDir>> {
    let entries = std::fs::read_dir(sdk_dir).map_err(|e| SdkError::io(sdk_dir, e))?;
    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SdkError::io(sdk_dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        match SdkVersion::parse(&name) {
            Ok(version) => versions.push(SdkVersionDir { version, path }),
            Err(_) => debug!(directory = %name, "skipping non-version directory"),
        }
    }
    versions.sort_by(|a, b| a.version.cmp(&b.version));
    Ok(versions)
}

/// Picks the directory for `version`: the exact patch when requested and
/// present, else the highest patch of the same `major.minor`.
pub fn find_version_dir(sdk_dir: &Path, version: SdkVersion) -> Result<SdkVersionDir> {
    let candidates: Vec<SdkVersionDir> = available_versions(sdk_dir)?
        .into_iter()
        .filter(|dir| dir.version.same_minor(&version))
        .collect();
    let exact = candidates
        .iter()
        .find(|dir| version.patch.is_some() && dir.version == version);
    exact
        .or_else(|| candidates.last())
        .cloned()
        .ok_or_else(|| SdkError::MissingVersion {
            version,
            root: sdk_dir.to_path_buf(),
        })
}

/// Everything the pipeline reads from the resource tree, loaded once and
/// then shared read-only.
#[derive(Debug, Clone)]
pub struct SdkRegistry {
    root: PathBuf,
    prune_rules: PruneRules,
    document_types: BTreeMap<SdkVersion, Vec<DocumentType>>,
    order_tables: BTreeMap<(SdkVersion, String), SchemaOrderTable>,
    labels: LabelCatalog,
}

impl SdkRegistry {
    /// Loads prune rules, the order tables of every declared document type
    /// of each version, and the labels of each language.
    pub fn load(root: &Path, versions: &[SdkVersion], languages: &[&str]) -> Result<Self> {
        let prune_rules = load_prune_rules(&paths::prune_rules_dir(root))?;
        let sdk_dir = paths::sdk_dir(root);

        let mut document_types = BTreeMap::new();
        let mut order_tables = BTreeMap::new();
        let mut labels = LabelCatalog::new();
        for &requested in versions {
            let dir = find_version_dir(&sdk_dir, requested)?;
            let key = dir.version.without_patch();
            let notice_types = NoticeTypesFile::read(&dir.path)?;
            let entries = FieldsFile::read(&dir.path)?.schema_entries();
            for doc_type in &notice_types.document_types {
                let table = SchemaOrderTable::new(
                    dir.version,
                    doc_type.schema_location.clone(),
                    entries.clone(),
                );
                order_tables.insert((key, doc_type.id.clone()), table);
            }
            for lang in languages {
                labels.insert(dir.version, lang, load_label_table(&dir.path, lang)?);
            }
            info!(
                version = %dir.version,
                document_types = notice_types.document_types.len(),
                languages = languages.len(),
                "loaded SDK version"
            );
            document_types.insert(key, notice_types.document_types);
        }

        Ok(Self {
            root: root.to_path_buf(),
            prune_rules,
            document_types,
            order_tables,
            labels,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prune_rules(&self) -> &PruneRules {
        &self.prune_rules
    }

    pub fn labels(&self) -> &LabelCatalog {
        &self.labels
    }

    /// Loaded versions, without patch.
    pub fn versions(&self) -> impl Iterator<Item = SdkVersion> + '_ {
        self.document_types.keys().copied()
    }

    pub fn document_types(&self, version: SdkVersion) -> &[DocumentType] {
        self.document_types
            .get(&version.without_patch())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Order table by document type id (`CN`) or root element name.
    pub fn order_table(&self, version: SdkVersion, document_type: &str) -> Option<&SchemaOrderTable> {
        let key = version.without_patch();
        let id = self
            .document_types(version)
            .iter()
            .find(|doc_type| {
                doc_type.id == document_type
                    || doc_type.root_element.as_deref() == Some(document_type)
            })
            .map(|doc_type| doc_type.id.clone())?;
        self.order_tables.get(&(key, id))
    }
}

impl LabelLookup for SdkRegistry {
    fn has_labels(&self, version: &SdkVersion, lang: &str) -> bool {
        self.labels.has_labels(version, lang)
    }

    fn lookup(&self, version: &SdkVersion, lang: &str, id: &str) -> Option<FieldLabel> {
        self.labels.lookup(version, lang, id)
    }
}
