use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use notice_model::{FieldPath, FieldRuleSet, PruneCategory, PruneRules};
use tracing::{debug, info};

use crate::error::{Result, SdkError};

/// File name of a category's rule table.
pub fn rule_file_name(category: PruneCategory) -> String {
    format!("prune-{}.json", category.code())
}

/// Loads the five category tables from `dir`.
///
/// A missing file leaves its category unconfigured. Each table maps a
/// notice subtype to dotted field paths; an empty list or a malformed path
/// rejects the whole table.
pub fn load_prune_rules(dir: &Path) -> Result<PruneRules> {
    let mut rules = PruneRules::new();
    for category in PruneCategory::ALL {
        let path = dir.join(rule_file_name(category));
        if !path.is_file() {
            debug!(%category, path = %path.display(), "no prune rule table");
            continue;
        }
        let text = std::fs::read_to_string(&path).map_err(|e| SdkError::io(&path, e))?;
        let table = parse_rule_table(&text, &path)?;
        info!(
            %category,
            sub_types = table.len(),
            "loaded prune rules"
        );
        rules.set_category(category, table);
    }
    Ok(rules)
}

/// Parses one `{subtype: [paths]}` table; `origin` is only used in errors.
pub fn parse_rule_table(text: &str, origin: &Path) -> Result<FieldRuleSet> {
    let raw: BTreeMap<String, Vec<String>> =
        serde_json::from_str(text).map_err(|e| SdkError::json(origin, e))?;
    let mut table = FieldRuleSet::new();
    for (sub_type, paths) in raw {
        if paths.is_empty() {
            return Err(SdkError::InvalidRuleTable {
                path: origin.to_path_buf(),
                message: format!("subtype {sub_type} has no field paths"),
            });
        }
        let mut parsed = BTreeSet::new();
        for path in &paths {
            let field_path = FieldPath::parse(path).map_err(|e| SdkError::InvalidRuleTable {
                path: origin.to_path_buf(),
                message: format!("subtype {sub_type}: {e}"),
            })?;
            parsed.insert(field_path);
        }
        table.insert(sub_type, parsed);
    }
    Ok(table)
}
