use std::fs;
use std::path::{Path, PathBuf};

use notice_model::{LabelLookup, PruneCategory, SdkVersion};
use notice_sdk::{
    SdkError, SdkRegistry, available_versions, find_version_dir, load_label_table,
    load_prune_rules, load_schema_order_table, paths,
};

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "notice-sdk-{}-{}-{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    dir
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write fixture");
}

fn bundled_version_dir() -> PathBuf {
    let sdk = paths::sdk_dir(&paths::resources_root());
    find_version_dir(&sdk, SdkVersion::new(1, 10, None))
        .expect("bundled SDK 1.10")
        .path
}

#[test]
fn bundled_prune_rules_cover_every_category() {
    let rules = load_prune_rules(&paths::prune_rules_dir(&paths::resources_root()))
        .expect("load prune rules");
    for category in PruneCategory::ALL {
        assert!(rules.category(category).is_some(), "{category} missing");
    }
    let touch_point = rules
        .paths_for(PruneCategory::TouchPoint, "16")
        .expect("TPO rules for subtype 16");
    assert!(
        touch_point
            .iter()
            .any(|path| path.to_string() == "GR-Touch-Point-Address.BT-513-Organization-TouchPoint")
    );
    assert!(rules.paths_for(PruneCategory::TouchPoint, "1").is_none());
}

#[test]
fn missing_rule_file_leaves_category_unconfigured() {
    let dir = unique_temp_dir("rules-missing");
    write(&dir.join("prune-UBO.json"), r#"{"16": ["BT-706-UBO"]}"#);
    let rules = load_prune_rules(&dir).expect("load");
    assert!(rules.category(PruneCategory::TouchPoint).is_none());
    assert!(rules.category(PruneCategory::BeneficialOwner).is_some());
}

#[test]
fn empty_path_list_is_rejected() {
    let dir = unique_temp_dir("rules-empty");
    write(&dir.join("prune-TPO.json"), r#"{"16": []}"#);
    let error = load_prune_rules(&dir).expect_err("empty list");
    assert!(matches!(error, SdkError::InvalidRuleTable { .. }), "{error}");

    write(&dir.join("prune-TPO.json"), r#"{"16": ["GR-A..BT-1"]}"#);
    let error = load_prune_rules(&dir).expect_err("empty segment");
    assert!(matches!(error, SdkError::InvalidRuleTable { .. }), "{error}");
}

#[test]
fn schema_table_keeps_metadata_order() {
    let dir = bundled_version_dir();
    let table = load_schema_order_table(&dir, SdkVersion::new(1, 10, Some(0)), "ContractNotice")
        .expect("order table");
    assert_eq!(
        table.main_schema_path(),
        Some("schemas/maindoc/UBL-ContractNotice-2.3.xsd")
    );
    let children = table.children_by_parent();
    assert_eq!(
        children.get("ND-Root").expect("root children"),
        &vec![
            "ND-RootExtension".to_string(),
            "ND-ProcedureProcurementScope".to_string(),
            "ND-Lot".to_string(),
            "OPT-002-notice".to_string(),
            "BT-701-notice".to_string(),
            "BT-05(a)-notice".to_string(),
        ]
    );
    let lot = table.entry("ND-Lot").expect("lot node");
    insta::assert_json_snapshot!(lot, @r#"
    {
      "id": "ND-Lot",
      "parent_id": "ND-Root",
      "xpath_absolute": "/*/cac:ProcurementProjectLot[cbc:ID/@schemeName='Lot']",
      "xpath_relative": "cac:ProcurementProjectLot[cbc:ID/@schemeName='Lot']",
      "sequence_order": [
        {
          "element": "cac:ProcurementProjectLot",
          "order": 31
        }
      ],
      "is_node": true
    }
    "#);
}

#[test]
fn unknown_document_type_is_an_error() {
    let dir = bundled_version_dir();
    let error = load_schema_order_table(&dir, SdkVersion::new(1, 10, None), "XYZ")
        .expect_err("unknown type");
    assert!(matches!(error, SdkError::UnknownDocumentType { .. }));
}

#[test]
fn missing_language_falls_back_to_english_keys() {
    let dir = bundled_version_dir();
    let italian = load_label_table(&dir, "it").expect("italian labels");
    assert_eq!(
        italian.get("BT-21-Procedure").and_then(|l| l.name.as_deref()),
        Some("Titolo")
    );
    // group_it.xml is absent: keys come from English with empty text.
    assert_eq!(
        italian.get("GR-Lot").and_then(|l| l.name.as_deref()),
        Some("")
    );
}

#[test]
fn translation_entries_are_unescaped() {
    let root = unique_temp_dir("translations");
    let version_dir = root.join("1.9.1");
    write(
        &version_dir.join("translations/field_en.xml"),
        r#"<properties><entry key="field|name|BT-1">Tom &amp; Jerry</entry><entry key="field|hint|BT-1"/></properties>"#,
    );
    write(
        &version_dir.join("translations/group_en.xml"),
        r#"<properties><entry key="group|name|GR-1"><![CDATA[<b>]]></entry></properties>"#,
    );
    let table = load_label_table(&version_dir, "EN").expect("labels");
    let field = table.get("BT-1").expect("BT-1");
    assert_eq!(field.name.as_deref(), Some("Tom & Jerry"));
    assert_eq!(field.hint.as_deref(), Some(""));
    assert_eq!(
        table.get("GR-1").and_then(|l| l.name.as_deref()),
        Some("<b>")
    );
}

#[test]
fn version_directories_resolve_by_minor() {
    let root = unique_temp_dir("versions");
    for name in ["1.9.0", "1.10.0", "1.10.3", "notes"] {
        fs::create_dir_all(root.join(name)).expect("mkdir");
    }
    let versions: Vec<String> = available_versions(&root)
        .expect("list")
        .into_iter()
        .map(|dir| dir.version.to_string())
        .collect();
    assert_eq!(versions, vec!["1.9.0", "1.10.0", "1.10.3"]);

    let latest = find_version_dir(&root, SdkVersion::parse("eforms-sdk-1.10").expect("v"))
        .expect("1.10");
    assert_eq!(latest.version, SdkVersion::new(1, 10, Some(3)));
    let exact = find_version_dir(&root, SdkVersion::new(1, 10, Some(0))).expect("1.10.0");
    assert_eq!(exact.version, SdkVersion::new(1, 10, Some(0)));
    assert!(matches!(
        find_version_dir(&root, SdkVersion::new(1, 11, None)),
        Err(SdkError::MissingVersion { .. })
    ));
}

#[test]
fn registry_bundles_everything() {
    let registry = SdkRegistry::load(
        &paths::resources_root(),
        &[SdkVersion::new(1, 10, None)],
        &["en", "it"],
    )
    .expect("registry");
    let version = SdkVersion::new(1, 10, Some(7));
    assert!(registry.has_labels(&version, "EN"));
    assert!(!registry.has_labels(&version, "de"));
    assert!(registry.order_table(version, "CN").is_some());
    assert!(registry.order_table(version, "ContractNotice").is_some());
    assert!(registry.order_table(version, "Unknown").is_none());
    assert_eq!(registry.document_types(version).len(), 3);
    assert_eq!(
        registry.versions().collect::<Vec<_>>(),
        vec![SdkVersion::new(1, 10, None)]
    );
}
