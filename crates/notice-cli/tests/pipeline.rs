//! Integration tests for the pipeline module, run against the bundled
//! resources and demo inputs.

use notice_model::{PruneCategory, SdkVersion};
use notice_sdk::{SdkRegistry, load_prune_rules, paths};
use notice_sort::SortOutcome;

use notice_cli::pipeline::{annotate_report, prune_model, sort_notice};

const VISUAL_MODEL: &str = include_str!("../../../demos/visual-model.json");
const CONTRACT_NOTICE: &str = include_str!("../../../demos/contract-notice.xml");
const VALIDATION_REPORT: &str = include_str!("../../../demos/validation-report.xml");

const VERSION: SdkVersion = SdkVersion::new(1, 10, None);

fn registry(languages: &[&str]) -> SdkRegistry {
    SdkRegistry::load(&paths::resources_root(), &[VERSION], languages).expect("load registry")
}

#[test]
fn prune_removes_the_blank_touch_point() {
    let rules = load_prune_rules(&paths::prune_rules_dir(&paths::resources_root()))
        .expect("load rules");

    let pruned = prune_model(VISUAL_MODEL, &rules, None).expect("prune");

    assert_eq!(pruned.summary.notice_sub_type, "16");
    assert_eq!(pruned.summary.removed(PruneCategory::TouchPoint), 1);
    assert_eq!(pruned.summary.total_removed(), 1);
    assert!(pruned.json.contains("TPO-0001"));
    assert!(!pruned.json.contains("TPO-0002"));
    // Keys the pruner does not know about survive the round trip.
    assert!(pruned.json.contains("\"noticeSubType\": \"16\""));
    assert!(pruned.json.contains("\"type\": \"group\""));
}

#[test]
fn prune_with_other_subtype_uses_its_rules() {
    let rules = load_prune_rules(&paths::prune_rules_dir(&paths::resources_root()))
        .expect("load rules");
    // Subtype 29 only checks the name and e-mail, so the address fields do not matter.
    let pruned = prune_model(VISUAL_MODEL, &rules, Some("29")).expect("prune");
    assert_eq!(pruned.summary.notice_sub_type, "29");
    assert_eq!(pruned.summary.removed(PruneCategory::TouchPoint), 1);
}

#[test]
fn prune_rejects_invalid_json() {
    let rules = load_prune_rules(&paths::prune_rules_dir(&paths::resources_root()))
        .expect("load rules");
    let error = prune_model("{not json", &rules, None).expect_err("invalid json");
    assert!(format!("{error:#}").starts_with("parse visual model"));
}

#[test]
fn sort_detects_document_type_from_root() {
    let registry = registry(&[]);

    let sorted = sort_notice(CONTRACT_NOTICE, &registry, VERSION, None).expect("sort");

    assert_eq!(sorted.document_type, "ContractNotice");
    assert_eq!(sorted.outcome, SortOutcome::Sorted { moved_elements: 12 });
    let extensions = sorted.xml.find("<ext:UBLExtensions>").expect("extensions");
    let lot = sorted.xml.find("<cac:ProcurementProjectLot>").expect("lot");
    assert!(extensions < lot);

    let again = sort_notice(&sorted.xml, &registry, VERSION, Some("CN")).expect("sort again");
    assert_eq!(again.outcome, SortOutcome::Sorted { moved_elements: 0 });
    assert_eq!(again.xml, sorted.xml);
}

#[test]
fn sort_reports_unknown_document_type() {
    let registry = registry(&[]);
    let error = sort_notice(CONTRACT_NOTICE, &registry, VERSION, Some("XYZ"))
        .expect_err("unknown type");
    assert!(error.to_string().contains("XYZ"));
}

#[test]
fn sort_rejects_other_sdk_versions() {
    let registry = registry(&[]);
    let older = CONTRACT_NOTICE.replace("eforms-sdk-1.10", "eforms-sdk-1.9");
    assert!(sort_notice(&older, &registry, VERSION, None).is_err());
}

#[test]
fn report_keeps_failures_and_skips_notice() {
    let registry = registry(&["en"]);

    let report = annotate_report(
        VALIDATION_REPORT,
        &registry,
        VERSION,
        "en",
        Some(CONTRACT_NOTICE),
    )
    .expect("annotate");

    assert_eq!((report.total_fired, report.total_failed), (2, 1));
    assert!(report.notice_xml.is_none());
    insta::assert_json_snapshot!(report.items[0], @r#"
    {
      "index": "KO-1",
      "id": "BR-BT-00021-0100",
      "location": "/cn:ContractNotice/cac:ProcurementProjectLot[1]/cac:ProcurementProject",
      "lotNumber": 0,
      "sectionIndices": [
        0
      ],
      "test": "cbc:Name",
      "role": "ERROR",
      "text": "Title (BT-21-Lot) is mandatory in lot 'LOT-0001'",
      "legend": "BT-21-Lot - Title. - Short title of the lot.",
      "seeReference": "BT-21-Lot"
    }
    "#);
}

#[test]
fn clean_report_carries_the_notice() {
    let registry = registry(&["en"]);
    let clean = r#"<svrl:schematron-output xmlns:svrl="http://purl.oclc.org/dsdl/svrl">
  <svrl:fired-rule context="/*"/>
</svrl:schematron-output>"#;

    let report = annotate_report(clean, &registry, VERSION, "en", Some(CONTRACT_NOTICE))
        .expect("annotate");

    assert_eq!(report.notice_xml.as_deref(), Some(CONTRACT_NOTICE));
}

#[test]
fn report_needs_loaded_language() {
    let registry = registry(&["en"]);
    let error = annotate_report(VALIDATION_REPORT, &registry, VERSION, "it", None)
        .expect_err("italian not loaded");
    assert!(format!("{error:#}").contains("no labels loaded"));
}
