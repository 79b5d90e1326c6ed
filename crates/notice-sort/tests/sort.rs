use notice_model::{SchemaEntry, SchemaOrderTable, SdkVersion, SequenceOrder};
use notice_sdk::{load_schema_order_table, paths};
use notice_sort::{NoticeSorter, SortError, SortOutcome};
use notice_xml::XmlDocument;
use proptest::prelude::*;

fn entry(id: &str, parent: Option<&str>, absolute: &str, order: Option<(&str, i64)>) -> SchemaEntry {
    SchemaEntry {
        id: id.to_string(),
        parent_id: parent.map(str::to_string),
        xpath_absolute: absolute.to_string(),
        xpath_relative: absolute.rsplit('/').next().unwrap_or_default().to_string(),
        sequence_order: order
            .map(|(element, order)| SequenceOrder {
                element: element.to_string(),
                order,
            })
            .into_iter()
            .collect(),
        is_node: id.starts_with("ND-"),
    }
}

/// Root with the version marker first and then the given elements in order.
fn flat_table(elements: &[&str], schema: Option<&str>) -> SchemaOrderTable {
    let mut entries = vec![
        entry("ND-Root", None, "/*", None),
        entry(
            "OPT-002-notice",
            Some("ND-Root"),
            "/*/cbc:CustomizationID",
            Some(("cbc:CustomizationID", 0)),
        ),
    ];
    for (position, name) in elements.iter().enumerate() {
        entries.push(entry(
            &format!("BT-{name}"),
            Some("ND-Root"),
            &format!("/*/{name}"),
            Some((name, i64::try_from(position).unwrap_or_default() + 1)),
        ));
    }
    SchemaOrderTable::new(
        SdkVersion::new(1, 10, Some(0)),
        schema.map(str::to_string),
        entries,
    )
}

const MARKER: &str = "<cbc:CustomizationID>eforms-sdk-1.10</cbc:CustomizationID>";

#[test]
fn comment_moves_with_its_element() {
    let table = flat_table(&["A", "B"], Some("schema.xsd"));
    let input = format!("<r xmlns:cbc=\"urn:cbc\">{MARKER}<B/><!-- about A --><A/></r>");

    let (output, outcome) = NoticeSorter::new(&table).sort_xml(&input).expect("sort");

    assert_eq!(
        output,
        format!("<r xmlns:cbc=\"urn:cbc\">{MARKER}<!-- about A --><A/><B/></r>")
    );
    assert_eq!(outcome, SortOutcome::Sorted { moved_elements: 2 });
}

#[test]
fn unordered_children_keep_their_place() {
    let mut table_entries = flat_table(&["A", "B"], Some("schema.xsd")).entries().to_vec();
    table_entries.push(entry("BT-X", Some("ND-Root"), "/*/X", None));
    let table = SchemaOrderTable::new(
        SdkVersion::new(1, 10, None),
        Some("schema.xsd".to_string()),
        table_entries,
    );
    let input = format!("<r>{MARKER}<X/><B/><A/></r>");

    let (output, _) = NoticeSorter::new(&table).sort_xml(&input).expect("sort");
    assert_eq!(output, format!("<r><X/>{MARKER}<A/><B/></r>"));
}

#[test]
fn repeated_elements_keep_relative_order() {
    let table = flat_table(&["A", "B"], Some("schema.xsd"));
    let input = format!(r#"<r><B n="1"/>{MARKER}<A n="1" m="x"/><B n="2"/><A n="2"/></r>"#);

    let (output, _) = NoticeSorter::new(&table).sort_xml(&input).expect("sort");
    assert_eq!(
        output,
        format!(r#"<r>{MARKER}<A n="1" m="x"/><A n="2"/><B n="1"/><B n="2"/></r>"#)
    );
}

#[test]
fn version_marker_is_checked() {
    let table = flat_table(&["A"], Some("schema.xsd"));
    let sorter = NoticeSorter::new(&table);

    let older = "<r><cbc:CustomizationID>eforms-sdk-1.9</cbc:CustomizationID></r>";
    assert!(matches!(
        sorter.sort_xml(older),
        Err(SortError::VersionMismatch { .. })
    ));

    assert!(matches!(
        sorter.sort_xml("<r><A/></r>"),
        Err(SortError::MissingVersionMarker { .. })
    ));

    let garbage = "<r><cbc:CustomizationID>latest</cbc:CustomizationID></r>";
    assert!(matches!(
        sorter.sort_xml(garbage),
        Err(SortError::InvalidVersionMarker { .. })
    ));

    let patched = "<r><cbc:CustomizationID>eforms-sdk-1.10.4</cbc:CustomizationID><A/></r>";
    assert!(sorter.sort_xml(patched).is_ok());
}

#[test]
fn missing_main_schema_leaves_document_untouched() {
    let table = flat_table(&["A", "B"], None);
    let input = format!("<r>{MARKER}<B/><A/></r>");
    let mut doc = XmlDocument::parse(&input).expect("parse");

    let outcome = NoticeSorter::new(&table).sort(&mut doc).expect("sort");

    assert_eq!(outcome, SortOutcome::Unsupported);
    assert_eq!(doc.to_xml_string().expect("write"), input);
}

#[test]
fn bad_path_aborts_the_sort() {
    let mut entries = flat_table(&["A"], Some("schema.xsd")).entries().to_vec();
    entries.push(entry("ND-Broken", Some("ND-Root"), "/*/A[", Some(("A", 9))));
    entries.push(entry("BT-Child", Some("ND-Broken"), "/*/A[/B", Some(("B", 1))));
    let table = SchemaOrderTable::new(
        SdkVersion::new(1, 10, None),
        Some("schema.xsd".to_string()),
        entries,
    );
    let result = NoticeSorter::new(&table).sort_xml(&format!("<r>{MARKER}<A/></r>"));
    assert!(matches!(result, Err(SortError::Path { .. })), "{result:?}");
}

const CONTRACT_NOTICE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ContractNotice xmlns="urn:oasis:names:specification:ubl:schema:xsd:ContractNotice-2" xmlns:cac="urn:cac" xmlns:cbc="urn:cbc" xmlns:ext="urn:ext">
  <cac:ProcurementProjectLot>
    <cac:ProcurementProject>
      <cbc:Description>Lot one</cbc:Description>
      <cbc:Name>Lot 1</cbc:Name>
    </cac:ProcurementProject>
    <cbc:ID schemeName="Lot">LOT-0001</cbc:ID>
  </cac:ProcurementProjectLot>
  <cbc:IssueDate>2024-01-01Z</cbc:IssueDate>
  <cac:ProcurementProject>
    <cbc:Description>Works</cbc:Description>
    <!-- procedure title -->
    <cbc:Name>Bridge</cbc:Name>
  </cac:ProcurementProject>
  <cbc:ID schemeName="notice-id">b6a8</cbc:ID>
  <cbc:CustomizationID>eforms-sdk-1.10</cbc:CustomizationID>
  <ext:UBLExtensions>
    <ext:UBLExtension/>
  </ext:UBLExtensions>
</ContractNotice>"#;

#[test]
fn contract_notice_follows_bundled_sdk_order() {
    let sdk = paths::sdk_dir(&paths::resources_root());
    let dir = notice_sdk::find_version_dir(&sdk, SdkVersion::new(1, 10, None)).expect("sdk dir");
    let table = load_schema_order_table(&dir.path, dir.version, "CN").expect("order table");
    let sorter = NoticeSorter::new(&table);

    let (sorted, outcome) = sorter.sort_xml(CONTRACT_NOTICE).expect("sort");
    assert_eq!(outcome, SortOutcome::Sorted { moved_elements: 12 });
    insta::assert_snapshot!(sorted, @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <ContractNotice xmlns="urn:oasis:names:specification:ubl:schema:xsd:ContractNotice-2" xmlns:cac="urn:cac" xmlns:cbc="urn:cbc" xmlns:ext="urn:ext">
      <ext:UBLExtensions>
        <ext:UBLExtension/>
      </ext:UBLExtensions>
      <cbc:CustomizationID>eforms-sdk-1.10</cbc:CustomizationID>
      <cbc:ID schemeName="notice-id">b6a8</cbc:ID>
      <cbc:IssueDate>2024-01-01Z</cbc:IssueDate>
      <cac:ProcurementProject>
        <!-- procedure title -->
        <cbc:Name>Bridge</cbc:Name>
        <cbc:Description>Works</cbc:Description>
      </cac:ProcurementProject>
      <cac:ProcurementProjectLot>
        <cbc:ID schemeName="Lot">LOT-0001</cbc:ID>
        <cac:ProcurementProject>
          <cbc:Name>Lot 1</cbc:Name>
          <cbc:Description>Lot one</cbc:Description>
        </cac:ProcurementProject>
      </cac:ProcurementProjectLot>
    </ContractNotice>
    "#);

    let (again, outcome) = sorter.sort_xml(&sorted).expect("sort again");
    assert_eq!(outcome, SortOutcome::Sorted { moved_elements: 0 });
    assert_eq!(again, sorted);
}

const NAMES: [&str; 5] = ["A", "B", "C", "D", "E"];

proptest! {
    #[test]
    fn any_permutation_sorts_to_schema_order(
        order in Just(NAMES.to_vec()).prop_shuffle(),
        comments in prop::collection::vec(any::<bool>(), NAMES.len()),
        indent in any::<bool>(),
    ) {
        let table = flat_table(&NAMES, Some("schema.xsd"));
        let sep = if indent { "\n  " } else { "" };
        let piece = |name: &str, commented: bool| {
            let comment = if commented { format!("<!--{name}-->{sep}") } else { String::new() };
            format!("{sep}{comment}<{name}/>")
        };

        let mut input = format!("<r>{sep}{MARKER}");
        for (name, commented) in order.iter().zip(&comments) {
            input.push_str(&piece(name, *commented));
        }
        input.push_str(if indent { "\n</r>" } else { "</r>" });

        let mut expected = format!("<r>{sep}{MARKER}");
        for name in NAMES {
            let position = order.iter().position(|n| *n == name).unwrap_or_default();
            expected.push_str(&piece(name, comments[position]));
        }
        expected.push_str(if indent { "\n</r>" } else { "</r>" });

        let sorter = NoticeSorter::new(&table);
        let (sorted, _) = sorter.sort_xml(&input).expect("sort");
        prop_assert_eq!(&sorted, &expected);

        let (again, outcome) = sorter.sort_xml(&sorted).expect("sort again");
        prop_assert_eq!(again, sorted);
        prop_assert_eq!(outcome, SortOutcome::Sorted { moved_elements: 0 });
    }
}
