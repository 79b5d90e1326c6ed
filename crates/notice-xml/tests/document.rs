//! Round-trip and mutation behaviour of the XML arena.

use notice_xml::{NodeKind, XmlDocument, XmlError};

const NOTICE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ContractNotice xmlns="urn:x" xmlns:cbc="urn:cbc">
  <!-- version marker -->
  <cbc:CustomizationID>eforms-sdk-1.10</cbc:CustomizationID>
  <cbc:Note languageID="ENG" kind="a &amp; b">Tom &amp; Jerry &#233;</cbc:Note>
  <Empty/>
  <Data><![CDATA[<raw>]]></Data>
</ContractNotice>"#;

#[test]
fn unchanged_document_round_trips_byte_for_byte() {
    let doc = XmlDocument::parse(NOTICE).expect("parse notice");
    assert_eq!(doc.to_xml_string().expect("write notice"), NOTICE);
}

#[test]
fn text_and_attributes_are_unescaped_on_read() {
    let doc = XmlDocument::parse(NOTICE).expect("parse notice");
    let root = doc.document_element().expect("root element");
    let note = doc.find_child_element(root, "cbc:Note").expect("note");
    assert_eq!(doc.text_content(note).expect("text"), "Tom & Jerry \u{e9}");
    assert_eq!(
        doc.attribute_value(note, "kind").expect("attribute").as_deref(),
        Some("a & b")
    );
    assert_eq!(
        doc.attribute_value(note, "languageID").expect("attribute").as_deref(),
        Some("ENG")
    );
    let data = doc.find_child_element(root, "Data").expect("data");
    assert_eq!(doc.text_content(data).expect("cdata"), "<raw>");
}

#[test]
fn entity_references_stay_in_one_text_node() {
    let doc = XmlDocument::parse("<a>x &lt; y &amp;&amp; z</a>").expect("parse");
    let root = doc.document_element().expect("root");
    assert_eq!(doc.children(root).len(), 1);
    assert!(matches!(doc.kind(doc.children(root)[0]), NodeKind::Text(raw) if raw == "x &lt; y &amp;&amp; z"));
}

#[test]
fn moving_a_node_keeps_its_subtree() {
    let mut doc = XmlDocument::parse("<r><b><x/></b><a/></r>").expect("parse");
    let root = doc.document_element().expect("root");
    let b = doc.find_child_element(root, "b").expect("b");
    doc.move_to_end(b);
    assert_eq!(doc.to_xml_string().expect("write"), "<r><a/><b><x/></b></r>");
    assert_eq!(doc.parent(b), Some(root));
}

#[test]
fn prolog_and_comments_survive_a_move() {
    let source = "<?xml version=\"1.0\"?>\n<!-- header -->\n<r>\n  <b>2</b>\n  <!-- first -->\n  <a x=\"1\">&amp;</a>\n</r>";
    let mut doc = XmlDocument::parse(source).expect("parse");
    let root = doc.document_element().expect("root");
    let b = doc.find_child_element(root, "b").expect("b");
    let indent = doc.previous_sibling(b).expect("indent");
    doc.move_to_end(indent);
    doc.move_to_end(b);
    insta::assert_snapshot!(doc.to_xml_string().expect("write"), @r#"
    <?xml version="1.0"?>
    <!-- header -->
    <r>
      <!-- first -->
      <a x="1">&amp;</a>

      <b>2</b></r>
    "#);
}

#[test]
fn single_quoted_attributes_are_written_with_double_quotes() {
    let doc = XmlDocument::parse(r#"<r a='say "hi"' b='x'/>"#).expect("parse");
    assert_eq!(
        doc.to_xml_string().expect("write"),
        r#"<r a="say &quot;hi&quot;" b="x"/>"#
    );
}

#[test]
fn emptied_element_is_written_with_both_tags() {
    let mut doc = XmlDocument::parse("<r><a>text</a></r>").expect("parse");
    let root = doc.document_element().expect("root");
    let a = doc.find_child_element(root, "a").expect("a");
    let text = doc.children(a)[0];
    doc.detach(text);
    assert_eq!(doc.to_xml_string().expect("write"), "<r><a></a></r>");
}

#[test]
fn formatting_nodes_are_comments_and_whitespace() {
    let doc = XmlDocument::parse("<r>\n  <!-- c --><a/>text<b/></r>").expect("parse");
    let root = doc.document_element().expect("root");
    let kinds: Vec<bool> = doc
        .children(root)
        .iter()
        .map(|&id| doc.is_formatting(id))
        .collect();
    assert_eq!(kinds, vec![true, true, false, false, false]);
    let b = doc.find_child_element(root, "b").expect("b");
    let previous = doc.previous_sibling(b).expect("previous");
    assert!(matches!(doc.kind(previous), NodeKind::Text(raw) if raw == "text"));
}

#[test]
fn malformed_input_is_rejected() {
    assert!(matches!(
        XmlDocument::parse("<a><b></a>"),
        Err(XmlError::Malformed { .. } | XmlError::UnbalancedEnd { .. })
    ));
    assert!(matches!(
        XmlDocument::parse("<a>"),
        Err(XmlError::Malformed { .. })
    ));
    assert!(matches!(
        XmlDocument::parse("<!-- only a comment -->"),
        Err(XmlError::MissingRoot)
    ));
}
