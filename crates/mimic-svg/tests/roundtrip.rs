use anyhow::Result;
use mimic_svg::{SvgDocument, SvgNode};

const EXPORTED_DIAGRAM: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported from the diagram editor -->
<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300">
  <defs>
    <linearGradient id="shade" x1="0%" y1="0%" x2="0%" y2="100%">
      <stop offset="0%" stop-color="#ffffff"/>
      <stop offset="100%" stop-color="#000000"/>
    </linearGradient>
  </defs>
  <g id="tanks">
    <rect id="TANK_01" x="40" y="60" width="80" height="160" fill="#e0e0e0" stroke="#333"/>
    <text id="TANK_01_label" x="80" y="240">--</text>
  </g>
</svg>"##;

#[test]
fn parses_realistic_export() -> Result<()> {
    let doc = SvgDocument::parse(EXPORTED_DIAGRAM)?;

    assert_eq!(doc.decl.as_ref().map(|d| d.version.as_str()), Some("1.0"));
    assert_eq!(
        doc.prolog,
        vec![SvgNode::Comment(" exported from the diagram editor ".into())]
    );
    assert_eq!(doc.root.attr("xmlns"), Some("http://www.w3.org/2000/svg"));

    let tank = doc.find_by_id("TANK_01").expect("rect is reachable by id");
    assert_eq!(tank.local_name(), "rect");
    assert_eq!(tank.attr("fill"), Some("#e0e0e0"));

    let gradient = doc.find_by_id("shade").expect("gradient inside defs");
    assert_eq!(gradient.child_elements().count(), 2);
    Ok(())
}

#[test]
fn inner_layout_survives_a_round_trip() -> Result<()> {
    let doc = SvgDocument::parse(EXPORTED_DIAGRAM)?;
    let out = doc.to_xml()?;

    // Whitespace inside the root element is kept verbatim; only the
    // newlines between top-level nodes are compacted away.
    assert!(
        out.contains("\n  <g id=\"tanks\">\n    <rect id=\"TANK_01\""),
        "child indentation should be preserved"
    );
    assert!(out.contains(">--</text>"), "label text should be preserved");

    let reparsed = SvgDocument::parse(&out)?;
    assert_eq!(reparsed.root, doc.root, "reparsing its own output is lossless");
    Ok(())
}

#[test]
fn edits_are_visible_after_serialization() -> Result<()> {
    let mut doc = SvgDocument::parse(EXPORTED_DIAGRAM)?;

    let label = doc
        .find_by_id_mut("TANK_01_label")
        .expect("label is reachable by id");
    label.set_text("73.5");
    label.set_attr("fill", "#003366");

    let out = doc.to_xml()?;
    let reparsed = SvgDocument::parse(&out)?;
    let label = reparsed.find_by_id("TANK_01_label").expect("label survives");
    assert_eq!(label.text_content(), "73.5");
    assert_eq!(label.attr("fill"), Some("#003366"));
    Ok(())
}

#[test]
fn single_line_documents_round_trip_byte_for_byte() -> Result<()> {
    let input = r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="a"><circle id="c" r="4"/></g></svg>"#;
    let doc = SvgDocument::parse(input)?;
    assert_eq!(doc.to_xml()?, input);
    Ok(())
}
