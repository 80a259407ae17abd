use std::collections::HashMap;

use anyhow::Result;
use mimic_bind::{Binding, BindingKind, Direction, GradientSpec, ParamValue, UpdateEngine, encode};
use mimic_svg::SvgDocument;

const DIAGRAM: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="300"><rect id="TANK_01" x="40" y="40" width="80" height="200" stroke="#333333"/><text id="TANK_01_READOUT" x="80" y="270">--</text></svg>"##;

/// Annotates a small tank diagram and plays a few live values into it.
///
/// Run with: cargo run -p mimic-bind --example tank_level
fn main() -> Result<()> {
    let mut doc = SvgDocument::parse(DIAGRAM)?;

    encode(
        &mut doc,
        &Binding::new(
            "TANK_01",
            "TANK_01_LEVEL",
            BindingKind::GradientLevel(GradientSpec {
                direction: Direction::BottomToTop,
                min: 0.0,
                max: 200.0,
                fill_color: "#0066cc".into(),
                empty_color: "#e0e0e0".into(),
            }),
        ),
    )?;
    encode(
        &mut doc,
        &Binding::new("TANK_01_READOUT", "TANK_01_LEVEL", BindingKind::Text),
    )?;

    println!("=== Annotated diagram ===");
    println!("{}", doc.to_xml()?);
    println!();

    let mut engine = UpdateEngine::new();
    for level in [50.0, 135.0, 200.0] {
        let snapshot = HashMap::from([("TANK_01_LEVEL".to_string(), ParamValue::from(level))]);
        engine.apply(&mut doc, &snapshot);
        println!("=== After TANK_01_LEVEL = {} ===", level);
        println!("{}", doc.to_xml()?);
        println!();
    }
    Ok(())
}
