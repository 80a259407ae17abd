//! Binding records exchanged with the authoring tool and persisted inside
//! diagram metadata.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attrs;
use crate::error::{BindError, Result};

pub type ElementId = String;
pub type ParamName = String;

/// Values delivered by the data source, keyed by parameter name.
pub type Snapshot = HashMap<ParamName, ParamValue>;

/// One element-to-parameter binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub element_id: ElementId,
    pub param_name: ParamName,
    #[serde(flatten)]
    pub kind: BindingKind,
}

impl Binding {
    pub fn new(element_id: impl Into<String>, param_name: impl Into<String>, kind: BindingKind) -> Self {
        Self {
            element_id: element_id.into(),
            param_name: param_name.into(),
            kind,
        }
    }
}

/// What a bound parameter drives on its element. Closed set: the tag values
/// are part of the exported-diagram format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BindingKind {
    Text,
    GradientLevel(GradientSpec),
    FillColor,
    StrokeColor,
}

impl BindingKind {
    /// Wire value stored in the element's type attribute.
    pub fn tag(&self) -> &'static str {
        match self {
            BindingKind::Text => attrs::TYPE_TEXT,
            BindingKind::GradientLevel(_) => attrs::TYPE_GRADIENT_LEVEL,
            BindingKind::FillColor => attrs::TYPE_FILL_COLOR,
            BindingKind::StrokeColor => attrs::TYPE_STROKE_COLOR,
        }
    }

    pub fn gradient(&self) -> Option<&GradientSpec> {
        match self {
            BindingKind::GradientLevel(spec) => Some(spec),
            _ => None,
        }
    }
}

/// Level-indicator configuration, only present on gradient bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientSpec {
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    #[serde(default = "default_empty_color")]
    pub empty_color: String,
}

impl Default for GradientSpec {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            min: 0.0,
            max: default_max(),
            fill_color: default_fill_color(),
            empty_color: default_empty_color(),
        }
    }
}

fn default_max() -> f64 {
    100.0
}

fn default_fill_color() -> String {
    "#0066cc".to_string()
}

fn default_empty_color() -> String {
    "#e0e0e0".to_string()
}

/// Direction the filled region grows in as the value rises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    BottomToTop,
    TopToBottom,
    LeftToRight,
    RightToLeft,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::BottomToTop
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::BottomToTop => "bottom-to-top",
            Direction::TopToBottom => "top-to-bottom",
            Direction::LeftToRight => "left-to-right",
            Direction::RightToLeft => "right-to-left",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "bottom-to-top" => Some(Direction::BottomToTop),
            "top-to-bottom" => Some(Direction::TopToBottom),
            "left-to-right" => Some(Direction::LeftToRight),
            "right-to-left" => Some(Direction::RightToLeft),
            _ => None,
        }
    }

    /// Gradient axis endpoints `[x1, y1, x2, y2]`, fixed at encode time.
    pub fn axis(self) -> [&'static str; 4] {
        match self {
            Direction::BottomToTop => ["0%", "100%", "0%", "0%"],
            Direction::TopToBottom => ["0%", "0%", "0%", "100%"],
            Direction::LeftToRight => ["0%", "0%", "100%", "0%"],
            Direction::RightToLeft => ["100%", "0%", "0%", "0%"],
        }
    }
}

/// A live value for one parameter. Numeric strings count as numbers for
/// gradient math, so `"42"` and `42` drive a level indicator the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(number) => Some(*number),
            ParamValue::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(number) => write!(f, "{}", number),
            ParamValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// All bindings of one diagram, keyed by element id. This is the
/// `mappingConfig` payload persisted with templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingSet {
    bindings: BTreeMap<ElementId, Binding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the binding for its element. Rejects blank
    /// parameter names so they can never reach a persisted set.
    pub fn insert(&mut self, binding: Binding) -> Result<Option<Binding>> {
        if binding.param_name.trim().is_empty() {
            return Err(BindError::EmptyParamName);
        }
        Ok(self.bindings.insert(binding.element_id.clone(), binding))
    }

    pub fn remove(&mut self, element_id: &str) -> Option<Binding> {
        self.bindings.remove(element_id)
    }

    pub fn get(&self, element_id: &str) -> Option<&Binding> {
        self.bindings.get(element_id)
    }

    pub fn contains(&self, element_id: &str) -> bool {
        self.bindings.contains_key(element_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Envelope stored in the diagram's own metadata so a saved diagram carries
/// its bindings with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramMetadata {
    #[serde(default)]
    pub scada_mappings: BindingSet,
}

impl DiagramMetadata {
    pub fn new(scada_mappings: BindingSet) -> Self {
        Self { scada_mappings }
    }

    pub fn to_embedded_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_embedded_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn binding_serializes_with_flattened_kind_tag() {
        let binding = Binding::new("e1", "PUMP_STATE", BindingKind::FillColor);
        let value = serde_json::to_value(&binding).expect("serializes");
        assert_eq!(
            value,
            json!({"elementId": "e1", "paramName": "PUMP_STATE", "kind": "fill-color"})
        );
    }

    #[test]
    fn gradient_binding_round_trips_with_all_fields() {
        let binding = Binding::new(
            "tank",
            "TANK_01_LEVEL",
            BindingKind::GradientLevel(GradientSpec {
                direction: Direction::LeftToRight,
                min: 10.0,
                max: 90.0,
                fill_color: "#112233".into(),
                empty_color: "#445566".into(),
            }),
        );
        let value = serde_json::to_value(&binding).expect("serializes");
        assert_eq!(value["kind"], "gradient-level");
        assert_eq!(value["direction"], "left-to-right");
        assert_eq!(value["min"], 10.0);
        assert_eq!(value["fillColor"], "#112233");

        let back: Binding = serde_json::from_value(value).expect("deserializes");
        assert_eq!(back, binding);
    }

    #[test]
    fn gradient_spec_fills_missing_fields_with_authoring_defaults() {
        let binding: Binding = serde_json::from_value(json!({
            "elementId": "tank",
            "paramName": "LEVEL",
            "kind": "gradient-level"
        }))
        .expect("sparse record accepted");
        let spec = binding.kind.gradient().expect("gradient kind");
        assert_eq!(spec.direction, Direction::BottomToTop);
        assert_eq!(spec.min, 0.0);
        assert_eq!(spec.max, 100.0);
        assert_eq!(spec.fill_color, "#0066cc");
        assert_eq!(spec.empty_color, "#e0e0e0");
    }

    #[test]
    fn unknown_kind_tags_are_rejected() {
        let err = serde_json::from_value::<Binding>(json!({
            "elementId": "tank",
            "paramName": "LEVEL",
            "kind": "sparkline"
        }))
        .expect_err("kind set is closed");
        assert!(err.to_string().contains("sparkline"));
    }

    #[test]
    fn binding_set_serializes_as_plain_map() {
        let mut set = BindingSet::new();
        set.insert(Binding::new("a", "P1", BindingKind::Text))
            .expect("valid binding");
        set.insert(Binding::new("b", "P2", BindingKind::StrokeColor))
            .expect("valid binding");

        let value = serde_json::to_value(&set).expect("serializes");
        assert_eq!(value["a"]["paramName"], "P1");
        assert_eq!(value["b"]["kind"], "stroke-color");
    }

    #[test]
    fn binding_set_rejects_blank_param_names() {
        let mut set = BindingSet::new();
        let err = set
            .insert(Binding::new("a", "   ", BindingKind::Text))
            .expect_err("blank name rejected");
        assert_eq!(err, BindError::EmptyParamName);
        assert!(set.is_empty());
    }

    #[test]
    fn binding_set_replaces_by_element_id() {
        let mut set = BindingSet::new();
        set.insert(Binding::new("a", "P1", BindingKind::Text))
            .expect("valid binding");
        let previous = set
            .insert(Binding::new("a", "P2", BindingKind::FillColor))
            .expect("valid binding");
        assert_eq!(previous.map(|b| b.param_name), Some("P1".to_string()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a").map(|b| b.param_name.as_str()), Some("P2"));
    }

    #[test]
    fn param_value_accepts_numbers_and_numeric_strings() {
        let number: ParamValue = serde_json::from_value(json!(42)).expect("number");
        assert_eq!(number.as_f64(), Some(42.0));

        let text: ParamValue = serde_json::from_value(json!(" 73.5 ")).expect("string");
        assert_eq!(text.as_f64(), Some(73.5));

        let word = ParamValue::from("running");
        assert_eq!(word.as_f64(), None);
        assert_eq!(word.to_string(), "running");
    }

    #[test]
    fn param_value_displays_whole_numbers_without_decimal_point() {
        assert_eq!(ParamValue::from(25.0).to_string(), "25");
        assert_eq!(ParamValue::from(25.5).to_string(), "25.5");
    }

    #[test]
    fn diagram_metadata_round_trips_through_embedded_json() {
        let mut set = BindingSet::new();
        set.insert(Binding::new(
            "tank",
            "LEVEL",
            BindingKind::GradientLevel(GradientSpec::default()),
        ))
        .expect("valid binding");

        let metadata = DiagramMetadata::new(set);
        let raw = metadata.to_embedded_json().expect("serializes");
        assert!(raw.contains("\"scadaMappings\""));
        let back = DiagramMetadata::from_embedded_json(&raw).expect("deserializes");
        assert_eq!(back, metadata);
    }
}
