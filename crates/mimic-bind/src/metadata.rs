//! Read-only introspection of annotated documents.

use std::collections::BTreeSet;
use std::iter;

use mimic_svg::{SvgDocument, SvgElement};

use crate::attrs;
use crate::engine::numeric_attr;
use crate::model::{BindingKind, Direction, GradientSpec};

/// Binding information recovered from a document's own attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMetadata {
    pub param_name: String,
    pub kind: BindingKind,
    /// How many elements share this parameter name.
    pub element_count: usize,
}

/// Distinct parameter names bound anywhere in the document. These are the
/// snapshot keys the document expects to receive.
pub fn bound_parameter_names(doc: &SvgDocument) -> BTreeSet<String> {
    all_elements(doc)
        .filter_map(|el| el.attr(attrs::ATTR_PARAM))
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Metadata for one parameter, read from the first element bound to it in
/// document order. Absent attributes fall back to the authoring defaults.
/// Returns `None` when nothing references the name or the element carries
/// an unknown type tag.
pub fn parameter_metadata(doc: &SvgDocument, param_name: &str) -> Option<ParameterMetadata> {
    let mut bound = all_elements(doc).filter(|el| el.attr(attrs::ATTR_PARAM) == Some(param_name));
    let first = bound.next()?;
    let element_count = 1 + bound.count();
    let kind = read_kind(first)?;
    Some(ParameterMetadata {
        param_name: param_name.to_string(),
        kind,
        element_count,
    })
}

fn all_elements(doc: &SvgDocument) -> impl Iterator<Item = &SvgElement> {
    iter::once(&doc.root).chain(doc.root.descendants())
}

fn read_kind(element: &SvgElement) -> Option<BindingKind> {
    match element.attr(attrs::ATTR_TYPE)? {
        attrs::TYPE_TEXT => Some(BindingKind::Text),
        attrs::TYPE_GRADIENT_LEVEL => Some(BindingKind::GradientLevel(read_gradient_spec(element))),
        attrs::TYPE_FILL_COLOR => Some(BindingKind::FillColor),
        attrs::TYPE_STROKE_COLOR => Some(BindingKind::StrokeColor),
        _ => None,
    }
}

fn read_gradient_spec(element: &SvgElement) -> GradientSpec {
    let mut spec = GradientSpec::default();
    if let Some(direction) = element.attr(attrs::ATTR_DIRECTION).and_then(Direction::from_attr) {
        spec.direction = direction;
    }
    spec.min = numeric_attr(element, attrs::ATTR_MIN, spec.min);
    spec.max = numeric_attr(element, attrs::ATTR_MAX, spec.max);
    if let Some(color) = element.attr(attrs::ATTR_FILL_COLOR) {
        spec.fill_color = color.to_string();
    }
    if let Some(color) = element.attr(attrs::ATTR_EMPTY_COLOR) {
        spec.empty_color = color.to_string();
    }
    spec
}
