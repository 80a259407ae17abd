//! Encodes bindings onto SVG elements.
//!
//! Annotation writes the `data-scada-*` attributes an update engine reads
//! later, and for gradient bindings also installs a four-stop
//! `<linearGradient>` skeleton under `<defs>`. Everything is validated
//! before the first mutation so a rejected binding leaves the document
//! untouched.

use mimic_svg::{SvgDocument, SvgElement, SvgNode};
use tracing::warn;

use crate::attrs;
use crate::error::{BindError, Result};
use crate::model::{Binding, BindingKind, BindingSet, GradientSpec};

/// Writes one binding onto its element.
///
/// Re-encoding is idempotent: attributes are replaced in place and a prior
/// gradient definition for the element is removed before the new one is
/// appended. Encoding a non-gradient kind strips any gradient state left by
/// an earlier binding of the element.
pub fn encode(doc: &mut SvgDocument, binding: &Binding) -> Result<()> {
    if binding.param_name.trim().is_empty() {
        return Err(BindError::EmptyParamName);
    }
    if let BindingKind::GradientLevel(spec) = &binding.kind {
        if !spec.min.is_finite() || !spec.max.is_finite() {
            return Err(BindError::NonFiniteBounds {
                min: spec.min,
                max: spec.max,
            });
        }
    }

    {
        let element = doc
            .find_by_id_mut(&binding.element_id)
            .ok_or_else(|| BindError::ElementNotFound(binding.element_id.clone()))?;
        apply_element_attrs(element, binding);
    }

    let gradient_id = attrs::gradient_id(&binding.element_id);
    match &binding.kind {
        BindingKind::GradientLevel(spec) => {
            let gradient = build_gradient(&gradient_id, &binding.param_name, spec);
            let idx = defs_index(&mut doc.root);
            if let Some(defs) = doc.root.children[idx].as_element_mut() {
                remove_gradient_def(defs, &gradient_id);
                defs.push_child(SvgNode::Element(gradient));
            }
        }
        _ => {
            if let Some(defs) = find_defs_mut(&mut doc.root) {
                remove_gradient_def(defs, &gradient_id);
            }
        }
    }
    Ok(())
}

/// Strips a previously encoded binding from the document: the metadata
/// attributes, the element's reference to its own gradient, and the
/// gradient definition itself. Returns whether anything was removed.
pub fn remove_encoding(doc: &mut SvgDocument, element_id: &str) -> bool {
    let gradient_id = attrs::gradient_id(element_id);
    let mut changed = false;

    if let Some(element) = doc.find_by_id_mut(element_id) {
        changed |= element.remove_attr(attrs::ATTR_PARAM).is_some();
        changed |= element.remove_attr(attrs::ATTR_TYPE).is_some();
        changed |= strip_gradient_attrs(element, element_id);
    }

    if let Some(defs) = find_defs_mut(&mut doc.root) {
        let before = defs.children.len();
        remove_gradient_def(defs, &gradient_id);
        changed |= defs.children.len() != before;
    }
    changed
}

impl BindingSet {
    /// Encodes every binding in the set. Bindings whose element no longer
    /// exists in the document are skipped with a warning so one stale entry
    /// cannot block the rest; invalid bindings still fail the whole call.
    pub fn encode_all(&self, doc: &mut SvgDocument) -> Result<()> {
        for binding in self.iter() {
            match encode(doc, binding) {
                Ok(()) => {}
                Err(BindError::ElementNotFound(element_id)) => {
                    warn!(
                        element = %element_id,
                        param = %binding.param_name,
                        "skipping binding for element missing from the document"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

fn apply_element_attrs(element: &mut SvgElement, binding: &Binding) {
    element.set_attr(attrs::ATTR_PARAM, binding.param_name.as_str());
    element.set_attr(attrs::ATTR_TYPE, binding.kind.tag());

    match &binding.kind {
        BindingKind::GradientLevel(spec) => {
            element.set_attr(attrs::ATTR_DIRECTION, spec.direction.as_str());
            element.set_attr(attrs::ATTR_MIN, spec.min.to_string());
            element.set_attr(attrs::ATTR_MAX, spec.max.to_string());
            element.set_attr(attrs::ATTR_FILL_COLOR, spec.fill_color.as_str());
            element.set_attr(attrs::ATTR_EMPTY_COLOR, spec.empty_color.as_str());
            element.set_attr(
                "fill",
                format!("url(#{})", attrs::gradient_id(&binding.element_id)),
            );
        }
        BindingKind::Text => {
            strip_gradient_attrs(element, &binding.element_id);
            if element.is_named("text") || element.is_named("tspan") {
                element.set_text(attrs::placeholder(&binding.param_name));
            }
        }
        BindingKind::FillColor | BindingKind::StrokeColor => {
            strip_gradient_attrs(element, &binding.element_id);
        }
    }
}

/// Removes the gradient-only attributes, plus the `fill` reference if it
/// still points at this element's own generated gradient. A fill pointing
/// anywhere else belongs to the author and stays.
fn strip_gradient_attrs(element: &mut SvgElement, element_id: &str) -> bool {
    let mut changed = false;
    for name in [
        attrs::ATTR_DIRECTION,
        attrs::ATTR_MIN,
        attrs::ATTR_MAX,
        attrs::ATTR_FILL_COLOR,
        attrs::ATTR_EMPTY_COLOR,
    ] {
        changed |= element.remove_attr(name).is_some();
    }
    let own_ref = format!("url(#{})", attrs::gradient_id(element_id));
    if element.attr("fill") == Some(own_ref.as_str()) {
        element.remove_attr("fill");
        changed = true;
    }
    changed
}

/// Four stops, fixed roles: a `fill` stop pinned at 0%, the moving
/// `transition`/`empty` pair (placed at 50% until the first update), and a
/// final `empty` stop pinned at 100%.
fn build_gradient(gradient_id: &str, param_name: &str, spec: &GradientSpec) -> SvgElement {
    let [x1, y1, x2, y2] = spec.direction.axis();
    let mut gradient = SvgElement::new("linearGradient");
    gradient.set_attr("id", gradient_id);
    gradient.set_attr("x1", x1);
    gradient.set_attr("y1", y1);
    gradient.set_attr("x2", x2);
    gradient.set_attr("y2", y2);

    gradient.push_child(SvgNode::Element(stop("0%", &spec.fill_color, attrs::STOP_FILL)));

    let mut transition = stop("50%", &spec.fill_color, attrs::STOP_TRANSITION);
    transition.set_attr(attrs::ATTR_PARAM_OFFSET, attrs::placeholder(param_name));
    gradient.push_child(SvgNode::Element(transition));

    gradient.push_child(SvgNode::Element(stop("50%", &spec.empty_color, attrs::STOP_EMPTY)));
    gradient.push_child(SvgNode::Element(stop("100%", &spec.empty_color, attrs::STOP_EMPTY)));
    gradient
}

fn stop(offset: &str, color: &str, role: &str) -> SvgElement {
    let mut stop = SvgElement::new("stop");
    stop.set_attr("offset", offset);
    stop.set_attr("stop-color", color);
    stop.set_attr(attrs::ATTR_STOP, role);
    stop
}

/// Index of the `<defs>` block among the root's children, creating one as
/// the first child when the document has none.
fn defs_index(root: &mut SvgElement) -> usize {
    let existing = root
        .children
        .iter()
        .position(|node| node.as_element().is_some_and(|el| el.is_named("defs")));
    match existing {
        Some(idx) => idx,
        None => {
            root.insert_child(0, SvgNode::Element(SvgElement::new("defs")));
            0
        }
    }
}

fn find_defs_mut(root: &mut SvgElement) -> Option<&mut SvgElement> {
    root.child_elements_mut().find(|el| el.is_named("defs"))
}

fn remove_gradient_def(defs: &mut SvgElement, gradient_id: &str) {
    defs.retain_children(|node| {
        node.as_element()
            .map_or(true, |el| el.id() != Some(gradient_id))
    });
}
