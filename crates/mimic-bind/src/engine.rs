//! Applies live parameter values to an annotated document.

use std::collections::HashMap;

use mimic_svg::{SvgDocument, SvgElement};
use tracing::debug;

use crate::attrs;
use crate::model::{ParamValue, Snapshot};

/// Maps a raw value into the 0..=100 level range.
///
/// Degenerate bounds (`max == min`) and non-finite inputs resolve to 0, so
/// a stop offset can never come out as `NaN%`.
pub fn level_percentage(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() || !min.is_finite() || !max.is_finite() || max == min {
        return 0.0;
    }
    (((value - min) / (max - min)) * 100.0).clamp(0.0, 100.0)
}

/// Drives annotated elements from value snapshots.
///
/// One engine per document: the cache remembers the last value applied for
/// each parameter so unchanged values can be skipped. The cache is advisory
/// only, the document stays the source of truth, and running with the cache
/// disabled produces identical output.
#[derive(Debug)]
pub struct UpdateEngine {
    cache: HashMap<String, ParamValue>,
    change_detection: bool,
}

impl Default for UpdateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateEngine {
    pub fn new() -> Self {
        Self::with_change_detection(true)
    }

    pub fn with_change_detection(enabled: bool) -> Self {
        Self {
            cache: HashMap::new(),
            change_detection: enabled,
        }
    }

    /// Applies a snapshot of values to the document.
    ///
    /// Parameters bound in the document but absent from the snapshot keep
    /// their current state; snapshot entries that match nothing are
    /// ignored. Key order never influences the result.
    pub fn apply(&mut self, doc: &mut SvgDocument, snapshot: &Snapshot) {
        let pending: HashMap<&str, &ParamValue> = snapshot
            .iter()
            .filter(|&(name, value)| self.needs_apply(name.as_str(), value))
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        if pending.is_empty() {
            return;
        }
        debug!(params = pending.len(), "applying value snapshot");
        apply_pending(doc, &pending);
        for (name, value) in pending {
            self.cache.insert(name.to_string(), value.clone());
        }
    }

    /// Applies a single value, equivalent to `apply` with a one-entry
    /// snapshot.
    pub fn apply_one(&mut self, doc: &mut SvgDocument, param_name: &str, value: impl Into<ParamValue>) {
        let value = value.into();
        if !self.needs_apply(param_name, &value) {
            return;
        }
        {
            let pending = HashMap::from([(param_name, &value)]);
            apply_pending(doc, &pending);
        }
        self.cache.insert(param_name.to_string(), value);
    }

    /// Forgets the cached last-applied values without touching any
    /// document. The next `apply` treats every parameter as new.
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    fn needs_apply(&self, name: &str, value: &ParamValue) -> bool {
        !(self.change_detection && self.cache.get(name) == Some(value))
    }
}

/// Single walk over the document. Text and color updates happen in place;
/// gradient updates are planned here and applied afterwards, since the
/// referenced definition lives elsewhere in the tree.
fn apply_pending(doc: &mut SvgDocument, pending: &HashMap<&str, &ParamValue>) {
    let mut planned: Vec<(String, f64)> = Vec::new();

    doc.root.for_each_element_mut(|element| {
        let Some(kind) = element.attr(attrs::ATTR_TYPE).map(str::to_owned) else {
            return;
        };
        let Some(param) = element.attr(attrs::ATTR_PARAM).map(str::to_owned) else {
            return;
        };
        let Some(value) = pending.get(param.as_str()).copied() else {
            return;
        };
        match kind.as_str() {
            attrs::TYPE_GRADIENT_LEVEL => {
                if let Some(update) = plan_gradient(element, value) {
                    planned.push(update);
                }
            }
            attrs::TYPE_TEXT => set_text_deep(element, &value.to_string()),
            attrs::TYPE_FILL_COLOR => element.set_attr("fill", value.to_string()),
            attrs::TYPE_STROKE_COLOR => element.set_attr("stroke", value.to_string()),
            _ => {}
        }
    });

    for (gradient_id, percentage) in planned {
        if let Some(gradient) = doc.find_by_id_mut(&gradient_id) {
            update_gradient_stops(gradient, percentage);
        }
    }
}

/// Computes the percentage for one gradient element and resolves which
/// definition it points at. Bounds come from the element's own attributes,
/// not from any binding record. Skips elements whose value has no finite
/// numeric reading or whose `fill` is not a `url(#...)` reference.
fn plan_gradient(element: &SvgElement, value: &ParamValue) -> Option<(String, f64)> {
    let value = value.as_f64().filter(|v| v.is_finite())?;
    let min = numeric_attr(element, attrs::ATTR_MIN, 0.0);
    let max = numeric_attr(element, attrs::ATTR_MAX, 100.0);
    let gradient_id = gradient_ref(element.attr("fill")?)?;
    Some((gradient_id.to_string(), level_percentage(value, min, max)))
}

/// Extracts `<id>` from `url(#<id>)`.
fn gradient_ref(fill: &str) -> Option<&str> {
    fill.strip_prefix("url(#")?.strip_suffix(')')
}

/// Moves the transition stop and the first empty stop to the new level.
/// Both roles must exist before either is touched; a malformed gradient is
/// left exactly as it was.
fn update_gradient_stops(gradient: &mut SvgElement, percentage: f64) {
    let has_transition = gradient
        .descendants()
        .any(|el| stop_role(el) == Some(attrs::STOP_TRANSITION));
    let has_empty = gradient
        .descendants()
        .any(|el| stop_role(el) == Some(attrs::STOP_EMPTY));
    if !has_transition || !has_empty {
        return;
    }

    let offset = format!("{}%", percentage);
    let mut transition_moved = false;
    let mut empty_moved = false;
    gradient.for_each_element_mut(|el| {
        if !transition_moved && stop_role(el) == Some(attrs::STOP_TRANSITION) {
            el.set_attr("offset", offset.clone());
            transition_moved = true;
        } else if !empty_moved && stop_role(el) == Some(attrs::STOP_EMPTY) {
            el.set_attr("offset", offset.clone());
            empty_moved = true;
        }
    });
}

fn stop_role(element: &SvgElement) -> Option<&str> {
    if element.is_named("stop") {
        element.attr(attrs::ATTR_STOP)
    } else {
        None
    }
}

/// Text-bearing elements get their content replaced directly; containers
/// propagate the value to every text element underneath.
fn set_text_deep(element: &mut SvgElement, text: &str) {
    if element.is_named("text") || element.is_named("tspan") {
        element.set_text(text);
        return;
    }
    element.for_each_element_mut(|el| {
        if el.is_named("text") || el.is_named("tspan") {
            el.set_text(text);
        }
    });
}

pub(crate) fn numeric_attr(element: &SvgElement, name: &str, default: f64) -> f64 {
    element
        .attr(name)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_follows_the_clamped_linear_formula() {
        assert_eq!(level_percentage(75.0, 0.0, 100.0), 75.0);
        assert_eq!(level_percentage(-10.0, 0.0, 100.0), 0.0);
        assert_eq!(level_percentage(150.0, 0.0, 100.0), 100.0);
        assert_eq!(level_percentage(25.0, 0.0, 50.0), 50.0);
        assert_eq!(level_percentage(35.0, 20.0, 80.0), 25.0);
    }

    #[test]
    fn percentage_handles_degenerate_and_non_finite_inputs() {
        assert_eq!(level_percentage(42.0, 10.0, 10.0), 0.0);
        assert_eq!(level_percentage(f64::NAN, 0.0, 100.0), 0.0);
        assert_eq!(level_percentage(50.0, f64::NEG_INFINITY, 100.0), 0.0);
        assert_eq!(level_percentage(50.0, 0.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn percentage_supports_inverted_bounds() {
        // min > max mirrors the scale rather than failing
        assert_eq!(level_percentage(25.0, 100.0, 0.0), 75.0);
        assert_eq!(level_percentage(150.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn gradient_ref_accepts_only_url_references() {
        assert_eq!(gradient_ref("url(#scada-gradient-t1)"), Some("scada-gradient-t1"));
        assert_eq!(gradient_ref("#scada-gradient-t1"), None);
        assert_eq!(gradient_ref("red"), None);
        assert_eq!(gradient_ref("url(#unterminated"), None);
    }

    #[test]
    fn numeric_attr_falls_back_on_garbage() {
        let mut el = SvgElement::new("rect");
        el.set_attr("data-scada-min", " 12.5 ");
        el.set_attr("data-scada-max", "not-a-number");
        assert_eq!(numeric_attr(&el, "data-scada-min", 0.0), 12.5);
        assert_eq!(numeric_attr(&el, "data-scada-max", 100.0), 100.0);
        assert_eq!(numeric_attr(&el, "data-scada-absent", 7.0), 7.0);
    }
}
