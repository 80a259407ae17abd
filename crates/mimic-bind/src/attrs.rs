//! Attribute names and values shared by the annotator and the update engine.
//!
//! These strings travel inside exported SVG files. Diagrams annotated by an
//! earlier build must keep working, so nothing here is ever renamed.

pub const ATTR_PARAM: &str = "data-scada-param";
pub const ATTR_TYPE: &str = "data-scada-type";
pub const ATTR_DIRECTION: &str = "data-scada-direction";
pub const ATTR_MIN: &str = "data-scada-min";
pub const ATTR_MAX: &str = "data-scada-max";
pub const ATTR_FILL_COLOR: &str = "data-scada-fill-color";
pub const ATTR_EMPTY_COLOR: &str = "data-scada-empty-color";

/// Role marker on gradient stops: `fill`, `transition` or `empty`.
pub const ATTR_STOP: &str = "data-scada-stop";
/// Placeholder marker on the transition stop, `{{NAME}}`.
pub const ATTR_PARAM_OFFSET: &str = "data-scada-param-offset";

pub const TYPE_TEXT: &str = "text";
pub const TYPE_GRADIENT_LEVEL: &str = "gradient-level";
pub const TYPE_FILL_COLOR: &str = "fill-color";
pub const TYPE_STROKE_COLOR: &str = "stroke-color";

pub const STOP_FILL: &str = "fill";
pub const STOP_TRANSITION: &str = "transition";
pub const STOP_EMPTY: &str = "empty";

pub const GRADIENT_ID_PREFIX: &str = "scada-gradient-";

/// Id of the gradient definition generated for an element.
pub fn gradient_id(element_id: &str) -> String {
    format!("{}{}", GRADIENT_ID_PREFIX, element_id)
}

/// `{{NAME}}` token written into text bindings at encode time.
pub fn placeholder(param_name: &str) -> String {
    format!("{{{{{}}}}}", param_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_id_uses_stable_prefix() {
        assert_eq!(gradient_id("TANK_01"), "scada-gradient-TANK_01");
    }

    #[test]
    fn placeholder_wraps_name_in_double_braces() {
        assert_eq!(placeholder("TANK_01_LEVEL"), "{{TANK_01_LEVEL}}");
    }
}
