//! Parameter binding for SVG process diagrams.
//!
//! The annotator writes binding metadata onto diagram elements as
//! `data-scada-*` attributes (plus a gradient skeleton for level
//! indicators); the update engine later feeds live values into any
//! document carrying those attributes. The annotated SVG itself is the
//! contract between the two sides, so they can run in different processes
//! or years apart.

pub mod annotate;
pub mod attrs;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod model;

pub use annotate::{encode, remove_encoding};
pub use engine::{UpdateEngine, level_percentage};
pub use error::{BindError, Result};
pub use metadata::{ParameterMetadata, bound_parameter_names, parameter_metadata};
pub use model::{
    Binding, BindingKind, BindingSet, DiagramMetadata, Direction, GradientSpec, ParamValue,
    Snapshot,
};
