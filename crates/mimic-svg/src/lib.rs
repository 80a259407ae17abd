//! Mutable SVG document model for annotated process diagrams.

pub mod document;
pub mod element;
pub mod error;

pub use document::{SvgDocument, XmlDecl};
pub use element::{Descendants, SvgAttr, SvgElement, SvgNode};
pub use error::{Result, SvgError};
