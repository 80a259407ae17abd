use thiserror::Error;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, SvgError>;

/// Errors that can occur while parsing or serializing a document.
#[derive(Debug, Error)]
pub enum SvgError {
    /// XML reader or writer error.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute inside a tag.
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Document contains no root element.
    #[error("document has no root element")]
    MissingRoot,

    /// Document contains more than one root element.
    #[error("document has more than one root element")]
    MultipleRoots,

    /// An element was still open at end of input.
    #[error("unclosed element <{0}>")]
    UnclosedElement(String),

    /// A closing tag appeared without a matching opening tag.
    #[error("closing tag without a matching opening tag")]
    UnexpectedClosingTag,

    /// Text content appeared outside the root element.
    #[error("text content outside the root element")]
    TextOutsideRoot,

    /// Serialized bytes are not valid UTF-8.
    #[error("serialized document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
