//! Parsing and serialization for standalone SVG documents.
//!
//! The parser keeps everything the author wrote: prolog comments, DOCTYPE,
//! processing instructions, CDATA, attribute order, and whitespace text
//! inside the root element. Serialization is compact and never re-indents,
//! since whitespace inside `<text>` runs is significant. The one formatting
//! change a round trip introduces is that childless elements come back
//! self-closing.

use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::element::{SvgAttr, SvgElement, SvgNode};
use crate::error::{Result, SvgError};

/// The leading `<?xml ...?>` declaration, if the document had one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDecl {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl XmlDecl {
    fn from_event(decl: &BytesDecl) -> Result<Self> {
        let version = String::from_utf8_lossy(decl.version()?.as_ref()).into_owned();
        let encoding = match decl.encoding() {
            Some(enc) => Some(String::from_utf8_lossy(enc?.as_ref()).into_owned()),
            None => None,
        };
        let standalone = match decl.standalone() {
            Some(sta) => Some(String::from_utf8_lossy(sta?.as_ref()).into_owned()),
            None => None,
        };
        Ok(Self {
            version,
            encoding,
            standalone,
        })
    }
}

/// A parsed SVG document: optional XML declaration, the nodes before the
/// root element, exactly one root element, and the nodes after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    pub decl: Option<XmlDecl>,
    pub prolog: Vec<SvgNode>,
    pub root: SvgElement,
    pub trailer: Vec<SvgNode>,
}

impl SvgDocument {
    /// Wraps an element built in code into a document without a declaration.
    pub fn from_root(root: SvgElement) -> Self {
        Self {
            decl: None,
            prolog: Vec::new(),
            root,
            trailer: Vec::new(),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let mut reader = Reader::from_str(input);
        let mut decl = None;
        let mut prolog = Vec::new();
        let mut trailer = Vec::new();
        let mut root: Option<SvgElement> = None;
        let mut stack: Vec<SvgElement> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Decl(event) => decl = Some(XmlDecl::from_event(&event)?),
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let el = element_from_start(&start)?;
                    attach(&mut stack, &mut root, &mut prolog, &mut trailer, SvgNode::Element(el))?;
                }
                Event::End(_) => {
                    let el = stack.pop().ok_or(SvgError::UnexpectedClosingTag)?;
                    attach(&mut stack, &mut root, &mut prolog, &mut trailer, SvgNode::Element(el))?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?.into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(SvgNode::Text(text)),
                        // Whitespace between top-level nodes is legal and
                        // dropped; anything else is not well-formed XML.
                        None if text.trim().is_empty() => {}
                        None => return Err(SvgError::TextOutsideRoot),
                    }
                }
                Event::CData(cdata) => {
                    let content = String::from_utf8_lossy(&cdata).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(SvgNode::CData(content)),
                        None => return Err(SvgError::TextOutsideRoot),
                    }
                }
                Event::Comment(comment) => {
                    let raw = String::from_utf8_lossy(&comment).into_owned();
                    attach(&mut stack, &mut root, &mut prolog, &mut trailer, SvgNode::Comment(raw))?;
                }
                Event::PI(pi) => {
                    let raw = String::from_utf8_lossy(&pi).into_owned();
                    attach(
                        &mut stack,
                        &mut root,
                        &mut prolog,
                        &mut trailer,
                        SvgNode::ProcessingInstruction(raw),
                    )?;
                }
                Event::DocType(doctype) => {
                    let raw = String::from_utf8_lossy(&doctype).into_owned();
                    attach(&mut stack, &mut root, &mut prolog, &mut trailer, SvgNode::Doctype(raw))?;
                }
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.pop() {
            return Err(SvgError::UnclosedElement(open.name));
        }
        let root = root.ok_or(SvgError::MissingRoot)?;

        Ok(Self {
            decl,
            prolog,
            root,
            trailer,
        })
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        if let Some(decl) = &self.decl {
            writer.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            )))?;
        }
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.trailer {
            write_node(&mut writer, node)?;
        }
        let bytes = writer.into_inner().into_inner();
        Ok(String::from_utf8(bytes)?)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&SvgElement> {
        self.root.find_by_id(id)
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut SvgElement> {
        self.root.find_by_id_mut(id)
    }
}

fn element_from_start(start: &BytesStart) -> Result<SvgElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut el = SvgElement::new(name);
    for attr in start.attributes() {
        let attr = attr?;
        el.attrs.push(SvgAttr {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(el)
}

/// Hands a finished node to the open element, or to the document level if
/// the stack is empty. Only one root element is accepted.
fn attach(
    stack: &mut [SvgElement],
    root: &mut Option<SvgElement>,
    prolog: &mut Vec<SvgNode>,
    trailer: &mut Vec<SvgNode>,
    node: SvgNode,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    match node {
        SvgNode::Element(el) => {
            if root.is_some() {
                return Err(SvgError::MultipleRoots);
            }
            *root = Some(el);
        }
        other => {
            if root.is_some() {
                trailer.push(other);
            } else {
                prolog.push(other);
            }
        }
    }
    Ok(())
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, el: &SvgElement) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for attr in &el.attrs {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }
    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &SvgNode) -> Result<()> {
    match node {
        SvgNode::Element(el) => write_element(writer, el)?,
        SvgNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        SvgNode::CData(content) => writer.write_event(Event::CData(BytesCData::new(content.as_str())))?,
        // Comments, PIs and DOCTYPEs were captured raw, so they go back out
        // without re-escaping.
        SvgNode::Comment(raw) => writer.write_event(Event::Comment(BytesText::from_escaped(raw.as_str())))?,
        SvgNode::ProcessingInstruction(raw) => {
            writer.write_event(Event::PI(BytesText::from_escaped(raw.as_str())))?
        }
        SvgNode::Doctype(raw) => writer.write_event(Event::DocType(BytesText::from_escaped(raw.as_str())))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() -> Result<()> {
        let doc = SvgDocument::parse(r#"<svg width="100" height="100"><rect id="r"/></svg>"#)?;
        assert_eq!(doc.root.name, "svg");
        assert_eq!(doc.root.attr("width"), Some("100"));
        assert!(doc.find_by_id("r").is_some());
        Ok(())
    }

    #[test]
    fn keeps_declaration_and_prolog() -> Result<()> {
        let input = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- exported -->\n<svg/>";
        let doc = SvgDocument::parse(input)?;
        let decl = doc.decl.as_ref().expect("declaration parsed");
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(doc.prolog, vec![SvgNode::Comment(" exported ".into())]);
        let out = doc.to_xml()?;
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("<!-- exported -->"));
        Ok(())
    }

    #[test]
    fn preserves_text_whitespace_and_attr_order() -> Result<()> {
        let input = r#"<svg><text id="t" x="5" fill="red">  7.5  </text></svg>"#;
        let doc = SvgDocument::parse(input)?;
        assert_eq!(doc.to_xml()?, input);
        Ok(())
    }

    #[test]
    fn childless_elements_become_self_closing() -> Result<()> {
        let doc = SvgDocument::parse("<svg><g></g></svg>")?;
        assert_eq!(doc.to_xml()?, "<svg><g/></svg>");
        Ok(())
    }

    #[test]
    fn round_trips_cdata_and_entities() -> Result<()> {
        let input = "<svg><style><![CDATA[.a > .b { fill: red; }]]></style><text>a &lt; b</text></svg>";
        let doc = SvgDocument::parse(input)?;
        assert_eq!(doc.root.find_by_id("missing"), None);
        assert_eq!(doc.to_xml()?, input);
        Ok(())
    }

    #[test]
    fn rejects_multiple_roots() {
        assert!(matches!(
            SvgDocument::parse("<svg/><svg/>"),
            Err(SvgError::MultipleRoots)
        ));
    }

    #[test]
    fn rejects_missing_root() {
        assert!(matches!(
            SvgDocument::parse("<!-- nothing here -->"),
            Err(SvgError::MissingRoot)
        ));
    }

    #[test]
    fn rejects_unclosed_element() {
        assert!(matches!(
            SvgDocument::parse("<svg><g>"),
            Err(SvgError::UnclosedElement(name)) if name == "g"
        ));
    }

    #[test]
    fn escapes_attribute_values_on_write() -> Result<()> {
        let mut el = SvgElement::new("text");
        el.set_attr("data-note", "a \"quoted\" <value>");
        let doc = SvgDocument::from_root(el);
        let out = doc.to_xml()?;
        assert!(out.contains("&quot;quoted&quot;"));
        assert!(out.contains("&lt;value&gt;"));
        let back = SvgDocument::parse(&out)?;
        assert_eq!(back.root.attr("data-note"), Some("a \"quoted\" <value>"));
        Ok(())
    }
}
