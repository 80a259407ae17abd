//! Mutable element tree for SVG documents.
//!
//! Elements keep their attributes in document order and their children as a
//! flat node list, so a parsed document can be edited in place and written
//! back without reshuffling anything the author wrote.

/// A single `name="value"` pair. Attribute order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgAttr {
    pub name: String,
    pub value: String,
}

/// One node in an element's child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
    CData(String),
    Comment(String),
    /// Raw processing-instruction content, target included.
    ProcessingInstruction(String),
    /// Raw DOCTYPE content, without the `<!DOCTYPE` / `>` delimiters.
    Doctype(String),
}

impl SvgNode {
    pub fn as_element(&self) -> Option<&SvgElement> {
        match self {
            SvgNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut SvgElement> {
        match self {
            SvgNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An SVG element: qualified tag name, ordered attributes, child nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SvgElement {
    pub name: String,
    pub attrs: Vec<SvgAttr>,
    pub children: Vec<SvgNode>,
}

impl SvgElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.rfind(':') {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }

    /// Compares the local tag name, so `svg:text` and `text` both match.
    pub fn is_named(&self, name: &str) -> bool {
        self.local_name() == name
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Replaces the attribute in place if present, appends it otherwise.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(SvgAttr { name, value }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|attr| attr.name == name)?;
        Some(self.attrs.remove(idx).value)
    }

    pub fn push_child(&mut self, node: SvgNode) {
        self.children.push(node);
    }

    pub fn insert_child(&mut self, index: usize, node: SvgNode) {
        self.children.insert(index, node);
    }

    pub fn retain_children(&mut self, keep: impl FnMut(&SvgNode) -> bool) {
        self.children.retain(keep);
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(SvgNode::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut SvgElement> {
        self.children.iter_mut().filter_map(SvgNode::as_element_mut)
    }

    /// All element descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack = Vec::new();
        for child in self.children.iter().rev() {
            if let SvgNode::Element(el) = child {
                stack.push(el);
            }
        }
        Descendants { stack }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&SvgElement> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.descendants().find(|el| el.id() == Some(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut SvgElement> {
        if self.id() == Some(id) {
            return Some(self);
        }
        for child in self.children.iter_mut() {
            if let SvgNode::Element(el) = child {
                if let Some(found) = el.find_by_id_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Concatenated text and CDATA content of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                SvgNode::Text(text) | SvgNode::CData(text) => out.push_str(text),
                SvgNode::Element(el) => el.collect_text(out),
                _ => {}
            }
        }
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(SvgNode::Text(text.into()));
    }

    /// Visits `self` and every element descendant, parents before children.
    pub fn for_each_element_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut SvgElement),
    {
        self.walk_mut(&mut visit);
    }

    fn walk_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(&mut SvgElement),
    {
        visit(self);
        for child in self.children.iter_mut() {
            if let SvgNode::Element(el) = child {
                el.walk_mut(visit);
            }
        }
    }
}

/// Pre-order traversal over element descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a SvgElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SvgElement;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        for child in el.children.iter().rev() {
            if let SvgNode::Element(next) = child {
                self.stack.push(next);
            }
        }
        Some(el)
    }
}
