use crate::error::{Error, Result};

/// HTML attributes in insertion order
pub type Attributes = Vec<(String, String)>;

/// A node of the rendered document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Leaf(LeafNode),
    Parent(ParentNode),
}

/// A node without children. Without a tag it renders as bare text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub tag: Option<String>,
    pub value: String,
    pub attributes: Attributes,
}

/// An element wrapping other nodes. Needs a tag and at least one child to
/// render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentNode {
    pub tag: String,
    pub children: Vec<HtmlNode>,
    pub attributes: Attributes,
}

impl HtmlNode {
    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf(leaf) => leaf.tag.as_deref(),
            HtmlNode::Parent(parent) => Some(&parent.tag),
        }
    }

    pub fn to_html(&self) -> Result<String> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    fn write_html(&self, out: &mut String) -> Result<()> {
        match self {
            HtmlNode::Leaf(leaf) => {
                leaf.write_html(out);
                Ok(())
            }
            HtmlNode::Parent(parent) => parent.write_html(out),
        }
    }

    fn find_title(&self) -> Option<String> {
        match self {
            HtmlNode::Leaf(leaf) => (leaf.tag.as_deref() == Some("h1")).then(|| leaf.value.clone()),
            HtmlNode::Parent(parent) => {
                if parent.tag == "h1"
                    && let Some(HtmlNode::Leaf(first)) = parent.children.first()
                {
                    return Some(first.value.clone());
                }
                parent.extract_title()
            }
        }
    }
}

impl From<LeafNode> for HtmlNode {
    fn from(leaf: LeafNode) -> Self {
        HtmlNode::Leaf(leaf)
    }
}

impl From<ParentNode> for HtmlNode {
    fn from(parent: ParentNode) -> Self {
        HtmlNode::Parent(parent)
    }
}

impl LeafNode {
    /// Untagged text
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            tag: None,
            value: value.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            value: value.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.tag {
            Some(tag) => {
                open_tag(tag, &self.attributes, out);
                out.push_str(&self.value);
                close_tag(tag, out);
            }
            None => out.push_str(&self.value),
        }
    }
}

impl ParentNode {
    pub fn new(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        Self {
            tag: tag.into(),
            children,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn to_html(&self) -> Result<String> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    fn write_html(&self, out: &mut String) -> Result<()> {
        if self.tag.is_empty() {
            return Err(Error::MissingTag);
        }
        if self.children.is_empty() {
            return Err(Error::NoChildren {
                tag: self.tag.clone(),
            });
        }

        open_tag(&self.tag, &self.attributes, out);
        for child in &self.children {
            child.write_html(out)?;
        }
        close_tag(&self.tag, out);
        Ok(())
    }

    /// Text of the first `h1` below this node, searched depth first in
    /// document order.
    ///
    /// A parent `h1` yields the value of its first child when that child is a
    /// leaf; otherwise the search carries on into its children. A leaf `h1`
    /// yields its own value.
    pub fn extract_title(&self) -> Option<String> {
        self.children.iter().find_map(HtmlNode::find_title)
    }
}

fn open_tag(tag: &str, attributes: &Attributes, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out.push('>');
}

fn close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}
