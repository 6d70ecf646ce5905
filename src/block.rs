/// Formatting applied to an inline run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

/// An inline run of text produced by the tokenizer.
///
/// Only links and images carry a url; the constructors are the only way to
/// build a span, so that pairing always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    text: String,
    kind: SpanKind,
    url: Option<String>,
}

impl TextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::unlinked(text.into(), SpanKind::Plain)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::unlinked(text.into(), SpanKind::Bold)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::unlinked(text.into(), SpanKind::Italic)
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::unlinked(text.into(), SpanKind::Code)
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SpanKind::Link,
            url: Some(url.into()),
        }
    }

    /// For images the text is the alt text.
    pub fn image(alt: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: alt.into(),
            kind: SpanKind::Image,
            url: Some(url.into()),
        }
    }

    fn unlinked(text: String, kind: SpanKind) -> Self {
        Self {
            text,
            kind,
            url: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> SpanKind {
        self.kind
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_plain(&self) -> bool {
        self.kind == SpanKind::Plain
    }
}

/// Structural type of a block, decided once from its raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Paragraph,
    Heading,
    Code,
    Quote,
    Unordered,
    Ordered,
}

const FENCE: &str = "```";

impl BlockType {
    /// Classify raw block text. The checks run in a fixed order and the first
    /// match wins, with `Paragraph` as the fallback.
    pub fn classify(value: &str) -> Self {
        if value.is_empty() {
            return BlockType::Paragraph;
        }
        if heading_marker_len(value).is_some() {
            return BlockType::Heading;
        }
        if value.starts_with(FENCE) && value.ends_with(FENCE) {
            return BlockType::Code;
        }
        if value.lines().all(|line| line.starts_with('>')) {
            return BlockType::Quote;
        }
        if value.lines().all(is_unordered_item) {
            return BlockType::Unordered;
        }
        if value
            .lines()
            .enumerate()
            .all(|(i, line)| line.starts_with(&ordered_marker(i + 1)))
        {
            return BlockType::Ordered;
        }
        BlockType::Paragraph
    }
}

/// Number of leading `#` characters when the text opens with `#+ `.
fn heading_marker_len(value: &str) -> Option<usize> {
    let hashes = value.len() - value.trim_start_matches('#').len();
    (hashes > 0 && value[hashes..].starts_with(' ')).then_some(hashes)
}

fn is_unordered_item(line: &str) -> bool {
    line.starts_with("* ") || line.starts_with("- ")
}

fn ordered_marker(index: usize) -> String {
    format!("{index}. ")
}

/// A run of non-blank lines from the source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    raw_value: String,
    block_type: BlockType,
}

impl Block {
    pub fn new(raw_value: impl Into<String>) -> Self {
        let raw_value = raw_value.into();
        let block_type = BlockType::classify(&raw_value);
        Self {
            raw_value,
            block_type,
        }
    }

    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// Count of leading `#` characters. Only defined for headings; the level
    /// is not capped at 6.
    pub fn header_level(&self) -> Option<usize> {
        match self.block_type {
            BlockType::Heading => heading_marker_len(&self.raw_value),
            _ => None,
        }
    }

    /// Heading content with the `#` run and following whitespace removed.
    pub fn heading_text(&self) -> Option<&str> {
        match self.block_type {
            BlockType::Heading => Some(self.raw_value.trim_start_matches('#').trim_start()),
            _ => None,
        }
    }

    /// Item lines of a list block with their markers removed.
    pub fn list_items(&self) -> Option<Vec<&str>> {
        match self.block_type {
            BlockType::Unordered => Some(
                self.raw_value
                    .lines()
                    .map(|line| line.get(2..).unwrap_or_default())
                    .collect(),
            ),
            BlockType::Ordered => Some(
                self.raw_value
                    .lines()
                    .enumerate()
                    .map(|(i, line)| line.strip_prefix(&ordered_marker(i + 1)).unwrap_or(line))
                    .collect(),
            ),
            _ => None,
        }
    }
}
