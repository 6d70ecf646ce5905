use crate::block::{Block, BlockType, SpanKind, TextSpan};
use crate::error::Result;
use crate::node::{HtmlNode, LeafNode, ParentNode};
use crate::parser::{parse, text_to_spans};

/// Root element wrapping every block of a document
pub const DOCUMENT_TAG: &str = "div";

/// Build the HTML tree for a whole document
pub fn document_to_node(markdown: &str) -> Result<ParentNode> {
    let children = parse(markdown)
        .iter()
        .map(|block| block_to_node(block).map(HtmlNode::from))
        .collect::<Result<Vec<_>>>()?;
    Ok(ParentNode::new(DOCUMENT_TAG, children))
}

pub fn block_to_node(block: &Block) -> Result<ParentNode> {
    let value = block.raw_value();

    let node = match block.block_type() {
        BlockType::Heading => {
            let level = block.header_level().unwrap_or(1);
            let text = block.heading_text().unwrap_or(value);
            ParentNode::new(format!("h{level}"), inline_children(text)?)
        }
        BlockType::Code => ParentNode::new("pre", vec![LeafNode::new("code", value).into()]),
        BlockType::Quote => ParentNode::new("blockquote", inline_children(value)?),
        BlockType::Unordered => ParentNode::new("ul", list_children(block)?),
        BlockType::Ordered => ParentNode::new("ol", list_children(block)?),
        BlockType::Paragraph => ParentNode::new("p", inline_children(value)?),
    };

    Ok(node)
}

pub fn span_to_node(span: &TextSpan) -> LeafNode {
    let text = span.text();
    match span.kind() {
        SpanKind::Plain => LeafNode::text(text),
        SpanKind::Bold => LeafNode::new("b", text),
        SpanKind::Italic => LeafNode::new("i", text),
        SpanKind::Code => LeafNode::new("code", text),
        SpanKind::Link => {
            LeafNode::new("a", text).with_attribute("href", span.url().unwrap_or_default())
        }
        SpanKind::Image => LeafNode::new("img", "")
            .with_attribute("src", span.url().unwrap_or_default())
            .with_attribute("alt", text),
    }
}

fn inline_children(text: &str) -> Result<Vec<HtmlNode>> {
    Ok(text_to_spans(text)?
        .iter()
        .map(|span| HtmlNode::from(span_to_node(span)))
        .collect())
}

fn list_children(block: &Block) -> Result<Vec<HtmlNode>> {
    let mut items: Vec<HtmlNode> = Vec::new();
    for item in block.list_items().unwrap_or_default() {
        items.push(ParentNode::new("li", inline_children(item)?).into());
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn render_block(value: &str) -> String {
        block_to_node(&Block::new(value)).unwrap().to_html().unwrap()
    }

    #[rstest]
    #[case(TextSpan::plain("text"), "text")]
    #[case(TextSpan::bold("bold"), "<b>bold</b>")]
    #[case(TextSpan::italic("italic"), "<i>italic</i>")]
    #[case(TextSpan::code("x = 1"), "<code>x = 1</code>")]
    #[case(TextSpan::link("site", "https://example.com"), r#"<a href="https://example.com">site</a>"#)]
    #[case(TextSpan::image("a cat", "cat.png"), r#"<img src="cat.png" alt="a cat"></img>"#)]
    fn test_span_to_node(#[case] span: TextSpan, #[case] expected: &str) {
        assert_eq!(span_to_node(&span).to_html(), expected);
    }

    #[test]
    fn test_image_leaf_has_empty_value() {
        let node = span_to_node(&TextSpan::image("alt", "src"));
        assert_eq!(node.tag.as_deref(), Some("img"));
        assert_eq!(node.value, "");
    }

    #[rstest]
    #[case("# Heading line", "<h1>Heading line</h1>")]
    #[case("### Third *level*", "<h3>Third <i>level</i></h3>")]
    #[case("This is **bolded** paragraph", "<p>This is <b>bolded</b> paragraph</p>")]
    #[case("> To be or not", "<blockquote>> To be or not</blockquote>")]
    #[case("* item one\n* item two", "<ul><li>item one</li><li>item two</li></ul>")]
    #[case("- `a`\n- [b](c)", r#"<ul><li><code>a</code></li><li><a href="c">b</a></li></ul>"#)]
    #[case("1. first\n2. **second**", "<ol><li>first</li><li><b>second</b></li></ol>")]
    #[case("```\nlet x = 1;\n```", "<pre><code>```\nlet x = 1;\n```</code></pre>")]
    fn test_block_to_node(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(render_block(value), expected);
    }

    #[test]
    fn test_code_block_is_not_tokenized() {
        // Unbalanced markers inside a fence are not an error
        assert_eq!(
            render_block("```\na * b\n```"),
            "<pre><code>```\na * b\n```</code></pre>"
        );
    }

    #[test]
    fn test_ordered_list_with_two_digit_markers() {
        let value = (1..=10)
            .map(|i| format!("{i}. item"))
            .collect::<Vec<_>>()
            .join("\n");
        let html = render_block(&value);
        assert!(html.starts_with("<ol><li>item</li>"));
        assert!(html.ends_with("<li>item</li></ol>"));
        assert_eq!(html.matches("<li>item</li>").count(), 10);
    }

    #[test]
    fn test_unmatched_delimiter_aborts_block() {
        let result = block_to_node(&Block::new("an *unfinished thought"));
        assert!(matches!(result, Err(Error::UnmatchedDelimiter { .. })));
    }

    #[test]
    fn test_document_to_node() {
        let markdown = "This is **bolded** paragraph\n\n* item a\n* item b\n";
        let html = document_to_node(markdown).unwrap().to_html().unwrap();
        assert_eq!(
            html,
            "<div><p>This is <b>bolded</b> paragraph</p><ul><li>item a</li><li>item b</li></ul></div>"
        );
    }

    #[test]
    fn test_document_title() {
        let markdown = "# Tolkien Fan Club\n\n**I like Tolkien**. Read my [first post here](/majesty)";
        let root = document_to_node(markdown).unwrap();
        assert_eq!(root.tag, DOCUMENT_TAG);
        assert_eq!(root.extract_title(), Some("Tolkien Fan Club".to_string()));
        assert_eq!(
            root.to_html().unwrap(),
            r#"<div><h1>Tolkien Fan Club</h1><p><b>I like Tolkien</b>. Read my <a href="/majesty">first post here</a></p></div>"#
        );
    }

    #[test]
    fn test_document_without_h1_has_no_title() {
        let root = document_to_node("## Only a subheading\n\ntext").unwrap();
        assert_eq!(root.extract_title(), None);
    }

    #[test]
    fn test_empty_document_cannot_render() {
        let root = document_to_node("").unwrap();
        assert!(root.children.is_empty());
        assert!(matches!(root.to_html(), Err(Error::NoChildren { .. })));
    }

    #[test]
    fn test_block_rendering_is_repeatable() {
        let block = Block::new("# Heading");
        let first = block_to_node(&block).unwrap();
        let second = block_to_node(&block).unwrap();
        assert_eq!(first, second);
        assert_eq!(block.raw_value(), "# Heading");
    }
}
