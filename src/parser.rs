use std::sync::OnceLock;

use regex::Regex;

use crate::block::{Block, TextSpan};
use crate::error::{Error, Result};

/// Split a document into blocks on blank lines.
///
/// Each line of a block is trimmed before the lines are joined back with
/// `\n`, so indentation inside code fences does not survive.
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut lines: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !lines.is_empty() {
                blocks.push(Block::new(lines.join("\n")));
                lines.clear();
            }
        } else {
            lines.push(line);
        }
    }
    if !lines.is_empty() {
        blocks.push(Block::new(lines.join("\n")));
    }

    blocks
}

type Stage = fn(Vec<TextSpan>) -> Result<Vec<TextSpan>>;

// Order matters: bold must claim `**` before italic sees `*`, and images
// must claim `![..](..)` before the link pattern can match its tail.
const INLINE_STAGES: [Stage; 5] = [
    split_bold,
    split_italic,
    split_code,
    split_images,
    split_links,
];

/// Tokenize inline markup into spans. Empty input gives no spans.
pub fn text_to_spans(text: &str) -> Result<Vec<TextSpan>> {
    let mut spans = vec![TextSpan::plain(text)];
    for stage in INLINE_STAGES {
        spans = stage(spans)?;
    }
    Ok(spans)
}

fn split_bold(spans: Vec<TextSpan>) -> Result<Vec<TextSpan>> {
    split_delimiter(spans, "**", |text| TextSpan::bold(text))
}

fn split_italic(spans: Vec<TextSpan>) -> Result<Vec<TextSpan>> {
    split_delimiter(spans, "*", |text| TextSpan::italic(text))
}

fn split_code(spans: Vec<TextSpan>) -> Result<Vec<TextSpan>> {
    split_delimiter(spans, "`", |text| TextSpan::code(text))
}

fn split_images(spans: Vec<TextSpan>) -> Result<Vec<TextSpan>> {
    Ok(split_pattern(spans, image_pattern(), |alt, url| {
        TextSpan::image(alt, url)
    }))
}

fn split_links(spans: Vec<TextSpan>) -> Result<Vec<TextSpan>> {
    Ok(split_pattern(spans, link_pattern(), |text, url| {
        TextSpan::link(text, url)
    }))
}

fn split_delimiter(
    spans: Vec<TextSpan>,
    delimiter: &'static str,
    make: fn(String) -> TextSpan,
) -> Result<Vec<TextSpan>> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        if !span.is_plain() {
            out.push(span);
            continue;
        }

        let mut rest = span.text();
        while let Some(open) = rest.find(delimiter) {
            let inner = &rest[open + delimiter.len()..];
            let Some(close) = inner.find(delimiter) else {
                return Err(Error::UnmatchedDelimiter {
                    delimiter,
                    text: span.text().to_string(),
                });
            };
            if open > 0 {
                out.push(TextSpan::plain(&rest[..open]));
            }
            out.push(make(inner[..close].to_string()));
            rest = &inner[close + delimiter.len()..];
        }
        if !rest.is_empty() {
            out.push(TextSpan::plain(rest));
        }
    }

    Ok(out)
}

fn split_pattern(
    spans: Vec<TextSpan>,
    pattern: &Regex,
    make: fn(String, String) -> TextSpan,
) -> Vec<TextSpan> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        if !span.is_plain() {
            out.push(span);
            continue;
        }

        let text = span.text();
        let mut last = 0;
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                out.push(TextSpan::plain(&text[last..whole.start()]));
            }
            out.push(make(caps[1].to_string(), caps[2].to_string()));
            last = whole.end();
        }
        if last < text.len() {
            out.push(TextSpan::plain(&text[last..]));
        }
    }

    out
}

fn image_pattern() -> &'static Regex {
    static IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();
    IMAGE_REGEX
        .get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("Invalid image regex"))
}

fn link_pattern() -> &'static Regex {
    static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    LINK_REGEX.get_or_init(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("Invalid link regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockType, SpanKind};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_bold_only() {
        assert_eq!(text_to_spans("**bold**").unwrap(), vec![TextSpan::bold("bold")]);
    }

    #[test]
    fn test_bold_in_the_middle() {
        assert_eq!(
            text_to_spans("a **b** c").unwrap(),
            vec![
                TextSpan::plain("a "),
                TextSpan::bold("b"),
                TextSpan::plain(" c")
            ]
        );
    }

    #[test]
    fn test_all_inline_kinds() {
        let spans = text_to_spans(
            "This is **text** with an *italic* word and a `code block` and an \
             ![obi wan image](https://i.imgur.com/fJRm4Vk.jpeg) and a [link](https://boot.dev)",
        )
        .unwrap();

        assert_eq!(
            spans,
            vec![
                TextSpan::plain("This is "),
                TextSpan::bold("text"),
                TextSpan::plain(" with an "),
                TextSpan::italic("italic"),
                TextSpan::plain(" word and a "),
                TextSpan::code("code block"),
                TextSpan::plain(" and an "),
                TextSpan::image("obi wan image", "https://i.imgur.com/fJRm4Vk.jpeg"),
                TextSpan::plain(" and a "),
                TextSpan::link("link", "https://boot.dev"),
            ]
        );
    }

    #[test]
    fn test_image_is_never_read_as_link() {
        assert_eq!(
            text_to_spans("![alt](u1) and [t](u2)").unwrap(),
            vec![
                TextSpan::image("alt", "u1"),
                TextSpan::plain(" and "),
                TextSpan::link("t", "u2"),
            ]
        );
    }

    #[test]
    fn test_consecutive_links() {
        assert_eq!(
            text_to_spans("[a](1)[b](2) tail").unwrap(),
            vec![
                TextSpan::link("a", "1"),
                TextSpan::link("b", "2"),
                TextSpan::plain(" tail"),
            ]
        );
    }

    #[test]
    fn test_styled_text_is_not_split_again() {
        // Code markers inside italic text are left alone
        assert_eq!(
            text_to_spans("*`x`*").unwrap(),
            vec![TextSpan::italic("`x`")]
        );
        // Link syntax inside bold stays bold text
        assert_eq!(
            text_to_spans("**[x](y)**").unwrap(),
            vec![TextSpan::bold("[x](y)")]
        );
    }

    #[rstest]
    #[case("**bold", "**")]
    #[case("an *italic", "*")]
    #[case("some `code", "`")]
    #[case("**a** and **b", "**")]
    fn test_unmatched_delimiter(#[case] text: &str, #[case] delimiter: &str) {
        match text_to_spans(text) {
            Err(Error::UnmatchedDelimiter { delimiter: d, .. }) => assert_eq!(d, delimiter),
            other => panic!("expected unmatched delimiter, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_gives_no_spans() {
        assert!(text_to_spans("").unwrap().is_empty());
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(
            text_to_spans("nothing special").unwrap(),
            vec![TextSpan::plain("nothing special")]
        );
    }

    #[test]
    fn test_urls_only_on_links_and_images() {
        let spans = text_to_spans("**b** *i* `c` ![a](u) [l](v) end").unwrap();
        for span in spans {
            let wants_url = matches!(span.kind(), SpanKind::Link | SpanKind::Image);
            assert_eq!(span.url().is_some(), wants_url);
        }
    }

    #[test]
    fn test_parse_splits_on_blank_lines() {
        let markdown = "
This is **bolded** paragraph

This is another paragraph with *italic* text and `code` here
This is the same paragraph on a new line

* This is a list
* with items
";
        let blocks = parse(markdown);
        let values: Vec<&str> = blocks.iter().map(|b| b.raw_value()).collect();
        assert_eq!(
            values,
            vec![
                "This is **bolded** paragraph",
                "This is another paragraph with *italic* text and `code` here\nThis is the same paragraph on a new line",
                "* This is a list\n* with items",
            ]
        );
    }

    #[test]
    fn test_parse_trims_lines_and_collapses_blank_runs() {
        let blocks = parse("\n\n   # Title   \n  \n\t\n\n  > quote  \n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].raw_value(), "# Title");
        assert_eq!(blocks[0].block_type(), BlockType::Heading);
        assert_eq!(blocks[1].raw_value(), "> quote");
        assert_eq!(blocks[1].block_type(), BlockType::Quote);
    }

    #[test]
    fn test_parse_code_fence_loses_indentation() {
        let blocks = parse("```\n    fn main() {}\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].raw_value(), "```\nfn main() {}\n```");
        assert_eq!(blocks[0].block_type(), BlockType::Code);
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n  \n").is_empty());
    }
}
