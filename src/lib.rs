mod block;
mod config;
mod error;
mod html;
mod node;
mod parser;
mod site;
mod template;

pub use block::{Block, BlockType, SpanKind, TextSpan};
pub use config::{BuildConfig, Config, ConfigError, PathsConfig};
pub use error::{Error, Result};
pub use html::{DOCUMENT_TAG, block_to_node, document_to_node, span_to_node};
pub use node::{Attributes, HtmlNode, LeafNode, ParentNode};
pub use parser::text_to_spans;
pub use site::{
    BuildReport, PageFailure, SiteError, build_site, copy_recursive, generate_page,
    generate_recursive,
};
pub use template::{CONTENT_PLACEHOLDER, TITLE_PLACEHOLDER, render_template};

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Build the HTML tree for a markdown document, rooted at a `div`.
pub fn markdown_to_html_node(markdown: &str) -> Result<ParentNode> {
    document_to_node(markdown)
}

/// Convert markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    markdown_to_html_node(markdown)?.to_html()
}
