use thiserror::Error;

/// Failures raised while turning Markdown into an HTML tree.
///
/// Every variant is fatal for the document being processed: there is no
/// partial output once one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid markdown: unmatched delimiter `{delimiter}` in {text:?}")]
    UnmatchedDelimiter {
        delimiter: &'static str,
        text: String,
    },

    #[error("Invalid tree: parent node has no tag")]
    MissingTag,

    #[error("Invalid tree: <{tag}> has no children")]
    NoChildren { tag: String },

    #[error("Document has no h1 heading to take a title from")]
    MissingTitle,
}

pub type Result<T> = std::result::Result<T, Error>;
