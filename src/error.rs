use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The document uses a construct the canonical renderer does not implement.
    #[error("unsupported node kind `{kind}`")]
    UnsupportedNodeKind { kind: &'static str },

    #[error("heading `{heading_id}` jumps from level {from} to level {to}; headings must nest one level at a time")]
    HeadingLevelSkip {
        heading_id: String,
        from: u8,
        to: u8,
    },

    #[error("level {level} heading `{heading_id}` has no content to use as a label")]
    MissingHeadingText { heading_id: String, level: u8 },

    /// Non-fatal: the outline entry falls back to the heading's plain text.
    #[error("heading `{heading_id}` does not start with plain text")]
    NonTextHeadingLabel { heading_id: String },

    #[error("level {level} heading `{heading_id}` has no enclosing heading to nest under")]
    MissingParentHeading { heading_id: String, level: u8 },

    #[error("outline nesting exceeds the supported depth of {max_depth}")]
    OutlineDepthExceeded { max_depth: usize },

    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),

    #[error("failed to parse config file at {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Error {
    /// Whether processing may continue after this error was reported.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::NonTextHeadingLabel { .. })
    }
}
