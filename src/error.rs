// src/error.rs

use std::path::PathBuf;

/// Errors while turning a shape into image bytes or writing them out.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("shape has fewer than three vertices")]
    DegenerateShape,

    #[error("invalid image dimensions {width}x{height}")]
    Dimensions { width: u32, height: u32 },

    #[error("PNG encode failed: {0}")]
    Encode(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("browser download failed: {0}")]
    Download(String),
}

/// Errors while building a share link.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShareError {
    #[error("invalid base URL: {0}")]
    InvalidBase(#[from] url::ParseError),
}
