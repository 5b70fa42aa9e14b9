use miette::Diagnostic;
use thiserror::Error;

/// Errors shared by the four metatileset codecs.
///
/// Each variant carries a fixed message. None of them are retried inside the
/// crate; the caller decides whether to ask for another file.
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    #[error("No blockset file chosen.")]
    #[diagnostic(code(polished::codec::no_file))]
    NoFileChosen,

    #[error("Cannot open file.")]
    #[diagnostic(code(polished::codec::bad_file))]
    CannotOpenFile,

    #[error("No corresponding graphics file chosen.")]
    #[diagnostic(
        code(polished::codec::no_gfx),
        help("Load the tileset graphics before its metatiles")
    )]
    NoGraphicsLoaded,

    #[error("The last block is incomplete.")]
    #[diagnostic(code(polished::codec::too_short))]
    LastBlockIncomplete,

    #[error("More than 256 blocks defined.")]
    #[diagnostic(code(polished::codec::too_long))]
    TooManyBlocks,
}

impl CodecError {
    /// The fixed human-readable message for this error.
    pub fn message(self) -> &'static str {
        match self {
            CodecError::NoFileChosen => "No blockset file chosen.",
            CodecError::CannotOpenFile => "Cannot open file.",
            CodecError::NoGraphicsLoaded => "No corresponding graphics file chosen.",
            CodecError::LastBlockIncomplete => "The last block is incomplete.",
            CodecError::TooManyBlocks => "More than 256 blocks defined.",
        }
    }
}

/// Errors raised while decoding tile graphics.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum GfxError {
    #[error("Cannot open file.")]
    #[diagnostic(code(polished::gfx::bad_file))]
    CannotOpenFile,

    #[error("Unknown graphics file extension.")]
    #[diagnostic(
        code(polished::gfx::bad_ext),
        help("Use a .png, .2bpp or .2bpp.lz file")
    )]
    BadExtension,

    #[error("Image dimensions are not a multiple of 8 ({width}x{height}).")]
    #[diagnostic(code(polished::gfx::bad_dims))]
    BadDimensions { width: u32, height: u32 },

    #[error("The last tile is incomplete.")]
    #[diagnostic(code(polished::gfx::too_short))]
    IncompleteTile,

    #[error("More than 256 tiles defined ({0}).")]
    #[diagnostic(code(polished::gfx::too_long))]
    TooManyTiles(usize),

    #[error("Invalid LZ-compressed data: {0}")]
    #[diagnostic(code(polished::gfx::bad_lz))]
    BadCompression(String),
}

/// Errors raised while reading a blk map file.
#[derive(Error, Diagnostic, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlkError {
    #[error("No *.blk file chosen.")]
    #[diagnostic(code(polished::blk::no_file))]
    NoFileChosen,

    #[error("Cannot open file.")]
    #[diagnostic(code(polished::blk::bad_file))]
    CannotOpenFile,

    #[error("The map is smaller than its width and height.")]
    #[diagnostic(
        code(polished::blk::too_short),
        help("Check the map size or pick the right *.blk file")
    )]
    TooShort,

    #[error("The map is larger than its width and height.")]
    #[diagnostic(
        code(polished::blk::too_long),
        help("Check the map size or pick the right *.blk file")
    )]
    TooLong,
}

/// Main error type for polished operations
#[derive(Error, Diagnostic, Debug)]
pub enum PolishedError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(polished::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(polished::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Project error: {message}")]
    #[diagnostic(code(polished::project))]
    Project {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{path}: {source}")]
    #[diagnostic(code(polished::codec))]
    Codec {
        path: std::path::PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("{path}: {source}")]
    #[diagnostic(code(polished::gfx))]
    Gfx {
        path: std::path::PathBuf,
        #[source]
        source: GfxError,
    },

    #[error("{path}: {source}")]
    #[diagnostic(code(polished::blk))]
    Blk {
        path: std::path::PathBuf,
        #[source]
        source: BlkError,
    },
}

pub type Result<T> = std::result::Result<T, PolishedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_messages_match_display() {
        for err in [
            CodecError::NoFileChosen,
            CodecError::CannotOpenFile,
            CodecError::NoGraphicsLoaded,
            CodecError::LastBlockIncomplete,
            CodecError::TooManyBlocks,
        ] {
            assert_eq!(err.to_string(), err.message());
        }
    }

    #[test]
    fn test_wrapped_error_mentions_path() {
        let err = PolishedError::Codec {
            path: "data/tilesets/johto_metatiles.bin".into(),
            source: CodecError::TooManyBlocks,
        };
        let text = err.to_string();
        assert!(text.contains("johto_metatiles.bin"));
        assert!(text.contains("More than 256 blocks"));
    }
}
