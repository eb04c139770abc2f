use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised while converting a WXR export into records
pub enum WxrError {
    /// The sanitizer could not turn the input into well-formed XML.
    #[error("Failed to repair XML: {0}")]
    Sanitization(String),

    /// The tokenizer produced no element at all.
    #[error("XML document contains no elements")]
    EmptyDocument,

    /// Open and close events do not balance.
    #[error("Unbalanced XML structure: {0}")]
    Structure(String),

    #[error("XML parsing error: {0}")]
    Tokenizer(String),

    #[error("Unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pipeline failure tagged with the identity of the source being converted.
    #[error("Failed to convert {source_name}: {cause}")]
    Conversion {
        source_name: String,
        #[source]
        cause: Box<WxrError>,
    },

    #[error("Step {0}")]
    Step(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    #[error("ItemWriter from: {0}")]
    ItemWriter(String),
}

impl WxrError {
    /// Returns the innermost error, looking through [`WxrError::Conversion`] wrappers.
    pub fn root_cause(&self) -> &WxrError {
        match self {
            WxrError::Conversion { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    pub(crate) fn in_source<S: Into<String>>(self, source_name: S) -> WxrError {
        match self {
            already @ WxrError::Conversion { .. } => already,
            cause => WxrError::Conversion {
                source_name: source_name.into(),
                cause: Box::new(cause),
            },
        }
    }
}
