//! Error types for sarpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for sarpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while assembling a report.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading attachment streams or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The bytes are not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error reading or writing PDF structure.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// A raster attachment could not be decoded.
    #[error("Image decoding error: {0}")]
    ImageDecode(String),

    /// The external word-processor conversion failed.
    #[error("Document conversion failed: {0}")]
    Conversion(String),

    /// Error while laying out pages.
    #[error("Rendering error: {0}")]
    Render(String),

    /// A service template failed to render its content.
    #[error("Template for service '{service}' failed: {source}")]
    Template {
        service: String,
        #[source]
        source: Box<Error>,
    },

    /// An attachment failed to render.
    #[error("Attachment {number} ({filename}) of service '{service}' failed: {source}")]
    Attachment {
        service: String,
        number: u32,
        filename: String,
        #[source]
        source: Box<Error>,
    },

    /// Report options are inconsistent.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error with the attachment it came from.
    pub fn in_attachment(self, service: &str, number: u32, filename: &str) -> Self {
        Error::Attachment {
            service: service.to_string(),
            number,
            filename: filename.to_string(),
            source: Box::new(self),
        }
    }

    /// Wrap an error with the service whose template raised it.
    pub fn in_template(self, service: &str) -> Self {
        Error::Template {
            service: service.to_string(),
            source: Box::new(self),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::ImageDecode(err.to_string()),
        }
    }
}
