//! Error types for manifest decoding.

use thiserror::Error;

/// Reasons a document cannot be decoded into a [`PackageDocument`].
///
/// Every variant is fatal for the document: the decoder never hands back a
/// partially read model.
///
/// [`PackageDocument`]: crate::PackageDocument
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The XML itself is not well formed.
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// The document contains no root element.
    #[error("document has no <Package> root element")]
    MissingRoot,

    /// The root element is not `Package`.
    #[error("unexpected root element <{found}>, expected <Package>")]
    UnexpectedRoot { found: String },

    /// A text-only field contains a child element.
    #[error("unexpected element <{element}> inside <{parent}>")]
    UnexpectedElement { parent: String, element: String },

    /// A field that may appear once appeared again.
    #[error("duplicate <{field}> field in <{parent}>")]
    DuplicateField { parent: String, field: String },

    /// Input ended before an element was closed.
    #[error("element <{element}> is not closed")]
    UnclosedElement { element: String },

    /// Text content could not be unescaped or is not valid UTF-8.
    #[error("invalid text in <{element}>: {message}")]
    InvalidText { element: String, message: String },
}

/// Convenience alias for codec results.
pub type CodecResult<T> = Result<T, CodecError>;
