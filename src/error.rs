use thiserror::Error;

/// Errors that can occur while parsing a `Link` header field value.
///
/// Every variant means the same thing to a caller: the header is malformed
/// and yields no links. The variants only differ in the diagnostic they carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An unexpected byte was encountered during parsing.
    #[error("unexpected byte 0x{found:02X} at offset {offset} (expected {expected})")]
    UnexpectedByte {
        /// Human-readable description of what was expected.
        expected: &'static str,
        /// The actual byte value found.
        found: u8,
        /// Byte offset of `found` within the header value.
        offset: usize,
    },
    /// The header value ended while more input was required.
    #[error("unexpected end of input (expected {expected})")]
    UnexpectedEnd {
        /// Human-readable description of what was expected.
        expected: &'static str,
    },
    /// A link-value carries no `rel` parameter.
    #[error("link-value has no rel parameter")]
    MissingRelation,
    /// The `rel` parameter contains no relation type.
    #[error("rel parameter is empty")]
    EmptyRelation,
    /// A single-valued parameter occurs more than once (strict mode only).
    #[error("parameter '{0}' occurs more than once")]
    DuplicateParameter(String),
    /// The link target could not be resolved to an absolute URI.
    #[error("cannot resolve link target '{reference}': {source}")]
    InvalidTarget {
        /// The raw URI-reference between `<` and `>`.
        reference: String,
        #[source]
        source: url::ParseError,
    },
    /// The `anchor` parameter could not be resolved to an absolute URI.
    #[error("cannot resolve anchor '{reference}': {source}")]
    InvalidAnchor {
        /// The raw anchor parameter value.
        reference: String,
        #[source]
        source: url::ParseError,
    },
    /// The header value ends in whitespace (strict mode only).
    #[error("trailing whitespace at offset {offset}")]
    TrailingWhitespace {
        /// Byte offset where the trailing whitespace starts.
        offset: usize,
    },
}
