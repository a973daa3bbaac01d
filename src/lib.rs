//! # weblink
//!
//! A parser for HTTP **`Link` header field values** as defined by
//! **RFC 8288** (Web Linking), turning raw header strings into structured
//! [`Link`] records.
//!
//! The parser is a hand-written scanner over the RFC 7230 list grammar and
//! the RFC 8288 `link-value` grammar. It runs in one of two modes:
//! [`ParseMode::Lax`] (the default) accepts the relaxed list grammar and a few
//! common real-world deviations, while [`ParseMode::Strict`] enforces the
//! literal ABNF. Link targets and anchors are resolved to absolute URIs
//! against a context derived per RFC 7231 §3.1.4.
//!
//! ## Quick start — one header value
//!
//! ```rust
//! use weblink::parse_link_header;
//!
//! let links = parse_link_header("<https://apple.com/>; rel=about", None).unwrap();
//! assert_eq!(links[0].target.as_str(), "https://apple.com/");
//! assert_eq!(links[0].relation_types, ["about"]);
//! assert!(links[0].context.is_none());
//! ```
//!
//! ## Quick start — links of a response
//!
//! ```rust
//! use url::Url;
//! use weblink::{parse_response_links, ParserConfig, ResponseFacts};
//!
//! let request = Url::parse("https://example.com/items?page=1").unwrap();
//! let facts = ResponseFacts {
//!     request_url: Some(&request),
//!     request_method: Some("GET"),
//!     status: Some(200),
//!     ..ResponseFacts::default()
//! };
//!
//! let links = parse_response_links(
//!     &facts,
//!     ["</items?page=2>; rel=next", "</items?page=9>; rel=last"],
//!     ParserConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(links[0].target.as_str(), "https://example.com/items?page=2");
//! assert_eq!(links[1].relation_types, ["last"]);
//! ```

mod context;
mod error;
mod output;
mod parser;
mod types;

use url::Url;

// Re-export public API.
pub use context::{ResponseFacts, default_context};
pub use error::ParseError;
pub use output::{format_debug, format_header, format_json};
pub use parser::{LinkParser, ParserConfig};
pub use types::{Extensions, Link, ParseMode, find_relation};

/// Parse a **single** `Link` header field value in lax mode.
///
/// This is a convenience wrapper around [`LinkParser`]. `context` is the
/// default link context used for relative references.
///
/// # Errors
///
/// Returns [`ParseError`] if the value is malformed.
pub fn parse_link_header(value: &str, context: Option<&Url>) -> Result<Vec<Link>, ParseError> {
    LinkParser::new().parse(value, context)
}

/// Parse **several** `Link` header field values with custom [`ParserConfig`],
/// concatenating the links in input order.
///
/// # Errors
///
/// Returns [`ParseError`] if any one value is malformed.
pub fn parse_link_headers<I, S>(
    values: I,
    context: Option<&Url>,
    config: ParserConfig,
) -> Result<Vec<Link>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    LinkParser::with_config(config).parse_all(values, context)
}

/// Parse the `Link` header field values of a response, deriving the default
/// context from the request and response facts.
///
/// # Errors
///
/// Returns [`ParseError`] if any one value is malformed, including when a
/// relative reference needs a context that the facts do not provide.
pub fn parse_response_links<I, S>(
    facts: &ResponseFacts<'_>,
    values: I,
    config: ParserConfig,
) -> Result<Vec<Link>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let context = facts.default_context();
    LinkParser::with_config(config).parse_all(values, context.as_ref())
}
