use tracing::{debug, trace};
use url::Url;

use crate::error::ParseError;
use crate::types::{Extensions, Link, ParseMode};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings for the `Link` header parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Grammar tolerance (default: lax).
    pub mode: ParseMode,
}

impl ParserConfig {
    /// Configuration enforcing the literal RFC 8288 grammar.
    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
        }
    }

    /// Configuration accepting the relaxed list grammar and common deviations.
    pub fn lax() -> Self {
        Self {
            mode: ParseMode::Lax,
        }
    }
}

/// Parameter names with dedicated [`Link`] fields. Everything else is an
/// extension.
const RESERVED_PARAMS: [&str; 8] = [
    "rel", "rev", "anchor", "hreflang", "media", "title", "title*", "type",
];

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// A parser for `Link` header field values (RFC 8288 §3).
///
/// The parser holds no state between calls; one value can be shared freely.
///
/// ```rust
/// use weblink::{LinkParser, ParserConfig};
///
/// let parser = LinkParser::with_config(ParserConfig::strict());
/// let links = parser.parse("<https://example.com/2>; rel=next", None).unwrap();
/// assert_eq!(links[0].relation_types, ["next"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinkParser {
    config: ParserConfig,
}

impl LinkParser {
    /// Create a new parser with default (lax) configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a new parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse every header value in `values` and concatenate the links in
    /// input order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] produced by any value; no links are
    /// returned in that case.
    pub fn parse_all<I, S>(&self, values: I, context: Option<&Url>) -> Result<Vec<Link>, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut links = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            let parsed = self.parse(value.as_ref(), context).inspect_err(|e| {
                debug!(index, mode = %self.config.mode, error = %e, "rejecting Link header");
            })?;
            links.extend(parsed);
        }
        Ok(links)
    }

    /// Parse a single `Link` header field value.
    ///
    /// `context` is the default link context used to resolve relative
    /// references when an element has no `anchor` parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if any element of the list is malformed.
    pub fn parse(&self, value: &str, context: Option<&Url>) -> Result<Vec<Link>, ParseError> {
        let mode = self.config.mode;
        let mut scanner = Scanner::new(value);
        let mut links = Vec::new();

        if !mode.is_strict() && scanner.skip_empty_elements() {
            return Ok(links);
        }

        loop {
            if !mode.is_strict() && !links.is_empty() && scanner.at_truncated_reference() {
                trace!(
                    offset = scanner.pos,
                    "dropping trailing link-value with unterminated URI-reference"
                );
                break;
            }

            links.push(parse_link_value(&mut scanner, context, mode)?);

            if scanner.is_at_end() {
                let trimmed = value.trim_end_matches([' ', '\t']).len();
                if mode.is_strict() && trimmed < value.len() {
                    return Err(ParseError::TrailingWhitespace { offset: trimmed });
                }
                break;
            }

            scanner.expect(b',', "',' between link-values")?;
            scanner.skip_spaces();

            if !mode.is_strict() && scanner.skip_empty_elements() {
                break;
            }
        }

        Ok(links)
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Byte cursor over a header value.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
    }

    /// Skip commas and whitespace left by empty list elements. Returns `true`
    /// if nothing follows them.
    fn skip_empty_elements(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|b| b == b',' || is_space(b)) {
            self.pos += 1;
        }
        if self.pos > start {
            trace!(from = start, to = self.pos, "skipped empty list elements");
        }
        self.is_at_end()
    }

    /// `true` when the rest of the input opens a URI-reference it never
    /// closes.
    fn at_truncated_reference(&self) -> bool {
        let rest = &self.input[self.pos..];
        rest.starts_with('<') && !rest.contains('>')
    }

    /// Consume a run of bytes matching `pred`. The predicates used here only
    /// accept ASCII, so the run always ends on a char boundary.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), ParseError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Error describing whatever sits at the current position.
    fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedByte {
                expected,
                found,
                offset: self.pos,
            },
            None => ParseError::UnexpectedEnd { expected },
        }
    }
}

// ---------------------------------------------------------------------------
// Link-value grammar (RFC 8288 §3)
// ---------------------------------------------------------------------------

/// ```text
/// link-value = "<" URI-Reference ">" *( OWS ";" OWS link-param )
/// link-param = token BWS "=" BWS ( token / quoted-string )
/// ```
fn parse_link_value(
    scanner: &mut Scanner<'_>,
    context: Option<&Url>,
    mode: ParseMode,
) -> Result<Link, ParseError> {
    scanner.expect(b'<', "'<' opening a URI-reference")?;
    let reference = scanner.take_while(|b| b != b'>');
    scanner.expect(b'>', "'>' closing a URI-reference")?;

    let params = parse_params(scanner, mode)?;
    build_link(reference, &params, context, mode)
}

fn parse_params(scanner: &mut Scanner<'_>, mode: ParseMode) -> Result<Params, ParseError> {
    let mut params = Params::default();

    loop {
        scanner.skip_spaces();
        if scanner.peek() != Some(b';') {
            return Ok(params);
        }
        scanner.pos += 1;
        scanner.skip_spaces();

        let name = scanner.take_while(is_tchar);
        if name.is_empty() {
            return Err(scanner.unexpected("parameter name"));
        }

        if !mode.is_strict() {
            scanner.skip_spaces();
        }
        scanner.expect(b'=', "'=' after parameter name")?;
        if !mode.is_strict() {
            scanner.skip_spaces();
        }

        let value = if scanner.peek() == Some(b'"') {
            scanner.pos += 1;
            parse_quoted_string(scanner)?
        } else {
            let token = scanner.take_while(is_tchar);
            if token.is_empty() {
                return Err(scanner.unexpected("token or quoted-string parameter value"));
            }
            token.to_owned()
        };

        params.push(name, value);
    }
}

/// Parse the rest of a quoted-string, starting just past the opening DQUOTE.
///
/// ```text
/// quoted-string = DQUOTE *( qdtext / quoted-pair ) DQUOTE
/// quoted-pair   = "\" ( HTAB / SP / VCHAR / obs-text )
/// ```
fn parse_quoted_string(scanner: &mut Scanner<'_>) -> Result<String, ParseError> {
    let mut buf = Vec::new();

    loop {
        match scanner.next_byte() {
            Some(b'"') => break,
            Some(b'\\') => match scanner.next_byte() {
                Some(byte) if is_quoted_pair_char(byte) => buf.push(byte),
                Some(found) => {
                    return Err(ParseError::UnexpectedByte {
                        expected: "escapable character after '\\'",
                        found,
                        offset: scanner.pos - 1,
                    });
                }
                None => {
                    return Err(ParseError::UnexpectedEnd {
                        expected: "escaped character after '\\'",
                    });
                }
            },
            Some(byte) if is_qdtext(byte) => buf.push(byte),
            Some(found) => {
                return Err(ParseError::UnexpectedByte {
                    expected: "quoted-string character or closing '\"'",
                    found,
                    offset: scanner.pos - 1,
                });
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    expected: "closing '\"' of quoted-string",
                });
            }
        }
    }

    // Only ASCII backslashes were removed, so the bytes are still UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Apply the attribute rules of RFC 8288 §3.2–3.4 to one link-value.
fn build_link(
    reference: &str,
    params: &Params,
    default_context: Option<&Url>,
    mode: ParseMode,
) -> Result<Link, ParseError> {
    let relation_types = match params.all("rel") {
        [] => return Err(ParseError::MissingRelation),
        [_, _, ..] if mode.is_strict() => {
            return Err(ParseError::DuplicateParameter("rel".into()));
        }
        [rel, ..] => split_relations(rel),
    };
    if relation_types.is_empty() {
        return Err(ParseError::EmptyRelation);
    }

    let reverse_relation_types = params.first("rev").map(split_relations);

    // Repeated anchors are not an error; the first one wins.
    let context = match params.first("anchor") {
        Some(anchor) => Some(resolve(anchor, default_context).map_err(|source| {
            ParseError::InvalidAnchor {
                reference: anchor.to_owned(),
                source,
            }
        })?),
        None => default_context.cloned(),
    };

    let target = resolve(reference, context.as_ref()).map_err(|source| {
        ParseError::InvalidTarget {
            reference: reference.to_owned(),
            source,
        }
    })?;

    // Lax mode keeps every hreflang; strict mode allows one.
    let language_tags = match params.all("hreflang") {
        [] => None,
        [_, _, ..] if mode.is_strict() => {
            return Err(ParseError::DuplicateParameter("hreflang".into()));
        }
        tags => Some(tags.to_vec()),
    };
    let media_query = params.single("media", mode)?.map(str::to_owned);
    let plain_title = params.single("title", mode)?;
    let title = params
        .single("title*", mode)?
        .or(plain_title)
        .map(str::to_owned);
    let media_type = params.single("type", mode)?.map(str::to_owned);

    Ok(Link {
        target,
        context,
        relation_types,
        reverse_relation_types,
        language_tags,
        media_query,
        title,
        media_type,
        extensions: params.extensions(),
    })
}

fn split_relations(value: &str) -> Vec<String> {
    value
        .split(' ')
        .filter(|rel| !rel.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Resolve a URI-reference against an optional base. Without a base only
/// absolute references succeed.
fn resolve(reference: &str, base: Option<&Url>) -> Result<Url, url::ParseError> {
    Url::options().base_url(base).parse(reference)
}

// ---------------------------------------------------------------------------
// Parameter collection
// ---------------------------------------------------------------------------

/// Parameters of one link-value keyed by lowercased name. Every occurrence
/// is kept, in order, so each attribute rule can pick its own policy.
#[derive(Debug, Default)]
struct Params {
    entries: Vec<(String, Vec<String>)>,
}

impl Params {
    fn push(&mut self, name: &str, value: String) {
        let key = name.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    fn all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    fn first(&self, key: &str) -> Option<&str> {
        self.all(key).first().map(String::as_str)
    }

    /// First value of a parameter that may occur at most once in strict mode.
    fn single(&self, key: &str, mode: ParseMode) -> Result<Option<&str>, ParseError> {
        let values = self.all(key);
        if mode.is_strict() && values.len() > 1 {
            return Err(ParseError::DuplicateParameter(key.to_owned()));
        }
        Ok(values.first().map(String::as_str))
    }

    fn extensions(&self) -> Extensions {
        self.entries
            .iter()
            .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_str()))
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Character classification helpers (RFC 7230 §3.2.6)
// ---------------------------------------------------------------------------

/// `tchar` – characters allowed in tokens (parameter names, bare values).
///
/// ```text
/// tchar = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "." /
///         "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
/// ```
#[inline]
pub(crate) fn is_tchar(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
            | b'0'..=b'9'
            | b'a'..=b'z'
            | b'A'..=b'Z'
    )
}

/// `SP / HTAB`.
#[inline]
fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// `qdtext = HTAB / SP / %x21 / %x23-5B / %x5D-7E / obs-text`
#[inline]
fn is_qdtext(b: u8) -> bool {
    matches!(b, b'\t' | b' ' | 0x21 | 0x23..=0x5B | 0x5D..=0x7E | 0x80..=0xFF)
}

/// Second byte of a `quoted-pair`: `HTAB / SP / VCHAR / obs-text`.
#[inline]
fn is_quoted_pair_char(b: u8) -> bool {
    matches!(b, b'\t' | b' ' | 0x21..=0x7E | 0x80..=0xFF)
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------
