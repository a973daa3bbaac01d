use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

// ---------------------------------------------------------------------------
// ParseMode
// ---------------------------------------------------------------------------

/// How tolerant the parser is of deviations from the RFC 8288 grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Accept the relaxed list grammar of RFC 7230 §7 (empty list elements,
    /// trailing commas) along with spaces around `=`, trailing whitespace and
    /// repeated single-valued parameters (first occurrence wins).
    #[default]
    Lax,
    /// Enforce the literal ABNF.
    Strict,
}

impl ParseMode {
    /// Return the mode as a static string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lax => "lax",
            Self::Strict => "strict",
        }
    }

    pub fn is_strict(&self) -> bool {
        *self == Self::Strict
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("lax") {
            Ok(Self::Lax)
        } else if s.eq_ignore_ascii_case("strict") {
            Ok(Self::Strict)
        } else {
            Err(format!("unknown parse mode: '{s}'"))
        }
    }
}

// ---------------------------------------------------------------------------
// Link
// ---------------------------------------------------------------------------

/// Extension parameters: lowercased name to every raw value, in order of
/// occurrence.
pub type Extensions = BTreeMap<String, Vec<String>>;

/// A single parsed link (one element of a `Link` header field value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// The link target, resolved against the context. Always absolute.
    pub target: Url,
    /// The link context: the `anchor` parameter if present, otherwise the
    /// default context supplied by the caller.
    pub context: Option<Url>,
    /// Relation types from `rel`. Never empty.
    pub relation_types: Vec<String>,
    /// Reverse relation types from the deprecated `rev` parameter.
    pub reverse_relation_types: Option<Vec<String>>,
    /// Raw `hreflang` values, one per occurrence.
    pub language_tags: Option<Vec<String>>,
    /// Raw `media` value.
    pub media_query: Option<String>,
    /// `title*` if present, otherwise `title`. Extended values are not decoded.
    pub title: Option<String>,
    /// Raw `type` value.
    pub media_type: Option<String>,
    /// All other parameters.
    pub extensions: Extensions,
}

impl Link {
    /// Return `true` if `rel` names this relation type (case-insensitive).
    pub fn has_relation(&self, rel: &str) -> bool {
        self.relation_types
            .iter()
            .any(|r| r.eq_ignore_ascii_case(rel))
    }

    /// Look up the values of an extension parameter (case-insensitive).
    pub fn extension(&self, name: &str) -> Option<&[String]> {
        self.extensions
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }
}

/// Return the first link carrying the relation type `rel`.
pub fn find_relation<'a>(links: &'a [Link], rel: &str) -> Option<&'a Link> {
    links.iter().find(|link| link.has_relation(rel))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Link {
        let mut extensions = Extensions::new();
        extensions.insert("foo".into(), vec!["Bar".into()]);
        Link {
            target: Url::parse("https://example.com/page/2").unwrap(),
            context: None,
            relation_types: vec!["next".into(), "Prefetch".into()],
            reverse_relation_types: None,
            language_tags: None,
            media_query: None,
            title: None,
            media_type: None,
            extensions,
        }
    }

    #[test]
    fn relation_lookup_ignores_case() {
        let link = sample();
        assert!(link.has_relation("NEXT"));
        assert!(link.has_relation("prefetch"));
        assert!(!link.has_relation("prev"));
    }

    #[test]
    fn extension_lookup_ignores_case() {
        let link = sample();
        assert_eq!(link.extension("FOO"), Some(&["Bar".to_string()][..]));
        assert_eq!(link.extension("baz"), None);
    }

    #[test]
    fn find_relation_returns_first_match() {
        let mut other = sample();
        other.target = Url::parse("https://example.com/page/3").unwrap();
        let links = vec![sample(), other];
        let found = find_relation(&links, "next").unwrap();
        assert_eq!(found.target.as_str(), "https://example.com/page/2");
        assert!(find_relation(&links, "prev").is_none());
    }

    #[test]
    fn parse_mode_from_str() {
        assert_eq!("LAX".parse::<ParseMode>(), Ok(ParseMode::Lax));
        assert_eq!("strict".parse::<ParseMode>(), Ok(ParseMode::Strict));
        assert!("loose".parse::<ParseMode>().is_err());
        assert_eq!(ParseMode::default(), ParseMode::Lax);
    }
}
