use std::fmt::{self, Write as _};

use crate::parser::is_tchar;
use crate::types::Link;

/// Serialize parsed links to a JSON array.
///
/// When `pretty` is `true` the output is indented for readability.
pub fn format_json(links: &[Link], pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(links).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    } else {
        serde_json::to_string(links).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Render parsed links in a human-readable debug format.
pub fn format_debug(links: &[Link]) -> String {
    let mut out = String::with_capacity(128 * links.len().max(1));

    out.push_str(&format!("=== Links ({}) ===\n", links.len()));
    for (index, link) in links.iter().enumerate() {
        out.push_str(&format!("\n--- Link {} ---\n", index + 1));
        out.push_str(&format!("Target:  {}\n", link.target));
        match &link.context {
            Some(context) => out.push_str(&format!("Context: {context}\n")),
            None => out.push_str("Context: <none>\n"),
        }
        out.push_str(&format!("Rel:     {}\n", link.relation_types.join(" ")));
        if let Some(rev) = &link.reverse_relation_types {
            out.push_str(&format!("Rev:     {}\n", rev.join(" ")));
        }
        if let Some(tags) = &link.language_tags {
            out.push_str(&format!("Lang:    {}\n", tags.join(", ")));
        }
        if let Some(media) = &link.media_query {
            out.push_str(&format!("Media:   {media}\n"));
        }
        if let Some(title) = &link.title {
            out.push_str(&format!("Title:   {title}\n"));
        }
        if let Some(media_type) = &link.media_type {
            out.push_str(&format!("Type:    {media_type}\n"));
        }
        for (name, values) in &link.extensions {
            out.push_str(&format!("  {name}: {}\n", values.join(", ")));
        }
    }

    out.push_str("====================\n");
    out
}

/// Render links back into a single `Link` header field value.
pub fn format_header(links: &[Link]) -> String {
    links
        .iter()
        .map(Link::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Link {
    /// Writes a `link-value` that parses back to the same target, context
    /// and relation types.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.target)?;
        write_param(f, "rel", &self.relation_types.join(" "))?;
        if let Some(context) = &self.context {
            write_param(f, "anchor", context.as_str())?;
        }
        if let Some(rev) = &self.reverse_relation_types {
            write_param(f, "rev", &rev.join(" "))?;
        }
        for tag in self.language_tags.iter().flatten() {
            write_param(f, "hreflang", tag)?;
        }
        if let Some(media) = &self.media_query {
            write_param(f, "media", media)?;
        }
        if let Some(title) = &self.title {
            write_param(f, "title", title)?;
        }
        if let Some(media_type) = &self.media_type {
            write_param(f, "type", media_type)?;
        }
        for (name, values) in &self.extensions {
            for value in values {
                write_param(f, name, value)?;
            }
        }
        Ok(())
    }
}

fn write_param(f: &mut fmt::Formatter<'_>, name: &str, value: &str) -> fmt::Result {
    write!(f, "; {name}=")?;
    if !value.is_empty() && value.bytes().all(is_tchar) {
        return f.write_str(value);
    }
    f.write_char('"')?;
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(ch)?;
    }
    f.write_char('"')
}
