//! JSDoc Tags
//!
//! Tag model and serializer for documentation-comment statements. The
//! serialized form is the comment body without the enclosing `/*` and `*/`,
//! which the printer adds.

use crate::error::{OutputAstError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Text that would close the surrounding block comment early.
static COMMENT_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*|\*/").expect("comment delimiter pattern"));

/// The JSDoc tags we currently emit. Arbitrary tag names are still accepted
/// through `JSDocTag::named`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JSDocTagName {
    Desc,
    Id,
    Meaning,
}

impl JSDocTagName {
    pub fn as_str(&self) -> &'static str {
        match self {
            JSDocTagName::Desc => "desc",
            JSDocTagName::Id => "id",
            JSDocTagName::Meaning => "meaning",
        }
    }
}

impl From<JSDocTagName> for String {
    fn from(name: JSDocTagName) -> Self {
        name.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JSDocTag {
    /// Plain documentation text that occurs before any `@tag` lines.
    Text(String),
    /// `@tag_name` followed by optional text, e.g. the description.
    Named {
        tag_name: String,
        text: Option<String>,
    },
}

impl JSDocTag {
    pub fn text(text: impl Into<String>) -> Self {
        JSDocTag::Text(text.into())
    }

    pub fn named(tag_name: impl Into<String>, text: Option<String>) -> Self {
        JSDocTag::Named {
            tag_name: tag_name.into(),
            text,
        }
    }
}

/// Serializes a single tag into e.g. ` @foo {bar} baz` (note the leading space).
fn tag_to_string(tag: &JSDocTag) -> Result<String> {
    let mut out = String::new();
    let text = match tag {
        JSDocTag::Text(text) => Some(text.as_str()),
        JSDocTag::Named { tag_name, text } => {
            if !tag_name.is_empty() {
                out.push_str(" @");
                out.push_str(tag_name);
            }
            text.as_deref()
        }
    };

    if let Some(text) = text.filter(|t| !t.is_empty()) {
        if COMMENT_DELIMITER_RE.is_match(text) {
            return Err(OutputAstError::InvalidJsDocText(text.to_string()));
        }
        out.push(' ');
        out.push_str(&text.replace('@', "\\@"));
    }
    Ok(out)
}

/// Serializes a tag list into a JSDoc comment body. An empty list serializes
/// to an empty string.
pub fn serialize_tags(tags: &[JSDocTag]) -> Result<String> {
    if tags.is_empty() {
        return Ok(String::new());
    }

    let mut out = String::from("*\n");
    for tag in tags {
        out.push_str(" *");
        // Multi-line tags continue with a " * " prefix on every line.
        out.push_str(&tag_to_string(tag)?.replace('\n', "\n * "));
        out.push('\n');
    }
    out.push(' ');
    Ok(out)
}
