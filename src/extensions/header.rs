//! Extension header values and their parser.
//!
//! One requested extension looks like `token; param1=value1; param2`.
//! The comma-separated list of such values is normally split by the HTTP
//! layer; [`split_header_value`] is provided for callers that still hold
//! the raw `Sec-WebSocket-Extensions` header.

use crate::error::{Error, Result};
use std::fmt;

/// Represents a single extension parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionParam {
    /// Parameter name (e.g., "client_max_window_bits").
    pub name: String,
    /// Optional parameter value. None for boolean parameters.
    pub value: Option<String>,
}

impl ExtensionParam {
    /// Create a new parameter with a value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Create a boolean/flag parameter (no value).
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Check if this is a flag parameter.
    pub fn is_flag(&self) -> bool {
        self.value.is_none()
    }
}

impl fmt::Display for ExtensionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) if is_token(v) => write!(f, "{}={}", self.name, v),
            Some(v) => write!(f, "{}=\"{}\"", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One requested (or supported) extension: a token and its ordered parameters.
///
/// Immutable once built. Use [`ExtensionHeaderBuilder`] to derive a
/// modified copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionHeader {
    token: String,
    params: Vec<ExtensionParam>,
}

impl ExtensionHeader {
    /// Parse a single extension value.
    ///
    /// Format: `extension-token; param1=value1; param2`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtensionToken`] if the string is empty, the
    /// token is missing or not a valid HTTP token, or any parameter segment
    /// has no name.
    pub fn parse(raw: &str) -> Result<Self> {
        ExtensionHeaderBuilder::parse(raw)?.build()
    }

    /// Create a parameter-less header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtensionToken`] if `token` is not a valid HTTP token.
    pub fn bare(token: impl Into<String>) -> Result<Self> {
        ExtensionHeaderBuilder::new(token).build()
    }

    /// The extension token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Parameters in the order they were supplied.
    pub fn params(&self) -> &[ExtensionParam] {
        &self.params
    }

    /// Get the first parameter with the given name.
    pub fn param(&self, name: &str) -> Option<&ExtensionParam> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Get the value of the first parameter with the given name.
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.param(name).and_then(|p| p.value.as_deref())
    }

    /// Check if a parameter is present.
    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    /// Compare by token only, ignoring parameters.
    ///
    /// This is the membership test used against the supported set, whose
    /// headers never carry parameters.
    pub fn same_token(&self, other: &ExtensionHeader) -> bool {
        self.token == other.token
    }
}

impl fmt::Display for ExtensionHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)?;
        for param in &self.params {
            write!(f, "; {}", param)?;
        }
        Ok(())
    }
}

/// Builds an [`ExtensionHeader`], either from parts or from a raw string.
#[derive(Debug, Clone, Default)]
pub struct ExtensionHeaderBuilder {
    token: String,
    params: Vec<ExtensionParam>,
}

impl ExtensionHeaderBuilder {
    /// Start a header with the given token and no parameters.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            params: Vec::new(),
        }
    }

    /// Start from an existing header.
    pub fn from_header(header: &ExtensionHeader) -> Self {
        Self {
            token: header.token.clone(),
            params: header.params.clone(),
        }
    }

    /// Split a raw extension value into token and parameters.
    ///
    /// Token and parameter parts are trimmed; a value wrapped in double
    /// quotes is unquoted. Token characters are checked by [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtensionToken`] if the string is blank or a
    /// `;`-delimited segment is empty or has no name.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_token("empty extension string"));
        }

        let mut segments = split_unquoted(trimmed, ';').into_iter();
        let token = segments.next().unwrap_or_default().trim();

        if token.is_empty() {
            return Err(Error::invalid_token(format!(
                "missing extension token in '{}'",
                trimmed
            )));
        }

        let mut builder = Self::new(token);
        for segment in segments {
            builder.params.push(parse_param(segment, trimmed)?);
        }

        Ok(builder)
    }

    /// Append a parameter with a value.
    #[must_use]
    pub fn append_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(ExtensionParam::new(name, value));
        self
    }

    /// Append a flag parameter.
    #[must_use]
    pub fn append_flag(mut self, name: impl Into<String>) -> Self {
        self.params.push(ExtensionParam::flag(name));
        self
    }

    /// Replace the first parameter with the same name, or append it.
    #[must_use]
    pub fn set_parameter(mut self, param: ExtensionParam) -> Self {
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
        self
    }

    /// Validate and produce the immutable header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtensionToken`] if the token or a parameter
    /// name is not a valid HTTP token, or a value contains characters that
    /// cannot be carried in a quoted-string.
    pub fn build(self) -> Result<ExtensionHeader> {
        if !is_token(&self.token) {
            return Err(Error::invalid_token(format!(
                "invalid extension token '{}'",
                self.token
            )));
        }

        for param in &self.params {
            if !is_token(&param.name) {
                return Err(Error::invalid_token(format!(
                    "invalid parameter name '{}' in extension '{}'",
                    param.name, self.token
                )));
            }
            if let Some(value) = &param.value {
                if !is_quotable(value) {
                    return Err(Error::invalid_token(format!(
                        "invalid value for parameter '{}' in extension '{}'",
                        param.name, self.token
                    )));
                }
            }
        }

        Ok(ExtensionHeader {
            token: self.token,
            params: self.params,
        })
    }
}

/// Split a `Sec-WebSocket-Extensions` header value into individual offers.
///
/// Empty list elements are skipped, as RFC 7230 list syntax allows. Commas
/// inside a quoted parameter value do not split.
pub fn split_header_value(header: &str) -> Vec<String> {
    split_unquoted(header, ',')
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on `delim` outside double-quoted sections.
fn split_unquoted(s: &str, delim: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == delim && !in_quotes => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn parse_param(segment: &str, raw: &str) -> Result<ExtensionParam> {
    let segment = segment.trim();
    let (name, value) = match segment.split_once('=') {
        Some((name, value)) => (name.trim(), Some(unquote(value.trim()))),
        None => (segment, None),
    };

    if name.is_empty() {
        return Err(Error::invalid_token(format!(
            "missing parameter name in '{}'",
            raw
        )));
    }
    if value.is_some_and(str::is_empty) {
        return Err(Error::invalid_token(format!(
            "missing value for parameter '{}' in '{}'",
            name, raw
        )));
    }

    Ok(ExtensionParam {
        name: name.to_string(),
        value: value.map(str::to_string),
    })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// RFC 7230 `tchar`.
fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

pub(crate) fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_tchar)
}

fn is_quotable(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| (c == ' ' || c.is_ascii_graphic()) && !matches!(c, '"' | '\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // ExtensionParam Tests
    // ==========================================================================

    #[test]
    fn test_extension_param_new() {
        let param = ExtensionParam::new("client_max_window_bits", "15");
        assert_eq!(param.name, "client_max_window_bits");
        assert_eq!(param.value, Some("15".to_string()));
        assert!(!param.is_flag());
    }

    #[test]
    fn test_extension_param_flag() {
        let param = ExtensionParam::flag("server_no_context_takeover");
        assert_eq!(param.value, None);
        assert!(param.is_flag());
    }

    #[test]
    fn test_extension_param_display() {
        assert_eq!(ExtensionParam::new("bits", "15").to_string(), "bits=15");
        assert_eq!(ExtensionParam::flag("no_context").to_string(), "no_context");
        assert_eq!(
            ExtensionParam::new("label", "two words").to_string(),
            "label=\"two words\""
        );
    }

    // ==========================================================================
    // Parsing Tests
    // ==========================================================================

    #[test]
    fn test_parse_simple() {
        let header = ExtensionHeader::parse("permessage-deflate").unwrap();
        assert_eq!(header.token(), "permessage-deflate");
        assert!(header.params().is_empty());
    }

    #[test]
    fn test_parse_with_params() {
        let header =
            ExtensionHeader::parse("name; param1=value1; param2").unwrap();
        assert_eq!(header.token(), "name");
        assert_eq!(header.params().len(), 2);
        assert_eq!(header.params()[0], ExtensionParam::new("param1", "value1"));
        assert_eq!(header.params()[1], ExtensionParam::flag("param2"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let header = ExtensionHeader::parse("  compression ;  level = 5 ;fast ").unwrap();
        assert_eq!(header.token(), "compression");
        assert_eq!(header.param_value("level"), Some("5"));
        assert!(header.has_param("fast"));
    }

    #[test]
    fn test_parse_quoted_value() {
        let header = ExtensionHeader::parse("ext; label=\"quoted value\"").unwrap();
        assert_eq!(header.param_value("label"), Some("quoted value"));
    }

    #[test]
    fn test_parse_quoted_value_with_delimiters() {
        let header = ExtensionHeader::parse("ext; v=\"a,b\"; list=\"x;y\"; flag").unwrap();
        assert_eq!(header.params().len(), 3);
        assert_eq!(header.param_value("v"), Some("a,b"));
        assert_eq!(header.param_value("list"), Some("x;y"));
        assert!(header.has_param("flag"));
        assert_eq!(header.to_string(), "ext; v=\"a,b\"; list=\"x;y\"; flag");
    }

    #[test]
    fn test_parse_unterminated_quote_error() {
        assert!(ExtensionHeader::parse("ext; v=\"a; b").is_err());
    }

    #[test]
    fn test_parse_preserves_param_order() {
        let header = ExtensionHeader::parse("ext; c; a=1; b=2").unwrap();
        let names: Vec<_> = header.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn test_parse_token_is_case_sensitive() {
        let header = ExtensionHeader::parse("Compression").unwrap();
        assert_eq!(header.token(), "Compression");
        assert!(!header.same_token(&ExtensionHeader::bare("compression").unwrap()));
    }

    #[test]
    fn test_parse_empty_error() {
        assert!(matches!(
            ExtensionHeader::parse(""),
            Err(Error::InvalidExtensionToken(_))
        ));
        assert!(matches!(
            ExtensionHeader::parse("   "),
            Err(Error::InvalidExtensionToken(_))
        ));
    }

    #[test]
    fn test_parse_missing_token_error() {
        assert!(ExtensionHeader::parse("; level=5").is_err());
    }

    #[test]
    fn test_parse_empty_segments_error() {
        assert!(matches!(
            ExtensionHeader::parse("bad;;;"),
            Err(Error::InvalidExtensionToken(_))
        ));
        assert!(ExtensionHeader::parse("ext;").is_err());
    }

    #[test]
    fn test_parse_missing_param_name_error() {
        assert!(ExtensionHeader::parse("ext; =5").is_err());
    }

    #[test]
    fn test_parse_missing_param_value_error() {
        assert!(ExtensionHeader::parse("ext; level=").is_err());
    }

    #[test]
    fn test_parse_invalid_token_chars_error() {
        assert!(ExtensionHeader::parse("two words").is_err());
        assert!(ExtensionHeader::parse("a,b").is_err());
        assert!(ExtensionHeader::parse("ext; bad name=1").is_err());
    }

    // ==========================================================================
    // Display / Builder Tests
    // ==========================================================================

    #[test]
    fn test_display_round_trip() {
        let raw = "permessage-deflate; client_max_window_bits=15; server_no_context_takeover";
        let header = ExtensionHeader::parse(raw).unwrap();
        assert_eq!(header.to_string(), raw);
        assert_eq!(ExtensionHeader::parse(&header.to_string()).unwrap(), header);
    }

    #[test]
    fn test_builder_append_and_set() {
        let header = ExtensionHeaderBuilder::new("ext")
            .append_parameter("level", "1")
            .append_flag("fast")
            .set_parameter(ExtensionParam::new("level", "9"))
            .set_parameter(ExtensionParam::flag("strict"))
            .build()
            .unwrap();

        assert_eq!(header.to_string(), "ext; level=9; fast; strict");
    }

    #[test]
    fn test_builder_from_header() {
        let original = ExtensionHeader::parse("ext; a=1").unwrap();
        let derived = ExtensionHeaderBuilder::from_header(&original)
            .append_flag("b")
            .build()
            .unwrap();

        assert_eq!(original.params().len(), 1);
        assert_eq!(derived.to_string(), "ext; a=1; b");
        assert!(derived.same_token(&original));
        assert_ne!(derived, original);
    }

    #[test]
    fn test_builder_rejects_bad_value() {
        let result = ExtensionHeaderBuilder::new("ext")
            .append_parameter("v", "say \"hi\"")
            .build();
        assert!(result.is_err());

        let result = ExtensionHeaderBuilder::new("ext")
            .append_parameter("v", "a\\b")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_quotes_delimiters_in_value() {
        let header = ExtensionHeaderBuilder::new("ext")
            .append_parameter("v", "a;b,c")
            .build()
            .unwrap();
        assert_eq!(header.to_string(), "ext; v=\"a;b,c\"");
        assert_eq!(ExtensionHeader::parse(&header.to_string()).unwrap(), header);
    }

    #[test]
    fn test_bare_header() {
        let header = ExtensionHeader::bare("compression").unwrap();
        assert_eq!(header.to_string(), "compression");
        assert!(ExtensionHeader::bare("").is_err());
    }

    // ==========================================================================
    // Header Value Splitting
    // ==========================================================================

    #[test]
    fn test_split_header_value() {
        let offers = split_header_value(
            "permessage-deflate; client_max_window_bits, , x-webkit-deflate-frame",
        );
        assert_eq!(
            offers,
            ["permessage-deflate; client_max_window_bits", "x-webkit-deflate-frame"]
        );
    }

    #[test]
    fn test_split_header_value_keeps_quoted_commas() {
        let offers = split_header_value("ext; v=\"a,b\", other; w=1");
        assert_eq!(offers, ["ext; v=\"a,b\"", "other; w=1"]);
        assert_eq!(
            ExtensionHeader::parse(&offers[0]).unwrap().param_value("v"),
            Some("a,b")
        );
    }

    #[test]
    fn test_split_header_value_empty() {
        assert!(split_header_value("").is_empty());
        assert!(split_header_value(" , ").is_empty());
    }
}
