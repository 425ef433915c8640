//! Minimal tolerant HTML helpers: entity decoding and tag stripping.
//!
//! The site pages carry a narrow, known markup family, so no DOM is built;
//! local regex scanning is resilient to whitespace and attribute noise.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Regex matching named and numeric character references.
#[allow(clippy::expect_used)]
static RE_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#x?[0-9a-fA-F]+|[a-zA-Z]+);").expect("valid regex: RE_ENTITY")
});

/// Regex matching script elements with their content.
#[allow(clippy::expect_used)]
static RE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("valid regex: RE_SCRIPT")
});

/// Regex matching style elements with their content.
#[allow(clippy::expect_used)]
static RE_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("valid regex: RE_STYLE")
});

/// Regex matching tags that imply a line break.
#[allow(clippy::expect_used)]
static RE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</p>|</div>|</li>|</h[1-6]>").expect("valid regex: RE_LINE_BREAK")
});

/// Regex matching any remaining tag.
#[allow(clippy::expect_used)]
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<[^>]*>").expect("valid regex: RE_TAG")
});

/// Decode named and numeric character references.
///
/// Unknown named references are left untouched rather than dropped.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    RE_ENTITY
        .replace_all(input, |caps: &Captures<'_>| {
            let body = &caps[1];
            match body {
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "amp" => "&".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                "nbsp" => " ".to_string(),
                _ => decode_accent(body)
                    .map(String::from)
                    .or_else(|| decode_numeric(body))
                    .unwrap_or_else(|| caps[0].to_string()),
            }
        })
        .into_owned()
}

/// Decode the accented-letter references common in Portuguese lyrics.
fn decode_accent(body: &str) -> Option<&'static str> {
    let decoded = match body {
        "aacute" => "á",
        "agrave" => "à",
        "acirc" => "â",
        "atilde" => "ã",
        "ccedil" => "ç",
        "eacute" => "é",
        "ecirc" => "ê",
        "iacute" => "í",
        "oacute" => "ó",
        "ocirc" => "ô",
        "otilde" => "õ",
        "uacute" => "ú",
        "uuml" => "ü",
        _ => return None,
    };
    Some(decoded)
}

/// Decode a numeric reference body like `#233` or `#xE9`.
fn decode_numeric(body: &str) -> Option<String> {
    let digits = body.strip_prefix('#')?;
    let code = digits.strip_prefix(['x', 'X']).map_or_else(
        || digits.parse::<u32>().ok(),
        |hex| u32::from_str_radix(hex, 16).ok(),
    )?;
    char::from_u32(code).map(String::from)
}

/// Strip markup from an HTML fragment, turning block-level closers and
/// `<br>` into line breaks. Does not decode entities; call
/// [`decode_entities`] separately (and only once).
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let text = RE_SCRIPT.replace_all(html, "");
    let text = RE_STYLE.replace_all(&text, "");
    let text = RE_LINE_BREAK.replace_all(&text, "\n");
    let text = RE_TAG.replace_all(&text, "");
    // Tidy line edges without collapsing blank lines (they are significant
    // segment boundaries downstream).
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
