//! Font source extraction from `@font-face` CSS.
//!
//! The whole scraping strategy lives behind [`extract_font_source`] so it can
//! be hardened without touching the resolver.

use regex::Regex;
use std::sync::LazyLock;

static FONT_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"src:\s*url\(\s*['"]?([^'")\s]+)['"]?\s*\)\s*format\(\s*['"](opentype|truetype)['"]\s*\)"#)
        .expect("font source pattern is valid")
});

/// Container format of an extracted font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    OpenType,
    TrueType,
}

/// A legacy-format `src` entry found in the CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSource {
    pub url: String,
    pub format: FontFormat,
}

/// Find the first `src` declaration whose format is `opentype` or `truetype`.
///
/// Declarations in other formats (woff, woff2, ...) are skipped, so a
/// stylesheet that only offers modern formats yields `None`.
pub fn extract_font_source(css: &str) -> Option<FontSource> {
    let captures = FONT_SOURCE.captures(css)?;
    let url = captures.get(1)?.as_str().to_string();
    let format = match captures.get(2)?.as_str() {
        "opentype" => FontFormat::OpenType,
        _ => FontFormat::TrueType,
    };
    Some(FontSource { url, format })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUETYPE_CSS: &str = "/* latin */
@font-face {
  font-family: 'Roboto';
  font-style: normal;
  font-weight: 400;
  src: url(https://fonts.gstatic.com/s/roboto/v30/KFOmCnqEu92Fr1Me5Q.ttf) format('truetype');
}
";

    #[test]
    fn test_truetype_source() {
        let source = extract_font_source(TRUETYPE_CSS).unwrap();
        assert_eq!(
            source.url,
            "https://fonts.gstatic.com/s/roboto/v30/KFOmCnqEu92Fr1Me5Q.ttf"
        );
        assert_eq!(source.format, FontFormat::TrueType);
    }

    #[test]
    fn test_opentype_source() {
        let css = "src: url(https://fonts.gstatic.com/x.otf) format('opentype');";
        let source = extract_font_source(css).unwrap();
        assert_eq!(source.url, "https://fonts.gstatic.com/x.otf");
        assert_eq!(source.format, FontFormat::OpenType);
    }

    #[test]
    fn test_modern_formats_only() {
        let css = "@font-face {
  src: url(https://fonts.gstatic.com/x.woff2) format('woff2');
}
@font-face {
  src: url(https://fonts.gstatic.com/x.woff) format('woff');
}";
        assert_eq!(extract_font_source(css), None);
    }

    #[test]
    fn test_skips_modern_block_before_legacy_block() {
        let css = "@font-face {
  src: url(https://fonts.gstatic.com/a.woff2) format('woff2');
}
@font-face {
  src: url(https://fonts.gstatic.com/b.ttf) format('truetype');
}
@font-face {
  src: url(https://fonts.gstatic.com/c.ttf) format('truetype');
}";
        let source = extract_font_source(css).unwrap();
        assert_eq!(source.url, "https://fonts.gstatic.com/b.ttf");
    }

    #[test]
    fn test_quoted_url() {
        let css = r#"src: url("https://fonts.gstatic.com/q.ttf") format("truetype");"#;
        assert_eq!(
            extract_font_source(css).unwrap().url,
            "https://fonts.gstatic.com/q.ttf"
        );
    }

    #[test]
    fn test_empty_css() {
        assert_eq!(extract_font_source(""), None);
    }
}
