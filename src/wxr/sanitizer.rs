use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::reader::Reader as XmlReader;

use crate::error::WxrError;

use super::config::{is_enabled, SanitizerOptions};

/// Repairs raw export text into well-formed XML.
///
/// Options are passed through untouched; each implementation decides which
/// keys it understands.
pub trait XmlSanitizer {
    fn sanitize(&self, raw: &str, options: &SanitizerOptions) -> Result<String, WxrError>;
}

/// Light-weight [`XmlSanitizer`] for exports that are almost well-formed.
///
/// Understood options:
/// - `clean`: drops a leading byte order mark, removes control characters XML
///   1.0 forbids and escapes `&` characters that do not start a reference;
/// - `ascii-chars` (with `clean`): replaces typographic quotes, dashes,
///   ellipses and no-break spaces with ASCII.
///
/// The result is then checked for well-formedness; mismatched or unclosed
/// tags are reported, not repaired.
#[derive(Debug, Clone, Default)]
pub struct BasicSanitizer;

impl XmlSanitizer for BasicSanitizer {
    fn sanitize(&self, raw: &str, options: &SanitizerOptions) -> Result<String, WxrError> {
        if raw.is_empty() {
            return Ok(String::new());
        }

        let mut xml = raw.to_string();
        if is_enabled(options, "clean") {
            xml = escape_bare_ampersands(&strip_invalid_chars(xml.trim_start_matches('\u{feff}')));

            if is_enabled(options, "ascii-chars") {
                xml = to_ascii_punctuation(&xml);
            }
        }

        check_well_formed(&xml).map_err(WxrError::Sanitization)?;
        debug!("Sanitized {} bytes of XML into {} bytes", raw.len(), xml.len());

        Ok(xml)
    }
}

fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r') || ch >= ' '
}

fn strip_invalid_chars(xml: &str) -> String {
    let cleaned: String = xml.chars().filter(|&ch| is_xml_char(ch)).collect();
    if cleaned.len() != xml.len() {
        warn!("Removed {} invalid control character(s)", xml.len() - cleaned.len());
    }
    cleaned
}

/// Escapes every `&` not followed by `name;`, `#digits;` or `#xhex;`.
/// CDATA sections and comments are copied verbatim.
fn escape_bare_ampersands(xml: &str) -> String {
    let mut escaped = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(pos) = rest.find(['&', '<']) {
        let (head, tail) = rest.split_at(pos);
        escaped.push_str(head);

        if let Some(section) = verbatim_section(tail) {
            escaped.push_str(section);
            rest = &tail[section.len()..];
        } else {
            if tail.starts_with('&') && !starts_reference(&tail[1..]) {
                escaped.push_str("&amp;");
            } else {
                escaped.push_str(&tail[..1]);
            }
            rest = &tail[1..];
        }
    }

    escaped.push_str(rest);
    escaped
}

fn verbatim_section(tail: &str) -> Option<&str> {
    for (open, close) in [("<![CDATA[", "]]>"), ("<!--", "-->")] {
        if tail.starts_with(open) {
            let end = tail[open.len()..]
                .find(close)
                .map_or(tail.len(), |index| open.len() + index + close.len());
            return Some(&tail[..end]);
        }
    }
    None
}

fn starts_reference(rest: &str) -> bool {
    let end = rest
        .find(|c: char| !(c.is_alphanumeric() || matches!(c, '#' | '_' | '-' | '.')))
        .unwrap_or(rest.len());
    if !rest[end..].starts_with(';') {
        return false;
    }
    let name = &rest[..end];

    if let Some(number) = name.strip_prefix('#') {
        return match number.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()),
        };
    }

    name.chars()
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && !name.contains('#')
}

fn to_ascii_punctuation(xml: &str) -> String {
    let mut ascii = String::with_capacity(xml.len());
    for ch in xml.chars() {
        match ch {
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{2032}' => ascii.push('\''),
            '\u{201c}' | '\u{201d}' | '\u{201e}' | '\u{2033}' => ascii.push('"'),
            '\u{2010}'..='\u{2015}' => ascii.push('-'),
            '\u{2026}' => ascii.push_str("..."),
            '\u{00a0}' => ascii.push(' '),
            other => ascii.push(other),
        }
    }
    ascii
}

/// Walks the whole document, failing on syntax errors or unbalanced tags.
fn check_well_formed(xml: &str) -> Result<(), String> {
    let mut reader = XmlReader::from_str(xml);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("{} at position {}", e, reader.error_position()))?;

        match event {
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::Empty(_) if depth == 0 => roots += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(format!("{} element(s) left open at end of document", depth));
    }
    if roots > 1 {
        return Err(format!("{} root elements found, expected one", roots));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        error::WxrError,
        wxr::config::{default_sanitizer_options, SanitizerOptions},
    };

    use super::{BasicSanitizer, XmlSanitizer};

    fn sanitize(raw: &str) -> Result<String, WxrError> {
        BasicSanitizer.sanitize(raw, &default_sanitizer_options())
    }

    #[test]
    fn sanitize_should_keep_well_formed_xml() {
        let xml = r#"<rss version="2.0"><title>Fish &amp; Chips &#169;</title></rss>"#;

        assert_eq!(sanitize(xml).unwrap(), xml);
    }

    #[test]
    fn sanitize_should_escape_bare_ampersands() {
        let xml = "<title>Fish & Chips &amp; Peas &#38; &#x26; &copy;</title>";

        assert_eq!(
            sanitize(xml).unwrap(),
            "<title>Fish &amp; Chips &amp; Peas &#38; &#x26; &copy;</title>"
        );
    }

    #[test]
    fn sanitize_should_strip_bom_and_control_characters() {
        let xml = "\u{feff}<title>Hello\u{0}\u{8} world\u{b}</title>";

        assert_eq!(sanitize(xml).unwrap(), "<title>Hello world</title>");
    }

    #[test]
    fn sanitize_should_convert_typography_when_asked() {
        let mut options = default_sanitizer_options();
        options.insert("ascii-chars".to_string(), json!(true));

        let result = BasicSanitizer
            .sanitize("<t>\u{201c}Hi\u{201d} \u{2014} it\u{2019}s\u{2026}</t>", &options)
            .unwrap();

        assert_eq!(result, "<t>\"Hi\" - it's...</t>");
    }

    #[test]
    fn sanitize_should_leave_text_alone_without_clean() {
        let options = SanitizerOptions::from([("clean".to_string(), json!(false))]);

        let result = BasicSanitizer.sanitize("<t>\u{201c}Hi\u{201d}</t>", &options).unwrap();

        assert_eq!(result, "<t>\u{201c}Hi\u{201d}</t>");
    }

    #[test]
    fn sanitize_should_return_empty_input_unchanged() {
        assert_eq!(sanitize("").unwrap(), "");
    }

    #[test]
    fn sanitize_should_reject_unbalanced_tags() {
        assert!(matches!(sanitize("<rss><channel></rss>"), Err(WxrError::Sanitization(_))));
        assert!(matches!(sanitize("<rss><channel>"), Err(WxrError::Sanitization(_))));
    }

    #[test]
    fn sanitize_should_not_escape_inside_cdata_or_comments() {
        let xml = "<t><!-- a & b --><![CDATA[Fish & Chips]]> & more</t>";

        assert_eq!(
            sanitize(xml).unwrap(),
            "<t><!-- a & b --><![CDATA[Fish & Chips]]> &amp; more</t>"
        );
    }

    #[test]
    fn sanitize_should_reject_several_roots() {
        assert!(matches!(sanitize("<a/><b/>"), Err(WxrError::Sanitization(_))));
    }
}
