use std::str;

use log::debug;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::reader::Reader as XmlReader;

use crate::error::WxrError;

use super::event::{Attributes, EventKind, ParseEvent};

/// Turns well-formed XML text into the flat event stream the tree is built from.
pub trait Tokenizer {
    fn tokenize(&self, xml: &str) -> Result<Vec<ParseEvent>, WxrError>;
}

/// [`Tokenizer`] backed by `quick-xml`.
///
/// An element holding only text is reported as a single `Complete` event
/// carrying that text. An element holding child elements is reported as
/// `Open` (with the text preceding its first child), the children, then
/// `Close`. Text following a child element becomes a `Text` event.
/// Text made only of XML whitespace is dropped, line endings are normalized
/// to `\n` and predefined entity and character references are resolved.
///
/// # Examples
///
/// ```
/// use wxr_flatten::wxr::event::{EventKind, ParseEvent};
/// use wxr_flatten::wxr::tokenizer::{QuickXmlTokenizer, Tokenizer};
///
/// let events = QuickXmlTokenizer::new()
///     .tokenize(r#"<item><guid isPermaLink="false">http://x</guid></item>"#)
///     .unwrap();
///
/// assert_eq!(
///     events,
///     vec![
///         ParseEvent::open("item"),
///         ParseEvent::complete("guid")
///             .with_value("http://x")
///             .with_attribute("isPermaLink", "false"),
///         ParseEvent::close("item"),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuickXmlTokenizer {
    fold_case: bool,
}

/// An element whose start tag was read but no child element yet.
struct Pending {
    tag: String,
    attributes: Attributes,
}

impl Pending {
    fn into_event(self, kind: EventKind, text: &mut String) -> ParseEvent {
        ParseEvent {
            kind,
            tag: Some(self.tag),
            value: take_text(text),
            attributes: self.attributes,
        }
    }
}

impl QuickXmlTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper-cases every tag name. Attribute names keep their case.
    pub fn fold_case(mut self, yes: bool) -> Self {
        self.fold_case = yes;
        self
    }

    fn tag_name(&self, raw: &[u8]) -> Result<String, WxrError> {
        let name = str::from_utf8(raw)
            .map_err(|e| WxrError::Tokenizer(format!("invalid UTF-8 in tag name: {}", e)))?;

        Ok(if self.fold_case {
            name.to_uppercase()
        } else {
            name.to_string()
        })
    }

    fn start(&self, start: &BytesStart) -> Result<Pending, WxrError> {
        let tag = self.tag_name(start.name().as_ref())?;

        let mut attributes = Attributes::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                WxrError::Tokenizer(format!("invalid attribute in <{}>: {}", tag, e))
            })?;
            let key = str::from_utf8(attr.key.as_ref())
                .map_err(|e| WxrError::Tokenizer(format!("invalid attribute name: {}", e)))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| WxrError::Tokenizer(format!("invalid value for {}: {}", key, e)))?
                .into_owned();
            attributes.insert(key, value);
        }

        Ok(Pending { tag, attributes })
    }
}

impl Tokenizer for QuickXmlTokenizer {
    fn tokenize(&self, xml: &str) -> Result<Vec<ParseEvent>, WxrError> {
        let mut reader = XmlReader::from_str(xml);

        let mut events = Vec::new();
        let mut pending: Option<Pending> = None;
        let mut text = String::new();
        let mut depth = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| {
                WxrError::Tokenizer(format!("{} at position {}", e, reader.error_position()))
            })?;

            match event {
                Event::Start(ref start) => {
                    flush(&mut pending, &mut text, &mut events);
                    pending = Some(self.start(start)?);
                    depth += 1;
                }
                Event::Empty(ref start) => {
                    flush(&mut pending, &mut text, &mut events);
                    let element = self.start(start)?;
                    events.push(element.into_event(EventKind::Complete, &mut String::new()));
                }
                Event::End(ref end) => {
                    depth = depth.saturating_sub(1);
                    match pending.take() {
                        Some(element) => {
                            events.push(element.into_event(EventKind::Complete, &mut text));
                        }
                        None => {
                            flush(&mut pending, &mut text, &mut events);
                            events.push(ParseEvent::close(self.tag_name(end.name().as_ref())?));
                        }
                    }
                }
                Event::Text(ref content) => {
                    text.push_str(&content.xml_content().map_err(decoding)?)
                }
                Event::CData(ref content) => {
                    text.push_str(&content.xml_content().map_err(decoding)?)
                }
                Event::GeneralRef(ref reference) => text.push_str(&resolve_reference(reference)?),
                Event::Eof => break,
                _ => {}
            }
        }

        if depth > 0 {
            return Err(WxrError::Tokenizer(format!(
                "{} element(s) left open at end of document",
                depth
            )));
        }

        debug!("Tokenized XML into {} events", events.len());
        Ok(events)
    }
}

/// Emits the pending element as `Open`, or loose text as a `Text` event.
fn flush(pending: &mut Option<Pending>, text: &mut String, events: &mut Vec<ParseEvent>) {
    match pending.take() {
        Some(element) => events.push(element.into_event(EventKind::Open, text)),
        None => {
            if let Some(value) = take_text(text) {
                events.push(ParseEvent::text(value));
            }
        }
    }
}

/// Drains the buffer, dropping text made only of XML whitespace.
fn take_text(text: &mut String) -> Option<String> {
    let value = std::mem::take(text);
    if value.chars().all(is_xml_whitespace) {
        None
    } else {
        Some(value)
    }
}

fn is_xml_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn decoding<E: std::fmt::Display>(error: E) -> WxrError {
    WxrError::Tokenizer(format!("invalid text: {}", error))
}

/// Resolves predefined entities and character references. Any other entity
/// is kept as written.
fn resolve_reference(reference: &BytesRef) -> Result<String, WxrError> {
    if let Some(ch) = reference.resolve_char_ref().map_err(decoding)? {
        return Ok(ch.to_string());
    }

    let name = reference.decode().map_err(decoding)?;
    Ok(match resolve_predefined_entity(&name) {
        Some(resolved) => resolved.to_string(),
        None => format!("&{};", name),
    })
}
