//! Namespace-insensitive element text extraction.
//!
//! The store responses follow an undocumented schema, so nothing here knows
//! about their structure: callers name the leaf elements they want and get
//! back each match in document order. Everything else is skipped.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// XML extraction errors
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("Malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("Malformed XML: {0}")]
    IllFormed(String),

    #[error("XML text is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),
}

/// A matched element and its direct text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: String,
}

/// Open element on the parser stack
struct Frame {
    /// Index into the result list when this element is being captured
    capture: Option<usize>,
    /// Text after the first child element is not part of the element's text
    child_seen: bool,
}

/// Collect every element whose local name is in `names`.
///
/// Element text is the text and CDATA before the first child element, with
/// entities unescaped and surrounding whitespace trimmed. The whole document
/// must be well-formed even though only a few elements are read.
pub fn collect_elements(xml: &str, names: &[&str]) -> Result<Vec<Element>, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut found: Vec<Element> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut roots = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                open_element(&mut stack, &mut roots)?;
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                let capture = names.contains(&name.as_str()).then(|| {
                    found.push(Element {
                        name,
                        text: String::new(),
                    });
                    found.len() - 1
                });
                stack.push(Frame {
                    capture,
                    child_seen: false,
                });
            }
            Event::Empty(empty) => {
                open_element(&mut stack, &mut roots)?;
                let name = String::from_utf8_lossy(empty.local_name().as_ref()).into_owned();
                if names.contains(&name.as_str()) {
                    found.push(Element {
                        name,
                        text: String::new(),
                    });
                }
            }
            Event::End(_) => {
                if stack.pop().is_none() {
                    return Err(XmlError::IllFormed("unexpected closing tag".to_string()));
                }
            }
            Event::Text(text) => match stack.last() {
                Some(frame) => {
                    if let (Some(idx), false) = (frame.capture, frame.child_seen) {
                        found[idx].text.push_str(&text.unescape()?);
                    }
                }
                None => {
                    if !text.iter().all(u8::is_ascii_whitespace) {
                        return Err(XmlError::IllFormed(
                            "text outside the root element".to_string(),
                        ));
                    }
                }
            },
            Event::CData(cdata) => match stack.last() {
                Some(frame) => {
                    if let (Some(idx), false) = (frame.capture, frame.child_seen) {
                        found[idx].text.push_str(std::str::from_utf8(&cdata)?);
                    }
                }
                None => {
                    return Err(XmlError::IllFormed(
                        "CDATA outside the root element".to_string(),
                    ));
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::IllFormed(format!(
            "{} unclosed element(s) at end of document",
            stack.len()
        )));
    }
    if roots == 0 {
        return Err(XmlError::IllFormed("no root element".to_string()));
    }

    for element in &mut found {
        element.text = element.text.trim().to_string();
    }

    Ok(found)
}

/// Account for a new element opening under the current stack
fn open_element(stack: &mut [Frame], roots: &mut usize) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.child_seen = true,
        None => {
            *roots += 1;
            if *roots > 1 {
                return Err(XmlError::IllFormed("multiple root elements".to_string()));
            }
        }
    }
    Ok(())
}

/// Text of the first element with the given name
pub fn first_text<'a>(elements: &'a [Element], name: &str) -> Option<&'a str> {
    elements
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_nested_matches_in_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<SamsungProtocol>
  <value name="a"><appId>first</appId></value>
  <list><value><appId>second</appId></value></list>
  <appId>third</appId>
</SamsungProtocol>"#;

        let found = collect_elements(xml, &["appId"]).unwrap();
        let texts: Vec<_> = found.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ignores_namespace_prefix() {
        let xml = r#"<r xmlns:s="urn:store"><s:appId>x</s:appId></r>"#;
        let found = collect_elements(xml, &["appId"]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "x");
    }

    #[test]
    fn test_cdata_and_entities() {
        let xml = r#"<r><downloadURI><![CDATA[https://cdn/x?a=1&b=2]]></downloadURI><productName>Good &amp; Lock</productName></r>"#;
        let found = collect_elements(xml, &["downloadURI", "productName"]).unwrap();
        assert_eq!(first_text(&found, "downloadURI"), Some("https://cdn/x?a=1&b=2"));
        assert_eq!(first_text(&found, "productName"), Some("Good & Lock"));
    }

    #[test]
    fn test_empty_element_is_present_with_no_text() {
        let found = collect_elements("<r><downloadURI/></r>", &["downloadURI"]).unwrap();
        assert_eq!(first_text(&found, "downloadURI"), Some(""));
    }

    #[test]
    fn test_text_after_child_not_captured() {
        let found = collect_elements("<r><a>head<b/>tail</a></r>", &["a"]).unwrap();
        assert_eq!(first_text(&found, "a"), Some("head"));
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(collect_elements("<r><appId>x</r>", &["appId"]).is_err());
        assert!(collect_elements("<r><appId>x</appId>", &["appId"]).is_err());
        assert!(collect_elements("", &["appId"]).is_err());
        assert!(collect_elements("<a/><b/>", &["appId"]).is_err());
        assert!(collect_elements("junk<r/>", &["appId"]).is_err());
        assert!(collect_elements("not xml at all", &["appId"]).is_err());
    }
}
