//! Single-pass HTML parser producing a [`Dom`]. Supports the markup shapes
//! a static page actually uses: nested elements, quoted and bare attributes,
//! void tags, comments, a doctype, and raw-text `script`/`style` bodies.
//! Mis-nested end tags pop the open-element stack rather than erroring.

use std::collections::HashMap;

use crate::dom::Dom;
use crate::{Error, Result};

pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut stack = vec![dom.root];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if starts_with_at(bytes, i, b"<!--") {
            if let Some(end) = find_subslice(bytes, i + 4, b"-->") {
                i = end + 3;
            } else {
                return Err(Error::HtmlParse("unclosed HTML comment".into()));
            }
            continue;
        }

        // Doctype and other markup declarations carry no tree content.
        if starts_with_at(bytes, i, b"<!") {
            while i < bytes.len() && bytes[i] != b'>' {
                i += 1;
            }
            if i >= bytes.len() {
                return Err(Error::HtmlParse("unclosed markup declaration".into()));
            }
            i += 1;
            continue;
        }

        if bytes[i] == b'<' {
            if starts_with_at(bytes, i, b"</") {
                let (tag, next) = parse_end_tag(html, i)?;
                i = next;

                while stack.len() > 1 {
                    let top = *stack
                        .last()
                        .ok_or_else(|| Error::HtmlParse("invalid stack state".into()))?;
                    let top_tag = dom.tag_name(top).unwrap_or("");
                    let matched = top_tag.eq_ignore_ascii_case(&tag);
                    stack.pop();
                    if matched {
                        break;
                    }
                }
                continue;
            }

            let (tag, attrs, self_closing, next) = parse_start_tag(html, i)?;
            i = next;

            let parent = *stack
                .last()
                .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
            let node = dom.create_element(parent, tag.clone(), attrs);

            if is_raw_text_tag(&tag) {
                let close = find_case_insensitive_end_tag(bytes, i, tag.as_bytes())
                    .ok_or_else(|| Error::HtmlParse(format!("unclosed <{tag}>")))?;
                if let Some(body) = html.get(i..close) {
                    if !body.is_empty() {
                        dom.create_text(node, body.to_string());
                    }
                }
                i = close;
                let (_, after_end) = parse_end_tag(html, i)?;
                i = after_end;
                continue;
            }

            if !self_closing && !is_void_tag(&tag) {
                stack.push(node);
            }
            continue;
        }

        let text_start = i;
        while i < bytes.len() && bytes[i] != b'<' {
            i += 1;
        }

        if let Some(text) = html.get(text_start..i) {
            if !text.is_empty() {
                let parent = *stack
                    .last()
                    .ok_or_else(|| Error::HtmlParse("missing parent element".into()))?;
                dom.create_text(parent, text.to_string());
            }
        }
    }

    dom.initialize_form_control_values();
    Ok(dom)
}

fn parse_start_tag(html: &str, at: usize) -> Result<(String, HashMap<String, String>, bool, usize)> {
    let bytes = html.as_bytes();
    let mut i = at;
    if bytes.get(i) != Some(&b'<') {
        return Err(Error::HtmlParse("expected '<'".into()));
    }
    i += 1;

    skip_ws(bytes, &mut i);
    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }

    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| Error::HtmlParse("invalid tag name".into()))?
        .to_ascii_lowercase();

    if tag.is_empty() {
        return Err(Error::HtmlParse("empty tag name".into()));
    }

    let mut attrs = HashMap::new();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return Err(Error::HtmlParse("unclosed start tag".into()));
        }

        if bytes[i] == b'>' {
            i += 1;
            break;
        }

        if bytes[i] == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'>' {
            self_closing = true;
            i += 2;
            break;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }

        let name = html
            .get(name_start..i)
            .ok_or_else(|| Error::HtmlParse("invalid attribute name".into()))?
            .to_ascii_lowercase();

        if name.is_empty() {
            return Err(Error::HtmlParse("invalid attribute name".into()));
        }

        skip_ws(bytes, &mut i);

        let value = if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(html, bytes, &mut i)?
        } else {
            "true".to_string()
        };

        attrs.insert(name, value);
    }

    Ok((tag, attrs, self_closing, i))
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = at;

    if !(bytes.get(i) == Some(&b'<') && bytes.get(i + 1) == Some(&b'/')) {
        return Err(Error::HtmlParse("expected end tag".into()));
    }
    i += 2;
    skip_ws(bytes, &mut i);

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }

    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| Error::HtmlParse("invalid end tag".into()))?
        .to_ascii_lowercase();

    while i < bytes.len() && bytes[i] != b'>' {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(Error::HtmlParse("unclosed end tag".into()));
    }

    Ok((tag, i + 1))
}

fn parse_attr_value(html: &str, bytes: &[u8], i: &mut usize) -> Result<String> {
    if *i >= bytes.len() {
        return Err(Error::HtmlParse("missing attribute value".into()));
    }

    if bytes[*i] == b'\'' || bytes[*i] == b'"' {
        let quote = bytes[*i];
        *i += 1;
        let start = *i;
        while *i < bytes.len() && bytes[*i] != quote {
            *i += 1;
        }
        if *i >= bytes.len() {
            return Err(Error::HtmlParse("unclosed attribute value".into()));
        }
        let value = html
            .get(start..*i)
            .ok_or_else(|| Error::HtmlParse("invalid attribute value".into()))?
            .to_string();
        *i += 1;
        return Ok(value);
    }

    let start = *i;
    while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
        *i += 1;
    }
    Ok(html
        .get(start..*i)
        .ok_or_else(|| Error::HtmlParse("invalid attribute value".into()))?
        .to_string())
}

fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-'
}

fn is_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn starts_with_at(bytes: &[u8], at: usize, prefix: &[u8]) -> bool {
    bytes.len() >= at + prefix.len() && &bytes[at..at + prefix.len()] == prefix
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || bytes.len() < needle.len() {
        return None;
    }
    (from..=bytes.len() - needle.len()).find(|&i| &bytes[i..i + needle.len()] == needle)
}

fn find_case_insensitive_end_tag(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut i = from;
    while i + tag.len() + 2 <= bytes.len() {
        if bytes[i] == b'<' && bytes[i + 1] == b'/' {
            let candidate = &bytes[i + 2..i + 2 + tag.len()];
            if candidate.eq_ignore_ascii_case(tag) {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_markup_with_doctype_and_comment_parses() -> Result<()> {
        let dom = parse_html(
            "<!DOCTYPE html>\
             <!-- menu -->\
             <nav class='p-navigation'><button class='js-search-button'>Search</button></nav>",
        )?;
        let button = dom.query_selector(".js-search-button")?.unwrap();
        assert_eq!(dom.text_content(button), "Search");
        assert_eq!(dom.tag_name(button), Some("button"));
        Ok(())
    }

    #[test]
    fn bare_attributes_default_to_true() -> Result<()> {
        let dom = parse_html("<input class='p-search-box__input' autofocus>")?;
        let input = dom.query_selector("input")?.unwrap();
        assert_eq!(dom.attr(input, "autofocus").as_deref(), Some("true"));
        Ok(())
    }

    #[test]
    fn void_tags_do_not_swallow_siblings() -> Result<()> {
        let dom = parse_html("<input><div class='drink'>Negroni</div>")?;
        let row = dom.query_selector(".drink")?.unwrap();
        assert_eq!(dom.text_content(row), "Negroni");
        assert!(dom.find_ancestor_by_tag(row, "input").is_none());
        Ok(())
    }

    #[test]
    fn script_bodies_are_raw_text() -> Result<()> {
        let dom = parse_html("<script>if (a < b) { go() }</script><p id='after'>ok</p>")?;
        assert!(dom.query_selector("#after")?.is_some());
        let script = dom.query_selector("script")?.unwrap();
        assert_eq!(dom.text_content(script), "if (a < b) { go() }");
        Ok(())
    }

    #[test]
    fn value_attribute_and_textarea_body_seed_control_values() -> Result<()> {
        let dom = parse_html("<input value='gin'><textarea>note</textarea>")?;
        let input = dom.query_selector("input")?.unwrap();
        let textarea = dom.query_selector("textarea")?.unwrap();
        assert_eq!(dom.value(input).as_deref(), Some("gin"));
        assert_eq!(dom.value(textarea).as_deref(), Some("note"));
        Ok(())
    }

    #[test]
    fn unclosed_comment_is_an_error() {
        assert!(matches!(
            parse_html("<!-- nope"),
            Err(Error::HtmlParse(_))
        ));
    }
}
