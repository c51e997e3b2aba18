//! DOCX text extraction: paragraph text from `word/document.xml`, one line per
//! paragraph. Formatting, tables-as-layout and headers/footers are ignored.

use std::io::{Cursor, Read};

use crate::extraction::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the inflated size of `word/document.xml`.
pub const MAX_DOCUMENT_XML_BYTES: u64 = 16 * 1024 * 1024;

pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let part = archive.by_name(DOCUMENT_PART)?;
    if part.size() > MAX_DOCUMENT_XML_BYTES {
        return Err(ExtractionError::TooLarge {
            limit: MAX_DOCUMENT_XML_BYTES,
        });
    }

    // Header sizes are untrusted; bound the actual read as well.
    let mut xml = String::new();
    part.take(MAX_DOCUMENT_XML_BYTES + 1).read_to_string(&mut xml)?;
    if xml.len() as u64 > MAX_DOCUMENT_XML_BYTES {
        return Err(ExtractionError::TooLarge {
            limit: MAX_DOCUMENT_XML_BYTES,
        });
    }

    Ok(document_xml_to_text(&xml))
}

/// Walks the WordprocessingML tags, keeping only `<w:t>` run text.
pub fn document_xml_to_text(xml: &str) -> String {
    let mut out = String::new();
    let mut in_text = false;
    let mut in_paragraph_props = false;
    let mut rest = xml;

    while let Some(start) = rest.find('<') {
        if in_text {
            out.push_str(&decode_entities(&rest[..start]));
        }
        let Some(len) = rest[start..].find('>') else {
            break;
        };
        let tag = &rest[start + 1..start + len];
        rest = &rest[start + len + 1..];

        let self_closing = tag.ends_with('/');
        let (closing, body) = match tag.strip_prefix('/') {
            Some(body) => (true, body),
            None => (false, tag),
        };
        let name = body
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or_default();

        match (closing, name) {
            (false, "w:t") => in_text = !self_closing,
            (true, "w:t") => in_text = false,
            (false, "w:pPr") => in_paragraph_props = !self_closing,
            (true, "w:pPr") => in_paragraph_props = false,
            // Inside w:pPr, w:tab declares a tab stop rather than a tab character.
            (false, "w:tab") if !in_paragraph_props => out.push('\t'),
            (false, "w:br") | (false, "w:cr") => out.push('\n'),
            (false, "w:p") if self_closing => out.push('\n'),
            (true, "w:p") => out.push('\n'),
            _ => {}
        }
    }

    out
}

/// Decodes the five predefined XML entities and numeric character references.
/// Unknown entities are kept literally.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let Some(semi) = after.find(';') else {
            out.push_str(after);
            return out;
        };
        let entity = &after[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity.strip_prefix('#').and_then(|num| {
                let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32)
            }),
        };
        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&after[..=semi]),
        }
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    out
}
