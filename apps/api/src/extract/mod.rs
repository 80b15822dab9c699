//! Best-effort plain-text extraction from uploaded documents.
//!
//! Never fails: any internal extraction error degrades to a lossy UTF-8
//! decode of the raw bytes. The filename is used only for its extension.

use std::io::{Cursor, Read};

use tracing::debug;

/// Extracts plain text from an upload, dispatching on the file extension.
pub fn extract_text(data: &[u8], filename: &str) -> String {
    let name = filename.to_lowercase();

    let extracted = if name.ends_with(".pdf") {
        pdf_text(data)
    } else if name.ends_with(".docx") {
        docx_text(data)
    } else {
        None
    };

    extracted.unwrap_or_else(|| String::from_utf8_lossy(data).into_owned())
}

/// Per-page extraction via lopdf. Falls back to pdf-extract's whole-document
/// pass, which handles font encodings lopdf's raw text path does not.
fn pdf_text(data: &[u8]) -> Option<String> {
    if let Ok(doc) = lopdf::Document::load_mem(data) {
        let page_map = doc.get_pages();
        let pages = page_map
            .keys()
            .map(|number| doc.extract_text(&[*number]).unwrap_or_default());
        if let Some(joined) = join_page_texts(pages) {
            return Some(joined);
        }
    }

    match pdf_extract::extract_text_from_mem(data) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!("PDF extraction failed: {e}");
            None
        }
    }
}

/// Joins page texts with a single newline. Pages yielding no text contribute
/// nothing — not an empty line. Returns `None` when no page had text.
fn join_page_texts<I: IntoIterator<Item = String>>(pages: I) -> Option<String> {
    let nonempty: Vec<String> = pages
        .into_iter()
        .filter_map(|page| {
            let trimmed = page.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect();

    (!nonempty.is_empty()).then(|| nonempty.join("\n"))
}

/// DOCX is a zip archive; the body lives in `word/document.xml`.
/// Every paragraph's text is joined with newlines, empty paragraphs included
/// (preserves blank lines).
fn docx_text(data: &[u8]) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).ok()?;
    let mut document = archive.by_name("word/document.xml").ok()?;

    let mut xml = String::new();
    document.read_to_string(&mut xml).ok()?;

    Some(docx_paragraphs(&xml).join("\n"))
}

/// Linear scan of the document XML: `w:t` runs accumulate into the current
/// paragraph, each closed `w:p` emits one.
fn docx_paragraphs(xml: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    let mut chars = xml.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '<' {
            let mut tag = String::new();
            for tc in chars.by_ref() {
                if tc == '>' {
                    break;
                }
                tag.push(tc);
            }

            if is_open_tag(&tag, "w:t") {
                in_text = true;
            } else if tag == "/w:t" {
                in_text = false;
            } else if is_open_tag(&tag, "w:p") {
                current.clear();
            } else if tag == "/w:p" {
                paragraphs.push(unescape_xml(&current));
                current.clear();
            } else if tag == "w:p/" {
                // Self-closing paragraph: a blank line.
                paragraphs.push(String::new());
            }
        } else if in_text {
            current.push(c);
        }
    }

    paragraphs
}

/// True when `tag` opens `name` exactly (`w:t` or `w:t xml:space="preserve"`,
/// but not `w:tbl` and not a self-closing `w:t/`).
fn is_open_tag(tag: &str, name: &str) -> bool {
    if tag.ends_with('/') {
        return false;
    }
    match tag.strip_prefix(name) {
        Some(rest) => rest.is_empty() || rest.starts_with(' '),
        None => false,
    }
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
