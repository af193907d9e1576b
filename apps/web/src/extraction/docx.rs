//! DOCX text extraction: one block of text per body paragraph.
//!
//! A DOCX file is a zip archive; the body lives in `word/document.xml`.
//! Only top-level body paragraphs are returned. Paragraphs inside tables and
//! text boxes are skipped.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    paragraphs_from_xml(&xml)
}

/// Walks WordprocessingML and collects the text of each body paragraph.
/// Run text (`w:t`) is concatenated; `w:tab` becomes `\t`, `w:br` and
/// `w:cr` become `\n`.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut table_depth = 0usize;
    let mut nested_paragraphs = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ExtractError::Docx(format!(
                "malformed {DOCUMENT_PART} at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        // Only text that belongs directly to a body paragraph is collected.
        let collecting = table_depth == 0 && nested_paragraphs == 0;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"p" if table_depth == 0 => {
                    if current.is_some() {
                        nested_paragraphs += 1;
                    } else {
                        current = Some(String::new());
                    }
                }
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" if table_depth == 0 && current.is_none() => paragraphs.push(String::new()),
                b"tab" if in_run && collecting => push_char(&mut current, '\t'),
                b"br" | b"cr" if in_run && collecting => push_char(&mut current, '\n'),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"p" if table_depth == 0 => {
                    if nested_paragraphs > 0 {
                        nested_paragraphs -= 1;
                    } else if let Some(paragraph) = current.take() {
                        paragraphs.push(paragraph);
                    }
                }
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(t) if in_text && collecting => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Docx(e.to_string()))?;
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_char(current: &mut Option<String>, c: char) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push(c);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use zip::write::FileOptions;
    use zip::ZipWriter;

    use super::*;

    const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn wrap_body(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}"><w:body>{body}<w:sectPr/></w:body></w:document>"#
        )
    }

    /// Builds a DOCX archive whose body holds one single-run paragraph per line.
    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
            .collect();

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", FileOptions::default())
            .unwrap();
        writer.write_all(b"<?xml version=\"1.0\"?><Types/>").unwrap();
        writer
            .start_file(DOCUMENT_PART, FileOptions::default())
            .unwrap();
        writer.write_all(wrap_body(&body).as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_in_document_order() {
        let bytes = build_docx(&["Jane Doe", "Senior Engineer", "Skills: Rust, Go"]);
        let paragraphs = extract_paragraphs(&bytes).unwrap();
        assert_eq!(paragraphs, vec!["Jane Doe", "Senior Engineer", "Skills: Rust, Go"]);
    }

    #[test]
    fn test_runs_are_concatenated() {
        let xml = wrap_body(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Acme </w:t></w:r><w:r><w:t>Corp</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["Acme Corp"]);
    }

    #[test]
    fn test_tabs_and_breaks_inside_runs() {
        let xml = wrap_body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>2019</w:t><w:tab/><w:t>2023</w:t><w:br/><w:t>Berlin</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["2019\t2023\nBerlin"]);
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let xml = wrap_body(r#"<w:p><w:r><w:t>A</w:t></w:r></w:p><w:p/><w:p></w:p><w:p><w:r><w:t>B</w:t></w:r></w:p>"#);
        assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["A", "", "", "B"]);
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let xml = wrap_body(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["Before", "After"]);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let xml = wrap_body(r#"<w:p><w:r><w:t>R&amp;D &lt;lead&gt;</w:t></w:r></w:p>"#);
        assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["R&D <lead>"]);
    }

    #[test]
    fn test_not_a_zip_is_rejected() {
        let err = extract_paragraphs(b"PK not really").unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }

    #[test]
    fn test_zip_without_document_part_is_rejected() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", FileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_paragraphs(&bytes).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }
}
