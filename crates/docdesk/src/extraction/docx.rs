//! Word document text extraction

use crate::error::{Error, Result};

use super::TextExtractor;

/// DOCX paragraph extractor
pub struct WordExtractor;

impl WordExtractor {
    fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
        let mut text = String::new();
        for child in &paragraph.children {
            if let docx_rs::ParagraphChild::Run(run) = child {
                for child in &run.children {
                    if let docx_rs::RunChild::Text(t) = child {
                        text.push_str(&t.text);
                    }
                }
            }
        }
        text
    }
}

impl TextExtractor for WordExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data)
            .map_err(|e| Error::file_parse("document.docx", e.to_string()))?;

        // Top-level paragraphs only; table cell text is not searched
        let paragraphs: Vec<String> = doc
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(p) => Some(Self::paragraph_text(p)),
                _ => None,
            })
            .filter(|text| !text.is_empty())
            .collect();

        Ok(paragraphs.join("\n"))
    }

    fn name(&self) -> &str {
        "docx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::docx_with_paragraphs;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    #[test]
    fn test_paragraphs_joined_in_order() {
        let bytes = docx_with_paragraphs(&["회의록", "", "quarterly report summary"]);
        let text = WordExtractor.extract(&bytes).unwrap();
        assert_eq!(text, "회의록\nquarterly report summary");
    }

    #[test]
    fn test_runs_are_concatenated() {
        let docx = Docx::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("sales"))
                .add_run(Run::new().add_text("data")),
        );
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();

        let text = WordExtractor.extract(cursor.get_ref()).unwrap();
        assert_eq!(text, "salesdata");
    }
}
