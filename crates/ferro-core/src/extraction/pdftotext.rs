use crate::error::FerroError;
use crate::extraction::{BBox, LineSpan, PageContent, PdfExtractor, WordSpan};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox-layout` so every word arrives with its bounding box
/// and every page with its width and height. Column handling is left to
/// [`crate::extraction::linearize`].
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, FerroError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| FerroError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| FerroError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FerroError::PdftotextNotFound
                } else {
                    FerroError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(FerroError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = parse_bbox_xml(&xml)?;
        log::info!("pdftotext extracted {} page(s)", pages.len());
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Parse `pdftotext -bbox-layout` XHTML into pages with positioned lines.
pub fn parse_bbox_xml(xml: &str) -> Result<Vec<PageContent>, FerroError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageContent> = Vec::new();
    let mut page: Option<PageContent> = None;
    let mut line: Option<LineSpan> = None;
    let mut word: Option<WordSpan> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => match tag.name().as_ref() {
                b"page" => {
                    page = Some(PageContent {
                        page_number: pages.len() + 1,
                        width: attr_f32(&tag, "width").unwrap_or(0.0),
                        height: attr_f32(&tag, "height").unwrap_or(0.0),
                        lines: Vec::new(),
                        line_spans: Vec::new(),
                    });
                }
                b"line" => {
                    if let (Some(p), Some(bbox)) = (page.as_ref(), parse_bbox(&tag)) {
                        line = Some(LineSpan {
                            page_number: p.page_number,
                            line_index: p.line_spans.len(),
                            text: String::new(),
                            bbox,
                            words: Vec::new(),
                        });
                    }
                }
                b"word" => {
                    if let Some(bbox) = parse_bbox(&tag) {
                        word = Some(WordSpan {
                            text: String::new(),
                            bbox,
                        });
                    }
                }
                _ => {}
            },
            Ok(Event::Text(text)) => {
                if let Some(w) = word.as_mut() {
                    let decoded = text
                        .unescape()
                        .map(|c| c.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned());
                    w.text.push_str(&decoded);
                }
            }
            Ok(Event::End(tag)) => match tag.name().as_ref() {
                b"word" => {
                    if let (Some(l), Some(w)) = (line.as_mut(), word.take()) {
                        let trimmed = w.text.trim();
                        if !trimmed.is_empty() {
                            l.words.push(WordSpan {
                                text: trimmed.to_string(),
                                bbox: w.bbox,
                            });
                        }
                    }
                }
                b"line" => {
                    if let (Some(p), Some(mut l)) = (page.as_mut(), line.take()) {
                        if !l.words.is_empty() {
                            l.line_index = p.line_spans.len();
                            l.text = join_words(&l.words);
                            p.lines.push(l.text.clone());
                            p.line_spans.push(l);
                        }
                    }
                }
                b"page" => {
                    if let Some(p) = page.take() {
                        pages.push(p);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FerroError::Extraction(format!(
                    "malformed pdftotext output at byte {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }

    Ok(pages)
}

fn join_words(words: &[WordSpan]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn attr_f32(tag: &BytesStart<'_>, name: &str) -> Option<f32> {
    tag.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name.as_bytes())
        .and_then(|a| a.unescape_value().ok()?.trim().parse().ok())
}

fn parse_bbox(tag: &BytesStart<'_>) -> Option<BBox> {
    Some(BBox {
        x_min: attr_f32(tag, "xMin")?,
        y_min: attr_f32(tag, "yMin")?,
        x_max: attr_f32(tag, "xMax")?,
        y_max: attr_f32(tag, "yMax")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title></title>
<meta name="Producer" content="GPL Ghostscript"/>
</head>
<body>
<doc>
  <page width="595.000000" height="842.000000">
    <flow>
      <block xMin="40.0" yMin="50.0" xMax="200.0" yMax="60.0">
        <line xMin="40.0" yMin="50.0" xMax="200.0" yMax="60.0">
          <word xMin="40.0" yMin="50.0" xMax="70.0" yMax="60.0">Goa</word>
          <word xMin="72.0" yMin="50.0" xMax="110.0" yMax="60.0">Lumps</word>
        </line>
        <line xMin="40.0" yMin="62.0" xMax="200.0" yMax="72.0">
          <word xMin="40.0" yMin="62.0" xMax="60.0" yMax="72.0">Fe</word>
          <word xMin="62.0" yMin="62.0" xMax="90.0" yMax="72.0">&amp;</word>
        </line>
      </block>
    </flow>
  </page>
  <page width="595.000000" height="842.000000">
  </page>
</doc>
</body>
</html>
"#;

    #[test]
    fn test_parse_bbox_xml_pages_and_geometry() {
        let pages = parse_bbox_xml(SAMPLE).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].width, 595.0);
        assert_eq!(pages[0].height, 842.0);
        assert_eq!(pages[0].lines, vec!["Goa Lumps", "Fe &"]);
        assert_eq!(pages[0].line_spans[1].line_index, 1);
        assert_eq!(pages[0].line_spans[0].words[1].bbox.x_min, 72.0);
        assert!(pages[1].lines.is_empty());
        assert_eq!(pages[1].page_number, 2);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = "<doc><page width=\"10\"><line xMin=\"1\"></page></doc>";
        assert!(parse_bbox_xml(xml).is_err());
    }
}
