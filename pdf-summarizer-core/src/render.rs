//! Rendering of summary text into a new PDF document

use crate::error::{Result, SummarizerError};
use oxidize_pdf::text::{measure_text, split_into_words};
use oxidize_pdf::{Document, Font, Page};
use std::path::Path;

pub const SUMMARY_TITLE: &str = "Document Summary";

/// Page geometry and typography for generated summaries
#[derive(Debug, Clone)]
pub struct SummaryLayout {
    pub title: String,
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub title_size: f64,
    pub body_size: f64,
    /// Multiplier applied to `body_size`
    pub line_height: f64,
}

impl Default for SummaryLayout {
    fn default() -> Self {
        SummaryLayout {
            title: SUMMARY_TITLE.to_string(),
            // A4 in points
            page_width: 595.0,
            page_height: 842.0,
            margin: 50.0,
            title_size: 12.0,
            body_size: 12.0,
            line_height: 1.4,
        }
    }
}

impl SummaryLayout {
    fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    fn line_advance(&self) -> f64 {
        self.body_size * self.line_height
    }

    fn title_baseline(&self) -> f64 {
        self.page_height - self.margin - self.title_size
    }

    fn body_top(&self) -> f64 {
        self.title_baseline() - 2.5 * self.title_size
    }
}

/// Write `summary` as a PDF at `destination` using the default layout
pub fn render(summary: &str, destination: &Path) -> Result<()> {
    render_with_layout(summary, destination, &SummaryLayout::default())
}

pub fn render_with_layout(summary: &str, destination: &Path, layout: &SummaryLayout) -> Result<()> {
    let mut doc = build_document(summary, layout)?;
    doc.save(destination)
        .map_err(|e| SummarizerError::Render(format!("{}: {e}", destination.display())))?;
    tracing::debug!(path = %destination.display(), "wrote summary PDF");
    Ok(())
}

/// Render `summary` into an in-memory PDF
pub fn render_to_bytes(summary: &str, layout: &SummaryLayout) -> Result<Vec<u8>> {
    let mut doc = build_document(summary, layout)?;
    let mut bytes = Vec::new();
    doc.write(&mut bytes)
        .map_err(|e| SummarizerError::Render(e.to_string()))?;
    Ok(bytes)
}

fn build_document(summary: &str, layout: &SummaryLayout) -> Result<Document> {
    let mut writer = SummaryWriter::new(layout);

    for line in summary.lines() {
        if line.trim().is_empty() {
            writer.paragraph_gap();
            continue;
        }
        for wrapped in wrap_text(line, layout.content_width(), layout.body_size) {
            writer.write_line(&wrapped)?;
        }
    }

    writer.finish()
}

/// Lays out lines top to bottom, starting a new page (with header) when
/// the bottom margin is reached.
struct SummaryWriter<'a> {
    layout: &'a SummaryLayout,
    doc: Document,
    page: Option<Page>,
    cursor_y: f64,
}

impl<'a> SummaryWriter<'a> {
    fn new(layout: &'a SummaryLayout) -> Self {
        let mut doc = Document::new();
        doc.set_title(layout.title.clone());
        doc.set_creator("pdf-summarizer");
        SummaryWriter {
            layout,
            doc,
            page: None,
            cursor_y: layout.body_top(),
        }
    }

    fn start_page(&mut self) -> Result<()> {
        if let Some(done) = self.page.take() {
            self.doc.add_page(done);
        }

        let layout = self.layout;
        let mut page = Page::new(layout.page_width, layout.page_height);
        let title_width = measure_text(&layout.title, Font::HelveticaBold, layout.title_size);
        let x = ((layout.page_width - title_width) / 2.0).max(layout.margin);
        page.text()
            .set_font(Font::HelveticaBold, layout.title_size)
            .at(x, layout.title_baseline())
            .write(&layout.title)
            .map_err(|e| SummarizerError::Render(e.to_string()))?;

        self.cursor_y = layout.body_top();
        self.page = Some(page);
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        if self.page.is_none() || self.cursor_y < self.layout.margin {
            self.start_page()?;
        }

        let (x, y, size) = (self.layout.margin, self.cursor_y, self.layout.body_size);
        let page = self
            .page
            .as_mut()
            .ok_or_else(|| SummarizerError::Internal("summary page missing".to_string()))?;
        page.text()
            .set_font(Font::Helvetica, size)
            .at(x, y)
            .write(text)
            .map_err(|e| SummarizerError::Render(e.to_string()))?;

        self.cursor_y -= self.layout.line_advance();
        Ok(())
    }

    fn paragraph_gap(&mut self) {
        if self.page.is_some() {
            self.cursor_y -= self.layout.line_advance() * 0.5;
        }
    }

    fn finish(mut self) -> Result<Document> {
        if self.page.is_none() {
            self.start_page()?;
        }
        if let Some(last) = self.page.take() {
            self.doc.add_page(last);
        }
        Ok(self.doc)
    }
}

/// Greedy word wrap against Helvetica metrics.
///
/// Runs of whitespace collapse to one space. A single word wider than
/// `max_width` is broken between characters.
pub fn wrap_text(paragraph: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let width = |s: &str| measure_text(s, Font::Helvetica, font_size);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in split_into_words(paragraph) {
        if word.chars().all(char::is_whitespace) {
            if !current.is_empty() {
                current.push(' ');
            }
            continue;
        }

        if width(&format!("{current}{word}")) <= max_width {
            current.push_str(word);
            continue;
        }

        let done = current.trim_end();
        if !done.is_empty() {
            lines.push(done.to_string());
        }
        current.clear();

        if width(word) <= max_width {
            current.push_str(word);
            continue;
        }

        for ch in word.chars() {
            let mut next = current.clone();
            next.push(ch);
            if !current.is_empty() && width(&next) > max_width {
                lines.push(std::mem::take(&mut current));
            }
            current.push(ch);
        }
    }

    let done = current.trim_end();
    if !done.is_empty() {
        lines.push(done.to_string());
    }
    lines
}
