//! Paginated output documents.
//!
//! A report is written page by page into a [`PageSink`]. The file sink,
//! [`HtmlDocument`], only publishes its output once [`PageSink::finish`]
//! succeeds; dropped unfinished it removes what it wrote.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::{PAGE_HEIGHT, PAGE_WIDTH};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Chart,
    Description,
}

/// One rendered page as an SVG document.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub kind: PageKind,
    pub svg: String,
}

/// Receives pages in order and is finalised once.
pub trait PageSink {
    fn push_page(&mut self, page: RenderedPage) -> Result<()>;

    /// Finalise the document. Calls after the first are no-ops.
    fn finish(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// HTML document
// ---------------------------------------------------------------------------

/// A single HTML file holding every page as inline SVG, one printed page
/// per `<section>`.
pub struct HtmlDocument {
    path: PathBuf,
    partial_path: PathBuf,
    writer: Option<BufWriter<File>>,
    pages: usize,
}

impl HtmlDocument {
    /// Open a document that will end up at `path`.
    pub fn create(path: &Path, title: &str) -> Result<Self> {
        let mut partial = path.as_os_str().to_owned();
        partial.push(".partial");
        let partial_path = PathBuf::from(partial);

        let mut writer = BufWriter::new(File::create(&partial_path)?);
        writer.write_all(html_header(title).as_bytes())?;
        debug!("opened {}", partial_path.display());

        Ok(Self {
            path: path.to_path_buf(),
            partial_path,
            writer: Some(writer),
            pages: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }
}

impl PageSink for HtmlDocument {
    fn push_page(&mut self, page: RenderedPage) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(std::io::Error::other("document already finished").into());
        };
        let class = match page.kind {
            PageKind::Chart => "page chart",
            PageKind::Description => "page description",
        };
        writeln!(writer, "<section class=\"{class}\">")?;
        writer.write_all(page.svg.as_bytes())?;
        writeln!(writer, "\n</section>")?;
        self.pages += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let published =
            close_writer(writer).and_then(|()| fs::rename(&self.partial_path, &self.path));
        if let Err(e) = published {
            warn!(
                "could not publish {}, discarding {}",
                self.path.display(),
                self.partial_path.display()
            );
            let _ = fs::remove_file(&self.partial_path);
            return Err(e.into());
        }
        debug!("wrote {} pages to {}", self.pages, self.path.display());
        Ok(())
    }
}

impl Drop for HtmlDocument {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            warn!(
                "discarding unfinished document {}",
                self.partial_path.display()
            );
            let _ = fs::remove_file(&self.partial_path);
        }
    }
}

fn close_writer(mut writer: BufWriter<File>) -> std::io::Result<()> {
    writer.write_all(HTML_FOOTER.as_bytes())?;
    writer.flush()
}

fn html_header(title: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        @page {{ size: {w}px {h}px; margin: 0; }}
        body {{ margin: 0; background: #e2e8f0; }}
        .page {{
            width: {w}px;
            height: {h}px;
            margin: 16px auto;
            background: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.2);
            page-break-after: always;
            break-after: page;
        }}
        @media print {{
            body {{ background: white; }}
            .page {{ margin: 0; box-shadow: none; }}
        }}
    </style>
</head>
<body>
"#,
        w = PAGE_WIDTH,
        h = PAGE_HEIGHT,
    )
}

const HTML_FOOTER: &str = "</body>\n</html>\n";

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// In-memory sink
// ---------------------------------------------------------------------------

/// Keeps rendered pages in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub pages: Vec<RenderedPage>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

impl PageSink for MemorySink {
    fn push_page(&mut self, page: RenderedPage) -> Result<()> {
        self.pages.push(page);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(kind: PageKind) -> RenderedPage {
        RenderedPage {
            kind,
            svg: "<svg></svg>".to_string(),
        }
    }

    #[test]
    fn test_finish_publishes_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OVERVIEW_t.html");
        let mut doc = HtmlDocument::create(&path, "OVERVIEW_<t>").unwrap();
        doc.push_page(page(PageKind::Chart)).unwrap();
        doc.push_page(page(PageKind::Description)).unwrap();
        assert!(!path.exists());
        doc.finish().unwrap();
        doc.finish().unwrap();
        assert_eq!(doc.page_count(), 2);
        drop(doc);

        let html = fs::read_to_string(&path).unwrap();
        assert_eq!(html.matches("<section").count(), 2);
        assert!(html.contains("<title>OVERVIEW_&lt;t&gt;</title>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(!dir.path().join("OVERVIEW_t.html.partial").exists());
    }

    #[test]
    fn test_drop_unfinished_removes_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OVERVIEW_t.html");
        {
            let mut doc = HtmlDocument::create(&path, "t").unwrap();
            doc.push_page(page(PageKind::Chart)).unwrap();
            assert!(dir.path().join("OVERVIEW_t.html.partial").exists());
        }
        assert!(!path.exists());
        assert!(!dir.path().join("OVERVIEW_t.html.partial").exists());
    }

    #[test]
    fn test_failed_publish_removes_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OVERVIEW_t.html");
        // A non-empty directory at the target makes the rename fail.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let mut doc = HtmlDocument::create(&path, "t").unwrap();
        doc.push_page(page(PageKind::Chart)).unwrap();
        assert!(doc.finish().is_err());
        assert!(!dir.path().join("OVERVIEW_t.html.partial").exists());
        drop(doc);
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_push_after_finish_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = HtmlDocument::create(&dir.path().join("x.html"), "x").unwrap();
        doc.finish().unwrap();
        assert!(doc.push_page(page(PageKind::Chart)).is_err());
    }

    #[test]
    fn test_memory_sink_counts() {
        let mut sink = MemorySink::new();
        sink.push_page(page(PageKind::Chart)).unwrap();
        sink.push_page(page(PageKind::Chart)).unwrap();
        sink.push_page(page(PageKind::Description)).unwrap();
        sink.finish().unwrap();
        assert!(sink.finished);
        assert_eq!(sink.count(PageKind::Chart), 2);
        assert_eq!(sink.count(PageKind::Description), 1);
    }
}
