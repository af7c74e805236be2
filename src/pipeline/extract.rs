//! Text extraction: read every page's text layer via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which is not safe to drive
//! from async contexts. Extraction moves onto tokio's blocking pool so the
//! runtime's worker threads stay free.
//!
//! Page text is the page's text segments joined with single spaces, in the
//! order pdfium yields them. No reading-order correction is applied.

use crate::config::IngestConfig;
use crate::error::ExtractionError;
use crate::output::{ExtractedText, PageText};
use crate::pipeline::input::Document;
use crate::progress::ProgressCallback;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extract the text of every page, in document order.
///
/// Pages shorter than `config.short_page_chars` are kept as-is and reported
/// through `warn!` and the progress callback; they never fail the run.
pub async fn extract_text(
    document: Document,
    config: &IngestConfig,
) -> Result<ExtractedText, ExtractionError> {
    let password = config.password.clone();
    let short_page_chars = config.short_page_chars;
    let progress = config.progress_callback.clone();

    info!(
        "Starting PDF extraction: '{}' ({:.2}MB)",
        document.name,
        document.size_mb()
    );

    let pages = tokio::task::spawn_blocking(move || {
        extract_pages_blocking(&document, password.as_deref(), short_page_chars, progress.as_ref())
    })
    .await
    .map_err(|e| ExtractionError::TaskFailed(format!("extraction task panicked: {e}")))??;

    let extracted = ExtractedText::from_pages(pages);
    let page_count = extracted.page_count();
    info!(
        "Extraction complete: {} pages, {} chars, ~{} chars/page",
        page_count,
        extracted.text.len(),
        extracted.text.len() / page_count.max(1)
    );

    Ok(extracted)
}

/// Page numbers (1-indexed) whose text is below `threshold` characters.
pub fn short_pages(pages: &[PageText], threshold: usize) -> Vec<usize> {
    pages
        .iter()
        .filter(|p| p.char_count() < threshold)
        .map(|p| p.page_num)
        .collect()
}

/// Join a page's text fragments the way they are sent to the model.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_pages_blocking(
    document: &Document,
    password: Option<&str>,
    short_page_chars: usize,
    progress: Option<&ProgressCallback>,
) -> Result<Vec<PageText>, ExtractionError> {
    let pdfium = bind_pdfium()?;

    let pdf = pdfium
        .load_pdf_from_byte_slice(&document.bytes, password)
        .map_err(|e| classify_load_error(&document.name, password, e))?;

    let pages = pdf.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded. Total pages detected: {}", total_pages);

    let mut results = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        let text = page.text().map_err(|e| ExtractionError::PageText {
            page: page_num,
            detail: format!("{:?}", e),
        })?;

        let fragments: Vec<String> = text.segments().iter().map(|s| s.text()).collect();
        let page_text = PageText::new(page_num, join_fragments(&fragments));
        let chars = page_text.char_count();

        debug!(
            "Page {}/{}: {} fragments, {} chars",
            page_num,
            total_pages,
            fragments.len(),
            chars
        );
        if let Some(cb) = progress {
            cb.on_page_extracted(page_num, total_pages, chars);
        }
        if chars < short_page_chars {
            warn!(
                "Page {} has very little text ({} chars). Might be an image or scanned page.",
                page_num, chars
            );
            if let Some(cb) = progress {
                cb.on_short_page(page_num, chars);
            }
        }

        results.push(page_text);
    }

    Ok(results)
}

/// Bind to pdfium: `PDFIUM_LIB_PATH` (library file or its directory) first,
/// then the system library.
fn bind_pdfium() -> Result<Pdfium, ExtractionError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(p) if !p.is_empty() => {
            let path = Path::new(&p);
            if path.is_dir() {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(path))
            } else {
                Pdfium::bind_to_library(path)
            }
        }
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| ExtractionError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

fn classify_load_error(name: &str, password: Option<&str>, e: PdfiumError) -> ExtractionError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            ExtractionError::WrongPassword {
                name: name.to_string(),
            }
        } else {
            ExtractionError::PasswordRequired {
                name: name.to_string(),
            }
        }
    } else {
        ExtractionError::CorruptPdf {
            name: name.to_string(),
            detail: err_str,
        }
    }
}
