//! Book presentation
//!
//! Display first, then append. A failed append never undoes the display;
//! "displayed but not appended" is reported through [`AppendOutcome`].

use crate::models::CanonicalBook;
use crate::services::{AppendLog, AppendOutcome};
use shelfscan_common::StatusLine;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Human-facing render target
pub trait BookDisplay: Send + Sync {
    /// Render the book; calling twice renders the same content twice
    fn show(&self, book: &CanonicalBook);
}

/// Render a book as a text block
pub fn render_book(book: &CanonicalBook) -> String {
    format!(
        "── {title} ──\n\
         Authors:     {authors}\n\
         Publisher:   {publisher}\n\
         ISBN:        {isbn}\n\
         Categories:  {categories}\n\
         Cover:       {image_url}\n\
         Preview:     {preview_link}\n\
         \n\
         {description}\n",
        title = book.title,
        authors = book.authors,
        publisher = book.publisher,
        isbn = book.isbn,
        categories = book.categories,
        image_url = book.image_url,
        preview_link = book.preview_link,
        description = book.description,
    )
}

/// Writes rendered books to a terminal (stdout by default)
pub struct TerminalDisplay<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> BookDisplay for TerminalDisplay<W> {
    fn show(&self, book: &CanonicalBook) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        let result = writeln!(out, "{}", render_book(book)).and_then(|_| out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write book to display");
        }
    }
}

/// Display surface plus external append log
pub struct Presenter {
    display: Arc<dyn BookDisplay>,
    append_log: Arc<dyn AppendLog>,
}

impl Presenter {
    pub fn new(display: Arc<dyn BookDisplay>, append_log: Arc<dyn AppendLog>) -> Self {
        Self {
            display,
            append_log,
        }
    }

    /// Show the book, then attempt the append
    pub async fn present(&self, book: &CanonicalBook) -> AppendOutcome {
        self.display.show(book);
        let outcome = self.append_log.append(book).await;
        tracing::info!(isbn = %book.isbn, append = %outcome, "Book presented");
        outcome
    }
}

/// Mirror status line changes to `out`, one line each
///
/// The task ends once every [`StatusLine`] handle is dropped, after the
/// last message has been written, and hands the writer back.
pub fn spawn_status_printer<W>(status: &StatusLine, mut out: W) -> JoinHandle<W>
where
    W: Write + Send + 'static,
{
    let mut rx = status.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let line = rx.borrow_and_update().clone();
            if line.is_empty() {
                continue;
            }
            let result = writeln!(out, "» {}", line).and_then(|_| out.flush());
            if let Err(e) = result {
                tracing::warn!(error = %e, "Failed to write status line");
            }
        }
        out
    })
}
