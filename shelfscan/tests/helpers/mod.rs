//! Test helper utilities
//!
//! In-memory fakes for every orchestrator seam, plus builders for
//! catalog candidates.

#![allow(dead_code)]

pub mod log_capture;

pub use log_capture::LogCapture;

use async_trait::async_trait;
use shelfscan::capture::{FrameSource, FrameSourceError, Preprocessor};
use shelfscan::models::{
    CandidateRecord, CanonicalBook, IndustryIdentifier, RawCapture, RecognitionResult,
};
use shelfscan::presenter::{BookDisplay, Presenter};
use shelfscan::recognizers::{Recognizer, RecognizerError, Recognizers};
use shelfscan::services::{
    AppendLog, AppendOutcome, BookCatalog, CatalogError, IdentifierClassifier, MetadataResolver,
};
use shelfscan::Orchestrator;
use shelfscan_common::config::IsbnValidation;
use shelfscan_common::{EventBus, StatusLine};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ============================================================================
// Frame source
// ============================================================================

/// RGBA of every pixel in fake frames
pub const FRAME_PIXEL: [u8; 4] = [30, 60, 90, 255];

/// Frame source returning a 2x2 frame; counts pause/resume calls
#[derive(Default)]
pub struct FakeFrameSource {
    pub fail_start: bool,
    pub fail_capture: bool,
    pub paused: AtomicBool,
    pub pauses: AtomicUsize,
    pub resumes: AtomicUsize,
    pub captures: AtomicUsize,
}

impl FakeFrameSource {
    pub fn pause_count(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }

    pub fn resume_count(&self) -> usize {
        self.resumes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameSource for FakeFrameSource {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn start(&self) -> Result<(), FrameSourceError> {
        if self.fail_start {
            return Err(FrameSourceError::Unavailable("permission denied".into()));
        }
        Ok(())
    }

    async fn capture(&self) -> Result<RawCapture, FrameSourceError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if self.fail_capture {
            return Err(FrameSourceError::CaptureFailed("device busy".into()));
        }
        Ok(RawCapture::from_rgba(2, 2, FRAME_PIXEL.repeat(4)).expect("2x2 frame"))
    }

    fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Recognizer
// ============================================================================

/// Recognizer with a canned answer; `None` means nothing recognized
pub struct FakeRecognizer {
    pub output: Option<RecognitionResult>,
    /// Pixels of the last frame seen
    pub last_frame: Mutex<Option<Vec<u8>>>,
}

impl FakeRecognizer {
    pub fn code(payload: &str) -> Arc<Self> {
        Arc::new(Self {
            output: Some(RecognitionResult::DecodedCode(payload.to_string())),
            last_frame: Mutex::new(None),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Arc::new(Self {
            output: Some(RecognitionResult::RecognizedText {
                text: text.to_string(),
                language: "eng".to_string(),
            }),
            last_frame: Mutex::new(None),
        })
    }

    pub fn nothing() -> Arc<Self> {
        Arc::new(Self {
            output: None,
            last_frame: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Recognizer for FakeRecognizer {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn recognize(&self, capture: &RawCapture) -> Result<RecognitionResult, RecognizerError> {
        *self.last_frame.lock().unwrap() = Some(capture.pixels().to_vec());
        self.output.clone().ok_or(RecognizerError::NothingRecognized)
    }
}

pub fn recognizers_with(
    barcode: Arc<FakeRecognizer>,
    isbn_text: Arc<FakeRecognizer>,
    title_text: Arc<FakeRecognizer>,
) -> Recognizers {
    Recognizers {
        barcode,
        isbn_text,
        title_text,
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Catalog with canned candidates; records every search term
#[derive(Default)]
pub struct FakeCatalog {
    pub candidates: Vec<CandidateRecord>,
    pub fail: bool,
    pub searches: Mutex<Vec<String>>,
    /// When set, each search waits for a notification before answering
    pub gate: Option<Arc<Notify>>,
    /// Notified when a search has started
    pub entered: Option<Arc<Notify>>,
}

impl FakeCatalog {
    pub fn with(candidates: Vec<CandidateRecord>) -> Self {
        Self {
            candidates,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn search_terms(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookCatalog for FakeCatalog {
    async fn search(&self, search_term: &str) -> Result<Vec<CandidateRecord>, CatalogError> {
        self.searches.lock().unwrap().push(search_term.to_string());
        if let Some(entered) = &self.entered {
            entered.notify_one();
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(CatalogError::NetworkError("connection refused".into()));
        }
        Ok(self.candidates.clone())
    }
}

// ============================================================================
// Presenter seams
// ============================================================================

#[derive(Default)]
pub struct RecordingDisplay {
    pub shown: Mutex<Vec<CanonicalBook>>,
}

impl RecordingDisplay {
    pub fn count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

impl BookDisplay for RecordingDisplay {
    fn show(&self, book: &CanonicalBook) {
        self.shown.lock().unwrap().push(book.clone());
    }
}

pub struct RecordingAppendLog {
    pub outcome: AppendOutcome,
    pub appended: Mutex<Vec<CanonicalBook>>,
}

impl RecordingAppendLog {
    pub fn new(outcome: AppendOutcome) -> Self {
        Self {
            outcome,
            appended: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.appended.lock().unwrap().len()
    }
}

#[async_trait]
impl AppendLog for RecordingAppendLog {
    async fn append(&self, book: &CanonicalBook) -> AppendOutcome {
        self.appended.lock().unwrap().push(book.clone());
        self.outcome.clone()
    }
}

// ============================================================================
// Candidate builders
// ============================================================================

pub fn candidate(title: &str, publisher: Option<&str>) -> CandidateRecord {
    CandidateRecord {
        title: Some(title.to_string()),
        publisher: publisher.map(str::to_string),
        ..Default::default()
    }
}

pub fn candidate_with_isbn(title: &str, publisher: Option<&str>, isbn13: &str) -> CandidateRecord {
    CandidateRecord {
        industry_identifiers: Some(vec![
            IndustryIdentifier {
                id_type: "ISBN_10".to_string(),
                identifier: isbn13[3..12].to_string() + "X",
            },
            IndustryIdentifier {
                id_type: "ISBN_13".to_string(),
                identifier: isbn13.to_string(),
            },
        ]),
        ..candidate(title, publisher)
    }
}

// ============================================================================
// Orchestrator harness
// ============================================================================

pub struct Harness {
    pub orchestrator: Arc<Orchestrator>,
    pub frames: Arc<FakeFrameSource>,
    pub catalog: Arc<FakeCatalog>,
    pub display: Arc<RecordingDisplay>,
    pub append_log: Arc<RecordingAppendLog>,
    pub status: StatusLine,
    pub events: EventBus,
}

pub struct HarnessBuilder {
    frames: FakeFrameSource,
    recognizers: Recognizers,
    catalog: FakeCatalog,
    append_outcome: AppendOutcome,
    isbn_validation: IsbnValidation,
    grayscale: bool,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            frames: FakeFrameSource::default(),
            recognizers: recognizers_with(
                FakeRecognizer::nothing(),
                FakeRecognizer::nothing(),
                FakeRecognizer::nothing(),
            ),
            catalog: FakeCatalog::default(),
            append_outcome: AppendOutcome::Sent,
            isbn_validation: IsbnValidation::Strict,
            grayscale: true,
        }
    }

    pub fn frames(mut self, frames: FakeFrameSource) -> Self {
        self.frames = frames;
        self
    }

    pub fn recognizers(mut self, recognizers: Recognizers) -> Self {
        self.recognizers = recognizers;
        self
    }

    pub fn catalog(mut self, catalog: FakeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn append_outcome(mut self, outcome: AppendOutcome) -> Self {
        self.append_outcome = outcome;
        self
    }

    pub fn isbn_validation(mut self, validation: IsbnValidation) -> Self {
        self.isbn_validation = validation;
        self
    }

    pub fn grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    pub fn build(self) -> Harness {
        let frames = Arc::new(self.frames);
        let catalog = Arc::new(self.catalog);
        let display = Arc::new(RecordingDisplay::default());
        let append_log = Arc::new(RecordingAppendLog::new(self.append_outcome));
        let status = StatusLine::new();
        let events = EventBus::new(64);

        let orchestrator = Orchestrator::new(
            frames.clone(),
            Preprocessor::new(self.grayscale),
            self.recognizers,
            IdentifierClassifier::new(self.isbn_validation),
            MetadataResolver::new(catalog.clone()),
            Presenter::new(display.clone(), append_log.clone()),
            status.clone(),
            events.clone(),
        );

        Harness {
            orchestrator: Arc::new(orchestrator),
            frames,
            catalog,
            display,
            append_log,
            status,
            events,
        }
    }
}
