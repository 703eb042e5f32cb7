//! Scan orchestrator
//!
//! # State Progression
//! IDLE → CAPTURING → RECOGNIZING → CLASSIFYING → RESOLVING → DISPLAYING → IDLE
//!
//! `FAILED` is reachable from every stage before DISPLAYING and always
//! returns to IDLE. The frame source is paused only once a query has been
//! classified and is resumed on every exit path, success or failure.
//!
//! The state mutex is held for transitions only, never across an await.
//! The Idle check and the move to the first stage happen under one lock,
//! so a trigger arriving mid-attempt is dropped as [`ScanOutcome::Ignored`].

use crate::capture::{frame_source_from_config, FrameSource, Preprocessor};
use crate::error::{ScanError, ScanResult};
use crate::models::{CanonicalBook, IdentifierSource, Query};
use crate::presenter::{BookDisplay, Presenter, TerminalDisplay};
use crate::recognizers::Recognizers;
use crate::services::{
    append_log_from_config, AppendOutcome, GoogleBooksClient, IdentifierClassifier,
    MetadataResolver,
};
use chrono::Utc;
use shelfscan_common::config::TomlConfig;
use shelfscan_common::{EventBus, ScanEvent, ScanState, StatusLine};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Which recognizer a scan trigger uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Barcode,
    IsbnText,
    TitleText,
}

impl ScanMode {
    pub fn source(&self) -> IdentifierSource {
        match self {
            ScanMode::Barcode => IdentifierSource::Barcode,
            ScanMode::IsbnText => IdentifierSource::IsbnText,
            ScanMode::TitleText => IdentifierSource::TitleText,
        }
    }

    /// OCR modes get the grayscale pass
    pub fn is_text(&self) -> bool {
        !matches!(self, ScanMode::Barcode)
    }

    fn progress_message(&self) -> &'static str {
        match self {
            ScanMode::Barcode => "Capturing and reading barcode...",
            ScanMode::IsbnText => "Capturing and reading ISBN number...",
            ScanMode::TitleText => "Capturing and reading title...",
        }
    }
}

fn found_message(source: IdentifierSource, query: &Query) -> String {
    match source {
        IdentifierSource::Barcode => format!("Barcode found: {}", query.value()),
        IdentifierSource::IsbnText => format!("ISBN number found: {}", query.value()),
        IdentifierSource::TitleText => format!("Title found: {}", query.value()),
        IdentifierSource::Manual => format!("Searching for: {}", query.value()),
    }
}

/// Successful attempt
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub query: Query,
    pub book: CanonicalBook,
    /// Display always happened; this records the append attempt
    pub append: AppendOutcome,
}

/// Result of one trigger
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Completed(ScanReport),
    /// Recoverable failure; capture was resumed
    Failed(ScanError),
    /// Another attempt was in flight
    Ignored,
}

impl ScanOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ScanOutcome::Completed(_))
    }
}

pub struct Orchestrator {
    frame_source: Arc<dyn FrameSource>,
    preprocessor: Preprocessor,
    recognizers: Recognizers,
    classifier: IdentifierClassifier,
    resolver: MetadataResolver,
    presenter: Presenter,
    status: StatusLine,
    event_bus: EventBus,
    state: Mutex<ScanState>,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        frame_source: Arc<dyn FrameSource>,
        preprocessor: Preprocessor,
        recognizers: Recognizers,
        classifier: IdentifierClassifier,
        resolver: MetadataResolver,
        presenter: Presenter,
        status: StatusLine,
        event_bus: EventBus,
    ) -> Self {
        Self {
            frame_source,
            preprocessor,
            recognizers,
            classifier,
            resolver,
            presenter,
            status,
            event_bus,
            state: Mutex::new(ScanState::Idle),
        }
    }

    /// Wire the production components from configuration
    ///
    /// Books are displayed on stdout.
    pub fn from_config(
        config: &TomlConfig,
        status: StatusLine,
        event_bus: EventBus,
    ) -> shelfscan_common::Result<Self> {
        let catalog = GoogleBooksClient::new(&config.catalog)
            .map_err(|e| shelfscan_common::Error::Config(format!("Catalog client: {}", e)))?;
        let append_log = append_log_from_config(&config.append)
            .map_err(|e| shelfscan_common::Error::Config(format!("Append client: {}", e)))?;
        let display: Arc<dyn BookDisplay> = Arc::new(TerminalDisplay::stdout());

        Ok(Self::new(
            frame_source_from_config(&config.capture),
            Preprocessor::from_config(&config.capture),
            Recognizers::from_config(&config.recognition),
            IdentifierClassifier::new(config.recognition.isbn_validation),
            MetadataResolver::new(Arc::new(catalog)),
            Presenter::new(display, append_log),
            status,
            event_bus,
        ))
    }

    pub fn state(&self) -> ScanState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Acquire the frame source; failure is fatal for the session
    pub async fn start(&self) -> ScanResult<()> {
        match self.frame_source.start().await {
            Ok(()) => {
                info!(source = self.frame_source.name(), "Frame source started");
                self.status.set("Camera ready");
                Ok(())
            }
            Err(e) => {
                let err = ScanError::CameraUnavailable(e.to_string());
                tracing::error!(source = self.frame_source.name(), error = %e, "Frame source failed to start");
                self.status.set(err.status_message());
                Err(err)
            }
        }
    }

    /// Run one scan attempt in the given mode
    pub async fn scan(&self, mode: ScanMode) -> ScanOutcome {
        if !self.begin_attempt(ScanState::Capturing) {
            return ScanOutcome::Ignored;
        }
        self.status.set(mode.progress_message());

        let result = self.run_scan(mode).await;
        self.finish_attempt(result)
    }

    /// Manual title entry; no capture, no pause
    pub async fn search_manual(&self, text: &str) -> ScanOutcome {
        if !self.begin_attempt(ScanState::Classifying) {
            return ScanOutcome::Ignored;
        }

        let result = self.run_manual(text).await;
        self.finish_attempt(result)
    }

    async fn run_scan(&self, mode: ScanMode) -> ScanResult<ScanReport> {
        let source = mode.source();

        let capture = self.frame_source.capture().await.map_err(|e| {
            warn!(mode = ?mode, error = %e, "Frame capture failed");
            ScanError::RecognitionFailure {
                origin: source,
                reason: e.to_string(),
            }
        })?;

        self.transition(ScanState::Recognizing);
        let capture = if mode.is_text() {
            self.preprocessor.apply(capture)
        } else {
            capture
        };

        let recognizer = self.recognizers.for_mode(mode);
        let recognized = recognizer.recognize(&capture).await.map_err(|e| {
            warn!(recognizer = recognizer.name(), error = %e, "Recognition failed");
            ScanError::RecognitionFailure {
                origin: source,
                reason: e.to_string(),
            }
        })?;

        self.transition(ScanState::Classifying);
        let query = self.classifier.classify(&recognized, source)?;
        self.status.set(found_message(source, &query));

        // Freeze the view for the lookup and display
        self.frame_source.pause();

        self.resolve_and_present(query).await
    }

    async fn run_manual(&self, text: &str) -> ScanResult<ScanReport> {
        let query = self.classifier.manual_query(text)?;
        self.status.set(found_message(IdentifierSource::Manual, &query));
        self.resolve_and_present(query).await
    }

    async fn resolve_and_present(&self, query: Query) -> ScanResult<ScanReport> {
        self.transition(ScanState::Resolving);
        self.status.set("Searching for book information...");
        let book = self.resolver.resolve(&query).await?;

        self.transition(ScanState::Displaying);
        self.event_bus.emit_lossy(ScanEvent::BookResolved {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            timestamp: Utc::now(),
        });

        self.status.set("Recording to spreadsheet...");
        let append = self.presenter.present(&book).await;
        match &append {
            AppendOutcome::Sent => self.status.set("Recorded! Ready to scan the next book."),
            AppendOutcome::Failed(message) => {
                self.status.set("Failed to record to spreadsheet.");
                self.event_bus.emit_lossy(ScanEvent::AppendFailed {
                    isbn: book.isbn.clone(),
                    message: message.clone(),
                    timestamp: Utc::now(),
                });
            }
            AppendOutcome::Disabled => self.status.set("Book displayed. Ready to scan the next book."),
        }

        Ok(ScanReport {
            query,
            book,
            append,
        })
    }

    /// Idle check and first transition under one lock
    fn begin_attempt(&self, first: ScanState) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.accepts_trigger() {
            let current = *state;
            drop(state);
            info!(state = %current, "Trigger ignored, attempt in flight");
            self.event_bus.emit_lossy(ScanEvent::TriggerIgnored {
                state: current,
                timestamp: Utc::now(),
            });
            return false;
        }
        let old = std::mem::replace(&mut *state, first);
        drop(state);
        self.publish_transition(old, first);
        true
    }

    fn transition(&self, new_state: ScanState) {
        let old = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *state, new_state)
        };
        self.publish_transition(old, new_state);
    }

    fn publish_transition(&self, old_state: ScanState, new_state: ScanState) {
        tracing::debug!(from = %old_state, to = %new_state, "State transition");
        self.event_bus.emit_lossy(ScanEvent::StateChanged {
            old_state,
            new_state,
            timestamp: Utc::now(),
        });
    }

    /// Every exit path resumes capture and returns to Idle
    fn finish_attempt(&self, result: ScanResult<ScanReport>) -> ScanOutcome {
        let outcome = match result {
            Ok(report) => ScanOutcome::Completed(report),
            Err(err) => {
                warn!(error = %err, "Scan attempt failed");
                self.status.set(err.status_message());
                self.transition(ScanState::Failed);
                self.event_bus.emit_lossy(ScanEvent::AttemptFailed {
                    message: err.to_string(),
                    timestamp: Utc::now(),
                });
                ScanOutcome::Failed(err)
            }
        };

        self.frame_source.resume();
        self.transition(ScanState::Idle);
        outcome
    }
}
