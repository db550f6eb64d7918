//! Orchestration of the parse → read → merge → write pipeline.
//!
//! A [`ReportManager`] is built once by the caller and shared by reference.
//! Each call runs sequentially on the calling thread; another thread may
//! observe progress through [`ReportManager::state`] and request
//! cancellation through a [`CancelHandle`]. Cancellation is honoured at step
//! boundaries up to the moment the staged workbook is renamed into place.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::litereport::engine::error::{ReportError, Result};
use crate::litereport::engine::format::Store;
use crate::litereport::engine::io::excel_write::StagedReport;
use crate::litereport::engine::io::{self, excel_read, excel_write};
use crate::litereport::engine::merge::merge_with_stats;
use crate::litereport::engine::model::{DuplicateKeyPolicy, RecordSet};

/// Progress of the current or last pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    #[default]
    Idle,
    Parsing,
    Reading,
    Merging,
    Writing,
    Done,
    Cancelled,
    Failed,
}

impl ReportState {
    /// Returns `true` once a run has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReportState::Done | ReportState::Cancelled | ReportState::Failed
        )
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Handling of repeated keys inside one retailer export.
    pub duplicates: DuplicateKeyPolicy,
}

/// Everything one report generation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub subtract: bool,
    pub store: Store,
}

/// Outcome of a successful [`ReportManager::generate_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub output: PathBuf,
    pub store: Store,
    pub subtract: bool,
    /// Items parsed from the retailer export.
    pub parsed: usize,
    /// Items already present in the destination.
    pub existing: usize,
    pub updated: usize,
    pub inserted: usize,
    /// Items written to the destination.
    pub total: usize,
}

/// Cloneable flag used to cancel a running pipeline from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Requests cancellation. Takes effect at the next step boundary of the
    /// current run, or at the start of the next run when idle.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Replaces the destination with `staged` unless cancellation was
    /// requested. A cancelled staged report is dropped, which removes its
    /// temporary file. Once the rename starts it runs to completion.
    pub fn commit_unless_cancelled(&self, staged: StagedReport) -> Result<()> {
        if self.is_cancelled() {
            debug!(
                output = %staged.target().display(),
                "cancelled before commit, staged report discarded"
            );
            return Err(ReportError::Cancelled);
        }
        staged.commit()
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Entry point coordinating report creation and generation.
#[derive(Debug, Default)]
pub struct ReportManager {
    options: ReportOptions,
    state: Mutex<ReportState>,
    cancel: CancelHandle,
}

impl ReportManager {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            state: Mutex::new(ReportState::Idle),
            cancel: CancelHandle::default(),
        }
    }

    pub fn options(&self) -> ReportOptions {
        self.options
    }

    /// Current pipeline state.
    pub fn state(&self) -> ReportState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle that cancels the run in progress.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Creates an empty report (header row only) and returns the path it was
    /// written to, after forcing the `.xlsx` extension. An existing file is
    /// only replaced when `overwrite` is set.
    #[instrument(level = "info", skip(self, output), fields(output = %output.display()))]
    pub fn create_new_file(&self, output: &Path, overwrite: bool) -> Result<PathBuf> {
        let output = io::normalize_output_path(output);
        let exists = output
            .try_exists()
            .map_err(|error| ReportError::file_access(&output, error))?;
        if exists && !overwrite {
            return Err(ReportError::AlreadyExists(output));
        }

        excel_write::write_report(&output, &RecordSet::new())?;
        info!(path = %output.display(), "empty report created");
        Ok(output)
    }

    /// Parses the retailer export, merges it into the destination and
    /// replaces the destination with the result.
    ///
    /// On any failure the destination keeps its previous content and the
    /// manager ends in [`ReportState::Failed`] (or
    /// [`ReportState::Cancelled`]).
    #[instrument(
        level = "info",
        skip_all,
        fields(
            input = %request.input.display(),
            output = %request.output.display(),
            store = %request.store,
            subtract = request.subtract
        )
    )]
    pub fn generate_report(&self, request: &ReportRequest) -> Result<ReportSummary> {
        self.transition(ReportState::Idle);

        let result = self.run_pipeline(request);
        self.cancel.reset();
        match &result {
            Ok(summary) => {
                self.transition(ReportState::Done);
                info!(
                    parsed = summary.parsed,
                    updated = summary.updated,
                    inserted = summary.inserted,
                    total = summary.total,
                    "report generated"
                );
            }
            Err(ReportError::Cancelled) => self.transition(ReportState::Cancelled),
            Err(error) => {
                debug!(%error, kind = ?error.kind(), "report generation failed");
                self.transition(ReportState::Failed);
            }
        }
        result
    }

    fn run_pipeline(&self, request: &ReportRequest) -> Result<ReportSummary> {
        let output = io::normalize_output_path(&request.output);

        self.enter(ReportState::Parsing)?;
        io::ensure_input_extension(&request.input)?;
        let rows = excel_read::read_rows(&request.input, None)?;
        let incoming = request
            .store
            .parser()
            .parse(&rows, self.options.duplicates)?;
        info!(items = incoming.len(), "retailer export parsed");

        self.enter(ReportState::Reading)?;
        let existing = excel_read::read_report(&output)?;
        info!(items = existing.len(), "destination loaded");

        self.enter(ReportState::Merging)?;
        let (merged, stats) = merge_with_stats(&incoming, &existing, request.subtract);

        self.enter(ReportState::Writing)?;
        let staged = excel_write::stage_report(&output, &merged)?;
        self.cancel.commit_unless_cancelled(staged)?;

        Ok(ReportSummary {
            output,
            store: request.store,
            subtract: request.subtract,
            parsed: incoming.len(),
            existing: existing.len(),
            updated: stats.updated,
            inserted: stats.inserted,
            total: merged.len(),
        })
    }

    fn enter(&self, next: ReportState) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(ReportError::Cancelled);
        }
        self.transition(next);
        Ok(())
    }

    fn transition(&self, next: ReportState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(from = ?*state, to = ?next, "state transition");
        *state = next;
    }
}
