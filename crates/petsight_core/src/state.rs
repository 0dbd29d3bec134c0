use crate::view_model::AppViewModel;
use crate::{SubmissionResult, UploadId};

/// Where the single pipeline currently stands.
///
/// Compressing and submitting are distinct variants, so the two can never be
/// observed at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Compressing {
        upload_id: UploadId,
    },
    Submitting {
        upload_id: UploadId,
    },
    Succeeded {
        result: String,
    },
    Failed {
        error: String,
    },
}

impl Phase {
    /// Upload the pipeline is waiting on, if any.
    pub fn active_upload(&self) -> Option<UploadId> {
        match self {
            Phase::Compressing { upload_id } | Phase::Submitting { upload_id } => Some(*upload_id),
            Phase::Idle | Phase::Succeeded { .. } | Phase::Failed { .. } => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active_upload().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: Phase,
    preview: Option<String>,
    /// Outcome of the last finished submission; survives later aborted runs.
    last_outcome: Option<SubmissionResult>,
    last_upload_id: UploadId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Data URI of the most recent compressed image, if one is shown.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::project(&self.phase, self.preview.as_deref(), self.dirty)
    }

    /// Returns whether anything visible changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn start_compressing(&mut self) -> UploadId {
        self.last_upload_id += 1;
        self.phase = Phase::Compressing {
            upload_id: self.last_upload_id,
        };
        self.mark_dirty();
        self.last_upload_id
    }

    pub(crate) fn start_submitting(&mut self, upload_id: UploadId, preview: String) {
        self.preview = Some(preview);
        self.phase = Phase::Submitting { upload_id };
        self.mark_dirty();
    }

    pub(crate) fn finish_submission(&mut self, outcome: SubmissionResult) {
        let phase = match &outcome {
            SubmissionResult::Success { result } => Phase::Succeeded {
                result: result.clone(),
            },
            SubmissionResult::Failure { error } => Phase::Failed {
                error: error.clone(),
            },
        };
        self.last_outcome = Some(outcome);
        self.set_phase(phase);
    }

    /// Leaves the busy phase without a new outcome, showing the previous one again.
    pub(crate) fn abort_upload(&mut self) {
        let phase = match &self.last_outcome {
            Some(SubmissionResult::Success { result }) => Phase::Succeeded {
                result: result.clone(),
            },
            Some(SubmissionResult::Failure { error }) => Phase::Failed {
                error: error.clone(),
            },
            None => Phase::Idle,
        };
        self.set_phase(phase);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_preview(&mut self) {
        if self.preview.take().is_some() {
            self.mark_dirty();
        }
    }
}
