//! Upload session state machine
//!
//! Owns the lifecycle of one detection request:
//! IDLE → SELECTING → UPLOADING → SUCCEEDED | FAILED, with SELECTING re-enterable
//! from every status.
//!
//! The result and the error message live inside the phase they belong to, so a
//! session can never carry both, and neither outside its status.

use crate::error::{SessionError, TransportError};
use crate::models::preview::{PreviewHandle, PreviewRegistry, VideoFile};
use crate::models::{decode_detection_response, NormalizedResult, Threshold};
use crate::services::result_normalizer::normalize;
use crate::services::transport::{DetectionTransport, TransferProgress, UploadRequest};
use chrono::{DateTime, Utc};
use railwatch_common::events::{EventBus, SessionEvent, SessionStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// State transition record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub session_id: Uuid,
    pub old_status: SessionStatus,
    pub new_status: SessionStatus,
    pub transitioned_at: DateTime<Utc>,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Selecting,
    Uploading,
    Succeeded(NormalizedResult),
    Failed(String),
}

impl Phase {
    fn status(&self) -> SessionStatus {
        match self {
            Phase::Idle => SessionStatus::Idle,
            Phase::Selecting => SessionStatus::Selecting,
            Phase::Uploading => SessionStatus::Uploading,
            Phase::Succeeded(_) => SessionStatus::Succeeded,
            Phase::Failed(_) => SessionStatus::Failed,
        }
    }
}

#[derive(Debug)]
struct SelectedVideo {
    video: VideoFile,
    // Held for its Drop
    preview: PreviewHandle,
}

/// One detection request, from file selection to result
pub struct UploadSession {
    session_id: Uuid,
    phase: Phase,
    selected: Option<SelectedVideo>,
    progress_percent: u8,
    threshold: Threshold,
    completed_detections: u64,
    previews: PreviewRegistry,
    event_bus: EventBus,
}

impl UploadSession {
    pub fn new(event_bus: EventBus) -> Self {
        Self::with_previews(event_bus, PreviewRegistry::new())
    }

    pub fn with_previews(event_bus: EventBus, previews: PreviewRegistry) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            phase: Phase::Idle,
            selected: None,
            progress_percent: 0,
            threshold: Threshold::default(),
            completed_detections: 0,
            previews,
            event_bus,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn status(&self) -> SessionStatus {
        self.phase.status()
    }

    pub fn selected_file(&self) -> Option<&VideoFile> {
        self.selected.as_ref().map(|s| &s.video)
    }

    pub fn preview_uri(&self) -> Option<&str> {
        self.selected.as_ref().map(|s| s.preview.uri())
    }

    /// Meaningful only while uploading
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Present exactly when the status is `Succeeded`
    pub fn result(&self) -> Option<&NormalizedResult> {
        match &self.phase {
            Phase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Present exactly when the status is `Failed`
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Number of successful detections so far; bumps on every success
    pub fn refresh_signal(&self) -> u64 {
        self.completed_detections
    }

    /// Replace the selection and reset to `Selecting`.
    ///
    /// Allowed from every status. The previous preview is released before the new
    /// one is created.
    pub fn select_file(&mut self, video: VideoFile) -> StateTransition {
        // Release first: at most one live preview per session
        drop(self.selected.take());

        let preview = self.previews.acquire(&video);
        tracing::info!(
            session_id = %self.session_id,
            file = %video.file_name,
            size_bytes = video.size_bytes,
            "Video selected"
        );
        self.selected = Some(SelectedVideo { video, preview });
        self.progress_percent = 0;
        self.transition_to(Phase::Selecting)
    }

    /// Set the confidence threshold; values outside the discrete set are ignored
    pub fn set_threshold(&mut self, value: f64) -> bool {
        match Threshold::new(value) {
            Some(threshold) => {
                self.threshold = threshold;
                true
            }
            None => {
                tracing::debug!(value, "Ignoring threshold outside the selectable set");
                false
            }
        }
    }

    /// Upload the selected video and wait for the detection result.
    ///
    /// Returns `NoFileSelected` / `UploadInProgress` without touching state or the
    /// transport. Otherwise the session ends `Succeeded` (`Ok`) or `Failed` (`Err`).
    /// Cancelling `cancel` drops the in-flight transfer and fails the session.
    pub async fn submit<T>(
        &mut self,
        transport: &T,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError>
    where
        T: DetectionTransport + ?Sized,
    {
        if self.status() == SessionStatus::Uploading {
            tracing::warn!(session_id = %self.session_id, "Submit ignored: upload in progress");
            return Err(SessionError::UploadInProgress);
        }

        let video = match &self.selected {
            Some(selected) => selected.video.clone(),
            None => {
                tracing::warn!(session_id = %self.session_id, "Submit without a selected video");
                return Err(SessionError::NoFileSelected);
            }
        };

        self.progress_percent = 0;
        self.transition_to(Phase::Uploading);
        tracing::info!(
            session_id = %self.session_id,
            file = %video.file_name,
            threshold = %self.threshold,
            "Uploading video for detection"
        );

        let request = UploadRequest {
            video,
            threshold: self.threshold,
        };
        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();

        let outcome = {
            let transfer = transport.upload(request, progress_tx);
            tokio::pin!(transfer);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break Err(TransportError::Cancelled),
                    Some(update) = progress_rx.recv() => self.record_progress(update),
                    result = &mut transfer => break result,
                }
            }
            // transfer dropped here, releasing the in-flight request
        };

        match outcome {
            Ok(body) => {
                // Reports sent in the transfer's final poll
                while let Ok(update) = progress_rx.try_recv() {
                    self.record_progress(update);
                }
                self.complete(&body)
            }
            Err(err) => {
                self.fail(err.failure_message());
                Err(err.into())
            }
        }
    }

    fn complete(&mut self, body: &str) -> Result<(), SessionError> {
        match decode_detection_response(body) {
            Ok(response) => {
                self.succeed(normalize(&response));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(session_id = %self.session_id, error = %err, "Undecodable success body");
                self.fail(err.failure_message());
                Err(err.into())
            }
        }
    }

    /// Apply a progress report: clamped, never regressing
    fn record_progress(&mut self, update: TransferProgress) {
        if self.status() != SessionStatus::Uploading {
            return;
        }
        let percent = update.percent();
        if percent > self.progress_percent {
            self.progress_percent = percent;
            tracing::debug!(session_id = %self.session_id, percent, "Upload progress");
            self.emit_progress();
        }
    }

    fn succeed(&mut self, result: NormalizedResult) {
        self.completed_detections += 1;
        tracing::info!(
            session_id = %self.session_id,
            video_path = %result.video_path,
            schedule_entries = result.schedule.len(),
            "Detection completed"
        );
        self.transition_to(Phase::Succeeded(result));
        if self.progress_percent != 100 {
            self.progress_percent = 100;
            self.emit_progress();
        }
        self.event_bus.emit_lossy(SessionEvent::DetectionCompleted {
            session_id: self.session_id,
            refresh_signal: self.completed_detections,
            timestamp: Utc::now(),
        });
    }

    fn fail(&mut self, message: String) {
        tracing::error!(session_id = %self.session_id, error = %message, "Detection failed");
        self.progress_percent = 0;
        self.event_bus.emit_lossy(SessionEvent::DetectionFailed {
            session_id: self.session_id,
            message: message.clone(),
            timestamp: Utc::now(),
        });
        self.transition_to(Phase::Failed(message));
    }

    fn emit_progress(&self) {
        self.event_bus.emit_lossy(SessionEvent::UploadProgress {
            session_id: self.session_id,
            percent: self.progress_percent,
            timestamp: Utc::now(),
        });
    }

    fn transition_to(&mut self, phase: Phase) -> StateTransition {
        let transition = StateTransition {
            session_id: self.session_id,
            old_status: self.phase.status(),
            new_status: phase.status(),
            transitioned_at: Utc::now(),
        };
        self.phase = phase;

        tracing::info!(
            session_id = %self.session_id,
            from = %transition.old_status,
            to = %transition.new_status,
            "Session state transition"
        );
        self.event_bus.emit_lossy(SessionEvent::StateChanged {
            session_id: self.session_id,
            old_status: transition.old_status,
            new_status: transition.new_status,
            timestamp: transition.transitioned_at,
        });

        transition
    }
}

impl std::fmt::Debug for UploadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadSession")
            .field("session_id", &self.session_id)
            .field("status", &self.status())
            .field("selected", &self.selected_file())
            .field("progress_percent", &self.progress_percent)
            .field("threshold", &self.threshold)
            .finish()
    }
}
