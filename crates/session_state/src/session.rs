//! Session driver - owns the flow's data and sequences gateway calls.
//!
//! The pure FSM in [`crate::machine`] decides which transitions are legal;
//! this driver owns the captured media, detected items, results, history,
//! and the two chat transcripts, and performs the gateway calls. Every
//! call is dispatched with a [`CallToken`] and applied through a
//! `finish_*` step that discards completions arriving after the user has
//! navigated away.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use model_gateway::{GatewayError, ModelGateway};
use repair_core::{
    ConversationTranscript, DetectedItem, DiagnosisResult, HistoryLog, MediaReference,
};

use crate::machine::{SessionEvent, SessionState, StateMachine, TransitionError};

/// Fallback turn appended when a chat call fails. Chat failures never
/// abort the session.
pub const CHAT_APOLOGY: &str =
    "Sorry, I couldn't answer that just now. Please try sending your message again.";

/// Error type for session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("no detected item at index {0}")]
    UnknownItem(usize),

    #[error("no history entry with id {0}")]
    UnknownHistoryEntry(Uuid),
}

/// UI flags owned by the session and exposed only through its API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiPreferences {
    pub dark_mode: bool,
}

/// Identity of one dispatched gateway call.
///
/// A completion whose token no longer matches the session's epoch is
/// discarded silently instead of mutating newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallToken {
    epoch: u64,
}

/// One user's repair session: machine, data, and gateway access.
pub struct RepairSession<G> {
    gateway: G,
    machine: StateMachine,
    media: Option<MediaReference>,
    detected_items: Vec<DetectedItem>,
    current: Option<Arc<DiagnosisResult>>,
    history: HistoryLog,
    repair_transcript: ConversationTranscript,
    support_transcript: ConversationTranscript,
    last_error: Option<String>,
    epoch: u64,
    repair_chat_pending: bool,
    support_chat_pending: bool,
    prefs: UiPreferences,
}

impl<G> RepairSession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            machine: StateMachine::new(),
            media: None,
            detected_items: Vec::new(),
            current: None,
            history: HistoryLog::new(),
            repair_transcript: ConversationTranscript::new(),
            support_transcript: ConversationTranscript::new(),
            last_error: None,
            epoch: 0,
            repair_chat_pending: false,
            support_chat_pending: false,
            prefs: UiPreferences::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        self.machine.state()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn media(&self) -> Option<&MediaReference> {
        self.media.as_ref()
    }

    pub fn detected_items(&self) -> &[DetectedItem] {
        &self.detected_items
    }

    pub fn current(&self) -> Option<&Arc<DiagnosisResult>> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn repair_transcript(&self) -> &ConversationTranscript {
        &self.repair_transcript
    }

    pub fn support_transcript(&self) -> &ConversationTranscript {
        &self.support_transcript
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.machine.state().is_busy()
    }

    pub fn repair_chat_pending(&self) -> bool {
        self.repair_chat_pending
    }

    pub fn support_chat_pending(&self) -> bool {
        self.support_chat_pending
    }

    pub fn preferences(&self) -> UiPreferences {
        self.prefs
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.prefs.dark_mode = !self.prefs.dark_mode;
        self.prefs.dark_mode
    }

    /// Accept a normalized submission.
    ///
    /// Rejects silently (no transition) when the payload is empty or the
    /// session is past the capture phase; returns whether it was accepted.
    pub fn capture(&mut self, media: MediaReference) -> bool {
        if media.is_empty() {
            log::debug!("rejecting capture with empty payload");
            return false;
        }
        if !self.machine.state().accepts_capture() {
            return false;
        }

        self.epoch += 1;
        self.media = Some(media);
        self.detected_items.clear();
        self.last_error = None;
        self.machine.handle_event(SessionEvent::MediaCaptured);
        true
    }

    /// Discard the captured media without the rest of a full reset.
    pub fn clear_capture(&mut self) {
        if !self.machine.state().accepts_capture() {
            return;
        }
        self.epoch += 1;
        self.media = None;
        self.detected_items.clear();
        self.last_error = None;
        self.machine.handle_event(SessionEvent::CaptureCleared);
    }

    /// Return to Idle from any state. The history log and the support
    /// transcript survive; everything scoped to the current flow is
    /// cleared and in-flight completions become stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.media = None;
        self.detected_items.clear();
        self.current = None;
        self.last_error = None;
        self.repair_transcript.clear();
        self.machine.handle_event(SessionEvent::SessionReset);
    }

    /// Start the detection leg: `Captured -> Detecting`. Returns the token
    /// guarding this call and the media to submit.
    pub fn begin_detection(&mut self) -> Result<(CallToken, MediaReference), SessionError> {
        let media = match (self.machine.state(), &self.media) {
            (SessionState::Captured, Some(media)) => media.clone(),
            _ => return Err(self.invalid(SessionEvent::AnalysisRequested)),
        };

        self.machine.handle_event(SessionEvent::AnalysisRequested);
        Ok((CallToken { epoch: self.epoch }, media))
    }

    /// Apply a detection outcome.
    ///
    /// Returns `false` when the token is stale and the outcome was
    /// discarded (not an error; the user has simply moved on).
    pub fn finish_detection(
        &mut self,
        token: CallToken,
        outcome: Result<Vec<DetectedItem>, GatewayError>,
    ) -> bool {
        if token.epoch != self.epoch || !matches!(self.machine.state(), SessionState::Detecting) {
            log::debug!("discarding stale detection outcome");
            return false;
        }

        match outcome {
            Ok(items) => {
                let item_count = items.len();
                self.detected_items = items;
                self.machine
                    .handle_event(SessionEvent::DetectionSucceeded { item_count });
            }
            Err(err) => {
                let message = detection_failure_message(&err);
                self.last_error = Some(message.clone());
                self.machine
                    .handle_event(SessionEvent::DetectionFailed { error: message });
            }
        }
        true
    }

    /// Start the diagnosis leg from the selection screen. `selection`
    /// indexes the detected items; `None` means "no specific item".
    pub fn begin_diagnosis(
        &mut self,
        selection: Option<usize>,
    ) -> Result<(CallToken, MediaReference, Option<String>), SessionError> {
        let media = match (self.machine.state(), &self.media) {
            (SessionState::Selecting, Some(media)) => media.clone(),
            _ => return Err(self.invalid(SessionEvent::ItemSelected { focused: false })),
        };

        let focus = match selection {
            Some(index) => Some(
                self.detected_items
                    .get(index)
                    .ok_or(SessionError::UnknownItem(index))?
                    .focus_context(),
            ),
            None => None,
        };

        self.machine.handle_event(SessionEvent::ItemSelected {
            focused: focus.is_some(),
        });
        Ok((CallToken { epoch: self.epoch }, media, focus))
    }

    /// The no-focus diagnosis request used when detection found nothing:
    /// the machine is already in `Analyzing` and no selection event fires.
    fn fallback_diagnosis(
        &self,
    ) -> Result<(CallToken, MediaReference, Option<String>), SessionError> {
        let media = match (self.machine.state(), &self.media) {
            (SessionState::Analyzing, Some(media)) => media.clone(),
            _ => {
                return Err(SessionError::Transition(TransitionError::InvalidTransition {
                    from: self.machine.state().clone(),
                    event: SessionEvent::ItemSelected { focused: false }
                        .name()
                        .to_string(),
                }))
            }
        };
        Ok((CallToken { epoch: self.epoch }, media, None))
    }

    /// Apply a diagnosis outcome. Same staleness contract as
    /// [`Self::finish_detection`].
    pub fn finish_diagnosis(
        &mut self,
        token: CallToken,
        outcome: Result<DiagnosisResult, GatewayError>,
    ) -> bool {
        if token.epoch != self.epoch || !matches!(self.machine.state(), SessionState::Analyzing) {
            log::debug!("discarding stale diagnosis outcome");
            return false;
        }

        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                self.history.record(result.clone());
                self.current = Some(result);
                // The active diagnosis changed; repair Q&A starts over
                self.repair_transcript.clear();
                self.machine.handle_event(SessionEvent::DiagnosisSucceeded);
            }
            Err(err) => {
                let message = diagnosis_failure_message(&err);
                self.last_error = Some(message.clone());
                self.machine
                    .handle_event(SessionEvent::DiagnosisFailed { error: message });
            }
        }
        true
    }

    /// Re-enter the selection screen with the retained items and media,
    /// without re-detection. Only valid from `Presenting` after a
    /// non-empty detection.
    pub fn select_another(&mut self) -> Result<(), SessionError> {
        if !matches!(self.machine.state(), SessionState::Presenting)
            || self.detected_items.is_empty()
        {
            return Err(self.invalid(SessionEvent::AnotherItemRequested));
        }
        self.machine.handle_event(SessionEvent::AnotherItemRequested);
        Ok(())
    }

    /// Jump to presenting a stored diagnosis, from any state. History
    /// ordering is untouched; the repair transcript starts over.
    pub fn select_from_history(&mut self, id: Uuid) -> Result<(), SessionError> {
        let entry = self
            .history
            .get(id)
            .ok_or(SessionError::UnknownHistoryEntry(id))?;

        self.epoch += 1;
        self.current = Some(entry);
        self.last_error = None;
        self.repair_transcript.clear();
        self.machine.handle_event(SessionEvent::HistoryEntrySelected);
        Ok(())
    }

    fn invalid(&self, event: SessionEvent) -> SessionError {
        SessionError::Transition(TransitionError::InvalidTransition {
            from: self.machine.state().clone(),
            event: event.name().to_string(),
        })
    }
}

impl<G: ModelGateway> RepairSession<G> {
    /// Run the detection leg, falling through into the no-focus diagnosis
    /// when the service finds nothing to select.
    pub async fn confirm_analyze(&mut self) -> Result<&SessionState, SessionError> {
        let (token, media) = self.begin_detection()?;
        let outcome = self.gateway.detect_items(&media).await;
        self.finish_detection(token, outcome);

        if matches!(self.machine.state(), SessionState::Analyzing) {
            let (token, media, focus) = self.fallback_diagnosis()?;
            let outcome = self.gateway.analyze(&media, focus.as_deref()).await;
            self.finish_diagnosis(token, outcome);
        }

        Ok(self.machine.state())
    }

    /// Run the diagnosis leg for the user's selection.
    pub async fn select_item(
        &mut self,
        selection: Option<usize>,
    ) -> Result<&SessionState, SessionError> {
        let (token, media, focus) = self.begin_diagnosis(selection)?;
        let outcome = self.gateway.analyze(&media, focus.as_deref()).await;
        self.finish_diagnosis(token, outcome);
        Ok(self.machine.state())
    }

    /// Send a follow-up question about the active diagnosis. On gateway
    /// failure an apology turn is appended instead; the session survives.
    pub async fn send_repair_message(&mut self, text: &str) -> Result<(), SessionError> {
        let context = match (self.machine.state(), &self.current) {
            (SessionState::Presenting, Some(current)) => current.clone(),
            _ => {
                return Err(SessionError::Transition(TransitionError::InvalidTransition {
                    from: self.machine.state().clone(),
                    event: "repair_message".to_string(),
                }))
            }
        };

        let token = CallToken { epoch: self.epoch };
        let transcript_so_far = self.repair_transcript.clone();
        self.repair_transcript.push_user(text);

        self.repair_chat_pending = true;
        let outcome = self
            .gateway
            .repair_chat(&context, &transcript_so_far, text)
            .await;
        self.repair_chat_pending = false;

        if token.epoch != self.epoch {
            // The user navigated away mid-call; the reply no longer has a
            // transcript to land in
            log::debug!("discarding stale repair chat reply");
            return Ok(());
        }

        match outcome {
            Ok(reply) => self.repair_transcript.push_assistant(reply),
            Err(err) => {
                log::warn!("repair chat failed: {}", err);
                self.repair_transcript.push_assistant(CHAT_APOLOGY);
            }
        }
        Ok(())
    }

    /// Send an app-usage question. Independent of the repair flow; the
    /// transcript persists for the whole session.
    pub async fn send_support_message(&mut self, text: &str) {
        let transcript_so_far = self.support_transcript.clone();
        self.support_transcript.push_user(text);

        self.support_chat_pending = true;
        let outcome = self.gateway.support_chat(&transcript_so_far, text).await;
        self.support_chat_pending = false;

        match outcome {
            Ok(reply) => self.support_transcript.push_assistant(reply),
            Err(err) => {
                log::warn!("support chat failed: {}", err);
                self.support_transcript.push_assistant(CHAT_APOLOGY);
            }
        }
    }
}

fn detection_failure_message(err: &GatewayError) -> String {
    if err.is_configuration() {
        "The repair service is unavailable right now. Please try again later.".to_string()
    } else {
        format!("We couldn't scan your submission for repairable items: {}", err)
    }
}

fn diagnosis_failure_message(err: &GatewayError) -> String {
    if err.is_configuration() {
        "The repair service is unavailable right now. Please try again later.".to_string()
    } else {
        format!("We couldn't build a repair guide for this submission: {}", err)
    }
}
