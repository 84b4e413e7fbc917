//! State transitions - FSM transition logic
//!
//! Implements the state machine that handles event-driven state
//! transitions of a repair session.

use thiserror::Error;

use super::events::SessionEvent;
use super::states::SessionState;

/// Error type for invalid state transitions.
#[derive(Error, Debug, Clone)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} with event {event}")]
    InvalidTransition { from: SessionState, event: String },
}

/// Represents a state transition result.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: SessionState,
    /// The state after the transition.
    pub to: SessionState,
    /// The event that triggered the transition.
    pub event: SessionEvent,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// State machine for the capture -> detect -> select -> analyze -> present
/// flow.
#[derive(Debug, Clone)]
pub struct StateMachine {
    /// Current state.
    current_state: SessionState,
    /// Transition history (limited).
    history: Vec<StateTransition>,
    /// Max history entries to keep.
    max_history: usize,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine in Idle state.
    pub fn new() -> Self {
        Self {
            current_state: SessionState::Idle,
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Create a state machine with a specific initial state.
    pub fn with_state(state: SessionState) -> Self {
        Self {
            current_state: state,
            history: Vec::new(),
            max_history: 50,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> &SessionState {
        &self.current_state
    }

    /// Get the transition history.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Handle an event and transition to a new state.
    pub fn handle_event(&mut self, event: SessionEvent) -> StateTransition {
        let old_state = self.current_state.clone();
        let new_state = self.compute_next_state(&old_state, &event);
        let changed = old_state != new_state;

        self.current_state = new_state.clone();

        let transition = StateTransition {
            from: old_state,
            to: new_state,
            event,
            changed,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        transition
    }

    /// Compute the next state given current state and event.
    fn compute_next_state(&self, state: &SessionState, event: &SessionEvent) -> SessionState {
        use SessionEvent::*;
        use SessionState::*;

        match (state, event) {
            // ========== Capture ==========
            (Idle, MediaCaptured) => Captured,
            // A new capture replaces the previous one
            (Captured, MediaCaptured) => Captured,
            (Idle, CaptureCleared) => Idle,
            (Captured, CaptureCleared) => Idle,

            // ========== Detection ==========
            (Captured, AnalysisRequested) => Detecting,
            // Empty item list: behave as if the user selected "no specific
            // item" and go straight into the diagnosis flow
            (Detecting, DetectionSucceeded { item_count: 0 }) => Analyzing,
            (Detecting, DetectionSucceeded { .. }) => Selecting,
            (Detecting, DetectionFailed { error }) => Failed {
                message: error.clone(),
                failed_at: chrono::Utc::now().to_rfc3339(),
            },

            // ========== Diagnosis ==========
            (Selecting, ItemSelected { .. }) => Analyzing,
            (Analyzing, DiagnosisSucceeded) => Presenting,
            (Analyzing, DiagnosisFailed { error }) => Failed {
                message: error.clone(),
                failed_at: chrono::Utc::now().to_rfc3339(),
            },

            // ========== Presentation ==========
            (Presenting, AnotherItemRequested) => Selecting,

            // ========== Global navigation ==========
            (_, HistoryEntrySelected) => Presenting,
            (_, SessionReset) => Idle,

            // ========== Default: no transition ==========
            _ => state.clone(),
        }
    }

    /// Check if a transition is valid without executing it.
    pub fn can_transition(&self, event: &SessionEvent) -> bool {
        let next = self.compute_next_state(&self.current_state, event);
        next != self.current_state
    }

    /// Reset to Idle state.
    pub fn reset(&mut self) {
        self.current_state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_flow() {
        let mut sm = StateMachine::new();
        assert_eq!(sm.state(), &SessionState::Idle);

        assert!(sm.handle_event(SessionEvent::MediaCaptured).changed);
        assert_eq!(sm.state(), &SessionState::Captured);

        assert!(sm.handle_event(SessionEvent::AnalysisRequested).changed);
        assert_eq!(sm.state(), &SessionState::Detecting);

        assert!(sm
            .handle_event(SessionEvent::DetectionSucceeded { item_count: 3 })
            .changed);
        assert_eq!(sm.state(), &SessionState::Selecting);

        assert!(sm
            .handle_event(SessionEvent::ItemSelected { focused: true })
            .changed);
        assert_eq!(sm.state(), &SessionState::Analyzing);

        assert!(sm.handle_event(SessionEvent::DiagnosisSucceeded).changed);
        assert_eq!(sm.state(), &SessionState::Presenting);
    }

    #[test]
    fn test_empty_detection_skips_selection() {
        let mut sm = StateMachine::with_state(SessionState::Detecting);
        sm.handle_event(SessionEvent::DetectionSucceeded { item_count: 0 });
        assert_eq!(sm.state(), &SessionState::Analyzing);
    }

    #[test]
    fn test_detection_failure_lands_in_failed() {
        let mut sm = StateMachine::with_state(SessionState::Detecting);
        sm.handle_event(SessionEvent::DetectionFailed {
            error: "scan failed".to_string(),
        });
        assert!(matches!(
            sm.state(),
            SessionState::Failed { message, .. } if message == "scan failed"
        ));
    }

    #[test]
    fn test_reset_reaches_idle_from_anywhere() {
        for start in [
            SessionState::Captured,
            SessionState::Detecting,
            SessionState::Selecting,
            SessionState::Analyzing,
            SessionState::Presenting,
            SessionState::Failed {
                message: "x".to_string(),
                failed_at: "t".to_string(),
            },
        ] {
            let mut sm = StateMachine::with_state(start);
            sm.handle_event(SessionEvent::SessionReset);
            assert_eq!(sm.state(), &SessionState::Idle);
        }
    }

    #[test]
    fn test_history_selection_reaches_presenting_from_anywhere() {
        for start in [
            SessionState::Idle,
            SessionState::Captured,
            SessionState::Detecting,
            SessionState::Failed {
                message: "x".to_string(),
                failed_at: "t".to_string(),
            },
        ] {
            let mut sm = StateMachine::with_state(start);
            sm.handle_event(SessionEvent::HistoryEntrySelected);
            assert_eq!(sm.state(), &SessionState::Presenting);
        }
    }

    #[test]
    fn test_select_another_only_from_presenting() {
        let mut sm = StateMachine::with_state(SessionState::Presenting);
        assert!(sm.can_transition(&SessionEvent::AnotherItemRequested));
        sm.handle_event(SessionEvent::AnotherItemRequested);
        assert_eq!(sm.state(), &SessionState::Selecting);

        let mut sm = StateMachine::with_state(SessionState::Selecting);
        assert!(!sm.can_transition(&SessionEvent::AnotherItemRequested));
        let transition = sm.handle_event(SessionEvent::AnotherItemRequested);
        assert!(!transition.changed);
    }

    #[test]
    fn test_unknown_pairs_do_not_transition() {
        let mut sm = StateMachine::with_state(SessionState::Detecting);
        // No user-triggered transition may start another call mid-flight
        let transition = sm.handle_event(SessionEvent::AnalysisRequested);
        assert!(!transition.changed);
        assert_eq!(sm.state(), &SessionState::Detecting);
    }

    #[test]
    fn test_history_tracking() {
        let mut sm = StateMachine::new();
        sm.handle_event(SessionEvent::MediaCaptured);
        sm.handle_event(SessionEvent::AnalysisRequested);

        assert_eq!(sm.history().len(), 2);
        assert_eq!(sm.history()[1].event.name(), "analysis_requested");
    }
}
