//! session_state - State machine and FSM logic for the repair session
//!
//! This crate provides the state machine that sequences the
//! capture -> detect -> select -> analyze -> present flow, and the session
//! driver that owns the flow's data and its calls to the model gateway.

pub mod machine;
pub mod session;

// Re-export commonly used types
pub use machine::{SessionEvent, SessionState, StateMachine, StateTransition, TransitionError};
pub use session::{CallToken, RepairSession, SessionError, UiPreferences, CHAT_APOLOGY};
