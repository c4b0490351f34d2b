//! Session context and navigation state machine.
//!
//! A [`Session`] holds everything one user has entered so far and the
//! current navigation state. Flow operations validate the transition they
//! need before touching any data, so out-of-order calls (generating before
//! logging in, planning twice while generating) fail with
//! [`SessionError::InvalidTransition`] instead of acting on stale input.

pub mod flow;

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use studyplan_store::{CredentialError, CredentialStore};

use crate::feasibility::{self, Feasibility, FeasibilityError};
use crate::model::{Exam, StudyPreferences, Task};

pub use flow::FlowError;

/// Where a session is in the planning flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Unauthenticated,
    CollectingInput,
    Feasible,
    Infeasible,
    Generating,
    Presented,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::CollectingInput => "collecting_input",
            Self::Feasible => "feasible",
            Self::Infeasible => "infeasible",
            Self::Generating => "generating",
            Self::Presented => "presented",
        };
        f.write_str(s)
    }
}

/// The session state machine.
///
/// Enforces the valid transition graph:
///
/// ```text
/// unauthenticated  -> collecting_input   (login)
/// collecting_input -> feasible           (feasibility pass)
/// collecting_input -> infeasible         (feasibility fail)
/// collecting_input -> presented          (exam allocation)
/// feasible         -> generating
/// infeasible       -> generating         (explicit override only)
/// feasible         -> collecting_input   (edit input)
/// infeasible       -> collecting_input   (edit input)
/// presented        -> collecting_input   (start over)
/// generating       -> presented          (parsed answer)
/// generating       -> feasible           (failed generation, retry allowed)
/// generating       -> infeasible         (failed overridden generation)
/// any              -> unauthenticated    (logout)
/// ```
pub struct SessionStateMachine;

impl SessionStateMachine {
    pub fn is_valid_transition(from: SessionState, to: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (from, to),
            (Unauthenticated, CollectingInput)
                | (CollectingInput, Feasible)
                | (CollectingInput, Infeasible)
                | (CollectingInput, Presented)
                | (Feasible, Generating)
                | (Infeasible, Generating)
                | (Feasible, CollectingInput)
                | (Infeasible, CollectingInput)
                | (Presented, CollectingInput)
                | (Generating, Presented)
                | (Generating, Feasible)
                | (Generating, Infeasible)
                | (_, Unauthenticated)
        )
    }
}

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("no {0} submitted")]
    MissingInput(&'static str),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error(transparent)]
    Feasibility(#[from] FeasibilityError),
}

/// One user's planning session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    state: SessionState,
    username: Option<String>,
    tasks: Vec<Task>,
    preferences: Option<StudyPreferences>,
    feasibility: Option<Feasibility>,
    exams: Vec<Exam>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Unauthenticated,
            username: None,
            tasks: Vec::new(),
            preferences: None,
            feasibility: None,
            exams: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn preferences(&self) -> Option<&StudyPreferences> {
        self.preferences.as_ref()
    }

    /// The last feasibility result, if the check has run on current input.
    pub fn feasibility(&self) -> Option<Feasibility> {
        self.feasibility
    }

    pub fn exams(&self) -> &[Exam] {
        &self.exams
    }

    /// Move to `to`, failing if the edge is not in the graph.
    pub(crate) fn transition(&mut self, to: SessionState) -> Result<(), SessionError> {
        if !SessionStateMachine::is_valid_transition(self.state, to) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        debug!(session = %self.id, from = %self.state, %to, "session transition");
        self.state = to;
        Ok(())
    }

    /// Check credentials and start collecting input.
    pub fn login(
        &mut self,
        store: &CredentialStore,
        username: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::Unauthenticated {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: SessionState::CollectingInput,
            });
        }
        if !store.check_credentials(username, password)? {
            return Err(SessionError::InvalidCredentials);
        }
        self.transition(SessionState::CollectingInput)?;
        self.username = Some(username.to_string());
        info!(session = %self.id, username, "logged in");
        Ok(())
    }

    /// Drop all input and return to the login state.
    pub fn logout(&mut self) {
        let id = self.id;
        *self = Self::new();
        self.id = id;
        info!(session = %id, "logged out");
    }

    /// Go back to input collection, keeping what was entered.
    pub fn edit_input(&mut self) -> Result<(), SessionError> {
        // Leaving `Unauthenticated` is reserved for `login`.
        if self.state == SessionState::Unauthenticated {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: SessionState::CollectingInput,
            });
        }
        if self.state != SessionState::CollectingInput {
            self.transition(SessionState::CollectingInput)?;
        }
        self.feasibility = None;
        Ok(())
    }

    /// Replace the timetable input. Any earlier feasibility result is
    /// discarded.
    pub fn submit_timetable_input(
        &mut self,
        tasks: Vec<Task>,
        preferences: StudyPreferences,
    ) -> Result<(), SessionError> {
        self.edit_input()?;
        debug!(session = %self.id, tasks = tasks.len(), "timetable input submitted");
        self.tasks = tasks;
        self.preferences = Some(preferences);
        Ok(())
    }

    /// Run the feasibility check on the submitted input and move to
    /// `Feasible` or `Infeasible`.
    pub fn check_feasibility(&mut self) -> Result<Feasibility, SessionError> {
        if self.state != SessionState::CollectingInput {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: SessionState::Feasible,
            });
        }
        if self.tasks.is_empty() {
            return Err(SessionError::MissingInput("tasks"));
        }
        let prefs = self
            .preferences
            .as_ref()
            .ok_or(SessionError::MissingInput("study preferences"))?;

        let result = feasibility::check_feasibility(
            self.tasks.iter().map(|t| t.expected_hours),
            prefs.days.len(),
            prefs.hours_per_day,
        )?;

        let next = if result.is_pass() {
            SessionState::Feasible
        } else {
            SessionState::Infeasible
        };
        self.transition(next)?;
        self.feasibility = Some(result);
        info!(
            session = %self.id,
            required = result.required(),
            available = result.available(),
            pass = result.is_pass(),
            "feasibility checked"
        );
        Ok(result)
    }
}
