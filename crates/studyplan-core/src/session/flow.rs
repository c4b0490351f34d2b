//! The two planning flows on top of a [`Session`].
//!
//! - Timetable: feasibility gate, prompt, one generation request, parse.
//! - Exam: deterministic allocation, no external call.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use super::{Session, SessionError, SessionState};
use crate::allocator::{self, ExamSchedule};
use crate::feasibility::Feasibility;
use crate::generator::TextGenerator;
use crate::model::Exam;
use crate::prompt;
use crate::response::{self, ParseSource, ParsedTimetable, ResponseError};

/// Errors from running a flow.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(
        "not enough study hours: {required} needed but only {available} available; \
         increase study hours to {recommended_hours_per_day} per day or add more study days"
    )]
    Infeasible {
        required: u64,
        available: u64,
        recommended_hours_per_day: u64,
    },

    #[error("text generation failed: {0:#}")]
    Service(anyhow::Error),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl Session {
    /// Ask `generator` for a timetable and parse the answer.
    ///
    /// Requires a prior [`Session::check_feasibility`]. From `Infeasible`
    /// the request is only sent when `override_infeasible` is set. On any
    /// failure the session returns to its pre-generation state so the user
    /// can retry; on success it moves to `Presented`.
    pub async fn generate_timetable(
        &mut self,
        generator: &dyn TextGenerator,
        override_infeasible: bool,
    ) -> Result<ParsedTimetable, FlowError> {
        let before = self.state;
        match (before, self.feasibility) {
            (SessionState::Feasible, _) => {}
            (
                SessionState::Infeasible,
                Some(Feasibility::Fail {
                    required,
                    available,
                    recommended_hours_per_day,
                }),
            ) if !override_infeasible => {
                return Err(FlowError::Infeasible {
                    required,
                    available,
                    recommended_hours_per_day,
                });
            }
            (SessionState::Infeasible, _) => {
                warn!(session = %self.id, "generating despite insufficient study hours");
            }
            _ => {
                return Err(SessionError::InvalidTransition {
                    from: before,
                    to: SessionState::Generating,
                }
                .into());
            }
        }

        let prefs = self
            .preferences
            .as_ref()
            .ok_or(SessionError::MissingInput("study preferences"))?;
        let request = prompt::build_timetable_prompt(&self.tasks, prefs);

        self.transition(SessionState::Generating)?;
        info!(session = %self.id, generator = generator.name(), "requesting timetable");

        let answer = match generator.generate(&request).await {
            Ok(answer) => answer,
            Err(e) => {
                self.transition(before)?;
                return Err(FlowError::Service(e));
            }
        };

        match response::parse_response(answer.as_deref()) {
            Ok(parsed) => {
                self.transition(SessionState::Presented)?;
                if let ParseSource::Recovered { decode_error } = &parsed.source {
                    info!(
                        session = %self.id,
                        rows = parsed.entries.len(),
                        %decode_error,
                        "timetable recovered from malformed answer"
                    );
                }
                Ok(parsed)
            }
            Err(e) => {
                self.transition(before)?;
                warn!(session = %self.id, error = %e, "timetable answer rejected");
                Err(e.into())
            }
        }
    }

    /// Allocate study pages for `exams` relative to `today`.
    ///
    /// Exams too close to plan for are reported in
    /// [`ExamSchedule::skipped`], not as errors.
    pub fn plan_exams(
        &mut self,
        exams: Vec<Exam>,
        today: NaiveDate,
    ) -> Result<ExamSchedule, SessionError> {
        self.edit_input()?;
        if exams.is_empty() {
            return Err(SessionError::MissingInput("exams"));
        }
        self.exams = exams;

        let schedule = allocator::allocate_exams(&self.exams, today);
        self.transition(SessionState::Presented)?;
        info!(
            session = %self.id,
            plans = schedule.plans.len(),
            skipped = schedule.skipped.len(),
            "exam schedule planned"
        );
        Ok(schedule)
    }
}
