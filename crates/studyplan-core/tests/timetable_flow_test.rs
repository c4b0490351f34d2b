//! Integration tests for the timetable flow: login, feasibility gate,
//! generation and parsing through a scripted generator.

use studyplan_core::feasibility::Feasibility;
use studyplan_core::model::StudyDay;
use studyplan_core::response::{ParseSource, ResponseError};
use studyplan_core::session::{FlowError, Session, SessionError, SessionState};
use studyplan_test_utils::{
    Reply, STRICT_ANSWER, ScriptedGenerator, TEST_PASSWORD, TEST_USER, preferences, task,
    temp_store,
};

const WEEKDAYS: [StudyDay; 5] = [
    StudyDay::Monday,
    StudyDay::Tuesday,
    StudyDay::Wednesday,
    StudyDay::Thursday,
    StudyDay::Friday,
];

fn logged_in_session() -> (tempfile::TempDir, Session) {
    let (dir, store) = temp_store();
    let mut session = Session::new();
    session
        .login(&store, TEST_USER, TEST_PASSWORD)
        .expect("login should succeed");
    (dir, session)
}

/// A session with 4 hours of tasks over 5 days x 2 hours.
fn feasible_session() -> (tempfile::TempDir, Session) {
    let (dir, mut session) = logged_in_session();
    session
        .submit_timetable_input(
            vec![task("Essay draft", 3), task("Problem set", 1)],
            preferences(&WEEKDAYS, 2),
        )
        .unwrap();
    assert!(session.check_feasibility().unwrap().is_pass());
    (dir, session)
}

/// A session with 12 hours of tasks over 5 days x 2 hours.
fn infeasible_session() -> (tempfile::TempDir, Session) {
    let (dir, mut session) = logged_in_session();
    session
        .submit_timetable_input(
            vec![task("Thesis", 8), task("Slides", 4)],
            preferences(&WEEKDAYS, 2),
        )
        .unwrap();
    (dir, session)
}

#[test]
fn wrong_password_stays_unauthenticated() {
    let (_dir, store) = temp_store();
    let mut session = Session::new();
    let err = session.login(&store, TEST_USER, "wrong").unwrap_err();
    assert!(matches!(err, SessionError::InvalidCredentials));
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[test]
fn infeasible_input_recommends_hours() {
    let (_dir, mut session) = infeasible_session();
    let result = session.check_feasibility().unwrap();
    assert_eq!(
        result,
        Feasibility::Fail {
            required: 12,
            available: 10,
            recommended_hours_per_day: 3,
        }
    );
    assert_eq!(session.state(), SessionState::Infeasible);
}

#[tokio::test]
async fn infeasible_blocks_generation_without_override() {
    let (_dir, mut session) = infeasible_session();
    session.check_feasibility().unwrap();

    let generator = ScriptedGenerator::answering(STRICT_ANSWER);
    let err = session
        .generate_timetable(&generator, false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Infeasible {
            recommended_hours_per_day: 3,
            ..
        }
    ));
    assert!(generator.prompts().is_empty(), "no request may be sent");
    assert_eq!(session.state(), SessionState::Infeasible);
}

#[tokio::test]
async fn override_allows_infeasible_generation() {
    let (_dir, mut session) = infeasible_session();
    session.check_feasibility().unwrap();

    let generator = ScriptedGenerator::answering(STRICT_ANSWER);
    let parsed = session.generate_timetable(&generator, true).await.unwrap();
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(session.state(), SessionState::Presented);
}

#[tokio::test]
async fn generation_requires_feasibility_check() {
    let (_dir, mut session) = logged_in_session();
    session
        .submit_timetable_input(vec![task("Essay", 1)], preferences(&WEEKDAYS, 2))
        .unwrap();

    let generator = ScriptedGenerator::answering(STRICT_ANSWER);
    let err = session
        .generate_timetable(&generator, true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::Session(SessionError::InvalidTransition {
            from: SessionState::CollectingInput,
            to: SessionState::Generating,
        })
    ));
}

#[tokio::test]
async fn strict_answer_is_presented() {
    let (_dir, mut session) = feasible_session();
    let generator = ScriptedGenerator::answering(STRICT_ANSWER);

    let parsed = session.generate_timetable(&generator, false).await.unwrap();

    assert_eq!(parsed.source, ParseSource::Structured);
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[1].day, "Wednesday");
    assert_eq!(parsed.entries[1].tasks, vec!["Problem set", "Essay draft"]);
    assert_eq!(session.state(), SessionState::Presented);

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1, "exactly one request per generation");
    assert!(prompts[0].contains("Essay draft"));
    assert!(prompts[0].contains("\"timetable\""));
}

#[tokio::test]
async fn fenced_answer_is_recovered() {
    let (_dir, mut session) = feasible_session();
    let answer = format!("Here you go:\n```json\n{STRICT_ANSWER}\n```");
    let generator = ScriptedGenerator::answering(&answer);

    let parsed = session.generate_timetable(&generator, false).await.unwrap();
    assert!(matches!(parsed.source, ParseSource::Recovered { .. }));
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].date, "2026-10-19");
}

#[tokio::test]
async fn empty_answer_allows_retry() {
    let (_dir, mut session) = feasible_session();
    let generator =
        ScriptedGenerator::new([Reply::Nothing, Reply::Text(STRICT_ANSWER.to_string())]);

    let err = session
        .generate_timetable(&generator, false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::Response(ResponseError::EmptyResponse)
    ));
    assert_eq!(session.state(), SessionState::Feasible);

    let parsed = session.generate_timetable(&generator, false).await.unwrap();
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(generator.prompts().len(), 2);
}

#[tokio::test]
async fn malformed_structure_surfaces_raw_text() {
    let (_dir, mut session) = feasible_session();
    let answer = r#"{"plan": "take it easy"}"#;
    let generator = ScriptedGenerator::answering(answer);

    let err = session
        .generate_timetable(&generator, false)
        .await
        .unwrap_err();
    match err {
        FlowError::Response(e @ ResponseError::MalformedStructure { .. }) => {
            assert_eq!(e.raw_text(), Some(answer));
        }
        other => panic!("expected MalformedStructure, got {other:?}"),
    }
    assert_eq!(session.state(), SessionState::Feasible);
}

#[tokio::test]
async fn service_failure_allows_retry() {
    let (_dir, mut session) = feasible_session();
    let generator = ScriptedGenerator::new([Reply::Failure("quota exceeded".to_string())]);

    let err = session
        .generate_timetable(&generator, false)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Service(_)));
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(session.state(), SessionState::Feasible);
}

#[tokio::test]
async fn editing_input_resets_feasibility() {
    let (_dir, mut session) = infeasible_session();
    session.check_feasibility().unwrap();

    session
        .submit_timetable_input(vec![task("Thesis", 8)], preferences(&WEEKDAYS, 2))
        .unwrap();
    assert_eq!(session.state(), SessionState::CollectingInput);
    assert!(session.feasibility().is_none());
    assert!(session.check_feasibility().unwrap().is_pass());
}

#[test]
fn logout_clears_input() {
    let (_dir, mut session) = feasible_session();
    let id = session.id();
    session.logout();
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.tasks().is_empty());
    assert!(session.username().is_none());
    assert_eq!(session.id(), id);
}
