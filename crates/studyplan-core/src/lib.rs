//! Study planning core: input validation, feasibility, exam page
//! allocation, timetable prompt construction, and recovery-tolerant parsing
//! of generated timetables.

pub mod allocator;
pub mod feasibility;
pub mod generator;
pub mod input;
pub mod model;
pub mod prompt;
pub mod response;
pub mod session;

pub use allocator::{ExamAllocation, ExamSchedule, allocate_exam, allocate_exams};
pub use feasibility::{Feasibility, FeasibilityError, check_feasibility};
pub use generator::{CommandGenerator, TextGenerator};
pub use model::{Exam, Lesson, ScheduleEntry, StudyDay, StudyDayPlan, StudyPreferences, Task};
pub use response::{ParseSource, ParsedTimetable, ResponseError, parse_response};
pub use session::{FlowError, Session, SessionError, SessionState};
