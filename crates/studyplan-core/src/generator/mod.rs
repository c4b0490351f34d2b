//! Text-generation service boundary.
//!
//! The timetable flow hands a prompt to a [`TextGenerator`] and receives
//! raw text back. [`CommandGenerator`] is the production adapter: it runs an
//! external program (any CLI that reads a prompt on stdin and prints the
//! model's answer) and returns its stdout.
//!
//! ```text
//! Session::generate_timetable
//!     |
//!     v
//! &dyn TextGenerator --generate(prompt)--> Option<String>
//!     |
//!     v
//! response::parse_response
//! ```

pub mod command;
pub mod trait_def;

pub use command::CommandGenerator;
pub use trait_def::TextGenerator;
