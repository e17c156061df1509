//! Fretquiz · guitar note-reading trainer backend
//!
//! A note is shown on the staff and the learner picks, among a few tab
//! positions, the one that sounds it. Alternate fingerings of the same pitch
//! count as correct.
//!
//! The domain core (`pitch`, `profile`, `positions`, `question`, `evaluator`,
//! `session`) is pure and synchronous. The remaining modules host it as an
//! Axum HTTP + WebSocket service.

pub mod error;
pub mod pitch;
pub mod profile;
pub mod positions;
pub mod question;
pub mod evaluator;
pub mod session;

pub mod telemetry;
pub mod config;
pub mod state;
pub mod protocol;
pub mod logic;
pub mod routes;

pub use error::QuizError;
pub use evaluator::{is_correct, positions_equal};
pub use pitch::{notation_label_of, open_pitch, pitch_of, AbsolutePitch, FretboardPosition};
pub use positions::{all_positions, equivalent_positions, pitch_groups};
pub use profile::{DifficultyProfile, ProfileCatalog};
pub use question::{generate, Question};
pub use session::{QuizSession, RoundState, Selection};
