//! Error type shared by the domain core and the service layer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
  /// String numbers run 1 (high E) through 6 (low E).
  #[error("string number {0} is outside 1..=6")]
  InvalidString(u8),

  #[error("fret {0} is outside 0..=24")]
  InvalidFret(u8),

  /// A pitch with no notation label. Reachable pitches are always labeled, so
  /// seeing this means the label range and the fretboard disagree.
  #[error("pitch {0} has no notation label")]
  UnlabeledPitch(u8),

  #[error("difficulty profile '{0}' has no positions")]
  EmptyProfile(String),

  #[error("invalid difficulty profile '{id}': {reason}")]
  InvalidProfile { id: String, reason: String },

  #[error("unknown difficulty '{0}'")]
  UnknownDifficulty(String),

  #[error("unknown session '{0}'")]
  UnknownSession(String),

  #[error("position (string {string}, fret {fret}) is not one of the current options")]
  NotAnOption { string: u8, fret: u8 },
}
