//! One learner's quiz: the active profile, the current question and the round state.
//!
//! Every change goes through one of three transitions:
//!   - `select_option`: Unrevealed -> Revealed (ignored once revealed)
//!   - `next_question`: any -> Unrevealed, with a freshly generated question
//!   - `set_profile`:   any -> Unrevealed, with a question from the new profile

use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

use crate::error::QuizError;
use crate::evaluator::{is_correct, positions_equal};
use crate::pitch::FretboardPosition;
use crate::profile::DifficultyProfile;
use crate::question::{generate, Question};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
  Unrevealed,
  Revealed { selected: FretboardPosition },
}

/// Result of a `select_option` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
  /// The choice was recorded and the round is now revealed.
  Recorded { correct: bool },
  /// The round was already revealed; nothing changed.
  Ignored,
}

pub struct QuizSession {
  id: String,
  profile: DifficultyProfile,
  question: Question,
  round: RoundState,
  rng: StdRng,
}

impl QuizSession {
  /// Start a session on `profile` with its first question already generated.
  pub fn new(id: String, profile: DifficultyProfile, mut rng: StdRng) -> Result<Self, QuizError> {
    let question = generate(&profile, &mut rng)?;
    Ok(Self { id, profile, question, round: RoundState::Unrevealed, rng })
  }

  pub fn id(&self) -> &str { &self.id }
  pub fn profile(&self) -> &DifficultyProfile { &self.profile }
  pub fn question(&self) -> &Question { &self.question }
  pub fn round(&self) -> RoundState { self.round }

  pub fn is_revealed(&self) -> bool {
    matches!(self.round, RoundState::Revealed { .. })
  }

  pub fn selected(&self) -> Option<FretboardPosition> {
    match self.round {
      RoundState::Revealed { selected } => Some(selected),
      RoundState::Unrevealed => None,
    }
  }

  /// Swap the active profile and start a new round on it.
  #[instrument(level = "debug", skip_all, fields(session = %self.id, profile = %profile.id()))]
  pub fn set_profile(&mut self, profile: DifficultyProfile) -> Result<(), QuizError> {
    let question = generate(&profile, &mut self.rng)?;
    self.profile = profile;
    self.question = question;
    self.round = RoundState::Unrevealed;
    info!(target: "question", session = %self.id, profile = %self.profile.id(), "Difficulty changed");
    Ok(())
  }

  /// Discard the current question and generate the next one.
  #[instrument(level = "debug", skip_all, fields(session = %self.id))]
  pub fn next_question(&mut self) -> Result<(), QuizError> {
    self.question = generate(&self.profile, &mut self.rng)?;
    self.round = RoundState::Unrevealed;
    debug!(target: "question", session = %self.id, target = %self.question.target_label, "New question");
    Ok(())
  }

  /// Record the learner's choice and reveal the round.
  ///
  /// Positions that are not among the current options are rejected, even
  /// after reveal.
  #[instrument(level = "debug", skip(self), fields(session = %self.id))]
  pub fn select_option(&mut self, position: FretboardPosition) -> Result<Selection, QuizError> {
    if !self.question.options.iter().any(|o| positions_equal(*o, position)) {
      return Err(QuizError::NotAnOption { string: position.string(), fret: position.fret() });
    }
    if self.is_revealed() {
      return Ok(Selection::Ignored);
    }

    self.round = RoundState::Revealed { selected: position };
    let correct = is_correct(position, self.question.correct_position);
    info!(target: "question", session = %self.id, %position, %correct, "Answer revealed");
    Ok(Selection::Recorded { correct })
  }

  /// `None` until the round is revealed, then whether `position` is right.
  pub fn is_option_correct(&self, position: FretboardPosition) -> Option<bool> {
    match self.round {
      RoundState::Unrevealed => None,
      RoundState::Revealed { .. } => Some(is_correct(position, self.question.correct_position)),
    }
  }
}
