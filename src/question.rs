//! Building one multiple-choice round: a target note and the positions to pick from.
//!
//! Flow:
//! 1) Draw the correct position uniformly from the profile's positions.
//! 2) Collect every fingering of the same pitch (shown to the learner after reveal).
//! 3) Group the remaining positions by pitch, shuffle the groups and take one
//!    random fingering from each of the first `DISTRACTORS` groups.
//! 4) Shuffle the correct position in among the distractors.
//!
//! Distractors are drawn per pitch, not per position, so no two options ever
//! sound the same note. When a profile has fewer than `DISTRACTORS` other
//! pitches the round simply has fewer options; it is never padded.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::QuizError;
use crate::pitch::{notation_label_of, pitch_of, AbsolutePitch, FretboardPosition};
use crate::positions::{all_positions, equivalent_positions, group_by_pitch};
use crate::profile::DifficultyProfile;

/// Wrong answers per round when the profile has enough distinct pitches.
pub const DISTRACTORS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub target_pitch: AbsolutePitch,
  /// Renderer label of `target_pitch`, e.g. `"g/4"`.
  pub target_label: String,
  pub correct_position: FretboardPosition,
  pub equivalent_positions: Vec<FretboardPosition>,
  pub options: Vec<FretboardPosition>,
}

/// Generate a fresh question for `profile`, drawing all randomness from `rng`.
#[instrument(level = "debug", skip_all, fields(profile = %profile.id()))]
pub fn generate<R: Rng + ?Sized>(
  profile: &DifficultyProfile,
  rng: &mut R,
) -> Result<Question, QuizError> {
  let candidates = all_positions(profile);
  let correct_position = *candidates
    .choose(rng)
    .ok_or_else(|| QuizError::EmptyProfile(profile.id().to_string()))?;
  let target_pitch = pitch_of(correct_position);
  let target_label = notation_label_of(target_pitch)?;

  let equivalent = equivalent_positions(correct_position, profile);

  let wrong_by_pitch = group_by_pitch(
    candidates.into_iter().filter(|p| pitch_of(*p) != target_pitch),
  );
  let mut wrong_groups: Vec<Vec<FretboardPosition>> = wrong_by_pitch.into_values().collect();
  wrong_groups.shuffle(rng);

  let mut options = Vec::with_capacity(DISTRACTORS + 1);
  options.push(correct_position);
  for group in wrong_groups.iter().take(DISTRACTORS) {
    if let Some(p) = group.choose(rng) {
      options.push(*p);
    }
  }
  options.shuffle(rng);

  if options.len() < DISTRACTORS + 1 {
    debug!(target: "question", profile = %profile.id(), options = options.len(), "Not enough distinct pitches; reduced option count");
  }

  Ok(Question {
    target_pitch,
    target_label,
    correct_position,
    equivalent_positions: equivalent,
    options,
  })
}
