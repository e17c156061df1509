//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Starting, reading and ending quiz sessions
//!   - Switching difficulty and moving to the next question
//!   - Recording a selected option (which reveals the round)

use tracing::{info, instrument};

use crate::error::QuizError;
use crate::pitch::FretboardPosition;
use crate::protocol::{profile_out, ProfileOut, RoundOut};
use crate::session::Selection;
use crate::state::AppState;

pub fn list_profiles(state: &AppState) -> Vec<ProfileOut> {
  state.profiles.all().iter().map(profile_out).collect()
}

#[instrument(level = "info", skip(state))]
pub async fn start_session(state: &AppState, difficulty: Option<&str>) -> Result<RoundOut, QuizError> {
  let round = state.create_session(difficulty).await?;
  info!(target: "question", session = %round.session_id, difficulty = %round.difficulty, "Session started");
  Ok(round)
}

#[instrument(level = "debug", skip(state))]
pub async fn current_round(state: &AppState, session_id: &str) -> Result<RoundOut, QuizError> {
  state.get_round(session_id).await
}

#[instrument(level = "info", skip(state))]
pub async fn change_difficulty(state: &AppState, session_id: &str, difficulty: &str) -> Result<RoundOut, QuizError> {
  let profile = state.profiles.resolve(difficulty)?.clone();
  state.update_session(session_id, |s| s.set_profile(profile)).await
}

#[instrument(level = "info", skip(state))]
pub async fn next_question(state: &AppState, session_id: &str) -> Result<RoundOut, QuizError> {
  state.update_session(session_id, |s| s.next_question()).await
}

/// Record a choice. Choosing again on a revealed round leaves it unchanged.
#[instrument(level = "info", skip(state))]
pub async fn select_option(
  state: &AppState,
  session_id: &str,
  position: FretboardPosition,
) -> Result<RoundOut, QuizError> {
  state
    .update_session(session_id, |s| {
      if let Selection::Ignored = s.select_option(position)? {
        info!(target: "question", session = %session_id, %position, "Round already revealed; selection ignored");
      }
      Ok(())
    })
    .await
}

#[instrument(level = "info", skip(state))]
pub async fn end_session(state: &AppState, session_id: &str) -> Result<(), QuizError> {
  state.remove_session(session_id).await?;
  info!(target: "question", session = %session_id, "Session ended");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{parse_config, QuizConfig};

  #[tokio::test]
  async fn full_round_trip_through_shared_logic() {
    let state = AppState::with_config(QuizConfig::default());
    let round = start_session(&state, Some("firstPosition")).await.unwrap();
    assert_eq!(round.options.len(), 4);
    assert!(!round.revealed);
    assert!(round.correct_position.is_none());
    assert!(round.equivalent_positions.is_empty());
    assert!(round.options.iter().all(|o| o.correct.is_none() && !o.selected));

    let first = &round.options[0];
    let pick = FretboardPosition::new(first.string, first.fret).unwrap();
    let revealed = select_option(&state, &round.session_id, pick).await.unwrap();
    assert!(revealed.revealed);
    assert!(revealed.options[0].selected);
    assert_eq!(revealed.options.iter().filter(|o| o.correct == Some(true)).count(), 1);
    let correct = revealed.correct_position.unwrap();
    assert!(revealed.equivalent_positions.contains(&correct));

    let next = next_question(&state, &round.session_id).await.unwrap();
    assert!(!next.revealed);
    assert!(next.options.iter().all(|o| !o.selected));

    end_session(&state, &round.session_id).await.unwrap();
    assert_eq!(
      current_round(&state, &round.session_id).await.unwrap_err(),
      QuizError::UnknownSession(round.session_id.clone())
    );
  }

  #[tokio::test]
  async fn unknown_difficulty_is_reported() {
    let state = AppState::default();
    assert_eq!(
      start_session(&state, Some("expert")).await.unwrap_err(),
      QuizError::UnknownDifficulty("expert".into())
    );
    let round = start_session(&state, None).await.unwrap();
    assert_eq!(round.difficulty, "openStrings");
    assert!(change_difficulty(&state, &round.session_id, "expert").await.is_err());
  }

  #[tokio::test]
  async fn configured_profiles_are_selectable() {
    let cfg = parse_config(
      r#"
        default_difficulty = "highE"
        [[profiles]]
        id = "highE"
        label = "High E"
        max_fret = 1
        strings = [1]
      "#,
    )
    .unwrap();
    let state = AppState::with_config(cfg);
    assert_eq!(list_profiles(&state).len(), 5);

    let round = start_session(&state, None).await.unwrap();
    assert_eq!(round.difficulty_label, "High E");
    assert_eq!(round.options.len(), 2);
  }

  #[tokio::test]
  async fn seeded_state_replays_the_same_questions() {
    let cfg = || parse_config("seed = 7").unwrap();
    let a = start_session(&AppState::with_config(cfg()), Some("advanced")).await.unwrap();
    let b = start_session(&AppState::with_config(cfg()), Some("advanced")).await.unwrap();
    assert_eq!(a.target_pitch, b.target_pitch);
    let frets = |r: &RoundOut| r.options.iter().map(|o| (o.string, o.fret)).collect::<Vec<_>>();
    assert_eq!(frets(&a), frets(&b));
  }
}
