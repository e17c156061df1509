//! Pitch model: fretboard coordinates, absolute pitches and notation labels.
//!
//! Pitches are MIDI numbers of the *written* note. Guitar music is notated an
//! octave above where it sounds, so the open high E is written E5 (76) even
//! though it sounds as E4.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

pub const STRING_COUNT: u8 = 6;
pub const MAX_FRET: u8 = 24;

/// Written pitch of each open string, index 0 = string 1 (high E).
const OPEN_PITCHES: [u8; STRING_COUNT as usize] = [
  76, // E5
  71, // B4
  67, // G4
  62, // D4
  57, // A3
  52, // E3
];

/// Closed range of pitches that have a notation label. It reaches down to the
/// renderer's lowest staff note (E2) and up to string 1 at the last fret.
pub const LOWEST_LABELED: u8 = 40;
pub const HIGHEST_LABELED: u8 = 100;

const PITCH_CLASS_NAMES: [&str; 12] = [
  "c", "c#", "d", "d#", "e", "f", "f#", "g", "g#", "a", "a#", "b",
];

/// A (string, fret) coordinate. Always valid once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct FretboardPosition {
  string: u8,
  fret: u8,
}

#[derive(Deserialize)]
struct RawPosition {
  string: u8,
  fret: u8,
}

impl TryFrom<RawPosition> for FretboardPosition {
  type Error = QuizError;

  fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
    FretboardPosition::new(raw.string, raw.fret)
  }
}

impl FretboardPosition {
  pub fn new(string: u8, fret: u8) -> Result<Self, QuizError> {
    if !(1..=STRING_COUNT).contains(&string) {
      return Err(QuizError::InvalidString(string));
    }
    if fret > MAX_FRET {
      return Err(QuizError::InvalidFret(fret));
    }
    Ok(Self { string, fret })
  }

  /// For callers holding coordinates already checked against the neck, such
  /// as a `DifficultyProfile`.
  pub(crate) fn from_checked(string: u8, fret: u8) -> Self {
    debug_assert!((1..=STRING_COUNT).contains(&string) && fret <= MAX_FRET);
    Self { string, fret }
  }

  pub fn string(&self) -> u8 { self.string }
  pub fn fret(&self) -> u8 { self.fret }
}

impl fmt::Display for FretboardPosition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "string {} fret {}", self.string, self.fret)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbsolutePitch(pub u8);

impl AbsolutePitch {
  pub fn value(self) -> u8 { self.0 }
}

impl fmt::Display for AbsolutePitch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Pitch of an open string.
pub fn open_pitch(string_number: u8) -> Result<AbsolutePitch, QuizError> {
  if !(1..=STRING_COUNT).contains(&string_number) {
    return Err(QuizError::InvalidString(string_number));
  }
  Ok(AbsolutePitch(OPEN_PITCHES[(string_number - 1) as usize]))
}

pub fn pitch_of(position: FretboardPosition) -> AbsolutePitch {
  // `FretboardPosition` guarantees the string index is in range.
  AbsolutePitch(OPEN_PITCHES[(position.string - 1) as usize] + position.fret)
}

/// Renderer label for a pitch, e.g. `"c/4"` or `"f#/5"`.
pub fn notation_label_of(pitch: AbsolutePitch) -> Result<String, QuizError> {
  let midi = pitch.value();
  if !(LOWEST_LABELED..=HIGHEST_LABELED).contains(&midi) {
    return Err(QuizError::UnlabeledPitch(midi));
  }
  let name = PITCH_CLASS_NAMES[(midi % 12) as usize];
  let octave = i32::from(midi / 12) - 1;
  Ok(format!("{}/{}", name, octave))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pos(string: u8, fret: u8) -> FretboardPosition {
    FretboardPosition::new(string, fret).unwrap()
  }

  #[test]
  fn open_pitches_decrease_towards_low_e() {
    let pitches: Vec<u8> = (1..=6).map(|s| open_pitch(s).unwrap().value()).collect();
    assert_eq!(pitches, vec![76, 71, 67, 62, 57, 52]);
    assert!(pitches.windows(2).all(|w| w[0] > w[1]));
  }

  #[test]
  fn open_pitch_rejects_out_of_range_strings() {
    assert_eq!(open_pitch(0), Err(QuizError::InvalidString(0)));
    assert_eq!(open_pitch(7), Err(QuizError::InvalidString(7)));
  }

  #[test]
  fn position_constructor_validates_both_axes() {
    assert_eq!(FretboardPosition::new(0, 3), Err(QuizError::InvalidString(0)));
    assert_eq!(FretboardPosition::new(3, 25), Err(QuizError::InvalidFret(25)));
    assert!(FretboardPosition::new(6, 24).is_ok());
  }

  #[test]
  fn pitch_rises_strictly_with_fret() {
    for string in 1..=6 {
      let mut prev = None;
      for fret in 0..=MAX_FRET {
        let p = pitch_of(pos(string, fret));
        assert_eq!(p.value(), open_pitch(string).unwrap().value() + fret);
        if let Some(prev) = prev {
          assert!(p > prev);
        }
        prev = Some(p);
      }
    }
  }

  #[test]
  fn every_reachable_pitch_has_a_label() {
    for string in 1..=6 {
      for fret in 0..=MAX_FRET {
        let p = pitch_of(pos(string, fret));
        assert!(notation_label_of(p).is_ok(), "no label for {}", p);
      }
    }
  }

  #[test]
  fn labels_follow_renderer_format() {
    assert_eq!(notation_label_of(AbsolutePitch(40)).unwrap(), "e/2");
    assert_eq!(notation_label_of(AbsolutePitch(60)).unwrap(), "c/4");
    assert_eq!(notation_label_of(AbsolutePitch(66)).unwrap(), "f#/4");
    assert_eq!(notation_label_of(AbsolutePitch(76)).unwrap(), "e/5");
    assert_eq!(notation_label_of(AbsolutePitch(88)).unwrap(), "e/6");
    assert_eq!(notation_label_of(AbsolutePitch(100)).unwrap(), "e/7");
  }

  #[test]
  fn label_depends_only_on_pitch() {
    let high = pos(1, 1);
    let other = pos(2, 6);
    assert_eq!(pitch_of(high), AbsolutePitch(77));
    assert_eq!(pitch_of(other), AbsolutePitch(77));
    assert_eq!(notation_label_of(pitch_of(high)).unwrap(), "f/5");
    assert_eq!(notation_label_of(pitch_of(high)), notation_label_of(pitch_of(other)));
  }

  #[test]
  fn out_of_range_pitch_is_an_error_not_a_default() {
    assert_eq!(notation_label_of(AbsolutePitch(39)), Err(QuizError::UnlabeledPitch(39)));
    assert_eq!(notation_label_of(AbsolutePitch(101)), Err(QuizError::UnlabeledPitch(101)));
  }

  #[test]
  fn deserialization_goes_through_validation() {
    let ok: FretboardPosition = serde_json::from_str(r#"{"string":2,"fret":3}"#).unwrap();
    assert_eq!(ok, pos(2, 3));
    assert!(serde_json::from_str::<FretboardPosition>(r#"{"string":9,"fret":3}"#).is_err());
    assert!(serde_json::from_str::<FretboardPosition>(r#"{"string":1,"fret":30}"#).is_err());
  }
}
