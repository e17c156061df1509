//! Judging answers.

use crate::pitch::{pitch_of, FretboardPosition};

/// True if `chosen` sounds the same pitch as `target`, whichever string it is on.
pub fn is_correct(chosen: FretboardPosition, target: FretboardPosition) -> bool {
  pitch_of(chosen) == pitch_of(target)
}

/// Exact (string, fret) match. Only used to track which option was clicked.
pub fn positions_equal(a: FretboardPosition, b: FretboardPosition) -> bool {
  a == b
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pitch::MAX_FRET;

  fn every_position() -> Vec<FretboardPosition> {
    (1..=6)
      .flat_map(|s| (0..=MAX_FRET).map(move |f| FretboardPosition::new(s, f).unwrap()))
      .collect()
  }

  #[test]
  fn correctness_is_reflexive_and_symmetric() {
    let all = every_position();
    for a in &all {
      assert!(is_correct(*a, *a));
      for b in &all {
        assert_eq!(is_correct(*a, *b), is_correct(*b, *a));
      }
    }
  }

  #[test]
  fn alternate_fingering_counts_as_correct() {
    let open_e = FretboardPosition::new(1, 0).unwrap();
    let b_string_fifth = FretboardPosition::new(2, 5).unwrap();
    assert!(is_correct(b_string_fifth, open_e));
    assert!(!positions_equal(b_string_fifth, open_e));
  }

  #[test]
  fn different_pitch_is_wrong() {
    let a = FretboardPosition::new(5, 0).unwrap();
    let b = FretboardPosition::new(5, 1).unwrap();
    assert!(!is_correct(a, b));
  }
}
