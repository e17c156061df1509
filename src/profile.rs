//! Difficulty profiles: which strings and how far up the neck a question may reach.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::QuizError;
use crate::pitch::{MAX_FRET, STRING_COUNT};

pub const OPEN_STRINGS: &str = "openStrings";
pub const FIRST_POSITION: &str = "firstPosition";
pub const INTERMEDIATE: &str = "intermediate";
pub const ADVANCED: &str = "advanced";

const ALL_STRINGS: [u8; 6] = [1, 2, 3, 4, 5, 6];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyProfile {
  id: String,
  label: String,
  max_fret: u8,
  strings: Vec<u8>,
}

impl DifficultyProfile {
  /// Build a profile, checking strings are unique and within 1..=6 and the
  /// fret limit fits the neck.
  pub fn new(
    id: impl Into<String>,
    label: impl Into<String>,
    max_fret: u8,
    strings: Vec<u8>,
  ) -> Result<Self, QuizError> {
    let id = id.into();
    let invalid = |reason: String| QuizError::InvalidProfile { id: id.clone(), reason };

    if strings.is_empty() {
      return Err(invalid("no strings listed".into()));
    }
    if let Some(bad) = strings.iter().find(|s| !(1..=STRING_COUNT).contains(*s)) {
      return Err(invalid(format!("string {} is outside 1..={}", bad, STRING_COUNT)));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = strings.iter().find(|s| !seen.insert(**s)) {
      return Err(invalid(format!("string {} listed twice", dup)));
    }
    if max_fret > MAX_FRET {
      return Err(invalid(format!("max fret {} exceeds {}", max_fret, MAX_FRET)));
    }

    Ok(Self { id, label: label.into(), max_fret, strings })
  }

  fn canonical(id: &str, label: &str, max_fret: u8) -> Self {
    Self { id: id.into(), label: label.into(), max_fret, strings: ALL_STRINGS.to_vec() }
  }

  pub fn id(&self) -> &str { &self.id }
  pub fn label(&self) -> &str { &self.label }
  pub fn max_fret(&self) -> u8 { self.max_fret }

  /// Listed order is the enumeration order.
  pub fn strings(&self) -> &[u8] { &self.strings }

  pub fn open_strings() -> Self { Self::canonical(OPEN_STRINGS, "Open Strings", 0) }
  pub fn first_position() -> Self { Self::canonical(FIRST_POSITION, "First Position", 4) }
  pub fn intermediate() -> Self { Self::canonical(INTERMEDIATE, "Intermediate", 7) }
  pub fn advanced() -> Self { Self::canonical(ADVANCED, "Advanced", 12) }
}

/// The four built-in profiles, easiest first.
pub fn canonical_profiles() -> Vec<DifficultyProfile> {
  vec![
    DifficultyProfile::open_strings(),
    DifficultyProfile::first_position(),
    DifficultyProfile::intermediate(),
    DifficultyProfile::advanced(),
  ]
}

/// Ordered set of selectable profiles.
#[derive(Clone, Debug)]
pub struct ProfileCatalog {
  profiles: Vec<DifficultyProfile>,
}

impl Default for ProfileCatalog {
  fn default() -> Self {
    Self { profiles: canonical_profiles() }
  }
}

impl ProfileCatalog {
  /// Add a profile unless its id is already taken. Returns whether it was added.
  pub fn insert(&mut self, profile: DifficultyProfile) -> bool {
    if self.get(profile.id()).is_some() {
      return false;
    }
    self.profiles.push(profile);
    true
  }

  pub fn get(&self, id: &str) -> Option<&DifficultyProfile> {
    self.profiles.iter().find(|p| p.id == id)
  }

  pub fn resolve(&self, id: &str) -> Result<&DifficultyProfile, QuizError> {
    self.get(id).ok_or_else(|| QuizError::UnknownDifficulty(id.to_string()))
  }

  pub fn all(&self) -> &[DifficultyProfile] {
    &self.profiles
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn canonical_profiles_span_all_strings() {
    let profiles = canonical_profiles();
    let frets: Vec<u8> = profiles.iter().map(|p| p.max_fret()).collect();
    assert_eq!(frets, vec![0, 4, 7, 12]);
    assert!(profiles.iter().all(|p| p.strings() == [1, 2, 3, 4, 5, 6]));
  }

  #[test]
  fn rejects_bad_strings_and_frets() {
    assert!(matches!(
      DifficultyProfile::new("x", "X", 3, vec![]),
      Err(QuizError::InvalidProfile { .. })
    ));
    assert!(DifficultyProfile::new("x", "X", 3, vec![0, 1]).is_err());
    assert!(DifficultyProfile::new("x", "X", 3, vec![1, 7]).is_err());
    assert!(DifficultyProfile::new("x", "X", 3, vec![2, 2]).is_err());
    assert!(DifficultyProfile::new("x", "X", 25, vec![1]).is_err());
    assert!(DifficultyProfile::new("x", "X", 24, vec![6, 1]).is_ok());
  }

  #[test]
  fn catalog_keeps_first_profile_for_an_id() {
    let mut catalog = ProfileCatalog::default();
    let shadow = DifficultyProfile::new(OPEN_STRINGS, "Shadow", 5, vec![1]).unwrap();
    assert!(!catalog.insert(shadow));
    assert_eq!(catalog.resolve(OPEN_STRINGS).unwrap().max_fret(), 0);

    let low = DifficultyProfile::new("lowStrings", "Low Strings", 3, vec![6, 5]).unwrap();
    assert!(catalog.insert(low));
    assert_eq!(catalog.all().len(), 5);
    assert_eq!(
      catalog.resolve("nope"),
      Err(QuizError::UnknownDifficulty("nope".into()))
    );
  }
}
