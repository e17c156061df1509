//! Enumerating the legal positions of a profile and grouping them by pitch.

use std::collections::BTreeMap;

use crate::pitch::{pitch_of, AbsolutePitch, FretboardPosition};
use crate::profile::DifficultyProfile;

/// Every position of the profile: strings in listed order, frets ascending.
pub fn all_positions(profile: &DifficultyProfile) -> Vec<FretboardPosition> {
  let max_fret = profile.max_fret();
  profile
    .strings()
    .iter()
    .flat_map(|&string| (0..=max_fret).map(move |fret| FretboardPosition::from_checked(string, fret)))
    .collect()
}

/// Positions in the profile that sound the same pitch as `position`, in
/// `all_positions` order. `position` itself is always included: when it lies
/// outside the profile it is prepended, ahead of the in-profile fingerings.
pub fn equivalent_positions(
  position: FretboardPosition,
  profile: &DifficultyProfile,
) -> Vec<FretboardPosition> {
  let target = pitch_of(position);
  let mut out: Vec<FretboardPosition> = all_positions(profile)
    .into_iter()
    .filter(|p| pitch_of(*p) == target)
    .collect();
  // A position outside the profile still counts as its own fingering.
  if !out.contains(&position) {
    out.insert(0, position);
  }
  out
}

/// Positions grouped by pitch, lowest pitch first.
pub fn pitch_groups(profile: &DifficultyProfile) -> BTreeMap<AbsolutePitch, Vec<FretboardPosition>> {
  group_by_pitch(all_positions(profile))
}

pub(crate) fn group_by_pitch(
  positions: impl IntoIterator<Item = FretboardPosition>,
) -> BTreeMap<AbsolutePitch, Vec<FretboardPosition>> {
  let mut groups: BTreeMap<AbsolutePitch, Vec<FretboardPosition>> = BTreeMap::new();
  for p in positions {
    groups.entry(pitch_of(p)).or_default().push(p);
  }
  groups
}
