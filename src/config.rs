//! Loading quiz configuration (default difficulty, RNG seed, session limits, extra profiles) from TOML.
//!
//! Example:
//! ```toml
//! default_difficulty = "firstPosition"
//! seed = 1234
//! session_idle_secs = 900
//! max_sessions = 5000
//!
//! [[profiles]]
//! id = "lowStrings"
//! label = "Low Strings"
//! max_fret = 5
//! strings = [6, 5, 4]
//! ```

use serde::Deserialize;
use tracing::{error, info};

use crate::error::QuizError;
use crate::profile::{DifficultyProfile, OPEN_STRINGS};

#[derive(Clone, Debug, Deserialize)]
pub struct QuizConfig {
  #[serde(default = "default_difficulty")]
  pub default_difficulty: String,
  /// Makes every session's question sequence reproducible when set.
  #[serde(default)]
  pub seed: Option<u64>,
  /// Sessions untouched for this long are dropped.
  #[serde(default = "default_session_idle_secs")]
  pub session_idle_secs: u64,
  /// Upper bound on stored sessions; the least recently used go first.
  #[serde(default = "default_max_sessions")]
  pub max_sessions: usize,
  #[serde(default)]
  pub profiles: Vec<ProfileCfg>,
}

fn default_session_idle_secs() -> u64 { 30 * 60 }
fn default_max_sessions() -> usize { 10_000 }

fn default_difficulty() -> String {
  OPEN_STRINGS.to_string()
}

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      default_difficulty: default_difficulty(),
      seed: None,
      session_idle_secs: default_session_idle_secs(),
      max_sessions: default_max_sessions(),
      profiles: Vec::new(),
    }
  }
}

/// Profile entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ProfileCfg {
  pub id: String,
  #[serde(default)] pub label: Option<String>,
  pub max_fret: u8,
  pub strings: Vec<u8>,
}

impl ProfileCfg {
  /// Validate into a profile. The label defaults to the id.
  pub fn to_profile(&self) -> Result<DifficultyProfile, QuizError> {
    let label = self.label.clone().unwrap_or_else(|| self.id.clone());
    DifficultyProfile::new(self.id.clone(), label, self.max_fret, self.strings.clone())
  }
}

/// Parse configuration text.
pub fn parse_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "fretquiz", %path, profiles = cfg.profiles.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "fretquiz", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "fretquiz", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
