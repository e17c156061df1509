//! Application state: the profile catalog, the in-memory session store and RNG seeding.
//!
//! Sessions live behind a single `RwLock`. Every transition takes the write
//! lock, so a session only ever changes through one serialized step at a time.
//! Each access stamps the session; idle ones are evicted whenever a session is
//! created or updated, and the store never grows past `max_sessions`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_quiz_config_from_env, QuizConfig};
use crate::error::QuizError;
use crate::profile::{ProfileCatalog, OPEN_STRINGS};
use crate::protocol::{to_out, RoundOut};
use crate::session::QuizSession;

struct StoredSession {
    session: QuizSession,
    touched: Instant,
}

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashMap<String, StoredSession>>>,
    pub profiles: Arc<ProfileCatalog>,
    pub default_difficulty: String,
    seed: Option<u64>,
    session_idle: Duration,
    max_sessions: usize,
    sessions_started: Arc<AtomicU64>,
}

impl AppState {
    /// Build state from env: load config and build the profile catalog.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_quiz_config_from_env().unwrap_or_default();
        Self::with_config(cfg)
    }

    #[instrument(level = "info", skip_all)]
    pub fn with_config(cfg: QuizConfig) -> Self {
        let mut catalog = ProfileCatalog::default();

        // Config profiles extend the built-ins but never replace them.
        for pc in &cfg.profiles {
            match pc.to_profile() {
                Ok(profile) => {
                    let id = profile.id().to_string();
                    if !catalog.insert(profile) {
                        error!(target: "fretquiz", %id, "Skipping config profile: id already in use.");
                    }
                }
                Err(e) => {
                    error!(target: "fretquiz", id = %pc.id, error = %e, "Skipping config profile.");
                }
            }
        }

        for p in catalog.all() {
            info!(target: "fretquiz", id = %p.id(), max_fret = p.max_fret(), strings = ?p.strings(), "Difficulty available");
        }

        let default_difficulty = if catalog.get(&cfg.default_difficulty).is_some() {
            cfg.default_difficulty
        } else {
            warn!(target: "fretquiz", requested = %cfg.default_difficulty, "Unknown default difficulty; using openStrings");
            OPEN_STRINGS.to_string()
        };

        match cfg.seed {
            Some(seed) => info!(target: "fretquiz", seed, "Deterministic question sequence enabled."),
            None => info!(target: "fretquiz", "Questions seeded from OS entropy."),
        }

        let session_idle = Duration::from_secs(cfg.session_idle_secs);
        let max_sessions = cfg.max_sessions.max(1);
        info!(target: "fretquiz", idle_secs = cfg.session_idle_secs, max_sessions, "Session limits");

        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            profiles: Arc::new(catalog),
            default_difficulty,
            seed: cfg.seed,
            session_idle,
            max_sessions,
            sessions_started: Arc::new(AtomicU64::new(0)),
        }
    }

    /// RNG for the next session: `seed + n` for the n-th session when seeded.
    fn next_rng(&self) -> StdRng {
        let n = self.sessions_started.fetch_add(1, Ordering::Relaxed);
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(n)),
            None => StdRng::from_entropy(),
        }
    }

    /// Drop idle sessions, then the least recently used ones until there is
    /// room for one more.
    fn evict(&self, sessions: &mut HashMap<String, StoredSession>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.touched) < self.session_idle);
        let idle = before - sessions.len();

        let mut overflow = 0;
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.touched)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    overflow += 1;
                }
                None => break,
            }
        }

        if idle + overflow > 0 {
            info!(target: "fretquiz", idle, overflow, remaining = sessions.len(), "Evicted sessions");
        }
    }

    /// Create a session on `difficulty` (or the default) and store it.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_session(&self, difficulty: Option<&str>) -> Result<RoundOut, QuizError> {
        let difficulty = difficulty.unwrap_or(self.default_difficulty.as_str());
        let profile = self.profiles.resolve(difficulty)?.clone();
        let id = Uuid::new_v4().to_string();
        let session = QuizSession::new(id.clone(), profile, self.next_rng())?;
        let out = to_out(&session);

        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, now);
        sessions.insert(id, StoredSession { session, touched: now });
        Ok(out)
    }

    /// Run one transition on a session under the write lock and return the resulting round.
    pub async fn update_session<F>(&self, id: &str, f: F) -> Result<RoundOut, QuizError>
    where
        F: FnOnce(&mut QuizSession) -> Result<(), QuizError>,
    {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.evict(&mut sessions, now);
        let stored = sessions
            .get_mut(id)
            .ok_or_else(|| QuizError::UnknownSession(id.to_string()))?;
        stored.touched = now;
        f(&mut stored.session)?;
        Ok(to_out(&stored.session))
    }

    /// View of a session's current round. Reading counts as activity.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_round(&self, id: &str) -> Result<RoundOut, QuizError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(id)
            .filter(|s| now.duration_since(s.touched) < self.session_idle)
            .ok_or_else(|| QuizError::UnknownSession(id.to_string()))?;
        stored.touched = now;
        Ok(to_out(&stored.session))
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn remove_session(&self, id: &str) -> Result<(), QuizError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| QuizError::UnknownSession(id.to_string()))
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(QuizConfig::default())
    }
}
