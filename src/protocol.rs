//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::evaluator::positions_equal;
use crate::pitch::{AbsolutePitch, FretboardPosition};
use crate::profile::DifficultyProfile;
use crate::session::QuizSession;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ListProfiles,
    NewSession {
        #[serde(default)]
        difficulty: Option<String>,
    },
    SetDifficulty {
        #[serde(rename = "sessionId")]
        session_id: String,
        difficulty: String,
    },
    NextQuestion {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    SelectOption {
        #[serde(rename = "sessionId")]
        session_id: String,
        position: FretboardPosition,
    },
    EndSession {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Profiles {
        profiles: Vec<ProfileOut>,
    },
    Round {
        round: RoundOut,
    },
    SessionEnded {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOut {
    pub id: String,
    pub label: String,
    pub max_fret: u8,
    pub strings: Vec<u8>,
}

pub fn profile_out(p: &DifficultyProfile) -> ProfileOut {
    ProfileOut {
        id: p.id().to_string(),
        label: p.label().to_string(),
        max_fret: p.max_fret(),
        strings: p.strings().to_vec(),
    }
}

/// One answer choice as the tab renderer sees it.
#[derive(Debug, Clone, Serialize)]
pub struct OptionOut {
    pub string: u8,
    pub fret: u8,
    pub selected: bool,
    /// `None` until the round is revealed.
    pub correct: Option<bool>,
}

/// DTO used by both WS and HTTP for round delivery. The answer fields stay
/// empty until the round is revealed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundOut {
    pub session_id: String,
    pub difficulty: String,
    pub difficulty_label: String,
    pub target_pitch: AbsolutePitch,
    pub target_label: String,
    pub options: Vec<OptionOut>,
    pub revealed: bool,
    pub correct_position: Option<FretboardPosition>,
    pub equivalent_positions: Vec<FretboardPosition>,
}

/// Convert the session's current round to the public DTO.
pub fn to_out(s: &QuizSession) -> RoundOut {
    let q = s.question();
    let selected = s.selected();
    let revealed = s.is_revealed();

    let options = q
        .options
        .iter()
        .map(|o| OptionOut {
            string: o.string(),
            fret: o.fret(),
            selected: selected.is_some_and(|sel| positions_equal(sel, *o)),
            correct: s.is_option_correct(*o),
        })
        .collect();

    RoundOut {
        session_id: s.id().to_string(),
        difficulty: s.profile().id().to_string(),
        difficulty_label: s.profile().label().to_string(),
        target_pitch: q.target_pitch,
        target_label: q.target_label.clone(),
        options,
        revealed,
        correct_position: revealed.then_some(q.correct_position),
        equivalent_positions: if revealed { q.equivalent_positions.clone() } else { Vec::new() },
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Default, Deserialize)]
pub struct NewSessionIn {
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyIn {
    pub difficulty: String,
}

#[derive(Debug, Serialize)]
pub struct ProfilesOut {
    pub profiles: Vec<ProfileOut>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
