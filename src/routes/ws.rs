//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.
//! Sessions started over a socket are dropped when that socket closes.

use std::collections::HashSet;
use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::QuizError;
use crate::protocol::{ClientWsMessage, RoundOut, ServerWsMessage};
use crate::logic;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "fretquiz", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "fretquiz", "WebSocket connected");
  let mut owned: HashSet<String> = HashSet::new();

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = reply_to_text(&txt, &state, &mut owned).await;
        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "fretquiz", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }

  let dropped = drop_owned_sessions(&state, &mut owned).await;
  info!(target: "fretquiz", dropped_sessions = dropped, "WebSocket disconnected");
}

/// Parse one text frame and dispatch it.
pub(crate) async fn reply_to_text(
  txt: &str,
  state: &AppState,
  owned: &mut HashSet<String>,
) -> ServerWsMessage {
  match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "fretquiz", "WS received: {:?}", &incoming);
      handle_client_ws(incoming, state, owned).await
    }
    Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
  }
}

/// End every session this socket started. Returns how many were still live.
pub(crate) async fn drop_owned_sessions(state: &AppState, owned: &mut HashSet<String>) -> usize {
  let mut dropped = 0;
  for id in owned.drain() {
    // Already ended or evicted is fine here.
    if state.remove_session(&id).await.is_ok() {
      dropped += 1;
    }
  }
  dropped
}

fn round_reply(result: Result<RoundOut, QuizError>) -> ServerWsMessage {
  match result {
    Ok(round) => ServerWsMessage::Round { round },
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(state, owned))]
pub(crate) async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  owned: &mut HashSet<String>,
) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ListProfiles => ServerWsMessage::Profiles { profiles: logic::list_profiles(state) },

    ClientWsMessage::NewSession { difficulty } => {
      let result = logic::start_session(state, difficulty.as_deref()).await;
      if let Ok(round) = &result {
        owned.insert(round.session_id.clone());
        tracing::info!(target: "question", session = %round.session_id, "WS new_session served");
      }
      round_reply(result)
    }

    ClientWsMessage::SetDifficulty { session_id, difficulty } =>
      round_reply(logic::change_difficulty(state, &session_id, &difficulty).await),

    ClientWsMessage::NextQuestion { session_id } =>
      round_reply(logic::next_question(state, &session_id).await),

    ClientWsMessage::SelectOption { session_id, position } => {
      let result = logic::select_option(state, &session_id, position).await;
      if let Ok(round) = &result {
        let correct = round.options.iter().find(|o| o.selected).and_then(|o| o.correct);
        tracing::info!(target: "question", session = %session_id, ?correct, "WS select_option evaluated");
      }
      round_reply(result)
    }

    ClientWsMessage::EndSession { session_id } => match logic::end_session(state, &session_id).await {
      Ok(()) => {
        owned.remove(&session_id);
        ServerWsMessage::SessionEnded { session_id }
      }
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },
  }
}

#[cfg(test)]
mod tests {
  use serde_json::{json, Value};

  use super::*;

  async fn reply(txt: &str, state: &AppState, owned: &mut HashSet<String>) -> Value {
    serde_json::to_value(reply_to_text(txt, state, owned).await).unwrap()
  }

  #[tokio::test]
  async fn ping_and_profiles() {
    let state = AppState::default();
    let mut owned = HashSet::new();
    assert_eq!(reply(r#"{"type":"ping"}"#, &state, &mut owned).await, json!({ "type": "pong" }));

    let profiles = reply(r#"{"type":"list_profiles"}"#, &state, &mut owned).await;
    assert_eq!(profiles["type"], "profiles");
    assert_eq!(profiles["profiles"][0]["id"], "openStrings");
  }

  #[tokio::test]
  async fn session_flow_tracks_ownership() {
    let state = AppState::default();
    let mut owned = HashSet::new();

    let started = reply(r#"{"type":"new_session","difficulty":"firstPosition"}"#, &state, &mut owned).await;
    assert_eq!(started["type"], "round");
    let id = started["round"]["sessionId"].as_str().unwrap().to_string();
    assert!(owned.contains(&id));
    assert_eq!(state.session_count().await, 1);
    assert_eq!(started["round"]["revealed"], false);

    let pick = &started["round"]["options"][0];
    let select = json!({
      "type": "select_option",
      "sessionId": id,
      "position": { "string": pick["string"], "fret": pick["fret"] },
    });
    let revealed = reply(&select.to_string(), &state, &mut owned).await;
    assert_eq!(revealed["type"], "round");
    assert_eq!(revealed["round"]["revealed"], true);
    assert_eq!(revealed["round"]["options"][0]["selected"], true);
    assert!(revealed["round"]["correctPosition"].is_object());

    let next = reply(&json!({ "type": "next_question", "sessionId": id }).to_string(), &state, &mut owned).await;
    assert_eq!(next["round"]["revealed"], false);

    let ended = reply(&json!({ "type": "end_session", "sessionId": id }).to_string(), &state, &mut owned).await;
    assert_eq!(ended, json!({ "type": "session_ended", "sessionId": id }));
    assert!(owned.is_empty());
    assert_eq!(state.session_count().await, 0);
  }

  #[tokio::test]
  async fn failures_come_back_as_error_messages() {
    let state = AppState::default();
    let mut owned = HashSet::new();

    let bad = reply("{not json", &state, &mut owned).await;
    assert_eq!(bad["type"], "error");
    assert!(bad["message"].as_str().unwrap().starts_with("Invalid JSON"));

    let unknown = reply(r#"{"type":"new_session","difficulty":"virtuoso"}"#, &state, &mut owned).await;
    assert_eq!(unknown, json!({ "type": "error", "message": "unknown difficulty 'virtuoso'" }));
    assert!(owned.is_empty());

    let missing = reply(r#"{"type":"next_question","sessionId":"nope"}"#, &state, &mut owned).await;
    assert_eq!(missing["type"], "error");
  }

  #[tokio::test]
  async fn closing_drops_only_live_owned_sessions() {
    let state = AppState::default();
    let mut owned = HashSet::new();
    for _ in 0..3 {
      reply(r#"{"type":"new_session"}"#, &state, &mut owned).await;
    }
    // Started elsewhere, so it survives this socket.
    let other = state.create_session(None).await.unwrap();
    owned.insert("already-gone".to_string());

    assert_eq!(drop_owned_sessions(&state, &mut owned).await, 3);
    assert!(owned.is_empty());
    assert_eq!(state.session_count().await, 1);
    assert!(state.get_round(&other.session_id).await.is_ok());
  }
}
