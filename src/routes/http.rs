//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs include parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, FromRequest, Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, error};

use crate::error::QuizError;
use crate::pitch::FretboardPosition;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic;

/// Error rendered as a JSON `{ "message": ... }` body with a matching status code.
pub enum ApiError {
  Quiz(QuizError),
  /// Body that could not be read as the expected JSON.
  BadRequest(String),
}

impl From<QuizError> for ApiError {
  fn from(e: QuizError) -> Self { ApiError::Quiz(e) }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

/// `Json` whose rejection goes through `ApiError`, so malformed bodies get a
/// 400 with the usual error shape.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let e = match self {
      ApiError::Quiz(e) => e,
      ApiError::BadRequest(message) => {
        info!(target: "fretquiz", %message, "Rejected request body");
        return (StatusCode::BAD_REQUEST, Json(ErrorOut { message })).into_response();
      }
    };
    let status = match &e {
      QuizError::UnknownSession(_) | QuizError::UnknownDifficulty(_) => StatusCode::NOT_FOUND,
      QuizError::InvalidString(_)
      | QuizError::InvalidFret(_)
      | QuizError::NotAnOption { .. }
      | QuizError::InvalidProfile { .. } => StatusCode::BAD_REQUEST,
      QuizError::UnlabeledPitch(_) | QuizError::EmptyProfile(_) => {
        error!(target: "fretquiz", error = %e, "Internal quiz error");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(ErrorOut { message: e.to_string() })).into_response()
  }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_profiles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(ProfilesOut { profiles: logic::list_profiles(&state) })
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_session(
  State(state): State<Arc<AppState>>,
  body: Result<Json<NewSessionIn>, JsonRejection>,
) -> ApiResult<RoundOut> {
  // The body is optional; only a body that is present and malformed is an error.
  let body = match body {
    Ok(Json(b)) => b,
    Err(JsonRejection::MissingJsonContentType(_)) => NewSessionIn::default(),
    Err(rejection) => return Err(rejection.into()),
  };
  let round = logic::start_session(&state, body.difficulty.as_deref()).await?;
  info!(target: "question", session = %round.session_id, difficulty = %round.difficulty, "HTTP session created");
  Ok(Json(round))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> ApiResult<RoundOut> {
  Ok(Json(logic::current_round(&state, &id).await?))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  logic::end_session(&state, &id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state, body), fields(%id, difficulty = %body.difficulty))]
pub async fn http_post_difficulty(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  ApiJson(body): ApiJson<DifficultyIn>,
) -> ApiResult<RoundOut> {
  Ok(Json(logic::change_difficulty(&state, &id, &body.difficulty).await?))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_post_next(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> ApiResult<RoundOut> {
  Ok(Json(logic::next_question(&state, &id).await?))
}

#[instrument(level = "info", skip(state), fields(%id, %position))]
pub async fn http_post_select(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  ApiJson(position): ApiJson<FretboardPosition>,
) -> ApiResult<RoundOut> {
  let round = logic::select_option(&state, &id, position).await?;
  let correct = round.options.iter().find(|o| o.selected).and_then(|o| o.correct);
  info!(target: "question", session = %id, ?correct, "HTTP select_option evaluated");
  Ok(Json(round))
}
