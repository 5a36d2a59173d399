//! Endpoint handlers.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use super::server::AppState;
use crate::battle::BattleState;
use crate::build_info;
use crate::error::{GameError, GameResult};
use crate::player::WorkoutReport;
use crate::service::GameService;
use crate::storage::StoreError;

type SharedState = Arc<AppState>;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .route("/log-water", post(log_water))
        .route("/today-water", get(today_water))
        .route("/log-workout", post(log_workout))
        .route("/quests", get(quests))
        .route("/quests/progress", get(quest_progress))
        .route("/quests/complete", post(complete_quest))
        .route("/quests/reset", post(reset_quests))
        .route("/battle/start", post(start_battle))
        .route("/battle/attack", post(attack))
        .route("/battle/flee", post(flee))
        .route("/shop/buy-health", post(buy_health))
        .route("/recent-activities", get(recent_activities))
        .route("/level-progress", get(level_progress))
}

// ============================================================================
// Envelope & errors
// ============================================================================

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    message: String,
    #[serde(flatten)]
    data: T,
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

fn reply<T: Serialize>(message: impl Into<String>, data: T) -> ApiResult<T> {
    Ok(Json(Envelope {
        success: true,
        message: message.into(),
        data,
    }))
}

#[derive(Debug)]
pub enum ApiError {
    Game(GameError),
    Internal(String),
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        ApiError::Game(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Game(err) => match err {
                GameError::NotFound(_) => StatusCode::NOT_FOUND,
                GameError::PreconditionFailed(_)
                | GameError::InsufficientFunds { .. }
                | GameError::Validation(_) => StatusCode::BAD_REQUEST,
                GameError::Unauthorized => StatusCode::UNAUTHORIZED,
                GameError::Storage(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
                GameError::Storage(StoreError::AlreadyExists(_))
                | GameError::Storage(StoreError::Conflict { .. }) => StatusCode::CONFLICT,
                GameError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Game(GameError::Storage(StoreError::AlreadyExists(_))) => {
                "Username already taken".to_string()
            }
            ApiError::Game(GameError::Storage(StoreError::Conflict { .. })) => {
                "Player was modified concurrently, please retry".to_string()
            }
            ApiError::Game(GameError::Storage(_)) | ApiError::Internal(_) => {
                "Internal server error".to_string()
            }
            ApiError::Game(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                ApiError::Game(err) => error!(error = %err, "request_failed"),
                ApiError::Internal(msg) => error!(error = %msg, "request_failed"),
            }
        } else if status == StatusCode::CONFLICT {
            warn!(reason = %self.message(), "request_conflict");
        }

        let body = json!({ "success": false, "message": self.message() });
        (status, Json(body)).into_response()
    }
}

/// Maps a malformed JSON body to a 400 validation error.
fn parse<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| GameError::validation(rejection.body_text()).into())
}

/// Runs a service call on the blocking pool; storage may touch the disk.
async fn blocking<T, F>(state: &SharedState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&GameService) -> GameResult<T> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

// ============================================================================
// Authentication
// ============================================================================

/// The player a valid bearer token was issued for.
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Game(GameError::Unauthorized))?;

        let username = state.service.authenticate(token.trim())?;
        Ok(AuthUser(username))
    }
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Deserialize)]
pub struct CredentialsBody {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct CupsBody {
    cups: u32,
}

#[derive(Deserialize)]
pub struct AmountBody {
    amount: u32,
}

#[derive(Deserialize)]
pub struct TitleBody {
    title: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "ok",
        "version": build_info::version_line(),
    }))
}

async fn register(
    State(state): State<SharedState>,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> ApiResult<impl Serialize> {
    let body = parse(body)?;
    let session = blocking(&state, move |svc| svc.register(&body.username, &body.password)).await?;
    reply("Registration successful", session)
}

async fn login(
    State(state): State<SharedState>,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> ApiResult<impl Serialize> {
    let body = parse(body)?;
    let session = blocking(&state, move |svc| svc.login(&body.username, &body.password)).await?;
    reply("Login successful", session)
}

async fn profile(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl Serialize> {
    let profile = blocking(&state, move |svc| svc.profile(&user)).await?;
    reply("Profile loaded", json!({ "user": profile }))
}

async fn log_water(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    body: Result<Json<CupsBody>, JsonRejection>,
) -> ApiResult<impl Serialize> {
    let CupsBody { cups } = parse(body)?;
    let water = blocking(&state, move |svc| svc.log_water(&user, cups)).await?;
    reply(format!("Logged {} cups of water", cups), water)
}

async fn today_water(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl Serialize> {
    let water = blocking(&state, move |svc| svc.today_water(&user)).await?;
    reply("Today's water intake", water)
}

async fn log_workout(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    body: Result<Json<WorkoutReport>, JsonRejection>,
) -> ApiResult<impl Serialize> {
    let report = parse(body)?;
    let logged = blocking(&state, move |svc| svc.log_workout(&user, &report)).await?;
    let message = if logged.level.leveled_up {
        format!("Level up! You reached level {}", logged.level.new_level)
    } else {
        format!("Workout logged! +{} XP", logged.xp_gained)
    };
    reply(message, logged)
}

async fn quests(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl Serialize> {
    let quests = blocking(&state, move |svc| svc.quests(&user)).await?;
    reply("Quests loaded", json!({ "quests": quests }))
}

async fn quest_progress(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl Serialize> {
    let quests = blocking(&state, move |svc| svc.quest_progress(&user)).await?;
    reply("Quest progress", json!({ "quests": quests }))
}

async fn complete_quest(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    body: Result<Json<TitleBody>, JsonRejection>,
) -> ApiResult<impl Serialize> {
    let TitleBody { title } = parse(body)?;
    let claim = blocking(&state, move |svc| svc.complete_quest(&user, &title)).await?;
    reply(format!("Quest '{}' completed!", claim.title), claim)
}

async fn reset_quests(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl Serialize> {
    let quests = blocking(&state, move |svc| svc.reset_quests(&user)).await?;
    reply("Quests reset", json!({ "quests": quests }))
}

async fn start_battle(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl Serialize> {
    let battle = blocking(&state, move |svc| svc.start_battle(&user)).await?;
    reply(
        format!("A wild {} appears!", battle.enemy_name),
        json!({ "battle": battle }),
    )
}

async fn attack(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    body: Result<Json<WorkoutReport>, JsonRejection>,
) -> ApiResult<impl Serialize> {
    let report = parse(body)?;
    let outcome = blocking(&state, move |svc| svc.attack(&user, &report)).await?;
    let message = match outcome.result {
        BattleState::Victorious => format!("Victory! You defeated {}", outcome.battle.enemy_name),
        BattleState::Defeated => format!("You were defeated by {}", outcome.battle.enemy_name),
        _ => format!(
            "You dealt {} damage and took {}",
            outcome.damage_dealt, outcome.damage_taken
        ),
    };
    reply(message, outcome)
}

async fn flee(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl Serialize> {
    let outcome = blocking(&state, move |svc| svc.flee(&user)).await?;
    reply(
        format!("You fled and lost {} health", outcome.health_lost),
        outcome,
    )
}

async fn buy_health(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    body: Result<Json<AmountBody>, JsonRejection>,
) -> ApiResult<impl Serialize> {
    let AmountBody { amount } = parse(body)?;
    let receipt = blocking(&state, move |svc| svc.buy_health(&user, amount)).await?;
    reply(
        format!("Bought {} health for {} gold", amount, receipt.cost),
        receipt,
    )
}

async fn recent_activities(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl Serialize> {
    let activities = blocking(&state, move |svc| svc.recent_activities(&user)).await?;
    reply("Recent activities", json!({ "activities": activities }))
}

async fn level_progress(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl Serialize> {
    let progress = blocking(&state, move |svc| svc.level_progress(&user)).await?;
    reply("Level progress", progress)
}
