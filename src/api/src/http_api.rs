use axum::{
    extract::{Path, Query, State},
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::game::{Cell, Difficulty, Feedback, MatchResult, PuzzleEngine, PuzzleError, Session};
use crate::session_store::{SessionStore, StoredSession};

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiPuzzle {
    pub id: Uuid,
    pub difficulty: Difficulty,
    pub size: usize,
    pub rows: Vec<String>,
    pub words: Vec<ApiWord>,
    pub found_count: usize,
    pub total_words: usize,
    pub complete: bool,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiWord {
    pub word: String,
    pub found: bool,
    pub placed: bool,
    /// Cells the word was found on; empty until it is found.
    pub cells: Vec<ApiCell>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct ApiCell {
    pub row: usize,
    pub col: usize,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CreatePuzzleRequest {
    pub difficulty: Option<Difficulty>,
    pub seed: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct DailyPuzzleQuery {
    pub difficulty: Option<Difficulty>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct RestartRequest {
    pub difficulty: Option<Difficulty>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SelectionRequest {
    pub start: ApiCell,
    pub end: ApiCell,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SelectionResponse {
    /// `None` when the drag was not a straight line and nothing was checked.
    pub result: Option<MatchResult>,
    pub word: Option<String>,
    pub path: Vec<ApiCell>,
    pub message: String,
    pub complete: bool,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("puzzle not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("puzzle is already complete")]
    Complete,
    #[error("internal error")]
    Internal,
}

impl From<PuzzleError> for ApiError {
    fn from(e: PuzzleError) -> Self {
        match e {
            PuzzleError::CellOutOfBounds { .. }
            | PuzzleError::MalformedSelection
            | PuzzleError::UnknownDifficulty(_)
            | PuzzleError::InvalidWord(_) => ApiError::BadRequest(e.to_string()),
            PuzzleError::EmptyWordBank
            | PuzzleError::UnplaceableWord(_)
            | PuzzleError::MalformedGrid => {
                error!("Puzzle engine failure: {}", e);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Complete => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ApiCell> for Cell {
    fn from(cell: ApiCell) -> Self {
        Cell::new(cell.row, cell.col)
    }
}

impl From<Cell> for ApiCell {
    fn from(cell: Cell) -> Self {
        ApiCell {
            row: cell.row,
            col: cell.col,
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub engine: PuzzleEngine,
    pub store: SessionStore,
}

impl ApiState {
    pub fn new(engine: PuzzleEngine, store: SessionStore) -> Self {
        Self { engine, store }
    }
}

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/puzzles", post(create_puzzle))
        .route("/api/daily-puzzle", get(daily_puzzle))
        .route("/api/puzzles/:id", get(get_puzzle).delete(delete_puzzle))
        .route("/api/puzzles/:id/selection", post(submit_selection))
        .route("/api/puzzles/:id/restart", post(restart_puzzle))
        .with_state(state)
}

/// The API router wrapped in the CORS, timeout, body limit and tracing layers.
pub fn create_app(state: ApiState, config: &ServerConfig) -> Router {
    let allowed_origins = config.allowed_origins.clone();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| is_origin_allowed(origin, &allowed_origins))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(300));

    create_router(state)
        .layer(RequestBodyLimitLayer::new(config.max_request_size))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub fn is_origin_allowed(origin: &str, allowed_origins: &[String]) -> bool {
    allowed_origins.iter().any(|allowed| {
        if allowed == "*" {
            return true;
        }

        if origin == allowed {
            return true;
        }

        // ".example.org" admits any subdomain of example.org
        if let Some(domain) = allowed.strip_prefix('.') {
            return origin.ends_with(&format!(".{}", domain));
        }

        false
    })
}

pub fn daily_seed(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn puzzle_view(id: Uuid, stored: &StoredSession) -> ApiPuzzle {
    let session = &stored.session;
    let words = session
        .words()
        .iter()
        .map(|word| ApiWord {
            word: word.display.clone(),
            found: session.is_found(word),
            placed: session.puzzle().is_placed(word),
            cells: session
                .found_cells(word)
                .unwrap_or_default()
                .iter()
                .copied()
                .map(ApiCell::from)
                .collect(),
        })
        .collect();
    let message = if session.is_complete() {
        Feedback::Complete
    } else {
        Feedback::Prompt
    };

    ApiPuzzle {
        id,
        difficulty: session.difficulty(),
        size: session.grid().size(),
        rows: session.grid().row_strings(),
        words,
        found_count: session.found().len(),
        total_words: session.words().len(),
        complete: session.is_complete(),
        message: message.to_string(),
        created_at: stored.created_at,
    }
}

async fn store_session(state: &ApiState, session: Session) -> ApiPuzzle {
    let (id, entry) = state.store.insert(session).await;
    let stored = entry.lock().await;
    info!(
        "Started puzzle {} ({}, {} words)",
        id,
        stored.session.difficulty(),
        stored.session.words().len()
    );
    puzzle_view(id, &stored)
}

// Route handlers
async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.store.len().await,
        "words": state.engine.word_bank().len(),
    }))
}

async fn create_puzzle(
    State(state): State<ApiState>,
    Json(request): Json<CreatePuzzleRequest>,
) -> Result<(StatusCode, Json<ApiPuzzle>), ApiError> {
    let difficulty = request
        .difficulty
        .unwrap_or(state.engine.config().default_difficulty);
    let session = state.engine.new_session(difficulty, request.seed.as_deref())?;
    let view = store_session(&state, session).await;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn daily_puzzle(
    State(state): State<ApiState>,
    Query(query): Query<DailyPuzzleQuery>,
) -> Result<Json<ApiPuzzle>, ApiError> {
    let difficulty = query
        .difficulty
        .unwrap_or(state.engine.config().default_difficulty);
    let seed = daily_seed(Utc::now().date_naive());
    let session = state.engine.new_session(difficulty, Some(&seed))?;
    Ok(Json(store_session(&state, session).await))
}

async fn get_puzzle(
    Path(id): Path<Uuid>,
    State(state): State<ApiState>,
) -> Result<Json<ApiPuzzle>, ApiError> {
    let entry = state.store.get(&id).await.ok_or(ApiError::NotFound)?;
    let stored = entry.lock().await;
    Ok(Json(puzzle_view(id, &stored)))
}

async fn delete_puzzle(
    Path(id): Path<Uuid>,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    state.store.remove(&id).await.ok_or(ApiError::NotFound)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn submit_selection(
    Path(id): Path<Uuid>,
    State(state): State<ApiState>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let entry = state.store.get(&id).await.ok_or(ApiError::NotFound)?;
    let mut stored = entry.lock().await;
    let session = &mut stored.session;

    if session.is_complete() {
        return Err(ApiError::Complete);
    }

    let response = match session.select(request.start.into(), request.end.into())? {
        Some(outcome) => SelectionResponse {
            result: Some(outcome.result),
            word: outcome.word.clone(),
            path: outcome.cells.iter().copied().map(ApiCell::from).collect(),
            message: outcome.feedback().to_string(),
            complete: outcome.complete,
        },
        None => SelectionResponse {
            result: None,
            word: None,
            path: Vec::new(),
            message: String::new(),
            complete: session.is_complete(),
        },
    };

    if response.result == Some(MatchResult::Found) {
        info!(
            "Puzzle {}: found {:?} ({}/{})",
            id,
            response.word,
            session.found().len(),
            session.words().len()
        );
    }

    Ok(Json(response))
}

async fn restart_puzzle(
    Path(id): Path<Uuid>,
    State(state): State<ApiState>,
    Json(request): Json<RestartRequest>,
) -> Result<Json<ApiPuzzle>, ApiError> {
    let entry = state.store.get(&id).await.ok_or(ApiError::NotFound)?;
    let mut stored = entry.lock().await;

    let difficulty = request.difficulty.unwrap_or(stored.session.difficulty());
    stored.session = state.engine.new_session(difficulty, None)?;
    stored.created_at = Utc::now();
    info!("Restarted puzzle {} at {} difficulty", id, difficulty);

    Ok(Json(puzzle_view(id, &stored)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resolve_line;
    use crate::test_utils::test_utils;
    use axum::http::Method;
    use tower::ServiceExt;

    async fn create(app: &Router, body: &str) -> ApiPuzzle {
        let response = app
            .clone()
            .oneshot(test_utils::create_test_request(Method::POST, "/api/puzzles", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        test_utils::read_json(response).await
    }

    async fn select(app: &Router, id: Uuid, start: Cell, end: Cell) -> Response {
        let body = serde_json::json!({
            "start": { "row": start.row, "col": start.col },
            "end": { "row": end.row, "col": end.col },
        })
        .to_string();
        app.clone()
            .oneshot(test_utils::create_test_request(
                Method::POST,
                &format!("/api/puzzles/{}/selection", id),
                Some(&body),
            ))
            .await
            .unwrap()
    }

    async fn placement_ends(state: &ApiState, id: Uuid) -> Vec<(Cell, Cell)> {
        let entry = state.store.get(&id).await.unwrap();
        let stored = entry.lock().await;
        stored
            .session
            .puzzle()
            .placements
            .iter()
            .map(|p| (p.cells[0], *p.cells.last().unwrap()))
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = test_utils::create_test_app();
        let response = app
            .oneshot(test_utils::create_test_request(Method::GET, "/api/health", None))
            .await
            .unwrap();
        test_utils::assert_json_response(&response, StatusCode::OK);
        let body: serde_json::Value = test_utils::read_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["words"], test_utils::TEST_BANK_WORDS.len());
        assert_eq!(body["sessions"], 0);
    }

    #[tokio::test]
    async fn test_create_and_get_puzzle() {
        let (_, app) = test_utils::create_test_app();
        let created = create(&app, r#"{"difficulty": "easy"}"#).await;

        assert_eq!(created.difficulty, Difficulty::Easy);
        assert_eq!(created.size, 10);
        assert_eq!(created.rows.len(), 10);
        assert_eq!(created.total_words, 5);
        assert_eq!(created.found_count, 0);
        assert!(!created.complete);
        assert_eq!(created.message, Feedback::Prompt.to_string());

        let response = app
            .oneshot(test_utils::create_test_request(
                Method::GET,
                &format!("/api/puzzles/{}", created.id),
                None,
            ))
            .await
            .unwrap();
        test_utils::assert_json_response(&response, StatusCode::OK);
        let fetched: ApiPuzzle = test_utils::read_json(response).await;
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.rows, created.rows);
    }

    #[tokio::test]
    async fn test_create_uses_default_difficulty() {
        let (_, app) = test_utils::create_test_app();
        let created = create(&app, "{}").await;
        assert_eq!(created.difficulty, Difficulty::Medium);
        assert_eq!(created.size, 15);
    }

    #[tokio::test]
    async fn test_seeded_puzzles_match() {
        let (_, app) = test_utils::create_test_app();
        let first = create(&app, r#"{"difficulty": "hard", "seed": "2025-06-30"}"#).await;
        let second = create(&app, r#"{"difficulty": "hard", "seed": "2025-06-30"}"#).await;
        assert_ne!(first.id, second.id);
        assert_eq!(first.rows, second.rows);
    }

    #[tokio::test]
    async fn test_daily_puzzle_is_shared() {
        let (_, app) = test_utils::create_test_app();
        let mut grids = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(test_utils::create_test_request(
                    Method::GET,
                    "/api/daily-puzzle?difficulty=easy",
                    None,
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let puzzle: ApiPuzzle = test_utils::read_json(response).await;
            assert_eq!(puzzle.difficulty, Difficulty::Easy);
            grids.push(puzzle.rows);
        }
        assert_eq!(grids[0], grids[1]);
    }

    #[tokio::test]
    async fn test_unknown_puzzle() {
        let (_, app) = test_utils::create_test_app();
        let response = app
            .oneshot(test_utils::create_test_request(
                Method::GET,
                &format!("/api/puzzles/{}", Uuid::new_v4()),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test_utils::read_json(response).await;
        assert_eq!(body, test_utils::create_test_error_response("puzzle not found"));
    }

    #[tokio::test]
    async fn test_selection_flow_until_complete() {
        let (state, app) = test_utils::create_test_app();
        let created = create(&app, r#"{"difficulty": "easy", "seed": "flow"}"#).await;
        let placements = placement_ends(&state, created.id).await;
        let total = placements.len();
        assert_eq!(total, created.total_words);

        for (i, (start, end)) in placements.iter().enumerate() {
            let response = select(&app, created.id, *start, *end).await;
            assert_eq!(response.status(), StatusCode::OK);
            let body: SelectionResponse = test_utils::read_json(response).await;
            assert_eq!(body.result, Some(MatchResult::Found));
            assert!(body.word.is_some());
            assert_eq!(body.complete, i + 1 == total);
        }

        // The puzzle no longer accepts selections once every word is found.
        let (start, end) = placements[0];
        let response = select(&app, created.id, start, end).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(test_utils::create_test_request(
                Method::GET,
                &format!("/api/puzzles/{}", created.id),
                None,
            ))
            .await
            .unwrap();
        let fetched: ApiPuzzle = test_utils::read_json(response).await;
        assert!(fetched.complete);
        assert_eq!(fetched.found_count, total);
        assert!(fetched.words.iter().all(|w| w.found && w.placed));
        assert_eq!(fetched.message, Feedback::Complete.to_string());
    }

    #[tokio::test]
    async fn test_repeat_bent_and_out_of_bounds_selections() {
        let (state, app) = test_utils::create_test_app();
        let created = create(&app, r#"{"difficulty": "easy"}"#).await;
        let (start, end) = placement_ends(&state, created.id).await[0];

        let response = select(&app, created.id, start, end).await;
        let body: SelectionResponse = test_utils::read_json(response).await;
        assert_eq!(body.result, Some(MatchResult::Found));

        let response = select(&app, created.id, end, start).await;
        let body: SelectionResponse = test_utils::read_json(response).await;
        assert_eq!(body.result, Some(MatchResult::AlreadyFound));
        assert!(body.message.starts_with("Você já encontrou a palavra"));

        let response = select(&app, created.id, Cell::new(0, 0), Cell::new(2, 1)).await;
        let body: SelectionResponse = test_utils::read_json(response).await;
        assert_eq!(body.result, None);
        assert!(body.path.is_empty());

        let response = select(&app, created.id, Cell::new(0, 0), Cell::new(0, 10)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_found_cells_survive_refetch() {
        let (state, app) = test_utils::create_test_app();
        let created = create(&app, r#"{"difficulty": "easy", "seed": "marks"}"#).await;
        assert!(created.words.iter().all(|w| w.cells.is_empty()));
        let (start, end) = placement_ends(&state, created.id).await[0];

        let response = select(&app, created.id, start, end).await;
        let body: SelectionResponse = test_utils::read_json(response).await;
        assert_eq!(body.result, Some(MatchResult::Found));
        let word = body.word.unwrap();

        let response = app
            .oneshot(test_utils::create_test_request(
                Method::GET,
                &format!("/api/puzzles/{}", created.id),
                None,
            ))
            .await
            .unwrap();
        let fetched: ApiPuzzle = test_utils::read_json(response).await;
        let marked: Vec<&ApiWord> = fetched.words.iter().filter(|w| !w.cells.is_empty()).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].word, word);
        assert!(marked[0].found);
        let cells: Vec<Cell> = marked[0].cells.iter().copied().map(Cell::from).collect();
        assert_eq!(cells, resolve_line(start, end));
    }

    #[tokio::test]
    async fn test_restart_replaces_session() {
        let (state, app) = test_utils::create_test_app();
        let created = create(&app, r#"{"difficulty": "easy"}"#).await;
        let (start, end) = placement_ends(&state, created.id).await[0];
        select(&app, created.id, start, end).await;

        let response = app
            .clone()
            .oneshot(test_utils::create_test_request(
                Method::POST,
                &format!("/api/puzzles/{}/restart", created.id),
                Some(r#"{"difficulty": "hard"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let restarted: ApiPuzzle = test_utils::read_json(response).await;
        assert_eq!(restarted.id, created.id);
        assert_eq!(restarted.difficulty, Difficulty::Hard);
        assert_eq!(restarted.size, 20);
        assert_eq!(restarted.found_count, 0);
    }

    #[tokio::test]
    async fn test_delete_puzzle() {
        let (_, app) = test_utils::create_test_app();
        let created = create(&app, "{}").await;
        let uri = format!("/api/puzzles/{}", created.id);

        let response = app
            .clone()
            .oneshot(test_utils::create_test_request(Method::DELETE, &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(test_utils::create_test_request(Method::DELETE, &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_layer_admits_configured_origin() {
        let (state, _) = test_utils::create_test_app();
        let mut config = ServerConfig::default();
        config.allowed_origins = vec!["https://paroquia.org".to_string()];
        let app = create_app(state, &config);

        let request = axum::http::Request::builder()
            .method(Method::GET)
            .uri("/api/health")
            .header("origin", "https://paroquia.org")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://paroquia.org"
        );

        let request = axum::http::Request::builder()
            .method(Method::GET)
            .uri("/api/health")
            .header("origin", "https://elsewhere.com")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[test]
    fn test_is_origin_allowed() {
        let allowed = vec![
            "https://paroquia.org".to_string(),
            "http://localhost:5173".to_string(),
            ".diocese.org".to_string(),
        ];

        assert!(is_origin_allowed("https://paroquia.org", &allowed));
        assert!(is_origin_allowed("http://localhost:5173", &allowed));
        assert!(is_origin_allowed("https://sao-jose.diocese.org", &allowed));
        assert!(!is_origin_allowed("https://notdiocese.org", &allowed));
        assert!(!is_origin_allowed("https://paroquia.org.evil.com", &allowed));
        assert!(is_origin_allowed("https://anything", &["*".to_string()]));
    }

    #[test]
    fn test_daily_seed() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(daily_seed(date), "2025-06-30");
    }

    #[test]
    fn test_puzzle_errors_map_to_status() {
        let response = ApiError::from(PuzzleError::CellOutOfBounds { row: 9, col: 9, size: 5 })
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = ApiError::from(PuzzleError::EmptyWordBank).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
