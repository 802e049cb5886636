//! Axum control surface with WebSocket snapshot streaming.

use std::sync::Arc;

use algopiece_engine::{
    EngineConfig, Error as EngineError, ModelSnapshot, Observer, Playback, PlaybackStatus,
    Snapshot, View,
};
use algopiece_model::{AlgorithmId, AlgorithmInfo, UnknownAlgorithm};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

/// Events buffered per WebSocket client before it starts lagging.
const EVENT_CAPACITY: usize = 1024;

/// What the engine tells every connected renderer.
#[derive(Debug, Clone)]
enum BoardEvent {
    Snapshot(Snapshot),
    Cleared(View),
}

/// Forwards engine notifications into the broadcast channel.
struct Broadcaster {
    events: broadcast::Sender<BoardEvent>,
}

impl Observer for Broadcaster {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        // No subscribers is fine; events are simply dropped.
        let _ = self.events.send(BoardEvent::Snapshot(snapshot.clone()));
    }

    fn on_cleared(&self, view: &View) {
        let _ = self.events.send(BoardEvent::Cleared(view.clone()));
    }
}

/// Shared application state.
pub struct AppState {
    playback: Playback,
    events: broadcast::Sender<BoardEvent>,
}

/// Control surface server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server whose engine publishes into a broadcast channel.
    pub fn new(config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let playback = Playback::new(
            config,
            Broadcaster {
                events: events.clone(),
            },
        );
        Self {
            state: Arc::new(AppState { playback, events }),
        }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/algorithms", get(algorithms_handler))
            .route("/api/model", get(model_handler))
            .route("/api/graph", post(graph_handler))
            .route("/api/playback/start", post(start_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/resume", post(resume_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/speed", post(speed_handler))
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given port.
    pub async fn serve(self, port: u16) -> Result<(), std::io::Error> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Control surface running on http://localhost:{}", port);
        axum::serve(listener, self.router()).await
    }
}

/// An engine error rendered as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let status = match err {
            EngineError::InvalidState { .. } => StatusCode::CONFLICT,
            EngineError::Parse(_)
            | EngineError::InvalidSpeed(_)
            | EngineError::GraphNotApplicable(_) => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<UnknownAlgorithm> for ApiError {
    fn from(err: UnknownAlgorithm) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn start_run(state: &AppState, algorithm: &str, graph: Option<&str>) -> Result<PlaybackStatus, ApiError> {
    let algorithm: AlgorithmId = algorithm.parse()?;
    state.playback.start(algorithm, graph)?;
    Ok(state.playback.status())
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.playback.status())
}

async fn algorithms_handler() -> Json<Vec<AlgorithmInfo>> {
    Json(AlgorithmId::ALL.iter().map(AlgorithmId::info).collect())
}

async fn model_handler(State(state): State<Arc<AppState>>) -> Json<ModelSnapshot> {
    Json(state.playback.model())
}

#[derive(Deserialize)]
struct GraphRequest {
    edges: String,
}

async fn graph_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GraphRequest>,
) -> ApiResult<ModelSnapshot> {
    state.playback.load_graph(&req.edges)?;
    Ok(Json(state.playback.model()))
}

#[derive(Deserialize)]
struct StartRequest {
    algorithm: String,
    #[serde(default)]
    graph: Option<String>,
}

async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> ApiResult<PlaybackStatus> {
    start_run(&state, &req.algorithm, req.graph.as_deref()).map(Json)
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackStatus> {
    state.playback.pause()?;
    Ok(Json(state.playback.status()))
}

async fn resume_handler(State(state): State<Arc<AppState>>) -> ApiResult<PlaybackStatus> {
    state.playback.resume()?;
    Ok(Json(state.playback.status()))
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    state.playback.reset();
    Json(state.playback.status())
}

#[derive(Deserialize)]
struct SpeedRequest {
    percent: u8,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> ApiResult<PlaybackStatus> {
    state.playback.set_speed(req.percent)?;
    Ok(Json(state.playback.status()))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut events = state.events.subscribe();
    let mut transitions = state.playback.subscribe_state();

    let greeting = [
        WsResponse::Status(state.playback.status()),
        WsResponse::Board {
            view: state.playback.view(),
        },
    ];
    for message in &greeting {
        if send_json(&mut socket, message).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = match serde_json::from_str::<WsCommand>(&text) {
                            Ok(cmd) => handle_ws_command(&state, cmd),
                            Err(e) => WsResponse::Error { message: e.to_string() },
                        };
                        if let Err(e) = send_json(&mut socket, &response).await {
                            warn!("Failed to send response: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            changed = transitions.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = WsResponse::Status(state.playback.status());
                if let Err(e) = send_json(&mut socket, &status).await {
                    warn!("Failed to send status: {}", e);
                    break;
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Err(e) = send_json(&mut socket, &WsResponse::from(event)).await {
                            warn!("Failed to send board event: {}", e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client fell behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

async fn send_json(socket: &mut WebSocket, response: &WsResponse) -> Result<(), axum::Error> {
    let json = serde_json::to_string(response).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    Start {
        algorithm: String,
        #[serde(default)]
        graph: Option<String>,
    },
    Pause,
    Resume,
    Reset,
    Speed {
        percent: u8,
    },
    GetStatus,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Snapshot(Snapshot),
    Status(PlaybackStatus),
    /// The whole board, sent on connect and whenever it is cleared
    Board { view: View },
    Error { message: String },
}

impl From<BoardEvent> for WsResponse {
    fn from(event: BoardEvent) -> Self {
        match event {
            BoardEvent::Snapshot(snapshot) => WsResponse::Snapshot(snapshot),
            BoardEvent::Cleared(view) => WsResponse::Board { view },
        }
    }
}

fn handle_ws_command(state: &AppState, cmd: WsCommand) -> WsResponse {
    let playback = &state.playback;
    let outcome = match cmd {
        WsCommand::Start { algorithm, graph } => {
            start_run(state, &algorithm, graph.as_deref()).map(|_| ())
        }
        WsCommand::Pause => playback.pause().map_err(ApiError::from),
        WsCommand::Resume => playback.resume().map_err(ApiError::from),
        WsCommand::Reset => {
            playback.reset();
            Ok(())
        }
        WsCommand::Speed { percent } => playback.set_speed(percent).map_err(ApiError::from),
        WsCommand::GetStatus => Ok(()),
    };
    match outcome {
        Ok(()) => WsResponse::Status(playback.status()),
        Err(err) => WsResponse::Error {
            message: err.message,
        },
    }
}
