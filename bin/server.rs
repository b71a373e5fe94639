// General Ledger - Web Server
// REST API over one shared ledger session

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use general_ledger::{FormKind, LedgerError, Period, Session, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Parser)]
#[command(name = "ledger-server", version, about = "General ledger REST API")]
struct Args {
    /// Ledger CSV file loaded at start-up; the only file save/load touch
    #[arg(short, long, env = "LEDGER_FILE", default_value = "ledger.csv")]
    file: PathBuf,

    #[arg(long, env = "LEDGER_BIND", default_value = "127.0.0.1:3000")]
    bind: String,

    #[arg(long, env = "LEDGER_LOG", default_value = "info")]
    log_level: String,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<Session>>,
    /// Ledger file behind save/load, fixed at start-up
    file: PathBuf,
}

impl AppState {
    fn new(session: Session, file: PathBuf) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            file,
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, ApiError> {
        self.session.lock().map_err(|_| ApiError::Poisoned)
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
enum ApiError {
    Rejected(ValidationError),
    Ledger(LedgerError),
    UnknownForm(String),
    Poisoned,
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Rejected(e)
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        ApiError::Ledger(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Rejected(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::Ledger(e @ LedgerError::LossyOverwrite { .. }) => {
                (StatusCode::CONFLICT, e.to_string())
            }
            ApiError::Ledger(e) if e.is_resource_failure() => {
                tracing::error!("ledger resource failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Ledger(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::UnknownForm(form) => (StatusCode::NOT_FOUND, format!("unknown tax form: {}", form)),
            ApiError::Poisoned => {
                tracing::error!("session lock poisoned");
                (StatusCode::INTERNAL_SERVER_ERROR, "session unavailable".to_string())
            }
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Deserialize)]
struct NewTransaction {
    date: String,
    account: String,
    #[serde(default)]
    debit: f64,
    #[serde(default)]
    credit: f64,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize)]
struct SaveResponse {
    path: PathBuf,
    saved: usize,
}

#[derive(Debug, Serialize)]
struct LoadResponse {
    path: PathBuf,
    loaded: usize,
    ignored: usize,
    issues: Vec<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/transactions - Full log in entry order
async fn get_transactions(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session()?;
    Ok(Json(ApiResponse::ok(session.all())).into_response())
}

/// POST /api/transactions - Append one entry
async fn post_transaction(
    State(state): State<AppState>,
    Json(body): Json<NewTransaction>,
) -> Result<Response, ApiError> {
    let mut session = state.session()?;
    let tx = session
        .append(&body.date, &body.account, body.debit, body.credit, &body.description)?
        .clone();

    tracing::info!(account = %tx.account(), "transaction appended");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(tx))).into_response())
}

async fn get_balances(State(state): State<AppState>) -> ApiResult<general_ledger::BalanceMap> {
    Ok(Json(ApiResponse::ok(state.session()?.balances())))
}

async fn get_t_accounts(
    State(state): State<AppState>,
) -> ApiResult<indexmap::IndexMap<String, general_ledger::TAccount>> {
    Ok(Json(ApiResponse::ok(state.session()?.t_accounts())))
}

/// GET /api/statements/income?start=YYYY-MM-DD&end=YYYY-MM-DD
async fn get_income_statement(
    State(state): State<AppState>,
    Query(period): Query<Period>,
) -> ApiResult<general_ledger::IncomeStatement> {
    Ok(Json(ApiResponse::ok(state.session()?.income_statement(period))))
}

async fn get_balance_sheet(State(state): State<AppState>) -> ApiResult<general_ledger::BalanceSheet> {
    Ok(Json(ApiResponse::ok(state.session()?.balance_sheet())))
}

async fn get_statement_of_equity(
    State(state): State<AppState>,
    Query(period): Query<Period>,
) -> ApiResult<general_ledger::StatementOfEquity> {
    Ok(Json(ApiResponse::ok(state.session()?.statement_of_equity(period))))
}

/// GET /api/tax/:form - 1120 or 1065
async fn get_tax_form(
    State(state): State<AppState>,
    Path(form): Path<String>,
) -> ApiResult<general_ledger::TaxForm> {
    let kind: FormKind = form.parse().map_err(|_| ApiError::UnknownForm(form))?;
    Ok(Json(ApiResponse::ok(state.session()?.tax_form(kind))))
}

/// GET /api/export - The four statement sheets as JSON
async fn get_export(State(state): State<AppState>) -> ApiResult<general_ledger::Workbook> {
    Ok(Json(ApiResponse::ok(state.session()?.workbook())))
}

/// POST /api/ledger/save - Write the log to the configured CSV file
async fn save_ledger(State(state): State<AppState>) -> ApiResult<SaveResponse> {
    let path = state.file.clone();
    let saved = state.session()?.save(&path)?;

    tracing::info!(path = %path.display(), saved, "ledger saved");
    Ok(Json(ApiResponse::ok(SaveResponse { path, saved })))
}

/// POST /api/ledger/load - Replace the log with the configured CSV file
async fn load_ledger(State(state): State<AppState>) -> ApiResult<LoadResponse> {
    let path = state.file.clone();
    let report = state.session()?.load(&path)?;

    Ok(Json(ApiResponse::ok(LoadResponse {
        path,
        loaded: report.loaded,
        ignored: report.ignored,
        issues: report.issues.iter().map(|i| i.message()).collect(),
    })))
}

/// Browsers attach `Origin` to cross-site writes; API clients don't.
/// Any state-changing request that carries one is refused.
async fn reject_cross_origin(request: Request, next: Next) -> Response {
    let read_only = [Method::GET, Method::HEAD, Method::OPTIONS].contains(request.method());
    if !read_only && request.headers().contains_key(header::ORIGIN) {
        tracing::warn!(uri = %request.uri(), "cross-origin write refused");
        let body = ApiResponse::<()>::failure("cross-origin writes are not allowed".to_string());
        return (StatusCode::FORBIDDEN, Json(body)).into_response();
    }
    next.run(request).await
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/transactions", get(get_transactions).post(post_transaction))
        .route("/balances", get(get_balances))
        .route("/t-accounts", get(get_t_accounts))
        .route("/statements/income", get(get_income_statement))
        .route("/statements/balance-sheet", get(get_balance_sheet))
        .route("/statements/equity", get(get_statement_of_equity))
        .route("/tax/:form", get(get_tax_form))
        .route("/export", get(get_export))
        .route("/ledger/save", post(save_ledger))
        .route("/ledger/load", post(load_ledger))
        .layer(middleware::from_fn(reject_cross_origin))
        .with_state(state);

    // Other origins may read, never write
    let cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]);

    Router::new().nest("/api", api_routes).layer(cors)
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.as_str())
        .init();

    let (session, report) = Session::open(&args.file)?;
    tracing::info!(path = %args.file.display(), "{}", report.summary());

    let app = router(AppState::new(session, args.file));

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    tracing::info!("listening on http://{}", args.bind);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use general_ledger::demo_transactions;
    use tower::ServiceExt;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ledger-server-{}-{}.csv", std::process::id(), name))
    }

    fn app_with_file(file: PathBuf) -> Router {
        router(AppState::new(Session::with_transactions(demo_transactions()), file))
    }

    fn demo_app() -> Router {
        app_with_file(scratch_file("demo"))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn empty_post(uri: &str) -> Request<Body> {
        Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(demo_app(), get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_balances_and_income() {
        let (status, body) = send(demo_app(), get_req("/api/balances")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["Cash"], 1100.0);

        let (_, body) = send(demo_app(), get_req("/api/statements/income?start=2025-05-01")).await;
        assert_eq!(body["data"]["net_income"], 500.0);
    }

    #[tokio::test]
    async fn test_post_transaction_rejected() {
        let req = post_json(
            "/api/transactions",
            serde_json::json!({"date": "2025-05-10", "account": "Cash", "debit": 5.0, "credit": 5.0}),
        );
        let (status, body) = send(demo_app(), req).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_post_transaction_appends() {
        let app = demo_app();
        let req = post_json(
            "/api/transactions",
            serde_json::json!({"date": "2025-05-10", "account": "Cash", "debit": 5.0}),
        );
        let (status, body) = send(app.clone(), req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["Account"], "Cash");

        let (_, body) = send(app, get_req("/api/transactions")).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_tax_form_lookup() {
        let (status, body) = send(demo_app(), get_req("/api/tax/1120")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["form"], "1120");

        let (status, _) = send(demo_app(), get_req("/api/tax/941")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_server_error() {
        let app = app_with_file(scratch_file("never-written"));
        let (status, body) = send(app, empty_post("/api/ledger/load")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_save_ignores_client_path() {
        let file = scratch_file("configured");
        let victim = scratch_file("victim");
        std::fs::write(&victim, "precious").unwrap();

        let req = post_json("/api/ledger/save", serde_json::json!({ "path": victim }));
        let (status, body) = send(app_with_file(file.clone()), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["saved"], 8);
        assert_eq!(std::fs::read_to_string(&victim).unwrap(), "precious");
        assert!(std::fs::read_to_string(&file).unwrap().starts_with("Date,Account"));

        std::fs::remove_file(&victim).unwrap();
        std::fs::remove_file(&file).unwrap();
    }

    #[tokio::test]
    async fn test_cross_origin_write_refused() {
        let file = scratch_file("cross-origin");
        let req = Request::builder()
            .method("POST")
            .uri("/api/ledger/save")
            .header(header::ORIGIN, "https://elsewhere.example")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app_with_file(file.clone()), req).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(!file.exists());

        // Reads from other origins are still allowed
        let req = Request::builder()
            .uri("/api/balances")
            .header(header::ORIGIN, "https://elsewhere.example")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(demo_app(), req).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_save_over_lossy_load_conflicts() {
        let file = scratch_file("lossy");
        std::fs::write(&file, "Date,Account,Debit,Credit,Description\nd,Cash,1O0,0,typo\n").unwrap();

        let (session, _) = Session::open(&file).unwrap();
        let app = router(AppState::new(session, file.clone()));
        let (status, _) = send(app, empty_post("/api/ledger/save")).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(std::fs::read_to_string(&file).unwrap().contains("1O0"));

        std::fs::remove_file(&file).unwrap();
    }
}
