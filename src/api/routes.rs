use axum::{
    routing::{get, post},
    Router,
    extract::{rejection::JsonRejection, Json, State},
    response::{Html, IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::models::{SummarizeRequest, SummarizeResponse};
use crate::api::response;
use crate::error::AppError;
use crate::pipeline::summarize_url;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/summarize", post(summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn summarize_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummarizeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let err = AppError::InvalidInput(rejection.body_text());
            warn!(kind = err.kind(), "Rejected request body: {}", err);
            return response::error::<SummarizeResponse>(&err).into_response();
        }
    };
    info!("Processing request for URL: {}", req.url);
    let start_time = std::time::Instant::now();

    let result = summarize_url(&state, &req.url).await;
    info!("Request processing took: {:?}", start_time.elapsed());

    match result {
        Ok(data) => {
            info!("Successfully summarized URL: {}", data.url);
            response::success(data).into_response()
        }
        Err(err) => {
            warn!(kind = err.kind(), "Request failed: {}", err);
            response::error::<SummarizeResponse>(&err).into_response()
        }
    }
}
