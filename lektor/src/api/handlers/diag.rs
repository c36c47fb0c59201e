use axum::extract::State;
use axum::response::Html;
use axum::Json;

use crate::api::dto::DiagResponse;
use crate::api::state::AppState;

/// `GET /` — static health string.
pub async fn home() -> Html<&'static str> {
    Html("<h3>Lektor backend is running. Use POST /chat</h3>")
}

/// `GET /api/diag` — current OCR engine status.
///
/// Reports the availability flag as-is; this endpoint never probes, so it
/// reflects what the last startup probe or file-carrying request observed.
pub async fn diag(State(state): State<AppState>) -> Json<DiagResponse> {
    Json(DiagResponse {
        tesseract_available: state.ocr.is_available(),
        tesseract_cmd: Some(state.ocr.command().to_string()),
        tesseract_version: state.ocr.cached_version(),
    })
}
