pub mod markets;
pub mod orders;
pub mod wallets;

use axum::http::StatusCode;

pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
