use crate::handlers::{self, markets, orders, wallets};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/orders", post(orders::place_order))
        .route("/orders/:id", delete(orders::cancel_order))
        .route("/orders/open/:user_id", get(orders::open_orders))
        .route("/wallet/:user_id", get(wallets::get_wallet))
        .route("/admin/wallets/fund", post(wallets::fund_wallet))
        .route("/markets/:symbol/trades", get(markets::list_trades))
        .route("/markets/:symbol/book", get(markets::book_snapshot));

    Router::new()
        .nest("/v1", api_routes)
        .route("/healthz", get(handlers::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
