//! lectern-server — HTTP surface for quiz generation and answer analysis.

pub mod errors;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
