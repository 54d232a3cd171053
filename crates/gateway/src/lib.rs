pub mod chart;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pages;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod upload;

#[cfg(test)]
mod testing;

pub use routes::router;
pub use state::AppState;
