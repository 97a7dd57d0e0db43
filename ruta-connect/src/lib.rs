pub mod app_config;
pub mod memory;
pub mod rest;

pub use app_config::Config;
pub use memory::{InMemorySearchProvider, InMemorySessionContext, MockBookingProvider};
pub use rest::{RestBookingProvider, RestSearchProvider};

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {message}")]
    UpstreamStatus { status: u16, message: String },
}
