//! # Locintel SDK
//!
//! Async client for the Precisely location intelligence APIs: geocoding, address
//! verification and parsing, geo tax, emergency info, geolocation, e-mail, phone and name
//! validation, time zones, routing, streets, location risk and the data graph.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use locintel_sdk::{Credentials, GeocodeOptions, LocintelClient, LocintelResult};
//!
//! #[tokio::main]
//! async fn main() -> LocintelResult<()> {
//!     let client = LocintelClient::builder()
//!         .credentials(Credentials::api_key_secret("key", "secret"))
//!         .build()?;
//!
//!     let result = client
//!         .geo_addressing()
//!         .geocode("1700 District Ave, Burlington, MA", &GeocodeOptions::default())
//!         .await?;
//!     println!("{}", result);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Data graph
//!
//! ```rust,no_run
//! use locintel_sdk::{DataGraphQuery, LocintelClient};
//!
//! # async fn example() -> locintel_sdk::LocintelResult<()> {
//! let client = LocintelClient::from_env()?;
//! let response = client
//!     .data_graph()
//!     .by_address(DataGraphQuery::FloodRisk, "42 Valley Of The Sun Dr, Fairplay, CO 80440", None)
//!     .await?;
//! if response.is_failure() {
//!     eprintln!("{}", response.error_summary());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

// Re-export main client
pub use client::{LocintelClient, LocintelClientBuilder};
pub use config::{ClientConfig, Credentials, RetryConfig, DEFAULT_BASE_URL};
pub use error::{LocintelError, LocintelResult};

pub use api::{
    CrimeRiskOptions, DataGraphQuery, GeocodeOptions, GraphQlRequest, HistoryFilter,
    IntersectionOptions, RouteOptions,
};

// Re-export core types for convenience
pub use locintel_core::{Coordinates, GraphQlResponse};
