//! Client for the Open Food Facts product database
//!
//! This crate wraps three server operations:
//!
//! - **Facet search**: list products by language, label, category, brand,
//!   store, country, additive and the other facet dimensions
//! - **Barcode lookup**: fetch one product; an unknown barcode is reported in
//!   the result, not as an error
//! - **Product submission**: save fields for a barcode with basic-auth
//!   credentials
//!
//! # Example
//!
//! ```rust,no_run
//! use openfood_api_client::{FacetKind, FacetQuery, Lookup, OpenFoodClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenFoodClient::new()?;
//!
//!     let query = FacetQuery::new(FacetKind::Brand, "monoprix")
//!         .with_fields(["product_name", "quantity"]);
//!     let result = client.facets().search(&query).await?;
//!     println!("{} products", result.count);
//!
//!     let state = client
//!         .products()
//!         .get_by_barcode("3017620422003", None, client.user_agent())
//!         .await?;
//!     match state.lookup() {
//!         Lookup::Found(product) => println!("{:?}", product.product_name),
//!         Lookup::NotFound { reason } => println!("not found: {reason}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod codec;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod transport;
pub mod types;
pub mod verify;

pub use auth::Credentials;
pub use client::OpenFoodClient;
pub use config::{ClientConfig, Environment};
pub use endpoints::{
    EndpointShape, FacetKind, FacetQuery, FacetSearchClient, ProductClient, ProductSubmission,
};
pub use error::{TransportError, TransportResult};
pub use transport::{HttpTransport, Transport, TransportRequest};
pub use types::{Lookup, ProductState, ProductSummary, SearchResult, Submission, SubmissionResult};
pub use verify::{verify_round_trip, SubmissionFlow, Verification};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::auth::Credentials;
    pub use crate::client::OpenFoodClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{FacetKind, FacetQuery, FacetSearchClient, ProductClient};
    pub use crate::error::{TransportError, TransportResult};
    pub use crate::types::{Lookup, ProductState, SearchResult, SubmissionResult};
}
