//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a set of server endpoints.
//!
//! | Module | Server path | Description |
//! |--------|-------------|-------------|
//! | `facets` | `<facet>/<value>.json` | Product listings by facet value |
//! | `products` | `api/v0/product/<barcode>.json`, `cgi/product_jqm2.pl` | Barcode lookup and field submission |

pub mod facets;
pub mod products;

pub use facets::{EndpointShape, FacetEndpoint, FacetKind, FacetQuery, FacetSearchClient, UnknownFacet};
pub use products::{ProductClient, ProductSubmission};
