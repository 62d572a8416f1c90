//! Recipe catalogue backend.
//!
//! Accounts, tags, ingredients and recipes are stored per user and served
//! over a token-authenticated JSON API. The crate is laid out hexagonally:
//! [`domain`] owns the records and use-cases, [`inbound`] adapts HTTP onto
//! the driving ports and [`outbound`] implements the driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
