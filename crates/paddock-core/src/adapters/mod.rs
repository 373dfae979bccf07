//! Upstream provider adapters.
//!
//! Each adapter implements [`DataSource`](crate::DataSource) over an injected
//! [`HttpClient`](crate::HttpClient) and normalizes the provider's wire format
//! into domain types.

mod jolpica;

pub use jolpica::JolpicaAdapter;
