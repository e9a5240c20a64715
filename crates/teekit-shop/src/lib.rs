//! # TeeKit Shop
//!
//! The external-facing edge of the customization core: fetching the
//! garment model catalogue and submitting finished orders. Everything in
//! here talks to collaborating services; nothing in here owns design
//! state beyond resetting the store after a successful order.
//!
//! Transports are trait objects so the order flow is testable without a
//! network and swappable for the embedding application's own stack.

pub mod catalog;
pub mod http;
pub mod multipart;
pub mod order;
pub mod submit;

pub use catalog::CatalogClient;
pub use http::{HttpRequest, HttpResponse, HttpTransport, TcpTransport};
pub use multipart::encode_order;
pub use order::{BillingInfo, OrderForm, ShippingAddress};
pub use submit::{OrderClient, ServiceResponse};
