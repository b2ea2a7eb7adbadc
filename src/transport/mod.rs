//! HTTP transport shared by the IP resolver, the DNS control client and
//! the HTTP notifier.
//!
//! One [`HttpClient`] is constructed per process run and handed (by clone)
//! to every component that talks HTTP. The trait boundary keeps the
//! components testable with scripted mock clients.

mod client;
mod error;
mod http;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use http::{HttpClient, HttpRequest, HttpResponse};
