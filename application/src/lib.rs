//! Application provides GraphQL API for the commercial document engine
//! [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;
pub mod seed;
pub mod server;

// Used in binary.
use tracing_subscriber as _;
// Used in integration tests.
#[cfg(test)]
use {serde_json as _, tower as _};

pub use self::{
    args::Args,
    config::Config,
    context::{Context, Session},
    error::{AsError, Error},
    server::{graphql, subscriptions, JuniperResponse},
};

/// [`Service`] backed by the in-process store.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Memory>;
