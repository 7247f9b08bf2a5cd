//! [`Tenant`] definitions.

pub mod session;
pub mod settings;

use super::define_id;

pub use self::{session::Session, settings::Settings};

/// Business owning a partition of customers, inventory and documents.
///
/// Not stored on its own: identified by its [`Id`] only, which every owned
/// entity carries.
#[derive(Clone, Copy, Debug)]
pub struct Tenant;

define_id! {
    /// ID of a [`Tenant`].
    Id
}
