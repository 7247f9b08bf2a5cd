//! [`Memory`] database client definitions.
//!
//! [`Memory`]: super::Memory

pub mod non_tx;
pub mod tx;

use std::future::Future;

use tracerr::Traced;

use crate::infra::database;

use super::{Change, State};

pub use self::{non_tx::NonTx, tx::Tx};

/// Connection to a [`Memory`] database [`State`].
///
/// [`Memory`]: super::Memory
pub trait Connection {
    /// Reads the [`State`] visible through this [`Connection`].
    fn read<R, F>(
        &self,
        f: F,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>
    where
        F: FnOnce(&State) -> R;

    /// Writes the provided [`Change`] through this [`Connection`].
    fn write(
        &self,
        change: Change,
    ) -> impl Future<Output = Result<(), Traced<database::Error>>>;
}
