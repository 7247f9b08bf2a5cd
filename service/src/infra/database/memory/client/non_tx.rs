//! [`NonTx`] client definitions.

use std::sync::Arc;

use tracerr::Traced;

use crate::infra::database::{
    self,
    memory::{Change, Connection, State, Storage},
};

/// Non-transactional [`Memory`] database client.
///
/// Reads the committed [`State`] and applies every write immediately.
///
/// [`Memory`]: super::super::Memory
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`Storage`] this client operates on.
    pub(crate) storage: Arc<Storage>,
}

impl NonTx {
    /// Creates a new [`NonTx`] client upon the provided [`Storage`].
    #[must_use]
    pub(crate) fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl Connection for NonTx {
    async fn read<R, F>(&self, f: F) -> Result<R, Traced<database::Error>>
    where
        F: FnOnce(&State) -> R,
    {
        self.storage.ensure_available().map_err(tracerr::wrap!())?;
        Ok(f(&*self.storage.state.read().await))
    }

    async fn write(
        &self,
        change: Change,
    ) -> Result<(), Traced<database::Error>> {
        self.storage.ensure_available().map_err(tracerr::wrap!())?;
        self.storage.state.write().await.apply(change);
        Ok(())
    }
}
