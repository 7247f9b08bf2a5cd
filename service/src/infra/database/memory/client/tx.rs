//! [`Tx`] client definitions.

use std::{mem, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::tenant,
    infra::database::{
        self,
        memory::{Change, Connection, State, Storage},
    },
};

use super::NonTx;

/// Transactional [`Memory`] database client.
///
/// Collects writes in a journal applied to the committed [`State`] at once
/// on [`Tx::commit()`]. Dropping a [`Tx`] without committing discards the
/// journal and releases the held locks.
///
/// [`Memory`]: super::super::Memory
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Storage`] this client operates on.
    storage: Arc<Storage>,

    /// Inner state of this transaction.
    inner: Arc<Mutex<Inner>>,
}

/// Inner state of a [`Tx`].
#[derive(Debug, Default)]
struct Inner {
    /// Committed [`State`] with the `journal` applied, taken lazily on the
    /// first read.
    view: Option<State>,

    /// [`Change`]s written so far.
    journal: Vec<Change>,

    /// Locks held till the end of this transaction.
    guards: Vec<OwnedMutexGuard<()>>,

    /// [`tenant`]s locked by this transaction.
    locked: Vec<tenant::Id>,
}

impl Tx {
    /// Starts a new [`Tx`] upon the [`Storage`] of the provided [`NonTx`]
    /// client.
    #[must_use]
    pub fn from_non_tx(client: &NonTx) -> Self {
        Self {
            storage: Arc::clone(&client.storage),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Locks the provided [`tenant`] till the end of this transaction.
    ///
    /// The view of this transaction is refreshed afterwards, so everything
    /// read after the lock reflects the latest committed [`State`].
    ///
    /// # Errors
    ///
    /// If the [`Storage`] is unavailable.
    pub async fn lock_tenant(
        &self,
        tenant_id: tenant::Id,
    ) -> Result<(), Traced<database::Error>> {
        self.storage.ensure_available().map_err(tracerr::wrap!())?;

        let mut inner = self.inner.lock().await;
        if inner.locked.contains(&tenant_id) {
            return Ok(());
        }
        let lock = self.storage.tenant_lock(tenant_id).await;
        let guard = lock.lock_owned().await;
        inner.guards.push(guard);
        inner.locked.push(tenant_id);
        inner.view = None;
        Ok(())
    }

    /// Commits this [`Tx`], making its writes visible and releasing its
    /// locks.
    ///
    /// # Errors
    ///
    /// If the [`Storage`] is unavailable, in which case the writes are
    /// discarded.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let mut inner = self.inner.lock().await;
        let journal = mem::take(&mut inner.journal);
        inner.view = None;

        let res = self.storage.ensure_commit_succeeds();
        if res.is_ok() && !journal.is_empty() {
            let mut state = self.storage.state.write().await;
            for change in journal {
                state.apply(change);
            }
        }

        inner.guards.clear();
        inner.locked.clear();
        res.map_err(tracerr::wrap!())
    }
}

impl Connection for Tx {
    async fn read<R, F>(&self, f: F) -> Result<R, Traced<database::Error>>
    where
        F: FnOnce(&State) -> R,
    {
        self.storage.ensure_available().map_err(tracerr::wrap!())?;

        let mut inner = self.inner.lock().await;
        let Inner { view, journal, .. } = &mut *inner;
        let view = match view {
            Some(v) => v,
            None => {
                let mut state = self.storage.state.read().await.clone();
                for change in journal.iter().cloned() {
                    state.apply(change);
                }
                view.insert(state)
            }
        };
        Ok(f(view))
    }

    async fn write(
        &self,
        change: Change,
    ) -> Result<(), Traced<database::Error>> {
        self.storage.ensure_available().map_err(tracerr::wrap!())?;

        let mut inner = self.inner.lock().await;
        if let Some(view) = &mut inner.view {
            view.apply(change.clone());
        }
        inner.journal.push(change);
        Ok(())
    }
}
