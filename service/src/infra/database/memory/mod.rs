//! In-process [`Database`] implementation.
//!
//! Keeps every [`Tenant`]'s entities in memory, providing the same
//! transactional guarantees a real backing store would: writes of a
//! transaction become visible atomically on commit, and are discarded
//! entirely when the transaction fails or is dropped.
//!
//! [`Tenant`]: crate::domain::Tenant

pub mod client;
mod impls;
pub mod state;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use derive_more::{Deref, Display, Error as StdError};
use tokio::sync::{Mutex, RwLock};
use tracerr::Traced;

use crate::{domain::tenant, infra::database};
#[cfg(doc)]
use crate::infra::Database;

pub use self::{
    client::{Connection, NonTx, Tx},
    state::{Change, State},
};

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self(NonTx::new(Arc::new(Storage::default())))
    }

    /// Makes every following operation fail with [`Error::Unavailable`]
    /// until switched back.
    ///
    /// Simulates an outage of the backing store.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.storage
            .faults
            .unavailable
            .store(unavailable, Ordering::SeqCst);
    }

    /// Makes the next `count` commits fail with [`Error::Unavailable`],
    /// discarding their transactions.
    pub fn fail_next_commits(&self, count: usize) {
        self.storage
            .faults
            .failing_commits
            .store(count, Ordering::SeqCst);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage shared by all the [`Memory`] clients.
#[derive(Debug, Default)]
pub struct Storage {
    /// Committed [`State`].
    state: RwLock<State>,

    /// Per-[`tenant`] locks, held by transactions till their end.
    locks: Mutex<HashMap<tenant::Id, Arc<Mutex<()>>>>,

    /// Injected [`Faults`].
    faults: Faults,
}

impl Storage {
    /// Returns the lock of the provided [`tenant`], creating it if needed.
    async fn tenant_lock(&self, tenant_id: tenant::Id) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().await.entry(tenant_id).or_default())
    }

    /// Checks whether this [`Storage`] is available.
    fn ensure_available(&self) -> Result<(), Traced<database::Error>> {
        if self.faults.unavailable.load(Ordering::SeqCst) {
            return Err(tracerr::new!(database::Error::from(
                Error::Unavailable
            )));
        }
        Ok(())
    }

    /// Checks whether the next commit should fail.
    fn ensure_commit_succeeds(&self) -> Result<(), Traced<database::Error>> {
        let failing = self.faults.failing_commits.fetch_update(
            Ordering::SeqCst,
            Ordering::SeqCst,
            |n| n.checked_sub(1),
        );
        if failing.is_ok() {
            return Err(tracerr::new!(database::Error::from(
                Error::Unavailable
            )));
        }
        self.ensure_available()
    }
}

/// Faults injected into a [`Storage`].
#[derive(Debug, Default)]
struct Faults {
    /// Whether every operation fails.
    unavailable: AtomicBool,

    /// Number of the next commits to fail.
    failing_commits: AtomicUsize,
}

/// [`Memory`] database [`Error`].
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Backing store is unavailable.
    #[display("Backing store is unavailable")]
    Unavailable,

    /// Document numbers of a [`tenant`] are exhausted.
    #[display("Document numbers are exhausted")]
    Exhausted,
}
