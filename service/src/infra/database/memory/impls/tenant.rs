//! [`Tenant`]-related [`Database`] implementations.

use common::operations::{By, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{tenant, Tenant},
    infra::{
        database::{
            self,
            memory::{Change, Connection, Tx},
            Memory,
        },
        Database,
    },
};

/// Serializes every [`Tx`] of the same [`Tenant`] past this point until
/// the end of the transaction.
impl Database<Lock<By<Tenant, tenant::Id>>> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Tenant, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.lock_tenant(by.into_inner())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<tenant::Settings>, tenant::Id>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<tenant::Settings>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<tenant::Settings>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.settings.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<tenant::Settings>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(settings): Update<tenant::Settings>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Change::PutSettings(settings))
            .await
            .map_err(tracerr::wrap!())
    }
}
