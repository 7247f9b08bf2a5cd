//! [`Invoice`]-related [`Database`] implementations.

use common::operations::{Advance, By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{
        invoice,
        sequence::{self, Sequence},
        tenant, Invoice,
    },
    infra::{
        database::{
            self,
            memory::{self, Change, Connection, Tx},
            Memory,
        },
        Database,
    },
};

/// Key of a [`Invoice`] within its [`tenant`].
type Key = (tenant::Id, invoice::Id);

impl<C> Database<Select<By<Option<Invoice>, Key>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Invoice>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (tenant_id, id) = by.into_inner();
        self.read(|s| s.invoices.get(tenant_id, id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Invoice>, tenant::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Invoice>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tenant_id = by.into_inner();
        self.read(|s| s.invoices.of_tenant(tenant_id).cloned().collect())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Invoice>> for Memory<C>
where
    C: Connection,
    Self: Database<Update<Invoice>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(invoice): Insert<Invoice>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(invoice)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Invoice>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(invoice): Update<Invoice>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Change::PutInvoice(invoice))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Issues the next [`invoice::Number`] of a [`tenant`], starting from
/// the provided first one.
///
/// The advanced [`Sequence`] is written within the same [`Tx`], so it's
/// discarded along with the [`Invoice`] if the [`Tx`] isn't committed.
impl Database<Advance<By<invoice::Number, (tenant::Id, u32)>>>
    for Memory<Tx>
{
    type Ok = invoice::Number;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Advance(by): Advance<By<invoice::Number, (tenant::Id, u32)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (tenant_id, first) = by.into_inner();
        let kind = sequence::Kind::Invoice;

        let mut seq = self
            .read(|s| {
                s.sequences.get(&(tenant_id, kind)).copied().unwrap_or_else(
                    || {
                        let max = s
                            .invoices
                            .of_tenant(tenant_id)
                            .map(|i| u32::from(i.number))
                            .max();
                        Sequence::resume(tenant_id, kind, first, max)
                    },
                )
            })
            .await
            .map_err(tracerr::wrap!())?;
        let number = seq.advance().ok_or_else(|| {
            tracerr::new!(database::Error::from(memory::Error::Exhausted))
        })?;

        self.write(Change::PutSequence(seq))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(number.into())
    }
}
