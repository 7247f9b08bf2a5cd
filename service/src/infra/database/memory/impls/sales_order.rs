//! [`SalesOrder`]-related [`Database`] implementations.

use common::operations::{Advance, By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{
        sales_order,
        sequence::{self, Sequence},
        tenant, SalesOrder,
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

/// Key of a [`SalesOrder`] within its [`tenant`].
type Key = (tenant::Id, sales_order::Id);

impl<C> Database<Select<By<Option<SalesOrder>, Key>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<SalesOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<SalesOrder>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (tenant_id, id) = by.into_inner();
        self.read(|s| s.sales_orders.get(tenant_id, id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<SalesOrder>, tenant::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<SalesOrder>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<SalesOrder>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tenant_id = by.into_inner();
        self.read(|s| s.sales_orders.of_tenant(tenant_id).cloned().collect())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<SalesOrder>> for Memory<C>
where
    C: Connection,
    Self: Database<Update<SalesOrder>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<SalesOrder>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(order)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<SalesOrder>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<SalesOrder>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Change::PutSalesOrder(order))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Issues the next [`sales_order::Number`] of a [`tenant`], starting from
/// the provided first one.
///
/// The advanced [`Sequence`] is written within the same [`Tx`], so it's
/// discarded along with the [`SalesOrder`] if the [`Tx`] isn't committed.
impl Database<Advance<By<sales_order::Number, (tenant::Id, u32)>>>
    for Memory<Tx>
{
    type Ok = sales_order::Number;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Advance(by): Advance<By<sales_order::Number, (tenant::Id, u32)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (tenant_id, first) = by.into_inner();
        let kind = sequence::Kind::SalesOrder;

        let mut seq = self
            .read(|s| {
                s.sequences.get(&(tenant_id, kind)).copied().unwrap_or_else(
                    || {
                        let max = s
                            .sales_orders
                            .of_tenant(tenant_id)
                            .map(|o| u32::from(o.number))
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
