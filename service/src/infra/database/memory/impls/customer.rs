//! [`Customer`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{customer, tenant, Customer},
    infra::{
        database::{
            self,
            memory::{Change, Connection},
            Memory,
        },
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Customer>, (tenant::Id, customer::Id)>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, (tenant::Id, customer::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (tenant_id, id) = by.into_inner();
        self.read(|s| s.customers.get(tenant_id, id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Option<Customer>, (tenant::Id, customer::Email)>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<Customer>, (tenant::Id, customer::Email)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (tenant_id, email) = by.into_inner();
        self.read(|s| {
            s.customers
                .of_tenant(tenant_id)
                .find(|c| c.email.is_same_as(&email))
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Customer>, tenant::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Customer>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tenant_id = by.into_inner();
        self.read(|s| s.customers.of_tenant(tenant_id).cloned().collect())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C>
    Database<
        Select<By<read::customer::IsReferenced, (tenant::Id, customer::Id)>>,
    > for Memory<C>
where
    C: Connection,
{
    type Ok = read::customer::IsReferenced;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::customer::IsReferenced, (tenant::Id, customer::Id)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (tenant_id, id) = by.into_inner();
        self.read(|s| {
            let by_order = s
                .sales_orders
                .of_tenant(tenant_id)
                .any(|o| o.customer_id == id);
            let by_invoice = s
                .invoices
                .of_tenant(tenant_id)
                .any(|i| i.customer_id == id);
            read::customer::IsReferenced(by_order || by_invoice)
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Customer>> for Memory<C>
where
    C: Connection,
    Self: Database<Update<Customer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(customer): Insert<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(customer))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Customer>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(customer): Update<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Change::PutCustomer(customer))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Customer, customer::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Customer, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Change::RemoveCustomer(by.into_inner()))
            .await
            .map_err(tracerr::wrap!())
    }
}
