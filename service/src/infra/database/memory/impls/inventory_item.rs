//! [`InventoryItem`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{inventory_item, tenant, InventoryItem},
    infra::{
        database::{
            self,
            memory::{Change, Connection},
            Memory,
        },
        Database,
    },
    read::inventory_item::IsReferenced,
};

/// Key of an [`InventoryItem`] within its [`tenant`].
type Key = (tenant::Id, inventory_item::Id);

impl<C> Database<Select<By<Option<InventoryItem>, Key>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Option<InventoryItem>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<InventoryItem>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (tenant_id, id) = by.into_inner();
        self.read(|s| s.inventory_items.get(tenant_id, id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<InventoryItem>, tenant::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<InventoryItem>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<InventoryItem>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tenant_id = by.into_inner();
        self.read(|s| s.inventory_items.of_tenant(tenant_id).cloned().collect())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<IsReferenced, Key>>> for Memory<C>
where
    C: Connection,
{
    type Ok = IsReferenced;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<IsReferenced, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (tenant_id, id) = by.into_inner();
        self.read(|s| {
            let in_order = s
                .sales_orders
                .of_tenant(tenant_id)
                .any(|o| o.items.iter().any(|l| l.item_id == id));
            let in_invoice = s
                .invoices
                .of_tenant(tenant_id)
                .any(|i| i.items.iter().any(|l| l.item_id == id));
            IsReferenced(in_order || in_invoice)
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<InventoryItem>> for Memory<C>
where
    C: Connection,
    Self: Database<
        Update<InventoryItem>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(item): Insert<InventoryItem>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(item))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<InventoryItem>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(item): Update<InventoryItem>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Change::PutInventoryItem(item))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<InventoryItem, inventory_item::Id>>> for Memory<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<InventoryItem, inventory_item::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(Change::RemoveInventoryItem(by.into_inner()))
            .await
            .map_err(tracerr::wrap!())
    }
}
