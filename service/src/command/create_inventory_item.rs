//! [`Command`] for creating a new [`InventoryItem`].

use common::{
    operations::{By, Commit, Insert, Lock, Transact, Transacted},
    DateTime, Percent,
};
use tracerr::Traced;

use crate::{
    domain::{inventory_item, tenant, InventoryItem, Tenant},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`InventoryItem`].
#[derive(Clone, Debug)]
pub struct CreateInventoryItem {
    /// ID of the [`Tenant`] to create the [`InventoryItem`] for.
    pub tenant_id: tenant::Id,

    /// [`inventory_item::Name`] of a new [`InventoryItem`].
    pub name: inventory_item::Name,

    /// [`inventory_item::Description`] of a new [`InventoryItem`].
    pub description: Option<inventory_item::Description>,

    /// [`inventory_item::UnitPrice`] of a new [`InventoryItem`].
    pub unit_price: inventory_item::UnitPrice,

    /// Tax rate of a new [`InventoryItem`].
    pub tax_rate: Percent,

    /// [`inventory_item::Stock`] of a new [`InventoryItem`].
    pub stock: inventory_item::Stock,
}

impl<Db> Command<CreateInventoryItem> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Tenant, tenant::Id>>,
            Err = Traced<database::Error>,
        > + Database<Insert<InventoryItem>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = InventoryItem;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateInventoryItem,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateInventoryItem {
            tenant_id,
            name,
            description,
            unit_price,
            tax_rate,
            stock,
        } = cmd;

        let item = InventoryItem {
            id: inventory_item::Id::new(),
            tenant_id,
            name,
            description,
            unit_price,
            tax_rate,
            stock,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        tx.execute(Lock(By::new(tenant_id)))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Insert(item.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(item)
    }
}

/// Error of [`CreateInventoryItem`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{Money, Percent};

    use crate::{
        domain::{inventory_item, tenant},
        error::{Classify as _, Kind},
        fixture, query, Command as _, Query as _,
    };

    use super::CreateInventoryItem;

    fn widget(tenant_id: tenant::Id) -> CreateInventoryItem {
        CreateInventoryItem {
            tenant_id,
            name: inventory_item::Name::new("Widget").unwrap(),
            description: None,
            unit_price: inventory_item::UnitPrice::new(Money::from_minor(
                249_900,
            ))
            .unwrap(),
            tax_rate: Percent::from_str("18").unwrap(),
            stock: inventory_item::Stock::default(),
        }
    }

    #[tokio::test]
    async fn lists_items_in_creation_order() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();

        let mut created = Vec::new();
        for name in ["Widget A", "Widget B", "Widget C"] {
            created.push(
                svc.execute(CreateInventoryItem {
                    name: inventory_item::Name::new(name).unwrap(),
                    ..widget(tenant_id)
                })
                .await
                .unwrap(),
            );
        }
        _ = svc.execute(widget(tenant::Id::new())).await.unwrap();

        let listed = svc
            .execute(query::inventory_items::OfTenant::by(tenant_id))
            .await
            .unwrap();
        assert_eq!(listed, created);
    }

    #[tokio::test]
    async fn fails_when_store_is_unavailable() {
        let svc = fixture::service();
        svc.database().set_unavailable(true);

        let err = svc.execute(widget(tenant::Id::new())).await.unwrap_err();
        assert_eq!(err.kind(), Kind::Unavailable);
    }
}
