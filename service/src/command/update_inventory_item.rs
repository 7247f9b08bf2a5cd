//! [`Command`] for updating an existing [`InventoryItem`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Percent,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Invoice, SalesOrder};
use crate::{
    domain::{inventory_item, tenant, InventoryItem, Tenant},
    error::{Classify, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`InventoryItem`].
///
/// Only the provided fields are changed. Already created [`SalesOrder`]s
/// and [`Invoice`]s keep the price and the tax rate they've captured.
#[derive(Clone, Debug)]
pub struct UpdateInventoryItem {
    /// ID of the [`Tenant`] the [`InventoryItem`] belongs to.
    pub tenant_id: tenant::Id,

    /// ID of the [`InventoryItem`] to update.
    pub item_id: inventory_item::Id,

    /// New [`inventory_item::Name`].
    pub name: Option<inventory_item::Name>,

    /// New [`inventory_item::Description`], cleared with `Some(None)`.
    pub description: Option<Option<inventory_item::Description>>,

    /// New [`inventory_item::UnitPrice`].
    pub unit_price: Option<inventory_item::UnitPrice>,

    /// New tax rate.
    pub tax_rate: Option<Percent>,

    /// New [`inventory_item::Stock`].
    pub stock: Option<inventory_item::Stock>,
}

impl<Db> Command<UpdateInventoryItem> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Tenant, tenant::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<Option<InventoryItem>, (tenant::Id, inventory_item::Id)>,
            >,
            Ok = Option<InventoryItem>,
            Err = Traced<database::Error>,
        > + Database<Update<InventoryItem>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = InventoryItem;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateInventoryItem,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateInventoryItem {
            tenant_id,
            item_id,
            name,
            description,
            unit_price,
            tax_rate,
            stock,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut item = tx
            .execute(Select(By::<Option<InventoryItem>, _>::new((
                tenant_id, item_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ItemNotExists(item_id))
            .map_err(tracerr::wrap!())?;

        if let Some(name) = name {
            item.name = name;
        }
        if let Some(description) = description {
            item.description = description;
        }
        if let Some(price) = unit_price {
            item.unit_price = price;
        }
        if let Some(rate) = tax_rate {
            item.tax_rate = rate;
        }
        if let Some(stock) = stock {
            item.stock = stock;
        }

        tx.execute(Update(item.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(item)
    }
}

/// Error of [`UpdateInventoryItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`InventoryItem`] with the provided ID does not exist.
    #[display("`InventoryItem(id: {_0})` does not exist")]
    #[from(ignore)]
    ItemNotExists(#[error(not(source))] inventory_item::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::ItemNotExists(_) => Kind::NotFound,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::{
        domain::{inventory_item, tenant},
        error::{Classify as _, Kind},
        fixture, Command as _,
    };

    use super::UpdateInventoryItem;

    fn update(
        tenant_id: tenant::Id,
        item_id: inventory_item::Id,
    ) -> UpdateInventoryItem {
        UpdateInventoryItem {
            tenant_id,
            item_id,
            name: None,
            description: None,
            unit_price: None,
            tax_rate: None,
            stock: None,
        }
    }

    #[tokio::test]
    async fn updates_only_provided_fields() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;

        let updated = svc
            .execute(UpdateInventoryItem {
                unit_price: inventory_item::UnitPrice::new(
                    Money::from_minor(259_900),
                ),
                stock: inventory_item::Stock::new(5),
                ..update(tenant_id, widget.id)
            })
            .await
            .unwrap();

        assert_eq!(updated.unit_price.amount(), Money::from_minor(259_900));
        assert_eq!(updated.stock, inventory_item::Stock::new(5).unwrap());
        assert_eq!(updated.name, widget.name);
        assert_eq!(updated.tax_rate, widget.tax_rate);
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let svc = fixture::service();

        let err = svc
            .execute(update(tenant::Id::new(), inventory_item::Id::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Kind::NotFound);
    }
}
