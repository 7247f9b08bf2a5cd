//! [`Command`] for deleting an [`InventoryItem`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Invoice, LineItem, SalesOrder};
use crate::{
    domain::{inventory_item, tenant, InventoryItem, Tenant},
    error::{Classify, Kind},
    infra::{database, Database},
    read::inventory_item::IsReferenced,
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`InventoryItem`] not used by any
/// [`LineItem`] of a [`SalesOrder`] or an [`Invoice`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteInventoryItem {
    /// ID of the [`Tenant`] the [`InventoryItem`] belongs to.
    pub tenant_id: tenant::Id,

    /// ID of the [`InventoryItem`] to delete.
    pub item_id: inventory_item::Id,
}

impl<Db> Command<DeleteInventoryItem> for Service<Db>
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
        > + Database<
            Select<By<IsReferenced, (tenant::Id, inventory_item::Id)>>,
            Ok = IsReferenced,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<InventoryItem, inventory_item::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = InventoryItem;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteInventoryItem,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteInventoryItem { tenant_id, item_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with documents being created for the `InventoryItem`.
        tx.execute(Lock(By::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let item = tx
            .execute(Select(By::<Option<InventoryItem>, _>::new((
                tenant_id, item_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ItemNotExists(item_id))
            .map_err(tracerr::wrap!())?;

        let referenced = tx
            .execute(Select(By::<IsReferenced, _>::new((tenant_id, item_id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *referenced {
            return Err(tracerr::new!(E::ItemReferenced(item_id)));
        }

        tx.execute(Delete(By::<InventoryItem, _>::new(item_id)))
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

/// Error of [`DeleteInventoryItem`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`InventoryItem`] with the provided ID does not exist.
    #[display("`InventoryItem(id: {_0})` does not exist")]
    #[from(ignore)]
    ItemNotExists(#[error(not(source))] inventory_item::Id),

    /// [`InventoryItem`] is used by a [`SalesOrder`] or an [`Invoice`].
    #[display("`InventoryItem(id: {_0})` is referenced by documents")]
    #[from(ignore)]
    ItemReferenced(#[error(not(source))] inventory_item::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::ItemNotExists(_) => Kind::NotFound,
            Self::ItemReferenced(_) => Kind::Conflict,
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::tenant,
        error::{Classify as _, Kind},
        fixture, query, Command as _, Query as _,
    };

    use super::DeleteInventoryItem;

    #[tokio::test]
    async fn deletes_unused_item_only() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let used = fixture::item(&svc, tenant_id, "Widget A", 249_900).await;
        let unused = fixture::item(&svc, tenant_id, "Widget B", 150_000).await;
        _ = fixture::sales_order(&svc, &john, &[(&used, 1)]).await;

        let err = svc
            .execute(DeleteInventoryItem {
                tenant_id,
                item_id: used.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Kind::Conflict);

        _ = svc
            .execute(DeleteInventoryItem {
                tenant_id,
                item_id: unused.id,
            })
            .await
            .unwrap();

        let left = svc
            .execute(query::inventory_items::OfTenant::by(tenant_id))
            .await
            .unwrap();
        assert_eq!(left, vec![used]);
    }
}
