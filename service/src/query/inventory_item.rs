//! [`Query`] collection related to a single [`InventoryItem`].

use common::operations::By;

use crate::domain::{inventory_item, tenant, InventoryItem};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`InventoryItem`] by its [`inventory_item::Id`] within a
/// [`tenant`].
pub type ById =
    DatabaseQuery<By<Option<InventoryItem>, (tenant::Id, inventory_item::Id)>>;
