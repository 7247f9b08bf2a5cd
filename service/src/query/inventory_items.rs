//! [`Query`] collection related to multiple [`InventoryItem`]s.

use common::operations::By;

use crate::domain::{tenant, InventoryItem};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`InventoryItem`]s of a [`tenant`] in their creation order.
pub type OfTenant = DatabaseQuery<By<Vec<InventoryItem>, tenant::Id>>;
