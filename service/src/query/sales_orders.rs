//! [`Query`] collection related to multiple [`SalesOrder`]s.

use common::operations::By;

use crate::domain::{tenant, SalesOrder};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`SalesOrder`]s of a [`tenant`] in their creation order.
pub type OfTenant = DatabaseQuery<By<Vec<SalesOrder>, tenant::Id>>;
