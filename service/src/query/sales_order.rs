//! [`Query`] collection related to a single [`SalesOrder`].

use common::operations::By;

use crate::domain::{sales_order, tenant, SalesOrder};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`SalesOrder`] by its [`sales_order::Id`] within a [`tenant`].
pub type ById =
    DatabaseQuery<By<Option<SalesOrder>, (tenant::Id, sales_order::Id)>>;
