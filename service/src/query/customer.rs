//! [`Query`] collection related to a single [`Customer`].

use common::operations::By;

use crate::domain::{customer, tenant, Customer};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Customer`] by its [`customer::Id`] within a [`tenant`].
pub type ById = DatabaseQuery<By<Option<Customer>, (tenant::Id, customer::Id)>>;
