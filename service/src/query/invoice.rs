//! [`Query`] collection related to a single [`Invoice`].

use common::operations::By;

use crate::domain::{invoice, tenant, Invoice};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Invoice`] by its [`invoice::Id`] within a [`tenant`].
pub type ById = DatabaseQuery<By<Option<Invoice>, (tenant::Id, invoice::Id)>>;
