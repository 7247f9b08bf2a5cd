//! [`Query`] collection related to multiple [`Invoice`]s.

use common::operations::By;

use crate::domain::{tenant, Invoice};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Invoice`]s of a [`tenant`] in their creation order.
pub type OfTenant = DatabaseQuery<By<Vec<Invoice>, tenant::Id>>;
