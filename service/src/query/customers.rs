//! [`Query`] collection related to multiple [`Customer`]s.

use common::operations::By;

use crate::domain::{tenant, Customer};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the [`Customer`]s of a [`tenant`] in their creation order.
pub type OfTenant = DatabaseQuery<By<Vec<Customer>, tenant::Id>>;
