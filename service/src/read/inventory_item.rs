//! [`InventoryItem`]-related read definitions.

use derive_more::Deref;

#[cfg(doc)]
use crate::domain::{InventoryItem, Invoice, SalesOrder};

/// Indicator whether an [`InventoryItem`] is used by a line item of any
/// [`SalesOrder`] or [`Invoice`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct IsReferenced(pub bool);
