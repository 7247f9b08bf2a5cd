//! [`Customer`]-related read definitions.

use derive_more::Deref;

#[cfg(doc)]
use crate::domain::{Customer, Invoice, SalesOrder};

/// Indicator whether a [`Customer`] is referenced by any [`SalesOrder`] or
/// [`Invoice`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct IsReferenced(pub bool);

impl PartialEq<bool> for IsReferenced {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}
