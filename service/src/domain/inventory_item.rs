//! [`InventoryItem`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money, Percent};
use derive_more::{Display, Into};

#[cfg(doc)]
use crate::domain::{LineItem, Tenant};
use crate::domain::{define_id, define_text, tenant, Owned};

/// Catalog item of a [`Tenant`], sold through [`LineItem`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InventoryItem {
    /// ID of this [`InventoryItem`].
    pub id: Id,

    /// ID of the [`Tenant`] this [`InventoryItem`] belongs to.
    pub tenant_id: tenant::Id,

    /// [`Name`] of this [`InventoryItem`].
    pub name: Name,

    /// [`Description`] of this [`InventoryItem`].
    pub description: Option<Description>,

    /// Current [`UnitPrice`] of this [`InventoryItem`].
    ///
    /// Changing it never affects already issued documents, as they capture
    /// the price at their creation.
    pub unit_price: UnitPrice,

    /// Tax rate applied to this [`InventoryItem`] sales.
    pub tax_rate: Percent,

    /// Quantity on hand, informational only.
    pub stock: Stock,

    /// [`DateTime`] when this [`InventoryItem`] was created.
    pub created_at: CreationDateTime,
}

impl Owned for InventoryItem {
    fn tenant_id(&self) -> tenant::Id {
        self.tenant_id
    }
}

define_id! {
    /// ID of an [`InventoryItem`].
    Id
}

define_text! {
    /// Name of an [`InventoryItem`].
    Name, max = 512
}

define_text! {
    /// Description of an [`InventoryItem`].
    Description, max = 4096
}

/// Non-negative price of a single [`InventoryItem`] unit.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Into, PartialEq)]
pub struct UnitPrice(Money);

impl UnitPrice {
    /// Creates a new [`UnitPrice`] if the provided `amount` is not negative.
    #[must_use]
    pub fn new(amount: Money) -> Option<Self> {
        (!amount.is_negative()).then_some(Self(amount))
    }

    /// Returns the [`Money`] amount of this [`UnitPrice`].
    #[must_use]
    pub const fn amount(self) -> Money {
        self.0
    }
}

/// Non-negative quantity of [`InventoryItem`] units on hand.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Into, PartialEq)]
pub struct Stock(i32);

impl Stock {
    /// Creates a new [`Stock`] if the provided `quantity` is not negative.
    #[must_use]
    pub fn new(quantity: i32) -> Option<Self> {
        (quantity >= 0).then_some(Self(quantity))
    }
}

/// [`DateTime`] when an [`InventoryItem`] was created.
pub type CreationDateTime = DateTimeOf<(InventoryItem, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::Money;

    use super::{Stock, UnitPrice};

    #[test]
    fn unit_price_is_not_negative() {
        assert!(UnitPrice::new(Money::from_minor(249_900)).is_some());
        assert!(UnitPrice::new(Money::ZERO).is_some());
        assert!(UnitPrice::new(Money::from_minor(-1)).is_none());
    }

    #[test]
    fn stock_is_not_negative() {
        assert_eq!(Stock::new(0), Some(Stock::default()));
        assert!(Stock::new(25).is_some());
        assert!(Stock::new(-1).is_none());
    }
}
