//! [`LineItem`] definitions and the [`Totals`] calculator.

use common::{Money, Percent};
use derive_more::{Display, Error};

#[cfg(doc)]
use crate::domain::{Invoice, SalesOrder};
use crate::domain::{define_text, inventory_item, InventoryItem};

/// Line of a [`SalesOrder`] or an [`Invoice`].
///
/// Captures the [`InventoryItem`] price and tax rate at the moment the
/// document is created, so later catalog changes never alter it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineItem {
    /// ID of the sold [`InventoryItem`].
    pub item_id: inventory_item::Id,

    /// Number of sold units, positive for a valid line.
    pub quantity: i32,

    /// Captured price of a single unit.
    pub unit_price: Money,

    /// Captured tax rate.
    pub tax_rate: Percent,

    /// Captured [`HsnSacCode`] classification, if any.
    pub hsn_sac_code: Option<HsnSacCode>,
}

impl LineItem {
    /// Validates this [`LineItem`] for being used in calculations.
    ///
    /// # Errors
    ///
    /// If the quantity is not positive or the unit price is negative.
    pub fn validate(&self) -> Result<(), CalculationError> {
        use CalculationError as E;

        if self.quantity <= 0 {
            return Err(E::NonPositiveQuantity(self.item_id));
        }
        if self.unit_price.is_negative() {
            return Err(E::NegativeUnitPrice(self.item_id));
        }
        Ok(())
    }

    /// Returns the amount of this [`LineItem`] before tax
    /// (`quantity * unit price`).
    ///
    /// # Errors
    ///
    /// If this [`LineItem`] is invalid or the amount overflows.
    pub fn amount(&self) -> Result<Money, CalculationError> {
        self.validate()?;
        self.unit_price
            .checked_mul(self.quantity.into())
            .ok_or(CalculationError::Overflow)
    }

    /// Returns the tax of this [`LineItem`], rounded half-up to whole minor
    /// units.
    ///
    /// # Errors
    ///
    /// If this [`LineItem`] is invalid or the tax overflows.
    pub fn tax(&self) -> Result<Money, CalculationError> {
        self.tax_rate
            .share_of(self.amount()?)
            .ok_or(CalculationError::Overflow)
    }
}

/// Requested line of a document being created, before the price and the
/// tax rate are captured from the catalog.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Draft {
    /// ID of the [`InventoryItem`] to sell.
    pub item_id: inventory_item::Id,

    /// Number of units to sell.
    pub quantity: i32,

    /// [`HsnSacCode`] classification of the line, if any.
    pub hsn_sac_code: Option<HsnSacCode>,
}

impl Draft {
    /// Turns this [`Draft`] into a [`LineItem`] capturing the current price
    /// and tax rate of the provided [`InventoryItem`].
    #[must_use]
    pub fn capture(self, item: &InventoryItem) -> LineItem {
        LineItem {
            item_id: self.item_id,
            quantity: self.quantity,
            unit_price: item.unit_price.amount(),
            tax_rate: item.tax_rate,
            hsn_sac_code: self.hsn_sac_code,
        }
    }
}

define_text! {
    /// Harmonized System of Nomenclature (goods) or Services Accounting Code
    /// of a [`LineItem`].
    HsnSacCode, max = 16
}

/// Monetary totals of a document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Totals {
    /// Sum of line amounts before tax.
    pub sub_total: Money,

    /// Sum of per-line rounded taxes.
    pub tax_amount: Money,

    /// `sub_total + tax_amount`.
    pub total: Money,
}

impl Totals {
    /// Calculates [`Totals`] of the provided [`LineItem`]s.
    ///
    /// Tax is rounded per line rather than on the aggregate, so the result
    /// doesn't depend on the summation order.
    ///
    /// # Errors
    ///
    /// If any of the [`LineItem`]s is invalid, or any sum overflows.
    pub fn of<'a, I>(items: I) -> Result<Self, CalculationError>
    where
        I: IntoIterator<Item = &'a LineItem>,
    {
        use CalculationError as E;

        let (amounts, taxes): (Vec<_>, Vec<_>) = items
            .into_iter()
            .map(|item| Ok((item.amount()?, item.tax()?)))
            .collect::<Result<Vec<_>, E>>()?
            .into_iter()
            .unzip();
        let sub_total = Money::checked_sum(amounts).ok_or(E::Overflow)?;
        let tax_amount = Money::checked_sum(taxes).ok_or(E::Overflow)?;
        Ok(Self {
            sub_total,
            tax_amount,
            total: sub_total.checked_add(tax_amount).ok_or(E::Overflow)?,
        })
    }
}

/// Error of calculating [`Totals`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum CalculationError {
    /// [`LineItem`] has zero or negative quantity.
    #[display("`LineItem(item_id: {_0})` quantity must be positive")]
    NonPositiveQuantity(#[error(not(source))] inventory_item::Id),

    /// [`LineItem`] has a negative unit price.
    #[display("`LineItem(item_id: {_0})` unit price must not be negative")]
    NegativeUnitPrice(#[error(not(source))] inventory_item::Id),

    /// Amounts don't fit into [`Money`].
    #[display("Amount overflow")]
    Overflow,
}

#[cfg(test)]
mod spec {
    use common::{Money, Percent};

    use crate::domain::inventory_item;

    use super::{CalculationError, LineItem, Totals};

    fn line(quantity: i32, unit_price: i64, tax_rate: &str) -> LineItem {
        LineItem {
            item_id: inventory_item::Id::new(),
            quantity,
            unit_price: Money::from_minor(unit_price),
            tax_rate: tax_rate.parse::<Percent>().unwrap(),
            hsn_sac_code: None,
        }
    }

    #[test]
    fn widget_scenario() {
        let totals = Totals::of(&[line(2, 249_900, "18")]).unwrap();

        assert_eq!(
            totals,
            Totals {
                sub_total: Money::from_minor(499_800),
                tax_amount: Money::from_minor(89_964),
                total: Money::from_minor(589_764),
            },
        );
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(Totals::of(std::iter::empty()).unwrap(), Totals::default());
    }

    #[test]
    fn rounds_tax_per_line() {
        // Each line's 0.5 tax rounds up to 1, unlike the aggregated 1.0.
        let items = [line(1, 5, "10"), line(1, 5, "10")];

        let totals = Totals::of(&items).unwrap();

        assert_eq!(totals.sub_total, Money::from_minor(10));
        assert_eq!(totals.tax_amount, Money::from_minor(2));
        assert_eq!(totals.total, Money::from_minor(12));
    }

    #[test]
    fn total_is_exact_sum() {
        let items = [
            line(3, 1_999, "12.5"),
            line(7, 333, "5"),
            line(1, 0, "28"),
            line(11, 101, "0"),
        ];

        let totals = Totals::of(&items).unwrap();

        assert_eq!(
            totals.sub_total.minor() + totals.tax_amount.minor(),
            totals.total.minor(),
        );
        assert_eq!(totals.sub_total, Money::from_minor(5_997 + 2_331 + 1_111));
        // 749.625 and 116.55 round to 750 and 117.
        assert_eq!(totals.tax_amount, Money::from_minor(750 + 117));
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let zero = line(0, 100, "0");
        let negative = line(-1, 100, "0");

        assert_eq!(
            Totals::of([&zero]),
            Err(CalculationError::NonPositiveQuantity(zero.item_id)),
        );
        assert_eq!(
            Totals::of([&negative]),
            Err(CalculationError::NonPositiveQuantity(negative.item_id)),
        );
    }

    #[test]
    fn rejects_negative_price() {
        let item = line(1, -100, "0");

        assert_eq!(
            Totals::of([&item]),
            Err(CalculationError::NegativeUnitPrice(item.item_id)),
        );
    }

    #[test]
    fn detects_overflow() {
        assert_eq!(
            Totals::of(&[line(2, i64::MAX / 2 + 1, "0")]),
            Err(CalculationError::Overflow),
        );
        assert_eq!(
            Totals::of(&[line(1, i64::MAX, "0"), line(1, 1, "0")]),
            Err(CalculationError::Overflow),
        );
    }
}
