//! [`LineItem`]-related definitions.

use common::{Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use service::domain::{self, line::CalculationError, tenant};

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A line of a `SalesOrder` or an `Invoice`.
#[derive(Clone, Debug)]
pub struct LineItem {
    /// ID of the tenant owning the document of this [`LineItem`].
    tenant_id: tenant::Id,

    /// Underlying [`domain::LineItem`].
    line: domain::LineItem,
}

impl LineItem {
    /// Wraps the provided [`domain::LineItem`]s of a document owned by the
    /// provided tenant.
    pub(crate) fn of_document(
        tenant_id: tenant::Id,
        lines: &[domain::LineItem],
    ) -> Vec<Self> {
        lines
            .iter()
            .map(|line| Self {
                tenant_id,
                line: line.clone(),
            })
            .collect()
    }
}

/// A line of a `SalesOrder` or an `Invoice`, with the price and the tax rate
/// captured at the document creation.
#[graphql_object(context = Context)]
impl LineItem {
    /// Sold `InventoryItem`.
    #[must_use]
    pub fn item(&self) -> api::InventoryItem {
        #[expect(
            unsafe_code,
            reason = "referenced `InventoryItem`s cannot be deleted"
        )]
        unsafe {
            api::InventoryItem::new_unchecked(self.line.item_id, self.tenant_id)
        }
    }

    /// Number of sold units.
    #[must_use]
    pub fn quantity(&self) -> i32 {
        self.line.quantity
    }

    /// Captured price of a single unit.
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.line.unit_price
    }

    /// Captured tax rate.
    #[must_use]
    pub fn tax_rate(&self) -> Percent {
        self.line.tax_rate
    }

    /// HSN/SAC classification code of this line.
    #[must_use]
    pub fn hsn_sac_code(&self) -> Option<HsnSacCode> {
        self.line.hsn_sac_code.clone().map(Into::into)
    }

    /// Amount of this line before tax: `quantity * unitPrice`.
    pub fn amount(&self, ctx: &Context) -> Result<Money, Error> {
        self.line
            .amount()
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Tax of this line, rounded half-up to whole minor units.
    pub fn tax_amount(&self, ctx: &Context) -> Result<Money, Error> {
        self.line
            .tax()
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

/// Requested line of a document being created.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "LineItemInput")]
pub struct Input {
    /// ID of the `InventoryItem` to sell.
    pub item_id: api::inventory_item::Id,

    /// Number of units to sell, positive.
    pub quantity: i32,

    /// HSN/SAC classification code of the line.
    pub hsn_sac_code: Option<HsnSacCode>,
}

impl From<Input> for domain::line::Draft {
    fn from(input: Input) -> Self {
        let Input {
            item_id,
            quantity,
            hsn_sac_code,
        } = input;
        Self {
            item_id: item_id.into(),
            quantity,
            hsn_sac_code: hsn_sac_code.map(Into::into),
        }
    }
}

/// HSN (goods) or SAC (services) classification code of a `LineItem`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HsnSacCode",
    with = scalar::Via::<domain::line::HsnSacCode>,
)]
pub struct HsnSacCode(domain::line::HsnSacCode);

impl AsError for CalculationError {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}
