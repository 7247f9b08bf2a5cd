//! [`Invoice`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// An invoice of the current tenant.
#[derive(Clone, Debug, From)]
pub struct Invoice(domain::Invoice);

/// An invoice of the current tenant.
///
/// Amounts are always derived from the `items`.
#[graphql_object(context = Context)]
impl Invoice {
    /// Unique identifier of this `Invoice`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Sequential number of this `Invoice` within the tenant, like
    /// `INV-00042`.
    #[must_use]
    pub fn number(&self) -> String {
        self.0.number.to_string()
    }

    /// Billed `Customer`.
    #[must_use]
    pub fn customer(&self) -> api::Customer {
        #[expect(unsafe_code, reason = "referenced `Customer`s persist")]
        unsafe {
            api::Customer::new_unchecked(self.0.customer_id, self.0.tenant_id)
        }
    }

    /// Invoiced `SalesOrder`, if any.
    #[must_use]
    pub fn sales_order(&self) -> Option<api::SalesOrder> {
        self.0.sales_order_id.map(|id| {
            #[expect(unsafe_code, reason = "`SalesOrder`s are never deleted")]
            unsafe {
                api::SalesOrder::new_unchecked(id, self.0.tenant_id)
            }
        })
    }

    /// Billed lines.
    #[must_use]
    pub fn items(&self) -> Vec<api::LineItem> {
        api::LineItem::of_document(self.0.tenant_id, &self.0.items)
    }

    /// Amount of this `Invoice`: the sum of `quantity * unitPrice` over its
    /// lines.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.amount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn amount(&self, ctx: &Context) -> Result<Money, Error> {
        self.0
            .amount()
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Sum of the line amounts before tax, same as `amount`.
    pub fn sub_total(&self, ctx: &Context) -> Result<Money, Error> {
        self.amount(ctx)
    }

    /// Sum of the per-line taxes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.taxAmount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn tax_amount(&self, ctx: &Context) -> Result<Money, Error> {
        self.0
            .totals()
            .map(|t| t.tax_amount)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// `subTotal + taxAmount`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Invoice.total",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total(&self, ctx: &Context) -> Result<Money, Error> {
        self.0
            .totals()
            .map(|t| t.total)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Effective status of this `Invoice`.
    ///
    /// `OVERDUE` is never stored: a `PENDING` invoice past its `dueDate`
    /// reports it.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status().into()
    }

    /// `DateTime` when this `Invoice` was issued.
    #[must_use]
    pub fn issue_date(&self) -> DateTime {
        self.0.issued_at.coerce()
    }

    /// `DateTime` when this `Invoice` is due.
    #[must_use]
    pub fn due_date(&self) -> DateTime {
        self.0.due_at.coerce()
    }

    /// Notes printed on this `Invoice`.
    #[must_use]
    pub fn notes(&self) -> Option<Notes> {
        self.0.notes.clone().map(Into::into)
    }

    /// Payment terms printed on this `Invoice`.
    #[must_use]
    pub fn terms(&self) -> Option<Terms> {
        self.0.terms.clone().map(Into::into)
    }

    /// `DateTime` when this `Invoice` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Invoice` was marked as paid.
    #[must_use]
    pub fn paid_at(&self) -> Option<DateTime> {
        self.0.paid_at.map(|at| at.coerce())
    }

    /// `DateTime` when this `Invoice` was cancelled.
    #[must_use]
    pub fn cancelled_at(&self) -> Option<DateTime> {
        self.0.cancelled_at.map(|at| at.coerce())
    }
}

/// Unique identifier of an `Invoice`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::invoice::Id)]
#[into(domain::invoice::Id)]
#[graphql(name = "InvoiceId", transparent)]
pub struct Id(Uuid);

/// Free-form notes of an `Invoice`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "InvoiceNotes",
    with = scalar::Via::<domain::invoice::Notes>,
)]
pub struct Notes(domain::invoice::Notes);

/// Payment terms of an `Invoice`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "InvoiceTerms",
    with = scalar::Via::<domain::invoice::Terms>,
)]
pub struct Terms(domain::invoice::Terms);

/// Status of an `Invoice`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "InvoiceStatus")]
pub enum Status {
    /// Awaiting payment.
    Pending,

    /// Paid.
    Paid,

    /// Awaiting payment past its due date.
    Overdue,

    /// Cancelled.
    Cancelled,
}

impl From<domain::invoice::Status> for Status {
    fn from(status: domain::invoice::Status) -> Self {
        use domain::invoice::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Paid => Self::Paid,
            S::Overdue => Self::Overdue,
            S::Cancelled => Self::Cancelled,
        }
    }
}
