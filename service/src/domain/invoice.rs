//! [`Invoice`] definitions.

use common::{define_kind, unit, DateTime, DateTimeOf, Money};
use derive_more::{Display, Error, From, Into};

#[cfg(doc)]
use crate::domain::Tenant;
use crate::domain::{
    customer, define_id, define_text,
    line::{CalculationError, Totals},
    sales_order, tenant, LineItem, Owned,
};

/// Invoice billed to a customer, optionally for a sales order.
///
/// Amounts are never stored: they're recalculated from the [`LineItem`]s
/// on every read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    pub id: Id,

    /// ID of the [`Tenant`] this [`Invoice`] belongs to.
    pub tenant_id: tenant::Id,

    /// Sequential [`Number`] of this [`Invoice`] within its [`Tenant`].
    pub number: Number,

    /// ID of the billed [`Customer`].
    ///
    /// [`Customer`]: crate::domain::Customer
    pub customer_id: customer::Id,

    /// ID of the invoiced [`SalesOrder`], if any.
    ///
    /// [`SalesOrder`]: crate::domain::SalesOrder
    pub sales_order_id: Option<sales_order::Id>,

    /// Billed [`LineItem`]s, at least one.
    pub items: Vec<LineItem>,

    /// [`DateTime`] when this [`Invoice`] was issued.
    pub issued_at: IssueDateTime,

    /// [`DateTime`] when this [`Invoice`] is due, never before
    /// [`Invoice::issued_at`].
    pub due_at: DueDateTime,

    /// Stored [`Status`] of this [`Invoice`].
    ///
    /// Never [`Status::Overdue`], use [`Invoice::status_at()`] for the
    /// effective one.
    pub status: Status,

    /// [`Notes`] printed on this [`Invoice`].
    pub notes: Option<Notes>,

    /// Payment [`Terms`] printed on this [`Invoice`].
    pub terms: Option<Terms>,

    /// [`DateTime`] when this [`Invoice`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Invoice`] was marked as paid.
    pub paid_at: Option<PaymentDateTime>,

    /// [`DateTime`] when this [`Invoice`] was cancelled.
    pub cancelled_at: Option<CancellationDateTime>,
}

impl Invoice {
    /// Returns the effective [`Status`] of this [`Invoice`] at the provided
    /// moment: a [`Status::Pending`] one past its due date is
    /// [`Status::Overdue`].
    ///
    /// Dates are compared by calendar day, so an [`Invoice`] stays
    /// [`Status::Pending`] during the whole day it's due.
    #[must_use]
    pub fn status_at(&self, now: DateTime) -> Status {
        let due_day = self.due_at.coerce::<()>().start_of_day();
        if self.status == Status::Pending && now.start_of_day() > due_day {
            Status::Overdue
        } else {
            self.status
        }
    }

    /// Returns the effective [`Status`] of this [`Invoice`] right now.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status_at(DateTime::now())
    }

    /// Returns the amount of this [`Invoice`]: the sum of
    /// `quantity * unit price` over its [`LineItem`]s.
    ///
    /// # Errors
    ///
    /// If the stored [`LineItem`]s cannot be summed up.
    pub fn amount(&self) -> Result<Money, CalculationError> {
        self.totals().map(|t| t.sub_total)
    }

    /// Returns the [`Totals`] of this [`Invoice`], including the tax.
    ///
    /// # Errors
    ///
    /// If the stored [`LineItem`]s cannot be summed up.
    pub fn totals(&self) -> Result<Totals, CalculationError> {
        Totals::of(&self.items)
    }

    /// Marks this [`Invoice`] as paid.
    ///
    /// # Errors
    ///
    /// If this [`Invoice`] is already paid or cancelled.
    pub fn mark_paid(
        &mut self,
        at: PaymentDateTime,
    ) -> Result<(), TransitionError> {
        self.ensure_open(Status::Paid, at.coerce())?;
        self.status = Status::Paid;
        self.paid_at = Some(at);
        Ok(())
    }

    /// Cancels this [`Invoice`].
    ///
    /// # Errors
    ///
    /// If this [`Invoice`] is already paid or cancelled.
    pub fn cancel(
        &mut self,
        at: CancellationDateTime,
    ) -> Result<(), TransitionError> {
        self.ensure_open(Status::Cancelled, at.coerce())?;
        self.status = Status::Cancelled;
        self.cancelled_at = Some(at);
        Ok(())
    }

    /// Ensures this [`Invoice`] is still [`Status::Pending`] or
    /// [`Status::Overdue`] to be moved into the `target` [`Status`].
    fn ensure_open(
        &self,
        target: Status,
        now: DateTime,
    ) -> Result<(), TransitionError> {
        match self.status_at(now) {
            Status::Pending | Status::Overdue => Ok(()),
            from @ (Status::Paid | Status::Cancelled) => {
                Err(TransitionError { from, to: target })
            }
        }
    }
}

impl Owned for Invoice {
    fn tenant_id(&self) -> tenant::Id {
        self.tenant_id
    }
}

define_id! {
    /// ID of an [`Invoice`].
    Id
}

/// Sequential number of an [`Invoice`], displayed as `INV-00042`.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[display("INV-{_0:05}")]
pub struct Number(u32);

define_text! {
    /// Free-form notes of an [`Invoice`].
    Notes, max = 4096
}

define_text! {
    /// Payment terms of an [`Invoice`].
    Terms, max = 4096
}

define_kind! {
    #[doc = "Status of an [`Invoice`]."]
    enum Status {
        #[doc = "Awaiting payment."]
        Pending,

        #[doc = "Paid, terminal."]
        Paid,

        #[doc = "Pending past its due date, never stored."]
        Overdue,

        #[doc = "Cancelled, terminal."]
        Cancelled,
    }
}

/// Error of an illegal [`Invoice`] [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("`Invoice` cannot move from `{from}` to `{to}`")]
pub struct TransitionError {
    /// Effective [`Status`] of the [`Invoice`].
    pub from: Status,

    /// Requested [`Status`].
    pub to: Status,
}

/// Marker type indicating an [`Invoice`] issuance.
#[derive(Clone, Copy, Debug)]
pub struct Issue;

/// Marker type indicating an [`Invoice`] payment deadline.
#[derive(Clone, Copy, Debug)]
pub struct Due;

/// Marker type indicating an [`Invoice`] payment.
#[derive(Clone, Copy, Debug)]
pub struct Payment;

/// [`DateTime`] when an [`Invoice`] was created.
pub type CreationDateTime = DateTimeOf<(Invoice, unit::Creation)>;

/// [`DateTime`] when an [`Invoice`] was issued.
pub type IssueDateTime = DateTimeOf<(Invoice, Issue)>;

/// [`DateTime`] when an [`Invoice`] is due.
pub type DueDateTime = DateTimeOf<(Invoice, Due)>;

/// [`DateTime`] when an [`Invoice`] was paid.
pub type PaymentDateTime = DateTimeOf<(Invoice, Payment)>;

/// [`DateTime`] when an [`Invoice`] was cancelled.
pub type CancellationDateTime = DateTimeOf<(Invoice, unit::Decision)>;
