//! [`SalesOrder`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, Error, From, Into};

#[cfg(doc)]
use crate::domain::Tenant;
use crate::domain::{
    customer, define_id, define_text, line::Totals, tenant, LineItem, Owned,
};

/// Order placed by a customer, awaiting the [`Tenant`]'s decision.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SalesOrder {
    /// ID of this [`SalesOrder`].
    pub id: Id,

    /// ID of the [`Tenant`] this [`SalesOrder`] belongs to.
    pub tenant_id: tenant::Id,

    /// Sequential [`Number`] of this [`SalesOrder`] within its [`Tenant`].
    pub number: Number,

    /// ID of the ordering [`Customer`].
    ///
    /// [`Customer`]: crate::domain::Customer
    pub customer_id: customer::Id,

    /// Ordered [`LineItem`]s, at least one.
    pub items: Vec<LineItem>,

    /// [`Totals`] of the [`LineItem`]s, snapshotted at creation.
    pub totals: Totals,

    /// [`PlaceOfSupply`] of this [`SalesOrder`].
    pub place_of_supply: Option<PlaceOfSupply>,

    /// Current [`Status`] of this [`SalesOrder`].
    pub status: Status,

    /// [`DateTime`] when this [`SalesOrder`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`SalesOrder`] was accepted or rejected.
    pub decided_at: Option<DecisionDateTime>,
}

impl SalesOrder {
    /// Applies the provided [`Decision`] to this [`SalesOrder`].
    ///
    /// # Errors
    ///
    /// If this [`SalesOrder`] is not [`Status::Pending`] anymore.
    pub fn decide(
        &mut self,
        decision: Decision,
        at: DecisionDateTime,
    ) -> Result<(), NotPendingError> {
        if self.status != Status::Pending {
            return Err(NotPendingError(self.status));
        }
        self.status = match decision {
            Decision::Accept => Status::Accepted,
            Decision::Reject => Status::Rejected,
        };
        self.decided_at = Some(at);
        Ok(())
    }
}

impl Owned for SalesOrder {
    fn tenant_id(&self) -> tenant::Id {
        self.tenant_id
    }
}

define_id! {
    /// ID of a [`SalesOrder`].
    Id
}

/// Sequential number of a [`SalesOrder`], displayed as `SO-00042`.
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
#[display("SO-{_0:05}")]
pub struct Number(u32);

define_text! {
    /// Place of supply (a state or a region) of a [`SalesOrder`],
    /// determining the applicable tax jurisdiction.
    PlaceOfSupply, max = 128
}

define_kind! {
    #[doc = "Status of a [`SalesOrder`]."]
    enum Status {
        #[doc = "Awaiting decision."]
        Pending,

        #[doc = "Accepted by the [`Tenant`], terminal."]
        Accepted,

        #[doc = "Rejected by the [`Tenant`], terminal."]
        Rejected,
    }
}

/// Decision upon a [`Status::Pending`] [`SalesOrder`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Decision {
    /// Moves a [`SalesOrder`] to [`Status::Accepted`].
    #[display("accept")]
    Accept,

    /// Moves a [`SalesOrder`] to [`Status::Rejected`].
    #[display("reject")]
    Reject,
}

/// Error of deciding upon a [`SalesOrder`] which is not
/// [`Status::Pending`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("`SalesOrder` is already `{_0}`")]
pub struct NotPendingError(#[error(not(source))] pub Status);

/// [`DateTime`] when a [`SalesOrder`] was created.
pub type CreationDateTime = DateTimeOf<(SalesOrder, unit::Creation)>;

/// [`DateTime`] when a [`SalesOrder`] was accepted or rejected.
pub type DecisionDateTime = DateTimeOf<(SalesOrder, unit::Decision)>;
