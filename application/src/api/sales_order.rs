//! [`SalesOrder`]-related definitions.

use std::future;

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{
    domain::{self, tenant},
    query, Query as _,
};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A sales order of the current tenant.
#[derive(Clone, Debug)]
pub struct SalesOrder {
    /// ID of this [`SalesOrder`].
    id: Id,

    /// ID of the tenant owning this [`SalesOrder`].
    tenant_id: tenant::Id,

    /// Underlying [`domain::SalesOrder`].
    order: OnceCell<domain::SalesOrder>,
}

impl From<domain::SalesOrder> for SalesOrder {
    fn from(order: domain::SalesOrder) -> Self {
        Self {
            id: order.id.into(),
            tenant_id: order.tenant_id,
            order: OnceCell::new_with(Some(order)),
        }
    }
}

impl SalesOrder {
    /// Creates a new [`SalesOrder`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`SalesOrder`] with the provided ID exists in
    /// the provided tenant, otherwise accessing this [`SalesOrder`] will
    /// result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(
        id: impl Into<Id>,
        tenant_id: tenant::Id,
    ) -> Self {
        Self {
            id: id.into(),
            tenant_id,
            order: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::SalesOrder`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::SalesOrder`] doesn't exist.
    async fn order(
        &self,
        ctx: &Context,
    ) -> Result<&domain::SalesOrder, Error> {
        let key = (self.tenant_id, self.id.into());
        self.order
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::sales_order::ById::by(key))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|o| {
                        future::ready(o.ok_or_else(|| {
                            api::query::SalesOrderError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A sales order of the current tenant.
#[graphql_object(context = Context)]
impl SalesOrder {
    /// Unique identifier of this `SalesOrder`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Sequential number of this `SalesOrder` within the tenant, like
    /// `SO-00042`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn number(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.order(ctx).await?.number.to_string())
    }

    /// Ordering `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.customer",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let customer_id = self.order(ctx).await?.customer_id;
        #[expect(unsafe_code, reason = "referenced `Customer`s persist")]
        let customer = unsafe {
            api::Customer::new_unchecked(customer_id, self.tenant_id)
        };
        Ok(customer)
    }

    /// Ordered lines.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.items",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn items(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::LineItem>, Error> {
        Ok(api::LineItem::of_document(
            self.tenant_id,
            &self.order(ctx).await?.items,
        ))
    }

    /// Sum of the line amounts before tax.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.subTotal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn sub_total(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.order(ctx).await?.totals.sub_total)
    }

    /// Sum of the per-line taxes.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.taxAmount",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn tax_amount(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.order(ctx).await?.totals.tax_amount)
    }

    /// `subTotal + taxAmount`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.total",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn total(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.order(ctx).await?.totals.total)
    }

    /// Place of supply determining the tax jurisdiction.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.placeOfSupply",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn place_of_supply(
        &self,
        ctx: &Context,
    ) -> Result<Option<PlaceOfSupply>, Error> {
        Ok(self.order(ctx).await?.place_of_supply.clone().map(Into::into))
    }

    /// Current status of this `SalesOrder`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.order(ctx).await?.status.into())
    }

    /// `DateTime` when this `SalesOrder` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.order(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `SalesOrder` was accepted or rejected.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "SalesOrder.decidedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn decided_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.order(ctx).await?.decided_at.map(|at| at.coerce()))
    }
}

/// Unique identifier of a `SalesOrder`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::sales_order::Id)]
#[into(domain::sales_order::Id)]
#[graphql(name = "SalesOrderId", transparent)]
pub struct Id(Uuid);

/// Place of supply of a `SalesOrder`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PlaceOfSupply",
    with = scalar::Via::<domain::sales_order::PlaceOfSupply>,
)]
pub struct PlaceOfSupply(domain::sales_order::PlaceOfSupply);

/// Status of a `SalesOrder`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "SalesOrderStatus")]
pub enum Status {
    /// Awaiting the tenant's decision.
    Pending,

    /// Accepted by the tenant.
    Accepted,

    /// Rejected by the tenant.
    Rejected,
}

impl From<domain::sales_order::Status> for Status {
    fn from(status: domain::sales_order::Status) -> Self {
        use domain::sales_order::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Accepted => Self::Accepted,
            S::Rejected => Self::Rejected,
        }
    }
}
