//! [`InventoryItem`]-related definitions.

use std::future;

use common::{DateTime, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
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

/// A catalog item of the current tenant.
#[derive(Clone, Debug)]
pub struct InventoryItem {
    /// ID of this [`InventoryItem`].
    id: Id,

    /// ID of the tenant owning this [`InventoryItem`].
    tenant_id: tenant::Id,

    /// Underlying [`domain::InventoryItem`].
    item: OnceCell<domain::InventoryItem>,
}

impl From<domain::InventoryItem> for InventoryItem {
    fn from(item: domain::InventoryItem) -> Self {
        Self {
            id: item.id.into(),
            tenant_id: item.tenant_id,
            item: OnceCell::new_with(Some(item)),
        }
    }
}

impl InventoryItem {
    /// Creates a new [`InventoryItem`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`InventoryItem`] with the provided ID exists
    /// in the provided tenant, otherwise accessing this [`InventoryItem`]
    /// will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(
        id: impl Into<Id>,
        tenant_id: tenant::Id,
    ) -> Self {
        Self {
            id: id.into(),
            tenant_id,
            item: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::InventoryItem`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::InventoryItem`] doesn't exist.
    async fn item(
        &self,
        ctx: &Context,
    ) -> Result<&domain::InventoryItem, Error> {
        let key = (self.tenant_id, self.id.into());
        self.item
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::inventory_item::ById::by(key))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|i| {
                        future::ready(i.ok_or_else(|| {
                            api::query::InventoryItemError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A catalog item of the current tenant.
#[graphql_object(context = Context)]
impl InventoryItem {
    /// Unique identifier of this `InventoryItem`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InventoryItem.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `InventoryItem`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InventoryItem.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.item(ctx).await?.name.clone().into())
    }

    /// Description of this `InventoryItem`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InventoryItem.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<Description>, Error> {
        Ok(self.item(ctx).await?.description.clone().map(Into::into))
    }

    /// Current price of a single unit of this `InventoryItem`.
    ///
    /// Documents capture it at their creation, so changing it never affects
    /// them.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InventoryItem.unitPrice",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn unit_price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.item(ctx).await?.unit_price.amount())
    }

    /// Tax rate applied to sales of this `InventoryItem`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InventoryItem.taxRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn tax_rate(&self, ctx: &Context) -> Result<Percent, Error> {
        Ok(self.item(ctx).await?.tax_rate)
    }

    /// Quantity of this `InventoryItem` on hand.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InventoryItem.stock",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn stock(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.item(ctx).await?.stock.into())
    }

    /// `DateTime` when this `InventoryItem` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "InventoryItem.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.item(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of an `InventoryItem`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::inventory_item::Id)]
#[into(domain::inventory_item::Id)]
#[graphql(name = "InventoryItemId", transparent)]
pub struct Id(Uuid);

/// Name of an `InventoryItem`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "InventoryItemName",
    with = scalar::Via::<domain::inventory_item::Name>,
)]
pub struct Name(domain::inventory_item::Name);

/// Description of an `InventoryItem`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "InventoryItemDescription",
    with = scalar::Via::<domain::inventory_item::Description>,
)]
pub struct Description(domain::inventory_item::Description);
