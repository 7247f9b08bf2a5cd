//! [`Customer`]-related definitions.

use std::future;

use common::DateTime;
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

/// A customer of the current tenant.
#[derive(Clone, Debug)]
pub struct Customer {
    /// ID of this [`Customer`].
    id: Id,

    /// ID of the tenant owning this [`Customer`].
    tenant_id: tenant::Id,

    /// Underlying [`domain::Customer`].
    customer: OnceCell<domain::Customer>,
}

impl From<domain::Customer> for Customer {
    fn from(customer: domain::Customer) -> Self {
        Self {
            id: customer.id.into(),
            tenant_id: customer.tenant_id,
            customer: OnceCell::new_with(Some(customer)),
        }
    }
}

impl Customer {
    /// Creates a new [`Customer`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Customer`] with the provided ID exists in
    /// the provided tenant, otherwise accessing this [`Customer`] will
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
            customer: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Customer`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Customer`] doesn't exist.
    async fn customer(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Customer, Error> {
        let key = (self.tenant_id, self.id.into());
        self.customer
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::customer::ById::by(key))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::CustomerError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A customer of the current tenant.
#[graphql_object(context = Context)]
impl Customer {
    /// Unique identifier of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.customer(ctx).await?.name.clone().into())
    }

    /// Email of this `Customer`, unique within the tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.email",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn email(&self, ctx: &Context) -> Result<Email, Error> {
        Ok(self.customer(ctx).await?.email.clone().into())
    }

    /// Phone of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.phone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn phone(&self, ctx: &Context) -> Result<Option<Phone>, Error> {
        Ok(self.customer(ctx).await?.phone.clone().map(Into::into))
    }

    /// Postal address of this `Customer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn address(
        &self,
        ctx: &Context,
    ) -> Result<Option<Address>, Error> {
        Ok(self.customer(ctx).await?.address.clone().map(Into::into))
    }

    /// `DateTime` when this `Customer` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Customer.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.customer(ctx).await?.created_at.coerce())
    }
}

/// Unique identifier of a `Customer`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::customer::Id)]
#[into(domain::customer::Id)]
#[graphql(name = "CustomerId", transparent)]
pub struct Id(Uuid);

/// Name of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerName",
    with = scalar::Via::<domain::customer::Name>,
)]
pub struct Name(domain::customer::Name);

/// Email of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerEmail",
    with = scalar::Via::<domain::customer::Email>,
)]
pub struct Email(domain::customer::Email);

/// Phone of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerPhone",
    with = scalar::Via::<domain::customer::Phone>,
)]
pub struct Phone(domain::customer::Phone);

/// Postal address of a `Customer`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CustomerAddress",
    with = scalar::Via::<domain::customer::Address>,
)]
pub struct Address(domain::customer::Address);
