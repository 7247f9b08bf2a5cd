//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Fetches all the `Customer`s of the current tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "customers",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customers(ctx: &Context) -> Result<Vec<api::Customer>, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(query::customers::OfTenant::by(tenant_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|c| c.into_iter().map(Into::into).collect())
    }

    /// Returns the `Customer` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "customer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(query::customer::ById::by((tenant_id, id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CustomerError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches all the `InventoryItem`s of the current tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "inventoryItems",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn inventory_items(
        ctx: &Context,
    ) -> Result<Vec<api::InventoryItem>, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(query::inventory_items::OfTenant::by(tenant_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|i| i.into_iter().map(Into::into).collect())
    }

    /// Returns the `InventoryItem` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVENTORY_ITEM_NOT_EXISTS` - the `InventoryItem` with the
    ///                                 specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "inventoryItem",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn inventory_item(
        id: api::inventory_item::Id,
        ctx: &Context,
    ) -> Result<api::InventoryItem, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(query::inventory_item::ById::by((tenant_id, id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| InventoryItemError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches all the `SalesOrder`s of the current tenant in their creation
    /// order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "salesOrders",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn sales_orders(
        ctx: &Context,
    ) -> Result<Vec<api::SalesOrder>, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(query::sales_orders::OfTenant::by(tenant_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|o| o.into_iter().map(Into::into).collect())
    }

    /// Returns the `SalesOrder` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SALES_ORDER_NOT_EXISTS` - the `SalesOrder` with the specified ID
    ///                              does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "salesOrder",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn sales_order(
        id: api::sales_order::Id,
        ctx: &Context,
    ) -> Result<api::SalesOrder, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(query::sales_order::ById::by((tenant_id, id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| SalesOrderError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches all the `Invoice`s of the current tenant in their creation
    /// order.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "invoices",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn invoices(ctx: &Context) -> Result<Vec<api::Invoice>, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(query::invoices::OfTenant::by(tenant_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|i| i.into_iter().map(Into::into).collect())
    }

    /// Returns the `Invoice` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "invoice",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn invoice(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(query::invoice::ById::by((tenant_id, id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| InvoiceError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `TenantSettings` of the current tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "settings",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn settings(ctx: &Context) -> Result<api::Settings, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(query::tenant::Settings { tenant_id })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum CustomerError {
        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Customer` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum InventoryItemError {
        #[code = "INVENTORY_ITEM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`InventoryItem` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum SalesOrderError {
        #[code = "SALES_ORDER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`SalesOrder` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum InvoiceError {
        #[code = "INVOICE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Invoice` with the specified ID does not exist"]
        NotExists,
    }
}
