//! GraphQL [`Mutation`]s definitions.

use common::{DateTime, Money, Percent};
use juniper::{graphql_object, Nullable};
use service::{
    command,
    domain::{inventory_item, sales_order::Decision},
    Command as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Customer` of the current tenant.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided `CustomerEmail` is used by another
    ///                      `Customer` of the tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createCustomer",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_customer(
        name: api::customer::Name,
        email: api::customer::Email,
        phone: Option<api::customer::Phone>,
        address: Option<api::customer::Address>,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::CreateCustomer {
                tenant_id,
                name: name.into(),
                email: email.into(),
                phone: phone.map(Into::into),
                address: address.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided fields of the `Customer`.
    ///
    /// Omitted arguments are left intact, `null` ones are cleared.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist;
    /// - `EMAIL_OCCUPIED` - provided `CustomerEmail` is used by another
    ///                      `Customer` of the tenant.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateCustomer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_customer(
        id: api::customer::Id,
        name: Option<api::customer::Name>,
        email: Option<api::customer::Email>,
        phone: Nullable<api::customer::Phone>,
        address: Nullable<api::customer::Address>,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::UpdateCustomer {
                tenant_id,
                customer_id: id.into(),
                name: name.map(Into::into),
                email: email.map(Into::into),
                phone: phone.explicit().map(|p| p.map(Into::into)),
                address: address.explicit().map(|a| a.map(Into::into)),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Customer`, returning it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist;
    /// - `CUSTOMER_REFERENCED` - the `Customer` is referenced by a
    ///                           `SalesOrder` or an `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteCustomer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::DeleteCustomer {
                tenant_id,
                customer_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `InventoryItem` of the current tenant.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NEGATIVE_UNIT_PRICE` - provided `unitPrice` is below zero;
    /// - `NEGATIVE_STOCK` - provided `stock` is below zero.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createInventoryItem",
            name = %name,
            otel.name = Self::SPAN_NAME,
            tax_rate = %tax_rate,
            unit_price = %unit_price,
        ),
    )]
    pub async fn create_inventory_item(
        name: api::inventory_item::Name,
        description: Option<api::inventory_item::Description>,
        unit_price: Money,
        tax_rate: Percent,
        stock: i32,
        ctx: &Context,
    ) -> Result<api::InventoryItem, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::CreateInventoryItem {
                tenant_id,
                name: name.into(),
                description: description.map(Into::into),
                unit_price: unit_price_of(unit_price).map_err(ctx.error())?,
                tax_rate,
                stock: stock_of(stock).map_err(ctx.error())?,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided fields of the `InventoryItem`.
    ///
    /// Price changes never affect existing documents.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVENTORY_ITEM_NOT_EXISTS` - the `InventoryItem` does not exist;
    /// - `NEGATIVE_UNIT_PRICE` - provided `unitPrice` is below zero;
    /// - `NEGATIVE_STOCK` - provided `stock` is below zero.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateInventoryItem",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_inventory_item(
        id: api::inventory_item::Id,
        name: Option<api::inventory_item::Name>,
        description: Nullable<api::inventory_item::Description>,
        unit_price: Option<Money>,
        tax_rate: Option<Percent>,
        stock: Option<i32>,
        ctx: &Context,
    ) -> Result<api::InventoryItem, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        let unit_price = unit_price
            .map(unit_price_of)
            .transpose()
            .map_err(ctx.error())?;
        let stock = stock.map(stock_of).transpose().map_err(ctx.error())?;
        ctx.service()
            .execute(command::UpdateInventoryItem {
                tenant_id,
                item_id: id.into(),
                name: name.map(Into::into),
                description: description.explicit().map(|d| d.map(Into::into)),
                unit_price,
                tax_rate,
                stock,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `InventoryItem`, returning it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVENTORY_ITEM_NOT_EXISTS` - the `InventoryItem` does not exist;
    /// - `INVENTORY_ITEM_REFERENCED` - the `InventoryItem` is sold by a
    ///                                 `SalesOrder` or an `Invoice`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteInventoryItem",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_inventory_item(
        id: api::inventory_item::Id,
        ctx: &Context,
    ) -> Result<api::InventoryItem, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::DeleteInventoryItem {
                tenant_id,
                item_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `PENDING` `SalesOrder`, capturing the current prices and
    /// tax rates of the ordered `InventoryItem`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_ITEMS` - no lines provided;
    /// - `INVALID_ITEMS` - a line has non-positive quantity, or the totals
    ///                     overflow;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist;
    /// - `INVENTORY_ITEM_NOT_EXISTS` - an `InventoryItem` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            gql.name = "createSalesOrder",
            items = items.len(),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_sales_order(
        customer_id: api::customer::Id,
        items: Vec<api::line::Input>,
        place_of_supply: Option<api::sales_order::PlaceOfSupply>,
        ctx: &Context,
    ) -> Result<api::SalesOrder, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::CreateSalesOrder {
                tenant_id,
                customer_id: customer_id.into(),
                items: items.into_iter().map(Into::into).collect(),
                place_of_supply: place_of_supply.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Accepts the `PENDING` `SalesOrder`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SALES_ORDER_NOT_EXISTS` - the `SalesOrder` does not exist;
    /// - `INVALID_STATE_TRANSITION` - the `SalesOrder` is not `PENDING`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "acceptSalesOrder",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn accept_sales_order(
        id: api::sales_order::Id,
        ctx: &Context,
    ) -> Result<api::SalesOrder, Error> {
        Self::decide_sales_order(id, Decision::Accept, ctx).await
    }

    /// Rejects the `PENDING` `SalesOrder`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SALES_ORDER_NOT_EXISTS` - the `SalesOrder` does not exist;
    /// - `INVALID_STATE_TRANSITION` - the `SalesOrder` is not `PENDING`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rejectSalesOrder",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reject_sales_order(
        id: api::sales_order::Id,
        ctx: &Context,
    ) -> Result<api::SalesOrder, Error> {
        Self::decide_sales_order(id, Decision::Reject, ctx).await
    }

    /// Creates a new `PENDING` `Invoice`.
    ///
    /// Lines are copied from the `SalesOrder` when `items` are omitted.
    /// `issueDate` defaults to now, and `dueDate` to `issueDate` plus the
    /// configured payment term.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_ITEMS` - neither lines nor a `SalesOrder` provided;
    /// - `INVALID_ITEMS` - a line has non-positive quantity, or the totals
    ///                     overflow;
    /// - `DUE_BEFORE_ISSUE` - `dueDate` precedes `issueDate`;
    /// - `INVALID_SALES_ORDER` - the `SalesOrder` is rejected or belongs to
    ///                           another `Customer`;
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` does not exist;
    /// - `SALES_ORDER_NOT_EXISTS` - the `SalesOrder` does not exist;
    /// - `INVENTORY_ITEM_NOT_EXISTS` - an `InventoryItem` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = %customer_id,
            gql.name = "createInvoice",
            otel.name = Self::SPAN_NAME,
            sales_order_id = ?sales_order_id.map(|id| id.to_string()),
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_invoice(
        customer_id: api::customer::Id,
        sales_order_id: Option<api::sales_order::Id>,
        items: Option<Vec<api::line::Input>>,
        issue_date: Option<DateTime>,
        due_date: Option<DateTime>,
        notes: Option<api::invoice::Notes>,
        terms: Option<api::invoice::Terms>,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::CreateInvoice {
                tenant_id,
                customer_id: customer_id.into(),
                sales_order_id: sales_order_id.map(Into::into),
                items: items.map(|i| i.into_iter().map(Into::into).collect()),
                issued_at: issue_date.map(DateTime::coerce),
                due_at: due_date.map(DateTime::coerce),
                notes: notes.map(Into::into),
                terms: terms.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `PENDING` or `OVERDUE` `Invoice` as `PAID`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` does not exist;
    /// - `INVALID_STATE_TRANSITION` - the `Invoice` is `PAID` or
    ///                                `CANCELLED` already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markInvoicePaid",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_invoice_paid(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::MarkInvoicePaid {
                tenant_id,
                invoice_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `PENDING` or `OVERDUE` `Invoice`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVOICE_NOT_EXISTS` - the `Invoice` does not exist;
    /// - `INVALID_STATE_TRANSITION` - the `Invoice` is `PAID` or
    ///                                `CANCELLED` already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelInvoice",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_invoice(
        id: api::invoice::Id,
        ctx: &Context,
    ) -> Result<api::Invoice, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::CancelInvoice {
                tenant_id,
                invoice_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided fields of the `TenantSettings`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateSettings",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_settings(
        input: api::settings::Input,
        ctx: &Context,
    ) -> Result<api::Settings, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(input.into_command(tenant_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl Mutation {
    /// Applies the provided [`Decision`] to the `SalesOrder`.
    async fn decide_sales_order(
        id: api::sales_order::Id,
        decision: Decision,
        ctx: &Context,
    ) -> Result<api::SalesOrder, Error> {
        let tenant_id = ctx.current_session().await?.tenant_id;
        ctx.service()
            .execute(command::DecideSalesOrder {
                tenant_id,
                order_id: id.into(),
                decision,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Validates the provided [`Money`] amount as a [`inventory_item::UnitPrice`].
fn unit_price_of(amount: Money) -> Result<inventory_item::UnitPrice, Error> {
    inventory_item::UnitPrice::new(amount)
        .ok_or_else(|| InputError::NegativeUnitPrice.into())
}

/// Validates the provided quantity as an [`inventory_item::Stock`].
fn stock_of(quantity: i32) -> Result<inventory_item::Stock, Error> {
    inventory_item::Stock::new(quantity)
        .ok_or_else(|| InputError::NegativeStock.into())
}

define_error! {
    enum InputError {
        #[code = "NEGATIVE_UNIT_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "`unitPrice` must not be negative"]
        NegativeUnitPrice,

        #[code = "NEGATIVE_STOCK"]
        #[status = BAD_REQUEST]
        #[message = "`stock` must not be negative"]
        NegativeStock,
    }
}

impl AsError for command::create_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => {
                Some(Error::classified("EMAIL_OCCUPIED", self))
            }
        }
    }
}

impl AsError for command::update_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CustomerNotExists(_) => {
                Some(Error::classified("CUSTOMER_NOT_EXISTS", self))
            }
            Self::EmailOccupied(_) => {
                Some(Error::classified("EMAIL_OCCUPIED", self))
            }
        }
    }
}

impl AsError for command::delete_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CustomerNotExists(_) => {
                Some(Error::classified("CUSTOMER_NOT_EXISTS", self))
            }
            Self::CustomerReferenced(_) => {
                Some(Error::classified("CUSTOMER_REFERENCED", self))
            }
        }
    }
}

impl AsError for command::update_inventory_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ItemNotExists(_) => {
                Some(Error::classified("INVENTORY_ITEM_NOT_EXISTS", self))
            }
        }
    }
}

impl AsError for command::delete_inventory_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ItemNotExists(_) => {
                Some(Error::classified("INVENTORY_ITEM_NOT_EXISTS", self))
            }
            Self::ItemReferenced(_) => {
                Some(Error::classified("INVENTORY_ITEM_REFERENCED", self))
            }
        }
    }
}

impl AsError for command::create_sales_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        let code = match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerNotExists(_) => "CUSTOMER_NOT_EXISTS",
            Self::ItemNotExists(_) => "INVENTORY_ITEM_NOT_EXISTS",
            Self::InvalidItems(_) => "INVALID_ITEMS",
            Self::NoItems => "NO_ITEMS",
        };
        Some(Error::classified(code, self))
    }
}

impl AsError for command::decide_sales_order::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotPending(_) => {
                Some(Error::classified("INVALID_STATE_TRANSITION", self))
            }
            Self::OrderNotExists(_) => {
                Some(Error::classified("SALES_ORDER_NOT_EXISTS", self))
            }
        }
    }
}

impl AsError for command::create_invoice::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        let code = match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CustomerNotExists(_) => "CUSTOMER_NOT_EXISTS",
            Self::DueBeforeIssue => "DUE_BEFORE_ISSUE",
            Self::DueDateOutOfRange => "DUE_DATE_OUT_OF_RANGE",
            Self::InvalidItems(_) => "INVALID_ITEMS",
            Self::ItemNotExists(_) => "INVENTORY_ITEM_NOT_EXISTS",
            Self::NoItems => "NO_ITEMS",
            Self::OrderNotExists(_) => "SALES_ORDER_NOT_EXISTS",
            Self::OrderOfAnotherCustomer(_) | Self::OrderRejected(_) => {
                "INVALID_SALES_ORDER"
            }
        };
        Some(Error::classified(code, self))
    }
}

impl AsError for command::mark_invoice_paid::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvoiceNotExists(_) => {
                Some(Error::classified("INVOICE_NOT_EXISTS", self))
            }
            Self::Transition(_) => {
                Some(Error::classified("INVALID_STATE_TRANSITION", self))
            }
        }
    }
}

impl AsError for command::cancel_invoice::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvoiceNotExists(_) => {
                Some(Error::classified("INVOICE_NOT_EXISTS", self))
            }
            Self::Transition(_) => {
                Some(Error::classified("INVALID_STATE_TRANSITION", self))
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use service::{command, domain::customer};

    use crate::AsError as _;

    #[test]
    fn command_errors_carry_codes_and_statuses() {
        let err = command::delete_customer::ExecutionError::CustomerReferenced(
            customer::Id::new(),
        )
        .as_error();
        assert_eq!(err.code, "CUSTOMER_REFERENCED");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);

        let err = command::create_sales_order::ExecutionError::NoItems
            .as_error();
        assert_eq!(err.code, "NO_ITEMS");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);

        let err = command::create_invoice::ExecutionError::DueBeforeIssue
            .as_error();
        assert_eq!(err.code, "DUE_BEFORE_ISSUE");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }
}
