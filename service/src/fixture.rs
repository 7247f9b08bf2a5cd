//! Shared helpers of unit tests.

use std::{str::FromStr as _, time::Duration};

use common::{Money, Percent};
use jsonwebtoken::DecodingKey;

use crate::{
    command::{
        CreateCustomer, CreateInventoryItem, CreateInvoice, CreateSalesOrder,
    },
    domain::{
        customer, inventory_item, line, tenant, Customer, InventoryItem,
        Invoice, SalesOrder,
    },
    infra::Memory,
    Command as _, Config, Service,
};

/// Secret the tenant sessions are signed with.
pub(crate) const JWT_SECRET: &[u8] = b"test secret";

/// Single day.
pub(crate) const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Creates a new [`Service`] upon an empty [`Memory`] database.
pub(crate) fn service() -> Service<Memory> {
    Service::new(
        Config {
            jwt_decoding_key: DecodingKey::from_secret(JWT_SECRET),
            first_sales_order_number: 1,
            first_invoice_number: 1,
            payment_term: 14 * DAY,
        },
        Memory::new(),
    )
}

/// Creates a new [`Customer`] named after the local part of its `email`.
pub(crate) async fn customer(
    svc: &Service<Memory>,
    tenant_id: tenant::Id,
    email: &str,
) -> Customer {
    let name = email.split('@').next().unwrap_or(email);
    svc.execute(CreateCustomer {
        tenant_id,
        name: customer::Name::new(name).unwrap(),
        email: customer::Email::new(email).unwrap(),
        phone: customer::Phone::new("123-456-7890"),
        address: customer::Address::new("123 Main St"),
    })
    .await
    .unwrap()
}

/// Creates a new [`InventoryItem`] taxed at 18%.
pub(crate) async fn item(
    svc: &Service<Memory>,
    tenant_id: tenant::Id,
    name: &str,
    unit_price: i64,
) -> InventoryItem {
    svc.execute(CreateInventoryItem {
        tenant_id,
        name: inventory_item::Name::new(name).unwrap(),
        description: None,
        unit_price: inventory_item::UnitPrice::new(Money::from_minor(
            unit_price,
        ))
        .unwrap(),
        tax_rate: Percent::from_str("18").unwrap(),
        stock: inventory_item::Stock::new(10).unwrap(),
    })
    .await
    .unwrap()
}

/// Creates a new [`SalesOrder`] of the provided `items` and quantities.
pub(crate) async fn sales_order(
    svc: &Service<Memory>,
    customer: &Customer,
    items: &[(&InventoryItem, i32)],
) -> SalesOrder {
    svc.execute(CreateSalesOrder {
        tenant_id: customer.tenant_id,
        customer_id: customer.id,
        items: items
            .iter()
            .map(|(item, quantity)| line::Draft {
                item_id: item.id,
                quantity: *quantity,
                hsn_sac_code: None,
            })
            .collect(),
        place_of_supply: None,
    })
    .await
    .unwrap()
}

/// Creates a new [`Invoice`] billing the provided [`SalesOrder`].
pub(crate) async fn invoice(
    svc: &Service<Memory>,
    order: &SalesOrder,
) -> Invoice {
    svc.execute(CreateInvoice {
        tenant_id: order.tenant_id,
        customer_id: order.customer_id,
        sales_order_id: Some(order.id),
        items: None,
        issued_at: None,
        due_at: None,
        notes: None,
        terms: None,
    })
    .await
    .unwrap()
}
