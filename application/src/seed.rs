//! Demo data seeding.

use std::str::FromStr as _;

use common::{Money, Percent};
use service::{
    command,
    domain::{customer, inventory_item, line, sales_order, tenant},
    Command as _,
};
use tracing as log;

use crate::{AsError, Error, Service};

/// Seeds the provided tenant with a sample catalog: two customers, two
/// widgets, one order of the first customer and its invoice.
///
/// Goes through the regular [`command`]s, so the documents are numbered
/// as usual.
///
/// # Errors
///
/// If any of the [`command`]s fails.
pub async fn demo(
    service: &Service,
    tenant_id: tenant::Id,
) -> Result<(), Error> {
    let john = service
        .execute(command::CreateCustomer {
            tenant_id,
            name: valid(customer::Name::new("John Doe"))?,
            email: valid(customer::Email::new("john.doe@example.com"))?,
            phone: customer::Phone::new("+1234567890"),
            address: customer::Address::new(
                "123 Main Street, New York, NY 10001",
            ),
        })
        .await
        .map_err(AsError::into_error)?;
    _ = service
        .execute(command::CreateCustomer {
            tenant_id,
            name: valid(customer::Name::new("Jane Smith"))?,
            email: valid(customer::Email::new("jane.smith@example.com"))?,
            phone: customer::Phone::new("+0987654321"),
            address: customer::Address::new(
                "456 Oak Avenue, Los Angeles, CA 90210",
            ),
        })
        .await
        .map_err(AsError::into_error)?;

    let gst = Percent::from_str("18").map_err(|e| Error::internal(&e))?;
    let premium = service
        .execute(command::CreateInventoryItem {
            tenant_id,
            name: valid(inventory_item::Name::new("Premium Widget"))?,
            description: inventory_item::Description::new(
                "High-quality widget with advanced features",
            ),
            unit_price: valid(inventory_item::UnitPrice::new(
                Money::from_minor(249_900),
            ))?,
            tax_rate: gst,
            stock: valid(inventory_item::Stock::new(50))?,
        })
        .await
        .map_err(AsError::into_error)?;
    _ = service
        .execute(command::CreateInventoryItem {
            tenant_id,
            name: valid(inventory_item::Name::new("Standard Widget"))?,
            description: inventory_item::Description::new(
                "Basic widget for everyday use",
            ),
            unit_price: valid(inventory_item::UnitPrice::new(
                Money::from_minor(149_900),
            ))?,
            tax_rate: gst,
            stock: valid(inventory_item::Stock::new(100))?,
        })
        .await
        .map_err(AsError::into_error)?;

    let order = service
        .execute(command::CreateSalesOrder {
            tenant_id,
            customer_id: john.id,
            items: vec![line::Draft {
                item_id: premium.id,
                quantity: 2,
                hsn_sac_code: line::HsnSacCode::new("998313"),
            }],
            place_of_supply: sales_order::PlaceOfSupply::new("Maharashtra"),
        })
        .await
        .map_err(AsError::into_error)?;
    let invoice = service
        .execute(command::CreateInvoice {
            tenant_id,
            customer_id: john.id,
            sales_order_id: Some(order.id),
            items: None,
            issued_at: None,
            due_at: None,
            notes: None,
            terms: None,
        })
        .await
        .map_err(AsError::into_error)?;

    log::info!(
        "seeded `Tenant(id: {tenant_id})` with demo data: {}, {}",
        order.number,
        invoice.number,
    );

    Ok(())
}

/// Unwraps a constant demo value, which is always valid.
fn valid<T>(value: Option<T>) -> Result<T, Error> {
    value.ok_or_else(|| Error::internal(&"invalid demo value"))
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::Money;
    use jsonwebtoken::DecodingKey;
    use service::{domain::tenant, infra::Memory, query, Query as _};

    use crate::Service;

    #[tokio::test]
    async fn seeds_sample_documents() {
        let service = Service::new(
            service::Config {
                jwt_decoding_key: DecodingKey::from_secret(b"secret"),
                first_sales_order_number: 1001,
                first_invoice_number: 10001,
                payment_term: Duration::from_secs(14 * 24 * 60 * 60),
            },
            Memory::new(),
        );
        let tenant_id = tenant::Id::new();

        super::demo(&service, tenant_id).await.unwrap();

        let customers = service
            .execute(query::customers::OfTenant::by(tenant_id))
            .await
            .unwrap();
        assert_eq!(customers.len(), 2);
        let orders = service
            .execute(query::sales_orders::OfTenant::by(tenant_id))
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].number.to_string(), "SO-01001");
        assert_eq!(orders[0].totals.total, Money::from_minor(589_764));
        let invoices = service
            .execute(query::invoices::OfTenant::by(tenant_id))
            .await
            .unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].number.to_string(), "INV-10001");
        assert_eq!(invoices[0].sales_order_id, Some(orders[0].id));
    }
}
