//! Order-to-invoice scenarios run through the public API of the [`Service`].

use std::{str::FromStr as _, time::Duration};

use common::{operations::Insert, DateTime, Money, Percent};
use futures::future;
use jsonwebtoken::DecodingKey;
use service::{
    command::{
        CreateCustomer, CreateInventoryItem, CreateInvoice, CreateSalesOrder,
        DecideSalesOrder, DeleteCustomer, MarkInvoicePaid,
        UpdateInventoryItem,
    },
    domain::{
        customer, inventory_item, invoice, line,
        sales_order::{self, Decision},
        tenant, Customer, InventoryItem, SalesOrder,
    },
    error::Kind,
    infra::Memory,
    query, Classify as _, Command as _, Config, Query as _, Service,
};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn service() -> Service<Memory> {
    service_with(Memory::new(), 1)
}

fn service_with(db: Memory, first_number: u32) -> Service<Memory> {
    Service::new(
        Config {
            jwt_decoding_key: DecodingKey::from_secret(b"secret"),
            first_sales_order_number: first_number,
            first_invoice_number: first_number,
            payment_term: 14 * DAY,
        },
        db,
    )
}

async fn john_doe(svc: &Service<Memory>, tenant_id: tenant::Id) -> Customer {
    svc.execute(CreateCustomer {
        tenant_id,
        name: customer::Name::new("John Doe").unwrap(),
        email: customer::Email::new("john@example.com").unwrap(),
        phone: customer::Phone::new("123-456-7890"),
        address: customer::Address::new("123 Main St"),
    })
    .await
    .unwrap()
}

async fn widget(
    svc: &Service<Memory>,
    tenant_id: tenant::Id,
) -> InventoryItem {
    svc.execute(CreateInventoryItem {
        tenant_id,
        name: inventory_item::Name::new("Widget A").unwrap(),
        description: inventory_item::Description::new("High-quality widget"),
        unit_price: inventory_item::UnitPrice::new(Money::from_minor(249_900))
            .unwrap(),
        tax_rate: Percent::from_str("18").unwrap(),
        stock: inventory_item::Stock::new(100).unwrap(),
    })
    .await
    .unwrap()
}

fn order_of(
    customer: &Customer,
    item: &InventoryItem,
    quantity: i32,
) -> CreateSalesOrder {
    CreateSalesOrder {
        tenant_id: customer.tenant_id,
        customer_id: customer.id,
        items: vec![line::Draft {
            item_id: item.id,
            quantity,
            hsn_sac_code: None,
        }],
        place_of_supply: None,
    }
}

fn invoice_of(order: &SalesOrder) -> CreateInvoice {
    CreateInvoice {
        tenant_id: order.tenant_id,
        customer_id: order.customer_id,
        sales_order_id: Some(order.id),
        items: None,
        issued_at: None,
        due_at: None,
        notes: None,
        terms: None,
    }
}

#[tokio::test]
async fn order_to_invoice() {
    let svc = service();
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;

    let order = svc.execute(order_of(&john, &widget, 2)).await.unwrap();
    assert_eq!(order.totals.sub_total, Money::from_minor(499_800));
    assert_eq!(order.totals.tax_amount, Money::from_minor(89_964));
    assert_eq!(order.totals.total, Money::from_minor(589_764));
    assert_eq!(order.totals.total.to_string(), "5897.64");

    let read_back = svc
        .execute(query::sales_order::ById::by((tenant_id, order.id)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read_back.items, order.items);
    assert_eq!(read_back.totals, order.totals);

    let accepted = svc
        .execute(DecideSalesOrder {
            tenant_id,
            order_id: order.id,
            decision: Decision::Accept,
        })
        .await
        .unwrap();
    assert_eq!(accepted.status, sales_order::Status::Accepted);
    let err = svc
        .execute(DecideSalesOrder {
            tenant_id,
            order_id: order.id,
            decision: Decision::Accept,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidStateTransition);

    let invoice = svc.execute(invoice_of(&order)).await.unwrap();
    assert_eq!(invoice.amount(), Ok(Money::from_minor(499_800)));
    let paid = svc
        .execute(MarkInvoicePaid {
            tenant_id,
            invoice_id: invoice.id,
        })
        .await
        .unwrap();
    assert_eq!(paid.status(), invoice::Status::Paid);
    let err = svc
        .execute(MarkInvoicePaid {
            tenant_id,
            invoice_id: invoice.id,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::InvalidStateTransition);
}

#[tokio::test]
async fn due_date_before_issue_date_is_invalid() {
    let svc = service();
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;
    let order = svc.execute(order_of(&john, &widget, 1)).await.unwrap();
    let issued = DateTime::now();

    let err = svc
        .execute(CreateInvoice {
            issued_at: Some(issued.coerce()),
            due_at: Some((issued - DAY).coerce()),
            ..invoice_of(&order)
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Kind::Validation);
}

#[tokio::test]
async fn overdue_is_derived_from_clock() {
    let svc = service();
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;
    let order = svc.execute(order_of(&john, &widget, 1)).await.unwrap();
    let issued = DateTime::now() - 20 * DAY;

    let invoice = svc
        .execute(CreateInvoice {
            issued_at: Some(issued.coerce()),
            ..invoice_of(&order)
        })
        .await
        .unwrap();

    assert_eq!(invoice.status, invoice::Status::Pending);
    assert_eq!(invoice.status(), invoice::Status::Overdue);
    assert_eq!(
        invoice.status_at((issued + 14 * DAY).coerce()),
        invoice::Status::Pending,
    );
}

#[tokio::test]
async fn invoice_due_today_is_not_overdue() {
    let svc = service();
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;
    let order = svc.execute(order_of(&john, &widget, 1)).await.unwrap();
    let today = DateTime::now().start_of_day();

    let invoice = svc
        .execute(CreateInvoice {
            issued_at: Some(today.coerce()),
            due_at: Some(today.coerce()),
            ..invoice_of(&order)
        })
        .await
        .unwrap();

    assert_eq!(invoice.status(), invoice::Status::Pending);
    assert_eq!(
        invoice.status_at(today + DAY),
        invoice::Status::Overdue,
    );
}

#[tokio::test]
async fn referenced_customer_cannot_be_deleted() {
    let svc = service();
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;
    _ = svc.execute(order_of(&john, &widget, 1)).await.unwrap();

    let err = svc
        .execute(DeleteCustomer {
            tenant_id,
            customer_id: john.id,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Kind::Conflict);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_numbers() {
    let svc = service();
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;

    let orders = future::try_join_all(
        (0..20).map(|_| svc.execute(order_of(&john, &widget, 1))),
    )
    .await
    .unwrap();

    let mut numbers: Vec<u32> =
        orders.iter().map(|o| u32::from(o.number)).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, (1..=20).collect::<Vec<_>>());

    let listed = svc
        .execute(query::sales_orders::OfTenant::by(tenant_id))
        .await
        .unwrap();
    let listed: Vec<u32> =
        listed.iter().map(|o| u32::from(o.number)).collect();
    assert!(listed.windows(2).all(|w| w[0] < w[1]), "{listed:?}");
}

#[tokio::test]
async fn sequences_are_independent() {
    let svc = service();
    let acme = tenant::Id::new();
    let globex = tenant::Id::new();
    let acme_john = john_doe(&svc, acme).await;
    let acme_widget = widget(&svc, acme).await;
    let globex_john = john_doe(&svc, globex).await;
    let globex_widget = widget(&svc, globex).await;

    let first = svc
        .execute(order_of(&acme_john, &acme_widget, 1))
        .await
        .unwrap();
    let second = svc
        .execute(order_of(&acme_john, &acme_widget, 1))
        .await
        .unwrap();
    let other = svc
        .execute(order_of(&globex_john, &globex_widget, 1))
        .await
        .unwrap();
    let invoice = svc.execute(invoice_of(&second)).await.unwrap();

    assert_eq!(first.number.to_string(), "SO-00001");
    assert_eq!(second.number.to_string(), "SO-00002");
    assert_eq!(other.number.to_string(), "SO-00001");
    assert_eq!(invoice.number.to_string(), "INV-00001");
}

#[tokio::test]
async fn failed_commit_consumes_no_number() {
    let db = Memory::new();
    let svc = service_with(db.clone(), 1);
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;

    db.fail_next_commits(1);
    let err = svc.execute(order_of(&john, &widget, 1)).await.unwrap_err();
    assert_eq!(err.kind(), Kind::Unavailable);

    let orders = svc
        .execute(query::sales_orders::OfTenant::by(tenant_id))
        .await
        .unwrap();
    assert!(orders.is_empty());

    let order = svc.execute(order_of(&john, &widget, 1)).await.unwrap();
    assert_eq!(order.number.to_string(), "SO-00001");
}

#[tokio::test]
async fn unavailable_store_is_not_a_validation_error() {
    let db = Memory::new();
    let svc = service_with(db.clone(), 1);
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;

    db.set_unavailable(true);
    let err = svc.execute(order_of(&john, &widget, 0)).await.unwrap_err();
    assert_eq!(err.kind(), Kind::Unavailable);
    let err = svc
        .execute(query::customers::OfTenant::by(tenant_id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::Unavailable);

    db.set_unavailable(false);
    let customers = svc
        .execute(query::customers::OfTenant::by(tenant_id))
        .await
        .unwrap();
    assert_eq!(customers, vec![john]);
}

#[tokio::test]
async fn numbering_resumes_after_existing_documents() {
    let db = Memory::new();
    let svc = service_with(db.clone(), 100);
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;

    let mut imported = svc.execute(order_of(&john, &widget, 1)).await.unwrap();
    assert_eq!(imported.number.to_string(), "SO-00100");

    // Documents imported behind the sequence's back.
    let fresh = Memory::new();
    imported.id = sales_order::Id::new();
    imported.number = 250.into();
    fresh.execute(Insert(imported.clone())).await.unwrap();
    fresh.execute(Insert(john.clone())).await.unwrap();
    fresh.execute(Insert(widget.clone())).await.unwrap();
    let svc = service_with(fresh, 100);

    let next = svc.execute(order_of(&john, &widget, 1)).await.unwrap();
    assert_eq!(next.number.to_string(), "SO-00251");
}

#[tokio::test]
async fn price_changes_keep_documents_intact() {
    let svc = service();
    let tenant_id = tenant::Id::new();
    let john = john_doe(&svc, tenant_id).await;
    let widget = widget(&svc, tenant_id).await;
    let order = svc.execute(order_of(&john, &widget, 2)).await.unwrap();
    let invoice = svc.execute(invoice_of(&order)).await.unwrap();

    _ = svc
        .execute(UpdateInventoryItem {
            tenant_id,
            item_id: widget.id,
            name: None,
            description: None,
            unit_price: inventory_item::UnitPrice::new(Money::from_minor(
                100,
            )),
            tax_rate: Some(Percent::ZERO),
            stock: None,
        })
        .await
        .unwrap();

    let order = svc
        .execute(query::sales_order::ById::by((tenant_id, order.id)))
        .await
        .unwrap()
        .unwrap();
    let invoice = svc
        .execute(query::invoice::ById::by((tenant_id, invoice.id)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.totals.total, Money::from_minor(589_764));
    assert_eq!(invoice.totals().unwrap().total, Money::from_minor(589_764));
}

#[tokio::test]
async fn tenants_are_isolated() {
    let svc = service();
    let acme = tenant::Id::new();
    let globex = tenant::Id::new();
    let john = john_doe(&svc, acme).await;
    let widget = widget(&svc, acme).await;
    let order = svc.execute(order_of(&john, &widget, 1)).await.unwrap();

    let foreign = svc
        .execute(query::sales_order::ById::by((globex, order.id)))
        .await
        .unwrap();
    assert_eq!(foreign, None);
    assert!(svc
        .execute(query::customers::OfTenant::by(globex))
        .await
        .unwrap()
        .is_empty());

    let err = svc
        .execute(CreateSalesOrder {
            tenant_id: globex,
            ..order_of(&john, &widget, 1)
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Kind::NotFound);

    // Same email is free in another tenant.
    _ = john_doe(&svc, globex).await;
}
