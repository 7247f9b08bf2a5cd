//! [`Command`] for creating a new [`Invoice`].

use common::{
    operations::{
        Advance, By, Commit, Insert, Lock, Select, Transact, Transacted,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        customer, inventory_item, invoice,
        line::{self, CalculationError, Totals},
        sales_order, tenant, Customer, InventoryItem, Invoice, SalesOrder,
        Tenant,
    },
    error::{Classify, Kind},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::Config;

use super::Command;

/// [`Command`] for creating a new [`invoice::Status::Pending`] [`Invoice`].
#[derive(Clone, Debug)]
pub struct CreateInvoice {
    /// ID of the [`Tenant`] to create the [`Invoice`] for.
    pub tenant_id: tenant::Id,

    /// ID of the billed [`Customer`].
    pub customer_id: customer::Id,

    /// ID of the [`SalesOrder`] being billed, if any.
    ///
    /// It must belong to the same [`Customer`] and must not be
    /// [`sales_order::Status::Rejected`].
    pub sales_order_id: Option<sales_order::Id>,

    /// Requested lines.
    ///
    /// If omitted, the lines of the [`SalesOrder`] are copied along with
    /// their captured prices.
    pub items: Option<Vec<line::Draft>>,

    /// Issue date of a new [`Invoice`], now by default.
    pub issued_at: Option<invoice::IssueDateTime>,

    /// Due date of a new [`Invoice`], the issue date plus the
    /// [`Config::payment_term`] by default.
    pub due_at: Option<invoice::DueDateTime>,

    /// [`invoice::Notes`] of a new [`Invoice`].
    pub notes: Option<invoice::Notes>,

    /// [`invoice::Terms`] of a new [`Invoice`].
    pub terms: Option<invoice::Terms>,
}

impl<Db> Command<CreateInvoice> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Tenant, tenant::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Customer>, (tenant::Id, customer::Id)>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<SalesOrder>, (tenant::Id, sales_order::Id)>>,
            Ok = Option<SalesOrder>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<Option<InventoryItem>, (tenant::Id, inventory_item::Id)>,
            >,
            Ok = Option<InventoryItem>,
            Err = Traced<database::Error>,
        > + Database<
            Advance<By<invoice::Number, (tenant::Id, u32)>>,
            Ok = invoice::Number,
            Err = Traced<database::Error>,
        > + Database<Insert<Invoice>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Invoice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateInvoice {
            tenant_id,
            customer_id,
            sales_order_id,
            items: drafts,
            issued_at,
            due_at,
            notes,
            terms,
        } = cmd;

        let now = DateTime::now();
        let issued_at = issued_at.unwrap_or_else(|| now.coerce());
        let due_at = match due_at {
            Some(due) => due,
            None => invoice::DueDateTime::checked_add(
                issued_at.coerce(),
                self.config().payment_term,
            )
            .ok_or(E::DueDateOutOfRange)
            .map_err(tracerr::wrap!())?,
        };
        // Compared by calendar day.
        let due_day = due_at.coerce::<()>().start_of_day();
        if due_day < issued_at.coerce::<()>().start_of_day() {
            return Err(tracerr::new!(E::DueBeforeIssue));
        }
        if drafts.as_ref().is_some_and(Vec::is_empty)
            || (drafts.is_none() && sales_order_id.is_none())
        {
            return Err(tracerr::new!(E::NoItems));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serialize numbering and reference checks within the `Tenant`.
        tx.execute(Lock(By::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Select(By::<Option<Customer>, _>::new((
            tenant_id,
            customer_id,
        ))))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?
        .ok_or(E::CustomerNotExists(customer_id))
        .map_err(tracerr::wrap!())
        .map(drop)?;

        let order = if let Some(id) = sales_order_id {
            let order = tx
                .execute(Select(By::<Option<SalesOrder>, _>::new((
                    tenant_id, id,
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::OrderNotExists(id))
                .map_err(tracerr::wrap!())?;
            if order.customer_id != customer_id {
                return Err(tracerr::new!(E::OrderOfAnotherCustomer(id)));
            }
            if order.status == sales_order::Status::Rejected {
                return Err(tracerr::new!(E::OrderRejected(id)));
            }
            Some(order)
        } else {
            None
        };

        let items = match (drafts, order) {
            (Some(drafts), _) => {
                let mut items = Vec::with_capacity(drafts.len());
                for draft in drafts {
                    let item_id = draft.item_id;
                    let item = tx
                        .execute(Select(By::<Option<InventoryItem>, _>::new(
                            (tenant_id, item_id),
                        )))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))?
                        .ok_or(E::ItemNotExists(item_id))
                        .map_err(tracerr::wrap!())?;
                    items.push(draft.capture(&item));
                }
                items
            }
            (None, Some(order)) => order.items,
            (None, None) => return Err(tracerr::new!(E::NoItems)),
        };
        _ = Totals::of(&items).map_err(tracerr::from_and_wrap!(=> E))?;

        let number = tx
            .execute(Advance(By::<invoice::Number, _>::new((
                tenant_id,
                self.config().first_invoice_number,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let invoice = Invoice {
            id: invoice::Id::new(),
            tenant_id,
            number,
            customer_id,
            sales_order_id,
            items,
            issued_at,
            due_at,
            status: invoice::Status::Pending,
            notes,
            terms,
            created_at: now.coerce(),
            paid_at: None,
            cancelled_at: None,
        };

        tx.execute(Insert(invoice.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Invoice(id: {}, number: {})` created for `Tenant(id: {})`",
            invoice.id,
            invoice.number,
            tenant_id,
        );

        Ok(invoice)
    }
}

/// Error of [`CreateInvoice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Due date precedes the issue date.
    #[display("`Invoice` due date must not precede its issue date")]
    #[from(ignore)]
    DueBeforeIssue,

    /// Default due date doesn't fit the supported range.
    #[display("`Invoice` due date is out of range")]
    #[from(ignore)]
    DueDateOutOfRange,

    /// Lines are invalid.
    #[display("Invalid lines: {_0}")]
    InvalidItems(CalculationError),

    /// [`InventoryItem`] with the provided ID does not exist.
    #[display("`InventoryItem(id: {_0})` does not exist")]
    #[from(ignore)]
    ItemNotExists(#[error(not(source))] inventory_item::Id),

    /// Neither lines nor a [`SalesOrder`] to copy them from are provided.
    #[display("`Invoice` must have at least one line")]
    #[from(ignore)]
    NoItems,

    /// [`SalesOrder`] with the provided ID does not exist.
    #[display("`SalesOrder(id: {_0})` does not exist")]
    #[from(ignore)]
    OrderNotExists(#[error(not(source))] sales_order::Id),

    /// [`SalesOrder`] belongs to another [`Customer`].
    #[display("`SalesOrder(id: {_0})` belongs to another `Customer`")]
    #[from(ignore)]
    OrderOfAnotherCustomer(#[error(not(source))] sales_order::Id),

    /// [`SalesOrder`] is rejected.
    #[display("`SalesOrder(id: {_0})` is rejected")]
    #[from(ignore)]
    OrderRejected(#[error(not(source))] sales_order::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::CustomerNotExists(_)
            | Self::ItemNotExists(_)
            | Self::OrderNotExists(_) => Kind::NotFound,
            Self::Db(e) => e.kind(),
            Self::DueBeforeIssue
            | Self::DueDateOutOfRange
            | Self::InvalidItems(_)
            | Self::NoItems
            | Self::OrderOfAnotherCustomer(_)
            | Self::OrderRejected(_) => Kind::Validation,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use crate::{
        command::DecideSalesOrder,
        domain::{
            customer, invoice, line,
            sales_order::{self, Decision},
            tenant, InventoryItem,
        },
        error::{Classify as _, Kind},
        fixture, query, Command as _, Query as _,
    };

    use super::CreateInvoice;

    fn invoice(
        tenant_id: tenant::Id,
        customer_id: customer::Id,
        items: &[(&InventoryItem, i32)],
    ) -> CreateInvoice {
        CreateInvoice {
            tenant_id,
            customer_id,
            sales_order_id: None,
            items: Some(
                items
                    .iter()
                    .map(|(item, quantity)| line::Draft {
                        item_id: item.id,
                        quantity: *quantity,
                        hsn_sac_code: None,
                    })
                    .collect(),
            ),
            issued_at: None,
            due_at: None,
            notes: None,
            terms: None,
        }
    }

    #[tokio::test]
    async fn defaults_dates_and_numbers() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;

        let created = svc
            .execute(invoice(tenant_id, john.id, &[(&widget, 2)]))
            .await
            .unwrap();

        assert_eq!(created.number.to_string(), "INV-00001");
        assert_eq!(created.status(), invoice::Status::Pending);
        assert_eq!(
            created.due_at.coerce::<()>(),
            created.issued_at.coerce::<()>() + 14 * fixture::DAY,
        );
        assert_eq!(created.amount(), Ok(Money::from_minor(499_800)));
        assert_eq!(
            created.totals().map(|t| t.total),
            Ok(Money::from_minor(589_764)),
        );
    }

    #[tokio::test]
    async fn rejects_due_date_before_issue_date() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let issued = DateTime::now();

        let err = svc
            .execute(CreateInvoice {
                issued_at: Some(issued.coerce()),
                due_at: Some((issued - fixture::DAY).coerce()),
                ..invoice(tenant_id, john.id, &[(&widget, 1)])
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Kind::Validation);

        let same_day = svc
            .execute(CreateInvoice {
                issued_at: Some(issued.coerce()),
                due_at: Some(issued.coerce()),
                ..invoice(tenant_id, john.id, &[(&widget, 1)])
            })
            .await
            .unwrap();
        assert_eq!(same_day.number.to_string(), "INV-00001");
    }

    #[tokio::test]
    async fn accepts_due_today_with_default_issue_date() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let today = DateTime::now().start_of_day();

        let created = svc
            .execute(CreateInvoice {
                due_at: Some(today.coerce()),
                ..invoice(tenant_id, john.id, &[(&widget, 1)])
            })
            .await
            .unwrap();

        assert_eq!(created.due_at.coerce::<()>(), today);
        assert!(created.issued_at.coerce::<()>() >= today);
        assert_eq!(created.status(), invoice::Status::Pending);
    }

    #[tokio::test]
    async fn copies_sales_order_lines() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let order = fixture::sales_order(&svc, &john, &[(&widget, 2)]).await;

        let created = svc
            .execute(CreateInvoice {
                sales_order_id: Some(order.id),
                items: None,
                ..invoice(tenant_id, john.id, &[])
            })
            .await
            .unwrap();

        assert_eq!(created.sales_order_id, Some(order.id));
        assert_eq!(created.items, order.items);
        assert_eq!(created.totals(), Ok(order.totals));

        let listed = svc
            .execute(query::invoices::OfTenant::by(tenant_id))
            .await
            .unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn validates_sales_order() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let jane = fixture::customer(&svc, tenant_id, "jane@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let johns = fixture::sales_order(&svc, &john, &[(&widget, 1)]).await;
        let rejected = fixture::sales_order(&svc, &jane, &[(&widget, 1)]).await;
        _ = svc
            .execute(DecideSalesOrder {
                tenant_id,
                order_id: rejected.id,
                decision: Decision::Reject,
            })
            .await
            .unwrap();

        let cases = [
            (jane.id, Some(johns.id), Kind::Validation),
            (jane.id, Some(rejected.id), Kind::Validation),
            (jane.id, Some(sales_order::Id::new()), Kind::NotFound),
            (jane.id, None, Kind::Validation),
        ];
        for (customer_id, sales_order_id, kind) in cases {
            let err = svc
                .execute(CreateInvoice {
                    sales_order_id,
                    items: None,
                    ..invoice(tenant_id, customer_id, &[])
                })
                .await
                .unwrap_err();
            assert_eq!(err.kind(), kind, "{err}");
        }
    }
}
