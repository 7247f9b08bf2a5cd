//! [`Command`] for creating a new [`SalesOrder`].

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
        customer, inventory_item,
        line::{self, CalculationError, Totals},
        sales_order, tenant, Customer, InventoryItem, SalesOrder, Tenant,
    },
    error::{Classify, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`SalesOrder`] in
/// [`sales_order::Status::Pending`].
///
/// Line prices and tax rates are captured from the current catalog.
#[derive(Clone, Debug)]
pub struct CreateSalesOrder {
    /// ID of the [`Tenant`] to create the [`SalesOrder`] for.
    pub tenant_id: tenant::Id,

    /// ID of the ordering [`Customer`].
    pub customer_id: customer::Id,

    /// Requested lines, at least one.
    pub items: Vec<line::Draft>,

    /// [`sales_order::PlaceOfSupply`] of a new [`SalesOrder`].
    pub place_of_supply: Option<sales_order::PlaceOfSupply>,
}

impl<Db> Command<CreateSalesOrder> for Service<Db>
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
            Select<
                By<Option<InventoryItem>, (tenant::Id, inventory_item::Id)>,
            >,
            Ok = Option<InventoryItem>,
            Err = Traced<database::Error>,
        > + Database<
            Advance<By<sales_order::Number, (tenant::Id, u32)>>,
            Ok = sales_order::Number,
            Err = Traced<database::Error>,
        > + Database<Insert<SalesOrder>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = SalesOrder;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSalesOrder,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSalesOrder {
            tenant_id,
            customer_id,
            items: drafts,
            place_of_supply,
        } = cmd;

        if drafts.is_empty() {
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

        let mut items = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let item_id = draft.item_id;
            let item = tx
                .execute(Select(By::<Option<InventoryItem>, _>::new((
                    tenant_id, item_id,
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::ItemNotExists(item_id))
                .map_err(tracerr::wrap!())?;
            items.push(draft.capture(&item));
        }
        let totals =
            Totals::of(&items).map_err(tracerr::from_and_wrap!(=> E))?;

        let number = tx
            .execute(Advance(By::<sales_order::Number, _>::new((
                tenant_id,
                self.config().first_sales_order_number,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let order = SalesOrder {
            id: sales_order::Id::new(),
            tenant_id,
            number,
            customer_id,
            items,
            totals,
            place_of_supply,
            status: sales_order::Status::Pending,
            created_at: DateTime::now().coerce(),
            decided_at: None,
        };

        tx.execute(Insert(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`SalesOrder(id: {}, number: {})` created for `Tenant(id: {})`",
            order.id,
            order.number,
            tenant_id,
        );

        Ok(order)
    }
}

/// Error of [`CreateSalesOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`InventoryItem`] with the provided ID does not exist.
    #[display("`InventoryItem(id: {_0})` does not exist")]
    #[from(ignore)]
    ItemNotExists(#[error(not(source))] inventory_item::Id),

    /// Lines are invalid.
    #[display("Invalid lines: {_0}")]
    InvalidItems(CalculationError),

    /// No lines provided.
    #[display("`SalesOrder` must have at least one line")]
    #[from(ignore)]
    NoItems,
}

impl Classify for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::CustomerNotExists(_) | Self::ItemNotExists(_) => {
                Kind::NotFound
            }
            Self::Db(e) => e.kind(),
            Self::InvalidItems(_) | Self::NoItems => Kind::Validation,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::{
        domain::{
            customer, inventory_item,
            line::{self, Totals},
            sales_order, tenant,
        },
        error::{Classify as _, Kind},
        fixture, query, Command as _, Query as _,
    };

    use super::CreateSalesOrder;

    fn draft(item_id: inventory_item::Id, quantity: i32) -> line::Draft {
        line::Draft {
            item_id,
            quantity,
            hsn_sac_code: None,
        }
    }

    #[tokio::test]
    async fn captures_catalog_and_computes_totals() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;

        let order = svc
            .execute(CreateSalesOrder {
                tenant_id,
                customer_id: john.id,
                items: vec![draft(widget.id, 2)],
                place_of_supply: sales_order::PlaceOfSupply::new("Karnataka"),
            })
            .await
            .unwrap();

        assert_eq!(order.status, sales_order::Status::Pending);
        assert_eq!(order.number.to_string(), "SO-00001");
        assert_eq!(order.items[0].unit_price, Money::from_minor(249_900));
        assert_eq!(order.items[0].tax_rate, widget.tax_rate);
        assert_eq!(
            order.totals,
            Totals {
                sub_total: Money::from_minor(499_800),
                tax_amount: Money::from_minor(89_964),
                total: Money::from_minor(589_764),
            },
        );

        let stored = svc
            .execute(query::sales_order::ById::by((tenant_id, order.id)))
            .await
            .unwrap();
        assert_eq!(stored, Some(order));
    }

    #[tokio::test]
    async fn validates_input() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;

        let cases = [
            (john.id, vec![], Kind::Validation),
            (john.id, vec![draft(widget.id, 0)], Kind::Validation),
            (customer::Id::new(), vec![draft(widget.id, 1)], Kind::NotFound),
            (
                john.id,
                vec![draft(widget.id, 1), draft(inventory_item::Id::new(), 1)],
                Kind::NotFound,
            ),
        ];
        for (customer_id, items, kind) in cases {
            let err = svc
                .execute(CreateSalesOrder {
                    tenant_id,
                    customer_id,
                    items,
                    place_of_supply: None,
                })
                .await
                .unwrap_err();
            assert_eq!(err.kind(), kind, "{err}");
        }

        let orders = svc
            .execute(query::sales_orders::OfTenant::by(tenant_id))
            .await
            .unwrap();
        assert!(orders.is_empty());
    }
}
