//! [`Command`] for marking an [`Invoice`] as paid.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        invoice::{self, TransitionError},
        tenant, Invoice, Tenant,
    },
    error::{Classify, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a [`invoice::Status::Pending`] or
/// [`invoice::Status::Overdue`] [`Invoice`] as paid.
#[derive(Clone, Copy, Debug)]
pub struct MarkInvoicePaid {
    /// ID of the [`Tenant`] the [`Invoice`] belongs to.
    pub tenant_id: tenant::Id,

    /// ID of the paid [`Invoice`].
    pub invoice_id: invoice::Id,
}

impl<Db> Command<MarkInvoicePaid> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Tenant, tenant::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Invoice>, (tenant::Id, invoice::Id)>>,
            Ok = Option<Invoice>,
            Err = Traced<database::Error>,
        > + Database<Update<Invoice>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Invoice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MarkInvoicePaid,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MarkInvoicePaid {
            tenant_id,
            invoice_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut invoice = tx
            .execute(Select(By::<Option<Invoice>, _>::new((
                tenant_id, invoice_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvoiceNotExists(invoice_id))
            .map_err(tracerr::wrap!())?;

        invoice
            .mark_paid(DateTime::now().coerce())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(invoice.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`Invoice(id: {}, number: {})` is paid",
            invoice.id,
            invoice.number,
        );

        Ok(invoice)
    }
}

/// Error of [`MarkInvoicePaid`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Invoice`] with the provided ID does not exist.
    #[display("`Invoice(id: {_0})` does not exist")]
    #[from(ignore)]
    InvoiceNotExists(#[error(not(source))] invoice::Id),

    /// [`Invoice`] is already paid or cancelled.
    #[display("{_0}")]
    Transition(TransitionError),
}

impl Classify for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::InvoiceNotExists(_) => Kind::NotFound,
            Self::Transition(_) => Kind::InvalidStateTransition,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        command::CreateInvoice,
        domain::{invoice, tenant},
        error::{Classify as _, Kind},
        fixture, Command as _,
    };

    use super::MarkInvoicePaid;

    #[tokio::test]
    async fn pays_pending_and_overdue_invoices_once() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let order = fixture::sales_order(&svc, &john, &[(&widget, 1)]).await;
        let issued = DateTime::now() - 30 * fixture::DAY;
        let overdue = svc
            .execute(CreateInvoice {
                tenant_id,
                customer_id: john.id,
                sales_order_id: Some(order.id),
                items: None,
                issued_at: Some(issued.coerce()),
                due_at: None,
                notes: None,
                terms: None,
            })
            .await
            .unwrap();
        assert_eq!(overdue.status(), invoice::Status::Overdue);

        let paid = svc
            .execute(MarkInvoicePaid {
                tenant_id,
                invoice_id: overdue.id,
            })
            .await
            .unwrap();
        assert_eq!(paid.status(), invoice::Status::Paid);
        assert!(paid.paid_at.is_some());

        let err = svc
            .execute(MarkInvoicePaid {
                tenant_id,
                invoice_id: overdue.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidStateTransition);
    }

    #[tokio::test]
    async fn foreign_invoice_is_not_found() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let order = fixture::sales_order(&svc, &john, &[(&widget, 1)]).await;
        let invoice = fixture::invoice(&svc, &order).await;

        let err = svc
            .execute(MarkInvoicePaid {
                tenant_id: tenant::Id::new(),
                invoice_id: invoice.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Kind::NotFound);
    }
}
