//! [`Command`] for cancelling an [`Invoice`].

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

/// [`Command`] for cancelling a [`invoice::Status::Pending`] or
/// [`invoice::Status::Overdue`] [`Invoice`].
#[derive(Clone, Copy, Debug)]
pub struct CancelInvoice {
    /// ID of the [`Tenant`] the [`Invoice`] belongs to.
    pub tenant_id: tenant::Id,

    /// ID of the [`Invoice`] to cancel.
    pub invoice_id: invoice::Id,
}

impl<Db> Command<CancelInvoice> for Service<Db>
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
        cmd: CancelInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelInvoice {
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
            .cancel(DateTime::now().coerce())
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
            "`Invoice(id: {}, number: {})` is cancelled",
            invoice.id,
            invoice.number,
        );

        Ok(invoice)
    }
}

/// Error of [`CancelInvoice`] [`Command`] execution.
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
    use crate::{
        command::MarkInvoicePaid,
        domain::{invoice, tenant},
        error::{Classify as _, Kind},
        fixture, Command as _,
    };

    use super::CancelInvoice;

    #[tokio::test]
    async fn cancels_only_open_invoices() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let order = fixture::sales_order(&svc, &john, &[(&widget, 1)]).await;
        let open = fixture::invoice(&svc, &order).await;
        let paid = fixture::invoice(&svc, &order).await;
        _ = svc
            .execute(MarkInvoicePaid {
                tenant_id,
                invoice_id: paid.id,
            })
            .await
            .unwrap();

        let cancelled = svc
            .execute(CancelInvoice {
                tenant_id,
                invoice_id: open.id,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status(), invoice::Status::Cancelled);
        assert!(cancelled.cancelled_at.is_some());

        for invoice_id in [open.id, paid.id] {
            let err = svc
                .execute(CancelInvoice {
                    tenant_id,
                    invoice_id,
                })
                .await
                .unwrap_err();
            assert_eq!(err.kind(), Kind::InvalidStateTransition);
        }

        let err = svc
            .execute(MarkInvoicePaid {
                tenant_id,
                invoice_id: open.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Kind::InvalidStateTransition);
    }

    #[tokio::test]
    async fn concurrent_payment_and_cancellation_have_single_winner() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let order = fixture::sales_order(&svc, &john, &[(&widget, 1)]).await;
        let open = fixture::invoice(&svc, &order).await;

        let (paid, cancelled) = tokio::join!(
            svc.execute(MarkInvoicePaid {
                tenant_id,
                invoice_id: open.id,
            }),
            svc.execute(CancelInvoice {
                tenant_id,
                invoice_id: open.id,
            }),
        );

        match (paid, cancelled) {
            (Ok(inv), Err(e)) => {
                assert_eq!(inv.status(), invoice::Status::Paid);
                assert_eq!(e.kind(), Kind::InvalidStateTransition);
            }
            (Err(e), Ok(inv)) => {
                assert_eq!(inv.status(), invoice::Status::Cancelled);
                assert_eq!(e.kind(), Kind::InvalidStateTransition);
            }
            (paid, cancelled) => panic!(
                "expected a single winner, got {:?} and {:?}",
                paid.map(|i| i.status()),
                cancelled.map(|i| i.status()),
            ),
        }
    }
}
