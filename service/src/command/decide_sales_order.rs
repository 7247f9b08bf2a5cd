//! [`Command`] for accepting or rejecting a [`SalesOrder`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        sales_order::{self, Decision, NotPendingError},
        tenant, SalesOrder, Tenant,
    },
    error::{Classify, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for applying a [`Decision`] to a
/// [`sales_order::Status::Pending`] [`SalesOrder`].
#[derive(Clone, Copy, Debug)]
pub struct DecideSalesOrder {
    /// ID of the [`Tenant`] the [`SalesOrder`] belongs to.
    pub tenant_id: tenant::Id,

    /// ID of the [`SalesOrder`] to decide upon.
    pub order_id: sales_order::Id,

    /// [`Decision`] to apply.
    pub decision: Decision,
}

impl<Db> Command<DecideSalesOrder> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Tenant, tenant::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<SalesOrder>, (tenant::Id, sales_order::Id)>>,
            Ok = Option<SalesOrder>,
            Err = Traced<database::Error>,
        > + Database<Update<SalesOrder>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = SalesOrder;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DecideSalesOrder,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DecideSalesOrder {
            tenant_id,
            order_id,
            decision,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Only one of concurrent decisions wins.
        tx.execute(Lock(By::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut order = tx
            .execute(Select(By::<Option<SalesOrder>, _>::new((
                tenant_id, order_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OrderNotExists(order_id))
            .map_err(tracerr::wrap!())?;

        order
            .decide(decision, DateTime::now().coerce())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "`SalesOrder(id: {}, number: {})` is `{}` now",
            order.id,
            order.number,
            order.status,
        );

        Ok(order)
    }
}

/// Error of [`DecideSalesOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`SalesOrder`] is not pending anymore.
    #[display("{_0}")]
    NotPending(NotPendingError),

    /// [`SalesOrder`] with the provided ID does not exist.
    #[display("`SalesOrder(id: {_0})` does not exist")]
    #[from(ignore)]
    OrderNotExists(#[error(not(source))] sales_order::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotPending(_) => Kind::InvalidStateTransition,
            Self::OrderNotExists(_) => Kind::NotFound,
        }
    }
}

#[cfg(test)]
mod spec {
    use futures::future;

    use crate::{
        domain::{
            sales_order::{self, Decision},
            tenant,
        },
        error::{Classify as _, Kind},
        fixture, Command as _,
    };

    use super::DecideSalesOrder;

    #[tokio::test]
    async fn decides_exactly_once() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let order = fixture::sales_order(&svc, &john, &[(&widget, 2)]).await;

        let accept = DecideSalesOrder {
            tenant_id,
            order_id: order.id,
            decision: Decision::Accept,
        };
        let accepted = svc.execute(accept).await.unwrap();
        assert_eq!(accepted.status, sales_order::Status::Accepted);
        assert!(accepted.decided_at.is_some());

        for decision in [Decision::Accept, Decision::Reject] {
            let err = svc
                .execute(DecideSalesOrder { decision, ..accept })
                .await
                .unwrap_err();
            assert_eq!(err.kind(), Kind::InvalidStateTransition);
        }
    }

    #[tokio::test]
    async fn concurrent_decisions_have_single_winner() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        let john = fixture::customer(&svc, tenant_id, "john@example.com").await;
        let widget = fixture::item(&svc, tenant_id, "Widget", 249_900).await;
        let order = fixture::sales_order(&svc, &john, &[(&widget, 1)]).await;

        let results = future::join_all([Decision::Accept, Decision::Reject].map(
            |decision| {
                svc.execute(DecideSalesOrder {
                    tenant_id,
                    order_id: order.id,
                    decision,
                })
            },
        ))
        .await;

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = results.into_iter().find_map(Result::err).unwrap();
        assert_eq!(loser.kind(), Kind::InvalidStateTransition);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let svc = fixture::service();

        let err = svc
            .execute(DecideSalesOrder {
                tenant_id: tenant::Id::new(),
                order_id: sales_order::Id::new(),
                decision: Decision::Reject,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Kind::NotFound);
    }
}
