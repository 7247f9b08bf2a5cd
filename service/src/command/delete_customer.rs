//! [`Command`] for deleting a [`Customer`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Invoice, SalesOrder};
use crate::{
    domain::{customer, tenant, Customer, Tenant},
    error::{Classify, Kind},
    infra::{database, Database},
    read::customer::IsReferenced,
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Customer`] not referenced by any
/// [`SalesOrder`] or [`Invoice`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteCustomer {
    /// ID of the [`Tenant`] the [`Customer`] belongs to.
    pub tenant_id: tenant::Id,

    /// ID of the [`Customer`] to delete.
    pub customer_id: customer::Id,
}

impl<Db> Command<DeleteCustomer> for Service<Db>
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
            Select<By<IsReferenced, (tenant::Id, customer::Id)>>,
            Ok = IsReferenced,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Customer, customer::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteCustomer {
            tenant_id,
            customer_id,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with documents being created for the `Customer`.
        tx.execute(Lock(By::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let customer = tx
            .execute(Select(By::<Option<Customer>, _>::new((
                tenant_id,
                customer_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        let referenced = tx
            .execute(Select(By::<IsReferenced, _>::new((
                tenant_id,
                customer_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *referenced {
            return Err(tracerr::new!(E::CustomerReferenced(customer_id)));
        }

        tx.execute(Delete(By::<Customer, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(customer)
    }
}

/// Error of [`DeleteCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Customer`] is referenced by a [`SalesOrder`] or an [`Invoice`].
    #[display("`Customer(id: {_0})` is referenced by documents")]
    #[from(ignore)]
    CustomerReferenced(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

impl Classify for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::CustomerNotExists(_) => Kind::NotFound,
            Self::CustomerReferenced(_) => Kind::Conflict,
            Self::Db(e) => e.kind(),
        }
    }
}
