//! [`Command`] for updating an existing [`Customer`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, tenant, Customer, Tenant},
    error::{Classify, Kind},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Customer`].
///
/// Only the provided fields are changed. Optional fields are cleared by
/// providing `Some(None)`.
#[derive(Clone, Debug)]
pub struct UpdateCustomer {
    /// ID of the [`Tenant`] the [`Customer`] belongs to.
    pub tenant_id: tenant::Id,

    /// ID of the [`Customer`] to update.
    pub customer_id: customer::Id,

    /// New [`customer::Name`].
    pub name: Option<customer::Name>,

    /// New [`customer::Email`].
    pub email: Option<customer::Email>,

    /// New [`customer::Phone`].
    pub phone: Option<Option<customer::Phone>>,

    /// New [`customer::Address`].
    pub address: Option<Option<customer::Address>>,
}

impl<Db> Command<UpdateCustomer> for Service<Db>
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
            Select<By<Option<Customer>, (tenant::Id, customer::Email)>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Update<Customer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCustomer {
            tenant_id,
            customer_id,
            name,
            email,
            phone,
            address,
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

        let mut customer = tx
            .execute(Select(By::<Option<Customer>, _>::new((
                tenant_id,
                customer_id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())?;

        if let Some(email) = email {
            let holder = tx
                .execute(Select(By::<Option<Customer>, _>::new((
                    tenant_id,
                    email.clone(),
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if holder.is_some_and(|c| c.id != customer_id) {
                return Err(tracerr::new!(E::EmailOccupied(email)));
            }
            customer.email = email;
        }
        if let Some(name) = name {
            customer.name = name;
        }
        if let Some(phone) = phone {
            customer.phone = phone;
        }
        if let Some(address) = address {
            customer.address = address;
        }

        tx.execute(Update(customer.clone()))
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

/// Error of [`UpdateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    #[from(ignore)]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`customer::Email`] is already used by another [`Customer`] of the
    /// same [`Tenant`].
    #[display("`Customer(email: {_0})` already exists")]
    #[from(ignore)]
    EmailOccupied(#[error(not(source))] customer::Email),
}

impl Classify for ExecutionError {
    fn kind(&self) -> Kind {
        match self {
            Self::CustomerNotExists(_) => Kind::NotFound,
            Self::Db(e) => e.kind(),
            Self::EmailOccupied(_) => Kind::Conflict,
        }
    }
}
