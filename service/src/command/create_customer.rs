//! [`Command`] for creating a new [`Customer`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
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

/// [`Command`] for creating a new [`Customer`].
#[derive(Clone, Debug)]
pub struct CreateCustomer {
    /// ID of the [`Tenant`] to create the [`Customer`] for.
    pub tenant_id: tenant::Id,

    /// [`customer::Name`] of a new [`Customer`].
    pub name: customer::Name,

    /// [`customer::Email`] of a new [`Customer`].
    pub email: customer::Email,

    /// [`customer::Phone`] of a new [`Customer`].
    pub phone: Option<customer::Phone>,

    /// [`customer::Address`] of a new [`Customer`].
    pub address: Option<customer::Address>,
}

impl<Db> Command<CreateCustomer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Tenant, tenant::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Customer>, (tenant::Id, customer::Email)>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Insert<Customer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCustomer {
            tenant_id,
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

        // Avoid concurrent creation of `Customer`s with the same email.
        tx.execute(Lock(By::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<Customer>, _>::new((
                tenant_id,
                email.clone(),
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let customer = Customer {
            id: customer::Id::new(),
            tenant_id,
            name,
            email,
            phone,
            address,
            created_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(customer.clone()))
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

/// Error of [`CreateCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
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
            Self::Db(e) => e.kind(),
            Self::EmailOccupied(_) => Kind::Conflict,
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{customer, tenant},
        error::{Classify as _, Kind},
        fixture, query, Command as _, Query as _,
    };

    use super::CreateCustomer;

    #[tokio::test]
    async fn creates_customer() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();

        let created = svc
            .execute(CreateCustomer {
                tenant_id,
                name: customer::Name::new("  John Doe ").unwrap(),
                email: customer::Email::new("john@example.com").unwrap(),
                phone: Some(customer::Phone::new("+1 555 0100").unwrap()),
                address: None,
            })
            .await
            .unwrap();

        assert_eq!(created.name.to_string(), "John Doe");
        let stored = svc
            .execute(query::customer::ById::by((tenant_id, created.id)))
            .await
            .unwrap();
        assert_eq!(stored, Some(created));
    }

    #[tokio::test]
    async fn rejects_duplicate_email_within_tenant() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();
        _ = fixture::customer(&svc, tenant_id, "john@example.com").await;

        let err = svc
            .execute(CreateCustomer {
                tenant_id,
                name: customer::Name::new("Johnny").unwrap(),
                email: customer::Email::new("John@Example.com").unwrap(),
                phone: None,
                address: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Kind::Conflict);

        // Other tenants are not affected.
        _ = fixture::customer(&svc, tenant::Id::new(), "john@example.com")
            .await;
    }
}
