//! [`Command`] for updating [`tenant::Settings`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{
        tenant::{self, settings::Value},
        Tenant,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating [`tenant::Settings`] of a [`Tenant`].
///
/// Only the provided fields are changed. A field is cleared by providing
/// `Some(None)`.
#[derive(Clone, Debug, Default)]
pub struct UpdateTenantSettings {
    /// ID of the [`Tenant`] to update the [`tenant::Settings`] of.
    pub tenant_id: tenant::Id,

    /// New legal name of the company.
    pub company_name: Option<Option<Value>>,

    /// New contact email of the company.
    pub email: Option<Option<Value>>,

    /// New contact phone of the company.
    pub phone: Option<Option<Value>>,

    /// New website of the company.
    pub website: Option<Option<Value>>,

    /// New GST registration number of the company.
    pub gst_number: Option<Option<Value>>,

    /// New first line of the company address.
    pub address_line1: Option<Option<Value>>,

    /// New second line of the company address.
    pub address_line2: Option<Option<Value>>,

    /// New city of the company address.
    pub city: Option<Option<Value>>,

    /// New state of the company address.
    pub state: Option<Option<Value>>,

    /// New postal code of the company address.
    pub pincode: Option<Option<Value>>,

    /// New country of the company address.
    pub country: Option<Option<Value>>,
}

impl<Db> Command<UpdateTenantSettings> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Tenant, tenant::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<tenant::Settings>, tenant::Id>>,
            Ok = Option<tenant::Settings>,
            Err = Traced<database::Error>,
        > + Database<Update<tenant::Settings>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = tenant::Settings;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateTenantSettings,
    ) -> Result<Self::Ok, Self::Err> {
        let UpdateTenantSettings {
            tenant_id,
            company_name,
            email,
            phone,
            website,
            gst_number,
            address_line1,
            address_line2,
            city,
            state,
            pincode,
            country,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        tx.execute(Lock(By::new(tenant_id)))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let mut settings = tx
            .execute(Select(By::<Option<tenant::Settings>, _>::new(
                tenant_id,
            )))
            .await
            .map_err(tracerr::wrap!())?
            .unwrap_or_else(|| tenant::Settings::empty(tenant_id));

        for (field, new) in [
            (&mut settings.company_name, company_name),
            (&mut settings.email, email),
            (&mut settings.phone, phone),
            (&mut settings.website, website),
            (&mut settings.gst_number, gst_number),
            (&mut settings.address_line1, address_line1),
            (&mut settings.address_line2, address_line2),
            (&mut settings.city, city),
            (&mut settings.state, state),
            (&mut settings.pincode, pincode),
            (&mut settings.country, country),
        ] {
            if let Some(new) = new {
                *field = new;
            }
        }
        settings.updated_at = Some(DateTime::now().coerce());

        tx.execute(Update(settings.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(settings)
    }
}

/// Error of [`UpdateTenantSettings`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{
        domain::tenant::{self, settings::Value},
        fixture, query, Command as _, Query as _,
    };

    use super::UpdateTenantSettings;

    fn value(s: &str) -> Option<Option<Value>> {
        Some(Value::new(s))
    }

    #[tokio::test]
    async fn sets_and_clears_provided_fields_only() {
        let svc = fixture::service();
        let tenant_id = tenant::Id::new();

        let empty = svc
            .execute(query::tenant::Settings { tenant_id })
            .await
            .unwrap();
        assert_eq!(empty, tenant::Settings::empty(tenant_id));

        _ = svc
            .execute(UpdateTenantSettings {
                tenant_id,
                company_name: value("Acme Traders"),
                gst_number: value("29ABCDE1234F1Z5"),
                city: value("Bengaluru"),
                ..UpdateTenantSettings::default()
            })
            .await
            .unwrap();
        let updated = svc
            .execute(UpdateTenantSettings {
                tenant_id,
                city: Some(None),
                country: value("India"),
                ..UpdateTenantSettings::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.company_name, Value::new("Acme Traders"));
        assert_eq!(updated.gst_number, Value::new("29ABCDE1234F1Z5"));
        assert_eq!(updated.city, None);
        assert_eq!(updated.country, Value::new("India"));
        assert!(updated.updated_at.is_some());

        let stored = svc
            .execute(query::tenant::Settings { tenant_id })
            .await
            .unwrap();
        assert_eq!(stored, updated);

        let other = svc
            .execute(query::tenant::Settings {
                tenant_id: tenant::Id::new(),
            })
            .await
            .unwrap();
        assert_eq!(other.company_name, None);
    }
}
