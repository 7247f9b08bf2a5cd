//! [`Query`] collection related to a single [`Tenant`].

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Tenant;
use crate::{
    domain::tenant,
    infra::{database, Database},
    Service,
};

use super::Query;

/// Queries [`tenant::Settings`] of a [`Tenant`].
///
/// Empty [`tenant::Settings`] are returned if they were never saved.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    /// ID of the [`Tenant`] to query the [`tenant::Settings`] of.
    pub tenant_id: tenant::Id,
}

impl<Db> Query<Settings> for Service<Db>
where
    Db: Database<
        Select<By<Option<tenant::Settings>, tenant::Id>>,
        Ok = Option<tenant::Settings>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = tenant::Settings;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Settings { tenant_id }: Settings,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .database()
            .execute(Select(By::<Option<tenant::Settings>, _>::new(
                tenant_id,
            )))
            .await
            .map_err(tracerr::wrap!())?
            .unwrap_or_else(|| tenant::Settings::empty(tenant_id)))
    }
}
