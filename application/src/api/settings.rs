//! [`Settings`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar, Nullable};
use service::{command, domain};

use crate::{api::scalar, Context};

/// Company identity and address of the current tenant, printed on its
/// documents.
#[derive(Clone, Debug, From)]
pub struct Settings(domain::tenant::Settings);

/// Company identity and address of the current tenant.
///
/// Every field is `null` until set.
#[graphql_object(name = "TenantSettings", context = Context)]
impl Settings {
    /// Legal name of the company.
    #[must_use]
    pub fn company_name(&self) -> Option<Value> {
        self.0.company_name.clone().map(Into::into)
    }

    /// Contact email of the company.
    #[must_use]
    pub fn email(&self) -> Option<Value> {
        self.0.email.clone().map(Into::into)
    }

    /// Contact phone of the company.
    #[must_use]
    pub fn phone(&self) -> Option<Value> {
        self.0.phone.clone().map(Into::into)
    }

    /// Website of the company.
    #[must_use]
    pub fn website(&self) -> Option<Value> {
        self.0.website.clone().map(Into::into)
    }

    /// GST registration number of the company.
    #[must_use]
    pub fn gst_number(&self) -> Option<Value> {
        self.0.gst_number.clone().map(Into::into)
    }

    /// First line of the company address.
    #[must_use]
    pub fn address_line1(&self) -> Option<Value> {
        self.0.address_line1.clone().map(Into::into)
    }

    /// Second line of the company address.
    #[must_use]
    pub fn address_line2(&self) -> Option<Value> {
        self.0.address_line2.clone().map(Into::into)
    }

    /// City of the company address.
    #[must_use]
    pub fn city(&self) -> Option<Value> {
        self.0.city.clone().map(Into::into)
    }

    /// State of the company address.
    #[must_use]
    pub fn state(&self) -> Option<Value> {
        self.0.state.clone().map(Into::into)
    }

    /// Postal code of the company address.
    #[must_use]
    pub fn pincode(&self) -> Option<Value> {
        self.0.pincode.clone().map(Into::into)
    }

    /// Country of the company address.
    #[must_use]
    pub fn country(&self) -> Option<Value> {
        self.0.country.clone().map(Into::into)
    }

    /// `DateTime` when these `TenantSettings` were last saved.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime> {
        self.0.updated_at.map(|at| at.coerce())
    }
}

/// Partial update of the `TenantSettings`.
///
/// Omitted fields are left intact, `null` ones are cleared.
#[derive(Clone, Debug, Default, GraphQLInputObject)]
#[graphql(name = "TenantSettingsInput")]
pub struct Input {
    /// Legal name of the company.
    pub company_name: Nullable<Value>,

    /// Contact email of the company.
    pub email: Nullable<Value>,

    /// Contact phone of the company.
    pub phone: Nullable<Value>,

    /// Website of the company.
    pub website: Nullable<Value>,

    /// GST registration number of the company.
    pub gst_number: Nullable<Value>,

    /// First line of the company address.
    pub address_line1: Nullable<Value>,

    /// Second line of the company address.
    pub address_line2: Nullable<Value>,

    /// City of the company address.
    pub city: Nullable<Value>,

    /// State of the company address.
    pub state: Nullable<Value>,

    /// Postal code of the company address.
    pub pincode: Nullable<Value>,

    /// Country of the company address.
    pub country: Nullable<Value>,
}

impl Input {
    /// Turns this [`Input`] into a [`command::UpdateTenantSettings`] of the
    /// provided tenant.
    #[must_use]
    pub fn into_command(
        self,
        tenant_id: domain::tenant::Id,
    ) -> command::UpdateTenantSettings {
        /// Converts a [`Nullable`] field into a partial update one.
        fn field(
            value: Nullable<Value>,
        ) -> Option<Option<domain::tenant::settings::Value>> {
            value.explicit().map(|v| v.map(Into::into))
        }

        let Self {
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
        } = self;
        command::UpdateTenantSettings {
            tenant_id,
            company_name: field(company_name),
            email: field(email),
            phone: field(phone),
            website: field(website),
            gst_number: field(gst_number),
            address_line1: field(address_line1),
            address_line2: field(address_line2),
            city: field(city),
            state: field(state),
            pincode: field(pincode),
            country: field(country),
        }
    }
}

/// Value of a `TenantSettings` field.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "TenantSettingsValue",
    with = scalar::Via::<domain::tenant::settings::Value>,
)]
pub struct Value(domain::tenant::settings::Value);
