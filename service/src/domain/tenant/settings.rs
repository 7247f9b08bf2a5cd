//! [`Settings`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};

#[cfg(doc)]
use crate::domain::Tenant;
use crate::domain::{define_text, tenant, Owned};

/// Company identity and address of a [`Tenant`], printed on its documents.
///
/// Every field is optional free-form text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// ID of the [`Tenant`] these [`Settings`] belong to.
    pub tenant_id: tenant::Id,

    /// Legal name of the company.
    pub company_name: Option<Value>,

    /// Contact email of the company.
    pub email: Option<Value>,

    /// Contact phone of the company.
    pub phone: Option<Value>,

    /// Website of the company.
    pub website: Option<Value>,

    /// GST registration number of the company.
    pub gst_number: Option<Value>,

    /// First line of the company address.
    pub address_line1: Option<Value>,

    /// Second line of the company address.
    pub address_line2: Option<Value>,

    /// City of the company address.
    pub city: Option<Value>,

    /// State of the company address.
    pub state: Option<Value>,

    /// Postal code of the company address.
    pub pincode: Option<Value>,

    /// Country of the company address.
    pub country: Option<Value>,

    /// [`DateTime`] when these [`Settings`] were last saved.
    ///
    /// [`None`] if they never were.
    pub updated_at: Option<ModificationDateTime>,
}

impl Settings {
    /// Creates empty [`Settings`] of the provided [`Tenant`].
    #[must_use]
    pub fn empty(tenant_id: tenant::Id) -> Self {
        Self {
            tenant_id,
            company_name: None,
            email: None,
            phone: None,
            website: None,
            gst_number: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state: None,
            pincode: None,
            country: None,
            updated_at: None,
        }
    }
}

impl Owned for Settings {
    fn tenant_id(&self) -> tenant::Id {
        self.tenant_id
    }
}

define_text! {
    /// Value of a [`Settings`] field.
    Value, max = 512
}

/// [`DateTime`] when [`Settings`] were last modified.
pub type ModificationDateTime = DateTimeOf<(Settings, unit::Modification)>;
