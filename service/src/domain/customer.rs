//! [`Customer`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display};
use regex::Regex;

#[cfg(doc)]
use crate::domain::Tenant;
use crate::domain::{define_id, define_text, tenant, Owned};

/// Customer of a [`Tenant`], the counterparty of its documents.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// ID of the [`Tenant`] this [`Customer`] belongs to.
    pub tenant_id: tenant::Id,

    /// [`Name`] of this [`Customer`].
    pub name: Name,

    /// [`Email`] of this [`Customer`], unique within its [`Tenant`].
    pub email: Email,

    /// [`Phone`] of this [`Customer`].
    pub phone: Option<Phone>,

    /// Postal [`Address`] of this [`Customer`].
    pub address: Option<Address>,

    /// [`DateTime`] when this [`Customer`] was created.
    pub created_at: CreationDateTime,
}

impl Owned for Customer {
    fn tenant_id(&self) -> tenant::Id {
        self.tenant_id
    }
}

define_id! {
    /// ID of a [`Customer`].
    Id
}

define_text! {
    /// Name of a [`Customer`].
    Name, max = 512
}

define_text! {
    /// Postal address of a [`Customer`].
    Address, max = 1024
}

/// Email address of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Indicates whether this [`Email`] denotes the same mailbox as the
    /// `other` one, ignoring the letter case.
    #[must_use]
    pub fn is_same_as(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: &str) -> bool {
        /// Regular expression checking [`Email`] format: a local part, a
        /// single `@` and a dotted domain, no whitespace anywhere.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$")
                .expect("valid regex")
        });

        address.len() <= 254 && REGEX.is_match(address)
    }
}

impl std::str::FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of a [`Customer`].
///
/// Loosely validated: digits with optional leading `+` and the usual
/// separators, so both `123-456-7890` and `+91 98765 43210` pass.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: &str) -> bool {
        /// Regular expression checking [`Phone`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[0-9(][0-9 ().\-]{1,30}[0-9]$")
                .expect("valid regex")
        });

        REGEX.is_match(number)
            && number.chars().filter(char::is_ascii_digit).count() >= 3
    }
}

impl std::str::FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// [`DateTime`] when a [`Customer`] was created.
pub type CreationDateTime = DateTimeOf<(Customer, unit::Creation)>;
