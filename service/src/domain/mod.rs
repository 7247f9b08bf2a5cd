//! Domain definitions.

pub mod customer;
pub mod inventory_item;
pub mod invoice;
pub mod line;
pub mod sales_order;
pub mod sequence;
pub mod tenant;

pub use self::{
    customer::Customer, inventory_item::InventoryItem, invoice::Invoice,
    line::LineItem, sales_order::SalesOrder, tenant::Tenant,
};

/// Entity belonging to exactly one [`Tenant`].
pub trait Owned {
    /// Returns ID of the [`Tenant`] owning this entity.
    fn tenant_id(&self) -> tenant::Id;
}

/// Defines a random [UUID]-based entity ID type.
///
/// [UUID]: https://datatracker.ietf.org/doc/html/rfc4122
macro_rules! define_id {
    ($(#[doc = $doc:literal])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            ::serde::Deserialize,
            ::derive_more::Display,
            Eq,
            ::derive_more::From,
            ::derive_more::FromStr,
            Hash,
            ::derive_more::Into,
            PartialEq,
            ::serde::Serialize,
        )]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Creates a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }
    };
}

/// Defines a trimmed non-empty text type limited to `$max` bytes.
macro_rules! define_text {
    ($(#[doc = $doc:literal])* $name:ident, max = $max:literal) => {
        $(#[doc = $doc])*
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            PartialEq,
        )]
        #[as_ref(str, String)]
        pub struct $name(String);

        impl $name {
            /// Creates a new value out of the provided `text` with its
            /// surrounding whitespace trimmed, if it's non-empty and fits the
            /// length limit.
            #[must_use]
            pub fn new(text: impl Into<String>) -> Option<Self> {
                let text = text.into();
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed.len() > $max {
                    return None;
                }
                Some(Self(if trimmed.len() == text.len() {
                    text
                } else {
                    trimmed.to_owned()
                }))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
                    .ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }
    };
}

pub(crate) use define_id;
pub(crate) use define_text;
