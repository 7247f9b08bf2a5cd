//! Macros for defining kind enums.

/// Defines a fieldless enum, whose variants are displayed and parsed in
/// `SCREAMING_SNAKE_CASE` (`Kind::SalesOrder` is `SALES_ORDER`).
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
/// #
/// define_kind! {
///     #[doc = "Status of a parcel."]
///     enum Status {
///         #[doc = "Waiting in a warehouse."]
///         InStock,
///
///         #[doc = "Handed over to a recipient."]
///         Delivered,
///     }
/// }
///
/// assert_eq!(Status::InStock.to_string(), "IN_STOCK");
/// assert_eq!("DELIVERED".parse::<Status>(), Ok(Status::Delivered));
/// assert!("delivered".parse::<Status>().is_err());
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        #[doc = $doc]
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                #[doc = $variant_doc]
                $variant,
            )*
        }
    };
}
