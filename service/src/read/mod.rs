//! Read entities definitions.

pub mod customer;
pub mod inventory_item;
