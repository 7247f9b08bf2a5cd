//! GraphQL API definitions.

pub mod customer;
pub mod inventory_item;
pub mod invoice;
pub mod line;
mod mutation;
mod query;
pub mod sales_order;
pub mod scalar;
pub mod settings;
mod subscription;

pub use self::{
    customer::Customer, inventory_item::InventoryItem, invoice::Invoice,
    line::LineItem, mutation::Mutation, query::Query, sales_order::SalesOrder,
    settings::Settings, subscription::Subscription,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;
