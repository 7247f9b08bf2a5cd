//! [`Command`] definition.

pub mod authorize_tenant_session;
pub mod cancel_invoice;
pub mod create_customer;
pub mod create_inventory_item;
pub mod create_invoice;
pub mod create_sales_order;
pub mod decide_sales_order;
pub mod delete_customer;
pub mod delete_inventory_item;
pub mod mark_invoice_paid;
pub mod update_customer;
pub mod update_inventory_item;
pub mod update_tenant_settings;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_tenant_session::AuthorizeTenantSession,
    cancel_invoice::CancelInvoice, create_customer::CreateCustomer,
    create_inventory_item::CreateInventoryItem, create_invoice::CreateInvoice,
    create_sales_order::CreateSalesOrder,
    decide_sales_order::DecideSalesOrder, delete_customer::DeleteCustomer,
    delete_inventory_item::DeleteInventoryItem,
    mark_invoice_paid::MarkInvoicePaid, update_customer::UpdateCustomer,
    update_inventory_item::UpdateInventoryItem,
    update_tenant_settings::UpdateTenantSettings,
};
