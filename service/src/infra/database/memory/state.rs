//! [`State`] of a [`Memory`] database.
//!
//! [`Memory`]: super::Memory

use std::{collections::HashMap, hash::Hash};

use crate::domain::{
    customer, inventory_item, invoice, sales_order, sequence, tenant,
    Customer, InventoryItem, Invoice, Owned, SalesOrder,
};

/// Whole data set of a [`Memory`] database.
///
/// [`Memory`]: super::Memory
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Customer`]s.
    pub customers: Table<Customer>,

    /// Stored [`InventoryItem`]s.
    pub inventory_items: Table<InventoryItem>,

    /// Stored [`SalesOrder`]s.
    pub sales_orders: Table<SalesOrder>,

    /// Stored [`Invoice`]s.
    pub invoices: Table<Invoice>,

    /// Stored [`tenant::Settings`].
    pub settings: HashMap<tenant::Id, tenant::Settings>,

    /// Stored [`sequence::Sequence`]s.
    pub sequences: HashMap<(tenant::Id, sequence::Kind), sequence::Sequence>,
}

impl State {
    /// Applies the provided [`Change`] to this [`State`].
    pub fn apply(&mut self, change: Change) {
        match change {
            Change::PutCustomer(c) => self.customers.put(c),
            Change::RemoveCustomer(id) => {
                _ = self.customers.remove(id);
            }
            Change::PutInventoryItem(i) => self.inventory_items.put(i),
            Change::RemoveInventoryItem(id) => {
                _ = self.inventory_items.remove(id);
            }
            Change::PutSalesOrder(o) => self.sales_orders.put(o),
            Change::PutInvoice(i) => self.invoices.put(i),
            Change::PutSettings(s) => {
                _ = self.settings.insert(s.tenant_id, s);
            }
            Change::PutSequence(s) => {
                _ = self.sequences.insert((s.tenant_id, s.kind), s);
            }
        }
    }
}

/// Single write to a [`State`].
#[derive(Clone, Debug)]
pub enum Change {
    /// Inserts or replaces a [`Customer`].
    PutCustomer(Customer),

    /// Removes a [`Customer`].
    RemoveCustomer(customer::Id),

    /// Inserts or replaces an [`InventoryItem`].
    PutInventoryItem(InventoryItem),

    /// Removes an [`InventoryItem`].
    RemoveInventoryItem(inventory_item::Id),

    /// Inserts or replaces a [`SalesOrder`].
    PutSalesOrder(SalesOrder),

    /// Inserts or replaces an [`Invoice`].
    PutInvoice(Invoice),

    /// Inserts or replaces [`tenant::Settings`].
    PutSettings(tenant::Settings),

    /// Inserts or replaces a [`sequence::Sequence`].
    PutSequence(sequence::Sequence),
}

/// Entity storable in a [`Table`].
pub trait Record: Clone + Owned {
    /// Type of the unique ID of this [`Record`].
    type Id: Copy + Eq + Hash;

    /// Returns the unique ID of this [`Record`].
    fn id(&self) -> Self::Id;
}

impl Record for Customer {
    type Id = customer::Id;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for InventoryItem {
    type Id = inventory_item::Id;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for SalesOrder {
    type Id = sales_order::Id;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Invoice {
    type Id = invoice::Id;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Collection of [`Record`]s kept in their insertion order.
#[derive(Clone, Debug)]
pub struct Table<T: Record> {
    /// [`Record`]s in their insertion order.
    rows: Vec<T>,

    /// Positions of the [`Record`]s in `rows`.
    index: HashMap<T::Id, usize>,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Record> Table<T> {
    /// Returns the [`Record`] with the provided ID, if it belongs to the
    /// provided [`tenant`].
    #[must_use]
    pub fn get(&self, tenant_id: tenant::Id, id: T::Id) -> Option<&T> {
        self.index
            .get(&id)
            .map(|&pos| &self.rows[pos])
            .filter(|row| row.tenant_id() == tenant_id)
    }

    /// Iterates over the [`Record`]s of the provided [`tenant`] in their
    /// insertion order.
    pub fn of_tenant(
        &self,
        tenant_id: tenant::Id,
    ) -> impl Iterator<Item = &T> + '_ {
        self.rows
            .iter()
            .filter(move |row| row.tenant_id() == tenant_id)
    }

    /// Inserts the provided [`Record`], or replaces the one with the same ID
    /// keeping its position.
    pub fn put(&mut self, row: T) {
        if let Some(&pos) = self.index.get(&row.id()) {
            self.rows[pos] = row;
        } else {
            _ = self.index.insert(row.id(), self.rows.len());
            self.rows.push(row);
        }
    }

    /// Removes the [`Record`] with the provided ID.
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let pos = self.index.remove(&id)?;
        let row = self.rows.remove(pos);
        for p in self.index.values_mut() {
            if *p > pos {
                *p -= 1;
            }
        }
        Some(row)
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{customer, tenant, Customer};

    use super::Table;

    fn customer(tenant_id: tenant::Id, name: &str) -> Customer {
        Customer {
            id: customer::Id::new(),
            tenant_id,
            name: customer::Name::new(name).unwrap(),
            email: customer::Email::new(format!("{name}@example.com"))
                .unwrap(),
            phone: None,
            address: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let tenant = tenant::Id::new();
        let mut table = Table::default();
        let a = customer(tenant, "a");
        let b = customer(tenant, "b");
        let c = customer(tenant, "c");

        table.put(a);
        table.put(b.clone());
        table.put(c);
        let mut renamed = b;
        renamed.name = customer::Name::new("bb").unwrap();
        table.put(renamed);

        let names = table
            .of_tenant(tenant)
            .map(|c| c.name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a", "bb", "c"]);
    }

    #[test]
    fn removes_keeping_index() {
        let tenant = tenant::Id::new();
        let mut table = Table::default();
        let a = customer(tenant, "a");
        let b = customer(tenant, "b");
        let c = customer(tenant, "c");
        table.put(a.clone());
        table.put(b.clone());
        table.put(c.clone());

        assert_eq!(table.remove(a.id), Some(a.clone()));
        assert_eq!(table.remove(a.id), None);

        assert_eq!(table.get(tenant, b.id), Some(&b));
        assert_eq!(table.get(tenant, c.id), Some(&c));
        assert_eq!(table.of_tenant(tenant).count(), 2);
    }

    #[test]
    fn isolates_tenants() {
        let (mine, theirs) = (tenant::Id::new(), tenant::Id::new());
        let mut table = Table::default();
        let c = customer(theirs, "a");
        table.put(c.clone());

        assert_eq!(table.get(mine, c.id), None);
        assert_eq!(table.of_tenant(mine).count(), 0);
        assert_eq!(table.get(theirs, c.id), Some(&c));
    }
}
