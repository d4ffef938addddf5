use anyhow::{bail, Result};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_stored_time, Database};
use crate::models::{Customer, CustomerFields};
use crate::time::to_storage_string;

impl Database {
    // ==================== CUSTOMER CREATE ====================

    /// Store a new customer; returns it under its assigned identifier.
    pub fn insert_customer(&self, customer: &Customer) -> Result<Customer> {
        if customer.is_persisted() {
            bail!("customer {} is already stored", customer.id());
        }

        self.conn.execute(
            r#"INSERT INTO customers (
                name, address, postal_code, phone, created_at, created_by,
                updated_at, updated_by, division_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                customer.name(),
                customer.address(),
                customer.postal_code(),
                customer.phone(),
                to_storage_string(&customer.created_at()),
                customer.created_by(),
                to_storage_string(&customer.updated_at()),
                customer.updated_by(),
                customer.division_id(),
            ],
        )?;

        let id = i32::try_from(self.conn.last_insert_rowid())?;
        tracing::debug!(id, "inserted customer");
        Ok(customer.with_id(id))
    }

    // ==================== CUSTOMER READ ====================

    pub fn get_customer(&self, id: i32) -> Result<Option<Customer>> {
        let customer = self
            .conn
            .query_row(
                "SELECT * FROM customers WHERE id = ?",
                [id],
                Self::row_to_customer,
            )
            .optional()?;
        Ok(customer)
    }

    pub fn list_customers(&self) -> Result<Vec<Customer>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM customers ORDER BY name ASC, id ASC")?;

        let customers = stmt
            .query_map([], Self::row_to_customer)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(customers)
    }

    // ==================== CUSTOMER UPDATE / DELETE ====================

    /// Overwrite the stored row with `customer`. Returns false if no row matched.
    pub fn update_customer(&self, customer: &Customer) -> Result<bool> {
        let rows = self.conn.execute(
            r#"UPDATE customers SET
                name = ?, address = ?, postal_code = ?, phone = ?,
                updated_at = ?, updated_by = ?, division_id = ?
               WHERE id = ?"#,
            params![
                customer.name(),
                customer.address(),
                customer.postal_code(),
                customer.phone(),
                to_storage_string(&customer.updated_at()),
                customer.updated_by(),
                customer.division_id(),
                customer.id(),
            ],
        )?;
        Ok(rows > 0)
    }

    /// Delete a customer along with its appointments.
    pub fn delete_customer(&self, id: i32) -> Result<bool> {
        let appointments: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM appointments WHERE customer_id = ?",
            [id],
            |row| row.get(0),
        )?;
        let rows = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?", [id])?;
        if rows > 0 {
            tracing::info!(id, appointments, "deleted customer");
        }
        Ok(rows > 0)
    }

    fn row_to_customer(row: &Row) -> rusqlite::Result<Customer> {
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Customer::with_fields(
            row.get("id")?,
            CustomerFields {
                name: row.get("name")?,
                address: row.get("address")?,
                postal_code: row.get("postal_code")?,
                phone: row.get("phone")?,
                created_at: parse_stored_time(5, &created_at)?,
                created_by: row.get("created_by")?,
                updated_at: parse_stored_time(7, &updated_at)?,
                updated_by: row.get("updated_by")?,
                division_id: row.get("division_id")?,
            },
        ))
    }
}
