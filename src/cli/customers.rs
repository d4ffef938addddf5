use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use serde::Serialize;

use super::ui::{confirm, status, term_width, truncate, warning};
use super::{AddCustomerArgs, UpdateCustomerArgs};
use crate::db::Database;
use crate::lookup::{LookupResult, RegionDirectory};
use crate::models::{Customer, CustomerFields};

/// A customer with its region names resolved, as listed by `customers`.
#[derive(Debug, Serialize)]
struct CustomerRow {
    id: i32,
    name: String,
    address: String,
    postal_code: String,
    phone: String,
    division: String,
    country: String,
}

impl CustomerRow {
    fn build<R: RegionDirectory + ?Sized>(customer: &Customer, regions: &R) -> Self {
        Self {
            id: customer.id(),
            name: customer.name().to_string(),
            address: customer.address().to_string(),
            postal_code: customer.postal_code().to_string(),
            phone: customer.phone().to_string(),
            division: or_unknown(customer.division_name(regions)),
            country: or_unknown(customer.country_name(regions)),
        }
    }
}

fn or_unknown(result: LookupResult<String>) -> String {
    result.unwrap_or_else(|e| {
        tracing::warn!("{}", e);
        "(unknown)".to_string()
    })
}

/// Execute the customers command
pub fn run_customers(db: &Database, json: bool) -> Result<()> {
    let rows: Vec<CustomerRow> = db
        .list_customers()?
        .iter()
        .map(|c| CustomerRow::build(c, db))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        status("No customers.");
        return Ok(());
    }

    for line in customer_lines(&rows, term_width()) {
        println!("{}", line);
    }
    Ok(())
}

fn customer_lines(rows: &[CustomerRow], width: usize) -> Vec<String> {
    // ID and phone keep their width, the rest share what is left.
    let id_width = 5;
    let phone_width = 16;
    let flexible = width.saturating_sub(id_width + phone_width + 4).max(12);
    let name_width = flexible * 2 / 5;
    let address_width = flexible - name_width;

    rows.iter()
        .map(|row| {
            let address = format!(
                "{}, {} {}, {}",
                row.address, row.division, row.postal_code, row.country
            );
            format!(
                "{:<id_width$} {:<name_width$} {:<phone_width$} {}",
                row.id,
                truncate(&row.name, name_width),
                truncate(&row.phone, phone_width),
                truncate(&address, address_width),
            )
        })
        .collect()
}

/// Execute the add-customer command
pub fn run_add_customer(db: &Database, args: &AddCustomerArgs) -> Result<Customer> {
    let name = args.name.trim();
    if name.is_empty() {
        bail!("Name cannot be empty");
    }
    let division_id = db
        .find_division_id(args.division.trim())?
        .ok_or_else(|| anyhow!("Unknown division: {}", args.division))?;

    let now = Utc::now();
    let customer = db.insert_customer(&Customer::new(CustomerFields {
        name: name.to_string(),
        address: args.address.trim().to_string(),
        postal_code: args.postal_code.trim().to_string(),
        phone: args.phone.trim().to_string(),
        created_at: now,
        created_by: args.by.clone(),
        updated_at: now,
        updated_by: args.by.clone(),
        division_id,
    }))?;

    status(&format!("Added {} (ID {})", customer.name(), customer.id()));
    Ok(customer)
}

/// Execute the update-customer command
pub fn run_update_customer(db: &Database, args: &UpdateCustomerArgs) -> Result<Customer> {
    let current = db
        .get_customer(args.id)?
        .ok_or_else(|| anyhow!("No customer with ID {}", args.id))?;

    let mut fields = current.to_fields();
    if let Some(ref name) = args.name {
        if name.trim().is_empty() {
            bail!("Name cannot be empty");
        }
        fields.name = name.trim().to_string();
    }
    if let Some(ref address) = args.address {
        fields.address = address.trim().to_string();
    }
    if let Some(ref postal_code) = args.postal_code {
        fields.postal_code = postal_code.trim().to_string();
    }
    if let Some(ref phone) = args.phone {
        fields.phone = phone.trim().to_string();
    }
    if let Some(ref division) = args.division {
        fields.division_id = db
            .find_division_id(division.trim())?
            .ok_or_else(|| anyhow!("Unknown division: {}", division))?;
    }

    let updated = Customer::with_fields(current.id(), fields).with_update(&Utc::now(), &args.by);
    if !db.update_customer(&updated)? {
        bail!("Customer {} disappeared during update", args.id);
    }
    status(&format!("Updated {} (ID {})", updated.name(), updated.id()));
    Ok(updated)
}

/// Execute the delete-customer command. Removes the customer's appointments too.
pub fn run_delete_customer(db: &Database, id: i32, force: bool) -> Result<bool> {
    let customer = db
        .get_customer(id)?
        .ok_or_else(|| anyhow!("No customer with ID {}", id))?;
    let appointments = db.appointments_for_customer(id)?.len();

    println!("{}", customer.name());
    if appointments > 0 {
        println!("  {} appointment(s) will also be deleted", appointments);
    }
    println!();

    if !force && !confirm(&format!("Delete {}?", customer.name())) {
        return Ok(false);
    }

    if !db.delete_customer(id)? {
        bail!("failed to delete customer {}", id);
    }
    status(&format!("Deleted customer ID {}: {}", id, customer.name()));
    Ok(true)
}

/// Execute the seed command
pub fn run_seed(db: &Database) -> Result<()> {
    let summary = db.seed_reference_data()?;
    if summary.is_empty() {
        warning("reference data already present; nothing seeded");
        return Ok(());
    }
    status(&format!(
        "Seeded {} countries, {} divisions, {} users, {} contacts.",
        summary.countries, summary.divisions, summary.users, summary.contacts
    ));
    Ok(())
}
