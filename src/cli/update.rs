use anyhow::{anyhow, bail, Result};
use chrono::Utc;

use super::add::{check_span, parse_local};
use super::ui::status;
use super::UpdateArgs;
use crate::db::Database;
use crate::lookup::{ContactDirectory, CustomerDirectory, UserDirectory};
use crate::models::Appointment;

/// Execute the update command.
///
/// Records are immutable, so the result is a new appointment built from the
/// stored one with the given fields replaced and a fresh last-update stamp.
pub fn run_update(db: &Database, args: &UpdateArgs) -> Result<Appointment> {
    let current = db
        .get_appointment(args.id)?
        .ok_or_else(|| anyhow!("No appointment with ID {}", args.id))?;

    let mut fields = current.to_fields();
    if let Some(ref title) = args.title {
        if title.trim().is_empty() {
            bail!("Title cannot be empty");
        }
        fields.title = title.trim().to_string();
    }
    if let Some(ref description) = args.description {
        fields.description = description.trim().to_string();
    }
    if let Some(ref location) = args.location {
        fields.location = location.trim().to_string();
    }
    if let Some(ref kind) = args.kind {
        fields.kind = kind.trim().to_string();
    }
    if let Some(ref start) = args.start {
        fields.start = parse_local(start)?;
    }
    if let Some(ref end) = args.end {
        fields.end = parse_local(end)?;
    }
    if let Some(customer) = args.customer {
        db.customer_name(customer)?;
        fields.customer_id = customer;
    }
    if let Some(contact) = args.contact {
        db.contact_name(contact)?;
        fields.contact_id = contact;
    }
    if let Some(user) = args.user {
        db.user_name(user)?;
        fields.user_id = user;
    }
    check_span(&fields.start, &fields.end)?;

    let by = match args.by {
        Some(ref by) => by.clone(),
        None => db.user_name(fields.user_id)?,
    };
    let updated = Appointment::with_fields(current.id(), fields).with_update(&Utc::now(), &by);

    if !db.update_appointment(&updated)? {
        bail!("Appointment {} disappeared during update", args.id);
    }
    status(&format!("Updated {} (ID {})", updated.title(), updated.id()));
    Ok(updated)
}
