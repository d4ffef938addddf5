use anyhow::{bail, Result};
use chrono::{DateTime, Utc};

use super::ui::status;
use super::AddArgs;
use crate::db::Database;
use crate::lookup::{ContactDirectory, CustomerDirectory, UserDirectory};
use crate::models::{Appointment, AppointmentFields};
use crate::time;

/// Parse a local "YYYY-MM-DD HH:MM" into the UTC instant it names.
pub(crate) fn parse_local(input: &str) -> Result<DateTime<Utc>> {
    let naive = time::parse_input(input)?;
    Ok(time::local_to_reference(&naive)?)
}

pub(crate) fn check_span(start: &DateTime<Utc>, end: &DateTime<Utc>) -> Result<()> {
    if end <= start {
        bail!("End time must be after start time");
    }
    Ok(())
}

/// Execute the add command
pub fn run_add(db: &Database, args: &AddArgs) -> Result<Appointment> {
    let start = parse_local(&args.start)?;
    let end = parse_local(&args.end)?;
    check_span(&start, &end)?;

    // Resolve every reference up front so a typo fails with a clear message.
    db.customer_name(args.customer)?;
    db.contact_name(args.contact)?;
    let user_name = db.user_name(args.user)?;
    let by = args.by.clone().unwrap_or(user_name);

    let now = Utc::now();
    let appointment = Appointment::new(AppointmentFields {
        title: args.title.trim().to_string(),
        description: args.description.trim().to_string(),
        location: args.location.trim().to_string(),
        kind: args.kind.trim().to_string(),
        start,
        end,
        created_at: now,
        created_by: by.clone(),
        updated_at: now,
        updated_by: by,
        customer_id: args.customer,
        user_id: args.user,
        contact_id: args.contact,
    });

    if appointment.title().is_empty() {
        bail!("Title cannot be empty");
    }

    let stored = db.insert_appointment(&appointment)?;
    status(&format!(
        "Scheduled {} (ID {}) for {}",
        stored.title(),
        stored.id(),
        stored.start_display()
    ));
    Ok(stored)
}
