use anyhow::{anyhow, Result};

use crate::db::Database;
use crate::lookup::{Directory, LookupResult};
use crate::models::Appointment;
use crate::time;

/// Execute the show command
pub fn run_show(db: &Database, id: i32) -> Result<()> {
    let appointment = db
        .get_appointment(id)?
        .ok_or_else(|| anyhow!("No appointment with ID {}", id))?;
    let region = db.get_customer(appointment.customer_id())?.map(|customer| {
        let division = or_unknown(customer.division_name(db));
        let country = or_unknown(customer.country_name(db));
        format!("{}, {}", division, country)
    });

    for line in detail_lines(&appointment, db, region.as_deref()) {
        println!("{}", line);
    }
    Ok(())
}

/// Full appointment details, only non-empty fields.
fn detail_lines<D: Directory + ?Sized>(
    appointment: &Appointment,
    directory: &D,
    customer_region: Option<&str>,
) -> Vec<String> {
    let mut lines = vec![format!("{}\n", appointment.title())];

    if appointment.local_start_date() == appointment.local_end_date() {
        lines.push(format!(
            "  {} {} - {}",
            appointment.local_start_date().format("%a %b %-d, %Y"),
            appointment.local_start_string(),
            appointment.local_end_string()
        ));
    } else {
        lines.push(format!(
            "  {} - {}",
            appointment.start_display(),
            appointment.end_display()
        ));
    }

    if !appointment.kind().is_empty() {
        lines.push(format!("  Type: {}", appointment.kind()));
    }
    if !appointment.location().is_empty() {
        lines.push(format!("  Location: {}", appointment.location()));
    }
    if !appointment.description().is_empty() {
        lines.push(format!("  {}", appointment.description()));
    }

    let customer = or_unknown(appointment.customer_name(directory));
    match customer_region {
        Some(region) => lines.push(format!("\n  Customer: {} ({})", customer, region)),
        None => lines.push(format!("\n  Customer: {}", customer)),
    }
    lines.push(format!("  Contact: {}", or_unknown(appointment.contact_name(directory))));
    lines.push(format!("  User: {}", or_unknown(appointment.user_name(directory))));

    lines.push(format!(
        "\n  Created {} by {}",
        time::to_display_string(&time::to_local(&appointment.created_at())),
        appointment.created_by()
    ));
    lines.push(format!(
        "  Updated {} by {}",
        time::to_display_string(&time::to_local(&appointment.updated_at())),
        appointment.updated_by()
    ));
    lines.push(format!("  ID {}", appointment.id()));
    lines
}

fn or_unknown(result: LookupResult<String>) -> String {
    result.unwrap_or_else(|e| {
        tracing::warn!("{}", e);
        "(unknown)".to_string()
    })
}
