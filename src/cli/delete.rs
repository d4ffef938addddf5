use anyhow::{anyhow, Result};

use super::ui::{confirm, status};
use crate::db::Database;
use crate::lookup::CustomerDirectory;
use crate::models::Appointment;

/// Execute the delete command
pub fn run_delete(db: &Database, id: i32, force: bool) -> Result<bool> {
    let appointment = db
        .get_appointment(id)?
        .ok_or_else(|| anyhow!("No appointment with ID {}", id))?;

    print_appointment_summary(db, &appointment);
    println!();

    if !force && !confirm(&format!("Delete {}?", appointment.title())) {
        return Ok(false);
    }

    if !db.delete_appointment(id)? {
        return Err(anyhow!("failed to delete appointment {}", id));
    }
    status(&format!(
        "Deleted appointment ID {}: {} ({})",
        appointment.id(),
        appointment.title(),
        appointment.kind()
    ));
    Ok(true)
}

fn print_appointment_summary(db: &Database, appointment: &Appointment) {
    println!("{}", appointment.title());
    println!(
        "  {} - {}",
        appointment.start_display(),
        appointment.end_display()
    );
    if let Ok(customer) = db.customer_name(appointment.customer_id()) {
        println!("  {}", customer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentFields, Customer, CustomerFields};
    use chrono::{Duration, TimeZone, Utc};

    fn setup_test_db() -> (Database, i32) {
        let db = Database::open_memory().unwrap();
        db.seed_reference_data().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let division_id = db.find_division_id("Alberta").unwrap().unwrap();
        let customer = db
            .insert_customer(&Customer::new(CustomerFields {
                name: "Daddy Warbucks".to_string(),
                address: "1919 Boardwalk".to_string(),
                postal_code: "01291".to_string(),
                phone: "869-908-1875".to_string(),
                created_at: at,
                created_by: "admin".to_string(),
                updated_at: at,
                updated_by: "admin".to_string(),
                division_id,
            }))
            .unwrap();
        let appointment = db
            .insert_appointment(&Appointment::new(AppointmentFields {
                title: "Quarterly sync".to_string(),
                description: String::new(),
                location: "Calgary".to_string(),
                kind: "De-Briefing".to_string(),
                start: at,
                end: at + Duration::hours(1),
                created_at: at,
                created_by: "test".to_string(),
                updated_at: at,
                updated_by: "test".to_string(),
                customer_id: customer.id(),
                user_id: 1,
                contact_id: 1,
            }))
            .unwrap();
        (db, appointment.id())
    }

    #[test]
    fn test_run_delete_forced() {
        let (db, id) = setup_test_db();
        assert!(run_delete(&db, id, true).unwrap());
        assert!(db.get_appointment(id).unwrap().is_none());
    }

    #[test]
    fn test_run_delete_missing() {
        let (db, id) = setup_test_db();
        assert!(run_delete(&db, id + 1, true).is_err());
        assert!(db.get_appointment(id).unwrap().is_some());
    }
}
