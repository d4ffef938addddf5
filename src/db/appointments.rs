use anyhow::{bail, Result};
use chrono::{DateTime, Local, TimeZone};
use rusqlite::{params, OptionalExtension, Params, Row};

use super::{parse_stored_time, Database};
use crate::filter::Period;
use crate::lookup::{AppointmentSource, LookupResult};
use crate::models::{Appointment, AppointmentFields};
use crate::time::to_storage_string;

impl Database {
    // ==================== APPOINTMENT CREATE ====================

    /// Store a new appointment; returns it under its assigned identifier.
    pub fn insert_appointment(&self, appointment: &Appointment) -> Result<Appointment> {
        if appointment.is_persisted() {
            bail!("appointment {} is already stored", appointment.id());
        }

        self.conn.execute(
            r#"INSERT INTO appointments (
                title, description, location, type, start_at, end_at,
                created_at, created_by, updated_at, updated_by,
                customer_id, user_id, contact_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                appointment.title(),
                appointment.description(),
                appointment.location(),
                appointment.kind(),
                to_storage_string(&appointment.start()),
                to_storage_string(&appointment.end()),
                to_storage_string(&appointment.created_at()),
                appointment.created_by(),
                to_storage_string(&appointment.updated_at()),
                appointment.updated_by(),
                appointment.customer_id(),
                appointment.user_id(),
                appointment.contact_id(),
            ],
        )?;

        let id = i32::try_from(self.conn.last_insert_rowid())?;
        tracing::debug!(id, "inserted appointment");
        Ok(appointment.with_id(id))
    }

    // ==================== APPOINTMENT READ ====================

    pub fn get_appointment(&self, id: i32) -> Result<Option<Appointment>> {
        let appointment = self
            .conn
            .query_row(
                "SELECT * FROM appointments WHERE id = ?",
                [id],
                Self::row_to_appointment,
            )
            .optional()?;
        Ok(appointment)
    }

    /// Every appointment, earliest first.
    pub fn list_appointments(&self) -> rusqlite::Result<Vec<Appointment>> {
        self.query_appointments("SELECT * FROM appointments ORDER BY start_at ASC, id ASC", [])
    }

    /// Appointments whose start falls in `period`, earliest first.
    pub fn appointments_in(&self, period: &Period) -> rusqlite::Result<Vec<Appointment>> {
        self.query_appointments(
            r#"SELECT * FROM appointments
               WHERE start_at >= ? AND start_at < ?
               ORDER BY start_at ASC, id ASC"#,
            params![to_storage_string(&period.start), to_storage_string(&period.end)],
        )
    }

    /// Appointments in the week containing `now`, starting on the configured weekday.
    pub fn appointments_for_week_of<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> rusqlite::Result<Vec<Appointment>> {
        let period = Period::week_of(now, self.week_start);
        tracing::debug!(start = %period.start, end = %period.end, "week");
        self.appointments_in(&period)
    }

    /// Appointments in the calendar month containing `now`.
    pub fn appointments_for_month_of<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> rusqlite::Result<Vec<Appointment>> {
        let period = Period::month_of(now);
        tracing::debug!(start = %period.start, end = %period.end, "month");
        self.appointments_in(&period)
    }

    pub fn appointments_for_customer(&self, customer_id: i32) -> rusqlite::Result<Vec<Appointment>> {
        self.query_appointments(
            "SELECT * FROM appointments WHERE customer_id = ? ORDER BY start_at ASC, id ASC",
            [customer_id],
        )
    }

    fn query_appointments<P: Params>(&self, sql: &str, params: P) -> rusqlite::Result<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(sql)?;
        let appointments = stmt
            .query_map(params, Self::row_to_appointment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(appointments)
    }

    // ==================== APPOINTMENT UPDATE / DELETE ====================

    /// Overwrite the stored row with `appointment`. Returns false if no row matched.
    pub fn update_appointment(&self, appointment: &Appointment) -> Result<bool> {
        let rows = self.conn.execute(
            r#"UPDATE appointments SET
                title = ?, description = ?, location = ?, type = ?,
                start_at = ?, end_at = ?, updated_at = ?, updated_by = ?,
                customer_id = ?, user_id = ?, contact_id = ?
               WHERE id = ?"#,
            params![
                appointment.title(),
                appointment.description(),
                appointment.location(),
                appointment.kind(),
                to_storage_string(&appointment.start()),
                to_storage_string(&appointment.end()),
                to_storage_string(&appointment.updated_at()),
                appointment.updated_by(),
                appointment.customer_id(),
                appointment.user_id(),
                appointment.contact_id(),
                appointment.id(),
            ],
        )?;
        Ok(rows > 0)
    }

    pub fn delete_appointment(&self, id: i32) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    fn row_to_appointment(row: &Row) -> rusqlite::Result<Appointment> {
        let start: String = row.get("start_at")?;
        let end: String = row.get("end_at")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Appointment::with_fields(
            row.get("id")?,
            AppointmentFields {
                title: row.get("title")?,
                description: row.get("description")?,
                location: row.get("location")?,
                kind: row.get("type")?,
                start: parse_stored_time(5, &start)?,
                end: parse_stored_time(6, &end)?,
                created_at: parse_stored_time(7, &created_at)?,
                created_by: row.get("created_by")?,
                updated_at: parse_stored_time(9, &updated_at)?,
                updated_by: row.get("updated_by")?,
                customer_id: row.get("customer_id")?,
                user_id: row.get("user_id")?,
                contact_id: row.get("contact_id")?,
            },
        ))
    }
}

impl AppointmentSource for Database {
    fn appointments_for_current_week(&self) -> LookupResult<Vec<Appointment>> {
        Ok(self.appointments_for_week_of(&Local::now())?)
    }

    fn appointments_for_current_month(&self) -> LookupResult<Vec<Appointment>> {
        Ok(self.appointments_for_month_of(&Local::now())?)
    }

    fn all_appointments(&self) -> LookupResult<Vec<Appointment>> {
        Ok(self.list_appointments()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::AppointmentFilter;
    use crate::lookup::CustomerDirectory;
    use crate::models::{Customer, CustomerFields};
    use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc, Weekday};

    struct Fixture {
        db: Database,
        customer_id: i32,
        user_id: i32,
        contact_id: i32,
    }

    fn setup_test_db() -> Fixture {
        let db = Database::open_memory().unwrap();
        db.seed_reference_data().unwrap();

        let now = Utc::now();
        let division_id = db.find_division_id("Arizona").unwrap().unwrap();
        let customer = db
            .insert_customer(&Customer::new(CustomerFields {
                name: "Daddy Warbucks".to_string(),
                address: "1919 Boardwalk".to_string(),
                postal_code: "01291".to_string(),
                phone: "869-908-1875".to_string(),
                created_at: now,
                created_by: "admin".to_string(),
                updated_at: now,
                updated_by: "admin".to_string(),
                division_id,
            }))
            .unwrap();

        Fixture {
            db,
            customer_id: customer.id(),
            user_id: 1,
            contact_id: 3,
        }
    }

    fn new_appointment(fx: &Fixture, title: &str, start: DateTime<Utc>) -> Appointment {
        Appointment::new(AppointmentFields {
            title: title.to_string(),
            description: "Description".to_string(),
            location: "Phoenix, Arizona".to_string(),
            kind: "De-Briefing".to_string(),
            start,
            end: start + Duration::hours(1),
            created_at: start,
            created_by: "test".to_string(),
            updated_at: start,
            updated_by: "test".to_string(),
            customer_id: fx.customer_id,
            user_id: fx.user_id,
            contact_id: fx.contact_id,
        })
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let fx = setup_test_db();
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 2, 30, 0).unwrap();
        let stored = fx.db.insert_appointment(&new_appointment(&fx, "Kickoff", start)).unwrap();
        assert!(stored.is_persisted());

        let loaded = fx.db.get_appointment(stored.id()).unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(loaded.title(), "Kickoff");
        assert_eq!(loaded.kind(), "De-Briefing");
        assert_eq!(loaded.start(), start);
        assert_eq!(loaded.end(), start + Duration::hours(1));
        assert_eq!(loaded.customer_name(&fx.db).unwrap(), "Daddy Warbucks");
        assert_eq!(loaded.contact_name(&fx.db).unwrap(), "Li Lee");
        assert_eq!(loaded.user_name(&fx.db).unwrap(), "test");
    }

    #[test]
    fn test_stored_times_are_relabelled_not_converted() {
        let fx = setup_test_db();
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let start = tz.with_ymd_and_hms(2024, 3, 10, 2, 30, 0).unwrap();
        let appointment = Appointment::new(AppointmentFields {
            title: "Zoned".to_string(),
            description: String::new(),
            location: String::new(),
            kind: "Planning Session".to_string(),
            start,
            end: start + Duration::minutes(45),
            created_at: start,
            created_by: "test".to_string(),
            updated_at: start,
            updated_by: "test".to_string(),
            customer_id: fx.customer_id,
            user_id: fx.user_id,
            contact_id: fx.contact_id,
        });

        let stored = fx.db.insert_appointment(&appointment).unwrap();
        let loaded = fx.db.get_appointment(stored.id()).unwrap().unwrap();
        assert_eq!(loaded.start().to_rfc3339(), "2024-03-10T02:30:00+00:00");
    }

    #[test]
    fn test_list_orders_by_start() {
        let fx = setup_test_db();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "Later", base + Duration::days(2))).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "Sooner", base)).unwrap();

        let titles: Vec<String> = fx
            .db
            .list_appointments()
            .unwrap()
            .iter()
            .map(|a| a.title().to_string())
            .collect();
        assert_eq!(titles, vec!["Sooner", "Later"]);
    }

    #[test]
    fn test_appointments_in_period_is_half_open() {
        let fx = setup_test_db();
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap();
        let week = Period::week_of(&now, Weekday::Sun);

        fx.db.insert_appointment(&new_appointment(&fx, "Before", week.start - Duration::minutes(1))).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "First", week.start)).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "Last", week.end - Duration::minutes(1))).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "After", week.end)).unwrap();

        let titles: Vec<String> = fx
            .db
            .appointments_in(&week)
            .unwrap()
            .iter()
            .map(|a| a.title().to_string())
            .collect();
        assert_eq!(titles, vec!["First", "Last"]);
    }

    #[test]
    fn test_current_week_and_month_sources() {
        let fx = setup_test_db();
        let now = Utc::now();
        fx.db.insert_appointment(&new_appointment(&fx, "Now", now)).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "Next year", now + Duration::days(400))).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "Last year", now - Duration::days(400))).unwrap();

        let week = AppointmentFilter::Week.fetch(&fx.db).unwrap();
        let month = AppointmentFilter::Month.fetch(&fx.db).unwrap();
        let all = AppointmentFilter::All.fetch(&fx.db).unwrap();

        assert_eq!(week.len(), 1);
        assert_eq!(week[0].title(), "Now");
        assert_eq!(month.len(), 1);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_week_start_setting_is_used() {
        let fx = setup_test_db();
        // Wednesday; the Sunday week starts Mar 10, the Monday week Mar 11.
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 12, 0, 0).unwrap();
        let sunday = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();
        let next_sunday = Utc.with_ymd_and_hms(2024, 3, 17, 9, 0, 0).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "Sunday", sunday)).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "Next Sunday", next_sunday)).unwrap();

        let titles = |db: &Database| -> Vec<String> {
            db.appointments_for_week_of(&now)
                .unwrap()
                .iter()
                .map(|a| a.title().to_string())
                .collect()
        };

        assert_eq!(titles(&fx.db), vec!["Sunday"]);

        let db = fx.db.with_week_start(Weekday::Mon);
        assert_eq!(db.week_start(), Weekday::Mon);
        assert_eq!(titles(&db), vec!["Next Sunday"]);
    }

    #[test]
    fn test_month_of_fixed_date() {
        let fx = setup_test_db();
        let now = Utc.with_ymd_and_hms(2024, 2, 14, 12, 0, 0).unwrap();
        let inside = Utc.with_ymd_and_hms(2024, 2, 29, 23, 0, 0).unwrap();
        let outside = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "Leap day", inside)).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "March", outside)).unwrap();

        let month = fx.db.appointments_for_month_of(&now).unwrap();
        assert_eq!(month.len(), 1);
        assert_eq!(month[0].title(), "Leap day");
    }

    #[test]
    fn test_oversized_rowid_is_an_error() {
        let fx = setup_test_db();
        fx.db
            .conn
            .execute(
                "INSERT INTO appointments (id, title, description, location, type, start_at, end_at,
                    created_at, created_by, updated_at, updated_by, customer_id, user_id, contact_id)
                 VALUES (3000000000, 'Big', '', '', 'x', '2024-01-01 00:00:00', '2024-01-01 01:00:00',
                    '2024-01-01 00:00:00', 'test', '2024-01-01 00:00:00', 'test', ?, 1, 1)",
                [fx.customer_id],
            )
            .unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        assert!(fx.db.insert_appointment(&new_appointment(&fx, "Next", start)).is_err());
    }

    #[test]
    fn test_update_replaces_fields() {
        let fx = setup_test_db();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 15, 0, 0).unwrap();
        let stored = fx.db.insert_appointment(&new_appointment(&fx, "Draft", start)).unwrap();

        let mut fields = stored.to_fields();
        fields.title = "Final".to_string();
        fields.start = start + Duration::hours(2);
        fields.end = start + Duration::hours(3);
        let edited = Appointment::with_fields(stored.id(), fields)
            .with_update(&Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap(), "admin");

        assert!(fx.db.update_appointment(&edited).unwrap());
        let loaded = fx.db.get_appointment(stored.id()).unwrap().unwrap();
        assert_eq!(loaded.title(), "Final");
        assert_eq!(loaded.start(), start + Duration::hours(2));
        assert_eq!(loaded.updated_by(), "admin");
        assert_eq!(loaded.created_by(), "test");
    }

    #[test]
    fn test_update_missing_row() {
        let fx = setup_test_db();
        let ghost = new_appointment(&fx, "Ghost", Utc::now()).with_id(999);
        assert!(!fx.db.update_appointment(&ghost).unwrap());
    }

    #[test]
    fn test_delete_and_cascade() {
        let fx = setup_test_db();
        let now = Utc::now();
        let first = fx.db.insert_appointment(&new_appointment(&fx, "One", now)).unwrap();
        fx.db.insert_appointment(&new_appointment(&fx, "Two", now)).unwrap();

        assert!(fx.db.delete_appointment(first.id()).unwrap());
        assert!(!fx.db.delete_appointment(first.id()).unwrap());
        assert_eq!(fx.db.appointments_for_customer(fx.customer_id).unwrap().len(), 1);

        assert!(fx.db.delete_customer(fx.customer_id).unwrap());
        assert!(fx.db.list_appointments().unwrap().is_empty());
        assert!(fx.db.customer_name(fx.customer_id).is_err());
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let fx = setup_test_db();
        let mut fields = new_appointment(&fx, "Orphan", Utc::now()).to_fields();
        fields.contact_id = 999;
        assert!(fx.db.insert_appointment(&Appointment::new(fields)).is_err());
    }
}
