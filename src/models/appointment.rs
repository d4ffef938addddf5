use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::hash::{Hash, Hasher};

use super::UNASSIGNED_ID;
use crate::lookup::{ContactDirectory, CustomerDirectory, LookupResult, UserDirectory};
use crate::time;

/// Field values for building an [`Appointment`].
///
/// Timestamps may carry any zone; construction keeps their wall-clock
/// fields and relabels them UTC.
#[derive(Debug, Clone)]
pub struct AppointmentFields<Tz: TimeZone> {
    pub title: String,
    pub description: String,
    pub location: String,
    pub kind: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub created_at: DateTime<Tz>,
    pub created_by: String,
    pub updated_at: DateTime<Tz>,
    pub updated_by: String,
    pub customer_id: i32,
    pub user_id: i32,
    pub contact_id: i32,
}

/// An immutable appointment record.
///
/// Equality and hashing look at the identifier only. Two records that have
/// not been persisted yet both carry [`UNASSIGNED_ID`] and therefore compare
/// equal.
#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    id: i32,
    title: String,
    description: String,
    location: String,
    #[serde(rename = "type")]
    kind: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
    customer_id: i32,
    user_id: i32,
    contact_id: i32,
}

impl Appointment {
    /// A record that has not been stored yet.
    pub fn new<Tz: TimeZone>(fields: AppointmentFields<Tz>) -> Self {
        Self::with_fields(UNASSIGNED_ID, fields)
    }

    /// A complete record, typically read back from storage.
    pub fn with_fields<Tz: TimeZone>(id: i32, fields: AppointmentFields<Tz>) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            location: fields.location,
            kind: fields.kind,
            start: time::normalize(&fields.start),
            end: time::normalize(&fields.end),
            created_at: time::normalize(&fields.created_at),
            created_by: fields.created_by,
            updated_at: time::normalize(&fields.updated_at),
            updated_by: fields.updated_by,
            customer_id: fields.customer_id,
            user_id: fields.user_id,
            contact_id: fields.contact_id,
        }
    }

    /// Same record under the identifier storage assigned to it.
    pub fn with_id(&self, id: i32) -> Self {
        Self { id, ..self.clone() }
    }

    /// A new record reflecting an update made at `at` by `by`.
    pub fn with_update<Tz: TimeZone>(&self, at: &DateTime<Tz>, by: &str) -> Self {
        Self {
            updated_at: time::normalize(at),
            updated_by: by.to_string(),
            ..self.clone()
        }
    }

    /// Fields of this record, for building a modified copy.
    pub fn to_fields(&self) -> AppointmentFields<Utc> {
        AppointmentFields {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            kind: self.kind.clone(),
            start: self.start,
            end: self.end,
            created_at: self.created_at,
            created_by: self.created_by.clone(),
            updated_at: self.updated_at,
            updated_by: self.updated_by.clone(),
            customer_id: self.customer_id,
            user_id: self.user_id,
            contact_id: self.contact_id,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// The appointment type ("Planning Session", "De-Briefing", ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn updated_by(&self) -> &str {
        &self.updated_by
    }

    pub fn customer_id(&self) -> i32 {
        self.customer_id
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn contact_id(&self) -> i32 {
        self.contact_id
    }

    // ==================== ZONED VIEWS ====================

    pub fn start_in<Tz: TimeZone>(&self, zone: &Tz) -> DateTime<Tz> {
        time::convert(&self.start, zone)
    }

    pub fn end_in<Tz: TimeZone>(&self, zone: &Tz) -> DateTime<Tz> {
        time::convert(&self.end, zone)
    }

    pub fn local_start_date(&self) -> NaiveDate {
        self.start_in(&Local).date_naive()
    }

    pub fn local_start_time(&self) -> NaiveTime {
        self.start_in(&Local).time()
    }

    pub fn local_start_string(&self) -> String {
        time::to_time_string(&self.start_in(&Local))
    }

    /// Local start date and time as shown in the table.
    pub fn start_display(&self) -> String {
        time::to_display_string(&self.start_in(&Local))
    }

    pub fn local_end_date(&self) -> NaiveDate {
        self.end_in(&Local).date_naive()
    }

    pub fn local_end_time(&self) -> NaiveTime {
        self.end_in(&Local).time()
    }

    pub fn local_end_string(&self) -> String {
        time::to_time_string(&self.end_in(&Local))
    }

    /// Local end date and time as shown in the table.
    pub fn end_display(&self) -> String {
        time::to_display_string(&self.end_in(&Local))
    }

    // ==================== RELATED NAMES ====================

    pub fn customer_name<D: CustomerDirectory + ?Sized>(&self, directory: &D) -> LookupResult<String> {
        directory.customer_name(self.customer_id)
    }

    pub fn contact_name<D: ContactDirectory + ?Sized>(&self, directory: &D) -> LookupResult<String> {
        directory.contact_name(self.contact_id)
    }

    pub fn user_name<D: UserDirectory + ?Sized>(&self, directory: &D) -> LookupResult<String> {
        directory.user_name(self.user_id)
    }
}

impl PartialEq for Appointment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Appointment {}

impl Hash for Appointment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
