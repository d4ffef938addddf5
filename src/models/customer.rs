use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::hash::{Hash, Hasher};

use super::UNASSIGNED_ID;
use crate::lookup::{LookupResult, RegionDirectory};
use crate::time;

/// Field values for building a [`Customer`].
#[derive(Debug, Clone)]
pub struct CustomerFields<Tz: TimeZone> {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
    pub created_at: DateTime<Tz>,
    pub created_by: String,
    pub updated_at: DateTime<Tz>,
    pub updated_by: String,
    /// First-level division (state, province, ...) of the address.
    pub division_id: i32,
}

/// An immutable customer record. Compared by identifier only.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    id: i32,
    name: String,
    address: String,
    postal_code: String,
    phone: String,
    created_at: DateTime<Utc>,
    created_by: String,
    updated_at: DateTime<Utc>,
    updated_by: String,
    division_id: i32,
}

impl Customer {
    pub fn new<Tz: TimeZone>(fields: CustomerFields<Tz>) -> Self {
        Self::with_fields(UNASSIGNED_ID, fields)
    }

    pub fn with_fields<Tz: TimeZone>(id: i32, fields: CustomerFields<Tz>) -> Self {
        Self {
            id,
            name: fields.name,
            address: fields.address,
            postal_code: fields.postal_code,
            phone: fields.phone,
            created_at: time::normalize(&fields.created_at),
            created_by: fields.created_by,
            updated_at: time::normalize(&fields.updated_at),
            updated_by: fields.updated_by,
            division_id: fields.division_id,
        }
    }

    pub fn with_id(&self, id: i32) -> Self {
        Self { id, ..self.clone() }
    }

    pub fn with_update<Tz: TimeZone>(&self, at: &DateTime<Tz>, by: &str) -> Self {
        Self {
            updated_at: time::normalize(at),
            updated_by: by.to_string(),
            ..self.clone()
        }
    }

    pub fn to_fields(&self) -> CustomerFields<Utc> {
        CustomerFields {
            name: self.name.clone(),
            address: self.address.clone(),
            postal_code: self.postal_code.clone(),
            phone: self.phone.clone(),
            created_at: self.created_at,
            created_by: self.created_by.clone(),
            updated_at: self.updated_at,
            updated_by: self.updated_by.clone(),
            division_id: self.division_id,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn phone(&self) -> &str {
        &self.phone
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

    pub fn division_id(&self) -> i32 {
        self.division_id
    }

    pub fn country_id<R: RegionDirectory + ?Sized>(&self, regions: &R) -> LookupResult<i32> {
        regions.country_id_for_division(self.division_id)
    }

    pub fn country_name<R: RegionDirectory + ?Sized>(&self, regions: &R) -> LookupResult<String> {
        let country_id = self.country_id(regions)?;
        regions.country_name(country_id)
    }

    pub fn division_name<R: RegionDirectory + ?Sized>(&self, regions: &R) -> LookupResult<String> {
        regions.division_name(self.division_id)
    }
}

impl PartialEq for Customer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Customer {}

impl Hash for Customer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
