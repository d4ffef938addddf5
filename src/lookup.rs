//! Collaborators the models and the view consume.
//!
//! Each trait is a narrow read-only contract. The SQLite [`Database`]
//! implements all of them; tests substitute in-memory fakes.
//!
//! [`Database`]: crate::db::Database

use thiserror::Error;

use crate::models::Appointment;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl LookupError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type LookupResult<T> = Result<T, LookupError>;

/// Supplies filtered and unfiltered appointment lists.
///
/// "Current" is evaluated against the local clock when the call is made.
pub trait AppointmentSource {
    fn appointments_for_current_week(&self) -> LookupResult<Vec<Appointment>>;
    fn appointments_for_current_month(&self) -> LookupResult<Vec<Appointment>>;
    fn all_appointments(&self) -> LookupResult<Vec<Appointment>>;
}

pub trait CustomerDirectory {
    fn customer_name(&self, customer_id: i32) -> LookupResult<String>;
}

pub trait ContactDirectory {
    fn contact_name(&self, contact_id: i32) -> LookupResult<String>;
}

pub trait UserDirectory {
    fn user_name(&self, user_id: i32) -> LookupResult<String>;
}

/// Countries and their first-level divisions (states, provinces, ...).
pub trait RegionDirectory {
    fn country_id_for_division(&self, division_id: i32) -> LookupResult<i32>;
    fn country_name(&self, country_id: i32) -> LookupResult<String>;
    fn division_name(&self, division_id: i32) -> LookupResult<String>;
}

/// Everything needed to render related-entity names in a table.
pub trait Directory: CustomerDirectory + ContactDirectory + UserDirectory + RegionDirectory {}

impl<T> Directory for T where T: CustomerDirectory + ContactDirectory + UserDirectory + RegionDirectory {}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// In-memory stand-in for every collaborator.
    #[derive(Default)]
    pub(crate) struct FakeDirectory {
        pub customers: HashMap<i32, String>,
        pub contacts: HashMap<i32, String>,
        pub users: HashMap<i32, String>,
        pub countries: HashMap<i32, String>,
        /// division id -> (country id, division name)
        pub divisions: HashMap<i32, (i32, String)>,
        pub week: Vec<Appointment>,
        pub month: Vec<Appointment>,
        pub all: Vec<Appointment>,
        pub fetches: Cell<u32>,
    }

    impl FakeDirectory {
        pub fn sample() -> Self {
            let mut dir = Self::default();
            dir.customers.insert(1, "Daddy Warbucks".to_string());
            dir.customers.insert(2, "Lady McAnderson".to_string());
            dir.contacts.insert(3, "Li Lee".to_string());
            dir.users.insert(2, "test".to_string());
            dir.countries.insert(1, "U.S".to_string());
            dir.countries.insert(3, "Canada".to_string());
            dir.divisions.insert(29, (1, "New Jersey".to_string()));
            dir.divisions.insert(60, (3, "Northwest Territories".to_string()));
            dir
        }

        fn fetched(&self, list: &[Appointment]) -> LookupResult<Vec<Appointment>> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(list.to_vec())
        }
    }

    impl AppointmentSource for FakeDirectory {
        fn appointments_for_current_week(&self) -> LookupResult<Vec<Appointment>> {
            self.fetched(&self.week)
        }

        fn appointments_for_current_month(&self) -> LookupResult<Vec<Appointment>> {
            self.fetched(&self.month)
        }

        fn all_appointments(&self) -> LookupResult<Vec<Appointment>> {
            self.fetched(&self.all)
        }
    }

    impl CustomerDirectory for FakeDirectory {
        fn customer_name(&self, customer_id: i32) -> LookupResult<String> {
            self.customers
                .get(&customer_id)
                .cloned()
                .ok_or_else(|| LookupError::not_found("customer", customer_id))
        }
    }

    impl ContactDirectory for FakeDirectory {
        fn contact_name(&self, contact_id: i32) -> LookupResult<String> {
            self.contacts
                .get(&contact_id)
                .cloned()
                .ok_or_else(|| LookupError::not_found("contact", contact_id))
        }
    }

    impl UserDirectory for FakeDirectory {
        fn user_name(&self, user_id: i32) -> LookupResult<String> {
            self.users
                .get(&user_id)
                .cloned()
                .ok_or_else(|| LookupError::not_found("user", user_id))
        }
    }

    impl RegionDirectory for FakeDirectory {
        fn country_id_for_division(&self, division_id: i32) -> LookupResult<i32> {
            self.divisions
                .get(&division_id)
                .map(|(country, _)| *country)
                .ok_or_else(|| LookupError::not_found("division", division_id))
        }

        fn country_name(&self, country_id: i32) -> LookupResult<String> {
            self.countries
                .get(&country_id)
                .cloned()
                .ok_or_else(|| LookupError::not_found("country", country_id))
        }

        fn division_name(&self, division_id: i32) -> LookupResult<String> {
            self.divisions
                .get(&division_id)
                .map(|(_, name)| name.clone())
                .ok_or_else(|| LookupError::not_found("division", division_id))
        }
    }
}
