use anyhow::Result;
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::lookup::{
    ContactDirectory, CustomerDirectory, LookupError, LookupResult, RegionDirectory, UserDirectory,
};

/// Reference data loaded into a fresh database by `seed`.
const SEED_REGIONS: &[(&str, &[&str])] = &[
    (
        "U.S",
        &["Arizona", "California", "Colorado", "New Jersey", "New York", "Texas", "Washington"],
    ),
    ("UK", &["England", "Scotland", "Wales", "Northern Ireland"]),
    (
        "Canada",
        &["Alberta", "British Columbia", "Northwest Territories", "Ontario", "Québec"],
    ),
];
const SEED_USERS: &[&str] = &["test", "admin"];
const SEED_CONTACTS: &[(&str, &str)] = &[
    ("Anika Costa", "acoasta@company.com"),
    ("Daniel Garcia", "dgarcia@company.com"),
    ("Li Lee", "llee@company.com"),
];

/// What a seed run inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub countries: usize,
    pub divisions: usize,
    pub users: usize,
    pub contacts: usize,
}

impl SeedSummary {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Database {
    // ==================== REFERENCE DATA ====================

    pub fn insert_country(&self, name: &str) -> Result<i32> {
        self.conn
            .execute("INSERT INTO countries (name) VALUES (?)", [name])?;
        Ok(i32::try_from(self.conn.last_insert_rowid())?)
    }

    pub fn insert_division(&self, name: &str, country_id: i32) -> Result<i32> {
        self.conn.execute(
            "INSERT INTO first_level_divisions (name, country_id) VALUES (?, ?)",
            params![name, country_id],
        )?;
        Ok(i32::try_from(self.conn.last_insert_rowid())?)
    }

    pub fn insert_user(&self, user_name: &str) -> Result<i32> {
        self.conn
            .execute("INSERT INTO users (user_name) VALUES (?)", [user_name])?;
        Ok(i32::try_from(self.conn.last_insert_rowid())?)
    }

    pub fn insert_contact(&self, name: &str, email: Option<&str>) -> Result<i32> {
        self.conn.execute(
            "INSERT INTO contacts (name, email) VALUES (?, ?)",
            params![name, email],
        )?;
        Ok(i32::try_from(self.conn.last_insert_rowid())?)
    }

    /// Look up a division by name, e.g. for command-line input.
    pub fn find_division_id(&self, name: &str) -> Result<Option<i32>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM first_level_divisions WHERE name = ? COLLATE NOCASE LIMIT 1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Load countries, divisions, users and contacts into an empty database.
    /// Does nothing once reference data exists.
    pub fn seed_reference_data(&self) -> Result<SeedSummary> {
        let existing: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM countries", [], |row| row.get(0))?;
        if existing > 0 {
            tracing::info!("reference data already present, skipping seed");
            return Ok(SeedSummary::default());
        }

        let mut summary = SeedSummary::default();

        self.conn.execute("BEGIN IMMEDIATE", [])?;
        let result = (|| -> Result<()> {
            for (country, divisions) in SEED_REGIONS {
                let country_id = self.insert_country(country)?;
                summary.countries += 1;
                for division in *divisions {
                    self.insert_division(division, country_id)?;
                    summary.divisions += 1;
                }
            }
            for user in SEED_USERS {
                self.insert_user(user)?;
                summary.users += 1;
            }
            for (name, email) in SEED_CONTACTS {
                self.insert_contact(name, Some(*email))?;
                summary.contacts += 1;
            }
            Ok(())
        })();

        match result {
            Ok(()) => {
                self.conn.execute("COMMIT", [])?;
                tracing::info!(?summary, "seeded reference data");
                Ok(summary)
            }
            Err(e) => {
                // Rollback on error
                let _ = self.conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn lookup_name(&self, sql: &str, entity: &'static str, id: i32) -> LookupResult<String> {
        self.conn
            .query_row(sql, [id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| LookupError::not_found(entity, id))
    }
}

impl CustomerDirectory for Database {
    fn customer_name(&self, customer_id: i32) -> LookupResult<String> {
        self.lookup_name("SELECT name FROM customers WHERE id = ?", "customer", customer_id)
    }
}

impl ContactDirectory for Database {
    fn contact_name(&self, contact_id: i32) -> LookupResult<String> {
        self.lookup_name("SELECT name FROM contacts WHERE id = ?", "contact", contact_id)
    }
}

impl UserDirectory for Database {
    fn user_name(&self, user_id: i32) -> LookupResult<String> {
        self.lookup_name("SELECT user_name FROM users WHERE id = ?", "user", user_id)
    }
}

impl RegionDirectory for Database {
    fn country_id_for_division(&self, division_id: i32) -> LookupResult<i32> {
        self.conn
            .query_row(
                "SELECT country_id FROM first_level_divisions WHERE id = ?",
                [division_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| LookupError::not_found("division", division_id))
    }

    fn country_name(&self, country_id: i32) -> LookupResult<String> {
        self.lookup_name("SELECT name FROM countries WHERE id = ?", "country", country_id)
    }

    fn division_name(&self, division_id: i32) -> LookupResult<String> {
        self.lookup_name(
            "SELECT name FROM first_level_divisions WHERE id = ?",
            "division",
            division_id,
        )
    }
}
