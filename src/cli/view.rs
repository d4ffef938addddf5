//! Filterable appointment table.
//!
//! The view owns the active [`AppointmentFilter`] and the rows currently on
//! display. Changing the filter re-fetches from the source and swaps the
//! whole collection; rows are never edited in place.

use serde::Serialize;
use thiserror::Error;

use super::ui::truncate;
use crate::filter::{AppointmentFilter, FilterError};
use crate::lookup::{AppointmentSource, Directory, LookupError, LookupResult};
use crate::models::Appointment;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Column titles and relative widths, in display order.
pub const COLUMNS: [(&str, usize); 11] = [
    ("ID", 50),
    ("Title", 100),
    ("Description", 120),
    ("Location", 100),
    ("Type", 175),
    ("Start Time", 125),
    ("End Time", 125),
    ("Customer", 140),
    ("Customer ID", 75),
    ("Contact", 130),
    ("User ID", 50),
];

const COLUMN_GAP: usize = 1;
const UNKNOWN: &str = "(unknown)";

/// One table row with related names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start: String,
    pub end: String,
    pub customer: String,
    pub customer_id: i32,
    pub contact: String,
    pub user_id: i32,
}

impl AppointmentRow {
    pub fn build<D: Directory + ?Sized>(appointment: &Appointment, directory: &D) -> Self {
        Self {
            id: appointment.id(),
            title: appointment.title().to_string(),
            description: appointment.description().to_string(),
            location: appointment.location().to_string(),
            kind: appointment.kind().to_string(),
            start: appointment.start_display(),
            end: appointment.end_display(),
            customer: name_or_unknown(appointment.customer_name(directory)),
            customer_id: appointment.customer_id(),
            contact: name_or_unknown(appointment.contact_name(directory)),
            user_id: appointment.user_id(),
        }
    }

    fn cells(&self) -> [String; 11] {
        [
            self.id.to_string(),
            self.title.clone(),
            self.description.clone(),
            self.location.clone(),
            self.kind.clone(),
            self.start.clone(),
            self.end.clone(),
            self.customer.clone(),
            self.customer_id.to_string(),
            self.contact.clone(),
            self.user_id.to_string(),
        ]
    }
}

fn name_or_unknown(result: LookupResult<String>) -> String {
    result.unwrap_or_else(|e| {
        tracing::warn!("{}", e);
        UNKNOWN.to_string()
    })
}

/// Split `width` characters among the columns in proportion to their
/// weights. Rounding leftovers go to the leftmost columns; no column is
/// narrower than one character. Below one character per column plus gaps
/// the widths cannot fit, and [`AppointmentView::render`] cuts the lines.
pub fn column_widths(width: usize) -> Vec<usize> {
    let gaps = COLUMN_GAP * (COLUMNS.len() - 1);
    let available = width.saturating_sub(gaps);
    let total: usize = COLUMNS.iter().map(|(_, weight)| weight).sum();

    let mut widths: Vec<usize> = COLUMNS
        .iter()
        .map(|(_, weight)| (weight * available / total).max(1))
        .collect();

    // The one-character floor can overshoot on narrow terminals.
    while widths.iter().sum::<usize>() > available {
        match widths.iter_mut().filter(|w| **w > 1).max() {
            Some(widest) => *widest -= 1,
            None => break,
        }
    }

    let leftover = available.saturating_sub(widths.iter().sum());
    let count = widths.len();
    for i in 0..leftover {
        widths[i % count] += 1;
    }
    widths
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let gap = " ".repeat(COLUMN_GAP);
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:<w$}", truncate(cell, w), w = w))
        .collect::<Vec<_>>()
        .join(&gap)
        .trim_end()
        .to_string()
}

pub struct AppointmentView<'a, S: AppointmentSource + ?Sized> {
    source: &'a S,
    filter: AppointmentFilter,
    items: Vec<Appointment>,
    selected: Option<usize>,
}

impl<'a, S: AppointmentSource + ?Sized> AppointmentView<'a, S> {
    /// A view showing every appointment.
    pub fn new(source: &'a S) -> LookupResult<Self> {
        Self::with_filter(source, AppointmentFilter::default())
    }

    /// A view starting on `filter`. Fetches once.
    pub fn with_filter(source: &'a S, filter: AppointmentFilter) -> LookupResult<Self> {
        let items = filter.fetch(source)?;
        Ok(Self {
            source,
            filter,
            items,
            selected: None,
        })
    }

    pub fn filter(&self) -> AppointmentFilter {
        self.filter
    }

    pub fn items(&self) -> &[Appointment] {
        &self.items
    }

    /// Switch filters and replace the displayed rows.
    pub fn select(&mut self, filter: AppointmentFilter) -> LookupResult<()> {
        let items = filter.fetch(self.source)?;
        tracing::debug!(filter = filter.as_str(), count = items.len(), "filter selected");
        self.filter = filter;
        self.items = items;
        self.selected = None;
        Ok(())
    }

    /// [`select`](Self::select) by selector label. An unknown label leaves
    /// the view untouched.
    pub fn select_label(&mut self, label: &str) -> Result<(), ViewError> {
        let filter: AppointmentFilter = label.parse()?;
        self.select(filter)?;
        Ok(())
    }

    /// Re-fetch with the current filter, keeping the selected appointment
    /// if it is still listed.
    pub fn refresh(&mut self) -> LookupResult<()> {
        let keep = self.selected().map(Appointment::id);
        self.items = self.filter.fetch(self.source)?;
        self.selected = keep.and_then(|id| self.items.iter().position(|a| a.id() == id));
        Ok(())
    }

    pub fn select_row(&mut self, index: usize) -> Option<&Appointment> {
        self.selected = (index < self.items.len()).then_some(index);
        self.selected()
    }

    /// Select the row showing appointment `id`.
    pub fn select_id(&mut self, id: i32) -> Option<&Appointment> {
        self.selected = self.items.iter().position(|a| a.id() == id);
        self.selected()
    }

    pub fn selected(&self) -> Option<&Appointment> {
        self.selected.and_then(|i| self.items.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn rows<D: Directory + ?Sized>(&self, directory: &D) -> Vec<AppointmentRow> {
        self.items
            .iter()
            .map(|a| AppointmentRow::build(a, directory))
            .collect()
    }

    /// Header line followed by one line per row, fitted to `width`.
    pub fn render<D: Directory + ?Sized>(&self, width: usize, directory: &D) -> Vec<String> {
        let widths = column_widths(width);
        let header: Vec<String> = COLUMNS.iter().map(|(title, _)| title.to_uppercase()).collect();

        let mut lines = Vec::with_capacity(self.items.len() + 1);
        lines.push(truncate(&format_line(&header, &widths), width));
        for row in self.rows(directory) {
            lines.push(truncate(&format_line(&row.cells(), &widths), width));
        }
        lines
    }
}
