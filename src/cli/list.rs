use anyhow::Result;
use serde::Serialize;

use super::ui::{print_highlighted, status, term_width};
use super::view::{AppointmentRow, AppointmentView};
use super::ListArgs;
use crate::db::Database;
use crate::filter::AppointmentFilter;

/// `--json` output: the active filter and its rows.
#[derive(Serialize)]
struct ListOutput {
    filter: AppointmentFilter,
    appointments: Vec<AppointmentRow>,
}

/// Execute the list command
pub fn run_list(db: &Database, args: &ListArgs) -> Result<()> {
    let filter: AppointmentFilter = args.filter.parse()?;
    let mut view = AppointmentView::with_filter(db, filter)?;

    if args.json {
        println!("{}", list_json(&view, db)?);
        return Ok(());
    }

    if view.items().is_empty() {
        status(&format!("No appointments ({}).", view.filter().as_str()));
        return Ok(());
    }

    if let Some(id) = args.highlight {
        if view.select_id(id).is_none() {
            super::ui::warning(&format!("appointment {} is not in this list", id));
        }
    }

    print_table(&view, db, term_width())
}

fn list_json(view: &AppointmentView<'_, Database>, db: &Database) -> Result<String> {
    let output = ListOutput {
        filter: view.filter(),
        appointments: view.rows(db),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn print_table(view: &AppointmentView<'_, Database>, db: &Database, width: usize) -> Result<()> {
    status(&format!(
        "Appointments: {} ({} total)\n",
        view.filter(),
        view.items().len()
    ));

    let selected = view.selected_index();
    for (i, line) in view.render(width, db).iter().enumerate() {
        // Line 0 is the header.
        if i > 0 && selected == Some(i - 1) {
            print_highlighted(line)?;
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}
