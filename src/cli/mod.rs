use clap::{Args, Parser, Subcommand};

pub mod add;
pub mod customers;
pub mod delete;
pub mod list;
pub mod show;
pub mod ui;
pub mod update;
pub mod view;

pub use add::run_add;
pub use customers::{
    run_add_customer, run_customers, run_delete_customer, run_seed, run_update_customer,
};
pub use delete::run_delete;
pub use list::run_list;
pub use show::run_show;
pub use update::run_update;
pub use view::AppointmentView;

#[derive(Parser)]
#[command(name = "apptcmd")]
#[command(about = "Appointment scheduling for the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List appointments in a table
    List(ListArgs),
    /// Show full details for an appointment
    Show(ShowArgs),
    /// Schedule a new appointment
    Add(AddArgs),
    /// Change an existing appointment
    Update(UpdateArgs),
    /// Delete an appointment
    Delete(DeleteArgs),
    /// List customers
    Customers(CustomersArgs),
    /// Add a new customer
    AddCustomer(AddCustomerArgs),
    /// Change an existing customer
    UpdateCustomer(UpdateCustomerArgs),
    /// Delete a customer and all of its appointments
    DeleteCustomer(DeleteArgs),
    /// Load countries, divisions, users and contacts into an empty database
    Seed,
}

#[derive(Args, Default)]
pub struct ListArgs {
    /// Which appointments to show: week, month or all
    #[arg(short, long, default_value = "all")]
    pub filter: String,
    /// Print rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Highlight the row for this appointment ID
    #[arg(long, value_name = "ID")]
    pub highlight: Option<i32>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: i32,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub description: String,
    #[arg(short, long, default_value = "")]
    pub location: String,
    /// Appointment type, e.g. "Planning Session"
    #[arg(short = 'k', long = "type")]
    pub kind: String,
    /// Local start, "YYYY-MM-DD HH:MM"
    #[arg(short, long)]
    pub start: String,
    /// Local end, "YYYY-MM-DD HH:MM"
    #[arg(short, long)]
    pub end: String,
    #[arg(long)]
    pub customer: i32,
    /// User ID the appointment belongs to; also recorded as its creator
    #[arg(long)]
    pub user: i32,
    #[arg(long)]
    pub contact: i32,
    /// Username recorded as the creator (defaults to the user's name)
    #[arg(long)]
    pub by: Option<String>,
}

#[derive(Args, Default)]
pub struct UpdateArgs {
    pub id: i32,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long)]
    pub location: Option<String>,
    #[arg(short = 'k', long = "type")]
    pub kind: Option<String>,
    /// Local start, "YYYY-MM-DD HH:MM"
    #[arg(short, long)]
    pub start: Option<String>,
    /// Local end, "YYYY-MM-DD HH:MM"
    #[arg(short, long)]
    pub end: Option<String>,
    #[arg(long)]
    pub customer: Option<i32>,
    #[arg(long)]
    pub user: Option<i32>,
    #[arg(long)]
    pub contact: Option<i32>,
    /// Username recorded as the last updater (defaults to the appointment's user)
    #[arg(long)]
    pub by: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: i32,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CustomersArgs {
    /// Print customers as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AddCustomerArgs {
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long)]
    pub address: String,
    #[arg(short, long)]
    pub postal_code: String,
    #[arg(long)]
    pub phone: String,
    /// First-level division name, e.g. "Ontario"
    #[arg(long)]
    pub division: String,
    /// Username recorded as the creator
    #[arg(long, default_value = "admin")]
    pub by: String,
}

#[derive(Args, Default)]
pub struct UpdateCustomerArgs {
    pub id: i32,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub address: Option<String>,
    #[arg(short, long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// First-level division name, e.g. "Ontario"
    #[arg(long)]
    pub division: Option<String>,
    /// Username recorded as the last updater
    #[arg(long, default_value = "admin")]
    pub by: String,
}
