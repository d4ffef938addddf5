use clap::Parser;
use tracing_subscriber::EnvFilter;

use apptcmd::cli::{
    run_add, run_add_customer, run_customers, run_delete, run_delete_customer, run_list, run_seed,
    run_show, run_update, run_update_customer, Cli, Commands, ListArgs,
};
use apptcmd::config::{self, Config};
use apptcmd::db::Database;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    tracing::debug!(
        "{} v{} using {}",
        config::APP_NAME,
        config::APP_VERSION,
        config.db_path.display()
    );
    let db = Database::open(&config)?;

    match cli.command {
        None => {
            // No subcommand provided - list everything
            let args = ListArgs {
                filter: "all".to_string(),
                ..Default::default()
            };
            run_list(&db, &args)?;
        }
        Some(Commands::List(args)) => {
            run_list(&db, &args)?;
        }
        Some(Commands::Show(args)) => {
            run_show(&db, args.id)?;
        }
        Some(Commands::Add(args)) => {
            run_add(&db, &args)?;
        }
        Some(Commands::Update(args)) => {
            run_update(&db, &args)?;
        }
        Some(Commands::Delete(args)) => {
            run_delete(&db, args.id, args.force)?;
        }
        Some(Commands::Customers(args)) => {
            run_customers(&db, args.json)?;
        }
        Some(Commands::AddCustomer(args)) => {
            run_add_customer(&db, &args)?;
        }
        Some(Commands::UpdateCustomer(args)) => {
            run_update_customer(&db, &args)?;
        }
        Some(Commands::DeleteCustomer(args)) => {
            run_delete_customer(&db, args.id, args.force)?;
        }
        Some(Commands::Seed) => {
            run_seed(&db)?;
        }
    }

    Ok(())
}
