use clap::Parser;
use comptoir::cli::{Cli, run};
use comptoir::{Config, ReceiptService, ReceiptStorage, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.export_dir {
        config.export_dir = dir.clone();
    }
    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    init_logger_with_file(Some(level), Some(config.log_json), config.log_dir.as_deref());

    config.ensure_dirs()?;
    let storage = ReceiptStorage::open(config.db_path())?;
    tracing::debug!(db = %config.db_path().display(), "Database opened");

    let service = ReceiptService::new(storage, &config.export_dir)
        .with_print_timeout(config.print_timeout());

    run(cli.command, &service).await
}
