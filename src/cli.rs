use clap::Subcommand;

mod check;
mod config;
mod scan;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check the price source")]
    Check(Box<check::CheckCommand>),

    /// Show or change configurations
    #[command(subcommand)]
    Config(config::ConfigCommand),

    #[command(about = "List tickers with a positive trailing return")]
    #[clap(visible_aliases = &["s"])]
    Scan(Box<scan::ScanCommand>),
}
