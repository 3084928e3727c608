use colored::Colorize;
use gainers::api;
use tabled::settings::{Color, Width, measurement::Percent, object::Columns, peaker::Priority};

#[derive(clap::Args)]
pub struct ConfigShowCommand;

impl ConfigShowCommand {
    pub async fn exec(&self) {
        match api::get_config() {
            Ok(config) => {
                let table_data: Vec<Vec<String>> = config
                    .entries()
                    .into_iter()
                    .map(|(k, v)| vec![k, v])
                    .collect();

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Columns::first(), Color::FG_CYAN);
                table.with(Width::wrap(Percent(100)).priority(Priority::max(true)));
                println!("{table}");
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
