use colored::Colorize;
use gainers::api;
use tabled::settings::{Color, object::Columns};

#[derive(clap::Args)]
pub struct ConfigSetCommand {
    key: String,
    value: String,
}

impl ConfigSetCommand {
    pub async fn exec(&self) {
        match api::set_config(&self.key, &self.value) {
            Ok(config) => {
                let key = self.key.to_lowercase();
                let table_data: Vec<Vec<String>> = config
                    .entries()
                    .into_iter()
                    .filter(|(k, _)| *k == key)
                    .map(|(k, v)| vec![k, v])
                    .collect();

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Columns::first(), Color::FG_CYAN);
                println!("{table}");
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
