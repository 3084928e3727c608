use std::time::Instant;

use chrono::NaiveDate;
use colored::Colorize;
use gainers::{
    api::{self, Analyzer},
    utils::{
        self,
        datetime::{date_to_str, secs_to_human_str},
    },
};
use indicatif::{ProgressBar, ProgressStyle};
use tabled::settings::{
    Alignment, Color,
    object::{Columns, Object, Rows},
};
use tokio::time::Duration;

#[derive(clap::Args)]
pub struct ScanCommand {
    #[arg(
        required = true,
        help = "Reference dates of the return window, e.g. 2024-03-15 2024-04-15"
    )]
    dates: Vec<String>,

    #[arg(
        short = 't',
        long = "ticker",
        help = "Tickers to scan instead of the configured basket, e.g. -t TCS.NS -t INFY.NS"
    )]
    tickers: Vec<String>,

    #[arg(
        short = 'a',
        long = "anchor",
        value_parser = utils::datetime::date_from_str,
        help = "Earliest date of fetched history, e.g. -a 2020-01-01"
    )]
    anchor_date: Option<NaiveDate>,

    #[arg(
        short = 'w',
        long = "window",
        help = "Length of the return window in calendar days, the default value is 30"
    )]
    window_days: Option<u32>,
}

impl ScanCommand {
    pub async fn exec(&self) {
        let mut config = match api::get_config() {
            Ok(config) => config,
            Err(err) => {
                println!("[!] {}", err.to_string().red());
                return;
            }
        };

        if !self.tickers.is_empty() {
            config.tickers = self.tickers.clone();
        }
        if let Some(anchor_date) = &self.anchor_date {
            config.anchor_date = date_to_str(anchor_date);
        }
        if let Some(window_days) = self.window_days {
            config.window_days = window_days;
        }

        let analyzer = match Analyzer::new(&config) {
            Ok(analyzer) => analyzer,
            Err(err) => {
                println!("[!] {}", err.to_string().red());
                return;
            }
        };

        println!(
            "[Tickers] {} \t [Anchor] {} \t [Window] {} days",
            analyzer.tickers().len(),
            config.anchor_date,
            config.window_days
        );

        let started = Instant::now();
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("[{elapsed}] {msg} {spinner:.cyan}") {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Fetching closes");

        let mut reports = vec![];
        for date in &self.dates {
            match analyzer.analyze(date).await {
                Ok(report) => reports.push(report),
                Err(err) => {
                    spinner.finish_with_message(format!("{}", err.to_string().red()));
                    return;
                }
            }
        }

        spinner.finish_with_message(format!(
            "{} {}",
            "✔".to_string().green(),
            secs_to_human_str(started.elapsed().as_secs()).bright_black()
        ));

        for report in reports {
            println!(
                "\n[{}] {} ~ {}",
                report.input_date.cyan(),
                date_to_str(&report.window_start),
                date_to_str(&report.reference_date)
            );

            if report.stocks.is_empty() {
                println!("{}", "No ticker with a positive return".yellow());
                continue;
            }

            let mut table_data: Vec<Vec<String>> =
                vec![vec!["Ticker".to_string(), "Return".to_string()]];
            for stock in &report.stocks {
                table_data.push(vec![
                    stock.ticker.to_string(),
                    format!("{:.2}%", stock.return_pct),
                ]);
            }

            let mut table = tabled::builder::Builder::from_iter(&table_data).build();
            table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
            table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
            table.modify(Columns::new(1..).not(Rows::first()), Color::FG_GREEN);
            table.modify(Columns::new(1..), Alignment::right());
            println!("{table}");
        }
    }
}
