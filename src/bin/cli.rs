//! H-Tracker CLI
//!
//! Command-line client for a running H-Tracker API server:
//! - Record and inspect daily entries
//! - Show history, averages and insights
//! - Import/Export data

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use htracker::api::dto::{DeleteResponse, EntryResponse};
use htracker::catalog::MetricKind;
use htracker::import::CsvImporter;
use reqwest::{Client, Response};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "htracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal daily tracker for mood and habits")]
#[command(long_about = "H-Tracker records one entry per day (mood, activity, sweet food, overeating, sleep recovery)\nand turns them into averages, weekday patterns and plain-language insights.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8083", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a day (overwrites an existing entry for that date)
    Log {
        /// Self-feeling, 0-8
        #[arg(long)]
        mood: u8,
        /// Physical activity, 0-5
        #[arg(long)]
        activity: u8,
        /// Sweet food, 0-6
        #[arg(long)]
        sweet_food: u8,
        /// Overeating, 0-5
        #[arg(long)]
        overeating: u8,
        /// Sleep recovery, 0-6
        #[arg(long)]
        sleep_recovery: u8,
        /// Date (YYYY-MM-DD, "today" or "yesterday"; default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List entries, newest first
    List {
        /// Only entries on or after this date
        #[arg(long)]
        from: Option<String>,
        /// Only entries on or before this date
        #[arg(long)]
        to: Option<String>,
    },

    /// Show one entry
    Show {
        id: String,
    },

    /// Delete one entry
    Delete {
        id: String,
    },

    /// Entries and averages for a trailing window
    History {
        /// week, month or year
        #[arg(short, long, default_value = "week")]
        range: String,
    },

    /// Three-month insight report
    Insights,

    /// Show the option list of every metric
    Catalog,

    /// Import entries from CSV
    Import {
        /// Path to CSV file
        path: PathBuf,
        /// Date format (strftime format)
        #[arg(long, default_value = "%Y-%m-%d")]
        date_format: String,
        /// Header of the date column
        #[arg(long, default_value = "date")]
        date_column: String,
        /// Dry run (don't actually import)
        #[arg(long)]
        dry_run: bool,
    },

    /// Export entries
    Export {
        /// Window (week, month, year, recent); default: everything
        #[arg(short, long)]
        range: Option<String>,
        /// Export as JSON instead of CSV
        #[arg(long)]
        json: bool,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let json_output = cli.format == "json";
    let api = |path: &str| format!("{}/api/v1{}", cli.api_url, path);

    match cli.command {
        Commands::Log {
            mood,
            activity,
            sweet_food,
            overeating,
            sleep_recovery,
            date,
        } => {
            let date = resolve_date(date.as_deref())?;

            let body = serde_json::json!({
                "date": date,
                "mood": mood,
                "activity": activity,
                "sweet_food": sweet_food,
                "overeating": overeating,
                "sleep_recovery": sleep_recovery,
            });

            let response = check(client.post(api("/entries")).json(&body).send().await?).await?;
            let created = response.status() == reqwest::StatusCode::CREATED;
            let entry: EntryResponse = response.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                let verb = if created { "Logged" } else { "Updated" };
                println!("{} {}: mood {} ({})", verb, entry.date, entry.mood.value, entry.mood.label);
            }
        }

        Commands::List { from, to } => {
            let mut query = Vec::new();
            if let Some(from) = from {
                query.push(("from", from));
            }
            if let Some(to) = to {
                query.push(("to", to));
            }

            let response = check(client.get(api("/entries")).query(&query).send().await?).await?;
            let entries: Vec<EntryResponse> = response.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No entries yet.");
                println!();
                println!("Record your first day with:");
                println!("  htracker log --mood 5 --activity 2 --sweet-food 1 --overeating 0 --sleep-recovery 4");
            } else {
                print_entry_table(&entries);
            }
        }

        Commands::Show { id } => {
            let response = check(client.get(api(&format!("/entries/{}", id))).send().await?).await?;
            let entry: EntryResponse = response.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!("Entry {}", entry.id);
                println!("  Date: {}", entry.date);
                for (metric, level) in entry_levels(&entry) {
                    println!("  {:<16} {} ({})", metric.display_name(), level.value, level.label);
                }
                println!("  Updated: {}", entry.updated_at.format("%Y-%m-%d %H:%M"));
            }
        }

        Commands::Delete { id } => {
            let response = check(client.delete(api(&format!("/entries/{}", id))).send().await?).await?;
            let result: DeleteResponse = response.json().await?;
            println!("{}", result.message);
        }

        Commands::History { range } => {
            let response = check(
                client
                    .get(api("/history"))
                    .query(&[("range", range.as_str())])
                    .send()
                    .await?,
            )
            .await?;
            let data: Value = response.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_history(&data);
            }
        }

        Commands::Insights => {
            let response = check(client.get(api("/insights")).send().await?).await?;
            let data: Value = response.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_insights(&data);
            }
        }

        Commands::Catalog => {
            let response = check(client.get(api("/catalog")).send().await?).await?;
            let data: Value = response.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                for metric in data.as_array().into_iter().flatten() {
                    println!(
                        "{} ({})",
                        metric["name"].as_str().unwrap_or("-"),
                        metric["key"].as_str().unwrap_or("-")
                    );
                    for option in metric["options"].as_array().into_iter().flatten() {
                        println!(
                            "  {:>2}  {}",
                            option["value"].as_u64().unwrap_or(0),
                            option["label"].as_str().unwrap_or("-")
                        );
                    }
                }
            }
        }

        Commands::Import {
            path,
            date_format,
            date_column,
            dry_run,
        } => {
            if !path.exists() {
                bail!("File not found: {:?}", path);
            }

            let result = CsvImporter::new()
                .with_date_format(&date_format)
                .with_date_column(&date_column)
                .import(&path)
                .with_context(|| format!("reading {:?}", path))?;

            println!("Import results:");
            println!("  Rows processed: {}", result.rows_processed);
            println!("  Rows failed: {}", result.rows_failed);

            if !result.errors.is_empty() {
                println!();
                println!("Errors (first 10):");
                for error in result.errors.iter().take(10) {
                    println!("  {}", error);
                }
            }

            if dry_run {
                println!();
                println!("(Dry run - no data was imported)");
            } else if !result.drafts.is_empty() {
                println!();
                println!("Importing entries...");

                let mut created = 0;
                let mut updated = 0;
                let mut failed = 0;

                for draft in &result.drafts {
                    let mut body = serde_json::Map::new();
                    body.insert("date".to_string(), Value::from(draft.date.to_string()));
                    for &metric in MetricKind::all() {
                        body.insert(metric.key().to_string(), Value::from(draft.levels.get(metric)));
                    }

                    match client.post(api("/entries")).json(&body).send().await {
                        Ok(resp) if resp.status() == reqwest::StatusCode::CREATED => created += 1,
                        Ok(resp) if resp.status().is_success() => updated += 1,
                        _ => failed += 1,
                    }
                }

                println!("  Created: {}", created);
                println!("  Updated: {}", updated);
                if failed > 0 {
                    println!("  Failed: {}", failed);
                }
            }
        }

        Commands::Export {
            range,
            json,
            output,
        } => {
            let mut query = vec![("format", if json { "json" } else { "csv" }.to_string())];
            if let Some(range) = range {
                query.push(("range", range));
            }

            let response = check(client.get(api("/export")).query(&query).send().await?).await?;
            let data = response.text().await?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &data)?;
                    println!("Exported to {:?}", path);
                }
                None => {
                    print!("{}", data);
                }
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: Value = resp.json().await?;

                    println!("H-Tracker v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Storage: {} ({})",
                        health["storage"].as_str().unwrap_or("unknown"),
                        health["backend"].as_str().unwrap_or("unknown")
                    );
                    if let Some(entries) = health["entries"].as_u64() {
                        println!("Entries: {}", entries);
                    }

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    bail!("API returned error: {}", resp.status());
                }
                Err(e) => {
                    eprintln!("Cannot connect to H-Tracker API at {}", cli.api_url);
                    eprintln!();
                    eprintln!("Make sure the API server is running:");
                    eprintln!("  cargo run --bin htracker-api");
                    return Err(e.into());
                }
            }
        }

        Commands::Config { output } => {
            let config = htracker::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Turn a non-2xx response into an error carrying the server's message
async fn check(response: Response) -> anyhow::Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(text);

    bail!("Request failed ({}): {}", status, message)
}

fn resolve_date(raw: Option<&str>) -> anyhow::Result<String> {
    let today = chrono::Local::now().date_naive();
    let date = match raw {
        None | Some("today") => today,
        Some("yesterday") => today.pred_opt().context("date out of range")?,
        Some(s) => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?,
    };
    Ok(date.format("%Y-%m-%d").to_string())
}

fn entry_levels(entry: &EntryResponse) -> [(MetricKind, &htracker::api::dto::LevelView); 5] {
    [
        (MetricKind::Mood, &entry.mood),
        (MetricKind::Activity, &entry.activity),
        (MetricKind::SweetFood, &entry.sweet_food),
        (MetricKind::Overeating, &entry.overeating),
        (MetricKind::SleepRecovery, &entry.sleep_recovery),
    ]
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_entry_table(entries: &[EntryResponse]) {
    println!(
        "{:<12} {:>4} {:>8} {:>5} {:>9} {:>5}  {}",
        "Date", "Mood", "Activity", "Sweet", "Overeat", "Sleep", "ID"
    );
    println!("{}", "-".repeat(86));

    for e in entries {
        println!(
            "{:<12} {:>4} {:>8} {:>5} {:>9} {:>5}  {}",
            e.date.format("%Y-%m-%d").to_string(),
            e.mood.value,
            e.activity.value,
            e.sweet_food.value,
            e.overeating.value,
            e.sleep_recovery.value,
            e.id
        );
    }
}

fn print_history(data: &Value) {
    let entries = data["entries"].as_array().map(Vec::as_slice).unwrap_or(&[]);

    println!(
        "{} ({} to {})",
        data["range"].as_str().unwrap_or("-"),
        data["from"].as_str().unwrap_or("-"),
        data["to"].as_str().unwrap_or("-")
    );
    println!();

    if entries.is_empty() {
        println!("No data for the selected time range");
        return;
    }

    print!("{:<8}", "Day");
    for metric in MetricKind::all() {
        print!(" | {:<14}", metric.display_name());
    }
    println!();
    println!("{}", "-".repeat(8 + MetricKind::all().len() * 17));

    for entry in entries {
        print!("{:<8}", entry["formatted_date"].as_str().unwrap_or("-"));
        for metric in MetricKind::all() {
            print!(" | {:<14}", entry[metric.key()]["value"].as_u64().unwrap_or(0));
        }
        println!();
    }

    print_averages(&data["summary"]);
}

fn print_averages(summary: &Value) {
    let averages = match summary["averages"].as_array() {
        Some(a) => a,
        None => return,
    };

    println!();
    println!("Averages:");
    for avg in averages {
        println!(
            "  {:<16} {:.1}",
            avg["name"].as_str().unwrap_or("-"),
            avg["value"].as_f64().unwrap_or(0.0)
        );
    }
}

fn print_insights(data: &Value) {
    println!(
        "Last three months: {} entries ({} to {})",
        data["entry_count"].as_u64().unwrap_or(0),
        data["from"].as_str().unwrap_or("-"),
        data["to"].as_str().unwrap_or("-")
    );
    println!();
    println!("{}", data["insight"].as_str().unwrap_or(""));

    if !data["has_enough_data"].as_bool().unwrap_or(false) {
        return;
    }

    print_averages(&data["summary"]);

    println!();
    println!("{:<10} {:>5} {:>6}", "Weekday", "Days", "Mood");
    for day in data["day_of_week"].as_array().into_iter().flatten() {
        println!(
            "{:<10} {:>5} {:>6.1}",
            day["name"].as_str().unwrap_or("-"),
            day["count"].as_u64().unwrap_or(0),
            day["mood"].as_f64().unwrap_or(0.0)
        );
    }
}
