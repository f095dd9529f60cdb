use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod format;
mod models;
mod registry;
mod report;
mod synth;

use registry::DocumentRegistry;

#[derive(Parser)]
#[command(name = "document-engagement")]
#[command(about = "Document engagement analytics explorer for Meter", long_about = None)]
struct Cli {
    /// Merge extra document summaries from a CSV file before running
    #[arg(long, global = true, value_name = "CSV")]
    import: Option<PathBuf>,
    /// Fix the random source so synthesized analytics are reproducible
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Emit results as JSON instead of plaintext
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every tracked document
    List,
    /// Registry-wide engagement totals
    Stats,
    /// Show one document's summary
    Show {
        #[arg(long)]
        id: String,
    },
    /// 7-day view trend for a document
    Trend {
        #[arg(long)]
        id: String,
    },
    /// Per-page engagement profile for a document
    Pages {
        #[arg(long)]
        id: String,
    },
    /// Viewer activity feed for a document
    Activity {
        #[arg(long)]
        id: String,
    },
    /// Generate a markdown engagement report
    Report {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut registry = DocumentRegistry::with_demo_documents();
    if let Some(csv) = &cli.import {
        let inserted = registry
            .import_csv(csv)
            .with_context(|| format!("failed to import {}", csv.display()))?;
        if !cli.json {
            println!("Imported {inserted} documents from {}.", csv.display());
        }
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let now = Utc::now();

    match cli.command {
        Commands::List => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(registry.documents())?);
            } else {
                println!("Tracked documents:");
                for doc in registry.documents() {
                    println!(
                        "- {} ({}): {} views, {} unique viewers, avg {}, last viewed {}",
                        doc.name,
                        doc.id,
                        doc.views,
                        doc.unique_viewers,
                        format::format_duration(doc.avg_time_spent_secs),
                        format::relative_time(doc.last_viewed, now)
                    );
                }
            }
        }
        Commands::Stats => {
            let overview = registry.overview();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                println!("Total documents: {}", overview.document_count);
                println!("Total views: {}", overview.total_views);
                println!("Total unique viewers: {}", overview.total_unique_viewers);
                println!(
                    "Avg time spent: {}",
                    format::format_duration(overview.avg_time_spent_secs)
                );
            }
        }
        Commands::Show { id } => {
            let doc = registry.lookup(&id)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(doc)?);
            } else {
                println!("{} ({})", doc.name, doc.id);
                println!("- Views: {}", doc.views);
                println!("- Unique viewers: {}", doc.unique_viewers);
                println!(
                    "- Avg time spent: {}",
                    format::format_duration(doc.avg_time_spent_secs)
                );
                println!("- Pages: {}", doc.page_count);
                println!(
                    "- Last viewed: {}",
                    format::relative_time(doc.last_viewed, now)
                );
                println!("- Created: {}", doc.created_at.format("%Y-%m-%d"));
            }
        }
        Commands::Trend { id } => {
            let series = synth::get_daily_views(&registry, &id, &mut rng)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                println!("Views over the last 7 days:");
                for point in series {
                    println!("- {}: {} views", point.label, point.views);
                }
            }
        }
        Commands::Pages { id } => {
            let profile = synth::get_page_engagement(&registry, &id, &mut rng)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("Page engagement:");
                for point in profile {
                    println!(
                        "- Page {}: {} views, avg {}",
                        point.page,
                        point.views,
                        format::format_duration(point.avg_time_secs)
                    );
                }
            }
        }
        Commands::Activity { id } => {
            let feed = synth::get_activity_feed(&registry, &id)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&feed)?);
            } else {
                println!("Viewer activity:");
                for event in feed {
                    let mut line = format!(
                        "- {}: {}",
                        format::relative_time(event.timestamp, now),
                        event.action
                    );
                    if let Some(details) = &event.details {
                        line.push_str(&format!(" ({details})"));
                    }
                    if let Some(duration) = event.duration_secs {
                        line.push_str(&format!(" [{}]", format::format_duration(duration)));
                    }
                    println!("{line}");
                }
            }
        }
        Commands::Report { id, out } => {
            let doc = registry.lookup(&id)?.clone();
            let daily = synth::get_daily_views(&registry, &id, &mut rng)?;
            let pages = synth::get_page_engagement(&registry, &id, &mut rng)?;
            let activity = synth::get_activity_feed(&registry, &id)?;
            let report = report::build_report(&doc, &daily, &pages, &activity, now);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
