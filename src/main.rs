use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod baseline;
mod error;
mod ingest;
mod metrics;
mod models;
mod performance;
mod report;
mod view;

use models::SiteRecord;
use performance::MAX_SCORE;

#[derive(Parser)]
#[command(name = "site-performance")]
#[command(about = "Program site performance metrics for homeless services", long_about = None)]
struct Cli {
    /// CSV export of site metrics; the built-in sample sites are used when omitted
    #[arg(long, env = "SITE_DATA_CSV", global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the organization-wide baseline
    Summary,
    /// Score every site against the baseline
    Score {
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// Compare one site with the baseline
    Site {
        #[arg(long)]
        id: u32,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        site: Option<u32>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Print the full view model as JSON
    View {
        #[arg(long)]
        site: Option<u32>,
    },
}

fn load(csv: Option<&PathBuf>) -> anyhow::Result<Vec<SiteRecord>> {
    match csv {
        Some(path) => ingest::load_sites(path)
            .with_context(|| format!("failed to load site data from {}", path.display())),
        None => {
            warn!("no CSV supplied, using built-in sample sites");
            Ok(ingest::sample_sites())
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let sites = load(cli.csv.as_ref())?;

    match cli.command {
        Commands::Summary => {
            let view = view::build_view(&sites, None)?;
            let baseline = &view.baseline;
            println!(
                "Organization baseline across {} sites ({} clients):",
                baseline.site_count, baseline.total_clients
            );
            println!("- Avg length of stay: {} days", baseline.avg_length_of_stay);
            println!("- Permanent housing rate: {}%", baseline.permanent_housing_rate);
            println!("- Occupancy rate: {}%", baseline.occupancy_rate);
            println!("- Avg days in shelter: {}", baseline.avg_days_in_shelter);
            println!(
                "- Clients without case plans: {}%",
                baseline.without_case_plans_rate
            );
            println!(
                "- This month: {} admissions, {} successful exits",
                baseline.total_admissions, baseline.total_successful_exits
            );
        }
        Commands::Score { limit } => {
            let view = view::build_view(&sites, None)?;
            println!("Sites by performance score:");
            for row in report::ranked_rows(&view).into_iter().take(limit) {
                println!("{}", report::score_line(row));
            }
        }
        Commands::Site { id } => {
            let view = view::build_view(&sites, Some(id))?;
            let detail = view
                .selected
                .as_ref()
                .context("site view has no selected site")?;
            let site = &detail.record;
            let baseline = &view.baseline;

            println!("{} ({})", site.site_name, site.region);
            println!(
                "- Avg length of stay: {} days [{}] (org {})",
                site.avg_length_of_stay_days,
                detail.bands.length_of_stay.as_str(),
                baseline.avg_length_of_stay
            );
            println!(
                "- Permanent housing rate: {}% of {} exits (org {}%)",
                detail.metrics.permanent_housing_rate,
                detail.metrics.total_exits,
                baseline.permanent_housing_rate
            );
            println!(
                "- Occupancy rate: {}% [{}] (org {}%)",
                detail.metrics.occupancy_rate_percent,
                detail.bands.occupancy.as_str(),
                baseline.occupancy_rate
            );
            println!(
                "- Clients without case plans: {} [{}], {}% (org {}%)",
                site.clients_without_case_plans,
                detail.bands.case_plans.as_str(),
                detail.metrics.without_case_plans_rate,
                baseline.without_case_plans_rate
            );
            println!(
                "- Case managers: {}",
                report::case_manager_note(&site.case_managers_without_plans)
            );
            println!(
                "- Performance: {} (score {}/{})",
                detail.performance.tier.label(),
                detail.performance.score,
                MAX_SCORE
            );
        }
        Commands::Report { site, out } => {
            let view = view::build_view(&sites, site)?;
            let report = report::build_report(&view, Utc::now().date_naive());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
        Commands::View { site } => {
            let view = view::build_view(&sites, site)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}
