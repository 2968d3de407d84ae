use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{Band, CaseManagerGap, SiteRow, ViewModel};
use crate::performance::{band_named, MAX_SCORE};

/// Table rows ordered by score, highest first; ties keep input order.
pub fn ranked_rows(view: &ViewModel) -> Vec<&SiteRow> {
    let mut rows: Vec<&SiteRow> = view.rows.iter().collect();
    rows.sort_by(|a, b| b.performance.score.cmp(&a.performance.score));
    rows
}

pub fn case_manager_note(gaps: &[CaseManagerGap]) -> String {
    if gaps.is_empty() {
        return "No case manager data available".to_string();
    }

    gaps.iter()
        .map(|gap| format!("{} - {}", gap.name, gap.count))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn score_line(row: &SiteRow) -> String {
    format!(
        "- {} ({}) score {}/{} {}",
        row.site_name,
        row.region,
        row.performance.score,
        MAX_SCORE,
        row.performance.tier.label()
    )
}

fn banded(value: String, band: Band) -> String {
    format!("{value} ({})", band.as_str())
}

/// Metric columns without a band are printed as-is.
fn table_cell(metric: &str, text: String, value: f64, view: &ViewModel) -> String {
    match band_named(metric, value, &view.baseline) {
        Some(band) => banded(text, band),
        None => text,
    }
}

pub fn build_report(view: &ViewModel, generated_on: NaiveDate) -> String {
    let baseline = &view.baseline;
    let mut output = String::new();
    let scope_label = view
        .selected
        .as_ref()
        .map(|detail| detail.record.site_name.as_str())
        .unwrap_or("all sites");

    let _ = writeln!(output, "# Site Performance Report");
    let _ = writeln!(
        output,
        "Generated for {} on {} ({} sites, {} clients)",
        scope_label, generated_on, baseline.site_count, baseline.total_clients
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Organization Baseline");
    let _ = writeln!(output, "- Avg length of stay: {} days", baseline.avg_length_of_stay);
    let _ = writeln!(output, "- Permanent housing rate: {}%", baseline.permanent_housing_rate);
    let _ = writeln!(output, "- Occupancy rate: {}%", baseline.occupancy_rate);
    let _ = writeln!(output, "- Avg days in shelter: {}", baseline.avg_days_in_shelter);
    let _ = writeln!(output, "- Clients without case plans: {}%", baseline.without_case_plans_rate);

    if let Some(detail) = &view.selected {
        let site = &detail.record;
        let _ = writeln!(output);
        let _ = writeln!(output, "## {} ({})", site.site_name, site.region);
        let _ = writeln!(
            output,
            "- Avg length of stay: {} (org {})",
            banded(format!("{} days", site.avg_length_of_stay_days), detail.bands.length_of_stay),
            baseline.avg_length_of_stay
        );
        let _ = writeln!(
            output,
            "- Permanent housing rate: {}% (org {}%)",
            detail.metrics.permanent_housing_rate, baseline.permanent_housing_rate
        );
        let _ = writeln!(
            output,
            "- Occupancy rate: {} (org {}%)",
            banded(format!("{}%", detail.metrics.occupancy_rate_percent), detail.bands.occupancy),
            baseline.occupancy_rate
        );
        let _ = writeln!(
            output,
            "- Avg days in shelter: {} (org {})",
            site.avg_days_in_shelter, baseline.avg_days_in_shelter
        );
        let _ = writeln!(
            output,
            "- Clients without case plans: {}% (org {}%)",
            detail.metrics.without_case_plans_rate, baseline.without_case_plans_rate
        );
        let _ = writeln!(
            output,
            "- Performance: {} (score {}/{})",
            detail.performance.tier.label(),
            detail.performance.score,
            MAX_SCORE
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Exits and Capacity");
    let _ = writeln!(
        output,
        "- Exits: {} permanent, {} temporary, {} unknown/other",
        view.exits.permanent, view.exits.temporary, view.exits.unknown
    );
    let _ = writeln!(
        output,
        "- Beds: {} occupied, {} available",
        view.beds.occupied, view.beds.available
    );
    let _ = writeln!(
        output,
        "- Case plans: {} with, {} without",
        view.case_plans.with_plans, view.case_plans.without_plans
    );
    match view.monthly.site {
        Some(site) => {
            let _ = writeln!(
                output,
                "- This month: {} admissions, {} successful exits (org {} / {})",
                site.admissions,
                site.successful_exits,
                view.monthly.organization.admissions,
                view.monthly.organization.successful_exits
            );
        }
        None => {
            let _ = writeln!(
                output,
                "- This month: {} admissions, {} successful exits",
                view.monthly.organization.admissions, view.monthly.organization.successful_exits
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Site Performance");

    if view.rows.is_empty() {
        let _ = writeln!(output, "No sites loaded.");
    } else {
        let _ = writeln!(
            output,
            "| Site | Region | Clients | Avg Stay | Permanent Housing | Occupancy | Without Case Plans | Performance |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
        for row in view.rows.iter() {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                row.site_name,
                row.region,
                row.total_clients,
                table_cell(
                    "lengthOfStay",
                    format!("{} days", row.avg_length_of_stay_days),
                    row.avg_length_of_stay_days,
                    view
                ),
                table_cell(
                    "permanentHousing",
                    format!("{}%", row.metrics.permanent_housing_rate),
                    row.metrics.permanent_housing_rate as f64,
                    view
                ),
                table_cell(
                    "occupancy",
                    format!("{}%", row.metrics.occupancy_rate_percent),
                    row.metrics.occupancy_rate_percent as f64,
                    view
                ),
                table_cell(
                    "casePlans",
                    row.clients_without_case_plans.to_string(),
                    row.clients_without_case_plans as f64,
                    view
                ),
                row.performance.tier.label()
            );
        }

        let _ = writeln!(output);
        let _ = writeln!(output, "## Case Managers With Clients Missing Plans");
        for row in view.rows.iter() {
            let _ = writeln!(
                output,
                "- {}: {}",
                row.site_name,
                case_manager_note(&row.case_managers_without_plans)
            );
        }
    }

    output
}
