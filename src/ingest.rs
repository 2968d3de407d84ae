use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::models::{CaseManagerGap, SiteRecord};

const ENTRY_SEPARATOR: char = '|';
const COUNT_SEPARATOR: &str = " - ";

/// One row of the site export, column for column.
#[derive(Debug, Deserialize)]
struct CsvRow {
    site_id: u32,
    site_name: String,
    region: String,
    total_clients: u32,
    avg_length_of_stay_days: f64,
    permanent_housing_exits: u32,
    temporary_housing_exits: u32,
    unknown_exits: u32,
    avg_days_in_shelter: f64,
    clients_without_case_plans: u32,
    total_bed_capacity: u32,
    occupancy_rate: f64,
    new_admissions_month: u32,
    successful_exits_month: u32,
    #[serde(default)]
    case_managers_without_plans: String,
}

impl CsvRow {
    fn into_record(self) -> Result<SiteRecord> {
        let case_managers_without_plans =
            parse_case_managers(self.site_id, &self.case_managers_without_plans)?;

        Ok(SiteRecord {
            site_id: self.site_id,
            site_name: self.site_name,
            region: self.region,
            total_clients: self.total_clients,
            avg_length_of_stay_days: self.avg_length_of_stay_days,
            permanent_housing_exits: self.permanent_housing_exits,
            temporary_housing_exits: self.temporary_housing_exits,
            unknown_exits: self.unknown_exits,
            avg_days_in_shelter: self.avg_days_in_shelter,
            clients_without_case_plans: self.clients_without_case_plans,
            total_bed_capacity: self.total_bed_capacity,
            occupancy_rate: self.occupancy_rate,
            new_admissions_month: self.new_admissions_month,
            successful_exits_month: self.successful_exits_month,
            case_managers_without_plans,
        })
    }
}

pub fn load_sites(csv_path: &Path) -> Result<Vec<SiteRecord>> {
    let file = std::fs::File::open(csv_path)?;
    let sites = read_sites(file)?;
    info!(path = %csv_path.display(), sites = sites.len(), "loaded site records");
    Ok(sites)
}

/// Reads and validates every row; the first bad row fails the whole load.
pub fn read_sites<R: Read>(input: R) -> Result<Vec<SiteRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let mut seen = HashSet::new();
    let mut sites = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let site = result?.into_record()?;
        validate(&site)?;
        if !seen.insert(site.site_id) {
            return Err(DashboardError::invalid(site.site_id, "duplicate site_id"));
        }
        debug!(site_id = site.site_id, site_name = %site.site_name, "parsed site");
        sites.push(site);
    }

    Ok(sites)
}

/// Parses `Name - count|Name - count`. Blank input yields no entries.
pub fn parse_case_managers(site_id: u32, raw: &str) -> Result<Vec<CaseManagerGap>> {
    raw.split(ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<CaseManagerGap> {
            let (name, count) = entry.split_once(COUNT_SEPARATOR).ok_or_else(|| {
                DashboardError::invalid(site_id, format!("case manager entry `{entry}` has no count"))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(DashboardError::invalid(
                    site_id,
                    format!("case manager entry `{entry}` has no name"),
                ));
            }
            let count = count.trim().parse::<u32>().map_err(|_| {
                DashboardError::invalid(site_id, format!("case manager count in `{entry}` is not a count"))
            })?;

            Ok(CaseManagerGap {
                name: name.to_string(),
                count,
            })
        })
        .collect()
}

pub fn validate(site: &SiteRecord) -> Result<()> {
    let fail = |reason: &str| Err(DashboardError::invalid(site.site_id, reason));

    if site.total_clients == 0 {
        return fail("total_clients must be positive");
    }
    if site.total_bed_capacity == 0 {
        return fail("total_bed_capacity must be positive");
    }
    if site.clients_without_case_plans > site.total_clients {
        return fail("clients_without_case_plans exceeds total_clients");
    }

    let measures = [
        ("avg_length_of_stay_days", site.avg_length_of_stay_days),
        ("avg_days_in_shelter", site.avg_days_in_shelter),
        ("occupancy_rate", site.occupancy_rate),
    ];
    for (field, value) in measures {
        if !value.is_finite() || value < 0.0 {
            return Err(DashboardError::invalid(
                site.site_id,
                format!("{field} must be a non-negative number, got {value}"),
            ));
        }
    }

    Ok(())
}

/// Built-in dataset used when no CSV export is supplied.
pub fn sample_sites() -> Vec<SiteRecord> {
    vec![
        SiteRecord {
            site_id: 1,
            site_name: "Downtown Emergency Shelter".to_string(),
            region: "San Francisco".to_string(),
            total_clients: 145,
            avg_length_of_stay_days: 89.0,
            permanent_housing_exits: 12,
            temporary_housing_exits: 8,
            unknown_exits: 5,
            avg_days_in_shelter: 67.0,
            clients_without_case_plans: 23,
            total_bed_capacity: 150,
            occupancy_rate: 0.97,
            new_admissions_month: 18,
            successful_exits_month: 12,
            case_managers_without_plans: Vec::new(),
        },
        SiteRecord {
            site_id: 2,
            site_name: "Mission District Housing First".to_string(),
            region: "San Francisco".to_string(),
            total_clients: 78,
            avg_length_of_stay_days: 156.0,
            permanent_housing_exits: 15,
            temporary_housing_exits: 3,
            unknown_exits: 2,
            avg_days_in_shelter: 134.0,
            clients_without_case_plans: 8,
            total_bed_capacity: 80,
            occupancy_rate: 0.98,
            new_admissions_month: 9,
            successful_exits_month: 15,
            case_managers_without_plans: Vec::new(),
        },
    ]
}
