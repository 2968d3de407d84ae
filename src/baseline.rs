use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::metrics::percent;
use crate::models::{OrganizationBaseline, SiteRecord};

#[derive(Debug, Default)]
struct Totals {
    clients: u64,
    client_stay_days: f64,
    permanent_exits: u64,
    exits: u64,
    client_shelter_days: f64,
    without_case_plans: u64,
    bed_capacity: u64,
    occupied_beds: f64,
    admissions: u64,
    successful_exits: u64,
}

impl Totals {
    fn add(mut self, site: &SiteRecord) -> Self {
        let clients = site.total_clients as f64;
        self.clients += site.total_clients as u64;
        self.client_stay_days += site.avg_length_of_stay_days * clients;
        self.permanent_exits += site.permanent_housing_exits as u64;
        self.exits += site.total_exits();
        self.client_shelter_days += site.avg_days_in_shelter * clients;
        self.without_case_plans += site.clients_without_case_plans as u64;
        self.bed_capacity += site.total_bed_capacity as u64;
        self.occupied_beds += site.total_bed_capacity as f64 * site.occupancy_rate;
        self.admissions += site.new_admissions_month as u64;
        self.successful_exits += site.successful_exits_month as u64;
        self
    }
}

/// Folds every site into the organization-wide baseline.
///
/// Averages are weighted by client count (or bed capacity for occupancy) and
/// rounded once, after summation.
pub fn organization_baseline(sites: &[SiteRecord]) -> Result<OrganizationBaseline> {
    if sites.is_empty() {
        return Err(DashboardError::EmptyDataset { divisor: "site count" });
    }

    let totals = sites.iter().fold(Totals::default(), Totals::add);

    if totals.clients == 0 {
        return Err(DashboardError::EmptyDataset { divisor: "total clients" });
    }
    if totals.exits == 0 {
        return Err(DashboardError::EmptyDataset { divisor: "total exits" });
    }
    if totals.bed_capacity == 0 {
        return Err(DashboardError::EmptyDataset { divisor: "total bed capacity" });
    }

    let clients = totals.clients as f64;
    let without_case_plans_rate = percent(totals.without_case_plans as f64, clients);
    let avg_without_case_plans_per_site =
        (without_case_plans_rate as f64 * clients / (sites.len() as f64 * 100.0)).round() as u32;

    let baseline = OrganizationBaseline {
        avg_length_of_stay: (totals.client_stay_days / clients).round() as u32,
        permanent_housing_rate: percent(totals.permanent_exits as f64, totals.exits as f64),
        avg_days_in_shelter: (totals.client_shelter_days / clients).round() as u32,
        without_case_plans_rate,
        occupancy_rate: percent(totals.occupied_beds, totals.bed_capacity as f64),
        total_admissions: totals.admissions,
        total_successful_exits: totals.successful_exits,
        total_clients: totals.clients,
        site_count: sites.len(),
        avg_without_case_plans_per_site,
    };

    debug!(sites = sites.len(), ?baseline, "computed organization baseline");
    Ok(baseline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::sample_sites;
    use crate::models::test_site;

    #[test]
    fn length_of_stay_is_client_weighted() {
        let sites = vec![test_site(1, 145, 89.0), test_site(2, 78, 156.0)];
        let baseline = organization_baseline(&sites).unwrap();
        // (145 * 89 + 78 * 156) / 223 = 112.4
        assert_eq!(baseline.avg_length_of_stay, 112);
    }

    #[test]
    fn sample_sites_produce_expected_baseline() {
        let baseline = organization_baseline(&sample_sites()).unwrap();
        assert_eq!(baseline.avg_length_of_stay, 112);
        assert_eq!(baseline.permanent_housing_rate, 60);
        assert_eq!(baseline.avg_days_in_shelter, 90);
        assert_eq!(baseline.without_case_plans_rate, 14);
        assert_eq!(baseline.occupancy_rate, 97);
        assert_eq!(baseline.total_admissions, 27);
        assert_eq!(baseline.total_successful_exits, 27);
        assert_eq!(baseline.total_clients, 223);
        assert_eq!(baseline.site_count, 2);
        assert_eq!(baseline.avg_without_case_plans_per_site, 16);
    }

    #[test]
    fn weighted_sums_are_not_rounded_per_site() {
        let mut first = test_site(1, 1, 10.4);
        first.avg_days_in_shelter = 10.4;
        let mut second = test_site(2, 1, 10.4);
        second.avg_days_in_shelter = 10.4;
        let mut third = test_site(3, 1, 11.4);
        third.avg_days_in_shelter = 11.4;

        // Per-site rounding would give (10 + 10 + 11) / 3 = 10.33 -> 10.
        let baseline = organization_baseline(&[first, second, third]).unwrap();
        assert_eq!(baseline.avg_length_of_stay, 11);
        assert_eq!(baseline.avg_days_in_shelter, 11);
    }

    #[test]
    fn permanent_rate_stays_within_percent_range() {
        let mut all_permanent = test_site(1, 10, 5.0);
        all_permanent.temporary_housing_exits = 0;
        all_permanent.unknown_exits = 0;
        let mut none_permanent = test_site(2, 10, 5.0);
        none_permanent.permanent_housing_exits = 0;

        let baseline = organization_baseline(&[all_permanent.clone()]).unwrap();
        assert_eq!(baseline.permanent_housing_rate, 100);
        let baseline = organization_baseline(&[none_permanent.clone()]).unwrap();
        assert_eq!(baseline.permanent_housing_rate, 0);
        let baseline = organization_baseline(&[all_permanent, none_permanent]).unwrap();
        // 10 of 20 exits.
        assert_eq!(baseline.permanent_housing_rate, 50);
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let err = organization_baseline(&[]).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDataset { divisor: "site count" }));
    }

    #[test]
    fn zero_divisors_are_errors() {
        let mut site = test_site(1, 10, 5.0);
        site.permanent_housing_exits = 0;
        site.temporary_housing_exits = 0;
        site.unknown_exits = 0;
        let err = organization_baseline(&[site]).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDataset { divisor: "total exits" }));

        let site = test_site(1, 0, 5.0);
        let err = organization_baseline(&[site]).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDataset { divisor: "total clients" }));

        let mut site = test_site(1, 10, 5.0);
        site.total_bed_capacity = 0;
        let err = organization_baseline(&[site]).unwrap_err();
        assert!(matches!(err, DashboardError::EmptyDataset { divisor: "total bed capacity" }));
    }

    #[test]
    fn recomputation_is_stable() {
        let sites = sample_sites();
        assert_eq!(
            organization_baseline(&sites).unwrap(),
            organization_baseline(&sites).unwrap()
        );
    }
}
