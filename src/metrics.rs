use crate::error::{DashboardError, Result};
use crate::models::{SiteMetrics, SiteRecord};

/// Whole-number percentage of `part` in `whole`, rounded half away from zero.
pub fn percent(part: f64, whole: f64) -> u32 {
    ((part / whole) * 100.0).round() as u32
}

pub fn site_metrics(site: &SiteRecord) -> Result<SiteMetrics> {
    if site.total_clients == 0 {
        return Err(DashboardError::invalid(site.site_id, "total_clients must be positive"));
    }

    let total_exits = site.total_exits();
    // A site with no exits this period reports 0%.
    let permanent_housing_rate = if total_exits > 0 {
        percent(site.permanent_housing_exits as f64, total_exits as f64)
    } else {
        0
    };

    Ok(SiteMetrics {
        permanent_housing_rate,
        without_case_plans_rate: percent(
            site.clients_without_case_plans as f64,
            site.total_clients as f64,
        ),
        occupancy_rate_percent: (site.occupancy_rate * 100.0).round() as u32,
        total_exits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_site;

    #[test]
    fn permanent_rate_uses_all_exit_kinds() {
        let mut site = test_site(1, 145, 89.0);
        site.permanent_housing_exits = 12;
        site.temporary_housing_exits = 8;
        site.unknown_exits = 5;

        let metrics = site_metrics(&site).unwrap();
        assert_eq!(metrics.total_exits, 25);
        assert_eq!(metrics.permanent_housing_rate, 48);
    }

    #[test]
    fn zero_exits_report_zero_rate() {
        let mut site = test_site(1, 40, 30.0);
        site.permanent_housing_exits = 0;
        site.temporary_housing_exits = 0;
        site.unknown_exits = 0;

        let metrics = site_metrics(&site).unwrap();
        assert_eq!(metrics.total_exits, 0);
        assert_eq!(metrics.permanent_housing_rate, 0);
    }

    #[test]
    fn occupancy_is_reported_as_percent() {
        let mut site = test_site(1, 145, 89.0);
        site.occupancy_rate = 0.97;
        assert_eq!(site_metrics(&site).unwrap().occupancy_rate_percent, 97);
    }

    #[test]
    fn case_plan_rate_rounds_half_away_from_zero() {
        let mut site = test_site(1, 8, 20.0);
        site.clients_without_case_plans = 1;
        // 12.5% rounds up.
        assert_eq!(site_metrics(&site).unwrap().without_case_plans_rate, 13);

        site.total_clients = 145;
        site.clients_without_case_plans = 23;
        assert_eq!(site_metrics(&site).unwrap().without_case_plans_rate, 16);
    }

    #[test]
    fn exit_counts_near_the_integer_limit_do_not_overflow() {
        let mut site = test_site(1, 10, 5.0);
        site.permanent_housing_exits = u32::MAX;
        site.temporary_housing_exits = 1;
        site.unknown_exits = u32::MAX;

        let metrics = site_metrics(&site).unwrap();
        assert_eq!(metrics.total_exits, 2 * u64::from(u32::MAX) + 1);
        assert_eq!(metrics.permanent_housing_rate, 50);
    }

    #[test]
    fn rejects_site_without_clients() {
        let site = test_site(9, 0, 20.0);
        let err = site_metrics(&site).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRecord { site_id: 9, .. }));
    }

    #[test]
    fn recomputation_is_stable() {
        let site = test_site(3, 60, 45.0);
        assert_eq!(site_metrics(&site).unwrap(), site_metrics(&site).unwrap());
    }
}
