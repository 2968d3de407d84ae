use crate::baseline::organization_baseline;
use crate::error::{DashboardError, Result};
use crate::metrics::site_metrics;
use crate::models::{
    BedUsage, CasePlanCoverage, ExitBreakdown, MonthlyCounts, MonthlyFlow, OrganizationBaseline,
    SiteDetail, SiteRecord, SiteRow, ViewModel,
};
use crate::performance::{classify, site_bands};

/// Derives everything a dashboard renders for the given selection.
///
/// `selected` picks one site by id; `None` is the organization-wide view.
/// Nothing is cached: every call recomputes from `sites`.
pub fn build_view(sites: &[SiteRecord], selected: Option<u32>) -> Result<ViewModel> {
    let baseline = organization_baseline(sites)?;

    let site = match selected {
        Some(site_id) => Some(
            sites
                .iter()
                .find(|site| site.site_id == site_id)
                .ok_or(DashboardError::SiteNotFound(site_id))?,
        ),
        None => None,
    };

    let rows = sites
        .iter()
        .map(|site| site_row(site, &baseline))
        .collect::<Result<Vec<_>>>()?;

    let selected = site.map(|site| site_detail(site, &baseline)).transpose()?;

    let scope: &[SiteRecord] = match site {
        Some(site) => std::slice::from_ref(site),
        None => sites,
    };

    Ok(ViewModel {
        exits: exit_breakdown(scope),
        beds: bed_usage(scope),
        case_plans: case_plan_coverage(scope),
        monthly: MonthlyFlow {
            site: site.map(|site| MonthlyCounts {
                admissions: site.new_admissions_month as u64,
                successful_exits: site.successful_exits_month as u64,
            }),
            organization: MonthlyCounts {
                admissions: baseline.total_admissions,
                successful_exits: baseline.total_successful_exits,
            },
        },
        baseline,
        selected,
        rows,
    })
}

pub fn site_detail(site: &SiteRecord, baseline: &OrganizationBaseline) -> Result<SiteDetail> {
    let metrics = site_metrics(site)?;
    Ok(SiteDetail {
        record: site.clone(),
        metrics,
        bands: site_bands(site, &metrics, baseline),
        performance: classify(site, &metrics, baseline),
    })
}

fn site_row(site: &SiteRecord, baseline: &OrganizationBaseline) -> Result<SiteRow> {
    let metrics = site_metrics(site)?;
    Ok(SiteRow {
        site_id: site.site_id,
        site_name: site.site_name.clone(),
        region: site.region.clone(),
        total_clients: site.total_clients,
        avg_length_of_stay_days: site.avg_length_of_stay_days,
        clients_without_case_plans: site.clients_without_case_plans,
        case_managers_without_plans: site.case_managers_without_plans.clone(),
        metrics,
        bands: site_bands(site, &metrics, baseline),
        performance: classify(site, &metrics, baseline),
    })
}

pub fn exit_breakdown(sites: &[SiteRecord]) -> ExitBreakdown {
    sites.iter().fold(
        ExitBreakdown {
            permanent: 0,
            temporary: 0,
            unknown: 0,
        },
        |mut acc, site| {
            acc.permanent += site.permanent_housing_exits as u64;
            acc.temporary += site.temporary_housing_exits as u64;
            acc.unknown += site.unknown_exits as u64;
            acc
        },
    )
}

/// Occupied beds are rounded per site before summing.
pub fn bed_usage(sites: &[SiteRecord]) -> BedUsage {
    let (capacity, occupied) = sites.iter().fold((0i64, 0i64), |(capacity, occupied), site| {
        (
            capacity + site.total_bed_capacity as i64,
            occupied + site.occupied_beds(),
        )
    });

    BedUsage {
        occupied,
        available: capacity - occupied,
    }
}

pub fn case_plan_coverage(sites: &[SiteRecord]) -> CasePlanCoverage {
    let (total, without) = sites.iter().fold((0u64, 0u64), |(total, without), site| {
        (
            total + site.total_clients as u64,
            without + site.clients_without_case_plans as u64,
        )
    });

    CasePlanCoverage {
        with_plans: total - without,
        without_plans: without,
    }
}
