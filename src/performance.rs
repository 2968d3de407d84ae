use std::ops::RangeInclusive;

use crate::models::{
    Band, MetricKind, OrganizationBaseline, PerformanceResult, PerformanceTier, SiteBands,
    SiteMetrics, SiteRecord,
};

/// Number of independently scored conditions.
pub const MAX_SCORE: u8 = 4;

/// Occupancy percentages counted as fully used, regardless of the baseline.
pub const TARGET_OCCUPANCY: RangeInclusive<u32> = 90..=100;

const WARNING_OCCUPANCY: f64 = 80.0;
const GOOD_FACTOR: f64 = 0.8;
const WARNING_FACTOR: f64 = 1.2;

pub fn classify(
    site: &SiteRecord,
    metrics: &SiteMetrics,
    baseline: &OrganizationBaseline,
) -> PerformanceResult {
    let conditions = [
        // Shorter stays are better.
        site.avg_length_of_stay_days <= baseline.avg_length_of_stay as f64,
        metrics.permanent_housing_rate >= baseline.permanent_housing_rate,
        // Over capacity is not rewarded.
        TARGET_OCCUPANCY.contains(&metrics.occupancy_rate_percent),
        metrics.without_case_plans_rate <= baseline.without_case_plans_rate,
    ];
    let score = conditions.iter().filter(|met| **met).count() as u8;

    PerformanceResult {
        score,
        tier: tier_for(score),
    }
}

pub fn tier_for(score: u8) -> PerformanceTier {
    match score {
        0..=1 => PerformanceTier::NeedsImprovement,
        2 => PerformanceTier::Good,
        _ => PerformanceTier::Excellent,
    }
}

/// Bands a metric value against the baseline.
///
/// Case plans are banded on the site's raw count of clients without a plan,
/// compared with the organization's average count per site.
pub fn band(kind: MetricKind, value: f64, baseline: &OrganizationBaseline) -> Band {
    match kind {
        MetricKind::LengthOfStay => lower_is_better(value, baseline.avg_length_of_stay as f64),
        MetricKind::CasePlans => {
            lower_is_better(value, baseline.avg_without_case_plans_per_site as f64)
        }
        MetricKind::Occupancy => {
            if value >= *TARGET_OCCUPANCY.start() as f64 && value <= *TARGET_OCCUPANCY.end() as f64 {
                Band::Good
            } else if value >= WARNING_OCCUPANCY {
                Band::Warning
            } else {
                Band::Poor
            }
        }
    }
}

/// Like [`band`] but keyed by column name; unknown metrics have no band.
pub fn band_named(name: &str, value: f64, baseline: &OrganizationBaseline) -> Option<Band> {
    MetricKind::from_name(name).map(|kind| band(kind, value, baseline))
}

pub fn site_bands(
    site: &SiteRecord,
    metrics: &SiteMetrics,
    baseline: &OrganizationBaseline,
) -> SiteBands {
    SiteBands {
        length_of_stay: band(MetricKind::LengthOfStay, site.avg_length_of_stay_days, baseline),
        occupancy: band(
            MetricKind::Occupancy,
            metrics.occupancy_rate_percent as f64,
            baseline,
        ),
        case_plans: band(
            MetricKind::CasePlans,
            site.clients_without_case_plans as f64,
            baseline,
        ),
    }
}

fn lower_is_better(value: f64, reference: f64) -> Band {
    if value <= reference * GOOD_FACTOR {
        Band::Good
    } else if value <= reference * WARNING_FACTOR {
        Band::Warning
    } else {
        Band::Poor
    }
}
