use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseManagerGap {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteRecord {
    pub site_id: u32,
    pub site_name: String,
    pub region: String,
    pub total_clients: u32,
    pub avg_length_of_stay_days: f64,
    pub permanent_housing_exits: u32,
    pub temporary_housing_exits: u32,
    pub unknown_exits: u32,
    pub avg_days_in_shelter: f64,
    pub clients_without_case_plans: u32,
    pub total_bed_capacity: u32,
    pub occupancy_rate: f64,
    pub new_admissions_month: u32,
    pub successful_exits_month: u32,
    pub case_managers_without_plans: Vec<CaseManagerGap>,
}

impl SiteRecord {
    pub fn total_exits(&self) -> u64 {
        u64::from(self.permanent_housing_exits)
            + u64::from(self.temporary_housing_exits)
            + u64::from(self.unknown_exits)
    }

    /// Beds in use, rounded to whole beds.
    pub fn occupied_beds(&self) -> i64 {
        (self.total_bed_capacity as f64 * self.occupancy_rate).round() as i64
    }
}

/// Organization-wide averages every site is compared against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationBaseline {
    pub avg_length_of_stay: u32,
    pub permanent_housing_rate: u32,
    pub avg_days_in_shelter: u32,
    pub without_case_plans_rate: u32,
    pub occupancy_rate: u32,
    pub total_admissions: u64,
    pub total_successful_exits: u64,
    pub total_clients: u64,
    pub site_count: usize,
    pub avg_without_case_plans_per_site: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SiteMetrics {
    pub permanent_housing_rate: u32,
    pub without_case_plans_rate: u32,
    pub occupancy_rate_percent: u32,
    pub total_exits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl PerformanceTier {
    pub fn label(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Excellent",
            PerformanceTier::Good => "Good",
            PerformanceTier::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerformanceResult {
    pub score: u8,
    pub tier: PerformanceTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    Good,
    Warning,
    Poor,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Good => "good",
            Band::Warning => "warning",
            Band::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MetricKind {
    LengthOfStay,
    CasePlans,
    Occupancy,
}

impl MetricKind {
    /// Resolves the display name of a metric column. Metrics without a
    /// threshold band (such as `permanentHousing`) resolve to `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lengthOfStay" => Some(MetricKind::LengthOfStay),
            "casePlans" => Some(MetricKind::CasePlans),
            "occupancy" => Some(MetricKind::Occupancy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SiteBands {
    pub length_of_stay: Band,
    pub occupancy: Band,
    pub case_plans: Band,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExitBreakdown {
    pub permanent: u64,
    pub temporary: u64,
    pub unknown: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BedUsage {
    pub occupied: i64,
    pub available: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CasePlanCoverage {
    pub with_plans: u64,
    pub without_plans: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCounts {
    pub admissions: u64,
    pub successful_exits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    pub site: Option<MonthlyCounts>,
    pub organization: MonthlyCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteRow {
    pub site_id: u32,
    pub site_name: String,
    pub region: String,
    pub total_clients: u32,
    pub avg_length_of_stay_days: f64,
    pub clients_without_case_plans: u32,
    pub case_managers_without_plans: Vec<CaseManagerGap>,
    pub metrics: SiteMetrics,
    pub bands: SiteBands,
    pub performance: PerformanceResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteDetail {
    pub record: SiteRecord,
    pub metrics: SiteMetrics,
    pub bands: SiteBands,
    pub performance: PerformanceResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub baseline: OrganizationBaseline,
    pub selected: Option<SiteDetail>,
    pub rows: Vec<SiteRow>,
    pub exits: ExitBreakdown,
    pub beds: BedUsage,
    pub case_plans: CasePlanCoverage,
    pub monthly: MonthlyFlow,
}

#[cfg(test)]
pub(crate) fn test_site(site_id: u32, total_clients: u32, avg_length_of_stay_days: f64) -> SiteRecord {
    SiteRecord {
        site_id,
        site_name: format!("Site {site_id}"),
        region: "San Francisco".to_string(),
        total_clients,
        avg_length_of_stay_days,
        permanent_housing_exits: 10,
        temporary_housing_exits: 5,
        unknown_exits: 5,
        avg_days_in_shelter: 60.0,
        clients_without_case_plans: 10,
        total_bed_capacity: 100,
        occupancy_rate: 0.95,
        new_admissions_month: 10,
        successful_exits_month: 8,
        case_managers_without_plans: Vec::new(),
    }
}
