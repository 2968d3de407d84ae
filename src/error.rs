use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Aggregation over no records, or over records whose divisor sums to zero.
    #[error("Empty dataset: {divisor} sums to zero")]
    EmptyDataset { divisor: &'static str },

    #[error("Invalid record for site {site_id}: {reason}")]
    InvalidRecord { site_id: u32, reason: String },

    #[error("Site not found: {0}")]
    SiteNotFound(u32),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn invalid(site_id: u32, reason: impl Into<String>) -> Self {
        DashboardError::InvalidRecord {
            site_id,
            reason: reason.into(),
        }
    }
}
