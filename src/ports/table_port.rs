//! Table access port trait.

use crate::domain::error::RegimescopeError;
use crate::domain::table::{
    ClusterSummaryRow, DailyMetricRow, FeatureImportanceRow, RiskSummaryRow, Tables,
};

pub trait TablePort {
    fn load_daily(&self) -> Result<Vec<DailyMetricRow>, RegimescopeError>;

    fn load_risk(&self) -> Result<Vec<RiskSummaryRow>, RegimescopeError>;

    fn load_clusters(&self) -> Result<Vec<ClusterSummaryRow>, RegimescopeError>;

    fn load_features(&self) -> Result<Vec<FeatureImportanceRow>, RegimescopeError>;

    /// Load all four tables as one read-only bundle.
    fn load_all(&self) -> Result<Tables, RegimescopeError> {
        Ok(Tables {
            daily: self.load_daily()?,
            risk: self.load_risk()?,
            clusters: self.load_clusters()?,
            features: self.load_features()?,
        })
    }
}
