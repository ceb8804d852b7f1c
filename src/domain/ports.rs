use crate::domain::model::{EvaluationBatch, EvaluationReport, IpRange};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Tenant trust snapshot, scoring window and file locations for one batch run.
pub trait ConfigProvider: Send + Sync {
    fn whitelisted_ranges(&self) -> Result<Vec<IpRange>>;
    fn approved_devices(&self) -> &[String];
    fn unverified_devices(&self) -> &[String];
    fn period(&self) -> (NaiveDate, NaiveDate);
    fn holidays(&self) -> &[NaiveDate];
    fn checkins_path(&self) -> &str;
    fn leaves_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<EvaluationBatch>;
    async fn transform(&self, batch: EvaluationBatch) -> Result<EvaluationReport>;
    async fn load(&self, report: EvaluationReport) -> Result<String>;
}
