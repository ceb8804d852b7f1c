use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EvaluationEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EvaluationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting evaluation run");

        let batch = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} check-ins and {} leave records",
            batch.checkins.len(),
            batch.leaves.len()
        );

        let report = self.pipeline.transform(batch).await?;
        tracing::info!(
            "Evaluated {} check-ins ({} in office, {} remote, {} for manual review), scored {} employees",
            report.summary.checkins_evaluated,
            report.summary.in_office,
            report.summary.remote,
            report.summary.manual_review,
            report.performance.len()
        );
        if !report.summary.newly_unverified_devices.is_empty() {
            tracing::warn!(
                "{} device(s) nominated for the unverified registry",
                report.summary.newly_unverified_devices.len()
            );
        }

        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report saved to: {}", output_path);

        Ok(output_path)
    }
}
