use crate::core::{Pipeline, RunReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Runs a [`Pipeline`] phase by phase; the first failing phase ends the run.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting dog house run...");
        if self.monitor.is_enabled() {
            tracing::info!("🔍 System monitoring enabled");
        }

        let token = self.pipeline.authorize().await?;
        self.monitor.log_stats("Authorize");

        // Extract
        let house = self.pipeline.extract(&token).await?;
        self.monitor.log_stats("Extract");

        // Transform
        let answer = self.pipeline.transform(&house).await?;
        self.monitor.log_stats("Transform");

        // Load
        let report = self.pipeline.load(&house, answer, &token).await?;
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(report)
    }
}
