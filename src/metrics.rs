//! Prediction metrics and statistics tracking for the churn service.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for served predictions
pub struct PredictionMetrics {
    /// Total successful predictions
    pub predictions_served: AtomicU64,
    /// Predictions classified as churn
    pub churn_predicted: AtomicU64,
    /// Failed prediction requests
    pub failures: AtomicU64,
    /// Failures by error kind
    failures_by_kind: RwLock<HashMap<String, u64>>,
    /// Predictions by risk level
    by_risk_level: RwLock<HashMap<String, u64>>,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Probability distribution buckets
    probability_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PredictionMetrics {
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            churn_predicted: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            failures_by_kind: RwLock::new(HashMap::new()),
            by_risk_level: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a served prediction
    pub fn record_prediction(
        &self,
        processing_time: Duration,
        probability: f64,
        will_churn: bool,
        risk_level: &str,
    ) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);
        if will_churn {
            self.churn_predicted.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only last 10000
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (probability * 10.0).clamp(0.0, 9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }

        if let Ok(mut by_level) = self.by_risk_level.write() {
            *by_level.entry(risk_level.to_string()).or_insert(0) += 1;
        }
    }

    /// Record a failed prediction
    pub fn record_failure(&self, kind: &str) {
        self.failures.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_kind) = self.failures_by_kind.write() {
            *by_kind.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let mut sorted: Vec<u64> = match self.processing_times.read() {
            Ok(times) => times.clone(),
            Err(_) => return ProcessingStats::default(),
        };
        if sorted.is_empty() {
            return ProcessingStats::default();
        }
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Get current throughput (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get probability distribution
    pub fn get_probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
            .read()
            .map(|b| *b)
            .unwrap_or_default()
    }

    /// Point-in-time view of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let churned = self.churn_predicted.load(Ordering::Relaxed);

        MetricsSnapshot {
            predictions_served: served,
            churn_predicted: churned,
            churn_rate: if served > 0 {
                churned as f64 / served as f64
            } else {
                0.0
            },
            failures: self.failures.load(Ordering::Relaxed),
            failures_by_kind: self
                .failures_by_kind
                .read()
                .map(|m| m.clone())
                .unwrap_or_default(),
            by_risk_level: self
                .by_risk_level
                .read()
                .map(|m| m.clone())
                .unwrap_or_default(),
            processing: self.get_processing_stats(),
            probability_distribution: self.get_probability_distribution(),
            throughput: self.get_throughput(),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║            CHURN PREDICTION SERVICE - METRICS SUMMARY        ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Predictions Served: {:>8}  │  Throughput: {:>8.2} req/s ║",
            snapshot.predictions_served, snapshot.throughput
        );
        info!(
            "║ Churn Predicted:    {:>8}  │  Churn Rate: {:>8.1}%     ║",
            snapshot.churn_predicted,
            snapshot.churn_rate * 100.0
        );
        info!("║ Failures:           {:>8}                                 ║", snapshot.failures);
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            snapshot.processing.mean_us,
            snapshot.processing.p50_us,
            snapshot.processing.p95_us,
            snapshot.processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Predictions by Risk Level:                                   ║");
        for (level, count) in &snapshot.by_risk_level {
            info!("║   {:10}: {:>6}                                         ║", level, count);
        }
        if !snapshot.failures_by_kind.is_empty() {
            info!("║ Failures by Kind:                                            ║");
            for (kind, count) in &snapshot.failures_by_kind {
                info!("║   {:22}: {:>6}                             ║", kind, count);
            }
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Churn Probability Distribution:                              ║");
        let total: u64 = snapshot.probability_distribution.iter().sum();
        for (i, &count) in snapshot.probability_distribution.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable metrics view
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub predictions_served: u64,
    pub churn_predicted: u64,
    pub churn_rate: f64,
    pub failures: u64,
    pub failures_by_kind: HashMap<String, u64>,
    pub by_risk_level: HashMap<String, u64>,
    pub processing: ProcessingStats,
    pub probability_distribution: [u64; 10],
    pub throughput: f64,
    pub uptime_secs: u64,
}

/// Metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: Arc<PredictionMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<PredictionMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
