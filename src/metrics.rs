//! Metrics collection and export for resource pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::utils::CachePadded;

/// Snapshot of a pool's counters
///
/// # Examples
///
/// ```
/// use esox_resourcepool::Pool;
///
/// let pool: Pool<i32> = Pool::from_resources(vec![1, 2, 3]);
///
/// {
///     let _res = pool.acquire().unwrap();
///     let metrics = pool.metrics();
///     assert_eq!(metrics.total_acquired, 1);
///     assert_eq!(metrics.idle_objects, 2);
/// }
///
/// assert_eq!(pool.metrics().total_returned, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "metrics", derive(serde::Serialize))]
pub struct PoolMetrics {
    /// Resources handed to the pool with `add`
    pub total_added: usize,

    /// Successful acquisitions
    pub total_acquired: usize,

    /// Resources that came back automatically after a loan
    pub total_returned: usize,

    /// Acquisitions that found a non-blocking pool empty
    pub empty_events: usize,

    /// Blocking acquisitions that gave up at their deadline
    pub timeouts: usize,

    /// Resources idle in the pool at snapshot time
    pub idle_objects: usize,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_added".to_string(), self.total_added.to_string());
        metrics.insert("total_acquired".to_string(), self.total_acquired.to_string());
        metrics.insert("total_returned".to_string(), self.total_returned.to_string());
        metrics.insert("empty_events".to_string(), self.empty_events.to_string());
        metrics.insert("timeouts".to_string(), self.timeouts.to_string());
        metrics.insert("idle_objects".to_string(), self.idle_objects.to_string());
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use esox_resourcepool::{MetricsExporter, Pool};
    /// use std::collections::HashMap;
    ///
    /// let pool: Pool<i32> = Pool::from_resources(vec![1, 2, 3]);
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = MetricsExporter::export_prometheus(&pool.metrics(), "my_pool", Some(&tags));
    /// assert!(output.contains("resourcepool_objects_idle"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        Self::push_metric(
            &mut output,
            "resourcepool_objects_idle",
            "Current idle resources",
            "gauge",
            &labels,
            metrics.idle_objects,
        );

        Self::push_metric(
            &mut output,
            "resourcepool_objects_added_total",
            "Total resources added",
            "counter",
            &labels,
            metrics.total_added,
        );

        Self::push_metric(
            &mut output,
            "resourcepool_objects_acquired_total",
            "Total resources acquired",
            "counter",
            &labels,
            metrics.total_acquired,
        );

        Self::push_metric(
            &mut output,
            "resourcepool_objects_returned_total",
            "Total resources returned",
            "counter",
            &labels,
            metrics.total_returned,
        );

        Self::push_metric(
            &mut output,
            "resourcepool_events_empty_total",
            "Acquisitions on an empty pool",
            "counter",
            &labels,
            metrics.empty_events,
        );

        Self::push_metric(
            &mut output,
            "resourcepool_events_timeout_total",
            "Acquisitions that timed out",
            "counter",
            &labels,
            metrics.timeouts,
        );

        output
    }

    fn push_metric(
        output: &mut String,
        name: &str,
        help: &str,
        kind: &str,
        labels: &str,
        value: usize,
    ) {
        output.push_str(&format!("# HELP {} {}\n", name, help));
        output.push_str(&format!("# TYPE {} {}\n", name, kind));
        output.push_str(&format!("{}{{{}}} {}\n", name, labels, value));
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            let mut tags: Vec<_> = tags.iter().collect();
            tags.sort();
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
#[derive(Default)]
pub(crate) struct MetricsTracker {
    pub total_added: CachePadded<AtomicUsize>,
    pub total_acquired: CachePadded<AtomicUsize>,
    pub total_returned: CachePadded<AtomicUsize>,
    pub empty_events: CachePadded<AtomicUsize>,
    pub timeouts: CachePadded<AtomicUsize>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self, idle: usize) -> PoolMetrics {
        PoolMetrics {
            total_added: self.total_added.load(Ordering::Relaxed),
            total_acquired: self.total_acquired.load(Ordering::Relaxed),
            total_returned: self.total_returned.load(Ordering::Relaxed),
            empty_events: self.empty_events.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            idle_objects: idle,
        }
    }
}
