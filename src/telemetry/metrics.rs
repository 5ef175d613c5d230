//! Metrics
//!
//! Revocation metrics collection interfaces and implementations.

use std::collections::HashMap;
use std::sync::Mutex;

/// Metric labels.
pub type MetricLabels = HashMap<String, String>;

/// Revocation metrics interface.
pub trait RevocationMetrics: Send + Sync {
    /// Record a finished revoke request.
    fn record_revocation(&self, path: &str, status: &str);

    /// Record an introspection result.
    fn record_introspection(&self, active: bool);

    /// Record a provider call and its duration.
    fn record_provider_call(&self, endpoint: &str, success: bool, duration_ms: f64);

    /// Record an internal grant revocation.
    fn record_grant_revoked(&self);

    /// Record error.
    fn record_error(&self, error_code: &str);
}

/// No-op metrics implementation.
pub struct NoOpMetrics;

impl RevocationMetrics for NoOpMetrics {
    fn record_revocation(&self, _path: &str, _status: &str) {}
    fn record_introspection(&self, _active: bool) {}
    fn record_provider_call(&self, _endpoint: &str, _success: bool, _duration_ms: f64) {}
    fn record_grant_revoked(&self) {}
    fn record_error(&self, _error_code: &str) {}
}

/// Metric entry for in-memory storage.
#[derive(Debug, Clone)]
pub struct MetricEntry {
    pub name: String,
    pub value: f64,
    pub labels: MetricLabels,
    pub timestamp: u64,
}

/// In-memory metrics for testing.
pub struct InMemoryMetrics {
    entries: Mutex<Vec<MetricEntry>>,
}

impl InMemoryMetrics {
    /// Create new in-memory metrics.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Get all recorded entries.
    pub fn get_entries(&self) -> Vec<MetricEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Get entries by name.
    pub fn get_entries_by_name(&self, name: &str) -> Vec<MetricEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    fn record(&self, name: &str, value: f64, labels: MetricLabels) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        self.entries.lock().unwrap().push(MetricEntry {
            name: name.to_string(),
            value,
            labels,
            timestamp: now,
        });
    }
}

impl Default for InMemoryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RevocationMetrics for InMemoryMetrics {
    fn record_revocation(&self, path: &str, status: &str) {
        let mut labels = MetricLabels::new();
        labels.insert("path".to_string(), path.to_string());
        labels.insert("status".to_string(), status.to_string());
        self.record("revocation_requests_total", 1.0, labels);
    }

    fn record_introspection(&self, active: bool) {
        let mut labels = MetricLabels::new();
        labels.insert("active".to_string(), active.to_string());
        self.record("revocation_introspections_total", 1.0, labels);
    }

    fn record_provider_call(&self, endpoint: &str, success: bool, duration_ms: f64) {
        let mut labels = MetricLabels::new();
        labels.insert("endpoint".to_string(), endpoint.to_string());
        labels.insert("success".to_string(), success.to_string());
        self.record("revocation_provider_calls_total", 1.0, labels.clone());
        self.record("revocation_provider_call_duration_ms", duration_ms, labels);
    }

    fn record_grant_revoked(&self) {
        self.record("revocation_grants_revoked_total", 1.0, MetricLabels::new());
    }

    fn record_error(&self, error_code: &str) {
        let mut labels = MetricLabels::new();
        labels.insert("error_code".to_string(), error_code.to_string());
        self.record("revocation_errors_total", 1.0, labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_op_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_revocation("access_token", "revoked");
        metrics.record_error("REVOKE_STORAGE");
    }

    #[test]
    fn test_in_memory_metrics() {
        let metrics = InMemoryMetrics::new();

        metrics.record_revocation("refresh_token", "revoked");
        metrics.record_provider_call("/oauth2/revoke", true, 12.5);

        assert_eq!(metrics.get_entries().len(), 3);

        let requests = metrics.get_entries_by_name("revocation_requests_total");
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].labels.get("status"),
            Some(&"revoked".to_string())
        );

        let durations = metrics.get_entries_by_name("revocation_provider_call_duration_ms");
        assert_eq!(durations[0].value, 12.5);
    }

    #[test]
    fn test_clear_entries() {
        let metrics = InMemoryMetrics::new();
        metrics.record_grant_revoked();

        assert!(!metrics.get_entries().is_empty());
        metrics.clear();
        assert!(metrics.get_entries().is_empty());
    }
}
