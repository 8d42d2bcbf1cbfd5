use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;
use std::time::Duration;

pub struct GatewayMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

static METRICS: OnceLock<Option<GatewayMetrics>> = OnceLock::new();

impl GatewayMetrics {
    fn build() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("gateway_requests_total", "Total number of gateway requests"),
            &["method", "endpoint", "outcome"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "gateway_request_duration_seconds",
                "Gateway request duration in seconds",
            ),
            &["method", "endpoint"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
        })
    }
}

/// Registered on first use. Registration failure disables metrics rather
/// than the gateway.
fn metrics() -> Option<&'static GatewayMetrics> {
    METRICS
        .get_or_init(|| match GatewayMetrics::build() {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                tracing::error!(error = %e, "Failed to register gateway metrics");
                None
            }
        })
        .as_ref()
}

/// `endpoint` should be the path template, not the resolved path, to keep
/// label cardinality bounded.
pub fn record_request(method: &str, endpoint: &str, outcome: &str, elapsed: Duration) {
    if let Some(m) = metrics() {
        m.requests_total
            .with_label_values(&[method, endpoint, outcome])
            .inc();
        m.request_duration
            .with_label_values(&[method, endpoint])
            .observe(elapsed.as_secs_f64());
    }
}

/// Text exposition of every gateway metric.
pub fn gather_metrics() -> String {
    let m = match metrics() {
        Some(m) => m,
        None => return String::new(),
    };

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&m.registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
