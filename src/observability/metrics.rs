use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub suggestions_total: IntCounterVec,
    pub suggestion_latency_seconds: HistogramVec,
    pub commits_total: IntCounterVec,
    pub orders_committed_total: IntCounter,
    pub invalid_location_orders_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let suggestions_total = IntCounterVec::new(
            Opts::new("suggestions_total", "Grouping suggestions by outcome"),
            &["outcome"],
        )
        .expect("valid suggestions_total metric");

        let suggestion_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "suggestion_latency_seconds",
                "Latency of grouping suggestion requests in seconds",
            ),
            &["outcome"],
        )
        .expect("valid suggestion_latency_seconds metric");

        let commits_total = IntCounterVec::new(
            Opts::new("commits_total", "Driver assignment commits by outcome"),
            &["outcome"],
        )
        .expect("valid commits_total metric");

        let orders_committed_total = IntCounter::new(
            "orders_committed_total",
            "Total orders assigned to a driver",
        )
        .expect("valid orders_committed_total metric");

        let invalid_location_orders_total = IntCounter::new(
            "invalid_location_orders_total",
            "Candidate orders excluded for malformed locations",
        )
        .expect("valid invalid_location_orders_total metric");

        registry
            .register(Box::new(suggestions_total.clone()))
            .expect("register suggestions_total");
        registry
            .register(Box::new(suggestion_latency_seconds.clone()))
            .expect("register suggestion_latency_seconds");
        registry
            .register(Box::new(commits_total.clone()))
            .expect("register commits_total");
        registry
            .register(Box::new(orders_committed_total.clone()))
            .expect("register orders_committed_total");
        registry
            .register(Box::new(invalid_location_orders_total.clone()))
            .expect("register invalid_location_orders_total");

        Self {
            registry,
            suggestions_total,
            suggestion_latency_seconds,
            commits_total,
            orders_committed_total,
            invalid_location_orders_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
