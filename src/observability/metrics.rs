//! Metrics collection.
//!
//! # Metrics
//! - `preset_router_navigations_total` (counter): navigations by outcome
//! - `preset_router_page_loads_total` (counter): page module loads by result
//! - `preset_router_filter_runs_total` (counter): permission filter runs
//! - `preset_router_authorized_routes` (gauge): nodes in the published tree

/// Record one permission filter run and the size of its result.
pub fn record_filter_run(authorized_nodes: usize) {
    ::metrics::counter!("preset_router_filter_runs_total").increment(1);
    ::metrics::gauge!("preset_router_authorized_routes").set(authorized_nodes as f64);
}

/// Record a page module load; `result` is "ok" or "error".
pub fn record_page_load(result: &'static str) {
    ::metrics::counter!("preset_router_page_loads_total", "result" => result).increment(1);
}

/// Record a finished navigation by outcome (rendered, placeholder, redirect,
/// not_found, failure). An outlet result that was superseded is also recorded
/// as "stale".
pub fn record_navigation(outcome: &'static str) {
    ::metrics::counter!("preset_router_navigations_total", "outcome" => outcome).increment(1);
}
