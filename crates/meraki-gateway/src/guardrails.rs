//! Load guardrails for risky pagination and time-window arguments.
//!
//! Over-fetching is the risk being mitigated, not an illegal request, so an
//! out-of-range value is silently bounded rather than rejected. Clamping is
//! a pure function of (argument map, settings): idempotent, and arguments it
//! does not recognize pass through untouched.

use serde_json::{Map, Value};

use meraki_types::Settings;

/// Per-page size argument name (Meraki pagination).
pub const PER_PAGE_PARAM: &str = "perPage";

/// Time-window-in-seconds argument name.
pub const TIMESPAN_PARAM: &str = "timespan";

/// Return `args` with `perPage` and `timespan` bounded by the configured
/// maxima.
pub fn clamp_arguments(args: &Map<String, Value>, settings: &Settings) -> Map<String, Value> {
    let mut out = args.clone();
    clamp_entry(&mut out, PER_PAGE_PARAM, settings.max_per_page);
    clamp_entry(&mut out, TIMESPAN_PARAM, settings.max_timespan);
    out
}

fn clamp_entry(args: &mut Map<String, Value>, name: &str, max: u64) {
    let Some(value) = args.get(name) else {
        return;
    };
    if let Some(clamped) = clamp_value(value, max) {
        tracing::debug!(param = name, max, "clamping argument to guardrail maximum");
        args.insert(name.to_string(), clamped);
    }
}

/// `Some(bounded)` when the value is a number above `max`, else `None`.
fn clamp_value(value: &Value, max: u64) -> Option<Value> {
    if let Some(n) = value.as_u64() {
        return (n > max).then(|| Value::from(max));
    }
    if let Some(f) = value.as_f64() {
        return (f > max as f64).then(|| Value::from(max));
    }
    None
}
