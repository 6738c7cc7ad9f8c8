//! Bus power balance identities.

/// Residual load left after renewables and storage.
///
/// Sign convention on the bus:
/// - `load_mw` is positive demand
/// - `dispatched_re_mw` is positive generation
/// - `battery_mw` is positive when discharging, negative when charging
///
/// # Returns
///
/// Power the residual generator has to supply (MW). Negative values mean the
/// renewables and storage over-supply the load.
pub fn residual_load_mw(load_mw: f64, dispatched_re_mw: f64, battery_mw: f64) -> f64 {
    load_mw - dispatched_re_mw - battery_mw
}

/// Renewable power that was available but not dispatched (MW).
///
/// Dispatch never exceeds availability in a solved model; solver round-off
/// below zero is clamped.
pub fn curtailed_mw(available_mw: f64, dispatched_mw: f64) -> f64 {
    (available_mw - dispatched_mw).max(0.0)
}

/// Net supply minus load on the bus; zero for a balanced step.
pub fn balance_error_mw(
    dispatched_re_mw: f64,
    residual_mw: f64,
    battery_mw: f64,
    load_mw: f64,
) -> f64 {
    dispatched_re_mw + residual_mw + battery_mw - load_mw
}
