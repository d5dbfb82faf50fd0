//! Throughput formatting for the bandwidth panel.

/// Compact rate: `"845 kbps"`, `"12.4 Mbps"`, `"1.2 Gbps"`.
pub fn fmt_kbps(kbps: f64) -> String {
    if kbps >= 1_000_000.0 {
        format!("{:.1} Gbps", kbps / 1_000_000.0)
    } else if kbps >= 1_000.0 {
        format!("{:.1} Mbps", kbps / 1_000.0)
    } else {
        format!("{kbps:.0} kbps")
    }
}

/// Like [`fmt_kbps`], with a dash for a missing sample.
pub fn fmt_sample(kbps: Option<f64>) -> String {
    kbps.map_or_else(|| "—".into(), fmt_kbps)
}

/// Y-axis upper bound: the peak plus headroom, rounded up to a tidy step.
/// An empty or all-zero window still gets a visible axis.
pub fn axis_ceiling(peak_kbps: f64) -> f64 {
    if peak_kbps <= 0.0 {
        return 10.0;
    }
    let padded = peak_kbps * 1.2;
    let magnitude = 10f64.powf(padded.log10().floor());
    let step = if padded / magnitude <= 2.0 {
        magnitude / 5.0
    } else {
        magnitude / 2.0
    };
    (padded / step).ceil() * step
}
