//! Dashboard indicators derived from a single reading.
//!
//! Trend labels, thermal gauge fill levels, throttling risk and the bus log
//! line are presentation-independent, so both the TUI and the HTTP server
//! use them.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::telemetry::TelemetryReading;

/// VRM temperature above which throttling risk is reported as high (°C).
pub const THROTTLE_RISK_TEMP: f64 = 90.0;

/// Gauge full-scale values (°C).
pub const VRM_GAUGE_MAX: f64 = 110.0;
pub const CPU_GAUGE_MAX: f64 = 100.0;
pub const CHIPSET_GAUGE_MAX: f64 = 90.0;

/// Short trend labels shown next to each headline value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub stability: &'static str,
    pub ripple: &'static str,
    pub vrm: &'static str,
    pub load: &'static str,
}

pub fn trends(r: &TelemetryReading) -> Trends {
    Trends {
        stability: if r.stability_score > 95 {
            "stable"
        } else {
            "variance"
        },
        ripple: if r.vcore_ripple < 20.0 { "low" } else { "high" },
        vrm: if r.vrm_temp < 70.0 { "cool" } else { "warm" },
        load: "active",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThrottleRisk {
    Low,
    High,
}

impl std::fmt::Display for ThrottleRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

pub fn throttle_risk(r: &TelemetryReading) -> ThrottleRisk {
    if r.vrm_temp > THROTTLE_RISK_TEMP {
        ThrottleRisk::High
    } else {
        ThrottleRisk::Low
    }
}

/// One thermal gauge: label, current value and fill percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThermalGauge {
    pub label: &'static str,
    pub celsius: f64,
    pub max: f64,
    /// `celsius / max` as a percentage, capped at 100.
    pub percent: f64,
}

impl ThermalGauge {
    pub fn new(label: &'static str, celsius: f64, max: f64) -> Self {
        Self {
            label,
            celsius,
            max,
            percent: gauge_percent(celsius, max),
        }
    }
}

pub fn gauge_percent(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (value * 100.0 / max).clamp(0.0, 100.0)
}

/// VRM, CPU package and chipset gauges, in display order.
pub fn thermal_gauges(r: &TelemetryReading) -> [ThermalGauge; 3] {
    [
        ThermalGauge::new("VRM Phase Array", r.vrm_temp, VRM_GAUGE_MAX),
        ThermalGauge::new("CPU Package", r.cpu_temp, CPU_GAUGE_MAX),
        ThermalGauge::new("PCH Chipset", r.chipset_temp, CHIPSET_GAUGE_MAX),
    ]
}

/// Whether a bus log line is shown as healthy.
pub fn is_nominal(r: &TelemetryReading) -> bool {
    r.stability_score > 90
}

/// `HH:MM:SS` in local time.
pub fn clock_time(timestamp_ms: u64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64) {
        Some(utc) => utc.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Bus log line body, without the time prefix.
pub fn bus_log_entry(r: &TelemetryReading) -> String {
    format!(
        "BUS_READ: VCORE={}V RIPPLE={}mV TEMP={}C STATUS_OK_{}%",
        r.vcore, r.vcore_ripple, r.vrm_temp, r.stability_score
    )
}

/// Full bus log line: `[HH:MM:SS] BUS_READ: ...`.
pub fn bus_log_line(r: &TelemetryReading) -> String {
    format!("[{}] {}", clock_time(r.timestamp), bus_log_entry(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(score: u8, ripple: f64, vrm: f64) -> TelemetryReading {
        TelemetryReading {
            timestamp: 1_700_000_000_000,
            vcore: 1.218,
            vcore_ripple: ripple,
            dram: 1.352,
            vrm_temp: vrm,
            chipset_temp: 52.5,
            cpu_temp: 60.0,
            stability_score: score,
            clock_speed: 5100.0,
            load: 60,
        }
    }

    #[test]
    fn trend_thresholds() {
        let t = trends(&reading(96, 19.9, 69.9));
        assert_eq!((t.stability, t.ripple, t.vrm), ("stable", "low", "cool"));
        let t = trends(&reading(95, 20.0, 70.0));
        assert_eq!((t.stability, t.ripple, t.vrm), ("variance", "high", "warm"));
        assert_eq!(t.load, "active");
    }

    #[test]
    fn throttle_risk_above_ninety() {
        assert_eq!(throttle_risk(&reading(90, 5.0, 90.0)), ThrottleRisk::Low);
        assert_eq!(throttle_risk(&reading(90, 5.0, 90.1)), ThrottleRisk::High);
        assert_eq!(ThrottleRisk::High.to_string(), "HIGH");
    }

    #[test]
    fn gauges_scale_and_cap() {
        let g = thermal_gauges(&reading(90, 5.0, 55.0));
        assert_eq!(g[0].label, "VRM Phase Array");
        assert_eq!(g[0].percent, 50.0);
        assert_eq!(g[1].percent, 60.0);
        assert!(g[2].percent > 58.0 && g[2].percent < 59.0);
        assert_eq!(gauge_percent(150.0, 100.0), 100.0);
        assert_eq!(gauge_percent(10.0, 0.0), 0.0);
    }

    #[test]
    fn bus_log_format() {
        let entry = bus_log_entry(&reading(97, 6.4, 61.2));
        assert_eq!(
            entry,
            "BUS_READ: VCORE=1.218V RIPPLE=6.4mV TEMP=61.2C STATUS_OK_97%"
        );
        let line = bus_log_line(&reading(97, 6.4, 61.2));
        assert!(line.starts_with('['));
        assert!(line.ends_with(&entry));
        assert_eq!(clock_time(1_700_000_000_000).len(), 8);
    }

    #[test]
    fn nominal_above_ninety() {
        assert!(is_nominal(&reading(91, 1.0, 50.0)));
        assert!(!is_nominal(&reading(90, 1.0, 50.0)));
    }
}
