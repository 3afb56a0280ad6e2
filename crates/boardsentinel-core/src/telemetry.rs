//! Synthetic VRM telemetry and stability scoring.
//!
//! Each reading is derived from a freshly sampled load percentage. Voltage
//! droops linearly with load, ripple jumps once load crosses 80%, and the
//! temperatures rise linearly with load plus a little noise. The stability
//! score is a pure function of the stored ripple and VRM temperature.
//!
//! All randomness comes from an injected [`rand::Rng`], so a seeded
//! [`StdRng`] reproduces a sequence exactly (timestamps aside).

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Nominal core voltage at zero load (V).
pub const BASE_VCORE: f64 = 1.25;
/// Load-line droop per percent of load (V).
pub const VDROOP_PER_LOAD: f64 = 0.0005;
/// Load percentage above which ripple gets the heavy-load offset.
pub const HEAVY_LOAD_THRESHOLD: f64 = 80.0;
/// Extra ripple under heavy load (mV).
pub const HEAVY_LOAD_RIPPLE_MV: f64 = 10.0;
/// VRM temperature above which the thermal penalty applies (°C).
pub const VRM_THERMAL_LIMIT: f64 = 85.0;
/// Core clock at zero load (MHz).
pub const BASE_CLOCK_MHZ: f64 = 4800.0;
/// Clock gained per percent of load (MHz).
pub const CLOCK_MHZ_PER_LOAD: f64 = 5.0;

/// One synthetic sample of the board's sensors.
///
/// Serialized with the camelCase field names used on the wire
/// (`vcoreRipple`, `vrmTemp`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryReading {
    /// Wall-clock time of the sample, milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Core voltage (V), 3 decimal places.
    pub vcore: f64,
    /// Ripple on the core rail (mV), 1 decimal place, never negative.
    pub vcore_ripple: f64,
    /// DRAM voltage (V).
    pub dram: f64,
    /// VRM phase array temperature (°C), 1 decimal place.
    pub vrm_temp: f64,
    /// Chipset (PCH) temperature (°C).
    pub chipset_temp: f64,
    /// CPU package temperature (°C), 1 decimal place.
    pub cpu_temp: f64,
    /// Composite health metric in `0..=100`, see [`stability_score`].
    pub stability_score: u8,
    /// Core clock (MHz).
    pub clock_speed: f64,
    /// System load percentage in `0..=100`.
    pub load: u8,
}

/// Generate the next reading.
///
/// `previous` is accepted so hosts can pass the latest reading, but load is
/// resampled on every call: there is no smoothing between ticks.
pub fn generate_reading<R: Rng + ?Sized>(
    rng: &mut R,
    _previous: Option<&TelemetryReading>,
) -> TelemetryReading {
    let timestamp = now_millis();
    let load = rng.random::<f64>() * 100.0;
    reading_for_load(rng, load, timestamp)
}

/// Derive a reading for an explicit load percentage.
///
/// Draws the remaining noise terms from `rng` in a fixed order: vcore jitter,
/// ripple, VRM temperature, CPU temperature, DRAM voltage, chipset
/// temperature. `load` is clamped to `[0, 100]`.
pub fn reading_for_load<R: Rng + ?Sized>(
    rng: &mut R,
    load: f64,
    timestamp: u64,
) -> TelemetryReading {
    let load = load.clamp(0.0, 100.0);

    let vcore = BASE_VCORE - load * VDROOP_PER_LOAD + (rng.random::<f64>() * 0.01 - 0.005);
    let heavy = if load > HEAVY_LOAD_THRESHOLD {
        HEAVY_LOAD_RIPPLE_MV
    } else {
        0.0
    };
    let vcore_ripple = round_to(rng.random::<f64>() * 15.0 + heavy, 1);

    let vrm_temp = round_to(45.0 + load * 0.35 + rng.random::<f64>() * 2.0, 1);
    let cpu_temp = round_to(35.0 + load * 0.45 + rng.random::<f64>() * 3.0, 1);

    let dram = 1.35 + rng.random::<f64>() * 0.005;
    let chipset_temp = 52.0 + rng.random::<f64>();

    TelemetryReading {
        timestamp,
        vcore: round_to(vcore, 3),
        vcore_ripple,
        dram,
        vrm_temp,
        chipset_temp,
        cpu_temp,
        stability_score: stability_score(vcore_ripple, vrm_temp),
        clock_speed: BASE_CLOCK_MHZ + load * CLOCK_MHZ_PER_LOAD,
        load: load.round() as u8,
    }
}

/// Stability score from ripple (mV) and VRM temperature (°C).
///
/// `100 - ripple/2`, minus `2 * (vrm_temp - 85)` once the VRM runs above
/// 85°C, rounded and clamped to `0..=100`.
pub fn stability_score(vcore_ripple: f64, vrm_temp: f64) -> u8 {
    let thermal_penalty = if vrm_temp > VRM_THERMAL_LIMIT {
        (vrm_temp - VRM_THERMAL_LIMIT) * 2.0
    } else {
        0.0
    };
    let raw = 100.0 - vcore_ripple / 2.0 - thermal_penalty;
    raw.max(0.0).round().min(100.0) as u8
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ---------------------------------------------------------------------------
// TelemetryGenerator
// ---------------------------------------------------------------------------

/// Owns a random source and produces readings on demand.
///
/// Holds no other state, so one generator per thread is all a host needs.
#[derive(Debug, Clone)]
pub struct TelemetryGenerator<R = StdRng> {
    rng: R,
}

impl TelemetryGenerator<StdRng> {
    /// Generator seeded from OS entropy.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is given, OS entropy otherwise.
    pub fn with_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_os_rng(),
        }
    }
}

impl<R: Rng> TelemetryGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// See [`generate_reading`].
    pub fn next_reading(&mut self, previous: Option<&TelemetryReading>) -> TelemetryReading {
        generate_reading(&mut self.rng, previous)
    }

    /// See [`reading_for_load`].
    pub fn reading_at(&mut self, load: f64, timestamp: u64) -> TelemetryReading {
        reading_for_load(&mut self.rng, load, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(seed: u64, n: usize) -> Vec<TelemetryReading> {
        let mut generator = TelemetryGenerator::seeded(seed);
        let mut out: Vec<TelemetryReading> = Vec::with_capacity(n);
        for _ in 0..n {
            let r = generator.next_reading(out.last());
            out.push(r);
        }
        out
    }

    #[test]
    fn stability_score_always_in_range() {
        for r in readings(7, 2000) {
            assert!(r.stability_score <= 100, "score {} out of range", r.stability_score);
        }
    }

    #[test]
    fn ripple_non_negative_and_raised_under_heavy_load() {
        for r in readings(11, 2000) {
            assert!(r.vcore_ripple >= 0.0);
            if r.load > 80 {
                assert!(
                    r.vcore_ripple >= 10.0,
                    "load {} produced ripple {}",
                    r.load,
                    r.vcore_ripple
                );
            }
        }
    }

    #[test]
    fn score_tracks_ripple_below_thermal_limit() {
        for r in readings(13, 2000) {
            if r.vrm_temp <= VRM_THERMAL_LIMIT {
                let expected = (100.0 - r.vcore_ripple / 2.0).max(0.0).round() as u8;
                assert_eq!(r.stability_score, expected);
            }
        }
    }

    #[test]
    fn score_is_function_of_stored_fields() {
        for r in readings(17, 500) {
            assert_eq!(r.stability_score, stability_score(r.vcore_ripple, r.vrm_temp));
        }
    }

    #[test]
    fn thermal_penalty_above_85() {
        // 100 - 5/2 - (95 - 85) * 2 = 77.5 -> 78
        assert_eq!(stability_score(5.0, 95.0), 78);
        // no penalty at exactly 85
        assert_eq!(stability_score(5.0, 85.0), 98);
    }

    #[test]
    fn score_clamped_at_zero() {
        assert_eq!(stability_score(250.0, 40.0), 0);
        assert_eq!(stability_score(10.0, 200.0), 0);
    }

    #[test]
    fn score_perfect_with_no_ripple() {
        assert_eq!(stability_score(0.0, 50.0), 100);
    }

    #[test]
    fn forced_full_load() {
        let mut generator = TelemetryGenerator::seeded(3);
        for _ in 0..200 {
            let r = generator.reading_at(100.0, 0);
            assert_eq!(r.clock_speed, 5300.0);
            assert_eq!(r.load, 100);
            assert!((r.vcore - 1.20).abs() <= 0.0051, "vcore {}", r.vcore);
            assert!(r.vcore_ripple >= 10.0);
        }
    }

    #[test]
    fn forced_load_is_clamped() {
        let mut generator = TelemetryGenerator::seeded(3);
        let r = generator.reading_at(250.0, 0);
        assert_eq!(r.load, 100);
        assert_eq!(r.clock_speed, 5300.0);
        let r = generator.reading_at(-5.0, 0);
        assert_eq!(r.load, 0);
        assert_eq!(r.clock_speed, 4800.0);
    }

    #[test]
    fn field_ranges() {
        for r in readings(19, 1000) {
            assert!(r.load <= 100);
            assert!((1.195..=1.255).contains(&r.vcore), "vcore {}", r.vcore);
            assert!((1.35..1.355).contains(&r.dram));
            assert!((52.0..53.0).contains(&r.chipset_temp));
            assert!((45.0..=82.0).contains(&r.vrm_temp), "vrm {}", r.vrm_temp);
            assert!((35.0..=83.0).contains(&r.cpu_temp), "cpu {}", r.cpu_temp);
            assert!((4800.0..5300.0).contains(&r.clock_speed));
            assert!(r.vcore_ripple <= 25.0);
        }
    }

    #[test]
    fn rounding_precision() {
        for r in readings(23, 200) {
            assert_eq!(r.vcore, round_to(r.vcore, 3));
            assert_eq!(r.vcore_ripple, round_to(r.vcore_ripple, 1));
            assert_eq!(r.vrm_temp, round_to(r.vrm_temp, 1));
            assert_eq!(r.cpu_temp, round_to(r.cpu_temp, 1));
        }
    }

    #[test]
    fn seeded_generators_agree() {
        let mut a = TelemetryGenerator::seeded(42);
        let mut b = TelemetryGenerator::seeded(42);
        for _ in 0..50 {
            let ra = a.next_reading(None);
            let rb = b.next_reading(None);
            assert_eq!(ra.vcore, rb.vcore);
            assert_eq!(ra.vcore_ripple, rb.vcore_ripple);
            assert_eq!(ra.load, rb.load);
            assert_eq!(ra.stability_score, rb.stability_score);
        }
    }

    #[test]
    fn previous_reading_does_not_smooth_load() {
        let mut a = TelemetryGenerator::seeded(5);
        let mut b = TelemetryGenerator::seeded(5);
        let anchor = b.reading_at(99.0, 0);
        let _ = a.reading_at(99.0, 0);
        let ra = a.next_reading(None);
        let rb = b.next_reading(Some(&anchor));
        assert_eq!(ra.load, rb.load);
        assert_eq!(ra.vrm_temp, rb.vrm_temp);
    }

    #[test]
    fn timestamp_is_wall_clock() {
        let before = now_millis();
        let r = TelemetryGenerator::seeded(1).next_reading(None);
        assert!(r.timestamp >= before);
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(12.25, 1), 12.3);
        assert_eq!(round_to(7.0, 1), 7.0);
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let r = TelemetryGenerator::seeded(1).reading_at(50.0, 1_700_000_000_000);
        let json = serde_json::to_value(r).unwrap();
        for key in [
            "timestamp",
            "vcore",
            "vcoreRipple",
            "dram",
            "vrmTemp",
            "chipsetTemp",
            "cpuTemp",
            "stabilityScore",
            "clockSpeed",
            "load",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["timestamp"], 1_700_000_000_000u64);
    }
}
