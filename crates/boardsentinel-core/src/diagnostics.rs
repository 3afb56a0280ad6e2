//! Diagnostic reports from a window of telemetry.
//!
//! Pipeline: recent window → [`WindowStats`] → prompt → one remote call →
//! [`parse_response`] → per-field defaults. A transport failure or a body
//! that is not JSON yields [`offline_report`] instead; neither ever reaches
//! the caller as an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::remote::{GenerationRequest, TextGenerator};
use crate::telemetry::TelemetryReading;

/// Number of most recent readings summarised per analysis.
pub const RECENT_WINDOW: usize = 10;
/// Readings a host should collect before offering analysis.
pub const MIN_ANALYSIS_READINGS: usize = 5;

pub const DEFAULT_SUMMARY: &str = "Unable to generate summary.";
pub const DEFAULT_RECOMMENDATIONS: [&str; 3] =
    ["Check power connections", "Update BIOS", "Improve airflow"];

pub const OFFLINE_SUMMARY: &str =
    "Local analysis: System appears stable but AI diagnostics are currently offline.";
pub const OFFLINE_RECOMMENDATIONS: [&str; 2] =
    ["Monitor VRM temperatures", "Check for voltage spikes"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Case-insensitive parse; `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Natural-language assessment of a telemetry window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub summary: String,
    /// Never empty.
    pub recommendations: Vec<String>,
    pub risk_level: RiskLevel,
}

/// The canned report returned whenever the remote capability fails.
pub fn offline_report() -> DiagnosticReport {
    DiagnosticReport {
        summary: OFFLINE_SUMMARY.to_string(),
        recommendations: OFFLINE_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
        risk_level: RiskLevel::Low,
    }
}

// ---------------------------------------------------------------------------
// Window statistics
// ---------------------------------------------------------------------------

/// Summary statistics over the recent window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    pub avg_stability: f64,
    pub max_ripple: f64,
    pub max_temp: f64,
    pub latest_load: u8,
    /// Readings the statistics were computed from (≤ [`RECENT_WINDOW`]).
    pub samples: usize,
}

impl WindowStats {
    /// Statistics over the last [`RECENT_WINDOW`] readings of `history`.
    pub fn from_history(history: &[TelemetryReading]) -> Result<Self> {
        let start = history.len().saturating_sub(RECENT_WINDOW);
        let recent = &history[start..];
        let latest = recent.last().ok_or(Error::EmptyHistory)?;

        let total: f64 = recent.iter().map(|r| f64::from(r.stability_score)).sum();
        let max_ripple = recent
            .iter()
            .map(|r| r.vcore_ripple)
            .fold(f64::NEG_INFINITY, f64::max);
        let max_temp = recent
            .iter()
            .map(|r| r.vrm_temp)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            avg_stability: total / recent.len() as f64,
            max_ripple,
            max_temp,
            latest_load: latest.load,
            samples: recent.len(),
        })
    }

    /// Prompt asking for a JSON report about these statistics.
    pub fn prompt(&self) -> String {
        format!(
            "Analyze this motherboard telemetry data for hardware stability:
    Average Stability Score: {avg:.1}%
    Max VCore Ripple: {ripple}mV
    Max VRM Temperature: {temp}°C
    Recent Load: {load}%

    Provide a professional forensic hardware report in JSON format with:
    - summary: A concise technical summary of the board's health.
    - recommendations: 3 specific technical actions to improve stability.
    - riskLevel: \"low\", \"medium\", or \"high\".",
            avg = self.avg_stability,
            ripple = self.max_ripple,
            temp = self.max_temp,
            load = self.latest_load,
        )
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Fields recovered from a response body. Each is `None` when missing,
/// empty, or of the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFields {
    pub summary: Option<String>,
    pub recommendations: Option<Vec<String>>,
    pub risk_level: Option<RiskLevel>,
}

impl ReportFields {
    /// Fill every missing field with its default.
    pub fn into_report(self) -> DiagnosticReport {
        DiagnosticReport {
            summary: self.summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            recommendations: self.recommendations.unwrap_or_else(|| {
                DEFAULT_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
            }),
            risk_level: self.risk_level.unwrap_or_default(),
        }
    }

    fn from_object(object: &serde_json::Map<String, Value>) -> Self {
        let summary = object
            .get("summary")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let recommendations = object
            .get("recommendations")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|items| !items.is_empty());

        let risk_level = object
            .get("riskLevel")
            .and_then(Value::as_str)
            .and_then(RiskLevel::parse);

        Self {
            summary,
            recommendations,
            risk_level,
        }
    }
}

/// Parse a response body.
///
/// An absent or blank body, JSON `null`, and any non-object value all parse
/// to empty fields. Only text that is not JSON at all is an error.
pub fn parse_response(body: Option<&str>) -> Result<ReportFields> {
    let body = match body.map(str::trim) {
        Some(b) if !b.is_empty() => b,
        _ => return Ok(ReportFields::default()),
    };
    let value: Value = serde_json::from_str(body)?;
    Ok(match &value {
        Value::Object(object) => ReportFields::from_object(object),
        _ => ReportFields::default(),
    })
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/// Turns telemetry history into a [`DiagnosticReport`] through a
/// [`TextGenerator`].
///
/// Holds no mutable state; concurrent `analyze` calls are independent.
pub struct DiagnosticReporter {
    generator: Box<dyn TextGenerator>,
    model: String,
}

impl DiagnosticReporter {
    pub fn new(generator: Box<dyn TextGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    /// Analyze the recent window of `history`.
    ///
    /// Makes exactly one remote request. The only error is
    /// [`Error::EmptyHistory`], returned before anything is sent.
    pub async fn analyze(&self, history: &[TelemetryReading]) -> Result<DiagnosticReport> {
        let stats = WindowStats::from_history(history)?;
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: stats.prompt(),
            json_response: true,
        };

        let outcome = match self.generator.generate(&request).await {
            Ok(body) => parse_response(body.as_deref()),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(fields) => Ok(fields.into_report()),
            Err(e) if e.is_remote() => {
                log::warn!("AI analysis via {} failed: {e}", self.generator.name());
                Ok(offline_report())
            }
            Err(e) => {
                log::error!("AI analysis via {} hit a local error: {e}", self.generator.name());
                Ok(offline_report())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(score: u8, ripple: f64, vrm: f64, load: u8) -> TelemetryReading {
        TelemetryReading {
            timestamp: 0,
            vcore: 1.22,
            vcore_ripple: ripple,
            dram: 1.352,
            vrm_temp: vrm,
            chipset_temp: 52.4,
            cpu_temp: 50.0,
            stability_score: score,
            clock_speed: 5000.0,
            load,
        }
    }

    #[test]
    fn stats_average_of_ten() {
        let history: Vec<_> = (90..=99).map(|s| reading(s, 4.0, 60.0, 30)).collect();
        let stats = WindowStats::from_history(&history).unwrap();
        assert_eq!(stats.avg_stability, 94.5);
        assert_eq!(stats.samples, 10);
    }

    #[test]
    fn stats_use_only_last_ten() {
        let mut history: Vec<_> = (0..5).map(|_| reading(0, 40.0, 99.0, 100)).collect();
        history.extend((0..10).map(|i| reading(90, 3.0 + i as f64, 60.0 + i as f64, 20 + i as u8)));
        let stats = WindowStats::from_history(&history).unwrap();
        assert_eq!(stats.avg_stability, 90.0);
        assert_eq!(stats.max_ripple, 12.0);
        assert_eq!(stats.max_temp, 69.0);
        assert_eq!(stats.latest_load, 29);
    }

    #[test]
    fn stats_short_history() {
        let history = [reading(80, 7.5, 70.1, 55), reading(90, 2.5, 66.0, 12)];
        let stats = WindowStats::from_history(&history).unwrap();
        assert_eq!(stats.avg_stability, 85.0);
        assert_eq!(stats.max_ripple, 7.5);
        assert_eq!(stats.max_temp, 70.1);
        assert_eq!(stats.latest_load, 12);
        assert_eq!(stats.samples, 2);
    }

    #[test]
    fn stats_reject_empty() {
        assert!(matches!(
            WindowStats::from_history(&[]),
            Err(Error::EmptyHistory)
        ));
    }

    #[test]
    fn prompt_embeds_values() {
        let history: Vec<_> = (90..=99).map(|s| reading(s, 12.3, 71.4, 64)).collect();
        let prompt = WindowStats::from_history(&history).unwrap().prompt();
        assert!(prompt.contains("Average Stability Score: 94.5%"));
        assert!(prompt.contains("Max VCore Ripple: 12.3mV"));
        assert!(prompt.contains("Max VRM Temperature: 71.4°C"));
        assert!(prompt.contains("Recent Load: 64%"));
        assert!(prompt.contains("riskLevel"));
    }

    #[test]
    fn prompt_prints_whole_numbers_without_fraction() {
        let prompt = WindowStats::from_history(&[reading(95, 25.0, 80.0, 90)])
            .unwrap()
            .prompt();
        assert!(prompt.contains("Max VCore Ripple: 25mV"));
        assert!(prompt.contains("Average Stability Score: 95.0%"));
    }

    #[test]
    fn parse_empty_object_defaults_everything() {
        let report = parse_response(Some("{}")).unwrap().into_report();
        assert_eq!(report.summary, DEFAULT_SUMMARY);
        assert_eq!(
            report.recommendations,
            ["Check power connections", "Update BIOS", "Improve airflow"]
        );
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn parse_absent_or_blank_body() {
        assert_eq!(parse_response(None).unwrap(), ReportFields::default());
        assert_eq!(parse_response(Some("   ")).unwrap(), ReportFields::default());
    }

    #[test]
    fn parse_non_object_json_is_empty() {
        for body in ["null", "[]", "42", "\"text\""] {
            assert_eq!(parse_response(Some(body)).unwrap(), ReportFields::default());
        }
    }

    #[test]
    fn parse_invalid_json_errors() {
        assert!(matches!(
            parse_response(Some("The board looks fine.")),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn parse_full_response() {
        let body = r#"{"summary":"X","recommendations":["a","b","c"],"riskLevel":"high"}"#;
        let report = parse_response(Some(body)).unwrap().into_report();
        assert_eq!(
            report,
            DiagnosticReport {
                summary: "X".into(),
                recommendations: vec!["a".into(), "b".into(), "c".into()],
                risk_level: RiskLevel::High,
            }
        );
    }

    #[test]
    fn parse_partial_response() {
        let body = r#"{"summary":"VRM running warm","riskLevel":"medium"}"#;
        let report = parse_response(Some(body)).unwrap().into_report();
        assert_eq!(report.summary, "VRM running warm");
        assert_eq!(report.recommendations.len(), 3);
        assert_eq!(report.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn falsy_fields_take_defaults() {
        let body = r#"{"summary":"","recommendations":[],"riskLevel":""}"#;
        assert_eq!(parse_response(Some(body)).unwrap(), ReportFields::default());
    }

    #[test]
    fn whitespace_strings_pass_through_untrimmed() {
        let body = r#"{"summary":" ","recommendations":[" a ", "", 3, "b"]}"#;
        let fields = parse_response(Some(body)).unwrap();
        assert_eq!(fields.summary.as_deref(), Some(" "));
        assert_eq!(
            fields.recommendations,
            Some(vec![" a ".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn wrong_typed_fields_take_defaults() {
        let body = r#"{"summary":7,"recommendations":"reseat cpu","riskLevel":"catastrophic"}"#;
        assert_eq!(parse_response(Some(body)).unwrap(), ReportFields::default());
    }

    #[test]
    fn risk_level_parse_is_case_insensitive() {
        assert_eq!(RiskLevel::parse("HIGH"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse(" Medium "), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::parse("severe"), None);
    }

    #[test]
    fn offline_report_contents() {
        let report = offline_report();
        assert_eq!(report.summary, OFFLINE_SUMMARY);
        assert_eq!(
            report.recommendations,
            ["Monitor VRM temperatures", "Check for voltage spikes"]
        );
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn report_serializes_camel_case() {
        let json = serde_json::to_value(offline_report()).unwrap();
        assert_eq!(json["riskLevel"], "low");
        assert_eq!(json["recommendations"].as_array().unwrap().len(), 2);
    }
}
