//! Structured risk assessment returned by the assessment service.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall severity assigned to a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Badge colour classes for the result header.
    pub fn badge_class(self) -> &'static str {
        match self {
            RiskLevel::Low => "bg-emerald-500/20 text-emerald-400 border-emerald-500/50",
            RiskLevel::Medium => "bg-yellow-500/20 text-yellow-400 border-yellow-500/50",
            RiskLevel::High => "bg-orange-500/20 text-orange-400 border-orange-500/50",
            RiskLevel::Critical => "bg-red-500/20 text-red-400 border-red-500/50",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub action: String,
}

/// Risk assessment for one submitted scenario.
///
/// Only ever built by [`decode_analysis`], so every field is present and the
/// risk level is one of the four known values. Threats and recommendations
/// keep the order the service returned them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioAnalysis {
    pub risk_level: RiskLevel,
    pub summary: String,
    pub threats: Vec<Threat>,
    pub recommendations: Vec<Recommendation>,
}

/// Decode the service's text payload into a [`ScenarioAnalysis`].
///
/// The payload is untrusted: it must be a JSON object carrying all four
/// fields with the expected types. Nothing is defaulted.
pub fn decode_analysis(text: &str) -> Result<ScenarioAnalysis> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("assessment payload is empty"));
    }
    serde_json::from_str(trimmed).context("assessment payload does not match the response schema")
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "riskLevel": "HIGH",
        "summary": "客戶姓名屬於個人資料。",
        "threats": [
            {"title": "A", "description": "B"},
            {"title": "A2", "description": "B2"}
        ],
        "recommendations": [{"title": "C", "action": "D"}]
    }"#;

    #[test]
    fn decodes_schema_conforming_payload_verbatim() {
        let analysis = decode_analysis(VALID).unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::High);
        assert_eq!(analysis.summary, "客戶姓名屬於個人資料。");
        assert_eq!(
            analysis.threats,
            vec![
                Threat { title: "A".into(), description: "B".into() },
                Threat { title: "A2".into(), description: "B2".into() },
            ]
        );
        assert_eq!(
            analysis.recommendations,
            vec![Recommendation { title: "C".into(), action: "D".into() }]
        );
    }

    #[test]
    fn rejects_risk_level_outside_enumeration() {
        let payload = VALID.replace("\"HIGH\"", "\"SEVERE\"");
        assert!(decode_analysis(&payload).is_err());

        let lowercase = VALID.replace("\"HIGH\"", "\"high\"");
        assert!(decode_analysis(&lowercase).is_err());
    }

    #[test]
    fn rejects_missing_required_fields() {
        for field in ["riskLevel", "summary", "threats", "recommendations"] {
            let mut value: serde_json::Value = serde_json::from_str(VALID).unwrap();
            value.as_object_mut().unwrap().remove(field);
            let payload = value.to_string();
            assert!(decode_analysis(&payload).is_err(), "accepted payload without {field}");
        }
    }

    #[test]
    fn rejects_incomplete_list_items() {
        let payload = r#"{"riskLevel":"LOW","summary":"s","threats":[{"title":"t"}],"recommendations":[]}"#;
        assert!(decode_analysis(payload).is_err());
    }

    #[test]
    fn rejects_empty_and_non_json_payloads() {
        assert!(decode_analysis("").is_err());
        assert!(decode_analysis("   \n").is_err());
        assert!(decode_analysis("Sorry, I cannot help with that.").is_err());
    }

    #[test]
    fn risk_level_round_trips_wire_names() {
        for level in RiskLevel::ALL {
            let encoded = serde_json::to_string(&level).unwrap();
            assert_eq!(encoded, format!("\"{}\"", level.as_str()));
        }
    }
}
