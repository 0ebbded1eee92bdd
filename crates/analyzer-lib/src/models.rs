//! Core data models for the risk analyzer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bankruptcy probability above this is HIGH risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Bankruptcy probability above this (and at or below HIGH) is MEDIUM risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// The three ordinal values a qualitative rating may take
pub const RATING_SCALE: [f64; 3] = [0.0, 0.5, 1.0];

/// Six qualitative risk ratings for one company, each on the
/// three-point scale {0.0, 0.5, 1.0}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawAssessment {
    pub industrial_risk: f64,
    pub management_risk: f64,
    pub financial_flexibility: f64,
    pub credibility: f64,
    pub competitiveness: f64,
    pub operating_risk: f64,
}

impl RawAssessment {
    /// All six ratings with their canonical field names
    pub fn ratings(&self) -> [(&'static str, f64); 6] {
        [
            ("industrial_risk", self.industrial_risk),
            ("management_risk", self.management_risk),
            ("financial_flexibility", self.financial_flexibility),
            ("credibility", self.credibility),
            ("competitiveness", self.competitiveness),
            ("operating_risk", self.operating_risk),
        ]
    }

    /// Names of fields whose value is not on the rating scale
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.ratings()
            .iter()
            .filter(|(_, value)| !RATING_SCALE.contains(value))
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Engineered feature set: the six raw ratings plus eleven derived indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    pub industrial_risk: f64,
    pub management_risk: f64,
    pub financial_flexibility: f64,
    pub credibility: f64,
    pub competitiveness: f64,
    pub operating_risk: f64,
    pub financial_health_score: f64,
    pub management_impact_score: f64,
    pub risk_stability_ratio: f64,
    pub risk_volatility: f64,
    pub financial_stability: f64,
    pub risk_financial_ratio: f64,
    pub management_financial_risk: f64,
    pub operational_sustainability: f64,
    pub compound_risk: f64,
    pub financial_x_management: f64,
    pub risk_x_operational: f64,
}

impl EngineeredFeatures {
    /// Natural column order, used when a model carries no feature list
    pub const FEATURE_NAMES: [&'static str; 17] = [
        "industrial_risk",
        "management_risk",
        "financial_flexibility",
        "credibility",
        "competitiveness",
        "operating_risk",
        "financial_health_score",
        "management_impact_score",
        "risk_stability_ratio",
        "risk_volatility",
        "financial_stability",
        "risk_financial_ratio",
        "management_financial_risk",
        "operational_sustainability",
        "compound_risk",
        "financial_x_management",
        "risk_x_operational",
    ];

    /// Look up a feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "industrial_risk" => self.industrial_risk,
            "management_risk" => self.management_risk,
            "financial_flexibility" => self.financial_flexibility,
            "credibility" => self.credibility,
            "competitiveness" => self.competitiveness,
            "operating_risk" => self.operating_risk,
            "financial_health_score" => self.financial_health_score,
            "management_impact_score" => self.management_impact_score,
            "risk_stability_ratio" => self.risk_stability_ratio,
            "risk_volatility" => self.risk_volatility,
            "financial_stability" => self.financial_stability,
            "risk_financial_ratio" => self.risk_financial_ratio,
            "management_financial_risk" => self.management_financial_risk,
            "operational_sustainability" => self.operational_sustainability,
            "compound_risk" => self.compound_risk,
            "financial_x_management" => self.financial_x_management,
            "risk_x_operational" => self.risk_x_operational,
            _ => return None,
        };
        Some(value)
    }

    /// All feature values in natural column order
    pub fn values(&self) -> Vec<f64> {
        Self::FEATURE_NAMES
            .iter()
            .map(|name| self.get(name).unwrap_or(0.0))
            .collect()
    }
}

/// Identity of a loaded prediction model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelIdentity {
    Ensemble,
    BestSingle,
}

impl ModelIdentity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelIdentity::Ensemble => "ensemble",
            ModelIdentity::BestSingle => "best_single",
        }
    }
}

impl fmt::Display for ModelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted class; index 0 of the probability vector is the bankruptcy class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassLabel {
    Bankruptcy,
    NonBankruptcy,
}

impl ClassLabel {
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            ClassLabel::Bankruptcy
        } else {
            ClassLabel::NonBankruptcy
        }
    }
}

/// Coarse bucketing of bankruptcy probability for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    /// Pure threshold classification: HIGH iff p > 0.7, MEDIUM iff
    /// 0.4 < p <= 0.7, LOW otherwise
    pub fn from_probability(bankruptcy_prob: f64) -> Self {
        if bankruptcy_prob > HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if bankruptcy_prob > MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::High => "HIGH",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Low => "LOW",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bankruptcy-risk prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub label: ClassLabel,
    pub bankruptcy_probability: f64,
    pub non_bankruptcy_probability: f64,
    pub risk_tier: RiskTier,
    /// Probability of the winning class
    pub confidence: f64,
    pub model: ModelIdentity,
    pub model_display_name: String,
    /// True when the feature scaler was unavailable and the vector went
    /// to the model unscaled
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub generated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tier_thresholds() {
        assert_eq!(RiskTier::from_probability(0.71), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.7), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.41), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.4), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
    }

    #[test]
    fn test_invalid_fields_detection() {
        let assessment = RawAssessment {
            industrial_risk: 0.5,
            management_risk: 0.3,
            financial_flexibility: 1.0,
            credibility: 0.0,
            competitiveness: 0.7,
            operating_risk: 0.5,
        };
        let invalid = assessment.invalid_fields();
        assert_eq!(invalid, vec!["management_risk", "competitiveness"]);
    }

    #[test]
    fn test_valid_assessment_has_no_invalid_fields() {
        let assessment = RawAssessment {
            industrial_risk: 0.0,
            management_risk: 0.5,
            financial_flexibility: 1.0,
            credibility: 0.5,
            competitiveness: 0.0,
            operating_risk: 1.0,
        };
        assert!(assessment.invalid_fields().is_empty());
    }

    #[test]
    fn test_feature_names_cover_all_fields() {
        let features = EngineeredFeatures {
            industrial_risk: 1.0,
            management_risk: 2.0,
            financial_flexibility: 3.0,
            credibility: 4.0,
            competitiveness: 5.0,
            operating_risk: 6.0,
            financial_health_score: 7.0,
            management_impact_score: 8.0,
            risk_stability_ratio: 9.0,
            risk_volatility: 10.0,
            financial_stability: 11.0,
            risk_financial_ratio: 12.0,
            management_financial_risk: 13.0,
            operational_sustainability: 14.0,
            compound_risk: 15.0,
            financial_x_management: 16.0,
            risk_x_operational: 17.0,
        };
        let values = features.values();
        assert_eq!(values.len(), 17);
        // Natural order matches declaration order
        assert_eq!(values[0], 1.0);
        assert_eq!(values[16], 17.0);
        assert_eq!(features.get("compound_risk"), Some(15.0));
        assert_eq!(features.get("no_such_feature"), None);
    }

    #[test]
    fn test_model_identity_serde_tags() {
        assert_eq!(
            serde_json::to_string(&ModelIdentity::BestSingle).unwrap(),
            "\"best_single\""
        );
        assert_eq!(
            serde_json::to_string(&RiskTier::High).unwrap(),
            "\"HIGH\""
        );
        assert_eq!(
            serde_json::to_string(&ClassLabel::Bankruptcy).unwrap(),
            "\"bankruptcy\""
        );
    }
}
