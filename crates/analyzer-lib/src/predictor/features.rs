//! Feature engineering for bankruptcy inference
//!
//! Expands the six raw qualitative ratings into the full feature set the
//! trained models expect: health and stability composites, interaction
//! terms, and a volatility measure over the three risk ratings.

use crate::models::{EngineeredFeatures, RawAssessment};

/// A risk rating strictly above this counts toward compound risk
pub const COMPOUND_RISK_THRESHOLD: f64 = 0.7;

/// Derive the engineered feature set from one raw assessment.
///
/// Pure and total: every denominator carries a positive additive constant,
/// so the arithmetic is defined for any finite input.
pub fn engineer(raw: &RawAssessment) -> EngineeredFeatures {
    let risk = [raw.industrial_risk, raw.management_risk, raw.operating_risk];
    let fin = [
        raw.financial_flexibility,
        raw.credibility,
        raw.competitiveness,
    ];

    let financial_health_score = mean(&fin);
    let risk_volatility = sample_std_dev(&risk);

    let exceeding = risk
        .iter()
        .filter(|&&r| r > COMPOUND_RISK_THRESHOLD)
        .count();

    EngineeredFeatures {
        industrial_risk: raw.industrial_risk,
        management_risk: raw.management_risk,
        financial_flexibility: raw.financial_flexibility,
        credibility: raw.credibility,
        competitiveness: raw.competitiveness,
        operating_risk: raw.operating_risk,
        financial_health_score,
        management_impact_score: raw.management_risk
            / (raw.financial_flexibility + raw.credibility + 1.0),
        risk_stability_ratio: (raw.financial_flexibility + raw.credibility)
            / (raw.management_risk + 1.0),
        risk_volatility,
        financial_stability: 0.4 * raw.financial_flexibility
            + 0.3 * raw.credibility
            + 0.3 * raw.competitiveness,
        risk_financial_ratio: mean(&risk) / (mean(&fin) + 1.0),
        management_financial_risk: raw.management_risk / (raw.financial_flexibility + 0.1),
        operational_sustainability: ((raw.financial_flexibility + raw.competitiveness) / 2.0)
            * (1.0 - raw.operating_risk),
        compound_risk: exceeding as f64 / risk.len() as f64,
        financial_x_management: financial_health_score * raw.management_risk,
        risk_x_operational: risk_volatility * raw.operating_risk,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation, divisor n-1. The downstream model weights
/// were trained against this convention, not the population one.
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
