//! Severity classification for findings and aggregate scores

use console::Color;
use serde::Serialize;
use std::fmt;

/// Display tier derived from a finding's severity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Critical,
    High,
    Medium,
    Low,
    /// Any label the service sends that is not one of the four above
    Unknown,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::Critical, Tier::High, Tier::Medium, Tier::Low, Tier::Unknown];

    /// Presentation weight, higher sorts first
    pub fn weight(&self) -> u8 {
        match self {
            Tier::Critical => 4,
            Tier::High => 3,
            Tier::Medium => 2,
            Tier::Low => 1,
            Tier::Unknown => 0,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Tier::Critical => Color::Magenta,
            Tier::High => Color::Red,
            Tier::Medium => Color::Yellow,
            Tier::Low => Color::Blue,
            Tier::Unknown => Color::White,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Critical => "critical",
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
            Tier::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket derived from the aggregate severity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Secure,
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub fn color(&self) -> Color {
        match self {
            ThreatLevel::Critical => Color::Magenta,
            ThreatLevel::High => Color::Red,
            ThreatLevel::Medium => Color::Yellow,
            ThreatLevel::Low => Color::Blue,
            ThreatLevel::Secure => Color::Green,
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThreatLevel::Critical => "CRITICAL",
            ThreatLevel::High => "HIGH",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::Low => "LOW",
            ThreatLevel::Secure => "SECURE",
        };
        f.write_str(label)
    }
}

/// Map a severity label to its tier (case-insensitive, never fails)
pub fn tier_of(label: &str) -> Tier {
    match label.to_lowercase().as_str() {
        "critical" => Tier::Critical,
        "high" => Tier::High,
        "medium" => Tier::Medium,
        "low" => Tier::Low,
        _ => Tier::Unknown,
    }
}

/// Map an aggregate score to a threat level
///
/// Lower bounds are inclusive: 50 is CRITICAL, 30 is HIGH, 15 is MEDIUM.
/// Anything above zero but below 15 is LOW and zero is SECURE. Negative and
/// NaN scores fall through to SECURE so the mapping stays total.
pub fn threat_level_of(score: f64) -> ThreatLevel {
    if score >= 50.0 {
        ThreatLevel::Critical
    } else if score >= 30.0 {
        ThreatLevel::High
    } else if score >= 15.0 {
        ThreatLevel::Medium
    } else if score > 0.0 {
        ThreatLevel::Low
    } else {
        ThreatLevel::Secure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_is_case_insensitive() {
        assert_eq!(tier_of("CRITICAL"), Tier::Critical);
        assert_eq!(tier_of("critical"), Tier::Critical);
        assert_eq!(tier_of("Critical"), Tier::Critical);
        assert_eq!(tier_of("HIGH"), Tier::High);
        assert_eq!(tier_of("Medium"), Tier::Medium);
        assert_eq!(tier_of("low"), Tier::Low);
    }

    #[test]
    fn test_unrecognised_labels_are_unknown() {
        assert_eq!(tier_of(""), Tier::Unknown);
        assert_eq!(tier_of("banana"), Tier::Unknown);
        assert_eq!(tier_of("info"), Tier::Unknown);
        assert_eq!(tier_of(" high"), Tier::Unknown);
        assert_eq!(tier_of("highest"), Tier::Unknown);
    }

    #[test]
    fn test_classifying_preserves_order() {
        let labels = ["low", "CRITICAL", "weird", "Medium", "high"];
        let tiers: Vec<Tier> = labels.iter().map(|l| tier_of(l)).collect();
        assert_eq!(
            tiers,
            vec![Tier::Low, Tier::Critical, Tier::Unknown, Tier::Medium, Tier::High]
        );
    }

    #[test]
    fn test_tier_weights_are_ordered() {
        let weights: Vec<u8> = Tier::ALL.iter().map(Tier::weight).collect();
        assert_eq!(weights, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_threat_level_thresholds() {
        assert_eq!(threat_level_of(0.0), ThreatLevel::Secure);
        assert_eq!(threat_level_of(0.5), ThreatLevel::Low);
        assert_eq!(threat_level_of(1.0), ThreatLevel::Low);
        assert_eq!(threat_level_of(14.0), ThreatLevel::Low);
        assert_eq!(threat_level_of(14.99), ThreatLevel::Low);
        assert_eq!(threat_level_of(15.0), ThreatLevel::Medium);
        assert_eq!(threat_level_of(29.0), ThreatLevel::Medium);
        assert_eq!(threat_level_of(30.0), ThreatLevel::High);
        assert_eq!(threat_level_of(49.0), ThreatLevel::High);
        assert_eq!(threat_level_of(50.0), ThreatLevel::Critical);
        assert_eq!(threat_level_of(1000.0), ThreatLevel::Critical);
    }

    #[test]
    fn test_threat_level_is_total() {
        assert_eq!(threat_level_of(-3.0), ThreatLevel::Secure);
        assert_eq!(threat_level_of(f64::NAN), ThreatLevel::Secure);
        assert_eq!(threat_level_of(f64::INFINITY), ThreatLevel::Critical);
    }

    #[test]
    fn test_threat_levels_order_by_risk() {
        assert!(ThreatLevel::Critical > ThreatLevel::High);
        assert!(ThreatLevel::Low > ThreatLevel::Secure);
        assert_eq!(ThreatLevel::Secure.to_string(), "SECURE");
    }
}
