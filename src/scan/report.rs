use serde::Serialize;

use super::severity::{ThreatLevel, Tier, threat_level_of, tier_of};
use super::types::{Finding, ScanResult};

/// A finding paired with its display tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedFinding {
    pub tier: Tier,
    #[serde(flatten)]
    pub finding: Finding,
}

/// Number of findings per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::Critical => self.critical,
            Tier::High => self.high,
            Tier::Medium => self.medium,
            Tier::Low => self.low,
            Tier::Unknown => self.unknown,
        }
    }

    /// Per-tier counts, heaviest tier first
    ///
    /// `Unknown` is left out when nothing landed in it.
    pub fn ranked(&self) -> Vec<(Tier, usize)> {
        let mut tiers: Vec<Tier> = Tier::ALL
            .into_iter()
            .filter(|tier| *tier != Tier::Unknown || self.unknown > 0)
            .collect();
        tiers.sort_by_key(|tier| std::cmp::Reverse(tier.weight()));
        tiers.into_iter().map(|tier| (tier, self.get(tier))).collect()
    }

    fn increment(&mut self, tier: Tier) {
        match tier {
            Tier::Critical => self.critical += 1,
            Tier::High => self.high += 1,
            Tier::Medium => self.medium += 1,
            Tier::Low => self.low += 1,
            Tier::Unknown => self.unknown += 1,
        }
    }
}

/// Display state of a successful scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub threat_level: ThreatLevel,
    pub severity_score: f64,
    pub scan_duration_ms: u64,
    pub counts: TierCounts,
    /// Same order as the service returned them
    pub findings: Vec<ClassifiedFinding>,
}

impl ScanReport {
    pub fn from_result(result: ScanResult) -> Self {
        let mut counts = TierCounts::default();
        let findings = result
            .vulnerabilities
            .into_iter()
            .map(|finding| {
                let tier = tier_of(&finding.severity);
                counts.increment(tier);
                ClassifiedFinding { tier, finding }
            })
            .collect();

        Self {
            threat_level: threat_level_of(result.severity_score),
            severity_score: result.severity_score,
            scan_duration_ms: result.scan_duration_ms,
            counts,
            findings,
        }
    }

    /// No findings at all
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Score exactly as the service sent it; whole numbers print without `.0`
    pub fn score_display(&self) -> String {
        self.severity_score.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(vuln_type: &str, severity: &str) -> Finding {
        Finding {
            vuln_type: vuln_type.to_string(),
            severity: severity.to_string(),
            description: format!("{vuln_type} description"),
            location: "https://example.com".to_string(),
            recommendation: "Fix it".to_string(),
        }
    }

    #[test]
    fn test_clean_report() {
        let report = ScanReport::from_result(ScanResult {
            vulnerabilities: vec![],
            severity_score: 0.0,
            scan_duration_ms: 120,
        });

        assert!(report.is_clean());
        assert_eq!(report.threat_level, ThreatLevel::Secure);
        assert_eq!(report.counts, TierCounts::default());
        assert_eq!(report.score_display(), "0");
    }

    #[test]
    fn test_single_high_finding() {
        let report = ScanReport::from_result(ScanResult {
            vulnerabilities: vec![finding("Missing CSP", "HIGH")],
            severity_score: 35.0,
            scan_duration_ms: 900,
        });

        assert_eq!(report.findings[0].tier, Tier::High);
        assert_eq!(report.threat_level, ThreatLevel::High);
        assert_eq!(report.counts.get(Tier::High), 1);
    }

    #[test]
    fn test_findings_keep_service_order() {
        let report = ScanReport::from_result(ScanResult {
            vulnerabilities: vec![
                finding("a", "Low"),
                finding("b", "Critical"),
                finding("c", "banana"),
                finding("d", "Low"),
            ],
            severity_score: 12.0,
            scan_duration_ms: 1,
        });

        let order: Vec<&str> = report.findings.iter().map(|f| f.finding.vuln_type.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
        assert_eq!(report.counts.low, 2);
        assert_eq!(report.counts.critical, 1);
        assert_eq!(report.counts.unknown, 1);
        assert_eq!(report.threat_level, ThreatLevel::Low);
    }

    #[test]
    fn test_report_json_shape() {
        let report = ScanReport::from_result(ScanResult {
            vulnerabilities: vec![finding("Missing HSTS", "Medium")],
            severity_score: 4.0,
            scan_duration_ms: 10,
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["threat_level"], "LOW");
        assert_eq!(json["findings"][0]["tier"], "medium");
        assert_eq!(json["findings"][0]["vuln_type"], "Missing HSTS");
        assert_eq!(json["counts"]["medium"], 1);
    }

    #[test]
    fn test_fractional_score_display() {
        let report = ScanReport::from_result(ScanResult {
            vulnerabilities: vec![],
            severity_score: 7.25,
            scan_duration_ms: 0,
        });
        assert_eq!(report.score_display(), "7.25");
    }

    #[test]
    fn test_whole_score_display() {
        let report = ScanReport::from_result(ScanResult {
            vulnerabilities: vec![],
            severity_score: 35.0,
            scan_duration_ms: 0,
        });
        assert_eq!(report.score_display(), "35");
    }

    #[test]
    fn test_ranked_counts_follow_weight() {
        let report = ScanReport::from_result(ScanResult {
            vulnerabilities: vec![finding("a", "Low"), finding("b", "Critical"), finding("c", "Low")],
            severity_score: 55.0,
            scan_duration_ms: 1,
        });

        assert_eq!(
            report.counts.ranked(),
            vec![(Tier::Critical, 1), (Tier::High, 0), (Tier::Medium, 0), (Tier::Low, 2)]
        );
    }

    #[test]
    fn test_ranked_counts_include_unknown_when_present() {
        let report = ScanReport::from_result(ScanResult {
            vulnerabilities: vec![finding("a", "informational")],
            severity_score: 1.0,
            scan_duration_ms: 1,
        });

        let ranked = report.counts.ranked();
        assert_eq!(ranked.last(), Some(&(Tier::Unknown, 1)));
        assert_eq!(ranked.len(), 5);
    }
}
