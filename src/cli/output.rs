//! Terminal output for vulnscan
//!
//! Styled status lines, the progress bar shown while a scan is pending, and
//! the text rendering of a finished scan report.

use console::{Color, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::scan::report::{ClassifiedFinding, ScanReport};
use crate::scan::ThreatLevel;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn category(&self, category: &str) {
        if !self.quiet {
            println!("\n{}", style(category).bold().cyan());
        }
    }

    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            println!("  {} {}", style(key).dim(), styled_value);
        }
    }

    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Bar for the simulated scan progress, 0 to 100
    ///
    /// Hidden in quiet mode; activity lines go through [`ProgressBar::println`]
    /// so they stack above the bar.
    pub fn scan_progress(&self, target: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(100);
        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(bar_style);
        pb.set_message(format!("Scanning {target}"));
        pb
    }

    /// Render a finished scan as text
    pub fn report(&self, report: &ScanReport) {
        if self.quiet {
            // One line that scripts can still grep
            println!("{} {}", report.threat_level, report.score_display());
            return;
        }

        self.header("Scan Results");
        println!(
            "  {} {}",
            style("Threat level:").dim(),
            threat_badge(report.threat_level)
        );
        self.key_value("Severity score:", &report.score_display(), false);
        self.key_value("Scan time:", &format!("{}ms", report.scan_duration_ms), false);
        self.key_value("Findings:", &report.findings.len().to_string(), false);

        self.category("Summary");
        for (tier, count) in report.counts.ranked() {
            println!("  {:<10} {}", style(tier.label()).fg(tier.color()).bold(), count);
        }

        if report.is_clean() {
            self.blank_line();
            self.success("No vulnerabilities found. The target looks secure.");
            return;
        }

        self.category("Findings");
        for (index, finding) in report.findings.iter().enumerate() {
            self.finding(index + 1, finding);
        }
    }

    fn finding(&self, number: usize, classified: &ClassifiedFinding) {
        let finding = &classified.finding;
        let tier = classified.tier;

        println!(
            "\n  {}. {} {}",
            number,
            style(format!("[{}]", tier.label().to_uppercase())).fg(tier.color()).bold(),
            style(&finding.vuln_type).bold()
        );
        println!("     {}", finding.description);
        println!("     {} {}", style("Location:").dim(), style(&finding.location).underlined());
        println!("     {} {}", style("Fix:").dim(), finding.recommendation);
    }
}

fn threat_badge(level: ThreatLevel) -> console::StyledObject<String> {
    let text = format!(" {level} ");
    match level {
        ThreatLevel::Secure => style(text).fg(Color::Black).bg(level.color()).bold(),
        _ => style(text).fg(Color::White).bg(level.color()).bold(),
    }
}
