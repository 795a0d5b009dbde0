use std::fmt::Write as _;

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use crate::fetch::{FetchError, PageSource};
use crate::mode::ScrapeMode;
use crate::scrape::{scrape, ScrapeReport};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("PPO scraper failed: {0}")]
    Ppo(#[source] FetchError),
    #[error("Internship scraper failed: {0}")]
    Internship(#[source] FetchError),
}

/// Selected-only headline numbers across both scrapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_ppos: usize,
    pub total_internships: usize,
    pub grand_total: usize,
}

/// PPO and internship results from one combined run.
#[derive(Debug, Clone)]
pub struct CombinedRun {
    pub ppos: ScrapeReport,
    pub internships: ScrapeReport,
    pub completed_at: DateTime<Local>,
}

impl CombinedRun {
    pub fn summary(&self) -> Summary {
        let total_ppos = self.ppos.totals.selected;
        let total_internships = self.internships.totals.selected;
        Summary {
            total_ppos,
            total_internships,
            grand_total: total_ppos + total_internships,
        }
    }

    /// Body returned right after a run.
    pub fn to_json(&self) -> Value {
        json!({
            "success": true,
            "ppos": report_json(&self.ppos),
            "internships": report_json(&self.internships),
            "timestamp": self.completed_at.to_rfc3339(),
            "summary": self.summary(),
        })
    }

    /// Body for reading back the stored run.
    pub fn to_stored_json(&self) -> Value {
        json!({
            "success": true,
            "ppos": report_json(&self.ppos),
            "internships": report_json(&self.internships),
            "summary": self.summary(),
            "last_updated": self.completed_at.to_rfc3339(),
        })
    }
}

/// PPOs first, then internship offers. Either failing discards both.
pub fn run_combined(source: &dyn PageSource, settings: &Settings) -> Result<CombinedRun, RunError> {
    let ppos = scrape(source, settings, ScrapeMode::Ppos).map_err(RunError::Ppo)?;
    let internships =
        scrape(source, settings, ScrapeMode::Offers).map_err(RunError::Internship)?;

    let run = CombinedRun {
        ppos,
        internships,
        completed_at: Local::now(),
    };
    info!(summary = ?run.summary(), "Combined run complete");
    Ok(run)
}

pub fn report_json(report: &ScrapeReport) -> Value {
    json!({
        "results": report.companies,
        "totals": report.totals,
        "grand_total": report.totals.total(),
    })
}

/// Operator-facing text, one line per company then the totals.
pub fn render_console(report: &ScrapeReport) -> String {
    let mut out = String::new();
    let totals = &report.totals;

    match report.mode {
        ScrapeMode::Offers => {
            let _ = writeln!(out, "Internship offers by company:");
            for (company, c) in &report.companies {
                let _ = writeln!(
                    out,
                    "- {}: Selected={}, Waitlisted={}, Under Review={}",
                    company, c.selected, c.waitlisted, c.under_review
                );
            }
            let _ = writeln!(
                out,
                "\nTotals: Selected={}, Waitlisted={}, Under Review={}, {}={}",
                totals.selected,
                totals.waitlisted,
                totals.under_review,
                report.mode.totals_label(),
                totals.total()
            );
        }
        ScrapeMode::Ppos => {
            let _ = writeln!(out, "PPO results by company:");
            for (company, c) in &report.companies {
                let _ = writeln!(
                    out,
                    "- {}: {} selected, {} waitlisted, {} under review",
                    company, c.selected, c.waitlisted, c.under_review
                );
            }
            let _ = writeln!(out, "\nTotals:");
            let _ = writeln!(out, "Selected: {}", totals.selected);
            let _ = writeln!(out, "Waitlisted: {}", totals.waitlisted);
            let _ = writeln!(out, "Under review: {}", totals.under_review);
            let _ = writeln!(out, "{}: {}", report.mode.totals_label(), totals.total());
        }
    }

    out
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "Selected PPOs: {}\nSelected internships: {}\nGrand total (selected only): {}",
        summary.total_ppos, summary.total_internships, summary.grand_total
    )
}

// ── Tests ──
