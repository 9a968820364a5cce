//! Rendering of verification results as grouped text or JSON.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use serde::Serialize;

use crate::verify::{Status, VerificationResult};

const BANNER: &str = "============================================================";

/// One entry of the JSON report. Field order is the report's wire format.
#[derive(Debug, Serialize)]
pub struct ReportEntry<'a> {
    pub symbol: &'a str,
    pub footprint: &'a str,
    pub status: Status,
    pub symbol_pins: usize,
    pub footprint_pads: usize,
    pub pins_without_pads: Vec<&'a str>,
    pub pads_without_pins: Vec<&'a str>,
    pub duplicate_pins: &'a BTreeMap<String, u32>,
}

impl<'a> From<&'a VerificationResult> for ReportEntry<'a> {
    fn from(result: &'a VerificationResult) -> Self {
        Self {
            symbol: &result.symbol_name,
            footprint: &result.footprint_reference,
            status: result.status(),
            symbol_pins: result.symbol_pin_count,
            footprint_pads: result.footprint_pad_count,
            pins_without_pads: sorted_identifiers(&result.pins_without_pads),
            pads_without_pins: sorted_identifiers(&result.pads_without_pins),
            duplicate_pins: &result.duplicate_pins,
        }
    }
}

/// Render the JSON report: one entry per result, in encounter order.
pub fn render_json(results: &[VerificationResult]) -> serde_json::Result<String> {
    let entries: Vec<ReportEntry> = results.iter().map(ReportEntry::from).collect();
    serde_json::to_string_pretty(&entries)
}

/// Render the grouped text report: mismatches, then unresolved footprints,
/// then (verbose only) the OK entries, then the summary.
pub fn render_text(results: &[VerificationResult], verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{BANNER}");
    let _ = writeln!(out, "Pin-to-Pad Verification Results");
    let _ = writeln!(out, "{BANNER}\n");

    let mismatches: Vec<_> = results
        .iter()
        .filter(|r| r.status() == Status::Mismatch)
        .collect();
    if !mismatches.is_empty() {
        let _ = writeln!(out, "MISMATCHES:\n");
        for result in mismatches {
            let _ = writeln!(out, "{}\n", format_result(result, verbose));
        }
    }

    let not_found: Vec<_> = results
        .iter()
        .filter(|r| r.status() == Status::FootprintNotFound)
        .collect();
    if !not_found.is_empty() {
        let _ = writeln!(out, "FOOTPRINTS NOT FOUND:\n");
        for result in not_found {
            let _ = writeln!(out, "{}\n", format_result(result, verbose));
        }
    }

    if verbose {
        let ok: Vec<_> = results
            .iter()
            .filter(|r| r.status() == Status::Ok)
            .collect();
        if !ok.is_empty() {
            let _ = writeln!(out, "VERIFIED OK:\n");
            for result in ok {
                let _ = writeln!(out, "{}", format_result(result, verbose));
            }
        }
    }

    let summary = Summary::count(results);
    let _ = writeln!(out, "\n{BANNER}");
    let _ = writeln!(
        out,
        "Summary: {} OK, {} mismatches, {} footprints not found",
        summary.ok, summary.mismatches, summary.not_found
    );
    let _ = writeln!(out, "{BANNER}");
    out
}

/// Per-status counts over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub ok: usize,
    pub mismatches: usize,
    pub not_found: usize,
}

impl Summary {
    pub fn count(results: &[VerificationResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result.status() {
                Status::Ok => summary.ok += 1,
                Status::Mismatch => summary.mismatches += 1,
                Status::FootprintNotFound => summary.not_found += 1,
            }
        }
        summary
    }
}

fn format_result(result: &VerificationResult, verbose: bool) -> String {
    match result.status() {
        Status::Ok => {
            let mut text = format!(
                "✓ {} ({} pins) → {}",
                result.symbol_name, result.symbol_pin_count, result.footprint_reference
            );
            if verbose && result.has_warnings() {
                let _ = write!(
                    text,
                    "\n    (repeated pin numbers: {})",
                    format_duplicates(&result.duplicate_pins)
                );
            }
            text
        }
        Status::FootprintNotFound => format!(
            "? {} → {} (footprint not found)",
            result.symbol_name, result.footprint_reference
        ),
        Status::Mismatch => {
            let mut text = format!(
                "✗ {} ({} pins) → {} ({} pads)",
                result.symbol_name,
                result.symbol_pin_count,
                result.footprint_reference,
                result.footprint_pad_count
            );
            if !result.pins_without_pads.is_empty() {
                let _ = write!(
                    text,
                    "\n    Pins without matching pads: {}",
                    sorted_identifiers(&result.pins_without_pads).join(", ")
                );
            }
            if !result.pads_without_pins.is_empty() {
                let _ = write!(
                    text,
                    "\n    Pads without matching pins: {}",
                    sorted_identifiers(&result.pads_without_pins).join(", ")
                );
            }
            if result.has_warnings() {
                let _ = write!(
                    text,
                    "\n    (repeated pin numbers: {})",
                    format_duplicates(&result.duplicate_pins)
                );
            }
            text
        }
    }
}

fn format_duplicates(duplicates: &BTreeMap<String, u32>) -> String {
    duplicates
        .iter()
        .map(|(pin, count)| format!("{pin}×{count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Order pin/pad identifiers for display: numeric ones first by integer
/// value, then the rest lexicographically, so `"2"` precedes `"10"` which
/// precedes `"A1"`.
pub fn sorted_identifiers(ids: &BTreeSet<String>) -> Vec<&str> {
    let mut ids: Vec<&str> = ids.iter().map(String::as_str).collect();
    ids.sort_by(|a, b| identifier_order(a, b));
    ids
}

fn numeric(id: &str) -> Option<u64> {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        id.parse().ok()
    } else {
        None
    }
}

fn identifier_order(a: &str, b: &str) -> Ordering {
    match (numeric(a), numeric(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
