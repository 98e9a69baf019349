//! Report-level summary: counts, decoded gradings, provenance.

use serde::Serialize;

use crate::aggregate::AggregatedSet;
use crate::graph::GraphStats;
use crate::model::{Passport, Report};

/// One graded entry, decoded against the reliability tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradingRow {
    pub entry_index: u64,
    /// Raw code as written, e.g. `2AC`.
    pub code: String,
    pub source: Option<String>,
    /// e.g. `Usually reliable / Known directly / Disseminate with conditions`.
    pub decode: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub report_id: String,
    pub operation_name: String,
    pub date: String,
    pub stats: GraphStats,
    pub grading_rows: Vec<GradingRow>,
    pub provenance: Option<String>,
    pub pnc_ids: Vec<String>,
    pub passports: Vec<Passport>,
}

pub fn summarize(report: &Report, stats: &GraphStats, aggregated: &AggregatedSet) -> SummaryReport {
    let grading_rows = report
        .entries
        .iter()
        .filter_map(|entry| {
            let grading = entry.extracted.grading?;
            Some(GradingRow {
                entry_index: entry.index,
                code: grading.code(),
                source: entry.extracted.source.clone(),
                decode: grading.decode(),
            })
        })
        .collect();

    SummaryReport {
        report_id: report.header.report_id.clone(),
        operation_name: report.header.operation_name.clone(),
        date: report.header.date.clone(),
        stats: stats.clone(),
        grading_rows,
        provenance: (!report.provenance.is_empty()).then(|| report.provenance.clone()),
        pnc_ids: aggregated.pnc_ids.clone(),
        passports: aggregated.passports.clone(),
    }
}
