//! Vertical summary card for an imported report.
//!
//! Sections with nothing to show are skipped entirely.

use std::fmt::Write;

use intelmap_core::ImportResult;

const MAX_LIST_ITEMS: usize = 10;

/// Print the card for one import to stdout.
pub fn print_summary_card(result: &ImportResult) {
    print!("{}", render_summary_card(result));
}

pub fn render_summary_card(result: &ImportResult) -> String {
    let summary = &result.summary;
    let stats = &summary.stats;
    let mut out = String::new();

    let _ = writeln!(out, "=== {} {} ===", summary.report_id, summary.operation_name);
    if !summary.date.is_empty() {
        let _ = writeln!(out, "{}", summary.date);
    }
    out.push('\n');

    section(
        &mut out,
        "Counts",
        &[
            ("entries", stats.entries.to_string()),
            ("persons", stats.persons.to_string()),
            ("addresses", stats.addresses.to_string()),
            ("vehicles", stats.vehicles.to_string()),
            ("flights", stats.flights.to_string()),
            ("airports", stats.airports.to_string()),
            ("phones", stats.phones.to_string()),
            ("connections", stats.connections.to_string()),
        ],
    );

    let passports: Vec<String> = summary
        .passports
        .iter()
        .map(|p| match &p.nationality {
            Some(n) => format!("{} ({n})", p.number),
            None => p.number.clone(),
        })
        .collect();
    section(
        &mut out,
        "Identifiers",
        &[
            ("pnc_ids", summary.pnc_ids.join(", ")),
            ("passports", passports.join(", ")),
        ],
    );

    if !summary.grading_rows.is_empty() {
        let _ = writeln!(out, "Grading");
        for row in &summary.grading_rows {
            let source = row.source.as_deref().unwrap_or("-");
            let label = format!("{}. {} [{source}]", row.entry_index, row.code);
            let _ = writeln!(out, "  {:<26} {}", label, row.decode);
        }
        out.push('\n');
    }

    if !result.entities.is_empty() {
        let _ = writeln!(out, "Entities ({}):", result.entities.len());
        for e in result.entities.iter().take(MAX_LIST_ITEMS) {
            let p = &e.placement;
            let _ = writeln!(
                out,
                "  {:<26} {} ({:.4}, {:.4})",
                p.entity_type, p.label, p.coordinates.lat, p.coordinates.lng
            );
        }
        more(&mut out, result.entities.len());
        out.push('\n');
    }

    if !result.connections.is_empty() {
        let _ = writeln!(out, "Connections ({}):", result.connections.len());
        for c in result.connections.iter().take(MAX_LIST_ITEMS) {
            let _ = writeln!(out, "  {:<26} {} -> {}", c.label, c.from_label, c.to_label);
        }
        more(&mut out, result.connections.len());
        out.push('\n');
    }

    section(
        &mut out,
        "Provenance",
        &[("provenance", summary.provenance.clone().unwrap_or_default())],
    );
    out
}

fn section(out: &mut String, header: &str, rows: &[(&str, String)]) {
    if rows.iter().all(|(_, v)| v.is_empty()) {
        return;
    }
    let _ = writeln!(out, "{header}");
    for (name, value) in rows {
        if !value.is_empty() {
            let _ = writeln!(out, "  {:<26} {}", name, value);
        }
    }
    out.push('\n');
}

fn more(out: &mut String, len: usize) {
    if len > MAX_LIST_ITEMS {
        let _ = writeln!(out, "  ... and {} more", len - MAX_LIST_ITEMS);
    }
}
