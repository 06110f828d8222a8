use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use protocol_model::{MatchTier, Resolution};
use protocol_resolve::ResolutionReport;
use protocol_store::StatementFailure;

use crate::types::{DecodeResult, LookupResult, MedicationResult, ResolveResult, SeedResult};

pub fn print_decode_summary(result: &DecodeResult) {
    println!("File: {}", result.file.display());
    let stats = &result.stats;
    let mut table = counts_table();
    add_count_row(&mut table, "Record slots", stats.record_slots, None);
    add_count_row(&mut table, "Deleted", stats.deleted, None);
    add_count_row(&mut table, "Malformed", stats.malformed, Some(Color::Yellow));
    add_count_row(&mut table, "Placeholders", stats.placeholders, Some(Color::Yellow));
    add_count_row(&mut table, "Trailing bytes", stats.trailing_bytes, Some(Color::Yellow));
    add_total_row(&mut table, "Emitted", stats.emitted);
    println!("{table}");
    if let Some((path, summary)) = &result.script {
        println!(
            "Script: {} ({} rows in {} batches)",
            path.display(),
            summary.rows,
            summary.batches
        );
    }
    if let Some(applied) = &result.applied {
        println!(
            "Applied: {} batches, {} new rows",
            applied.batches, applied.inserted
        );
        print_failures(&applied.failures);
    }
    if let Some(rows) = result.stored_rows {
        println!("Store: {rows} legacy items");
    }
}

pub fn print_medication_summary(result: &MedicationResult) {
    println!(
        "Visits: {} ({} rows skipped)",
        result.visits, result.skipped_rows
    );
    print_resolution_table(&result.report);
    let rederive = &result.rederive;
    let mut table = counts_table();
    add_count_row(&mut table, "Deleted", rederive.deleted, None);
    add_count_row(&mut table, "Duplicates", rederive.duplicates, Some(Color::Yellow));
    add_count_row(&mut table, "Failed", rederive.failures.len(), Some(Color::Red));
    add_total_row(&mut table, "Inserted", rederive.inserted);
    println!("{table}");
    print_failures(&rederive.failures);
    print_unresolved_location(result.unresolved_out.as_deref(), &result.report);
}

pub fn print_resolve_summary(result: &ResolveResult) {
    print_resolution_table(&result.report.resolution);
    println!("Updated: {}", result.report.updated);
    print_failures(&result.report.failures);
    print_unresolved_location(result.unresolved_out.as_deref(), &result.report.resolution);
}

pub fn print_lookup(result: &LookupResult) {
    match &result.resolution {
        Resolution::Resolved(found) => {
            let mut table = Table::new();
            table.set_header(vec![header_cell("Field"), header_cell("Value")]);
            apply_table_style(&mut table);
            table.add_row(vec![Cell::new("Query"), Cell::new(&result.name)]);
            table.add_row(vec![
                Cell::new("Drug id"),
                Cell::new(found.drug_id)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);
            table.add_row(vec![Cell::new("Tier"), Cell::new(found.tier.as_str())]);
            table.add_row(vec![Cell::new("Source"), Cell::new(found.source.as_str())]);
            table.add_row(vec![Cell::new("Variant"), Cell::new(found.variant.as_str())]);
            table.add_row(vec![Cell::new("Candidates"), Cell::new(found.candidates)]);
            println!("{table}");
        }
        Resolution::Unresolved => println!("{}: unresolved", result.name),
    }
}

pub fn print_seed_summary(result: &SeedResult) {
    println!(
        "Catalog sheet: {} drugs ({} rows skipped)",
        result.entries, result.skipped_rows
    );
    let mut table = counts_table();
    add_count_row(&mut table, "Drugs inserted", result.report.drugs_inserted, None);
    add_count_row(&mut table, "Aliases inserted", result.report.aliases_inserted, None);
    println!("{table}");
}

fn print_resolution_table(report: &ResolutionReport) {
    let mut table = counts_table();
    for tier in MatchTier::ALL {
        add_count_row(&mut table, tier.as_str(), report.tier_count(tier), None);
    }
    add_count_row(&mut table, "unresolved", report.unresolved, Some(Color::Yellow));
    add_total_row(&mut table, "Total", report.total);
    println!("{table}");
}

fn print_failures(failures: &[StatementFailure]) {
    if failures.is_empty() {
        return;
    }
    eprintln!("Failed statements:");
    for failure in failures {
        eprintln!("- #{} {}: {}", failure.index, failure.row, failure.message);
    }
}

fn print_unresolved_location(path: Option<&std::path::Path>, report: &ResolutionReport) {
    if let Some(path) = path {
        println!(
            "Unresolved names: {} (written to {})",
            report.unresolved_names.len(),
            path.display()
        );
    } else if !report.unresolved_names.is_empty() {
        println!(
            "Unresolved names: {} (use --unresolved-out to export)",
            report.unresolved_names.len()
        );
    }
}

fn counts_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn add_count_row(table: &mut Table, label: &str, count: usize, highlight: Option<Color>) {
    let count_cell = match highlight {
        Some(color) if count > 0 => Cell::new(count).fg(color).add_attribute(Attribute::Bold),
        _ if count == 0 => dim_cell(count),
        _ => Cell::new(count),
    };
    table.add_row(vec![Cell::new(label), count_cell]);
}

fn add_total_row(table: &mut Table, label: &str, count: usize) {
    table.add_row(vec![
        Cell::new(label)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(count).add_attribute(Attribute::Bold),
    ]);
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
