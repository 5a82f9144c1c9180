//! Run summary rendering.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::BuildResult;

pub fn print_summary(result: &BuildResult) {
    println!("Output: {}", result.output_dir.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Measure"),
        header_cell("Records"),
        header_cell("Key columns"),
        header_cell("Diagnostics"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut total_records = 0usize;
    let mut total_diagnostics = 0usize;
    for measure in &result.measures {
        total_records += measure.records;
        total_diagnostics += measure.diagnostics.len();
        table.add_row(vec![
            Cell::new(measure.concept.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(measure.records),
            Cell::new(measure.key_columns.join(", ")),
            count_cell(measure.diagnostics.len()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        dim_cell(format!("{} measures", result.measures.len())),
        count_cell(total_diagnostics).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_diagnostics(result);

    if !result.skipped.is_empty() {
        println!("Skipped (no data): {}", result.skipped.join(", "));
    }
    if !result.wrote_continuous {
        println!("Continuous catalog not written (series metadata unavailable).");
    }
    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_diagnostics(result: &BuildResult) {
    let mut rows = Vec::new();
    for measure in &result.measures {
        for diagnostic in &measure.diagnostics {
            rows.push((measure.concept.as_str(), diagnostic));
        }
    }
    if rows.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Measure"),
        header_cell("Kind"),
        header_cell("Count"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (concept, diagnostic) in rows {
        table.add_row(vec![
            Cell::new(concept),
            Cell::new(diagnostic.kind.as_str()).fg(Color::Yellow),
            Cell::new(diagnostic.count),
            Cell::new(&diagnostic.message),
        ]);
    }
    println!();
    println!("Data quality:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
