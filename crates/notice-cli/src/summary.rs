use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use notice_cli::pipeline::SortedNotice;
use notice_model::AnnotatedReport;
use notice_prune::PruneSummary;
use notice_sort::SortOutcome;

/// Prune counts per category, on stderr so stdout stays the model.
pub fn print_prune_summary(summary: &PruneSummary) {
    eprintln!("Notice subtype: {}", summary.notice_sub_type);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Category"), header_cell("Removed")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for outcome in &summary.categories {
        let removed = if outcome.applied {
            Cell::new(outcome.removed)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![Cell::new(outcome.category), removed]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(summary.total_removed()).add_attribute(Attribute::Bold),
    ]);
    eprintln!("{table}");
}

pub fn print_sort_summary(sorted: &SortedNotice) {
    match sorted.outcome {
        SortOutcome::Sorted { moved_elements } => eprintln!(
            "Sorted {} notice: {moved_elements} element(s) moved",
            sorted.document_type
        ),
        SortOutcome::Unsupported => eprintln!(
            "Sorting unsupported for this SDK version; {} notice unchanged",
            sorted.document_type
        ),
    }
}

pub fn print_report_table(report: &AnnotatedReport) {
    println!(
        "Fired rules: {}  Failed asserts: {}",
        report.total_fired, report.total_failed
    );
    if report.total_failed == 0 {
        println!("No failed asserts.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Index"),
        header_cell("Rule"),
        header_cell("Role"),
        header_cell("Lot"),
        header_cell("Message"),
        header_cell("Legend"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for item in report.failures() {
        table.add_row(vec![
            Cell::new(&item.index),
            optional_cell(item.id.as_deref()),
            role_cell(item.role.as_deref()),
            item.lot_number.map_or_else(|| dim_cell("-"), Cell::new),
            optional_cell(item.text.as_deref()),
            optional_cell(item.legend.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn role_cell(role: Option<&str>) -> Cell {
    match role {
        Some(role) if role.eq_ignore_ascii_case("error") => Cell::new(role).fg(Color::Red),
        Some(role) if role.eq_ignore_ascii_case("warn") => Cell::new(role).fg(Color::Yellow),
        Some(role) => Cell::new(role),
        None => dim_cell("-"),
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), Cell::new)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
