use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use csvdb_cli::pipeline::{ImportReport, PairOutcome};
use csvdb_store::{RegistryEntry, TablePage};

pub fn print_import_summary(report: &ImportReport, styled: bool) {
    let found = report.total() + report.skipped.len();
    println!("Found {found} data file(s), {} with a descriptor", report.total());
    if !report.skipped.is_empty() {
        println!("Skipped (no descriptor):");
        for path in &report.skipped {
            println!("- {}", path.display());
        }
    }
    if report.total() > 0 {
        println!("{}", render_import_table(report, styled));
    }
    if report.dry_run {
        println!("Dry run: nothing was written or moved.");
    }
    println!("Succeeded: {}/{} pairs", report.succeeded(), report.total());
}

pub fn render_import_table(report: &ImportReport, styled: bool) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Pair"),
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Status"),
        header_cell("Stage"),
        header_cell("Message"),
    ]);
    apply_summary_table_style(&mut table, styled);
    align_column(&mut table, 2, CellAlignment::Right);
    for outcome in &report.pairs {
        table.add_row(outcome_row(outcome));
    }
    table.to_string()
}

fn outcome_row(outcome: &PairOutcome) -> Vec<Cell> {
    let table_cell = match &outcome.table_name {
        Some(name) => Cell::new(name),
        None => dim_cell("-"),
    };
    let (status, stage, message) = match &outcome.error {
        None => (
            Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold),
            dim_cell("-"),
            dim_cell("-"),
        ),
        Some(error) => (
            Cell::new("failed").fg(Color::Red).add_attribute(Attribute::Bold),
            Cell::new(error.stage()).fg(Color::Yellow),
            Cell::new(error),
        ),
    };
    vec![
        Cell::new(&outcome.pair.base_name)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        table_cell,
        Cell::new(outcome.rows),
        status,
        stage,
        message,
    ]
}

pub fn render_tables(entries: &[RegistryEntry], styled: bool) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Columns"),
        header_cell("Created"),
    ]);
    apply_table_style(&mut table, styled);
    for entry in entries {
        let columns = entry
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.column_type).trim_end().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&entry.table_name).add_attribute(Attribute::Bold),
            Cell::new(columns),
            dim_cell(&entry.created_at),
        ]);
    }
    table.to_string()
}

pub fn print_tables(entries: &[RegistryEntry], styled: bool) {
    if entries.is_empty() {
        println!("No tables imported yet.");
        return;
    }
    println!("{}", render_tables(entries, styled));
}

pub fn render_page(page: &TablePage, styled: bool) -> String {
    let mut table = Table::new();
    table.set_header(page.columns.iter().map(|name| header_cell(name)));
    apply_table_style(&mut table, styled);
    for row in &page.rows {
        table.add_row(row.iter().map(Cell::new));
    }
    table.to_string()
}

pub fn print_page(page: &TablePage, styled: bool) {
    println!("Table: {}", page.table);
    println!("{}", render_page(page, styled));
    println!(
        "Page {} of {} ({} rows total)",
        page.page_number(),
        page.page_count(),
        page.total
    );
}

fn apply_table_style(table: &mut Table, styled: bool) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if !styled {
        table.force_no_tty();
    }
}

fn apply_summary_table_style(table: &mut Table, styled: bool) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if !styled {
        table.force_no_tty();
    }
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
