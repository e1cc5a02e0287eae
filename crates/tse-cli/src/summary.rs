use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tse_model::{DType, Operator, Schema};

use crate::types::BatchOutcome;

pub fn print_batch_summary(outcome: &BatchOutcome) {
    println!("{}: {} years", outcome.command, outcome.report.total());
    println!("{}", batch_table(outcome));
    if let Some((path, rows)) = &outcome.output {
        println!("Output: {} ({rows} rows)", path.display());
    }
    if !outcome.report.failed.is_empty() {
        eprintln!("Errors:");
        for (id, failure) in &outcome.report.failed {
            eprintln!("- {id}: {failure}");
        }
    }
    if let Some(message) = &outcome.fatal {
        eprintln!("error: {message}");
    }
}

/// One row per item plus a total row.
pub fn batch_table(outcome: &BatchOutcome) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Year"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Stage"),
        header_cell("Error"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);

    let mut rows: Vec<(&str, Vec<Cell>)> = Vec::new();
    for id in &outcome.report.succeeded {
        let count = outcome.rows.get(id).copied();
        rows.push((
            id.as_str(),
            vec![
                year_cell(id),
                Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold),
                count.map_or_else(|| dim_cell("-"), Cell::new),
                dim_cell("-"),
                dim_cell("-"),
            ],
        ));
    }
    for (id, failure) in &outcome.report.failed {
        rows.push((
            id.as_str(),
            vec![
                year_cell(id),
                Cell::new("failed").fg(Color::Red).add_attribute(Attribute::Bold),
                dim_cell("-"),
                Cell::new(failure.stage).fg(Color::Yellow),
                Cell::new(failure.message()),
            ],
        ));
    }
    rows.sort_by(|a, b| a.0.cmp(b.0));
    for (_, cells) in rows {
        table.add_row(cells);
    }

    let total_rows: usize = outcome.rows.values().sum();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{}/{}",
            outcome.report.succeeded.len(),
            outcome.report.total()
        ))
        .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(outcome.report.failed.len()),
    ]);
    table
}

pub fn print_schema(schema: &Schema) {
    println!("Output encoding: {}", schema.output_encoding());
    println!("{}", schema_table(schema));
}

/// One row per source column, in output order.
pub fn schema_table(schema: &Schema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Dtype"),
        header_cell("Transforms"),
    ]);
    apply_table_style(&mut table);
    for (source, spec) in schema.columns() {
        let dtype = match &spec.dtype {
            None => dim_cell("text"),
            Some(DType::Unknown(name)) => {
                Cell::new(format!("{name} (ignored)")).fg(Color::Yellow)
            }
            Some(dtype) => Cell::new(dtype),
        };
        let transforms = if spec.transforms.is_empty() {
            dim_cell("-")
        } else {
            let steps: Vec<String> = spec
                .transforms
                .iter()
                .map(|op| match &op.operator {
                    Operator::NoOp(reason) => format!("skip ({reason})"),
                    operator => operator.to_string(),
                })
                .collect();
            Cell::new(steps.join(" -> "))
        };
        table.add_row(vec![
            Cell::new(source),
            Cell::new(&spec.target)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            dtype,
            transforms,
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
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

fn year_cell(year: &str) -> Cell {
    Cell::new(year)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
