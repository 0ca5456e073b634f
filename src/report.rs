// Ranked-output presentation: plain-text preview and artifact constants.

use crate::model::MODEL_SCORE_COLUMN;
use crate::table::{Table, PLAYER_COLUMN};

/// Default file name for the downloadable ranked-table artifact.
pub const RANKED_CSV_FILENAME: &str = "golf_model_ranked.csv";

/// MIME type of the ranked-table artifact, for embedding hosts that serve it.
pub const RANKED_CSV_MIME: &str = "text/csv";

/// Decimal places shown for scores and z-scores in the preview. The CSV
/// artifact keeps full precision; only the preview rounds.
const PREVIEW_DECIMALS: usize = 3;

/// Render the top `max_rows` of a ranked table as a fixed-width text table
/// showing rank, `Player`, `Model Score`, and every derived Z column.
///
/// The full table is in the CSV artifact; the preview is just the headline
/// view of the ranking.
pub fn render_preview(ranked: &Table, max_rows: usize) -> String {
    let shown = max_rows.min(ranked.n_rows());

    // Rank + Player + Model Score first, then Z columns in table order.
    let z_columns: Vec<&String> = ranked
        .headers()
        .iter()
        .filter(|h| h.ends_with(" Z"))
        .collect();

    let mut header_cells: Vec<String> = vec!["#".into(), PLAYER_COLUMN.into(), MODEL_SCORE_COLUMN.into()];
    header_cells.extend(z_columns.iter().map(|h| h.to_string()));

    let mut body: Vec<Vec<String>> = Vec::with_capacity(shown);
    for rank in 0..shown {
        let mut cells = vec![
            format!("{}", rank + 1),
            cell(ranked, PLAYER_COLUMN, rank),
            numeric_cell(ranked, MODEL_SCORE_COLUMN, rank),
        ];
        for z in &z_columns {
            cells.push(numeric_cell(ranked, z, rank));
        }
        body.push(cells);
    }

    // Column widths from header and body.
    let mut widths: Vec<usize> = header_cells.iter().map(|h| h.len()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header_cells, &widths);
    let rule_len = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');
    for row in &body {
        push_row(&mut out, row, &widths);
    }
    if shown < ranked.n_rows() {
        out.push_str(&format!(
            "... {} more rows in {}\n",
            ranked.n_rows() - shown,
            RANKED_CSV_FILENAME
        ));
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c:<width$}", width = *w))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn cell(table: &Table, column: &str, row: usize) -> String {
    table
        .column_index(column)
        .map(|idx| table.row(row)[idx].clone())
        .unwrap_or_default()
}

fn numeric_cell(table: &Table, column: &str, row: usize) -> String {
    match cell(table, column, row).trim().parse::<f64>() {
        Ok(v) if v.is_finite() => format!("{v:.prec$}", prec = PREVIEW_DECIMALS),
        Ok(_) => "NaN".into(),
        Err(_) => String::new(),
    }
}
