use serde::Serialize;
use teamgen_core::display::{team_rows, Board};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// Print the final state of a run as a table, or as JSON with `--json`.
pub fn print_board(board: &Board<'_>, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(board);
    }
    if board.teams.is_empty() {
        println!("No teams.");
        return Ok(());
    }
    print_table(&["TEAM", "SIZE", "MEMBERS"], team_rows(board.teams));
    if board.remaining > 0 {
        println!("\n{} member(s) not yet assigned.", board.remaining);
    }
    Ok(())
}
