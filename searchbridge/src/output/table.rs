//! ASCII table rendering for status output.

/// Render headers and rows as a fixed-width ASCII table.
///
/// Each column is as wide as its widest cell or header; every cell is
/// padded to exactly that width between `|` borders, with `+`/`-` rules
/// above the header, below it, and after the last row.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let bar = widths.iter().fold(String::from("+"), |mut bar, width| {
        bar.push_str(&"-".repeat(width + 2));
        bar.push('+');
        bar
    });

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (i, width) in widths.iter().copied().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!(" {:<width$} |", cell));
        }
        line
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut out = String::new();
    out.push_str(&bar);
    out.push('\n');
    out.push_str(&render_row(&header_cells));
    out.push('\n');
    out.push_str(&bar);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&bar);
    out.push('\n');
    out
}
