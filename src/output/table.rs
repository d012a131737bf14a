//! Minimal column-aligned table rendering for listings.

/// Render `rows` under `headers` as an org-style table.
///
/// Column widths track the widest cell; rows shorter than the header are
/// padded with empty cells.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().take(columns).enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, headers.iter().map(ToString::to_string));
    out.push('|');
    for (i, width) in widths.iter().enumerate() {
        out.push_str(&"-".repeat(width + 2));
        out.push(if i + 1 == columns { '|' } else { '+' });
    }
    out.push('\n');
    for row in rows {
        let mut cells = row.clone();
        cells.resize(columns, String::new());
        push_row(&mut out, &widths, cells.into_iter());
    }
    out
}

fn push_row(out: &mut String, widths: &[usize], cells: impl Iterator<Item = String>) {
    out.push('|');
    for (cell, width) in cells.zip(widths) {
        let pad = width - cell.chars().count();
        out.push(' ');
        out.push_str(&cell);
        out.push_str(&" ".repeat(pad + 1));
        out.push('|');
    }
    out.push('\n');
}
