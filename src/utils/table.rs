//! Minimal aligned-column output for list and scan commands.

use unicode_width::UnicodeWidthStr;

/// Print rows as left-aligned columns, first row being the header.
pub fn print_table(rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; cols];

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    for (n, row) in rows.iter().enumerate() {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            line.push_str(cell);
            // Pad by display width, not byte length.
            let pad = widths[i].saturating_sub(cell.width()) + 2;
            line.push_str(&" ".repeat(pad));
        }
        println!("{}", line.trim_end());

        if n == 0 {
            let total: usize = widths.iter().map(|w| w + 2).sum();
            println!("{}", "-".repeat(total.saturating_sub(2)));
        }
    }
}
