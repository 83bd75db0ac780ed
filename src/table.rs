//! Aligned ASCII table rendering for console reports.

use std::fmt::Write as _;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", render_row(headers, &widths));
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat((*w).max(1))).collect();
    let _ = writeln!(output, "{}", render_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", render_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate().take(widths.len()) {
        if idx > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let padding = widths[idx].saturating_sub(cell.chars().count());
        if padding > 0 && idx + 1 < widths.len() {
            line.push_str(&" ".repeat(padding));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn columns_align_to_the_widest_cell() {
        let rendered = render_table(
            &strings(&["file", "column"]),
            &[
                strings(&["enero.xlsx", "ESTADO"]),
                strings(&["f.xlsx", "PRODUCTO"]),
            ],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "file        column");
        assert_eq!(lines[1], "----------  --------");
        assert_eq!(lines[2], "enero.xlsx  ESTADO");
        assert_eq!(lines[3], "f.xlsx      PRODUCTO");
    }

    #[test]
    fn trailing_cells_are_not_padded() {
        let rendered = render_table(&strings(&["a"]), &[strings(&["x"])]);
        for line in rendered.lines() {
            assert_eq!(line.trim_end(), line);
        }
    }
}
