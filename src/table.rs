use console::{Term, style};

const COLORS: [fn(&str) -> console::StyledObject<&str>; 6] = [
    |s| style(s).yellow(),
    |s| style(s).green(),
    |s| style(s).blue(),
    |s| style(s).magenta(),
    |s| style(s).cyan(),
    |s| style(s).red(),
];

const COLUMN_GAP: usize = 2;
const MIN_COLUMN_WIDTH: usize = 4;

/// Shrinks columns proportionally until the row fits in `max_width`.
fn column_widths(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let gaps = widths.len().saturating_sub(1) * COLUMN_GAP;
    let content: usize = widths.iter().sum();
    let available = max_width.saturating_sub(4 + gaps);
    if content > available && content > 0 {
        let scale = available as f64 / content as f64;
        for width in &mut widths {
            *width = ((*width as f64 * scale) as usize).max(MIN_COLUMN_WIDTH);
        }
    }
    widths
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    if width > 3 {
        let kept: String = cell.chars().take(width - 3).collect();
        format!("{kept}...")
    } else {
        cell.chars().take(width).collect()
    }
}

pub fn draw_table(title: &str, headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() || headers.is_empty() {
        println!("{} No data to display.", style("ℹ️").dim());
        return;
    }

    let terminal_width = Term::stdout().size().1 as usize;
    let max_width = if terminal_width > 10 { terminal_width } else { 80 };
    let widths = column_widths(headers, &rows, max_width);
    let content_width =
        widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * COLUMN_GAP;
    let gap = " ".repeat(COLUMN_GAP);

    println!("{}", style(title).bold());
    println!("{}", "━".repeat(title.chars().count().max(content_width)));

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| {
            let padded = format!("{:<width$}", header, width = *width);
            style(padded).bold().cyan().to_string()
        })
        .collect();
    println!("{}", header_line.join(&gap));
    println!("{}", "-".repeat(content_width));

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                let padded = format!("{:<width$}", truncate(cell, *width), width = *width);
                COLORS[i % COLORS.len()](&padded).to_string()
            })
            .collect();
        println!("{}", line.join(&gap));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_longest_cell() {
        let rows = vec![vec!["EcsVpc".to_string(), "10.0.0.0/16".to_string()]];
        assert_eq!(column_widths(&["ID", "CIDR"], &rows, 200), vec![6, 11]);
    }

    #[test]
    fn wide_tables_are_scaled_down() {
        let rows = vec![vec!["x".repeat(100), "y".repeat(100)]];
        let widths = column_widths(&["A", "B"], &rows, 80);
        assert!(widths.iter().sum::<usize>() <= 80);
        assert!(widths.iter().all(|w| *w >= MIN_COLUMN_WIDTH));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate("Image Tag: 1.27", 8), "Image...");
        assert_eq!(truncate("⚠️⚠️⚠️", 2).chars().count(), 2);
        assert_eq!(truncate("short", 10), "short");
    }
}
