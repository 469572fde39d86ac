//! Double-grid text table of `(x, Pr(X = x))` rows.

use crate::binomial::Outcome;

const HEADERS: [&str; 2] = ["(small) x", "Probability"];

/// Formats a probability, with `precision` decimal places or, when `None`,
/// the shortest representation that round-trips.
pub fn format_probability(p: f64, precision: Option<usize>) -> String {
    match precision {
        Some(digits) => format!("{p:.digits$}"),
        None => p.to_string(),
    }
}

/// Renders the table with box-drawing borders, one ruled row per outcome.
///
/// ```text
/// ╔═══════════╦═════════════╗
/// ║ (small) x ║ Probability ║
/// ╠═══════════╬═════════════╣
/// ║         0 ║        0.25 ║
/// ...
/// ╚═══════════╩═════════════╝
/// ```
pub fn render_table(outcomes: &[Outcome], precision: Option<usize>) -> String {
    let cells: Vec<[String; 2]> = outcomes
        .iter()
        .map(|o| [o.x.to_string(), format_probability(o.probability, precision)])
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let rule = |left: char, mid: char, right: char| {
        let segments: Vec<String> = widths.iter().map(|w| "═".repeat(w + 2)).collect();
        format!("{left}{}{right}\n", segments.join(&mid.to_string()))
    };
    let line = |row: [&str; 2]| {
        let padded: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!(" {cell:>w$} "))
            .collect();
        format!("║{}║\n", padded.join("║"))
    };

    let mut out = rule('╔', '╦', '╗');
    out.push_str(&line(HEADERS));
    for row in &cells {
        out.push_str(&rule('╠', '╬', '╣'));
        out.push_str(&line([row[0].as_str(), row[1].as_str()]));
    }
    out.push_str(&rule('╚', '╩', '╝'));
    out
}
