//! Runtime settings shared by the interactive session and one-shot commands.

use std::path::PathBuf;

use crate::binomial::Binomial;
use crate::render::{ChartKind, ChartOptions};

/// Presentation settings. Nothing here affects the numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Directory charts are written to.
    pub chart_dir: PathBuf,
    pub chart: ChartOptions,
    /// Decimal places for probabilities; `None` prints full precision.
    pub precision: Option<usize>,
    /// Emit ANSI clear-screen sequences between screens.
    pub clear_screen: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chart_dir: PathBuf::from("."),
            chart: ChartOptions::default(),
            precision: None,
            clear_screen: true,
        }
    }
}

impl SessionConfig {
    /// Where a chart of `kind` for `dist` is written,
    /// e.g. `./binomial_bar_n10_pi0.5.png`.
    pub fn chart_path(&self, dist: &Binomial, kind: ChartKind) -> PathBuf {
        self.chart_dir.join(format!(
            "binomial_{}_n{}_pi{}.png",
            kind.name(),
            dist.n(),
            dist.pi()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SessionConfig::default();
        assert_eq!(c.chart_dir, PathBuf::from("."));
        assert_eq!(c.chart, ChartOptions { width: 1024, height: 768 });
        assert_eq!(c.precision, None);
        assert!(c.clear_screen);
    }

    #[test]
    fn test_chart_path() {
        let c = SessionConfig {
            chart_dir: PathBuf::from("out"),
            ..SessionConfig::default()
        };
        let b = Binomial::new(10, 0.5).unwrap();
        assert_eq!(
            c.chart_path(&b, ChartKind::LineBar),
            PathBuf::from("out").join("binomial_linebar_n10_pi0.5.png")
        );
    }
}
