//! Probability charts drawn with plotters.
//!
//! Five chart kinds share one layout: title, an `n`/`π` caption, x axis
//! "Possible Values (X)" and y axis "Probability of X". Paths ending in
//! `.svg` are drawn with the SVG backend, everything else as a PNG bitmap.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use tracing::info;

use crate::binomial::Binomial;
use crate::error::{BinomialError, RenderError};

const BAR_COLOR: RGBColor = RGBColor(0x3A, 0x10, 0x78);
const LINE_COLOR: RGBColor = RGBColor(0x4E, 0x31, 0xAA);
const POINT_COLOR: RGBColor = RGBColor(0x37, 0x95, 0xBD);

/// Half the width of a bar, in x units.
const BAR_HALF_WIDTH: f64 = 0.4;

/// Chart styles offered by the graph menu and the `chart` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    /// Line through the points with the points marked.
    LinePoint,
    /// Bars with a line over their tops.
    LineBar,
}

impl ChartKind {
    /// Menu order.
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::LinePoint,
        ChartKind::LineBar,
    ];

    /// Short name, also accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Scatter => "scatter",
            ChartKind::LinePoint => "linepoint",
            ChartKind::LineBar => "linebar",
        }
    }

    /// Human-readable menu label.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Graph",
            ChartKind::Line => "Line Graph",
            ChartKind::Scatter => "Scatterplot",
            ChartKind::LinePoint => "Line Graph with Points",
            ChartKind::LineBar => "Line and Bar Graph",
        }
    }

    fn has_bars(self) -> bool {
        matches!(self, ChartKind::Bar | ChartKind::LineBar)
    }

    fn has_line(self) -> bool {
        matches!(
            self,
            ChartKind::Line | ChartKind::LinePoint | ChartKind::LineBar
        )
    }

    fn has_points(self) -> bool {
        matches!(self, ChartKind::Scatter | ChartKind::LinePoint)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = BinomialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ChartKind::ALL
            .into_iter()
            .find(|k| k.name() == lowered)
            .ok_or_else(|| {
                BinomialError::InvalidArgument(format!("\"{s}\" is not a valid graph type"))
            })
    }
}

/// Pixel size of the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// `(x, Pr(X = x))` pairs in plotting coordinates.
pub fn series(dist: &Binomial) -> Vec<(f64, f64)> {
    dist.probabilities()
        .iter()
        .enumerate()
        .map(|(x, &p)| (x as f64, p))
        .collect()
}

/// Plot ranges: x padded half a unit past `[0, n]`, y from zero to 10%
/// above the tallest probability.
pub fn axis_ranges(dist: &Binomial) -> ((f64, f64), (f64, f64)) {
    let peak = dist.probabilities().iter().copied().fold(0.0, f64::max);
    let x_range = (-0.5, dist.n() as f64 + 0.5);
    let y_range = (0.0, if peak > 0.0 { peak * 1.1 } else { 1.0 });
    (x_range, y_range)
}

/// Chart caption, e.g. `n = 10, π = 0.5`.
pub fn caption(dist: &Binomial) -> String {
    format!("n = {}, π = {}", dist.n(), dist.pi())
}

/// Draws `kind` for `dist` into the file at `path`.
///
/// # Errors
/// [`RenderError::Io`] if the parent directory cannot be created,
/// [`RenderError::Chart`] if plotters fails (missing fonts, unwritable
/// file, unsupported image format).
pub fn render_chart(
    dist: &Binomial,
    kind: ChartKind,
    path: &Path,
    options: ChartOptions,
) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let size = (options.width, options.height);
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw(&root, dist, kind).map_err(chart_error)?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw(&root, dist, kind).map_err(chart_error)?;
    }

    info!(path = %path.display(), kind = %kind, "chart written");
    Ok(())
}

fn chart_error<E: fmt::Display>(e: E) -> RenderError {
    RenderError::Chart(e.to_string())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dist: &Binomial,
    kind: ChartKind,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let ((x_lo, x_hi), (y_lo, y_hi)) = axis_ranges(dist);
    let title = format!("Probability Distribution ({})", caption(dist));
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Possible Values (X)")
        .y_desc("Probability of X")
        .draw()?;

    let points = series(dist);

    if kind.has_bars() {
        chart.draw_series(points.iter().map(|&(x, p)| {
            Rectangle::new(
                [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, p)],
                BAR_COLOR.filled(),
            )
        }))?;
    }
    if kind.has_line() {
        // Over bars the line switches to the point colour to stay visible.
        let color = if kind.has_bars() {
            POINT_COLOR
        } else {
            LINE_COLOR
        };
        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            color.stroke_width(2),
        ))?;
    }
    if kind.has_points() {
        chart.draw_series(
            points
                .iter()
                .map(|&(x, p)| Circle::new((x, p), 4, POINT_COLOR.filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        std::env::temp_dir().join(format!(
            "u_binomial_chart_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    #[test]
    fn test_parse_chart_kind() {
        assert_eq!("bar".parse::<ChartKind>().unwrap(), ChartKind::Bar);
        assert_eq!("LINE".parse::<ChartKind>().unwrap(), ChartKind::Line);
        assert_eq!(" Scatter ".parse::<ChartKind>().unwrap(), ChartKind::Scatter);
        assert_eq!("linepoint".parse::<ChartKind>().unwrap(), ChartKind::LinePoint);
        assert_eq!("LineBar".parse::<ChartKind>().unwrap(), ChartKind::LineBar);
    }

    #[test]
    fn test_parse_unknown_chart_kind() {
        let err = "pie".parse::<ChartKind>().unwrap_err();
        assert_eq!(
            err,
            BinomialError::InvalidArgument("\"pie\" is not a valid graph type".into())
        );
    }

    #[test]
    fn test_name_roundtrip() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.to_string().parse::<ChartKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_layers() {
        assert!(ChartKind::Bar.has_bars() && !ChartKind::Bar.has_line());
        assert!(ChartKind::LineBar.has_bars() && ChartKind::LineBar.has_line());
        assert!(ChartKind::LinePoint.has_points() && ChartKind::LinePoint.has_line());
        assert!(ChartKind::Scatter.has_points() && !ChartKind::Scatter.has_line());
        assert!(!ChartKind::Line.has_points());
    }

    #[test]
    fn test_series_follows_table() {
        let b = Binomial::new(3, 0.5).unwrap();
        let s = series(&b);
        assert_eq!(s.len(), 4);
        for (i, &(x, p)) in s.iter().enumerate() {
            assert_eq!(x, i as f64);
            assert_eq!(p, b.probabilities()[i]);
        }
    }

    #[test]
    fn test_axis_ranges() {
        let b = Binomial::new(10, 0.5).unwrap();
        let ((x_lo, x_hi), (y_lo, y_hi)) = axis_ranges(&b);
        assert_eq!((x_lo, x_hi), (-0.5, 10.5));
        assert_eq!(y_lo, 0.0);
        let peak = b.point_probability(5).unwrap();
        assert!((y_hi - peak * 1.1).abs() < 1e-15);
    }

    #[test]
    fn test_caption() {
        let b = Binomial::new(10, 0.25).unwrap();
        assert_eq!(caption(&b), "n = 10, π = 0.25");
    }

    #[test]
    fn test_render_every_kind_png_and_svg() {
        let dir = tmp_dir("all_kinds");
        let b = Binomial::new(12, 0.35).unwrap();
        let options = ChartOptions {
            width: 400,
            height: 300,
        };
        for kind in ChartKind::ALL {
            for ext in ["png", "svg"] {
                let path = dir.join(format!("{kind}.{ext}"));
                render_chart(&b, kind, &path, options)
                    .unwrap_or_else(|e| panic!("{kind} {ext}: {e}"));
                let len = std::fs::metadata(&path).unwrap().len();
                assert!(len > 0, "{} is empty", path.display());
            }
        }
        let svg = std::fs::read_to_string(dir.join("bar.svg")).unwrap();
        assert!(svg.contains("<svg"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_render_into_file_path_fails() {
        let dir = tmp_dir("blocked");
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();

        let b = Binomial::new(5, 0.5).unwrap();
        let err = render_chart(
            &b,
            ChartKind::Bar,
            &blocker.join("chart.png"),
            ChartOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Io(_)), "{err}");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
