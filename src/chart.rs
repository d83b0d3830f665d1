use crate::dataset::{Dataset, Record, format_value};
use chrono::NaiveDate;
use serde::Serialize;

/// Line colors, assigned by series column position and reused cyclically
pub const PALETTE: [&str; 7] = [
    "#3366cc", "#dc3912", "#ff9900", "#109618", "#990099", "#3b3eac", "#0099c6",
];

const FONT_FAMILY: &str = "Helvetica, sans-serif";
const TEXT_COLOR: &str = "#2b2b2b";
const GRID_COLOR: &str = "#eaeaea";
const BACKGROUND: &str = "#fafafa";

/// Configuration options for chart generation
///
/// Only the axis titles are configurable; every other presentation
/// parameter is fixed.
#[derive(Clone, Debug)]
pub struct ChartStyle {
    /// Title of the date axis
    pub x_label: String,

    /// Title of the count axis
    pub y_label: String,
}

impl Default for ChartStyle {
    /// Creates the default Turkish axis titles
    ///
    /// # Returns
    /// * `ChartStyle` - "Tarih" for the x-axis and "Toplam Yolcu Sayısı"
    ///   (total passengers) for the y-axis
    fn default() -> Self {
        Self {
            x_label: "Tarih".to_string(),
            y_label: "Toplam Yolcu Sayısı".to_string(),
        }
    }
}

/// A complete Plotly figure: `Plotly.react(el, spec.data, spec.layout)`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl ChartSpec {
    pub fn series_count(&self) -> usize {
        self.data.len()
    }
}

/// One plotted series (a Plotly scatter trace)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub name: String,
    pub x: Vec<NaiveDate>,
    /// `None` is sent as `null` and drawn as a gap
    pub y: Vec<Option<f64>>,
    pub text: Vec<String>,
    pub hoverinfo: &'static str,
    pub marker: Marker,
    pub line: Line,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub size: u32,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Line {
    pub color: &'static str,
    pub width: u32,
    pub dash: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Font {
    pub family: &'static str,
    pub size: u32,
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
    pub font: Font,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickformat: Option<&'static str>,
    pub tickfont: Font,
    pub gridcolor: &'static str,
    pub zeroline: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Legend {
    pub orientation: &'static str,
    pub yanchor: &'static str,
    pub y: f64,
    pub xanchor: &'static str,
    pub x: f64,
    pub font: Font,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HoverLabel {
    pub bgcolor: &'static str,
    pub font: Font,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub margin: Margin,
    pub plot_bgcolor: &'static str,
    pub paper_bgcolor: &'static str,
    pub legend: Legend,
    pub hovermode: &'static str,
    pub hoverlabel: HoverLabel,
}

/// Palette entry for the series column at `index`
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Builds the chart for one institution
///
/// Rows are filtered by institution and kept in table order. Each series
/// column of the dataset schema becomes one trace, colored by its position.
///
/// # Arguments
/// * `dataset` - The loaded table
/// * `institution` - Institution to plot; normally a `Selection`
/// * `style` - Axis titles
///
/// # Returns
/// * `ChartSpec` - Zero traces when no row matches `institution`, one trace
///   per series column otherwise
pub fn build(dataset: &Dataset, institution: &str, style: &ChartStyle) -> ChartSpec {
    let rows: Vec<&Record> = dataset.rows_for(institution).collect();

    let data = if rows.is_empty() {
        Vec::new()
    } else {
        dataset
            .schema()
            .series
            .iter()
            .enumerate()
            .map(|(column, name)| trace(name, column, &rows))
            .collect()
    };

    ChartSpec {
        data,
        layout: layout(style),
    }
}

fn trace(name: &str, column: usize, rows: &[&Record]) -> Trace {
    let y: Vec<Option<f64>> = rows
        .iter()
        .map(|r| r.counts.get(column).copied().flatten())
        .collect();
    let text = y
        .iter()
        .map(|value| match value {
            Some(v) => format!("{name}: {}", format_value(*v)),
            None => format!("{name}: -"),
        })
        .collect();

    Trace {
        kind: "scatter",
        mode: "lines+markers",
        name: name.to_string(),
        x: rows.iter().map(|r| r.date).collect(),
        y,
        text,
        hoverinfo: "x+y+name",
        marker: Marker {
            size: 7,
            opacity: 0.5,
        },
        line: Line {
            color: color_for(column),
            width: 2,
            dash: "dot",
        },
    }
}

fn font(size: u32) -> Font {
    Font {
        family: FONT_FAMILY,
        size,
        color: TEXT_COLOR,
    }
}

fn axis(title: &str, kind: &'static str, tickformat: Option<&'static str>) -> Axis {
    Axis {
        title: AxisTitle {
            text: title.to_string(),
            font: font(18),
        },
        kind,
        tickformat,
        tickfont: font(12),
        gridcolor: GRID_COLOR,
        zeroline: false,
    }
}

fn layout(style: &ChartStyle) -> Layout {
    Layout {
        xaxis: axis(&style.x_label, "date", Some("%d %b %Y")),
        yaxis: axis(&style.y_label, "linear", None),
        margin: Margin {
            l: 50,
            r: 50,
            t: 70,
            b: 50,
        },
        plot_bgcolor: BACKGROUND,
        paper_bgcolor: BACKGROUND,
        legend: Legend {
            orientation: "h",
            yanchor: "bottom",
            y: 1.02,
            xanchor: "right",
            x: 1.0,
            font: font(12),
        },
        hovermode: "x unified",
        hoverlabel: HoverLabel {
            bgcolor: "#ffffff",
            font: font(14),
        },
    }
}
