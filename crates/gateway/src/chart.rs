//! Layout of the confidence bar chart, rendered as inline SVG by the page template.

use schema::ChartPoint;
use serde::Serialize;

pub const TITLE: &str = "Prediction Confidence Comparison";
pub const X_LABEL: &str = "Models";
pub const Y_LABEL: &str = "Confidence";

/// Blue, orange, green
const COLORS: [&str; 3] = ["#1f77b4", "#ff7f0e", "#2ca02c"];

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const BAR_FILL: f64 = 0.6;
const TICK_STEPS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub model: String,
    /// Confidence with two decimals
    pub value: String,
    pub color: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub center: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub label: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub width: f64,
    pub height: f64,
    pub plot_left: f64,
    pub plot_right: f64,
    pub plot_top: f64,
    pub plot_bottom: f64,
    pub bars: Vec<Bar>,
    pub ticks: Vec<Tick>,
}

/// Lay out one bar per model. The y axis always spans `[0, 1]`; values
/// outside it are drawn clipped but labelled with their real value.
pub fn bar_chart(series: &[ChartPoint]) -> Option<BarChart> {
    if series.is_empty() {
        return None;
    }

    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let plot_bottom = MARGIN_TOP + plot_height;
    let slot = plot_width / series.len() as f64;
    let bar_width = slot * BAR_FILL;

    let bars = series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let height = plot_height * f64::from(point.confidence).clamp(0.0, 1.0);
            let x = MARGIN_LEFT + slot * i as f64 + (slot - bar_width) / 2.0;
            Bar {
                model: point.model.clone(),
                value: format!("{:.2}", point.confidence),
                color: COLORS[i % COLORS.len()],
                x,
                y: plot_bottom - height,
                width: bar_width,
                height,
                center: x + bar_width / 2.0,
            }
        })
        .collect();

    let ticks = (0..=TICK_STEPS)
        .map(|step| {
            let value = step as f64 / TICK_STEPS as f64;
            Tick {
                label: format!("{value:.1}"),
                y: plot_bottom - plot_height * value,
            }
        })
        .collect();

    Some(BarChart {
        title: TITLE,
        x_label: X_LABEL,
        y_label: Y_LABEL,
        width: WIDTH,
        height: HEIGHT,
        plot_left: MARGIN_LEFT,
        plot_right: WIDTH - MARGIN_RIGHT,
        plot_top: MARGIN_TOP,
        plot_bottom,
        bars,
        ticks,
    })
}
