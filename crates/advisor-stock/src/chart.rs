//! SVG price chart rendering
//!
//! Renders the daily close series with the 50/200-day moving averages and
//! the Bollinger band envelope. Output is an SVG document as a string so
//! the server can embed it in a JSON response and the CLI can write it to
//! a file without any image encoding dependencies.

use plotters::prelude::*;
use ta::indicators::{BollingerBands, SimpleMovingAverage};
use ta::Next;

use crate::error::{AdvisorError, Result};
use crate::snapshot::{
    MarketSnapshot, BOLLINGER_MULTIPLIER, BOLLINGER_WINDOW, MA_LONG_WINDOW, MA_SHORT_WINDOW,
};

/// Chart dimensions in pixels
pub const CHART_WIDTH: u32 = 960;
pub const CHART_HEIGHT: u32 = 540;

const BAND_COLOR: RGBColor = RGBColor(255, 165, 0);
const FILL_COLOR: RGBColor = RGBColor(160, 160, 160);

/// Render the price chart for a snapshot as an SVG document
pub fn render_price_chart(snapshot: &MarketSnapshot) -> Result<String> {
    let closes: Vec<f64> = snapshot.history.iter().map(|bar| bar.close).collect();
    if closes.len() < 2 {
        return Err(AdvisorError::ChartError(
            "At least two data points are required".to_string(),
        ));
    }

    let ma50 = rolling_sma(&closes, MA_SHORT_WINDOW)?;
    let ma200 = rolling_sma(&closes, MA_LONG_WINDOW)?;
    let bands = rolling_bollinger(&closes, BOLLINGER_WINDOW, BOLLINGER_MULTIPLIER)?;

    let (y_min, y_max) = value_range(&closes, &bands);
    let x_max = (closes.len() - 1) as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(to_chart_error)?;

        let caption = format!("{} Stock Price and Technical Indicators", snapshot.symbol);
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(64)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)
            .map_err(to_chart_error)?;

        chart
            .configure_mesh()
            .x_desc("Trading day")
            .y_desc("Price (USD)")
            .draw()
            .map_err(to_chart_error)?;

        // Bollinger envelope: upper band forward, lower band reversed
        if !bands.is_empty() {
            let mut envelope: Vec<(f64, f64)> = bands
                .iter()
                .map(|&(i, upper, _)| (i as f64, upper))
                .collect();
            envelope.extend(bands.iter().rev().map(|&(i, _, lower)| (i as f64, lower)));
            chart
                .draw_series(std::iter::once(Polygon::new(envelope, FILL_COLOR.mix(0.3))))
                .map_err(to_chart_error)?;

            chart
                .draw_series(LineSeries::new(
                    bands.iter().map(|&(i, upper, _)| (i as f64, upper)),
                    &BAND_COLOR,
                ))
                .map_err(to_chart_error)?
                .label("Upper Bollinger Band")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BAND_COLOR));

            chart
                .draw_series(LineSeries::new(
                    bands.iter().map(|&(i, _, lower)| (i as f64, lower)),
                    &BAND_COLOR,
                ))
                .map_err(to_chart_error)?
                .label("Lower Bollinger Band")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BAND_COLOR));
        }

        chart
            .draw_series(LineSeries::new(
                closes.iter().enumerate().map(|(i, &c)| (i as f64, c)),
                &BLUE,
            ))
            .map_err(to_chart_error)?
            .label("Close Price")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));

        if !ma50.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    ma50.iter().map(|&(i, v)| (i as f64, v)),
                    &GREEN,
                ))
                .map_err(to_chart_error)?
                .label("50-day MA")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], GREEN));
        }

        if !ma200.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    ma200.iter().map(|&(i, v)| (i as f64, v)),
                    &RED,
                ))
                .map_err(to_chart_error)?
                .label("200-day MA")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(to_chart_error)?;

        root.present().map_err(to_chart_error)?;
    }

    Ok(svg)
}

/// Rolling SMA series as (index, value), empty when the window exceeds history
fn rolling_sma(closes: &[f64], window: usize) -> Result<Vec<(usize, f64)>> {
    if closes.len() < window {
        return Ok(Vec::new());
    }

    let mut indicator = SimpleMovingAverage::new(window)
        .map_err(|e| AdvisorError::IndicatorError(e.to_string()))?;
    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &close)| (i, indicator.next(close)))
        .skip(window - 1)
        .collect())
}

/// Rolling Bollinger series as (index, upper, lower)
fn rolling_bollinger(
    closes: &[f64],
    window: usize,
    multiplier: f64,
) -> Result<Vec<(usize, f64, f64)>> {
    if closes.len() < window {
        return Ok(Vec::new());
    }

    let mut indicator = BollingerBands::new(window, multiplier)
        .map_err(|e| AdvisorError::IndicatorError(e.to_string()))?;
    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let output = indicator.next(close);
            (i, output.upper, output.lower)
        })
        .skip(window - 1)
        .collect())
}

/// Padded y-axis range over closes and band extremes
fn value_range(closes: &[f64], bands: &[(usize, f64, f64)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for &close in closes {
        min = min.min(close);
        max = max.max(close);
    }
    for &(_, upper, lower) in bands {
        min = min.min(lower);
        max = max.max(upper);
    }

    let padding = ((max - min) * 0.05).max(1.0);
    (min - padding, max + padding)
}

fn to_chart_error<E: std::fmt::Display>(err: E) -> AdvisorError {
    AdvisorError::ChartError(err.to_string())
}
