//! SVG chart files rendered with Plotters.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::debug;

use crate::domain::Series;
use crate::error::SeriesError;
use crate::plot::{ChartConfig, decimal_year, line_segments, pad_range, value_range, year_range};

/// `<name>.svg`, unless `name` already carries the extension.
pub fn svg_path(name: &str) -> PathBuf {
    if name.ends_with(".svg") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.svg"))
    }
}

pub fn write_svg_chart(series: &Series, config: &ChartConfig, path: &Path) -> Result<(), SeriesError> {
    let (x0, x1) = year_range(series).unwrap_or((2000.0, 2001.0));
    let (y0, y1) = value_range(series).unwrap_or((0.0, 1.0));
    let (y0, y1) = pad_range(y0, y1, 0.05);

    let title = if series.meta().title.is_empty() {
        series.id().to_string()
    } else {
        series.meta().title.clone()
    };
    let interval = f64::from(config.year_tick_interval.max(1));
    let x_ticks = ((x1 - x0) / interval).ceil() as usize + 1;

    let root = SVGBackend::new(path, config.svg_size).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(x_ticks.max(2))
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_desc(series.meta().units.as_str())
        .draw()
        .map_err(draw_error)?;

    if let Some(bands) = &series.derived().recessions {
        let shade = RGBColor(190, 190, 190).mix(0.5).filled();
        chart
            .draw_series(bands.iter().map(|band| {
                Rectangle::new([(decimal_year(band.start), y0), (decimal_year(band.end), y1)], shade)
            }))
            .map_err(draw_error)?;
    }

    let style = BLUE.stroke_width(config.line_width);
    for segment in line_segments(series) {
        chart
            .draw_series(LineSeries::new(segment, style))
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;
    debug!(series = series.id(), path = %path.display(), "wrote chart");
    Ok(())
}

fn draw_error(e: impl Display) -> SeriesError {
    SeriesError::Io(format!("failed to draw chart: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecessionBand, SeriesMeta};
    use chrono::NaiveDate;

    #[test]
    fn svg_extension_is_added_once() {
        assert_eq!(svg_path("gdp"), PathBuf::from("gdp.svg"));
        assert_eq!(svg_path("out/gdp.svg"), PathBuf::from("out/gdp.svg"));
    }

    #[test]
    fn writes_svg_with_line_and_bands() {
        let dates = (0..12)
            .map(|i| NaiveDate::from_ymd_opt(2000 + i, 1, 1).unwrap())
            .collect();
        let values = (0..12).map(|i| f64::from(i).sin()).collect();
        let mut s = Series::new("S", dates, values, SeriesMeta::default()).unwrap();
        s.derived_mut().recessions = Some(vec![RecessionBand {
            start: NaiveDate::from_ymd_opt(2001, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2001, 11, 1).unwrap(),
        }]);

        let path = std::env::temp_dir().join(format!("fred-series-chart-{}.svg", std::process::id()));
        write_svg_chart(&s, &ChartConfig::default(), &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(svg.contains("<svg"));
        assert!(svg.contains("<polyline"));
    }
}
