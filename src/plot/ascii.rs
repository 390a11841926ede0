//! Terminal chart for a series.
//!
//! Fixed-size character grid, deterministic so it can be golden-tested:
//! - the series: `*`
//! - recession columns: `:`
//! - x axis: `+` at each tick year, labelled underneath

use crate::domain::Series;
use crate::plot::{ChartConfig, decimal_year, line_segments, pad_range, value_range, year_range};

pub fn render_series_chart(series: &Series, config: &ChartConfig) -> String {
    let title = if series.meta().title.is_empty() {
        series.id()
    } else {
        series.meta().title.as_str()
    };
    let (Some((x_min, x_max)), Some((y_min, y_max))) = (year_range(series), value_range(series)) else {
        return format!("Plot: {title} (no data)\n");
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let width = config.width.max(10);
    let height = config.height.max(5);
    let mut grid = vec![vec![' '; width]; height];

    // Shade first so the line overlays it.
    if let Some(bands) = &series.derived().recessions {
        for band in bands {
            let c0 = map_x(decimal_year(band.start), x_min, x_max, width);
            let c1 = map_x(decimal_year(band.end), x_min, x_max, width);
            for row in grid.iter_mut() {
                row[c0..=c1].iter_mut().for_each(|cell| *cell = ':');
            }
        }
    }

    for segment in line_segments(series) {
        let mut prev = None;
        for (x, y) in segment {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            match prev {
                Some((c0, r0)) => draw_line(&mut grid, c0, r0, col, row, '*'),
                None => grid[row][col] = '*',
            }
            prev = Some((col, row));
        }
    }

    let mut out = format!(
        "Plot: {title} [{}] | {} | y=[{y_min:.2}, {y_max:.2}]\n",
        series.meta().units,
        series.meta().date_range
    );
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let (axis, labels) = x_axis(x_min, x_max, width, config.year_tick_interval);
    out.push_str(&axis);
    out.push('\n');
    out.push_str(&labels);
    out.push('\n');
    out
}

fn x_axis(x_min: f64, x_max: f64, width: usize, interval: u32) -> (String, String) {
    let interval = i32::try_from(interval.max(1)).unwrap_or(i32::MAX);
    let mut axis = vec!['-'; width];
    let mut labels = String::new();

    for year in (x_min.ceil() as i32)..=(x_max.floor() as i32) {
        if year.rem_euclid(interval) != 0 {
            continue;
        }
        let col = map_x(f64::from(year), x_min, x_max, width);
        axis[col] = '+';
        // Skip labels that would collide with the previous one.
        if labels.chars().count() > col {
            continue;
        }
        while labels.chars().count() < col {
            labels.push(' ');
        }
        labels.push_str(&year.to_string());
    }
    (axis.into_iter().collect(), labels)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
