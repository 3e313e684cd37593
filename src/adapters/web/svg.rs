//! Inline SVG rendering of the chart specs.

use crate::domain::chart::{BarEntry, BoxSeries, ScatterSpec};
use crate::domain::stats::VolatilityTrendPoint;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 260.0;
const PADDING: f64 = 48.0;

fn svg_open() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {:.0} {:.0}" width="{:.0}" height="{:.0}">"#,
        WIDTH, HEIGHT, WIDTH, HEIGHT
    )
}

fn axes() -> String {
    format!(
        r##"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="#4b5563"/><line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="#4b5563"/>"##,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    )
}

/// Volatility trend line. Dates with an undefined stddev break the
/// polyline, leaving a visible gap.
pub fn trend_line_svg(trend: &[VolatilityTrendPoint]) -> String {
    let defined: Vec<f64> = trend.iter().filter_map(|p| p.volatility).collect();
    if defined.is_empty() {
        return r#"<p class="placeholder">not enough data</p>"#.to_string();
    }

    let min = defined.iter().copied().fold(f64::INFINITY, f64::min);
    let max = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let scale_y = if range > 0.0 {
        (HEIGHT - 2.0 * PADDING) / range
    } else {
        1.0
    };
    let scale_x = if trend.len() > 1 {
        (WIDTH - 2.0 * PADDING) / (trend.len() - 1) as f64
    } else {
        0.0
    };

    let mut svg = svg_open();
    svg.push_str(&axes());

    let mut segment: Vec<String> = Vec::new();
    let mut flush = |segment: &mut Vec<String>, svg: &mut String| {
        if segment.len() > 1 {
            svg.push_str(&format!(
                r##"<polyline fill="none" stroke="#22c55e" stroke-width="2.5" points="{}"/>"##,
                segment.join(" ")
            ));
        } else if segment.len() == 1 {
            // Isolated point: draw a dot so a lone date is still visible.
            let (x, y) = segment[0].split_once(',').unwrap_or(("0", "0"));
            svg.push_str(&format!(
                r##"<circle cx="{}" cy="{}" r="3" fill="#22c55e"/>"##,
                x, y
            ));
        }
        segment.clear();
    };

    for (i, point) in trend.iter().enumerate() {
        match point.volatility {
            Some(v) => {
                let x = PADDING + i as f64 * scale_x;
                let y = HEIGHT - PADDING - (v - min) * scale_y;
                segment.push(format!("{:.1},{:.1}", x, y));
            }
            None => flush(&mut segment, &mut svg),
        }
    }
    flush(&mut segment, &mut svg);

    svg.push_str("</svg>");
    svg
}

/// Horizontal importance bars; callers pass entries already sorted
/// ascending so the strongest driver lands at the top.
pub fn importance_bars_svg(bars: &[BarEntry]) -> String {
    if bars.is_empty() {
        return r#"<p class="placeholder">no feature importances</p>"#.to_string();
    }

    let max = bars
        .iter()
        .map(|b| b.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let row_height = (HEIGHT - 2.0 * PADDING) / bars.len() as f64;
    let bar_height = (row_height * 0.7).min(22.0);
    let plot_width = WIDTH - 2.0 * PADDING - 60.0;

    let mut svg = svg_open();
    // Strongest at the top: iterate the ascending list in reverse.
    for (i, bar) in bars.iter().rev().enumerate() {
        let y = PADDING + i as f64 * row_height;
        let w = if max > 0.0 {
            (bar.value / max) * plot_width
        } else {
            0.0
        };
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="11" fill="#9ca3af" text-anchor="end">{}</text>"##,
            PADDING - 6.0,
            y + bar_height * 0.75,
            bar.label
        ));
        svg.push_str(&format!(
            r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="#3b82f6"/>"##,
            PADDING, y, w, bar_height
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="11" fill="#e5e7eb">{:.4}</text>"##,
            PADDING + w + 6.0,
            y + bar_height * 0.75,
            bar.value
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Box-and-whisker plot of daily PnL per regime.
pub fn box_plot_svg(series: &[BoxSeries]) -> String {
    let nonempty: Vec<&BoxSeries> = series.iter().filter(|s| !s.values.is_empty()).collect();
    if nonempty.is_empty() {
        return r#"<p class="placeholder">not enough data</p>"#.to_string();
    }

    let all_min = nonempty
        .iter()
        .flat_map(|s| &s.values)
        .copied()
        .fold(f64::INFINITY, f64::min);
    let all_max = nonempty
        .iter()
        .flat_map(|s| &s.values)
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let range = all_max - all_min;
    let scale_y = if range > 0.0 {
        (HEIGHT - 2.0 * PADDING) / range
    } else {
        1.0
    };
    let to_y = |v: f64| HEIGHT - PADDING - (v - all_min) * scale_y;

    let slot = (WIDTH - 2.0 * PADDING) / nonempty.len() as f64;
    let box_width = (slot * 0.4).min(60.0);

    let mut svg = svg_open();
    svg.push_str(&axes());
    for (i, s) in nonempty.iter().enumerate() {
        let cx = PADDING + slot * (i as f64 + 0.5);
        let mut sorted = s.values.clone();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        svg.push_str(&format!(
            r##"<line x1="{cx:.1}" y1="{:.1}" x2="{cx:.1}" y2="{:.1}" stroke="#9ca3af"/>"##,
            to_y(max),
            to_y(min)
        ));
        svg.push_str(&format!(
            r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="#1f2937" stroke="#22c55e"/>"##,
            cx - box_width / 2.0,
            to_y(q3),
            box_width,
            (to_y(q1) - to_y(q3)).max(1.0)
        ));
        svg.push_str(&format!(
            r##"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#22c55e" stroke-width="2"/>"##,
            cx - box_width / 2.0,
            cx + box_width / 2.0,
            y = to_y(median)
        ));
        svg.push_str(&format!(
            r##"<text x="{cx:.1}" y="{:.1}" font-size="12" fill="#9ca3af" text-anchor="middle">{}</text>"##,
            HEIGHT - PADDING + 16.0,
            s.label
        ));
    }
    svg.push_str("</svg>");
    svg
}

/// Archetype bubble map: log-scaled x, bubble radius from the size field.
pub fn cluster_scatter_svg(spec: &ScatterSpec) -> String {
    if spec.points.is_empty() {
        return r#"<p class="placeholder">no cluster summary</p>"#.to_string();
    }

    let xs: Vec<f64> = spec
        .points
        .iter()
        .map(|p| if spec.log_x { p.x.max(1e-9).log10() } else { p.x })
        .collect();
    let ys: Vec<f64> = spec.points.iter().map(|p| p.y).collect();
    let sizes: Vec<f64> = spec.points.iter().map(|p| p.size).collect();

    let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let y_min = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let y_max = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let s_max = sizes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let scale_x = if x_max > x_min {
        (WIDTH - 2.0 * PADDING) / (x_max - x_min)
    } else {
        1.0
    };
    let scale_y = if y_max > y_min {
        (HEIGHT - 2.0 * PADDING) / (y_max - y_min)
    } else {
        1.0
    };

    let colors = ["#22c55e", "#3b82f6", "#f59e0b", "#ef4444", "#a855f7"];

    let mut svg = svg_open();
    svg.push_str(&axes());
    for (i, point) in spec.points.iter().enumerate() {
        let x = PADDING + (xs[i] - x_min) * scale_x;
        let y = HEIGHT - PADDING - (ys[i] - y_min) * scale_y;
        // Area-proportional radius keeps large bubbles from swallowing the plot.
        let r = if s_max > 0.0 {
            6.0 + 18.0 * (sizes[i] / s_max).sqrt()
        } else {
            6.0
        };
        let color = colors[i % colors.len()];
        svg.push_str(&format!(
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="{r:.1}" fill="{color}" fill-opacity="0.6" stroke="{color}"/>"#,
        ));
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="{:.1}" font-size="11" fill="#e5e7eb" text-anchor="middle">{}</text>"##,
            y - r - 4.0,
            point.label
        ));
    }
    svg.push_str("</svg>");
    svg
}
