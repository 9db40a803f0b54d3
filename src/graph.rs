use crate::ir::{Figure, Visual};
use crate::scale::build_scales;
use crate::stats::SummaryStatistics;
use crate::transform::BoxStats;
use crate::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Bar width as a fraction of one category slot
const BAR_WIDTH: f64 = 0.8;

/// Box width as a fraction of the boxplot's x range
const BOX_WIDTH: f64 = 0.5;

const HEADER_FILL: RGBColor = RGBColor(230, 230, 230);

/// Rasterize a figure as PNG or SVG bytes, per `options.format`.
pub fn render(figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
    options.validate()?;
    match options.format {
        OutputFormat::Png => render_png(figure, options),
        OutputFormat::Svg => render_svg(figure, options),
    }
}

fn render_png(figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
    let (width, height) = (options.width, options.height);
    let size = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .with_context(|| format!("Canvas {}x{} is too large", width, height))?;
    let mut buffer = vec![0u8; size];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, figure, options)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn render_svg(figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        draw_figure(&root, figure, options)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg.into_bytes())
}

/// Lay out the figure: visual on top, statistics table below when present.
fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, figure: &Figure, options: &RenderOptions) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    match &figure.summary {
        Some(summary) => {
            let (_, height) = root.dim_in_pixel();
            let (top, bottom) = root.split_vertically(height * 3 / 4);
            draw_visual(&top, figure, options)?;
            draw_table(&bottom, summary)?;
        }
        None => draw_visual(root, figure, options)?,
    }

    Ok(())
}

fn draw_visual<DB>(area: &DrawingArea<DB, Shift>, figure: &Figure, options: &RenderOptions) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let scales = build_scales(&figure.visual);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(&figure.title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(scales.x.min..scales.x.max, scales.y.min..scales.y.max)
        .context("Failed to build chart")?;

    // Category axes label integer positions only
    let categories = scales.x.categories.clone().unwrap_or_default();
    let category_label = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        categories.get(idx as usize).cloned().unwrap_or_default()
    };

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str());
    if scales.x.is_categorical() {
        mesh.disable_x_mesh()
            .x_labels(categories.len().max(2))
            .x_label_formatter(&category_label);
    }
    mesh.draw().context("Failed to draw mesh")?;

    let fill = parse_color(&options.fill_color);
    let edge = parse_color(&options.edge_color);

    match &figure.visual {
        Visual::Histogram(bins) => {
            let bars = bins.counts.iter().enumerate().map(|(i, &count)| {
                [(bins.edges[i], 0.0), (bins.edges[i + 1], count as f64)]
            });
            chart
                .draw_series(bars.clone().map(|corners| Rectangle::new(corners, fill.filled())))
                .context("Failed to draw histogram bars")?;
            chart
                .draw_series(bars.map(|corners| Rectangle::new(corners, edge.stroke_width(1))))
                .context("Failed to draw histogram edges")?;
        }
        Visual::Density(curve) => {
            let points: Vec<(f64, f64)> = curve
                .grid
                .iter()
                .copied()
                .zip(curve.density.iter().copied())
                .collect();
            chart
                .draw_series(
                    AreaSeries::new(points, 0.0, fill.mix(0.3)).border_style(fill.stroke_width(2)),
                )
                .context("Failed to draw density curve")?;
        }
        Visual::Bars(bars) => {
            let half = BAR_WIDTH / 2.0;
            chart
                .draw_series(bars.heights.iter().enumerate().map(|(i, &h)| {
                    let x = i as f64;
                    Rectangle::new([(x - half, 0.0), (x + half, h)], fill.filled())
                }))
                .context("Failed to draw bars")?;
        }
        Visual::Points(points) => {
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 3, fill.mix(0.7).filled())))
                .context("Failed to draw point series")?;
        }
        Visual::Trace(points) => {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), fill.stroke_width(1)))
                .context("Failed to draw line series")?;
        }
        Visual::Boxplot(stats) => {
            let geom = compute_boxplot_geometry(0.0, BOX_WIDTH, stats);

            // z-order: whiskers and caps, box, median, outliers
            let whiskers = [geom.lower_whisker, geom.upper_whisker, geom.min_cap, geom.max_cap];
            chart
                .draw_series(
                    whiskers
                        .into_iter()
                        .map(|line| PathElement::new(line, edge.stroke_width(2))),
                )
                .context("Failed to draw whiskers")?;
            chart
                .draw_series([
                    Rectangle::new([geom.box_tl, geom.box_br], fill.filled()),
                    Rectangle::new([geom.box_tl, geom.box_br], edge.stroke_width(1)),
                ])
                .context("Failed to draw box")?;
            chart
                .draw_series(std::iter::once(PathElement::new(geom.median_line, WHITE.stroke_width(2))))
                .context("Failed to draw median")?;
            chart
                .draw_series(
                    geom.outlier_points
                        .into_iter()
                        .map(|p| Circle::new(p, 3, edge.stroke_width(1))),
                )
                .context("Failed to draw outliers")?;
        }
    }

    Ok(())
}

/// Draw the summary table centred in `area`: header row, then one row per attribute.
fn draw_table<DB>(area: &DrawingArea<DB, Shift>, summary: &SummaryStatistics) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut lines = vec![summary.header()];
    lines.extend(summary.table_rows());

    let (width, height) = area.dim_in_pixel();
    let columns = lines[0].len() as i32;
    let margin = 20;
    let cell_w = ((width as i32 - 2 * margin) / columns).max(1);
    let cell_h = ((height as i32) / (lines.len() as i32 + 1)).clamp(1, 30);
    let top = (height as i32 - cell_h * lines.len() as i32) / 2;

    let style = TextStyle::from(("sans-serif", 13).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for (r, line) in lines.iter().enumerate() {
        let y0 = top + r as i32 * cell_h;
        for (c, cell) in line.iter().enumerate() {
            let x0 = margin + c as i32 * cell_w;
            let corners = [(x0, y0), (x0 + cell_w, y0 + cell_h)];
            // the corner cell above the attribute names stays blank and unboxed
            if r == 0 && c == 0 {
                continue;
            }
            if r == 0 {
                area.draw(&Rectangle::new(corners, HEADER_FILL.filled()))
                    .context("Failed to draw table header")?;
            }
            area.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))
                .context("Failed to draw table cell")?;
            area.draw(&Text::new(
                cell.as_str(),
                (x0 + cell_w / 2, y0 + cell_h / 2),
                style.clone(),
            ))
            .context("Failed to draw table text")?;
        }
    }

    Ok(())
}

/// Computed geometry for a vertical boxplot, expressed as primitive shapes
struct BoxplotGeometry {
    lower_whisker: Vec<(f64, f64)>,
    upper_whisker: Vec<(f64, f64)>,
    min_cap: Vec<(f64, f64)>,
    max_cap: Vec<(f64, f64)>,
    box_tl: (f64, f64),
    box_br: (f64, f64),
    median_line: Vec<(f64, f64)>,
    outlier_points: Vec<(f64, f64)>,
}

fn compute_boxplot_geometry(x: f64, width: f64, stats: &BoxStats) -> BoxplotGeometry {
    let half_width = width / 2.0;
    let cap_half = width * 0.2;

    BoxplotGeometry {
        lower_whisker: vec![(x, stats.lower_whisker), (x, stats.q1)],
        upper_whisker: vec![(x, stats.q3), (x, stats.upper_whisker)],
        min_cap: vec![(x - cap_half, stats.lower_whisker), (x + cap_half, stats.lower_whisker)],
        max_cap: vec![(x - cap_half, stats.upper_whisker), (x + cap_half, stats.upper_whisker)],
        box_tl: (x - half_width, stats.q3),
        box_br: (x + half_width, stats.q1),
        median_line: vec![(x - half_width, stats.median), (x + half_width, stats.median)],
        outlier_points: stats.outliers.iter().map(|&v| (x, v)).collect(),
    }
}

/// Parse color name to RGBColor
pub fn parse_color(color: &str) -> RGBColor {
    match color.trim().to_ascii_lowercase().as_str() {
        "red" => RED,
        "green" => GREEN,
        "blue" => BLUE,
        "black" => BLACK,
        "yellow" => YELLOW,
        "cyan" => CYAN,
        "magenta" => MAGENTA,
        "white" => WHITE,
        _ => BLUE, // default
    }
}
