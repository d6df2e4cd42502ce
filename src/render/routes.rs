use std::ops::Range;

use plotters::{coord::Shift, prelude::*};
use tracing::info;

use super::{
    bounds, draw_text_box, into_render_error, padded, DrawResult, RenderOptions, CAPTION_FONT, TITLE_FONT,
};
use crate::cvrp::{
    problem::{NodeCoordinate, Problem, DEPOT},
    solution::Solution,
    stats::RouteStatistics,
    Error, Result,
};

const CUSTOMER_FILL: RGBColor = RGBColor(173, 216, 230);
const CUSTOMER_EDGE: RGBColor = RGBColor(0, 0, 139);
const STATS_BACKGROUND: RGBColor = RGBColor(144, 238, 144);

/// Pixels taken from the map area by its margin, caption and axis labels.
const MAP_INSET: (u32, u32) = (2 * 20 + 50, 2 * 20 + 40 + 40);
/// Arrow head length as a share of the visible x range.
const ARROW_HEAD: f64 = 0.015;
/// Where along a leg its direction arrow points to.
const ARROW_AT: f64 = 0.7;

/// Draws the route map next to per-route bar charts and a statistics box.
pub fn render_routes(problem: &Problem, solution: &Solution, options: &RenderOptions) -> Result<()> {
    options.check_size()?;
    let depot = *problem.depot().ok_or(Error::MissingDepot)?;
    let stats = RouteStatistics::compute(problem, solution)?;

    draw(problem, solution, &stats, depot, options).map_err(into_render_error)?;

    info!(output = %options.output.display(), routes = stats.route_count(), "route visualization saved");

    Ok(())
}

fn draw(
    problem: &Problem,
    solution: &Solution,
    stats: &RouteStatistics,
    depot: NodeCoordinate,
    options: &RenderOptions,
) -> DrawResult<()> {
    let root = BitMapBackend::new(&options.output, options.size).into_drawing_area();
    root.fill(&WHITE)?;

    let area = root.titled(
        "CVRP Solution Visualization - Vehicle Routing Result",
        TITLE_FONT.into_font(),
    )?;
    let (left, right) = area.split_horizontally((55).percent_width());

    draw_route_map(&left, problem, solution, depot)?;

    let panels = right.split_evenly((3, 1));
    let customers: Vec<f64> = stats.customers.iter().map(|&c| c as f64).collect();
    draw_bars(&panels[0], "Route Lengths", "Route Length", &stats.lengths)?;
    draw_bars(&panels[1], "Customers per Route", "Number of Customers", &customers)?;
    draw_text_box(&panels[2], &stats.summary(), STATS_BACKGROUND)?;

    root.present()?;

    Ok(())
}

fn draw_route_map<B: DrawingBackend>(
    area: &DrawingArea<B, Shift>,
    problem: &Problem,
    solution: &Solution,
    depot: NodeCoordinate,
) -> DrawResult<()>
where
    B::ErrorType: 'static,
{
    let coordinates = &problem.coordinates;
    let (x_min, x_max) = bounds(coordinates.values().map(|n| n.x)).unwrap_or((depot.x, depot.x));
    let (y_min, y_max) = bounds(coordinates.values().map(|n| n.y)).unwrap_or((depot.y, depot.y));

    let (width, height) = area.dim_in_pixel();
    let plot_pixels = (
        width.saturating_sub(MAP_INSET.0).max(1),
        height.saturating_sub(MAP_INSET.1).max(1),
    );
    let (x_range, y_range) = equal_aspect(padded(x_min, x_max), padded(y_min, y_max), plot_pixels);
    let head = (x_range.end - x_range.start) * ARROW_HEAD;

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!(
                "CVRP Solution: {} Vehicle Routes, Total Cost: {:.2}",
                solution.routes.len(),
                solution.cost
            ),
            CAPTION_FONT.into_font(),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("X Coordinate")
        .y_desc("Y Coordinate")
        .draw()?;

    for (idx, route) in solution.routes.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.7);

        // Nodes without a coordinate are left out of the drawn path
        let path: Vec<(f64, f64)> = std::iter::once(&depot)
            .chain(route.iter().filter_map(|id| coordinates.get(id)))
            .chain(std::iter::once(&depot))
            .map(|&n| n.into())
            .collect();

        chart.draw_series(LineSeries::new(path.iter().copied(), color.stroke_width(3)))?;
        chart.draw_series(
            path.windows(2)
                .filter_map(|leg| arrow_head(leg[0], leg[1], head))
                .map(|points| Polygon::new(points.to_vec(), color.filled())),
        )?;
    }

    chart
        .draw_series(
            coordinates
                .iter()
                .filter(|(id, _)| **id != DEPOT)
                .map(|(_, n)| Circle::new((n.x, n.y), 5, CUSTOMER_FILL.filled())),
        )?
        .label("Customers")
        .legend(|(x, y)| Circle::new((x, y), 5, CUSTOMER_FILL.filled()));

    chart.draw_series(
        coordinates
            .iter()
            .filter(|(id, _)| **id != DEPOT)
            .map(|(_, n)| Circle::new((n.x, n.y), 5, CUSTOMER_EDGE.stroke_width(1))),
    )?;

    chart
        .draw_series(std::iter::once(TriangleMarker::new((depot.x, depot.y), 14, RED.filled())))?
        .label("Depot")
        .legend(|(x, y)| TriangleMarker::new((x, y), 7, RED.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

/// One bar per route, colored like the route on the map, plus the average.
fn draw_bars<B: DrawingBackend>(
    area: &DrawingArea<B, Shift>,
    caption: &str,
    y_desc: &str,
    values: &[f64],
) -> DrawResult<()>
where
    B::ErrorType: 'static,
{
    let slots = values.len().max(1) as f64;
    let top = values.iter().copied().fold(0.0, f64::max);
    let top = if top > 0.0 { top * 1.15 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .caption(caption, CAPTION_FONT.into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.5..slots + 0.5, 0.0..top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Route ID")
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(idx, &value)| {
        let x = (idx + 1) as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, value)], Palette99::pick(idx).mix(0.7).filled())
    }))?;

    if !values.is_empty() {
        let average = values.iter().sum::<f64>() / values.len() as f64;

        chart
            .draw_series(LineSeries::new(
                vec![(0.5, average), (slots + 0.5, average)],
                RED.stroke_width(2),
            ))?
            .label(format!("Avg: {:.1}", average))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

/// Widens one of the ranges so a unit on x and a unit on y take the same
/// number of pixels.
fn equal_aspect(x: Range<f64>, y: Range<f64>, pixels: (u32, u32)) -> (Range<f64>, Range<f64>) {
    let (width, height) = (pixels.0 as f64, pixels.1 as f64);
    let x_span = x.end - x.start;
    let y_span = y.end - y.start;

    if x_span / y_span < width / height {
        let grow = (y_span * width / height - x_span) / 2.0;
        (x.start - grow..x.end + grow, y)
    } else {
        let grow = (x_span * height / width - y_span) / 2.0;
        (x, y.start - grow..y.end + grow)
    }
}

/// Triangle pointing along the leg `from -> to`, its tip at `ARROW_AT` of the
/// leg. `None` when the leg has no length.
fn arrow_head(from: (f64, f64), to: (f64, f64), length: f64) -> Option<[(f64, f64); 3]> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let norm = dx.hypot(dy);
    if norm <= f64::EPSILON {
        return None;
    }

    let (ux, uy) = (dx / norm, dy / norm);
    let tip = (from.0 + dx * ARROW_AT, from.1 + dy * ARROW_AT);
    let base = (tip.0 - ux * length, tip.1 - uy * length);
    let half = length / 2.0;

    Some([
        tip,
        (base.0 - uy * half, base.1 + ux * half),
        (base.0 + uy * half, base.1 - ux * half),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_aspect_widens_the_narrow_axis() {
        let (x, y) = equal_aspect(0.0..10.0, 0.0..10.0, (200, 100));
        assert_eq!(x, -5.0..15.0);
        assert_eq!(y, 0.0..10.0);

        let (x, y) = equal_aspect(0.0..40.0, 0.0..10.0, (100, 100));
        assert_eq!(x, 0.0..40.0);
        assert_eq!(y, -15.0..25.0);
    }

    #[test]
    fn arrow_points_along_the_leg() {
        let [tip, left, right] = arrow_head((0.0, 0.0), (10.0, 0.0), 2.0).unwrap();

        assert_eq!(tip, (7.0, 0.0));
        assert_eq!(left, (5.0, 1.0));
        assert_eq!(right, (5.0, -1.0));
    }

    #[test]
    fn zero_length_leg_has_no_arrow() {
        assert_eq!(arrow_head((3.0, 4.0), (3.0, 4.0), 1.0), None);
    }
}
