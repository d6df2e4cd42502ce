use plotters::{coord::Shift, prelude::*};
use tracing::info;

use super::{
    bounds, draw_text_box, into_render_error, padded, DrawResult, RenderOptions, CAPTION_FONT, TITLE_FONT,
};
use crate::cvrp::{
    evolution::EvolutionLog,
    stats::EvolutionStatistics,
    Result,
};

const COST: RGBColor = RGBColor(46, 134, 171);
const TEMPERATURE: RGBColor = RGBColor(162, 59, 114);
const COUNTER: RGBColor = RGBColor(241, 143, 1);
const IMPROVEMENT: RGBColor = RGBColor(6, 167, 125);
const REGRESSION: RGBColor = RGBColor(240, 128, 128);
const STATS_BACKGROUND: RGBColor = RGBColor(245, 222, 179);

const ANNOTATION_FONT: (&str, u32) = ("sans-serif", 16);

/// Draws the convergence dashboard for one solver run.
pub fn render_evolution(log: &EvolutionLog, options: &RenderOptions) -> Result<()> {
    options.check_size()?;
    let stats = EvolutionStatistics::compute(log)?;

    draw(log, &stats, options).map_err(into_render_error)?;

    info!(output = %options.output.display(), generations = log.len(), "evolution visualization saved");

    Ok(())
}

fn draw(log: &EvolutionLog, stats: &EvolutionStatistics, options: &RenderOptions) -> DrawResult<()> {
    let root = BitMapBackend::new(&options.output, options.size).into_drawing_area();
    root.fill(&WHITE)?;

    let area = root.titled(
        "CVRP Genetic Algorithm - Dynamic Evolution Visualization",
        TITLE_FONT.into_font(),
    )?;
    let (top, bottom) = area.split_vertically((34).percent_height());
    let cells = bottom.split_evenly((2, 2));

    draw_convergence(&top, log, stats)?;
    draw_line(
        &cells[0],
        "Simulated Annealing: Temperature Decay",
        "Temperature",
        log.generations.iter().map(|g| (g.generation as f64, g.temperature)),
        TEMPERATURE,
    )?;
    draw_line(
        &cells[1],
        "Solution Stagnation Indicator",
        "Stagnation Counter",
        log.generations.iter().map(|g| (g.generation as f64, g.solution_counter as f64)),
        COUNTER,
    )?;
    draw_improvements(&cells[2], log)?;
    draw_text_box(&cells[3], &stats.summary(), STATS_BACKGROUND)?;

    root.present()?;

    Ok(())
}

fn generation_range(log: &EvolutionLog) -> std::ops::Range<f64> {
    let (first, last) = bounds(log.generations.iter().map(|g| g.generation as f64)).unwrap_or((0.0, 0.0));
    padded(first, last)
}

fn draw_convergence<B: DrawingBackend>(
    area: &DrawingArea<B, Shift>,
    log: &EvolutionLog,
    stats: &EvolutionStatistics,
) -> DrawResult<()>
where
    B::ErrorType: 'static,
{
    let (min_cost, max_cost) = bounds(log.generations.iter().map(|g| g.best_cost)).unwrap_or((0.0, 0.0));

    let mut chart = ChartBuilder::on(area)
        .caption("GA-CVRP: Cost Convergence Over Generations", CAPTION_FONT.into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(generation_range(log), padded(min_cost, max_cost))?;

    chart
        .configure_mesh()
        .x_desc("Generation")
        .y_desc("Cost")
        .draw()?;

    chart.draw_series(AreaSeries::new(
        log.generations.iter().map(|g| (g.generation as f64, g.best_cost)),
        min_cost,
        COST.mix(0.2).filled(),
    ))?;

    chart
        .draw_series(LineSeries::new(
            log.generations.iter().map(|g| (g.generation as f64, g.best_cost)),
            COST.stroke_width(3),
        ))?
        .label("Best Cost")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], COST.stroke_width(3)));

    let first = log.first()?;
    let last = log.last()?;

    chart.draw_series(vec![
        Text::new(
            format!("Initial: {:.2}", stats.initial_cost),
            (first.generation as f64, first.best_cost),
            ANNOTATION_FONT.into_font(),
        ),
        Text::new(
            format!(
                "Final: {:.2} (-{:.2}%)",
                stats.final_cost,
                stats.improvement_rate()
            ),
            (last.generation as f64, last.best_cost),
            ANNOTATION_FONT.into_font(),
        ),
    ])?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

/// A filled line chart over generations, shaded down to zero.
fn draw_line<B: DrawingBackend>(
    area: &DrawingArea<B, Shift>,
    caption: &str,
    y_desc: &str,
    series: impl Iterator<Item = (f64, f64)> + Clone,
    color: RGBColor,
) -> DrawResult<()>
where
    B::ErrorType: 'static,
{
    let (x_min, x_max) = bounds(series.clone().map(|(x, _)| x)).unwrap_or((0.0, 0.0));
    let (_, y_max) = bounds(series.clone().map(|(_, y)| y)).unwrap_or((0.0, 0.0));

    let mut chart = ChartBuilder::on(area)
        .caption(caption, CAPTION_FONT.into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(padded(x_min, x_max), padded(0.0, y_max.max(0.0)))?;

    chart
        .configure_mesh()
        .x_desc("Generation")
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(AreaSeries::new(series.clone(), 0.0, color.mix(0.2).filled()))?;
    chart.draw_series(LineSeries::new(series, color.stroke_width(2)))?;

    Ok(())
}

/// Bars of the cost drop per generation, regressions drawn in a second color.
fn draw_improvements<B: DrawingBackend>(area: &DrawingArea<B, Shift>, log: &EvolutionLog) -> DrawResult<()>
where
    B::ErrorType: 'static,
{
    let improvements = log.improvements();
    let (low, high) = bounds(improvements.iter().copied()).unwrap_or((0.0, 0.0));
    let width = (log.len() / 100).max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Per-Generation Cost Improvement", CAPTION_FONT.into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(generation_range(log), padded(low.min(0.0), high.max(0.0)))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Generation")
        .y_desc("Cost Improvement")
        .draw()?;

    chart.draw_series(log.generations.iter().zip(&improvements).map(|(g, &delta)| {
        let x = g.generation as f64;
        let color = if delta > 0.0 { IMPROVEMENT } else { REGRESSION };
        Rectangle::new([(x - width / 2.0, 0.0), (x + width / 2.0, delta)], color.mix(0.6).filled())
    }))?;

    let range = generation_range(log);
    chart.draw_series(LineSeries::new(vec![(range.start, 0.0), (range.end, 0.0)], BLACK.stroke_width(1)))?;

    Ok(())
}
