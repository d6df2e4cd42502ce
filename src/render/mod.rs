//! PNG rendering of parsed solver output.

use std::{ops::Range, path::PathBuf};

use plotters::{coord::Shift, prelude::*};
use strum::{Display, EnumIter};

use crate::cvrp::{Error, Result};

pub use self::evolution::render_evolution;
pub use self::routes::render_routes;

mod evolution;
mod routes;

/// Type alias for the result of a drawing function.
type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

pub const DEFAULT_SIZE: (u32, u32) = (2000, 1250);

/// Smallest image the chart layouts fit into.
pub const MIN_SIZE: (u32, u32) = (800, 600);

const TITLE_FONT: (&str, u32) = ("sans-serif", 32);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 22);
const STATS_FONT_SIZE: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Chart {
    Evolution,
    Routes,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub output: PathBuf,
    pub size: (u32, u32),
}

impl RenderOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_size(mut self, size: (u32, u32)) -> Self {
        self.size = size;
        self
    }

    /// Rejects images too small for the chart layouts before anything is written.
    pub fn check_size(&self) -> Result<()> {
        let (width, height) = self.size;
        if width < MIN_SIZE.0 || height < MIN_SIZE.1 {
            return Err(Error::Render(format!(
                "image size {}x{} is below the minimum of {}x{}",
                width, height, MIN_SIZE.0, MIN_SIZE.1
            )));
        }

        Ok(())
    }
}

pub(crate) fn into_render_error(err: Box<dyn std::error::Error>) -> Error {
    Error::Render(err.to_string())
}

/// Value range with a margin on both sides, never empty.
pub(crate) fn padded(min: f64, max: f64) -> Range<f64> {
    let span = max - min;
    let margin = if span > 0.0 { span * 0.05 } else { min.abs().max(1.0) * 0.05 };
    (min - margin)..(max + margin)
}

/// Smallest and largest value, `None` for an empty input.
pub(crate) fn bounds(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}

/// Writes a block of monospace lines inside a bordered box.
fn draw_text_box<B: DrawingBackend>(
    area: &DrawingArea<B, Shift>,
    lines: &[String],
    background: RGBColor,
) -> DrawResult<()>
where
    B::ErrorType: 'static,
{
    let (width, height) = area.dim_in_pixel();
    let line_height = STATS_FONT_SIZE as i32 + 8;
    let box_height = (line_height * lines.len() as i32 + 40).min(height as i32 - 20);

    area.draw(&Rectangle::new(
        [(20, 20), (width as i32 - 20, box_height)],
        background.mix(0.3).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(20, 20), (width as i32 - 20, box_height)],
        BLACK.stroke_width(1),
    ))?;

    for (idx, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.clone(),
            (40, 40 + line_height * idx as i32),
            ("monospace", STATS_FONT_SIZE).into_font(),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_is_never_empty() {
        let range = padded(10.0, 10.0);
        assert!(range.start < 10.0 && range.end > 10.0);

        let range = padded(0.0, 0.0);
        assert!(range.start < range.end);

        assert_eq!(padded(0.0, 100.0), -5.0..105.0);
    }

    #[test]
    fn bounds_of_values() {
        assert_eq!(bounds(vec![3.0, -1.0, 7.5]), Some((-1.0, 7.5)));
        assert_eq!(bounds(Vec::new()), None);
    }

    #[test]
    fn tiny_images_are_rejected() {
        assert!(RenderOptions::new("out.png").check_size().is_ok());
        assert!(RenderOptions::new("out.png").with_size(MIN_SIZE).check_size().is_ok());

        let err = RenderOptions::new("out.png").with_size((10, 10)).check_size().unwrap_err();
        assert!(matches!(err, Error::Render(_)));
        assert!(RenderOptions::new("out.png")
            .with_size((MIN_SIZE.0, MIN_SIZE.1 - 1))
            .check_size()
            .is_err());
    }

    #[test]
    fn chart_names() {
        assert_eq!(Chart::Evolution.to_string(), "evolution");
        assert_eq!(Chart::Routes.to_string(), "routes");
    }
}
