use std::str::FromStr;

use crate::cvrp::error::{Error, Result};

/// Id of the depot, every route starts and ends here.
pub const DEPOT: usize = 1;

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct NodeCoordinate {
    pub x: f64,
    pub y: f64,
}

/// Outcome of looking at a line inside a section.
///
/// A line of the wrong shape is `Skipped`. A line of the right shape whose
/// content does not parse is an `Err` from the caller's point of view.
#[derive(Debug, PartialEq)]
pub enum Scanned<T> {
    Accepted(T),
    Skipped,
}

impl NodeCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parses an `id x y` line, `line_no` is only used for error reporting.
    pub fn try_from_line(line: &str, line_no: usize) -> Result<Scanned<(usize, Self)>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [id, x, y] = match tokens.as_slice() {
            [id, x, y] => [*id, *x, *y],
            _ => return Ok(Scanned::Skipped),
        };

        let id = parse_token::<usize>(id, "node id", line_no)?;
        let x = parse_token::<f64>(x, "x coordinate", line_no)?;
        let y = parse_token::<f64>(y, "y coordinate", line_no)?;

        Ok(Scanned::Accepted((id, Self { x, y })))
    }

    pub fn distance_from(&self, other: &NodeCoordinate) -> f64 {
        ((other.y - self.y).powi(2) + (other.x - self.x).powi(2)).sqrt()
    }
}

impl From<NodeCoordinate> for (f64, f64) {
    fn from(node: NodeCoordinate) -> Self {
        (node.x, node.y)
    }
}

pub(crate) fn parse_token<T: FromStr>(token: &str, what: &str, line_no: usize) -> Result<T> {
    token
        .parse::<T>()
        .map_err(|_| Error::parse(line_no, format!("invalid {} '{}'", what, token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_three_tokens() {
        let scanned = NodeCoordinate::try_from_line(" 7  12.5\t-3 ", 9).unwrap();
        assert_eq!(scanned, Scanned::Accepted((7, NodeCoordinate::new(12.5, -3.0))));
    }

    #[test]
    fn skips_wrong_token_count() {
        assert_eq!(NodeCoordinate::try_from_line("7 12", 1).unwrap(), Scanned::Skipped);
        assert_eq!(NodeCoordinate::try_from_line("7 12 3 4", 1).unwrap(), Scanned::Skipped);
        assert_eq!(NodeCoordinate::try_from_line("", 1).unwrap(), Scanned::Skipped);
    }

    #[test]
    fn fails_on_bad_number() {
        let err = NodeCoordinate::try_from_line("7 twelve 3", 4).unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 4);
                assert!(message.contains("twelve"));
            }
            other => panic!("unexpected error {:?}", other),
        }

        assert!(NodeCoordinate::try_from_line("7.0 1 3", 4).unwrap_err().is_parse());
    }

    #[test]
    fn distance() {
        let a = NodeCoordinate::new(0.0, 0.0);
        let b = NodeCoordinate::new(3.0, 4.0);
        assert_eq!(a.distance_from(&b), 5.0);
        assert_eq!(b.distance_from(&a), 5.0);
    }
}
