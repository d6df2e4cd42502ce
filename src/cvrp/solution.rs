use std::{path::Path, str::FromStr};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, multispace0, multispace1},
    combinator::{all_consuming, eof, map_res, peek},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, terminated, tuple},
    Offset,
};
use tracing::debug;

use super::{
    error::{Error, Result},
    utils::read_to_string,
};

pub type NomResult<I, O> = nom::IResult<I, O, nom::error::VerboseError<I>>;

const COST_KEY: &str = "cost";
const ARROW: &str = "->";

/// Customer ids visited by one vehicle, depot excluded.
pub type Route = Vec<usize>;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Solution {
    pub routes: Vec<Route>,
    /// `0.0` when the file has no cost line.
    pub cost: f64,
}

/// Reads a solution file as written by the solver.
pub fn read_solution(path: impl AsRef<Path>) -> Result<Solution> {
    let path = path.as_ref();
    let contents = read_to_string(path)?;
    let solution = Solution::parse(&contents)?;

    debug!(
        path = %path.display(),
        routes = solution.routes.len(),
        cost = solution.cost,
        "read solution file"
    );

    Ok(solution)
}

impl Solution {
    pub fn parse(contents: &str) -> Result<Self> {
        let mut solution = Self::default();
        let mut ignored = 0usize;

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            let line_no = idx + 1;

            if line.split_whitespace().next() == Some(COST_KEY) {
                // Later cost lines overwrite earlier ones
                solution.cost = run(cost_line, line, line_no)?;
            } else if line.contains(ARROW) {
                let nodes = run(route_line, line, line_no)?;
                if nodes.len() > 2 {
                    solution.routes.push(nodes[1..nodes.len() - 1].to_vec());
                }
            } else {
                ignored += 1;
            }
        }

        debug!(ignored, "scanned solution lines");

        Ok(solution)
    }

    pub fn into_parts(self) -> (Vec<Route>, f64) {
        (self.routes, self.cost)
    }

    pub fn customer_count(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }
}

// `cost <float>`, the value must be a whole token
fn cost_line(i: &str) -> NomResult<&str, f64> {
    preceded(
        tuple((tag(COST_KEY), multispace1)),
        terminated(double, peek(alt((multispace1, eof)))),
    )(i)
}

// `1->4->9->1`
fn route_line(i: &str) -> NomResult<&str, Vec<usize>> {
    all_consuming(separated_list1(
        tag(ARROW),
        delimited(multispace0, map_res(digit1, usize::from_str), multispace0),
    ))(i)
}

// Runs a line parser, turning nom's error into one pointing into the line.
// This must happen here since the error borrows from the line.
fn run<'a, O>(
    parser: impl FnOnce(&'a str) -> NomResult<&'a str, O>,
    line: &'a str,
    line_no: usize,
) -> Result<O> {
    use nom::Err::{Error as NomError, Failure, Incomplete};

    match parser(line) {
        Ok((_, value)) => Ok(value),
        Err(NomError(err) | Failure(err)) => {
            let mut message = format!("cannot parse '{}'", line);
            if let Some((error_slice, kind)) = err.errors.first() {
                let offset = line.offset(*error_slice);
                message += &format!(": {:?} at column {}", kind, offset + 1);
            }
            Err(Error::parse(line_no, message))
        }
        // Complete parsers never ask for more input
        Err(Incomplete(_)) => Err(Error::parse(line_no, format!("incomplete line '{}'", line))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_empty_routes() {
        let solution = Solution::parse("cost 1234.5\n1->2->3->1\n1->1\n").unwrap();
        assert_eq!(solution.routes, vec![vec![2, 3]]);
        assert_eq!(solution.cost, 1234.5);
    }

    #[test]
    fn last_cost_wins() {
        let solution = Solution::parse("cost 100\ncost 200\n").unwrap();
        assert_eq!(solution.cost, 200.0);
        assert!(solution.routes.is_empty());
    }

    #[test]
    fn cost_defaults_to_zero() {
        let solution = Solution::parse("1->5->1\n").unwrap();
        assert_eq!(solution.cost, 0.0);
        assert_eq!(solution.routes, vec![vec![5]]);
    }

    #[test]
    fn reads_solver_output() {
        let solution = Solution::parse(
            "algorithm Genetic Algorithm with specialized crossover and mutation\n\
             cost 784.512\n\
             1->21->31->19->17->1\n\
             1->28->25->1\n\
             1->7->1\n",
        )
        .unwrap();

        assert_eq!(solution.routes, vec![vec![21, 31, 19, 17], vec![28, 25], vec![7]]);
        assert_eq!(solution.cost, 784.512);
        assert_eq!(solution.customer_count(), 7);
    }

    #[test]
    fn tolerates_spaces_around_arrows() {
        let solution = Solution::parse("  1 -> 4 ->9->1  \n").unwrap();
        assert_eq!(solution.routes, vec![vec![4, 9]]);
    }

    #[test]
    fn short_routes_are_dropped() {
        let solution = Solution::parse("1->1\n2->3\n").unwrap();
        assert!(solution.routes.is_empty());
    }

    #[test]
    fn cost_must_be_first_token() {
        let solution = Solution::parse("total cost 55\ncostly 3\n").unwrap();
        assert_eq!(solution.cost, 0.0);
    }

    #[test]
    fn bad_route_token_fails() {
        let err = Solution::parse("cost 1\n1->x->1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));

        assert!(Solution::parse("1->2->\n").unwrap_err().is_parse());
        assert!(Solution::parse("1->2.5->1\n").unwrap_err().is_parse());
    }

    #[test]
    fn bad_cost_fails() {
        assert!(Solution::parse("cost abc\n").unwrap_err().is_parse());
        assert!(Solution::parse("cost\n").unwrap_err().is_parse());
        assert!(Solution::parse("cost 12abc\n").unwrap_err().is_parse());
    }

    #[test]
    fn cost_accepts_trailing_tokens() {
        let solution = Solution::parse("cost 12.5 (rounded)\n").unwrap();
        assert_eq!(solution.cost, 12.5);
    }
}
