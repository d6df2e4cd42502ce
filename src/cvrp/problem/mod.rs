use std::{collections::BTreeMap, path::Path, str::FromStr};

use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::debug;

pub use node::{NodeCoordinate, Scanned, DEPOT};

use super::{
    error::{Error, Result},
    utils::{read_to_string, ParseKeyValue},
};

mod node;

/// Only this many leading lines are searched for header keys.
pub const HEADER_WINDOW: usize = 10;

const COORD_SECTION: &str = "NODE_COORD_SECTION";
const DEMAND_SECTION: &str = "DEMAND_SECTION";
const EOF_MARKER: &str = "EOF";

pub type Coordinates = BTreeMap<usize, NodeCoordinate>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    pub dimension: Option<usize>,
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
enum HeaderKey {
    Dimension,
    Capacity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub coordinates: Coordinates,
    pub metadata: Metadata,
}

/// Reads a `.vrp` problem file.
pub fn read_problem(path: impl AsRef<Path>) -> Result<Problem> {
    let path = path.as_ref();
    let contents = read_to_string(path)?;
    let problem = Problem::parse(&contents)?;

    debug!(
        path = %path.display(),
        nodes = problem.coordinates.len(),
        dimension = ?problem.metadata.dimension,
        capacity = ?problem.metadata.capacity,
        "read problem file"
    );

    Ok(problem)
}

impl Problem {
    pub fn parse(contents: &str) -> Result<Self> {
        let lines: Vec<&str> = contents.lines().collect();

        let metadata = Metadata::scan(&lines)?;
        let coordinates = Self::scan_coordinates(&lines)?;

        Ok(Self {
            coordinates,
            metadata,
        })
    }

    pub fn into_parts(self) -> (Coordinates, Metadata) {
        (self.coordinates, self.metadata)
    }

    pub fn depot(&self) -> Option<&NodeCoordinate> {
        self.coordinates.get(&DEPOT)
    }

    fn scan_coordinates(lines: &[&str]) -> Result<Coordinates> {
        let mut coordinates = Coordinates::new();
        let mut in_section = false;
        let mut skipped = 0usize;

        for (idx, raw) in lines.iter().enumerate() {
            let line = raw.trim();

            if line.contains(COORD_SECTION) {
                in_section = true;
                continue;
            }
            if line.contains(DEMAND_SECTION) || line.is_empty() || line.starts_with(EOF_MARKER) {
                break;
            }
            if !in_section {
                continue;
            }

            match NodeCoordinate::try_from_line(line, idx + 1)? {
                Scanned::Accepted((id, node)) => {
                    coordinates.insert(id, node);
                }
                Scanned::Skipped => {
                    debug!(line = idx + 1, text = line, "skipping coordinate line");
                    skipped += 1;
                }
            }
        }

        debug!(accepted = coordinates.len(), skipped, "scanned coordinate section");

        Ok(coordinates)
    }
}

impl Metadata {
    /// Looks for header keys in the first `HEADER_WINDOW` lines, anything
    /// later is not captured.
    fn scan(lines: &[&str]) -> Result<Self> {
        let mut metadata = Self::default();

        for (idx, line) in lines.iter().take(HEADER_WINDOW).enumerate() {
            let key = match HeaderKey::iter().find(|key| line.contains(&key.to_string())) {
                Some(key) => key,
                None => continue,
            };

            let (_, value) = line
                .split_key_value()
                .ok_or_else(|| Error::parse(idx + 1, format!("expected '{} : <value>'", key)))?;

            let value = usize::from_str(value)
                .map_err(|_| Error::parse(idx + 1, format!("invalid {} '{}'", key, value)))?;

            match key {
                HeaderKey::Dimension => metadata.dimension = Some(value),
                HeaderKey::Capacity => metadata.capacity = Some(value),
            }
        }

        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const SMALL: &str = "NAME : A-n5-k2
COMMENT : (Augerat et al, No of trucks: 2)
TYPE : CVRP
DIMENSION : 5
EDGE_WEIGHT_TYPE : EUC_2D
CAPACITY : 100
NODE_COORD_SECTION
 1 82 76
 2 96 44
 3 50 5
 4 49 8
 5 13 7
DEMAND_SECTION
1 0
2 19
3 21
4 6
5 19
DEPOT_SECTION
 1
 -1
EOF
";

    #[test]
    fn parses_header_and_coordinates() {
        let problem = Problem::parse(SMALL).unwrap();

        assert_eq!(problem.metadata.dimension, Some(5));
        assert_eq!(problem.metadata.capacity, Some(100));
        assert_eq!(problem.coordinates.len(), 5);
        assert_eq!(problem.depot(), Some(&NodeCoordinate::new(82.0, 76.0)));
        assert_eq!(problem.coordinates[&3], NodeCoordinate::new(50.0, 5.0));
    }

    #[test]
    fn header_keys_are_optional() {
        let problem = Problem::parse("NODE_COORD_SECTION\n1 0 0\n2 1 1\nEOF\n").unwrap();
        assert_eq!(problem.metadata, Metadata::default());
        assert_eq!(problem.coordinates.len(), 2);
    }

    #[test]
    fn header_keys_after_window_are_ignored() {
        let mut contents = String::new();
        for i in 0..HEADER_WINDOW {
            contents += &format!("COMMENT : line {}\n", i);
        }
        contents += "DIMENSION : 3\nCAPACITY : 10\nNODE_COORD_SECTION\n1 0 0\nEOF\n";

        let problem = Problem::parse(&contents).unwrap();
        assert_eq!(problem.metadata.dimension, None);
        assert_eq!(problem.metadata.capacity, None);
        assert_eq!(problem.coordinates.len(), 1);
    }

    #[test]
    fn header_key_on_tenth_line_is_captured() {
        let mut contents = "COMMENT : filler\n".repeat(HEADER_WINDOW - 1);
        contents += "CAPACITY : 42\nNODE_COORD_SECTION\n1 0 0\n";

        let problem = Problem::parse(&contents).unwrap();
        assert_eq!(problem.metadata.capacity, Some(42));
    }

    #[test]
    fn bad_header_value_fails() {
        let err = Problem::parse("DIMENSION : many\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));

        let err = Problem::parse("NAME : x\nCAPACITY 100\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn wrong_token_counts_are_skipped() {
        let problem = Problem::parse(
            "NODE_COORD_SECTION\n1 0 0\n2 5\n3 1 2 3\n4 7 7\nDEMAND_SECTION\n1 0\n",
        )
        .unwrap();

        assert_eq!(problem.coordinates.keys().copied().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn bad_coordinate_fails() {
        let err = Problem::parse("NODE_COORD_SECTION\n1 0 0\n2 x 1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn demand_section_ends_coordinates() {
        let problem = Problem::parse("NODE_COORD_SECTION\n1 0 0\nDEMAND_SECTION\n2 3 4\n").unwrap();
        assert_eq!(problem.coordinates.len(), 1);
    }

    #[test]
    fn blank_line_stops_scanning() {
        let problem = Problem::parse("NODE_COORD_SECTION\n1 0 0\n\n2 1 1\n").unwrap();
        assert_eq!(problem.coordinates.len(), 1);

        // Also before the section is ever opened
        let problem = Problem::parse("NAME : x\n\nNODE_COORD_SECTION\n1 0 0\n").unwrap();
        assert!(problem.coordinates.is_empty());
    }

    #[test]
    fn lines_outside_section_are_not_coordinates() {
        let problem = Problem::parse("1 2 3\nNODE_COORD_SECTION\n4 5 6\n").unwrap();
        assert_eq!(problem.coordinates.keys().copied().collect::<Vec<_>>(), vec![4]);
    }

    proptest! {
        #[test]
        fn one_entry_per_well_formed_line(nodes in prop::collection::btree_map(1usize..10_000, (-1e6f64..1e6, -1e6f64..1e6), 0..64)) {
            let mut contents = String::from("NODE_COORD_SECTION\n");
            for (id, (x, y)) in &nodes {
                contents += &format!("{} {} {}\n", id, x, y);
            }
            contents += "DEMAND_SECTION\n";

            let problem = Problem::parse(&contents).unwrap();

            prop_assert_eq!(problem.coordinates.len(), nodes.len());
            for (id, (x, y)) in &nodes {
                prop_assert_eq!(problem.coordinates[id], NodeCoordinate::new(*x, *y));
            }
        }
    }
}
