/// Parser for the compact net-grid notation
///
/// A net is drawn row by row, top row first. Rows are separated by `/` or a
/// newline, `.` marks an empty cell and any ASCII letter or digit is a face
/// label: `"1.../2345/6..."` is the first 1-4-1 cube net.
use nom::{
    branch::alt,
    character::complete::{char, line_ending, satisfy, space0},
    combinator::{all_consuming, map, value},
    multi::{many1, separated_list1},
    sequence::delimited,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LayoutError;

/// One labelled cell of a net grid. `row` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub label: char,
    pub col: i32,
    pub row: i32,
}

/// A parsed net grid, cells sorted by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetGrid {
    cells: Vec<GridCell>,
    width: i32,
    height: i32,
}

impl NetGrid {
    pub fn parse(source: &str) -> Result<Self, LayoutError> {
        let rows = match all_consuming(grid)(source.trim()) {
            Ok((_, rows)) => rows,
            Err(e) => {
                return Err(LayoutError::MalformedGrid {
                    grid: source.to_string(),
                    reason: format!("{e}"),
                })
            }
        };

        let mut cells = Vec::new();
        for (row, line) in (0i32..).zip(&rows) {
            for (col, slot) in (0i32..).zip(line) {
                if let Some(label) = *slot {
                    cells.push(GridCell { label, col, row });
                }
            }
        }

        if cells.is_empty() {
            return Err(LayoutError::MalformedGrid {
                grid: source.to_string(),
                reason: "no labelled cells".to_string(),
            });
        }

        let width = cells.iter().map(|c| c.col).max().unwrap_or(0) + 1;
        let height = cells.iter().map(|c| c.row).max().unwrap_or(0) + 1;
        cells.sort_by_key(|c| c.label);

        Ok(Self {
            cells,
            width,
            height,
        })
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell(&self, label: char) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.label == label)
    }

    pub fn cell_at(&self, col: i32, row: i32) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.col == col && c.row == row)
    }

    /// Centre of a cell in net coordinates: unit spacing, y up, origin at the
    /// centre of the grid's bounding box.
    pub fn centre(&self, cell: &GridCell) -> (f32, f32) {
        let x = cell.col as f32 - (self.width - 1) as f32 / 2.0;
        let y = (self.height - 1) as f32 / 2.0 - cell.row as f32;
        (x, y)
    }

    /// Whether two labelled cells share an edge.
    pub fn shares_edge(&self, a: char, b: char) -> bool {
        match (self.cell(a), self.cell(b)) {
            (Some(a), Some(b)) => (a.col - b.col).abs() + (a.row - b.row).abs() == 1,
            _ => false,
        }
    }
}

impl fmt::Display for NetGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.width {
                let c = self.cell_at(col, row).map_or('.', |cell| cell.label);
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

fn grid(input: &str) -> IResult<&str, Vec<Vec<Option<char>>>> {
    separated_list1(alt((map(char('/'), |_| ()), map(line_ending, |_| ()))), grid_row)(input)
}

fn grid_row(input: &str) -> IResult<&str, Vec<Option<char>>> {
    delimited(space0, many1(grid_cell), space0)(input)
}

fn grid_cell(input: &str) -> IResult<&str, Option<char>> {
    alt((
        value(None, char('.')),
        map(satisfy(|c| c.is_ascii_alphanumeric()), Some),
    ))(input)
}
