use crate::foundation::error::{ViewgridError, ViewgridResult};

/// Images up to this count share a single row.
pub const SINGLE_ROW_MAX: usize = 4;

/// Row partition of a grid composite.
///
/// `rows[i]` is the number of images in row `i`, filled left to right and top to bottom.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridLayout {
    rows: Vec<usize>,
}

impl GridLayout {
    /// Layout for `count` images: one row up to [`SINGLE_ROW_MAX`], otherwise two rows with the
    /// first holding `ceil(count / 2)`.
    pub fn for_count(count: usize) -> ViewgridResult<Self> {
        if count == 0 {
            return Err(ViewgridError::EmptyBatch);
        }
        let rows = if count <= SINGLE_ROW_MAX {
            vec![count]
        } else {
            let first = count.div_ceil(2);
            vec![first, count - first]
        };
        Ok(Self { rows })
    }

    /// Images per row.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn max_cols(&self) -> usize {
        self.rows.iter().copied().max().unwrap_or(0)
    }

    /// Total number of images.
    pub fn total(&self) -> usize {
        self.rows.iter().sum()
    }

    /// `(row, col)` of each image index, in input order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, &len)| (0..len).map(move |col| (row, col)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/layout.rs"]
mod tests;
