use census_stats::histogram::{CountHistogram, percent_of};
use serde::{Deserialize, Serialize};

use crate::classify::{Axis, ClassifiedCitizen};

use super::DistrictFilter;

/// How histogram cells are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Count,
    Percent,
}

impl DisplayMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Count => Self::Percent,
            Self::Percent => Self::Count,
        }
    }
}

/// Counts of one row-axis bucket.
///
/// `amount` holds the residents that are neither moving in nor deceased; the
/// three categories are disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRow {
    pub amount: CountHistogram,
    pub moving_in: u32,
    pub deceased: u32,
}

impl DataRow {
    fn new(columns: usize) -> Self {
        Self {
            amount: CountHistogram::new(columns),
            moving_in: 0,
            deceased: 0,
        }
    }

    /// Sum of the row's regular cells.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.amount.total()
    }
}

/// A row of the rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    Bucket(usize),
    Total,
    MovingIn,
    Deceased,
}

/// A column of the rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Bucket(usize),
    Total,
    MovingIn,
    Deceased,
}

/// The row × column histogram over one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRows {
    pub row_axis: Axis,
    pub column_axis: Axis,
    /// One row per bucket of `row_axis`.
    pub rows: Vec<DataRow>,
    /// Column sums over all rows.
    pub total: DataRow,
    /// Per-column counts of residents moving in.
    pub moving_in: CountHistogram,
    /// Per-column counts of deceased residents.
    pub deceased: CountHistogram,
}

impl DataRows {
    /// Builds the histogram over the citizens that pass `filter`.
    ///
    /// Deceased residents are counted as deceased even if they are also
    /// flagged as moving in.
    #[must_use]
    pub fn build<'a, I>(
        citizens: I,
        row_axis: Axis,
        column_axis: Axis,
        filter: DistrictFilter,
    ) -> Self
    where
        I: IntoIterator<Item = &'a ClassifiedCitizen>,
    {
        let columns = column_axis.bucket_count();
        let mut rows = vec![DataRow::new(columns); row_axis.bucket_count()];
        let mut total = DataRow::new(columns);
        let mut moving_in = CountHistogram::new(columns);
        let mut deceased = CountHistogram::new(columns);

        for citizen in citizens {
            if !filter.matches(citizen.district) {
                continue;
            }
            let row = &mut rows[citizen.bucket(row_axis)];
            let col = citizen.bucket(column_axis);
            if citizen.dead {
                row.deceased += 1;
                total.deceased += 1;
                deceased.increment(col);
            } else if citizen.moving_in {
                row.moving_in += 1;
                total.moving_in += 1;
                moving_in.increment(col);
            } else {
                row.amount.increment(col);
                total.amount.increment(col);
            }
        }

        Self {
            row_axis,
            column_axis,
            rows,
            total,
            moving_in,
            deceased,
        }
    }

    /// Returns the raw count of a cell, or `None` for cells the table leaves
    /// blank (the moving-in and deceased columns of the moving-in and deceased
    /// rows).
    #[must_use]
    pub fn count(&self, row: RowRef, column: ColumnRef) -> Option<u32> {
        let data_row = match row {
            RowRef::Bucket(idx) => self.rows.get(idx)?,
            RowRef::Total => &self.total,
            RowRef::MovingIn | RowRef::Deceased => {
                let histogram = if row == RowRef::MovingIn {
                    &self.moving_in
                } else {
                    &self.deceased
                };
                return match column {
                    ColumnRef::Bucket(idx) => Some(histogram.get(idx)),
                    ColumnRef::Total => Some(histogram.total()),
                    ColumnRef::MovingIn | ColumnRef::Deceased => None,
                };
            }
        };
        Some(match column {
            ColumnRef::Bucket(idx) => data_row.amount.get(idx),
            ColumnRef::Total => data_row.total(),
            ColumnRef::MovingIn => data_row.moving_in,
            ColumnRef::Deceased => data_row.deceased,
        })
    }

    /// Returns a cell as a percentage.
    ///
    /// Regular cells are relative to the grand total; cells of the moving-in
    /// and deceased rows to their own row total; the moving-in and deceased
    /// columns to their column total. A zero denominator yields `0.0`.
    #[must_use]
    pub fn percent(&self, row: RowRef, column: ColumnRef) -> Option<f32> {
        let value = self.count(row, column)?;
        let denominator = match (row, column) {
            (_, ColumnRef::MovingIn) => self.moving_in.total(),
            (_, ColumnRef::Deceased) => self.deceased.total(),
            (RowRef::MovingIn, _) => self.moving_in.total(),
            (RowRef::Deceased, _) => self.deceased.total(),
            (RowRef::Bucket(_) | RowRef::Total, _) => self.total.total(),
        };
        Some(percent_of(value, denominator))
    }

    /// Returns a cell as a number in the given display mode.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn value(&self, row: RowRef, column: ColumnRef, mode: DisplayMode) -> Option<f32> {
        match mode {
            DisplayMode::Count => self.count(row, column).map(|count| count as f32),
            DisplayMode::Percent => self.percent(row, column),
        }
    }

    /// Every row of the table in display order.
    pub fn row_refs(&self) -> impl Iterator<Item = RowRef> + use<> {
        (0..self.rows.len())
            .map(RowRef::Bucket)
            .chain([RowRef::Total, RowRef::MovingIn, RowRef::Deceased])
    }

    /// Every column of the table in display order.
    pub fn column_refs(&self) -> impl Iterator<Item = ColumnRef> + use<> {
        (0..self.total.amount.len())
            .map(ColumnRef::Bucket)
            .chain([ColumnRef::Total, ColumnRef::MovingIn, ColumnRef::Deceased])
    }
}
