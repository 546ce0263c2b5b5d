//! Flattening [`DataRows`] into labeled cells for text, JSON and terminal output.

use std::io::{self, Write};

use census_engine::{Axis, ColumnRef, DataRows, DisplayMode, DistrictFilter, RowRef};
use serde::Serialize;

/// A histogram with resolved labels, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramTable {
    pub row_axis: Axis,
    pub column_axis: Axis,
    pub display: DisplayMode,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    /// `None` for cells that are not shown (moving-in × deceased and the like).
    pub cells: Vec<Option<f32>>,
    /// Total, moving-in and deceased rows.
    #[serde(skip)]
    pub summary: bool,
}

impl HistogramTable {
    pub fn new(data: &DataRows, display: DisplayMode) -> Self {
        let column_refs = data.column_refs().collect::<Vec<_>>();
        let columns = column_refs
            .iter()
            .map(|&column| column_label(data.column_axis, column))
            .collect();
        let rows = data
            .row_refs()
            .map(|row| TableRow {
                label: row_label(data.row_axis, row),
                cells: column_refs
                    .iter()
                    .map(|&column| data.value(row, column, display))
                    .collect(),
                summary: !matches!(row, RowRef::Bucket(_)),
            })
            .collect();
        Self {
            row_axis: data.row_axis,
            column_axis: data.column_axis,
            display,
            columns,
            rows,
        }
    }

    /// Width of the label column in characters.
    pub fn label_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.label.chars().count())
            .chain([self.row_axis.name().chars().count()])
            .max()
            .unwrap_or(0)
    }

    /// Width of a cell column: wide enough for its header and its values.
    pub fn cell_width(&self, column: usize) -> usize {
        let header = self.columns.get(column).map_or(0, |c| c.chars().count());
        self.rows
            .iter()
            .filter_map(|row| row.cells.get(column))
            .map(|&cell| format_cell(cell, self.display).len())
            .chain([header, 6])
            .max()
            .unwrap_or(0)
    }

    pub fn write_text<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        let label_width = self.label_width();
        let widths = (0..self.columns.len())
            .map(|column| self.cell_width(column))
            .collect::<Vec<_>>();

        write!(writer, "{:<label_width$}", self.row_axis.name())?;
        for (column, width) in self.columns.iter().zip(&widths) {
            write!(writer, "  {column:>width$}")?;
        }
        writeln!(writer)?;
        let line_width = label_width + widths.iter().map(|w| w + 2).sum::<usize>();
        writeln!(writer, "{}", "-".repeat(line_width))?;

        for row in &self.rows {
            write!(writer, "{:<label_width$}", row.label)?;
            for (&cell, width) in row.cells.iter().zip(&widths) {
                write!(writer, "  {:>width$}", format_cell(cell, self.display))?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

pub fn row_label(axis: Axis, row: RowRef) -> String {
    match row {
        RowRef::Bucket(bucket) => axis.definition().label(bucket).into_owned(),
        RowRef::Total => "Total".to_owned(),
        RowRef::MovingIn => "Moving In".to_owned(),
        RowRef::Deceased => "Deceased".to_owned(),
    }
}

pub fn column_label(axis: Axis, column: ColumnRef) -> String {
    match column {
        ColumnRef::Bucket(bucket) => axis.definition().label(bucket).into_owned(),
        ColumnRef::Total => "Total".to_owned(),
        ColumnRef::MovingIn => "Moving In".to_owned(),
        ColumnRef::Deceased => "Deceased".to_owned(),
    }
}

pub fn format_cell(value: Option<f32>, display: DisplayMode) -> String {
    match (value, display) {
        (None, _) => "-".to_owned(),
        (Some(count), DisplayMode::Count) => format!("{count:.0}"),
        (Some(percent), DisplayMode::Percent) => format!("{percent:.1}%"),
    }
}

pub fn district_label(filter: DistrictFilter) -> String {
    match filter {
        DistrictFilter::EntireCity => "Entire City".to_owned(),
        DistrictFilter::District(id) => format!("District {id}"),
    }
}

#[cfg(test)]
mod tests {
    use census_engine::{
        CitizenKind, CitizenRecord, ClassifiedCitizen, ClassifyContext, Education, Gender, Home,
        Location, Wealth, classify,
    };

    use super::*;

    fn resident(id: u32, age: u16, education: Education, moving_in: bool) -> ClassifiedCitizen {
        let record = CitizenRecord {
            kind: CitizenKind::Resident,
            dead: false,
            moving_in,
            home_building: Some(0),
            work_building: None,
            age,
            education,
            gender: Gender::Female,
            happiness: 50,
            health: 50,
            wellbeing: 50,
            location: Location::Home,
            wealth: Wealth::Low,
            school: None,
        };
        let home = Home {
            building: 0,
            district: 1,
            residential_level: 1,
        };
        classify(id, &record, home, ClassifyContext::default())
    }

    fn sample_rows() -> DataRows {
        let citizens = [
            resident(0, 10, Education::Uneducated, false),
            resident(1, 10, Education::Uneducated, false),
            resident(2, 100, Education::TwoSchools, false),
            resident(3, 100, Education::OneSchool, true),
        ];
        DataRows::build(
            &citizens,
            Axis::AgeGroup,
            Axis::Education,
            DistrictFilter::EntireCity,
        )
    }

    #[test]
    fn test_table_shape() {
        let table = HistogramTable::new(&sample_rows(), DisplayMode::Count);
        let columns = Axis::Education.bucket_count() + 3;
        assert_eq!(table.columns.len(), columns);
        assert_eq!(table.columns[columns - 3], "Total");
        assert_eq!(table.rows.len(), Axis::AgeGroup.bucket_count() + 3);
        assert!(table.rows.iter().all(|row| row.cells.len() == columns));

        let total = &table.rows[Axis::AgeGroup.bucket_count()];
        assert!(total.summary);
        assert_eq!(total.label, "Total");
        assert_eq!(total.cells[columns - 3], Some(3.0));
        assert_eq!(total.cells[columns - 2], Some(1.0));

        let moving_in = &table.rows[Axis::AgeGroup.bucket_count() + 1];
        assert_eq!(moving_in.cells[columns - 2], None);
    }

    #[test]
    fn test_percent_cells() {
        let table = HistogramTable::new(&sample_rows(), DisplayMode::Percent);
        let children = &table.rows[0];
        let uneducated = children.cells[0].unwrap();
        assert!((uneducated - 200.0 / 3.0).abs() < 1e-3);
        assert_eq!(format_cell(children.cells[0], DisplayMode::Percent), "66.7%");
    }

    #[test]
    fn test_text_output() {
        let table = HistogramTable::new(&sample_rows(), DisplayMode::Count);
        let mut text = vec![];
        table.write_text(&mut text).unwrap();
        let text = String::from_utf8(text).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert!(lines[0].starts_with("Age Group"));
        assert!(lines[0].contains("Deceased"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines.len(), 2 + table.rows.len());
        assert!(lines.iter().any(|line| line.starts_with("Moving In")));
    }

    #[test]
    fn test_labels() {
        assert_eq!(format_cell(None, DisplayMode::Count), "-");
        assert_eq!(format_cell(Some(12.0), DisplayMode::Count), "12");
        assert_eq!(district_label(DistrictFilter::District(3)), "District 3");
        assert_eq!(row_label(Axis::Gender, RowRef::Deceased), "Deceased");
    }
}
