//! File Dataset Source - loads the three datasets from a data directory.

use std::path::{Path, PathBuf};

use super::raw_table::{Cell, RawTable};
use crate::domain::dataset::{
    Column, CropRecord, DatasetKind, LoadError, Month, OpaqueTable, RainfallRecord, Table,
};
use crate::ports::DatasetSource;

/// Text that stands for a missing number.
const MISSING_MARKERS: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "-"];

/// Reads datasets from files under one directory.
#[derive(Debug, Clone)]
pub struct FileDatasetSource {
    data_dir: PathBuf,
    crop_production_file: String,
    rainfall_file: String,
    social_groups_file: String,
}

impl FileDatasetSource {
    /// Uses the default file names `crop_production.csv`, `rainfall.xls`
    /// and `social_groups.csv`.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            crop_production_file: "crop_production.csv".to_string(),
            rainfall_file: "rainfall.xls".to_string(),
            social_groups_file: "social_groups.csv".to_string(),
        }
    }

    pub fn with_crop_production_file(mut self, name: impl Into<String>) -> Self {
        self.crop_production_file = name.into();
        self
    }

    pub fn with_rainfall_file(mut self, name: impl Into<String>) -> Self {
        self.rainfall_file = name.into();
        self
    }

    pub fn with_social_groups_file(mut self, name: impl Into<String>) -> Self {
        self.social_groups_file = name.into();
        self
    }

    /// Reads a file if it exists.
    fn read_optional(&self, name: &str) -> Result<Option<RawTable>, LoadError> {
        let path = self.data_dir.join(name);
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "Dataset file not present");
            return Ok(None);
        }
        RawTable::read(&path).map(Some)
    }
}

impl DatasetSource for FileDatasetSource {
    fn load_crop_production(&self) -> Result<Option<Table<CropRecord>>, LoadError> {
        self.read_optional(&self.crop_production_file)?
            .map(crop_table)
            .transpose()
    }

    fn load_rainfall(&self) -> Result<Option<Table<RainfallRecord>>, LoadError> {
        self.read_optional(&self.rainfall_file)?
            .map(rainfall_table)
            .transpose()
    }

    fn load_social_groups(&self) -> Result<Option<OpaqueTable>, LoadError> {
        Ok(self
            .read_optional(&self.social_groups_file)?
            .map(|raw| OpaqueTable {
                row_count: raw.rows.len(),
                columns: raw.headers,
            }))
    }
}

/// Column positions of one dataset, resolved from the header row.
struct Columns<'t> {
    kind: DatasetKind,
    raw: &'t RawTable,
}

impl<'t> Columns<'t> {
    fn new(kind: DatasetKind, raw: &'t RawTable) -> Self {
        Self { kind, raw }
    }

    fn required(&self, header: &'static str) -> Result<usize, LoadError> {
        self.raw
            .column(header)
            .ok_or_else(|| LoadError::missing_column(self.kind, header))
    }

    fn optional(&self, header: &str) -> Option<usize> {
        self.raw.column(header)
    }
}

fn cell(row: &[Cell], index: usize) -> &Cell {
    row.get(index).unwrap_or(&Cell::Empty)
}

fn text(row: &[Cell], index: usize) -> Option<String> {
    match cell(row, index) {
        Cell::Empty => None,
        Cell::Text(text) => Some(text.clone()),
        Cell::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
        Cell::Number(n) => Some(n.to_string()),
    }
}

fn number(
    kind: DatasetKind,
    line: usize,
    header: &'static str,
    row: &[Cell],
    index: usize,
) -> Result<Option<f64>, LoadError> {
    match cell(row, index) {
        Cell::Empty => Ok(None),
        Cell::Number(n) => Ok(Some(*n).filter(|v| !v.is_nan())),
        Cell::Text(text) if MISSING_MARKERS.contains(&text.as_str()) => Ok(None),
        Cell::Text(text) => text
            .replace(',', "")
            .parse::<f64>()
            .map(|v| Some(v).filter(|v| !v.is_nan()))
            .map_err(|_| LoadError::invalid_value(kind, line, header, text.as_str())),
    }
}

fn year(
    kind: DatasetKind,
    line: usize,
    header: &'static str,
    row: &[Cell],
    index: usize,
) -> Result<i32, LoadError> {
    let invalid = |value: String| LoadError::invalid_value(kind, line, header, value);
    let value = match cell(row, index) {
        Cell::Empty => return Err(invalid(String::new())),
        Cell::Number(n) => *n,
        Cell::Text(text) => text.parse::<f64>().map_err(|_| invalid(text.clone()))?,
    };
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(invalid(value.to_string()));
    }
    Ok(value as i32)
}

fn crop_table(raw: RawTable) -> Result<Table<CropRecord>, LoadError> {
    let kind = DatasetKind::CropProduction;
    let columns = Columns::new(kind, &raw);
    let year_header = kind.year_header();

    let state = columns.required(Column::State.header())?;
    let district = columns.required(Column::District.header())?;
    let year_at = columns.required(year_header)?;
    let season = columns.required(Column::Season.header())?;
    let crop = columns.required(Column::Crop.header())?;
    let area = columns.required(Column::Area.header())?;
    let production = columns.required(Column::Production.header())?;

    let rows = raw
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let line = i + 1;
            Ok(CropRecord {
                state: text(row, state),
                district: text(row, district),
                year: year(kind, line, year_header, row, year_at)?,
                season: text(row, season),
                crop: text(row, crop),
                area: number(kind, line, Column::Area.header(), row, area)?,
                production: number(kind, line, Column::Production.header(), row, production)?,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    Ok(Table::new(raw.headers, rows))
}

fn rainfall_table(raw: RawTable) -> Result<Table<RainfallRecord>, LoadError> {
    let kind = DatasetKind::Rainfall;
    let columns = Columns::new(kind, &raw);
    let year_header = kind.year_header();

    let subdivision = columns.required(Column::Subdivision.header())?;
    let year_at = columns.required(year_header)?;
    let annual = columns.required(Column::Annual.header())?;
    let months: Vec<(Month, usize)> = Month::ALL
        .iter()
        .filter_map(|month| columns.optional(month.header()).map(|at| (*month, at)))
        .collect();

    let rows = raw
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let line = i + 1;
            let mut monthly = [None; 12];
            for (month, at) in &months {
                monthly[month.index()] = number(kind, line, month.header(), row, *at)?;
            }
            Ok(RainfallRecord {
                subdivision: text(row, subdivision),
                year: year(kind, line, year_header, row, year_at)?,
                monthly,
                annual: number(kind, line, Column::Annual.header(), row, annual)?,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    Ok(Table::new(raw.headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::{Record, TabularStore};
    use tempfile::TempDir;

    const CROPS: &str = "\
State_Name,District_Name,Crop_Year,Season,Crop,Area,Production
Andaman and Nicobar Islands,NICOBARS,2000,Kharif     ,Arecanut,1254,2000
Punjab,LUDHIANA,2010,Rabi,Wheat,100,
Punjab,AMRITSAR,2011.0,Kharif,Rice,80,NA
";

    const RAINFALL: &str = "\
SD_Name,YEAR,JAN,FEB,MAR,APR,MAY,JUN,JUL,AUG,SEP,OCT,NOV,DEC,ANNUAL,Jan-Feb
Kerala,1951,10,20,30,40,50,600,700,500,300,200,100,50,2600,30
Punjab,1952,,,,,,,,,,,,,,
";

    fn data_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn loads_crop_production() {
        let dir = data_dir(&[("crop_production.csv", CROPS)]);

        let table = FileDatasetSource::new(dir.path())
            .load_crop_production()
            .unwrap()
            .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.columns()[2], "Crop_Year");
        let rows = table.rows();
        assert_eq!(rows[0].season.as_deref(), Some("Kharif"));
        assert_eq!(rows[0].production, Some(2000.0));
        assert_eq!(rows[1].production, None);
        assert_eq!(rows[2].year, 2011);
        assert_eq!(rows[2].production, None);
    }

    #[test]
    fn loads_rainfall_from_csv_by_extension() {
        let dir = data_dir(&[("rainfall.csv", RAINFALL)]);

        let table = FileDatasetSource::new(dir.path())
            .with_rainfall_file("rainfall.csv")
            .load_rainfall()
            .unwrap()
            .unwrap();

        let kerala = &table.rows()[0];
        assert_eq!(kerala.number(Column::Month(Month::Jun)), Some(600.0));
        assert_eq!(kerala.annual, Some(2600.0));
        assert_eq!(table.rows()[1].annual, None);
        assert!(table.columns().contains(&"Jan-Feb".to_string()));
    }

    #[test]
    fn missing_files_are_absent() {
        let dir = data_dir(&[]);
        let source = FileDatasetSource::new(dir.path());

        assert!(source.load_crop_production().unwrap().is_none());
        assert!(source.load_rainfall().unwrap().is_none());
        assert!(source.load_social_groups().unwrap().is_none());
    }

    #[test]
    fn social_groups_keep_shape_only() {
        let dir = data_dir(&[("social_groups.csv", "State,SC,ST\nBihar,1,2\nGoa,3,4\n")]);

        let table = FileDatasetSource::new(dir.path())
            .load_social_groups()
            .unwrap()
            .unwrap();

        assert_eq!(table.columns, vec!["State", "SC", "ST"]);
        assert_eq!(table.row_count, 2);
    }

    #[test]
    fn missing_required_column_fails() {
        let dir = data_dir(&[("crop_production.csv", "State_Name,Crop\nPunjab,Wheat\n")]);

        let err = FileDatasetSource::new(dir.path())
            .load_crop_production()
            .unwrap_err();

        assert!(matches!(err, LoadError::MissingColumn { column: "District_Name", .. }));
    }

    #[test]
    fn bad_year_fails_with_row() {
        let csv = "SD_Name,YEAR,ANNUAL\nKerala,nineteen,100\n";
        let dir = data_dir(&[("rainfall.csv", csv)]);

        let err = FileDatasetSource::new(dir.path())
            .with_rainfall_file("rainfall.csv")
            .load_rainfall()
            .unwrap_err();

        assert!(matches!(err, LoadError::InvalidValue { row: 1, column: "YEAR", .. }));
    }

    #[test]
    fn bad_number_fails() {
        let csv = "State_Name,District_Name,Crop_Year,Season,Crop,Area,Production\n\
                   Goa,North Goa,2001,Rabi,Rice,lots,1\n";
        let dir = data_dir(&[("crop_production.csv", csv)]);

        let err = FileDatasetSource::new(dir.path())
            .load_crop_production()
            .unwrap_err();

        assert!(matches!(err, LoadError::InvalidValue { column: "Area", .. }));
    }

    #[test]
    fn store_loads_from_directory() {
        let dir = data_dir(&[
            ("crop_production.csv", CROPS),
            ("rainfall.csv", RAINFALL),
        ]);
        let source = FileDatasetSource::new(dir.path()).with_rainfall_file("rainfall.csv");

        let store = TabularStore::load(&source).unwrap();

        assert_eq!(store.row_count(DatasetKind::CropProduction), Some(3));
        assert_eq!(store.row_count(DatasetKind::Rainfall), Some(2));
        assert_eq!(store.row_count(DatasetKind::SocialGroups), None);
    }
}
