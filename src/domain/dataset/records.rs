//! Typed rows and the column vocabulary of the three datasets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three fixed datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    CropProduction,
    Rainfall,
    SocialGroups,
}

impl DatasetKind {
    /// Wire name used in directives and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::CropProduction => "crop_production",
            DatasetKind::Rainfall => "rainfall",
            DatasetKind::SocialGroups => "social_groups",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar month of a rainfall total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Zero-based position in the calendar.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Column header in the rainfall source file.
    pub fn header(&self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }
}

/// Closed set of columns the filter and aggregation layer can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    State,
    District,
    Year,
    Season,
    Crop,
    Area,
    Production,
    Subdivision,
    Month(Month),
    Annual,
}

impl Column {
    /// Header of this column in its source file. The year header differs
    /// per dataset, see [`DatasetKind::year_header`].
    pub fn header(&self) -> &'static str {
        match self {
            Column::State => "State_Name",
            Column::District => "District_Name",
            Column::Year => "Year",
            Column::Season => "Season",
            Column::Crop => "Crop",
            Column::Area => "Area",
            Column::Production => "Production",
            Column::Subdivision => "SD_Name",
            Column::Month(month) => month.header(),
            Column::Annual => "ANNUAL",
        }
    }
}

impl DatasetKind {
    /// Header of the year column in this dataset's source file.
    pub fn year_header(&self) -> &'static str {
        match self {
            DatasetKind::CropProduction => "Crop_Year",
            DatasetKind::Rainfall => "YEAR",
            DatasetKind::SocialGroups => Column::Year.header(),
        }
    }
}

/// Uniform read access to a typed row.
pub trait Record {
    /// Dataset this row type belongs to.
    const KIND: DatasetKind;

    /// The row's year; every filterable dataset has one.
    fn year(&self) -> i32;

    /// Text cell, `None` when missing or when the column does not exist here.
    fn text(&self, column: Column) -> Option<&str>;

    /// Numeric cell, `None` when missing, NaN or not a numeric column here.
    fn number(&self, column: Column) -> Option<f64>;
}

/// A row of the crop production dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecord {
    pub state: Option<String>,
    pub district: Option<String>,
    pub year: i32,
    pub season: Option<String>,
    pub crop: Option<String>,
    pub area: Option<f64>,
    pub production: Option<f64>,
}

impl CropRecord {
    /// Fully-populated row.
    pub fn new(
        state: &str,
        district: &str,
        year: i32,
        season: &str,
        crop: &str,
        area: f64,
        production: f64,
    ) -> Self {
        Self {
            state: Some(state.to_string()),
            district: Some(district.to_string()),
            year,
            season: Some(season.to_string()),
            crop: Some(crop.to_string()),
            area: Some(area),
            production: Some(production),
        }
    }
}

impl Record for CropRecord {
    const KIND: DatasetKind = DatasetKind::CropProduction;

    fn year(&self) -> i32 {
        self.year
    }

    fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::State => self.state.as_deref(),
            Column::District => self.district.as_deref(),
            Column::Season => self.season.as_deref(),
            Column::Crop => self.crop.as_deref(),
            _ => None,
        }
    }

    fn number(&self, column: Column) -> Option<f64> {
        let value = match column {
            Column::Year => Some(f64::from(self.year)),
            Column::Area => self.area,
            Column::Production => self.production,
            _ => None,
        };
        value.filter(|v| !v.is_nan())
    }
}

/// A row of the rainfall dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallRecord {
    pub subdivision: Option<String>,
    pub year: i32,
    pub monthly: [Option<f64>; 12],
    pub annual: Option<f64>,
}

impl RainfallRecord {
    /// Row with an annual total and no monthly breakdown.
    pub fn new(subdivision: &str, year: i32, annual: f64) -> Self {
        Self {
            subdivision: Some(subdivision.to_string()),
            year,
            monthly: [None; 12],
            annual: Some(annual),
        }
    }
}

impl Record for RainfallRecord {
    const KIND: DatasetKind = DatasetKind::Rainfall;

    fn year(&self) -> i32 {
        self.year
    }

    fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::Subdivision => self.subdivision.as_deref(),
            _ => None,
        }
    }

    fn number(&self, column: Column) -> Option<f64> {
        let value = match column {
            Column::Year => Some(f64::from(self.year)),
            Column::Month(month) => self.monthly[month.index()],
            Column::Annual => self.annual,
            _ => None,
        };
        value.filter(|v| !v.is_nan())
    }
}

/// A dataset exposed only through its shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaqueTable {
    pub columns: Vec<String>,
    pub row_count: usize,
}
