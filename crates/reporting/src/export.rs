//! Spreadsheet and CSV reports of a partition.

use std::{
    fmt,
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

use crate::{ExportError, record::NormalizedRecord};

/// Rows available below the header in a single worksheet.
const MAX_DATA_ROWS: usize = 1_048_575;

const USER_HEADERS: [&str; 7] = [
    "Name",
    "Email",
    "Contact",
    "City",
    "State",
    "Status",
    "Joined Date",
];

const PROVIDER_HEADERS: [&str; 8] = [
    "Name",
    "Email",
    "Contact",
    "Business",
    "City",
    "State",
    "Status",
    "Joined Date",
];

/// Which partition a report covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Users,
    Providers,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Providers => "providers",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

/// Formats the export date used in file names, e.g. `01-05-2024`.
pub fn export_stamp(date: NaiveDate) -> String {
    date.format("%m-%d-%Y").to_string()
}

/// A tabular projection of a partition: one header row plus one row per
/// record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    kind: ReportKind,
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

impl Report {
    pub fn build(kind: ReportKind, records: &[NormalizedRecord]) -> Self {
        let headers: &'static [&'static str] = match kind {
            ReportKind::Users => &USER_HEADERS,
            ReportKind::Providers => &PROVIDER_HEADERS,
        };
        let rows = records.iter().map(|record| project(kind, record)).collect();
        Self {
            kind,
            headers,
            rows,
        }
    }

    pub fn headers(&self) -> &[&'static str] {
        self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// `<kind>-<MM-DD-YYYY>.<ext>`
    pub fn file_name(&self, format: ExportFormat, date: NaiveDate) -> String {
        format!("{}-{}.{}", self.kind, export_stamp(date), format.extension())
    }

    pub fn encode(&self, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Xlsx => self.to_xlsx(),
            ExportFormat::Csv => self.to_csv(),
        }
    }

    /// Builds a single-sheet workbook named after the report kind.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        check_rows(self.rows.len())?;

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.kind.as_str())?;

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as ColNum, *header, &header_format)?;
        }
        for (idx, row) in self.rows.iter().enumerate() {
            let row_num = (idx + 1) as RowNum;
            for (col, value) in row.iter().enumerate() {
                worksheet.write_string(row_num, col as ColNum, value.as_str())?;
            }
        }
        worksheet.autofit();

        Ok(workbook.save_to_buffer()?)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.write_record(self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))
    }

    /// Encodes the report and writes it into `dir`, returning the file path.
    pub fn write_to(
        &self,
        dir: &Path,
        format: ExportFormat,
        date: NaiveDate,
    ) -> Result<PathBuf, ExportError> {
        let payload = self.encode(format)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name(format, date));
        fs::write(&path, payload)?;
        tracing::info!(
            kind = %self.kind,
            rows = self.rows.len(),
            "report written to {}",
            path.display()
        );
        Ok(path)
    }
}

fn project(kind: ReportKind, record: &NormalizedRecord) -> Vec<String> {
    let mut row = vec![
        record.name.clone(),
        record.email.clone(),
        record.contact.clone(),
    ];
    if kind == ReportKind::Providers {
        row.push(record.business_name.clone());
    }
    row.extend([
        record.city.clone(),
        record.state.clone(),
        record.status.clone(),
        record.joined.clone(),
    ]);
    row
}

fn check_rows(rows: usize) -> Result<(), ExportError> {
    if rows > MAX_DATA_ROWS {
        return Err(ExportError::TooManyRows {
            rows,
            max: MAX_DATA_ROWS,
        });
    }
    Ok(())
}
