//! AO<0 count summary across indices
//!
//! For each of the most recent dates, how many members of each index had a
//! negative daily AO. Trading calendars differ between exchanges, so a date
//! an index has no data for is an empty cell, not a zero.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::constants::SUMMARY_DAYS;
use crate::error::Result;

use super::daily::DailyAoTable;

/// One index's AO table and membership, input to the summary
pub struct IndexAo {
    pub name: String,
    pub table: DailyAoTable,
    pub members: Vec<String>,
}

/// date x index table of AO<0 member counts, trimmed to the most recent
/// `SUMMARY_DAYS` dates across all indices
pub struct AoSummary {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    counts: HashMap<(NaiveDate, String), usize>,
}

impl AoSummary {
    pub fn build(per_index: &[IndexAo]) -> Self {
        let columns: Vec<String> = per_index.iter().map(|entry| entry.name.clone()).collect();

        let all_dates: BTreeSet<NaiveDate> = per_index
            .iter()
            .flat_map(|entry| entry.table.dates())
            .collect();
        let dates: Vec<NaiveDate> = all_dates
            .into_iter()
            .rev()
            .take(SUMMARY_DAYS)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();

        let mut counts = HashMap::new();
        for entry in per_index {
            for &date in &dates {
                if let Some(count) = entry.table.negative_count(date, &entry.members) {
                    counts.insert((date, entry.name.clone()), count);
                }
            }
        }

        Self {
            dates,
            columns,
            counts,
        }
    }

    /// Dates in ascending order, already trimmed
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Index names in configuration order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// AO<0 count for (date, index); None when the index has no data that day
    pub fn count(&self, date: NaiveDate, index: &str) -> Option<usize> {
        self.counts.get(&(date, index.to_string())).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Render as CSV with a header row and an explicit Date column
    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["Date".to_string()];
        header.extend(self.columns.iter().cloned());
        writer.write_record(&header)?;

        for &date in &self.dates {
            let mut record = vec![date.format("%Y-%m-%d").to_string()];
            for column in &self.columns {
                record.push(
                    self.count(date, column)
                        .map(|count| count.to_string())
                        .unwrap_or_default(),
                );
            }
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| crate::error::AppError::Io(format!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| crate::error::AppError::Parse(format!("CSV not UTF-8: {}", e)))
    }

    /// Write the CSV rendering to a file
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_csv_string()?)?;
        Ok(())
    }
}
