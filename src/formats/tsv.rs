use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;
use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::models::DataTable;

/// Writes a table as tab-separated text: one header line, one line per row,
/// no index column.
pub struct TsvFormatter;

impl TsvFormatter {
    pub fn convert(table: &DataTable, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(Terminator::Any(b'\n'))
            .quote_style(QuoteStyle::Necessary)
            .from_writer(file);

        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", table.len(), output_path.display());
        Ok(())
    }
}
