use anyhow::Result;
use arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use log::info;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::models::DataTable;

pub struct ParquetFormatter {
    row_group_size: usize,
}

impl ParquetFormatter {
    pub fn new(row_group_size: usize) -> Self {
        Self { row_group_size }
    }

    pub fn convert(&self, table: &DataTable, output_path: &Path) -> Result<()> {
        let column_types = self.infer_schema(table);

        let fields: Vec<Field> = table
            .columns
            .iter()
            .zip(&column_types)
            .map(|(name, data_type)| Field::new(name.as_str(), data_type.clone(), true))
            .collect();
        let schema = Arc::new(Schema::new(fields));

        let arrays = column_types
            .iter()
            .enumerate()
            .map(|(idx, data_type)| self.build_typed_array(table, idx, data_type))
            .collect::<Vec<ArrayRef>>();

        let batch = RecordBatch::try_new(schema.clone(), arrays)?;

        let file = File::create(output_path)?;
        let props = WriterProperties::builder()
            .set_max_row_group_size(self.row_group_size.max(1))
            .build();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;

        writer.write(&batch)?;
        writer.close()?;

        info!(
            "Wrote {} rows to {} ({} columns)",
            table.len(),
            output_path.display(),
            table.columns.len()
        );
        Ok(())
    }

    /// A column is Float64 when it has at least one value and every non-empty
    /// value parses as a number. Everything else stays Utf8.
    fn infer_schema(&self, table: &DataTable) -> Vec<DataType> {
        (0..table.columns.len())
            .map(|idx| {
                let mut seen = false;
                let numeric = table.rows.iter().all(|row| {
                    let value = row[idx].trim();
                    if value.is_empty() {
                        return true;
                    }
                    seen = true;
                    value.parse::<f64>().is_ok()
                });

                if numeric && seen {
                    DataType::Float64
                } else {
                    DataType::Utf8
                }
            })
            .collect()
    }

    fn build_typed_array(&self, table: &DataTable, idx: usize, data_type: &DataType) -> ArrayRef {
        match data_type {
            DataType::Float64 => {
                let values: Vec<Option<f64>> = table
                    .rows
                    .iter()
                    .map(|row| row[idx].trim().parse::<f64>().ok())
                    .collect();
                Arc::new(Float64Array::from(values))
            }
            _ => {
                let values: Vec<Option<&str>> = table
                    .rows
                    .iter()
                    .map(|row| {
                        let value = row[idx].as_str();
                        if value.is_empty() {
                            None
                        } else {
                            Some(value)
                        }
                    })
                    .collect();
                Arc::new(StringArray::from(values))
            }
        }
    }
}
