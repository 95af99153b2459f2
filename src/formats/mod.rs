//! Serializers for the canonical table.

pub mod parquet;
pub mod tsv;
