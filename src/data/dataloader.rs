//! Filesystem glue for train/dev splits: JSON, JSON-lines and CSV.
//!
//! The bootstrapper and evaluator only require ordered slices of
//! [`Example`]; these helpers exist so a dataset on disk can become one
//! without hand-rolling parsing at every call site.

use anyhow::Result;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;

use crate::Example;
use crate::data::example::Fields;

/// Loads examples from a JSON array (`lines = false`) or JSON-lines file.
/// Each record is a flat object of named fields; `input_keys` and
/// `output_keys` designate the split.
pub fn load_json(
    path: &str,
    lines: bool,
    input_keys: Vec<String>,
    output_keys: Vec<String>,
) -> Result<Vec<Example>> {
    let data = fs::read_to_string(path)?;

    let records: Vec<Fields> = if lines {
        data.lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?
    } else {
        serde_json::from_str(&data)?
    };

    Ok(records
        .into_iter()
        .map(|fields| Example::new(fields, input_keys.clone(), output_keys.clone()))
        .collect())
}

/// Writes examples as flat JSON objects, one per line when `lines` is set.
pub fn save_json(path: &str, examples: &[Example], lines: bool) -> Result<()> {
    let records: Vec<Fields> = examples
        .iter()
        .map(|example| example.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .collect();

    let data = if lines {
        records
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n")
    } else {
        serde_json::to_string(&records)?
    };
    fs::write(path, data)?;
    Ok(())
}

/// Loads examples from a delimited file, keying cells by header name.
pub fn load_csv(
    path: &str,
    delimiter: char,
    input_keys: Vec<String>,
    output_keys: Vec<String>,
) -> Result<Vec<Example>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut examples = Vec::new();
    for record in reader.into_records() {
        let record = record?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), cell.into()));
        examples.push(Example::new(
            fields,
            input_keys.clone(),
            output_keys.clone(),
        ));
    }
    Ok(examples)
}

pub fn save_csv(path: &str, examples: &[Example], delimiter: char) -> Result<()> {
    let Some(first) = examples.first() else {
        return Ok(());
    };

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_path(path)?;
    let headers = first.keys();
    writer.write_record(&headers)?;
    for example in examples {
        let row: Vec<String> = headers
            .iter()
            .map(|key| match example.get(key, None) {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
