//! CSV decoding shared by the equipment table and the import sources

use std::path::Path;

use crate::shared::InfraError;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row plus string rows, cells trimmed of the BOM only.
#[derive(Debug, Default)]
pub struct CsvSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Decode UTF-8 (optionally BOM-prefixed) CSV bytes. Rows may be ragged.
pub fn decode(path: &Path, bytes: &[u8]) -> Result<CsvSheet, InfraError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|e| InfraError::malformed(path, format!("not valid UTF-8: {}", e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| InfraError::malformed(path, e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| InfraError::malformed(path, e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(CsvSheet { headers, rows })
}

/// Encode a header and rows as BOM-prefixed UTF-8 CSV.
pub fn encode<'a, H, R, C>(headers: H, rows: R) -> Result<Vec<u8>, InfraError>
where
    H: IntoIterator<Item = &'a str>,
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = &'a str>,
{
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| InfraError::Csv(e.into_error().into()))
}
