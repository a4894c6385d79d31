//! Reading JSON inputs and writing JSON results.

use std::io::Write;
use std::path::Path;

use parcelwise_core::{JsonLineItem, check_unit_count};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::CliError;

/// Read and parse a JSON file.
///
/// # Errors
///
/// Returns `CliError::Read` if the file cannot be read and
/// `CliError::Parse` if it does not hold the expected JSON.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), bytes = content.len(), "Read input file");
    parse_json(path, &content)
}

fn parse_json<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, CliError> {
    serde_json::from_str(content).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Wrap raw order line items, refusing orders that expand to too many units.
///
/// # Errors
///
/// Returns `CliError::TooManyUnits` if the quantities add up to more than
/// [`parcelwise_core::MAX_UNITS`].
pub fn line_items(items: &[Value]) -> Result<Vec<JsonLineItem<'_>>, CliError> {
    let items: Vec<JsonLineItem<'_>> = items.iter().map(JsonLineItem::new).collect();
    check_unit_count(&items)?;
    Ok(items)
}

/// Write `value` to stdout as pretty JSON.
///
/// # Errors
///
/// Returns `CliError::Write` if serialisation or the write fails.
pub fn write_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    stdout
        .write_all(b"\n")
        .map_err(|e| CliError::Write(serde_json::Error::io(e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parcelwise_core::BoxTemplate;

    use super::*;

    #[test]
    fn test_parse_json_reports_path() {
        let err = parse_json::<Vec<BoxTemplate>>(Path::new("boxes.json"), "[{").unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
        assert!(err.to_string().contains("boxes.json"));
    }

    #[test]
    fn test_parse_json_validates_boxes() {
        let err = parse_json::<Vec<BoxTemplate>>(
            Path::new("boxes.json"),
            r#"[{ "id": "B", "length": -1, "width": 10, "height": 10 }]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_line_items_refuses_huge_quantity() {
        let items = vec![serde_json::json!({ "quantity": 4_294_967_295_u64, "variant": { "weight": 1 } })];
        let err = line_items(&items).unwrap_err();
        assert!(matches!(err, CliError::TooManyUnits(_)));
        assert!(err.to_string().contains("4294967295"));
    }

    #[tokio::test]
    async fn test_read_json_missing_file() {
        let err = read_json::<Vec<BoxTemplate>>(Path::new("/nonexistent/boxes.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }
}
