use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        tracing::error!(error = %e, "failed to write CSV output");
    }
}

/// Object results become a `field,value` block of scalars followed by one
/// titled block per nested list of rows; array results are a single block.
pub fn write_csv<W: io::Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);

    match value.get("result").unwrap_or(value) {
        Value::Object(result) => write_sections(&mut wtr, result)?,
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        scalar => wtr.write_record([cell(scalar)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_sections<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    result: &Map<String, Value>,
) -> csv::Result<()> {
    let (sections, scalars): (Vec<_>, Vec<_>) = result
        .iter()
        .partition(|(_, v)| is_row_list(v));

    wtr.write_record(["field", "value"])?;
    for (key, val) in scalars {
        wtr.write_record([key.as_str(), &cell(val)])?;
    }

    for (key, val) in sections {
        if let Value::Array(rows) = val {
            wtr.write_record([""])?;
            wtr.write_record([key.as_str()])?;
            write_rows(wtr, rows)?;
        }
    }
    Ok(())
}

fn is_row_list(value: &Value) -> bool {
    matches!(value, Value::Array(rows) if !rows.is_empty() && rows.iter().all(Value::is_object))
}

/// Header from the first row's keys, then one record per row.
fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([cell(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(cell).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // device_names and similar
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_nested_rows_become_sections() {
        let value = json!({
            "result": {
                "total_devices": 2,
                "total_current_value": "1500",
                "warranty_timeline": [
                    {"device_names": ["Pixel", "iPad"], "expiring_count": 2, "month": "2025-03"}
                ],
                "category_breakdown": []
            },
            "warnings": []
        });
        let out = render(&value);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "field,value");
        assert!(lines.contains(&"total_devices,2"));
        assert!(lines.contains(&"category_breakdown,"));
        assert!(lines.contains(&"warranty_timeline"));
        assert!(lines.contains(&"device_names,expiring_count,month"));
        assert!(lines.contains(&"Pixel; iPad,2,2025-03"));
        assert!(!out.contains("[{"));
    }

    #[test]
    fn test_array_result_is_one_block() {
        let value = json!({
            "result": [
                {"month": "2025-02", "portfolio_value": "900"},
                {"month": "2025-03", "portfolio_value": "850"}
            ]
        });
        assert_eq!(
            render(&value),
            "month,portfolio_value\n2025-02,900\n2025-03,850\n"
        );
    }
}
