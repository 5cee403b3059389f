pub mod file;
pub mod stdin;

use device_analytics_core::DeviceRecord;
use serde_json::Value;

/// Raw device data as read from a file or stdin.
pub enum RawInput {
    Json(Value),
    Devices(Vec<DeviceRecord>),
}

/// Read from `--input` when given, otherwise from piped stdin.
/// CSV is detected by the `.csv` extension or, on stdin, by content that
/// does not look like JSON.
pub fn read_raw(path: Option<&str>) -> Result<Option<RawInput>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        let raw = if path.to_lowercase().ends_with(".csv") {
            RawInput::Devices(file::read_devices_csv(path)?)
        } else {
            RawInput::Json(file::read_json_value(path)?)
        };
        return Ok(Some(raw));
    }

    let Some(text) = stdin::read_stdin()? else {
        return Ok(None);
    };
    if text.starts_with('{') || text.starts_with('[') {
        Ok(Some(RawInput::Json(serde_json::from_str(&text)?)))
    } else {
        Ok(Some(RawInput::Devices(file::parse_devices_csv(text.as_bytes())?)))
    }
}
