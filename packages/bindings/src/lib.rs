use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

/// Full portfolio analytics. Input: `{ devices, as_of, assumptions? }`.
#[napi]
pub fn analyze_portfolio(input_json: String) -> NapiResult<String> {
    let input: device_analytics_core::portfolio::PortfolioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = device_analytics_core::portfolio::calculate_portfolio_analytics(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Single device
// ---------------------------------------------------------------------------

/// Analytics for one device. Input: `{ device, as_of, assumptions? }`.
#[napi]
pub fn device_analytics(input_json: String) -> NapiResult<String> {
    let input: device_analytics_core::device::DeviceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = device_analytics_core::device::calculate_device_analytics(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn depreciation_value(input_json: String) -> NapiResult<String> {
    let input: device_analytics_core::depreciation::DepreciationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = device_analytics_core::depreciation::calculate_depreciation(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn warranty_value(input_json: String) -> NapiResult<String> {
    let input: device_analytics_core::warranty::WarrantyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        device_analytics_core::warranty::calculate_warranty(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
