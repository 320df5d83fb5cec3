//! Google Sheets REST v4 backend
//!
//! Every value is written with `valueInputOption=USER_ENTERED`, so numeric
//! and date strings become typed cells just as if they were typed in.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, trace};
use ureq::Agent;
use ureq::http::Response;

use crate::errors::{Result, TrafficError};
use crate::storage::{AccessTokenProvider, Row, SheetRange, SheetStore};
use crate::utils::http;

const VALUE_INPUT_OPTION: &str = "USER_ENTERED";
/// 新建工作表时写入表头的区域
const HEADER_CELLS: &str = "A1:AA";

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
    #[serde(default)]
    updated_rows: usize,
}

#[derive(Deserialize)]
struct AppendValuesResponse {
    #[serde(default)]
    updates: UpdateValuesResponse,
}

/// Spreadsheet addressed by id, authorized through an `AccessTokenProvider`
pub struct GoogleSheetsStore {
    agent: Agent,
    api_url: String,
    spreadsheet_id: String,
    tokens: Box<dyn AccessTokenProvider>,
}

impl GoogleSheetsStore {
    pub fn new(
        agent: Agent,
        api_url: &str,
        spreadsheet_id: &str,
        tokens: Box<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            tokens,
        }
    }

    fn spreadsheet_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}",
            self.api_url,
            urlencoding::encode(&self.spreadsheet_id)
        )
    }

    fn values_url(&self, range: &SheetRange, action: &str) -> String {
        format!(
            "{}/values/{}{}",
            self.spreadsheet_url(),
            urlencoding::encode(&range.a1()),
            action
        )
    }

    fn bearer(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.tokens.access_token()?))
    }

    /// Non-2xx responses are fatal for the store
    fn expect_success(what: &str, mut resp: Response<ureq::Body>) -> Result<Response<ureq::Body>> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        Err(TrafficError::store(format!(
            "{} failed with HTTP {}: {}",
            what,
            status.as_u16(),
            http::error_body(&mut resp)
        )))
    }

    fn write_values(&self, range: &SheetRange, rows: &[Row]) -> Result<usize> {
        let resp = self
            .agent
            .put(&self.values_url(range, ""))
            .header("Authorization", self.bearer()?)
            .query("valueInputOption", VALUE_INPUT_OPTION)
            .send_json(json!({ "values": rows }))?;
        let mut resp = Self::expect_success(&format!("Update {}", range), resp)?;
        let body: UpdateValuesResponse = http::read_json(&mut resp)?;
        Ok(body.updated_rows)
    }
}

impl SheetStore for GoogleSheetsStore {
    fn backend_name(&self) -> &'static str {
        "google-sheets"
    }

    fn sheet_names(&self) -> Result<Vec<String>> {
        let resp = self
            .agent
            .get(&self.spreadsheet_url())
            .header("Authorization", self.bearer()?)
            .query("fields", "sheets.properties.title")
            .call()?;
        let mut resp = Self::expect_success("List sheets", resp)?;
        let meta: SpreadsheetMeta = http::read_json(&mut resp)?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }

    fn create_sheet(&self, name: &str, index: usize, header: &[&str]) -> Result<()> {
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": { "title": name, "index": index }
                }
            }]
        });
        let resp = self
            .agent
            .post(&format!("{}:batchUpdate", self.spreadsheet_url()))
            .header("Authorization", self.bearer()?)
            .send_json(body)?;
        Self::expect_success(&format!("Create sheet '{}'", name), resp)?;
        debug!("Created sheet '{}' at index {}", name, index);

        let header_row: Row = header.iter().map(|h| h.to_string()).collect();
        self.write_values(&SheetRange::new(name, HEADER_CELLS), &[header_row])?;
        Ok(())
    }

    fn read(&self, range: &SheetRange) -> Result<Vec<Row>> {
        let resp = self
            .agent
            .get(&self.values_url(range, ""))
            .header("Authorization", self.bearer()?)
            .call()?;
        let mut resp = Self::expect_success(&format!("Read {}", range), resp)?;
        let body: ValueRange = http::read_json(&mut resp)?;
        trace!("Read {} rows from {}", body.values.len(), range);
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    fn update(&self, range: &SheetRange, rows: &[Row]) -> Result<usize> {
        self.write_values(range, rows)
    }

    fn append(&self, range: &SheetRange, rows: &[Row]) -> Result<usize> {
        let resp = self
            .agent
            .post(&self.values_url(range, ":append"))
            .header("Authorization", self.bearer()?)
            .query("valueInputOption", VALUE_INPUT_OPTION)
            .send_json(json!({ "values": rows }))?;
        let mut resp = Self::expect_success(&format!("Append {}", range), resp)?;
        let body: AppendValuesResponse = http::read_json(&mut resp)?;
        Ok(body.updates.updated_rows)
    }

    fn clear(&self, range: &SheetRange) -> Result<()> {
        let resp = self
            .agent
            .post(&self.values_url(range, ":clear"))
            .header("Authorization", self.bearer()?)
            .send_json(json!({}))?;
        Self::expect_success(&format!("Clear {}", range), resp)?;
        Ok(())
    }
}

/// 将单元格值统一转为字符串
fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => (if b { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StaticTokenProvider;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(json!("/docs")), "/docs");
        assert_eq!(cell_to_string(json!(12)), "12");
        assert_eq!(cell_to_string(json!(null)), "");
        assert_eq!(cell_to_string(json!(true)), "TRUE");
    }

    #[test]
    fn test_urls_encode_range() {
        let store = GoogleSheetsStore::new(
            Agent::new_with_defaults(),
            "https://sheets.googleapis.com/",
            "abc123",
            Box::new(StaticTokenProvider::new("t")),
        );
        assert_eq!(
            store.values_url(&SheetRange::new("paths", "A2:C"), ":append"),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/paths%21A2%3AC:append"
        );
    }

    #[test]
    fn test_append_response_without_updates_reports_zero() {
        let body: AppendValuesResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.updates.updated_rows, 0);
    }
}
