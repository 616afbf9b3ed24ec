//! Google Sheets v4 REST store

use std::time::{Duration, Instant};

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::credentials::{AccessToken, ServiceAccountKey};
use crate::error::{SheetsError, SheetsResult};
use crate::store::{quote_title, row_range, SheetStore};

/// Default API root
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// Connection settings for [`GoogleSheetsStore`]
#[derive(Debug, Clone)]
pub struct GoogleSheetsConfig {
    /// Document identifier (the long id in the sheet URL)
    pub spreadsheet_id: String,
    /// API root, overridable for tests
    pub api_base: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl GoogleSheetsConfig {
    /// Settings for a document with the default API root
    pub fn new<S: Into<String>>(spreadsheet_id: S) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            api_base: SHEETS_API_BASE.to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// A spreadsheet document on Google Sheets, accessed as a service account
pub struct GoogleSheetsStore {
    client: Client,
    config: GoogleSheetsConfig,
    key: ServiceAccountKey,
    token: Option<AccessToken>,
}

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
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl GoogleSheetsStore {
    /// Authenticate and build a store.
    ///
    /// A token is requested immediately so that a rejected key surfaces as
    /// [`SheetsError::Auth`] here rather than on the first read.
    pub fn connect(key: ServiceAccountKey, config: GoogleSheetsConfig) -> SheetsResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let mut store = Self {
            client,
            config,
            key,
            token: None,
        };
        store.bearer()?;
        tracing::info!(
            "Connected to spreadsheet {} as {}",
            store.config.spreadsheet_id,
            store.key.client_email
        );
        Ok(store)
    }

    fn bearer(&mut self) -> SheetsResult<String> {
        let fresh = match &self.token {
            Some(token) if !token.is_stale(Instant::now()) => None,
            _ => Some(self.key.fetch_token(&self.client)?),
        };
        if let Some(token) = fresh {
            self.token = Some(token);
        }
        self.token
            .as_ref()
            .map(|t| t.value().to_string())
            .ok_or_else(|| SheetsError::Auth("no access token".into()))
    }

    fn url(&self, segments: &[&str]) -> SheetsResult<Url> {
        let mut url = Url::parse(&self.config.api_base).map_err(|e| SheetsError::other(format!("bad API base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::other("API base cannot carry a path"))?
            .pop_if_empty()
            .push("spreadsheets")
            .extend(segments);
        Ok(url)
    }

    fn spreadsheet_url(&self, suffix: &str) -> SheetsResult<Url> {
        let id = format!("{}{}", self.config.spreadsheet_id, suffix);
        self.url(&[&id])
    }

    fn values_url(&self, range: &str, suffix: &str) -> SheetsResult<Url> {
        let range = format!("{range}{suffix}");
        self.url(&[&self.config.spreadsheet_id, "values", &range])
    }

    fn send(&mut self, request: RequestBuilder) -> SheetsResult<Response> {
        let token = self.bearer()?;
        let response = request.bearer_auth(token).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: Value = response.json().unwrap_or(Value::Null);
        let message = body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or("no error message")
            .to_string();
        tracing::warn!("Sheets API returned {status}: {message}");

        match status.as_u16() {
            401 | 403 => Err(SheetsError::Auth(message)),
            code => Err(SheetsError::Api { status: code, message }),
        }
    }

    fn sheets(&mut self) -> SheetsResult<Vec<SheetProperties>> {
        let mut url = self.spreadsheet_url("")?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties(sheetId,title)");
        let request = self.client.get(url);
        let meta: SpreadsheetMeta = self.send(request)?.json()?;
        Ok(meta.sheets.into_iter().map(|s| s.properties).collect())
    }

    fn sheet_id(&mut self, title: &str) -> SheetsResult<i64> {
        self.sheets()?
            .into_iter()
            .find(|p| p.title == title)
            .map(|p| p.sheet_id)
            .ok_or_else(|| SheetsError::WorksheetNotFound(title.to_string()))
    }

    fn batch_update(&mut self, request: Value) -> SheetsResult<()> {
        let url = self.spreadsheet_url(":batchUpdate")?;
        let request = self.client.post(url).json(&json!({ "requests": [request] }));
        self.send(request)?;
        Ok(())
    }

    fn put_values(&mut self, range: &str, rows: &[Vec<String>]) -> SheetsResult<()> {
        let mut url = self.values_url(range, "")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let request = self.client.put(url).json(&json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": rows,
        }));
        self.send(request)?;
        Ok(())
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SheetStore for GoogleSheetsStore {
    fn worksheet_titles(&mut self) -> SheetsResult<Vec<String>> {
        Ok(self.sheets()?.into_iter().map(|p| p.title).collect())
    }

    fn read_values(&mut self, title: &str) -> SheetsResult<Vec<Vec<String>>> {
        let url = self.values_url(&quote_title(title), "")?;
        let request = self.client.get(url);
        let range: ValueRange = self.send(request)?.json()?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    fn append_row(&mut self, title: &str, row: &[String]) -> SheetsResult<()> {
        let mut url = self.values_url(&quote_title(title), ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let request = self.client.post(url).json(&json!({ "values": [row] }));
        self.send(request)?;
        Ok(())
    }

    fn update_row(&mut self, title: &str, row_number: usize, row: &[String]) -> SheetsResult<()> {
        let range = format!("{}!{}", quote_title(title), row_range(row_number, row.len()));
        self.put_values(&range, &[row.to_vec()])
    }

    fn add_worksheet(&mut self, title: &str) -> SheetsResult<()> {
        self.batch_update(json!({ "addSheet": { "properties": { "title": title } } }))
    }

    fn delete_worksheet(&mut self, title: &str) -> SheetsResult<()> {
        let sheet_id = self.sheet_id(title)?;
        self.batch_update(json!({ "deleteSheet": { "sheetId": sheet_id } }))
    }

    fn rename_worksheet(&mut self, from: &str, to: &str) -> SheetsResult<()> {
        let sheet_id = self.sheet_id(from)?;
        self.batch_update(json!({
            "updateSheetProperties": {
                "properties": { "sheetId": sheet_id, "title": to },
                "fields": "title",
            }
        }))
    }

    fn write_values(&mut self, title: &str, rows: &[Vec<String>]) -> SheetsResult<()> {
        let range = format!("{}!A1", quote_title(title));
        self.put_values(&range, rows)
    }

    fn document_url(&self) -> Option<String> {
        Some(format!(
            "https://docs.google.com/spreadsheets/d/{}/edit",
            self.config.spreadsheet_id
        ))
    }
}
