//! Spreadsheet-backed strain cache over the Google Sheets values API.
//!
//! The sheet is the system-of-record: one row per strain, column order
//! fixed by the existing header row, headers matching the field schema's
//! column names. Absent fields are written as the absence sentinel.
//! Concurrent row mutations are serialized by the sheet itself; no
//! locking is layered on top.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{ResearchError, Result};
use crate::extract::parse_rating_entries;
use crate::record::{is_absent_token, Rating, StrainRecord, ABSENCE_TOKENS};
use crate::schema::{FieldId, STRAIN_SCHEMA};
use crate::traits::store::{CacheHit, RowLocator, StrainStore};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Header cell for the bookkeeping column appended after the field columns.
const UPDATED_AT_COLUMN: &str = "Updated At";

/// Separator for multi-value cells (list bullets, rating parts). Comma
/// stays reserved for the comma-list fields themselves.
const CELL_SEPARATOR: &str = " | ";

/// Strain cache backed by a Google Sheets spreadsheet.
pub struct SheetsStore {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    token: String,
    tab: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsStore {
    /// Create a store for the given spreadsheet, authenticated with a
    /// bearer token. Token acquisition is the caller's concern.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        token: impl Into<String>,
        tab: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
            tab: tab.into(),
        }
    }

    /// Override the API base URL (for tests and proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, range
        )
    }

    fn data_range(&self) -> String {
        format!("{}!A:Z", self.tab)
    }

    fn row_range(&self, row: usize) -> String {
        format!("{}!A{row}:Z{row}", self.tab)
    }

    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>> {
        let response = self
            .http
            .get(self.values_url(&self.data_range()))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(ResearchError::cache)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResearchError::cache_msg(format!(
                "sheets read failed with status {status}: {body}"
            )));
        }

        let range: ValueRange = response.json().await.map_err(ResearchError::cache)?;
        Ok(range.values)
    }

    async fn write_row(&self, url: String, put: bool, row: Vec<String>) -> Result<()> {
        let body = json!({ "values": [row] });
        let request = if put {
            self.http.put(url)
        } else {
            self.http.post(url)
        };
        let response = request
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await
            .map_err(ResearchError::cache)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResearchError::cache_msg(format!(
                "sheets write failed with status {status}: {body}"
            )));
        }
        Ok(())
    }

    async fn fetch_header(&self) -> Result<Vec<String>> {
        let rows = self.fetch_rows().await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }
}

#[async_trait]
impl StrainStore for SheetsStore {
    async fn find_by_query(&self, query: &str) -> Result<Option<CacheHit>> {
        let rows = self.fetch_rows().await?;
        let Some((header, data)) = rows.split_first() else {
            return Ok(None);
        };

        for (idx, row) in data.iter().enumerate() {
            let record = row_to_record(header, row);
            if record.name.trim().is_empty() {
                continue;
            }
            if record.matches_query(query) {
                // Data rows start at sheet row 2, below the header
                return Ok(Some(CacheHit {
                    record,
                    locator: RowLocator::new(idx + 2),
                }));
            }
        }
        Ok(None)
    }

    async fn insert(&self, record: &StrainRecord) -> Result<()> {
        let mut header = self.fetch_header().await?;
        if header.is_empty() {
            header = default_header();
            self.write_row(
                format!("{}:append", self.values_url(&self.data_range())),
                false,
                header.clone(),
            )
            .await?;
        }

        debug!(strain = %record.name, "appending strain row");
        self.write_row(
            format!("{}:append", self.values_url(&self.data_range())),
            false,
            record_to_row(&header, record),
        )
        .await
    }

    async fn update(&self, locator: RowLocator, record: &StrainRecord) -> Result<()> {
        let header = self.fetch_header().await?;
        if header.is_empty() {
            return Err(ResearchError::cache_msg("sheet has no header row"));
        }

        debug!(strain = %record.name, row = locator.row, "updating strain row");
        self.write_row(
            self.values_url(&self.row_range(locator.row)),
            true,
            record_to_row(&header, record),
        )
        .await
    }
}

/// The header row written to a fresh sheet: schema columns in report
/// order plus the bookkeeping timestamp.
pub fn default_header() -> Vec<String> {
    STRAIN_SCHEMA
        .iter()
        .map(|s| s.column.to_string())
        .chain([UPDATED_AT_COLUMN.to_string()])
        .collect()
}

fn column_field(header_cell: &str) -> Option<FieldId> {
    STRAIN_SCHEMA
        .iter()
        .find(|s| s.column.eq_ignore_ascii_case(header_cell.trim()))
        .map(|s| s.id)
}

/// Decode a sheet row through the header's column mapping.
pub fn row_to_record(header: &[String], row: &[String]) -> StrainRecord {
    let mut record = StrainRecord::default();
    for (idx, cell) in row.iter().enumerate() {
        let Some(field) = header.get(idx).and_then(|h| column_field(h)) else {
            continue;
        };
        let cell = cell.trim();
        if cell.is_empty() || is_absent_token(cell) {
            continue;
        }
        decode_cell(&mut record, field, cell);
    }
    record
}

/// Encode a record into a row laid out by the header's column order.
/// Absent fields are written as the absence sentinel.
pub fn record_to_row(header: &[String], record: &StrainRecord) -> Vec<String> {
    header
        .iter()
        .map(|h| {
            if let Some(field) = column_field(h) {
                encode_cell(record, field)
            } else if h.trim().eq_ignore_ascii_case(UPDATED_AT_COLUMN) {
                Utc::now().to_rfc3339()
            } else {
                String::new()
            }
        })
        .collect()
}

fn decode_cell(record: &mut StrainRecord, field: FieldId, cell: &str) {
    let split = |separator: char| -> Vec<String> {
        cell.split(separator)
            .map(str::trim)
            .filter(|s| !s.is_empty() && !is_absent_token(s))
            .map(str::to_string)
            .collect()
    };

    match field {
        FieldId::Name => record.name = cell.to_string(),
        FieldId::Hybridization => record.hybridization = cell.to_string(),
        FieldId::ReleaseDate => record.release_date = cell.to_string(),
        FieldId::Lineage => record.lineage = cell.to_string(),
        FieldId::AltNames => record.alt_names = split(','),
        FieldId::Nicknames => record.nicknames = split(','),
        FieldId::Awards => record.awards = split(','),
        FieldId::Availability => record.availability = split(','),
        FieldId::Flavors => record.flavors = split('|'),
        FieldId::Effects => record.effects = split('|'),
        FieldId::PhysicalCharacteristics => record.physical_characteristics = split('|'),
        FieldId::Trivia => record.trivia = split('|'),
        FieldId::SimilarStrains => record.similar_strains = split('|'),
        FieldId::Rating => {
            let entries: Vec<&str> = cell.split('|').map(str::trim).collect();
            record.rating = parse_rating_entries(&entries);
        }
    }
}

fn encode_cell(record: &StrainRecord, field: FieldId) -> String {
    if !record.has_field(field) {
        // Canonical sentinel spelling
        return capitalize(ABSENCE_TOKENS[0]);
    }

    match field {
        FieldId::Name => record.name.clone(),
        FieldId::Hybridization => record.hybridization.clone(),
        FieldId::ReleaseDate => record.release_date.clone(),
        FieldId::Lineage => record.lineage.clone(),
        FieldId::AltNames => record.alt_names.join(", "),
        FieldId::Nicknames => record.nicknames.join(", "),
        FieldId::Awards => record.awards.join(", "),
        FieldId::Availability => record.availability.join(", "),
        FieldId::Flavors => record.flavors.join(CELL_SEPARATOR),
        FieldId::Effects => record.effects.join(CELL_SEPARATOR),
        FieldId::PhysicalCharacteristics => {
            record.physical_characteristics.join(CELL_SEPARATOR)
        }
        FieldId::Trivia => record.trivia.join(CELL_SEPARATOR),
        FieldId::SimilarStrains => record.similar_strains.join(CELL_SEPARATOR),
        FieldId::Rating => record
            .rating
            .as_ref()
            .map(rating_cell)
            .unwrap_or_default(),
    }
}

/// Rating cells reuse the report's textual convention so the extractor's
/// rating parser is the single codec for provider text and stored rows.
fn rating_cell(rating: &Rating) -> String {
    let mut parts = Vec::new();
    match (rating.score, rating.review_count.as_deref()) {
        (Some(score), Some(count)) => parts.push(format!("{score} / 5 ({count} reviews)")),
        (Some(score), None) => parts.push(format!("{score} / 5")),
        (None, Some(count)) => parts.push(format!("({count} reviews)")),
        (None, None) => {}
    }
    parts.extend(rating.comments.iter().map(|c| format!("\"{c}\"")));
    parts.join(CELL_SEPARATOR)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
