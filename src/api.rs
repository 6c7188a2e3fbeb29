use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;
use crate::models::{
    AttendanceRecord, CharacterizationResponse, GenderAttendanceStats, LoginRequest,
    LoginResponse, MonitorActivityStats, MonitorCancelledStats, MonitorRating, MonitorsResponse,
    UserCount,
};

/// Bound on how long any single upstream call may keep a view waiting.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("upstream rejected the session token")]
    Unauthorized,
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream returned status {0}")]
    Status(StatusCode),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin client for the upstream municipal API. Attaches the bearer token,
/// applies the request timeout, and maps failures into [`ApiError`] so every
/// call site handles them the same way.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
    excel_base: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base: config.api_base.clone(),
            excel_base: config.excel_base.clone(),
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .http
            .post(self.url("login/"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(map_transport)?;
        decode(response).await
    }

    /// Fetches the full attendance set. Malformed rows are skipped with a
    /// warning instead of failing the whole payload.
    pub async fn attendance(&self, token: &str) -> Result<Vec<AttendanceRecord>, ApiError> {
        let rows: Vec<serde_json::Value> = self.get_json(token, "asistencias").await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<AttendanceRecord>(row) {
                Ok(record) => records.push(record),
                Err(err) => warn!("skipping malformed attendance row: {err}"),
            }
        }
        Ok(records)
    }

    pub async fn user_count(&self, token: &str) -> Result<UserCount, ApiError> {
        self.get_json(token, "usuarios/count").await
    }

    pub async fn gender_stats(
        &self,
        token: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<GenderAttendanceStats, ApiError> {
        let path = format!("asistencias/por-genero?fecha_inicio={from}&fecha_fin={to}");
        self.get_json(token, &path).await
    }

    pub async fn monitors_basic(&self, token: &str) -> Result<MonitorsResponse, ApiError> {
        self.get_json(token, "monitores/basico").await
    }

    pub async fn monitor_activity_stats(
        &self,
        token: &str,
        id: &str,
    ) -> Result<MonitorActivityStats, ApiError> {
        self.get_json(token, &format!("monitores/estadisticas-actividades/{id}"))
            .await
    }

    pub async fn monitor_cancelled(
        &self,
        token: &str,
        id: &str,
    ) -> Result<MonitorCancelledStats, ApiError> {
        self.get_json(token, &format!("monitores/actividades-canceladas/{id}"))
            .await
    }

    pub async fn monitor_rating(&self, token: &str, id: &str) -> Result<MonitorRating, ApiError> {
        self.get_json(token, &format!("monitores/calificaciones-promedio/{id}"))
            .await
    }

    pub async fn characterization_by_zone(
        &self,
        token: &str,
    ) -> Result<CharacterizationResponse, ApiError> {
        self.get_json(token, "caracterizacion-por-zona").await
    }

    /// Download link for the characterization spreadsheet. Dates are only
    /// appended when both bounds are set, matching the export service.
    pub fn characterization_export_url(&self, start: &str, end: &str) -> String {
        export_url(&self.excel_base, "caracterizacion/export/excel", start, end)
    }

    pub fn general_data_export_url(&self, start: &str, end: &str) -> String {
        export_url(&self.excel_base, "datos-generales/export/excel", start, end)
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &str, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport)?;
        decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base)
    }
}

fn export_url(base: &str, path: &str, start: &str, end: &str) -> String {
    let mut url = format!("{base}/{path}");
    if !start.is_empty() && !end.is_empty() {
        url.push_str(&format!("?startDate={start}&endDate={end}"));
    }
    url
}

fn map_transport(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(err)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    response.json().await.map_err(map_transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_url_appends_dates_only_when_both_set() {
        let base = "https://reports.example.com";
        assert_eq!(
            export_url(base, "caracterizacion/export/excel", "2025-01-01", "2025-02-01"),
            "https://reports.example.com/caracterizacion/export/excel?startDate=2025-01-01&endDate=2025-02-01"
        );
        assert_eq!(
            export_url(base, "caracterizacion/export/excel", "2025-01-01", ""),
            "https://reports.example.com/caracterizacion/export/excel"
        );
        assert_eq!(
            export_url(base, "datos-generales/export/excel", "", ""),
            "https://reports.example.com/datos-generales/export/excel"
        );
    }
}
