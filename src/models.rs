use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::filters::FilterState;

/// One recorded attendance event, as served by `GET {base}/asistencias`.
/// Wire field names are the upstream's Spanish column names; missing string
/// fields come through as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "monitor_nombre", default)]
    pub instructor_name: String,
    #[serde(rename = "comuna_actividad", default)]
    pub administrative_area: String,
    #[serde(rename = "parque", default)]
    pub venue: String,
    #[serde(rename = "barrio_actividad", default)]
    pub neighborhood: String,
    #[serde(rename = "tipo_actividad", default)]
    pub activity_type: String,
    #[serde(rename = "fecha_asistencia")]
    pub attendance_date: NaiveDate,
}

/// Signed-in staff session. Persisted to the session file between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserCount {
    #[serde(rename = "total_usuarios")]
    pub total_users: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Monitor {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub document_number: String,
}

#[derive(Debug, Deserialize)]
pub struct MonitorsResponse {
    #[serde(rename = "monitores", default)]
    pub monitors: Vec<Monitor>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorActivityStats {
    #[serde(rename = "total_actividades", default)]
    pub total_activities: u64,
    #[serde(rename = "total_asistentes", default)]
    pub total_attendees: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorCancelledStats {
    #[serde(rename = "actividades_canceladas", default)]
    pub cancelled_activities: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorRating {
    #[serde(rename = "calificacion_promedio", default)]
    pub average_rating: f64,
}

/// Per-monitor detail panel. Each section is independently optional so one
/// failed upstream call leaves the other sections intact.
#[derive(Debug, Serialize)]
pub struct MonitorSummary {
    pub activity_stats: Option<MonitorActivityStats>,
    pub cancelled: Option<MonitorCancelledStats>,
    pub rating: Option<MonitorRating>,
}

/// Gender totals from `GET {base}/asistencias/por-genero`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenderAttendanceStats {
    #[serde(rename = "hombres", default)]
    pub men: u64,
    #[serde(rename = "mujeres", default)]
    pub women: u64,
}

#[derive(Debug, Serialize)]
pub struct GenderSplitResponse {
    pub men: u64,
    pub women: u64,
    pub men_pct: f64,
    pub women_pct: f64,
}

/// Zone-level anthropometric averages from `GET {base}/caracterizacion-por-zona`.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterizationZoneSummary {
    #[serde(rename = "zona", default)]
    pub zone: String,
    #[serde(rename = "nombre_zona_agrupacion", default)]
    pub group_name: String,
    #[serde(rename = "promedio_peso", default)]
    pub avg_weight: f64,
    #[serde(rename = "promedio_estatura", default)]
    pub avg_height: f64,
    #[serde(rename = "promedio_imc", default)]
    pub avg_bmi: f64,
    #[serde(rename = "promedio_icc", default)]
    pub avg_waist_hip_ratio: f64,
    #[serde(rename = "promedio_grasa_corporal", default)]
    pub avg_body_fat: f64,
    #[serde(rename = "total_registros_en_zona", default)]
    pub records_in_zone: u64,
}

#[derive(Debug, Deserialize)]
pub struct CharacterizationResponse {
    #[serde(rename = "caracterizacion_por_zona", default)]
    pub zones: Vec<CharacterizationZoneSummary>,
    #[serde(default)]
    pub total: u64,
}

/// Overall averages across the currently visible zone summaries.
#[derive(Debug, Serialize)]
pub struct CharacterizationOverview {
    pub zone_count: usize,
    pub avg_weight: f64,
    pub avg_height: f64,
    pub avg_bmi: f64,
    pub avg_waist_hip_ratio: f64,
    pub total_records: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyCount {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueDailyAverage {
    pub venue: String,
    pub average: f64,
}

/// Everything the attendance dashboard needs for one render: the normalized
/// filter state, the option sets backing each dependent select, and the
/// derived aggregates.
#[derive(Debug)]
pub struct AttendanceDashboard {
    pub filters: FilterState,
    pub administrative_areas: Vec<String>,
    pub neighborhoods: Vec<String>,
    pub venues: Vec<String>,
    pub activity_types: Vec<String>,
    pub total_users: Option<u64>,
    pub total_filtered: usize,
    pub distinct_venues: usize,
    pub venue_daily_averages: Vec<VenueDailyAverage>,
    pub by_venue: Vec<KeyCount>,
    pub by_instructor: Vec<KeyCount>,
    pub rows: Vec<AttendanceRecord>,
}

/// JSON shape for `GET /api/attendance/stats`.
#[derive(Debug, Serialize)]
pub struct AttendanceStatsResponse {
    pub total_filtered: usize,
    pub distinct_venues: usize,
    pub administrative_areas: Vec<String>,
    pub neighborhoods: Vec<String>,
    pub venues: Vec<String>,
    pub activity_types: Vec<String>,
    pub by_venue: Vec<KeyCount>,
    pub by_instructor: Vec<KeyCount>,
    pub venue_daily_averages: Vec<VenueDailyAverage>,
}
