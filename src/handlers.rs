use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{error, warn};

use crate::api::ApiError;
use crate::errors::AppError;
use crate::filters::{default_start_date, FilterState, Zone};
use crate::models::{
    AttendanceDashboard, AttendanceRecord, AttendanceStatsResponse, GenderSplitResponse,
    Monitor, MonitorSummary, Session,
};
use crate::state::AppState;
use crate::stats;
use crate::ui;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceQuery {
    pub zone: Option<String>,
    pub area: Option<String>,
    pub neighborhood: Option<String>,
    pub venue: Option<String>,
    pub activity: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonitorsQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CharacterizationQuery {
    pub zone: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    pub car_start: Option<String>,
    pub car_end: Option<String>,
    pub gen_start: Option<String>,
    pub gen_end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn sign_in_page(State(state): State<AppState>) -> Response {
    if state.sessions.get().await.is_some() {
        return Redirect::to("/home").into_response();
    }
    Html(ui::render_sign_in(None)).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.api.login(&form.username, &form.password).await {
        Ok(granted) => {
            state
                .sessions
                .set(Session {
                    token: granted.access_token,
                    username: granted.username,
                    roles: granted.roles,
                })
                .await?;
            Ok(Redirect::to("/home").into_response())
        }
        Err(ApiError::Unauthorized) | Err(ApiError::Status(_)) => Ok(Html(ui::render_sign_in(
            Some("Invalid username or password."),
        ))
        .into_response()),
        Err(err) => {
            error!("login request failed: {err}");
            Ok(
                Html(ui::render_sign_in(Some("Could not reach the server. Try again.")))
                    .into_response(),
            )
        }
    }
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    state.sessions.clear().await?;
    Ok(Redirect::to("/"))
}

/// Attendance dashboard. Loads the full record set plus the registered-user
/// count, runs the filter pipeline against the query string, and renders the
/// tiles, chart, and listing. A failed user-count fetch degrades to a blank
/// tile; a failed attendance fetch is the page's error state.
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Response {
    let Some(session) = state.sessions.get().await else {
        return Redirect::to("/").into_response();
    };

    let (attendance, user_count) = tokio::join!(
        state.api.attendance(&session.token),
        state.api.user_count(&session.token)
    );

    let records = match attendance {
        Ok(records) => records,
        Err(ApiError::Unauthorized) => return expire_session(&state).await,
        Err(err) => {
            error!("failed to load attendance: {err}");
            return Html(ui::render_fetch_error(
                "Attendance",
                "/home",
                &AppError::upstream(&err).message,
            ))
            .into_response();
        }
    };
    let total_users = match user_count {
        Ok(count) => Some(count.total_users),
        Err(ApiError::Unauthorized) => return expire_session(&state).await,
        Err(err) => {
            warn!("failed to load user count: {err}");
            None
        }
    };

    let today = Local::now().date_naive();
    let filters = build_filters(&query, &records, today);
    let dashboard = build_dashboard(&records, filters, total_users);
    Html(ui::render_dashboard(&dashboard, &session.username)).into_response()
}

pub async fn monitors(
    State(state): State<AppState>,
    Query(query): Query<MonitorsQuery>,
) -> Response {
    let Some(session) = state.sessions.get().await else {
        return Redirect::to("/").into_response();
    };

    match state.api.monitors_basic(&session.token).await {
        Ok(response) => {
            let search = query.q.unwrap_or_default();
            let needle = search.to_lowercase();
            let filtered: Vec<&Monitor> = response
                .monitors
                .iter()
                .filter(|m| {
                    needle.is_empty()
                        || m.first_name.to_lowercase().contains(&needle)
                        || m.document_number.contains(search.as_str())
                })
                .collect();
            Html(ui::render_monitors(
                &response.monitors,
                &filtered,
                &search,
                &session.username,
            ))
            .into_response()
        }
        Err(ApiError::Unauthorized) => expire_session(&state).await,
        Err(err) => {
            error!("failed to load monitors: {err}");
            Html(ui::render_fetch_error(
                "Monitors",
                "/monitors",
                &AppError::upstream(&err).message,
            ))
            .into_response()
        }
    }
}

pub async fn characterization(
    State(state): State<AppState>,
    Query(query): Query<CharacterizationQuery>,
) -> Response {
    let Some(session) = state.sessions.get().await else {
        return Redirect::to("/").into_response();
    };

    match state.api.characterization_by_zone(&session.token).await {
        Ok(response) => {
            let zone_filter = query.zone.unwrap_or_default();
            let search = query.q.unwrap_or_default();
            let needle = search.to_lowercase();
            let visible: Vec<_> = response
                .zones
                .iter()
                .filter(|z| {
                    (zone_filter.is_empty() || zone_filter == "all" || z.zone == zone_filter)
                        && (needle.is_empty() || z.group_name.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect();
            let overview = stats::characterization_overview(&visible);
            Html(ui::render_characterization(
                &visible,
                &overview,
                &zone_filter,
                &search,
                &session.username,
            ))
            .into_response()
        }
        Err(ApiError::Unauthorized) => expire_session(&state).await,
        Err(err) => {
            error!("failed to load characterization: {err}");
            Html(ui::render_fetch_error(
                "Characterization",
                "/characterization",
                &AppError::upstream(&err).message,
            ))
            .into_response()
        }
    }
}

/// Report downloads are links to the upstream export service; nothing is
/// fetched here.
pub async fn reports(
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> Response {
    let Some(session) = state.sessions.get().await else {
        return Redirect::to("/").into_response();
    };

    let car_start = query.car_start.unwrap_or_default();
    let car_end = query.car_end.unwrap_or_default();
    let gen_start = query.gen_start.unwrap_or_default();
    let gen_end = query.gen_end.unwrap_or_default();
    let car_url = state.api.characterization_export_url(&car_start, &car_end);
    let gen_url = state.api.general_data_export_url(&gen_start, &gen_end);

    Html(ui::render_reports(
        &session.username,
        &car_start,
        &car_end,
        &car_url,
        &gen_start,
        &gen_end,
        &gen_url,
    ))
    .into_response()
}

pub async fn attendance_stats(
    State(state): State<AppState>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<AttendanceStatsResponse>, AppError> {
    let session = require_api_session(&state).await?;
    let records = match state.api.attendance(&session.token).await {
        Ok(records) => records,
        Err(err) => return Err(map_api_failure(&state, err, "attendance").await),
    };

    let today = Local::now().date_naive();
    let filters = build_filters(&query, &records, today);
    let dashboard = build_dashboard(&records, filters, None);
    Ok(Json(AttendanceStatsResponse {
        total_filtered: dashboard.total_filtered,
        distinct_venues: dashboard.distinct_venues,
        administrative_areas: dashboard.administrative_areas,
        neighborhoods: dashboard.neighborhoods,
        venues: dashboard.venues,
        activity_types: dashboard.activity_types,
        by_venue: dashboard.by_venue,
        by_instructor: dashboard.by_instructor,
        venue_daily_averages: dashboard.venue_daily_averages,
    }))
}

/// Gender aggregate for the current date window. The dashboard script calls
/// this on load, so a date-range change re-fetches gender data independently
/// of the main attendance fetch.
pub async fn attendance_gender(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<GenderSplitResponse>, AppError> {
    let session = require_api_session(&state).await?;
    let today = Local::now().date_naive();
    let from = query
        .from
        .as_deref()
        .and_then(parse_date)
        .unwrap_or_else(default_start_date);
    let to = query.to.as_deref().and_then(parse_date).unwrap_or(today);

    match state.api.gender_stats(&session.token, from, to).await {
        Ok(totals) => Ok(Json(stats::gender_split(&totals))),
        Err(err) => Err(map_api_failure(&state, err, "gender stats").await),
    }
}

/// Per-monitor detail. The three upstream calls run concurrently; a failed
/// one only blanks its own section.
pub async fn monitor_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MonitorSummary>, AppError> {
    let session = require_api_session(&state).await?;
    let (activity, cancelled, rating) = tokio::join!(
        state.api.monitor_activity_stats(&session.token, &id),
        state.api.monitor_cancelled(&session.token, &id),
        state.api.monitor_rating(&session.token, &id),
    );

    if matches!(activity, Err(ApiError::Unauthorized))
        || matches!(cancelled, Err(ApiError::Unauthorized))
        || matches!(rating, Err(ApiError::Unauthorized))
    {
        return Err(map_api_failure(&state, ApiError::Unauthorized, "monitor detail").await);
    }

    Ok(Json(MonitorSummary {
        activity_stats: ok_or_log("activity stats", activity),
        cancelled: ok_or_log("cancelled activities", cancelled),
        rating: ok_or_log("average rating", rating),
    }))
}

/// Applies the query string through the filter transition functions, in
/// chain order, so the cascade scrubs any stale downstream selection exactly
/// as a sequence of UI changes would.
fn build_filters(
    query: &AttendanceQuery,
    records: &[AttendanceRecord],
    today: NaiveDate,
) -> FilterState {
    let mut filters = FilterState::new(today);
    if let Some(zone) = &query.zone {
        filters.set_zone(Zone::parse(zone), records);
    }
    if let Some(area) = query.area.as_deref().filter(|v| !v.is_empty()) {
        filters.set_administrative_area(area, records);
    }
    if let Some(neighborhood) = query.neighborhood.as_deref().filter(|v| !v.is_empty()) {
        filters.set_neighborhood(neighborhood, records);
    }
    if let Some(venue) = query.venue.as_deref().filter(|v| !v.is_empty()) {
        filters.set_venue(venue);
    }
    if let Some(activity) = query.activity.as_deref().filter(|v| !v.is_empty()) {
        filters.set_activity_type(activity);
    }
    if let Some(from) = query.from.as_deref().and_then(parse_date) {
        filters.set_date_from(from);
    }
    if let Some(to) = query.to.as_deref().and_then(parse_date) {
        filters.set_date_to(to);
    }
    filters
}

fn build_dashboard(
    records: &[AttendanceRecord],
    filters: FilterState,
    total_users: Option<u64>,
) -> AttendanceDashboard {
    let administrative_areas = stats::available_administrative_areas(records, filters.zone);
    let neighborhoods =
        stats::available_neighborhoods(records, filters.zone, &filters.administrative_area);
    let venues = stats::available_venues(records, &filters.neighborhood);
    let activity_types = stats::available_activity_types(records);

    let filtered = stats::filtered_records(records, &filters);
    let by_venue = stats::count_by_key(&filtered, |r| r.venue.as_str());
    let by_instructor = stats::count_by_key(&filtered, |r| r.instructor_name.as_str());
    let venue_daily_averages = stats::average_per_day_by_venue(&filtered);
    let distinct_venues = stats::distinct_venue_count(&filtered);
    let total_filtered = filtered.len();
    let rows = filtered.into_iter().cloned().collect();

    AttendanceDashboard {
        filters,
        administrative_areas,
        neighborhoods,
        venues,
        activity_types,
        total_users,
        total_filtered,
        distinct_venues,
        venue_daily_averages,
        by_venue,
        by_instructor,
        rows,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    value.parse().ok()
}

fn ok_or_log<T>(section: &str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("monitor {section} unavailable: {err}");
            None
        }
    }
}

async fn require_api_session(state: &AppState) -> Result<Session, AppError> {
    state
        .sessions
        .get()
        .await
        .ok_or_else(|| AppError::unauthorized("sign in required"))
}

/// Shared failure path for the JSON endpoints: an upstream 401 invalidates
/// the stored session; everything else maps to a plain-language upstream
/// error.
async fn map_api_failure(state: &AppState, err: ApiError, what: &str) -> AppError {
    match err {
        ApiError::Unauthorized => {
            if let Err(clear_err) = state.sessions.clear().await {
                error!("failed to clear session: {}", clear_err.message);
            }
            AppError::unauthorized("session expired")
        }
        err => {
            error!("failed to load {what}: {err}");
            AppError::upstream(&err)
        }
    }
}

/// A view hit an upstream 401: drop the session and send the operator back
/// to sign-in.
async fn expire_session(state: &AppState) -> Response {
    if let Err(err) = state.sessions.clear().await {
        error!("failed to clear session: {}", err.message);
    }
    Redirect::to("/").into_response()
}
