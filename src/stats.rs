use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::filters::{is_numeric_zone_code, FilterState, Zone};
use crate::models::{
    AttendanceRecord, CharacterizationOverview, CharacterizationZoneSummary,
    GenderAttendanceStats, GenderSplitResponse, KeyCount, VenueDailyAverage,
};

fn matches_zone(record: &AttendanceRecord, zone: Zone) -> bool {
    match zone {
        Zone::All => true,
        Zone::Urban => is_numeric_zone_code(&record.administrative_area),
        Zone::Rural => !is_numeric_zone_code(&record.administrative_area),
    }
}

/// Distinct non-empty values in first-encountered order. Records with an
/// empty field never become selectable options.
fn distinct_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if value.is_empty() {
            continue;
        }
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

pub fn available_administrative_areas(records: &[AttendanceRecord], zone: Zone) -> Vec<String> {
    distinct_non_empty(
        records
            .iter()
            .filter(|r| matches_zone(r, zone))
            .map(|r| r.administrative_area.as_str()),
    )
}

pub fn available_neighborhoods(
    records: &[AttendanceRecord],
    zone: Zone,
    administrative_area: &str,
) -> Vec<String> {
    distinct_non_empty(
        records
            .iter()
            .filter(|r| {
                matches_zone(r, zone)
                    && (administrative_area.is_empty()
                        || r.administrative_area == administrative_area)
            })
            .map(|r| r.neighborhood.as_str()),
    )
}

pub fn available_venues(records: &[AttendanceRecord], neighborhood: &str) -> Vec<String> {
    distinct_non_empty(
        records
            .iter()
            .filter(|r| neighborhood.is_empty() || r.neighborhood == neighborhood)
            .map(|r| r.venue.as_str()),
    )
}

pub fn available_activity_types(records: &[AttendanceRecord]) -> Vec<String> {
    distinct_non_empty(records.iter().map(|r| r.activity_type.as_str()))
}

/// The filtered projection: zone classification, exact match on each
/// non-empty string filter, and the inclusive date range, all conjunctive.
pub fn filtered_records<'a>(
    records: &'a [AttendanceRecord],
    filters: &FilterState,
) -> Vec<&'a AttendanceRecord> {
    records
        .iter()
        .filter(|r| {
            matches_zone(r, filters.zone)
                && (filters.administrative_area.is_empty()
                    || r.administrative_area == filters.administrative_area)
                && (filters.neighborhood.is_empty() || r.neighborhood == filters.neighborhood)
                && (filters.venue.is_empty() || r.venue == filters.venue)
                && (filters.activity_type.is_empty() || r.activity_type == filters.activity_type)
                && r.attendance_date >= filters.date_from
                && r.attendance_date <= filters.date_to
        })
        .collect()
}

/// Groups by the extracted key and returns counts sorted descending; ties
/// keep first-encountered order. Records with an empty key still count, as
/// one group.
pub fn count_by_key<F>(records: &[&AttendanceRecord], key_fn: F) -> Vec<KeyCount>
where
    F: Fn(&AttendanceRecord) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<KeyCount> = Vec::new();
    for record in records {
        let key = key_fn(record);
        match index.get(key) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(key.to_string(), out.len());
                out.push(KeyCount {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }
    // Vec::sort_by is stable, which is what keeps ties in encounter order.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Per venue: total records divided by the number of distinct dates observed
/// for that venue *within the given set*. A venue whose activity falls on a
/// single date averages to that date's count. The denominator only sees dates
/// inside the already-filtered subset.
pub fn average_per_day_by_venue(records: &[&AttendanceRecord]) -> Vec<VenueDailyAverage> {
    struct Group {
        venue: String,
        total: usize,
        dates: HashSet<NaiveDate>,
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    for record in records {
        let i = match index.get(record.venue.as_str()) {
            Some(&i) => i,
            None => {
                index.insert(record.venue.clone(), groups.len());
                groups.push(Group {
                    venue: record.venue.clone(),
                    total: 0,
                    dates: HashSet::new(),
                });
                groups.len() - 1
            }
        };
        groups[i].total += 1;
        groups[i].dates.insert(record.attendance_date);
    }

    groups
        .into_iter()
        .map(|g| {
            let days = g.dates.len().max(1);
            VenueDailyAverage {
                venue: g.venue,
                average: round2(g.total as f64 / days as f64),
            }
        })
        .collect()
}

pub fn distinct_venue_count(records: &[&AttendanceRecord]) -> usize {
    records
        .iter()
        .map(|r| r.venue.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Display percentages for the upstream gender aggregate. A zero total yields
/// 0/0 instead of NaN.
pub fn gender_split(stats: &GenderAttendanceStats) -> GenderSplitResponse {
    let total = stats.men + stats.women;
    let (men_pct, women_pct) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            round1(stats.men as f64 * 100.0 / total as f64),
            round1(stats.women as f64 * 100.0 / total as f64),
        )
    };
    GenderSplitResponse {
        men: stats.men,
        women: stats.women,
        men_pct,
        women_pct,
    }
}

/// Overall averages across the visible zone summaries; zeroes when the
/// filtered list is empty.
pub fn characterization_overview(
    zones: &[CharacterizationZoneSummary],
) -> CharacterizationOverview {
    let count = zones.len();
    let mean = |extract: fn(&CharacterizationZoneSummary) -> f64| -> f64 {
        if count == 0 {
            0.0
        } else {
            round2(zones.iter().map(extract).sum::<f64>() / count as f64)
        }
    };
    CharacterizationOverview {
        zone_count: count,
        avg_weight: mean(|z| z.avg_weight),
        avg_height: mean(|z| z.avg_height),
        avg_bmi: mean(|z| z.avg_bmi),
        avg_waist_hip_ratio: mean(|z| z.avg_waist_hip_ratio),
        total_records: zones.iter().map(|z| z.records_in_zone).sum(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
