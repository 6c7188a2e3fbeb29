use chrono::NaiveDate;

use crate::models::AttendanceRecord;
use crate::stats;

/// Coarse urban/rural classification. A record is urban iff its
/// administrative-area code parses as a number; see [`is_numeric_zone_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    All,
    Urban,
    Rural,
}

impl Zone {
    pub fn parse(value: &str) -> Self {
        match value {
            "urban" => Zone::Urban,
            "rural" => Zone::Rural,
            _ => Zone::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::All => "all",
            Zone::Urban => "urban",
            Zone::Rural => "rural",
        }
    }
}

/// The sole discriminator of zone classification: urban area codes are
/// numeric strings ("5", "12"), rural ones are names ("San Cristobal").
/// Matches the upstream convention, where a blank code also counts as
/// numeric; blanks never reach option sets, so this only affects record
/// matching.
pub fn is_numeric_zone_code(code: &str) -> bool {
    let trimmed = code.trim();
    trimmed.is_empty() || trimmed.parse::<f64>().is_ok()
}

/// Start of the program's records; the default lower date bound.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Active filter selection for the attendance view.
///
/// Dependent fields form a chain (administrative area ⊇ neighborhood ⊇
/// venue): the transition functions clear a downstream value, and everything
/// below it, the moment an upstream change leaves it outside its option set.
/// Empty strings mean "no constraint". No transition fails; values that would
/// yield zero results are simply never offered.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub zone: Zone,
    pub administrative_area: String,
    pub neighborhood: String,
    pub venue: String,
    pub activity_type: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl FilterState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            zone: Zone::All,
            administrative_area: String::new(),
            neighborhood: String::new(),
            venue: String::new(),
            activity_type: String::new(),
            date_from: default_start_date(),
            date_to: today,
        }
    }

    /// Sets the zone, then drops the selected area (and everything below it)
    /// if it is no longer offered under the new zone.
    pub fn set_zone(&mut self, zone: Zone, records: &[AttendanceRecord]) {
        self.zone = zone;
        if self.administrative_area.is_empty() {
            return;
        }
        let options = stats::available_administrative_areas(records, self.zone);
        if !options.contains(&self.administrative_area) {
            self.administrative_area.clear();
            self.neighborhood.clear();
            self.venue.clear();
        }
    }

    /// Sets the administrative area, then drops the selected neighborhood and
    /// venue if the neighborhood is invalid under the new area.
    pub fn set_administrative_area(&mut self, area: &str, records: &[AttendanceRecord]) {
        self.administrative_area = area.to_string();
        if self.neighborhood.is_empty() {
            return;
        }
        let options =
            stats::available_neighborhoods(records, self.zone, &self.administrative_area);
        if !options.contains(&self.neighborhood) {
            self.neighborhood.clear();
            self.venue.clear();
        }
    }

    /// Sets the neighborhood, then drops the selected venue if it is invalid
    /// under the new neighborhood.
    pub fn set_neighborhood(&mut self, neighborhood: &str, records: &[AttendanceRecord]) {
        self.neighborhood = neighborhood.to_string();
        if self.venue.is_empty() {
            return;
        }
        let options = stats::available_venues(records, &self.neighborhood);
        if !options.contains(&self.venue) {
            self.venue.clear();
        }
    }

    pub fn set_venue(&mut self, venue: &str) {
        self.venue = venue.to_string();
    }

    pub fn set_activity_type(&mut self, activity_type: &str) {
        self.activity_type = activity_type.to_string();
    }

    pub fn set_date_from(&mut self, date: NaiveDate) {
        self.date_from = date;
    }

    pub fn set_date_to(&mut self, date: NaiveDate) {
        self.date_to = date;
    }

    pub fn reset(&mut self, today: NaiveDate) {
        *self = FilterState::new(today);
    }
}
