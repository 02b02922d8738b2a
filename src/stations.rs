//! # Station Directory
//!
//! A curated list of popular NOAA tide stations, grouped by coastal
//! region, plus the deep link into NOAA's own prediction charts for a
//! given station and date. Any seven-digit NOAA station id works with the
//! rest of the crate; this directory only exists so common choices have
//! readable names.

use crate::clock;
use chrono::NaiveDate;

/// One NOAA tide station.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Station {
    /// NOAA station id, e.g. `9414523`
    pub id: &'static str,
    /// Human-readable place name
    pub name: &'static str,
    /// Coarse coastal region used for grouping
    pub region: &'static str,
}

/// Built-in station choices, in presentation order.
pub const DIRECTORY: &[Station] = &[
    Station { id: "9414523", name: "Redwood City, CA", region: "San Francisco Bay" },
    Station { id: "9414290", name: "San Francisco, CA", region: "San Francisco Bay" },
    Station { id: "9414750", name: "Alameda, CA", region: "San Francisco Bay" },
    Station { id: "9410170", name: "San Diego, CA", region: "Southern California" },
    Station { id: "9410660", name: "Los Angeles, CA", region: "Southern California" },
    Station { id: "9411340", name: "Santa Barbara, CA", region: "Central California" },
    Station { id: "9413450", name: "Monterey, CA", region: "Central California" },
    Station { id: "9447130", name: "Seattle, WA", region: "Pacific Northwest" },
    Station { id: "9432780", name: "Charleston, OR", region: "Pacific Northwest" },
    Station { id: "8443970", name: "Boston, MA", region: "New England" },
    Station { id: "8461490", name: "New London, CT", region: "New England" },
    Station { id: "8518750", name: "The Battery, NY", region: "New York" },
    Station { id: "8723214", name: "Virginia Key, FL", region: "Florida" },
    Station { id: "8467150", name: "Bridgeport, CT", region: "New England" },
    Station { id: "8574680", name: "Baltimore, MD", region: "Mid-Atlantic" },
    Station { id: "8638610", name: "Sewells Point, VA", region: "Mid-Atlantic" },
    Station { id: "8771450", name: "Galveston Bay, TX", region: "Gulf Coast" },
    Station { id: "8726520", name: "St. Petersburg, FL", region: "Gulf Coast" },
];

/// Look up a directory entry by station id.
pub fn find(id: &str) -> Option<&'static Station> {
    DIRECTORY.iter().find(|s| s.id == id)
}

/// Directory name for a station, or the raw id for stations outside it.
pub fn display_name(id: &str) -> &str {
    match find(id) {
        Some(station) => station.name,
        None => id,
    }
}

/// Stations grouped by region, regions in first-appearance order.
pub fn grouped_by_region() -> Vec<(&'static str, Vec<&'static Station>)> {
    let mut groups: Vec<(&'static str, Vec<&'static Station>)> = Vec::new();
    for station in DIRECTORY {
        match groups.iter_mut().find(|(region, _)| *region == station.region) {
            Some((_, members)) => members.push(station),
            None => groups.push((station.region, vec![station])),
        }
    }
    groups
}

/// Link to NOAA's own daily prediction chart for one station and date,
/// with the unsafe-below threshold pre-filled.
pub fn predictions_url(station_id: &str, date: NaiveDate, minimum_height_ft: f32) -> String {
    let day = clock::provider_date(date);
    format!(
        "https://tidesandcurrents.noaa.gov/noaatidepredictions.html?id={station_id}\
         &units=standard&bdate={day}&edate={day}&timezone=LST/LDT&clock=12hour\
         &datum=MLLW&interval=hilo&action=dailychart\
         &thresholdvalue={minimum_height_ft}&threshold=lessThan"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_ids_are_unique() {
        for (i, a) in DIRECTORY.iter().enumerate() {
            for b in &DIRECTORY[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate station id {}", a.id);
            }
        }
    }

    #[test]
    fn find_known_and_unknown() {
        assert_eq!(find("9414523").unwrap().name, "Redwood City, CA");
        assert!(find("0000000").is_none());
    }

    #[test]
    fn display_name_falls_back_to_the_id() {
        assert_eq!(display_name("9447130"), "Seattle, WA");
        assert_eq!(display_name("1611400"), "1611400");
    }

    #[test]
    fn regions_keep_first_appearance_order() {
        let groups = grouped_by_region();
        let regions: Vec<&str> = groups.iter().map(|(region, _)| *region).collect();
        assert_eq!(
            regions,
            vec![
                "San Francisco Bay",
                "Southern California",
                "Central California",
                "Pacific Northwest",
                "New England",
                "New York",
                "Florida",
                "Mid-Atlantic",
                "Gulf Coast",
            ]
        );
    }

    #[test]
    fn late_directory_entries_join_their_existing_region() {
        let groups = grouped_by_region();
        let new_england = groups
            .iter()
            .find(|(region, _)| *region == "New England")
            .map(|(_, members)| members)
            .unwrap();
        assert!(new_england.iter().any(|s| s.name == "Bridgeport, CT"));
        assert_eq!(new_england.len(), 3);
    }

    #[test]
    fn every_station_lands_in_exactly_one_group() {
        let total: usize = grouped_by_region().iter().map(|(_, m)| m.len()).sum();
        assert_eq!(total, DIRECTORY.len());
    }

    #[test]
    fn predictions_url_carries_station_date_and_threshold() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let url = predictions_url("9414523", date, 1.5);

        assert!(url.starts_with("https://tidesandcurrents.noaa.gov/noaatidepredictions.html?id=9414523"));
        assert!(url.contains("bdate=20250614"));
        assert!(url.contains("edate=20250614"));
        assert!(url.contains("thresholdvalue=1.5"));
        assert!(url.contains("threshold=lessThan"));
    }
}
