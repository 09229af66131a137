//! Shared utility functions for Fontus crates.

/// Sample date parsing and derived time fields
pub mod dates {
    use chrono::{Datelike, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Serialize};

    /// Date formats accepted for sample dates, tried in order.
    pub const SAMPLE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%d.%m.%Y", "%m/%d/%Y"];

    /// Date-time formats accepted for sample dates; only the date part is kept.
    pub const SAMPLE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    /// Parse a sample date in any of the accepted formats.
    pub fn parse_sample_date(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        for format in SAMPLE_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(date);
            }
        }
        for format in SAMPLE_DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(datetime.date());
            }
        }
        anyhow::bail!("unrecognised sample date: {:?}", s)
    }

    /// Hemisphere of the sampling location; decides which months are summer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub enum Hemisphere {
        #[default]
        #[serde(rename = "n")]
        Northern,
        #[serde(rename = "s")]
        Southern,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Season {
        Winter,
        Spring,
        Summer,
        Fall,
    }

    impl Season {
        pub fn as_str(&self) -> &'static str {
            match self {
                Season::Winter => "winter",
                Season::Spring => "spring",
                Season::Summer => "summer",
                Season::Fall => "fall",
            }
        }
    }

    /// Meteorological season number: Dec-Feb = 1, Mar-May = 2,
    /// Jun-Aug = 3, Sep-Nov = 4.
    pub fn season_number(month: u32) -> u32 {
        month % 12 / 3 + 1
    }

    /// Season of a date, flipped for the southern hemisphere.
    pub fn season_for_date(date: &NaiveDate, hemisphere: Hemisphere) -> Season {
        let northern = match season_number(date.month()) {
            1 => Season::Winter,
            2 => Season::Spring,
            3 => Season::Summer,
            _ => Season::Fall,
        };
        match hemisphere {
            Hemisphere::Northern => northern,
            Hemisphere::Southern => match northern {
                Season::Winter => Season::Summer,
                Season::Spring => Season::Fall,
                Season::Summer => Season::Winter,
                Season::Fall => Season::Spring,
            },
        }
    }

    /// The `year`, `month` and `season` group fields derived from a sample date.
    pub fn time_fields(date: &NaiveDate, hemisphere: Hemisphere) -> [(&'static str, String); 3] {
        [
            ("year", date.year().to_string()),
            ("month", date.month().to_string()),
            ("season", season_for_date(date, hemisphere).as_str().to_string()),
        ]
    }

}

/// Float comparison and rounding
pub mod numeric {
    /// Absolute tolerance used when comparing derived coordinates and percentages.
    pub const EPSILON: f64 = 1e-9;

    /// True when `a` and `b` differ by at most `tolerance`.
    pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    /// Round to a fixed number of decimal places for tabular output.
    pub fn round_to(value: f64, digits: u32) -> f64 {
        let factor = 10f64.powi(digits as i32);
        (value * factor).round() / factor
    }

}
