//! Shared utility functions for SXL crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Parse an ISO-8601 timestamp into UTC.
    ///
    /// Accepts RFC 3339 (`2006-03-24T22:30:00.000Z`, any offset) and a bare
    /// `YYYY-MM-DD`, which is taken as midnight UTC. Returns `None` for
    /// anything else.
    pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Parse an ISO-8601 timestamp keeping its local offset,
    /// e.g. `2006-03-25T10:30:00+12:00`.
    pub fn parse_local(s: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(s.trim()).ok()
    }

}

/// Great-circle distance helpers for launch site coordinates.
pub mod geo {
    /// Mean Earth radius in kilometers.
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Haversine distance in kilometers between two (lat, long) points
    /// given in decimal degrees.
    pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let dlat = (lat2 - lat1).to_radians();
        let dlon = (lon2 - lon1).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_KM * c
    }

    #[cfg(test)]
    mod tests {
        use super::haversine_km;

        #[test]
        fn test_same_point_is_zero() {
            assert!(haversine_km(28.561857, -80.577366, 28.561857, -80.577366).abs() < 1e-9);
        }

        #[test]
        fn test_cape_to_vandenberg() {
            // CCAFS SLC 40 -> VAFB SLC 4E is roughly 3,800 km
            let d = haversine_km(28.561857, -80.577366, 34.632834, -120.610745);
            assert!(d > 3700.0 && d < 3950.0, "unexpected distance {}", d);
        }
    }
}
