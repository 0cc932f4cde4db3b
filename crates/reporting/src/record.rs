use api_types::account::AccountRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

/// Value shown in place of a missing field.
pub const PLACEHOLDER: &str = "N/A";

/// Status an account gets when the backend did not send one.
pub const ACTIVE_STATUS: &str = "active";

const JOINED_FORMAT: &str = "%b %-d, %Y";

/// An account with every field present, ready to be rendered or exported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub id: String,
    /// Raw discriminator, kept for unclassified accounts.
    pub role: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub business_name: String,
    pub service_category: String,
    pub status: String,
    /// Creation date, e.g. `Jan 5, 2024`.
    pub joined: String,
}

impl NormalizedRecord {
    /// Normalizes a backend record. Missing or empty fields become
    /// [`PLACEHOLDER`], except `status` which defaults to [`ACTIVE_STATUS`].
    pub fn from_record(record: &AccountRecord, tz: Tz) -> Self {
        Self {
            id: or_placeholder(record.id.as_deref()),
            role: or_placeholder(record.role.as_deref()),
            name: or_placeholder(record.full_name.as_deref()),
            email: or_placeholder(record.email.as_deref()),
            contact: or_placeholder(record.phone.as_deref()),
            city: or_placeholder(record.city.as_deref()),
            state: or_placeholder(record.state.as_deref()),
            zip: or_placeholder(record.zip.as_deref()),
            business_name: or_placeholder(record.business_name.as_deref()),
            service_category: or_placeholder(record.service_category.as_deref()),
            status: present(record.status.as_deref())
                .unwrap_or(ACTIVE_STATUS)
                .to_string(),
            joined: format_joined(record.created_at.as_deref(), tz),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn or_placeholder(value: Option<&str>) -> String {
    present(value).unwrap_or(PLACEHOLDER).to_string()
}

/// Formats a creation timestamp as `Jan 5, 2024` in the given timezone.
///
/// Accepts RFC3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC), plain
/// `YYYY-MM-DD` and epoch milliseconds. Anything else yields
/// [`PLACEHOLDER`].
pub fn format_joined(raw: Option<&str>, tz: Tz) -> String {
    present(raw)
        .and_then(|raw| joined_date(raw.trim(), tz))
        .map(|date| date.format(JOINED_FORMAT).to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn joined_date(raw: &str, tz: Tz) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&tz).date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().with_timezone(&tz).date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|ts| ts.with_timezone(&tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AccountRecord {
        AccountRecord {
            id: Some("65a1".to_string()),
            role: Some("user".to_string()),
            full_name: Some("Ann".to_string()),
            email: Some("a@x.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_fields_become_placeholder() {
        let normalized = NormalizedRecord::from_record(&record(), chrono_tz::UTC);
        assert_eq!(normalized.name, "Ann");
        assert_eq!(normalized.email, "a@x.com");
        assert_eq!(normalized.city, PLACEHOLDER);
        assert_eq!(normalized.contact, PLACEHOLDER);
        assert_eq!(normalized.business_name, PLACEHOLDER);
        assert_eq!(normalized.joined, PLACEHOLDER);
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let mut raw = record();
        raw.city = Some(String::new());
        raw.status = Some(String::new());
        let normalized = NormalizedRecord::from_record(&raw, chrono_tz::UTC);
        assert_eq!(normalized.city, PLACEHOLDER);
        assert_eq!(normalized.status, ACTIVE_STATUS);
    }

    #[test]
    fn missing_status_is_active() {
        let normalized = NormalizedRecord::from_record(&record(), chrono_tz::UTC);
        assert_eq!(normalized.status, "active");
        assert!(normalized.is_active());
    }

    #[test]
    fn explicit_status_is_kept() {
        let mut raw = record();
        raw.status = Some("suspended".to_string());
        let normalized = NormalizedRecord::from_record(&raw, chrono_tz::UTC);
        assert_eq!(normalized.status, "suspended");
        assert!(!normalized.is_active());
    }

    #[test]
    fn joined_date_formats() {
        let utc = chrono_tz::UTC;
        assert_eq!(format_joined(Some("2024-01-05T10:00:00.000Z"), utc), "Jan 5, 2024");
        assert_eq!(format_joined(Some("2024-11-23T08:30:00+02:00"), utc), "Nov 23, 2024");
        assert_eq!(format_joined(Some("2024-03-09T12:00:00"), utc), "Mar 9, 2024");
        assert_eq!(format_joined(Some("2024-03-09T12:00:00.250"), utc), "Mar 9, 2024");
        assert_eq!(format_joined(Some("2024-12-31"), utc), "Dec 31, 2024");
        assert_eq!(format_joined(Some("1704448800000"), utc), "Jan 5, 2024");
    }

    #[test]
    fn joined_date_uses_timezone() {
        let raw = Some("2024-01-05T02:00:00Z");
        assert_eq!(format_joined(raw, chrono_tz::UTC), "Jan 5, 2024");
        assert_eq!(
            format_joined(raw, chrono_tz::America::New_York),
            "Jan 4, 2024"
        );
    }

    #[test]
    fn unparseable_joined_date_is_placeholder() {
        assert_eq!(format_joined(Some("yesterday"), chrono_tz::UTC), PLACEHOLDER);
        assert_eq!(format_joined(Some(""), chrono_tz::UTC), PLACEHOLDER);
        assert_eq!(format_joined(None, chrono_tz::UTC), PLACEHOLDER);
    }
}
