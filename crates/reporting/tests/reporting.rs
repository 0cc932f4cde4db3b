use api_types::account::AccountsResponse;
use calamine::{Reader, Xlsx, open_workbook};
use chrono::NaiveDate;

use reporting::{ExportFormat, Report, ReportKind, Snapshot, SummaryStats, filter};

const LISTING: &str = r#"{
    "success": true,
    "data": [
        {"_id": "1", "role": "user", "fullName": "Ann", "email": "a@x.com", "status": "active"},
        {"_id": "2", "role": "serviceProvider", "fullName": "Bob", "businessName": "Bob Plumbing", "status": "inactive"}
    ]
}"#;

fn snapshot() -> Snapshot {
    let response: AccountsResponse = serde_json::from_str(LISTING).unwrap();
    Snapshot::build(&response.data, chrono_tz::UTC)
}

fn is_export_name(name: &str, kind: &str, ext: &str) -> bool {
    let Some(rest) = name.strip_prefix(&format!("{kind}-")) else {
        return false;
    };
    let Some(stamp) = rest.strip_suffix(&format!(".{ext}")) else {
        return false;
    };
    let parts: Vec<&str> = stamp.split('-').collect();
    parts.len() == 3
        && parts[0].len() == 2
        && parts[1].len() == 2
        && parts[2].len() == 4
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
}

#[test]
fn listing_is_split_into_users_and_providers() {
    let snapshot = snapshot();

    assert_eq!(snapshot.users.len(), 1);
    assert_eq!(snapshot.users[0].name, "Ann");
    assert_eq!(snapshot.providers.len(), 1);
    assert_eq!(snapshot.providers[0].name, "Bob");
    assert_eq!(snapshot.providers[0].business_name, "Bob Plumbing");
    assert_eq!(
        snapshot.stats,
        SummaryStats {
            total_users: 1,
            total_providers: 1,
            active_users: 1,
            active_providers: 0,
            unclassified: 0,
        }
    );
}

#[test]
fn no_record_lands_in_both_partitions() {
    let snapshot = snapshot();
    for user in &snapshot.users {
        assert!(!snapshot.providers.iter().any(|p| p.id == user.id));
        assert_eq!(user.role, "user");
    }
    for provider in &snapshot.providers {
        assert_eq!(provider.role, "serviceProvider");
    }
}

#[test]
fn users_export_has_header_and_one_row() {
    let snapshot = snapshot();
    let report = Report::build(ReportKind::Users, &snapshot.users);

    assert_eq!(
        report.headers(),
        ["Name", "Email", "Contact", "City", "State", "Status", "Joined Date"]
    );
    assert_eq!(report.rows().len(), 1);
    let row = &report.rows()[0];
    assert_eq!(row[0], "Ann");
    assert_eq!(row[1], "a@x.com");
    assert_eq!(row[5], "active");

    let today = chrono::Local::now().date_naive();
    assert!(is_export_name(
        &report.file_name(ExportFormat::Xlsx, today),
        "users",
        "xlsx"
    ));
}

#[test]
fn filtered_partition_exports_only_matches() {
    let snapshot = snapshot();
    let matches = filter(&snapshot.providers, "PLUMB");
    assert!(matches.is_empty());

    let matches = filter(&snapshot.providers, "BOB");
    let report = Report::build(ReportKind::Providers, &matches);
    assert_eq!(report.rows().len(), 1);
}

#[test]
fn users_workbook_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = snapshot();
    let report = Report::build(ReportKind::Users, &snapshot.users);
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let path = report.write_to(dir.path(), ExportFormat::Xlsx, date).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["users".to_string()]);

    let range = workbook.worksheet_range("users").unwrap();
    let cells: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    assert_eq!(cells.len(), 2);
    assert_eq!(
        cells[0],
        ["Name", "Email", "Contact", "City", "State", "Status", "Joined Date"]
    );
    assert_eq!(cells[1][0], "Ann");
    assert_eq!(cells[1][1], "a@x.com");
    assert_eq!(cells[1][3], "N/A");
    assert_eq!(cells[1][5], "active");
}

#[test]
fn report_is_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let dir = dir.path();
    let snapshot = snapshot();
    let report = Report::build(ReportKind::Providers, &snapshot.providers);
    let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();

    let path = report.write_to(dir, ExportFormat::Xlsx, date).unwrap();
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("providers-12-01-2024.xlsx")
    );
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));

    let path = report.write_to(dir, ExportFormat::Csv, date).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Name,Email,Contact,Business,"));
}
