//! Read-only clinical tabs of the admission screen.
//!
//! Rows are rendered in the order they were received. No paging,
//! filtering or sorting happens here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dialog::{FormDialog, LabOrderForm};
use crate::models::{DateFormat, LabOrder, PatientFile, Priority};

const EMPTY_CELL: &str = "-";

// ═══════════════════════════════════════════
// Tabs and actions
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpdTab {
    Timeline,
    Medications,
    LabResults,
    Radiology,
    Files,
    HealthPhysical,
}

impl IpdTab {
    pub const ALL: [IpdTab; 6] = [
        IpdTab::Timeline,
        IpdTab::Medications,
        IpdTab::LabResults,
        IpdTab::Radiology,
        IpdTab::Files,
        IpdTab::HealthPhysical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IpdTab::Timeline => "Timeline",
            IpdTab::Medications => "Medications",
            IpdTab::LabResults => "Lab Results",
            IpdTab::Radiology => "Radiology",
            IpdTab::Files => "Files",
            IpdTab::HealthPhysical => "Health & Physical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    View,
    Edit,
    Download,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeClass {
    Danger,
    Warning,
    Success,
    Info,
    Neutral,
}

impl BadgeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeClass::Danger => "danger",
            BadgeClass::Warning => "warning",
            BadgeClass::Success => "success",
            BadgeClass::Info => "info",
            BadgeClass::Neutral => "neutral",
        }
    }
}

/// Display class for a status or priority string. Case-insensitive.
pub fn badge_class(value: &str) -> BadgeClass {
    match value.trim().to_lowercase().as_str() {
        "critical" | "stat" | "abnormal" | "cancelled" | "discontinued" | "failed" => {
            BadgeClass::Danger
        }
        "urgent" | "pending" | "ordered" | "draft" | "in progress" | "in_progress" => {
            BadgeClass::Warning
        }
        "completed" | "resulted" | "normal" | "active" | "done" => BadgeClass::Success,
        "routine" | "scheduled" => BadgeClass::Info,
        _ => BadgeClass::Neutral,
    }
}

// ═══════════════════════════════════════════
// Row types as the IPD service lists them
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineEntry {
    pub id: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub event_type: String,
    pub description: String,
    pub recorded_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicationRow {
    pub id: Option<String>,
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub route: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabResultRow {
    pub id: Option<String>,
    pub test_name: String,
    pub test_type: Option<String>,
    pub priority: Priority,
    pub result: Option<String>,
    pub normal_range: Option<String>,
    pub status: String,
    pub ordered_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl LabResultRow {
    /// The order behind this result, as the lab-order dialog expects it.
    pub fn to_lab_order(&self) -> LabOrder {
        LabOrder {
            id: self.id.clone(),
            test_name: self.test_name.clone(),
            test_type: self.test_type.clone(),
            priority: self.priority,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiologyRow {
    pub id: Option<String>,
    pub study_type: String,
    pub body_part: Option<String>,
    pub study_date: Option<NaiveDate>,
    pub findings: Option<String>,
    pub status: String,
}

/// One section of the admission history and physical examination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthPhysicalSection {
    pub title: String,
    pub content: String,
}

// ═══════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub class: BadgeClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub id: Option<String>,
    pub cells: Vec<String>,
    pub badge: Option<Badge>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabView {
    pub tab: IpdTab,
    pub headers: Vec<&'static str>,
    pub rows: Vec<RenderedRow>,
}

impl TabView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row type that one tab knows how to display.
pub trait TabRow {
    const TAB: IpdTab;
    const HEADERS: &'static [&'static str];
    const ACTIONS: &'static [RowAction];

    fn id(&self) -> Option<&str>;
    fn cells(&self, format: DateFormat) -> Vec<String>;

    fn badge(&self) -> Option<&str> {
        None
    }
}

pub fn render<R: TabRow>(rows: &[R], format: DateFormat) -> TabView {
    TabView {
        tab: R::TAB,
        headers: R::HEADERS.to_vec(),
        rows: rows
            .iter()
            .map(|row| RenderedRow {
                id: row.id().map(str::to_string),
                cells: row.cells(format),
                badge: row
                    .badge()
                    .filter(|label| !label.trim().is_empty())
                    .map(|label| Badge {
                        label: label.to_string(),
                        class: badge_class(label),
                    }),
                actions: R::ACTIONS.to_vec(),
            })
            .collect(),
    }
}

fn date_cell(date: Option<NaiveDate>, format: DateFormat) -> String {
    date.map(|d| format.format(d))
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

fn text_cell(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(EMPTY_CELL)
        .to_string()
}

/// Timestamps arrive as ISO strings; only the date part is shown.
fn timestamp_cell(value: Option<&str>, format: DateFormat) -> String {
    let parsed = value
        .and_then(|v| v.get(..10))
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    match parsed {
        Some(date) => format.format(date),
        None => text_cell(value),
    }
}

impl TabRow for TimelineEntry {
    const TAB: IpdTab = IpdTab::Timeline;
    const HEADERS: &'static [&'static str] = &["Date", "Time", "Event", "Description", "Recorded By"];
    const ACTIONS: &'static [RowAction] = &[RowAction::View];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn cells(&self, format: DateFormat) -> Vec<String> {
        vec![
            date_cell(self.date, format),
            text_cell(self.time.as_deref()),
            text_cell(Some(self.event_type.as_str())),
            text_cell(Some(self.description.as_str())),
            text_cell(self.recorded_by.as_deref()),
        ]
    }
}

impl TabRow for MedicationRow {
    const TAB: IpdTab = IpdTab::Medications;
    const HEADERS: &'static [&'static str] = &[
        "Medication",
        "Dosage",
        "Frequency",
        "Route",
        "Start Date",
        "End Date",
        "Status",
    ];
    const ACTIONS: &'static [RowAction] = &[RowAction::View];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn cells(&self, format: DateFormat) -> Vec<String> {
        vec![
            text_cell(Some(self.medication_name.as_str())),
            text_cell(Some(self.dosage.as_str())),
            text_cell(Some(self.frequency.as_str())),
            text_cell(self.route.as_deref()),
            date_cell(self.start_date, format),
            date_cell(self.end_date, format),
            text_cell(Some(self.status.as_str())),
        ]
    }

    fn badge(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl TabRow for LabResultRow {
    const TAB: IpdTab = IpdTab::LabResults;
    const HEADERS: &'static [&'static str] = &[
        "Test",
        "Type",
        "Priority",
        "Result",
        "Normal Range",
        "Ordered",
        "Status",
    ];
    const ACTIONS: &'static [RowAction] = &[RowAction::View, RowAction::Edit];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn cells(&self, format: DateFormat) -> Vec<String> {
        vec![
            text_cell(Some(self.test_name.as_str())),
            text_cell(self.test_type.as_deref()),
            self.priority.as_str().to_string(),
            text_cell(self.result.as_deref()),
            text_cell(self.normal_range.as_deref()),
            date_cell(self.ordered_date, format),
            text_cell(Some(self.status.as_str())),
        ]
    }

    fn badge(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl TabRow for RadiologyRow {
    const TAB: IpdTab = IpdTab::Radiology;
    const HEADERS: &'static [&'static str] = &["Study", "Body Part", "Date", "Findings", "Status"];
    const ACTIONS: &'static [RowAction] = &[RowAction::View];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn cells(&self, format: DateFormat) -> Vec<String> {
        vec![
            text_cell(Some(self.study_type.as_str())),
            text_cell(self.body_part.as_deref()),
            date_cell(self.study_date, format),
            text_cell(self.findings.as_deref()),
            text_cell(Some(self.status.as_str())),
        ]
    }

    fn badge(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl TabRow for PatientFile {
    const TAB: IpdTab = IpdTab::Files;
    const HEADERS: &'static [&'static str] = &["File Name", "Category", "Description", "Uploaded"];
    const ACTIONS: &'static [RowAction] = &[RowAction::View, RowAction::Download];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn cells(&self, format: DateFormat) -> Vec<String> {
        vec![
            text_cell(Some(self.file_name.as_str())),
            self.file_category.as_str().to_string(),
            text_cell(self.description.as_deref()),
            timestamp_cell(self.uploaded_at.as_deref(), format),
        ]
    }
}

impl TabRow for HealthPhysicalSection {
    const TAB: IpdTab = IpdTab::HealthPhysical;
    const HEADERS: &'static [&'static str] = &["Section", "Findings"];
    const ACTIONS: &'static [RowAction] = &[];

    fn id(&self) -> Option<&str> {
        None
    }

    fn cells(&self, _format: DateFormat) -> Vec<String> {
        vec![text_cell(Some(self.title.as_str())), text_cell(Some(self.content.as_str()))]
    }
}

// ═══════════════════════════════════════════
// Row actions
// ═══════════════════════════════════════════

/// Handed to an external downloader; nothing is fetched here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub file_name: String,
}

/// `None` when the listing carries no URL for the file.
pub fn download_request(file: &PatientFile) -> Option<DownloadRequest> {
    let url = file.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
    Some(DownloadRequest {
        url: url.to_string(),
        file_name: file.file_name.clone(),
    })
}

/// Edit action of the lab results tab.
pub fn edit_lab_result(dialog: &mut FormDialog<LabOrderForm>, row: &LabResultRow) {
    dialog.open(Some(&row.to_lab_order()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileCategory;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn badge_classes() {
        assert_eq!(badge_class("Critical"), BadgeClass::Danger);
        assert_eq!(badge_class("stat"), BadgeClass::Danger);
        assert_eq!(badge_class("urgent"), BadgeClass::Warning);
        assert_eq!(badge_class(" Pending "), BadgeClass::Warning);
        assert_eq!(badge_class("completed"), BadgeClass::Success);
        assert_eq!(badge_class("routine"), BadgeClass::Info);
        assert_eq!(badge_class("on hold"), BadgeClass::Neutral);
        assert_eq!(badge_class(""), BadgeClass::Neutral);
    }

    #[test]
    fn medication_rows_keep_order_and_format_dates() {
        let rows = vec![
            MedicationRow {
                medication_name: "Ceftriaxone".into(),
                dosage: "1 g".into(),
                frequency: "OD".into(),
                route: Some("IV".into()),
                start_date: date(2026, 1, 3),
                status: "active".into(),
                ..Default::default()
            },
            MedicationRow {
                medication_name: "Paracetamol".into(),
                dosage: "1 g".into(),
                frequency: "QID PRN".into(),
                status: "discontinued".into(),
                ..Default::default()
            },
        ];

        let view = render(&rows, DateFormat::MonthDayYear);

        assert_eq!(view.tab, IpdTab::Medications);
        assert_eq!(view.headers.len(), view.rows[0].cells.len());
        assert_eq!(view.rows[0].cells[0], "Ceftriaxone");
        assert_eq!(view.rows[0].cells[4], "01/03/2026");
        assert_eq!(view.rows[0].cells[5], "-");
        assert_eq!(view.rows[1].cells[3], "-");
        assert_eq!(view.rows[1].badge.as_ref().unwrap().class, BadgeClass::Danger);
        assert_eq!(view.rows[0].actions, vec![RowAction::View]);
    }

    #[test]
    fn empty_tab_renders_headers_only() {
        let view = render::<RadiologyRow>(&[], DateFormat::default());
        assert!(view.is_empty());
        assert_eq!(view.headers[0], "Study");
    }

    #[test]
    fn lab_results_offer_edit() {
        let row = LabResultRow {
            id: Some("55".into()),
            test_name: "HbA1c".into(),
            priority: Priority::Routine,
            status: "resulted".into(),
            ordered_date: date(2026, 5, 20),
            ..Default::default()
        };
        let view = render(std::slice::from_ref(&row), DateFormat::DayMonthYear);
        assert_eq!(view.rows[0].actions, vec![RowAction::View, RowAction::Edit]);
        assert_eq!(view.rows[0].cells[2], "routine");
        assert_eq!(view.rows[0].cells[5], "20/05/2026");
        assert_eq!(view.rows[0].id.as_deref(), Some("55"));
    }

    #[test]
    fn lab_edit_opens_prefilled_dialog() {
        let row = LabResultRow {
            id: Some("55".into()),
            test_name: "HbA1c".into(),
            test_type: Some("Biochemistry".into()),
            priority: Priority::Urgent,
            ..Default::default()
        };
        let mut dialog = FormDialog::<LabOrderForm>::new("1042");

        edit_lab_result(&mut dialog, &row);

        assert!(dialog.is_open());
        assert!(dialog.is_editing());
        assert_eq!(dialog.fields().test_name, "HbA1c");
        assert_eq!(dialog.fields().test_type, "Biochemistry");
        assert_eq!(dialog.fields().priority, Priority::Urgent);
    }

    #[test]
    fn lab_row_without_id_opens_create() {
        let row = LabResultRow {
            test_name: "Lipid panel".into(),
            ..Default::default()
        };
        let mut dialog = FormDialog::<LabOrderForm>::new("1042");
        edit_lab_result(&mut dialog, &row);
        assert!(dialog.is_open());
        assert!(!dialog.is_editing());
    }

    #[test]
    fn files_render_upload_date_and_download() {
        let file = PatientFile {
            id: Some("f1".into()),
            file_name: "ct_head.pdf".into(),
            file_category: FileCategory::Image,
            uploaded_at: Some("2026-04-11T09:30:00Z".into()),
            url: Some("https://files.example.org/f1".into()),
            ..Default::default()
        };

        let view = render(std::slice::from_ref(&file), DateFormat::Iso);
        assert_eq!(view.rows[0].cells[1], "Image");
        assert_eq!(view.rows[0].cells[3], "2026-04-11");
        assert!(view.rows[0].badge.is_none());
        assert!(view.rows[0].actions.contains(&RowAction::Download));

        assert_eq!(
            download_request(&file),
            Some(DownloadRequest {
                url: "https://files.example.org/f1".into(),
                file_name: "ct_head.pdf".into(),
            })
        );
        assert_eq!(
            download_request(&PatientFile {
                url: Some(" ".into()),
                ..file
            }),
            None
        );
    }

    #[test]
    fn health_physical_has_no_actions() {
        let view = render(
            &[HealthPhysicalSection {
                title: "Cardiovascular".into(),
                content: "S1 S2 normal, no murmurs".into(),
            }],
            DateFormat::default(),
        );
        assert!(view.rows[0].actions.is_empty());
        assert_eq!(view.rows[0].cells, vec!["Cardiovascular", "S1 S2 normal, no murmurs"]);
    }

    #[test]
    fn timeline_deserializes_sparse_rows() {
        let entry: TimelineEntry =
            serde_json::from_str(r#"{"date":"2026-06-01","event_type":"Admission"}"#).unwrap();
        let view = render(&[entry], DateFormat::DayMonthYear);
        assert_eq!(view.rows[0].cells, vec!["01/06/2026", "-", "Admission", "-", "-"]);
    }

    #[test]
    fn every_tab_has_a_label() {
        for tab in IpdTab::ALL {
            assert!(!tab.label().is_empty());
        }
    }
}
