use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity levels used by toasts and modal dialogs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Sort direction for list queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Wire value expected by the list endpoints.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// One page of a paginated list response.
///
/// List endpoints answer with rows under either a `results` or a `data` key
/// and a `count` total. Rows stay opaque JSON; column render functions decide
/// how to display them.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub rows: Vec<Value>,
    pub count: u64,
}

impl ListPage {
    /// Extract a page from a decoded response body.
    ///
    /// Rows are taken from `results`, then `data`, then a bare top-level
    /// array. A missing `count` defaults to 0.
    pub fn from_value(value: &Value) -> Self {
        let rows = value
            .get("results")
            .or_else(|| value.get("data"))
            .or(Some(value))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let count = value.get("count").and_then(Value::as_u64).unwrap_or(0);
        Self { rows, count }
    }
}

/// The `{success, message, data, errors}` envelope used by action and
/// single-object endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Value>,
}

/// Student row as served by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    #[serde(default)]
    pub admission_number: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub division_name: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub parent_mobile: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Student {
    /// Typed view over an opaque table row, used when an action needs the
    /// row's identity (delete confirmations and the like).
    pub fn from_row(row: &Value) -> Option<Self> {
        serde_json::from_value(row.clone()).ok()
    }

    /// Display name with the admission number as fallback.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.admission_number.clone())
            .unwrap_or_else(|| format!("student #{}", self.id))
    }
}

/// Pending registration row as served by the approval queue endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub id: u64,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub parent_mobile: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub interested_branch_name: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub study_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub submission_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl PendingRegistration {
    pub fn from_row(row: &Value) -> Option<Self> {
        serde_json::from_value(row.clone()).ok()
    }

    pub fn display_name(&self) -> String {
        self.student_name
            .clone()
            .unwrap_or_else(|| format!("registration #{}", self.id))
    }
}

/// Branch lookup entry from the utilities endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Class lookup entry from the utilities endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub level: Option<i64>,
}

/// Division lookup entry from the utilities endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub inactive: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationStats {
    #[serde(default)]
    pub pending_students: u64,
    #[serde(default)]
    pub pending_staff: u64,
    #[serde(default)]
    pub total_pending: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeStats {
    #[serde(default)]
    pub this_month_collection: f64,
    #[serde(default)]
    pub pending_dues: f64,
    #[serde(default)]
    pub total_students_with_dues: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceStats {
    #[serde(default)]
    pub students_present: u64,
    #[serde(default)]
    pub students_total: u64,
    #[serde(default)]
    pub students_percentage: f64,
    #[serde(default)]
    pub staff_present: u64,
    #[serde(default)]
    pub staff_total: u64,
    #[serde(default)]
    pub staff_percentage: f64,
}

/// Aggregate snapshot served by the dashboard stats endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub students: StudentStats,
    #[serde(default)]
    pub staff: StaffStats,
    #[serde(default)]
    pub registrations: RegistrationStats,
    #[serde(default)]
    pub fees: FeeStats,
    #[serde(default)]
    pub attendance: AttendanceStats,
}

/// Identifies one of the data tables owned by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableId {
    Students,
    Registrations,
}

/// Top-level screens the nav bar can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Students,
    Registrations,
}

/// Modal sizing hints, mapped to overlay width by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalSize {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

/// A modal button together with the effect it emits when activated.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalButton {
    pub label: String,
    pub effect: Option<Box<Effect>>,
}

impl ModalButton {
    pub fn new(label: impl Into<String>, effect: Option<Effect>) -> Self {
        Self {
            label: label.into(),
            effect: effect.map(Box::new),
        }
    }
}

/// Configuration for the single shared modal slot.
///
/// Showing a modal while another is visible replaces the prior configuration
/// outright; there is no stacking.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalRequest {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub size: ModalSize,
    pub dismissible: bool,
    pub buttons: Vec<ModalButton>,
}

impl ModalRequest {
    /// Plain informational dialog with a single Close button.
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Info,
            size: ModalSize::default(),
            dismissible: true,
            buttons: vec![ModalButton::new("Close", None)],
        }
    }

    /// Cancel/Confirm dialog. Confirm emits `effect` after the modal hides;
    /// Cancel only hides.
    pub fn confirm(title: impl Into<String>, message: impl Into<String>, effect: Effect) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Warning,
            size: ModalSize::default(),
            dismissible: true,
            buttons: vec![
                ModalButton::new("Cancel", None),
                ModalButton::new("Confirm", Some(effect)),
            ],
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_size(mut self, size: ModalSize) -> Self {
        self.size = size;
        self
    }
}

/// Messages that update the application state.
///
/// User input is handled by components directly; messages carry the
/// system-level events the runtime feeds back into the update loop.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (throbbers, debounce deadlines, toast expiry)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
}

/// Side effects emitted by state transitions and executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Change the main view
    SwitchTo(Route),
    /// Display the shared modal, replacing any visible configuration
    ShowModal(ModalRequest),
    /// Hide the shared modal
    CloseModal,
    /// Enqueue a transient toast notification
    Toast(Severity, String),
    /// Issue a list request for the identified table from its current state
    ReloadTable(TableId),
    /// Fetch the dashboard statistics snapshot
    LoadDashboard,
    /// Fetch the branch lookup used by the students filter bar
    LoadBranches,
    /// POST an action endpoint; on success refresh the given table
    SubmitAction {
        path: String,
        body: Option<Value>,
        refresh: Option<TableId>,
    },
    /// Leave the application
    Quit,
}

/// Result of an asynchronous API call, routed back into the update loop.
#[derive(Debug, Clone)]
pub enum ExecOutcome {
    ListLoaded {
        table: TableId,
        seq: u64,
        page: ListPage,
    },
    ListFailed {
        table: TableId,
        seq: u64,
        message: String,
    },
    StatsLoaded(Box<DashboardStats>),
    StatsFailed(String),
    BranchesLoaded(Vec<Branch>),
    BranchesFailed(String),
    ActionCompleted {
        message: String,
        refresh: Option<TableId>,
    },
    ActionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_page_reads_results_key() {
        let body = json!({"count": 2, "results": [{"id": 1}, {"id": 2}]});
        let page = ListPage::from_value(&body);
        assert_eq!(page.count, 2);
        assert_eq!(page.rows.len(), 2);
    }

    #[test]
    fn list_page_falls_back_to_data_key() {
        let body = json!({"success": true, "data": [{"id": 7}]});
        let page = ListPage::from_value(&body);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.count, 0);
    }

    #[test]
    fn list_page_accepts_bare_array() {
        let body = json!([{"id": 1}, {"id": 2}, {"id": 3}]);
        let page = ListPage::from_value(&body);
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.count, 0);
    }

    #[test]
    fn list_page_defaults_on_unexpected_shape() {
        let page = ListPage::from_value(&json!({"message": "nope"}));
        assert!(page.rows.is_empty());
        assert_eq!(page.count, 0);
    }

    #[test]
    fn action_envelope_defaults() {
        let env: ActionEnvelope = serde_json::from_str("{}").expect("deserialize envelope");
        assert!(!env.success);
        assert!(env.message.is_none());
        assert!(env.errors.is_none());
    }

    #[test]
    fn student_row_round_trip() {
        let row = json!({
            "id": 12,
            "admission_number": "ADM-0012",
            "name": "Ayesha K",
            "class_name": "Class 4",
            "branch_name": "Doha",
            "status": "ACTIVE",
            "parent_mobile": "555-0100"
        });
        let student = Student::from_row(&row).expect("typed student");
        assert_eq!(student.id, 12);
        assert_eq!(student.display_name(), "Ayesha K");
        assert!(student.created_at.is_none());
    }

    #[test]
    fn student_display_name_falls_back() {
        let student = Student::from_row(&json!({"id": 3})).expect("typed student");
        assert_eq!(student.display_name(), "student #3");
    }

    #[test]
    fn sort_order_round_trip() {
        assert_eq!(SortOrder::Ascending.toggled(), SortOrder::Descending);
        assert_eq!(SortOrder::Ascending.toggled().toggled(), SortOrder::Ascending);
        assert_eq!(SortOrder::Descending.as_param(), "desc");
    }

    #[test]
    fn confirm_modal_shape() {
        let request = ModalRequest::confirm("Delete", "Really?", Effect::CloseModal);
        assert_eq!(request.buttons.len(), 2);
        assert!(request.buttons[0].effect.is_none());
        assert_eq!(request.buttons[1].effect.as_deref(), Some(&Effect::CloseModal));
        assert!(request.dismissible);
    }

    #[test]
    fn dashboard_stats_tolerates_partial_payload() {
        let body = json!({"students": {"total": 40, "active": 38}, "fees": {}});
        let stats: DashboardStats = serde_json::from_value(body).expect("stats");
        assert_eq!(stats.students.total, 40);
        assert_eq!(stats.students.inactive, 0);
        assert_eq!(stats.staff.total, 0);
    }
}
