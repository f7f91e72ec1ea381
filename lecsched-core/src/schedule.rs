//! Subject schedule payload.
//!
//! Field names on the wire follow the university's timetable export
//! (`maMonHoc`, `lichHoc`, `tietHoc`, ...). Fields the expander requires are
//! kept optional here so their absence surfaces as a validation error with a
//! useful path instead of a generic deserialization failure. Anything we don't
//! model explicitly is preserved in `extra` so reference data round-trips.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One subject with all of its teaching sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectSchedule {
    #[serde(rename = "maMonHoc", default, skip_serializing_if = "Option::is_none")]
    pub subject_code: Option<String>,

    #[serde(rename = "tenMonHoc", default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,

    /// Credit count, kept verbatim (the export mixes integers and strings)
    #[serde(rename = "soTinChi", default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(rename = "lichHoc", default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<ClassSession>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One lecturer/group assignment for a subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassSession {
    #[serde(rename = "classInfo", default, skip_serializing_if = "Option::is_none")]
    pub class_info: Option<Vec<RecurrencePattern>>,

    #[serde(rename = "giangVien", default, skip_serializing_if = "Option::is_none")]
    pub lecturer: Option<String>,

    /// Exercise/backup lecturer
    #[serde(rename = "giangVienBT", default, skip_serializing_if = "Option::is_none")]
    pub lecturer_backup: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "emailBT", default, skip_serializing_if = "Option::is_none")]
    pub email_backup: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "phoneBT", default, skip_serializing_if = "Option::is_none")]
    pub phone_backup: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// When and where a session meets: one room, one weekday, a set of weeks and periods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    #[serde(rename = "phong", default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,

    /// 1 = Monday ... 7 = Sunday
    #[serde(rename = "dayOfWeek", default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<i64>,

    /// Semester week numbers, not necessarily sorted or contiguous
    #[serde(rename = "week", default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<Vec<i64>>,

    /// Period numbers referencing the period table
    #[serde(rename = "tietHoc", default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<i64>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubjectSchedule {
    /// Display title used as the event summary, e.g. `AS2009 – Cơ học lượng tử`.
    pub fn title(&self) -> String {
        format!(
            "{} – {}",
            self.subject_code.as_deref().unwrap_or_default(),
            self.subject_name.as_deref().unwrap_or_default()
        )
    }

    pub fn sessions(&self) -> &[ClassSession] {
        self.sessions.as_deref().unwrap_or_default()
    }
}

impl ClassSession {
    pub fn lecturer(&self) -> &str {
        self.lecturer.as_deref().unwrap_or_default()
    }

    pub fn lecturer_backup(&self) -> &str {
        self.lecturer_backup.as_deref().unwrap_or_default()
    }

    pub fn patterns(&self) -> &[RecurrencePattern] {
        self.class_info.as_deref().unwrap_or_default()
    }

    /// Event description: lecturer, email and group, each trimmed.
    pub fn description(&self) -> String {
        format!(
            "Lecturer: {}\n Email: {}\n Group: {}",
            self.lecturer().trim(),
            self.email.as_deref().unwrap_or_default().trim(),
            self.group.as_deref().unwrap_or_default().trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_source_payload() {
        let payload = json!({
            "id": "14178",
            "maMonHoc": "AS2009",
            "tenMonHoc": "Cơ học lượng tử",
            "soTinChi": 0,
            "lichHoc": [{
                "classInfo": [{
                    "coSo": " 2  ",
                    "dayOfWeek": 3,
                    "phong": "H6-411",
                    "tietHoc": [5, 6],
                    "week": [1, 2, 3]
                }],
                "giangVien": "Lê Cao Đăng",
                "giangVienBT": "",
                "group": "L01",
                "nhomLT": "L01"
            }]
        });

        let subject: SubjectSchedule = serde_json::from_value(payload).unwrap();

        assert_eq!(subject.subject_code.as_deref(), Some("AS2009"));
        assert_eq!(subject.sessions().len(), 1);

        let session = &subject.sessions()[0];
        assert_eq!(session.lecturer(), "Lê Cao Đăng");
        assert_eq!(session.extra.get("nhomLT"), Some(&json!("L01")));

        let pattern = &session.patterns()[0];
        assert_eq!(pattern.day_of_week, Some(3));
        assert_eq!(pattern.periods.as_deref(), Some(&[5, 6][..]));
        assert_eq!(pattern.extra.get("coSo"), Some(&json!(" 2  ")));
    }

    #[test]
    fn test_unknown_fields_survive_serialization() {
        let payload = json!({
            "maMonHoc": "CO1005",
            "lichHoc": [{ "classInfo": [], "siso": "16/80" }]
        });

        let subject: SubjectSchedule = serde_json::from_value(payload.clone()).unwrap();
        let back = serde_json::to_value(&subject).unwrap();

        assert_eq!(back, payload);
    }

    #[test]
    fn test_title_and_description() {
        let subject = SubjectSchedule {
            subject_code: Some("AS2009".into()),
            subject_name: Some("Cơ học lượng tử".into()),
            ..Default::default()
        };
        assert_eq!(subject.title(), "AS2009 – Cơ học lượng tử");

        let session = ClassSession {
            lecturer: Some("  Lê Cao Đăng ".into()),
            email: Some(" a@b.vn".into()),
            ..Default::default()
        };
        assert_eq!(
            session.description(),
            "Lecturer: Lê Cao Đăng\n Email: a@b.vn\n Group: "
        );
    }
}
