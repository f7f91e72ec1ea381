//! Read-only reference data: the subject timetable and lecturer directory.
//!
//! Loaded once at startup and never mutated. Every lookup hands back owned
//! copies, so enriching a result never touches the shared tables.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{ScheduleError, ScheduleResult};
use crate::normalize::{fold_key, names_match};
use crate::schedule::{ClassSession, SubjectSchedule};

pub const SUBJECT_FILE: &str = "data_subject.json";
pub const LECTURER_FILE: &str = "data_lecturer.json";

/// Directory entry for one lecturer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lecturer {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl Lecturer {
    /// Stand-in returned when a name isn't in the directory.
    pub fn placeholder(name: &str) -> Self {
        Lecturer {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectName {
    pub id: String,
    pub name: String,
}

/// Summary row of the subject catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "maMonHoc")]
    pub subject_code: String,
    #[serde(rename = "tenMonHoc")]
    pub subject_name: String,
    #[serde(rename = "soTinChi")]
    pub credits: Value,
    pub id: Value,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    subjects: Vec<SubjectSchedule>,
    lecturers: Vec<Lecturer>,
    /// Folded name -> index of the first matching lecturer
    lecturer_index: HashMap<String, usize>,
    teaching_staff: Vec<Lecturer>,
    subject_names: Vec<SubjectName>,
    catalog: Vec<CatalogEntry>,
}

impl ReferenceData {
    /// Load `data_subject.json` and `data_lecturer.json` from `dir`.
    pub fn load(dir: &Path) -> ScheduleResult<Self> {
        let subjects: Vec<SubjectSchedule> = read_json(&dir.join(SUBJECT_FILE))?;
        let lecturers: Vec<Lecturer> = read_json(&dir.join(LECTURER_FILE))?;

        let data = Self::from_parts(subjects, lecturers);

        info!(
            dir = %dir.display(),
            subjects = data.subjects.len(),
            lecturers = data.lecturers.len(),
            "Loaded reference data"
        );

        Ok(data)
    }

    pub fn from_parts(subjects: Vec<SubjectSchedule>, lecturers: Vec<Lecturer>) -> Self {
        let mut lecturer_index = HashMap::new();
        for (i, lecturer) in lecturers.iter().enumerate() {
            lecturer_index.entry(fold_key(&lecturer.name)).or_insert(i);
        }

        let mut data = ReferenceData {
            subjects,
            lecturers,
            lecturer_index,
            ..Default::default()
        };

        data.teaching_staff = data
            .staff_names()
            .iter()
            .map(|name| data.lecturer_info(name))
            .collect();

        data.subject_names = data
            .subjects
            .iter()
            .filter_map(|s| {
                Some(SubjectName {
                    id: s.subject_code.clone()?,
                    name: s.subject_name.clone().unwrap_or_default(),
                })
            })
            .collect();

        data.catalog = data
            .subjects
            .iter()
            .filter_map(|s| {
                Some(CatalogEntry {
                    subject_code: s.subject_code.clone()?,
                    subject_name: s.subject_name.clone().unwrap_or_default(),
                    credits: s.credits.clone().unwrap_or(Value::Null),
                    id: s.id.clone().unwrap_or(Value::Null),
                })
            })
            .collect();

        data
    }

    /// Subject whose code matches case-insensitively, with contact details filled in.
    pub fn find_by_subject_code(&self, code: &str) -> Vec<SubjectSchedule> {
        let code = code.trim().to_lowercase();

        self.subjects
            .iter()
            .find(|s| {
                s.subject_code
                    .as_deref()
                    .is_some_and(|c| c.trim().to_lowercase() == code)
            })
            .map(|s| {
                let mut subject = s.clone();
                for session in subject.sessions.iter_mut().flatten() {
                    self.enrich(session);
                }
                vec![subject]
            })
            .unwrap_or_default()
    }

    /// Narrow `subjects` to sessions taught by `name` (either lecturer slot).
    ///
    /// Subjects left without sessions are dropped.
    pub fn find_by_lecturer(&self, subjects: &[SubjectSchedule], name: &str) -> Vec<SubjectSchedule> {
        subjects
            .iter()
            .filter_map(|subject| {
                let sessions: Vec<ClassSession> = subject
                    .sessions()
                    .iter()
                    .filter(|session| {
                        names_match(session.lecturer(), name)
                            || names_match(session.lecturer_backup(), name)
                    })
                    .map(|session| {
                        let mut session = session.clone();
                        self.enrich(&mut session);
                        session
                    })
                    .collect();

                if sessions.is_empty() {
                    return None;
                }

                Some(SubjectSchedule {
                    sessions: Some(sessions),
                    ..subject.clone()
                })
            })
            .collect()
    }

    /// Combined lookup. Blank arguments count as absent; with neither, nothing matches.
    pub fn search(&self, code: Option<&str>, lecturer: Option<&str>) -> Vec<SubjectSchedule> {
        let code = code.filter(|c| !c.trim().is_empty());
        let lecturer = lecturer.filter(|l| !l.trim().is_empty());

        match (code, lecturer) {
            (Some(code), Some(name)) => self.find_by_lecturer(&self.find_by_subject_code(code), name),
            (Some(code), None) => self.find_by_subject_code(code),
            (None, Some(name)) => self.find_by_lecturer(&self.subjects, name),
            (None, None) => Vec::new(),
        }
    }

    /// Directory entry for `name`, or a placeholder with empty contact details.
    pub fn lecturer_info(&self, name: &str) -> Lecturer {
        self.lecturer_index
            .get(&fold_key(name))
            .and_then(|&i| self.lecturers.get(i))
            .cloned()
            .unwrap_or_else(|| Lecturer::placeholder(name))
    }

    pub fn lecturers(&self) -> &[Lecturer] {
        &self.lecturers
    }

    /// Everyone who teaches at least one session, in first-seen order.
    pub fn teaching_staff(&self) -> &[Lecturer] {
        &self.teaching_staff
    }

    pub fn subject_names(&self) -> &[SubjectName] {
        &self.subject_names
    }

    pub fn subjects(&self) -> &[SubjectSchedule] {
        &self.subjects
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    /// Catalog row whose code equals the trimmed `code` exactly.
    pub fn catalog_entry(&self, code: &str) -> Option<&CatalogEntry> {
        let code = code.trim();
        self.catalog.iter().find(|e| e.subject_code == code)
    }

    fn enrich(&self, session: &mut ClassSession) {
        let main = self.lecturer_info(session.lecturer());
        session.email = Some(main.email);
        session.phone = Some(main.phone);

        let backup = self.lecturer_info(session.lecturer_backup());
        session.email_backup = Some(backup.email);
        session.phone_backup = Some(backup.phone);
    }

    fn staff_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for session in self.subjects.iter().flat_map(|s| s.sessions()) {
            for name in [session.lecturer(), session.lecturer_backup()] {
                if name.trim().is_empty() {
                    continue;
                }
                if seen.insert(name.to_string()) {
                    names.push(name.to_string());
                }
            }
        }

        names
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ScheduleResult<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ScheduleError::Data(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| ScheduleError::Data(format!("Failed to parse {}: {}", path.display(), e)))
}
