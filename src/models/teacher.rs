use serde::{Deserialize, Serialize};

/// Weekly session caps. Stored and returned, not enforced on assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyLimits {
    pub max_lectures: Option<i32>,
    pub max_labs: Option<i32>,
    pub max_tutorials: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub subject_ids: Vec<String>,
    pub cabin: Option<String>,
    pub roles: Vec<String>,
    pub limits: WeeklyLimits,
    pub is_teaching_assistant: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Teacher {
    pub fn can_teach(&self, subject_id: &str) -> bool {
        self.subject_ids.iter().any(|s| s == subject_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeacherRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub subject_ids: Vec<String>,
    pub cabin: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub limits: WeeklyLimits,
    #[serde(default)]
    pub is_teaching_assistant: bool,
}
