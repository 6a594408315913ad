use serde::{Deserialize, Serialize};

/// A course owns the group names that carry role membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub posts_enabled: bool,
    #[serde(default)]
    pub student_group_name: Option<String>,
    #[serde(default)]
    pub teaching_assistant_group_name: Option<String>,
    #[serde(default)]
    pub editor_group_name: Option<String>,
    #[serde(default)]
    pub instructor_group_name: Option<String>,
}

impl Course {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            posts_enabled: true,
            student_group_name: None,
            teaching_assistant_group_name: None,
            editor_group_name: None,
            instructor_group_name: None,
        }
    }

    /// Staff groups that receive notifications about new answers
    pub fn staff_group_names(&self) -> Vec<&str> {
        [
            &self.teaching_assistant_group_name,
            &self.editor_group_name,
            &self.instructor_group_name,
        ]
        .into_iter()
        .filter_map(|g| g.as_deref())
        .collect()
    }
}
