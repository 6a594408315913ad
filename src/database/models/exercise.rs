use serde::{Deserialize, Serialize};

use super::course::Course;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: i64,
    #[serde(default)]
    pub course: Option<Course>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseGroup {
    pub id: i64,
    #[serde(default)]
    pub exam: Option<Exam>,
}

/// An exercise is either a course exercise or an exam exercise (via its exercise group)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub course: Option<Course>,
    #[serde(default)]
    pub exercise_group: Option<ExerciseGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grading_criteria: Vec<String>,
}

impl Exercise {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            problem_statement: None,
            course: None,
            exercise_group: None,
            example_solution: None,
            grading_instructions: None,
            grading_criteria: Vec::new(),
        }
    }

    /// Exam exercises reach their course through exercise group and exam;
    /// course exercises carry it directly.
    pub fn course_via_exercise_group_or_course_member(&self) -> Option<&Course> {
        match &self.exercise_group {
            Some(group) => group.exam.as_ref().and_then(|exam| exam.course.as_ref()),
            None => self.course.as_ref(),
        }
    }

    /// Remove example solution and grading data before the exercise leaves the server
    pub fn filter_sensitive_information(&mut self) {
        self.example_solution = None;
        self.grading_instructions = None;
        self.grading_criteria.clear();
    }
}
