use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::answer_post::AnswerPost;
use super::course::Course;
use super::exercise::Exercise;
use super::lecture::Lecture;
use super::user::User;

/// Course-wide topics a post can belong to instead of an exercise or lecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseWideContext {
    TechSupport,
    Organization,
    Random,
}

impl CourseWideContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseWideContext::TechSupport => "TECH_SUPPORT",
            CourseWideContext::Organization => "ORGANIZATION",
            CourseWideContext::Random => "RANDOM",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TECH_SUPPORT" => Some(CourseWideContext::TechSupport),
            "ORGANIZATION" => Some(CourseWideContext::Organization),
            "RANDOM" => Some(CourseWideContext::Random),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: i64,
    pub emoji_id: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
}

/// Start of a discussion thread
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    pub id: Option<i64>,
    pub content: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub author: Option<User>,
    pub title: Option<String>,
    pub visible_for_students: Option<bool>,
    /// Legacy vote counter, superseded by reactions
    pub votes: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<AnswerPost>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    pub exercise: Option<Exercise>,
    pub lecture: Option<Lecture>,
    pub course: Option<Course>,
    pub course_wide_context: Option<CourseWideContext>,
}

impl Post {
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}
