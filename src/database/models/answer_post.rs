use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::Post;
use super::user::User;

/// Reply to a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerPost {
    pub id: Option<i64>,
    pub content: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub author: Option<User>,
    pub tutor_approved: bool,
    pub post: Option<Post>,
}

impl AnswerPost {
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author.as_ref().map_or(false, |author| author.id == user.id)
    }
}
