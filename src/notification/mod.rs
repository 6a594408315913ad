//! Notifications about new answers.
//!
//! Delivery is best effort: failures are logged and never propagate to the
//! caller, so a persisted answer is never rolled back because a notification
//! could not be sent.

pub mod group;
pub mod single_user;
pub mod sink;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::database::models::AnswerPost;
use crate::metis::course_context::resolve_answer_course;

pub use group::GroupNotificationService;
pub use single_user::SingleUserNotificationService;
pub use sink::{MemorySink, NoopSink, NotificationSink, TracingSink};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("Answer post lacks {0} needed for a notification")]
    MissingContext(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Recipient {
    Group(String),
    User(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NotificationTarget {
    #[serde(rename_all = "camelCase")]
    Exercise { exercise_id: i64, post_id: i64, course_id: i64 },
    #[serde(rename_all = "camelCase")]
    Lecture { lecture_id: i64, post_id: i64, course_id: i64 },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub text: String,
    pub recipient: Recipient,
    pub target: NotificationTarget,
    pub created_at: DateTime<Utc>,
}

/// Where an answer lives, extracted once for building notifications
pub(crate) struct AnswerContext {
    pub entity_title: String,
    pub target: NotificationTarget,
    pub post_author_id: Option<i64>,
    pub staff_groups: Vec<String>,
}

impl AnswerContext {
    pub(crate) fn for_exercise(answer_post: &AnswerPost) -> Result<Self, NotificationError> {
        let post = answer_post.post.as_ref().ok_or(NotificationError::MissingContext("a parent post"))?;
        let exercise = post.exercise.as_ref().ok_or(NotificationError::MissingContext("an exercise"))?;
        Self::build(
            answer_post,
            exercise.title.clone().unwrap_or_default(),
            |post_id, course_id| NotificationTarget::Exercise { exercise_id: exercise.id, post_id, course_id },
        )
    }

    pub(crate) fn for_lecture(answer_post: &AnswerPost) -> Result<Self, NotificationError> {
        let post = answer_post.post.as_ref().ok_or(NotificationError::MissingContext("a parent post"))?;
        let lecture = post.lecture.as_ref().ok_or(NotificationError::MissingContext("a lecture"))?;
        Self::build(
            answer_post,
            lecture.title.clone().unwrap_or_default(),
            |post_id, course_id| NotificationTarget::Lecture { lecture_id: lecture.id, post_id, course_id },
        )
    }

    fn build(
        answer_post: &AnswerPost,
        entity_title: String,
        target: impl FnOnce(i64, i64) -> NotificationTarget,
    ) -> Result<Self, NotificationError> {
        let post = answer_post.post.as_ref().ok_or(NotificationError::MissingContext("a parent post"))?;
        let post_id = post.id.ok_or(NotificationError::MissingContext("a stored parent post"))?;
        let course = resolve_answer_course(answer_post).ok_or(NotificationError::MissingContext("a course"))?;

        Ok(Self {
            entity_title,
            target: target(post_id, course.id),
            post_author_id: post.author.as_ref().map(|author| author.id),
            staff_groups: course.staff_group_names().into_iter().map(str::to_string).collect(),
        })
    }
}

/// Delivers all notifications concurrently and logs the ones that failed
pub(crate) async fn deliver_all(sink: &Arc<dyn NotificationSink>, notifications: Vec<Notification>) -> usize {
    let results = join_all(notifications.into_iter().map(|n| sink.deliver(n))).await;

    let mut delivered = 0;
    for result in results {
        match result {
            Ok(()) => delivered += 1,
            Err(e) => warn!("Dropping notification: {}", e),
        }
    }
    debug!("Delivered {} notification(s)", delivered);
    delivered
}
