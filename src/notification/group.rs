use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

use super::{deliver_all, AnswerContext, Notification, NotificationSink, Recipient};
use crate::database::models::AnswerPost;

/// Notifies the teaching assistant, editor and instructor groups of a course
#[derive(Clone)]
pub struct GroupNotificationService {
    sink: Arc<dyn NotificationSink>,
}

impl GroupNotificationService {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    pub async fn notify_tutor_and_editor_and_instructor_group_about_new_answer_for_exercise(
        &self,
        answer_post: &AnswerPost,
    ) -> usize {
        match AnswerContext::for_exercise(answer_post) {
            Ok(ctx) => {
                let text = format!("Exercise \"{}\" got a new reply.", ctx.entity_title);
                self.notify_staff(ctx, "New Exercise Reply", text).await
            }
            Err(e) => {
                warn!("Skipping staff notification: {}", e);
                0
            }
        }
    }

    pub async fn notify_tutor_and_editor_and_instructor_group_about_new_answer_for_lecture(
        &self,
        answer_post: &AnswerPost,
    ) -> usize {
        match AnswerContext::for_lecture(answer_post) {
            Ok(ctx) => {
                let text = format!("Lecture \"{}\" got a new reply.", ctx.entity_title);
                self.notify_staff(ctx, "New Lecture Reply", text).await
            }
            Err(e) => {
                warn!("Skipping staff notification: {}", e);
                0
            }
        }
    }

    async fn notify_staff(&self, ctx: AnswerContext, title: &str, text: String) -> usize {
        let now = Utc::now();
        let notifications = ctx
            .staff_groups
            .iter()
            .map(|group| Notification {
                title: title.to_string(),
                text: text.clone(),
                recipient: Recipient::Group(group.clone()),
                target: ctx.target.clone(),
                created_at: now,
            })
            .collect();
        deliver_all(&self.sink, notifications).await
    }
}
