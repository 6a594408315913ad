use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{deliver_all, AnswerContext, Notification, NotificationSink, Recipient};
use crate::database::models::AnswerPost;

/// Notifies the author of the post that was answered
#[derive(Clone)]
pub struct SingleUserNotificationService {
    sink: Arc<dyn NotificationSink>,
}

impl SingleUserNotificationService {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    pub async fn notify_user_about_new_answer_for_exercise(&self, answer_post: &AnswerPost) -> usize {
        match AnswerContext::for_exercise(answer_post) {
            Ok(ctx) => {
                let text = format!("Your post in exercise \"{}\" got a new reply.", ctx.entity_title);
                self.notify_post_author(ctx, "New Exercise Reply", text).await
            }
            Err(e) => {
                warn!("Skipping author notification: {}", e);
                0
            }
        }
    }

    pub async fn notify_user_about_new_answer_for_lecture(&self, answer_post: &AnswerPost) -> usize {
        match AnswerContext::for_lecture(answer_post) {
            Ok(ctx) => {
                let text = format!("Your post in lecture \"{}\" got a new reply.", ctx.entity_title);
                self.notify_post_author(ctx, "New Lecture Reply", text).await
            }
            Err(e) => {
                warn!("Skipping author notification: {}", e);
                0
            }
        }
    }

    async fn notify_post_author(&self, ctx: AnswerContext, title: &str, text: String) -> usize {
        let Some(author_id) = ctx.post_author_id else {
            debug!("Post has no author, nobody to notify");
            return 0;
        };

        let notification = Notification {
            title: title.to_string(),
            text,
            recipient: Recipient::User(author_id),
            target: ctx.target,
            created_at: Utc::now(),
        };
        deliver_all(&self.sink, vec![notification]).await
    }
}
