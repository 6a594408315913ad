//! Answer post use-cases.
//!
//! # Invariants
//! - Every rejection happens before the first write.
//! - The author of a new answer is always the caller, and its parent is the
//!   stored post, never the client's copy.
//! - The approval flag only changes through instructors (or is set
//!   automatically when an instructor writes the answer).
//! - Answers leaving the service never carry exercise solutions or grading data.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::database::models::{AnswerPost, Course, User};
use crate::database::repository::{parent_reference, MetisStore};
use crate::metis::authorization::{AuthorizationCheckService, Role};
use crate::metis::course_context::{resolve_answer_course, resolve_course, PostContext};
use crate::metis::error::{MetisError, MetisResult};
use crate::notification::{GroupNotificationService, NotificationSink, SingleUserNotificationService};

#[derive(Clone)]
pub struct AnswerPostService {
    store: Arc<dyn MetisStore>,
    authorization: AuthorizationCheckService,
    group_notifications: GroupNotificationService,
    single_user_notifications: SingleUserNotificationService,
}

impl AnswerPostService {
    pub fn new(store: Arc<dyn MetisStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            store,
            authorization: AuthorizationCheckService::new(),
            group_notifications: GroupNotificationService::new(sink.clone()),
            single_user_notifications: SingleUserNotificationService::new(sink),
        }
    }

    pub fn store(&self) -> &Arc<dyn MetisStore> {
        &self.store
    }

    /// Loads the caller with the groups and authorities needed for role checks
    pub async fn current_user(&self, user_id: i64) -> MetisResult<User> {
        Ok(self.store.find_user(user_id).await?)
    }

    pub async fn create_answer_post(
        &self,
        course_id: i64,
        mut answer_post: AnswerPost,
        user: &User,
    ) -> MetisResult<AnswerPost> {
        debug!("Request to save AnswerPost in course {} by '{}'", course_id, user.login);

        let course = self.store.find_course(course_id).await?;
        let post_id = answer_post
            .post
            .as_ref()
            .and_then(|post| post.id)
            .ok_or_else(|| MetisError::consistency("An answer post must reference an existing post"))?;
        let post = self.store.find_post(post_id).await?;

        if resolve_course(&post).map(|c| c.id) != Some(course_id) {
            warn!("Rejecting answer to post {}: post is not part of course {}", post_id, course_id);
            return Err(MetisError::consistency(
                "PathVariable courseId doesn't match courseId of the AnswerPost in the body that should be added",
            ));
        }
        self.authorization.check_posts_enabled(&course)?;
        if answer_post.id.is_some() {
            return Err(MetisError::consistency("A new answer post cannot already have an ID"));
        }
        self.authorization
            .check_is_at_least_role_or_throw(Role::Student, &course, user)?;

        answer_post.tutor_approved = self.authorization.is_at_least_instructor(&course, user);
        answer_post.post = Some(parent_reference(post));
        answer_post.author = Some(user.clone());
        answer_post.creation_date = Some(Utc::now());

        let mut result = self.store.save_answer_post(answer_post).await?;
        self.notify_about_new_answer(&result).await;
        filter_sensitive_information(&mut result);

        Ok(result)
    }

    pub async fn update_answer_post(
        &self,
        course_id: i64,
        answer_post: AnswerPost,
        user: &User,
    ) -> MetisResult<AnswerPost> {
        debug!("Request to update AnswerPost {:?} by '{}'", answer_post.id, user.login);

        let id = answer_post
            .id
            .ok_or_else(|| MetisError::consistency("Invalid id"))?;
        let course = self.store.find_course(course_id).await?;
        let mut existing = self.store.find_answer_post(id).await?;

        ensure_same_course(&existing, course_id)?;
        self.authorization
            .check_may_update_or_delete_answer_post(&existing, &course, user)?;

        existing.content = answer_post.content;
        if self.authorization.may_change_approval(&course, user) {
            existing.tutor_approved = answer_post.tutor_approved;
        }

        let mut result = self.store.save_answer_post(existing).await?;
        filter_sensitive_information(&mut result);

        Ok(result)
    }

    pub async fn delete_answer_post(&self, course_id: i64, answer_post_id: i64, user: &User) -> MetisResult<()> {
        let existing = self.store.find_answer_post(answer_post_id).await?;
        let course = self.store.find_course(course_id).await?;

        let resolved = resolve_answer_course(&existing)
            .ok_or_else(|| MetisError::consistency("The answer post does not belong to any course"))?;
        if resolved.id != course_id {
            return Err(MetisError::consistency(
                "PathVariable courseId doesn't match courseId of the AnswerPost that should be deleted",
            ));
        }
        self.authorization
            .check_may_update_or_delete_answer_post(&existing, &course, user)?;

        let context = existing
            .post
            .as_ref()
            .map(|post| PostContext::of(post).describe())
            .unwrap_or_default();
        info!(
            "AnswerPost deleted by {}. Answer: {} for {}",
            user.login,
            existing.content.as_deref().unwrap_or_default(),
            context
        );

        self.store.delete_answer_post(answer_post_id).await?;
        Ok(())
    }

    pub async fn get_answer_post(&self, course_id: i64, answer_post_id: i64, user: &User) -> MetisResult<AnswerPost> {
        let course = self.store.find_course(course_id).await?;
        let mut answer_post = self.store.find_answer_post(answer_post_id).await?;

        ensure_same_course(&answer_post, course_id)?;
        self.authorization
            .check_is_at_least_role_or_throw(Role::Student, &course, user)?;

        filter_sensitive_information(&mut answer_post);
        Ok(answer_post)
    }

    async fn notify_about_new_answer(&self, answer_post: &AnswerPost) {
        let Some(post) = answer_post.post.as_ref() else {
            return;
        };

        if post.exercise.is_some() {
            self.group_notifications
                .notify_tutor_and_editor_and_instructor_group_about_new_answer_for_exercise(answer_post)
                .await;
            self.single_user_notifications
                .notify_user_about_new_answer_for_exercise(answer_post)
                .await;
        }
        if post.lecture.is_some() {
            self.group_notifications
                .notify_tutor_and_editor_and_instructor_group_about_new_answer_for_lecture(answer_post)
                .await;
            self.single_user_notifications
                .notify_user_about_new_answer_for_lecture(answer_post)
                .await;
        }
    }
}

/// An answer whose parent resolves to no course never matches a path course
fn ensure_same_course(answer_post: &AnswerPost, course_id: i64) -> MetisResult<()> {
    match resolve_answer_course(answer_post) {
        Some(Course { id, .. }) if *id == course_id => Ok(()),
        _ => Err(MetisError::consistency(
            "PathVariable courseId doesn't match courseId of the AnswerPost in the body",
        )),
    }
}

fn filter_sensitive_information(answer_post: &mut AnswerPost) {
    if let Some(exercise) = answer_post.post.as_mut().and_then(|post| post.exercise.as_mut()) {
        exercise.filter_sensitive_information();
    }
}
