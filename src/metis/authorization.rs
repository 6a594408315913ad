//! Course role checks for discussion actions.
//!
//! Roles come from course group membership, with the admin authority
//! outranking all of them. Every check is a comparison against one
//! "at least" threshold.

use tracing::warn;

use crate::database::models::{AnswerPost, Course, User};
use crate::metis::error::{MetisError, MetisResult};

/// Course roles, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Student,
    TeachingAssistant,
    Editor,
    Instructor,
    Admin,
}

impl Role {
    /// Highest role the user holds in the course, if any
    pub fn in_course(course: &Course, user: &User) -> Option<Role> {
        if user.is_admin() {
            Some(Role::Admin)
        } else if user.is_member_of(course.instructor_group_name.as_deref()) {
            Some(Role::Instructor)
        } else if user.is_member_of(course.editor_group_name.as_deref()) {
            Some(Role::Editor)
        } else if user.is_member_of(course.teaching_assistant_group_name.as_deref()) {
            Some(Role::TeachingAssistant)
        } else if user.is_member_of(course.student_group_name.as_deref()) {
            Some(Role::Student)
        } else {
            None
        }
    }
}

/// Stateless role checks against course group membership
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationCheckService;

impl AuthorizationCheckService {
    pub fn new() -> Self {
        Self
    }

    pub fn is_at_least_role(&self, role: Role, course: &Course, user: &User) -> bool {
        Role::in_course(course, user).map_or(false, |held| held >= role)
    }

    pub fn check_is_at_least_role_or_throw(&self, role: Role, course: &Course, user: &User) -> MetisResult<()> {
        if self.is_at_least_role(role, course, user) {
            return Ok(());
        }
        warn!(
            "User '{}' lacks role {:?} in course {}",
            user.login, role, course.id
        );
        Err(MetisError::forbidden(format!(
            "You need at least the {:?} role in course {} for this action",
            role, course.id
        )))
    }

    pub fn is_at_least_instructor(&self, course: &Course, user: &User) -> bool {
        self.is_at_least_role(Role::Instructor, course, user)
    }

    pub fn check_posts_enabled(&self, course: &Course) -> MetisResult<()> {
        if course.posts_enabled {
            Ok(())
        } else {
            Err(MetisError::FeatureDisabled(format!(
                "Course with id {} does not have posts enabled",
                course.id
            )))
        }
    }

    /// Authors may always edit their own answers; everyone else needs to be staff
    pub fn check_may_update_or_delete_answer_post(
        &self,
        answer_post: &AnswerPost,
        course: &Course,
        user: &User,
    ) -> MetisResult<()> {
        if answer_post.is_authored_by(user) {
            return Ok(());
        }
        self.check_is_at_least_role_or_throw(Role::TeachingAssistant, course, user)
    }

    /// Only instructors decide whether an answer is approved
    pub fn may_change_approval(&self, course: &Course, user: &User) -> bool {
        self.is_at_least_instructor(course, user)
    }
}
