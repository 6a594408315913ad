//! Resolution of the course a post (and therefore its answers) belongs to.
//!
//! A post may reference a lecture, an exercise and a course at the same
//! time. The first populated reference in the order lecture, exercise,
//! course decides; an explicit course is only consulted when neither a
//! lecture nor an exercise is set.

use crate::database::models::{AnswerPost, Course, Exercise, Lecture, Post};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostContext<'a> {
    Lecture(&'a Lecture),
    Exercise(&'a Exercise),
    Course(&'a Course),
    Unscoped,
}

impl<'a> PostContext<'a> {
    pub fn of(post: &'a Post) -> Self {
        if let Some(lecture) = &post.lecture {
            PostContext::Lecture(lecture)
        } else if let Some(exercise) = &post.exercise {
            PostContext::Exercise(exercise)
        } else if let Some(course) = &post.course {
            PostContext::Course(course)
        } else {
            PostContext::Unscoped
        }
    }

    pub fn course(&self) -> Option<&'a Course> {
        match self {
            PostContext::Lecture(lecture) => lecture.course.as_ref(),
            PostContext::Exercise(exercise) => exercise.course_via_exercise_group_or_course_member(),
            PostContext::Course(course) => Some(course),
            PostContext::Unscoped => None,
        }
    }

    /// Short description used in audit log lines
    pub fn describe(&self) -> String {
        match self {
            PostContext::Lecture(lecture) => format!("lecture with id: {}", lecture.id),
            PostContext::Exercise(exercise) => format!("exercise with id: {}", exercise.id),
            PostContext::Course(course) => format!("course with id: {}", course.id),
            PostContext::Unscoped => "no course context".to_string(),
        }
    }
}

pub fn resolve_course(post: &Post) -> Option<&Course> {
    PostContext::of(post).course()
}

/// Answers inherit the course of their parent post
pub fn resolve_answer_course(answer_post: &AnswerPost) -> Option<&Course> {
    answer_post.post.as_ref().and_then(resolve_course)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Exam, ExerciseGroup};

    fn lecture_in(course_id: i64) -> Lecture {
        Lecture {
            id: 10,
            title: Some("Intro".into()),
            course: Some(Course::new(course_id, "lecture course")),
        }
    }

    fn exercise_in(course_id: i64) -> Exercise {
        let mut exercise = Exercise::new(20, "Homework");
        exercise.course = Some(Course::new(course_id, "exercise course"));
        exercise
    }

    #[test]
    fn lecture_wins_over_exercise_and_course() {
        let post = Post {
            lecture: Some(lecture_in(1)),
            exercise: Some(exercise_in(2)),
            course: Some(Course::new(3, "explicit")),
            ..Default::default()
        };

        assert_eq!(resolve_course(&post).map(|c| c.id), Some(1));
        assert!(matches!(PostContext::of(&post), PostContext::Lecture(_)));
    }

    #[test]
    fn exercise_wins_over_stale_explicit_course() {
        let post = Post {
            exercise: Some(exercise_in(2)),
            course: Some(Course::new(3, "explicit")),
            ..Default::default()
        };

        assert_eq!(resolve_course(&post).map(|c| c.id), Some(2));
    }

    #[test]
    fn exam_exercise_resolves_via_exercise_group() {
        let mut exercise = Exercise::new(20, "Exam task");
        exercise.exercise_group = Some(ExerciseGroup {
            id: 4,
            exam: Some(Exam { id: 5, course: Some(Course::new(8, "exam course")) }),
        });
        let post = Post {
            exercise: Some(exercise),
            ..Default::default()
        };

        assert_eq!(resolve_course(&post).map(|c| c.id), Some(8));
    }

    #[test]
    fn explicit_course_used_when_nothing_else_is_set() {
        let post = Post {
            course: Some(Course::new(3, "explicit")),
            ..Default::default()
        };

        assert_eq!(resolve_course(&post).map(|c| c.id), Some(3));
    }

    #[test]
    fn lecture_without_course_does_not_fall_through() {
        let post = Post {
            lecture: Some(Lecture { id: 10, title: None, course: None }),
            course: Some(Course::new(3, "explicit")),
            ..Default::default()
        };

        assert!(resolve_course(&post).is_none());
    }

    #[test]
    fn unscoped_post_has_no_course() {
        let post = Post::default();
        assert_eq!(PostContext::of(&post), PostContext::Unscoped);
        assert!(resolve_course(&post).is_none());
    }

    #[test]
    fn answers_inherit_parent_course() {
        let answer = AnswerPost {
            post: Some(Post {
                lecture: Some(lecture_in(6)),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(resolve_answer_course(&answer).map(|c| c.id), Some(6));
        assert!(resolve_answer_course(&AnswerPost::default()).is_none());
    }

    #[test]
    fn describe_names_the_context() {
        let post = Post {
            exercise: Some(exercise_in(2)),
            ..Default::default()
        };
        assert_eq!(PostContext::of(&post).describe(), "exercise with id: 20");
    }
}
