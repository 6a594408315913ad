mod common;

use anyhow::Result;
use metis_api::database::fixtures::*;
use reqwest::StatusCode;
use serde_json::json;

async fn student_answer_id(server: &common::TestServer) -> Result<i64> {
    let res = server
        .as_user(server.client().post(server.answer_posts_url(SE_COURSE_ID)), STUDENT_ID)
        .json(&json!({ "content": "Soon to be gone", "post": { "id": COURSE_WIDE_POST_ID } }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(common::json_body(res).await?["data"]["id"].as_i64().expect("id"))
}

async fn delete(server: &common::TestServer, user_id: i64, course_id: i64, id: i64) -> Result<reqwest::Response> {
    Ok(server
        .as_user(server.client().delete(server.answer_post_url(course_id, id)), user_id)
        .send()
        .await?)
}

#[tokio::test]
async fn author_deletes_own_answer() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let id = student_answer_id(&server).await?;
    let before = server.store.answer_count().await;

    let res = delete(&server, STUDENT_ID, SE_COURSE_ID, id).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = common::json_body(res).await?;
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());
    assert_eq!(server.store.answer_count().await, before - 1);

    let res = server
        .as_user(server.client().get(server.answer_post_url(SE_COURSE_ID, id)), STUDENT_ID)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn other_students_cannot_delete() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let id = student_answer_id(&server).await?;

    let res = delete(&server, OTHER_STUDENT_ID, SE_COURSE_ID, id).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = delete(&server, TUTOR_ID, SE_COURSE_ID, id).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn answer_without_course_cannot_be_deleted() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = delete(&server, ADMIN_ID, SE_COURSE_ID, ORPHAN_ANSWER_ID).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_through_wrong_course_is_rejected() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = delete(&server, ADMIN_ID, SE_COURSE_ID, DS_ANSWER_ID).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = delete(&server, DS_STUDENT_ID, DS_COURSE_ID, DS_ANSWER_ID).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn delete_of_unknown_answer_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = delete(&server, ADMIN_ID, SE_COURSE_ID, 424242).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
