mod common;

use anyhow::Result;
use metis_api::auth::{generate_jwt, Claims};
use metis_api::database::fixtures::{DS_ANSWER_ID, DS_COURSE_ID, SE_COURSE_ID, STUDENT_ID};
use reqwest::StatusCode;

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .client()
        .get(server.answer_post_url(DS_COURSE_ID, DS_ANSWER_ID))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = common::json_body(res).await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .client()
        .get(server.answer_post_url(DS_COURSE_ID, DS_ANSWER_ID))
        .bearer_auth("not.a.jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_for_unknown_user_is_forbidden() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = generate_jwt(&Claims::new("ghost", 999))?;

    let res = server
        .client()
        .get(server.answer_post_url(DS_COURSE_ID, DS_ANSWER_ID))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn token_with_stale_login_is_forbidden() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let token = generate_jwt(&Claims::new("student2", STUDENT_ID))?;

    let res = server
        .client()
        .get(server.answer_post_url(DS_COURSE_ID, DS_ANSWER_ID))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = common::json_body(res).await?;
    assert_eq!(body["message"], "User authentication mismatch");
    Ok(())
}

#[tokio::test]
async fn non_member_cannot_read_answers() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    // student1 is only enrolled in the software engineering course
    let res = server
        .as_user(server.client().get(server.answer_post_url(DS_COURSE_ID, DS_ANSWER_ID)), STUDENT_ID)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // and the course in the path must be the answer's course
    let res = server
        .as_user(server.client().get(server.answer_post_url(SE_COURSE_ID, DS_ANSWER_ID)), STUDENT_ID)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
