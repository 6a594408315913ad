mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_reports_memory_backend() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.client().get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = common::json_body(res).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "memory");
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints_without_auth() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.client().get(server.url("/")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = common::json_body(res).await?;
    assert_eq!(body["data"]["name"], "Metis API");
    assert!(body["data"]["endpoints"]["answer_posts"].is_string());
    Ok(())
}
