//
//  bitbucket-v1
//  tests/api_issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::collections::BTreeMap;

use bitbucket_v1::api::models::IssueRequest;
use bitbucket_v1::api::{ApiError, BitbucketClient};
use bitbucket_v1::auth::AuthCredential;
use mockito::Matcher;

const ISSUE: &str = r#"{
    "local_id": 7,
    "title": "Crash on save",
    "content": "Steps...",
    "status": "new",
    "priority": "major",
    "metadata": {"kind": "bug", "component": null, "milestone": null, "version": null},
    "reported_by": {"username": "jdoe", "display_name": "Jane Doe"},
    "utc_created_on": "2013-08-21 19:31:37+00:00",
    "utc_last_updated": "2013-08-21 19:31:37+00:00",
    "comment_count": 0,
    "follower_count": 1
}"#;

fn page(count: u32) -> String {
    format!(r#"{{"count": {}, "filter": {{}}, "search": null, "issues": [{}]}}"#, count, ISSUE)
}

fn client(server: &mockito::ServerGuard) -> BitbucketClient {
    BitbucketClient::with_base_url(&server.url()).unwrap()
}

#[tokio::test]
async fn test_get_issues_sends_start_and_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "15".into()),
            Matcher::UrlEncoded("limit".into(), "15".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(page(16))
        .create_async()
        .await;

    let client = client(&server);
    let issues = client.repository("jdoe", "tools").issues();
    let result = issues.get_issues(15, 15).await.unwrap();

    mock.assert_async().await;
    assert_eq!(result.count, 16);
    assert_eq!(result.issues[0].local_id, 7);
    assert_eq!(result.issues[0].metadata.kind, "bug");
    assert_eq!(result.next_start(15, 15), None);
}

#[tokio::test]
async fn test_default_page_is_first_fifteen() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "0".into()),
            Matcher::UrlEncoded("limit".into(), "15".into()),
        ]))
        .with_body(page(1))
        .create_async()
        .await;

    let client = client(&server);
    client
        .repository("jdoe", "tools")
        .issues()
        .get_issues_default()
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_encodes_term() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/")
        .match_query(Matcher::UrlEncoded("search".into(), "crash & burn".into()))
        .with_body(page(1))
        .create_async()
        .await;

    let client = client(&server);
    let result = client
        .repository("jdoe", "tools")
        .issues()
        .search("crash & burn")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.issues.len(), 1);
}

#[tokio::test]
async fn test_get_issue_and_followers() {
    let mut server = mockito::Server::new_async().await;
    let issue_mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/7")
        .with_body(ISSUE)
        .create_async()
        .await;
    let followers_mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/7/followers")
        .with_body(r#"{"count": 1, "followers": [{"username": "asmith"}]}"#)
        .create_async()
        .await;

    let client = client(&server);
    let issue = client.repository("jdoe", "tools").issues().issue(7);

    let detail = issue.get_issue().await.unwrap();
    assert_eq!(detail.title, "Crash on save");
    assert_eq!(detail.reported_by.unwrap().label(), "Jane Doe");

    let followers = issue.get_issue_followers().await.unwrap();
    assert_eq!(followers.count, 1);
    assert_eq!(followers.followers[0].username, "asmith");

    issue_mock.assert_async().await;
    followers_mock.assert_async().await;
}

#[tokio::test]
async fn test_create_posts_form_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/repositories/jdoe/tools/issues")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_header("authorization", "Basic amRvZTpzZWNyZXQ=")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("title".into(), "Crash on save".into()),
            Matcher::UrlEncoded("kind".into(), "bug".into()),
        ]))
        .with_body(ISSUE)
        .create_async()
        .await;

    let client = client(&server).with_auth(AuthCredential::basic("jdoe", "secret"));
    let request = IssueRequest {
        title: Some("Crash on save".to_string()),
        kind: Some("bug".to_string()),
        ..Default::default()
    };
    let created = client
        .repository("jdoe", "tools")
        .issues()
        .create(&request)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.local_id, 7);
}

#[tokio::test]
async fn test_update_fields_puts_to_issue() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/repositories/jdoe/tools/issues/7")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::UrlEncoded("status".into(), "resolved".into()))
        .with_body(ISSUE)
        .create_async()
        .await;

    let client = client(&server).with_auth(AuthCredential::token("tok"));
    let mut fields = BTreeMap::new();
    fields.insert("status".to_string(), "resolved".to_string());

    client
        .repository("jdoe", "tools")
        .issues()
        .update_fields(7, &fields)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_cache_serves_repeat_reads_until_write() {
    let mut server = mockito::Server::new_async().await;
    let get_mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/7")
        .with_body(ISSUE)
        .expect(2)
        .create_async()
        .await;
    let list_mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/")
        .match_query(Matcher::Any)
        .with_body(page(1))
        .expect(2)
        .create_async()
        .await;
    let put_mock = server
        .mock("PUT", "/repositories/jdoe/tools/issues/7")
        .with_body(ISSUE)
        .create_async()
        .await;

    let client = client(&server).with_cache(true);
    let issues = client.repository("jdoe", "tools").issues();
    let issue = issues.issue(7);

    issue.get_issue().await.unwrap();
    issue.get_issue().await.unwrap();
    issues.get_issues_default().await.unwrap();
    issues.get_issues_default().await.unwrap();

    let request = IssueRequest {
        status: Some("open".to_string()),
        ..Default::default()
    };
    issue.update(&request).await.unwrap();

    // Both the issue and the listing were dropped by the write.
    issue.get_issue().await.unwrap();
    issues.get_issues_default().await.unwrap();

    get_mock.assert_async().await;
    list_mock.assert_async().await;
    put_mock.assert_async().await;
}

#[tokio::test]
async fn test_create_drops_cached_listing() {
    let mut server = mockito::Server::new_async().await;
    let list_mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/")
        .match_query(Matcher::Any)
        .with_body(page(1))
        .expect(2)
        .create_async()
        .await;
    let post_mock = server
        .mock("POST", "/repositories/jdoe/tools/issues")
        .with_body(ISSUE)
        .create_async()
        .await;

    let client = client(&server).with_cache(true);
    let issues = client.repository("jdoe", "tools").issues();

    issues.get_issues_default().await.unwrap();
    issues.get_issues_default().await.unwrap();
    let request = IssueRequest {
        title: Some("Crash on save".to_string()),
        ..Default::default()
    };
    issues.create(&request).await.unwrap();
    issues.get_issues_default().await.unwrap();

    list_mock.assert_async().await;
    post_mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_drops_cached_issue_and_listing() {
    let mut server = mockito::Server::new_async().await;
    let get_mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/7")
        .with_body(ISSUE)
        .expect(2)
        .create_async()
        .await;
    let list_mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/")
        .match_query(Matcher::Any)
        .with_body(page(1))
        .expect(2)
        .create_async()
        .await;
    let delete_mock = server
        .mock("DELETE", "/repositories/jdoe/tools/issues/7")
        .with_status(204)
        .create_async()
        .await;

    let client = client(&server).with_cache(true);
    let issues = client.repository("jdoe", "tools").issues();
    let issue = issues.issue(7);

    issue.get_issue().await.unwrap();
    issues.get_issues_default().await.unwrap();
    issue.get_issue().await.unwrap();
    issues.get_issues_default().await.unwrap();

    issue.delete_issue().await.unwrap();
    issue.get_issue().await.unwrap();
    issues.get_issues_default().await.unwrap();

    get_mock.assert_async().await;
    list_mock.assert_async().await;
    delete_mock.assert_async().await;
}

#[tokio::test]
async fn test_issue_write_keeps_other_cached_issues() {
    let mut server = mockito::Server::new_async().await;
    let sibling_mock = server
        .mock("GET", "/repositories/jdoe/tools/issues/10")
        .with_body(ISSUE)
        .expect(1)
        .create_async()
        .await;
    let put_mock = server
        .mock("PUT", "/repositories/jdoe/tools/issues/1")
        .with_body(ISSUE)
        .create_async()
        .await;

    let client = client(&server).with_cache(true);
    let issues = client.repository("jdoe", "tools").issues();

    issues.issue(10).get_issue().await.unwrap();
    let request = IssueRequest {
        status: Some("open".to_string()),
        ..Default::default()
    };
    issues.issue(1).update(&request).await.unwrap();
    issues.issue(10).get_issue().await.unwrap();

    sibling_mock.assert_async().await;
    put_mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_issue() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/repositories/jdoe/tools/issues/7")
        .with_status(204)
        .create_async()
        .await;

    let client = client(&server);
    client
        .repository("jdoe", "tools")
        .issues()
        .issue(7)
        .delete_issue()
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_statuses_map_to_api_errors() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/jdoe/tools/issues/404")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/repositories/jdoe/tools/issues/401")
        .with_status(401)
        .create_async()
        .await;
    server
        .mock("GET", "/repositories/jdoe/tools/issues/429")
        .with_status(429)
        .create_async()
        .await;
    server
        .mock("GET", "/repositories/jdoe/tools/issues/500")
        .with_status(500)
        .with_body(r#"{"error": {"message": "Something broke"}}"#)
        .create_async()
        .await;

    let client = client(&server);
    let issues = client.repository("jdoe", "tools").issues();

    match issues.issue(404).get_issue().await {
        Err(ApiError::NotFound(path)) => assert_eq!(path, "/repositories/jdoe/tools/issues/404"),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(matches!(
        issues.issue(401).get_issue().await,
        Err(ApiError::AuthRequired)
    ));
    assert!(matches!(
        issues.issue(429).get_issue().await,
        Err(ApiError::RateLimited)
    ));
    match issues.issue(500).get_issue().await {
        Err(ApiError::ServerError(msg)) => assert_eq!(msg, "Something broke"),
        other => panic!("expected ServerError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/jdoe/tools/issues/7")
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = client(&server);
    let result = client.repository("jdoe", "tools").issues().issue(7).get_issue().await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_truncated_success_body_is_network_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"local_id\"",
            )
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = BitbucketClient::with_base_url(&format!("http://{}", addr)).unwrap();
    let result = client.repository("jdoe", "tools").issues().issue(7).get_issue().await;
    assert!(matches!(result, Err(ApiError::Network(_))), "got {:?}", result);
}
