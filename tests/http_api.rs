//! HTTP API integration tests.
//!
//! Tests for the diagnostic endpoints (health check, game list).

mod fixtures;
use fixtures::{TestServer, recv_event};

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["activeGames"], 0);
    assert_eq!(body["activePlayers"], 0);
    assert!(body["timestamp"].is_i64());
}

#[tokio::test]
async fn test_health_endpoint_counts_live_records() {
    // テスト項目: /api/health がルームとセッションの件数を報告する
    // given (前提条件): ルームを1つ作成した接続
    let server = TestServer::start().await;
    let mut ws = server.connect(None).await;
    recv_event(&mut ws).await; // roomId

    // when (操作):
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["activeGames"], 1);
    assert_eq!(body["activePlayers"], 1);
}

#[tokio::test]
async fn test_games_endpoint_empty() {
    // テスト項目: /api/games エンドポイントが空の一覧を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/games", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["totalGames"], 0);
    assert!(body["games"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_games_endpoint_lists_rooms() {
    // テスト項目: /api/games エンドポイントがルーム一覧を返す
    // given (前提条件): 2人の参加者がいるルーム
    let server = TestServer::start().await;
    let mut first = server.connect(None).await;
    let room_id = recv_event(&mut first).await["roomId"]
        .as_str()
        .unwrap()
        .to_string();
    let mut second = server.connect(Some(&room_id)).await;
    recv_event(&mut second).await; // roomId

    // when (操作):
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/api/games", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["totalGames"], 1);

    // ルームの構造を確認
    let game = &body["games"][0];
    assert_eq!(game["roomId"], room_id.as_str());
    assert!(game["firstConnectionId"].is_string());
    assert!(game["secondConnectionId"].is_string());
    assert_eq!(game["secondConnected"], true);
    assert!(game["createdAt"].is_i64());
    assert!(game["lastActivityAt"].is_i64());
}
