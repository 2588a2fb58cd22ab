// Tests for reading a Trello list over HTTP.
use chrono::{TimeZone, Utc};
use mockito::{Matcher, Server};
use trellocal_core::Estimate;
use trellocal_trello::{TrelloAuth, TrelloClient, TrelloError, TrelloReader};

const ESTIMATE: &str = "est-field";

fn client(url: &str) -> TrelloClient {
    TrelloClient::new(TrelloAuth {
        api_key: "key123".to_string(),
        token: "tok456".to_string(),
    })
    .with_base_url(url)
}

fn auth_query() -> Vec<Matcher> {
    vec![
        Matcher::UrlEncoded("key".into(), "key123".into()),
        Matcher::UrlEncoded("token".into(), "tok456".into()),
    ]
}

#[tokio::test]
async fn reads_cards_in_list_order() {
    let mut server = Server::new_async().await;

    let mut query = auth_query();
    query.push(Matcher::UrlEncoded("customFieldItems".into(), "true".into()));

    let body = r#"[
        {
            "id": "c1",
            "name": "Write report",
            "due": "2024-01-10T00:00:00.000Z",
            "idBoard": "b1",
            "customFieldItems": [
                { "id": "i1", "idCustomField": "est-field", "idModel": "c1", "value": { "number": "2" } }
            ]
        },
        {
            "id": "c2",
            "name": "Review PR",
            "due": "2024-01-11T00:00:00.000Z",
            "idBoard": "b1",
            "customFieldItems": [
                { "id": "i2", "idCustomField": "est-field", "idModel": "c2", "value": { "number": "1" } }
            ]
        },
        { "id": "c3", "name": "Unsized", "due": null, "idBoard": "b1", "customFieldItems": [] }
    ]"#;

    let mock = server
        .mock("GET", Matcher::Regex(r"^/lists/L1/cards".to_string()))
        .match_query(Matcher::AllOf(query))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let reader = TrelloReader::new(client(&server.url()), "L1", ESTIMATE);
    let tasks = reader.read_tasks().await.unwrap();

    mock.assert_async().await;

    let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Write report", "Review PR", "Unsized"]);
    assert_eq!(tasks[0].estimate, Estimate::from_hours(2));
    assert_eq!(
        tasks[1].due_at,
        Some(Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap())
    );
    assert_eq!(tasks[2].estimate, Estimate::ZERO);
    assert_eq!(tasks[2].due_at, None);
}

#[tokio::test]
async fn empty_list_reads_no_tasks() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/lists/L1/cards".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let reader = TrelloReader::new(client(&server.url()), "L1", ESTIMATE);

    assert!(reader.read_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/lists/L1/cards".to_string()))
        .with_status(401)
        .with_body("invalid key")
        .create_async()
        .await;

    let reader = TrelloReader::new(client(&server.url()), "L1", ESTIMATE);
    let err = reader.read_tasks().await.unwrap_err();

    assert!(matches!(err, TrelloError::Unauthorized(401)));
}

#[tokio::test]
async fn unknown_list_is_an_api_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/lists/nope/cards".to_string()))
        .with_status(400)
        .with_body("invalid id")
        .create_async()
        .await;

    let reader = TrelloReader::new(client(&server.url()), "nope", ESTIMATE);
    let err = reader.read_tasks().await.unwrap_err();

    match err {
        TrelloError::Api { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "invalid id");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_estimate_fails_the_read() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/lists/L1/cards".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{ "id": "c1", "name": "Vague", "customFieldItems": [
                { "idCustomField": "est-field", "value": { "number": "lots" } }
            ] }]"#,
        )
        .create_async()
        .await;

    let reader = TrelloReader::new(client(&server.url()), "L1", ESTIMATE);
    let err = reader.read_tasks().await.unwrap_err();

    assert!(matches!(err, TrelloError::Data(_)));
    assert!(err.to_string().contains("Vague"));
}

#[tokio::test]
async fn estimate_field_must_exist_on_board() {
    let mut server = Server::new_async().await;
    let _list = server
        .mock("GET", Matcher::Regex(r"^/lists/L1(\?|$)".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "id": "L1", "idBoard": "b1" }"#)
        .create_async()
        .await;
    let _fields = server
        .mock("GET", Matcher::Regex(r"^/boards/b1/customFields".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{ "id": "est-field", "name": "Estimate", "type": "number" }]"#)
        .create_async()
        .await;

    let ok = TrelloReader::new(client(&server.url()), "L1", ESTIMATE);
    assert!(ok.verify_estimate_field().await.is_ok());

    let missing = TrelloReader::new(client(&server.url()), "L1", "other-field");
    let err = missing.verify_estimate_field().await.unwrap_err();
    assert!(matches!(err, TrelloError::UnknownCustomField { .. }));
}

#[tokio::test]
async fn card_dates_are_written_back() {
    let mut server = Server::new_async().await;

    let mut query = auth_query();
    query.push(Matcher::UrlEncoded("start".into(), "2024-01-02T09:00:00.000Z".into()));
    query.push(Matcher::UrlEncoded("due".into(), "2024-01-03T10:00:00.000Z".into()));

    let mock = server
        .mock("PUT", Matcher::Regex(r"^/cards/c1".to_string()))
        .match_query(Matcher::AllOf(query))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{ "id": "c1" }"#)
        .create_async()
        .await;

    client(&server.url())
        .update_card_dates(
            "c1",
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    mock.assert_async().await;
}
