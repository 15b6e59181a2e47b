use lingo_e2e_tests::{prepare_env, spawn_server};
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_status_and_fallback() {
    let (args, mut guard) = prepare_env("test_status").await.unwrap();
    let base_url = args.base_url.clone();

    spawn_server(args, &mut guard).await.unwrap();

    let client = reqwest::Client::new();

    let url = base_url.join("control/status").unwrap();
    let response = client.get(url).send().await.unwrap();
    info! {"Response: {:#?}", response};
    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "I am running");

    let url = base_url.join("no/such/page").unwrap();
    let response = client.get(url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(response.text().await.unwrap(), "Page not found");
}

#[tokio::test]
#[traced_test]
async fn test_api_docs() {
    let (args, mut guard) = prepare_env("test_api_docs").await.unwrap();
    let base_url = args.base_url.clone();

    spawn_server(args, &mut guard).await.unwrap();

    let url = base_url.join("api-docs/openapi.json").unwrap();
    let response = reqwest::get(url).await.unwrap();
    assert!(response.status().is_success());
    let docs: serde_json::Value = response.json().await.unwrap();
    let paths = docs["paths"].as_object().unwrap();
    assert!(paths.contains_key("/languages/create"));
    assert!(paths.contains_key("/translate/{word}"));
    assert!(paths.contains_key("/courses/{id}"));
}

#[tokio::test]
#[traced_test]
async fn test_login_redirects_to_provider() {
    let (args, mut guard) = prepare_env("test_login").await.unwrap();
    let base_url = args.base_url.clone();

    spawn_server(args, &mut guard).await.unwrap();

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let url = base_url.join("auth/unknown").unwrap();
    let response = client.get(url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
