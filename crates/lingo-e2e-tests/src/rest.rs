use anyhow::{Result, bail};
use lingo_dal::{Page, course::Course, language::Language, subject::Subject, translation::Translation};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::info;

async fn post_created<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: Url,
    payload: &Value,
) -> Result<T> {
    let response = client.post(url).json(payload).send().await?;
    info!("Response: {:#?}", response);
    if response.status().as_u16() != 201 {
        bail!(
            "Expected 201, got {}: {}",
            response.status(),
            response.text().await?
        );
    }
    Ok(response.json().await?)
}

pub async fn create_language(
    client: &reqwest::Client,
    base_url: &Url,
    name: &str,
    code: &str,
) -> Result<Language> {
    let api_url = base_url.join("languages/create")?;
    post_created(client, api_url, &json!({"name": name, "code": code})).await
}

pub async fn create_translation(
    client: &reqwest::Client,
    base_url: &Url,
    word: &str,
    translations: &[(&str, &str)],
) -> Result<Translation> {
    let texts: serde_json::Map<String, Value> = translations
        .iter()
        .map(|(code, text)| (code.to_string(), Value::from(*text)))
        .collect();
    let api_url = base_url.join("translate/create")?;
    post_created(
        client,
        api_url,
        &json!({"word": word, "translations": texts}),
    )
    .await
}

pub async fn create_subject(client: &reqwest::Client, base_url: &Url, name: &str) -> Result<Subject> {
    let api_url = base_url.join("subjects/create")?;
    post_created(client, api_url, &json!({"name": name})).await
}

pub async fn create_course(
    client: &reqwest::Client,
    base_url: &Url,
    name: &str,
    subject: i64,
) -> Result<Course> {
    let api_url = base_url.join("courses/create")?;
    post_created(client, api_url, &json!({"name": name, "subject": subject})).await
}

pub async fn get_page<T: DeserializeOwned>(
    client: &reqwest::Client,
    base_url: &Url,
    path: &str,
    query: &str,
) -> Result<Page<T>> {
    let mut url = base_url.join(path)?;
    if !query.is_empty() {
        url.set_query(Some(query));
    }
    let response = client.get(url).send().await?;
    info!("Response: {:#?}", response);
    if !response.status().is_success() {
        bail!("List failed with {}: {}", response.status(), response.text().await?);
    }
    Ok(response.json().await?)
}

/// Message from the standard error body
pub async fn error_message(response: reqwest::Response) -> Result<String> {
    let body: Value = response.json().await?;
    match body.get("message").and_then(Value::as_str) {
        Some(message) => Ok(message.to_string()),
        None => bail!("No message in error body {body}"),
    }
}
