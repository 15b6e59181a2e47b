use lingo_dal::{
    course::{Course, CourseStatus},
    subject::Subject,
};
use lingo_e2e_tests::{
    extend_url, launch_env, prepare_env,
    rest::{create_course, create_subject, error_message, get_page},
};
use serde_json::json;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_subjects() {
    let (args, mut guard) = prepare_env("test_subjects").await.unwrap();
    let base_url = args.base_url.clone();
    let client = launch_env(args, &mut guard).await.unwrap();

    let languages = create_subject(&client, &base_url, "Languages").await.unwrap();
    let math = create_subject(&client, &base_url, "Math").await.unwrap();
    assert_eq!(languages.description, "");
    assert!(languages.remove_date.is_none());

    let record_url = extend_url(&base_url.join("subjects").unwrap(), math.id);
    let response = client.get(record_url.clone()).send().await.unwrap();
    assert!(response.status().is_success());
    let fetched: Subject = response.json().await.unwrap();
    assert_eq!(fetched, math);

    let response = client
        .put(base_url.join("subjects/update").unwrap())
        .json(&json!({"id": math.id, "description": "Numbers and shapes"}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let updated: Subject = response.json().await.unwrap();
    assert_eq!(updated.name, "Math");
    assert_eq!(updated.description, "Numbers and shapes");

    let response = client
        .delete(base_url.join("subjects/delete").unwrap())
        .json(&json!({"id": math.id}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let removed: Subject = response.json().await.unwrap();
    assert!(removed.remove_date.is_some());

    let response = client.get(record_url).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let page = get_page::<Subject>(&client, &base_url, "subjects", "")
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].id, languages.id);

    let page = get_page::<Subject>(&client, &base_url, "subjects", "filter=removeDate!=null")
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].id, math.id);

    let response = client
        .delete(base_url.join("subjects/delete").unwrap())
        .json(&json!({"id": math.id}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_courses() {
    let (args, mut guard) = prepare_env("test_courses").await.unwrap();
    let base_url = args.base_url.clone();
    let client = launch_env(args, &mut guard).await.unwrap();

    let languages = create_subject(&client, &base_url, "Languages").await.unwrap();
    let math = create_subject(&client, &base_url, "Math").await.unwrap();

    let spanish = create_course(&client, &base_url, "Spanish A1", languages.id)
        .await
        .unwrap();
    assert_eq!(spanish.status, CourseStatus::Active);
    assert_eq!(spanish.subject.name, "Languages");
    create_course(&client, &base_url, "French A1", languages.id)
        .await
        .unwrap();
    let algebra = create_course(&client, &base_url, "Algebra", math.id)
        .await
        .unwrap();

    let response = client
        .post(base_url.join("courses/create").unwrap())
        .json(&json!({"name": "Ghost", "subject": 999}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_message(response).await.unwrap(), "Subject not found");

    let response = client
        .put(base_url.join("courses/update").unwrap())
        .json(&json!({"id": algebra.id, "status": "closed", "subject": languages.id}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let updated: Course = response.json().await.unwrap();
    assert_eq!(updated.status, CourseStatus::Closed);
    assert_eq!(updated.subject.id, languages.id);
    assert_eq!(updated.name, "Algebra");

    let page = get_page::<Course>(
        &client,
        &base_url,
        "courses",
        &format!("filter=subject={}&sort=-name", languages.id),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 3);
    let names: Vec<_> = page.data.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Spanish A1", "French A1", "Algebra"]);

    let response = client
        .delete(base_url.join("courses/delete").unwrap())
        .json(&json!({"id": spanish.id}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let page = get_page::<Course>(&client, &base_url, "courses", "page=1&pageSize=1&sort=name")
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.data[0].name, "Algebra");

    let response = client
        .get(base_url.join("courses/abc").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}
