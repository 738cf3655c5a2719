// Route-level tests for the books and users API
use in_n_out_books::{
    app::App,
    config::{AppConfig, AuthConfig},
    error::Reply,
    logging::init_logging_default,
};
use serde_json::{Value, json};

fn test_config(jwt_secret: Option<&str>) -> AppConfig {
    AppConfig {
        auth: AuthConfig {
            jwt_secret: jwt_secret.map(str::to_string),
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            ..AuthConfig::default()
        },
        seed: true,
    }
}

async fn test_app() -> App {
    init_logging_default();
    App::new(test_config(None)).await.unwrap()
}

fn body(reply: &Reply) -> &Value {
    reply.body.as_ref().expect("reply has a body")
}

#[tokio::test]
async fn test_welcome() {
    let app = test_app().await;
    let reply = app.welcome();
    assert_eq!(reply.status, 200);
    assert_eq!(reply.message_text(), Some("Welcome to the In-N-Out Books API"));
}

#[tokio::test]
async fn test_list_and_get_seeded_books() {
    let app = test_app().await;

    let reply = Reply::from_result(app.books.list().await);
    assert_eq!(reply.status, 200);
    assert_eq!(body(&reply).as_array().unwrap().len(), 5);

    let reply = Reply::from_result(app.books.get("3").await);
    assert_eq!(reply.status, 200);
    assert_eq!(body(&reply), &json!({ "id": 3, "title": "The Two Towers", "author": "J.R.R. Tolkien" }));

    let reply = Reply::from_result(app.books.get("42").await);
    assert_eq!(reply.status, 404);
    assert_eq!(reply.message_text(), Some("Book not found"));
}

#[tokio::test]
async fn test_add_book_returns_201_with_id() {
    let app = test_app().await;

    let reply = Reply::from_result(app.books.add(&json!({ "title": "Test Book", "author": "John Doe" })).await);
    assert_eq!(reply.status, 201);
    assert_eq!(body(&reply), &json!({ "id": 6, "title": "Test Book", "author": "John Doe" }));
}

#[tokio::test]
async fn test_add_book_requires_title_and_author() {
    let app = test_app().await;

    for invalid in [json!({ "author": "Jane Doe" }), json!({ "title": "Only Title" }), json!({ "title": "", "author": "A" })] {
        let reply = Reply::from_result(app.books.add(&invalid).await);
        assert_eq!(reply.status, 400);
        assert_eq!(reply.message_text(), Some("Book title and author are required"));
    }

    let reply = Reply::from_result(app.books.list().await);
    assert_eq!(body(&reply).as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_update_book() {
    let app = test_app().await;
    let added = Reply::from_result(app.books.add(&json!({ "title": "Test Book", "author": "Test Author" })).await);
    let id = body(&added)["id"].as_i64().unwrap().to_string();

    let reply = Reply::from_result(
        app.books
            .update(&id, &json!({ "title": "Updated Book Title", "author": "Updated Author" }))
            .await,
    );
    assert_eq!(reply.status, 200);
    assert_eq!(body(&reply)["title"], "Updated Book Title");
    assert_eq!(body(&reply)["author"], "Updated Author");

    let reply = Reply::from_result(app.books.update(&id, &json!({ "title": "Title Only" })).await);
    assert_eq!(reply.status, 200);
    assert_eq!(body(&reply)["author"], "Updated Author");
}

#[tokio::test]
async fn test_update_book_errors() {
    let app = test_app().await;

    let reply = Reply::from_result(app.books.update("foo", &json!({ "title": "Some Book", "author": "Author Name" })).await);
    assert_eq!(reply.status, 400);
    assert_eq!(reply.message_text(), Some("Invalid book ID provided"));

    let reply = Reply::from_result(app.books.update("1", &json!({ "author": "Author Name" })).await);
    assert_eq!(reply.status, 400);
    assert_eq!(reply.message_text(), Some("Book title is required"));

    let reply = Reply::from_result(app.books.update("99", &json!({ "title": "Ghost" })).await);
    assert_eq!(reply.status, 404);
}

#[tokio::test]
async fn test_delete_book() {
    let app = test_app().await;

    let reply = Reply::from_result(app.books.delete("2").await);
    assert_eq!(reply, Reply::no_content());

    let reply = Reply::from_result(app.books.delete("2").await);
    assert_eq!(reply.status, 404);
    assert_eq!(reply.message_text(), Some("Book with ID 2 not found"));

    let reply = Reply::from_result(app.books.delete("two").await);
    assert_eq!(reply.status, 400);

    let added = Reply::from_result(app.books.add(&json!({ "title": "X", "author": "Y" })).await);
    assert_eq!(body(&added)["id"], 6);
}

#[tokio::test]
async fn test_login() {
    let app = test_app().await;

    let reply = Reply::from_result(app.auth.login(&json!({ "email": "harry@hogwarts.edu", "password": "potter" })).await);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.message_text(), Some("Authentication successful"));
    assert!(body(&reply).get("token").is_none());

    let reply = Reply::from_result(app.auth.login(&json!({ "email": "harry@hogwarts.edu", "password": "wrongpassword" })).await);
    assert_eq!(reply.status, 401);
    assert_eq!(reply.message_text(), Some("Unauthorized"));

    let reply = Reply::from_result(app.auth.login(&json!({ "email": "nobody@hogwarts.edu", "password": "potter" })).await);
    assert_eq!(reply.status, 401);

    let reply = Reply::from_result(app.auth.login(&json!({ "email": "harry@hogwarts.edu" })).await);
    assert_eq!(reply.status, 400);
    assert_eq!(reply.message_text(), Some("Bad Request"));
}

#[tokio::test]
async fn test_login_issues_token_when_configured() {
    let app = App::new(test_config(Some("test-secret"))).await.unwrap();

    let reply = Reply::from_result(app.auth.login(&json!({ "email": "hermione@hogwarts.edu", "password": "granger" })).await);
    assert_eq!(reply.status, 200);

    let token = body(&reply)["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn test_verify_security_questions() {
    let app = test_app().await;
    let email = "harry@hogwarts.edu";

    let correct = json!([{ "answer": "Hedwig" }, { "answer": "Quidditch Through the Ages" }, { "answer": "Evans" }]);
    let reply = Reply::from_result(app.auth.verify_security_questions(email, &correct).await);
    assert_eq!(reply.status, 200);
    assert_eq!(reply.message_text(), Some("Security questions successfully answered"));

    let wrong = json!([{ "answer": "Hedwig" }, { "answer": "Quidditch Through the Ages" }, { "answer": "Dursley" }]);
    let reply = Reply::from_result(app.auth.verify_security_questions(email, &wrong).await);
    assert_eq!(reply.status, 401);

    let reply = Reply::from_result(app.auth.verify_security_questions("nobody@hogwarts.edu", &correct).await);
    assert_eq!(reply.status, 401);
}

#[tokio::test]
async fn test_security_answers_must_have_exact_shape() {
    let app = test_app().await;
    let email = "ron@hogwarts.edu";

    let invalid = [
        json!([{ "answer": "Scabbers" }, { "answer": "Chudley Cannons Annual" }]),
        json!([{ "answer": "Scabbers" }, { "answer": "x" }, { "answer": "y" }, { "answer": "z" }]),
        json!([{ "answer": "Scabbers" }, { "answer": 7 }, { "answer": "Prewett" }]),
        json!([{ "answer": "Scabbers", "hint": "rat" }, { "answer": "x" }, { "answer": "y" }]),
        json!({ "answer": "Scabbers" }),
    ];

    for body in invalid {
        let reply = Reply::from_result(app.auth.verify_security_questions(email, &body).await);
        assert_eq!(reply.status, 400);
        assert_eq!(reply.message_text(), Some("Invalid security question answers"));
    }
}

#[tokio::test]
async fn test_unseeded_app_starts_empty() {
    let app = App::new(AppConfig { seed: false, ..test_config(None) }).await.unwrap();

    let reply = Reply::from_result(app.books.list().await);
    assert_eq!(body(&reply), &json!([]));

    let added = Reply::from_result(app.books.add(&json!({ "title": "First", "author": "A" })).await);
    assert_eq!(body(&added)["id"], 1);

    let reply = Reply::from_result(app.auth.login(&json!({ "email": "harry@hogwarts.edu", "password": "potter" })).await);
    assert_eq!(reply.status, 401);
}
