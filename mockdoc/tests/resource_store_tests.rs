// Integration tests for typed resource stores
use mockdoc::{bson::doc, memory::InMemoryCollection, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Book {
    id: i64,
    title: String,
    author: String,
    #[serde(flatten)]
    extra: mockdoc::bson::Document,
}

impl Resource for Book {
    fn id(&self) -> i64 {
        self.id
    }

    fn collection_name() -> &'static str {
        "books"
    }
}

fn book(id: i64, title: &str, author: &str) -> Book {
    Book { id, title: title.into(), author: author.into(), extra: Default::default() }
}

async fn seeded_store() -> ResourceStore<Book, InMemoryCollection> {
    ResourceStore::in_memory(vec![
        book(1, "The Fellowship of the Ring", "J.R.R. Tolkien"),
        book(2, "Harry Potter and the Philosopher's Stone", "J.K. Rowling"),
        book(3, "The Two Towers", "J.R.R. Tolkien"),
        book(4, "Harry Potter and the Chamber of Secrets", "J.K. Rowling"),
        book(5, "The Return of the King", "J.R.R. Tolkien"),
    ])
    .await
    .unwrap()
}

#[tokio::test]
async fn test_insert_assigns_next_identity() {
    let books = seeded_store().await;

    let inserted = books.insert_one(&json!({ "title": "X", "author": "Y" })).await.unwrap();
    assert_eq!(inserted.inserted_id, 6);
    assert_eq!(inserted.inserted_document, book(6, "X", "Y"));

    assert_eq!(books.find_one(6).await.unwrap(), Some(book(6, "X", "Y")));

    let deleted = books.delete_one(6).await.unwrap();
    assert_eq!(deleted.deleted_count, 1);
    assert_eq!(books.find().await.unwrap().len(), 5);
    assert!(books.find_one(6).await.unwrap().is_none());
}

#[tokio::test]
async fn test_insert_into_empty_store_starts_at_one() {
    let books = ResourceStore::<Book, InMemoryCollection>::in_memory(vec![]).await.unwrap();

    let first = books.insert_one(&json!({ "title": "A", "author": "B" })).await.unwrap();
    let second = books.insert_one(&json!({ "title": "C", "author": "D" })).await.unwrap();

    assert_eq!((first.inserted_id, second.inserted_id), (1, 2));
}

#[tokio::test]
async fn test_extra_fields_are_kept() {
    let books = seeded_store().await;

    let inserted = books
        .insert_one(&json!({ "title": "Dune", "author": "Frank Herbert", "year": 1965 }))
        .await
        .unwrap();

    let stored = books.find_one(inserted.inserted_id).await.unwrap().unwrap();
    assert!(stored.extra.contains_key("year"));
}

#[tokio::test]
async fn test_update_by_identity() {
    let books = seeded_store().await;

    let updated = books.update_one(1, &json!({ "title": "New", "id": 77 })).await.unwrap();
    assert_eq!(updated.modified_count, 1);

    assert_eq!(books.find_one(1).await.unwrap(), Some(book(1, "New", "J.R.R. Tolkien")));
    assert!(books.find_one(77).await.unwrap().is_none());

    let missing = books.update_one(99, &json!({ "title": "Nope" })).await.unwrap();
    assert_eq!(missing.modified_count, 0);
}

#[tokio::test]
async fn test_find_one_where_uses_shape() {
    let books = seeded_store().await;

    let found = books
        .find_one_where(&Query::builder().eq("author", "J.K. Rowling").build())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, 2);
}

#[tokio::test]
async fn test_seeded_wraps_existing_backend() {
    let backend = InMemoryCollection::new("books");
    let books = ResourceStore::seeded(backend.clone(), vec![book(3, "T", "A")]).await.unwrap();

    assert_eq!(books.count().await.unwrap(), 1);
    assert_eq!(
        backend.find_one(&Query::by_id(3)).await.unwrap(),
        Some(doc! { "id": 3_i64, "title": "T", "author": "A" })
    );

    let duplicate = ResourceStore::seeded(backend, vec![book(3, "T", "A")]).await;
    assert!(matches!(duplicate, Err(DocumentStoreError::DocumentAlreadyExists(3, _))));
}

#[tokio::test]
async fn test_non_map_partial_is_rejected() {
    let books = seeded_store().await;

    let result = books.insert_one(&json!(["not", "a", "document"])).await;
    assert!(matches!(result, Err(DocumentStoreError::InvalidDocument(_))));
    assert_eq!(books.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_insert_that_does_not_fit_stores_nothing() {
    let books = seeded_store().await;

    let result = books.insert_one(&json!({ "title": "No Author" })).await;
    assert!(matches!(result, Err(DocumentStoreError::InvalidDocument(_))));

    assert_eq!(books.backend().count().await.unwrap(), 5);
    assert_eq!(books.find().await.unwrap().len(), 5);

    let next = books.insert_one(&json!({ "title": "X", "author": "Y" })).await.unwrap();
    assert_eq!(next.inserted_id, 6);
}

#[tokio::test]
async fn test_patch_that_does_not_fit_is_rejected() {
    let books = seeded_store().await;

    let result = books.update_one(1, &json!({ "title": 5 })).await;
    assert!(matches!(result, Err(DocumentStoreError::InvalidDocument(_))));

    assert_eq!(books.find_one(1).await.unwrap(), Some(book(1, "The Fellowship of the Ring", "J.R.R. Tolkien")));
    assert_eq!(books.find().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_large_identities_address_the_right_resource() {
    let books = ResourceStore::<Book, InMemoryCollection>::in_memory(vec![]).await.unwrap();
    let low = 9_007_199_254_740_992_i64;

    books.insert_one(&json!({ "id": low, "title": "first", "author": "A" })).await.unwrap();
    books.insert_one(&json!({ "id": low + 1, "title": "second", "author": "B" })).await.unwrap();

    assert_eq!(books.find_one(low + 1).await.unwrap().unwrap().title, "second");

    let deleted = books.delete_one(low + 1).await.unwrap();
    assert_eq!(deleted.deleted_count, 1);

    let remaining: Vec<i64> = books.find().await.unwrap().iter().map(|b| b.id).collect();
    assert_eq!(remaining, vec![low]);
}

#[tokio::test]
async fn test_no_identity_after_the_largest() {
    let books = ResourceStore::<Book, InMemoryCollection>::in_memory(vec![book(i64::MAX, "Last", "Z")])
        .await
        .unwrap();

    let result = books.insert_one(&json!({ "title": "Next", "author": "Z" })).await;
    assert!(matches!(result, Err(DocumentStoreError::InvalidDocument(_))));
    assert_eq!(books.count().await.unwrap(), 1);
}
