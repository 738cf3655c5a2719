//! Users resource.

use mockdoc::{bson::Document, document::Resource, memory::InMemoryCollection, ResourceStore};
use serde::{Deserialize, Serialize};

use crate::{auth::Credentials, error::ApiError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityQuestion {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string, never the plain password.
    pub password: String,
    #[serde(default)]
    pub security_questions: Vec<SecurityQuestion>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Resource for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn collection_name() -> &'static str {
        "users"
    }
}

pub type UserStore<B = InMemoryCollection> = ResourceStore<User, B>;

fn questions(pet: &str, book: &str, maiden_name: &str) -> Vec<SecurityQuestion> {
    [
        ("What is your pet's name?", pet),
        ("What is your favorite book?", book),
        ("What is your mother's maiden name?", maiden_name),
    ]
    .into_iter()
    .map(|(question, answer)| SecurityQuestion { question: question.into(), answer: answer.into() })
    .collect()
}

/// The users the API starts with. Passwords are hashed here, so this is slow-ish.
pub fn seed_users(credentials: &Credentials) -> Result<Vec<User>, ApiError> {
    let seed = [
        (1, "harry@hogwarts.edu", "potter", questions("Hedwig", "Quidditch Through the Ages", "Evans")),
        (2, "hermione@hogwarts.edu", "granger", questions("Crookshanks", "Hogwarts: A History", "Wilkins")),
        (3, "ron@hogwarts.edu", "weasley", questions("Scabbers", "Chudley Cannons Annual", "Prewett")),
    ];

    seed.into_iter()
        .map(|(id, email, password, security_questions)| {
            Ok::<_, ApiError>(User {
                id,
                email: email.into(),
                password: credentials.hash_password(password)?,
                security_questions,
                extra: Document::new(),
            })
        })
        .collect()
}
