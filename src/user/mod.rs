//! Synthetic user records and their mapping to index documents.

pub mod factory;
pub mod identity;

pub use self::factory::{DateWindow, FactoryConfig, RecordFactory, age_on};
pub use self::identity::{Identity, IdentityGenerator, RandomIdentityGenerator};

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::document::{Document, JsonDocumentConverter};
use crate::error::{Result, UserSearchError};

/// Gender of a synthetic user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// All genders, in declaration order.
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = UserSearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(UserSearchError::invalid_argument(format!(
                "unknown gender '{other}' (expected 'male' or 'female')"
            ))),
        }
    }
}

/// A synthetic user as it is indexed and searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub gender: Gender,
    #[serde(rename = "birthdate")]
    pub birth_date: NaiveDate,
    /// Full years elapsed since `birth_date` at generation time.
    pub age: u32,
    pub created_at: NaiveDate,
    pub last_online_at: NaiveDate,
}

/// Anything that can be staged into an index batch.
pub trait Indexable {
    /// Unique document id.
    fn doc_id(&self) -> String;

    /// The document stored under [`Indexable::doc_id`].
    fn to_document(&self) -> Result<Document>;
}

impl Indexable for UserRecord {
    fn doc_id(&self) -> String {
        self.id.to_string()
    }

    fn to_document(&self) -> Result<Document> {
        JsonDocumentConverter::new().convert_serialize(self)
    }
}
