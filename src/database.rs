//! # Note storage
//!
//! Notes live in a key-value store, one Redis hash per list:
//!
//! - key: `notes:{list_id}`
//! - field: note id (server-assigned UUIDv4)
//! - value: note text, plaintext or opaque ciphertext
//!
//! The store never inspects the text. Hash-field semantics give id
//! uniqueness within a list for free, and HGETALL/HSET/HDEL cover the three
//! operations the app needs. Listing order is whatever the store returns.
//!
//! `MemoryStore` backs the server when no `REDIS_URL` is configured and is
//! what the route tests run against.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use dashmap::DashMap;
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    AsyncCommands, Client,
};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub text: String,
}

#[async_trait]
pub trait NoteStore: Send + Sync + 'static {
    async fn list(&self, list_id: &str) -> Result<Vec<Note>, AppError>;
    async fn create(&self, list_id: &str, text: &str) -> Result<Note, AppError>;
    /// Returns true when a note was actually removed. Deleting an absent id
    /// is not an error.
    async fn delete(&self, list_id: &str, id: &str) -> Result<bool, AppError>;
}

fn list_key(list_id: &str) -> String {
    format!("notes:{list_id}")
}

fn new_note(text: &str) -> Note {
    Note {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
    }
}

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();
    let connection_manager = client
        .get_connection_manager_with_config(config)
        .await
        .unwrap();

    connection_manager
}

pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Self {
        Self {
            connection: init_redis(redis_url).await,
        }
    }
}

#[async_trait]
impl NoteStore for RedisStore {
    async fn list(&self, list_id: &str) -> Result<Vec<Note>, AppError> {
        let mut connection = self.connection.clone();

        let entries: HashMap<String, String> = connection.hgetall(list_key(list_id)).await?;

        Ok(entries
            .into_iter()
            .map(|(id, text)| Note { id, text })
            .collect())
    }

    async fn create(&self, list_id: &str, text: &str) -> Result<Note, AppError> {
        let mut connection = self.connection.clone();

        let note = new_note(text);
        let _: () = connection
            .hset(list_key(list_id), &note.id, &note.text)
            .await?;

        Ok(note)
    }

    async fn delete(&self, list_id: &str, id: &str) -> Result<bool, AppError> {
        let mut connection = self.connection.clone();

        let removed: usize = connection.hdel(list_key(list_id), id).await?;

        Ok(removed > 0)
    }
}

/// In-memory fallback store. Keeps insertion order per list, which the trait
/// does not promise but tests appreciate.
#[derive(Default)]
pub struct MemoryStore {
    lists: DashMap<String, Vec<Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list(&self, list_id: &str) -> Result<Vec<Note>, AppError> {
        Ok(self
            .lists
            .get(list_id)
            .map(|notes| notes.value().clone())
            .unwrap_or_default())
    }

    async fn create(&self, list_id: &str, text: &str) -> Result<Note, AppError> {
        let note = new_note(text);

        self.lists
            .entry(list_id.to_string())
            .or_default()
            .push(note.clone());

        Ok(note)
    }

    async fn delete(&self, list_id: &str, id: &str) -> Result<bool, AppError> {
        match self.lists.get_mut(list_id) {
            Some(mut notes) => {
                let before = notes.len();
                notes.retain(|note| note.id != id);
                Ok(notes.len() < before)
            }
            None => Ok(false),
        }
    }
}
