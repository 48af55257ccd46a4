//! Unit tests for MessageRepository.
//!
//! Covers save/get by id, creation ordering, counts and the unknown-conversation error.

use std::time::Duration;

use helvia_core::Sender;

use crate::error::StorageError;
use crate::models::MessageRecord;
use crate::repository::MessageStore;
use crate::Storage;

async fn open() -> Storage {
    Storage::open("sqlite::memory:")
        .await
        .expect("Failed to open storage")
}

#[tokio::test]
async fn test_get_message_by_id_existing() {
    let storage = open().await;
    let conv = storage.conversations.create("u1", None).await.unwrap();

    let message = MessageRecord::new(&conv.id, "Hello World", Sender::User);
    storage
        .messages
        .save(&message)
        .await
        .expect("Failed to save message");

    let retrieved = storage
        .messages
        .get_message_by_id(&message.id)
        .await
        .expect("Failed to get message")
        .expect("message should exist");

    assert_eq!(retrieved.id, message.id);
    assert_eq!(retrieved.content, "Hello World");
    assert_eq!(retrieved.sender(), Some(Sender::User));
    assert_eq!(retrieved.conversation_id, conv.id);
}

#[tokio::test]
async fn test_get_message_by_id_not_found() {
    let storage = open().await;
    let retrieved = storage
        .messages
        .get_message_by_id("non-existent-id")
        .await
        .expect("Failed to query");
    assert!(retrieved.is_none());
}

#[tokio::test]
async fn test_messages_listed_in_creation_order() {
    let storage = open().await;
    let conv = storage.conversations.create("u1", None).await.unwrap();

    for i in 0..5 {
        let sender = if i % 2 == 0 { Sender::User } else { Sender::Assistant };
        storage
            .messages
            .append(&conv.id, &format!("Message {}", i), sender)
            .await
            .unwrap();
    }

    let messages = storage.messages.list(&conv.id).await.unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["Message 0", "Message 1", "Message 2", "Message 3", "Message 4"]
    );
    assert_eq!(messages[1].sender(), Some(Sender::Assistant));
    assert_eq!(storage.messages.count_for_conversation(&conv.id).await.unwrap(), 5);
}

#[tokio::test]
async fn test_append_to_unknown_conversation_fails() {
    let storage = open().await;
    let err = storage
        .messages
        .append("missing", "hello", Sender::User)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
    assert_eq!(storage.messages.count_for_conversation("missing").await.unwrap(), 0);
}

#[tokio::test]
async fn test_append_bumps_conversation_updated_at() {
    let storage = open().await;
    let conv = storage.conversations.create("u1", None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    storage
        .messages
        .append(&conv.id, "hi", Sender::User)
        .await
        .unwrap();

    let reloaded = storage.conversations.get(&conv.id).await.unwrap().unwrap();
    assert!(reloaded.updated_at > conv.updated_at);
    assert_eq!(reloaded.created_at, conv.created_at);
}
