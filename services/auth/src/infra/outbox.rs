use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use uuid::Uuid;

use warden_auth_schema::outbox_events;

use crate::domain::repository::NotificationDispatcher;
use crate::domain::types::{EmailMessage, OutboxEvent};
use crate::error::AuthServiceError;

/// Dispatcher that writes emails to the outbox table; an external worker delivers them.
#[derive(Clone)]
pub struct OutboxDispatcher {
    pub db: DatabaseConnection,
}

pub fn outbox_event(recipient: &str, message: &EmailMessage) -> OutboxEvent {
    OutboxEvent {
        id: Uuid::now_v7(),
        kind: message.kind.to_owned(),
        payload: serde_json::json!({
            "to": recipient,
            "locale": message.locale.as_str(),
            "subject": message.subject,
            "data": message.data,
        }),
        idempotency_key: message.idempotency_key.clone(),
    }
}

impl NotificationDispatcher for OutboxDispatcher {
    async fn enqueue(
        &self,
        recipient: &str,
        message: &EmailMessage,
    ) -> Result<(), AuthServiceError> {
        let event = outbox_event(recipient, message);
        let now = Utc::now();
        outbox_events::ActiveModel {
            id: Set(event.id),
            kind: Set(event.kind),
            payload: Set(event.payload),
            idempotency_key: Set(event.idempotency_key),
            attempts: Set(0),
            last_error: Set(None),
            created_at: Set(now),
            next_attempt_at: Set(now),
            processed_at: Set(None),
            failed_at: Set(None),
        }
        .insert(&self.db)
        .await
        .context("insert outbox event")?;
        Ok(())
    }
}
