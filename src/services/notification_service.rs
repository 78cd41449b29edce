use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::database::UserStore;
use crate::models::UserRecord;
use crate::services::sendgrid_service::{EmailSender, OutboundEmail, SendError};

/// Fixed sender address for every message this service dispatches.
const FROM_ADDRESS: &str = "no-reply@arboria.app";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Success,
    Failed,
}

/// Result of one attempted send to one recipient. Never mutated after the
/// attempt settles.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct DispatchOutcome {
    pub email: String,
    pub status: DispatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Terminal states of one bulk dispatch run.
#[derive(Debug)]
pub enum BulkDispatch {
    /// The users collection held no documents at all.
    NoDocuments,
    /// Documents exist, but none carried a usable name/email pair.
    NoValidEmails,
    /// One outcome per eligible recipient, in eligible-record order.
    Completed(Vec<DispatchOutcome>),
}

fn welcome_message(user: &UserRecord) -> OutboundEmail {
    OutboundEmail {
        to: user.email.clone(),
        from: FROM_ADDRESS.to_string(),
        subject: format!("Hello, {}!", user.name),
        text: format!("Hi {}, we're excited to have you here!", user.name),
        html: format!(
            "<strong>Hi {}, we're excited to have you here!</strong>",
            user.name
        ),
    }
}

fn signup_message(email: &str, name: &str, tree_id: Option<&str>) -> OutboundEmail {
    let tree_id = tree_id.unwrap_or("None");

    OutboundEmail {
        to: email.to_string(),
        from: FROM_ADDRESS.to_string(),
        subject: format!("Hello, {}!", name),
        text: format!(
            "Hi {}, we're excited to have you here! Hope you are fine! Here is your ID to access your tree: {}",
            name, tree_id
        ),
        html: format!(
            "<strong>Hi {}, we're excited to have you here! Hope you are fine! Here is your ID to access your tree: {}</strong>",
            name, tree_id
        ),
    }
}

/// Fetch every user document, keep the eligible records and send one
/// greeting per recipient.
///
/// Sends are launched concurrently and joined once all of them settle. A
/// failed send is recorded in its outcome and never aborts the batch.
pub async fn dispatch_bulk(
    store: &dyn UserStore,
    mailer: &dyn EmailSender,
) -> Result<BulkDispatch, String> {
    let documents = store.fetch_all().await?;

    if documents.is_empty() {
        return Ok(BulkDispatch::NoDocuments);
    }

    let eligible: Vec<UserRecord> = documents
        .iter()
        .filter_map(|document| document.eligible_record())
        .collect();

    if eligible.is_empty() {
        return Ok(BulkDispatch::NoValidEmails);
    }

    log::info!("📧 Sending greeting email to {} recipients", eligible.len());

    let sends = eligible.iter().map(|user| {
        let message = welcome_message(user);
        async move {
            match mailer.send(&message).await {
                Ok(()) => DispatchOutcome {
                    email: user.email.clone(),
                    status: DispatchStatus::Success,
                    error: None,
                },
                Err(e) => {
                    log::error!("❌ Error sending email to {}: {}", user.email, e);
                    DispatchOutcome {
                        email: user.email.clone(),
                        status: DispatchStatus::Failed,
                        error: Some(e.to_string()),
                    }
                }
            }
        }
    });

    let results = join_all(sends).await;

    Ok(BulkDispatch::Completed(results))
}

/// Send the signup email carrying the tree access id. Exactly one send, no
/// retries; the caller decides how to report a failure.
pub async fn send_signup_email(
    mailer: &dyn EmailSender,
    email: &str,
    name: &str,
    tree_id: Option<&str>,
) -> Result<(), SendError> {
    let message = signup_message(email, name, tree_id);
    mailer.send(&message).await
}
