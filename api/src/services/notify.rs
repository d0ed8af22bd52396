//! Push notification dispatch.
//!
//! Notifications are fire-and-forget: dispatch runs on a spawned task,
//! failures are logged and never reach the caller of the triggering write.
//! When no endpoint is configured the dispatch is a no-op.

use once_cell::sync::Lazy;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::{Value, json};
use tracing::{debug, warn};

use db::models::user::{Entity as UserEntity, Model as UserModel};
use util::config;

static CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Sends a notification to every user with a registered FCM token.
pub fn notify_all_in_background(db: DatabaseConnection, title: String, body: String, data: Value) {
    tokio::spawn(async move {
        let endpoint = config::fcm_endpoint();
        if endpoint.is_empty() {
            debug!("FCM endpoint not configured; skipping push notification");
            return;
        }

        let tokens = match UserModel::all_fcm_tokens(&db).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "failed to collect FCM tokens");
                return;
            }
        };

        for token in tokens {
            send_to_token(&endpoint, &token, &title, &body, &data).await;
        }
    });
}

/// Sends a notification to one user, if they have a registered token.
pub fn notify_user_in_background(
    db: DatabaseConnection,
    user_id: i64,
    title: String,
    body: String,
    data: Value,
) {
    tokio::spawn(async move {
        let endpoint = config::fcm_endpoint();
        if endpoint.is_empty() {
            debug!("FCM endpoint not configured; skipping push notification");
            return;
        }

        let token = match UserEntity::find_by_id(user_id).one(&db).await {
            Ok(Some(user)) => user.fcm_token,
            Ok(None) => {
                warn!(user_id, "cannot notify unknown user");
                return;
            }
            Err(e) => {
                warn!(user_id, error = %e, "failed to look up user for notification");
                return;
            }
        };

        match token {
            Some(token) => send_to_token(&endpoint, &token, &title, &body, &data).await,
            None => debug!(user_id, "user has no FCM token; skipping notification"),
        }
    });
}

async fn send_to_token(endpoint: &str, token: &str, title: &str, body: &str, data: &Value) {
    let payload = json!({
        "to": token,
        "notification": { "title": title, "body": body },
        "data": data,
    });

    match CLIENT.post(endpoint).json(&payload).send().await {
        Ok(resp) if !resp.status().is_success() => {
            warn!(status = %resp.status(), "push notification rejected");
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "push notification failed"),
    }
}
