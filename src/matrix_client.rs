// ABOUTME: Matrix client initialization and authentication
// ABOUTME: Handles client creation with a per-account sqlite store and login via password or token

use anyhow::{Context, Result};
use inder_core::config::MatrixConfig;
use matrix_sdk::{
    authentication::{matrix::MatrixSession, SessionTokens},
    ruma::OwnedUserId,
    AuthSession, Client, SessionMeta,
};

/// Convert a string to a filesystem-safe slug
fn slugify(s: &str) -> String {
    s.trim_start_matches('@')
        .replace(':', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '.' || *c == '-')
        .collect()
}

pub async fn create_client(config: &MatrixConfig) -> Result<Client> {
    // Include both user and device in path for full isolation
    let user_slug = slugify(&config.user_id);
    let device_slug = slugify(&config.device_name);
    let store_path = config
        .store_dir()
        .join(format!("{}_{}", user_slug, device_slug));

    std::fs::create_dir_all(&store_path).with_context(|| {
        format!(
            "Failed to create Matrix store directory: {}",
            store_path.display()
        )
    })?;

    tracing::info!(
        path = %store_path.display(),
        user = %user_slug,
        device = %device_slug,
        "Using Matrix store directory"
    );

    let client = Client::builder()
        .homeserver_url(&config.home_server)
        .sqlite_store(&store_path, None)
        .build()
        .await
        .context("Failed to create Matrix client")?;

    tracing::info!("Matrix client created successfully");

    Ok(client)
}

pub async fn login(client: &Client, config: &MatrixConfig) -> Result<()> {
    if let Some(token) = config.access_token.as_deref() {
        tracing::info!("Logging in with access token");
        let user_id: OwnedUserId = config
            .user_id
            .parse()
            .with_context(|| format!("Invalid Matrix user ID: {}", config.user_id))?;
        let session = AuthSession::Matrix(MatrixSession {
            meta: SessionMeta {
                user_id,
                device_id: config.device_name.clone().into(),
            },
            tokens: SessionTokens {
                access_token: token.to_string(),
                refresh_token: None,
            },
        });
        client
            .restore_session(session)
            .await
            .context("Failed to restore session")?;
    } else if let Some(pwd) = config.password.as_deref() {
        tracing::info!("Logging in with password");
        client
            .matrix_auth()
            .login_username(&config.user_id, pwd)
            .device_id(&config.device_name)
            .initial_device_display_name(&config.device_name)
            .send()
            .await
            .context("Failed to log in")?;
    } else {
        anyhow::bail!("Either MATRIX_PASSWORD or MATRIX_ACCESS_TOKEN is required");
    }

    if let Some(user_id) = client.user_id() {
        tracing::info!(user_id = %user_id, "Logged in successfully");
    } else {
        tracing::warn!("Login succeeded but user_id not available");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_user_and_device() {
        assert_eq!(slugify("@inder:matrix.org"), "inder_matrix.org");
        assert_eq!(slugify("inder bot/1"), "inderbot1");
    }
}
