// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contact Keeper headless client
//!
//! Signs in, mounts the contact list and logs its counters on every
//! snapshot until interrupted.

use contact_keeper::{
    config::Config,
    db::FirestoreDb,
    screens::LoginScreen,
    services::{AuthClient, StorageClient},
    session::ClientContext,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(project = %config.project_id, "Starting Contact Keeper");

    let email = std::env::var("CONTACTS_EMAIL").map_err(|_| "CONTACTS_EMAIL not set")?;
    let password = std::env::var("CONTACTS_PASSWORD").map_err(|_| "CONTACTS_PASSWORD not set")?;

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.project_id, config.sync_poll_interval)
        .await
        .expect("Failed to connect to Firestore");

    let identity = Arc::new(AuthClient::new(&config));
    let storage = Arc::new(StorageClient::new(&config));
    let state = AppState::new(config, db, identity, storage);

    // Sign in through the login form so the same validation applies
    let mut ctx = ClientContext::anonymous();
    let mut login = LoginScreen::new();
    login.form.edit(|draft| {
        draft.email = email;
        draft.password = password;
    });
    if let Err(e) = login.submit(state.identity.as_ref(), &mut ctx).await {
        tracing::error!(error = %e, "Sign in failed");
        return Err(e.user_message().into());
    }

    let mut home = state.contacts_screen(&ctx)?;
    tracing::info!(view = home.view_id(), "Watching contacts");

    loop {
        let pushed = tokio::select! {
            _ = tokio::signal::ctrl_c() => None,
            pushed = home.changed() => Some(pushed.map(|_| ())),
        };
        match pushed {
            None => {
                tracing::info!("Interrupted");
                break;
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, "Contact subscription ended");
                break;
            }
            Some(Ok(())) => {
                let stats = home.stats();
                tracing::info!(
                    total = stats.total,
                    favorites = stats.favorites,
                    online = stats.online,
                    "Contacts updated"
                );
            }
        }
    }

    home.unmount();
    state.sign_out(&mut ctx);
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contact_keeper=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
