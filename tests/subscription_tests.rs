// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Subscription lifetime: one per view and collection, caller-owned teardown.

use contact_keeper::config::Config;
use contact_keeper::db::{DocumentStore, MemoryStore};
use contact_keeper::error::AppError;
use contact_keeper::forms::ContactDraft;
use contact_keeper::models::{Contact, SocialLink};
use contact_keeper::session::ClientContext;
use contact_keeper::sync::{SubscriptionRegistry, ViewScope};
use contact_keeper::AppState;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{signed_in, test_app, within, FakeIdentity, FakeStorage, GatedStore};

fn contact(id: &str, owner: &str) -> Contact {
    Contact {
        id: id.to_string(),
        owner_id: owner.to_string(),
        name: format!("Contact {}", id),
        phone: "555".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_second_subscription_replaces_first() {
    let store = MemoryStore::new();
    let registry = SubscriptionRegistry::new();
    let ctx = signed_in("alice");
    let scope = ViewScope::mount(&registry);

    let mut first = scope.subscribe::<_, Contact>(&store, &ctx).unwrap();
    let second = scope.subscribe::<_, Contact>(&store, &ctx).unwrap();

    assert!(!first.is_active());
    assert!(second.is_active());
    assert_eq!(registry.active_for(scope.id()), 1);

    // The replaced pump stops; its receiver sees the channel close
    within(async {
        while first.changed().await.is_ok() {}
    })
    .await;

    // Dropping the stale handle must not free the new slot
    drop(first);
    assert_eq!(registry.active_for(scope.id()), 1);
}

#[tokio::test]
async fn test_different_collections_coexist_in_one_view() {
    let store = MemoryStore::new();
    let registry = SubscriptionRegistry::new();
    let ctx = signed_in("alice");
    let scope = ViewScope::mount(&registry);

    let contacts = scope.subscribe::<_, Contact>(&store, &ctx).unwrap();
    let links = scope.subscribe::<_, SocialLink>(&store, &ctx).unwrap();

    assert!(contacts.is_active() && links.is_active());
    assert_eq!(registry.active_for(scope.id()), 2);
}

#[tokio::test]
async fn test_unmount_and_drop_release_slots() {
    let app = test_app();
    let ctx = signed_in("alice");

    let home = app.state.contacts_screen(&ctx).unwrap();
    assert_eq!(app.state.subscriptions.active_for(home.view_id()), 1);
    home.unmount();
    assert_eq!(app.state.subscriptions.active_count(), 0);

    let scope = ViewScope::mount(&app.state.subscriptions);
    let sub = scope
        .subscribe::<_, Contact>(&app.state.store, &ctx)
        .unwrap();
    assert_eq!(app.state.subscriptions.active_count(), 1);
    sub.unsubscribe();
    assert_eq!(app.state.subscriptions.active_count(), 0);
    assert!(scope.is_active());
}

#[tokio::test]
async fn test_torn_down_view_cannot_subscribe() {
    let store = MemoryStore::new();
    let registry = SubscriptionRegistry::new();
    let ctx = signed_in("alice");
    let scope = ViewScope::mount(&registry);

    registry.close_all();

    assert!(!scope.is_active());
    assert!(scope.subscribe::<_, Contact>(&store, &ctx).is_err());
    assert_eq!(registry.active_count(), 0);
}

#[tokio::test]
async fn test_subscribe_requires_session() {
    let store = MemoryStore::new();
    let registry = SubscriptionRegistry::new();
    let scope = ViewScope::mount(&registry);

    let err = scope
        .subscribe::<_, Contact>(&store, &ClientContext::anonymous())
        .err()
        .unwrap();
    assert!(matches!(err, AppError::Unauthenticated));
    assert_eq!(registry.active_count(), 0);
}

#[tokio::test]
async fn test_save_after_teardown_is_discarded() {
    let app = test_app();
    let ctx = signed_in("alice");
    let mut home = app.state.contacts_screen(&ctx).unwrap();
    home.form.edit(|d| {
        *d = ContactDraft {
            name: "Jane".to_string(),
            phone: "555".to_string(),
            ..Default::default()
        }
    });

    // The view is torn down while the write is still outstanding
    app.state.subscriptions.close_all();
    let outcome = home.save(&ctx).await;

    assert!(outcome.is_none());
    // The write itself was not cancelled
    assert_eq!(app.state.store.write_calls(), 1);
}

#[tokio::test]
async fn test_response_arriving_after_teardown_is_discarded() {
    let store = GatedStore::default();
    let state = AppState::new(
        Config::default(),
        store.clone(),
        Arc::new(FakeIdentity::default()),
        Arc::new(FakeStorage::default()),
    );
    let ctx = signed_in("alice");
    let mut home = state.contacts_screen(&ctx).unwrap();
    home.form.edit(|d| {
        d.name = "Jane".to_string();
        d.phone = "555".to_string();
    });

    // Issue the write while mounted, then unmount before it completes
    let (outcome, ()) = within(async {
        tokio::join!(home.save(&ctx), async {
            store.write_pending().await;
            state.subscriptions.close_all();
            store.release();
        })
    })
    .await;

    assert!(outcome.is_none());
    assert_eq!(store.inner.write_calls(), 1);
    let stored: Vec<Contact> = store.inner.list("alice").await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_only_visible_changes_are_pushed() {
    let store = MemoryStore::new();
    let registry = SubscriptionRegistry::new();
    let ctx = signed_in("alice");
    let scope = ViewScope::mount(&registry);
    let mut sub = scope.subscribe::<_, Contact>(&store, &ctx).unwrap();

    let initial = within(sub.wait_for(|_| true)).await.unwrap();
    assert!(initial.is_empty());

    // Another user's write does not change alice's collection
    store.set(&contact("b1", "bob")).await.unwrap();
    let pushed = tokio::time::timeout(Duration::from_millis(200), sub.changed()).await;
    assert!(pushed.is_err(), "no snapshot expected for another user's write");

    store.set(&contact("a1", "alice")).await.unwrap();
    let snapshot = within(sub.changed()).await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, "a1");
    assert_eq!(sub.current(), snapshot);
}

#[tokio::test]
async fn test_snapshot_is_full_collection() {
    let store = MemoryStore::new();
    let registry = SubscriptionRegistry::new();
    let ctx = signed_in("alice");
    for id in ["a1", "a2"] {
        store.set(&contact(id, "alice")).await.unwrap();
    }

    let scope = ViewScope::mount(&registry);
    let mut sub = scope.subscribe::<_, Contact>(&store, &ctx).unwrap();
    within(sub.wait_for(|c| c.len() == 2)).await.unwrap();

    store.set(&contact("a3", "alice")).await.unwrap();
    let snapshot = within(sub.wait_for(|c| c.len() == 3)).await.unwrap();
    let mut ids: Vec<&str> = snapshot.iter().map(|c| c.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, ["a1", "a2", "a3"]);
}
