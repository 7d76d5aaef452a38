// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contact writes observed through the home screen's subscription.

use contact_keeper::db::{collections, DocumentStore};
use contact_keeper::error::AppError;
use contact_keeper::forms::{ContactDraft, FormState};
use contact_keeper::models::{Contact, ContactPatch, ContactStatus};
use contact_keeper::session::ClientContext;
use contact_keeper::views::Tab;

mod common;
use common::{signed_in, test_app, within};

fn fill(draft: &mut ContactDraft, name: &str, phone: &str) {
    draft.name = name.to_string();
    draft.phone = phone.to_string();
}

#[tokio::test]
async fn test_created_contact_arrives_trimmed_with_avatar() {
    let app = test_app();
    let ctx = signed_in("owner");
    let mut home = app.state.contacts_screen(&ctx).unwrap();
    within(home.wait_for(|contacts| contacts.is_empty()))
        .await
        .unwrap();
    assert!(!home.is_loading());

    home.form.edit(|d| {
        fill(d, "  Jane Doe ", " 555-1234 ");
        d.email = String::new();
    });
    let id = home.save(&ctx).await.unwrap().unwrap();
    assert_eq!(home.form.state(), FormState::Empty);

    let snapshot = within(home.wait_for(|contacts| contacts.iter().any(|c| c.id == id)))
        .await
        .unwrap();
    let jane = snapshot.iter().find(|c| c.id == id).unwrap();
    assert_eq!(jane.name, "Jane Doe");
    assert_eq!(jane.phone, "555-1234");
    assert_eq!(jane.avatar, "JD");
    assert_eq!(jane.status, ContactStatus::Online);
    assert_eq!(jane.owner_id, "owner");

    home.set_query("jane");
    let visible = home.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, id);

    // Stored with the wire field names
    let raw = app
        .state
        .store
        .raw_document(collections::CONTACTS, &id)
        .unwrap();
    assert_eq!(raw["uId"], "owner");
    assert_eq!(raw["isFavorite"], false);
    assert_eq!(raw["status"], "online");
}

#[tokio::test]
async fn test_invalid_contact_never_reaches_store() {
    let app = test_app();
    let ctx = signed_in("owner");
    let mut home = app.state.contacts_screen(&ctx).unwrap();

    home.form.edit(|d| fill(d, "Jane", "   "));
    let err = home.save(&ctx).await.unwrap().unwrap_err();

    assert!(err.is_validation());
    assert_eq!(home.form.alert(), Some("Name and phone number are required!"));
    assert_eq!(home.form.state(), FormState::Editing);
    assert_eq!(app.state.store.write_calls(), 0);
}

#[tokio::test]
async fn test_edit_rederives_avatar() {
    let app = test_app();
    let ctx = signed_in("owner");
    let mut home = app.state.contacts_screen(&ctx).unwrap();

    home.form.edit(|d| fill(d, "Jane Doe", "555-1234"));
    let id = home.save(&ctx).await.unwrap().unwrap();
    let snapshot = within(home.wait_for(|contacts| contacts.len() == 1))
        .await
        .unwrap();

    home.open_edit(&snapshot[0]);
    assert_eq!(home.form.draft().id, id);
    home.form.edit(|d| d.name = "Mary Ann Smith".to_string());
    let saved = home.save(&ctx).await.unwrap().unwrap();
    assert_eq!(saved, id);

    let snapshot = within(home.wait_for(|contacts| contacts.first().is_some_and(|c| c.avatar == "MA")))
        .await
        .unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name, "Mary Ann Smith");
    assert_eq!(snapshot[0].phone, "555-1234");
}

#[tokio::test]
async fn test_update_is_strict() {
    let app = test_app();
    let ctx = signed_in("owner");

    let patch = ContactPatch {
        company: Some("Acme".to_string()),
        ..Default::default()
    };
    let err = app
        .state
        .contacts
        .update(&ctx, "no-such-contact", patch)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(app.state.store.write_calls(), 0);
    assert!(app
        .state
        .store
        .raw_document(collections::CONTACTS, "no-such-contact")
        .is_none());
}

#[tokio::test]
async fn test_update_rejects_blank_name() {
    let app = test_app();
    let ctx = signed_in("owner");
    let draft = ContactDraft {
        name: "Jane".to_string(),
        phone: "555".to_string(),
        ..Default::default()
    };
    let contact = app.state.contacts.create(&ctx, &draft).await.unwrap();

    let patch = ContactPatch {
        name: Some("  ".to_string()),
        ..Default::default()
    };
    let err = app
        .state
        .contacts
        .update(&ctx, &contact.id, patch)
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_update_trims_name_and_phone() {
    let app = test_app();
    let ctx = signed_in("owner");
    let draft = ContactDraft {
        name: "Jane".to_string(),
        phone: "555".to_string(),
        ..Default::default()
    };
    let contact = app.state.contacts.create(&ctx, &draft).await.unwrap();

    let patch = ContactPatch {
        name: Some("  Bob Ray  ".to_string()),
        phone: Some(" 1 ".to_string()),
        ..Default::default()
    };
    app.state
        .contacts
        .update(&ctx, &contact.id, patch)
        .await
        .unwrap();

    let stored = app.state.contacts.get(&ctx, &contact.id).await.unwrap();
    assert_eq!(stored.name, "Bob Ray");
    assert_eq!(stored.phone, "1");
    assert_eq!(stored.avatar, "BR");
}

#[tokio::test]
async fn test_delete_then_resubscribe_omits_contact() {
    let app = test_app();
    let ctx = signed_in("owner");
    let mut home = app.state.contacts_screen(&ctx).unwrap();

    for (name, phone) in [("Jane Doe", "555-1234"), ("Bob Stone", "555-9999")] {
        home.form.edit(|d| fill(d, name, phone));
        home.save(&ctx).await.unwrap().unwrap();
    }
    let snapshot = within(home.wait_for(|contacts| contacts.len() == 2))
        .await
        .unwrap();
    let doomed = snapshot.iter().find(|c| c.name == "Jane Doe").unwrap().id.clone();

    home.delete(&ctx, &doomed).await.unwrap().unwrap();
    home.unmount();

    let mut home = app.state.contacts_screen(&ctx).unwrap();
    let snapshot = within(home.wait_for(|contacts| !contacts.is_empty()))
        .await
        .unwrap();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.iter().all(|c| c.id != doomed));
}

#[tokio::test]
async fn test_delete_missing_contact_is_noop_for_screen() {
    let app = test_app();
    let ctx = signed_in("owner");
    let mut home = app.state.contacts_screen(&ctx).unwrap();

    let outcome = home.delete(&ctx, "already-gone").await.unwrap();
    assert!(outcome.is_ok());
    assert_eq!(home.alert(), None);

    // The service itself reports it
    let err = app.state.contacts.delete(&ctx, "already-gone").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_toggle_favorite_and_stats() {
    let app = test_app();
    let ctx = signed_in("owner");
    let mut home = app.state.contacts_screen(&ctx).unwrap();

    home.form.edit(|d| fill(d, "Jane Doe", "555-1234"));
    home.save(&ctx).await.unwrap().unwrap();
    home.form.edit(|d| {
        fill(d, "Bob Stone", "555-9999");
        d.status = ContactStatus::Offline;
    });
    home.save(&ctx).await.unwrap().unwrap();
    let snapshot = within(home.wait_for(|contacts| contacts.len() == 2))
        .await
        .unwrap();

    let jane = snapshot.iter().find(|c| c.name == "Jane Doe").unwrap().clone();
    home.toggle_favorite(&ctx, &jane).await.unwrap().unwrap();
    within(home.wait_for(|contacts| contacts.iter().any(|c| c.is_favorite)))
        .await
        .unwrap();

    let stats = home.stats();
    assert_eq!((stats.total, stats.favorites, stats.online), (2, 1, 1));

    home.set_tab(Tab::Favorites);
    let visible = home.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Jane Doe");
}

#[tokio::test]
async fn test_other_users_contacts_are_invisible() {
    let app = test_app();
    let alice = signed_in("alice");
    let bob = signed_in("bob");

    let draft = ContactDraft {
        name: "Secret".to_string(),
        phone: "000".to_string(),
        ..Default::default()
    };
    let secret = app.state.contacts.create(&alice, &draft).await.unwrap();

    let mut home = app.state.contacts_screen(&bob).unwrap();
    let snapshot = within(home.wait_for(|_| true)).await.unwrap();
    assert!(snapshot.is_empty());

    let err = app.state.contacts.get(&bob, &secret.id).await.unwrap_err();
    assert!(err.is_not_found());
    let err = app.state.contacts.delete(&bob, &secret.id).await.unwrap_err();
    assert!(err.is_not_found());

    let stored: Option<Contact> = app.state.store.get(&secret.id).await.unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_signed_out_write_requires_sign_in() {
    let app = test_app();
    let ctx = ClientContext::anonymous();
    let draft = ContactDraft {
        name: "Jane".to_string(),
        phone: "555".to_string(),
        ..Default::default()
    };

    let err = app.state.contacts.create(&ctx, &draft).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    assert_eq!(err.user_message(), AppError::SIGN_IN_ALERT);
    assert_eq!(app.state.store.write_calls(), 0);
}

#[tokio::test]
async fn test_backend_failure_shows_generic_alert() {
    let app = test_app();
    let ctx = signed_in("owner");
    let mut home = app.state.contacts_screen(&ctx).unwrap();

    app.state.store.set_offline(true);
    home.form.edit(|d| fill(d, "Jane Doe", "555-1234"));
    let err = home.save(&ctx).await.unwrap().unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(home.form.state(), FormState::Editing);
    assert_eq!(home.form.last_outcome(), Some(FormState::Failed));
    assert_eq!(home.form.alert(), Some(AppError::GENERIC_ALERT));
    assert_eq!(home.form.draft().name, "Jane Doe");

    // Retry once the store is back
    app.state.store.set_offline(false);
    assert!(home.save(&ctx).await.unwrap().is_ok());
}
