//! Service facade tests
//!
//! Scenarios driven through the string-level API with an in-memory store.

use kinship_core::{DirectoryError, FriendRequestOutcome, InvalidAccountData};
use kinship_server::{MemoryStorage, Service, ServiceError};

fn service_with(ids: &[(&str, &str)]) -> Service<MemoryStorage> {
    let mut service = Service::open(MemoryStorage::new()).unwrap();
    for (id, credential) in ids {
        service.create_account(Some(*id), Some(*credential), id).unwrap();
    }
    service
}

#[test]
fn alice_and_bob_scenario() {
    let mut service = service_with(&[("alice", "p1"), ("bob", "p2")]);

    assert_eq!(service.login("alice", "p1").unwrap(), "alice");
    assert_eq!(service.add_friend("alice", "bob").unwrap(), FriendRequestOutcome::Invited);
    assert!(!service.is_friend("alice", "bob").unwrap());
    assert_eq!(service.add_friend("bob", "alice").unwrap(), FriendRequestOutcome::Accepted);

    assert!(service.is_friend("alice", "bob").unwrap());
    assert!(service.is_friend("bob", "alice").unwrap());
    assert_eq!(service.friends("alice").unwrap(), "{bob}");
    assert_eq!(service.friends("bob").unwrap(), "{alice}");
}

#[test]
fn friends_of_loner_render_empty() {
    let service = service_with(&[("alice", "p1")]);

    assert_eq!(service.friends("alice").unwrap(), "{}");
}

#[test]
fn errors_pass_through_unchanged() {
    let mut service = service_with(&[("alice", "p1"), ("bob", "p2")]);

    assert_eq!(
        service.create_account(None, Some("x"), "Nobody"),
        Err(ServiceError::Directory(DirectoryError::InvalidAccountData(InvalidAccountData::MissingId)))
    );
    assert_eq!(service.login("alice", "wrong"), Err(ServiceError::Directory(DirectoryError::BadCredentials)));
    assert_eq!(service.login("ghost", "p1"), Err(ServiceError::Directory(DirectoryError::BadCredentials)));
    assert_eq!(service.friends("ghost"), Err(ServiceError::Directory(DirectoryError::AccountNotFound)));

    service.add_friend("alice", "bob").unwrap();
    let err = service.add_friend("alice", "bob").unwrap_err();
    assert_eq!(err, ServiceError::Directory(DirectoryError::DuplicateInvite));
    assert!(!err.is_persistence());
}

#[test]
fn attributes_and_messages() {
    let mut service = service_with(&[("alice", "p1"), ("bob", "p2")]);

    service.set_attribute("alice", "city", "Recife").unwrap();
    assert_eq!(service.get_attribute("alice", "city").unwrap(), "Recife");
    assert_eq!(service.get_attribute("alice", "login").unwrap(), "alice");

    service.send_message("alice", "bob", "m1").unwrap();
    service.send_message("alice", "bob", "m2").unwrap();
    assert_eq!(service.read_message("bob").unwrap(), "m1");
    assert_eq!(service.read_message("bob").unwrap(), "m2");
    assert_eq!(service.read_message("bob"), Err(ServiceError::Directory(DirectoryError::NoMessages)));
}

#[test]
fn shutdown_then_open_restores_everything() {
    let store = MemoryStorage::new();

    {
        let mut service = Service::open(store.clone()).unwrap();
        service.create_account(Some("alice"), Some("p1"), "Alice").unwrap();
        service.create_account(Some("bob"), Some("p2"), "Bob").unwrap();
        service.create_account(Some("carol"), Some("p3"), "Carol").unwrap();
        service.add_friend("alice", "bob").unwrap();
        service.add_friend("bob", "alice").unwrap();
        service.add_friend("carol", "alice").unwrap();
        service.set_attribute("bob", "city", "Maceio").unwrap();
        service.send_message("carol", "bob", "first").unwrap();
        service.send_message("alice", "bob", "second").unwrap();
        service.login("carol", "p3").unwrap();
        service.shutdown().unwrap();
    }
    assert_eq!(store.store_count(), 1);

    let mut service = Service::open(store).unwrap();
    assert_eq!(service.friends("alice").unwrap(), "{bob}");
    assert_eq!(service.directory().pending_invites("alice").unwrap(), ["carol"]);
    assert_eq!(service.get_attribute("bob", "city").unwrap(), "Maceio");
    assert_eq!(service.read_message("bob").unwrap(), "first");
    assert_eq!(service.read_message("bob").unwrap(), "second");
    assert_eq!(service.directory().sessions().owner("1"), Some("carol"));

    // Counter continues where the previous run stopped.
    service.login("alice", "p1").unwrap();
    assert_eq!(service.directory().sessions().owner("2"), Some("alice"));
}

#[test]
fn reset_then_save_clears_stored_state() {
    let store = MemoryStorage::new();

    let mut service = Service::open(store.clone()).unwrap();
    service.create_account(Some("alice"), Some("p1"), "Alice").unwrap();
    service.save().unwrap();
    service.reset();
    service.shutdown().unwrap();

    let service = Service::open(store).unwrap();
    assert_eq!(service.directory().account_count(), 0);
}
