//! End-to-end record workflows against the in-memory network.

use std::sync::Arc;

use arec_store::{
    Account, IndexError, InMemoryPostClient, PostClient, PostQuery, RecordContent, RecordStore,
    StoreConfig, StoreError,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct A {
    value: i64,
}

impl RecordContent for A {
    const TYPE_NAME: &'static str = "A";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Label {
    value: String,
}

impl RecordContent for Label {
    const TYPE_NAME: &'static str = "Label";
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn store() -> (Arc<InMemoryPostClient>, RecordStore) {
    init_tracing();
    let client = Arc::new(InMemoryPostClient::new());
    let config = StoreConfig::from_toml_str(&format!(
        "default_channel = \"RECORDS\"\nfallback_seed = \"{}\"\nfetch_concurrency = 2",
        "07".repeat(32)
    ))
    .unwrap();
    let store = RecordStore::new(client.clone(), config).unwrap();
    store.register::<A>();
    store.register::<Label>();
    (client, store)
}

#[tokio::test]
async fn revision_round_trip() {
    let (_, store) = store();

    let mut a = store.create(A { value: 1 }).await.unwrap();
    let h0 = a.item_hash().unwrap();
    assert_eq!(a.revision_hashes(), &[h0]);

    a.value = 2;
    store.upsert(&mut a).await.unwrap();
    let h1 = a.revision_hashes()[1];
    assert_eq!(a.revision_hashes(), &[h0, h1]);
    assert_eq!(a.item_hash(), Some(h0));

    store.fetch_revision(&mut a, Some(0), None).await.unwrap();
    assert_eq!(a.value, 1);
    assert_eq!(a.current_revision(), Some(0));

    store.fetch_revision(&mut a, None, Some(h1)).await.unwrap();
    assert_eq!(a.value, 2);
    assert_eq!(a.current_revision(), Some(1));
}

#[tokio::test]
async fn indexed_lookup() {
    let (_, store) = store();
    store.add_index::<Label>("value");

    let x = store.create(Label { value: "x".into() }).await.unwrap();
    let y = store.create(Label { value: "y".into() }).await.unwrap();

    let found = store.query::<Label, _>(&["x", "y"], "value").await.unwrap();
    let mut hashes: Vec<_> = found.iter().filter_map(|r| r.item_hash()).collect();
    hashes.sort();
    let mut expected = vec![x.item_hash().unwrap(), y.item_hash().unwrap()];
    expected.sort();
    assert_eq!(hashes, expected);

    let err = store.query::<Label, _>(&["z"], "value").await.unwrap_err();
    match err {
        StoreError::Index(IndexError::KeyNotFound { key, .. }) => assert_eq!(key, "z"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn second_reader_follows_first_writer() {
    let (_, store) = store();

    let mut writer = store.create(A { value: 10 }).await.unwrap();
    for v in [11, 12] {
        writer.value = v;
        store.upsert(&mut writer).await.unwrap();
    }

    let mut readers = store.fetch::<A>(&[writer.item_hash().unwrap()]).await.unwrap();
    assert_eq!(readers.len(), 1);
    let reader = &mut readers[0];
    assert_eq!(reader.value, 10);
    assert_eq!(reader.revision_hashes(), writer.revision_hashes());

    store.fetch_revision(reader, Some(-1), None).await.unwrap();
    assert_eq!(reader.value, 12);
}

#[tokio::test]
async fn forgotten_records_disappear_from_the_network() {
    let (client, store) = store();

    let mut kept = store.create(A { value: 1 }).await.unwrap();
    let mut dropped = store.create(A { value: 2 }).await.unwrap();
    dropped.value = 3;
    store.upsert(&mut dropped).await.unwrap();
    kept.value = 4;
    store.upsert(&mut kept).await.unwrap();

    store.forget(&mut dropped).await.unwrap();

    let remaining = client
        .get_posts(&PostQuery::new().with_channel("RECORDS"))
        .await
        .unwrap();
    assert!(remaining
        .iter()
        .all(|p| !dropped.revision_hashes().contains(&p.item_hash)));
    assert_eq!(remaining.len(), 2);

    assert!(matches!(
        store.forget(&mut dropped).await,
        Err(StoreError::AlreadyForgotten(_))
    ));
}

#[tokio::test]
async fn configured_channel_and_account_are_used() {
    let (client, store) = store();
    let record = store.create(A { value: 1 }).await.unwrap();

    let posts = client
        .get_posts(&PostQuery::new().with_hashes(vec![record.item_hash().unwrap()]))
        .await
        .unwrap();
    assert_eq!(posts[0].channel, "RECORDS");
    assert_eq!(&posts[0].sender, Account::from_seed([7; 32]).address());
}
