use chrono::Utc;
use uuid::Uuid;

use lorekeep_core::{
  document::{DocKind, NewDoc},
  folder::NewFolder,
  graph::{Edge, EdgeKind, NewRef, RefKind, TagRow},
  store::{DocQuery, WikiStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.unwrap()
}

#[tokio::test]
async fn doc_roundtrip() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let doc = store
    .create_doc(NewDoc::new(campaign, "Aldric the Bold"))
    .await
    .unwrap();
  assert_eq!(doc.title, "Aldric the Bold");
  assert_eq!(doc.kind, DocKind::Normal);
  assert!(doc.deleted_at.is_none());

  let fetched = store.get_doc(doc.doc_id).await.unwrap().unwrap();
  assert_eq!(fetched.doc_id, doc.doc_id);
  assert_eq!(fetched.title, doc.title);
  assert_eq!(fetched.updated_at, doc.updated_at);

  assert!(store.get_doc(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_doc_persists_all_fields() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let folder = store
    .create_folder(NewFolder::new(campaign, "NPCs"))
    .await
    .unwrap();
  let mut doc = store
    .create_doc(NewDoc::new(campaign, "Aldric"))
    .await
    .unwrap();

  doc.folder_id = Some(folder.folder_id);
  doc.body = "A retired knight.".to_string();
  doc.sort_index = 7;
  doc.updated_at = Utc::now();
  doc.deleted_at = Some(Utc::now());
  store.update_doc(&doc).await.unwrap();

  let fetched = store.get_doc(doc.doc_id).await.unwrap().unwrap();
  assert_eq!(fetched.folder_id, Some(folder.folder_id));
  assert_eq!(fetched.body, "A retired knight.");
  assert_eq!(fetched.sort_index, 7);
  assert!(fetched.deleted_at.is_some());
}

#[tokio::test]
async fn find_doc_by_title_skips_trashed() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let mut trashed = store
    .create_doc(NewDoc::new(campaign, "Greenwood Village"))
    .await
    .unwrap();
  trashed.deleted_at = Some(Utc::now());
  store.update_doc(&trashed).await.unwrap();

  assert!(
    store
      .find_doc_by_title(campaign, "Greenwood Village")
      .await
      .unwrap()
      .is_none()
  );

  let active = store
    .create_doc(NewDoc::new(campaign, "Greenwood Village"))
    .await
    .unwrap();
  let found = store
    .find_doc_by_title(campaign, "Greenwood Village")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.doc_id, active.doc_id);
}

#[tokio::test]
async fn find_doc_by_title_is_campaign_scoped() {
  let store = store().await;
  let campaign_a = Uuid::new_v4();
  let campaign_b = Uuid::new_v4();

  store
    .create_doc(NewDoc::new(campaign_a, "Shared Title"))
    .await
    .unwrap();

  assert!(
    store
      .find_doc_by_title(campaign_b, "Shared Title")
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn list_docs_filters_deleted_and_kind() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let _normal = store
    .create_doc(NewDoc::new(campaign, "Aldric"))
    .await
    .unwrap();

  let mut index_input = NewDoc::new(campaign, "NPCs Index");
  index_input.kind = DocKind::Index;
  let index = store.create_doc(index_input).await.unwrap();

  let mut trashed = store
    .create_doc(NewDoc::new(campaign, "Old Notes"))
    .await
    .unwrap();
  trashed.deleted_at = Some(Utc::now());
  store.update_doc(&trashed).await.unwrap();

  let active = store.list_docs(campaign, DocQuery::default()).await.unwrap();
  assert_eq!(active.len(), 2);

  let all = store
    .list_docs(campaign, DocQuery {
      include_deleted: true,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(all.len(), 3);

  let indexes = store
    .list_docs(campaign, DocQuery {
      kind: Some(DocKind::Index),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(indexes.len(), 1);
  assert_eq!(indexes[0].doc_id, index.doc_id);
}

#[tokio::test]
async fn folder_roundtrip_and_listing() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let parent = store
    .create_folder(NewFolder::new(campaign, "World"))
    .await
    .unwrap();
  let mut child_input = NewFolder::new(campaign, "Towns");
  child_input.parent_id = Some(parent.folder_id);
  let child = store.create_folder(child_input).await.unwrap();

  let fetched = store.get_folder(child.folder_id).await.unwrap().unwrap();
  assert_eq!(fetched.parent_id, Some(parent.folder_id));

  let mut trashed = parent.clone();
  trashed.deleted_at = Some(Utc::now());
  store.update_folder(&trashed).await.unwrap();

  let active = store.list_folders(campaign, false).await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].folder_id, child.folder_id);

  let all = store.list_folders(campaign, true).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn edges_replace_and_query() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let a = store.create_doc(NewDoc::new(campaign, "A")).await.unwrap();
  let b = store.create_doc(NewDoc::new(campaign, "B")).await.unwrap();
  let c = store.create_doc(NewDoc::new(campaign, "C")).await.unwrap();

  let edge = |from: Uuid, to: Uuid, text: &str| Edge {
    campaign_id: campaign,
    from_doc:    from,
    to_doc:      to,
    link_text:   text.to_string(),
    kind:        EdgeKind::Link,
    weight:      1,
  };

  store
    .insert_edges(vec![
      edge(a.doc_id, b.doc_id, "B"),
      edge(a.doc_id, c.doc_id, "C"),
      edge(b.doc_id, c.doc_id, "C"),
    ])
    .await
    .unwrap();

  let into_c = store.edges_into(c.doc_id).await.unwrap();
  assert_eq!(into_c.len(), 2);

  let out_of_a = store.edges_out_of(a.doc_id).await.unwrap();
  assert_eq!(out_of_a.len(), 2);

  // Re-save of A: its outgoing set is wiped and replaced.
  store.delete_edges_from(a.doc_id).await.unwrap();
  store
    .insert_edges(vec![edge(a.doc_id, b.doc_id, "see B")])
    .await
    .unwrap();

  let out_of_a = store.edges_out_of(a.doc_id).await.unwrap();
  assert_eq!(out_of_a.len(), 1);
  assert_eq!(out_of_a[0].link_text, "see B");

  // Purge of C: edges touching it in either direction go away.
  store.delete_edges_touching(c.doc_id).await.unwrap();
  assert!(store.edges_into(c.doc_id).await.unwrap().is_empty());
  assert_eq!(store.edges_out_of(b.doc_id).await.unwrap().len(), 0);
}

#[tokio::test]
async fn tags_replace_and_lookup() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let doc = store
    .create_doc(NewDoc::new(campaign, "Aldric"))
    .await
    .unwrap();

  let tag = |ns: &str, v: &str| TagRow {
    doc_id:      doc.doc_id,
    campaign_id: campaign,
    namespace:   ns.to_string(),
    value:       v.to_string(),
  };

  store
    .insert_tags(vec![tag("type", "npc"), tag("status", "alive")])
    .await
    .unwrap();

  let tags = store.tags_for(doc.doc_id).await.unwrap();
  assert_eq!(tags.len(), 2);
  // ordered by namespace, value
  assert_eq!(tags[0].namespace, "status");
  assert_eq!(tags[1].namespace, "type");

  let npcs = store.docs_with_tag(campaign, "type", "npc").await.unwrap();
  assert_eq!(npcs.len(), 1);
  assert_eq!(npcs[0].doc_id, doc.doc_id);

  store.delete_tags_for(doc.doc_id).await.unwrap();
  assert!(store.tags_for(doc.doc_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn docs_with_tag_excludes_trashed() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let mut doc = store
    .create_doc(NewDoc::new(campaign, "Aldric"))
    .await
    .unwrap();
  store
    .insert_tags(vec![TagRow {
      doc_id:      doc.doc_id,
      campaign_id: campaign,
      namespace:   "type".to_string(),
      value:       "npc".to_string(),
    }])
    .await
    .unwrap();

  doc.deleted_at = Some(Utc::now());
  store.update_doc(&doc).await.unwrap();

  assert!(
    store
      .docs_with_tag(campaign, "type", "npc")
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn refs_roundtrip() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let doc = store
    .create_doc(NewDoc::new(campaign, "Aldric"))
    .await
    .unwrap();

  let created = store
    .create_ref(NewRef {
      campaign_id: campaign,
      doc_id:      doc.doc_id,
      kind:        RefKind::NpcProfile,
    })
    .await
    .unwrap();

  let refs = store.refs_to(doc.doc_id).await.unwrap();
  assert_eq!(refs.len(), 1);
  assert_eq!(refs[0].ref_id, created.ref_id);
  assert_eq!(refs[0].kind, RefKind::NpcProfile);

  store.delete_refs_to(doc.doc_id).await.unwrap();
  assert!(store.refs_to(doc.doc_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn purge_order_respects_foreign_keys() {
  let store = store().await;
  let campaign = Uuid::new_v4();

  let a = store.create_doc(NewDoc::new(campaign, "A")).await.unwrap();
  let b = store.create_doc(NewDoc::new(campaign, "B")).await.unwrap();

  store
    .insert_edges(vec![Edge {
      campaign_id: campaign,
      from_doc:    b.doc_id,
      to_doc:      a.doc_id,
      link_text:   "A".to_string(),
      kind:        EdgeKind::Link,
      weight:      1,
    }])
    .await
    .unwrap();
  store
    .insert_tags(vec![TagRow {
      doc_id:      a.doc_id,
      campaign_id: campaign,
      namespace:   "type".to_string(),
      value:       "npc".to_string(),
    }])
    .await
    .unwrap();

  store.delete_edges_touching(a.doc_id).await.unwrap();
  store.delete_tags_for(a.doc_id).await.unwrap();
  store.delete_refs_to(a.doc_id).await.unwrap();
  store.delete_doc(a.doc_id).await.unwrap();

  assert!(store.get_doc(a.doc_id).await.unwrap().is_none());
  assert!(store.get_doc(b.doc_id).await.unwrap().is_some());
}
