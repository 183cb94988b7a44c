//! Editor session behaviour over in-memory media

use pretty_assertions::assert_eq;
use spoke_editor::{Editor, EditorConfig, EditorError};
use spoke_node::{EditorEvent, ImageNode, NodeId, SceneNode, Severity, SpinningCubeNode};
use spoke_test_utils::{sample_document, GatedFetcher, StaticResolver, TestContext};
use std::sync::Arc;
use std::time::Duration;

struct Session {
    editor: Editor,
    resolver: Arc<StaticResolver>,
    fetcher: Arc<GatedFetcher>,
}

fn session() -> Session {
    let TestContext {
        ctx,
        events,
        resolver,
        fetcher,
    } = TestContext::new();
    Session {
        editor: Editor::with_context(EditorConfig::default(), ctx, events),
        resolver,
        fetcher,
    }
}

fn find<T: 'static>(editor: &Editor) -> (NodeId, &T) {
    editor
        .scene()
        .iter()
        .find_map(|node| node.as_any().downcast_ref::<T>().map(|n| (node.id(), n)))
        .unwrap()
}

#[tokio::test]
async fn load_then_save_reproduces_document() {
    let mut s = session();
    s.fetcher.insert_png("wall.png", 64, 64);
    let document = sample_document("wall.png");

    let report = s.editor.load_document(document.clone()).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.nodes, 3);
    assert_eq!(report.scheduled, 1);
    assert!(!s.editor.is_modified());
    assert_eq!(s.editor.save_document(), document);
}

#[tokio::test]
async fn failed_texture_is_reported_and_scene_stays_usable() {
    let mut s = session();
    s.resolver.fail("gone.png");

    let report = s
        .editor
        .load_document(sample_document("gone.png"))
        .await
        .unwrap();

    assert_eq!(report.nodes, 3);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].reference, "gone.png");

    let issues = s.editor.issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].name, "Image");
    assert_eq!(issues[0].issues[0].severity, Severity::Error);

    let saved = s.editor.save_document();
    let image = saved
        .entities
        .iter()
        .find_map(|e| e.component("image"))
        .unwrap();
    assert_eq!(image.props["src"], "");
}

#[tokio::test]
async fn node_changes_mark_scene_modified() {
    let mut s = session();
    s.fetcher.insert_png("a.png", 8, 8);
    s.fetcher.insert_png("b.png", 8, 8);
    s.editor
        .load_document(sample_document("a.png"))
        .await
        .unwrap();
    assert!(s.editor.process_events().is_empty());

    let (id, image) = find::<ImageNode>(&s.editor);
    image.set_src(s.editor.ctx(), "b.png");
    s.fetcher.wait_for_fetch("b.png", 1).await;
    while image.src_property().is_loading() {
        tokio::task::yield_now().await;
    }

    let events = s.editor.process_events();
    assert!(events.contains(&EditorEvent::object_changed(id, "src")));
    assert!(events.contains(&EditorEvent::SelectionChanged));
    assert!(s.editor.is_modified());
}

#[tokio::test]
async fn open_refuses_to_discard_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.json");
    std::fs::write(&path, sample_document("a.png").to_json_pretty().unwrap()).unwrap();

    let mut s = session();
    s.fetcher.insert_png("a.png", 8, 8);
    s.editor.open_scene(&path, false).await.unwrap();

    s.editor.add_node("group", None).unwrap();
    s.editor.process_events();
    assert!(s.editor.is_modified());

    let err = s.editor.open_scene(&path, false).await.unwrap_err();
    assert!(matches!(err, EditorError::UnsavedChanges(_)));
    assert!(err.is_recoverable());
    assert_eq!(s.editor.scene().len(), 4);

    s.editor.open_scene(&path, true).await.unwrap();
    assert_eq!(s.editor.scene().len(), 3);
    assert!(!s.editor.is_modified());
}

#[tokio::test]
async fn save_clears_modified() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");

    let mut s = session();
    s.editor.add_node("spinning-cube", None).unwrap();
    s.editor.process_events();
    assert!(s.editor.is_modified());

    s.editor.save_scene(&path).await.unwrap();
    assert!(!s.editor.is_modified());

    let written = std::fs::read_to_string(&path).unwrap();
    let document = spoke_node::SceneDocument::from_json(&written).unwrap();
    assert_eq!(document, s.editor.save_document());
}

#[tokio::test]
async fn play_spins_and_pause_restores() {
    let mut s = session();
    s.fetcher.insert_png("a.png", 8, 8);
    s.editor
        .load_document(sample_document("a.png"))
        .await
        .unwrap();
    let (id, cube) = find::<SpinningCubeNode>(&s.editor);
    let start = cube.base().transform.rotation;

    s.editor.update(1.0);
    assert_eq!(s.editor.scene().get(id).unwrap().base().transform.rotation, start);

    s.editor.play();
    s.editor.update(1.0);
    let spun = s.editor.scene().get(id).unwrap().base().transform.rotation;
    assert!((spun[1] - start[1] - 20f64.to_radians()).abs() < 1e-5);

    s.editor.pause();
    assert_eq!(s.editor.scene().get(id).unwrap().base().transform.rotation, start);
}

#[tokio::test]
async fn export_augments_without_touching_save() {
    let mut s = session();
    s.fetcher.insert_png("wall.png", 64, 32);
    let document = sample_document("wall.png");
    s.editor.load_document(document.clone()).await.unwrap();

    let export = s.editor.export_document();
    let names: Vec<Vec<String>> = export
        .entities
        .iter()
        .map(|e| e.components.iter().map(|c| c.name.clone()).collect())
        .collect();

    assert!(names[1].contains(&"spin".to_string()));
    assert!(names[2].contains(&"image-mesh".to_string()));
    assert_eq!(export.entities[2].uuid, document.entities[2].uuid);
    assert_eq!(s.editor.save_document(), document);
}

#[tokio::test]
async fn duplicate_and_remove() {
    let mut s = session();
    s.fetcher.insert_png("wall.png", 64, 64);
    s.editor
        .load_document(sample_document("wall.png"))
        .await
        .unwrap();
    let group = s.editor.scene().roots()[0];

    let copy = s.editor.duplicate_node(group, true).unwrap();
    assert_eq!(s.editor.scene().len(), 6);
    assert_eq!(s.fetcher.total_fetches(), 1);
    assert_eq!(s.resolver.resolve_count("wall.png"), 1);

    s.editor.set_selection([copy, NodeId::new()]);
    assert_eq!(s.editor.selection(), &[copy]);

    s.editor.remove_node(copy).unwrap();
    assert!(s.editor.selection().is_empty());
    assert_eq!(s.editor.scene().len(), 3);

    let events = s.editor.process_events();
    assert!(events.contains(&EditorEvent::SceneGraphChanged));
    assert!(s.editor.is_modified());
}

#[tokio::test]
async fn cancelled_load_leaves_resources_retryable() {
    let mut s = session();
    s.fetcher.insert_png("wall.png", 64, 64);
    s.fetcher.hold("wall.png");

    let load = tokio::time::timeout(
        Duration::from_millis(50),
        s.editor.load_document(sample_document("wall.png")),
    )
    .await;
    assert!(load.is_err());
    assert_eq!(s.editor.scene().len(), 3);

    let (_, image) = find::<ImageNode>(&s.editor);
    tokio::time::timeout(Duration::from_secs(5), async {
        while image.src_property().is_loading() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
    assert_eq!(image.src(), "wall.png");
    assert_eq!(image.src_property().applied(), "");

    s.fetcher.release("wall.png");
    let retry = image
        .src_property()
        .request(s.editor.ctx(), "wall.png", None)
        .unwrap();
    retry.await;
    assert_eq!(image.src_property().applied(), "wall.png");
    assert!(image.texture().is_some());
}

#[tokio::test]
async fn unknown_node_type_is_rejected() {
    let mut s = session();
    let err = s.editor.add_node("teapot", None).unwrap_err();
    assert!(matches!(err, EditorError::UnknownNodeType(_)));
}
