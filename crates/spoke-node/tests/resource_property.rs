//! Resource property behaviour against in-memory collaborators

use parking_lot::Mutex;
use spoke_node::prelude::*;
use spoke_node::ImageProjection;
use spoke_test_utils::TestContext;
use std::sync::Arc;

fn recording_callback() -> (LoadErrorCallback, Arc<Mutex<Vec<(NodeId, String)>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let callback: LoadErrorCallback = Arc::new(move |node, error: &ResourcePropertyError| {
        sink.lock().push((node, error.reference.clone()));
    });
    (callback, calls)
}

#[tokio::test]
async fn repeated_set_runs_one_pipeline() {
    let mut t = TestContext::new();
    t.fetcher.insert_png("x.png", 8, 8);
    let node = ImageNode::create(&t.ctx);

    node.set_src(&t.ctx, "x.png");
    node.set_src(&t.ctx, "x.png");

    assert!(matches!(t.next_event().await, EditorEvent::ObjectsChanged { .. }));
    assert_eq!(t.next_event().await, EditorEvent::SelectionChanged);

    assert_eq!(t.resolver.resolve_count("x.png"), 1);
    assert_eq!(node.src_property().applied(), "x.png");

    node.set_src(&t.ctx, "x.png");
    tokio::task::yield_now().await;
    assert!(t.drain_events().is_empty());
    assert_eq!(t.resolver.resolve_count("x.png"), 1);
}

#[tokio::test]
async fn superseded_load_is_never_applied() {
    let mut t = TestContext::new();
    t.fetcher.insert_png("a.png", 8, 8);
    t.fetcher.insert_png("b.png", 16, 16);
    t.fetcher.hold("a.png");
    let (callback, calls) = recording_callback();

    let node = ImageNode::create(&t.ctx);
    let a = node
        .src_property()
        .request(&t.ctx, "a.png", Some(callback))
        .unwrap();
    let a = tokio::spawn(a);
    t.fetcher.wait_for_fetch("a.png", 1).await;

    node.set_src(&t.ctx, "b.png");
    assert_eq!(node.src(), "b.png");
    assert_eq!(
        t.next_event().await,
        EditorEvent::object_changed(node.id(), ImageNode::SRC)
    );
    assert_eq!(t.next_event().await, EditorEvent::SelectionChanged);

    t.fetcher.release("a.png");
    a.await.unwrap();

    assert_eq!(node.src_property().applied(), "b.png");
    assert_eq!(node.texture().unwrap().width, 16);
    assert!(t.drain_events().is_empty());
    assert!(calls.lock().is_empty());
}

#[tokio::test]
async fn superseded_failure_is_silent() {
    let mut t = TestContext::new();
    t.resolver.fail("broken.png");
    t.fetcher.insert_png("ok.png", 8, 8);
    let (callback, calls) = recording_callback();

    let node = ImageNode::create(&t.ctx);
    let broken = node
        .src_property()
        .request(&t.ctx, "broken.png", Some(Arc::clone(&callback)))
        .unwrap();
    let ok = node
        .src_property()
        .request(&t.ctx, "ok.png", Some(callback))
        .unwrap();

    broken.await;
    assert!(t.drain_events().is_empty());

    ok.await;
    assert!(calls.lock().is_empty());
    assert!(node.issues().is_empty());
    assert_eq!(t.drain_events().len(), 2);
}

#[tokio::test]
async fn shared_identity_is_fetched_once() {
    let mut t = TestContext::new();
    t.fetcher.insert_png("shared.png", 32, 32);
    t.fetcher.hold("shared.png");

    let first = ImageNode::create(&t.ctx);
    let second = ImageNode::create(&t.ctx);
    first.set_src(&t.ctx, "shared.png");
    second.set_src(&t.ctx, "shared.png");

    t.fetcher.wait_for_fetch("shared.png", 1).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    t.fetcher.release("shared.png");

    for _ in 0..4 {
        t.next_event().await;
    }

    assert_eq!(t.fetcher.fetch_count("shared.png"), 1);
    assert!(Arc::ptr_eq(&first.texture().unwrap(), &second.texture().unwrap()));
}

#[tokio::test]
async fn replacing_texture_recomputes_issues() {
    let mut t = TestContext::new();
    t.fetcher.insert_png("a.png", 8, 8);
    t.fetcher.insert_png("b.png", 100, 50);

    let mut node = ImageNode::create(&t.ctx);
    node.projection = ImageProjection::Flat;
    node.set_src(&t.ctx, "a.png");
    t.next_event().await;
    t.next_event().await;
    assert!(node.issues().is_empty());

    node.set_src(&t.ctx, "b.png");
    let events = vec![t.next_event().await, t.next_event().await];

    assert_eq!(
        events,
        vec![
            EditorEvent::object_changed(node.id(), ImageNode::SRC),
            EditorEvent::SelectionChanged,
        ]
    );
    assert_eq!(node.src_property().applied(), "b.png");
    assert_eq!(node.issues(), vec![Issue::info(
        "Texture is 100x50; non power-of-two textures cannot use mipmaps."
    )]);
    assert!((node.aspect_ratio() - 0.5).abs() < f32::EPSILON);
    assert!(t.drain_events().is_empty());
}

#[tokio::test]
async fn empty_value_on_empty_property_does_nothing() {
    let mut t = TestContext::new();
    let node = ImageNode::create(&t.ctx);

    node.set_src(&t.ctx, "");
    tokio::task::yield_now().await;

    assert!(t.drain_events().is_empty());
    assert_eq!(t.resolver.resolve_count(""), 0);
    assert!(!node.src_property().is_loading());
}

#[tokio::test]
async fn attribution_attached_on_resolve() {
    let mut t = TestContext::new();
    t.fetcher.insert_png("photo.png", 8, 8);
    t.fetcher.hold("photo.png");
    t.resolver.set_attribution(
        "photo.png",
        spoke_resource::Attribution {
            author: Some("Ada".to_string()),
            ..Default::default()
        },
    );

    let node = ImageNode::create(&t.ctx);
    node.set_src(&t.ctx, "photo.png");
    t.fetcher.wait_for_fetch("photo.png", 1).await;

    // resolved but not yet fetched
    assert_eq!(node.base().attribution().unwrap().author.as_deref(), Some("Ada"));
    assert!(node.texture().is_none());

    t.fetcher.release("photo.png");
    t.next_event().await;
}

#[tokio::test]
async fn duplicate_does_not_refetch() {
    let mut t = TestContext::new();
    t.fetcher.insert_png("a.png", 8, 8);

    let node = ImageNode::create(&t.ctx);
    node.set_src(&t.ctx, "a.png");
    t.next_event().await;

    let copy = node.duplicate();
    let copy = copy.as_any().downcast_ref::<ImageNode>().unwrap();

    assert_ne!(copy.id(), node.id());
    assert_eq!(copy.src(), "a.png");
    assert!(Arc::ptr_eq(&copy.texture().unwrap(), &node.texture().unwrap()));
    assert_eq!(t.fetcher.total_fetches(), 1);
    assert_eq!(t.resolver.resolve_count("a.png"), 1);
}
