use policyview_presenter::{OverlaySnapshot, RestoreStats, ViewOverlay, ViewState};

fn expanded(b: bool) -> ViewState {
    ViewState { expanded: b }
}

#[test]
fn unseen_cards_are_collapsed() {
    let o = ViewOverlay::new();
    assert!(!o.is_expanded("policy:P-1"));
    assert!(o.is_empty());
}

#[test]
fn toggle_and_set() {
    let o = ViewOverlay::new();
    assert!(o.toggle_expanded("policy:P-1"));
    assert!(o.is_expanded("policy:P-1"));
    assert!(!o.toggle_expanded("policy:P-1"));

    o.set_expanded("policy:P-2", true);
    assert!(o.is_expanded("policy:P-2"));
    o.set_expanded("policy:P-2", false);
    assert!(!o.is_expanded("policy:P-2"));
    assert_eq!(o.len(), 2);
}

#[test]
fn snapshot_is_sorted() {
    let o = ViewOverlay::new();
    for k in ["c", "a", "d", "b"] {
        o.set_expanded(k, k == "b");
    }
    let snap = o.snapshot();
    let keys: Vec<&str> = snap.states.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "c", "d"]);
    assert_eq!(snap.states[1].1, expanded(true));
}

#[test]
fn restore_replaces_and_merge_overlays() {
    let o = ViewOverlay::new();
    o.set_expanded("a", true);
    o.set_expanded("b", true);

    let snap = OverlaySnapshot {
        states: vec![("b".to_string(), expanded(false)), ("c".to_string(), expanded(true))],
    };

    let stats = o.restore_merge(snap.clone());
    assert_eq!(stats, RestoreStats { applied: 2, overwritten: 1 });
    assert!(o.is_expanded("a"));
    assert!(!o.is_expanded("b"));
    assert!(o.is_expanded("c"));

    let stats = o.restore(snap);
    assert_eq!(stats, RestoreStats { applied: 2, overwritten: 0 });
    assert!(!o.is_expanded("a"));
    assert_eq!(o.len(), 2);
}

#[test]
fn snapshot_serde_shape() {
    let o = ViewOverlay::default();
    o.set_expanded("policy:P-1", true);
    let json = serde_json::to_string(&o.snapshot()).unwrap();
    assert_eq!(json, r#"{"states":[["policy:P-1",{"expanded":true}]]}"#);

    let back: OverlaySnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, o.snapshot());
}

#[test]
fn shared_across_threads() {
    use std::sync::Arc;

    let o = Arc::new(ViewOverlay::new());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let o = Arc::clone(&o);
            std::thread::spawn(move || {
                for i in 0..50 {
                    o.set_expanded(&format!("policy:P-{t}-{i}"), true);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(o.len(), 200);
}
