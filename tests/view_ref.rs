use attrtree::{AttrTree, Path, Resolved, ViewRef, overlay};
use pretty_assertions::assert_eq;

type Matrix = Vec<Vec<f64>>;

fn path(s: &str) -> Path {
    s.parse().unwrap()
}

fn matrix(seed: f64) -> Matrix {
    (0..5)
        .map(|i| (0..5).map(|j| seed + (i * 5 + j) as f64 / 25.0).collect())
        .collect()
}

fn example_tree() -> AttrTree<Matrix> {
    let mut tree = AttrTree::new();
    let example = tree.get_or_create("Example").unwrap();
    example.set("Path1", matrix(0.0)).unwrap();
    example.set("Path2", matrix(1.0)).unwrap();
    tree
}

#[test]
fn resolve_constructor() {
    let tree = example_tree();
    let view_ref = ViewRef::parse("Example.Path1 * Example.Path2").unwrap();
    let resolved = view_ref.resolve(&tree).unwrap();
    assert_eq!(resolved.len(), 2);
    match resolved {
        Resolved::Overlay(layers) => {
            assert_eq!(layers.get(0), Some(&&matrix(0.0)));
            assert_eq!(layers.get(1), Some(&&matrix(1.0)));
        }
        Resolved::Single(_) => panic!("expected an overlay"),
    }
}

#[test]
fn resolve_builder() {
    let tree = example_tree();
    let view_ref = overlay(
        &ViewRef::new().attr("Example").unwrap().attr("Path1").unwrap(),
        &ViewRef::new().attr("Example").unwrap().attr("Path2").unwrap(),
    );
    assert_eq!(
        view_ref.specification(),
        [path("Example.Path1"), path("Example.Path2")]
    );
    assert_eq!(view_ref.resolve(&tree).unwrap().len(), 2);
}

#[test]
fn view_ref_serde_round_trip() {
    let view_ref = ViewRef::parse("Example.Path1 * Example.Path2").unwrap();
    let dumped = serde_json::to_string(&view_ref).unwrap();
    let view_ref2: ViewRef = serde_json::from_str(&dumped).unwrap();
    assert_eq!(
        view_ref.specification(),
        [path("Example.Path1"), path("Example.Path2")]
    );
    assert_eq!(view_ref.specification(), view_ref2.specification());
    assert_eq!(
        dumped,
        r#"{"specification":[["Example","Path1"],["Example","Path2"]]}"#
    );
}

#[test]
fn resolving_leaves_the_tree_alone() {
    let tree = example_tree();
    let before = tree.clone();
    assert!(ViewRef::parse("Other.Path").unwrap().resolve(&tree).is_err());
    assert_eq!(tree, before);
}
