use hashbrown::HashMap;

use retrace_core::ids::NodeId;
use retrace_core::node::NodeKind;
use retrace_models::mapping::{ColorMap, Legend, MapContext, Rgb};
use retrace_testutils::dataset::make_node;

fn context(radius: f64, max_degree: usize, degrees: &[(u64, usize)]) -> MapContext {
    let mut map = HashMap::new();
    for (id, degree) in degrees {
        map.insert(NodeId::from(*id), *degree);
    }
    MapContext {
        radius_comm: radius,
        max_degree,
        degrees: map,
    }
}

#[test]
fn unknown_key_is_rejected() {
    assert_eq!(ColorMap::from_key("by_type"), Some(ColorMap::ByType));
    assert_eq!(ColorMap::from_key("by_id"), Some(ColorMap::ById));
    assert_eq!(ColorMap::from_key("by_degree"), Some(ColorMap::ByDegree));
    assert_eq!(ColorMap::from_key("by_altitude"), None);
    assert_eq!(ColorMap::from_key(""), None);
}

#[test]
fn keys_round_trip() {
    for mapping in ColorMap::all() {
        assert_eq!(ColorMap::from_key(mapping.key()), Some(mapping));
    }
}

#[test]
fn type_palette_is_fixed() {
    let ctx = context(0.0, 0, &[]);
    let mut node = make_node(1, 0.0, 0.0, 10.0);
    assert_eq!(ColorMap::ByType.color_of(&node, &ctx), Rgb(255, 165, 0));
    node.kind = NodeKind::Uav;
    assert_eq!(ColorMap::ByType.color_of(&node, &ctx), Rgb(63, 140, 255));
    node.kind = NodeKind::Intruder;
    assert_eq!(ColorMap::ByType.color_of(&node, &ctx), Rgb(220, 53, 69));
}

#[test]
fn id_colors_are_deterministic() {
    let ctx = context(0.0, 0, &[]);
    let node = make_node(42, 0.0, 0.0, 10.0);
    let first = ColorMap::ById.color_of(&node, &ctx);
    for _ in 0..10 {
        assert_eq!(ColorMap::ById.color_of(&node, &ctx), first);
    }
    // A different id should not be forced onto the same color as id 42
    // by accident of the fold; check a handful differ somewhere.
    let distinct = (1u64..20)
        .map(|id| ColorMap::ById.color_of(&make_node(id, 0.0, 0.0, 10.0), &ctx))
        .collect::<Vec<_>>();
    assert!(distinct.iter().any(|c| *c != first));
}

#[test]
fn degree_mapping_reads_shared_context() {
    let ctx = context(10.0, 4, &[(1, 0), (2, 4)]);
    let low = ColorMap::ByDegree.color_of(&make_node(1, 0.0, 0.0, 10.0), &ctx);
    let high = ColorMap::ByDegree.color_of(&make_node(2, 0.0, 0.0, 10.0), &ctx);
    // Gradient endpoints: lightest and darkest blue.
    assert_eq!(low, Rgb(227, 242, 253));
    assert_eq!(high, Rgb(13, 71, 161));
}

#[test]
fn degree_mapping_without_radius_is_neutral() {
    let ctx = context(0.0, 4, &[(1, 2)]);
    let color = ColorMap::ByDegree.color_of(&make_node(1, 0.0, 0.0, 0.0), &ctx);
    assert_eq!(color, Rgb(180, 180, 180));
}

#[test]
fn legends_match_strategy_shape() {
    let ctx = context(10.0, 4, &[]);
    match ColorMap::ByType.legend(&ctx) {
        Legend::Categorical { items, .. } => {
            let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
            // Legend entries are title-cased, unlike the node type strings.
            assert_eq!(labels, vec!["Regular", "Uav", "Intruder"]);
        }
        other => panic!("expected categorical legend, got {:?}", other),
    }
    assert!(matches!(ColorMap::ById.legend(&ctx), Legend::Note { .. }));
    match ColorMap::ByDegree.legend(&ctx) {
        Legend::Continuous { colors, .. } => assert_eq!(colors.len(), 2),
        other => panic!("expected continuous legend, got {:?}", other),
    }
}

#[test]
fn hex_rendering() {
    assert_eq!(Rgb(255, 165, 0).to_hex(), "#ffa500");
    assert_eq!(Rgb(0, 0, 0).to_hex(), "#000000");
}
