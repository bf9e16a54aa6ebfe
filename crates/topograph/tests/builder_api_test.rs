//! Integration tests for the TopographBuilder API
//!
//! These tests verify that the public API works end to end.

use topograph::{
    TopographBuilder, TopographError,
    builtin,
    config::{AppConfig, CanvasConfig, LayoutConfig, MissingIconPolicy, StyleConfig},
    icons::{IconError, IconMap, InlineIcons, Layered, NoIcons},
    topology::TopologyError,
};

const SOURCE: &str = r#"
    [[node]]
    id = "A"
    title = "Router"
    icon = "assets/icons/router.png"

    [[node]]
    id = "G1"
    title = "Switch"
    icon = "assets/icons/switch.png"

    [[node]]
    id = "D1"
    title = "PC"

    [[edge]]
    source = "A"
    target = "G1"
    style = "solid"

    [[edge]]
    source = "G1"
    target = "D1"
    style = "dashed"
"#;

#[test]
fn test_builder_api_exists() {
    let _builder = TopographBuilder::default();
}

#[test]
fn test_parse_simple_topology() {
    let builder = TopographBuilder::default();
    let result = builder.parse(SOURCE);
    assert!(
        result.is_ok(),
        "Should parse valid topology: {:?}",
        result.err()
    );
    assert_eq!(result.unwrap().node_count(), 3);
}

#[test]
fn test_parse_unknown_node_returns_error() {
    let source = r#"
        [[node]]
        id = "A"

        [[edge]]
        source = "A"
        target = "Z"
    "#;

    let builder = TopographBuilder::default();
    let result = builder.parse(source);
    assert!(matches!(
        result,
        Err(TopographError::Topology(TopologyError::UnknownNode { .. }))
    ));
}

#[test]
fn test_parse_invalid_syntax_returns_error() {
    let builder = TopographBuilder::default();
    let result = builder.parse("this is not a topology!!!");
    assert!(matches!(
        result,
        Err(TopographError::Topology(TopologyError::Parse(_)))
    ));
}

#[test]
fn test_render_simple_topology() {
    let builder = TopographBuilder::default();
    let topology = builder.parse(SOURCE).expect("Failed to parse topology");
    let icons = InlineIcons::from_topology(&topology);

    let svg = builder
        .render_svg(topology, &icons)
        .expect("Failed to render topology");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("href=\"assets/icons/router.png\""));
    // D1 has no icon and the default policy draws a placeholder
    assert!(svg.contains("class=\"placeholder\""));
}

#[test]
fn test_render_fails_on_missing_icon_when_strict() {
    let config = AppConfig::new(
        LayoutConfig::default(),
        CanvasConfig::default(),
        StyleConfig::default().with_missing_icon(MissingIconPolicy::Fail),
    );
    let builder = TopographBuilder::new(config);
    let topology = builder.parse(SOURCE).unwrap();

    let result = builder.render_svg(topology, &NoIcons);
    assert!(matches!(
        result,
        Err(TopographError::Icons(IconError::Missing(_)))
    ));
}

#[test]
fn test_icon_map_overrides_inline_icons() {
    let builder = TopographBuilder::default();
    let topology = builder.parse(SOURCE).unwrap();

    let overrides = IconMap::from_json_str(r#"{"A": "theme/router.svg", "D1": "theme/pc.svg"}"#)
        .unwrap();
    let icons = Layered::new(overrides, InlineIcons::from_topology(&topology));

    let svg = builder.render_svg(topology, &icons).unwrap();
    assert!(svg.contains("href=\"theme/router.svg\""));
    assert!(svg.contains("href=\"theme/pc.svg\""));
    assert!(svg.contains("href=\"assets/icons/switch.png\""));
    assert!(!svg.contains("class=\"placeholder\""));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config: AppConfig = toml::from_str("[layout]\nvelocity_decay = 2.0\n").unwrap();
    let builder = TopographBuilder::new(config);
    let topology = builder.parse(SOURCE).unwrap();

    assert!(matches!(
        builder.render_svg(topology, &NoIcons),
        Err(TopographError::Config(_))
    ));
}

#[test]
fn test_builder_reusability() {
    let builder = TopographBuilder::default();

    let first = builder.parse(SOURCE).expect("Failed to parse topology");
    let svg1 = builder
        .render_svg(first, &NoIcons)
        .expect("Failed to render first topology");

    let office = builtin::office_network().expect("Builtin network is valid");
    let icons = InlineIcons::from_topology(&office);
    let svg2 = builder
        .render_svg(office, &icons)
        .expect("Failed to render office network");

    assert!(svg1.contains("<svg"), "First SVG should be valid");
    assert!(svg2.contains("<svg"), "Second SVG should be valid");
    assert_eq!(svg2.matches("<line").count(), 10);
    assert_eq!(svg2.matches("<image").count(), 11);
}
