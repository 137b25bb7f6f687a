//! End-to-end tests for the render pipeline: expansion, layout, defs hoisting
//! and serialization.

use pretty_assertions::assert_eq;

use vnode_svg::layout::{self, BoundingBox, LayoutConfig};
use vnode_svg::node::{builder, Component, Node, Props};
use vnode_svg::text::{FontCatalog, FontSpec, MeasureError, TextMeasurer, TextSize};
use vnode_svg::{render_with_measurer, RenderConfig, SvgConfig};

/// Half an em per char, one line box per line
struct HalfEm;

impl FontCatalog for HalfEm {
    fn has_family(&self, _family: &str) -> bool {
        false
    }
}

impl TextMeasurer for HalfEm {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<TextSize, MeasureError> {
        let lines: Vec<&str> = text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Ok(TextSize::new(
            longest as f64 * font.font_size * 0.5,
            lines.len() as f64 * font.font_size * font.line_height,
        ))
    }
}

fn gradient_box() -> Component {
    Component::new("GradientBox", |props: &Props| {
        let id = props.str("id").unwrap_or("grad").to_string();
        let color = props.str("color").unwrap_or("black").to_string();
        let x = props.number("x").unwrap_or(0.0);
        Node::from(vec![
            Node::from(builder::defs(builder::element(
                "linearGradient",
                Props::new().with("id", id.as_str()).with_children(builder::element(
                    "stop",
                    Props::new().with("offset", 0).with("stopColor", color),
                )),
            ))),
            Node::from(builder::rect(
                Props::new()
                    .with("x", x)
                    .with("y", 0)
                    .with("width", 10)
                    .with("height", 10)
                    .with("fill", format!("url(#{})", id)),
            )),
        ])
    })
}

fn compact() -> RenderConfig {
    RenderConfig::new().with_svg(SvgConfig::compact())
}

#[test]
fn test_defs_from_separate_components_share_one_block() {
    let gradient = gradient_box();
    let tree = Node::from(builder::group(Props::new().with_children(vec![
        builder::component(&gradient, Props::new().with("id", "a").with("color", "red")),
        builder::component(
            &gradient,
            Props::new().with("id", "b").with("color", "blue").with("x", 20),
        ),
    ])));

    let svg = render_with_measurer(&tree, &HalfEm, &compact()).unwrap();
    insta::assert_snapshot!(svg, @r###"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="10" viewBox="0 0 30 10"><defs><linearGradient id="a"><stop offset="0" stop-color="red"/></linearGradient><linearGradient id="b"><stop offset="0" stop-color="blue"/></linearGradient></defs><g><rect x="0" y="0" width="10" height="10" fill="url(#a)"/><rect x="20" y="0" width="10" height="10" fill="url(#b)"/></g></svg>"###);
}

#[test]
fn test_defs_deep_inside_components() {
    let gradient = gradient_box();
    let wrapper = {
        let gradient = gradient.clone();
        Component::new("Wrapper", move |props: &Props| {
            Node::from(builder::group(
                Props::new().with_children(builder::component(&gradient, props.clone())),
            ))
        })
    };
    let outer = {
        let wrapper = wrapper.clone();
        Component::new("Outer", move |props: &Props| {
            Node::from(builder::component(&wrapper, props.clone()))
        })
    };
    let tree = Node::from(builder::component(&outer, Props::new().with("id", "deep")));

    let svg = render_with_measurer(&tree, &HalfEm, &compact()).unwrap();
    assert_eq!(svg.matches("<defs>").count(), 1);
    assert!(svg.starts_with(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><defs><linearGradient id="deep">"#
    ));
    assert!(!svg.contains("Defs"));
}

#[test]
fn test_text_in_group_pretty() {
    let tree = Node::from(builder::group(Props::new().with_children(builder::text(
        Props::new()
            .with("x", 5)
            .with("y", 5)
            .with("fontSize", 10)
            .with("alignHorizontal", "center"),
        "Hello",
    ))));
    let config = RenderConfig::new().with_svg(SvgConfig::new().with_viewbox_padding(2.0));

    let svg = render_with_measurer(&tree, &HalfEm, &config).unwrap();
    assert_eq!(
        svg,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="30" height="19" viewBox="3 3 30 19">
  <g>
    <text x="18" y="5" font-size="10" font-family="sans-serif" text-anchor="middle" dominant-baseline="hanging">Hello</text>
  </g>
</svg>"#
    );
}

#[test]
fn test_layout_bounds_of_mixed_content() {
    let tree = Node::from(vec![
        Node::from(builder::text(Props::new().with("x", 100).with("fontSize", 20), "ab")),
        Node::from(builder::ellipse(
            Props::new()
                .with("cx", 0)
                .with("cy", 0)
                .with("rx", 5)
                .with("ry", 5),
        )),
        Node::Empty,
        Node::from("stray text"),
    ]);

    let result = layout::compute(&tree, &HalfEm, &LayoutConfig::default()).unwrap();
    // text: 2 * 20 * 0.5 = 20 -> 20.2 -> 21 wide; 20 * 1.4 = 28 -> 28.28 -> 29 high
    assert_eq!(result.bounds, Some(BoundingBox::new(-5.0, -5.0, 126.0, 34.0)));
}

#[test]
fn test_render_calls_are_independent() {
    let gradient = gradient_box();
    let tree = Node::from(builder::component(&gradient, Props::new().with("id", "once")));

    let first = render_with_measurer(&tree, &HalfEm, &compact()).unwrap();
    let second = render_with_measurer(&tree, &HalfEm, &compact()).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.matches(r#"id="once""#).count(), 1);
}

#[test]
fn test_explicit_sizes_survive() {
    let tree = Node::from(builder::text(
        Props::new().with("width", 300).with("height", 40),
        "sized by the caller",
    ));
    let svg = render_with_measurer(&tree, &HalfEm, &compact()).unwrap();
    assert!(svg.contains(r#"width="300" height="40" viewBox="0 0 300 40""#));
}

#[test]
fn test_no_defs_without_defs_nodes() {
    let tree = Node::from(builder::rect(Props::new().with("width", 1).with("height", 1)));
    let svg = render_with_measurer(&tree, &HalfEm, &compact()).unwrap();
    assert!(!svg.contains("<defs"));
}

#[test]
fn test_clone_element_does_not_touch_original() {
    let original = builder::rect(Props::new().with("width", 10).with("height", 10).with("fill", "red"));
    let derived = vnode_svg::clone_element(&original, Props::new().with("fill", "blue"));

    let a = render_with_measurer(&Node::from(original.clone()), &HalfEm, &compact()).unwrap();
    let b = render_with_measurer(&Node::from(derived), &HalfEm, &compact()).unwrap();
    assert!(a.contains(r#"fill="red""#));
    assert!(b.contains(r#"fill="blue""#));
    assert_eq!(original.props.str("fill"), Some("red"));
}

#[test]
fn test_single_rect_with_two_gradient_components() {
    let gradient_defs = |id: &'static str| {
        Component::new(id, move |_: &Props| {
            Node::from(builder::defs(builder::element(
                "linearGradient",
                Props::new().with("id", id),
            )))
        })
    };
    let first = gradient_defs("g1");
    let second = gradient_defs("g2");
    let tree = Node::from(vec![
        builder::component(&first, Props::new()),
        builder::component(&second, Props::new()),
        builder::rect(
            Props::new()
                .with("width", 100)
                .with("height", 100)
                .with("fill", "url(#g1)"),
        ),
    ]);

    let svg = render_with_measurer(&tree, &HalfEm, &compact()).unwrap();
    assert_eq!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100"><defs><linearGradient id="g1"/><linearGradient id="g2"/></defs><rect width="100" height="100" fill="url(#g1)"/></svg>"#
    );
}

#[test]
fn test_defs_at_several_depths_keep_encounter_order() {
    fn nest(depth: usize, inner: Node) -> Node {
        (0..depth).fold(inner, |acc, _| {
            Node::from(builder::group(Props::new().with_children(acc)))
        })
    }
    let def = |id: &str| {
        Node::from(builder::defs(builder::element("pattern", Props::new().with("id", id))))
    };
    let tree = Node::from(vec![nest(0, def("d0")), nest(2, def("d2")), nest(3, def("d3"))]);

    let svg = render_with_measurer(&tree, &HalfEm, &compact()).unwrap();
    assert_eq!(svg.matches("<defs>").count(), 1);
    assert!(svg.contains(
        r#"<defs><pattern id="d0"/><pattern id="d2"/><pattern id="d3"/></defs>"#
    ));
    assert!(!svg.contains("Defs"));
}

#[test]
fn test_offset_group_keeps_children_visible() {
    let tree = Node::from(builder::group(
        Props::new()
            .with("x", 100)
            .with("y", 100)
            .with_children(builder::rect(Props::new().with("width", 50).with("height", 50))),
    ));

    let svg = render_with_measurer(&tree, &HalfEm, &compact()).unwrap();
    assert_eq!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="50" height="50" viewBox="0 0 50 50"><g><rect width="50" height="50"/></g></svg>"#
    );
}
