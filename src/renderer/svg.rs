//! SVG generation from layout results

use crate::layout::{BoundingBox, LayoutResult};
use crate::node::{coerce_text, element, format_number, renderables, Element, Node, Props, Tag};
use crate::text::FontSpec;

use super::attrs::{escape_xml, svg_attribute_name, svg_attribute_value};
use super::defs::{hoist_defs, RenderContext};
use super::SvgConfig;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Props consumed by layout that must not reach the markup
fn layout_only_props(tag: &str) -> &'static [&'static str] {
    match tag {
        "g" | "path" => &["x", "y", "width", "height"],
        "text" => &[
            "x",
            "y",
            "width",
            "height",
            "alignHorizontal",
            "alignVertical",
            "wordWrap",
            "lineHeight",
        ],
        _ => &[],
    }
}

/// Build SVG markup incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    out: String,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            out: String::new(),
            indent: 0,
        }
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn push_line(&mut self, line: &str) {
        let indent = self.indent_str();
        self.out.push_str(&indent);
        self.out.push_str(line);
        let nl = self.newline().to_string();
        self.out.push_str(&nl);
    }

    /// Open a tag that will receive child lines
    pub fn start_element(&mut self, name: &str, attrs: &[(String, String)]) {
        self.push_line(&format!("<{}{}>", name, format_attrs(attrs)));
        self.indent += 1;
    }

    /// Close a tag opened with [`SvgBuilder::start_element`]
    pub fn end_element(&mut self, name: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.push_line(&format!("</{}>", name));
    }

    /// Add a childless element
    pub fn add_empty_element(&mut self, name: &str, attrs: &[(String, String)]) {
        self.push_line(&format!("<{}{}/>", name, format_attrs(attrs)));
    }

    /// Add a complete, already serialized fragment on its own line
    pub fn add_inline(&mut self, markup: &str) {
        self.push_line(markup);
    }

    /// Add escaped character data on its own line
    pub fn add_text(&mut self, text: &str) {
        self.push_line(&escape_xml(text));
    }

    /// Build the final SVG string
    pub fn build(self) -> String {
        let mut svg = String::new();
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(self.newline());
        }
        svg.push_str(&self.out);
        if self.config.pretty_print && svg.ends_with('\n') {
            svg.pop();
        }
        svg
    }
}

fn format_attrs(attrs: &[(String, String)]) -> String {
    attrs
        .iter()
        .map(|(name, value)| format!(r#" {}="{}""#, name, escape_xml(value)))
        .collect()
}

/// Render a LayoutResult to an SVG document string
///
/// `Defs` blocks anywhere in the tree are hoisted into a single `<defs>`,
/// written as the first child of the root, and only when there is at least one.
pub fn render_svg(result: &LayoutResult, config: &SvgConfig) -> String {
    let mut ctx = RenderContext::new();
    let visible = hoist_defs(&result.root, &mut ctx);

    let (root_attrs, content) = match single_svg_root(&visible) {
        Some(root) => (
            provided_root_attrs(&root.props),
            renderables(root.children()).cloned().collect::<Vec<_>>(),
        ),
        None => (synthesized_root_attrs(result.bounds, config.viewbox_padding), visible),
    };

    let mut builder = SvgBuilder::new(config.clone());

    // root-level character data keeps the whole document on one line
    if has_text(&content) {
        let mut children = Vec::with_capacity(content.len() + 1);
        if !ctx.defs.is_empty() {
            children.push(Node::from(element(
                "defs",
                Props::new().with_children(ctx.defs.clone()),
            )));
        }
        children.extend(content);
        builder.add_inline(&inline_markup("svg", &root_attrs, &Node::Fragment(children)));
        return builder.build();
    }

    builder.start_element("svg", &root_attrs);

    if !ctx.defs.is_empty() {
        if has_text(&ctx.defs) {
            builder.add_inline(&inline_markup("defs", &[], &Node::Fragment(ctx.defs.clone())));
        } else {
            builder.start_element("defs", &[]);
            for def in &ctx.defs {
                write_node(def, &mut builder);
            }
            builder.end_element("defs");
        }
    }

    for node in &content {
        write_node(node, &mut builder);
    }

    builder.end_element("svg");
    builder.build()
}

fn has_text(nodes: &[Node]) -> bool {
    nodes
        .iter()
        .flat_map(renderables)
        .any(|node| matches!(node, Node::Text(_)))
}

fn single_svg_root(visible: &[Node]) -> Option<&Element> {
    match visible {
        [Node::Element(el)] if el.tag_name() == Some("svg") => Some(el),
        _ => None,
    }
}

fn provided_root_attrs(props: &Props) -> Vec<(String, String)> {
    let mut attrs = attributes(props, &[]);
    if !attrs.iter().any(|(name, _)| name == "xmlns") {
        attrs.insert(0, ("xmlns".to_string(), SVG_NAMESPACE.to_string()));
    }
    attrs
}

fn synthesized_root_attrs(bounds: Option<BoundingBox>, padding: f64) -> Vec<(String, String)> {
    let mut attrs = vec![("xmlns".to_string(), SVG_NAMESPACE.to_string())];
    if let Some(bounds) = bounds {
        let vb = bounds.pad(padding);
        attrs.push(("width".to_string(), format_number(vb.width)));
        attrs.push(("height".to_string(), format_number(vb.height)));
        attrs.push((
            "viewBox".to_string(),
            format!(
                "{} {} {} {}",
                format_number(vb.x),
                format_number(vb.y),
                format_number(vb.width),
                format_number(vb.height)
            ),
        ));
    }
    attrs
}

/// Attributes of an element in prop order, minus `skip`
fn attributes(props: &Props, skip: &[&str]) -> Vec<(String, String)> {
    props
        .attrs()
        .filter(|(name, _)| !skip.contains(name))
        .filter_map(|(prop, value)| {
            let name = svg_attribute_name(prop)?;
            let value = svg_attribute_value(&name, value)?;
            Some((name, value))
        })
        .collect()
}

fn write_node(node: &Node, builder: &mut SvgBuilder) {
    for item in renderables(node) {
        match item {
            Node::Text(leaf) => builder.add_text(&leaf.to_string()),
            Node::Element(el) => write_element(el, builder),
            Node::Empty | Node::Fragment(_) => {}
        }
    }
}

fn write_element(el: &Element, builder: &mut SvgBuilder) {
    let name = match &el.tag {
        Tag::Primitive(name) => name.as_str(),
        Tag::Component(c) => {
            log::warn!("Skipping unexpanded component '{}' during serialization.", c.name());
            return;
        }
        // already hoisted
        Tag::Reserved(_) => return,
    };

    if name == "text" {
        builder.add_inline(&text_markup(el));
        return;
    }

    let attrs = element_attributes(name, &el.props);
    let children: Vec<&Node> = renderables(el.children()).collect();
    if children.is_empty() {
        builder.add_empty_element(name, &attrs);
    } else if children.iter().any(|c| matches!(c, Node::Text(_))) {
        // mixed content stays on one line so no whitespace is introduced
        builder.add_inline(&inline_markup(name, &attrs, el.children()));
    } else {
        builder.start_element(name, &attrs);
        for child in children {
            write_node(child, builder);
        }
        builder.end_element(name);
    }
}

fn element_attributes(name: &str, props: &Props) -> Vec<(String, String)> {
    if name == "ellipse" && !props.contains("cx") {
        if let (Some(w), Some(h)) = (props.number("width"), props.number("height")) {
            let x = props.number("x").unwrap_or(0.0);
            let y = props.number("y").unwrap_or(0.0);
            let mut attrs = vec![
                ("cx".to_string(), format_number(x + w / 2.0)),
                ("cy".to_string(), format_number(y + h / 2.0)),
                ("rx".to_string(), format_number(w / 2.0)),
                ("ry".to_string(), format_number(h / 2.0)),
            ];
            attrs.extend(attributes(props, &["x", "y", "width", "height"]));
            return attrs;
        }
    }
    attributes(props, layout_only_props(name))
}

/// Serialize a subtree without line breaks
fn inline_markup(name: &str, attrs: &[(String, String)], children: &Node) -> String {
    let mut out = format!("<{}{}>", name, format_attrs(attrs));
    for child in renderables(children) {
        match child {
            Node::Text(leaf) => out.push_str(&escape_xml(&leaf.to_string())),
            Node::Element(el) => {
                if let Some(child_name) = el.tag_name() {
                    if child_name == "text" {
                        out.push_str(&text_markup(el));
                    } else {
                        let child_attrs = element_attributes(child_name, &el.props);
                        if el.children().is_empty() {
                            out.push_str(&format!("<{}{}/>", child_name, format_attrs(&child_attrs)));
                        } else {
                            out.push_str(&inline_markup(child_name, &child_attrs, el.children()));
                        }
                    }
                }
            }
            Node::Empty | Node::Fragment(_) => {}
        }
    }
    out.push_str(&format!("</{}>", name));
    out
}

/// Serialize a text box
///
/// The box is `x`,`y`,`width`,`height`. Horizontal alignment picks the anchor
/// point and `text-anchor`; vertical alignment places the block of lines inside
/// the box. Lines hang from their y position unless a baseline is given.
fn text_markup(el: &Element) -> String {
    let props = &el.props;
    let defaults = FontSpec::default();
    let x = props.number("x").unwrap_or(0.0);
    let y = props.number("y").unwrap_or(0.0);
    let width = props.number("width").unwrap_or(0.0);
    let height = props.number("height").unwrap_or(0.0);
    let font_size = props.number("fontSize").unwrap_or(defaults.font_size);
    let line_height = props.number("lineHeight").unwrap_or(defaults.line_height);
    let step = font_size * line_height;

    let (anchor_x, anchor) = match props.str("alignHorizontal") {
        Some("center") => (x + width / 2.0, Some("middle")),
        Some("right") => (x + width, Some("end")),
        Some("left") => (x, Some("start")),
        _ => (x, None),
    };

    let has_elements = renderables(el.children()).any(Node::is_element);
    let content = coerce_text(el.children());
    let lines: Vec<&str> = content.split('\n').collect();
    let line_count = if has_elements { 1 } else { lines.len() };
    let block = step * line_count as f64;
    let top = match props.str("alignVertical") {
        Some("middle") => y + (height - block) / 2.0,
        Some("bottom") => y + height - block,
        _ => y,
    };

    let mut attrs = vec![
        ("x".to_string(), format_number(anchor_x)),
        ("y".to_string(), format_number(top)),
    ];
    attrs.extend(attributes(props, layout_only_props("text")));
    if let Some(anchor) = anchor {
        if !props.contains("textAnchor") {
            attrs.push(("text-anchor".to_string(), anchor.to_string()));
        }
    }
    if !props.contains("dominantBaseline") {
        attrs.push(("dominant-baseline".to_string(), "hanging".to_string()));
    }

    let mut out = format!("<text{}>", format_attrs(&attrs));
    if has_elements {
        for child in renderables(el.children()) {
            match child {
                Node::Text(leaf) => out.push_str(&escape_xml(&leaf.to_string())),
                Node::Element(child_el) => {
                    if let Some(child_name) = child_el.tag_name() {
                        let child_attrs = element_attributes(child_name, &child_el.props);
                        out.push_str(&inline_markup(child_name, &child_attrs, child_el.children()));
                    }
                }
                Node::Empty | Node::Fragment(_) => {}
            }
        }
    } else if lines.len() == 1 {
        out.push_str(&escape_xml(&content));
    } else {
        for (i, line) in lines.iter().enumerate() {
            out.push_str(&format!(
                r#"<tspan x="{}" y="{}">{}</tspan>"#,
                format_number(anchor_x),
                format_number(top + step * i as f64),
                escape_xml(line)
            ));
        }
    }
    out.push_str("</text>");
    out
}
