//! Bounding boxes of elements and element sequences

use crate::node::{elements_only, Element, Props};

use super::types::BoundingBox;

/// Bounds of a single element
///
/// Elements carrying `width` and `height` report them directly, with `x`/`y`
/// defaulting to 0. Ellipses and circles may instead be described by their
/// center and radii. Anything else reports the union of its child elements,
/// which is absent when there are none. `Defs` never has bounds.
pub fn get_element_bounds(el: &Element) -> Option<BoundingBox> {
    if el.is_defs() {
        return None;
    }

    let props = &el.props;
    if let (Some(width), Some(height)) = (props.number("width"), props.number("height")) {
        return Some(BoundingBox::new(
            props.number("x").unwrap_or(0.0),
            props.number("y").unwrap_or(0.0),
            width.max(0.0),
            height.max(0.0),
        ));
    }

    if let Some(bounds) = radial_bounds(el.tag_name(), props) {
        return Some(bounds);
    }

    get_elements_bounds(elements_only(el.children()))
}

fn radial_bounds(tag: Option<&str>, props: &Props) -> Option<BoundingBox> {
    let (rx, ry) = match tag? {
        "ellipse" => (props.number("rx")?, props.number("ry")?),
        "circle" => {
            let r = props.number("r")?;
            (r, r)
        }
        _ => return None,
    };
    let (rx, ry) = (rx.max(0.0), ry.max(0.0));
    let cx = props.number("cx").unwrap_or(0.0);
    let cy = props.number("cy").unwrap_or(0.0);
    Some(BoundingBox::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry))
}

/// Union bounds of a sequence of elements; absent if none has bounds
pub fn get_elements_bounds<'a, I>(elements: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a Element>,
{
    get_combined_bounds(elements.into_iter().filter_map(get_element_bounds))
}

/// Minimal rectangle covering every input rectangle; absent for no input
pub fn get_combined_bounds<I>(bounds: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = BoundingBox>,
{
    bounds.into_iter().reduce(|acc, b| acc.union(&b))
}
