//! SVG serialization of the shape tree
//!
//! Produces markup for the live `<svg>` element (inner fragment) and for
//! standalone snapshot files.

use super::shapes::{Clip, Node, Shape, Transform};
use crate::platform::viewport::{Align, FitMode, Viewport};
use crate::sim::canvas::Canvas;
use crate::sim::outline::{Outline, PathCmd};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Water color behind everything in standalone documents
pub const POND_COLOR: &str = "#1b4965";

/// Format a number with at most two decimals, trailing zeros trimmed
pub fn fmt_num(v: f32) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        s => s.to_string(),
    }
}

fn fmt_point(p: glam::Vec2) -> String {
    format!("{},{}", fmt_num(p.x), fmt_num(p.y))
}

/// SVG path data for an outline
pub fn path_data(outline: &Outline) -> String {
    outline
        .cmds
        .iter()
        .map(|cmd| match *cmd {
            PathCmd::MoveTo(p) => format!("M {}", fmt_point(p)),
            PathCmd::LineTo(p) => format!("L {}", fmt_point(p)),
            PathCmd::QuadTo(c, p) => format!("Q {} {}", fmt_point(c), fmt_point(p)),
            PathCmd::CubicTo(c1, c2, p) => {
                format!("C {} {} {}", fmt_point(c1), fmt_point(c2), fmt_point(p))
            }
            PathCmd::ArcTo {
                radius,
                large_arc,
                sweep,
                to,
            } => format!(
                "A {r},{r} 0 {} {} {}",
                large_arc as u8,
                sweep as u8,
                fmt_point(to),
                r = fmt_num(radius)
            ),
            PathCmd::Close => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `transform` attribute value, `None` for the identity
pub fn transform_attr(t: &Transform) -> Option<String> {
    if t.is_identity() {
        return None;
    }
    let mut parts = Vec::new();
    let origin = t.translate + t.pivot;
    if origin != glam::Vec2::ZERO {
        parts.push(format!("translate({}, {})", fmt_num(origin.x), fmt_num(origin.y)));
    }
    if t.rotate != 0.0 {
        parts.push(format!("rotate({})", fmt_num(t.rotate)));
    }
    if t.scale != 1.0 {
        parts.push(format!("scale({})", fmt_num(t.scale)));
    }
    if t.pivot != glam::Vec2::ZERO {
        parts.push(format!(
            "translate({}, {})",
            fmt_num(-t.pivot.x),
            fmt_num(-t.pivot.y)
        ));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn shape_markup(shape: &Shape, attrs: &str) -> String {
    match shape {
        Shape::Ellipse { rx, ry } => format!(
            r#"<ellipse cx="0" cy="0" rx="{}" ry="{}"{attrs}/>"#,
            fmt_num(*rx),
            fmt_num(*ry)
        ),
        Shape::Circle { r } => format!(r#"<circle cx="0" cy="0" r="{}"{attrs}/>"#, fmt_num(*r)),
        Shape::Path(outline) => format!(r#"<path d="{}"{attrs}/>"#, path_data(outline)),
    }
}

fn clip_markup(clip: &Clip) -> String {
    format!(
        r#"<clipPath id="{}">{}</clipPath>"#,
        clip.id,
        shape_markup(&clip.shape, "")
    )
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Shape {
            shape,
            fill,
            transform,
        } => {
            let mut attrs = format!(r#" fill="{fill}""#);
            if let Some(t) = transform_attr(transform) {
                attrs.push_str(&format!(r#" transform="{t}""#));
            }
            out.push_str(&shape_markup(shape, &attrs));
        }
        Node::Group {
            class,
            transform,
            opacity,
            clip,
            children,
        } => {
            if let Some(clip) = clip {
                out.push_str(&clip_markup(clip));
            }
            out.push_str("<g");
            if let Some(class) = class {
                out.push_str(&format!(r#" class="{class}""#));
            }
            if let Some(t) = transform_attr(transform) {
                out.push_str(&format!(r#" transform="{t}""#));
            }
            if *opacity < 1.0 {
                out.push_str(&format!(r#" opacity="{}""#, fmt_num(opacity.max(0.0))));
            }
            if let Some(clip) = clip {
                out.push_str(&format!(r#" clip-path="url(#{})""#, clip.id));
            }
            out.push('>');
            for child in children {
                write_node(out, child);
            }
            out.push_str("</g>");
        }
    }
}

/// Markup for the contents of the live `<svg>` element
pub fn to_svg_fragment(root: &Node) -> String {
    let mut out = String::with_capacity(16 * 1024);
    write_node(&mut out, root);
    out
}

/// Standalone SVG document
pub fn to_svg_document(root: &Node, canvas: Canvas, fit: FitMode, align: Align) -> String {
    let w = fmt_num(canvas.width);
    let h = fmt_num(canvas.height);
    format!(
        r#"<svg xmlns="{SVG_NS}" id="pond" width="100%" height="100%" viewBox="0 0 {w} {h}" preserveAspectRatio="{}"><rect width="{w}" height="{h}" fill="{POND_COLOR}"/>{}</svg>"#,
        Viewport::preserve_aspect_ratio(fit, align),
        to_svg_fragment(root)
    ) + "\n"
}
