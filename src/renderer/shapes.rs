//! Declarative shape tree built from the scene
//!
//! The tree is rebuilt every frame. Transforms are composed here from the
//! numeric pose fields and serialized only by `renderer::svg`.

use glam::Vec2;

use crate::sim::koi::Koi;
use crate::sim::lily::{LilyPad, LilyShape};
use crate::sim::outline::Outline;
use crate::sim::state::{NodeRef, Scene};

/// Translate, then rotate (degrees), then scale; optionally about a pivot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Vec2,
    pub rotate: f32,
    pub scale: f32,
    /// Rotation and scale happen around this local point
    pub pivot: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        rotate: 0.0,
        scale: 1.0,
        pivot: Vec2::ZERO,
    };

    pub fn new(translate: Vec2, rotate: f32, scale: f32) -> Self {
        Self {
            translate,
            rotate,
            scale,
            pivot: Vec2::ZERO,
        }
    }

    /// Uniform scale about `pivot`
    pub fn scale_about(pivot: Vec2, scale: f32) -> Self {
        Self {
            scale,
            pivot,
            ..Self::IDENTITY
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Map a local point into the parent space
    pub fn apply(&self, p: Vec2) -> Vec2 {
        let local = (p - self.pivot) * self.scale;
        let (s, c) = self.rotate.to_radians().sin_cos();
        let rotated = Vec2::new(local.x * c - local.y * s, local.x * s + local.y * c);
        rotated + self.pivot + self.translate
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Ellipse { rx: f32, ry: f32 },
    Circle { r: f32 },
    Path(Outline),
}

/// A clip region attached to a group
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub id: String,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group {
        class: Option<&'static str>,
        transform: Transform,
        opacity: f32,
        clip: Option<Clip>,
        children: Vec<Node>,
    },
    Shape {
        shape: Shape,
        fill: &'static str,
        transform: Transform,
    },
}

impl Node {
    pub fn group(children: Vec<Node>) -> Self {
        Node::Group {
            class: None,
            transform: Transform::IDENTITY,
            opacity: 1.0,
            clip: None,
            children,
        }
    }

    pub fn shape(shape: Shape, fill: &'static str) -> Self {
        Node::Shape {
            shape,
            fill,
            transform: Transform::IDENTITY,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Group { children, .. } => children,
            Node::Shape { .. } => &[],
        }
    }

    pub fn class(&self) -> Option<&'static str> {
        match self {
            Node::Group { class, .. } => *class,
            Node::Shape { .. } => None,
        }
    }
}

/// Root group with one child per render stack entry
pub fn build_scene(scene: &Scene) -> Node {
    let children = scene
        .stack
        .iter()
        .filter_map(|node| match *node {
            NodeRef::Koi(id) => scene.koi(id).map(koi_node),
            NodeRef::LilyPad(id) => scene.lily_pad(id).map(lily_node),
        })
        .collect();
    Node::group(children)
}

pub fn koi_clip_id(id: u32) -> String {
    format!("koi-clip-{id}")
}

/// Body, tail and a patch group clipped to the body ellipse
pub fn koi_node(koi: &Koi) -> Node {
    let body_fill = koi.variant.body_fill();
    let ry = koi.current_body_ry();
    let body = Shape::Ellipse { rx: koi.body.rx, ry };

    let mut children = vec![Node::shape(body.clone(), body_fill)];
    if let Some(tail) = koi.current_tail() {
        children.push(Node::shape(Shape::Path(tail), body_fill));
    }

    let patch_fill = koi.variant.patch_fill();
    let patches = koi
        .patches
        .iter()
        .enumerate()
        .map(|(i, patch)| {
            let pivot = patch
                .outline
                .control_bounds()
                .map(|(min, max)| (min + max) / 2.0)
                .unwrap_or(Vec2::ZERO);
            Node::Shape {
                shape: Shape::Path(patch.outline.clone()),
                fill: patch_fill,
                transform: Transform::scale_about(pivot, koi.current_patch_scale(i)),
            }
        })
        .collect();
    children.push(Node::Group {
        class: Some("koi-patches"),
        transform: Transform::IDENTITY,
        opacity: 1.0,
        clip: Some(Clip {
            id: koi_clip_id(koi.id),
            shape: body,
        }),
        children: patches,
    });

    Node::Group {
        class: Some("koi"),
        transform: Transform::new(koi.pose.pos, koi.pose.heading, koi.scale),
        opacity: koi.opacity,
        clip: None,
        children,
    }
}

pub fn lily_shape(shape: &LilyShape, radius: f32) -> Shape {
    match shape {
        LilyShape::Circle => Shape::Circle { r: radius },
        LilyShape::Oval { aspect } => Shape::Ellipse {
            rx: radius,
            ry: radius * aspect,
        },
        other => match other.outline() {
            Some(outline) => Shape::Path(outline),
            None => Shape::Circle { r: radius },
        },
    }
}

pub fn lily_node(pad: &LilyPad) -> Node {
    let shape = lily_shape(&pad.shape, crate::consts::LILY_BASE_RADIUS);
    Node::Group {
        class: Some("lily-pad"),
        transform: Transform::new(pad.pos, pad.current_rotation(), pad.scale),
        opacity: 1.0,
        clip: None,
        children: vec![Node::shape(shape, pad.color)],
    }
}
