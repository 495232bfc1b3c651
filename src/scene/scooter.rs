use glam::{Mat4, Vec3};

use super::animation::AnimationState;
use super::transform::Transform;
use crate::config::ScooterVariant;

/// Which prebuilt mesh a part draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartMesh {
    Cube,
    Cylinder,
    Wheel,
}

/// One node of the scooter tree.
///
/// `pivot` (and the steering rotation when `steers` is set) is inherited by
/// the children; `shape` only places this node's own mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct PartNode {
    pub name: &'static str,
    pub parent: Option<usize>,
    pub pivot: Transform,
    pub steers: bool,
    pub shape: Transform,
    pub mesh: Option<PartMesh>,
}

impl PartNode {
    fn group(name: &'static str, pivot: Transform) -> Self {
        Self {
            name,
            parent: None,
            pivot,
            steers: false,
            shape: Transform::IDENTITY,
            mesh: None,
        }
    }

    fn part(name: &'static str, mesh: PartMesh, shape: Transform) -> Self {
        Self {
            name,
            parent: None,
            pivot: Transform::IDENTITY,
            steers: false,
            shape,
            mesh: Some(mesh),
        }
    }

    fn steering(mut self) -> Self {
        self.steers = true;
        self
    }

    fn with_pivot(mut self, pivot: Transform) -> Self {
        self.pivot = pivot;
        self
    }

    /// Matrix this node contributes to itself and its subtree.
    pub fn local_matrix(&self, animation: &AnimationState) -> Mat4 {
        let pivot = self.pivot.to_matrix();
        if self.steers {
            pivot * Mat4::from_rotation_y(animation.steering_angle.to_radians())
        } else {
            pivot
        }
    }
}

// Placement, in deck space (X forward, Y up, Z to the rider's right).
const DECK_SCALE: Vec3 = Vec3::new(1.3, 0.1, 0.3);
const FRONT_PIVOT: Vec3 = Vec3::new(1.35, 0.0, 0.0);
const REAR_HUB: Vec3 = Vec3::new(-1.35, -0.3, 0.0);
const FRONT_HUB: Vec3 = Vec3::new(0.0, -0.3, 0.0);
const BAR_HEIGHT: f32 = 2.2;
const BAR_HALF_LENGTH: f32 = 0.6;
const ARM_OFFSET: f32 = 0.13;

/// Fixed part tree of one scooter variant. Parents always precede children.
#[derive(Debug, Clone, PartialEq)]
pub struct ScooterModel {
    pub variant: ScooterVariant,
    nodes: Vec<PartNode>,
    children: Vec<Vec<usize>>,
}

impl ScooterModel {
    pub fn new(variant: ScooterVariant) -> Self {
        let full = !matches!(variant, ScooterVariant::Minimal);
        let mut model = Self {
            variant,
            nodes: Vec::new(),
            children: Vec::new(),
        };

        let deck = model.add(None, PartNode::part("deck", PartMesh::Cube, Transform::new().with_scale(DECK_SCALE)));

        let front = model.add(
            Some(deck),
            PartNode::group("front", Transform::from_position(FRONT_PIVOT)).steering(),
        );
        model.add(
            Some(front),
            PartNode::part(
                "column",
                PartMesh::Cylinder,
                Transform::from_position(Vec3::new(0.0, BAR_HEIGHT / 2.0, 0.0))
                    .with_scale(Vec3::new(0.5, BAR_HEIGHT, 0.5)),
            ),
        );
        model.add(
            Some(front),
            PartNode::part(
                "handlebar",
                PartMesh::Cylinder,
                Transform::from_position(Vec3::new(0.0, BAR_HEIGHT, 0.0))
                    .with_rotation_degrees(90.0, 0.0, 0.0)
                    .with_scale(Vec3::new(0.5, BAR_HALF_LENGTH * 2.0, 0.5)),
            ),
        );
        if full {
            for (name, side) in [("left handle", -1.0), ("right handle", 1.0)] {
                model.add(
                    Some(front),
                    PartNode::part(
                        name,
                        PartMesh::Cylinder,
                        Transform::from_position(Vec3::new(0.0, BAR_HEIGHT, side * BAR_HALF_LENGTH))
                            .with_rotation_degrees(90.0, 0.0, 0.0)
                            .with_scale(Vec3::new(0.7, 0.3, 0.7)),
                    ),
                );
            }
        }
        model.add(
            Some(front),
            PartNode::part("front wheel", PartMesh::Wheel, Transform::new().with_rotation_degrees(90.0, 0.0, 0.0))
                .with_pivot(Transform::from_position(FRONT_HUB)),
        );

        let rear = model.add(Some(deck), PartNode::group("rear", Transform::from_position(REAR_HUB)));
        if full {
            for (name, side) in [("left support arm", -1.0), ("right support arm", 1.0)] {
                model.add(
                    Some(rear),
                    PartNode::part(
                        name,
                        PartMesh::Cylinder,
                        Transform::from_position(Vec3::new(0.0, 0.15, side * ARM_OFFSET))
                            .with_scale(Vec3::new(0.3, 0.3, 0.3)),
                    ),
                );
            }
        }
        model.add(
            Some(rear),
            PartNode::part("rear wheel", PartMesh::Wheel, Transform::new().with_rotation_degrees(90.0, 0.0, 0.0)),
        );

        model
    }

    fn add(&mut self, parent: Option<usize>, mut node: PartNode) -> usize {
        let index = self.nodes.len();
        node.parent = parent;
        self.nodes.push(node);
        self.children.push(Vec::new());
        if let Some(parent) = parent {
            self.children[parent].push(index);
        }
        index
    }

    pub fn nodes(&self) -> &[PartNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &PartNode {
        &self.nodes[index]
    }

    pub fn children(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(index, _)| index)
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.name == name)
    }

    pub fn part_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.mesh.is_some()).count()
    }

    /// World matrix of every node's pivot, computed parent-first.
    pub fn world_matrices(&self, animation: &AnimationState) -> Vec<Mat4> {
        let mut worlds: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let parent = node.parent.map_or(Mat4::IDENTITY, |parent| worlds[parent]);
            worlds.push(parent * node.local_matrix(animation));
        }
        worlds
    }

    /// Model matrix of every drawn part, keyed by node index.
    pub fn part_matrices(&self, animation: &AnimationState) -> Vec<(usize, Mat4)> {
        self.world_matrices(animation)
            .into_iter()
            .zip(&self.nodes)
            .enumerate()
            .filter(|(_, (_, node))| node.mesh.is_some())
            .map(|(index, (world, node))| (index, world * node.shape.to_matrix()))
            .collect()
    }
}
