//! Arena-based Barnes-Hut quadtree.
//!
//! Nodes are stored contiguously in a `Vec` and reference their children by
//! index instead of by pointer. The tree is rebuilt from scratch every tick by
//! inserting particles one at a time, so there is no incremental update and no
//! parent back-link.
//!
//! Each node owns a [`Quadrant`] and an [`Occupant`]:
//! - a vacant node holds nothing,
//! - a leaf holds a copy of exactly one real particle,
//! - an internal node holds the aggregate (total mass, center of mass and
//!   mass-weighted velocity) of everything beneath it and four children.
//!
//! # Example
//!
//! ```rust
//! use spacesim::particle::{Particle, ParticleId};
//! use spacesim::quadrant::Quadrant;
//! use spacesim::tree::SpatialTree;
//!
//! let mut tree = SpatialTree::new(Quadrant::centered_at_origin(4.0));
//! tree.insert(Particle::from_arrays(1.0, [-1.0, -1.0], [0.0, 0.0]).with_id(ParticleId(0)));
//! tree.insert(Particle::from_arrays(3.0, [1.0, 1.0], [0.0, 0.0]).with_id(ParticleId(1)));
//!
//! let root = tree.node(tree.root());
//! assert_eq!(root.resident().map(|p| p.mass), Some(4.0));
//! assert_eq!(tree.leaves().len(), 2);
//! ```

use log::warn;
use nalgebra::Vector2;

use crate::gravity::Gravity;
use crate::particle::Particle;
use crate::quadrant::Quadrant;

/// Depth below which quadrants are no longer subdivided.
///
/// Only reachable by (nearly) coincident particles; a leaf at this depth turns
/// into a [`Occupant::Bucket`] instead of splitting.
pub const MAX_DEPTH: u32 = 64;

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "NodeId overflow");
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a tree node currently holds.
#[derive(Clone, Debug)]
pub enum Occupant {
    /// No particle in this region yet
    Vacant,

    /// Exactly one real particle
    Leaf(Particle),

    /// Several particles too close together to separate within [`MAX_DEPTH`]
    Bucket {
        aggregate: Particle,
        members: Vec<Particle>,
    },

    /// Subdivided region
    Internal {
        /// Combined mass, center of mass and mean velocity of the subtree
        aggregate: Particle,
        /// Children in `[NW, NE, SW, SE]` order
        children: [NodeId; 4],
    },
}

#[derive(Clone, Debug)]
pub struct Node {
    quadrant: Quadrant,
    depth: u32,
    occupant: Occupant,
}

impl Node {
    fn vacant(quadrant: Quadrant, depth: u32) -> Self {
        Node {
            quadrant,
            depth,
            occupant: Occupant::Vacant,
        }
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn occupant(&self) -> &Occupant {
        &self.occupant
    }

    /// The resident particle: the real particle of a leaf, or the aggregate
    /// of an internal node or bucket.
    pub fn resident(&self) -> Option<&Particle> {
        match &self.occupant {
            Occupant::Vacant => None,
            Occupant::Leaf(particle) => Some(particle),
            Occupant::Bucket { aggregate, .. } | Occupant::Internal { aggregate, .. } => {
                Some(aggregate)
            }
        }
    }

    pub fn children(&self) -> Option<[NodeId; 4]> {
        match self.occupant {
            Occupant::Internal { children, .. } => Some(children),
            _ => None,
        }
    }

    /// A node is external when it has no children.
    pub fn is_external(&self) -> bool {
        self.children().is_none()
    }
}

/// Barnes-Hut quadtree keyed by [`Quadrant`].
///
/// The tree stores copies of the particles inserted into it, so it reflects
/// the state of the system at construction time and stays valid while the
/// originals are integrated.
#[derive(Clone, Debug)]
pub struct SpatialTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SpatialTree {
    /// Creates an empty tree covering `quadrant`.
    pub fn new(quadrant: Quadrant) -> Self {
        SpatialTree {
            nodes: vec![Node::vacant(quadrant, 0)],
            root: NodeId::new(0),
        }
    }

    /// Creates a tree over `quadrant` and inserts every given particle.
    ///
    /// No containment check is made at the root; callers decide which
    /// particles belong in the tree.
    pub fn build<'a, I>(quadrant: Quadrant, particles: I) -> Self
    where
        I: IntoIterator<Item = &'a Particle>,
    {
        let mut tree = Self::new(quadrant);
        for particle in particles {
            tree.insert(*particle);
        }
        tree
    }

    /// Inserts a copy of `particle`.
    ///
    /// Returns `false` when the particle ended up in no leaf. That happens
    /// only when, after a split, none of the four child quadrants contains it
    /// (a point rounding off the outer edge of its parent); the particle still
    /// counts toward every aggregate above the point where it was dropped.
    pub fn insert(&mut self, particle: Particle) -> bool {
        self.insert_at(self.root, particle)
    }

    fn insert_at(&mut self, id: NodeId, particle: Particle) -> bool {
        let node = &mut self.nodes[id.index()];

        match std::mem::replace(&mut node.occupant, Occupant::Vacant) {
            Occupant::Vacant => {
                node.occupant = Occupant::Leaf(particle);
                true
            }

            Occupant::Internal {
                aggregate,
                children,
            } => {
                node.occupant = Occupant::Internal {
                    aggregate: aggregate.merge(&particle),
                    children,
                };
                self.route(children, particle)
            }

            Occupant::Bucket {
                aggregate,
                mut members,
            } => {
                members.push(particle);
                node.occupant = Occupant::Bucket {
                    aggregate: aggregate.merge(&particle),
                    members,
                };
                true
            }

            Occupant::Leaf(existing) if node.depth >= MAX_DEPTH => {
                node.occupant = Occupant::Bucket {
                    aggregate: existing.merge(&particle),
                    members: vec![existing, particle],
                };
                true
            }

            Occupant::Leaf(existing) => {
                let quadrant = node.quadrant;
                let depth = node.depth;

                let children = self.allocate_children(quadrant, depth + 1);
                self.route(children, existing);
                let placed = self.route(children, particle);

                self.nodes[id.index()].occupant = Occupant::Internal {
                    aggregate: existing.merge(&particle),
                    children,
                };
                placed
            }
        }
    }

    /// Sends `particle` into the first child whose quadrant contains it.
    fn route(&mut self, children: [NodeId; 4], particle: Particle) -> bool {
        let target = children
            .iter()
            .copied()
            .find(|child| self.nodes[child.index()].quadrant.contains(&particle.position));

        match target {
            Some(child) => self.insert_at(child, particle),
            None => {
                warn!(
                    "particle {:?} at ({:e}, {:e}) fell between sub-quadrants and was dropped",
                    particle.id, particle.position.x, particle.position.y
                );
                false
            }
        }
    }

    fn allocate_children(&mut self, quadrant: Quadrant, depth: u32) -> [NodeId; 4] {
        quadrant.subdivide().map(|child| {
            let id = NodeId::new(self.nodes.len());
            self.nodes.push(Node::vacant(child, depth));
            id
        })
    }

    /// Net force on `target` from everything in the tree.
    ///
    /// A node holding `target` itself contributes nothing. Leaves contribute
    /// their exact pairwise force. An internal node whose side `s` and
    /// distance `d` to its aggregate satisfy `s / d < θ` contributes the force
    /// of its aggregate; otherwise its four children are visited.
    pub fn force_on(&self, target: &Particle, gravity: &Gravity) -> Vector2<f64> {
        self.force_recursive(self.root, target, gravity)
    }

    fn force_recursive(&self, id: NodeId, target: &Particle, gravity: &Gravity) -> Vector2<f64> {
        let node = &self.nodes[id.index()];

        match &node.occupant {
            Occupant::Vacant => Vector2::zeros(),

            Occupant::Leaf(resident) => {
                if target.is_same(resident) {
                    Vector2::zeros()
                } else {
                    gravity.pairwise_force(target, resident)
                }
            }

            Occupant::Bucket { members, .. } => members
                .iter()
                .filter(|member| !target.is_same(member))
                .map(|member| gravity.pairwise_force(target, member))
                .fold(Vector2::zeros(), |acc, f| acc + f),

            Occupant::Internal {
                aggregate,
                children,
            } => {
                let s = node.quadrant.side();
                let d = (aggregate.position - target.position).magnitude();

                if s / d < gravity.theta {
                    gravity.pairwise_force(target, aggregate)
                } else {
                    children
                        .iter()
                        .map(|&child| self.force_recursive(child, target, gravity))
                        .fold(Vector2::zeros(), |acc, f| acc + f)
                }
            }
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of allocated nodes, vacant ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level holding a particle (the root is level 0).
    pub fn depth(&self) -> u32 {
        self.nodes
            .iter()
            .filter(|node| !matches!(node.occupant, Occupant::Vacant))
            .map(|node| node.depth)
            .max()
            .unwrap_or(0)
    }

    /// All real particles stored in the tree.
    pub fn leaves(&self) -> Vec<&Particle> {
        self.particles_under(self.root)
    }

    /// Real particles stored at or beneath node `id`.
    pub fn particles_under(&self, id: NodeId) -> Vec<&Particle> {
        let mut result = Vec::new();
        self.collect_into(id, &mut result);
        result
    }

    fn collect_into<'a>(&'a self, id: NodeId, result: &mut Vec<&'a Particle>) {
        match &self.nodes[id.index()].occupant {
            Occupant::Vacant => {}
            Occupant::Leaf(particle) => result.push(particle),
            Occupant::Bucket { members, .. } => result.extend(members.iter()),
            Occupant::Internal { children, .. } => {
                for &child in children {
                    self.collect_into(child, result);
                }
            }
        }
    }
}
