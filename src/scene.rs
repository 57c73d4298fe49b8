use crate::light::{DirectionalLight, HemisphereLight, Light};
use crate::math::Color;
use crate::mesh::Mesh;

/// Handle to a child of a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Renderable child of a scene
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mesh(Mesh),
    Light(Light),
}

impl From<Mesh> for Node {
    fn from(mesh: Mesh) -> Self {
        Node::Mesh(mesh)
    }
}

impl From<HemisphereLight> for Node {
    fn from(light: HemisphereLight) -> Self {
        Node::Light(light.into())
    }
}

impl From<DirectionalLight> for Node {
    fn from(light: DirectionalLight) -> Self {
        Node::Light(light.into())
    }
}

/// Flat scene graph: a background color and an append-only list of children
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Color,
    children: Vec<Node>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            children: Vec::new(),
        }
    }

    /// Attach a child and return its handle
    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        self.children.push(node.into());
        NodeId(self.children.len() - 1)
    }

    pub fn mesh(&self, id: NodeId) -> Option<&Mesh> {
        match self.children.get(id.0) {
            Some(Node::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut Mesh> {
        match self.children.get_mut(id.0) {
            Some(Node::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Mesh)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, node)| match node {
                Node::Mesh(mesh) => Some((NodeId(i), mesh)),
                _ => None,
            })
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> + '_ {
        self.children.iter().filter_map(|node| match node {
            Node::Light(light) => Some(light),
            _ => None,
        })
    }

    /// First hemisphere light, used as the ambient term
    pub fn hemisphere_light(&self) -> Option<&HemisphereLight> {
        self.lights().find_map(|light| match light {
            Light::Hemisphere(hemisphere) => Some(hemisphere),
            _ => None,
        })
    }

    /// First directional light
    pub fn directional_light(&self) -> Option<&DirectionalLight> {
        self.lights().find_map(|light| match light {
            Light::Directional(directional) => Some(directional),
            _ => None,
        })
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Color::from_hex(0x000000))
    }
}
