//! # Scene Document
//!
//! In-memory stand-in for the CAD document: a flat list of named components,
//! each owning its bodies and a translation placement.

use qr_solid::{Aabb, Placement, SceneError, SceneSink, SubAssembly};
use solid_mesh::{Mesh, MeshError, RectSolid};
use tracing::debug;

/// Index of a placed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named component with its bodies in local coordinates.
#[derive(Debug, Clone)]
pub struct Component {
    pub name: String,
    pub bodies: Vec<RectSolid>,
    pub placement: Placement,
}

impl Component {
    /// Bodies moved into document coordinates.
    pub fn world_bodies(&self) -> impl Iterator<Item = RectSolid> + '_ {
        self.bodies
            .iter()
            .map(|body| body.translated(self.placement.offset))
    }

    /// Bounds in document coordinates.
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.bodies
            .iter()
            .map(|body| self.placement.apply_bounds(&body.bounds()))
            .reduce(|a, b| a.union(&b))
    }

    /// Mesh of all bodies in document coordinates.
    pub fn to_mesh(&self) -> Result<Mesh, MeshError> {
        let mut mesh = Mesh::new();
        for body in &self.bodies {
            let mut part = body.to_mesh()?;
            part.translate(self.placement.offset);
            mesh.merge(&part);
        }
        Ok(mesh)
    }
}

/// Flat collection of uniquely named components.
#[derive(Debug, Clone, Default)]
pub struct Document {
    components: Vec<Component>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.0)
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.component(name).is_some()
    }

    /// `base` if unused, otherwise the first free `base (n)` from 2 upwards.
    pub fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base} ({n})"))
            .find(|name| !self.contains(name))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// Total body count over all components.
    pub fn body_count(&self) -> usize {
        self.components.iter().map(|c| c.bodies.len()).sum()
    }

    /// Bounds of every body in document coordinates, `None` when empty.
    pub fn world_bounds(&self) -> Option<Aabb> {
        self.components
            .iter()
            .filter_map(Component::world_bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Single mesh of the whole document, for export.
    pub fn to_mesh(&self) -> Result<Mesh, MeshError> {
        let mut mesh = Mesh::new();
        for component in &self.components {
            mesh.merge(&component.to_mesh()?);
        }
        Ok(mesh)
    }
}

impl SceneSink for Document {
    type Solid = RectSolid;
    type Handle = ComponentId;

    fn place(&mut self, assembly: SubAssembly<RectSolid>) -> Result<ComponentId, SceneError> {
        if assembly.name.trim().is_empty() {
            return Err(SceneError::Rejected("component name is empty".to_string()));
        }
        if assembly.bodies.is_empty() {
            return Err(SceneError::Rejected(format!(
                "component '{}' has no bodies",
                assembly.name
            )));
        }
        if self.contains(&assembly.name) {
            return Err(SceneError::DuplicateName(assembly.name));
        }

        let id = ComponentId(self.components.len());
        debug!(name = %assembly.name, bodies = assembly.bodies.len(), "component added");
        self.components.push(Component {
            name: assembly.name,
            bodies: assembly.bodies,
            placement: assembly.placement,
        });
        Ok(id)
    }
}
