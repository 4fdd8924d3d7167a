//! # Scene Placement
//!
//! Hands finished solids to a host [`SceneSink`] as named sub-assemblies
//! positioned by translation-only placements. Sub-assemblies are never
//! unioned with each other.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::Aabb;
use crate::kernel::{SceneError, SceneSink};
use crate::pipeline::GenerationReport;

// =============================================================================
// PLACEMENT
// =============================================================================

/// Translation-only rigid transform.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub offset: DVec3,
}

impl Placement {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            offset: DVec3::new(dx, dy, dz),
        }
    }

    pub fn from_offset(offset: DVec3) -> Self {
        Self { offset }
    }

    /// Applies `self` then `other`.
    pub fn then(self, other: Placement) -> Placement {
        Placement {
            offset: self.offset + other.offset,
        }
    }

    pub fn apply(&self, point: DVec3) -> DVec3 {
        point + self.offset
    }

    pub fn apply_bounds(&self, bounds: &Aabb) -> Aabb {
        bounds.translated(self.offset)
    }

    pub fn is_identity(&self) -> bool {
        self.offset == DVec3::ZERO
    }
}

// =============================================================================
// SUB-ASSEMBLIES
// =============================================================================

/// Named group of bodies placed as one unit.
#[derive(Debug, Clone)]
pub struct SubAssembly<S> {
    pub name: String,
    pub bodies: Vec<S>,
    pub placement: Placement,
}

impl<S> SubAssembly<S> {
    pub fn new(name: impl Into<String>, bodies: Vec<S>, placement: Placement) -> Self {
        Self {
            name: name.into(),
            bodies,
            placement,
        }
    }

    pub fn single(name: impl Into<String>, body: S, placement: Placement) -> Self {
        Self::new(name, vec![body], placement)
    }
}

/// Ordered collection of sub-assemblies sharing a parent frame.
#[derive(Debug, Clone)]
pub struct Assembly<S> {
    parent: Placement,
    parts: Vec<SubAssembly<S>>,
}

impl<S> Default for Assembly<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Assembly<S> {
    pub fn new() -> Self {
        Self {
            parent: Placement::identity(),
            parts: Vec::new(),
        }
    }

    /// Assembly whose children are additionally offset by `parent`.
    pub fn with_parent(parent: Placement) -> Self {
        Self {
            parent,
            parts: Vec::new(),
        }
    }

    pub fn push(&mut self, part: SubAssembly<S>) -> &mut Self {
        self.parts.push(part);
        self
    }

    pub fn add(&mut self, name: impl Into<String>, body: S, placement: Placement) -> &mut Self {
        self.push(SubAssembly::single(name, body, placement))
    }

    pub fn parts(&self) -> &[SubAssembly<S>] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Places every part into `sink` in insertion order, composing the
    /// parent placement onto each. Stops at the first rejected part.
    pub fn place_into<K>(self, sink: &mut K) -> Result<Vec<K::Handle>, SceneError>
    where
        K: SceneSink<Solid = S>,
    {
        let parent = self.parent;
        self.parts
            .into_iter()
            .map(|mut part| {
                part.placement = part.placement.then(parent);
                debug!(name = %part.name, bodies = part.bodies.len(), offset = ?part.placement.offset, "placing sub-assembly");
                sink.place(part)
            })
            .collect()
    }
}

// =============================================================================
// FINALIZED
// =============================================================================

/// Successful result of a generation request, ready to be emitted.
///
/// Only the pipeline entry points construct this type.
#[derive(Debug, Clone)]
pub struct Finalized<S> {
    solid: S,
    report: GenerationReport,
}

impl<S> Finalized<S> {
    pub(crate) fn new(solid: S, report: GenerationReport) -> Self {
        Self { solid, report }
    }

    pub fn solid(&self) -> &S {
        &self.solid
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    pub fn into_solid(self) -> S {
        self.solid
    }

    pub fn into_parts(self) -> (S, GenerationReport) {
        (self.solid, self.report)
    }

    pub fn into_sub_assembly(self, name: impl Into<String>, placement: Placement) -> SubAssembly<S> {
        SubAssembly::single(name, self.solid, placement)
    }

    /// Hands the solid to the host scene as a single-body sub-assembly.
    pub fn emit<K>(self, sink: &mut K, name: impl Into<String>, placement: Placement) -> Result<K::Handle, SceneError>
    where
        K: SceneSink<Solid = S>,
    {
        sink.place(self.into_sub_assembly(name, placement))
    }
}
