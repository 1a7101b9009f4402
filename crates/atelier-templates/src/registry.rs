//! Dispatch table over the generator family.

use crate::pipeline::ArtifactGenerator;
use crate::{
    ClimateGenerator, EnvironmentGenerator, FloralGenerator, LightingGenerator,
    PlaygroundGenerator, SeatingGenerator, SecurityGenerator, StageGenerator, StructureGenerator,
    TableGenerator,
};
use atelier_types::ArtifactKind;
use std::collections::BTreeMap;

/// Kind-keyed lookup of generators. Built once at startup and shared
/// read-only; the set of kinds is closed.
pub struct GeneratorRegistry {
    generators: BTreeMap<ArtifactKind, Box<dyn ArtifactGenerator>>,
}

impl GeneratorRegistry {
    /// Registry covering every artifact kind.
    pub fn builtin() -> Self {
        let mut registry = Self { generators: BTreeMap::new() };
        registry.register(Box::new(EnvironmentGenerator));
        registry.register(Box::new(StructureGenerator));
        registry.register(Box::new(ClimateGenerator));
        registry.register(Box::new(SecurityGenerator));
        registry.register(Box::new(StageGenerator));
        registry.register(Box::new(SeatingGenerator));
        registry.register(Box::new(TableGenerator));
        registry.register(Box::new(LightingGenerator));
        registry.register(Box::new(FloralGenerator));
        registry.register(Box::new(PlaygroundGenerator));
        registry
    }

    /// Register (or replace) the generator for its kind.
    pub fn register(&mut self, generator: Box<dyn ArtifactGenerator>) {
        self.generators.insert(generator.kind(), generator);
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&dyn ArtifactGenerator> {
        self.generators.get(&kind).map(Box::as_ref)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ArtifactKind> + '_ {
        self.generators.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_kind() {
        let registry = GeneratorRegistry::builtin();
        for kind in ArtifactKind::ALL {
            assert!(registry.get(kind).is_some(), "no generator for {kind}");
        }
        assert_eq!(registry.len(), ArtifactKind::ALL.len());
    }

    #[test]
    fn generators_report_their_own_kind() {
        let registry = GeneratorRegistry::builtin();
        for kind in ArtifactKind::ALL {
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
    }
}
