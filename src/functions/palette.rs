//! The closed set of operations evolution may insert into a target body.
//!
//! A palette is built once, wrapped in an `Arc` and shared read-only by the
//! population, the genetic operators and the evaluator. It also records which
//! function of the program is being evolved.

use crate::error::{GpsynthError, Result};
use crate::functions::registry::FunctionRegistry;
use crate::types::PrimitiveType;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One operation usable when synthesizing expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub arity: usize,
    pub operand_type: PrimitiveType,
    pub result_type: PrimitiveType,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionPalette {
    entries: Vec<PaletteEntry>,
    index: HashMap<String, usize>,
    target: Option<String>,
}

impl FunctionPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a palette from registry aliases such as `f32.add`
    pub fn from_registry<S: AsRef<str>>(registry: &FunctionRegistry, names: &[S]) -> Result<Self> {
        let mut palette = Self::new();
        for name in names {
            let name = name.as_ref();
            let primitive = registry.get_primitive(name).ok_or_else(|| {
                GpsynthError::Configuration(format!("Unknown function in function set: {}", name))
            })?;
            palette.register(
                name,
                primitive.arity(),
                primitive.operand_type(),
                primitive.result_type(),
            )?;
        }
        Ok(palette)
    }

    pub fn register(
        &mut self,
        name: &str,
        arity: usize,
        operand_type: PrimitiveType,
        result_type: PrimitiveType,
    ) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(GpsynthError::Configuration(format!(
                "Duplicate function in palette: {}",
                name
            )));
        }
        if arity == 0 {
            return Err(GpsynthError::Configuration(format!(
                "Palette function {} must take at least one operand",
                name
            )));
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(PaletteEntry {
            name: name.to_string(),
            arity,
            operand_type,
            result_type,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PaletteEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Uniformly chosen entry
    pub fn sample_random_entry<R: Rng>(&self, rng: &mut R) -> Option<&PaletteEntry> {
        self.entries.choose(rng)
    }

    /// Uniformly chosen entry among those accepted by `filter`
    pub fn sample_matching<R, F>(&self, rng: &mut R, filter: F) -> Option<&PaletteEntry>
    where
        R: Rng,
        F: Fn(&PaletteEntry) -> bool,
    {
        let candidates: Vec<&PaletteEntry> = self.entries.iter().filter(|e| filter(*e)).collect();
        candidates.choose(rng).copied()
    }

    pub fn set_target(&mut self, function_name: &str) {
        self.target = Some(function_name.to_string());
    }

    /// Name of the function whose body is evolved
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn palette() -> FunctionPalette {
        let registry = FunctionRegistry::new();
        FunctionPalette::from_registry(&registry, &["f32.add", "f32.neg", "i32.mul"]).unwrap()
    }

    #[test]
    fn test_duplicate_rejected() {
        let registry = FunctionRegistry::new();
        let result = FunctionPalette::from_registry(&registry, &["f32.neg", "f32.neg"]);
        assert!(matches!(result, Err(GpsynthError::Configuration(_))));
    }

    #[test]
    fn test_unknown_alias_rejected() {
        let registry = FunctionRegistry::new();
        assert!(FunctionPalette::from_registry(&registry, &["f32.tan"]).is_err());
    }

    #[test]
    fn test_entries_mirror_registry() {
        let palette = palette();
        let neg = palette.get("f32.neg").unwrap();
        assert_eq!(neg.arity, 1);
        assert_eq!(neg.operand_type, PrimitiveType::F32);
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn test_sample_matching_respects_filter() {
        let palette = palette();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let entry = palette
                .sample_matching(&mut rng, |e| e.operand_type == PrimitiveType::I32)
                .unwrap();
            assert_eq!(entry.name, "i32.mul");
        }
        assert!(palette
            .sample_matching(&mut rng, |e| e.operand_type == PrimitiveType::F64)
            .is_none());
        assert!(palette.sample_random_entry(&mut rng).is_some());
    }

    #[test]
    fn test_target_tracking() {
        let mut palette = palette();
        assert_eq!(palette.target(), None);
        palette.set_target("polynomialFitting");
        assert_eq!(palette.target(), Some("polynomialFitting"));
    }
}
