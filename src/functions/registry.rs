use crate::functions::{
    primitives::{FloatPrimitive, IntPrimitive, FLOAT_OPS, INT_OPS},
    traits::Primitive,
};
use crate::types::PrimitiveType;
use std::{collections::HashMap, sync::Arc};

pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn Primitive>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };
        registry.register_float_primitives();
        registry.register_integer_primitives();
        registry
    }

    pub fn get_primitive(&self, name: &str) -> Option<Arc<dyn Primitive>> {
        self.functions.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn register(&mut self, primitive: Arc<dyn Primitive>) {
        self.functions.insert(primitive.alias().to_string(), primitive);
    }

    fn register_float_primitives(&mut self) {
        for &(op, f32_alias, f64_alias, ui_name) in FLOAT_OPS {
            for (alias, data_type) in [(f32_alias, PrimitiveType::F32), (f64_alias, PrimitiveType::F64)] {
                self.register(Arc::new(FloatPrimitive { alias, ui_name, data_type, op }));
            }
        }
    }

    fn register_integer_primitives(&mut self) {
        for &(op, i32_alias, i64_alias, ui_name) in INT_OPS {
            for (alias, data_type) in [(i32_alias, PrimitiveType::I32), (i64_alias, PrimitiveType::I64)] {
                self.register(Arc::new(IntPrimitive { alias, ui_name, data_type, op }));
            }
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn test_registry_primitive_retrieval() {
        let registry = FunctionRegistry::new();
        let add = registry.get_primitive("f32.add");
        assert!(add.is_some());
        let add = add.unwrap();
        assert_eq!(add.alias(), "f32.add");
        assert_eq!(add.arity(), 2);
        assert_eq!(add.result_type(), PrimitiveType::F32);
    }

    #[test]
    fn test_primitive_not_found() {
        let registry = FunctionRegistry::new();
        assert!(registry.get_primitive("f32.tan").is_none());
    }

    #[test]
    fn test_every_family_registered() {
        let registry = FunctionRegistry::new();
        assert_eq!(registry.len(), FLOAT_OPS.len() * 2 + INT_OPS.len() * 2);
        for ty in PrimitiveType::ALL {
            assert!(registry.get_primitive(&format!("{}.add", ty)).is_some());
        }
    }

    #[test]
    fn test_f64_sqrt_executes() {
        let registry = FunctionRegistry::new();
        let sqrt = registry.get_primitive("f64.sqrt").unwrap();
        assert_eq!(sqrt.execute(&[Value::F64(9.0)]).unwrap(), Value::F64(3.0));
    }
}
