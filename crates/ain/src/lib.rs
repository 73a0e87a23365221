//! # AIN - compilation-unit container
//!
//! In-memory model of the tables a bytecode container holds: struct
//! definitions, functions with their variable lists, globals and the
//! initial values of globals.
//!
//! Entries are appended and never removed, so the index returned by each
//! `add_*` method is a stable reference that later passes (and the code
//! generator) use to address the entry.
//!
//! ```
//! use ain::{Ain, AinType};
//!
//! let mut ain = Ain::new(12);
//! let s = ain.add_struct("Point");
//! assert_eq!(ain.get_struct_no("Point"), Some(s));
//!
//! let g = ain.add_global("origin", AinType::structure(s));
//! assert_eq!(ain.globals[g].name2.as_deref(), Some(""));
//! ```

mod dump;
pub mod types;

pub use types::{AinType, DataType, Function, Initval, InitvalValue, Struct, Variable};

/// First container version whose variable records carry a secondary name
pub const SECONDARY_NAME_VERSION: u32 = 12;

/// Compilation-unit container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ain {
    pub version: u32,
    pub structures: Vec<Struct>,
    pub functions: Vec<Function>,
    pub globals: Vec<Variable>,
    pub initvals: Vec<Initval>,
}

impl Ain {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// Whether variable records carry the secondary name field
    pub fn has_secondary_names(&self) -> bool {
        self.version >= SECONDARY_NAME_VERSION
    }

    /// Build a variable record honoring the container version
    pub fn make_variable(&self, name: impl Into<String>, ty: AinType) -> Variable {
        Variable {
            name: name.into(),
            name2: self.has_secondary_names().then(String::new),
            ty,
        }
    }

    // ==================== Structs ====================

    pub fn get_struct(&self, name: &str) -> Option<&Struct> {
        self.structures.iter().find(|s| s.name == name)
    }

    pub fn get_struct_no(&self, name: &str) -> Option<usize> {
        self.structures.iter().position(|s| s.name == name)
    }

    /// Reserve a struct name with an empty member list
    pub fn add_struct(&mut self, name: impl Into<String>) -> usize {
        self.structures.push(Struct::new(name));
        self.structures.len() - 1
    }

    // ==================== Functions ====================

    pub fn add_function(&mut self, function: Function) -> usize {
        self.functions.push(function);
        self.functions.len() - 1
    }

    pub fn get_function_no(&self, name: &str) -> Option<usize> {
        self.functions.iter().position(|f| f.name == name)
    }

    // ==================== Globals ====================

    /// Append a global and return its slot index
    pub fn add_global(&mut self, name: impl Into<String>, ty: AinType) -> usize {
        let var = self.make_variable(name, ty);
        self.globals.push(var);
        self.globals.len() - 1
    }

    pub fn get_global_no(&self, name: &str) -> Option<usize> {
        self.globals.iter().position(|g| g.name == name)
    }

    // ==================== Initvals ====================

    pub fn add_initval(&mut self, initval: Initval) {
        self.initvals.push(initval);
    }

    /// Initial value attached to a global slot, if any
    pub fn initval_for(&self, global_index: usize) -> Option<&InitvalValue> {
        self.initvals
            .iter()
            .find(|i| i.global_index == global_index)
            .map(|i| &i.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indices_are_stable() {
        let mut ain = Ain::new(4);
        assert_eq!(ain.add_struct("A"), 0);
        assert_eq!(ain.add_struct("B"), 1);
        assert_eq!(ain.get_struct_no("B"), Some(1));
        assert_eq!(ain.get_struct_no("C"), None);

        assert_eq!(ain.add_global("x", AinType::INT), 0);
        assert_eq!(ain.add_global("y", AinType::FLOAT), 1);
        assert_eq!(ain.get_global_no("y"), Some(1));
    }

    #[test]
    fn test_secondary_name_gated_by_version() {
        let old = Ain::new(11);
        assert_eq!(old.make_variable("v", AinType::INT).name2, None);

        let new = Ain::new(12);
        assert_eq!(new.make_variable("v", AinType::INT).name2, Some(String::new()));
    }

    #[test]
    fn test_function_params_prefix() {
        let mut ain = Ain::new(4);
        let mut f = Function::new("f", AinType::VOID);
        f.vars.push(ain.make_variable("a", AinType::INT));
        f.vars.push(ain.make_variable("b", AinType::STRING));
        f.nr_args = 1;
        let no = ain.add_function(f);

        let f = &ain.functions[no];
        assert_eq!(f.params().len(), 1);
        assert_eq!(f.params()[0].name, "a");
        assert_eq!(f.nr_vars(), 2);
    }

    #[test]
    fn test_initval_lookup() {
        let mut ain = Ain::new(4);
        let g = ain.add_global("x", AinType::INT);
        ain.add_initval(Initval { global_index: g, value: InitvalValue::Int(3) });
        assert_eq!(ain.initval_for(g), Some(&InitvalValue::Int(3)));
        assert_eq!(ain.initval_for(g + 1), None);
    }
}
