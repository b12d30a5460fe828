//! Type registry.
//!
//! The registry owns every declared type for one generation run. Types are
//! registered as the front-end discovers them; [`TypeRegistry::finalize`]
//! then validates the model, flags cyclic types and renames colliding ones,
//! in that order. Code generation only reads a finalized registry.
//!
//! Lookups of unknown identifiers panic: once finalization has succeeded,
//! every referenced identifier is known, so a miss is a generator bug.

use crate::cycles::{self, CycleAnalysis};
use crate::error::SchemaError;
use crate::identifier::{Identifier, IdentifierSet};
use crate::naming::{self, to_pascal_case};
use crate::types::{ComplexType, ReferencePolicy};
use crate::validation;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// A type together with the state the registry tracks for it.
#[derive(Debug, Clone)]
pub struct RegisteredType {
    descriptor: ComplexType,
    package_root: String,
    is_cyclic: bool,
    type_name_override: Option<String>,
    is_custom_typeref: bool,
}

impl RegisteredType {
    /// Returns the type descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ComplexType {
        &self.descriptor
    }

    /// Returns the package root the type was registered in.
    #[must_use]
    pub fn package_root(&self) -> &str {
        &self.package_root
    }

    /// Returns true if the type takes part in a package-internal cycle.
    #[must_use]
    pub const fn is_cyclic(&self) -> bool {
        self.is_cyclic
    }

    /// Returns the rendered name override, if any.
    #[must_use]
    pub fn type_name_override(&self) -> Option<&str> {
        self.type_name_override.as_deref()
    }

    /// Returns true if the type is a user-declared alias.
    #[must_use]
    pub const fn is_custom_typeref(&self) -> bool {
        self.is_custom_typeref
    }
}

/// Registry of all declared types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: BTreeMap<Identifier, RegisteredType>,
    package_roots: BTreeMap<String, IdentifierSet>,
    import_paths: BTreeSet<String>,
    finalized: bool,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type under a package root.
    ///
    /// # Arguments
    /// * `descriptor` - The type to register
    /// * `package_root` - Compiled unit the type belongs to
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateRegistration` if the identifier is
    /// already registered.
    pub fn register(
        &mut self,
        descriptor: ComplexType,
        package_root: impl Into<String>,
    ) -> Result<(), SchemaError> {
        let package_root = package_root.into();
        let id = descriptor.identifier().clone();
        if let Some(existing) = self.types.get(&id) {
            return Err(SchemaError::DuplicateRegistration {
                identifier: id,
                package_root: existing.package_root.clone(),
            });
        }

        debug!(identifier = %id, package_root = %package_root, kind = descriptor.kind(), "registered type");
        self.import_paths.insert(id.package_path());
        self.package_roots
            .entry(package_root.clone())
            .or_default()
            .insert(id.clone());
        self.types.insert(
            id,
            RegisteredType {
                descriptor,
                package_root,
                is_cyclic: false,
                type_name_override: None,
                is_custom_typeref: false,
            },
        );
        self.finalized = false;
        Ok(())
    }

    fn registered(&self, id: &Identifier) -> &RegisteredType {
        self.types
            .get(id)
            .unwrap_or_else(|| panic!("unknown type: {id}"))
    }

    fn registered_mut(&mut self, id: &Identifier) -> &mut RegisteredType {
        self.types
            .get_mut(id)
            .unwrap_or_else(|| panic!("unknown type: {id}"))
    }

    /// Returns the registration of a type, or `None` if it is unknown.
    #[must_use]
    pub fn get(&self, id: &Identifier) -> Option<&RegisteredType> {
        self.types.get(id)
    }

    /// Returns true if the identifier is registered.
    #[must_use]
    pub fn contains(&self, id: &Identifier) -> bool {
        self.types.contains_key(id)
    }

    /// Returns the descriptor of a registered type.
    ///
    /// # Panics
    /// Panics if the identifier is unknown.
    #[must_use]
    pub fn resolve(&self, id: &Identifier) -> &ComplexType {
        &self.registered(id).descriptor
    }

    /// Returns the package root of a registered type.
    ///
    /// # Panics
    /// Panics if the identifier is unknown.
    #[must_use]
    pub fn package_root(&self, id: &Identifier) -> &str {
        &self.registered(id).package_root
    }

    /// Returns true if a registered type is cyclic.
    ///
    /// # Panics
    /// Panics if the identifier is unknown.
    #[must_use]
    pub fn is_cyclic(&self, id: &Identifier) -> bool {
        self.registered(id).is_cyclic
    }

    /// Returns the rendered name override of a type.
    ///
    /// Unknown identifiers have no override.
    #[must_use]
    pub fn type_name_override(&self, id: &Identifier) -> Option<&str> {
        self.types.get(id).and_then(RegisteredType::type_name_override)
    }

    /// Marks a registered type as a user-declared alias.
    ///
    /// # Panics
    /// Panics if the identifier is unknown.
    pub fn set_custom_typeref(&mut self, id: &Identifier) {
        self.registered_mut(id).is_custom_typeref = true;
    }

    /// Returns true if a registered type is a user-declared alias.
    ///
    /// # Panics
    /// Panics if the identifier is unknown.
    #[must_use]
    pub fn is_custom_typeref(&self, id: &Identifier) -> bool {
        self.registered(id).is_custom_typeref
    }

    /// Returns the identifiers registered under a package root, sorted.
    #[must_use]
    pub fn types_in_package_root(&self, package_root: &str) -> Vec<&Identifier> {
        self.package_roots
            .get(package_root)
            .map(|ids| ids.iter().collect())
            .unwrap_or_default()
    }

    /// Returns every package root with its identifiers.
    #[must_use]
    pub fn package_roots(&self) -> &BTreeMap<String, IdentifierSet> {
        &self.package_roots
    }

    /// Iterates over all registered identifiers in order.
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.types.keys()
    }

    /// Iterates over all registrations in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &RegisteredType)> {
        self.types.iter()
    }

    /// Returns the package paths generated code must be able to import.
    #[must_use]
    pub fn import_paths(&self) -> &BTreeSet<String> {
        &self.import_paths
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns true if the registry has been finalized since the last
    /// registration.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns true if types embedding `id` must do so through indirection.
    ///
    /// Custom typerefs follow the policy of the type they alias.
    ///
    /// # Panics
    /// Panics if the identifier is unknown.
    #[must_use]
    pub fn should_use_indirection(&self, id: &Identifier) -> bool {
        match self.resolve(id).reference_policy() {
            ReferencePolicy::Never => false,
            ReferencePolicy::WhenCyclic => self.is_cyclic(id),
            ReferencePolicy::Delegate(target) => {
                if self.is_custom_typeref(id) {
                    self.should_use_indirection(&target)
                } else {
                    self.is_cyclic(id)
                }
            }
        }
    }

    /// Returns the name a type is rendered under in generated code.
    ///
    /// # Panics
    /// Panics if the identifier is unknown.
    #[must_use]
    pub fn rendered_name(&self, id: &Identifier) -> String {
        match &self.registered(id).type_name_override {
            Some(name) => name.clone(),
            None => to_pascal_case(id.name()),
        }
    }

    /// Validates the model, flags cyclic types and renames colliding ones.
    ///
    /// Stages run in that fixed order and the first failure aborts. Running
    /// it again on an unchanged registry yields the same state.
    ///
    /// # Errors
    /// Returns `SchemaError` if a dependency is unresolved, a type is
    /// malformed, a cycle spans package roots, or renamed types collide.
    pub fn finalize(&mut self) -> Result<(), SchemaError> {
        validation::validate_registry(self)?;

        let analysis = cycles::analyze(self)?;
        self.commit_cycles(&analysis);

        let overrides = naming::remediate(self)?;
        self.commit_overrides(overrides);

        self.finalized = true;
        info!(
            types = self.types.len(),
            package_roots = self.package_roots.len(),
            cyclic = analysis.cyclic.len(),
            "type registry finalized"
        );
        Ok(())
    }

    fn commit_cycles(&mut self, analysis: &CycleAnalysis) {
        for id in &analysis.cyclic {
            let registered = self.registered_mut(id);
            if !registered.is_cyclic {
                registered.is_cyclic = true;
                debug!(identifier = %id, "flagging type as cyclic");
            }
        }
    }

    fn commit_overrides(&mut self, overrides: BTreeMap<Identifier, String>) {
        for (id, name) in overrides {
            self.registered_mut(&id).type_name_override = Some(name);
        }
    }
}
