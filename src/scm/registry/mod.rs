// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Registry mapping backend identifiers to backend instances.
//!
//! ```text
//! register::<GitScm>()     GitScm::from_context(&ctx) --> [(git, Arc<dyn Scm>)]
//! register_by_name("git")  "git" --> ScmType::Git --> register::<GitScm>()
//! create(ScmType::Git)     --> Arc<dyn Scm> | UnknownScmType
//! ```
//!
//! Conformance to the [`Scm`] contract is checked by the `ScmBackend` bound
//! at compile time. Names coming from configuration are the only runtime
//! path that can name a non-backend, and fail with `NotAnScmImplementation`.

use std::sync::Arc;

use tracing::debug;

use super::git::GitScm;
use super::{Scm, ScmBackend, ScmContext, ScmType};
use crate::error::RegistryError;

/// Backends in registration order.
pub struct ScmRegistry {
    context: ScmContext,
    entries: Vec<(ScmType, Arc<dyn Scm>)>,
}

impl std::fmt::Debug for ScmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScmRegistry")
            .field("types", &self.types().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for ScmRegistry {
    fn default() -> Self {
        Self::new(ScmContext::default())
    }
}

impl ScmRegistry {
    /// Creates an empty registry whose backends are built from `context`.
    #[must_use]
    pub const fn new(context: ScmContext) -> Self {
        Self {
            context,
            entries: Vec::new(),
        }
    }

    /// Creates a registry with every backend named in `enabled` registered.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotAnScmImplementation` for a name that is not
    /// a backend and `DuplicateScmType` if `enabled` repeats one.
    pub fn with_enabled<S: AsRef<str>>(
        context: ScmContext,
        enabled: &[S],
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new(context);
        for name in enabled {
            registry.register_by_name(name.as_ref())?;
        }
        Ok(registry)
    }

    /// Builds backend `B` from the shared context and registers it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateScmType` if `B::SCM_TYPE` is taken.
    pub fn register<B: ScmBackend>(&mut self) -> Result<(), RegistryError> {
        let backend = B::from_context(&self.context);
        self.register_instance(Arc::new(backend))
    }

    /// Registers an already constructed backend under its own type.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateScmType` if the type is taken.
    pub fn register_instance(&mut self, scm: Arc<dyn Scm>) -> Result<(), RegistryError> {
        let scm_type = scm.scm_type();
        if self.contains(scm_type) {
            return Err(RegistryError::DuplicateScmType(scm_type.to_string()));
        }
        debug!(scm = %scm_type, "registered backend");
        self.entries.push((scm_type, scm));
        Ok(())
    }

    /// Registers the built-in backend for `scm_type`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateScmType` if the type is taken.
    pub fn register_type(&mut self, scm_type: ScmType) -> Result<(), RegistryError> {
        match scm_type {
            ScmType::Git => self.register::<GitScm>(),
        }
    }

    /// Registers the built-in backend called `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotAnScmImplementation` if no backend is
    /// called `name`, or `DuplicateScmType` if it is already registered.
    pub fn register_by_name(&mut self, name: &str) -> Result<ScmType, RegistryError> {
        let scm_type: ScmType = name.parse()?;
        self.register_type(scm_type)?;
        Ok(scm_type)
    }

    /// Returns the backend registered for `scm_type`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownScmType` if none is registered.
    pub fn create(&self, scm_type: ScmType) -> Result<Arc<dyn Scm>, RegistryError> {
        self.entries
            .iter()
            .find(|(t, _)| *t == scm_type)
            .map(|(_, scm)| Arc::clone(scm))
            .ok_or_else(|| RegistryError::UnknownScmType(scm_type.to_string()))
    }

    #[must_use]
    pub fn contains(&self, scm_type: ScmType) -> bool {
        self.entries.iter().any(|(t, _)| *t == scm_type)
    }

    /// Registered types in registration order.
    pub fn types(&self) -> impl Iterator<Item = ScmType> + '_ {
        self.entries.iter().map(|(t, _)| *t)
    }

    /// Registered backends in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Scm>> {
        self.entries.iter().map(|(_, scm)| scm)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn context(&self) -> &ScmContext {
        &self.context
    }
}

#[cfg(test)]
mod tests;
