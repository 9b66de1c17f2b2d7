//! Host injection.
//!
//! A field marked for injection is not written through reflection. Instead
//! the host exposes an [`Injector`], and the usual one is an
//! [`InjectionTable`] that maps `(class, field)` to a `static` [`HostSlot`]
//! owned by the class's module.

use crate::class::{Class, ClassName, FieldInfo};
use crate::error::InjectError;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Receives the host reference for marked fields.
pub trait Injector<H>: Send + Sync {
    fn inject(&self, class: &Class, field: &FieldInfo, host: &Arc<H>) -> Result<(), InjectError>;
}

/// Storage for an injected host reference, usable as a `static`.
///
/// ```
/// use autoregister_api::HostSlot;
///
/// struct Plugin;
/// static PLUGIN: HostSlot<Plugin> = HostSlot::new();
///
/// assert!(PLUGIN.get().is_none());
/// ```
#[derive(Debug)]
pub struct HostSlot<H> {
    value: RwLock<Option<Arc<H>>>,
}

impl<H> HostSlot<H> {
    pub const fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }

    pub fn get(&self) -> Option<Arc<H>> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_set(&self) -> bool {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn set(&self, host: Arc<H>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(host);
    }

    pub fn clear(&self) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<H> Default for HostSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Table of injection targets keyed by class and field name.
pub struct InjectionTable<H: 'static> {
    slots: HashMap<(ClassName, String), &'static HostSlot<H>>,
}

impl<H: 'static> InjectionTable<H> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Bind the static field `class.field` to `slot`.
    pub fn bind(
        mut self,
        class: impl Into<ClassName>,
        field: impl Into<String>,
        slot: &'static HostSlot<H>,
    ) -> Self {
        self.slots.insert((class.into(), field.into()), slot);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<H: 'static> Default for InjectionTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Send + Sync + 'static> Injector<H> for InjectionTable<H> {
    fn inject(&self, class: &Class, field: &FieldInfo, host: &Arc<H>) -> Result<(), InjectError> {
        if !field.is_static {
            return Err(InjectError::NotStatic {
                class: class.name().clone(),
                field: field.name.clone(),
            });
        }
        if field.is_final {
            return Err(InjectError::Final {
                class: class.name().clone(),
                field: field.name.clone(),
            });
        }

        let key = (class.name().clone(), field.name.clone());
        let slot = self.slots.get(&key).ok_or_else(|| InjectError::Unbound {
            class: class.name().clone(),
            field: field.name.clone(),
        })?;
        slot.set(Arc::clone(host));
        Ok(())
    }
}
