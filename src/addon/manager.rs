//! Addon manager: the registration authority
//!
//! Accepts a complete descriptor list, resolves construction order, and
//! constructs and initializes every addon with its dependencies already
//! live. Registration is atomic: any failure stops the addons that were
//! already initialized and fails the whole submission.

use std::collections::HashMap;
use tracing::{debug, error, info};

use crate::addon::dependencies::AddonDependencies;
use crate::addon::descriptor::AddonDescriptor;
use crate::addon::params::ParameterGroup;
use crate::addon::traits::{Addon, AddonError, AddonRegistry, AddonState};

/// One constructed addon tracked by the manager
struct ManagedAddon {
    id: String,
    instance: Box<dyn Addon>,
    parameters: ParameterGroup,
    state: AddonState,
}

/// Constructs and owns the running addon set
///
/// A manager holds at most one registered set; assembly is one-shot per
/// run and a second submission is rejected.
#[derive(Default)]
pub struct AddonManager {
    /// Addons in initialization order
    addons: Vec<ManagedAddon>,
    /// Identity -> position in `addons`
    index: HashMap<String, usize>,
    registered: bool,
}

impl AddonManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow a running addon by identity
    pub fn get(&self, id: &str) -> Option<&dyn Addon> {
        self.index
            .get(id)
            .map(|&i| self.addons[i].instance.as_ref())
    }

    /// Borrow a running addon downcast to its concrete type
    pub fn find<T: 'static>(&self, id: &str) -> Option<&T> {
        self.get(id).and_then(|a| a.as_any().downcast_ref::<T>())
    }

    /// Current lifecycle state of an addon
    pub fn state(&self, id: &str) -> Option<&AddonState> {
        self.index.get(id).map(|&i| &self.addons[i].state)
    }

    /// Parameters an addon was initialized with
    pub fn parameters(&self, id: &str) -> Option<&ParameterGroup> {
        self.index.get(id).map(|&i| &self.addons[i].parameters)
    }

    /// Identities in initialization order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.addons.iter().map(|a| a.id.as_str())
    }

    /// Number of managed addons
    pub fn len(&self) -> usize {
        self.addons.len()
    }

    /// True when no addon set has been registered
    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    /// Stop every addon in reverse initialization order
    ///
    /// The first stop failure is returned after all remaining addons
    /// have still been asked to stop.
    pub fn stop_all(&mut self) -> Result<(), AddonError> {
        info!("stopping {} addons", self.addons.len());
        let mut first_error = None;

        for addon in self.addons.iter_mut().rev() {
            if addon.state != AddonState::Initialized {
                continue;
            }
            match addon.instance.stop() {
                Ok(()) => {
                    debug!("stopped addon {}", addon.id);
                    addon.state = AddonState::Stopped;
                }
                Err(e) => {
                    error!("failed to stop addon {}: {}", addon.id, e);
                    addon.state = AddonState::Failed(e.to_string());
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stop already-initialized addons after a mid-registration failure
    fn unwind(&mut self) {
        for addon in self.addons.iter_mut().rev() {
            if addon.state != AddonState::Initialized {
                continue;
            }
            if let Err(e) = addon.instance.stop() {
                error!("failed to stop addon {} during unwind: {}", addon.id, e);
                addon.state = AddonState::Failed(e.to_string());
            } else {
                addon.state = AddonState::Stopped;
            }
        }
    }
}

impl AddonRegistry for AddonManager {
    fn register(&mut self, descriptors: Vec<AddonDescriptor>) -> Result<(), AddonError> {
        if self.registered {
            return Err(AddonError::AlreadyRegistered);
        }

        info!("registering {} addons", descriptors.len());
        let order = AddonDependencies::resolve(&descriptors)?;

        // Construction order is now known to be valid; mark the set as
        // registered so a failed initialization still consumes the run.
        self.registered = true;

        for &i in &order {
            let descriptor = &descriptors[i];
            debug!("initializing addon {}", descriptor.id);

            let mut instance = descriptor.factory.create();
            let result = instance.initialize(&descriptor.parameters);

            let state = match &result {
                Ok(()) => AddonState::Initialized,
                Err(e) => AddonState::Failed(e.to_string()),
            };
            self.index.insert(descriptor.id.clone(), self.addons.len());
            self.addons.push(ManagedAddon {
                id: descriptor.id.clone(),
                instance,
                parameters: descriptor.parameters.clone(),
                state,
            });

            if let Err(e) = result {
                error!("addon {} failed to initialize: {}", descriptor.id, e);
                self.unwind();
                return Err(AddonError::InitializationFailed {
                    addon: descriptor.id.clone(),
                    reason: e.to_string(),
                });
            }
        }

        info!("all addons initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addon::traits::AddonFactory;
    use std::sync::{Arc, Mutex};

    /// Records lifecycle calls into a shared journal
    struct ProbeAddon {
        id: String,
        journal: Arc<Mutex<Vec<String>>>,
        fail_initialize: bool,
    }

    impl Addon for ProbeAddon {
        fn initialize(&mut self, _parameters: &ParameterGroup) -> Result<(), AddonError> {
            self.journal.lock().unwrap().push(format!("init {}", self.id));
            if self.fail_initialize {
                return Err(AddonError::InitializationFailed {
                    addon: self.id.clone(),
                    reason: "probe failure".into(),
                });
            }
            Ok(())
        }

        fn stop(&mut self) -> Result<(), AddonError> {
            self.journal.lock().unwrap().push(format!("stop {}", self.id));
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    struct ProbeFactory {
        id: String,
        journal: Arc<Mutex<Vec<String>>>,
        fail_initialize: bool,
    }

    impl AddonFactory for ProbeFactory {
        fn create(&self) -> Box<dyn Addon> {
            Box::new(ProbeAddon {
                id: self.id.clone(),
                journal: Arc::clone(&self.journal),
                fail_initialize: self.fail_initialize,
            })
        }
    }

    fn probe(
        id: &str,
        deps: &[&str],
        journal: &Arc<Mutex<Vec<String>>>,
        fail_initialize: bool,
    ) -> AddonDescriptor {
        AddonDescriptor::new(
            id,
            Arc::new(ProbeFactory {
                id: id.to_string(),
                journal: Arc::clone(journal),
                fail_initialize,
            }),
        )
        .with_dependencies(deps.iter().map(|d| d.to_string()).collect())
    }

    #[test]
    fn test_initializes_dependencies_first() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut manager = AddonManager::new();

        manager
            .register(vec![
                probe("transport", &["runtime", "registry"], &journal, false),
                probe("registry", &[], &journal, false),
                probe("runtime", &["registry"], &journal, false),
            ])
            .unwrap();

        let calls = journal.lock().unwrap().clone();
        assert_eq!(calls, vec!["init registry", "init runtime", "init transport"]);
        assert_eq!(manager.state("transport"), Some(&AddonState::Initialized));
    }

    #[test]
    fn test_failed_initialization_unwinds() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut manager = AddonManager::new();

        let err = manager
            .register(vec![
                probe("a", &[], &journal, false),
                probe("b", &["a"], &journal, true),
            ])
            .unwrap_err();

        assert!(matches!(
            err,
            AddonError::InitializationFailed { ref addon, .. } if addon == "b"
        ));
        let calls = journal.lock().unwrap().clone();
        assert_eq!(calls, vec!["init a", "init b", "stop a"]);
        assert_eq!(manager.state("a"), Some(&AddonState::Stopped));
        assert!(matches!(manager.state("b"), Some(AddonState::Failed(_))));
    }

    #[test]
    fn test_second_registration_rejected() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut manager = AddonManager::new();

        manager.register(vec![probe("a", &[], &journal, false)]).unwrap();
        let err = manager
            .register(vec![probe("b", &[], &journal, false)])
            .unwrap_err();
        assert!(matches!(err, AddonError::AlreadyRegistered));
    }

    #[test]
    fn test_stop_all_reverses_initialization_order() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut manager = AddonManager::new();

        manager
            .register(vec![
                probe("a", &[], &journal, false),
                probe("b", &["a"], &journal, false),
            ])
            .unwrap();
        manager.stop_all().unwrap();

        let calls = journal.lock().unwrap().clone();
        assert_eq!(calls, vec!["init a", "init b", "stop b", "stop a"]);
    }

    #[test]
    fn test_typed_lookup() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut manager = AddonManager::new();
        manager.register(vec![probe("a", &[], &journal, false)]).unwrap();

        assert!(manager.find::<ProbeAddon>("a").is_some());
        assert!(manager.find::<ProbeAddon>("missing").is_none());
        assert!(manager.get("a").is_some());
    }
}
