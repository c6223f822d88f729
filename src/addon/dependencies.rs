//! Addon dependency resolution
//!
//! Checks a submitted descriptor list for duplicate identities, missing
//! dependencies and cycles, and determines construction order.

use std::collections::{HashMap, VecDeque};
use tracing::debug;

use crate::addon::descriptor::AddonDescriptor;
use crate::addon::traits::AddonError;

/// Dependency resolver over a submitted descriptor list
pub struct AddonDependencies;

impl AddonDependencies {
    /// Resolve construction order for a descriptor list
    ///
    /// Returns indices into `addons` such that every descriptor appears
    /// after all of its dependencies. The order is stable with respect to
    /// submission order: identical input lists always resolve to the
    /// identical construction order.
    pub fn resolve(addons: &[AddonDescriptor]) -> Result<Vec<usize>, AddonError> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, addon) in addons.iter().enumerate() {
            if index.insert(addon.id.as_str(), i).is_some() {
                return Err(AddonError::DuplicateAddon(addon.id.clone()));
            }
        }

        // Edges run dependency -> dependent, built in submission order so
        // Kahn's queue drains deterministically.
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); addons.len()];
        let mut in_degree: Vec<usize> = vec![0; addons.len()];

        for (i, addon) in addons.iter().enumerate() {
            for dep in &addon.dependencies {
                let Some(&dep_idx) = index.get(dep.as_str()) else {
                    return Err(AddonError::DependencyMissing {
                        addon: addon.id.clone(),
                        dependency: dep.clone(),
                    });
                };
                dependents[dep_idx].push(i);
                in_degree[i] += 1;
            }
        }

        let mut queue: VecDeque<usize> = (0..addons.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(addons.len());

        while let Some(i) = queue.pop_front() {
            order.push(i);
            for &dependent in &dependents[i] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() != addons.len() {
            let stuck: Vec<&str> = (0..addons.len())
                .filter(|&i| in_degree[i] > 0)
                .map(|i| addons[i].id.as_str())
                .collect();
            return Err(AddonError::DependencyCycle(stuck.join(", ")));
        }

        debug!(
            "dependency resolution complete: {:?}",
            order.iter().map(|&i| &addons[i].id).collect::<Vec<_>>()
        );
        Ok(order)
    }
}
