//! Dependency- and priority-ordered system execution.
//!
//! Systems are leveled by dependency depth — `level(s) = 0` when `s` has
//! no dependencies, else `1 + max(level(dep))` over its dependencies —
//! and run lowest level first; systems tied at the same level run in
//! ascending [`System::priority`] order (smaller runs earlier), then
//! insertion order.

use rustc_hash::FxHashMap;

use crate::error::{EcsError, Result};
use crate::system::{BoxedSystem, System};
use crate::world::World;
use tracing::warn;

/// Owns and orders a set of named systems.
#[derive(Default)]
pub struct SystemScheduler {
    systems: FxHashMap<String, BoxedSystem>,
    insertion_order: Vec<String>,
    order: Vec<String>,
    initialized: bool,
}

impl SystemScheduler {
    /// Create an empty, uninitialized scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`Self::initialize_all`] has run.
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Register `system` under its own [`System::name`]. Recomputes
    /// execution order. Rejects a duplicate name or a dependency cycle,
    /// leaving the scheduler unchanged on error.
    pub fn add(&mut self, system: BoxedSystem) -> Result<()> {
        let name = system.name().to_string();
        if self.systems.contains_key(&name) {
            return Err(EcsError::DuplicateSystem(name));
        }

        self.systems.insert(name.clone(), system);
        self.insertion_order.push(name.clone());

        match compute_order(&self.systems, &self.insertion_order) {
            Ok(order) => {
                self.order = order;
                Ok(())
            }
            Err(err) => {
                self.systems.remove(&name);
                self.insertion_order.retain(|n| n != &name);
                Err(err)
            }
        }
    }

    /// Remove the system named `name`, if present. If removing it leaves
    /// a dependency unresolved for some other system, the previous
    /// execution order is kept (with a warning logged) rather than
    /// failing the call — `remove` has no error channel by design.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.systems.remove(name).is_none() {
            return false;
        }
        self.insertion_order.retain(|n| n != name);
        self.order.retain(|n| n != name);

        match compute_order(&self.systems, &self.insertion_order) {
            Ok(order) => self.order = order,
            Err(err) => warn!(system = name, error = %err, "removing system left a dependency unresolved; keeping previous order"),
        }
        true
    }

    /// Borrow the system named `name`.
    pub fn get(&self, name: &str) -> Option<&BoxedSystem> {
        self.systems.get(name)
    }

    /// Mutably borrow the system named `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut BoxedSystem> {
        self.systems.get_mut(name)
    }

    /// Every registered system, in execution order.
    pub fn all(&self) -> impl Iterator<Item = &BoxedSystem> {
        self.order.iter().filter_map(|name| self.systems.get(name))
    }

    /// The names of registered systems, in the order they will run.
    pub fn execution_order(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Run [`System::initialize`] on every system, in execution order. A
    /// system that returns an error is logged and skipped; it does not
    /// stop the remaining systems from initializing.
    pub fn initialize_all(&mut self, world: &mut World) -> Result<()> {
        for name in self.order.clone() {
            if let Some(system) = self.systems.get_mut(&name) {
                if let Err(err) = system.initialize(world) {
                    let wrapped = EcsError::SystemExecutionFailure {
                        system: name.clone(),
                        message: err.to_string(),
                    };
                    warn!(system = %name, error = %wrapped, "system initialize failed");
                }
            }
        }
        self.initialized = true;
        Ok(())
    }

    /// Run [`System::update`] on every system, in execution order. A
    /// system that returns an error is logged and skipped for the rest
    /// of this tick; it does not stop the remaining systems from running.
    pub fn update(&mut self, world: &mut World, dt: f64) -> Result<()> {
        for name in self.order.clone() {
            if let Some(system) = self.systems.get_mut(&name) {
                if let Err(err) = system.update(world, dt) {
                    let wrapped = EcsError::SystemExecutionFailure {
                        system: name.clone(),
                        message: err.to_string(),
                    };
                    warn!(system = %name, error = %wrapped, "system update failed");
                }
            }
        }
        Ok(())
    }

    /// Run [`System::shutdown`] on every system, in reverse execution
    /// order. A system that returns an error is logged and skipped; it
    /// does not stop the remaining systems from shutting down.
    pub fn shutdown_all(&mut self, world: &mut World) -> Result<()> {
        for name in self.order.clone().into_iter().rev() {
            if let Some(system) = self.systems.get_mut(&name) {
                if let Err(err) = system.shutdown(world) {
                    let wrapped = EcsError::SystemExecutionFailure {
                        system: name.clone(),
                        message: err.to_string(),
                    };
                    warn!(system = %name, error = %wrapped, "system shutdown failed");
                }
            }
        }
        Ok(())
    }
}

fn compute_order(systems: &FxHashMap<String, BoxedSystem>, insertion_order: &[String]) -> Result<Vec<String>> {
    for name in insertion_order {
        let system = &systems[name];
        for dep in system.dependencies() {
            if !systems.contains_key(&dep) {
                return Err(EcsError::MissingDependency {
                    system: name.clone(),
                    dependency: dep,
                });
            }
        }
    }

    let mut levels: FxHashMap<String, usize> = FxHashMap::default();
    for name in insertion_order {
        let mut path = vec![name.clone()];
        level_of(systems, name, &mut levels, &mut path)?;
    }

    let mut priorities: FxHashMap<&str, i32> = FxHashMap::default();
    for name in insertion_order {
        priorities.insert(name.as_str(), systems[name].priority());
    }

    let mut ordered: Vec<String> = insertion_order.to_vec();
    ordered.sort_by(|a, b| {
        let level_cmp = levels[a].cmp(&levels[b]);
        if level_cmp != std::cmp::Ordering::Equal {
            return level_cmp;
        }
        priorities[a.as_str()].cmp(&priorities[b.as_str()])
    });

    Ok(ordered)
}

fn level_of(
    systems: &FxHashMap<String, BoxedSystem>,
    name: &str,
    levels: &mut FxHashMap<String, usize>,
    path: &mut Vec<String>,
) -> Result<usize> {
    if let Some(&level) = levels.get(name) {
        return Ok(level);
    }

    let deps = systems[name].dependencies();
    if deps.is_empty() {
        levels.insert(name.to_string(), 0);
        return Ok(0);
    }

    let mut max_dep_level = 0;
    for dep in deps {
        if path.contains(&dep) {
            path.push(dep);
            return Err(EcsError::CircularDependency(describe_cycle(systems, path)));
        }
        path.push(dep.clone());
        let dep_level = level_of(systems, &dep, levels, path)?;
        path.pop();
        max_dep_level = max_dep_level.max(dep_level);
    }

    let level = 1 + max_dep_level;
    levels.insert(name.to_string(), level);
    Ok(level)
}

/// Render a cycle path (`a -> b -> a`) together with each involved
/// system's priority and declared dependencies, e.g.
/// `a -> b -> a [a (priority=0, deps=[b]); b (priority=0, deps=[a])]`.
fn describe_cycle(systems: &FxHashMap<String, BoxedSystem>, path: &[String]) -> String {
    let chain = path.join(" -> ");

    let mut seen = Vec::new();
    let mut details = Vec::new();
    for name in path {
        if seen.contains(name) {
            continue;
        }
        seen.push(name.clone());
        let system = &systems[name];
        details.push(format!(
            "{name} (priority={}, deps=[{}])",
            system.priority(),
            system.dependencies().join(", ")
        ));
    }

    format!("{chain} [{}]", details.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        name: &'static str,
        deps: Vec<&'static str>,
        priority: i32,
        log: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            self.name
        }
        fn dependencies(&self) -> Vec<String> {
            self.deps.iter().map(|s| s.to_string()).collect()
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn update(&mut self, _world: &mut World, _dt: f64) -> Result<()> {
            self.log.lock().unwrap().push(self.name.to_string());
            Ok(())
        }
    }

    fn recorder(name: &'static str, deps: Vec<&'static str>, priority: i32, log: std::sync::Arc<std::sync::Mutex<Vec<String>>>) -> BoxedSystem {
        Box::new(Recorder { name, deps, priority, log })
    }

    #[test]
    fn dependencies_run_before_dependents() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler.add(recorder("a", vec![], 0, log.clone())).unwrap();
        scheduler.add(recorder("b", vec!["a"], 0, log.clone())).unwrap();

        let mut world = World::new();
        scheduler.update(&mut world, 0.0).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn same_level_breaks_tie_by_priority_ascending() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler.add(recorder("high", vec![], 10, log.clone())).unwrap();
        scheduler.add(recorder("low", vec![], 0, log.clone())).unwrap();

        let mut world = World::new();
        scheduler.update(&mut world, 0.0).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["low", "high"]);
    }

    #[test]
    fn missing_dependency_is_rejected() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        let err = scheduler.add(recorder("a", vec!["ghost"], 0, log)).unwrap_err();
        assert!(matches!(err, EcsError::MissingDependency { .. }));
    }

    #[test]
    fn self_dependency_is_a_cycle_not_a_missing_dependency() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        let err = scheduler.add(recorder("a", vec!["a"], 7, log)).unwrap_err();
        match err {
            EcsError::CircularDependency(msg) => {
                assert!(msg.contains("a -> a"));
                assert!(msg.contains("priority=7"));
                assert!(msg.contains("deps=[a]"));
            }
            other => panic!("expected CircularDependency, got {other:?}"),
        }
    }

    #[test]
    fn mutual_cycle_is_rejected_with_named_path() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler.add(recorder("a", vec![], 0, log.clone())).unwrap();
        scheduler.add(recorder("b", vec!["a"], 0, log.clone())).unwrap();
        assert!(scheduler.remove("a"));
        let err = scheduler.add(recorder("a", vec!["b"], 0, log)).unwrap_err();
        assert!(matches!(err, EcsError::CircularDependency(_)));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler.add(recorder("a", vec![], 0, log.clone())).unwrap();
        let err = scheduler.add(recorder("a", vec![], 0, log)).unwrap_err();
        assert!(matches!(err, EcsError::DuplicateSystem(_)));
    }

    struct Failing {
        name: &'static str,
        fail_initialize: bool,
        fail_shutdown: bool,
        log: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl System for Failing {
        fn name(&self) -> &str {
            self.name
        }
        fn initialize(&mut self, _world: &mut World) -> Result<()> {
            if self.fail_initialize {
                return Err(EcsError::ListenerFailure("boom".to_string()));
            }
            self.log.lock().unwrap().push(format!("{}:init", self.name));
            Ok(())
        }
        fn update(&mut self, _world: &mut World, _dt: f64) -> Result<()> {
            Ok(())
        }
        fn shutdown(&mut self, _world: &mut World) -> Result<()> {
            if self.fail_shutdown {
                return Err(EcsError::ListenerFailure("boom".to_string()));
            }
            self.log.lock().unwrap().push(format!("{}:shutdown", self.name));
            Ok(())
        }
    }

    #[test]
    fn initialize_all_isolates_a_failing_system() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler
            .add(Box::new(Failing { name: "a", fail_initialize: true, fail_shutdown: false, log: log.clone() }))
            .unwrap();
        scheduler
            .add(Box::new(Failing { name: "b", fail_initialize: false, fail_shutdown: false, log: log.clone() }))
            .unwrap();

        let mut world = World::new();
        scheduler.initialize_all(&mut world).unwrap();

        assert!(scheduler.initialized());
        assert_eq!(*log.lock().unwrap(), vec!["b:init"]);
    }

    #[test]
    fn shutdown_all_isolates_a_failing_system() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler
            .add(Box::new(Failing { name: "a", fail_initialize: false, fail_shutdown: true, log: log.clone() }))
            .unwrap();
        scheduler
            .add(Box::new(Failing { name: "b", fail_initialize: false, fail_shutdown: false, log: log.clone() }))
            .unwrap();

        let mut world = World::new();
        scheduler.shutdown_all(&mut world).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["b:shutdown"]);
    }
}
