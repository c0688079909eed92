//! Function resolution: how `callFunction` instructions find their
//! bodies at run time.

use std::collections::BTreeMap;
use std::sync::RwLock;

use roverlab_types::{InstructionSeq, UserFunction};

/// Resolves function identifiers to instruction sequences at call time.
///
/// The executor holds the source behind an `Arc`, so a function edited
/// between runs takes effect on the next call without reloading the
/// program.
pub trait FunctionSource: Send + Sync {
    /// The body for `function_id`, or `None` when unknown (which the
    /// executor treats as fatal).
    fn resolve(&self, function_id: &str) -> Option<InstructionSeq>;
}

/// An empty source for programs that call no functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFunctions;

impl FunctionSource for NoFunctions {
    fn resolve(&self, _function_id: &str) -> Option<InstructionSeq> {
        None
    }
}

/// The user's saved function collection.
///
/// Interior mutability lets [`FunctionSource::resolve`] bump usage
/// counts through the shared reference the executor holds.
#[derive(Debug, Default)]
pub struct FunctionLibrary {
    functions: RwLock<BTreeMap<String, UserFunction>>,
}

impl FunctionLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a function, keyed by its id.
    pub fn insert(&self, function: UserFunction) {
        if let Ok(mut map) = self.functions.write() {
            map.insert(function.id.clone(), function);
        }
    }

    /// Remove a function by id.
    pub fn remove(&self, function_id: &str) -> Option<UserFunction> {
        self.functions.write().ok()?.remove(function_id)
    }

    /// A clone of the stored function, if present.
    pub fn get(&self, function_id: &str) -> Option<UserFunction> {
        self.functions.read().ok()?.get(function_id).cloned()
    }

    /// Clones of every stored function, in id order.
    pub fn all(&self) -> Vec<UserFunction> {
        self.functions
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default()
    }

    /// How many times the function has been called, if present.
    pub fn usage_count(&self, function_id: &str) -> Option<u32> {
        Some(self.functions.read().ok()?.get(function_id)?.usage_count)
    }

    /// Number of stored functions.
    pub fn len(&self) -> usize {
        self.functions.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FunctionSource for FunctionLibrary {
    fn resolve(&self, function_id: &str) -> Option<InstructionSeq> {
        let mut map = self.functions.write().ok()?;
        let function = map.get_mut(function_id)?;
        function.usage_count = function.usage_count.saturating_add(1);
        Some(function.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use roverlab_types::{Instruction, InstructionKind, MoveDir};

    use super::*;

    fn step() -> Instruction {
        Instruction::new(InstructionKind::Move {
            dir: MoveDir::Forward,
        })
    }

    #[test]
    fn resolve_returns_body_and_counts_usage() {
        let library = FunctionLibrary::new();
        library.insert(UserFunction::new("walk", "Walk", vec![step(), step()]));

        let body = library.resolve("walk");
        assert_eq!(body.map(|b| b.len()), Some(2));
        assert_eq!(library.usage_count("walk"), Some(1));

        library.resolve("walk");
        assert_eq!(library.usage_count("walk"), Some(2));
    }

    #[test]
    fn unknown_function_resolves_to_none() {
        let library = FunctionLibrary::new();
        assert!(library.resolve("ghost").is_none());
        assert!(NoFunctions.resolve("ghost").is_none());
    }

    #[test]
    fn insert_replaces_and_remove_deletes() {
        let library = FunctionLibrary::new();
        library.insert(UserFunction::new("walk", "Walk", vec![step()]));
        library.insert(UserFunction::new("walk", "Walk v2", vec![step(), step()]));
        assert_eq!(library.len(), 1);
        assert_eq!(library.get("walk").map(|f| f.name), Some("Walk v2".to_owned()));

        assert!(library.remove("walk").is_some());
        assert!(library.is_empty());
    }
}
