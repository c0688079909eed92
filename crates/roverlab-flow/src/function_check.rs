//! Validation rules for user-authored functions: size, recursion,
//! nesting depth, and cross-function dependency hygiene.

use std::collections::BTreeSet;

use roverlab_types::{sequence_len, InstructionKind, UserFunction};

/// Maximum number of top-level blocks a function body may contain.
pub const MAX_FUNCTION_SIZE: usize = 20;

/// Maximum depth of function-calls-function nesting.
pub const MAX_FUNCTION_DEPTH: usize = 3;

/// Outcome of a function validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionValidation {
    /// Rule violations that reject the function.
    pub errors: Vec<String>,
    /// Non-fatal oddities.
    pub warnings: Vec<String>,
}

impl FunctionValidation {
    /// True when no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate one function against the full library it lives in.
///
/// Checks body size, direct self-recursion, call-nesting depth, and
/// cyclic dependencies through other functions.
pub fn validate_function(func: &UserFunction, library: &[UserFunction]) -> FunctionValidation {
    let mut result = FunctionValidation::default();

    if func.body.is_empty() {
        result
            .warnings
            .push(format!("function '{}' has an empty body", func.name));
    }

    if func.body.len() > MAX_FUNCTION_SIZE {
        result.errors.push(format!(
            "function '{}' has {} blocks, maximum is {MAX_FUNCTION_SIZE}",
            func.name,
            func.body.len()
        ));
    }

    if func.direct_calls().contains(&func.id.as_str()) {
        result
            .errors
            .push(format!("function '{}' calls itself", func.name));
    }

    let depth = call_depth(func, library, &mut Vec::new());
    if depth > MAX_FUNCTION_DEPTH {
        result.errors.push(format!(
            "function '{}' nests calls {depth} levels deep, maximum is {MAX_FUNCTION_DEPTH}",
            func.name
        ));
    }

    if has_cycle(&func.id, library, &mut Vec::new()) {
        result.errors.push(format!(
            "function '{}' is part of a cyclic call chain",
            func.name
        ));
    }

    result
}

/// The ids of every function `func` depends on, directly or through
/// other functions. Order follows discovery; each id appears once.
pub fn dependencies(func: &UserFunction, library: &[UserFunction]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    collect_dependencies(func, library, &mut seen, &mut out);
    out
}

/// The ids of functions that call `function_id`. A function with users
/// cannot be deleted without breaking them.
pub fn used_by(function_id: &str, library: &[UserFunction]) -> Vec<String> {
    library
        .iter()
        .filter(|f| f.id != function_id && f.direct_calls().contains(&function_id))
        .map(|f| f.id.clone())
        .collect()
}

/// Total instruction count of a function including the bodies of every
/// function it calls, nested bodies counted throughout.
pub fn total_blocks(func: &UserFunction, library: &[UserFunction]) -> usize {
    let mut total = sequence_len(&func.body);
    for dep_id in dependencies(func, library) {
        if let Some(dep) = library.iter().find(|f| f.id == dep_id) {
            total += sequence_len(&dep.body);
        }
    }
    total
}

/// How deep the call chain starting at `func` goes. A function calling
/// no other function has depth 1. `path` breaks cycles so depth stays
/// finite on malformed libraries.
fn call_depth(func: &UserFunction, library: &[UserFunction], path: &mut Vec<String>) -> usize {
    if path.iter().any(|id| id == &func.id) {
        return 0;
    }
    path.push(func.id.clone());
    let mut deepest = 0;
    for call in func.direct_calls() {
        if let Some(callee) = library.iter().find(|f| f.id == call) {
            deepest = deepest.max(call_depth(callee, library, path));
        }
    }
    path.pop();
    1 + deepest
}

fn has_cycle(function_id: &str, library: &[UserFunction], stack: &mut Vec<String>) -> bool {
    if stack.iter().any(|id| id == function_id) {
        return true;
    }
    let Some(func) = library.iter().find(|f| f.id == function_id) else {
        return false;
    };
    stack.push(function_id.to_owned());
    let cyclic = func
        .direct_calls()
        .iter()
        .any(|call| has_cycle(call, library, stack));
    stack.pop();
    cyclic
}

fn collect_dependencies(
    func: &UserFunction,
    library: &[UserFunction],
    seen: &mut BTreeSet<String>,
    out: &mut Vec<String>,
) {
    for call in func.direct_calls() {
        if !seen.insert(call.to_owned()) {
            continue;
        }
        out.push(call.to_owned());
        if let Some(callee) = library.iter().find(|f| f.id == call) {
            collect_dependencies(callee, library, seen, out);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use roverlab_types::{Instruction, MoveDir};

    use super::*;

    fn step() -> Instruction {
        Instruction::new(InstructionKind::Move {
            dir: MoveDir::Forward,
        })
    }

    fn call(target: &str) -> Instruction {
        Instruction::new(InstructionKind::CallFunction {
            function_id: target.to_owned(),
        })
    }

    fn func(id: &str, body: Vec<Instruction>) -> UserFunction {
        UserFunction::new(id, id, body)
    }

    #[test]
    fn simple_function_passes() {
        let f = func("walk", vec![step(), step()]);
        let result = validate_function(&f, &[f.clone()]);
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_body_is_a_warning() {
        let f = func("noop", vec![]);
        let result = validate_function(&f, &[f.clone()]);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn oversized_body_is_rejected() {
        let f = func("big", (0..=MAX_FUNCTION_SIZE).map(|_| step()).collect());
        let result = validate_function(&f, &[f.clone()]);
        assert!(!result.is_valid());
        assert!(result.errors[0].contains("blocks"));
    }

    #[test]
    fn self_recursion_is_rejected() {
        let f = func("loopy", vec![call("loopy")]);
        let result = validate_function(&f, &[f.clone()]);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("calls itself")));
    }

    #[test]
    fn mutual_recursion_is_rejected() {
        let a = func("a", vec![call("b")]);
        let b = func("b", vec![call("a")]);
        let library = vec![a.clone(), b];
        let result = validate_function(&a, &library);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("cyclic")));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let d = func("d", vec![step()]);
        let c = func("c", vec![call("d")]);
        let b = func("b", vec![call("c")]);
        let a = func("a", vec![call("b")]);
        let library = vec![a.clone(), b.clone(), c, d];

        // b -> c -> d is depth 3, allowed.
        assert!(validate_function(&b, &library).is_valid());
        // a -> b -> c -> d is depth 4, rejected.
        let result = validate_function(&a, &library);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.contains("levels deep")));
    }

    #[test]
    fn dependencies_are_transitive_and_deduplicated() {
        let c = func("c", vec![step()]);
        let b = func("b", vec![call("c")]);
        let a = func("a", vec![call("b"), call("c")]);
        let library = vec![a.clone(), b, c];
        assert_eq!(dependencies(&a, &library), vec!["b", "c"]);
    }

    #[test]
    fn used_by_lists_callers() {
        let helper = func("helper", vec![step()]);
        let a = func("a", vec![call("helper")]);
        let b = func("b", vec![step()]);
        let library = vec![helper, a, b];
        assert_eq!(used_by("helper", &library), vec!["a"]);
        assert!(used_by("b", &library).is_empty());
    }

    #[test]
    fn total_blocks_includes_callee_bodies() {
        let helper = func("helper", vec![step(), step()]);
        let main = func("main", vec![step(), call("helper")]);
        let library = vec![main.clone(), helper];
        assert_eq!(total_blocks(&main, &library), 4);
    }
}
