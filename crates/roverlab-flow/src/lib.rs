//! Authored-graph tooling for the Roverlab execution core: structural
//! validation of flow graphs, conversion to instruction trees, and
//! validation of user-authored functions.

pub mod convert;
pub mod error;
pub mod function_check;
pub mod validate;

pub use convert::GraphConverter;
pub use error::ConvertError;
pub use function_check::{
    dependencies, total_blocks, used_by, validate_function, FunctionValidation,
    MAX_FUNCTION_DEPTH, MAX_FUNCTION_SIZE,
};
pub use validate::{validate_graph, GraphValidation};
