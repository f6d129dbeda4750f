//! Lute: a minimal neural network framework
//!
//! Lute organizes a model as a tree of modules. Each module owns its named
//! parameters and named child modules, and the tree supports switching
//! train/eval mode and enumerating parameters under dotted path names.
//!
//! # Architecture
//!
//! Lute provides:
//! - **nn**: module tree, parameter cells and the scalar `Linear` layer
//!   (crate `lute-nn`)
//! - **ops**: scalar operators, backward helpers and list combinators
//!   (crate `lute-ops`)
//!
//! The `lute` binary lives in the `lute-cli` crate.
//!
//! # Example
//!
//! ```
//! use lute::prelude::*;
//!
//! let mut model: Module = Module::labelled("Model");
//! model
//!     .set_child("fc", Linear::new(2, 1).init_range(0.0).build().unwrap().into_module())
//!     .unwrap();
//!
//! model.eval();
//! assert!(!model.get_submodule("fc").unwrap().is_training());
//!
//! let names: Vec<_> = model.named_parameters().into_iter().map(|(n, _)| n).collect();
//! assert_eq!(names, ["fc.weight_0_0", "fc.weight_1_0", "fc.bias_0"]);
//! ```

// ============================================================================
// Crates
// ============================================================================

pub use lute_nn as nn;
pub use lute_ops as ops;

// ============================================================================
// Re-exports
// ============================================================================

// Module tree
pub use lute_nn::{Forward, Linear, LinearConfig, Module, ModuleConfig, ModuleError, Parameter};

// Extension points for parameter values
pub use lute_nn::{ParameterValue, Trainable};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module with commonly used types and functions
pub mod prelude {
    // Module tree
    pub use lute_nn::prelude::*;

    // Scalar operators
    pub use lute_ops::prelude::*;
}
