//! Lute scalar operators
//!
//! Stateless numeric helpers used alongside the module tree:
//!
//! - [`operators`]: elementary functions (`sigmoid`, `relu`, ...) and the
//!   backward helpers used by an autodiff layer
//! - [`functional`]: `map`, `zip_with`, `reduce` and list helpers built on
//!   them
//!
//! # Example
//!
//! ```
//! use lute_ops::prelude::*;
//!
//! let activations = map(relu)(&[-1.0, 0.5, 2.0]);
//! assert_eq!(activations, vec![0.0, 0.5, 2.0]);
//! assert_eq!(sum(&activations), 2.5);
//! ```

pub mod error;
pub mod functional;
pub mod operators;

pub mod prelude {
    //! Commonly used functions
    pub use crate::error::OpsError;
    pub use crate::functional::*;
    pub use crate::operators::*;
}

pub use error::{OpsError, Result};
