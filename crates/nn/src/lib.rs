//! Lute ニューラルネットワークモジュール
//!
//! ニューラルネットワークモデルのパラメータ管理を提供します。
//!
//! # 概要
//!
//! - **Module**: 名前付きの子モジュールとパラメータを持つツリーのノード
//! - **Parameter**: 対応する値の勾配追跡を有効にする名前付きの値
//! - **走査**: モード伝播とパラメータ列挙が共有する深さ優先の走査
//!
//! # Example
//!
//! ```
//! use lute_nn::prelude::*;
//!
//! let mut child: Module = Module::new();
//! child.add_parameter("w", 1.0).unwrap();
//!
//! let mut root: Module = Module::new();
//! root.set_child("child", child).unwrap();
//!
//! root.eval();
//! assert!(!root.child("child").unwrap().is_training());
//!
//! let named = root.named_parameters();
//! assert_eq!(named[0].0, "child.w");
//! ```

pub mod error;
pub mod layers;
pub mod module;
pub mod parameter;
mod repr;
pub mod traverse;

pub mod prelude {
    //! よく使う型
    pub use crate::error::ModuleError;
    pub use crate::layers::*;
    pub use crate::module::*;
    pub use crate::parameter::*;
}

pub use error::{ModuleError, Result};
pub use layers::*;
pub use module::{Entry, Forward, Module, ModuleConfig, SEPARATOR, Slot};
pub use parameter::{Parameter, ParameterValue, Trainable};
pub use traverse::NodeMut;
