//! 学習可能パラメータ
//!
//! `Parameter` は値を1つ包み、設定・置き換えのたびに
//! 勾配追跡とデバッグ名を値に反映します。

use std::fmt;

/// 勾配追跡に対応した値の機能
///
/// 自動微分側の値型が実装します。Parameterが呼ぶのはこの2つのメソッドのみです。
pub trait Trainable {
    /// 勾配追跡の有効・無効を設定
    fn requires_grad_(&mut self, requires_grad: bool);

    /// デバッグ名を設定
    fn set_name(&mut self, name: &str);
}

/// [`Parameter`] に格納できる値
///
/// 勾配追跡を持たない値はデフォルトの `as_trainable_mut`（`None`）のままにします。
/// [`Trainable`] を実装する型はこれをオーバーライドします。
///
/// # Example
///
/// ```
/// use lute_nn::{Parameter, ParameterValue, Trainable};
///
/// #[derive(Debug)]
/// struct Scalar {
///     data: f64,
///     requires_grad: bool,
///     name: Option<String>,
/// }
///
/// impl Trainable for Scalar {
///     fn requires_grad_(&mut self, requires_grad: bool) {
///         self.requires_grad = requires_grad;
///     }
///
///     fn set_name(&mut self, name: &str) {
///         self.name = Some(name.to_string());
///     }
/// }
///
/// impl ParameterValue for Scalar {
///     fn as_trainable_mut(&mut self) -> Option<&mut dyn Trainable> {
///         Some(self)
///     }
/// }
///
/// let p = Parameter::with_name(Scalar { data: 1.0, requires_grad: false, name: None }, "w");
/// assert!(p.value().requires_grad);
/// assert_eq!(p.value().name.as_deref(), Some("w"));
/// ```
pub trait ParameterValue {
    /// 勾配追跡用のビュー（対応していなければ `None`）
    fn as_trainable_mut(&mut self) -> Option<&mut dyn Trainable> {
        None
    }
}

impl ParameterValue for f32 {}
impl ParameterValue for f64 {}

/// 学習可能なパラメータを表すラッパー
///
/// [`Module`](crate::Module) が所有する名前付きの値です。
///
/// # Type Parameters
///
/// * `V` - 値の型（デフォルト: f64）
#[derive(Clone, PartialEq)]
pub struct Parameter<V: ParameterValue = f64> {
    value: V,
    name: Option<String>,
}

impl<V: ParameterValue> Parameter<V> {
    /// 名前なしのParameterを作成
    ///
    /// 値は自動的に勾配追跡が有効になります。
    pub fn new(value: V) -> Self {
        Self::from_parts(value, None)
    }

    /// 名前付きのParameterを作成（名前は値にも設定されます）
    pub fn with_name(value: V, name: impl Into<String>) -> Self {
        Self::from_parts(value, Some(name.into()))
    }

    fn from_parts(value: V, name: Option<String>) -> Self {
        let mut param = Self { value, name };
        param.track();
        param
    }

    /// 値を置き換え
    ///
    /// 新しい値は自動的に勾配追跡が有効になり、名前も設定されます。
    pub fn update(&mut self, value: V) {
        self.value = value;
        self.track();
    }

    fn track(&mut self) {
        if let Some(trainable) = self.value.as_trainable_mut() {
            trainable.requires_grad_(true);
            if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
                trainable.set_name(name);
            }
        }
    }

    /// デバッグ名
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// 値への可変参照を取得
    ///
    /// [`update`](Self::update) と異なり、勾配追跡は再設定しません。
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V: ParameterValue + fmt::Debug> fmt::Debug for Parameter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

impl<V: ParameterValue + fmt::Display> fmt::Display for Parameter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
