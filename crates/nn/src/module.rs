//! Module と登録処理
//!
//! [`Module`] は名前付きの子モジュール・パラメータ・属性を保持します。
//! 値は型に応じて [`Module::set_child`]、[`Module::set_parameter`]、
//! [`Module::set_attribute`]、または型で振り分ける [`Module::assign`] で登録します。
//!
//! 子モジュールは値として所有されるため、ツリーが循環することはありません。

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use log::{debug, trace};
use typed_builder::TypedBuilder;

use crate::error::{ModuleError, Result};
use crate::parameter::{Parameter, ParameterValue};

/// 修飾名の区切り文字
pub const SEPARATOR: char = '.';

/// プレフィックスとローカル名を連結
pub(crate) fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{SEPARATOR}{name}")
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(ModuleError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// [`Module`] の構築設定
///
/// # Example
///
/// ```
/// use lute_nn::{Module, ModuleConfig};
///
/// let frozen: Module = ModuleConfig::builder().label("Encoder").training(false).build();
/// assert_eq!(frozen.label(), "Encoder");
/// assert!(!frozen.is_training());
/// ```
#[derive(TypedBuilder)]
#[builder(build_method(into = Module<V>))]
pub struct ModuleConfig<V: ParameterValue = f64> {
    /// 表示用の型ラベル（デフォルト: `"Module"`）
    #[builder(default = String::from("Module"), setter(into))]
    label: String,
    /// 初期モード（デフォルト: 学習モード）
    #[builder(default = true)]
    training: bool,
    #[builder(default, setter(skip))]
    _value: PhantomData<V>,
}

impl<V: ParameterValue> From<ModuleConfig<V>> for Module<V> {
    fn from(config: ModuleConfig<V>) -> Self {
        Module {
            label: config.label,
            modules: IndexMap::new(),
            parameters: IndexMap::new(),
            attributes: IndexMap::new(),
            training: config.training,
        }
    }
}

/// モジュールツリーのノード
///
/// # Type Parameters
///
/// * `V` - パラメータが保持する値の型（デフォルト: f64）
pub struct Module<V: ParameterValue = f64> {
    pub(crate) label: String,
    pub(crate) modules: IndexMap<String, Module<V>>,
    pub(crate) parameters: IndexMap<String, Parameter<V>>,
    attributes: IndexMap<String, Box<dyn Any>>,
    pub(crate) training: bool,
}

/// [`Module::assign`] に渡す値
///
/// [`Parameter`] と [`Module`] からの変換で登録先が決まります。
/// それ以外の値は [`Slot::attribute`] で包みます。
pub enum Slot<V: ParameterValue = f64> {
    Parameter(Parameter<V>),
    Module(Module<V>),
    Attribute(Box<dyn Any>),
}

impl<V: ParameterValue> Slot<V> {
    /// 任意の値を属性として包む
    pub fn attribute<T: Any>(value: T) -> Self {
        Slot::Attribute(Box::new(value))
    }
}

impl<V: ParameterValue> From<Parameter<V>> for Slot<V> {
    fn from(param: Parameter<V>) -> Self {
        Slot::Parameter(param)
    }
}

impl<V: ParameterValue> From<Module<V>> for Slot<V> {
    fn from(module: Module<V>) -> Self {
        Slot::Module(module)
    }
}

impl<V: ParameterValue + fmt::Debug> fmt::Debug for Slot<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Parameter(p) => f.debug_tuple("Parameter").field(p).finish(),
            Slot::Module(m) => f.debug_tuple("Module").field(m).finish(),
            Slot::Attribute(_) => f.write_str("Attribute(..)"),
        }
    }
}

/// [`Module::get`] で参照した登録済みエントリ
#[derive(Debug)]
pub enum Entry<'a, V: ParameterValue = f64> {
    Parameter(&'a Parameter<V>),
    Module(&'a Module<V>),
}

impl<'a, V: ParameterValue> Entry<'a, V> {
    pub fn as_parameter(&self) -> Option<&'a Parameter<V>> {
        match *self {
            Entry::Parameter(p) => Some(p),
            Entry::Module(_) => None,
        }
    }

    pub fn as_module(&self) -> Option<&'a Module<V>> {
        match *self {
            Entry::Module(m) => Some(m),
            Entry::Parameter(_) => None,
        }
    }
}

/// 順伝播のトレイト
///
/// 層はパラメータ用に [`Module`] を持ち、計算はこのトレイトで実装します。
pub trait Forward<I> {
    type Output;

    fn forward(&self, input: I) -> Self::Output;
}

impl<V: ParameterValue> Default for Module<V> {
    fn default() -> Self {
        ModuleConfig::builder().build()
    }
}

impl<V: ParameterValue> Module<V> {
    /// 学習モードの空のModuleを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 型ラベル付きの空のModuleを作成
    pub fn labelled(label: impl Into<String>) -> Self {
        ModuleConfig::builder().label(label).build()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// このノード自身のモード
    pub fn is_training(&self) -> bool {
        self.training
    }

    /// このノードのモードのみ変更（子孫はそのまま）
    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    // ------------------------------------------------------------------
    // 登録
    // ------------------------------------------------------------------

    /// 子モジュールを登録し、置き換えた以前の子を返す
    pub fn set_child(&mut self, name: &str, module: Module<V>) -> Result<Option<Module<V>>> {
        validate_name(name)?;
        trace!("register child {:?} ({})", name, module.label);
        Ok(self.modules.insert(name.to_string(), module))
    }

    /// パラメータを登録し、置き換えた以前のパラメータを返す
    pub fn set_parameter(
        &mut self,
        name: &str,
        param: Parameter<V>,
    ) -> Result<Option<Parameter<V>>> {
        validate_name(name)?;
        trace!("register parameter {:?}", name);
        Ok(self.parameters.insert(name.to_string(), param))
    }

    /// 属性を保存（走査の対象外）
    pub fn set_attribute<T: Any>(&mut self, name: &str, value: T) -> Result<Option<Box<dyn Any>>> {
        validate_name(name)?;
        trace!("set attribute {:?}", name);
        Ok(self.attributes.insert(name.to_string(), Box::new(value)))
    }

    /// 値の型に応じて登録先を振り分ける
    ///
    /// 同じ名前空間の以前の値を返します。
    /// 名前空間は独立しており、パラメータと子モジュールは同名でも構いません。
    ///
    /// # Example
    ///
    /// ```
    /// use lute_nn::{Module, Parameter, Slot};
    ///
    /// let mut m: Module = Module::new();
    /// m.assign("w", Parameter::new(0.5)).unwrap();
    /// m.assign("layer", Module::new()).unwrap();
    /// m.assign("note", Slot::attribute("plain")).unwrap();
    ///
    /// assert!(m.parameter("w").is_some());
    /// assert!(m.child("layer").is_some());
    /// assert_eq!(m.parameters().len(), 1);
    /// ```
    pub fn assign(&mut self, name: &str, value: impl Into<Slot<V>>) -> Result<Option<Slot<V>>> {
        let previous = match value.into() {
            Slot::Parameter(p) => self.set_parameter(name, p)?.map(Slot::Parameter),
            Slot::Module(m) => self.set_child(name, m)?.map(Slot::Module),
            Slot::Attribute(a) => {
                validate_name(name)?;
                trace!("set attribute {:?}", name);
                self.attributes.insert(name.to_string(), a).map(Slot::Attribute)
            }
        };
        Ok(previous)
    }

    /// 値をParameterで包んで登録
    pub fn add_parameter(&mut self, name: &str, value: V) -> Result<&mut Parameter<V>> {
        self.set_parameter(name, Parameter::with_name(value, name))?;
        self.parameters
            .get_mut(name)
            .ok_or_else(|| ModuleError::MissingParameter {
                path: name.to_string(),
            })
    }

    pub fn remove_child(&mut self, name: &str) -> Option<Module<V>> {
        self.modules.shift_remove(name)
    }

    pub fn remove_parameter(&mut self, name: &str) -> Option<Parameter<V>> {
        self.parameters.shift_remove(name)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Box<dyn Any>> {
        self.attributes.shift_remove(name)
    }

    // ------------------------------------------------------------------
    // 参照
    // ------------------------------------------------------------------

    /// ローカル名を解決（パラメータ、子モジュールの順）
    ///
    /// 未登録の名前と属性は `None` になります。
    pub fn get(&self, name: &str) -> Option<Entry<'_, V>> {
        if let Some(p) = self.parameters.get(name) {
            return Some(Entry::Parameter(p));
        }
        self.modules.get(name).map(Entry::Module)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter<V>> {
        self.parameters.get(name)
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter<V>> {
        self.parameters.get_mut(name)
    }

    pub fn child(&self, name: &str) -> Option<&Module<V>> {
        self.modules.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Module<V>> {
        self.modules.get_mut(name)
    }

    /// 属性を型指定で取得（存在しないか型が異なれば `None`）
    pub fn attribute<T: Any>(&self, name: &str) -> Option<&T> {
        self.attributes.get(name)?.downcast_ref::<T>()
    }

    pub fn attribute_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.attributes.get_mut(name)?.downcast_mut::<T>()
    }

    /// `"encoder.layer1"` のような修飾パスを解決
    ///
    /// 空のパスは `self` を指します。
    pub fn get_submodule(&self, path: &str) -> Result<&Module<V>> {
        if path.is_empty() {
            return Ok(self);
        }
        let mut node = self;
        for name in path.split(SEPARATOR) {
            node = node
                .modules
                .get(name)
                .ok_or_else(|| ModuleError::MissingSubmodule {
                    path: path.to_string(),
                })?;
        }
        Ok(node)
    }

    pub fn get_submodule_mut(&mut self, path: &str) -> Result<&mut Module<V>> {
        if path.is_empty() {
            return Ok(self);
        }
        let mut node = self;
        for name in path.split(SEPARATOR) {
            node = node
                .modules
                .get_mut(name)
                .ok_or_else(|| ModuleError::MissingSubmodule {
                    path: path.to_string(),
                })?;
        }
        Ok(node)
    }

    /// `"encoder.layer1.weight"` のような修飾名でパラメータを取得
    pub fn get_parameter(&self, path: &str) -> Result<&Parameter<V>> {
        let (module_path, name) = path.rsplit_once(SEPARATOR).unwrap_or(("", path));
        let missing = || ModuleError::MissingParameter {
            path: path.to_string(),
        };
        self.get_submodule(module_path)
            .map_err(|_| missing())?
            .parameters
            .get(name)
            .ok_or_else(missing)
    }

    pub fn get_parameter_mut(&mut self, path: &str) -> Result<&mut Parameter<V>> {
        let (module_path, name) = path.rsplit_once(SEPARATOR).unwrap_or(("", path));
        let missing = || ModuleError::MissingParameter {
            path: path.to_string(),
        };
        self.get_submodule_mut(module_path)
            .map_err(|_| missing())?
            .parameters
            .get_mut(name)
            .ok_or_else(missing)
    }

    // ------------------------------------------------------------------
    // 子モジュール
    // ------------------------------------------------------------------

    /// 直接の子モジュール（登録順）
    pub fn modules(&self) -> Vec<&Module<V>> {
        self.modules.values().collect()
    }

    /// 直接の子モジュールとローカル名（登録順）
    pub fn named_children(&self) -> impl Iterator<Item = (&str, &Module<V>)> {
        self.modules.iter().map(|(name, m)| (name.as_str(), m))
    }

    /// すべての子孫と修飾パス（深さ優先）
    ///
    /// ルート自身は含みません。
    pub fn named_modules(&self) -> Vec<(String, &Module<V>)> {
        let mut out = Vec::new();
        self.walk(|path, node| {
            if !path.is_empty() {
                out.push((path.to_string(), node));
            }
        });
        out
    }

    // ------------------------------------------------------------------
    // モード伝播
    // ------------------------------------------------------------------

    /// 自身とすべての子孫を学習モードに設定
    pub fn train(&mut self) {
        self.propagate_mode(true);
    }

    /// 自身とすべての子孫を評価モードに設定
    pub fn eval(&mut self) {
        self.propagate_mode(false);
    }

    fn propagate_mode(&mut self, training: bool) {
        let mut visited = 0usize;
        self.walk_mut(|_, mut node| {
            node.set_training(training);
            visited += 1;
        });
        debug!("set training={} on {} module(s)", training, visited);
    }

    // ------------------------------------------------------------------
    // パラメータ列挙
    // ------------------------------------------------------------------

    /// サブツリーのすべてのパラメータと修飾名
    ///
    /// 各ノードは自身のパラメータを登録順に返し、
    /// その後に子モジュールのサブツリーが登録順に続きます。
    pub fn named_parameters(&self) -> Vec<(String, &Parameter<V>)> {
        let mut out = Vec::new();
        self.walk(|path, node| {
            for (name, param) in &node.parameters {
                out.push((qualify(path, name), param));
            }
        });
        debug!("collected {} named parameter(s)", out.len());
        out
    }

    /// サブツリーのすべてのパラメータ（[`named_parameters`](Self::named_parameters) と同じ順序）
    pub fn parameters(&self) -> Vec<&Parameter<V>> {
        self.named_parameters().into_iter().map(|(_, p)| p).collect()
    }

    pub fn named_parameters_mut(&mut self) -> Vec<(String, &mut Parameter<V>)> {
        let mut out = Vec::new();
        self.walk_mut(|path, node| {
            for (name, param) in node.into_parameters() {
                out.push((qualify(path, name), param));
            }
        });
        out
    }

    pub fn parameters_mut(&mut self) -> Vec<&mut Parameter<V>> {
        self.named_parameters_mut()
            .into_iter()
            .map(|(_, p)| p)
            .collect()
    }

    /// サブツリーのパラメータ数
    pub fn num_parameters(&self) -> usize {
        let mut count = 0;
        self.walk(|_, node| count += node.parameters.len());
        count
    }
}

impl<V: ParameterValue> AsRef<Module<V>> for Module<V> {
    fn as_ref(&self) -> &Module<V> {
        self
    }
}

impl<V: ParameterValue> AsMut<Module<V>> for Module<V> {
    fn as_mut(&mut self) -> &mut Module<V> {
        self
    }
}

impl<V: ParameterValue + fmt::Debug> fmt::Debug for Module<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(&self.label)
            .field("training", &self.training)
            .field("parameters", &self.parameters)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("modules", &self.modules)
            .finish()
    }
}
