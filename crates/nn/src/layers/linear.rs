//! 全結合層（Linear Layer）
//!
//! 重み・バイアスの各要素をスカラーのParameterとして持ちます。

use rand::Rng;
use typed_builder::TypedBuilder;

use crate::error::{ModuleError, Result};
use crate::module::{Forward, Module};

const IN_FEATURES: &str = "in_features";
const OUT_FEATURES: &str = "out_features";

/// `init_range` の上限（`2 * init_range` が有限であること）
pub const MAX_INIT_RANGE: f64 = f64::MAX / 2.0;

/// Linear層の設定
///
/// `build()` は `Result<Linear>` を返します。
#[derive(TypedBuilder)]
#[builder(build_method(into = Result<Linear>))]
pub struct LinearConfig {
    /// 入力特徴数
    in_features: usize,
    /// 出力特徴数
    out_features: usize,
    /// バイアスの有無（デフォルト: true）
    #[builder(default = true)]
    bias: bool,
    /// 重みの初期値は `[-init_range, init_range)` の一様分布（デフォルト: 0.5）
    #[builder(default = 0.5)]
    init_range: f64,
}

impl From<LinearConfig> for Result<Linear> {
    fn from(config: LinearConfig) -> Self {
        let range = config.init_range.abs();
        if !range.is_finite() || range > MAX_INIT_RANGE {
            return Err(ModuleError::InvalidInitRange {
                value: config.init_range,
            });
        }

        let mut rng = rand::thread_rng();
        let mut module = Module::labelled("Linear");

        for i in 0..config.in_features {
            for j in 0..config.out_features {
                let init = if range > 0.0 {
                    rng.gen_range(-range..range)
                } else {
                    0.0
                };
                module.add_parameter(&format!("weight_{i}_{j}"), init)?;
            }
        }
        if config.bias {
            for j in 0..config.out_features {
                module.add_parameter(&format!("bias_{j}"), 0.0)?;
            }
        }
        module.set_attribute(IN_FEATURES, config.in_features)?;
        module.set_attribute(OUT_FEATURES, config.out_features)?;

        Ok(Linear { module })
    }
}

/// 全結合層
///
/// `y_j = sum_i x_i * weight_i_j + bias_j`
///
/// 重み・バイアスはすべてこの層の [`Module`] に登録されるため、
/// 任意のツリーに組み込めます。
///
/// # Example
///
/// ```
/// use lute_nn::{Forward, Linear};
///
/// let linear = Linear::new(3, 2).init_range(0.0).build().unwrap();
/// assert_eq!(linear.as_module().num_parameters(), 3 * 2 + 2);
/// assert_eq!(linear.forward(&[1.0, 2.0, 3.0][..]).unwrap(), vec![0.0, 0.0]);
///
/// // biasなし
/// let no_bias = Linear::new(3, 2).bias(false).build().unwrap();
/// assert_eq!(no_bias.as_module().num_parameters(), 6);
/// ```
pub struct Linear {
    module: Module,
}

impl Linear {
    /// 新しいLinear層のビルダーを作成
    ///
    /// デフォルトではbiasが有効です。
    #[allow(clippy::new_ret_no_self)]
    pub fn new(
        in_features: usize,
        out_features: usize,
    ) -> LinearConfigBuilder<((usize,), (usize,), (), ())> {
        LinearConfig::builder()
            .in_features(in_features)
            .out_features(out_features)
    }

    /// 入力特徴数
    pub fn in_features(&self) -> usize {
        self.module.attribute::<usize>(IN_FEATURES).copied().unwrap_or(0)
    }

    /// 出力特徴数
    pub fn out_features(&self) -> usize {
        self.module.attribute::<usize>(OUT_FEATURES).copied().unwrap_or(0)
    }

    pub fn as_module(&self) -> &Module {
        &self.module
    }

    pub fn as_module_mut(&mut self) -> &mut Module {
        &mut self.module
    }

    /// 層を手放してModuleだけを取り出す
    ///
    /// 子モジュールとして登録した後は [`linear`] で同じ計算を行えます。
    pub fn into_module(self) -> Module {
        self.module
    }
}

impl AsRef<Module> for Linear {
    fn as_ref(&self) -> &Module {
        &self.module
    }
}

impl AsMut<Module> for Linear {
    fn as_mut(&mut self) -> &mut Module {
        &mut self.module
    }
}

impl<'a> Forward<&'a [f64]> for Linear {
    type Output = Result<Vec<f64>>;

    /// 順伝播
    fn forward(&self, input: &'a [f64]) -> Self::Output {
        linear(&self.module, input)
    }
}

fn feature_count(module: &Module, name: &str) -> Result<usize> {
    module
        .attribute::<usize>(name)
        .copied()
        .ok_or_else(|| ModuleError::MissingAttribute {
            name: name.to_string(),
        })
}

/// [`LinearConfig`] で構築したModuleに `input` を適用
pub fn linear(module: &Module, input: &[f64]) -> Result<Vec<f64>> {
    let in_features = feature_count(module, IN_FEATURES)?;
    let out_features = feature_count(module, OUT_FEATURES)?;
    if input.len() != in_features {
        return Err(ModuleError::InputSize {
            expected: in_features,
            actual: input.len(),
        });
    }

    let mut output = Vec::with_capacity(out_features);
    for j in 0..out_features {
        let mut acc = module
            .parameter(&format!("bias_{j}"))
            .map_or(0.0, |b| *b.value());
        for (i, x) in input.iter().enumerate() {
            let name = format!("weight_{i}_{j}");
            let w = module
                .parameter(&name)
                .ok_or(ModuleError::MissingParameter { path: name })?;
            acc += x * w.value();
        }
        output.push(acc);
    }
    Ok(output)
}
