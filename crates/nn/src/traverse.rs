//! サブツリーの走査
//!
//! [`Module`] の再帰的な操作はすべて [`Module::walk`] か [`Module::walk_mut`] を通ります。
//! どちらもルート（空のパス）を最初に訪問し、その後に子のサブツリーを登録順に訪問します。

use indexmap::map::IterMut;

use crate::module::{Module, qualify};
use crate::parameter::{Parameter, ParameterValue};

/// [`Module::walk_mut`] が渡すノードの可変ビュー
///
/// 訪問時点で子モジュールは走査待ちに入っているため、子の登録表は含みません。
pub struct NodeMut<'a, V: ParameterValue> {
    label: &'a str,
    training: &'a mut bool,
    parameters: &'a mut indexmap::IndexMap<String, Parameter<V>>,
}

impl<'a, V: ParameterValue> NodeMut<'a, V> {
    pub fn label(&self) -> &str {
        self.label
    }

    pub fn is_training(&self) -> bool {
        *self.training
    }

    pub fn set_training(&mut self, training: bool) {
        *self.training = training;
    }

    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter<V>> {
        self.parameters.get_mut(name)
    }

    /// このノードのパラメータを走査の残りの間借用する
    pub fn into_parameters(self) -> IterMut<'a, String, Parameter<V>> {
        self.parameters.iter_mut()
    }
}

impl<V: ParameterValue> Module<V> {
    /// 自身とすべての子孫を深さ優先で訪問
    ///
    /// 各ノードの修飾パス（ルートは `""`）が渡されます。
    /// 渡された参照は保持しても構いません。
    ///
    /// # Example
    ///
    /// ```
    /// use lute_nn::Module;
    ///
    /// let mut root: Module = Module::new();
    /// let mut encoder: Module = Module::new();
    /// encoder.set_child("layer", Module::new()).unwrap();
    /// root.set_child("encoder", encoder).unwrap();
    ///
    /// let mut paths = Vec::new();
    /// root.walk(|path, _| paths.push(path.to_string()));
    /// assert_eq!(paths, ["", "encoder", "encoder.layer"]);
    /// ```
    pub fn walk<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&str, &'a Module<V>),
    {
        let mut stack: Vec<(String, &'a Module<V>)> = vec![(String::new(), self)];
        while let Some((path, node)) = stack.pop() {
            visit(&path, node);
            // 最初の子が先にpopされるよう逆順に積む
            for (name, child) in node.modules.iter().rev() {
                stack.push((qualify(&path, name), child));
            }
        }
    }

    /// [`walk`](Self::walk) の可変版（訪問順は同じ）
    pub fn walk_mut<'a, F>(&'a mut self, mut visit: F)
    where
        F: FnMut(&str, NodeMut<'a, V>),
    {
        let mut stack: Vec<(String, &'a mut Module<V>)> = vec![(String::new(), self)];
        while let Some((path, node)) = stack.pop() {
            let Module {
                label,
                modules,
                parameters,
                training,
                ..
            } = node;
            for (name, child) in modules.iter_mut().rev() {
                stack.push((qualify(&path, name), child));
            }
            visit(
                &path,
                NodeMut {
                    label,
                    training,
                    parameters,
                },
            );
        }
    }
}
