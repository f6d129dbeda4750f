//! モジュールツリーの文字列表現

use std::fmt;

use crate::module::Module;
use crate::parameter::ParameterValue;

const INDENT: usize = 2;

/// 先頭行以外を `spaces` だけインデント
fn add_indent(s: &str, spaces: usize) -> String {
    let mut lines = s.split('\n');
    let mut out = lines.next().unwrap_or_default().to_string();
    let pad = " ".repeat(spaces);
    for line in lines {
        out.push('\n');
        out.push_str(&pad);
        out.push_str(line);
    }
    out
}

impl<V: ParameterValue> fmt::Display for Module<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.label)?;
        if !self.modules.is_empty() {
            writeln!(f)?;
            for (name, child) in &self.modules {
                let child_repr = add_indent(&child.to_string(), INDENT);
                writeln!(f, "{:width$}({}): {}", "", name, child_repr, width = INDENT)?;
            }
        }
        write!(f, ")")
    }
}
