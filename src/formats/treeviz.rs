//! Treeviz formatter for compiled documents
//!
//! One line per node, with the node structure drawn as box connectors:
//!
//! ```text
//! ⧉ document
//! ├─ ⚙ CullFace None
//! └─ ◆ technique: main
//!   ├─ ≡ SetUniform tint: (1, 0.5, 0.25, 1)
//!   └─ ▭ pass: <unnamed>
//!     └─ ⚙ DepthTest On
//! ```
//!
//! Icons
//!     File: ⧉
//!     Technique: ◆
//!     Pass: ▭
//!     Option: ⚙
//!     Uniform: ≡

use super::{FormatError, Formatter};
use crate::ast::{File, OptionList, Pass, RenderOption, Technique, Uniform};

enum Node<'a> {
    Option(&'a RenderOption),
    Uniform(&'a Uniform),
    Technique(&'a Technique),
    Pass(&'a Pass),
}

fn name_label(name: Option<&str>) -> &str {
    name.unwrap_or("<unnamed>")
}

fn list_nodes(list: &OptionList) -> impl Iterator<Item = Node<'_>> {
    list.options
        .iter()
        .map(Node::Option)
        .chain(list.uniforms.iter().map(Node::Uniform))
}

pub fn to_treeviz_str(file: &File) -> String {
    let mut result = String::from("⧉ document\n");
    let children: Vec<Node> = list_nodes(&file.options)
        .chain(file.techniques.iter().map(Node::Technique))
        .collect();
    append_children(&mut result, &children, "");
    result
}

fn append_children(result: &mut String, children: &[Node], prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        append_node(result, child, prefix, is_last);
    }
}

fn append_node(result: &mut String, node: &Node, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let label = match node {
        Node::Option(option) => format!("⚙ {}", option),
        Node::Uniform(uniform) => format!("≡ SetUniform {}: {}", uniform.name, uniform.value),
        Node::Technique(technique) => {
            format!("◆ technique: {}", name_label(technique.name.as_deref()))
        }
        Node::Pass(pass) => format!("▭ pass: {}", name_label(pass.name.as_deref())),
    };
    result.push_str(&format!("{}{} {}\n", prefix, connector, label));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    match node {
        Node::Technique(technique) => {
            let children: Vec<Node> = list_nodes(&technique.options)
                .chain(technique.passes.iter().map(Node::Pass))
                .collect();
            append_children(result, &children, &new_prefix);
        }
        Node::Pass(pass) => {
            let children: Vec<Node> = list_nodes(&pass.options).collect();
            append_children(result, &children, &new_prefix);
        }
        Node::Option(_) | Node::Uniform(_) => {}
    }
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn serialize(&self, file: &File) -> Result<String, FormatError> {
        Ok(to_treeviz_str(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CullFace, UniformValue};

    #[test]
    fn test_empty_document() {
        assert_eq!(to_treeviz_str(&File::default()), "⧉ document\n");
    }

    #[test]
    fn test_nested_prefixes() {
        let mut pass = Pass::new(None);
        pass.options.push_option(RenderOption::DepthTest(true));
        let mut technique = Technique::new(Some("main".into()));
        technique
            .options
            .push_uniform("tint", UniformValue::Vec4([1.0, 0.5, 0.25, 1.0]));
        technique.passes.push(pass);
        let mut file = File::default();
        file.options
            .push_option(RenderOption::CullFace(CullFace::None));
        file.techniques.push(technique);

        let expected = [
            "⧉ document",
            "├─ ⚙ CullFace None",
            "└─ ◆ technique: main",
            "  ├─ ≡ SetUniform tint: (1, 0.5, 0.25, 1)",
            "  └─ ▭ pass: <unnamed>",
            "    └─ ⚙ DepthTest On",
        ];
        assert_eq!(to_treeviz_str(&file), expected.join("\n") + "\n");
    }
}
