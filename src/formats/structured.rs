//! JSON and YAML output, from the serde representation of the tree

use super::{FormatError, Formatter};
use crate::ast::File;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn serialize(&self, file: &File) -> Result<String, FormatError> {
        serde_json::to_string_pretty(file)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn serialize(&self, file: &File) -> Result<String, FormatError> {
        serde_yaml::to_string(file).map_err(|err| FormatError::SerializationError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{CullFace, RenderOption, Technique, UniformValue};

    fn sample() -> File {
        let mut technique = Technique::new(Some("main".into()));
        technique
            .options
            .push_option(RenderOption::CullFace(CullFace::Front));
        let mut file = File::default();
        file.options
            .push_uniform("scale", UniformValue::Vec2([1.0, 2.0]));
        file.techniques.push(technique);
        file
    }

    #[test]
    fn test_json_shape() {
        let json = JsonFormatter.serialize(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["uniforms"][0]["name"], "scale");
        assert_eq!(value["uniforms"][0]["value"]["Vec2"][1], 2.0);
        assert_eq!(value["techniques"][0]["name"], "main");
        assert_eq!(value["techniques"][0]["options"][0]["CullFace"], "Front");
        assert_eq!(value["techniques"][0]["passes"], serde_json::json!([]));
    }

    #[test]
    fn test_yaml_shape() {
        let yaml = YamlFormatter.serialize(&sample()).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(value["techniques"][0]["name"].as_str(), Some("main"));
        assert_eq!(value["uniforms"][0]["name"].as_str(), Some("scale"));
    }
}
