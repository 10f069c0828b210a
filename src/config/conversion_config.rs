use crate::error_handling::Error::{IOError, InvalidConfig, YamlParsingError};
use crate::error_handling::Result;
use indexmap::IndexMap;
use serde_yaml::Value;
use std::io::Read;
use std::rc::Rc;

// Limits applied to a single conversion, enforced while parsing and before any automaton is
// built. The class size bounds the alphabet, which the input length alone does not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionConfig {
    max_input_length: usize,
    max_nesting_depth: usize,
    max_class_size: usize,
}

impl ConversionConfig {
    pub const DEFAULT_MAX_INPUT_LENGTH: usize = 1024;
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;
    pub const DEFAULT_MAX_CLASS_SIZE: usize = 256;

    const MAX_INPUT_LENGTH_KEY: &'static str = "max_input_length";
    const MAX_NESTING_DEPTH_KEY: &'static str = "max_nesting_depth";
    const MAX_CLASS_SIZE_KEY: &'static str = "max_class_size";

    pub fn new(max_input_length: usize, max_nesting_depth: usize) -> Self {
        Self {
            max_input_length,
            max_nesting_depth,
            max_class_size: Self::DEFAULT_MAX_CLASS_SIZE,
        }
    }

    pub fn with_max_class_size(mut self, max_class_size: usize) -> Self {
        self.max_class_size = max_class_size;
        self
    }

    pub fn get_max_input_length(&self) -> usize {
        self.max_input_length
    }

    pub fn get_max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    pub fn get_max_class_size(&self) -> usize {
        self.max_class_size
    }

    pub fn parse_from_file(yaml_file_path: &str) -> Result<Rc<ConversionConfig>> {
        match std::fs::File::open(yaml_file_path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    return Err(IOError(e));
                }
                Ok(Rc::new(Self::parse_from_str(contents.as_str())?))
            }
            Err(e) => Err(IOError(e)),
        }
    }

    pub fn parse_from_str(yaml_content: &str) -> Result<ConversionConfig> {
        match Self::load_kv_pairs_from_yaml_content(yaml_content) {
            Ok(kv_pairs) => Self::load_from_kv_pairs(kv_pairs),
            Err(e) => Err(YamlParsingError(e)),
        }
    }

    fn load_kv_pairs_from_yaml_content(
        yaml_content: &str,
    ) -> serde_yaml::Result<IndexMap<String, Value>> {
        // An empty document means "all defaults"
        if yaml_content.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        let kv_map_result: IndexMap<String, Value> = serde_yaml::from_str(yaml_content)?;
        Ok(kv_map_result)
    }

    fn get_usize(kv_map: &IndexMap<String, Value>, key: &'static str, default: usize) -> Result<usize> {
        match kv_map.get(key) {
            None => Ok(default),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| usize::try_from(v).ok())
                .ok_or(InvalidConfig(key)),
            Some(_) => Err(InvalidConfig(key)),
        }
    }

    fn load_from_kv_pairs(kv_pairs: IndexMap<String, Value>) -> Result<Self> {
        for key in kv_pairs.keys() {
            if key != Self::MAX_INPUT_LENGTH_KEY
                && key != Self::MAX_NESTING_DEPTH_KEY
                && key != Self::MAX_CLASS_SIZE_KEY
            {
                return Err(InvalidConfig("unknown key"));
            }
        }

        let max_input_length = Self::get_usize(
            &kv_pairs,
            Self::MAX_INPUT_LENGTH_KEY,
            Self::DEFAULT_MAX_INPUT_LENGTH,
        )?;
        let max_nesting_depth = Self::get_usize(
            &kv_pairs,
            Self::MAX_NESTING_DEPTH_KEY,
            Self::DEFAULT_MAX_NESTING_DEPTH,
        )?;
        let max_class_size = Self::get_usize(
            &kv_pairs,
            Self::MAX_CLASS_SIZE_KEY,
            Self::DEFAULT_MAX_CLASS_SIZE,
        )?;

        Ok(Self {
            max_input_length,
            max_nesting_depth,
            max_class_size,
        })
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MAX_INPUT_LENGTH,
            Self::DEFAULT_MAX_NESTING_DEPTH,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::Error;

    #[test]
    fn test_read_demo_config_file() -> Result<()> {
        let project_root = env!("CARGO_MANIFEST_DIR");
        let config_path = std::path::Path::new(project_root)
            .join("demos")
            .join("config.yaml");
        let config = ConversionConfig::parse_from_file(config_path.to_str().unwrap())?;

        assert_eq!(config.get_max_input_length(), 512);
        assert_eq!(config.get_max_nesting_depth(), 32);
        assert_eq!(config.get_max_class_size(), 128);
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config = ConversionConfig::parse_from_str("")?;
        assert_eq!(config, ConversionConfig::default());

        let config = ConversionConfig::parse_from_str("max_nesting_depth: 8\n")?;
        assert_eq!(config.get_max_nesting_depth(), 8);
        assert_eq!(
            config.get_max_input_length(),
            ConversionConfig::DEFAULT_MAX_INPUT_LENGTH
        );
        assert_eq!(
            config.get_max_class_size(),
            ConversionConfig::DEFAULT_MAX_CLASS_SIZE
        );

        let config = ConversionConfig::parse_from_str("max_class_size: 16\n")?;
        assert_eq!(config, ConversionConfig::default().with_max_class_size(16));
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ConversionConfig::parse_from_str("max_input_length: -3\n"),
            Err(Error::InvalidConfig("max_input_length"))
        ));
        assert!(matches!(
            ConversionConfig::parse_from_str("max_nesting_depth: deep\n"),
            Err(Error::InvalidConfig("max_nesting_depth"))
        ));
        assert!(matches!(
            ConversionConfig::parse_from_str("colour: blue\n"),
            Err(Error::InvalidConfig("unknown key"))
        ));
        assert!(matches!(
            ConversionConfig::parse_from_str("[unclosed"),
            Err(Error::YamlParsingError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ConversionConfig::parse_from_file("/nonexistent/regex-fa.yaml"),
            Err(Error::IOError(_))
        ));
    }
}
