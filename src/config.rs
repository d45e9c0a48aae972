use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

/// Key/value blackboard populated from the attributes of an XML file's root
/// element. Missing keys fall back to caller-supplied defaults, so a missing
/// or malformed metadata file degrades to an empty configuration.
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    values: HashMap<String, String>,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the metadata file at `path`. Failures are logged as warnings and
    /// an empty blackboard is returned.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => match Self::from_xml_str(&text) {
                Ok(Some(config)) => config,
                Ok(None) => {
                    warn!("metadata file \"{}\" was invalid (missing root element)", path.display());
                    Self::default()
                }
                Err(err) => {
                    warn!("malformed metadata XML in \"{}\": {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                warn!("failed to load metadata from file \"{}\": {err}", path.display());
                Self::default()
            }
        }
    }

    /// Populates the blackboard from the root element's attributes. Returns
    /// `Ok(None)` when the document has no root element and `Err` when the
    /// XML cannot be parsed at all.
    pub fn from_xml_str(text: &str) -> Result<Option<Self>, quick_xml::Error> {
        let mut reader = Reader::from_str(text);
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    let mut values = HashMap::new();
                    for attr in e.attributes().flatten() {
                        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                        if let Ok(value) = attr.unescape_value() {
                            values.insert(key, value.into_owned());
                        }
                    }
                    return Ok(Some(Self { values }));
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values.get(key).cloned().unwrap_or_else(|| default.to_string())
    }

    pub fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.values
            .get(key)
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA: &str = r#"<ModelMetaData objFile="data/models/woman.obj" shader="BlinnPhong"
        unitsPerMeter="0.02" x="left" y="up" z="forward"/>"#;

    #[test]
    fn parses_root_element_attributes() {
        let config = GameConfig::from_xml_str(METADATA).unwrap().unwrap();
        assert_eq!(config.get_string("objFile", ""), "data/models/woman.obj");
        assert_eq!(config.get_string("shader", ""), "BlinnPhong");
        assert_eq!(config.get_f32("unitsPerMeter", 0.0), 0.02);
        assert_eq!(config.get_string("x", "left"), "left");
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = GameConfig::from_xml_str("<Empty/>").unwrap().unwrap();
        assert_eq!(config.get_string("objFile", ""), "");
        assert_eq!(config.get_f32("unitsPerMeter", 0.0), 0.0);
        assert_eq!(config.get_string("y", "up"), "up");
    }

    #[test]
    fn document_without_root_element_is_rejected() {
        assert!(matches!(GameConfig::from_xml_str(""), Ok(None)));
        assert!(matches!(GameConfig::from_xml_str("   <!-- nothing here -->  "), Ok(None)));
    }

    #[test]
    fn parse_errors_are_not_missing_roots() {
        // A truncated tag is a parse error, not an empty document.
        assert!(GameConfig::from_xml_str("<ModelMetaData").is_err());

        // Loading such a file still degrades to an empty blackboard.
        let path = std::env::temp_dir().join("modelview_malformed_metadata.xml");
        fs::write(&path, "<ModelMetaData").unwrap();
        let config = GameConfig::load(&path);
        assert_eq!(config.get_string("objFile", ""), "");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let config = GameConfig::from_xml_str(r#"<M unitsPerMeter="lots"/>"#).unwrap().unwrap();
        assert_eq!(config.get_f32("unitsPerMeter", 1.5), 1.5);
    }

    #[test]
    fn missing_file_yields_empty_blackboard() {
        let config = GameConfig::load("does/not/exist.xml");
        assert_eq!(config.get_string("objFile", ""), "");
    }
}
