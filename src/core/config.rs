use crate::widgets::inputs::masked::{
    ConfigurationError, DEFAULT_PLACEHOLDER, FormatError, MaskFilter, MaskedInput,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("field '{field}': {source}")]
    Mask {
        field: String,
        #[source]
        source: ConfigurationError,
    },
    #[error("field '{field}': initial value: {source}")]
    Value {
        field: String,
        #[source]
        source: FormatError,
    },
}

fn default_placeholder() -> char {
    DEFAULT_PLACEHOLDER
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskConfig {
    pub mask: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: char,
}

impl MaskConfig {
    pub fn new(mask: impl Into<String>, placeholder: char) -> Self {
        Self {
            mask: mask.into(),
            placeholder,
        }
    }

    /// Brazilian taxpayer number.
    pub fn cpf() -> Self {
        Self::new("###.###.###-##", DEFAULT_PLACEHOLDER)
    }

    /// Brazilian postal code.
    pub fn cep() -> Self {
        Self::new("#####-###", '_')
    }

    pub fn phone() -> Self {
        Self::new("(##)#-####-####", DEFAULT_PLACEHOLDER)
    }

    pub fn build(&self) -> Result<MaskFilter, ConfigurationError> {
        MaskFilter::new(self.mask.as_str(), self.placeholder)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub mask: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: char,
    #[serde(default)]
    pub value: Option<String>,
}

impl FieldConfig {
    pub fn mask_config(&self) -> MaskConfig {
        MaskConfig::new(self.mask.clone(), self.placeholder)
    }

    pub fn build(&self) -> Result<MaskedInput, ConfigError> {
        let label = self.label.clone().unwrap_or_else(|| self.id.clone());
        let input = MaskedInput::from_config(self.id.clone(), label, &self.mask_config())
            .map_err(|source| ConfigError::Mask {
                field: self.id.clone(),
                source,
            })?;
        match self.value.as_deref() {
            Some(value) => input.with_default(value).map_err(|source| ConfigError::Value {
                field: self.id.clone(),
                source,
            }),
            None => Ok(input),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    pub fields: Vec<FieldConfig>,
}

impl FormConfig {
    /// CPF, CEP and phone fields.
    pub fn demo() -> Self {
        let field = |id: &str, label: &str, config: MaskConfig| FieldConfig {
            id: id.to_string(),
            label: Some(label.to_string()),
            mask: config.mask,
            placeholder: config.placeholder,
            value: None,
        };
        Self {
            fields: vec![
                field("cpf", "CPF", MaskConfig::cpf()),
                field("cep", "CEP", MaskConfig::cep()),
                field("phone", "Número", MaskConfig::phone()),
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_document(path)
    }

    pub fn build(&self) -> Result<Vec<MaskedInput>, ConfigError> {
        self.fields.iter().map(FieldConfig::build).collect()
    }
}

/// Reads a YAML or JSON document, chosen by file extension.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = DocumentFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?format, "loading document");
    format.parse(raw.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, raw: &str) -> Result<T, ConfigError> {
        match self {
            Self::Yaml => Ok(serde_yaml::from_str(raw)?),
            Self::Json => Ok(serde_json::from_str(raw)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DocumentFormat, FormConfig, MaskConfig};
    use std::path::Path;

    #[test]
    fn yaml_form_uses_default_placeholder() {
        let raw = r#"
fields:
  - id: cpf
    label: CPF
    mask: '###.###.###-##'
  - id: cep
    mask: '#####-###'
    placeholder: "_"
    value: "12345678"
"#;
        let form: FormConfig = DocumentFormat::Yaml.parse(raw).expect("yaml");
        assert_eq!(form.fields[0].placeholder, ' ');
        assert_eq!(form.fields[1].mask_config(), MaskConfig::cep());

        let inputs = form.build().expect("build");
        assert_eq!(inputs[0].value(), "   .   .   -  ");
        assert_eq!(inputs[1].label(), "cep");
        assert_eq!(inputs[1].value(), "12345-678");
    }

    #[test]
    fn json_mask_config() {
        let config: MaskConfig =
            DocumentFormat::Json.parse(r#"{"mask": "UU-##", "placeholder": "*"}"#).expect("json");
        let filter = config.build().expect("mask");
        assert_eq!(filter.empty_mask(), "**-**");
    }

    #[test]
    fn demo_form_builds() {
        let inputs = FormConfig::demo().build().expect("demo");
        let ids: Vec<&str> = inputs.iter().map(|input| input.id()).collect();
        assert_eq!(ids, vec!["cpf", "cep", "phone"]);
        assert_eq!(inputs[2].value(), "(  ) -    -    ");
    }

    #[test]
    fn invalid_field_reports_its_id() {
        let raw = r#"{"fields": [{"id": "broken", "mask": ""}]}"#;
        let form: FormConfig = DocumentFormat::Json.parse(raw).expect("json");
        let err = form.build().expect_err("empty mask");
        assert!(matches!(err, ConfigError::Mask { ref field, .. } if field == "broken"));
        assert_eq!(err.to_string(), "field 'broken': mask template is empty");
    }

    #[test]
    fn bad_initial_value_is_reported() {
        let raw = "fields:\n  - id: zip\n    mask: '#####'\n    value: abc\n";
        let form: FormConfig = DocumentFormat::Yaml.parse(raw).expect("yaml");
        assert!(matches!(form.build(), Err(ConfigError::Value { .. })));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            DocumentFormat::from_path(Path::new("form.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert_eq!(
            DocumentFormat::from_path(Path::new("form.yml")).expect("format"),
            DocumentFormat::Yaml
        );
    }
}
