//! The symbol model file handed over by an extraction front-end.

use anyhow::Context;
use hexguard_domain::{SymbolModel, TypeDescriptor};
use serde::{Deserialize, Serialize};

pub const SCHEMA_MODEL_V1: &str = "hexguard.model.v1";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub types: Vec<TypeDescriptor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModelShape {
    File(ModelFile),
    Bare(Vec<TypeDescriptor>),
}

/// Parse a model file (`{"types": [...]}`) or a bare descriptor array, and validate it.
pub fn parse_model_json(text: &str) -> anyhow::Result<SymbolModel> {
    let shape: ModelShape = serde_json::from_str(text).context("parse model json")?;
    let types = match shape {
        ModelShape::File(file) => {
            if let Some(schema) = file.schema.as_deref() {
                if schema != SCHEMA_MODEL_V1 {
                    anyhow::bail!("unsupported model schema: {schema} (expected {SCHEMA_MODEL_V1})");
                }
            }
            file.types
        }
        ModelShape::Bare(types) => types,
    };
    let model = SymbolModel::new(types).context("invalid symbol model")?;
    Ok(model)
}
