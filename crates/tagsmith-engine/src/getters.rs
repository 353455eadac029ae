//! Getter assembly.
//!
//! Each struct keeps one [`Artifacts`] table keyed by `(field, element)`.
//! A getter for a field is emitted only when every requested return resolves.

use std::collections::HashMap;

use tagsmith_core::{
    ConstantOutput, FieldOutput, GetterConfig, GetterOutput, NoneOutput, ReturnOutput, ValueOutput,
};

use crate::naming::build_name;

/// Return token standing for the field's live value.
pub const VALUE_TOKEN: &str = ":value";

/// What one element produced for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Constant(ConstantOutput),
    /// Transient value; only reachable through getters.
    None(String),
    Field(FieldOutput),
}

/// Per-struct table of element artifacts.
#[derive(Debug, Default)]
pub struct Artifacts {
    by_key: HashMap<(String, String), Artifact>,
}

impl Artifacts {
    pub fn insert(&mut self, field: &str, element: &str, artifact: Artifact) {
        self.by_key
            .insert((field.to_string(), element.to_string()), artifact);
    }

    #[must_use]
    pub fn get(&self, field: &str, element: &str) -> Option<&Artifact> {
        self.by_key.get(&(field.to_string(), element.to_string()))
    }

    /// The return a getter gets for `element`, preferring constants, then
    /// transient values, then accessor fields.
    #[must_use]
    pub fn return_for(&self, field: &str, element: &str) -> Option<ReturnOutput> {
        let ret = match self.get(field, element)? {
            Artifact::Constant(c) => ReturnOutput::Constant(c.clone()),
            Artifact::None(value) => ReturnOutput::None(NoneOutput {
                name: element.to_string(),
                value: value.clone(),
            }),
            Artifact::Field(f) => ReturnOutput::Field(f.clone()),
        };
        Some(ret)
    }
}

/// Whether any getter asks for the field's live value.
#[must_use]
pub fn wants_value(getters: &[GetterConfig]) -> bool {
    getters
        .iter()
        .any(|g| g.returns.iter().any(|r| r == VALUE_TOKEN))
}

/// Build one getter for one field, or `None` unless every return resolved.
///
/// Tokens starting with `:` other than `:value` never resolve. `value` is the
/// field's [`ValueOutput`], absent when its type could not be determined.
#[must_use]
pub fn assemble_getter(
    getter: &GetterConfig,
    field_name: &str,
    artifacts: &Artifacts,
    value: Option<&ValueOutput>,
) -> Option<GetterOutput> {
    let mut returns = Vec::with_capacity(getter.returns.len());
    for token in &getter.returns {
        if token.starts_with(':') {
            if token == VALUE_TOKEN
                && let Some(value) = value
            {
                returns.push(ReturnOutput::Value(value.clone()));
            }
            continue;
        }
        if let Some(ret) = artifacts.return_for(field_name, token) {
            returns.push(ret);
        }
    }

    if returns.len() != getter.returns.len() {
        return None;
    }
    Some(GetterOutput {
        name: build_name(
            &[&getter.output.prefix, field_name, &getter.output.suffix],
            getter.output.format,
        ),
        returns,
    })
}
