//! Go source text for one [`PackageModel`].
//!
//! Output is laid out the way `gofmt` would leave it: tab indentation,
//! aligned `const` values, struct fields and composite-literal keys.

use std::fmt::Write;

use tagsmith_core::{GetterOutput, PackageModel, ReturnOutput, StructModel, StructOutput, ValueOutput};

use crate::RenderError;

/// First line of every generated file.
pub const HEADER: &str = "// Code generated by tagsmith. DO NOT EDIT.";

/// Receiver name used by generated getters.
pub const RECEIVER: &str = "_struct";

/// Render the complete file for `package`.
///
/// # Errors
/// Only `RenderError::Fmt`, which writing into a `String` never produces.
pub fn render_package(package: &PackageModel) -> Result<String, RenderError> {
    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    writeln!(out)?;
    writeln!(out, "package {}", package.name)?;

    let imports: Vec<_> = package.imports.iter().filter(|i| !i.path.is_empty()).collect();
    if !imports.is_empty() {
        writeln!(out)?;
        writeln!(out, "import (")?;
        for import in imports {
            writeln!(out, "\t{} {}", import.effective_name(), quote(&import.path))?;
        }
        writeln!(out, ")")?;
    }

    for model in &package.structs {
        render_struct(&mut out, model)?;
    }
    Ok(out)
}

fn render_struct(out: &mut String, model: &StructModel) -> Result<(), RenderError> {
    if !model.constants.is_empty() {
        writeln!(out)?;
        writeln!(out, "// Constants for {}", model.name)?;
        writeln!(out, "const (")?;
        let width = max_width(model.constants.iter().map(|c| c.name.as_str()));
        for constant in &model.constants {
            writeln!(
                out,
                "\t{:<width$} = {}",
                constant.name,
                quote(&constant.value)
            )?;
        }
        writeln!(out, ")")?;
    }

    for record in &model.structs {
        render_record(out, record, &model.name)?;
    }

    let receiver = receiver_type(model);
    for getter in &model.getters {
        render_getter(out, getter, &model.name, &receiver)?;
    }
    Ok(())
}

fn render_record(out: &mut String, record: &StructOutput, owner: &str) -> Result<(), RenderError> {
    let name = &record.name;
    writeln!(out)?;
    writeln!(out, "// {name} contains field constants for {owner}")?;
    if record.fields.is_empty() {
        writeln!(out, "type {name} struct{{}}")?;
    } else {
        writeln!(out, "type {name} struct {{")?;
        let width = max_width(record.fields.iter().map(|f| f.name.as_str()));
        for field in &record.fields {
            writeln!(out, "\t{:<width$} string", field.name)?;
        }
        writeln!(out, "}}")?;
    }

    writeln!(out)?;
    writeln!(out, "// New{name} creates a new {name} instance")?;
    writeln!(out, "func New{name}() *{name} {{")?;
    if record.fields.is_empty() {
        writeln!(out, "\treturn &{name}{{}}")?;
    } else {
        writeln!(out, "\treturn &{name}{{")?;
        let width = max_width(record.fields.iter().map(|f| f.name.as_str())) + 1;
        for field in &record.fields {
            let key = format!("{}:", field.name);
            writeln!(out, "\t\t{key:<width$} {},", quote(&field.value))?;
        }
        writeln!(out, "\t}}")?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

fn render_getter(
    out: &mut String,
    getter: &GetterOutput,
    owner: &str,
    receiver: &str,
) -> Result<(), RenderError> {
    let (types, values): (Vec<String>, Vec<String>) = getter.returns.iter().map(return_parts).unzip();
    let results = match types.as_slice() {
        [single] => single.clone(),
        many => format!("({})", many.join(", ")),
    };

    writeln!(out)?;
    writeln!(out, "// {} returns the configured values for {owner}", getter.name)?;
    writeln!(out, "func ({RECEIVER} *{receiver}) {}() {results} {{", getter.name)?;
    writeln!(out, "\treturn {}", values.join(", "))?;
    writeln!(out, "}}")?;
    Ok(())
}

/// Result type and returned expression for one getter return.
fn return_parts(ret: &ReturnOutput) -> (String, String) {
    match ret {
        ReturnOutput::Constant(c) => ("string".to_string(), quote(&c.value)),
        ReturnOutput::Field(f) => ("string".to_string(), quote(&f.value)),
        ReturnOutput::None(n) => ("string".to_string(), quote(&n.value)),
        ReturnOutput::Value(v) => (value_type(v), format!("{RECEIVER}.{}", v.field_name)),
    }
}

/// The value's type as it must be spelled in the generated file.
///
/// A type written with one identifier in the source but imported under a
/// different name or alias here is requalified.
#[must_use]
pub fn value_type(value: &ValueOutput) -> String {
    let Some(qualifier) = value.qualifier.as_deref() else {
        return value.type_name.clone();
    };
    if value.type_package.path.is_empty() {
        return value.type_name.clone();
    }
    requalify(&value.type_name, qualifier, value.type_package.effective_name())
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Replace every `from.` that starts an identifier with `to.`.
fn requalify(spelling: &str, from: &str, to: &str) -> String {
    if from == to {
        return spelling.to_string();
    }
    let needle = format!("{from}.");
    let mut out = String::with_capacity(spelling.len());
    let mut rest = spelling;
    while let Some(at) = rest.find(&needle) {
        let starts_ident = rest[..at].chars().next_back().is_none_or(|c| !is_ident_char(c))
            && (at > 0 || out.chars().next_back().is_none_or(|c| !is_ident_char(c)));
        out.push_str(&rest[..at]);
        if starts_ident {
            out.push_str(to);
            out.push('.');
        } else {
            out.push_str(&needle);
        }
        rest = &rest[at + needle.len()..];
    }
    out.push_str(rest);
    out
}

fn receiver_type(model: &StructModel) -> String {
    if model.type_parameters.is_empty() {
        model.name.clone()
    } else {
        format!("{}[{}]", model.name, model.type_parameters.join(", "))
    }
}

fn max_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0)
}

/// Go interpreted string literal for `value`.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() && u32::from(c) < 0x80 => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
