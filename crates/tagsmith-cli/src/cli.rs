use std::path::PathBuf;

use clap::Parser;
use tagsmith_config::RawConfig;

/// Top-level CLI parser for the `tagsmith` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tagsmith",
    version,
    about = "Generate Go field constants, accessor records and getters from struct tags"
)]
pub struct Cli {
    /// Config file (YAML or TOML). Defaults to tagsmith.yaml/.yml/.toml in the working directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base directory for include/exclude patterns
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Include pattern: a .go glob or package:NAME (repeatable, replaces the configured list)
    #[arg(short, long = "include", value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Exclude pattern: a .go glob or package:NAME (repeatable, replaces the configured list)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Generated file name, written into each package directory
    #[arg(short, long, value_name = "NAME")]
    pub output_file: Option<String>,

    /// Only process structs carrying a tagsmith:include directive
    #[arg(long)]
    pub struct_explicit: bool,

    /// Also process unexported structs
    #[arg(long)]
    pub struct_include_unexported: bool,

    /// Only process fields tagged tagsmith:"include"
    #[arg(long)]
    pub field_explicit: bool,

    /// Also process unexported fields
    #[arg(long)]
    pub field_include_unexported: bool,

    /// Build the model and report, without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Print the built model as JSON to stdout
    #[arg(long)]
    pub dump_model: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Configuration layer holding only the flags that were passed.
    #[must_use]
    pub fn overrides(&self) -> RawConfig {
        let mut raw = RawConfig::default();
        raw.input.dir.clone_from(&self.dir);
        if !self.include.is_empty() {
            raw.input.include = Some(self.include.clone());
        }
        if !self.exclude.is_empty() {
            raw.input.exclude = Some(self.exclude.clone());
        }
        raw.output.file_name.clone_from(&self.output_file);
        raw.input.structs.explicit = self.struct_explicit.then_some(true);
        raw.input.structs.include_unexported = self.struct_include_unexported.then_some(true);
        raw.input.fields.explicit = self.field_explicit.then_some(true);
        raw.input.fields.include_unexported = self.field_include_unexported.then_some(true);
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_flags_means_no_overrides() {
        let cli = Cli::try_parse_from(["tagsmith"]).expect("cli should parse");
        assert_eq!(cli.overrides(), RawConfig::default());
        assert!(!cli.dry_run);
    }

    #[test]
    fn flags_map_onto_the_config_document() {
        let cli = Cli::try_parse_from([
            "tagsmith",
            "--dir",
            "./src",
            "-i",
            "models/**/*.go",
            "--include",
            "package:api",
            "--output-file",
            "fields_gen.go",
            "--struct-explicit",
            "--field-include-unexported",
            "--dry-run",
        ])
        .expect("cli should parse");

        let raw = cli.overrides();
        assert_eq!(raw.input.dir, Some(PathBuf::from("./src")));
        assert_eq!(
            raw.input.include,
            Some(vec!["models/**/*.go".to_string(), "package:api".to_string()])
        );
        assert_eq!(raw.input.exclude, None);
        assert_eq!(raw.output.file_name.as_deref(), Some("fields_gen.go"));
        assert_eq!(raw.input.structs.explicit, Some(true));
        assert_eq!(raw.input.structs.include_unexported, None);
        assert_eq!(raw.input.fields.explicit, None);
        assert_eq!(raw.input.fields.include_unexported, Some(true));
        assert!(cli.dry_run);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["tagsmith", "-q", "-v"]).is_err());
    }
}
