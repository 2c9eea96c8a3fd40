// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Options shared by the dereference and slicing passes.

use serde::Deserialize;

/// Options that control the pointer passes and the SSA slicer.
///
/// A front end flattens this into its own command line with `#[command(flatten)]`, or reads it
/// from a `[goto-passes]` style table in a configuration file. Keys use the same kebab-case
/// spelling as the flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PassOptions {
    /// Do not simplify the emitted pointer-safety assertions
    #[arg(long)]
    pub no_simplify: bool,
    /// Only drop steps after the last assertion instead of slicing by dependency
    #[arg(long)]
    pub no_slice: bool,
    /// Allow the slicer to drop assumptions that no assertion depends on
    #[arg(long)]
    pub slice_assumes: bool,
    /// Never slice steps defining a symbol with this source-level name
    #[arg(long = "no-slice-name", value_name = "NAME", num_args(1))]
    #[serde(alias = "no-slice-name")]
    pub no_slice_names: Vec<String>,
    /// Never slice steps defining this SSA identifier
    #[arg(long = "no-slice-id", value_name = "ID", num_args(1))]
    #[serde(alias = "no-slice-id")]
    pub no_slice_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::PassOptions;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        options: PassOptions,
    }

    #[test]
    fn defaults_enable_everything() {
        let options = PassOptions::default();
        assert!(!options.no_simplify);
        assert!(!options.no_slice);
        assert!(!options.slice_assumes);
        assert!(options.no_slice_names.is_empty());
        assert!(options.no_slice_ids.is_empty());
    }

    #[test]
    fn parse_from_command_line() {
        let cli = TestCli::try_parse_from([
            "test",
            "--no-simplify",
            "--slice-assumes",
            "--no-slice-name",
            "main::1::x",
            "--no-slice-id",
            "main::1::y#2",
            "--no-slice-name",
            "c::g",
        ])
        .unwrap();
        let options = cli.options;
        assert!(options.no_simplify);
        assert!(options.slice_assumes);
        assert!(!options.no_slice);
        assert_eq!(options.no_slice_names, vec!["main::1::x", "c::g"]);
        assert_eq!(options.no_slice_ids, vec!["main::1::y#2"]);
    }

    #[test]
    fn read_from_toml_table() {
        let options: PassOptions = toml::from_str(
            r#"
            no-slice = true
            no-slice-ids = ["main::1::y#2"]
            "#,
        )
        .unwrap();
        assert!(options.no_slice);
        assert!(!options.no_simplify);
        assert_eq!(options.no_slice_ids, vec!["main::1::y#2"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<PassOptions>("no-slicing = true").is_err());
    }
}
