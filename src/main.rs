// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Opens the requested manual (resolved along `INFOPATH`) in the interactive
//! terminal reader. The first non-option argument names the manual when
//! `--file` is absent; remaining arguments are node names relative to it.

use std::error::Error;
use std::path::PathBuf;

use proteus::keys::{load_user_bindings, KeyBindings};
use proteus::session::{InitialRef, Session};
use proteus::store::{DocumentCache, InfoPath};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--file <manual>] [--node <name>]... [--index-search <entry>] [<menu-item>...]\n\nThe manual is looked up along INFOPATH (compressed files are decompressed\nvia the matching system tool). Without --file, the first non-option argument\nnames the manual. Each --node and remaining argument opens a window on that\nnode; the '(manual)node' long form selects another file. --index-search\njumps to the index entry best matching the given string."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    file: Option<String>,
    nodes: Vec<String>,
    index_search: Option<String>,
    positionals: Vec<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" | "-f" => {
                if options.file.is_some() {
                    return Err(());
                }
                options.file = Some(args.next().ok_or(())?);
            }
            "--node" | "-n" => {
                let node = args.next().ok_or(())?;
                options.nodes.push(node);
            }
            "--index-search" | "-i" => {
                if options.index_search.is_some() {
                    return Err(());
                }
                options.index_search = Some(args.next().ok_or(())?);
            }
            _ if arg.starts_with('-') && arg != "-" => return Err(()),
            _ => options.positionals.push(arg),
        }
    }

    Ok(options)
}

/// `(manual)node` long form, or a plain node name in the current manual.
fn parse_menu_item(item: &str) -> (Option<&str>, &str) {
    if let Some(rest) = item.strip_prefix('(') {
        if let Some(close) = rest.find(')') {
            return (Some(&rest[..close]), rest[close + 1..].trim());
        }
    }
    (None, item)
}

/// Turns CLI options into the initial window references.
fn initial_refs(options: &CliOptions) -> Result<Vec<InitialRef>, ()> {
    let mut positionals = options.positionals.iter();
    let manual = match &options.file {
        Some(file) => file.clone(),
        None => positionals.next().ok_or(())?.clone(),
    };

    let mut refs = Vec::new();
    for item in options.nodes.iter().chain(positionals) {
        let (file, node) = parse_menu_item(item);
        let filename = file.map(str::to_owned).unwrap_or_else(|| manual.clone());
        let nodename = if node.is_empty() { None } else { Some(node.to_owned()) };
        refs.push(InitialRef { filename, nodename });
    }
    if refs.is_empty() {
        refs.push(InitialRef {
            filename: manual,
            nodename: None,
        });
    }
    Ok(refs)
}

fn setup_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn user_keymap_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config").join("proteus").join("keys.json"))
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        setup_tracing();

        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        let refs = match initial_refs(&options) {
            Ok(refs) => refs,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let cache = DocumentCache::new(InfoPath::from_env());
        let mut session = Session::open(cache, &refs, 24, 80)?;
        if let Some(query) = &options.index_search {
            session.index_search(query);
        }

        let mut bindings = KeyBindings::standard();
        if let Some(path) = user_keymap_path() {
            bindings = bindings.with_user_tier(load_user_bindings(&path));
        }

        proteus::tui::run(session, bindings)?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{initial_refs, parse_menu_item, parse_options, CliOptions};

    fn options(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args() {
        let parsed = options(&[]).expect("parse options");
        assert_eq!(parsed, CliOptions::default());
    }

    #[test]
    fn parses_file_flag() {
        let parsed = options(&["--file", "diffutils"]).expect("parse options");
        assert_eq!(parsed.file.as_deref(), Some("diffutils"));
        assert!(parsed.nodes.is_empty());
    }

    #[test]
    fn parses_repeated_nodes_in_order() {
        let parsed =
            options(&["--file", "emacs", "--node", "Buffers", "-n", "Windows"]).expect("parse");
        assert_eq!(parsed.nodes, ["Buffers", "Windows"]);
    }

    #[test]
    fn parses_positionals() {
        let parsed = options(&["diffutils", "Invoking diff"]).expect("parse options");
        assert_eq!(parsed.positionals, ["diffutils", "Invoking diff"]);
    }

    #[test]
    fn parses_index_search() {
        let parsed = options(&["--file", "grep", "--index-search", "regex"]).expect("parse");
        assert_eq!(parsed.index_search.as_deref(), Some("regex"));
    }

    #[test]
    fn rejects_duplicate_file() {
        options(&["--file", "a", "--file", "b"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_values_and_unknown_flags() {
        options(&["--file"]).unwrap_err();
        options(&["--node"]).unwrap_err();
        options(&["--frobnicate"]).unwrap_err();
    }

    #[test]
    fn menu_items_split_long_form() {
        assert_eq!(parse_menu_item("bash"), (None, "bash"));
        assert_eq!(parse_menu_item("(bash)Bash Variables"), (Some("bash"), "Bash Variables"));
        assert_eq!(parse_menu_item("(bash)"), (Some("bash"), ""));
    }

    #[test]
    fn initial_refs_default_to_the_manual_top() {
        let parsed = options(&["diffutils"]).expect("parse options");
        let refs = initial_refs(&parsed).expect("refs");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].filename, "diffutils");
        assert_eq!(refs[0].nodename, None);
    }

    #[test]
    fn initial_refs_resolve_nodes_against_the_manual() {
        let parsed = options(&["diffutils", "Invoking diff", "(emacs)Buffers"]).expect("parse");
        let refs = initial_refs(&parsed).expect("refs");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].filename, "diffutils");
        assert_eq!(refs[0].nodename.as_deref(), Some("Invoking diff"));
        assert_eq!(refs[1].filename, "emacs");
        assert_eq!(refs[1].nodename.as_deref(), Some("Buffers"));
    }

    #[test]
    fn initial_refs_require_a_manual() {
        let parsed = options(&["--node", "Top"]).expect("parse options");
        initial_refs(&parsed).unwrap_err();
    }
}
