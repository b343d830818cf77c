// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Espalier CLI entrypoint.
//!
//! By default this runs the interactive TUI against the menu service at
//! `http://localhost:3000` (or `ESPALIER_API_URL` / `--base-url`).
//!
//! Use `--demo` to run against a built-in in-memory backend instead.

use std::error::Error;
use std::sync::Arc;

use espalier::client::DEFAULT_BASE_URL;
use espalier::controller::MenuController;
use espalier::store::{HttpStore, MemoryStore, RemoteStore};

const BASE_URL_ENV: &str = "ESPALIER_API_URL";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<base-url>] [--tree <tree-id>]\n  {program} [--base-url <url>] [--tree <tree-id>]\n  {program} --demo [--tree <tree-id>]\n\nIf base-url/--base-url is omitted, the {BASE_URL_ENV} environment variable is used,\nfalling back to {DEFAULT_BASE_URL}.\n\n--tree selects the initial tree by its tree id; otherwise the first tree is shown.\n--demo uses a built-in in-memory backend and cannot be combined with base-url/--base-url."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    base_url: Option<String>,
    tree: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--base-url" => {
                if options.base_url.is_some() {
                    return Err(());
                }
                let url = args.next().ok_or(())?;
                options.base_url = Some(url);
            }
            "--tree" => {
                if options.tree.is_some() {
                    return Err(());
                }
                let tree = args.next().ok_or(())?;
                options.tree = Some(tree);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.base_url.is_some() {
                    return Err(());
                }
                options.base_url = Some(arg);
            }
        }
    }

    if options.demo && options.base_url.is_some() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "espalier".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let store: Arc<dyn RemoteStore> = if options.demo {
            Arc::new(MemoryStore::demo())
        } else {
            let base_url = options
                .base_url
                .or_else(|| std::env::var(BASE_URL_ENV).ok())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
            Arc::new(HttpStore::new(base_url))
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let controller = MenuController::new(store);

        espalier::tui::run(controller, runtime, options.tree)?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("espalier: {err}");
        std::process::exit(1);
    }
}
