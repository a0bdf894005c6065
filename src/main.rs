// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - PGP trust verification for AUR build recipes
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use log::{debug, info};
use std::collections::HashMap;
use std::path::PathBuf;

use ghostbrew_keys::config::KeysConfig;
use ghostbrew_keys::process::Interrupt;
use ghostbrew_keys::srcinfo::{
    BuildMetadata, discover_bases, load_build_metadata, metadata_by_base,
};
use ghostbrew_keys::{
    AssumeYes, BaseGroups, Confirm, GpgKeyring, KeyError, Package, StdinConfirm, check_pgp_keys,
    collect_missing_keys, format_keys_to_import, import_keys,
};

const BIN_NAME: &str = "ghostbrew-keys";

/// 128 + SIGINT
const INTERRUPTED_EXIT: i32 = 130;

/// GhostBrew Keys - check and import the PGP keys AUR recipes declare
#[derive(Parser, Debug)]
#[command(name = "ghostbrew-keys")]
#[command(author = "ghostkellz <ckelley@ghostkellz.sh>")]
#[command(version)]
#[command(about = "Check and import the validpgpkeys declared by AUR build recipes")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: /etc/ghostbrew-keys/config.toml, ~/.config/ghostbrew-keys/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// gpg binary
    #[arg(long, global = true, env = "GHOSTBREW_KEYS_GPG_BIN")]
    gpg_bin: Option<String>,

    /// Extra gpg flags, e.g. "--homedir ~/.gnupg-aur"
    #[arg(long, global = true, env = "GHOSTBREW_KEYS_GPG_FLAGS", allow_hyphen_values = true)]
    gpg_flags: Option<String>,

    /// Key server to import from
    #[arg(long, global = true, env = "GHOSTBREW_KEYS_KEYSERVER")]
    keyserver: Option<String>,

    /// Directory containing one <pkgbase>/.SRCINFO per recipe
    #[arg(long, global = true, env = "GHOSTBREW_KEYS_BUILD_DIR")]
    build_dir: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Debug logging (very verbose)
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check recipes and import missing keys after confirmation
    Check {
        /// Import without asking
        #[arg(long)]
        noconfirm: bool,

        /// Package bases to check (default: every recipe in the build dir)
        bases: Vec<String>,
    },
    /// List keys the recipes need that are not in the keyring
    Missing {
        /// Print the missing keys as JSON
        #[arg(long)]
        json: bool,

        /// Package bases to check (default: every recipe in the build dir)
        bases: Vec<String>,
    },
    /// Import keys from the key server
    Import {
        /// Key IDs or fingerprints
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

/// Recipes selected for a run
struct Recipes {
    packages: Vec<Package>,
    bases: BaseGroups,
    metadata: HashMap<String, BuildMetadata>,
}

fn load_recipes(config: &KeysConfig, requested: Vec<String>) -> Result<Recipes> {
    let build_dir = config.build_dir();
    let dirs = if requested.is_empty() {
        discover_bases(&build_dir)
    } else {
        requested
    };
    if dirs.is_empty() {
        bail!("No build recipes found in {}", build_dir.display());
    }
    debug!("Recipes from {}: {:?}", build_dir.display(), dirs);

    let recipes = load_build_metadata(&build_dir, &dirs)
        .with_context(|| format!("Failed to load recipes from {}", build_dir.display()))?;

    let packages: Vec<Package> = recipes.iter().flat_map(BuildMetadata::packages).collect();
    let groups = BaseGroups::from_packages(&packages);

    Ok(Recipes {
        packages,
        bases: groups,
        metadata: metadata_by_base(recipes),
    })
}

fn apply_overrides(config: &mut KeysConfig, args: &Args) {
    if let Some(bin) = &args.gpg_bin {
        config.gpg_bin = bin.clone();
    }
    if let Some(flags) = &args.gpg_flags {
        config.gpg_flags = flags.clone();
    }
    if let Some(server) = &args.keyserver {
        config.keyserver = Some(server.clone());
    }
    if let Some(dir) = &args.build_dir {
        config.build_dir = Some(dir.clone());
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), BIN_NAME, &mut std::io::stdout());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => KeysConfig::load_from_path(path)?,
        None => KeysConfig::load()?,
    };
    apply_overrides(&mut config, &args);

    // Ctrl-C stops a running gpg instead of being read as "key missing"
    let interrupt = Interrupt::new();
    let handler_interrupt = interrupt.clone();
    ctrlc::set_handler(move || {
        info!("Received interrupt signal");
        handler_interrupt.trigger();
        if handler_interrupt.is_prompting() {
            eprintln!();
            eprintln!("Error: {}", KeyError::Interrupted);
            std::process::exit(INTERRUPTED_EXIT);
        }
    }).context("Failed to set signal handler")?;

    let keyring = GpgKeyring::new(config.agent_config(interrupt.clone()));

    match args.command {
        Some(Commands::Check { noconfirm, bases }) => {
            let recipes = load_recipes(&config, bases)?;
            let stdin_confirm = StdinConfirm::new(interrupt);
            let confirm: &dyn Confirm = if noconfirm || config.noconfirm {
                &AssumeYes
            } else {
                &stdin_confirm
            };
            check_pgp_keys(
                &recipes.packages,
                &recipes.bases,
                &recipes.metadata,
                &keyring,
                confirm,
            )?;
            println!(":: PGP keys verified");
        }
        Some(Commands::Missing { json, bases }) => {
            let recipes = load_recipes(&config, bases)?;
            let missing = collect_missing_keys(&recipes.packages, &recipes.metadata, &keyring)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&missing)?);
            } else if missing.is_empty() {
                println!(":: All PGP keys are present");
            } else {
                println!("{}", format_keys_to_import(&missing, &recipes.bases)?);
            }
        }
        Some(Commands::Import { keys }) => {
            import_keys(&keyring, &keys)?;
            println!(":: Imported {} key(s)", keys.len());
        }
        None => {
            Args::command().print_help()?;
        }
    }

    Ok(())
}
