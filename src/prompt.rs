// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - Import Confirmation
//
// Renders the "GPG keys need importing" question and asks the user.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use std::io::{self, BufRead, Write};

use crate::error::{KeyError, Result};
use crate::keyset::KeySet;
use crate::package::{BaseGroups, Package};
use crate::process::Interrupt;

/// Prompt arrow shared with the other build confirmations
pub const ARROW: &str = "==>";

/// Build the import question for `keys`.
///
/// One tab-indented line per key, in the set's iteration order. Fails on an
/// empty set: there is nothing to ask about.
pub fn format_keys_to_import(keys: &KeySet, bases: &BaseGroups) -> Result<String> {
    if keys.is_empty() {
        return Err(KeyError::EmptyKeySet);
    }

    let mut question = String::from("GPG keys need importing:\n");
    for (key, pkgs) in keys.iter() {
        let requirers: Vec<String> = pkgs.iter().map(|p| format_requirer(p, bases)).collect();
        question.push_str(&format!("\t{}, required by: {}\n", key, requirers.join(" ")));
    }
    question.push_str(&format!("{} Import?", ARROW));
    Ok(question)
}

/// `base`, or `base (member ...)` when the base builds split packages
fn format_requirer(pkg: &Package, bases: &BaseGroups) -> String {
    let base = pkg.base.as_str();
    match bases.get(base) {
        Some(members)
            if members.len() > 1 || members.iter().any(|m| m.name != base) =>
        {
            let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
            format!("{} ({})", base, names.join(" "))
        }
        _ => base.to_string(),
    }
}

/// Yes/no decision on a rendered question
pub trait Confirm {
    fn confirm(&self, question: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> Result<bool>,
{
    fn confirm(&self, question: &str) -> Result<bool> {
        self(question)
    }
}

/// Ask on stdout, read the answer from stdin. Default is yes.
///
/// An interrupt that arrives while asking cancels instead of answering.
#[derive(Debug, Default, Clone)]
pub struct StdinConfirm {
    interrupt: Interrupt,
}

impl StdinConfirm {
    pub fn new(interrupt: Interrupt) -> Self {
        Self { interrupt }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{} [Y/n] ", question).map_err(KeyError::Prompt)?;
            stdout.flush().map_err(KeyError::Prompt)?;
        }

        let mut input = String::new();
        {
            let _guard = self.interrupt.prompting();
            io::stdin()
                .lock()
                .read_line(&mut input)
                .map_err(KeyError::Prompt)?;
        }
        answer(&input, &self.interrupt)
    }
}

fn answer(input: &str, interrupt: &Interrupt) -> Result<bool> {
    if interrupt.is_triggered() {
        return Err(KeyError::Interrupted);
    }
    Ok(is_yes(input))
}

/// Print the question and answer yes (noconfirm)
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, question: &str) -> Result<bool> {
        println!("{} [Y/n] y", question);
        Ok(true)
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    !(answer == "n" || answer == "no")
}
