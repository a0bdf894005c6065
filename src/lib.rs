pub mod config;
pub mod error;
pub mod gpg;
pub mod keyring;
pub mod keyset;
pub mod package;
pub mod pgp;
pub mod process;
pub mod prompt;
pub mod srcinfo;

pub use crate::error::{KeyError, Result};
pub use crate::gpg::{AgentConfig, GpgKeyring};
pub use crate::keyring::{TrustStore, import_keys};
pub use crate::keyset::{KeySet, collect_missing_keys};
pub use crate::package::{BaseGroups, Package};
pub use crate::pgp::check_pgp_keys;
pub use crate::prompt::{ARROW, AssumeYes, Confirm, StdinConfirm, format_keys_to_import};
pub use crate::srcinfo::{BuildMetadata, required_keys};
