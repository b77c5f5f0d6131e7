//! Builds the immutable credential table from the startup configuration.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

/// How callers authenticate, decided once at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// No credential required; every caller sees every program.
    Open,
    /// One shared secret; authorized callers see every program.
    SinglePin {
        /// The digest of the shared secret.
        digest: String,
    },
    /// One credential per program; authorized callers are scoped to theirs.
    MultiPin {
        /// Maps each PIN digest to the program it is bound to.
        programs: HashMap<String, String>,
    },
}

impl AuthMode {
    /// Select the auth mode from the two optional configuration strings.
    ///
    /// `multi_config` holds entries like `"1111:Alpha,2222:Beta"` separated
    /// by commas, semicolons, or newlines. Entries without a colon or with an
    /// empty PIN are skipped; when two entries share a PIN the later one
    /// wins. A multi config that yields no valid entries downgrades to
    /// [AuthMode::Open]. A non-empty `single_config` is only consulted when
    /// no multi config is given.
    pub fn from_config(multi_config: Option<&str>, single_config: Option<&str>) -> Self {
        if let Some(config) = multi_config.filter(|config| !config.trim().is_empty()) {
            let programs = parse_multi_config(config);

            if programs.is_empty() {
                tracing::warn!("multi-PIN config contained no valid entries, running open");
                return AuthMode::Open;
            }

            return AuthMode::MultiPin { programs };
        }

        match single_config.filter(|secret| !secret.trim().is_empty()) {
            Some(secret) => AuthMode::SinglePin {
                digest: pin_digest(secret.trim()),
            },
            None => AuthMode::Open,
        }
    }

    /// Whether callers must present a bearer token on protected endpoints.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, AuthMode::Open)
    }

    /// The mode name used on the wire: "none", "single", or "multi".
    pub fn wire_name(&self) -> &'static str {
        match self {
            AuthMode::Open => "none",
            AuthMode::SinglePin { .. } => "single",
            AuthMode::MultiPin { .. } => "multi",
        }
    }
}

fn parse_multi_config(config: &str) -> HashMap<String, String> {
    let mut programs = HashMap::new();

    for part in config.split(|c| matches!(c, ',' | ';' | '\n')) {
        let Some((pin, program)) = part.split_once(':') else {
            continue;
        };

        let pin = pin.trim();
        if pin.is_empty() {
            continue;
        }

        programs.insert(pin_digest(pin), program.trim().to_owned());
    }

    programs
}

/// The one-way digest of a PIN, used as both the table key and the bearer
/// token presented in the `X-Auth` header.
pub fn pin_digest(pin: &str) -> String {
    let hash = Sha256::digest(pin.as_bytes());

    hash.iter().map(|byte| format!("{byte:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use crate::auth::{AuthMode, pin_digest};

    #[test]
    fn no_config_selects_open_mode() {
        let mode = AuthMode::from_config(None, None);

        assert_eq!(mode, AuthMode::Open);
    }

    #[test]
    fn single_secret_selects_single_pin_mode() {
        let mode = AuthMode::from_config(None, Some("hunter2"));

        assert_eq!(
            mode,
            AuthMode::SinglePin {
                digest: pin_digest("hunter2")
            }
        );
    }

    #[test]
    fn multi_config_takes_priority_over_single() {
        let mode = AuthMode::from_config(Some("1111:Alpha"), Some("hunter2"));

        let AuthMode::MultiPin { programs } = mode else {
            panic!("expected multi-PIN mode, got {mode:?}");
        };
        assert_eq!(programs[&pin_digest("1111")], "Alpha");
    }

    #[test]
    fn multi_config_splits_on_commas_semicolons_and_newlines() {
        let mode = AuthMode::from_config(Some("1111:Alpha,2222:Beta;3333:Gamma\n4444:Delta"), None);

        let AuthMode::MultiPin { programs } = mode else {
            panic!("expected multi-PIN mode, got {mode:?}");
        };
        assert_eq!(programs.len(), 4);
        assert_eq!(programs[&pin_digest("2222")], "Beta");
        assert_eq!(programs[&pin_digest("4444")], "Delta");
    }

    #[test]
    fn multi_config_trims_pins_and_programs() {
        let mode = AuthMode::from_config(Some(" 1111 : Alpha Juniors "), None);

        let AuthMode::MultiPin { programs } = mode else {
            panic!("expected multi-PIN mode, got {mode:?}");
        };
        assert_eq!(programs[&pin_digest("1111")], "Alpha Juniors");
    }

    #[test]
    fn multi_config_skips_entries_without_colon_or_pin() {
        let mode = AuthMode::from_config(Some("not-an-entry,:Orphan,1111:Alpha"), None);

        let AuthMode::MultiPin { programs } = mode else {
            panic!("expected multi-PIN mode, got {mode:?}");
        };
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[&pin_digest("1111")], "Alpha");
    }

    #[test]
    fn duplicate_pins_keep_the_last_entry() {
        let mode = AuthMode::from_config(Some("1111:Alpha,1111:Beta"), None);

        let AuthMode::MultiPin { programs } = mode else {
            panic!("expected multi-PIN mode, got {mode:?}");
        };
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[&pin_digest("1111")], "Beta");
    }

    #[test]
    fn multi_config_with_no_valid_entries_downgrades_to_open() {
        let mode = AuthMode::from_config(Some("garbage;more garbage"), None);

        assert_eq!(mode, AuthMode::Open);
    }

    #[test]
    fn blank_configs_select_open_mode() {
        let mode = AuthMode::from_config(Some("   "), Some("  "));

        assert_eq!(mode, AuthMode::Open);
    }

    #[test]
    fn pin_digest_is_deterministic_and_hex() {
        let digest = pin_digest("1111");

        assert_eq!(digest, pin_digest("1111"));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(digest, pin_digest("2222"));
    }
}
