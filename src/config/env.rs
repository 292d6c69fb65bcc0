use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Snapshot of the process environment used during resolution.
#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: HashMap<String, String>,
}

impl Env {
    pub fn from_system(env_file: Option<&Path>) -> Self {
        // Load the dotenv file if present (silently ignore if missing)
        match env_file {
            Some(path) => {
                if let Err(err) = dotenvy::from_path(path) {
                    tracing::debug!(path = %path.display(), error = %err, "env file not loaded");
                }
            }
            None => {
                let _ = dotenvy::dotenv();
            }
        }
        let vars = std::env::vars().collect();
        Self { vars }
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut vars = HashMap::new();
        for (k, v) in pairs {
            vars.insert((*k).to_string(), (*v).to_string());
        }
        Self { vars }
    }

    /// Replace `$NAME` and `${NAME}` with their values. Unset variables
    /// expand to the empty string; a lone `$` is left as is.
    pub fn expand(&self, input: &str) -> String {
        variable_re()
            .replace_all(input, |caps: &Captures<'_>| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str())
                    .unwrap_or("");
                self.vars.get(name).cloned().unwrap_or_default()
            })
            .into_owned()
    }
}

fn variable_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$(?:\{([A-Za-z0-9_]+)\}|([A-Za-z0-9_]+))").expect("valid regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_both_forms() {
        let env = Env::from_pairs(&[("DB_USER", "app"), ("DB_HOST", "db.internal")]);
        assert_eq!(
            env.expand("postgres://$DB_USER@${DB_HOST}/main"),
            "postgres://app@db.internal/main"
        );
    }

    #[test]
    fn unset_variables_expand_to_empty() {
        let env = Env::from_pairs(&[]);
        assert_eq!(env.expand("user=$MISSING dbname=x"), "user= dbname=x");
    }

    #[test]
    fn lone_dollar_is_kept() {
        let env = Env::from_pairs(&[]);
        assert_eq!(env.expand("password=a$ b"), "password=a$ b");
    }

    #[test]
    fn digits_and_shell_specials_are_not_special() {
        let env = Env::from_pairs(&[("1abc", "one"), ("1", "x")]);
        assert_eq!(env.expand("$1abc"), "one");
        assert_eq!(env.expand("pw=$! $* $@ $$"), "pw=$! $* $@ $$");
    }
}
