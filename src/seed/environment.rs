//! Runtime environment detection for challenges that are unsafe on some hosts.

use std::path::Path;

/// Environments a challenge can be disabled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Docker,
    Heroku,
    Gitpod,
    Windows,
}

impl Environment {
    pub const ALL: [Self; 4] = [Self::Docker, Self::Heroku, Self::Gitpod, Self::Windows];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Docker => "Docker",
            Self::Heroku => "Heroku",
            Self::Gitpod => "Gitpod",
            Self::Windows => "Windows",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(value.trim()))
    }

    fn detect(self) -> bool {
        match self {
            Self::Docker => Path::new("/.dockerenv").exists(),
            Self::Heroku => {
                std::env::var_os("HEROKU").is_some() || std::env::var_os("DYNO").is_some()
            }
            Self::Gitpod => std::env::var_os("GITPOD_WORKSPACE_ID").is_some(),
            Self::Windows => cfg!(windows),
        }
    }
}

/// The set of environments considered active for this run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveEnvironments {
    active: Vec<Environment>,
}

impl ActiveEnvironments {
    /// Detected environments plus any forced by configuration.
    /// Unknown names in `forced` are ignored.
    #[must_use]
    pub fn detect(forced: &[String]) -> Self {
        let mut active: Vec<Environment> = Environment::ALL
            .into_iter()
            .filter(|env| env.detect())
            .collect();

        for env in forced.iter().filter_map(|name| Environment::parse(name)) {
            if !active.contains(&env) {
                active.push(env);
            }
        }

        Self { active }
    }

    #[must_use]
    pub fn from_list(envs: &[Environment]) -> Self {
        Self {
            active: envs.to_vec(),
        }
    }

    #[must_use]
    pub fn contains(&self, env: Environment) -> bool {
        self.active.contains(&env)
    }

    /// Returns the environment a challenge is disabled on, if it is active.
    #[must_use]
    pub fn disabling(&self, disabled_env: Option<&str>) -> Option<Environment> {
        disabled_env
            .and_then(Environment::parse)
            .filter(|env| self.contains(*env))
    }
}

/// Visible note appended to the description of a disabled challenge.
#[must_use]
pub fn disabled_warning(env: Environment, safety_override: bool) -> String {
    let status = if safety_override {
        "potentially harmful"
    } else {
        "not available"
    };
    format!(
        " <em>(This challenge is <strong>{status}</strong> on {}!)</em>",
        env.as_str()
    )
}
