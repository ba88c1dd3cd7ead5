//! Settings Models
//!
//! Explorer configuration and settings data structures.

use behave_explorer_runner::RunnerConfig;
use serde::{Deserialize, Serialize};

/// Explorer configuration stored in `.behave-explorer.json` or the user config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Extra runner arguments for live runs
    pub arguments: Vec<String>,
    /// Discover every allowed file when the host starts
    pub auto_discover: bool,
    /// Patterns extracting expected/actual values from failure messages
    pub diff_regex: Vec<String>,
    /// Glob, relative to the workspace, selecting feature files
    pub allowed_files: String,
    /// Offer outline groups
    pub code_lens: bool,
    /// Create test items for steps
    pub discover_steps: bool,
    /// Interpreter used to launch the runner
    pub python: String,
    /// Port the debug adapter listens on
    pub debug_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arguments: Vec::new(),
            auto_discover: false,
            diff_regex: Vec::new(),
            allowed_files: "**/*.feature".to_string(),
            code_lens: true,
            discover_steps: false,
            python: "python3".to_string(),
            debug_port: 5678,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub arguments: Option<Vec<String>>,
    pub auto_discover: Option<bool>,
    pub diff_regex: Option<Vec<String>>,
    pub allowed_files: Option<String>,
    pub code_lens: Option<bool>,
    pub discover_steps: Option<bool>,
    pub python: Option<String>,
    pub debug_port: Option<u16>,
}

impl Settings {
    /// Apply a partial update to the settings
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(arguments) = update.arguments {
            self.arguments = arguments;
        }
        if let Some(auto_discover) = update.auto_discover {
            self.auto_discover = auto_discover;
        }
        if let Some(diff_regex) = update.diff_regex {
            self.diff_regex = diff_regex;
        }
        if let Some(allowed_files) = update.allowed_files {
            self.allowed_files = allowed_files;
        }
        if let Some(code_lens) = update.code_lens {
            self.code_lens = code_lens;
        }
        if let Some(discover_steps) = update.discover_steps {
            self.discover_steps = discover_steps;
        }
        if let Some(python) = update.python {
            self.python = python;
        }
        if let Some(port) = update.debug_port {
            self.debug_port = port;
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        for pattern in &self.diff_regex {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(format!("Invalid diffRegex '{}': {}", pattern, e));
            }
        }

        if let Err(e) = glob::Pattern::new(&self.allowed_files) {
            return Err(format!("Invalid allowedFiles '{}': {}", self.allowed_files, e));
        }

        if self.python.trim().is_empty() {
            return Err("python must not be empty".to_string());
        }

        if self.debug_port == 0 {
            return Err("debugPort must be non-zero".to_string());
        }

        Ok(())
    }

    /// Runner settings derived from this configuration
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            python: self.python.clone(),
            arguments: self.arguments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.allowed_files, "**/*.feature");
        assert!(settings.code_lens);
        assert!(!settings.discover_steps);
        assert_eq!(settings.debug_port, 5678);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_camel_case_with_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"discoverSteps": true, "diffRegex": ["Expected: (.*)"]}"#).unwrap();
        assert!(settings.discover_steps);
        assert_eq!(settings.diff_regex.len(), 1);
        assert_eq!(settings.python, "python3");

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["allowedFiles"], "**/*.feature");
        assert_eq!(json["codeLens"], true);
    }

    #[test]
    fn test_validate_rejects_bad_regex() {
        let settings = Settings {
            diff_regex: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        assert!(settings.validate().unwrap_err().contains("diffRegex"));
    }

    #[test]
    fn test_validate_rejects_bad_glob_and_port() {
        let settings = Settings {
            allowed_files: "**/[".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            debug_port: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_apply_update() {
        let mut settings = Settings::default();
        settings.apply_update(SettingsUpdate {
            python: Some("/venv/bin/python".to_string()),
            arguments: Some(vec!["--stop".to_string()]),
            ..Default::default()
        });

        let runner = settings.runner_config();
        assert_eq!(runner.python, "/venv/bin/python");
        assert_eq!(runner.arguments, vec!["--stop"]);
        assert!(settings.code_lens);
    }
}
