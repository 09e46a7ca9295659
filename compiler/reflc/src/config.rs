//! `reflc lex` command-line configuration.

use std::path::PathBuf;

use refl_diagnostic::emitter::ColorMode;
use refl_lexer::PreprocessorConfig;
use thiserror::Error;

/// Command-line problems, reported before any file is read.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("invalid --color value '{0}' (expected auto, always or never)")]
    InvalidColor(String),
    #[error("option '{0}' needs a symbol name")]
    MissingSymbol(String),
    #[error("no input files")]
    NoInputFiles,
}

/// Options for `reflc lex`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexConfig {
    /// Print every token, not just diagnostics.
    pub show_tokens: bool,
    /// Symbols known to be defined.
    pub defines: Vec<String>,
    /// Symbols known to be undefined.
    pub undefines: Vec<String>,
    pub color: ColorMode,
    pub files: Vec<PathBuf>,
}

impl LexConfig {
    /// Parse the arguments that follow `lex`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        let mut config = LexConfig::default();
        for arg in args {
            let arg = arg.as_ref();
            if arg == "--tokens" {
                config.show_tokens = true;
            } else if let Some(name) = arg.strip_prefix("--define=") {
                config.defines.push(symbol(arg, name)?);
            } else if let Some(name) = arg.strip_prefix("--undefine=") {
                config.undefines.push(symbol(arg, name)?);
            } else if let Some(value) = arg.strip_prefix("--color=") {
                config.color =
                    ColorMode::parse(value).ok_or_else(|| ConfigError::InvalidColor(value.into()))?;
            } else if arg.starts_with('-') {
                return Err(ConfigError::UnknownOption(arg.to_string()));
            } else {
                config.files.push(PathBuf::from(arg));
            }
        }
        if config.files.is_empty() {
            return Err(ConfigError::NoInputFiles);
        }
        Ok(config)
    }

    /// Symbol table for the conditional preprocessor.
    pub fn preprocessor_config(&self) -> PreprocessorConfig {
        let config = self
            .defines
            .iter()
            .fold(PreprocessorConfig::default(), |config, name| config.define(name.as_str()));
        self.undefines
            .iter()
            .fold(config, |config, name| config.undefine(name.as_str()))
    }
}

fn symbol(arg: &str, name: &str) -> Result<String, ConfigError> {
    let prefix = arg.split('=').next().unwrap_or(arg);
    if name.is_empty() {
        Err(ConfigError::MissingSymbol(prefix.to_string()))
    } else {
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests;
