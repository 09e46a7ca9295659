use pretty_assertions::assert_eq;

use super::*;

#[test]
fn parses_options_and_files() {
    let config = LexConfig::from_args(&[
        "--tokens",
        "--define=WITH_EDITOR",
        "--undefine=WITH_EDITORONLY_DATA",
        "--color=never",
        "Actor.h",
        "Pawn.h",
    ]);
    assert_eq!(
        config,
        Ok(LexConfig {
            show_tokens: true,
            defines: vec!["WITH_EDITOR".to_string()],
            undefines: vec!["WITH_EDITORONLY_DATA".to_string()],
            color: ColorMode::Never,
            files: vec![PathBuf::from("Actor.h"), PathBuf::from("Pawn.h")],
        })
    );
}

#[test]
fn rejects_bad_arguments() {
    assert_eq!(LexConfig::from_args::<&str>(&[]), Err(ConfigError::NoInputFiles));
    assert_eq!(
        LexConfig::from_args(&["--verbose", "a.h"]),
        Err(ConfigError::UnknownOption("--verbose".to_string()))
    );
    assert_eq!(
        LexConfig::from_args(&["--color=rainbow", "a.h"]),
        Err(ConfigError::InvalidColor("rainbow".to_string()))
    );
    assert_eq!(
        LexConfig::from_args(&["--define=", "a.h"]),
        Err(ConfigError::MissingSymbol("--define".to_string()))
    );
}

#[test]
fn builds_preprocessor_symbols() {
    let config = LexConfig {
        defines: vec!["A".to_string(), "B".to_string()],
        undefines: vec!["B".to_string()],
        files: vec![PathBuf::from("x.h")],
        ..LexConfig::default()
    };
    let pp = config.preprocessor_config();
    assert!(pp.defined.contains("A"));
    assert!(!pp.defined.contains("B"));
    assert!(pp.undefined.contains("B"));
    assert!(pp.illegal_content_exempt.contains("WITH_EDITORONLY_DATA"));
}
