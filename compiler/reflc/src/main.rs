//! Reflection header scanner CLI.

use std::io::IsTerminal;

use refl_diagnostic::emitter::TerminalEmitter;
use reflc::commands::lex_files;
use reflc::LexConfig;

fn main() {
    reflc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "lex" => {
            let config = match LexConfig::from_args(&args[2..]) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("error: {err}");
                    print_lex_usage();
                    std::process::exit(1);
                }
            };
            run_lex(&config);
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("reflc {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn run_lex(config: &LexConfig) {
    let summary = lex_files(config);

    for file in &summary.files {
        print!("{}", file.dump);
    }

    let is_tty = std::io::stderr().is_terminal();
    let mut emitter = TerminalEmitter::stderr(config.color, is_tty);
    emitter.emit_all(&summary.diagnostics);
    emitter.emit_summary(summary.error_count, summary.warning_count);
    emitter.flush();

    if summary.has_errors() {
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("reflc - reflection header scanner");
    println!();
    println!("Usage: reflc <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <files...>   Tokenize headers and check excluded blocks");
    println!("  help             Show this message");
    println!("  version          Show version information");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=refl_lexer=debug) for tracing output.");
}

fn print_lex_usage() {
    eprintln!("Usage: reflc lex <files...> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tokens              Print every token");
    eprintln!("  --define=<NAME>       Treat NAME as defined in #if conditions");
    eprintln!("  --undefine=<NAME>     Treat NAME as undefined in #if conditions");
    eprintln!("  --color=<mode>        auto, always or never");
}
