use std::sync::Arc;

use pretty_assertions::assert_eq;
use refl_diagnostic::{DiagnosticLog, ErrorCode};
use refl_ir::{Span, TokenKind, MAX_NAME_LENGTH, MAX_STRING_LENGTH};

use crate::{
    ConditionalPreprocessor, PreprocessorConfig, RawStringOptions, TokenReader, TokenizeErrorKind,
};

fn reader(source: &str) -> TokenReader<'_> {
    TokenReader::new(source, Arc::new(DiagnosticLog::new()))
}

fn reader_with_preprocessor(
    source: &str,
    config: PreprocessorConfig,
) -> (TokenReader<'_>, Arc<DiagnosticLog>) {
    let log = Arc::new(DiagnosticLog::new());
    let mut reader = TokenReader::new(source, log.clone());
    reader.set_preprocessor(Box::new(ConditionalPreprocessor::new(config)));
    (reader, log)
}

fn drain<'src>(reader: &mut TokenReader<'src>) -> Vec<(TokenKind, &'src str)> {
    let mut out = Vec::new();
    loop {
        let token = match reader.get_token() {
            Ok(token) => token,
            Err(err) => panic!("unexpected error: {err}"),
        };
        if token.kind == TokenKind::EndOfFile {
            return out;
        }
        out.push((token.kind, token.text));
    }
}

fn lex(source: &str) -> Vec<(TokenKind, &str)> {
    drain(&mut reader(source))
}

fn first_error(source: &str) -> (TokenizeErrorKind, u32, u32) {
    let mut reader = reader(source);
    loop {
        match reader.get_token() {
            Ok(token) if token.kind == TokenKind::EndOfFile => panic!("no error in {source:?}"),
            Ok(_) => {}
            Err(err) => return (err.kind, err.pos, err.line),
        }
    }
}

use refl_ir::TokenKind::{
    CharConst, DecimalConst, FloatConst, HexConst, Identifier, StringConst, Symbol,
};

// === Classification ===

#[test]
fn identifiers_and_symbols() {
    assert_eq!(
        lex("int32 Foo::Bar;"),
        vec![
            (Identifier, "int32"),
            (Identifier, "Foo"),
            (Symbol, "::"),
            (Identifier, "Bar"),
            (Symbol, ";"),
        ]
    );
}

#[test]
fn non_ascii_identifiers() {
    assert_eq!(lex("Größe €"), vec![(Identifier, "Größe"), (Symbol, "€")]);
}

#[test]
fn numeric_literals() {
    assert_eq!(lex("123.5f"), vec![(FloatConst, "123.5f")]);
    assert_eq!(lex("0x1F"), vec![(HexConst, "0x1F")]);
    assert_eq!(lex("0XaB"), vec![(HexConst, "0XaB")]);
    assert_eq!(lex("42"), vec![(DecimalConst, "42")]);
    assert_eq!(lex("42uLL"), vec![(DecimalConst, "42uLL")]);
    assert_eq!(lex("0755"), vec![(DecimalConst, "0755")]);
    assert_eq!(lex("1e10"), vec![(FloatConst, "1e10")]);
    assert_eq!(lex("1.0e-3f"), vec![(FloatConst, "1.0e-3f")]);
    assert_eq!(lex("2f"), vec![(FloatConst, "2f")]);
    assert_eq!(lex(".5"), vec![(FloatConst, ".5")]);
}

#[test]
fn signed_numeric_literals() {
    assert_eq!(lex("-1"), vec![(DecimalConst, "-1")]);
    assert_eq!(lex("+3"), vec![(DecimalConst, "+3")]);
    assert_eq!(lex("-.5"), vec![(FloatConst, "-.5")]);
    assert_eq!(lex("-0x10"), vec![(HexConst, "-0x10")]);
    // A sign not followed by a number is a symbol.
    assert_eq!(lex("- x"), vec![(Symbol, "-"), (Identifier, "x")]);
    assert_eq!(lex("-.x"), vec![(Symbol, "-"), (Symbol, "."), (Identifier, "x")]);
}

#[test]
fn hex_literals_take_no_suffix() {
    assert_eq!(lex("0x1Fu"), vec![(HexConst, "0x1F"), (Identifier, "u")]);
}

#[test]
fn char_constants() {
    assert_eq!(lex("'a'"), vec![(CharConst, "'a'")]);
    assert_eq!(lex(r"'\n'"), vec![(CharConst, r"'\n'")]);
    assert_eq!(lex(r"'\''"), vec![(CharConst, r"'\''")]);
    assert_eq!(lex("'é'"), vec![(CharConst, "'é'")]);
}

#[test]
fn string_constants() {
    let mut reader = reader("\"hello\"");
    let token = reader.get_token().unwrap();
    assert_eq!(token.kind, StringConst);
    assert_eq!(token.text, "\"hello\"");
    assert_eq!(token.span, Span::new(0, 7));
    assert_eq!(lex(r#""a\"b" x"#), vec![(StringConst, r#""a\"b""#), (Identifier, "x")]);
}

#[test]
fn multi_line_string_advances_line() {
    let mut reader = reader("\"a\nb\" c");
    let string = reader.get_token().unwrap();
    assert_eq!(string.kind, StringConst);
    assert_eq!((string.start_line, string.end_line), (1, 2));
    let next = reader.get_token().unwrap();
    assert_eq!(next.text, "c");
    assert_eq!(next.start_line, 2);
}

#[test]
fn shift_right_is_two_symbols() {
    assert_eq!(lex(">>"), vec![(Symbol, ">"), (Symbol, ">")]);
    assert_eq!(lex(">>="), vec![(Symbol, ">"), (Symbol, ">=")]);
    assert_eq!(lex("<<="), vec![(Symbol, "<<"), (Symbol, "=")]);
}

#[test]
fn all_compound_operators() {
    for op in refl_lexer_core::COMPOUND_OPERATORS {
        assert_eq!(lex(op), vec![(Symbol, op)], "operator {op}");
    }
}

#[test]
fn hash_without_preprocessor_is_a_symbol() {
    assert_eq!(
        lex("#if 0"),
        vec![(Symbol, "#"), (Identifier, "if"), (DecimalConst, "0")]
    );
}

// === Errors ===

#[test]
fn unterminated_string() {
    assert_eq!(first_error("\"abc"), (TokenizeErrorKind::UnterminatedString, 0, 1));
    assert_eq!(first_error("x \"abc\\"), (TokenizeErrorKind::UnterminatedString, 2, 1));
}

#[test]
fn unterminated_char_const() {
    assert_eq!(first_error("\n'ab'"), (TokenizeErrorKind::UnterminatedCharConst, 1, 2));
    assert_eq!(first_error("'a"), (TokenizeErrorKind::UnterminatedCharConst, 0, 1));
}

#[test]
fn unterminated_comment() {
    assert_eq!(first_error("x /* open\n"), (TokenizeErrorKind::UnterminatedComment, 2, 1));
}

#[test]
fn identifier_length_limit() {
    let ok = "a".repeat(MAX_NAME_LENGTH - 1);
    assert_eq!(lex(&ok), vec![(Identifier, ok.as_str())]);
    let long = "a".repeat(MAX_NAME_LENGTH);
    assert_eq!(first_error(&long).0, TokenizeErrorKind::IdentifierTooLong);
}

#[test]
fn number_length_limit() {
    let long = "1".repeat(MAX_NAME_LENGTH);
    assert_eq!(first_error(&long).0, TokenizeErrorKind::NumberTooLong);
}

#[test]
fn string_length_limit() {
    let ok = format!("\"{}\"", "s".repeat(MAX_STRING_LENGTH - 3));
    assert_eq!(lex(&ok).len(), 1);
    let long = format!("\"{}\"", "s".repeat(MAX_STRING_LENGTH - 2));
    assert_eq!(first_error(&long).0, TokenizeErrorKind::StringTooLong);
}

// === Peek / consume ===

#[test]
fn peek_is_idempotent() {
    let mut reader = reader("  alpha beta");
    let first = reader.peek_token().unwrap();
    let second = reader.peek_token().unwrap();
    assert_eq!(first, second);
    assert_eq!(reader.get_token().unwrap(), first);
    assert_eq!(reader.peek_token().unwrap().text, "beta");
}

#[test]
fn end_of_file_is_sticky() {
    let mut reader = reader("x");
    assert_eq!(reader.get_token().unwrap().text, "x");
    assert!(reader.is_eof());
    for _ in 0..3 {
        let token = reader.get_token().unwrap();
        assert_eq!(token.kind, TokenKind::EndOfFile);
        assert_eq!(token.span, Span::point(1));
    }
}

#[test]
fn positions_and_lines() {
    let mut reader = reader("a\n\n  b");
    reader.consume_token();
    let a = reader.get_token().unwrap();
    assert_eq!((a.start_line, a.span), (1, Span::new(0, 1)));
    let b = reader.peek_token().unwrap();
    assert_eq!((b.start_line, b.span), (3, Span::new(5, 6)));
    assert_eq!((b.unget_pos, b.unget_line), (1, 1));
    assert_eq!(reader.input_pos(), 1);
    assert_eq!(reader.input_line(), 1);
}

#[test]
fn set_input_line_rescans() {
    let mut reader = reader("a\nb");
    reader.peek_token().unwrap();
    reader.set_input_line(10);
    let a = reader.get_token().unwrap();
    assert_eq!(a.start_line, 10);
    assert_eq!(reader.get_token().unwrap().start_line, 11);
}

#[test]
fn skip_whitespace_and_comments_collects() {
    let mut reader = reader("  // note\n  x");
    reader.skip_whitespace_and_comments().unwrap();
    assert_eq!(reader.input_pos(), 12);
    reader.commit_pending_comments();
    assert_eq!(reader.comments(), &["// note"]);
}

#[test]
fn string_view_slices_source() {
    let reader = reader("hello world");
    assert_eq!(reader.string_view(6, 5), "world");
}

#[test]
fn first_token_in_line() {
    let mut reader = reader("#a\n  \t#b x #c");
    let mut hashes = Vec::new();
    loop {
        let token = reader.get_token().unwrap();
        if token.kind == TokenKind::EndOfFile {
            break;
        }
        if token.is_symbol("#") {
            hashes.push(reader.is_first_token_in_line(&token));
        }
    }
    assert_eq!(hashes, vec![true, true, false]);
}

// === get_line / get_raw_string ===

#[test]
fn get_line_returns_rest_of_line() {
    let mut reader = reader("#define X  1 \r\nnext");
    reader.get_token().unwrap();
    let line = reader.get_line();
    assert_eq!(line.kind, TokenKind::Line);
    assert_eq!(line.text, "define X  1 ");
    assert_eq!(line.start_line, 1);
    let next = reader.get_token().unwrap();
    assert_eq!((next.text, next.start_line), ("next", 2));
}

#[test]
fn get_line_at_end() {
    let mut reader = reader("x");
    reader.get_token().unwrap();
    assert_eq!(reader.get_line().kind, TokenKind::EndOfFile);
}

#[test]
fn get_line_discards_peeked_token() {
    let mut reader = reader("a b\nc");
    reader.peek_token().unwrap();
    assert_eq!(reader.get_line().text, "a b");
}

#[test]
fn raw_string_consumes_terminator() {
    let mut reader = reader("  some value  , next");
    assert_eq!(reader.get_raw_string(',', RawStringOptions::empty()), Ok("some value  ,"));
    assert_eq!(reader.get_token().unwrap().text, "next");
}

#[test]
fn raw_string_leaves_terminator() {
    let mut reader = reader("value)");
    assert_eq!(
        reader.get_raw_string(')', RawStringOptions::DONT_CONSUME_TERMINATOR),
        Ok("value")
    );
    assert_eq!(reader.get_token().unwrap().text, ")");
}

#[test]
fn raw_string_respects_quotes() {
    let mut reader = reader(r#""a,b", c"#);
    assert_eq!(
        reader.get_raw_string(',', RawStringOptions::RESPECT_QUOTES),
        Ok(r#""a,b","#)
    );
    let mut reader = self::reader(r#""a,b", c"#);
    assert_eq!(reader.get_raw_string(',', RawStringOptions::empty()), Ok("\"a,"));
}

#[test]
fn raw_string_stops_at_line_end_and_comments() {
    let mut reader = reader("abc\ndef");
    assert_eq!(reader.get_raw_string(',', RawStringOptions::empty()), Ok("abc"));
    assert_eq!(reader.get_token().unwrap().text, "def");

    let mut reader = self::reader("abc // note");
    assert_eq!(reader.get_raw_string(',', RawStringOptions::empty()), Ok("abc"));
    let mut reader = self::reader("abc/* note */");
    assert_eq!(reader.get_raw_string(',', RawStringOptions::empty()), Ok("abc"));
    let mut reader = self::reader(r#""a // b" x"#);
    assert_eq!(
        reader.get_raw_string(',', RawStringOptions::RESPECT_QUOTES),
        Ok(r#""a // b" x"#)
    );
}

#[test]
fn raw_string_errors() {
    let mut reader = reader("\"abc");
    let err = reader.get_raw_string(',', RawStringOptions::RESPECT_QUOTES);
    assert_eq!(err.map_err(|e| e.kind), Err(TokenizeErrorKind::UnterminatedQuote));

    let source = "x".repeat(MAX_STRING_LENGTH);
    let mut reader = self::reader(&source);
    let err = reader.get_raw_string(',', RawStringOptions::empty());
    assert_eq!(err.map_err(|e| e.kind), Err(TokenizeErrorKind::StringTooLong));
}

// === Comments ===

#[test]
fn comments_commit_on_consume() {
    let mut reader = reader("// one\n// two\nint X;");
    reader.peek_token().unwrap();
    assert!(reader.comments().is_empty());
    reader.consume_token();
    assert_eq!(reader.comments(), &["// one", "// two"]);
}

#[test]
fn blank_line_starts_new_group() {
    let mut reader = reader("// one\n\n// two\nint");
    reader.get_token().unwrap();
    assert_eq!(reader.comments(), &["// two"]);
}

#[test]
fn block_comment_starts_new_group() {
    let mut reader = reader("// one\n/** two */ int");
    reader.get_token().unwrap();
    assert_eq!(reader.comments(), &["/** two */"]);
}

#[test]
fn trailing_comment_joins_committed() {
    let mut reader = reader("// a\nint X; // b\nY");
    for _ in 0..4 {
        reader.get_token().unwrap();
    }
    assert_eq!(reader.comments(), &["// a", "// b"]);
}

#[test]
fn clear_comments_keeps_pending() {
    let mut reader = reader("// a\nx // b\ny");
    reader.get_token().unwrap();
    reader.peek_token().unwrap();
    reader.clear_comments();
    assert!(reader.comments().is_empty());
    reader.consume_token();
    assert_eq!(reader.comments(), &["// b"]);
}

#[test]
fn disabled_comments_are_discarded() {
    let mut reader = reader("// a\nx // b\ny");
    reader.disable_comments();
    reader.disable_comments();
    reader.get_token().unwrap();
    reader.enable_comments();
    reader.get_token().unwrap();
    assert!(reader.comments().is_empty());
    reader.enable_comments();
    reader.get_token().unwrap();
    assert!(reader.comments().is_empty());
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "enable_comments without matching disable_comments")]
fn unbalanced_enable_comments_panics() {
    let mut reader = reader("x");
    reader.enable_comments();
}

#[test]
fn rewinding_drops_pending_comments() {
    let mut reader = reader("// a\nx");
    reader.peek_token().unwrap();
    let _ = reader.get_line();
    assert!(reader.comments().is_empty());
    let _ = reader.get_line();
    reader.commit_pending_comments();
    assert!(reader.comments().is_empty());
}

// === Save / restore ===

#[test]
fn save_restore_round_trip() {
    let mut reader = reader("// doc\na b c");
    reader.get_token().unwrap();
    reader.clear_comments();
    reader.save_state().unwrap();
    let first: Vec<_> = (0..2).map(|_| reader.get_token().unwrap()).collect();
    reader.restore_state().unwrap();
    let second: Vec<_> = (0..2).map(|_| reader.get_token().unwrap()).collect();
    assert_eq!(first, second);
    assert_eq!(first[0].text, "b");
}

#[test]
fn save_with_peeked_token() {
    let mut reader = reader("a b");
    reader.peek_token().unwrap();
    reader.save_state().unwrap();
    reader.get_token().unwrap();
    reader.get_token().unwrap();
    reader.restore_state().unwrap();
    assert_eq!(reader.get_token().unwrap().text, "a");
}

#[test]
fn restore_with_peeked_token_keeps_comments_single() {
    let mut reader = reader("// doc\nint");
    reader.peek_token().unwrap();
    reader.save_state().unwrap();
    reader.restore_state().unwrap();
    reader.get_token().unwrap();
    assert_eq!(reader.comments(), &["// doc"]);
}

#[test]
fn restore_with_peeked_token_keeps_committed_comments() {
    let mut reader = reader("// a\nx\n// b\ny");
    reader.get_token().unwrap();
    reader.peek_token().unwrap();
    reader.save_state().unwrap();
    reader.get_token().unwrap();
    reader.restore_state().unwrap();
    assert_eq!(reader.comments(), &["// a"]);
    assert_eq!(reader.get_token().unwrap().text, "y");
    assert_eq!(reader.comments(), &["// a", "// b"]);
}

#[test]
fn restore_restores_comments() {
    let mut reader = reader("// a\nx // b\ny");
    reader.get_token().unwrap();
    reader.save_state().unwrap();
    reader.get_token().unwrap();
    reader.clear_comments();
    reader.restore_state().unwrap();
    assert_eq!(reader.comments(), &["// a"]);
}

#[test]
fn abandon_keeps_position() {
    let mut reader = reader("a b c");
    reader.save_state().unwrap();
    reader.get_token().unwrap();
    reader.abandon_state().unwrap();
    assert_eq!(reader.get_token().unwrap().text, "b");
    reader.save_state().unwrap();
}

#[test]
fn state_misuse_is_reported() {
    let mut reader = reader("a");
    reader.save_state().unwrap();
    assert_eq!(
        reader.save_state().map_err(|e| e.kind),
        Err(TokenizeErrorKind::StateAlreadySaved)
    );
    reader.restore_state().unwrap();
    assert_eq!(
        reader.restore_state().map_err(|e| e.kind),
        Err(TokenizeErrorKind::NoSavedState)
    );
    assert_eq!(
        reader.abandon_state().map_err(|e| e.kind),
        Err(TokenizeErrorKind::NoSavedState)
    );
}

// === Recording ===

#[test]
fn recording_collects_consumed_tokens() {
    let mut reader = reader("a b");
    reader.enable_recording().unwrap();
    let a = reader.get_token().unwrap();
    reader.peek_token().unwrap();
    let b = reader.get_token().unwrap();
    reader.get_token().unwrap();
    assert_eq!(reader.recorded_tokens().map(<[_]>::to_vec), Ok(vec![a, b]));

    reader.record_token(a).unwrap();
    assert_eq!(reader.recorded_tokens().map(<[_]>::len), Ok(3));

    reader.disable_recording().unwrap();
    reader.enable_recording().unwrap();
    assert_eq!(reader.recorded_tokens().map(<[_]>::len), Ok(0));
}

#[test]
fn recording_misuse_is_reported() {
    let mut reader = reader("a");
    let token = reader.peek_token().unwrap();
    let kind = |result: Result<(), crate::TokenizeError>| result.map_err(|e| e.kind);
    assert_eq!(kind(reader.disable_recording()), Err(TokenizeErrorKind::RecordingNotEnabled));
    assert_eq!(kind(reader.record_token(token)), Err(TokenizeErrorKind::RecordingNotEnabled));
    assert_eq!(
        reader.recorded_tokens().map(|_| ()).map_err(|e| e.kind),
        Err(TokenizeErrorKind::RecordingNotEnabled)
    );
    reader.enable_recording().unwrap();
    assert_eq!(kind(reader.enable_recording()), Err(TokenizeErrorKind::RecordingAlreadyEnabled));
}

// === Directives ===

#[test]
fn excluded_block_yields_no_tokens() {
    let source = "#if 0\nUPROPERTY()\n#endif\nint X;";
    let (mut reader, log) = reader_with_preprocessor(source, PreprocessorConfig::default());
    let int = reader.peek_token().unwrap();
    assert_eq!(int.text, "int");
    assert_eq!(int.span, Span::new(25, 28));
    assert_eq!(int.start_line, 4);
    assert_eq!(
        drain(&mut reader),
        vec![(Identifier, "int"), (Identifier, "X"), (Symbol, ";")]
    );

    let entries = log.snapshot();
    assert_eq!(entries.len(), 1);
    let diagnostic = &entries[0].diagnostic;
    assert_eq!(diagnostic.code, ErrorCode::E0101);
    assert_eq!(
        diagnostic.message,
        "'UPROPERTY' must not be inside preprocessor blocks, except for WITH_EDITORONLY_DATA"
    );
    assert_eq!((diagnostic.line, diagnostic.span), (2, Span::new(6, 15)));
}

#[test]
fn included_branch_is_kept() {
    let source = "#if 1\nint\n#else\nfloat\n#endif\nX";
    let (mut reader, log) = reader_with_preprocessor(source, PreprocessorConfig::default());
    assert_eq!(drain(&mut reader), vec![(Identifier, "int"), (Identifier, "X")]);
    assert!(log.is_empty());
}

#[test]
fn else_branch_of_included_region_is_checked() {
    let source = "#if 1\na\n#else\nUCLASS()\n#endif\nz";
    let (mut reader, log) = reader_with_preprocessor(source, PreprocessorConfig::default());
    assert_eq!(drain(&mut reader), vec![(Identifier, "a"), (Identifier, "z")]);
    assert_eq!(log.error_count(), 1);
}

#[test]
fn elif_chain() {
    let source = "#if 0\na\n#elif 1\nb\n#else\nc\n#endif\n";
    let (mut reader, _) = reader_with_preprocessor(source, PreprocessorConfig::default());
    assert_eq!(drain(&mut reader), vec![(Identifier, "b")]);
}

#[test]
fn nested_conditionals_inside_excluded_block() {
    let source = "#if 0\n#if 1\nx\n#else\ny\n#endif\nz\n#endif\nw";
    let (mut reader, _) = reader_with_preprocessor(source, PreprocessorConfig::default());
    assert_eq!(drain(&mut reader), vec![(Identifier, "w")]);
}

#[test]
fn hidden_serialize_override_is_reported() {
    let source = "#if 0\nvoid Serialize(FArchive& Ar);\n#endif\n";
    let (mut reader, log) = reader_with_preprocessor(source, PreprocessorConfig::default());
    assert!(drain(&mut reader).is_empty());
    let entries = log.snapshot();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].diagnostic.code, ErrorCode::E0102);
    assert_eq!(entries[0].diagnostic.line, 2);
}

#[test]
fn editor_only_data_blocks_are_exempt() {
    let source = "#if WITH_EDITORONLY_DATA\nUPROPERTY()\nint32 X;\n#endif\nY";
    let config = PreprocessorConfig::default().undefine("WITH_EDITORONLY_DATA");
    let (mut reader, log) = reader_with_preprocessor(source, config);
    assert_eq!(drain(&mut reader), vec![(Identifier, "Y")]);
    assert!(log.is_empty());
}

#[test]
fn unknown_conditions_are_included() {
    let source = "#if SOME_FLAG\na\n#endif\n#ifdef OTHER\nb\n#endif";
    let (mut reader, _) = reader_with_preprocessor(source, PreprocessorConfig::default());
    assert_eq!(drain(&mut reader), vec![(Identifier, "a"), (Identifier, "b")]);
}

#[test]
fn excluded_block_runs_to_end_of_input() {
    let source = "int\n#if 0\nUCLASS\nfloat";
    let (mut reader, log) = reader_with_preprocessor(source, PreprocessorConfig::default());
    assert_eq!(drain(&mut reader), vec![(Identifier, "int")]);
    assert_eq!(log.len(), 1);
}

#[test]
fn unmatched_endif_is_fatal() {
    let (mut reader, _) = reader_with_preprocessor("x\n#endif\n", PreprocessorConfig::default());
    assert_eq!(reader.get_token().unwrap().text, "x");
    let err = reader.get_token().map_err(|e| (e.kind, e.pos, e.line));
    assert_eq!(err, Err((TokenizeErrorKind::UnmatchedDirective, 2, 2)));
}

#[test]
fn hash_inside_line_is_not_a_directive() {
    let (mut reader, _) = reader_with_preprocessor("a # b", PreprocessorConfig::default());
    assert_eq!(
        drain(&mut reader),
        vec![(Identifier, "a"), (Symbol, "#"), (Identifier, "b")]
    );
}

#[test]
fn directive_at_buffer_start() {
    let (mut reader, _) = reader_with_preprocessor("#pragma once\nx", PreprocessorConfig::default());
    assert_eq!(drain(&mut reader), vec![(Identifier, "x")]);
}

#[test]
fn include_directive_drops_pending_comments() {
    let source = "// doc\n#include \"Foo.h\"\nint";
    let (mut reader, _) = reader_with_preprocessor(source, PreprocessorConfig::default());
    reader.get_token().unwrap();
    assert!(reader.comments().is_empty());
}

#[test]
fn excluded_block_keeps_comments_before_it() {
    let source = "// doc\n#if 0\n// hidden\n#endif\nint";
    let (mut reader, _) = reader_with_preprocessor(source, PreprocessorConfig::default());
    reader.get_token().unwrap();
    assert_eq!(reader.comments(), &["// doc"]);
}

#[test]
fn preprocessor_can_be_detached() {
    let (mut reader, _) = reader_with_preprocessor("#if 0\nx", PreprocessorConfig::default());
    assert!(reader.take_preprocessor().is_some());
    assert_eq!(drain(&mut reader).len(), 4);
}

#[test]
fn restore_rolls_back_preprocessor() {
    let source = "a\n#if 1\nb\n#endif\nc";
    let (mut reader, _) = reader_with_preprocessor(source, PreprocessorConfig::default());
    reader.get_token().unwrap();
    reader.save_state().unwrap();
    assert_eq!(drain(&mut reader), vec![(Identifier, "b"), (Identifier, "c")]);
    reader.restore_state().unwrap();
    assert_eq!(drain(&mut reader), vec![(Identifier, "b"), (Identifier, "c")]);
}

// === Properties ===

mod proptest_reader {
    use proptest::prelude::*;
    use refl_ir::TokenKind;

    use super::reader;

    fn fragment() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("Foo"),
            Just("_bar9"),
            Just("123"),
            Just("0x1F"),
            Just("1.5f"),
            Just("-.5"),
            Just("'a'"),
            Just("\"str\""),
            Just("\"multi\nline\""),
            Just("::"),
            Just(">>"),
            Just("<="),
            Just("("),
            Just(";"),
            Just("#"),
            Just("// line\n"),
            Just("/* block */"),
            Just("\n"),
            Just("\t"),
        ]
    }

    fn source() -> impl Strategy<Value = String> {
        proptest::collection::vec(fragment(), 0..32).prop_map(|parts| parts.join(" "))
    }

    /// Remove leading whitespace and comments; `None` if anything else remains.
    fn only_trivia(mut gap: &str) -> bool {
        loop {
            gap = gap.trim_start_matches([' ', '\t', '\r', '\n']);
            if let Some(rest) = gap.strip_prefix("//") {
                gap = rest.find('\n').map_or("", |at| &rest[at..]);
            } else if let Some(rest) = gap.strip_prefix("/*") {
                match rest.find("*/") {
                    Some(at) => gap = &rest[at + 2..],
                    None => return false,
                }
            } else {
                return gap.is_empty();
            }
        }
    }

    proptest! {
        #[test]
        fn tokens_reconstruct_source(text in source()) {
            let mut reader = reader(&text);
            let mut prev_end = 0usize;
            loop {
                let token = reader.get_token();
                prop_assert!(token.is_ok());
                let token = token.unwrap();
                let range = token.span.to_range();
                prop_assert_eq!(&text[range.clone()], token.text);
                prop_assert!(only_trivia(&text[prev_end..range.start]));
                let line = 1 + text[..range.start].matches('\n').count();
                prop_assert_eq!(token.start_line as usize, line);
                prev_end = range.end;
                if token.kind == TokenKind::EndOfFile {
                    break;
                }
            }
            prop_assert_eq!(prev_end, text.len());
        }

        #[test]
        fn peek_then_get_agree(text in source()) {
            let mut reader = reader(&text);
            loop {
                let peeked = reader.peek_token();
                let again = reader.peek_token();
                prop_assert_eq!(&peeked, &again);
                let got = reader.get_token();
                prop_assert_eq!(&peeked, &got);
                if !matches!(got, Ok(token) if token.kind != TokenKind::EndOfFile) {
                    break;
                }
            }
        }
    }
}
