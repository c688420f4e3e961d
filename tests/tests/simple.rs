use lexel::{LexError, Lexel};
use tests::assert_lex;

#[derive(Lexel, Debug, Clone, Copy, PartialEq)]
#[lexel(skip " ")]
enum Token {
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*?")]
    Identifier,

    #[regex("[0-9]+?")]
    Number,

    #[token("let")]
    Let,

    #[token("=")]
    OpAssign,

    #[token("==")]
    OpEquality,

    #[token("+")]
    OpAddition,

    #[token("++")]
    OpIncrement,
}

fn lex(source: &[char]) -> Vec<Result<Token, LexError>> {
    Token::lexer(source).collect()
}

#[test]
fn empty_source_produces_nothing() {
    assert_eq!(lex(&[]), &[]);
}

#[test]
fn whitespace_is_skipped() {
    let source: Vec<char> = "   ".chars().collect();

    assert_eq!(lex(&source), &[]);
}

#[test]
fn operators() {
    let source: Vec<char> = "= == + ++".chars().collect();

    assert_eq!(
        lex(&source),
        &[
            Ok(Token::OpAssign),
            Ok(Token::OpEquality),
            Ok(Token::OpAddition),
            Ok(Token::OpIncrement),
        ],
    );
}

#[test]
fn keywords_win_over_identifiers_on_ties() {
    let source: Vec<char> = "let lettuce = 42".chars().collect();

    assert_eq!(
        lex(&source),
        &[
            Ok(Token::Let),
            Ok(Token::Identifier),
            Ok(Token::OpAssign),
            Ok(Token::Number),
        ],
    );
}

#[test]
fn slices_and_spans() {
    let source: Vec<char> = "one 23".chars().collect();

    assert_lex(
        &source[..],
        &[
            (Ok(Token::Identifier), &['o', 'n', 'e'][..], 0..3),
            (Ok(Token::Number), &['2', '3'][..], 4..6),
        ],
    );
}

#[test]
fn unmatched_input_fails_once_then_stops() {
    let source: Vec<char> = "let !".chars().collect();
    let mut lexer = Token::lexer(&source);

    assert_eq!(lexer.next(), Some(Ok(Token::Let)));
    assert_eq!(lexer.next(), Some(Err(LexError::NotMatch)));
    assert_eq!(lexer.next(), None);
}

#[test]
fn spanned_iteration() {
    let source: Vec<char> = "a + b".chars().collect();
    let tokens: Vec<_> = Token::lexer(&source).spanned().collect();

    assert_eq!(
        tokens,
        &[
            (Ok(Token::Identifier), 0..1),
            (Ok(Token::OpAddition), 2..3),
            (Ok(Token::Identifier), 4..5),
        ],
    );
}

#[test]
fn tokenisation_is_prefix_closed() {
    let short: Vec<char> = "let x".chars().collect();
    let long: Vec<char> = "let x = 10 ++ y".chars().collect();

    let head = lex(&short);
    let full = lex(&long);

    assert_eq!(head[..], full[..head.len()]);
}
