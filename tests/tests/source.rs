use lexel::{Lexel, Source};

mod u32_source {
    use super::*;

    #[derive(Lexel, Debug, PartialEq)]
    #[lexel(source = [u32])]
    enum Token {
        #[token("hi")]
        Hi,

        #[regex("[0-9]+?")]
        Number,
    }

    #[test]
    fn lexes_raw_scalar_buffers() {
        let source: Vec<u32> = "hi42hi".chars().map(|c| c as u32).collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(
            tokens,
            &[Ok(Token::Hi), Ok(Token::Number), Ok(Token::Hi)],
        );
    }

    #[test]
    fn slice_is_a_scalar_slice() {
        let source: Vec<u32> = "42".chars().map(|c| c as u32).collect();
        let mut lexer = Token::lexer(&source);

        assert_eq!(lexer.next(), Some(Ok(Token::Number)));
        assert_eq!(lexer.slice(), &[52, 50]);
    }
}

mod beyond_ascii {
    use super::*;

    #[derive(Lexel, Debug, PartialEq)]
    #[lexel(skip " ")]
    enum Token {
        #[token("λ")]
        Lambda,

        #[regex("[α-ω]+?", fill = |lex| lex.slice().iter().collect())]
        Word(String),
    }

    #[test]
    fn scalar_alphabet_reaches_past_ascii() {
        let source: Vec<char> = "λ αβγ λ".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(
            tokens,
            &[
                Ok(Token::Lambda),
                Ok(Token::Word("αβγ".to_string())),
                Ok(Token::Lambda),
            ],
        );
    }

    #[test]
    fn spans_count_scalars_not_bytes() {
        let source: Vec<char> = "λ αβγ λ".chars().collect();
        let spans: Vec<_> = Token::lexer(&source)
            .spanned()
            .map(|(_, span)| span)
            .collect();

        assert_eq!(spans, &[0..1, 2..5, 6..7]);
    }
}

#[test]
fn deref_sources_work() {
    let source: Vec<char> = "one".chars().collect();

    assert_eq!(Source::len(&source), 3);
    assert_eq!(Source::get(&source, 0), Some(111));
}
