mod fill {
    use lexel::Lexel;

    #[derive(Lexel, Debug, PartialEq)]
    #[lexel(skip " ")]
    enum Token {
        #[regex(
            "[0-9]*?\\.[0-9]+?",
            fill = |lex| lex.slice().iter().collect::<String>().parse().unwrap()
        )]
        Double(f64),

        #[regex(
            "[0-9]+?",
            fill = |lex| lex.slice().iter().collect::<String>().parse().unwrap()
        )]
        Number(u64),

        #[token("what")]
        What,

        #[regex("//.*?", fill = |lex| lex.slice().iter().collect())]
        Comment(String),
    }

    #[test]
    fn numbers_doubles_and_trailing_comment() {
        let source: Vec<char> = "100 1.5 what // this is a comment".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(
            tokens,
            &[
                Ok(Token::Number(100)),
                Ok(Token::Double(1.5)),
                Ok(Token::What),
                Ok(Token::Comment("// this is a comment".to_string())),
            ],
        );
    }

    #[test]
    fn double_without_integral_part() {
        let source: Vec<char> = ".5 42".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(tokens, &[Ok(Token::Double(0.5)), Ok(Token::Number(42))]);
    }

    #[test]
    fn number_not_followed_by_a_dot_stays_a_number() {
        let source: Vec<char> = "100 what".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(tokens, &[Ok(Token::Number(100)), Ok(Token::What)]);
    }
}

mod create {
    use lexel::{Filter, Lexel, Skip};

    #[derive(Lexel, Debug, PartialEq)]
    #[lexel(skip " ")]
    enum Token {
        // Commas are matched, then unconditionally thrown away.
        #[token(",", create = |_| Skip)]
        Comma,

        // Words are kept only when they are long enough.
        #[regex(
            "[a-z]+?",
            create = |lex| if lex.slice().len() > 3 {
                Filter::Emit(Token::Word)
            } else {
                Filter::Skip
            }
        )]
        Word,
    }

    #[test]
    fn create_callbacks_filter_matches() {
        let source: Vec<char> = "hi, hello, hey world".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(tokens, &[Ok(Token::Word), Ok(Token::Word)]);
    }

    #[test]
    fn skipped_matches_still_advance_spans() {
        let source: Vec<char> = "hi, jolly".chars().collect();
        let spanned: Vec<_> = Token::lexer(&source).spanned().collect();

        assert_eq!(spanned, &[(Ok(Token::Word), 4..9)]);
    }
}
