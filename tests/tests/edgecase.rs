use lexel::{LexError, Lexel};

mod overlap_default_priorities {
    use super::*;

    #[derive(Lexel, Debug, PartialEq)]
    enum Token {
        // Priority 4, from the two-scalar literal run.
        #[token("ab")]
        Ab,

        // Priority 1, the class counts once no matter its width.
        #[regex("[a-b]+?")]
        Letters,
    }

    #[test]
    fn longest_match_beats_priority() {
        // Both definitions accept a prefix of "aba", but only the
        // class can consume all of it.
        let source: Vec<char> = "aba".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).spanned().collect();

        assert_eq!(tokens, &[(Ok(Token::Letters), 0..3)]);
    }

    #[test]
    fn priority_settles_equal_spans() {
        let source: Vec<char> = "ab!".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(tokens, &[Ok(Token::Ab), Err(LexError::NotMatch)]);
    }
}

mod overlap_boosted_class {
    use super::*;

    #[derive(Lexel, Debug, PartialEq)]
    enum Token {
        #[token("ab")]
        Ab,

        #[regex("[a-b]+?", priority = 10)]
        Letters,
    }

    #[test]
    fn boosted_class_takes_equal_spans() {
        let source: Vec<char> = "ab!".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(tokens, &[Ok(Token::Letters), Err(LexError::NotMatch)]);
    }

    #[test]
    fn longer_matches_are_unaffected() {
        let source: Vec<char> = "aba".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).spanned().collect();

        assert_eq!(tokens, &[(Ok(Token::Letters), 0..3)]);
    }
}

mod negated_class {
    use super::*;

    #[derive(Lexel, Debug, PartialEq)]
    enum Token {
        #[token("ab")]
        Ab,

        #[regex("[^bc]+?")]
        Other,
    }

    #[test]
    fn negation_partitions_the_alphabet() {
        let source: Vec<char> = "ab".chars().collect();
        assert_eq!(
            Token::lexer(&source).collect::<Vec<_>>(),
            &[Ok(Token::Ab)],
        );

        let source: Vec<char> = "xyz".chars().collect();
        assert_eq!(
            Token::lexer(&source).collect::<Vec<_>>(),
            &[Ok(Token::Other)],
        );

        // 'b' alone is excluded by the class and too short for "ab".
        let source: Vec<char> = "b".chars().collect();
        assert_eq!(
            Token::lexer(&source).collect::<Vec<_>>(),
            &[Err(LexError::NotMatch)],
        );
    }
}

mod shared_prefix {
    use super::*;

    #[derive(Lexel, Debug, PartialEq)]
    enum Token {
        #[token("ab")]
        Ab,

        #[regex("ab(b)+?")]
        Abs,
    }

    #[test]
    fn loop_entered_from_shared_prefix() {
        for (input, expected) in [
            ("ab", Token::Ab),
            ("abb", Token::Abs),
            ("abbbbbb", Token::Abs),
        ] {
            let source: Vec<char> = input.chars().collect();
            let tokens: Vec<_> = Token::lexer(&source).collect();

            assert_eq!(tokens, &[Ok(expected)], "lexing {:?}", input);
        }
    }

    #[test]
    fn incomplete_prefix_fails() {
        let source: Vec<char> = "a".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(tokens, &[Err(LexError::NotMatch)]);
    }
}

mod bounded_repetition {
    use super::*;

    #[derive(Lexel, Debug, PartialEq)]
    #[lexel(skip " ")]
    enum Token {
        #[regex("x{2,4}?")]
        Xs,
    }

    #[test]
    fn bounded_range_accepts_within_bounds() {
        let source: Vec<char> = "xx xxx xxxx".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(tokens, &[Ok(Token::Xs), Ok(Token::Xs), Ok(Token::Xs)]);
    }

    #[test]
    fn too_few_fails() {
        let source: Vec<char> = "x".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(tokens, &[Err(LexError::NotMatch)]);
    }

    #[test]
    fn too_many_splits() {
        // Five x's lex as a maximal four followed by a lone one, which
        // is below the lower bound.
        let source: Vec<char> = "xxxxx".chars().collect();
        let tokens: Vec<_> = Token::lexer(&source).collect();

        assert_eq!(tokens, &[Ok(Token::Xs), Err(LexError::NotMatch)]);
    }
}
