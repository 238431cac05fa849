use regex::Regex;

#[derive(Debug, Eq, PartialEq)]
pub enum Token<'a> {
    OpenParen,
    CloseParen,
    PlainChars(&'a str),
}

/// Split input into tokens. A paren is always its own single-character token;
/// any other run of non-whitespace, non-paren characters is one atom token.
/// Newlines are plain whitespace. There is no comment syntax, no string
/// syntax, and no quote shorthand: `'X` is an ordinary atom name.
pub fn tokenize(input: &str) -> Vec<Token> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(
            r#"(?x)                # ignore whitespace in this pattern & allow comments
                \s*                # whitespace between tokens, ignored
                (                  # token capture group
                    [()]           # parens are single-character tokens
                    |[^\s()]+      # anything else runs until whitespace or a paren
                )
            "#
        )
        .unwrap();
    }
    let mut rest = input;
    let mut tokens = Vec::new();
    while let Some(caps) = TOKEN_RE.captures(rest) {
        let token = match caps.get(1).unwrap().as_str() {
            "(" => Token::OpenParen,
            ")" => Token::CloseParen,
            chars => Token::PlainChars(chars),
        };
        tokens.push(token);
        rest = &rest[caps.get(0).unwrap().end()..];
    }
    tokens
}
