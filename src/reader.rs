use crate::tokens::{tokenize, Token};
use crate::types::{Heap, ObjRef};
use std::fmt;
use std::iter::Peekable;
use std::slice;

type Reader<'a> = Peekable<slice::Iter<'a, Token<'a>>>;

pub type Result<T = ObjRef> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// The token stream ran out before a form began. The driver treats this
    /// as its clean end-of-input signal.
    NoMoreTokens,
    UnclosedList,
    UnexpectedCloseParen,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Error::NoMoreTokens => "no more input",
                Error::UnclosedList => "unbalanced input: unclosed list",
                Error::UnexpectedCloseParen => "unbalanced input: unexpected ')'",
            }
        )
    }
}

/// Read the first complete expression from the input.
pub fn read_str(heap: &mut Heap, input: &str) -> Result {
    let tokens = tokenize(input);
    let mut reader = tokens.iter().peekable();
    read_form(heap, &mut reader)
}

/// Read every top-level expression in the input, in order.
pub fn read_all(heap: &mut Heap, input: &str) -> Result<Vec<ObjRef>> {
    let tokens = tokenize(input);
    let mut reader = tokens.iter().peekable();
    let mut forms = Vec::new();
    while reader.peek().is_some() {
        forms.push(read_form(heap, &mut reader)?);
    }
    Ok(forms)
}

fn read_form(heap: &mut Heap, reader: &mut Reader) -> Result {
    match reader.next() {
        Some(Token::OpenParen) => read_list(heap, reader),
        Some(Token::CloseParen) => Err(Error::UnexpectedCloseParen),
        Some(Token::PlainChars(chars)) => Ok(Some(heap.atom(chars))),
        None => Err(Error::NoMoreTokens),
    }
}

/// Assemble the right-nested pair chain for one parenthesized list. `()`
/// comes out as the empty reference, exactly like the end of a longer list.
fn read_list(heap: &mut Heap, reader: &mut Reader) -> Result {
    let mut elements = Vec::new();
    loop {
        match reader.peek() {
            Some(Token::CloseParen) => {
                reader.next();
                break;
            }
            Some(_) => elements.push(read_form(heap, reader)?),
            None => return Err(Error::UnclosedList),
        }
    }
    Ok(heap.list(&elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::pr_str;

    #[test]
    fn reads_a_bare_atom() {
        let mut heap = Heap::new();
        let form = read_str(&mut heap, "HELLO").unwrap();
        assert_eq!(pr_str(&heap, form), "HELLO");
    }

    #[test]
    fn literal_data_round_trips() {
        let mut heap = Heap::new();
        for src in &["(A)", "(A B C)", "(A (B C) D)", "((A) ((B)))"] {
            let form = read_str(&mut heap, src).unwrap();
            assert_eq!(&pr_str(&heap, form), src);
        }
    }

    #[test]
    fn empty_list_reads_as_empty_reference() {
        let mut heap = Heap::new();
        assert_eq!(read_str(&mut heap, "()"), Ok(None));
    }

    #[test]
    fn unclosed_list_is_an_error() {
        let mut heap = Heap::new();
        assert_eq!(read_str(&mut heap, "(A (B)"), Err(Error::UnclosedList));
    }

    #[test]
    fn stray_close_paren_is_an_error() {
        let mut heap = Heap::new();
        assert_eq!(read_str(&mut heap, ")"), Err(Error::UnexpectedCloseParen));
    }

    #[test]
    fn end_of_input_is_signalled_not_fatal() {
        let mut heap = Heap::new();
        assert_eq!(read_str(&mut heap, "   "), Err(Error::NoMoreTokens));
    }

    #[test]
    fn read_all_returns_each_top_level_form() {
        let mut heap = Heap::new();
        let forms = read_all(&mut heap, "(QUOTE A) B ()").unwrap();
        assert_eq!(forms.len(), 3);
        assert_eq!(pr_str(&heap, forms[0]), "(QUOTE A)");
        assert_eq!(pr_str(&heap, forms[1]), "B");
        assert_eq!(forms[2], None);
    }
}
