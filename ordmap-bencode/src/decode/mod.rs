mod de;

pub use de::{from_bytes, Deserializer};

use crate::{Element, Elements};

const MAX_DEPTH: usize = 256;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    UnexpectedEnd(String),
    ExpectedFar(u8),
    InvalidInt(Vec<u8>),
    TooDeep,
    Trailing,
    TrailingElements(usize),
    Other(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEnd(w) => f.write_fmt(format_args!("unexpected end of input: {}", w)),
            Self::ExpectedFar(b) => {
                f.write_fmt(format_args!("expected '{}' later in input", *b as char))
            }
            Self::InvalidInt(bs) => f.write_fmt(format_args!(
                "invalid integer: {}",
                String::from_utf8_lossy(bs)
            )),
            Self::TooDeep => f.write_fmt(format_args!("nesting deeper than {}", MAX_DEPTH)),
            Self::Trailing => f.write_str("trailing bytes after value"),
            Self::TrailingElements(n) => {
                f.write_fmt(format_args!("{} elements left unread in container", n))
            }
            Self::Other(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for Error {}

pub fn parse(input: &[u8]) -> Result<Elements<&[u8]>, Error> {
    let parser = Parser::new(input);
    parser.parse()
}

pub struct Parser<'a> {
    input: &'a [u8],
    elements: Vec<Element<&'a [u8]>>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let elements = Vec::with_capacity(10);
        Self {
            input,
            elements,
            depth: 0,
        }
    }

    #[inline(always)]
    fn is_done(&self) -> bool {
        self.input.is_empty()
    }

    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.input.first().copied()
    }

    #[inline(always)]
    fn take_until(&mut self, b: u8) -> Result<&'a [u8], Error> {
        let result = memchr::memchr(b, self.input);
        match result {
            Some(i) => {
                let (head, tail) = self.input.split_at(i);
                self.input = tail;
                Ok(head)
            }
            _ => Err(Error::ExpectedFar(b)),
        }
    }

    #[inline(always)]
    fn take_n(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if n > self.input.len() {
            return Err(Error::UnexpectedEnd(format!("take_n: {}", n)));
        }
        let (head, tail) = self.input.split_at(n);
        self.input = tail;
        Ok(head)
    }

    #[inline(always)]
    fn bump(&mut self) -> Result<u8, Error> {
        match self.input.split_first() {
            Some((t, tail)) => {
                self.input = tail;
                Ok(*t)
            }
            _ => Err(Error::UnexpectedEnd("bump".to_string())),
        }
    }

    #[inline(always)]
    fn bump_assert(&mut self) {
        let result = self.bump();
        debug_assert!(result.is_ok());
    }

    #[inline(always)]
    fn parse_raw_int<T: lexical::FromLexical>(input: &[u8]) -> Result<T, Error> {
        lexical::parse(input).map_err(|_| Error::InvalidInt(input.to_vec()))
    }

    fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::TooDeep);
        }
        Ok(())
    }

    fn parse_string(&mut self) -> Result<(), Error> {
        let len = self.take_until(b':')?;
        self.bump_assert();
        let len_num = Self::parse_raw_int(len)?;
        let str = self.take_n(len_num)?;

        self.elements.push(Element::Bytes(str));

        Ok(())
    }

    fn parse_dict(&mut self) -> Result<(), Error> {
        self.bump_assert();
        self.enter()?;

        let header_idx = self.elements.len();
        self.elements.push(Element::DictBegin(0));

        let mut ct = 0;

        while self.peek() != Some(b'e') {
            self.parse_string()?;
            self.parse_value()?;
            ct += 1;
        }

        self.bump_assert();
        self.depth -= 1;

        self.elements[header_idx] = Element::DictBegin(ct);

        Ok(())
    }

    fn parse_int(&mut self) -> Result<(), Error> {
        self.bump_assert();

        let num = self.take_until(b'e')?;
        // Reject leading -0 and leading 0, but not 0 itself.
        if num.starts_with(b"-0") || (num.starts_with(b"0") && num.len() != 1) {
            Err(Error::InvalidInt(num.to_vec()))?;
        }
        let num = Self::parse_raw_int(num)?;

        self.bump_assert();

        self.elements.push(Element::Int(num));

        Ok(())
    }

    fn parse_list(&mut self) -> Result<(), Error> {
        self.bump_assert();
        self.enter()?;

        let header_idx = self.elements.len();

        self.elements.push(Element::ListBegin(0));

        let mut ct = 0;

        while self.peek() != Some(b'e') {
            self.parse_value()?;
            ct += 1;
        }

        self.bump_assert();
        self.depth -= 1;

        self.elements[header_idx] = Element::ListBegin(ct);

        Ok(())
    }

    fn parse_value(&mut self) -> Result<(), Error> {
        match self.peek() {
            Some(b'd') => self.parse_dict(),
            Some(b'i') => self.parse_int(),
            Some(b'l') => self.parse_list(),
            Some(b'0'..=b'9') => self.parse_string(),
            _ => Err(Error::UnexpectedEnd("parse_value".to_string())),
        }
    }

    pub fn parse(mut self) -> Result<Elements<&'a [u8]>, Error> {
        self.parse_value()?;
        if self.is_done() {
            Ok(Elements::from_parts(self.elements))
        } else {
            Err(Error::Trailing)
        }
    }
}
