/// A single token of a parsed bencode document.
///
/// Containers are flattened: a `ListBegin(n)` is followed by its `n` values and
/// a `DictBegin(n)` by its `n` key/value pairs, so nesting is recovered from
/// the counts alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<B> {
    DictBegin(usize),
    ListBegin(usize),
    Int(i64),
    Bytes(B),
}

#[derive(Debug, PartialEq, Eq)]
pub struct Elements<B> {
    elements: Vec<Element<B>>,
}

impl<B> Elements<B> {
    pub(crate) fn from_parts(elements: Vec<Element<B>>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<'a, B> IntoIterator for &'a Elements<B> {
    type Item = &'a Element<B>;

    type IntoIter = std::slice::Iter<'a, Element<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<B> IntoIterator for Elements<B> {
    type Item = Element<B>;

    type IntoIter = std::vec::IntoIter<Element<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn iterates_in_document_order() {
        let els = Elements::from_parts(vec![
            Element::ListBegin(2),
            Element::Bytes("spam".as_bytes()),
            Element::Int(127),
        ]);

        assert_eq!(3, els.len());
        assert_eq!(
            vec![
                &Element::ListBegin(2),
                &Element::Bytes("spam".as_bytes()),
                &Element::Int(127)
            ],
            (&els).into_iter().collect::<Vec<_>>()
        );
        assert_eq!(Some(Element::ListBegin(2)), els.into_iter().next());
    }
}
