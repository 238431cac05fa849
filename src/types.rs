use crate::evaluator;
use derive_more::Deref;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};

/// An atom's name. Compared by value, never by identity: two atoms with the
/// same spelling are the same symbol as far as the language is concerned.
#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to an object owned by a [`Heap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjId(usize);

/// A possibly-empty reference between objects. `None` is the empty reference:
/// it terminates every well-formed list and is distinct from the empty-list
/// *value*, which is a pair whose car and cdr are both empty.
pub type ObjRef = Option<ObjId>;

#[derive(Debug, Clone)]
pub struct Closure {
    pub params: ObjRef,
    pub body: ObjRef,
}

#[derive(Debug)]
pub enum Object {
    Atom(Symbol),
    Pair(ObjRef, ObjRef),
    Native(&'static NativeFn),
    Closure(Closure),
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: &'static str,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "When evaluating {} expected {} arguments, but received {} arguments",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

pub struct NativeFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&mut Heap, &[ObjRef], ObjId) -> evaluator::Result,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native function #<{}>", self.name)
    }
}

#[derive(Debug)]
pub enum TypeMismatch {
    NotAnAtom,
    NotAPair,
    NotAClosure,
}

/// Arena owning every object for the life of the process. References between
/// objects are plain indices, so structure can be shared freely: the
/// environment list and evaluated argument lists alias the same atoms and
/// pairs without any bookkeeping. Nothing is ever released.
pub struct Heap {
    cells: Vec<Object>,
    truth: ObjId,
    empty: ObjId,
}

impl Heap {
    /// Create a heap holding the two distinguished singletons: the truth atom
    /// `#T` and the empty-list value. Everything else refers back to these
    /// rather than recreating them.
    pub fn new() -> Self {
        let mut heap = Heap {
            cells: Vec::new(),
            truth: ObjId(0),
            empty: ObjId(0),
        };
        heap.truth = heap.atom("#T");
        heap.empty = heap.pair(None, None);
        heap
    }

    fn alloc(&mut self, object: Object) -> ObjId {
        let id = ObjId(self.cells.len());
        self.cells.push(object);
        id
    }

    pub fn atom(&mut self, name: &str) -> ObjId {
        self.alloc(Object::Atom(Symbol(String::from(name))))
    }

    pub fn pair(&mut self, car: ObjRef, cdr: ObjRef) -> ObjId {
        self.alloc(Object::Pair(car, cdr))
    }

    pub fn native(&mut self, func: &'static NativeFn) -> ObjId {
        self.alloc(Object::Native(func))
    }

    pub fn closure(&mut self, params: ObjRef, body: ObjRef) -> ObjId {
        self.alloc(Object::Closure(Closure { params, body }))
    }

    pub fn get(&self, id: ObjId) -> &Object {
        &self.cells[id.0]
    }

    pub fn truth(&self) -> ObjId {
        self.truth
    }

    pub fn empty_list(&self) -> ObjId {
        self.empty
    }

    pub fn car(&self, obj: ObjRef) -> ObjRef {
        match obj.map(|id| self.get(id)) {
            Some(Object::Pair(car, _)) => *car,
            _ => None,
        }
    }

    pub fn cdr(&self, obj: ObjRef) -> ObjRef {
        match obj.map(|id| self.get(id)) {
            Some(Object::Pair(_, cdr)) => *cdr,
            _ => None,
        }
    }

    /// Extend a list in place: walk to its last pair and rewrite that pair's
    /// cdr to a fresh trailing pair. This is the only mutation objects ever
    /// see; once a list is fully built it is treated as immutable.
    pub fn append(&mut self, list: ObjId, item: ObjRef) {
        let mut last = list;
        while let Object::Pair(_, Some(next)) = self.get(last) {
            last = *next;
        }
        let tail = self.pair(item, None);
        if let Object::Pair(_, cdr) = &mut self.cells[last.0] {
            *cdr = Some(tail);
        }
    }

    /// Build a right-leaning pair chain from the given elements. An empty
    /// slice yields the empty reference.
    pub fn list(&mut self, elements: &[ObjRef]) -> ObjRef {
        let mut head = None;
        for element in elements.iter().rev() {
            head = Some(self.pair(*element, head));
        }
        head
    }

    /// Collect the car of every pair along a list's spine. A non-pair cdr
    /// encountered mid-walk ends the list.
    pub fn list_elements(&self, list: ObjRef) -> Vec<ObjRef> {
        let mut elements = Vec::new();
        let mut current = list;
        while let Some(id) = current {
            match self.get(id) {
                Object::Pair(car, cdr) => {
                    elements.push(*car);
                    current = *cdr;
                }
                _ => break,
            }
        }
        elements
    }

    pub fn is_empty_list(&self, obj: ObjRef) -> bool {
        matches!(obj.map(|id| self.get(id)), Some(Object::Pair(None, None)))
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

/// Only the empty-list value is false. The empty reference never reaches a
/// truth test under the evaluator's normal flow, and if it does it counts as
/// true.
pub(crate) fn truthy(heap: &Heap, obj: ObjRef) -> bool {
    !heap.is_empty_list(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_exist_once() {
        let heap = Heap::new();
        match heap.get(heap.truth()) {
            Object::Atom(name) => assert_eq!(name.as_ref(), "#T"),
            other => panic!("truth singleton is {:?}", other),
        }
        assert!(heap.is_empty_list(Some(heap.empty_list())));
    }

    #[test]
    fn list_builds_right_nested_chain() {
        let mut heap = Heap::new();
        let a = Some(heap.atom("A"));
        let b = Some(heap.atom("B"));
        let c = Some(heap.atom("C"));
        let list = heap.list(&[a, b, c]);
        assert_eq!(heap.list_elements(list), vec![a, b, c]);
        assert_eq!(heap.car(list), a);
        assert_eq!(heap.car(heap.cdr(list)), b);
    }

    #[test]
    fn empty_slice_builds_empty_reference() {
        let mut heap = Heap::new();
        assert_eq!(heap.list(&[]), None);
    }

    #[test]
    fn append_rewrites_final_cdr() {
        let mut heap = Heap::new();
        let a = Some(heap.atom("A"));
        let b = Some(heap.atom("B"));
        let list = heap.list(&[a]).unwrap();
        heap.append(list, b);
        assert_eq!(heap.list_elements(Some(list)), vec![a, b]);
    }

    #[test]
    fn traversal_ends_at_non_pair_cdr() {
        let mut heap = Heap::new();
        let a = Some(heap.atom("A"));
        let b = heap.atom("B");
        let improper = Some(heap.pair(a, Some(b)));
        assert_eq!(heap.list_elements(improper), vec![a]);
    }

    #[test]
    fn truthiness_rejects_only_the_empty_list() {
        let mut heap = Heap::new();
        let truth = Some(heap.truth());
        let empty = Some(heap.empty_list());
        let atom = Some(heap.atom("A"));
        assert!(truthy(&heap, truth));
        assert!(truthy(&heap, atom));
        assert!(truthy(&heap, None));
        assert!(!truthy(&heap, empty));
    }

    #[test]
    fn arity_validation() {
        assert!(Arity::exactly(2).validate_for(2, "CONS").is_ok());
        let err = Arity::exactly(2).validate_for(1, "CONS").unwrap_err();
        assert_eq!(
            err.to_string(),
            "When evaluating CONS expected exactly 2 arguments, but received 1 arguments"
        );
        assert!(Arity::at_least(1).contains(5));
        assert!(!Arity::at_least(1).contains(0));
    }
}
