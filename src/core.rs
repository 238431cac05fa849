use crate::evaluator::{self, Error};
use crate::types::{truthy, Arity, Heap, NativeFn, ObjId, ObjRef, Object, Symbol, TypeMismatch};
use crate::{environment, printer};

// The nine builtins, registered into the global environment in this order.
pub(crate) static BUILTINS: [&NativeFn; 9] = [
    &QUOTE, &CAR, &CDR, &CONS, &EQUAL, &ATOM, &COND, &LAMBDA, &LABEL,
];

fn grab_pair(heap: &Heap, obj: ObjRef) -> evaluator::Result<(ObjRef, ObjRef)> {
    match obj.map(|id| heap.get(id)) {
        Some(Object::Pair(car, cdr)) => Ok((*car, *cdr)),
        _ => Err(Error::TypeMismatch(TypeMismatch::NotAPair)),
    }
}

fn grab_name(heap: &Heap, obj: ObjRef) -> evaluator::Result<Symbol> {
    match obj.map(|id| heap.get(id)) {
        Some(Object::Atom(name)) => Ok(name.clone()),
        _ => Err(Error::TypeMismatch(TypeMismatch::NotAnAtom)),
    }
}

pub(crate) static QUOTE: NativeFn = NativeFn {
    name: "QUOTE",
    arity: Arity::exactly(1),
    fn_ptr: quote_,
};

fn quote_(heap: &mut Heap, args: &[ObjRef], _env: ObjId) -> evaluator::Result {
    // A literal () argument arrives as the empty reference; hand back the
    // empty-list value so the result prints as ().
    Ok(args[0].or_else(|| Some(heap.empty_list())))
}

pub(crate) static CAR: NativeFn = NativeFn {
    name: "CAR",
    arity: Arity::exactly(1),
    fn_ptr: car_,
};

fn car_(heap: &mut Heap, args: &[ObjRef], _env: ObjId) -> evaluator::Result {
    let (car, _) = grab_pair(heap, args[0])?;
    Ok(car)
}

pub(crate) static CDR: NativeFn = NativeFn {
    name: "CDR",
    arity: Arity::exactly(1),
    fn_ptr: cdr_,
};

fn cdr_(heap: &mut Heap, args: &[ObjRef], _env: ObjId) -> evaluator::Result {
    let (_, cdr) = grab_pair(heap, args[0])?;
    Ok(cdr)
}

pub(crate) static CONS: NativeFn = NativeFn {
    name: "CONS",
    arity: Arity::exactly(2),
    fn_ptr: cons_,
};

fn cons_(heap: &mut Heap, args: &[ObjRef], _env: ObjId) -> evaluator::Result {
    let mut elements = vec![args[0]];
    // Splice rather than pair up: the result is a proper list whose tail is
    // every element of the second argument. The empty-list value contributes
    // nothing, and a non-list second argument is simply dropped.
    if !heap.is_empty_list(args[1]) {
        elements.extend(heap.list_elements(args[1]));
    }
    Ok(heap.list(&elements))
}

pub(crate) static EQUAL: NativeFn = NativeFn {
    name: "EQUAL",
    arity: Arity::exactly(2),
    fn_ptr: equal_,
};

fn equal_(heap: &mut Heap, args: &[ObjRef], _env: ObjId) -> evaluator::Result {
    let lhs = grab_name(heap, args[0])?;
    let rhs = grab_name(heap, args[1])?;
    Ok(Some(if lhs == rhs {
        heap.truth()
    } else {
        heap.empty_list()
    }))
}

pub(crate) static ATOM: NativeFn = NativeFn {
    name: "ATOM",
    arity: Arity::exactly(1),
    fn_ptr: atom_test_,
};

fn atom_test_(heap: &mut Heap, args: &[ObjRef], _env: ObjId) -> evaluator::Result {
    let is_atom = matches!(args[0].map(|id| heap.get(id)), Some(Object::Atom(_)));
    Ok(Some(if is_atom {
        heap.truth()
    } else {
        heap.empty_list()
    }))
}

pub(crate) static COND: NativeFn = NativeFn {
    name: "COND",
    arity: Arity::at_least(0),
    fn_ptr: cond_,
};

fn cond_(heap: &mut Heap, clauses: &[ObjRef], env: ObjId) -> evaluator::Result {
    // Tests run lazily, one clause at a time in source order. The first test
    // that comes back as anything but the empty list selects its clause; the
    // other consequents are never evaluated.
    for clause in clauses {
        let test = heap.car(*clause);
        let outcome = evaluator::eval(heap, test, env)?;
        if truthy(heap, outcome) {
            let consequent = heap.car(heap.cdr(*clause));
            return evaluator::eval(heap, consequent, env);
        }
    }
    Ok(Some(heap.empty_list()))
}

pub(crate) static LAMBDA: NativeFn = NativeFn {
    name: "LAMBDA",
    arity: Arity::at_least(1),
    fn_ptr: lambda_,
};

/// The application path for a closure that arrives as an ordinary value,
/// head position included. LAMBDA as syntax never gets here; the evaluator
/// intercepts it before evaluating anything.
fn lambda_(heap: &mut Heap, args: &[ObjRef], env: ObjId) -> evaluator::Result {
    let closure = match args[0].map(|id| heap.get(id)) {
        Some(Object::Closure(closure)) => closure.clone(),
        _ => return Err(Error::TypeMismatch(TypeMismatch::NotAClosure)),
    };
    evaluator::apply_closure(heap, &closure, &args[1..], env)
}

pub(crate) static LABEL: NativeFn = NativeFn {
    name: "LABEL",
    arity: Arity::exactly(2),
    fn_ptr: label_,
};

fn label_(heap: &mut Heap, args: &[ObjRef], env: ObjId) -> evaluator::Result {
    let name = grab_name(heap, args[0])?;
    log::debug!("define {} as {}", name, printer::pr_str(heap, args[1]));
    let key = heap.atom(name.as_ref());
    environment::bind(heap, env, key, args[1]);
    Ok(Some(heap.truth()))
}
