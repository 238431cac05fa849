use crate::core;
use crate::evaluator::{self, Result};
use crate::types::{Heap, ObjId, ObjRef, Object};

// The forms whose arguments bypass the generic eager-evaluation pass. The
// evaluator recognizes them by head atom before it touches the argument
// list; nothing downstream ever sees their raw arguments evaluated.

pub(crate) enum Form {
    Quote,
    Cond,
    Lambda,
}

pub(crate) fn recognize(heap: &Heap, head: ObjRef) -> Option<Form> {
    match head.map(|id| heap.get(id)) {
        Some(Object::Atom(name)) => match name.as_ref() {
            "QUOTE" => Some(Form::Quote),
            "COND" => Some(Form::Cond),
            "LAMBDA" => Some(Form::Lambda),
            _ => None,
        },
        _ => None,
    }
}

/// (LAMBDA (params) body) is syntax, not a call: the parameter list and body
/// are captured as-is, unevaluated. No environment is captured with them;
/// free variables in the body resolve wherever the closure is later applied.
pub(crate) fn make_closure(heap: &mut Heap, tail: ObjRef) -> Result {
    let params = heap.car(tail);
    let body = heap.car(heap.cdr(tail));
    Ok(Some(heap.closure(params, body)))
}

/// Route QUOTE's raw argument list through the registered native so arity
/// checking and call tracing stay uniform with the eager builtins.
pub(crate) fn apply_quote(heap: &mut Heap, tail: ObjRef, env: ObjId) -> Result {
    let args = heap.list_elements(tail);
    evaluator::call_native(heap, &core::QUOTE, &args, env)
}

/// Same for COND: the clauses arrive unevaluated, and the native evaluates
/// tests one clause at a time.
pub(crate) fn apply_cond(heap: &mut Heap, tail: ObjRef, env: ObjId) -> Result {
    let clauses = heap.list_elements(tail);
    evaluator::call_native(heap, &core::COND, &clauses, env)
}
