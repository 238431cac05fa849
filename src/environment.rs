use crate::core;
use crate::types::{Heap, NativeFn, ObjId, ObjRef, Object};

// The environment is ordinary list structure on the heap: a list of entries,
// each entry a two-element list (name value). LABEL appends, nothing ever
// removes, and lookup scans from the head, so the oldest binding of a name
// always wins.

/// Build the global environment with every builtin registered in source
/// order, QUOTE first.
pub fn init(heap: &mut Heap) -> ObjId {
    let seed = register(heap, core::BUILTINS[0]);
    let env = heap.pair(Some(seed), None);
    for func in core::BUILTINS[1..].iter().copied() {
        let entry = register(heap, func);
        heap.append(env, Some(entry));
    }
    env
}

fn register(heap: &mut Heap, func: &'static NativeFn) -> ObjId {
    let name = heap.atom(func.name);
    let value = heap.native(func);
    entry(heap, name, Some(value))
}

fn entry(heap: &mut Heap, name: ObjId, value: ObjRef) -> ObjId {
    let tail = heap.pair(value, None);
    heap.pair(Some(name), Some(tail))
}

/// Append a binding unconditionally. Existing bindings of the same name are
/// neither checked nor overwritten; they simply keep shadowing this one.
pub fn bind(heap: &mut Heap, env: ObjId, name: ObjId, value: ObjRef) {
    let entry = entry(heap, name, value);
    heap.append(env, Some(entry));
}

/// Head-first scan for the first entry whose name matches textually.
/// `None` means unbound, which the evaluator treats as self-evaluation
/// rather than an error.
pub fn lookup(heap: &Heap, env: ObjId, name: &str) -> Option<ObjRef> {
    let mut current = Some(env);
    while let Some(id) = current {
        let (entry, next) = match heap.get(id) {
            Object::Pair(car, cdr) => (*car, *cdr),
            _ => break,
        };
        let key = heap.car(entry);
        if let Some(Object::Atom(sym)) = key.map(|k| heap.get(k)) {
            if sym.as_ref() == name {
                return Some(heap.car(heap.cdr(entry)));
            }
        }
        current = next;
    }
    None
}
