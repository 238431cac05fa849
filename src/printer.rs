use crate::types::{Heap, ObjRef, Object};
use itertools::Itertools;

/// Render an object tree back to text. Pairs print as parenthesized,
/// space-separated elements; atoms print their name; a closure prints as a
/// `#` marker followed by its parameter list and body. A native function has
/// no readable form, so it prints the literal marker `error`, and the empty
/// reference prints nothing at all.
pub fn pr_str(heap: &Heap, obj: ObjRef) -> String {
    let id = match obj {
        Some(id) => id,
        None => return String::new(),
    };
    match heap.get(id) {
        Object::Atom(name) => String::from(name.as_ref()),
        Object::Pair(_, _) => {
            let elements = heap.list_elements(obj);
            format!(
                "({})",
                elements.iter().map(|element| pr_str(heap, *element)).join(" ")
            )
        }
        Object::Closure(closure) => format!(
            "#{}{}",
            pr_str(heap, closure.params),
            pr_str(heap, closure.body)
        ),
        Object::Native(_) => String::from("error"),
    }
}
