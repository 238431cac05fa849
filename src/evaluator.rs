use crate::special_forms::Form;
use crate::types::{
    Arity, BadArgCount, Closure, Heap, NativeFn, ObjId, ObjRef, Object, Symbol, TypeMismatch,
};
use crate::{environment, printer, special_forms, types};
use itertools::Itertools;
use std::fmt;

pub type Result<T = ObjRef> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    TypeMismatch(types::TypeMismatch),
    BadArgCount(types::BadArgCount),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch(e) => write!(f, "type mismatch: {:?}", e),
            Error::BadArgCount(e) => write!(f, "{}", e),
        }
    }
}

impl From<TypeMismatch> for Error {
    fn from(e: TypeMismatch) -> Self {
        Self::TypeMismatch(e)
    }
}

impl From<BadArgCount> for Error {
    fn from(e: BadArgCount) -> Self {
        Self::BadArgCount(e)
    }
}

pub fn eval(heap: &mut Heap, expr: ObjRef, env: ObjId) -> Result {
    let id = match expr {
        // The empty reference evaluates to the empty-list value.
        None => return Ok(Some(heap.empty_list())),
        Some(id) => id,
    };
    let (head, tail) = match heap.get(id) {
        Object::Atom(name) => {
            // Unbound atoms stand for themselves. This is how the truth atom
            // and builtin names written literally in source resolve without
            // any explicit binding check.
            let found = environment::lookup(heap, env, name.as_ref());
            return Ok(found.unwrap_or(expr));
        }
        Object::Pair(car, cdr) => (*car, *cdr),
        // Natives and closures reached as data stand for themselves too.
        _ => return Ok(expr),
    };
    // Special forms see their arguments raw; everything else goes through
    // the eager evaluate-then-apply path.
    match special_forms::recognize(heap, head) {
        Some(Form::Lambda) => return special_forms::make_closure(heap, tail),
        Some(Form::Quote) => return special_forms::apply_quote(heap, tail, env),
        Some(Form::Cond) => return special_forms::apply_cond(heap, tail, env),
        None => {}
    }
    let elements = heap.list_elements(expr);
    let mut evaluated = Vec::with_capacity(elements.len());
    for element in elements {
        evaluated.push(eval(heap, element, env)?);
    }
    apply(heap, &evaluated, env)
}

fn apply(heap: &mut Heap, evaluated: &[ObjRef], env: ObjId) -> Result {
    let (callable, args) = match evaluated.split_first() {
        Some(split) => split,
        None => return Ok(Some(heap.empty_list())),
    };
    match callable.map(|id| heap.get(id)) {
        Some(Object::Closure(closure)) => {
            let closure = closure.clone();
            apply_closure(heap, &closure, args, env)
        }
        Some(Object::Native(func)) => {
            let func = *func;
            call_native(heap, func, args, env)
        }
        // A head that is not callable quotes the whole application: hand the
        // constructed list back unevaluated.
        _ => Ok(heap.list(evaluated)),
    }
}

pub(crate) fn call_native(
    heap: &mut Heap,
    func: &'static NativeFn,
    args: &[ObjRef],
    env: ObjId,
) -> Result {
    func.arity
        .validate_for(args.len(), func.name)
        .map_err(Error::BadArgCount)?;
    log::trace!("call {} with {}", func.name, pretty_print_args(heap, args));
    let result = (func.fn_ptr)(heap, args, env);
    match &result {
        Ok(value) => log::trace!(
            "call to {} resulted in {}",
            func.name,
            printer::pr_str(heap, *value)
        ),
        Err(e) => log::trace!("call to {} failed: {}", func.name, e),
    }
    result
}

/// Apply a closure by substitution, not by extending an environment: pair
/// each formal with its evaluated argument, rewrite the body with every
/// matching atom leaf replaced, then evaluate the rewritten body in the
/// *calling* environment. Free variables in the body therefore resolve
/// against whatever the call site has bound, not the definition site.
pub(crate) fn apply_closure(
    heap: &mut Heap,
    closure: &Closure,
    args: &[ObjRef],
    env: ObjId,
) -> Result {
    let formals = heap.list_elements(closure.params);
    Arity::exactly(formals.len())
        .validate_for(args.len(), "closure")
        .map_err(Error::BadArgCount)?;
    log::trace!(
        "apply closure #{} to {}",
        printer::pr_str(heap, closure.params),
        pretty_print_args(heap, args)
    );
    let bindings = interleave(heap, &formals, args)?;
    let body = substitute(heap, closure.body, &bindings);
    eval(heap, body, env)
}

// Pair formals with arguments, in order. Substitution takes the first match,
// so a duplicated formal behaves like the environment's head-first lookup.
fn interleave(
    heap: &Heap,
    formals: &[ObjRef],
    args: &[ObjRef],
) -> Result<Vec<(Symbol, ObjRef)>> {
    formals
        .iter()
        .zip(args)
        .map(|(formal, arg)| match formal.map(|id| heap.get(id)) {
            Some(Object::Atom(name)) => Ok((name.clone(), *arg)),
            _ => Err(Error::TypeMismatch(TypeMismatch::NotAnAtom)),
        })
        .collect()
}

// Rebuild the expression with each matching atom leaf swapped for its paired
// value. The list spine is fresh; replacement values and untouched leaves
// are shared with the original structure.
fn substitute(heap: &mut Heap, expr: ObjRef, bindings: &[(Symbol, ObjRef)]) -> ObjRef {
    let id = match expr {
        Some(id) => id,
        None => return None,
    };
    match heap.get(id) {
        Object::Atom(name) => {
            for (formal, value) in bindings {
                if formal == name {
                    return *value;
                }
            }
            return expr;
        }
        Object::Pair(_, _) => {}
        _ => return expr,
    }
    let elements = heap.list_elements(expr);
    let replaced: Vec<ObjRef> = elements
        .into_iter()
        .map(|element| substitute(heap, element, bindings))
        .collect();
    heap.list(&replaced)
}

fn pretty_print_args(heap: &Heap, args: &[ObjRef]) -> String {
    match args.len() {
        0 => String::from("no args"),
        _ => args.iter().map(|arg| printer::pr_str(heap, *arg)).join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader;

    fn setup() -> (Heap, ObjId) {
        let mut heap = Heap::new();
        let env = environment::init(&mut heap);
        (heap, env)
    }

    fn eval_to_string(heap: &mut Heap, env: ObjId, src: &str) -> String {
        let form = reader::read_str(heap, src).expect("read failed");
        let value = eval(heap, form, env).expect("eval failed");
        printer::pr_str(heap, value)
    }

    #[test]
    fn empty_expression_evaluates_to_the_empty_list() {
        let (mut heap, env) = setup();
        assert_eq!(eval_to_string(&mut heap, env, "()"), "()");
    }

    #[test]
    fn unbound_atoms_evaluate_to_themselves() {
        let (mut heap, env) = setup();
        assert_eq!(eval_to_string(&mut heap, env, "SOMETHING"), "SOMETHING");
    }

    #[test]
    fn bound_atoms_resolve_through_the_environment() {
        let (mut heap, env) = setup();
        eval_to_string(&mut heap, env, "(LABEL X A)");
        assert_eq!(eval_to_string(&mut heap, env, "X"), "A");
    }

    #[test]
    fn non_callable_head_quotes_the_application() {
        let (mut heap, env) = setup();
        assert_eq!(eval_to_string(&mut heap, env, "(A B)"), "(A B)");
        assert_eq!(eval_to_string(&mut heap, env, "(A (B C))"), "(A (B C))");
    }

    #[test]
    fn lambda_builds_a_closure_without_evaluating_anything() {
        let (mut heap, env) = setup();
        assert_eq!(
            eval_to_string(&mut heap, env, "(LAMBDA (X) (CONS X (B)))"),
            "#(X)(CONS X (B))"
        );
    }

    #[test]
    fn lambda_application_substitutes_arguments() {
        let (mut heap, env) = setup();
        assert_eq!(
            eval_to_string(&mut heap, env, "((LAMBDA (X) (CONS X (B))) A)"),
            "(A B)"
        );
    }

    #[test]
    fn substitution_reaches_nested_lists() {
        let (mut heap, env) = setup();
        assert_eq!(
            eval_to_string(&mut heap, env, "((LAMBDA (X Y) (CONS X (CONS Y (QUOTE ())))) A B)"),
            "(A B)"
        );
    }

    #[test]
    fn free_variables_resolve_at_the_call_site() {
        let (mut heap, env) = setup();
        eval_to_string(&mut heap, env, "(LABEL F (LAMBDA (X) (EQUAL X Y)))");
        // Y is free in the body: unbound it stands for itself...
        assert_eq!(eval_to_string(&mut heap, env, "(F A)"), "()");
        // ...and once the *caller's* environment binds it, the same closure
        // sees the new value. No environment was captured at definition.
        eval_to_string(&mut heap, env, "(LABEL Y A)");
        assert_eq!(eval_to_string(&mut heap, env, "(F A)"), "#T");
    }

    #[test]
    fn closures_can_be_passed_as_arguments() {
        let (mut heap, env) = setup();
        assert_eq!(
            eval_to_string(&mut heap, env, "((LAMBDA (F) (F (QUOTE (A B)))) CAR)"),
            "A"
        );
    }

    #[test]
    fn labelled_closures_apply_like_lambdas() {
        let (mut heap, env) = setup();
        eval_to_string(&mut heap, env, "(LABEL SECOND (LAMBDA (L) (CAR (CDR L))))");
        assert_eq!(
            eval_to_string(&mut heap, env, "(SECOND (QUOTE (A B C)))"),
            "B"
        );
    }

    #[test]
    fn cond_selects_the_first_matching_clause() {
        let (mut heap, env) = setup();
        assert_eq!(
            eval_to_string(
                &mut heap,
                env,
                "(COND ((EQUAL A B) FIRST) ((EQUAL A A) SECOND) ((EQUAL B B) THIRD))"
            ),
            "SECOND"
        );
    }

    #[test]
    fn cond_without_a_match_is_the_empty_list() {
        let (mut heap, env) = setup();
        assert_eq!(
            eval_to_string(&mut heap, env, "(COND ((EQUAL A B) FIRST))"),
            "()"
        );
        assert_eq!(eval_to_string(&mut heap, env, "(COND)"), "()");
    }

    #[test]
    fn cond_never_touches_unselected_clauses() {
        let (mut heap, env) = setup();
        eval_to_string(
            &mut heap,
            env,
            "(COND ((EQUAL A A) HIT) ((LABEL LEAK1 A) (LABEL LEAK2 A)))"
        );
        // Neither the later test nor any consequent ran: no bindings leaked.
        assert_eq!(eval_to_string(&mut heap, env, "LEAK1"), "LEAK1");
        assert_eq!(eval_to_string(&mut heap, env, "LEAK2"), "LEAK2");
    }

    #[test]
    fn closure_arity_is_checked() {
        let (mut heap, env) = setup();
        let form = reader::read_str(&mut heap, "((LAMBDA (X Y) (CONS X (Y))) A)").unwrap();
        assert!(matches!(
            eval(&mut heap, form, env),
            Err(Error::BadArgCount(_))
        ));
    }
}
