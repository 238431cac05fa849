use crate::types::{Heap, ObjId, ObjRef};
use crate::{environment, evaluator, printer, reader};
use std::fmt;

pub type Result<T = ObjRef> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "read error: {}", e),
            Error::Eval(e) => write!(f, "evaluation error: {}", e),
        }
    }
}

// The four entry points the driver loop composes.

pub fn read(heap: &mut Heap, input: &str) -> Result {
    reader::read_str(heap, input).map_err(Error::Read)
}

pub fn eval(heap: &mut Heap, expr: ObjRef, env: ObjId) -> Result {
    evaluator::eval(heap, expr, env).map_err(Error::Eval)
}

pub fn print(heap: &Heap, obj: ObjRef) -> String {
    printer::pr_str(heap, obj)
}

pub fn init_env(heap: &mut Heap) -> ObjId {
    environment::init(heap)
}

/// Read, evaluate and print every form in one chunk of input, failing on the
/// first error. The interactive driver reports errors per-form instead; this
/// is the convenient all-or-nothing shape for embedding and tests.
pub fn rep(heap: &mut Heap, input: &str, env: ObjId) -> Result<Vec<String>> {
    let forms = reader::read_all(heap, input).map_err(Error::Read)?;
    let mut printed = Vec::with_capacity(forms.len());
    for form in forms {
        let value = evaluator::eval(heap, form, env).map_err(Error::Eval)?;
        printed.push(printer::pr_str(heap, value));
    }
    Ok(printed)
}
