use crate::types::{Heap, ObjId};
use crate::{evaluator, printer, reader};
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::fs::read_to_string;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Entry point for the binary: a path argument selects batch evaluation of
/// that file, otherwise we drop into the interactive loop.
pub fn launch(args: Vec<String>, heap: &mut Heap, env: ObjId) -> Result<(), Error> {
    match args.get(1) {
        Some(path) => run_file(path, heap, env),
        None => run_repl(heap, env),
    }
}

fn run_file(path: &str, heap: &mut Heap, env: ObjId) -> Result<(), Error> {
    let source = read_to_string(path)?;
    let forms = match reader::read_all(heap, &source) {
        Ok(forms) => forms,
        // There is no way to resynchronize after unbalanced input, so a read
        // error ends the batch.
        Err(e) => {
            eprintln!("{}", report(&format!("read error: {}", e)));
            return Ok(());
        }
    };
    for form in forms {
        match evaluator::eval(heap, form, env) {
            Ok(value) => println!("{}", printer::pr_str(heap, value)),
            // A failed expression is reported; the rest of the file still runs.
            Err(e) => eprintln!("{}", report(&format!("evaluation error: {}", e))),
        }
    }
    Ok(())
}

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("mclisp")?;
    interface.set_prompt("@> ")?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".mclisp_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

fn run_repl(heap: &mut Heap, env: ObjId) -> Result<(), Error> {
    let interface = setup()?;
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                interface.add_history_unique(line.clone());
                process_line(heap, env, &interface, &line);
            }
            Err(e) => {
                writeln!(interface, "{}", report(&format!("io error: {}", e))).ok();
                break;
            }
        }
    }
    save_history(&interface)?;
    Ok(())
}

fn process_line<T: Terminal>(heap: &mut Heap, env: ObjId, interface: &Interface<T>, line: &str) {
    let forms = match reader::read_all(heap, line) {
        Ok(forms) => forms,
        Err(e) => {
            writeln!(interface, "{}", report(&format!("read error: {}", e))).ok();
            return;
        }
    };
    for form in forms {
        match evaluator::eval(heap, form, env) {
            Ok(value) => {
                writeln!(interface, "{}", printer::pr_str(heap, value)).ok();
            }
            // Report and carry on with the next form; nothing here is fatal.
            Err(e) => {
                writeln!(interface, "{}", report(&format!("evaluation error: {}", e))).ok();
            }
        }
    }
}

fn report(message: &str) -> String {
    if atty::is(atty::Stream::Stderr) {
        Red.paint(message).to_string()
    } else {
        String::from(message)
    }
}
