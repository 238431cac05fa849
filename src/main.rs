use mclisp::types::Heap;
use mclisp::{cmdline, environment};

fn main() -> Result<(), cmdline::Error> {
    pretty_env_logger::init();
    let mut heap = Heap::new();
    let env = environment::init(&mut heap);
    let args = std::env::args().collect();
    cmdline::launch(args, &mut heap, env)
}
