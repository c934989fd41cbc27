use std::{
    env,
    io::{self, Read},
    process,
};

use brisk::{display_error, Config, Interpreter};

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut interpreter = Interpreter::new(Config::default());

    let result = match args.get(1) {
        Some(path) => interpreter.run_file(path),
        None => {
            let mut source = String::new();
            if let Err(error) = io::stdin().read_to_string(&mut source) {
                eprintln!("could not read standard input: {}", error);
                process::exit(1);
            }
            interpreter.run("<stdin>", &source)
        }
    };

    if let Err(error) = result {
        display_error(&error);
        process::exit(1);
    }
}
