mod cmd;

use std::env;
use std::process;

use lessify::Pager;

use cmd::cli;

fn main() {
    let args = match cli::Args::build_from_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("fatal: {err}.");
            println!("Try '{bin} -h' for help.", bin = env!("CARGO_BIN_NAME"));
            process::exit(1);
        }
    };

    if args.long_help {
        long_help();
    } else if args.short_help {
        short_help();
    } else if args.version {
        version();
    } else if let (Some(output_path), Some(input_path)) = (&args.output_path, &args.input_path) {
        if let Err(code) = cmd::build(output_path, input_path) {
            process::exit(code);
        }
    } else {
        eprintln!("fatal: missing <output_path> and/or <input_path>.");
        short_help();
        process::exit(1);
    }
}

fn short_help() {
    println!("{}", short_help_message());
    println!(
        "For full help, see `{bin} --help`.",
        bin = env!("CARGO_BIN_NAME")
    );
}

fn short_help_message() -> String {
    format!(
        "\
{description}

Usage: {bin} [<options>] <output_path> <input_path>

Options:
  -h, --help             Show this message and exit
  -V, --version          Show the version and exit
",
        description = env!("CARGO_PKG_DESCRIPTION"),
        bin = env!("CARGO_BIN_NAME"),
    )
}

fn long_help() {
    Pager::page_or_print(&format!(
        "\
{help}
What does {bin} do?
  Compiles a Brainfuck source file at <input_path> straight to a
  freestanding 32-bit Linux/i386 ELF executable at <output_path>,
  with no intermediate assembly or object file. The produced binary
  needs nothing at run time but the kernel: no libc, no dynamic
  linker, no interpreter.

Exit codes:
  0  success
  1  bad usage
  2  <input_path> could not be read
  3  <input_path> failed to compile (unbalanced brackets, or more
     than 100 nested loops)
  4  <output_path> could not be written
",
        help = short_help_message(),
        bin = env!("CARGO_BIN_NAME"),
    ));
}

fn version() {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
}
