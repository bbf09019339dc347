use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use astgen::define_ast;
use astgen::generators::CppGenerator;

/// Generates the C++ declarations of the Lox expression tree
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to store generated files
    #[arg(long, default_value = "generated")]
    dir: PathBuf,
}

const BASE_NAME: &str = "Expr";

const EXPR_TYPES: &[&str] = &[
    "Binary   : std::shared_ptr<Expr> left, Token op, std::shared_ptr<Expr> right",
    "Grouping : std::shared_ptr<Expr> expression",
    "Literal  : std::variant<double,std::string,std::monostate> value",
    "Unary    : Token op, std::shared_ptr<Expr> right",
];

fn main() -> ExitCode {
    let args = Args::parse();

    match define_ast(&args.dir, BASE_NAME, EXPR_TYPES, &CppGenerator::new()) {
        Ok(paths) => {
            for path in paths {
                println!("wrote {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
