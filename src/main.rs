use std::env;
use std::fs;
use std::io;
use std::process::ExitCode;

mod ast;
mod eval;
mod lexer;
mod object;
mod parser;
mod repl;
mod token;

use crate::lexer::Lexer;
use crate::object::{Environment, Object};
use crate::parser::Parser;

fn main() -> ExitCode {
    match env::args().nth(1) {
        Some(path) => run_file(&path),
        None => {
            println!("Hello! This is the Ivy programming language!");
            println!("Feel free to type in commands");
            let stdin = io::stdin();
            let stdout = io::stdout();
            match repl::start(stdin.lock(), stdout.lock()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{}", err);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn run_file(path: &str) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            return ExitCode::FAILURE;
        }
    };

    let mut parser = Parser::new(Lexer::new(&source));
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        eprintln!("parser errors:");
        for error in parser.errors() {
            eprintln!("\t{}", error);
        }
        return ExitCode::FAILURE;
    }

    let env = Environment::new();
    match eval::eval(&program, &env) {
        err @ Object::Error(_) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Object::Null => ExitCode::SUCCESS,
        value => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
    }
}
