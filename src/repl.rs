use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::ast;
use crate::eval;
use crate::lexer::Lexer;
use crate::object::Environment;
use crate::parser::Parser;

const PROMPT: &str = ">> ";

/// Line-at-a-time shell. All lines of a session share one root
/// environment, so bindings accumulate across inputs.
pub fn start(input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    let env = Environment::new();

    write!(output, "{}", PROMPT)?;
    output.flush()?;
    for line in input.lines() {
        run_line(&line?, &env, &mut output)?;
        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }
    Ok(())
}

fn run_line(
    line: &str,
    env: &Rc<RefCell<Environment>>,
    output: &mut impl Write,
) -> io::Result<()> {
    let mut parser = Parser::new(Lexer::new(line));
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        writeln!(output, "parser errors:")?;
        for error in parser.errors() {
            writeln!(output, "\t{}", error)?;
        }
        return Ok(());
    }

    let result = eval::eval(&program, env);
    // a trailing let yields nothing worth echoing, unless it failed
    let ends_in_let = matches!(program.statements.last(), Some(ast::Statement::Let(_)));
    if ends_in_let && !result.is_error() {
        return Ok(());
    }
    writeln!(output, "{}", result)
}
