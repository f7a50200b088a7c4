use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::ast;
use crate::object::{BuiltinFn, Environment, Function, HashPair, Object};

type Env = Rc<RefCell<Environment>>;

/// Evaluates a whole program against the given root environment.
///
/// A `return` at the top level ends the program with the returned value;
/// an error ends it with that error as the visible result.
pub fn eval(program: &ast::Program, env: &Env) -> Object {
    let mut result = Object::Null;
    for statement in &program.statements {
        match eval_statement(statement, env) {
            Object::ReturnValue(value) => return *value,
            err @ Object::Error(_) => return err,
            other => result = other,
        }
    }
    result
}

fn eval_statement(statement: &ast::Statement, env: &Env) -> Object {
    match statement {
        ast::Statement::Let(stmt) => {
            let value = eval_expression(&stmt.value, env);
            if value.is_error() {
                return value;
            }
            env.borrow_mut().set(stmt.name.name.clone(), value);
            Object::Null
        }
        ast::Statement::Return(stmt) => {
            let value = eval_expression(&stmt.value, env);
            if value.is_error() {
                return value;
            }
            Object::ReturnValue(Box::new(value))
        }
        ast::Statement::Expression(expression) => eval_expression(expression, env),
    }
}

// A return or an error halts the block. The return is unwrapped here, so
// callers always see a plain value; errors pass through untouched and keep
// propagating.
fn eval_block(block: &ast::BlockStatement, env: &Env) -> Object {
    let mut result = Object::Null;
    for statement in &block.statements {
        match eval_statement(statement, env) {
            Object::ReturnValue(value) => return *value,
            err @ Object::Error(_) => return err,
            other => result = other,
        }
    }
    result
}

fn eval_expression(expression: &ast::Expression, env: &Env) -> Object {
    match expression {
        ast::Expression::IntegerLiteral(lit) => Object::Integer(lit.value),
        ast::Expression::StringLiteral(lit) => Object::String(lit.value.clone()),
        ast::Expression::BooleanLiteral(lit) => Object::Boolean(lit.value),
        ast::Expression::Identifier(ident) => eval_identifier(ident, env),
        ast::Expression::Prefix(expr) => {
            let right = eval_expression(&expr.right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(&expr.operator, right)
        }
        ast::Expression::Infix(expr) => {
            let left = eval_expression(&expr.left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(&expr.right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(&expr.operator, left, right)
        }
        ast::Expression::If(expr) => eval_if_expression(expr, env),
        ast::Expression::FunctionLiteral(lit) => Object::Function(Rc::new(Function {
            parameters: lit.parameters.clone(),
            body: Rc::clone(&lit.body),
            env: Rc::clone(env),
        })),
        ast::Expression::Call(expr) => {
            let function = eval_expression(&expr.function, env);
            if function.is_error() {
                return function;
            }
            match eval_expressions(&expr.arguments, env) {
                Ok(arguments) => apply_function(function, arguments),
                Err(err) => err,
            }
        }
        ast::Expression::ArrayLiteral(lit) => match eval_expressions(&lit.elements, env) {
            Ok(elements) => Object::Array(Rc::new(elements)),
            Err(err) => err,
        },
        ast::Expression::Index(expr) => {
            let left = eval_expression(&expr.left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(&expr.index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(left, index)
        }
        ast::Expression::HashLiteral(lit) => eval_hash_literal(lit, env),
    }
}

/// Left-to-right evaluation, short-circuiting on the first error.
fn eval_expressions(
    expressions: &[ast::Expression],
    env: &Env,
) -> Result<Vec<Object>, Object> {
    let mut results = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let evaluated = eval_expression(expression, env);
        if evaluated.is_error() {
            return Err(evaluated);
        }
        results.push(evaluated);
    }
    Ok(results)
}

fn eval_prefix_expression(operator: &str, right: Object) -> Object {
    match operator {
        "!" => Object::Boolean(!right.is_truthy()),
        "-" => match right {
            Object::Integer(value) => Object::Integer(value.wrapping_neg()),
            other => Object::Error(format!("unknown operator: -{}", other.type_name())),
        },
        _ => Object::Error(format!(
            "unknown operator: {}{}",
            operator,
            right.type_name()
        )),
    }
}

fn eval_infix_expression(operator: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::String(l), Object::String(r)) => {
            eval_string_infix_expression(operator, l, r)
        }
        (Object::Integer(l), Object::Integer(r)) => {
            eval_integer_infix_expression(operator, *l, *r)
        }
        _ => match operator {
            "==" => Object::Boolean(same_identity(&left, &right)),
            "!=" => Object::Boolean(!same_identity(&left, &right)),
            _ if left.type_name() != right.type_name() => Object::Error(format!(
                "type mismatch: {} {} {}",
                left.type_name(),
                operator,
                right.type_name()
            )),
            _ => Object::Error(format!(
                "unknown operator: {} {} {}",
                left.type_name(),
                operator,
                right.type_name()
            )),
        },
    }
}

// Equality outside the string/integer fast paths is identity: the
// boolean/null singletons compare by value, containers and functions by
// allocation. Two separately built arrays are never `==`-equal.
fn same_identity(left: &Object, right: &Object) -> bool {
    match (left, right) {
        (Object::Boolean(l), Object::Boolean(r)) => l == r,
        (Object::Null, Object::Null) => true,
        (Object::Array(l), Object::Array(r)) => Rc::ptr_eq(l, r),
        (Object::Hash(l), Object::Hash(r)) => Rc::ptr_eq(l, r),
        (Object::Function(l), Object::Function(r)) => Rc::ptr_eq(l, r),
        (Object::Builtin(l), Object::Builtin(r)) => std::ptr::eq(*l as *const (), *r as *const ()),
        _ => false,
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left.wrapping_add(right)),
        "-" => Object::Integer(left.wrapping_sub(right)),
        "*" => Object::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                Object::Error("division by zero".to_string())
            } else {
                Object::Integer(left.wrapping_div(right))
            }
        }
        "<" => Object::Boolean(left < right),
        ">" => Object::Boolean(left > right),
        "==" => Object::Boolean(left == right),
        "!=" => Object::Boolean(left != right),
        _ => Object::Error(format!("unknown operator: INTEGER {} INTEGER", operator)),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Object {
    if operator != "+" {
        return Object::Error(format!("unknown operator: STRING {} STRING", operator));
    }
    Object::String(format!("{}{}", left, right))
}

fn eval_if_expression(expression: &ast::IfExpression, env: &Env) -> Object {
    let condition = eval_expression(&expression.condition, env);
    if condition.is_error() {
        return condition;
    }
    if condition.is_truthy() {
        eval_block(&expression.consequence, env)
    } else if let Some(alternative) = &expression.alternative {
        eval_block(alternative, env)
    } else {
        Object::Null
    }
}

fn eval_identifier(identifier: &ast::Identifier, env: &Env) -> Object {
    if let Some(value) = env.borrow().get(&identifier.name) {
        return value;
    }
    if let Some(builtin) = lookup_builtin(&identifier.name) {
        return builtin;
    }
    Object::Error(format!("identifier not found: {}", identifier.name))
}

fn apply_function(function: Object, arguments: Vec<Object>) -> Object {
    match function {
        Object::Function(function) => {
            if arguments.len() != function.parameters.len() {
                return Object::Error(format!(
                    "wrong number of arguments: want={}, got={}",
                    function.parameters.len(),
                    arguments.len()
                ));
            }
            // the call frame encloses the *captured* environment, which is
            // what makes closures lexically scoped
            let call_env = Environment::new_enclosed(&function.env);
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                call_env.borrow_mut().set(parameter.name.clone(), argument);
            }
            // eval_block has already unwrapped any return value
            eval_block(&function.body, &call_env)
        }
        Object::Builtin(function) => function(arguments),
        other => Object::Error(format!("not a function: {}", other.type_name())),
    }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(idx)) => {
            let max = elements.len() as i64 - 1;
            if *idx < 0 || *idx > max {
                Object::Null
            } else {
                elements[*idx as usize].clone()
            }
        }
        (Object::Hash(pairs), _) => match index.hash_key() {
            Some(key) => pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Object::Null),
            None => Object::Error(format!("unusable as hash key: {}", index.type_name())),
        },
        _ => Object::Error(format!(
            "index operator not supported: {}",
            left.type_name()
        )),
    }
}

fn eval_hash_literal(literal: &ast::HashLiteral, env: &Env) -> Object {
    let mut pairs = FxHashMap::default();
    for (key_expression, value_expression) in &literal.pairs {
        let key = eval_expression(key_expression, env);
        if key.is_error() {
            return key;
        }
        let hash_key = match key.hash_key() {
            Some(hash_key) => hash_key,
            None => {
                return Object::Error(format!("unusable as hash key: {}", key.type_name()))
            }
        };
        let value = eval_expression(value_expression, env);
        if value.is_error() {
            return value;
        }
        pairs.insert(hash_key, HashPair { key, value });
    }
    Object::Hash(Rc::new(pairs))
}

/// Fixed builtin registry; consulted only after the environment chain has
/// no binding for the name.
fn lookup_builtin(name: &str) -> Option<Object> {
    let function: BuiltinFn = match name {
        "len" => builtin_len,
        "first" => builtin_first,
        "last" => builtin_last,
        "rest" => builtin_rest,
        "push" => builtin_push,
        _ => return None,
    };
    Some(Object::Builtin(function))
}

fn builtin_len(arguments: Vec<Object>) -> Object {
    if arguments.len() != 1 {
        return Object::Error(format!(
            "wrong number of arguments. got={}, want=1",
            arguments.len()
        ));
    }
    match &arguments[0] {
        Object::String(value) => Object::Integer(value.graphemes(true).count() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        other => Object::Error(format!(
            "argument to `len` not supported, got={}",
            other.type_name()
        )),
    }
}

fn builtin_first(arguments: Vec<Object>) -> Object {
    if arguments.len() != 1 {
        return Object::Error(format!(
            "wrong number of arguments. got={}, want=1",
            arguments.len()
        ));
    }
    match &arguments[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or(Object::Null),
        other => Object::Error(format!(
            "argument to `first` must be ARRAY, got={}",
            other.type_name()
        )),
    }
}

fn builtin_last(arguments: Vec<Object>) -> Object {
    if arguments.len() != 1 {
        return Object::Error(format!(
            "wrong number of arguments. got={}, want=1",
            arguments.len()
        ));
    }
    match &arguments[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or(Object::Null),
        other => Object::Error(format!(
            "argument to `last` must be ARRAY, got={}",
            other.type_name()
        )),
    }
}

fn builtin_rest(arguments: Vec<Object>) -> Object {
    if arguments.len() != 1 {
        return Object::Error(format!(
            "wrong number of arguments. got={}, want=1",
            arguments.len()
        ));
    }
    match &arguments[0] {
        Object::Array(elements) => {
            if elements.is_empty() {
                Object::Null
            } else {
                Object::Array(Rc::new(elements[1..].to_vec()))
            }
        }
        other => Object::Error(format!(
            "argument to `rest` must be ARRAY, got={}",
            other.type_name()
        )),
    }
}

fn builtin_push(arguments: Vec<Object>) -> Object {
    if arguments.len() != 2 {
        return Object::Error(format!(
            "wrong number of arguments. got={}, want=2",
            arguments.len()
        ));
    }
    match &arguments[0] {
        Object::Array(elements) => {
            let mut pushed = elements.as_ref().clone();
            pushed.push(arguments[1].clone());
            Object::Array(Rc::new(pushed))
        }
        other => Object::Error(format!(
            "argument to `push` must be ARRAY, got={}",
            other.type_name()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn run(input: &str) -> Object {
        let mut parser = Parser::new(Lexer::new(input));
        let program = parser.parse_program();
        assert_eq!(
            parser.errors(),
            &[] as &[String],
            "parser errors for input {:?}",
            input
        );
        let env = Environment::new();
        eval(&program, &env)
    }

    fn assert_integer(object: &Object, expected: i64) {
        match object {
            Object::Integer(value) => assert_eq!(*value, expected),
            other => panic!("expected Integer({}), got {:?}", expected, other),
        }
    }

    fn assert_boolean(object: &Object, expected: bool) {
        match object {
            Object::Boolean(value) => assert_eq!(*value, expected),
            other => panic!("expected Boolean({}), got {:?}", expected, other),
        }
    }

    fn assert_null(object: &Object) {
        assert!(matches!(object, Object::Null), "expected Null, got {:?}", object);
    }

    fn assert_error(object: &Object, expected: &str) {
        match object {
            Object::Error(message) => assert_eq!(message, expected),
            other => panic!("expected error {:?}, got {:?}", expected, other),
        }
    }

    #[test]
    fn integer_expressions() {
        let tests = [
            ("5", 5),
            ("10", 10),
            ("-5", -5),
            ("-10", -10),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("5 * 2 + 10", 20),
            ("50 / 2 + 3", 28),
            ("(1 + 2) * 3", 9),
            ("3 * (3 * 3) + 10", 37),
        ];
        for (input, expected) in tests {
            assert_integer(&run(input), expected);
        }
    }

    #[test]
    fn arithmetic_wraps_at_fixed_width() {
        assert_integer(&run("9223372036854775807 + 1"), i64::MIN);
        assert_integer(&run("-9223372036854775807 - 2"), i64::MAX);
    }

    #[test]
    fn division_truncates_and_rejects_zero() {
        assert_integer(&run("7 / 2"), 3);
        assert_integer(&run("-7 / 2"), -3);
        assert_error(&run("5 / 0"), "division by zero");
    }

    #[test]
    fn boolean_expressions() {
        let tests = [
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("true == true", true),
            ("true == false", false),
            ("true != false", true),
            ("(1 < 2) == true", true),
            ("(1 < 2) == false", false),
        ];
        for (input, expected) in tests {
            assert_boolean(&run(input), expected);
        }
    }

    #[test]
    fn bang_operator() {
        let tests = [
            ("!true", false),
            ("!false", true),
            ("!5", false),
            ("!!true", true),
            ("!!false", false),
            ("!!5", true),
            ("!0", false),
            ("!\"\"", false),
        ];
        for (input, expected) in tests {
            assert_boolean(&run(input), expected);
        }
    }

    #[test]
    fn if_else_expressions() {
        let tests = [
            ("if (true) { 10 }", Some(10)),
            ("if (false) { 10 }", None),
            ("if (1) { 10 }", Some(10)),
            ("if (1 < 2) { 10 }", Some(10)),
            ("if (1 > 2) { 10 }", None),
            ("if (1 < 2) { 10 } else { 20 }", Some(10)),
            ("if (1 > 2) { 10 } else { 20 }", Some(20)),
        ];
        for (input, expected) in tests {
            let result = run(input);
            match expected {
                Some(value) => assert_integer(&result, value),
                None => assert_null(&result),
            }
        }
    }

    #[test]
    fn return_statements() {
        let tests = [
            ("return 10;", 10),
            ("return 10; 9;", 10),
            ("return 2 * 5; 9;", 10),
            ("9; return 2 * 5; 9;", 10),
        ];
        for (input, expected) in tests {
            assert_integer(&run(input), expected);
        }
    }

    #[test]
    fn return_halts_only_its_own_block() {
        // a block unwraps the return it contains; the program carries on
        // with the unwrapped value as the block's result
        assert_integer(&run("if (true) { return 10; } 9;"), 9);
    }

    #[test]
    fn error_handling_halts_evaluation() {
        let tests = [
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "true + false + true + false;",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "identifier not found: foobar"),
            (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
            (r#""Hello" == "World""#, "unknown operator: STRING == STRING"),
            ("5(3)", "not a function: INTEGER"),
            (r#"{"name": "app"}[fn(x) { x }];"#, "unusable as hash key: FUNCTION"),
            ("true[0]", "index operator not supported: BOOLEAN"),
        ];
        for (input, expected) in tests {
            assert_error(&run(input), expected);
        }
    }

    #[test]
    fn let_statements() {
        let tests = [
            ("let a = 5; a;", 5),
            ("let a = 5 * 5; a;", 25),
            ("let a = 5; let b = a; b;", 5),
            ("let a = 5; let b = a; let c = a + b + 5; c;", 15),
        ];
        for (input, expected) in tests {
            assert_integer(&run(input), expected);
        }
    }

    #[test]
    fn function_object() {
        match run("fn(x) { x + 2; };") {
            Object::Function(function) => {
                assert_eq!(function.parameters.len(), 1);
                assert_eq!(function.parameters[0].name, "x");
                assert_eq!(function.body.to_string(), "(x + 2)");
            }
            other => panic!("expected Function, got {:?}", other),
        }
    }

    #[test]
    fn function_application() {
        let tests = [
            ("let identity = fn(x) { x; }; identity(5);", 5),
            ("let identity = fn(x) { return x; }; identity(5);", 5),
            ("let double = fn(x) { x * 2; }; double(5);", 10),
            ("let add = fn(x, y) { x + y; }; add(5, 5);", 10),
            ("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
            ("fn(x) { x; }(5)", 5),
        ];
        for (input, expected) in tests {
            assert_integer(&run(input), expected);
        }
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        assert_error(
            &run("let add = fn(x, y) { x + y; }; add(1);"),
            "wrong number of arguments: want=2, got=1",
        );
        assert_error(
            &run("let id = fn(x) { x; }; id(1, 2);"),
            "wrong number of arguments: want=1, got=2",
        );
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let input = "
let newAdder = fn(x) { fn(y) { x + y }; };
let addTwo = newAdder(2);
addTwo(3);";
        assert_integer(&run(input), 5);
    }

    #[test]
    fn closures_see_later_writes_to_a_shared_environment() {
        let input = "
let a = 1;
let peek = fn() { a };
let a = 2;
peek();";
        assert_integer(&run(input), 2);
    }

    #[test]
    fn string_literal_and_concatenation() {
        match run(r#""Hello world!""#) {
            Object::String(value) => assert_eq!(value, "Hello world!"),
            other => panic!("expected String, got {:?}", other),
        }
        match run(r#""Hello" + " " + "World!""#) {
            Object::String(value) => assert_eq!(value, "Hello World!"),
            other => panic!("expected String, got {:?}", other),
        }
    }

    #[test]
    fn array_literals() {
        match run("[1, 2 * 2, 3 + 3]") {
            Object::Array(elements) => {
                assert_eq!(elements.len(), 3);
                assert_integer(&elements[0], 1);
                assert_integer(&elements[1], 4);
                assert_integer(&elements[2], 6);
            }
            other => panic!("expected Array, got {:?}", other),
        }
    }

    #[test]
    fn array_index_expressions() {
        let tests = [
            ("[1, 2, 3][0]", Some(1)),
            ("[1, 2, 3][1]", Some(2)),
            ("[1, 2, 3][2]", Some(3)),
            ("let i = 0; [1][i];", Some(1)),
            ("[1, 2, 3][1 + 1];", Some(3)),
            ("let myArray = [1, 2, 3]; myArray[2];", Some(3)),
            (
                "let myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
                Some(6),
            ),
            ("let myArray = [1, 2, 3]; let i = myArray[0]; myArray[i]", Some(2)),
            ("[1, 2, 3][3]", None),
            ("[1, 2, 3][-1]", None),
        ];
        for (input, expected) in tests {
            let result = run(input);
            match expected {
                Some(value) => assert_integer(&result, value),
                None => assert_null(&result),
            }
        }
    }

    #[test]
    fn equality_on_arrays_is_identity() {
        assert_boolean(&run("[1, 2] == [1, 2]"), false);
        assert_boolean(&run("[1, 2] != [1, 2]"), true);
        assert_boolean(&run("let a = [1, 2]; a == a"), true);
    }

    #[test]
    fn builtin_functions() {
        let tests = [
            (r#"len("")"#, 0),
            (r#"len("four")"#, 4),
            (r#"len("hello world")"#, 11),
            ("len([1, 2, 3])", 3),
            ("len([])", 0),
            ("first([1, 2, 3])", 1),
            ("last([1, 2, 3])", 3),
            ("len(rest([1, 2, 3]))", 2),
            ("rest([1, 2, 3])[0]", 2),
            ("len(push([1, 2], 3))", 3),
            ("push([1, 2], 3)[2]", 3),
        ];
        for (input, expected) in tests {
            assert_integer(&run(input), expected);
        }

        assert_null(&run("first([])"));
        assert_null(&run("last([])"));
        assert_null(&run("rest([])"));
    }

    #[test]
    fn builtin_errors() {
        let tests = [
            ("len(1)", "argument to `len` not supported, got=INTEGER"),
            (r#"len("one", "two")"#, "wrong number of arguments. got=2, want=1"),
            ("first(1)", "argument to `first` must be ARRAY, got=INTEGER"),
            ("last(1)", "argument to `last` must be ARRAY, got=INTEGER"),
            ("rest(1)", "argument to `rest` must be ARRAY, got=INTEGER"),
            ("push(1, 1)", "argument to `push` must be ARRAY, got=INTEGER"),
            ("push([1])", "wrong number of arguments. got=1, want=2"),
        ];
        for (input, expected) in tests {
            assert_error(&run(input), expected);
        }
    }

    #[test]
    fn builtins_never_mutate_their_argument() {
        assert_integer(&run("let a = [1, 2]; push(a, 3); len(a)"), 2);
        assert_integer(&run("let a = [1, 2]; rest(a); first(a)"), 1);
    }

    #[test]
    fn environment_bindings_shadow_builtins() {
        assert_integer(&run("let len = 5; len"), 5);
    }

    #[test]
    fn hash_literals() {
        let input = r#"
let two = "two";
{
    "one": 10 - 9,
    two: 1 + 1,
    "thr" + "ee": 6 / 2,
    4: 4,
    true: 5,
    false: 6
}"#;
        match run(input) {
            Object::Hash(pairs) => {
                use crate::object::HashKey;
                assert_eq!(pairs.len(), 6);
                let expected = [
                    (HashKey::String("one".to_string()), 1),
                    (HashKey::String("two".to_string()), 2),
                    (HashKey::String("three".to_string()), 3),
                    (HashKey::Integer(4), 4),
                    (HashKey::Boolean(true), 5),
                    (HashKey::Boolean(false), 6),
                ];
                for (key, value) in expected {
                    let pair = pairs.get(&key).unwrap_or_else(|| {
                        panic!("missing key {:?}", key);
                    });
                    assert_integer(&pair.value, value);
                }
            }
            other => panic!("expected Hash, got {:?}", other),
        }
    }

    #[test]
    fn hash_index_expressions() {
        let tests = [
            (r#"{"foo": 5}["foo"]"#, Some(5)),
            (r#"{"foo": 5}["bar"]"#, None),
            (r#"let key = "foo"; {"foo": 5}[key]"#, Some(5)),
            (r#"{}["foo"]"#, None),
            ("{5: 5}[5]", Some(5)),
            ("{true: 5}[true]", Some(5)),
            ("{false: 5}[false]", Some(5)),
        ];
        for (input, expected) in tests {
            let result = run(input);
            match expected {
                Some(value) => assert_integer(&result, value),
                None => assert_null(&result),
            }
        }
    }

    #[test]
    fn hash_literal_with_unhashable_key_is_an_error() {
        assert_error(
            &run("{fn(x) { x }: 1}"),
            "unusable as hash key: FUNCTION",
        );
    }
}
