//! Tree-walking evaluator.
//!
//! `eval` recurses over the AST and produces an `Object` for every node.
//! There is a single, load-bearing distinction between `eval_program` and
//! `eval_block_statement`: the former unwraps a `ReturnValue` it finds
//! (there's nowhere further out for it to go), while the latter returns it
//! untouched so an enclosing `if`/`while`/function call can keep bubbling it
//! upward. `Error` values follow the same untouched-bubbling rule in both,
//! which is what makes a runtime error abort the rest of the program
//! without a single `?` in sight. The abort is just "this value, once
//! produced, is never examined further, only passed along."

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::builtins::{BuiltinsRegistry, OutputSink};
use crate::environment::Environment;
use crate::object::{self, new_error, Object};

pub fn eval_program(
    program: &Program,
    env: &Rc<RefCell<Environment>>,
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> Rc<Object> {
    let mut result = object::singleton_null();

    for statement in &program.statements {
        result = eval_statement(statement, env, registry, sink);
        match result.as_ref() {
            Object::ReturnValue(value) => return Rc::clone(value),
            Object::Error(_) => return result,
            _ => {}
        }
    }

    result
}

fn eval_block_statement(
    block: &BlockStatement,
    env: &Rc<RefCell<Environment>>,
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> Rc<Object> {
    let mut result = object::singleton_null();

    for statement in &block.statements {
        result = eval_statement(statement, env, registry, sink);
        if matches!(result.as_ref(), Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_statement(
    statement: &Statement,
    env: &Rc<RefCell<Environment>>,
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> Rc<Object> {
    match statement {
        Statement::Let { name, value } => {
            trace!("ast.LetStatement({name})");
            let evaluated = eval_expression(value, env, registry, sink);
            if evaluated.is_error() {
                return evaluated;
            }
            env.borrow_mut().set(name.clone(), evaluated);
            object::singleton_null()
        }
        Statement::Return { value } => {
            trace!("ast.ReturnStatement");
            let evaluated = eval_expression(value, env, registry, sink);
            if evaluated.is_error() {
                return evaluated;
            }
            Rc::new(Object::ReturnValue(evaluated))
        }
        Statement::Expression(expr) => {
            trace!("ast.ExpressionStatement");
            eval_expression(expr, env, registry, sink)
        }
    }
}

fn eval_expression(
    expr: &Expression,
    env: &Rc<RefCell<Environment>>,
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> Rc<Object> {
    match expr {
        Expression::IntegerLiteral(n) => {
            trace!("ast.IntegerLiteral({n})");
            Rc::new(Object::Integer(*n))
        }
        Expression::StringLiteral(s) => {
            trace!("ast.StringLiteral({s})");
            Rc::new(Object::String(s.clone()))
        }
        Expression::Boolean(b) => {
            trace!("ast.Boolean({b})");
            native_bool(*b)
        }

        Expression::Identifier(name) => {
            trace!("ast.Identifier({name})");
            eval_identifier(name, env, registry)
        }

        Expression::ArrayLiteral(elements) => {
            trace!("ast.ArrayLiteral");
            let values = eval_expressions(elements, env, registry, sink);
            match values {
                Ok(values) => Rc::new(Object::Array(values)),
                Err(err) => err,
            }
        }

        Expression::HashLiteral(pairs) => {
            trace!("ast.HashLiteral");
            eval_hash_literal(pairs, env, registry, sink)
        }

        Expression::Prefix { operator, right } => {
            trace!("ast.PrefixExpression({operator})");
            let right = eval_expression(right, env, registry, sink);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(operator, &right)
        }

        Expression::Infix { left, operator, right } => {
            trace!("ast.InfixExpression({operator})");
            let left = eval_expression(left, env, registry, sink);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(right, env, registry, sink);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(operator, &left, &right)
        }

        Expression::If {
            condition,
            consequence,
            alternative,
        } => {
            trace!("ast.IfExpression");
            eval_if_expression(condition, consequence, alternative.as_ref(), env, registry, sink)
        }

        Expression::While { condition, body } => {
            trace!("ast.WhileExpression");
            eval_while_expression(condition, body, env, registry, sink)
        }

        Expression::FunctionLiteral { parameters, body } => {
            trace!("ast.FunctionLiteral");
            Rc::new(Object::Function {
                parameters: parameters.clone(),
                body: Rc::clone(body),
                env: Rc::clone(env),
            })
        }

        Expression::Call { function, arguments } => {
            trace!("ast.CallExpression");
            let func = eval_expression(function, env, registry, sink);
            if func.is_error() {
                return func;
            }
            let args = match eval_expressions(arguments, env, registry, sink) {
                Ok(args) => args,
                Err(err) => return err,
            };
            apply_function(&func, &args, registry, sink)
        }

        Expression::Index { left, index } => {
            trace!("ast.IndexExpression");
            let left = eval_expression(left, env, registry, sink);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(index, env, registry, sink);
            if index.is_error() {
                return index;
            }
            eval_index_expression(&left, &index)
        }
    }
}

fn native_bool(value: bool) -> Rc<Object> {
    object::singleton_bool(value)
}

fn eval_identifier(name: &str, env: &Rc<RefCell<Environment>>, registry: &BuiltinsRegistry) -> Rc<Object> {
    if let Some(value) = env.borrow().get(name) {
        return value;
    }
    if let Some(builtin) = registry.get(name) {
        return Rc::new(Object::Builtin(builtin.clone()));
    }
    new_error(format!("identifier not found: {name}"))
}

fn eval_expressions(
    exprs: &[Expression],
    env: &Rc<RefCell<Environment>>,
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> Result<Vec<Rc<Object>>, Rc<Object>> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env, registry, sink);
        if value.is_error() {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn eval_hash_literal(
    pairs: &[(Expression, Expression)],
    env: &Rc<RefCell<Environment>>,
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> Rc<Object> {
    let mut map = std::collections::HashMap::new();

    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env, registry, sink);
        if key.is_error() {
            return key;
        }
        let hash_key = match key.hash_key() {
            Some(hash_key) => hash_key,
            None => return new_error(format!("unusable as hash key: {}", key.type_tag())),
        };

        let value = eval_expression(value_expr, env, registry, sink);
        if value.is_error() {
            return value;
        }

        map.insert(hash_key, (key, value));
    }

    Rc::new(Object::Hash(map))
}

fn eval_prefix_expression(operator: &str, right: &Rc<Object>) -> Rc<Object> {
    match operator {
        "!" => native_bool(!right.is_truthy()),
        "-" => match right.as_ref() {
            Object::Integer(n) => Rc::new(Object::Integer(n.wrapping_neg())),
            other => new_error(format!("unknown operator: -{}", other.type_tag())),
        },
        other => new_error(format!("unknown operator: {other}{}", right.type_tag())),
    }
}

/// Dispatch order matters here and is not just a stylistic choice: Integer
/// and String pairs get their own value-equality infix tables, but every
/// other `==`/`!=` (including two `Boolean`s) is decided by `Rc` identity
/// against the canonical singletons, before the type-mismatch check even
/// runs. That's what makes `5 == true` come back `false` instead of a type
/// error: operands of different types reaching `==`/`!=` are simply never
/// the same instance.
fn eval_infix_expression(operator: &str, left: &Rc<Object>, right: &Rc<Object>) -> Rc<Object> {
    match (left.as_ref(), right.as_ref()) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Object::String(l), Object::String(r)) => eval_string_infix_expression(operator, l, r),
        _ if operator == "==" => native_bool(Rc::ptr_eq(left, right)),
        _ if operator == "!=" => native_bool(!Rc::ptr_eq(left, right)),
        (l, r) if l.type_tag() != r.type_tag() => {
            new_error(format!("type mismatch: {} {operator} {}", l.type_tag(), r.type_tag()))
        }
        (l, r) => new_error(format!("unknown operator: {} {operator} {}", l.type_tag(), r.type_tag())),
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Rc<Object> {
    match operator {
        "+" => Rc::new(Object::Integer(left.wrapping_add(right))),
        "-" => Rc::new(Object::Integer(left.wrapping_sub(right))),
        "*" => Rc::new(Object::Integer(left.wrapping_mul(right))),
        "/" => {
            if right == 0 {
                new_error("division by zero")
            } else {
                Rc::new(Object::Integer(left.wrapping_div(right)))
            }
        }
        "%" => {
            if right == 0 {
                new_error("division by zero")
            } else {
                Rc::new(Object::Integer(left.wrapping_rem(right)))
            }
        }
        "<" => native_bool(left < right),
        ">" => native_bool(left > right),
        "==" => native_bool(left == right),
        "!=" => native_bool(left != right),
        other => new_error(format!("unknown operator: INTEGER {other} INTEGER")),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Rc<Object> {
    match operator {
        "+" => Rc::new(Object::String(format!("{left}{right}"))),
        "==" => native_bool(left == right),
        "!=" => native_bool(left != right),
        other => new_error(format!("unknown operator: STRING {other} STRING")),
    }
}

fn eval_if_expression(
    condition: &Expression,
    consequence: &BlockStatement,
    alternative: Option<&BlockStatement>,
    env: &Rc<RefCell<Environment>>,
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> Rc<Object> {
    let condition = eval_expression(condition, env, registry, sink);
    if condition.is_error() {
        return condition;
    }

    if condition.is_truthy() {
        eval_block_statement(consequence, env, registry, sink)
    } else if let Some(alternative) = alternative {
        eval_block_statement(alternative, env, registry, sink)
    } else {
        object::singleton_null()
    }
}

fn eval_while_expression(
    condition: &Expression,
    body: &BlockStatement,
    env: &Rc<RefCell<Environment>>,
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> Rc<Object> {
    let mut last = object::singleton_null();

    loop {
        let cond_value = eval_expression(condition, env, registry, sink);
        if cond_value.is_error() {
            return cond_value;
        }
        if !cond_value.is_truthy() {
            return last;
        }

        let result = eval_block_statement(body, env, registry, sink);
        if matches!(result.as_ref(), Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
        last = result;
    }
}

fn eval_index_expression(left: &Rc<Object>, index: &Rc<Object>) -> Rc<Object> {
    match (left.as_ref(), index.as_ref()) {
        (Object::Array(elements), Object::Integer(idx)) => {
            if *idx < 0 || *idx as usize >= elements.len() {
                object::singleton_null()
            } else {
                Rc::clone(&elements[*idx as usize])
            }
        }
        (Object::String(s), Object::Integer(idx)) => {
            let bytes = s.as_bytes();
            if *idx < 0 || *idx as usize >= bytes.len() {
                object::singleton_null()
            } else {
                let byte = bytes[*idx as usize];
                if byte.is_ascii() {
                    Rc::new(Object::String((byte as char).to_string()))
                } else {
                    // A raw UTF-8 continuation/lead byte can't stand on its own as a
                    // valid `String`, so byte-indexing only yields a character for
                    // ASCII content.
                    new_error("string index into non-ASCII byte is not supported")
                }
            }
        }
        (Object::Hash(pairs), key) => match key.hash_key() {
            Some(hash_key) => pairs
                .get(&hash_key)
                .map(|(_, value)| Rc::clone(value))
                .unwrap_or_else(|| object::singleton_null()),
            None => new_error(format!("unusable as hash key: {}", key.type_tag())),
        },
        (l, _) => new_error(format!("index operator not supported: {}", l.type_tag())),
    }
}

fn apply_function(
    func: &Rc<Object>,
    args: &[Rc<Object>],
    registry: &BuiltinsRegistry,
    sink: &mut dyn OutputSink,
) -> Rc<Object> {
    match func.as_ref() {
        Object::Function { parameters, body, env } => {
            if parameters.len() != args.len() {
                return new_error(format!(
                    "wrong number of arguments: expected {}, got {}",
                    parameters.len(),
                    args.len()
                ));
            }

            let scope = Environment::new_enclosed(Rc::clone(env));
            for (param, arg) in parameters.iter().zip(args) {
                scope.borrow_mut().set(param.clone(), Rc::clone(arg));
            }

            let result = eval_block_statement(body, &scope, registry, sink);
            unwrap_return_value(result)
        }
        Object::Builtin(builtin) => builtin.call(args, sink),
        other => new_error(format!("not a function: {}", other.type_tag())),
    }
}

fn unwrap_return_value(obj: Rc<Object>) -> Rc<Object> {
    match obj.as_ref() {
        Object::ReturnValue(value) => Rc::clone(value),
        _ => obj,
    }
}
