// crates/template_engine/src/functions.rs

//! The fixed function table available inside templates.
//!
//! Prompt helpers come from `template_helpers`; the remaining entries are the
//! usual template built-ins (`len`, `eq`, `index`, ...).

use serde_json::Value;

type TemplateFn = fn(&[Value]) -> Result<Value, String>;

static FUNCTIONS: &[(&str, TemplateFn)] = &[
    ("truncate", truncate),
    ("mdFence", md_fence),
    ("indent", indent),
    ("dedent", dedent),
    ("len", len),
    ("eq", eq),
    ("ne", ne),
    ("not", not),
    ("and", and),
    ("or", or),
    ("index", index),
    ("print", print),
    ("join", join),
    ("upper", upper),
    ("lower", lower),
    ("trim", trim),
    ("formatTime", format_time),
    ("date", format_time),
];

pub(crate) fn is_defined(name: &str) -> bool {
    FUNCTIONS.iter().any(|(n, _)| *n == name)
}

pub(crate) fn call(name: &str, args: &[Value]) -> Result<Value, String> {
    let (_, f) = FUNCTIONS
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| format!("function {:?} not defined", name))?;
    f(args).map_err(|e| format!("error calling {}: {}", name, e))
}

/// Renders a value the way it appears in template output.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

fn arity(args: &[Value], n: usize) -> Result<(), String> {
    if args.len() != n {
        return Err(format!("wrong number of args: want {} got {}", n, args.len()));
    }
    Ok(())
}

fn as_str(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected string; found {}", type_name(value)))
}

fn as_usize(value: &Value) -> Result<usize, String> {
    value
        .as_i64()
        .ok_or_else(|| format!("expected integer; found {}", type_name(value)))
        .and_then(|n| usize::try_from(n).map_err(|_| format!("expected non-negative integer; found {}", n)))
}

fn truncate(args: &[Value]) -> Result<Value, String> {
    arity(args, 2)?;
    template_helpers::truncate(as_usize(&args[0])?, as_str(&args[1])?).map(Value::String)
}

fn md_fence(args: &[Value]) -> Result<Value, String> {
    arity(args, 2)?;
    Ok(Value::String(template_helpers::md_fence(
        as_str(&args[0])?,
        as_str(&args[1])?,
    )))
}

fn indent(args: &[Value]) -> Result<Value, String> {
    arity(args, 2)?;
    Ok(Value::String(template_helpers::indent(
        as_usize(&args[0])?,
        as_str(&args[1])?,
    )))
}

fn dedent(args: &[Value]) -> Result<Value, String> {
    arity(args, 1)?;
    Ok(Value::String(template_helpers::dedent(as_str(&args[0])?)))
}

fn len(args: &[Value]) -> Result<Value, String> {
    arity(args, 1)?;
    let n = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        Value::Object(o) => o.len(),
        other => return Err(format!("len of {}", type_name(other))),
    };
    Ok(Value::from(n))
}

fn eq(args: &[Value]) -> Result<Value, String> {
    if args.len() < 2 {
        return Err("missing argument for comparison".to_string());
    }
    Ok(Value::Bool(args[1..].iter().any(|v| *v == args[0])))
}

fn ne(args: &[Value]) -> Result<Value, String> {
    arity(args, 2)?;
    Ok(Value::Bool(args[0] != args[1]))
}

fn not(args: &[Value]) -> Result<Value, String> {
    arity(args, 1)?;
    Ok(Value::Bool(!is_truthy(&args[0])))
}

fn and(args: &[Value]) -> Result<Value, String> {
    let last = args.last().ok_or("wrong number of args: want at least 1 got 0")?;
    Ok(args.iter().find(|v| !is_truthy(v)).unwrap_or(last).clone())
}

fn or(args: &[Value]) -> Result<Value, String> {
    let last = args.last().ok_or("wrong number of args: want at least 1 got 0")?;
    Ok(args.iter().find(|v| is_truthy(v)).unwrap_or(last).clone())
}

fn index(args: &[Value]) -> Result<Value, String> {
    let (first, keys) = args
        .split_first()
        .ok_or("wrong number of args: want at least 1 got 0")?;
    let mut current = first.clone();
    for key in keys {
        current = match (&current, key) {
            (Value::Object(map), Value::String(k)) => map.get(k).cloned().unwrap_or(Value::Null),
            (Value::Array(list), k) => {
                let i = as_usize(k)?;
                list.get(i)
                    .cloned()
                    .ok_or_else(|| format!("index out of range: {}", i))?
            }
            (Value::Null, _) => Value::Null,
            (container, k) => {
                return Err(format!(
                    "can't index item of type {} with {}",
                    type_name(container),
                    type_name(k)
                ))
            }
        };
    }
    Ok(current)
}

fn print(args: &[Value]) -> Result<Value, String> {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        let needs_space = i > 0 && !args[i - 1].is_string() && !arg.is_string();
        if needs_space {
            out.push(' ');
        }
        out.push_str(&render_value(arg));
    }
    Ok(Value::String(out))
}

fn join(args: &[Value]) -> Result<Value, String> {
    arity(args, 2)?;
    let sep = as_str(&args[0])?;
    let items = args[1]
        .as_array()
        .ok_or_else(|| format!("expected list; found {}", type_name(&args[1])))?;
    Ok(Value::String(
        items.iter().map(render_value).collect::<Vec<_>>().join(sep),
    ))
}

fn upper(args: &[Value]) -> Result<Value, String> {
    arity(args, 1)?;
    Ok(Value::String(as_str(&args[0])?.to_uppercase()))
}

fn lower(args: &[Value]) -> Result<Value, String> {
    arity(args, 1)?;
    Ok(Value::String(as_str(&args[0])?.to_lowercase()))
}

fn trim(args: &[Value]) -> Result<Value, String> {
    arity(args, 1)?;
    Ok(Value::String(as_str(&args[0])?.trim().to_string()))
}

/// `formatTime LAYOUT TIME`, with a Go reference layout and an RFC 3339 time.
fn format_time(args: &[Value]) -> Result<Value, String> {
    arity(args, 2)?;
    crate::timefmt::format_time(as_str(&args[0])?, as_str(&args[1])?).map(Value::String)
}
