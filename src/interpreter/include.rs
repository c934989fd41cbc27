//! `include`: finding modules and binding them.
//!
//! A target is looked for as a script file first: the literal path, then
//! relative to the current directory, then in each configured search path,
//! each with and without the configured extension. Failing that, a native
//! extension registered under the target's name is used.

use std::{
    env, fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    ast::{
        ast::Node,
        statements::{IncludeStmt, IncludeTarget},
    },
    errors::errors::{IO_ERROR, TYPE_ERROR, UNDEFINED_ERROR},
    value::{
        callable::{Class, Object},
        members::lookup_member,
        value::{Value, ValueKind},
    },
};

use super::{
    calls::call_value,
    context::Context,
    control::escaped,
    interpreter::{parse_source, ExtensionConstructor, Interpreter},
    result::{RuntimeResult, Signal},
};

#[derive(Debug)]
enum Resolution {
    Script(PathBuf),
    Extension(ExtensionConstructor),
}

/// Turns an include target into a name that can be bound: the file stem,
/// with anything that is not a letter, digit or underscore replaced.
pub fn sanitize(target: &str) -> String {
    let stem = Path::new(target)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(target);

    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

fn resolve(interpreter: &Interpreter, target: &IncludeTarget) -> Option<Resolution> {
    let raw = target.as_str();

    let mut names = vec![PathBuf::from(raw)];
    if Path::new(raw).extension().is_none() {
        names.push(PathBuf::from(format!("{}.{}", raw, interpreter.config.extension)));
    }

    let mut directories = vec![];
    if let Ok(current) = env::current_dir() {
        directories.push(current);
    }
    directories.extend(interpreter.config.search_paths.iter().cloned());

    let candidates = names.iter().cloned().chain(
        directories
            .iter()
            .flat_map(|directory| names.iter().map(move |name| directory.join(name))),
    );
    for candidate in candidates {
        if candidate.is_file() {
            return Some(Resolution::Script(candidate));
        }
    }

    interpreter
        .get_extension(raw)
        .or_else(|| interpreter.get_extension(&sanitize(raw)))
        .map(Resolution::Extension)
}

/// Evaluates a script as the body of an object under the root context.
fn load_script(
    interpreter: &mut Interpreter,
    path: &Path,
    name: &str,
    node: &Node,
    context: &Context,
) -> RuntimeResult {
    let source = fs::read_to_string(path).map_err(|error| {
        Signal::error(
            IO_ERROR,
            format!("could not read '{}': {}", path.display(), error),
            &node.span,
            context,
        )
    })?;
    let body = Rc::new(parse_source(&path.display().to_string(), &source)?);

    let internal = Context::new(
        name,
        Some(interpreter.root_context()),
        node.span.start.clone(),
        false,
    );
    interpreter.enter(&node.span, |interpreter| {
        interpreter
            .evaluate(&body, &internal)
            .map_err(|signal| Signal::Error(escaped(signal, &internal)))
    })?;

    let class = Rc::new(Class {
        name: name.to_string(),
        parameters: vec![],
        parents: vec![],
        body,
    });
    Ok(Value::new(ValueKind::Object(Rc::new(Object { class, internal }))))
}

pub fn eval_include(
    interpreter: &mut Interpreter,
    include: &IncludeStmt,
    node: &Node,
    context: &Context,
) -> RuntimeResult {
    let target = include.target.as_str();
    let name = sanitize(target);

    let module = match resolve(interpreter, &include.target) {
        Some(Resolution::Script(path)) => {
            tracing::debug!(module = %name, path = %path.display(), "including script");
            load_script(interpreter, &path, &name, node, context)?
        }
        Some(Resolution::Extension(constructor)) => {
            tracing::debug!(module = %name, "including native extension");
            call_value(interpreter, constructor(), vec![], &node.span, context)?
        }
        None => {
            return Err(Signal::error(
                IO_ERROR,
                format!("could not find module '{}'", target),
                &node.span,
                context,
            ))
        }
    };

    if let Some(member) = &include.member {
        let value = match &module.kind {
            ValueKind::Object(object) => object.internal.get_local(member),
            _ => lookup_member(&module, member),
        }
        .ok_or_else(|| {
            Signal::error(
                UNDEFINED_ERROR,
                format!("module '{}' has no member '{}'", name, member),
                &node.span,
                context,
            )
        })?;

        context.set(include.nickname.as_deref().unwrap_or(member), value.clone());
        return Ok(value);
    }

    if include.dump_all {
        let ValueKind::Object(object) = &module.kind else {
            return Err(Signal::error(
                TYPE_ERROR,
                format!("cannot dump a module of type {}", module.type_name()),
                &node.span,
                context,
            ));
        };
        for (member, value) in object.internal.symbols() {
            context.set(member, value);
        }
        return Ok(module);
    }

    context.set(include.nickname.clone().unwrap_or(name), module.clone());
    Ok(module)
}
