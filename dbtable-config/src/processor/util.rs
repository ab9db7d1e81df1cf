use dbtable_core::{
    config::{Mapping, Value},
    err::{bail, Result},
};

/// Applies the supplied function to every string in the yaml tree
pub fn process_strings(node: Value, cb: &dyn Fn(String) -> Result<Value>) -> Result<Value> {
    Ok(match node {
        Value::String(s) => cb(s)?,
        Value::Sequence(seq) => Value::Sequence(
            seq.into_iter()
                .map(|i| process_strings(i, cb))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Mapping(map) => {
            let mut res = Mapping::new();
            for (k, v) in map.into_iter() {
                res.insert(k, process_strings(v, cb)?);
            }
            Value::Mapping(res)
        }
        other => other,
    })
}

/// Replaces every `${expr}` in the string using the resolver.
///
/// Expressions the resolver does not recognise are left untouched and `$${`
/// escapes a literal `${`.
pub fn interpolate(input: &str, resolve: &dyn Fn(&str) -> Result<Option<String>>) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find("${") {
        if pos > 0 && rest[..pos].ends_with('$') {
            out.push_str(&rest[..pos - 1]);
            out.push_str("${");
            rest = &rest[pos + 2..];
            continue;
        }

        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let end = match after.find('}') {
            Some(end) => end,
            None => bail!("Unterminated expression in config value \"{}\"", input),
        };
        let expr = &after[..end];

        match resolve(expr)? {
            Some(val) => out.push_str(&val),
            None => {
                out.push_str("${");
                out.push_str(expr);
                out.push('}');
            }
        }

        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
