use crate::accessor::{expr, property, Accessor, Spec, Specs};
use crate::error::QueryError;
use serde_json::Value;
use sift_expr::util::{is_truthy, strict_eq, usize_to_jsval};
use sift_expr::JsValue;

fn compile_all(specs: impl Into<Specs>) -> Result<Vec<Accessor>, QueryError> {
    specs.into().into_iter().map(expr).collect()
}

/// Negates a predicate. Aliased `"!" + name`.
pub fn not(spec: impl Into<Spec>) -> Result<Accessor, QueryError> {
    let f = expr(spec)?;
    let name = format!("!{}", f.name());
    Ok(Accessor::new(name, move |d| Ok(JsValue::from(!f.test(d)?))))
}

/// True if any predicate holds, testing left to right. `or([])` is false.
pub fn or(specs: impl Into<Specs>) -> Result<Accessor, QueryError> {
    let tests = compile_all(specs)?;
    Ok(Accessor::new("or", move |d| {
        for t in &tests {
            if t.test(d)? {
                return Ok(JsValue::from(true));
            }
        }
        Ok(JsValue::from(false))
    }))
}

/// True if every predicate holds, testing left to right. `and([])` is true.
pub fn and(specs: impl Into<Specs>) -> Result<Accessor, QueryError> {
    let tests = compile_all(specs)?;
    Ok(Accessor::new("and", move |d| {
        for t in &tests {
            if !t.test(d)? {
                return Ok(JsValue::from(false));
            }
        }
        Ok(JsValue::from(true))
    }))
}

/// Threads a value through each accessor in turn, first to last. Text specs
/// are property reads: `compose(["name", "length"])` is the name's length.
pub fn compose(specs: impl Into<Specs>) -> Accessor {
    let fns: Vec<Accessor> = specs.into().into_iter().map(property).collect();
    Accessor::new("composed", move |d| {
        let mut value = d.clone();
        for f in &fns {
            value = f.call(&value)?;
        }
        Ok(value)
    })
}

/// `cond(d) ? yes(d) : no(d)`.
pub fn iff(
    cond: impl Into<Spec>,
    yes: impl Into<Spec>,
    no: impl Into<Spec>,
) -> Result<Accessor, QueryError> {
    let cond = expr(cond)?;
    let yes = expr(yes)?;
    let no = expr(no)?;
    Ok(Accessor::new("iff", move |d| {
        if is_truthy(&cond.call(d)?) {
            yes.call(d)
        } else {
            no.call(d)
        }
    }))
}

/// Position of the argument among the flattened `values` (strict
/// equality), or `-1`.
pub fn index_in(values: &[Value]) -> Accessor {
    let values = sift_util::flatten(values);
    Accessor::from_fn("indexIn", move |d| {
        match values
            .iter()
            .position(|v| strict_eq(&JsValue::Json(v.clone()), d))
        {
            Some(i) => usize_to_jsval(i),
            None => JsValue::from(-1i64),
        }
    })
}
