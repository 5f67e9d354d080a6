//! Deep, cycle-safe structural equality over [`Value`]

use std::collections::HashSet;

use crate::value::{MapValue, Object, SetValue, Value};

/// Structural equality independent of container identity
///
/// Primitives compare by value with `NaN` equal to `NaN` (and `0.0` equal to
/// `-0.0`); symbols by identity; dates by instant. Arrays compare in order,
/// while maps, sets and objects compare without regard to insertion order.
/// A pair of containers that is met again while it is still being compared
/// is assumed equal, so cyclic structures terminate.
///
/// # Examples
/// ```
/// use lazyseq::equality::equals;
/// use lazyseq::value::Value;
///
/// let a = Value::array(vec![Value::from(1), Value::from("x")]);
/// let b = Value::array(vec![Value::from(1), Value::from("x")]);
/// assert!(equals(&a, &b));
/// assert!(!equals(&a, &Value::array(vec![Value::from(1)])));
/// ```
pub fn equals(a: &Value, b: &Value) -> bool {
    Comparison::default().equals(a, b)
}

/// Membership test
///
/// A string `target` is searched for `search` as a substring; an array
/// `target` matches if any element deep-equals `search`. Any other target
/// contains nothing.
pub fn includes(search: &Value, target: &Value) -> bool {
    match target {
        Value::String(haystack) => match search {
            Value::String(needle) => haystack.contains(needle.as_str()),
            _ => false,
        },
        Value::Array(items) => {
            let mut cmp = Comparison::default();
            items.snapshot().iter().any(|item| cmp.equals(search, item))
        }
        _ => false,
    }
}

/// Container pairs under comparison on the current recursion path
#[derive(Default)]
struct Comparison {
    in_progress: HashSet<(usize, usize)>,
}

impl Comparison {
    fn equals(&mut self, a: &Value, b: &Value) -> bool {
        if a.same_value_zero(b) {
            return true;
        }
        match (a, b) {
            (Value::Map(x), Value::Map(y)) => self.guarded(x.id(), y.id(), |cmp| cmp.maps(x, y)),
            (Value::Set(x), Value::Set(y)) => self.guarded(x.id(), y.id(), |cmp| cmp.sets(x, y)),
            (Value::Array(x), Value::Array(y)) => self.guarded(x.id(), y.id(), |cmp| {
                let (xs, ys) = (x.snapshot(), y.snapshot());
                xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(l, r)| cmp.equals(l, r))
            }),
            (Value::Object(x), Value::Object(y)) => {
                self.guarded(x.id(), y.id(), |cmp| cmp.objects(x, y))
            }
            _ => false,
        }
    }

    fn guarded<F>(&mut self, a: usize, b: usize, compare: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let pair = (a, b);
        if !self.in_progress.insert(pair) {
            return true;
        }
        let result = compare(self);
        self.in_progress.remove(&pair);
        result
    }

    fn maps(&mut self, x: &MapValue, y: &MapValue) -> bool {
        let (xs, ys) = (x.entries(), y.entries());
        xs.len() == ys.len()
            && self.pair_off(&xs, &ys, |cmp, (xk, xv), (yk, yv)| {
                cmp.equals(xk, yk) && cmp.equals(xv, yv)
            })
    }

    fn sets(&mut self, x: &SetValue, y: &SetValue) -> bool {
        let (xs, ys) = (x.members(), y.members());
        xs.len() == ys.len() && self.pair_off(&xs, &ys, |cmp, xm, ym| cmp.equals(xm, ym))
    }

    /// Matches every `xs` item to a distinct `ys` item; each `ys` index is
    /// claimed at most once, keeping the result symmetric
    fn pair_off<E, F>(&mut self, xs: &[E], ys: &[E], mut matches: F) -> bool
    where
        F: FnMut(&mut Self, &E, &E) -> bool,
    {
        let mut claimed = vec![false; ys.len()];
        for xe in xs {
            let found = (0..ys.len()).find(|&i| !claimed[i] && matches(self, xe, &ys[i]));
            match found {
                Some(i) => claimed[i] = true,
                None => return false,
            }
        }
        true
    }

    fn objects(&mut self, x: &Object, y: &Object) -> bool {
        let (xs, ys) = (x.entries(), y.entries());
        if xs.len() != ys.len() {
            return false;
        }
        xs.iter().all(|(key, xv)| match ys.iter().find(|(k, _)| k == key) {
            Some((_, yv)) => self.equals(xv, yv),
            None => false,
        })
    }
}
