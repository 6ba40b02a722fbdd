//! Normalization of `limit` / `page` request parameters.

use serde_json::Value;

pub const DEFAULT_LIMIT: u64 = 20;
pub const DEFAULT_PAGE: u64 = 1;

type LimitOverride = Box<dyn Fn(u64) -> u64 + Send + Sync>;

/// Resolves the page size for list queries. An optional override runs on the
/// normalized value, so callers can force a global page size.
pub struct LimitResolver {
    override_fn: Option<LimitOverride>,
}

impl Default for LimitResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LimitResolver {
    pub fn new() -> Self {
        Self { override_fn: None }
    }

    pub fn with_override<F>(f: F) -> Self
    where
        F: Fn(u64) -> u64 + Send + Sync + 'static,
    {
        Self {
            override_fn: Some(Box::new(f)),
        }
    }

    pub fn resolve(&self, limit: Option<&Value>) -> u64 {
        let limit = as_number(limit)
            .map(clamp_min_one)
            .unwrap_or(DEFAULT_LIMIT);

        match &self.override_fn {
            Some(f) => f(limit),
            None => limit,
        }
    }
}

/// [`LimitResolver`] without an override.
pub fn resolve_limit(limit: Option<&Value>) -> u64 {
    LimitResolver::new().resolve(limit)
}

pub fn resolve_page(page: Option<&Value>) -> u64 {
    as_number(page)
        .map(clamp_min_one)
        .unwrap_or(DEFAULT_PAGE)
}

/// Numbers, and strings holding a finite number, are numeric. Everything
/// else (null, booleans, blank or non-numeric strings) is not.
fn as_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn clamp_min_one(n: f64) -> u64 {
    let n = n.trunc();
    if n < 1.0 {
        1
    } else if n >= u64::MAX as f64 {
        u64::MAX
    } else {
        n as u64
    }
}
