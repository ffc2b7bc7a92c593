//! Raw route patterns, e.g. `/projects/[id]/`.
//!
//! A pattern is a URL path where each `[name]` segment is a parameter. `\[` and `\]` are literal brackets.
use std::path::Path;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RouteType {
    Static,
    Dynamic,
}

/// A `[key]` parameter found in a raw pattern, with the byte range it covers (brackets included).
#[derive(Debug, PartialEq, Eq)]
pub struct ParameterDef {
    pub(crate) key: String,
    pub(crate) index: usize,
    pub(crate) length: usize,
}

impl ParameterDef {
    pub fn key(&self) -> &str {
        &self.key
    }

    fn end(&self) -> usize {
        self.index + self.length
    }
}

pub fn parse_route_params(raw_route: &str) -> Vec<ParameterDef> {
    let mut params = Vec::new();
    let mut open: Option<usize> = None;
    let mut escaped = false;

    for (index, c) in raw_route.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' if open.is_none() => open = Some(index),
            ']' => {
                if let Some(start) = open.take() {
                    params.push(ParameterDef {
                        key: raw_route[start + 1..index].to_string(),
                        index: start,
                        length: index - start + 1,
                    });
                }
            }
            _ => {}
        }
    }

    params
}

pub fn route_type(params_def: &[ParameterDef]) -> RouteType {
    match params_def {
        [] => RouteType::Static,
        _ => RouteType::Dynamic,
    }
}

/// A pattern with a file extension (`/404.html`) is written as that file rather than as a directory index.
pub fn is_endpoint_route(raw_route: &str) -> bool {
    Path::new(raw_route).extension().is_some()
}

/// Rewrites `[key]` parameters as `{key}`, the capture syntax of the HTTP router.
///
/// Escaped brackets lose their backslash.
pub fn to_path_template(raw_route: &str) -> String {
    let mut template = String::with_capacity(raw_route.len());
    let mut copied_up_to = 0;

    for param_def in parse_route_params(raw_route) {
        template.push_str(&raw_route[copied_up_to..param_def.index]);
        template.push('{');
        template.push_str(param_def.key());
        template.push('}');
        copied_up_to = param_def.end();
    }
    template.push_str(&raw_route[copied_up_to..]);

    template.replace("\\[", "[").replace("\\]", "]")
}
