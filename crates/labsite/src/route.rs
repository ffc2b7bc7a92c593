//! Core traits and structs to define the pages of the site.
//!
//! Every page implements [`Route`]. The same implementation is used to pre-render pages during a
//! [`build`](crate::build()) and to render them on request.
use std::path::{Path, PathBuf};

use maud::Markup;
use rustc_hash::FxHashMap;

use crate::build::options::SiteMeta;
use crate::data::DataSource;
use crate::errors::FetchError;
use crate::id::RecordId;
use crate::routing::{ParameterDef, RouteType, is_endpoint_route, parse_route_params, route_type};

/// Values of a route's bracketed parameters, keyed by parameter name.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct PageParams(pub FxHashMap<String, String>);

impl PageParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Params for a route with a single `[id]` parameter.
    pub fn from_id(id: &RecordId) -> Self {
        Self::from_iter([("id".to_string(), id.to_string())])
    }
}

impl FromIterator<(String, String)> for PageParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        PageParams(iter.into_iter().collect())
    }
}

pub type Pages = Vec<PageParams>;

/// Everything a route can use while rendering one page.
pub struct PageContext<'a> {
    pub params: &'a PageParams,
    pub source: &'a dyn DataSource,
    /// The path being rendered, e.g. `/projects/65a1f0/`.
    pub current_path: &'a str,
    /// The base URL as defined in [`BuildOptions::base_url`](crate::BuildOptions::base_url).
    pub base_url: Option<&'a str>,
    pub site: &'a SiteMeta,
}

impl PageContext<'_> {
    /// Returns the canonical URL for the current page, `None` without a base URL.
    pub fn canonical_url(&self) -> Option<String> {
        self.base_url
            .map(|base| format!("{}{}", base.trim_end_matches('/'), self.current_path))
    }

    /// The `[id]` parameter as a record id. `None` when it is missing or can't be a valid id.
    pub fn record_id(&self) -> Option<RecordId> {
        self.params
            .get("id")
            .and_then(|raw| RecordId::parse(raw).ok())
    }
}

/// Allows to access the data source in the [`Route::pages`] method.
pub struct DynamicRouteContext<'a> {
    pub source: &'a dyn DataSource,
}

/// Must be implemented for every page of the site.
///
/// Dynamic routes (with a `[param]` in their pattern) list their pages through [`Route::pages`].
pub trait Route: Send + Sync {
    /// Raw route pattern, e.g. `/projects/[id]/`.
    fn route_raw(&self) -> &'static str;

    fn pages(&self, _ctx: &DynamicRouteContext) -> Result<Pages, FetchError> {
        Ok(Vec::new())
    }

    fn render(&self, ctx: &PageContext) -> Result<Markup, FetchError>;
}

/// Derived information about a route, available on every [`Route`].
pub trait RouteExt: Route {
    fn route_type(&self) -> RouteType {
        route_type(&parse_route_params(self.route_raw()))
    }

    fn is_endpoint(&self) -> bool {
        is_endpoint_route(self.route_raw())
    }

    /// Public URL of the page with the given parameters.
    ///
    /// Only builds the URL from the pattern, it does not check that the page exists.
    fn url(&self, params: &PageParams) -> String {
        let route = self.route_raw();
        let params_def = parse_route_params(route);
        build_url_with_params(route, &params_def, params, self.is_endpoint())
    }

    fn file_path(&self, params: &PageParams, output_dir: &Path) -> PathBuf {
        let route = self.route_raw();
        let params_def = parse_route_params(route);
        build_file_path_with_params(route, &params_def, params, output_dir, self.is_endpoint())
    }
}

impl<R: Route + ?Sized> RouteExt for R {}

fn substitute_params(route_template: &str, params_def: &[ParameterDef], params: &PageParams) -> String {
    let mut result = route_template.to_string();

    // Replace from the end so earlier indices stay valid.
    for param_def in params_def.iter().rev() {
        let value = params.get(&param_def.key).unwrap_or_else(|| {
            panic!(
                "Route {:?} is missing parameter {:?}",
                route_template, param_def.key
            )
        });

        result.replace_range(param_def.index..param_def.index + param_def.length, value);
    }

    result
}

fn build_url_with_params(
    route_template: &str,
    params_def: &[ParameterDef],
    params: &PageParams,
    is_endpoint: bool,
) -> String {
    if params_def.is_empty() {
        return route_template.to_string();
    }

    let result = substitute_params(route_template, params_def, params);

    // Collapse consecutive slashes
    let parts: Vec<&str> = result.split('/').filter(|s| !s.is_empty()).collect();
    let mut result = format!("/{}", parts.join("/"));

    if !is_endpoint && !result.ends_with('/') {
        result.push('/');
    }

    result
}

fn build_file_path_with_params(
    route_template: &str,
    params_def: &[ParameterDef],
    params: &PageParams,
    output_dir: &Path,
    is_endpoint: bool,
) -> PathBuf {
    let route = substitute_params(route_template, params_def, params);

    let mut path = PathBuf::from(output_dir);
    path.extend(route.split('/').filter(|s| !s.is_empty()));

    if !is_endpoint {
        path.push("index.html");
    }

    path
}
