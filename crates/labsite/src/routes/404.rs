use maud::Markup;

use crate::errors::FetchError;
use crate::layout::not_found_page;
use crate::route::{PageContext, Route};

pub struct NotFound;

impl Route for NotFound {
    fn route_raw(&self) -> &'static str {
        "/404.html"
    }

    fn render(&self, ctx: &PageContext) -> Result<Markup, FetchError> {
        Ok(not_found_page(ctx.site))
    }
}
