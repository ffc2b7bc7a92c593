use maud::{DOCTYPE, Markup, html};

mod components;

pub use components::{details_table, divider, list_section, loading, person_card, sheet};

use crate::GENERATOR;
use crate::build::options::SiteMeta;

pub struct SeoMeta {
    pub title: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub canonical_url: Option<String>,
}

impl SeoMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            keywords: Vec::new(),
            canonical_url: None,
        }
    }

    pub fn render(&self, site: &SiteMeta) -> Markup {
        let formatted_title = if self.title.is_empty() || self.title == site.name {
            site.name.clone()
        } else {
            format!("{} - {}", self.title, site.name)
        };

        let description = self.description.as_deref().unwrap_or(&site.description);

        let keywords: Vec<&str> = self
            .keywords
            .iter()
            .chain(site.keywords.iter())
            .map(String::as_str)
            .filter(|keyword| !keyword.is_empty())
            .collect();

        html! {
            title { (formatted_title) }
            meta name="description" content=(description);
            @if !keywords.is_empty() {
                meta name="keywords" content=(keywords.join(", "));
            }

            meta property="og:title" content=(formatted_title);
            meta property="og:description" content=(description);
            meta property="og:type" content="website";
            @if let Some(canonical_url) = &self.canonical_url {
                meta property="og:url" content=(canonical_url);
                link rel="canonical" href=(canonical_url);
            }
        }
    }
}

pub fn layout(main: Markup, site: &SiteMeta, seo: SeoMeta) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="generator" content=(GENERATOR);
                link rel="stylesheet" href="/style.css";
                (seo.render(site))
            }
            body {
                main."min-h-[85vh]" {
                    (main)
                }
                footer.footer {
                    p { (site.name) }
                }
            }
        }
    }
}

/// Page shown while a record is unavailable, including ids the service doesn't know.
pub fn loading_page(site: &SiteMeta) -> Markup {
    layout(loading(), site, SeoMeta::titled("Loading"))
}

/// Page shown when the data service can't be reached or answers with an error.
pub fn unavailable_page(site: &SiteMeta) -> Markup {
    layout(
        sheet(html! {
            h2.h2-heading."text-2xl".font-semibold { "Temporarily unavailable" }
            p."mt-3" { "This page can't be loaded right now. Please try again in a few minutes." }
        }),
        site,
        SeoMeta::titled("Unavailable"),
    )
}

pub fn not_found_page(site: &SiteMeta) -> Markup {
    layout(
        sheet(html! {
            h2.h2-heading."text-2xl".font-semibold { "Page not found" }
            p."mt-3" {
                "The page you are looking for does not exist. "
                a."hover:underline" href="/" { "Back to the home page" }
            }
        }),
        site,
        SeoMeta::titled("Not found"),
    )
}
