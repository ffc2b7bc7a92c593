use maud::{Markup, html};

use crate::data::ProjectDetails;
use crate::errors::FetchError;
use crate::layout::{SeoMeta, details_table, divider, layout, loading_page, person_card, sheet};
use crate::route::{DynamicRouteContext, PageContext, PageParams, Pages, Route};
use crate::sanitize::{sanitize, to_plain_text};

/// Detail page of a research project, with its publications and investigators.
pub struct ProjectPage;

impl Route for ProjectPage {
    fn route_raw(&self) -> &'static str {
        "/projects/[id]/"
    }

    fn pages(&self, ctx: &DynamicRouteContext) -> Result<Pages, FetchError> {
        Ok(ctx
            .source
            .project_ids()?
            .iter()
            .map(PageParams::from_id)
            .collect())
    }

    fn render(&self, ctx: &PageContext) -> Result<Markup, FetchError> {
        let Some(id) = ctx.record_id() else {
            return Ok(loading_page(ctx.site));
        };

        let Some(details) = ctx.source.project(&id)? else {
            return Ok(loading_page(ctx.site));
        };

        let seo = SeoMeta {
            canonical_url: ctx.canonical_url(),
            ..SeoMeta::titled(to_plain_text(&details.project.title))
        };

        Ok(layout(project_details(&details), ctx.site, seo))
    }
}

fn project_details(details: &ProjectDetails) -> Markup {
    let project = &details.project;

    sheet(html! {
        h1.h1-heading."text-3xl".font-bold { (sanitize(&project.title)) }

        @if let Some(image_url) = project.image_url() {
            img.project-image."mt-4" src=(image_url) alt=(to_plain_text(&project.title));
        }

        section.project-description {
            h2.h2-heading."text-2xl".font-semibold { "Description" }
            div.description { (sanitize(&project.description)) }
        }

        (divider())

        @if !project.informations.is_empty() {
            section.project-details {
                h2.h2-heading."text-2xl".font-semibold { "Details" }
                (details_table(&project.informations))
            }

            (divider())
        }

        section.project-publications {
            h2.h2-heading."text-2xl".font-semibold { "Publications" }
            ul.publications {
                @for publication in &details.publications {
                    li { (sanitize(&publication.citation_html())) }
                }
            }
        }

        @let investigators = project.investigators();
        @if !investigators.is_empty() {
            (divider())
            section.project-investigators {
                @for (role, person) in investigators {
                    (person_card(person, role))
                }
            }
        }

        @if let Some(sponsor) = project.category.sponsor() {
            (divider())
            section.project-sponsor {
                h2.h2-heading."text-2xl".font-semibold { "Sponsored by" }
                img.sponsor-logo src=(sponsor.image_url) alt=(sponsor.alt);
            }
        }
    })
}
