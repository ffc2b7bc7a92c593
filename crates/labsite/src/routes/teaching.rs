use maud::{Markup, html};

use crate::data::TeachingRecord;
use crate::errors::FetchError;
use crate::layout::{SeoMeta, layout, list_section, loading_page, sheet};
use crate::route::{DynamicRouteContext, PageContext, PageParams, Pages, Route};
use crate::sanitize::sanitize;

/// Course page: credits, routine, attendance rule and the course material lists.
pub struct TeachingPage;

impl Route for TeachingPage {
    fn route_raw(&self) -> &'static str {
        "/teaching/[id]/"
    }

    fn pages(&self, ctx: &DynamicRouteContext) -> Result<Pages, FetchError> {
        Ok(ctx
            .source
            .teaching_ids()?
            .iter()
            .map(PageParams::from_id)
            .collect())
    }

    fn render(&self, ctx: &PageContext) -> Result<Markup, FetchError> {
        let Some(id) = ctx.record_id() else {
            return Ok(loading_page(ctx.site));
        };

        let Some(record) = ctx.source.teaching(&id)? else {
            return Ok(loading_page(ctx.site));
        };

        let seo = SeoMeta {
            keywords: vec![record.title.clone()],
            canonical_url: ctx.canonical_url(),
            ..SeoMeta::titled(record.title.clone())
        };

        Ok(layout(course_details(&record), ctx.site, seo))
    }
}

fn course_details(record: &TeachingRecord) -> Markup {
    sheet(html! {
        h2.h2-heading."text-2xl".font-semibold { (record.title) }

        ul.course."list-disc"."mt-6" {
            li {
                strong { "Credit points:" } " "
                @if let Some(credit_points) = &record.credit_points {
                    (credit_points)
                }
            }
            li {
                strong { "Session:" } " " (record.session)
            }
            li {
                strong { "Routine:" }
                ol.routine."list-decimal" {
                    @for slot in &record.routine {
                        li { (slot) }
                    }
                }
            }

            p.attention."text-rose-600/80" {
                strong { "Attention: " }
                "Students having attendance below " (record.attendance_threshold())
                "% will not be allowed to appear in Semester Exam."
            }

            li {
                strong { "Course description:" }
                div.description { (sanitize(&record.course_description)) }
            }

            @for (name, items) in record.sections() {
                (list_section(name, items))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::options::SiteMeta;
    use crate::data::MemorySource;

    fn record(json: &str) -> TeachingRecord {
        serde_json::from_str(json).unwrap()
    }

    fn render(source: &MemorySource, id: &str, site: &SiteMeta) -> String {
        let params = PageParams::from_iter([("id".to_string(), id.to_string())]);
        let path = format!("/teaching/{id}/");
        let ctx = PageContext {
            params: &params,
            source,
            current_path: &path,
            base_url: None,
            site,
        };

        TeachingPage.render(&ctx).unwrap().into_string()
    }

    fn source() -> MemorySource {
        MemorySource::new().with_teaching(record(
            r#"{
                "_id": "t1",
                "title": "Machine Learning",
                "creditPoints": 4,
                "session": "2024-25 Odd",
                "routine": ["Mon 10:00", "Thu 14:00"],
                "attendancePercentage": "75%",
                "courseDescription": "<p>Intro</p><img src=x onerror=alert(1)>",
                "syllabus": ["<b>Regression</b>", "Trees"],
                "prerequisites": null
            }"#,
        ))
    }

    #[test]
    fn test_render_course() {
        let page = render(&source(), "t1", &SiteMeta::default());

        assert!(page.contains("Machine Learning</h2>"));
        assert!(page.contains("<strong>Credit points:</strong> 4"));
        assert!(page.contains("<strong>Session:</strong> 2024-25 Odd"));
        assert!(page.contains("<li>Mon 10:00</li><li>Thu 14:00</li>"));
        assert!(page.contains("<p>Intro</p>"));
        assert!(!page.contains("onerror"));
    }

    #[test]
    fn test_attendance_threshold() {
        let page = render(&source(), "t1", &SiteMeta::default());

        assert!(page.contains("Students having attendance below 75% will not be allowed"));
    }

    #[test]
    fn test_only_non_empty_sections_render() {
        let page = render(&source(), "t1", &SiteMeta::default());

        assert!(page.contains("<strong>Syllabus:</strong>"));
        assert!(page.contains("<li><b>Regression</b></li>"));
        assert!(!page.contains("Prerequisites"));
        assert!(!page.contains("Course objectives"));
        assert!(!page.contains("Miscellaneous"));
    }

    #[test]
    fn test_keywords_start_with_course_title() {
        let site = SiteMeta {
            keywords: vec!["Research".to_string(), "ISRO".to_string()],
            ..SiteMeta::default()
        };
        let page = render(&source(), "t1", &site);

        assert!(page.contains("<title>Machine Learning - Research Lab</title>"));
        assert!(page.contains("content=\"Machine Learning, Research, ISRO\""));
    }

    #[test]
    fn test_unknown_id_renders_loading() {
        let page = render(&source(), "t2", &SiteMeta::default());

        assert!(page.contains("Loading..."));
        assert!(!page.contains("Machine Learning"));
    }
}
