use maud::{Markup, html};

use crate::data::models::{Information, InvestigatorRole, Person};
use crate::sanitize::sanitize;

/// Placeholder shown instead of a record that isn't available (yet).
pub fn loading() -> Markup {
    html! {
        div.loading role="status" aria-live="polite" {
            span.spinner {}
            p { "Loading..." }
        }
    }
}

/// White card wrapping the content of a detail page.
pub fn sheet(content: Markup) -> Markup {
    html! {
        div.sheet."mx-auto"."max-w-5xl"."bg-white"."p-6" {
            (content)
        }
    }
}

pub fn divider() -> Markup {
    html! {
        hr.divider;
    }
}

/// Labeled, numbered list of HTML fragments. Renders nothing when `items` is empty.
pub fn list_section(name: &str, items: &[String]) -> Markup {
    html! {
        @if !items.is_empty() {
            li.list-section {
                strong { (name) ":" }
                ol."list-decimal"."pl-6" {
                    @for item in items {
                        li { (sanitize(item)) }
                    }
                }
            }
        }
    }
}

pub fn person_card(person: &Person, role: InvestigatorRole) -> Markup {
    html! {
        div.person-card {
            p.person-name."font-semibold" { (person.name) }
            div.person-designation { (sanitize(&person.designation)) }
            p.person-role."text-sm" { (role.label()) }
        }
    }
}

/// Two-column table of a project's details, every other row shaded.
pub fn details_table(informations: &[Information]) -> Markup {
    html! {
        @if !informations.is_empty() {
            table.details-table."w-full" {
                tbody {
                    @for (index, information) in informations.iter().enumerate() {
                        tr class=[(index % 2 == 0).then_some("bg-[#e4e4e4]")] {
                            th."p-2"."text-left" { (information.name) }
                            td."p-2" { (information.value) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str, designation: &str) -> Person {
        Person {
            name: name.to_string(),
            designation: designation.to_string(),
        }
    }

    #[test]
    fn test_list_section_empty_renders_nothing() {
        assert_eq!(list_section("Syllabus", &[]).into_string(), "");
    }

    #[test]
    fn test_list_section_sanitizes_items() {
        let items = vec![
            "<b>Unit 1</b>".to_string(),
            "<img src=x onerror=alert(1)>Unit 2".to_string(),
        ];
        let markup = list_section("Syllabus", &items).into_string();

        assert!(markup.contains("<strong>Syllabus:</strong>"));
        assert!(markup.contains("<li><b>Unit 1</b></li>"));
        assert!(markup.contains("Unit 2"));
        assert!(!markup.contains("onerror"));
        assert_eq!(markup.matches("<li>").count(), 2);
    }

    #[test]
    fn test_person_card() {
        let markup = person_card(
            &person("A. <i>Roy</i>", "Professor<br>CSE<script>x()</script>"),
            InvestigatorRole::FirstCoPrincipal,
        )
        .into_string();

        // Names are plain text, designations are markup.
        assert!(markup.contains("A. &lt;i&gt;Roy&lt;/i&gt;"));
        assert!(markup.contains("Professor<br>CSE"));
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("Co-Principal Investigator I<"));
    }

    #[test]
    fn test_details_table_shades_even_rows() {
        let informations: Vec<Information> = ["Duration", "Budget", "Status"]
            .iter()
            .map(|name| Information {
                name: name.to_string(),
                value: "x".to_string(),
            })
            .collect();

        let markup = details_table(&informations).into_string();

        assert_eq!(markup.matches("<tr").count(), 3);
        assert_eq!(markup.matches("bg-[#e4e4e4]").count(), 2);
        assert_eq!(details_table(&[]).into_string(), "");
    }

    #[test]
    fn test_loading() {
        assert!(loading().into_string().contains("Loading"));
    }
}
