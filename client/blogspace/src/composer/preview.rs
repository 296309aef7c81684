use chrono::NaiveDate;

use super::PostComposer;

/// Text rendering of the form as it would be published; empty fields are
/// skipped
pub(super) fn render(form: &PostComposer, today: NaiveDate) -> String {
    let mut out = Vec::new();

    if !form.thumbnail.is_empty() {
        out.push(format!("[thumbnail] {}", form.thumbnail));
    }
    if !form.category.is_empty() {
        out.push(format!("[{}]", form.category));
    }
    if !form.title.is_empty() {
        out.push(form.title.clone());
        out.push("=".repeat(form.title.chars().count()));
    }
    if !form.subtitle.is_empty() {
        out.push(form.subtitle.clone());
    }

    let author = if form.author.is_empty() {
        "Anonymous"
    } else {
        form.author.as_str()
    };
    out.push(format!("By {} · {}", author, today.format("%B %-d, %Y")));

    if !form.content.is_empty() {
        out.push(String::new());
        out.push(form.content.clone());
    }
    if !form.tags.is_empty() {
        out.push(String::new());
        out.push(
            form.tags
                .iter()
                .map(|tag| format!("#{}", tag))
                .collect::<Vec<_>>()
                .join(" "),
        );
    }

    out.join("\n")
}
