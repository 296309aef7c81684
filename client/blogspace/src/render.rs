//! Plain-text rendering of the feed, detail and profile views

use std::fmt::Write;

use blog_types::{Post, User};

use crate::detail::{DetailTab, PostView, MAX_COMMENT_CHARS};

const RELATED_LIMIT: usize = 6;

pub fn feed(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "No posts yet.".to_string();
    }

    let mut out = String::new();
    for (idx, post) in posts.iter().enumerate() {
        let (date, _) = post.created_parts();
        let _ = writeln!(out, "{:>3}. {}", idx + 1, post.title);
        if !post.subtitle.is_empty() {
            let _ = writeln!(out, "     {}", post.subtitle);
        }
        let _ = writeln!(
            out,
            "     by {} · {} · {} · ♥ {} · 💬 {} · id {}",
            post.author.name,
            post.category,
            date,
            post.likes,
            post.comments.len(),
            post.id
        );
    }
    out.trim_end().to_string()
}

/// Detail view; `related` is the candidate list for the related tab
pub fn detail(view: &PostView, related: &[Post]) -> String {
    let post = &view.post;
    let (date, time) = post.created_parts();
    let mut out = String::new();

    let _ = writeln!(out, "[{}] {} {}", post.category, date, time);
    let _ = writeln!(out, "{}", post.title);
    if !post.subtitle.is_empty() {
        let _ = writeln!(out, "{}", post.subtitle);
    }
    let _ = writeln!(
        out,
        "by {} · {} {} · {}",
        post.author.name,
        if view.liked { "♥" } else { "♡" },
        view.display_likes(),
        if view.bookmarked { "bookmarked" } else { "not bookmarked" }
    );
    if !post.thumbnail.is_empty() {
        let _ = writeln!(out, "[featured image] {}", post.thumbnail);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", strip_markup(&post.content));

    if !post.tags.is_empty() {
        let _ = writeln!(out);
        let tags: Vec<String> = post.tags.iter().map(|t| format!("#{}", t)).collect();
        let _ = writeln!(out, "{}", tags.join(" "));
    }

    let _ = writeln!(out);
    match view.active_tab {
        DetailTab::Comments => {
            let _ = writeln!(out, "Comments ({})", post.comments.len());
            if post.comments.is_empty() {
                let _ = writeln!(out, "  No comments yet. Be the first to share your thoughts!");
            }
            for (idx, comment) in post.comments.iter().enumerate() {
                let badge = if idx == 0 { " [Author]" } else { "" };
                let _ = writeln!(
                    out,
                    "  {}{} · {}\n    {}",
                    comment.user.name, badge, comment.create_at, comment.msg
                );
            }
            if !view.comment_draft.is_empty() {
                let _ = writeln!(
                    out,
                    "  draft: {} ({}/{} characters)",
                    view.comment_draft,
                    view.comment_draft.chars().count(),
                    MAX_COMMENT_CHARS
                );
            }
        }
        DetailTab::Related => {
            let _ = writeln!(out, "Related Articles");
            let mut shown = 0;
            for other in related
                .iter()
                .filter(|p| p.id != post.id && p.category == post.category)
                .take(RELATED_LIMIT)
            {
                let _ = writeln!(out, "  - {} (id {})", other.title, other.id);
                shown += 1;
            }
            if shown == 0 {
                let _ = writeln!(out, "  Nothing related yet.");
            }
        }
    }

    out.trim_end().to_string()
}

pub fn not_found() -> String {
    "Blog not found. Browse the feed to find another article.".to_string()
}

pub fn profile(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", user.display_name());
    let _ = writeln!(out, "email:  {}", user.email);
    if !user.gender.is_empty() {
        let _ = writeln!(out, "gender: {}", user.gender);
    }
    if !user.about.is_empty() {
        let _ = writeln!(out, "about:  {}", user.about);
    }
    if !user.profile_image.is_empty() {
        let _ = writeln!(out, "image:  {}", user.profile_image);
    }
    out.trim_end().to_string()
}

/// Drop HTML tags and decode the handful of entities rich-text editors emit
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut tag = String::new();

    for ch in html.chars() {
        match (in_tag, ch) {
            (false, '<') => {
                in_tag = true;
                tag.clear();
            }
            (true, '>') => {
                in_tag = false;
                if breaks_line(&tag) {
                    text.push('\n');
                }
            }
            (true, c) => tag.push(c),
            (false, c) => text.push(c),
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let lines: Vec<&str> = decoded.lines().map(str::trim_end).collect();
    let mut collapsed: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() && collapsed.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        collapsed.push(line);
    }
    collapsed.join("\n").trim().to_string()
}

/// `<br>` and the end of a block element start a new line
fn breaks_line(tag: &str) -> bool {
    let closing = tag.starts_with('/');
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match name.as_str() {
        "br" => true,
        "p" | "div" | "li" => closing,
        _ => false,
    }
}
