//! Interactive session
//!
//! Reads one command per line and keeps the feed, the open post and the
//! composer between commands, so the entity cache is shared across views.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use blog_types::Post;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::app::App;
use crate::composer::{Field, Format, PostComposer, TagRejection, CATEGORIES, MAX_TAGS};
use crate::detail::{DetailTab, PostView};
use crate::render;
use crate::routes::Route;

const HELP: &str = "\
feed                      show the home feed
open <n|id>               open a post by feed number or id
like | bookmark           toggle on the open post
comment <text>            post a comment on the open post
share                     print the open post's link
tab [comments|related]    switch the detail tab
back                      return to the feed
profile                   show your profile
new                       start a new post
set <field> <text>        title, subtitle, content or author
tag <name> | untag <name> edit the tag list
category <name>           choose the category
format <kind> <from> <to> bold, italic, list or link over a char range
thumbnail <path>          attach the cover image
preview                   toggle the preview
publish | cancel          finish the post
logout | quit";

#[derive(Default)]
struct Session {
    route: Option<Route>,
    feed: Vec<Post>,
    view: Option<PostView>,
    composer: Option<PostComposer>,
}

/// Run until `quit`, `logout` or end of input
pub async fn run<R, W>(app: &App, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = Session::default();
    match app.landing()? {
        Route::Home => {
            show_feed(app, &mut session, out).await?;
            flush_notices(app, out)?;
        }
        other => {
            writeln!(out, "Redirected to {}. Run `blogspace login` first.", other)?;
            return Ok(());
        }
    }

    let mut lines = input.lines();
    loop {
        write!(out, "{}> ", prompt(&session))?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        debug!(command, "Browse command");

        let keep_going = dispatch(app, &mut session, command, rest, out).await?;
        flush_notices(app, out)?;
        if !keep_going {
            break;
        }
    }
    Ok(())
}

fn prompt(session: &Session) -> String {
    session
        .route
        .as_ref()
        .map(Route::path)
        .unwrap_or_else(|| "/".to_string())
}

async fn dispatch<W: Write>(
    app: &App,
    session: &mut Session,
    command: &str,
    rest: &str,
    out: &mut W,
) -> Result<bool> {
    match command {
        "help" | "?" => writeln!(out, "{}", HELP)?,
        "feed" | "back" => show_feed(app, session, out).await?,
        "open" => open_post(app, session, rest, out).await?,
        "like" => with_view(session, out, |view| {
            view.toggle_like();
        })?,
        "bookmark" => with_view(session, out, |view| {
            view.toggle_bookmark();
        })?,
        "comment" => {
            let notifier = app.notifier().clone();
            with_view(session, out, |view| {
                view.set_comment_draft(rest);
                view.submit_comment(&notifier);
            })?
        }
        "share" => {
            if let Some(view) = &session.view {
                let link = view.share_link(&app.config().web.base_url, app.notifier());
                writeln!(out, "{}", link)?;
            } else {
                writeln!(out, "Open a post first")?;
            }
        }
        "tab" => with_view(session, out, |view| {
            let tab = match rest {
                "comments" => DetailTab::Comments,
                "related" => DetailTab::Related,
                _ if view.active_tab == DetailTab::Comments => DetailTab::Related,
                _ => DetailTab::Comments,
            };
            view.select_tab(tab);
        })?,
        "profile" => {
            if let Some(user) = app.profile().await {
                writeln!(out, "{}", render::profile(&user))?;
            }
        }
        "new" => {
            if let Some(composer) = app.start_composer().await {
                session.composer = Some(composer);
                session.view = None;
                session.route = Some(Route::AddBlog);
                writeln!(out, "Composing a new post. Categories: {}", CATEGORIES.join(", "))?;
            }
        }
        "set" | "tag" | "untag" | "category" | "format" | "thumbnail" | "preview" => {
            match session.composer.as_mut() {
                Some(composer) => edit_composer(app, composer, command, rest, out)?,
                None => writeln!(out, "Start a post with `new` first")?,
            }
        }
        "publish" => match session.composer.as_mut() {
            Some(composer) => {
                if app.publish(composer).await {
                    session.composer = None;
                    show_feed(app, session, out).await?;
                }
            }
            None => writeln!(out, "Nothing to publish")?,
        },
        "cancel" => {
            session.composer = None;
            show_feed(app, session, out).await?;
        }
        "logout" => {
            let route = app.logout().await;
            writeln!(out, "Signed out, redirected to {}", route)?;
            return Ok(false);
        }
        "quit" | "exit" => return Ok(false),
        other => writeln!(out, "Unknown command '{}', try `help`", other)?,
    }
    Ok(true)
}

async fn show_feed<W: Write>(app: &App, session: &mut Session, out: &mut W) -> Result<()> {
    if let Some(posts) = app.feed().await {
        writeln!(out, "{}", render::feed(&posts))?;
        session.feed = posts;
    }
    session.view = None;
    session.route = Some(Route::Home);
    Ok(())
}

async fn open_post<W: Write>(
    app: &App,
    session: &mut Session,
    target: &str,
    out: &mut W,
) -> Result<()> {
    if target.is_empty() {
        writeln!(out, "Usage: open <n|id>")?;
        return Ok(());
    }

    // Feed numbers are 1-based; anything else is taken as an id
    let id = match target.parse::<usize>() {
        Ok(n) if n >= 1 && n <= session.feed.len() => session.feed[n - 1].id.clone(),
        _ => target.to_string(),
    };

    let Some(view) = app.post_view(&id).await else {
        return Ok(());
    };
    session.route = Some(Route::BlogDetail { id });
    match view {
        Some(view) => {
            let related = app.related_candidates().await;
            writeln!(out, "{}", render::detail(&view, &related))?;
            session.view = Some(view);
        }
        None => {
            writeln!(out, "{}", render::not_found())?;
            session.view = None;
        }
    }
    Ok(())
}

/// Apply `action` to the open post and re-render it
fn with_view<W, F>(session: &mut Session, out: &mut W, action: F) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut PostView),
{
    match session.view.as_mut() {
        Some(view) => {
            action(view);
            writeln!(out, "{}", render::detail(view, &session.feed))?;
        }
        None => writeln!(out, "Open a post first")?,
    }
    Ok(())
}

fn edit_composer<W: Write>(
    app: &App,
    composer: &mut PostComposer,
    command: &str,
    rest: &str,
    out: &mut W,
) -> Result<()> {
    match command {
        "set" => {
            let (name, value) = rest.split_once(' ').unwrap_or((rest, ""));
            match name.parse::<Field>() {
                Ok(field) => composer.set_field(field, value.replace("\\n", "\n")),
                Err(e) => app.notifier().error(e.notice_message()),
            }
        }
        "tag" => {
            composer.tag_input = rest.to_string();
            match composer.add_tag() {
                Ok(()) => {}
                Err(TagRejection::LimitReached) => app
                    .notifier()
                    .error(format!("A post can have at most {} tags", MAX_TAGS)),
                Err(TagRejection::Duplicate) => app.notifier().info("Tag already added"),
                Err(TagRejection::Empty) => {}
            }
        }
        "untag" => composer.remove_tag(&rest.to_lowercase()),
        "category" => {
            if let Err(e) = composer.select_category(rest) {
                app.notifier().error(e.notice_message());
            }
        }
        "format" => {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            let parsed = match parts.as_slice() {
                [kind, from, to] => kind
                    .parse::<Format>()
                    .ok()
                    .zip(from.parse::<usize>().ok())
                    .zip(to.parse::<usize>().ok())
                    .map(|((format, from), to)| (format, from..to)),
                _ => None,
            };
            match parsed {
                Some((format, range)) => {
                    let cursor = composer.apply_format(format, range);
                    writeln!(out, "cursor at {}", cursor)?;
                }
                None => writeln!(out, "Usage: format <bold|italic|list|link> <from> <to>")?,
            }
        }
        "thumbnail" => {
            composer.attach_thumbnail(Path::new(rest), app.notifier());
        }
        "preview" => {
            if composer.toggle_preview() {
                writeln!(out, "{}", composer.render_preview())?;
                return Ok(());
            }
        }
        _ => {}
    }

    writeln!(
        out,
        "title: {} | category: {} | tags: {} | thumbnail: {}",
        composer.title,
        composer.category,
        composer.tags.join(", "),
        if composer.thumbnail.is_empty() { "none" } else { "attached" }
    )?;
    Ok(())
}

fn flush_notices<W: Write>(app: &App, out: &mut W) -> Result<()> {
    for notice in app.notifier().drain() {
        writeln!(out, "{}", notice)?;
    }
    Ok(())
}
