use std::io::Write;
use std::ops::Range;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use blog_types::{Gender, RegisterUserBody};
use clap::{Args, Parser, Subcommand};

use crate::app::App;
use crate::browse;
use crate::composer::{Field, Format, TagRejection, CATEGORIES};
use crate::detail::DetailTab;
use crate::forms::ChangePasswordForm;
use crate::render;
use crate::routes::Route;

#[derive(Parser, Debug)]
#[command(name = "blogspace", version, about = "BlogSpace terminal client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the credential
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "other")]
        gender: Gender,
        #[arg(long, default_value = "")]
        about: String,
        #[arg(long)]
        profile_image: Option<PathBuf>,
    },
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    ChangePassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// List the home feed
    Feed,
    /// Show one post
    Show {
        id: String,
        #[arg(long, default_value_t = false)]
        related: bool,
    },
    Profile,
    /// Compose and publish a post
    Compose(ComposeArgs),
    /// List the post categories
    Categories,
    /// Interactive session
    Browse,
}

#[derive(Args, Debug)]
pub struct ComposeArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub subtitle: String,
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    #[arg(long)]
    pub category: String,
    /// Repeat for several tags
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub thumbnail: Option<PathBuf>,
    /// Overrides the profile name
    #[arg(long)]
    pub author: Option<String>,
    /// Markup over a character range of the content, e.g. `bold:6-11`
    #[arg(long = "format")]
    pub formats: Vec<FormatSpec>,
    /// Print the preview instead of publishing
    #[arg(long, default_value_t = false)]
    pub preview: bool,
}

/// `<kind>:<from>-<to>` argument of `compose --format`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatSpec {
    pub format: Format,
    pub range: Range<usize>,
}

impl FromStr for FormatSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let usage = || format!("expected <kind>:<from>-<to>, got '{}'", s);
        let (kind, span) = s.split_once(':').ok_or_else(usage)?;
        let (from, to) = span.split_once('-').ok_or_else(usage)?;
        let format = kind.parse::<Format>().map_err(|e| e.to_string())?;
        let from = from.trim().parse().map_err(|_| usage())?;
        let to = to.trim().parse().map_err(|_| usage())?;
        Ok(FormatSpec {
            format,
            range: from..to,
        })
    }
}

/// Run one command, writing views and notices to `out`
///
/// Returns `false` when the command did not reach its goal (a refused
/// route, a failed request or a rejected form).
pub async fn execute<W: Write>(command: Option<Command>, app: &App, out: &mut W) -> Result<bool> {
    let ok = match command {
        None => {
            let route = app.landing()?;
            writeln!(out, "{}", route)?;
            true
        }
        Some(Command::Login { email, password }) => match app.login(&email, &password).await {
            Some(route) => {
                writeln!(out, "Redirected to {}", route)?;
                true
            }
            None => false,
        },
        Some(Command::Logout) => {
            let route = app.logout().await;
            writeln!(out, "Redirected to {}", route)?;
            true
        }
        Some(Command::Register {
            name,
            email,
            password,
            gender,
            about,
            profile_image,
        }) => {
            let body = RegisterUserBody {
                name,
                email,
                password,
                gender,
                about,
                profile_image,
            };
            print_route(app.register(&body).await, out)?
        }
        Some(Command::VerifyOtp { email, otp }) => print_route(app.verify_otp(&email, &otp).await, out)?,
        Some(Command::ChangePassword {
            email,
            new_password,
            confirm_password,
        }) => {
            let mut form = ChangePasswordForm::for_email(&email);
            form.new_password = new_password;
            form.confirm_password = confirm_password;
            let route = app.change_password(&mut form).await;
            if !form.error.is_empty() {
                writeln!(out, "{}", form.error)?;
            }
            print_route(route, out)?
        }
        Some(Command::Feed) => match app.feed().await {
            Some(posts) => {
                writeln!(out, "{}", render::feed(&posts))?;
                true
            }
            None => false,
        },
        Some(Command::Show { id, related }) => match app.post_view(&id).await {
            Some(Some(mut view)) => {
                if related {
                    view.select_tab(DetailTab::Related);
                    // Warm the cache so the related tab has candidates
                    let _ = app.feed().await;
                }
                let candidates = app.related_candidates().await;
                writeln!(out, "{}", render::detail(&view, &candidates))?;
                true
            }
            Some(None) => {
                writeln!(out, "{}", render::not_found())?;
                false
            }
            None => false,
        },
        Some(Command::Profile) => match app.profile().await {
            Some(user) => {
                writeln!(out, "{}", render::profile(&user))?;
                true
            }
            None => false,
        },
        Some(Command::Compose(args)) => compose(args, app, out).await?,
        Some(Command::Categories) => {
            for category in CATEGORIES {
                writeln!(out, "{}", category)?;
            }
            true
        }
        Some(Command::Browse) => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            browse::run(app, stdin, out).await?;
            true
        }
    };

    for notice in app.notifier().drain() {
        writeln!(out, "{}", notice)?;
    }
    Ok(ok)
}

fn print_route<W: Write>(route: Option<Route>, out: &mut W) -> Result<bool> {
    match route {
        Some(route) => {
            writeln!(out, "Redirected to {}", route)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

async fn compose<W: Write>(args: ComposeArgs, app: &App, out: &mut W) -> Result<bool> {
    let Some(mut composer) = app.start_composer().await else {
        return Ok(false);
    };

    let content = match (&args.content, &args.content_file) {
        (_, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading content from {}", path.display()))?,
        (Some(text), None) => text.clone(),
        (None, None) => String::new(),
    };

    composer.set_field(Field::Title, args.title);
    composer.set_field(Field::Subtitle, args.subtitle);
    composer.set_field(Field::Content, content);
    if let Some(author) = args.author {
        composer.set_field(Field::Author, author);
    }
    for spec in args.formats {
        composer.apply_format(spec.format, spec.range);
    }
    if let Err(e) = composer.select_category(&args.category) {
        app.notifier().error(e.notice_message());
    }
    for tag in args.tags {
        composer.tag_input = tag;
        if composer.add_tag() == Err(TagRejection::LimitReached) {
            app.notifier().info("Tag limit reached, remaining tags skipped");
            break;
        }
    }
    if let Some(path) = &args.thumbnail {
        composer.attach_thumbnail(path, app.notifier());
    }

    if args.preview {
        composer.toggle_preview();
        writeln!(out, "{}", composer.render_preview())?;
        return Ok(true);
    }

    Ok(app.publish(&mut composer).await)
}
