//! Comment command

use anyhow::Result;
use std::path::PathBuf;

use crate::cli::commands::drive;
use crate::cli::output::{OutputFormat, first_modal, print_formatted};
use crate::comment::{CommentDraft, ImageAttachment};
use crate::config::Config;
use crate::session::{Session, SessionEvent};
use crate::state::StateEvent;

#[derive(Debug)]
pub struct CommentArgs {
    pub post: u64,
    pub text: String,
    pub parent: Option<u64>,
    pub image_url: Option<String>,
    pub image: Option<PathBuf>,
}

pub async fn run(args: CommentArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.notifications.enabled = false;
    let messages = config.client.locale.messages();

    let mut draft = CommentDraft::new(args.post, args.text);
    if let Some(parent) = args.parent {
        draft = draft.reply_to(parent);
    }
    if let Some(url) = args.image_url {
        draft = draft.with_image_url(url);
    }
    if let Some(path) = args.image {
        let image = ImageAttachment::from_path(&path)
            .await
            .map_err(|e| anyhow::anyhow!(e.localized(messages)))?;
        draft = draft.with_image(image);
    }
    // Fail on an empty comment before touching the network
    draft
        .to_request()
        .map_err(|e| anyhow::anyhow!(e.localized(messages)))?;

    let mut session = Session::new(config)?;

    // Comments are posted without a page, so the token comes from the cookie
    session.push(SessionEvent::Comment(draft));
    let events = drive(&mut session).await;

    if let Some(message) = first_modal(&events) {
        anyhow::bail!("{}", message);
    }
    let posted = events.iter().find_map(|e| match e {
        StateEvent::CommentPosted(response) => Some(response.clone()),
        _ => None,
    });
    let Some(posted) = posted else {
        anyhow::bail!("No answer for the comment");
    };

    if quiet && format == OutputFormat::Text {
        return Ok(());
    }
    print_formatted(&posted, format, |r| match r.comment_id {
        Some(id) => format!("{} (#{})", r.summary(messages), id),
        None => r.summary(messages),
    });
    Ok(())
}
