//! One handler per subcommand. Everything runs against a single
//! [`ContentStore`] owned by `main`.

use crate::cli::{Command, MessagesCommand, PublishArgs, UploadArgs};
use anyhow::{bail, Context};
use configs::Settings;
use domains::views::{filter_messages, group_branches_by_city, unread_count, MessageFilter};
use domains::{ContentDocument, ImageList, MessageDraft};
use secrecy::ExposeSecret;
use serde::Serialize;
use services::{AssetPipeline, ContentStore, SyncStatus};
use std::path::Path;
use tracing::info;

pub async fn run(command: Command, settings: &Settings, store: &mut ContentStore) -> anyhow::Result<()> {
    match command {
        Command::Show { section } => {
            store.fetch().await;
            show(store, section.as_deref())
        }
        Command::Seed => {
            // Built-in content as-is; fetching first would overwrite it.
            sign_in(store, settings).await?;
            publish_now(store).await
        }
        Command::Import { file, publish } => {
            store.fetch().await;
            import(store, &file).await?;
            finish(store, settings, publish).await
        }
        Command::Upload(args) => {
            store.fetch().await;
            upload(store, settings, &args).await?;
            finish(store, settings, args.publish).await
        }
        Command::Reorder { list, from, to, publish } => {
            store.fetch().await;
            let list = ImageList::from(list);
            if !store.move_image(list, from, to) {
                bail!("cannot move {list:?} image {from} to {to}: index out of range");
            }
            finish(store, settings, publish).await
        }
        Command::RemoveImage { list, index, publish } => {
            store.fetch().await;
            let list = ImageList::from(list);
            let removed = store
                .remove_image(list, index)
                .with_context(|| format!("no {list:?} image at index {index}"))?;
            info!(url = %removed, "image removed from list");
            finish(store, settings, publish).await
        }
        Command::Branches => {
            store.fetch().await;
            for (city, branches) in group_branches_by_city(store.branches()) {
                println!("{city}");
                for branch in branches {
                    println!("  {}  {}  ({})", branch.id, branch.name, branch.address);
                }
            }
            Ok(())
        }
        Command::Messages(command) => messages(store, settings, command).await,
        Command::Contact { name, email, phone, message } => {
            let draft = MessageDraft { name, email, phone, message };
            if !store.send_message(draft).await {
                bail!("message was not sent; see the log for details");
            }
            println!("message sent");
            Ok(())
        }
        Command::HashPassword { password } => {
            println!("{}", auth_adapters::hash_password(&password)?);
            Ok(())
        }
    }
}

fn show(store: &ContentStore, section: Option<&str>) -> anyhow::Result<()> {
    let value = serde_json::to_value(store.content())?;
    match section {
        None => print_json(&value),
        Some(key) => {
            let part = value.get(key).with_context(|| {
                let known: Vec<&String> = value.as_object().map(|o| o.keys().collect()).unwrap_or_default();
                format!("unknown section `{key}`; expected one of {known:?}")
            })?;
            print_json(part)
        }
    }
}

async fn import(store: &mut ContentStore, file: &Path) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;
    let document: ContentDocument =
        serde_json::from_str(&raw).with_context(|| format!("{} is not a content document", file.display()))?;
    let applied = store.edit(|content| content.merge_document(document));
    info!(keys = ?applied, "document imported");
    Ok(())
}

async fn upload(store: &mut ContentStore, settings: &Settings, args: &UploadArgs) -> anyhow::Result<()> {
    let slot = args.slot()?;
    sign_in(store, settings).await?;

    let pipeline: AssetPipeline = crate::wiring::asset_pipeline(settings);
    let selection = pipeline.select(&args.file, slot).await?;
    let crop = match (args.crop, args.zoom) {
        (Some(rect), _) => rect,
        (None, Some(zoom)) => selection.crop_selection().with_zoom(zoom).to_rect(),
        (None, None) => selection.default_crop(),
    };
    info!(
        aspect = %selection.aspect_ratio(),
        x = crop.x,
        y = crop.y,
        width = crop.width,
        height = crop.height,
        "crop confirmed"
    );
    let url = pipeline.ingest(store, &selection, crop).await?;
    info!(%url, "asset stored");
    Ok(())
}

async fn messages(store: &mut ContentStore, settings: &Settings, command: MessagesCommand) -> anyhow::Result<()> {
    // Signing in loads the inbox.
    sign_in(store, settings).await?;
    match command {
        MessagesCommand::List { filter } => {
            print_inbox(store, filter);
            Ok(())
        }
        MessagesCommand::Read { id } => {
            store.update_message_status(&id, true).await;
            print_inbox(store, MessageFilter::All);
            Ok(())
        }
        MessagesCommand::Unread { id } => {
            store.update_message_status(&id, false).await;
            print_inbox(store, MessageFilter::All);
            Ok(())
        }
        MessagesCommand::Delete { id } => {
            store.delete_message(&id).await?;
            print_inbox(store, MessageFilter::All);
            Ok(())
        }
    }
}

fn print_inbox(store: &ContentStore, filter: MessageFilter) {
    let messages = store.messages();
    println!("{} message(s), {} unread", messages.len(), unread_count(messages));
    for m in filter_messages(messages, filter) {
        let mark = if m.is_read { ' ' } else { '*' };
        println!(
            "{mark} {:>5}  {}  {} <{}>  {}",
            m.id,
            m.created_at.format("%Y-%m-%d %H:%M"),
            m.name,
            m.email,
            m.message.replace('\n', " ")
        );
    }
}

async fn sign_in(store: &mut ContentStore, settings: &Settings) -> anyhow::Result<()> {
    if store.is_authenticated() {
        return Ok(());
    }
    let email = settings
        .admin
        .email
        .clone()
        .unwrap_or_else(|| settings.local.admin_email.clone());
    let password = settings
        .admin
        .password
        .as_ref()
        .context("admin.password is not set (PIXEL__ADMIN__PASSWORD)")?;
    store.sign_in(&email, password.expose_secret()).await?;
    Ok(())
}

/// Prints the edited aggregate, or signs in and publishes it.
async fn finish(store: &mut ContentStore, settings: &Settings, publish: PublishArgs) -> anyhow::Result<()> {
    if !publish.publish {
        return print_json(store.content());
    }
    sign_in(store, settings).await?;
    publish_now(store).await
}

async fn publish_now(store: &ContentStore) -> anyhow::Result<()> {
    match store.publish().await {
        SyncStatus::Success => {
            println!("published");
            Ok(())
        }
        SyncStatus::Error => bail!("publishing failed; see the log for details"),
        status => bail!("nothing was published (status: {status})"),
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
