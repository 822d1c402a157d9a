//! Command-line surface of `pixel-admin`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use domains::views::MessageFilter;
use domains::{CropRect, ImageList, MessageId, Slot};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pixel-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Edit and publish the Pixel barbershop site content")]
#[command(long_about = "\
Edit and publish the Pixel barbershop site content

Every command starts from the published content. Edits stay local and are
printed as JSON unless --publish is given, in which case the admin account
from the [admin] settings signs in and the whole aggregate is written back.")]
pub struct Cli {
    /// Settings file (TOML). Environment variables `PIXEL__SECTION__KEY` override it.
    #[arg(short, long, env = "PIXEL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Shared flag for commands that edit content.
#[derive(Args, Clone, Copy)]
pub struct PublishArgs {
    /// Sign in and publish the edited content
    #[arg(long)]
    pub publish: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the current content as JSON
    Show {
        /// Only this top-level key, e.g. `heroSettings`
        #[arg(long)]
        section: Option<String>,
    },
    /// Publish the built-in default content
    Seed,
    /// Merge a content document (JSON) over the current content
    Import {
        file: PathBuf,
        #[command(flatten)]
        publish: PublishArgs,
    },
    /// Crop, compress and upload an image into a slot
    Upload(UploadArgs),
    /// Move an image within the hero or gallery list
    Reorder {
        list: ListArg,
        from: usize,
        to: usize,
        #[command(flatten)]
        publish: PublishArgs,
    },
    /// Drop an image from the hero or gallery list
    RemoveImage {
        list: ListArg,
        index: usize,
        #[command(flatten)]
        publish: PublishArgs,
    },
    /// List branches grouped by city
    Branches,
    /// Manage the contact inbox
    #[command(subcommand)]
    Messages(MessagesCommand),
    /// Submit the public contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long)]
        message: String,
    },
    /// Print an argon2 hash for `local.admin_password_hash`
    HashPassword { password: String },
}

#[derive(Subcommand)]
pub enum MessagesCommand {
    /// Show the inbox, newest first
    List {
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        filter: MessageFilter,
    },
    /// Mark a message as read
    Read { id: MessageId },
    /// Mark a message as unread
    Unread { id: MessageId },
    /// Delete a message
    Delete { id: MessageId },
}

#[derive(Args)]
pub struct UploadArgs {
    pub file: PathBuf,

    #[arg(long, value_enum)]
    pub slot: SlotArg,

    /// Blog post id, for `--slot blog-cover`
    #[arg(long)]
    pub post_id: Option<String>,

    /// Social link index, for `--slot social-icon`
    #[arg(long)]
    pub index: Option<usize>,

    /// Zoom of the centred crop window (1.0 to 3.0)
    #[arg(long, conflicts_with = "crop")]
    pub zoom: Option<f64>,

    /// Explicit crop rectangle in source pixels: `x,y,width,height`
    #[arg(long, value_parser = parse_crop)]
    pub crop: Option<CropRect>,

    #[command(flatten)]
    pub publish: PublishArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SlotArg {
    Hero,
    Gallery,
    Logo,
    FooterLogo,
    Icon,
    About,
    ServiceBg,
    BlogCover,
    SocialIcon,
}

impl UploadArgs {
    pub fn slot(&self) -> anyhow::Result<Slot> {
        Ok(match self.slot {
            SlotArg::Hero => Slot::HeroImage,
            SlotArg::Gallery => Slot::GalleryImage,
            SlotArg::Logo => Slot::Logo,
            SlotArg::FooterLogo => Slot::FooterLogo,
            SlotArg::Icon => Slot::WebsiteIcon,
            SlotArg::About => Slot::AboutImage,
            SlotArg::ServiceBg => Slot::ServiceBackground,
            SlotArg::BlogCover => Slot::BlogCover {
                post_id: self
                    .post_id
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("--slot blog-cover needs --post-id"))?,
            },
            SlotArg::SocialIcon => Slot::SocialIcon {
                index: self
                    .index
                    .ok_or_else(|| anyhow::anyhow!("--slot social-icon needs --index"))?,
            },
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ListArg {
    Hero,
    Gallery,
}

impl From<ListArg> for ImageList {
    fn from(value: ListArg) -> Self {
        match value {
            ListArg::Hero => ImageList::Hero,
            ListArg::Gallery => ImageList::Gallery,
        }
    }
}

fn parse_filter(raw: &str) -> Result<MessageFilter, String> {
    raw.parse()
}

fn parse_crop(raw: &str) -> Result<CropRect, String> {
    let parts: Vec<u32> = raw
        .split(',')
        .map(|p| p.trim().parse::<u32>().map_err(|e| format!("`{p}`: {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, width, height] => Ok(CropRect::new(*x, *y, *width, *height)),
        _ => Err("expected four numbers: x,y,width,height".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn crop_argument_parses_four_numbers() {
        assert_eq!(parse_crop("10, 20,300,200"), Ok(CropRect::new(10, 20, 300, 200)));
        assert!(parse_crop("1,2,3").is_err());
        assert!(parse_crop("a,b,c,d").is_err());
    }

    #[test]
    fn keyed_slots_require_their_key() {
        let cli = Cli::try_parse_from(["pixel-admin", "upload", "cover.jpg", "--slot", "blog-cover"]).unwrap();
        let Command::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        assert!(args.slot().is_err());

        let cli = Cli::try_parse_from([
            "pixel-admin", "upload", "ig.png", "--slot", "social-icon", "--index", "1", "--publish",
        ])
        .unwrap();
        let Command::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        assert_eq!(args.slot().unwrap(), Slot::SocialIcon { index: 1 });
        assert!(args.publish.publish);
    }

    #[test]
    fn message_ids_and_filters_parse() {
        let cli = Cli::try_parse_from(["pixel-admin", "messages", "delete", "42"]).unwrap();
        let Command::Messages(MessagesCommand::Delete { id }) = cli.command else {
            panic!("expected messages delete");
        };
        assert_eq!(id, MessageId::Int(42));

        let cli = Cli::try_parse_from(["pixel-admin", "messages", "list", "--filter", "unread"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Messages(MessagesCommand::List { filter: MessageFilter::Unread })
        ));
    }
}
