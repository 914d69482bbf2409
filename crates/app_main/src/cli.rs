//! Command line surface over the gallery operations

use anyhow::{bail, Context, Result};
use app_core::Gallery;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "gallery",
    version,
    about = "Manage an image gallery of group folders with ordered sidecar profiles"
)]
pub struct Cli {
    /// Gallery root directory (remembered for later runs)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the gallery root and whether it exists
    Root,
    /// Check whether a name is usable for a group or image on this system
    Validate { name: String },
    /// List groups in display order, with the group profile
    Groups,
    /// Create an empty group
    #[command(name = "create-group")]
    CreateGroup { name: String },
    /// Rename a group
    #[command(name = "rename-group")]
    RenameGroup { old: String, new: String },
    /// Delete a group and all of its images
    #[command(name = "remove-group")]
    RemoveGroup { name: String },
    /// List images of a group in display order, with the image profile
    Images { group: String },
    /// Store raw image bytes read from a file as a clipboard image
    #[command(name = "paste-file")]
    PasteFile { group: String, file: PathBuf },
    /// Store a base64 screenshot (data URL) read from a file or stdin
    #[command(name = "paste-base64")]
    PasteBase64 {
        group: String,
        /// File holding the data URL (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Copy image files into a group, never overwriting
    Import {
        group: String,
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },
    /// Rename an image
    #[command(name = "rename-image")]
    RenameImage { group: String, old: String, new: String },
    /// Delete an image
    #[command(name = "remove-image")]
    RemoveImage { group: String, name: String },
    /// Set the display order (and optionally images per row) of groups,
    /// or of the images in one group
    #[command(name = "set-order")]
    SetOrder {
        /// Order images of this group instead of the groups themselves
        #[arg(long)]
        group: Option<String>,
        /// Images per row (0 on a group means use the global value)
        #[arg(long)]
        per_row: Option<u32>,
        names: Vec<String>,
    },
    /// Print the full path of an image
    Path { group: String, name: String },
}

/// Run one command, returning its JSON output and whether it succeeded
pub async fn execute(gallery: &Gallery, command: Commands) -> Result<(Value, bool)> {
    let outcome = match command {
        Commands::Root => {
            let exists = gallery.root_exists().await;
            (json!({ "root": gallery.root().display().to_string(), "exists": exists }), exists)
        }
        Commands::Validate { name } => {
            let validation = gallery.validate_name(&name);
            let valid = validation.valid;
            (serde_json::to_value(validation)?, valid)
        }
        Commands::Groups => (serde_json::to_value(gallery.list_groups().await)?, true),
        Commands::CreateGroup { name } => op(gallery.create_group(&name).await)?,
        Commands::RenameGroup { old, new } => op(gallery.rename_group(&old, &new).await)?,
        Commands::RemoveGroup { name } => flag(gallery.remove_group(&name).await),
        Commands::Images { group } => {
            (serde_json::to_value(gallery.list_images(&group).await)?, true)
        }
        Commands::PasteFile { group, file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let ext = file
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("png");
            imported(gallery.save_image_from_buffer(&group, &bytes, ext).await)
        }
        Commands::PasteBase64 { group, input } => {
            let data = read_input(input.as_deref())?;
            imported(gallery.save_image_from_base64(&group, data.trim()).await)
        }
        Commands::Import { group, sources } => {
            let mut names = Vec::with_capacity(sources.len());
            for source in &sources {
                names.push(gallery.copy_import_image(source, &group).await);
            }
            let all_ok = names.iter().all(|n| !n.is_empty());
            (json!({ "names": names }), all_ok)
        }
        Commands::RenameImage { group, old, new } => {
            op(gallery.rename_image(&group, &old, &new).await)?
        }
        Commands::RemoveImage { group, name } => flag(gallery.remove_image(&group, &name).await),
        Commands::SetOrder { group, per_row, names } => {
            set_order(gallery, group.as_deref(), per_row, names).await?
        }
        Commands::Path { group, name } => {
            let path = gallery.image_path(&group, &name);
            (json!({ "path": path.display().to_string() }), true)
        }
    };

    Ok(outcome)
}

async fn set_order(
    gallery: &Gallery,
    group: Option<&str>,
    per_row: Option<u32>,
    names: Vec<String>,
) -> Result<(Value, bool)> {
    match group {
        None => {
            let mut profile = gallery.list_groups().await.profile;
            profile.groups_order = names;
            if let Some(n) = per_row {
                profile.image_num_per_row = n;
            }
            gallery.save_group_profile(&profile).await??;
            Ok((serde_json::to_value(gallery.list_groups().await)?, true))
        }
        Some(group) => {
            let mut profile = gallery.list_images(group).await.profile;
            profile.images_order = names;
            if let Some(n) = per_row {
                profile.image_num_per_row = n;
            }
            match gallery.save_image_profile(group, &profile) {
                Some(handle) => handle.await??,
                None => bail!("Invalid group name: {:?}", group),
            }
            Ok((serde_json::to_value(gallery.list_images(group).await)?, true))
        }
    }
}

fn op(result: app_core::OpResult) -> Result<(Value, bool)> {
    let success = result.success;
    Ok((serde_json::to_value(result)?, success))
}

fn flag(success: bool) -> (Value, bool) {
    (json!({ "success": success }), success)
}

fn imported(name: String) -> (Value, bool) {
    let success = !name.is_empty();
    (json!({ "name": name }), success)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut data = String::new();
            std::io::stdin()
                .read_to_string(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::parse_from(["gallery", "--root", "/tmp/g", "rename-group", "a", "b"]);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/g")));
        assert!(matches!(cli.command, Commands::RenameGroup { ref old, ref new } if old == "a" && new == "b"));

        let cli = Cli::parse_from(["gallery", "set-order", "--group", "cats", "b.png", "a.png"]);
        match cli.command {
            Commands::SetOrder { group, per_row, names } => {
                assert_eq!(group.as_deref(), Some("cats"));
                assert_eq!(per_row, None);
                assert_eq!(names, vec!["b.png", "a.png"]);
            }
            other => panic!("Wrong command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["gallery", "import", "cats"]).is_err());
    }

    #[tokio::test]
    async fn test_execute_flow() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = Gallery::new(tmp.path());

        let (_, ok) = execute(&gallery, Commands::CreateGroup { name: "cats".into() }).await.unwrap();
        assert!(ok);
        let (_, ok) = execute(&gallery, Commands::CreateGroup { name: "dogs".into() }).await.unwrap();
        assert!(ok);

        let (value, ok) = execute(
            &gallery,
            Commands::SetOrder {
                group: None,
                per_row: Some(3),
                names: vec!["dogs".into(), "cats".into()],
            },
        )
        .await
        .unwrap();
        assert!(ok);
        assert_eq!(value["list"], json!(["dogs", "cats"]));
        assert_eq!(value["profile"]["imageNumPerRow"], json!(3));

        let source = tmp.path().join("pic.png");
        std::fs::write(&source, b"png").unwrap();
        let (value, ok) = execute(
            &gallery,
            Commands::Import {
                group: "cats".into(),
                sources: vec![source.clone(), source],
            },
        )
        .await
        .unwrap();
        assert!(ok);
        assert_eq!(value["names"], json!(["pic.png", "pic（2）.png"]));

        let (value, ok) = execute(&gallery, Commands::CreateGroup { name: "cats".into() }).await.unwrap();
        assert!(!ok);
        assert_eq!(value["success"], json!(false));
    }
}
