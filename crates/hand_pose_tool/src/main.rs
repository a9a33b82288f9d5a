/*
 * Copyright (C) 2026 Open Source Robotics Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
*/

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use hand_pose_format::{
    FileFormat, FileStorage, HandPoseSettings, PoseFile, PoseLibrary, Side, StoreLocator,
};
use hand_pose_rig::{HandInfo, JointTree, derive_fingers};
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Inspect and edit hand pose files (.pose.ron / .pose.json) and rig files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Settings file providing the save directory and mirror rule.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the pose files of a directory along with their poses.
    List {
        /// Directory to list. Defaults to the save directory of the settings.
        directory: Option<PathBuf>,
        /// Only list files created from this template.
        #[arg(short, long)]
        template: Option<String>,
    },
    /// Print the poses stored in a file.
    Show {
        file: PathBuf,
        /// Only print the pose with this name.
        #[arg(short, long)]
        pose: Option<String>,
    },
    /// Convert a pose file to the format given by the output extension.
    Convert { input: PathBuf, output: PathBuf },
    /// Overwrite one hand of stored poses with the mirror image of the other.
    Mirror {
        file: PathBuf,
        /// The hand to mirror from.
        #[arg(long, value_enum)]
        from: HandArg,
        /// Only mirror the pose with this name.
        #[arg(short, long)]
        pose: Option<String>,
        /// Write the result here instead of modifying the input file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rename a pose inside a file.
    Rename {
        file: PathBuf,
        #[arg(long)]
        pose: String,
        #[arg(long)]
        to: String,
    },
    /// Print the joint tree of a rig file and the fingers derived from it.
    Tree {
        rig: PathBuf,
        /// Include the root joint in poses.
        #[arg(long)]
        include_root: bool,
        /// Names of joints to leave out of poses.
        #[arg(short, long)]
        exclude: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HandArg {
    Left,
    Right,
}

impl From<HandArg> for Side {
    fn from(hand: HandArg) -> Self {
        match hand {
            HandArg::Left => Side::Left,
            HandArg::Right => Side::Right,
        }
    }
}

fn init_logging() {
    let default_filter = format!("{}", Level::INFO);
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::Layer::default().with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => HandPoseSettings::from_path(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?,
        None => HandPoseSettings::default(),
    };

    run(args.command, &settings)
}

fn run(command: Command, settings: &HandPoseSettings) -> Result<()> {
    let mut library = PoseLibrary::new(FileStorage, settings.save_data.clone());
    match command {
        Command::List {
            directory,
            template,
        } => {
            if let Some(directory) = directory {
                library.settings_mut().directory = Some(directory);
            }
            let files = match &template {
                Some(template) => library.files_of_template(template)?,
                None => library.files()?,
            };
            for (locator, file) in files {
                println!(
                    "{} [{} {}] {}",
                    locator.path().display(),
                    file.template,
                    file.store.kind(),
                    file.store.names().join(", ")
                );
            }
        }
        Command::Show { file, pose } => {
            let (_, pose_file) = open(&library, &file)?;
            println!(
                "format {} | template {} | {} store",
                pose_file.format_version,
                pose_file.template,
                pose_file.store.kind()
            );
            let mut shown = 0;
            for record in pose_file.store.records() {
                if pose.as_ref().is_some_and(|name| *name != record.name) {
                    continue;
                }
                shown += 1;
                println!("{}:", record.name);
                for side in Side::BOTH {
                    let hand = record.hand(side);
                    println!(
                        "  {side}: offset {} rotation {} joints {}",
                        hand.attachment.offset,
                        hand.attachment.rotation,
                        hand.len()
                    );
                }
            }
            if let (Some(name), 0) = (&pose, shown) {
                bail!("no pose named [{name}] in {}", file.display());
            }
        }
        Command::Convert { input, output } => {
            let (_, pose_file) = open(&library, &input)?;
            let target = locate(&output)?;
            library.write(&target, &pose_file)?;
            info!("Converted {} into {}", input.display(), target);
        }
        Command::Mirror {
            file,
            from,
            pose,
            output,
        } => {
            let (locator, mut pose_file) = open(&library, &file)?;
            let source = Side::from(from);
            let target = source.opposite();
            let rule = settings.mirror;
            let mut mirrored = 0;
            for record in pose_file.store.records_mut() {
                if pose.as_ref().is_some_and(|name| *name != record.name) {
                    continue;
                }
                if record.hand(source).len() != record.hand(target).len() {
                    warn!(
                        "Pose [{}] has {} {source} joints but {} {target} joints",
                        record.name,
                        record.hand(source).len(),
                        record.hand(target).len()
                    );
                }
                *record.hand_mut(target) = rule.hand_pose(record.hand(source));
                mirrored += 1;
            }
            if mirrored == 0 {
                bail!("no pose to mirror in {}", file.display());
            }
            let destination = match &output {
                Some(output) => locate(output)?,
                None => locator,
            };
            library.write(&destination, &pose_file)?;
            info!("Mirrored {mirrored} poses from the {source} hand into {destination}");
        }
        Command::Rename { file, pose, to } => {
            let (locator, mut pose_file) = open(&library, &file)?;
            pose_file.store.rename(&pose, &to)?;
            library.write(&locator, &pose_file)?;
            info!("Renamed [{pose}] to [{to}] in {locator}");
        }
        Command::Tree {
            rig,
            include_root,
            exclude,
        } => {
            let tree = JointTree::from_path(&rig)
                .with_context(|| format!("failed to load rig {}", rig.display()))?;
            print!("{}", render_tree(&tree, include_root, &exclude));
        }
    }
    Ok(())
}

fn locate(path: &Path) -> Result<StoreLocator> {
    if FileFormat::from_path(path).is_none() {
        bail!(
            "{} must end with {} or {}",
            path.display(),
            FileFormat::Ron.extension(),
            FileFormat::Json.extension()
        );
    }
    Ok(StoreLocator::from_path(path)?)
}

fn open(library: &PoseLibrary<FileStorage>, path: &Path) -> Result<(StoreLocator, PoseFile)> {
    let locator = locate(path)?;
    let file = library
        .open(&locator)
        .with_context(|| format!("failed to open pose file {}", path.display()))?;
    Ok((locator, file))
}

fn render_tree(tree: &JointTree, include_root: bool, exclude: &[String]) -> String {
    let mut info = HandInfo::build(tree);
    info.include_all(true);
    info.set_included(0, include_root);
    for name in exclude {
        if !info.set_included_by_name(name, false) {
            warn!("No joint named [{name}] in the rig");
        }
    }

    let mut out = String::new();
    for entry in info.entries() {
        let mark = if entry.included { "x" } else { " " };
        out += &format!("{}[{mark}] {}\n", entry.position.label(), entry.name);
    }
    for (i, finger) in derive_fingers(&info).iter().enumerate() {
        let names: Vec<_> = finger
            .iter()
            .filter_map(|joint| tree.node(*joint))
            .map(|node| node.name.as_str())
            .collect();
        out += &format!("finger {}: {}\n", i + 1, names.join(" > "));
    }
    out
}
