//! Where images come from and where results go: pickers and drop routing.
//!
//! The [`Picker`] trait mirrors the native dialogs a desktop shell would
//! show (open one, open many, choose folder, save as). [`ArgsPicker`] answers
//! them from command-line arguments instead:
//!
//! | Dialog | `ArgsPicker` answer |
//! |---|---|
//! | pick one | first recognised input |
//! | pick many | every recognised input; directories are walked recursively |
//! | pick folder | `--output`, created when missing; none given = cancelled |
//! | save as | `--output` joined with the suggested name if it is a directory |
//!
//! [`route_drop`] is the drop surface: it filters a set of sources down to
//! recognised images and decides between the single-image and bulk flows.

use crate::imaging::{ImageSource, has_image_extension, supported_input_extensions};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Native-dialog style selection. `None`/empty means the user cancelled.
pub trait Picker {
    fn pick_one(&self, filter: &[&str]) -> Option<PathBuf>;
    fn pick_many(&self, filter: &[&str]) -> Vec<PathBuf>;
    fn pick_folder(&self, create_if_missing: bool) -> io::Result<Option<PathBuf>>;
    fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf>;
}

fn matches_filter(path: &Path, filter: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| filter.iter().any(|f| ext.eq_ignore_ascii_case(f)))
}

/// Picker backed by command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct ArgsPicker {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
}

impl ArgsPicker {
    pub fn new(inputs: Vec<PathBuf>, output: Option<PathBuf>) -> Self {
        Self { inputs, output }
    }
}

impl Picker for ArgsPicker {
    fn pick_one(&self, filter: &[&str]) -> Option<PathBuf> {
        self.pick_many(filter).into_iter().next()
    }

    fn pick_many(&self, filter: &[&str]) -> Vec<PathBuf> {
        let mut picked = Vec::new();
        for input in &self.inputs {
            if input.is_dir() {
                let files = WalkDir::new(input)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .filter(|p| matches_filter(p, filter));
                picked.extend(files);
            } else if matches_filter(input, filter) {
                picked.push(input.clone());
            }
        }
        picked
    }

    fn pick_folder(&self, create_if_missing: bool) -> io::Result<Option<PathBuf>> {
        let Some(folder) = &self.output else {
            return Ok(None);
        };
        if !folder.exists() && create_if_missing {
            std::fs::create_dir_all(folder)?;
        }
        if !folder.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{} is not a directory", folder.display()),
            ));
        }
        Ok(Some(folder.clone()))
    }

    fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf> {
        let output = self.output.as_ref()?;
        if output.is_dir() {
            Some(output.join(suggested_name))
        } else {
            Some(output.clone())
        }
    }
}

/// Outcome of dropping a set of items.
#[derive(Debug)]
pub enum DropRoute {
    /// Nothing recognisable as an image.
    Empty,
    /// Exactly one image: show it and border it on its own.
    Single(ImageSource),
    /// Several images: queue them for bulk processing.
    Bulk(Vec<ImageSource>),
}

/// Keep recognised images (by extension) and pick the flow for them.
pub fn route_drop(items: impl IntoIterator<Item = ImageSource>) -> DropRoute {
    let mut images: Vec<ImageSource> = items
        .into_iter()
        .filter(|item| has_image_extension(Path::new(&item.display_name())))
        .collect();
    match images.len() {
        0 => DropRoute::Empty,
        1 => DropRoute::Single(images.remove(0)),
        _ => DropRoute::Bulk(images),
    }
}

/// Convenience: recognised image paths among `inputs`, directories expanded.
pub fn collect_image_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    ArgsPicker::new(inputs.to_vec(), None).pick_many(supported_input_extensions())
}
