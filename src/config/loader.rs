use std::path::{Path, PathBuf};

use super::{ConfigError, TreeFile, parse_tree_file};

/// Project tree file names, in order of preference.
pub const TREE_FILE_NAMES: &[&str] = &["cmdtree.yml", "cmdtree.yaml"];

/// Finds the command tree files that apply to a directory and combines them
/// into one validated [`TreeFile`].
pub trait ConfigLoader {
    fn load(&self, cwd: &Path) -> Result<TreeFile, ConfigError>;
}

/// Discovers a user-wide tree (`~/.config/cmdtree/cmdtree.yml`) and a
/// project tree in the working directory. Project commands are appended
/// after the user-wide ones and project settings win.
pub struct DefaultConfigLoader {
    user_tree: Option<PathBuf>,
}

impl Default for DefaultConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultConfigLoader {
    pub fn new() -> Self {
        let user_tree = std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(".config/cmdtree/cmdtree.yml"));
        Self { user_tree }
    }

    /// Use `path` as the user-wide tree instead of the one under `$HOME`.
    pub fn with_global_path(path: PathBuf) -> Self {
        Self {
            user_tree: Some(path),
        }
    }

    /// Existing tree files for `cwd`, in merge order.
    pub fn discover(&self, cwd: &Path) -> Vec<PathBuf> {
        let user = self.user_tree.iter().filter(|path| path.is_file()).cloned();
        let project = TREE_FILE_NAMES
            .iter()
            .map(|name| cwd.join(name))
            .find(|path| path.is_file());
        user.chain(project).collect()
    }
}

impl ConfigLoader for DefaultConfigLoader {
    fn load(&self, cwd: &Path) -> Result<TreeFile, ConfigError> {
        let tree = self
            .discover(cwd)
            .iter()
            .try_fold(TreeFile::default(), |tree, path| {
                Ok::<_, ConfigError>(tree.merge(read_tree_file(path)?))
            })?;
        tree.validate()?;
        Ok(tree)
    }
}

fn read_tree_file(path: &Path) -> Result<TreeFile, ConfigError> {
    tracing::debug!(path = %path.display(), "reading tree file");
    parse_tree_file(&std::fs::read_to_string(path)?)
}

/// Load and validate the tree file at `path`, with no discovery.
pub fn load_tree_file(path: &Path) -> Result<TreeFile, ConfigError> {
    let tree = read_tree_file(path)?;
    tree.validate()?;
    Ok(tree)
}
