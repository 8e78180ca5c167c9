//! Project template discovery and instantiation.
//!
//! A template is a plain directory tree whose file names, folder names and
//! text contents use the literal token `Project` where the new project's
//! name goes:
//!
//! ```text
//! template/
//! ├── template.sln                       → <Name>.sln
//! ├── core/...
//! └── project/
//!     ├── Project.Application/
//!     │   └── Project.Application.csproj → <Name>.Application.csproj
//!     ├── Project.Domain/
//!     └── Project.WebAPI/
//!         └── appsettings.json
//! ```
//!
//! Substitution depends on the file kind:
//!
//! - `.sln`, `.csproj`, `.json`: only layer-qualified names such as
//!   `Project.Application` (plus `<AssemblyName>` and `<RootNamespace>` in
//!   project files). Solution keywords and launch settings such as
//!   `"commandName": "Project"` stay intact.
//! - `.sln` project GUIDs are regenerated, consistently within the file.
//!   Project-type and solution-folder GUIDs are kept.
//! - Other known text files: every `Project` is replaced.
//! - Anything else is copied byte for byte.

use std::{
    collections::{HashMap, HashSet},
    env, fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::{Captures, Regex};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use walkdir::WalkDir;

use archigen_core::{
    application::ApplicationError,
    domain::{DomainError, DomainValidator},
    error::{ArchigenError, ArchigenResult},
};

/// Placeholder token for the project name.
pub const PLACEHOLDER: &str = "Project";

/// Environment variable that overrides template discovery.
pub const TEMPLATE_DIR_ENV: &str = "ARCHIGEN_TEMPLATE_DIR";

const TEMPLATE_DIR_NAME: &str = "template";
const MAX_PARENT_PROBES: usize = 6;

/// Solution-folder project type; never regenerated.
const SOLUTION_FOLDER_GUID: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

const TEXT_EXTENSIONS: [&str; 14] = [
    ".sln",
    ".csproj",
    ".cs",
    ".json",
    ".md",
    ".yml",
    ".yaml",
    ".editorconfig",
    ".gitattributes",
    ".gitignore",
    ".txt",
    ".props",
    ".targets",
    ".http",
];

const LAYERS: [&str; 6] = [
    "Application",
    "Domain",
    "Infrastructure",
    "Persistence",
    "WebAPI",
    "Core",
];

static SLN_LAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bProject\.(Application|Domain|Infrastructure|Persistence|WebAPI)\b")
        .expect("valid regex")
});

static PROJECT_LAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bProject\.(Application|Domain|Infrastructure|Persistence|WebAPI|Core)\b")
        .expect("valid regex")
});

static ASSEMBLY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(AssemblyName|RootNamespace)>Project\b").expect("valid regex"));

static GUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\}")
        .expect("valid regex")
});

static PROJECT_TYPE_GUID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Project\("(\{[0-9A-Fa-f-]{36}\})"\)"#).expect("valid regex"));

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Places to look for a template, in priority order.
#[derive(Debug, Clone, Default)]
pub struct TemplateSearch {
    /// Value of `ARCHIGEN_TEMPLATE_DIR`.
    pub env_override: Option<PathBuf>,
    /// `templates.path` from the configuration.
    pub configured: Option<PathBuf>,
    /// Directory holding the running executable.
    pub exe_dir: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
}

impl TemplateSearch {
    /// Search rooted at the real process environment.
    pub fn from_env(configured: Option<PathBuf>) -> Self {
        Self {
            env_override: env::var_os(TEMPLATE_DIR_ENV).map(PathBuf::from),
            configured,
            exe_dir: env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf)),
            cwd: env::current_dir().ok(),
        }
    }

    /// Every candidate directory, most specific first.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        out.extend(self.env_override.clone());
        out.extend(self.configured.clone());

        if let Some(exe_dir) = &self.exe_dir {
            out.push(exe_dir.join(TEMPLATE_DIR_NAME));
            out.extend(
                exe_dir
                    .ancestors()
                    .skip(1)
                    .take(MAX_PARENT_PROBES)
                    .map(|dir| dir.join(TEMPLATE_DIR_NAME)),
            );
        }

        out.extend(self.cwd.as_ref().map(|cwd| cwd.join(TEMPLATE_DIR_NAME)));
        out
    }

    /// First candidate that is an existing directory.
    pub fn find(&self) -> ArchigenResult<ProjectTemplate> {
        let candidates = self.candidates();
        for candidate in &candidates {
            if candidate.is_dir() {
                debug!(path = %candidate.display(), "Template found");
                return Ok(ProjectTemplate::at(candidate));
            }
        }

        Err(ApplicationError::MissingDependency {
            path: candidates
                .last()
                .cloned()
                .unwrap_or_else(|| PathBuf::from(TEMPLATE_DIR_NAME)),
            what: format!(
                "project template folder (set {TEMPLATE_DIR_ENV} or templates.path)"
            ),
        }
        .into())
    }
}

// ── Instantiation ─────────────────────────────────────────────────────────────

/// What [`ProjectTemplate::instantiate`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInstance {
    pub destination: PathBuf,
    /// Files whose text went through substitution.
    pub rewritten: usize,
    /// Files copied byte for byte.
    pub copied: usize,
}

/// A template directory on disk.
#[derive(Debug, Clone)]
pub struct ProjectTemplate {
    root: PathBuf,
}

impl ProjectTemplate {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy the template to `destination`, substituting `project_name`.
    ///
    /// A non-empty `destination` is refused unless `force` is set; with
    /// `force`, template files overwrite existing ones and other files are
    /// left alone.
    #[instrument(skip_all, fields(project = %project_name, dest = %destination.display()))]
    pub fn instantiate(
        &self,
        project_name: &str,
        destination: &Path,
        force: bool,
    ) -> ArchigenResult<TemplateInstance> {
        if !DomainValidator::is_valid_identifier(project_name)
            || DomainValidator::is_reserved_keyword(project_name)
        {
            return Err(DomainError::InvalidInput {
                message: format!("'{project_name}' is not a valid project name"),
            }
            .into());
        }

        if !force && is_non_empty_dir(destination) {
            return Err(ApplicationError::ValidationFailed(format!(
                "destination {} already exists and is not empty; use --force to overwrite",
                destination.display()
            ))
            .into());
        }

        fs::create_dir_all(destination).map_err(|e| io_error(destination, e))?;

        let mut instance = TemplateInstance {
            destination: destination.to_path_buf(),
            rewritten: 0,
            copied: 0,
        };
        let mut guids = HashMap::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                ArchigenError::from(ApplicationError::filesystem(path, e))
            })?;
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| ApplicationError::filesystem(entry.path(), e))?;
            let target = destination.join(rename_path(relative, project_name));

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| io_error(&target, e))?;
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
            }

            let ext = extension(entry.path());
            let text = TEXT_EXTENSIONS
                .contains(&ext.as_str())
                .then(|| fs::read_to_string(entry.path()).ok())
                .flatten();

            match text {
                Some(text) => {
                    let content = transform(&ext, &text, project_name, &mut guids);
                    fs::write(&target, content).map_err(|e| io_error(&target, e))?;
                    instance.rewritten += 1;
                }
                None => {
                    fs::copy(entry.path(), &target).map_err(|e| io_error(&target, e))?;
                    instance.copied += 1;
                }
            }
        }

        info!(
            rewritten = instance.rewritten,
            copied = instance.copied,
            "Template instantiated"
        );
        Ok(instance)
    }
}

/// Substitute the placeholder in every component of a relative path.
fn rename_path(relative: &Path, project_name: &str) -> PathBuf {
    relative
        .components()
        .map(|component| {
            component
                .as_os_str()
                .to_string_lossy()
                .replace("template.sln", &format!("{project_name}.sln"))
                .replace(PLACEHOLDER, project_name)
        })
        .collect()
}

/// Lowercased extension including the dot; dotfiles count as their own
/// extension (`.gitignore`).
fn extension(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.rfind('.')
        .map(|i| name[i..].to_string())
        .unwrap_or_default()
}

fn transform(ext: &str, text: &str, project_name: &str, guids: &mut HashMap<String, String>) -> String {
    match ext {
        ".sln" => {
            let replaced = replace_layers(&SLN_LAYER, text, project_name);
            regenerate_guids(&replaced, guids)
        }
        ".csproj" => {
            let replaced = replace_layers(&PROJECT_LAYER, text, project_name);
            ASSEMBLY_NAME
                .replace_all(&replaced, |caps: &Captures| format!("<{}>{project_name}", &caps[1]))
                .into_owned()
        }
        ".json" => replace_layers(&PROJECT_LAYER, text, project_name),
        _ => text.replace(PLACEHOLDER, project_name),
    }
}

fn replace_layers(re: &Regex, text: &str, project_name: &str) -> String {
    re.replace_all(text, |caps: &Captures| {
        let matched = &caps[1];
        let layer = LAYERS
            .iter()
            .find(|layer| layer.eq_ignore_ascii_case(matched))
            .copied()
            .unwrap_or(matched);
        format!("{project_name}.{layer}")
    })
    .into_owned()
}

/// Give every project GUID a fresh value, the same one at each occurrence.
fn regenerate_guids(sln: &str, guids: &mut HashMap<String, String>) -> String {
    let mut keep: HashSet<String> = PROJECT_TYPE_GUID
        .captures_iter(sln)
        .map(|caps| caps[1].to_uppercase())
        .collect();
    keep.insert(SOLUTION_FOLDER_GUID.to_string());

    let result = GUID.replace_all(sln, |caps: &Captures| {
        let old = caps[0].to_uppercase();
        if keep.contains(&old) {
            return caps[0].to_string();
        }
        guids
            .entry(old)
            .or_insert_with(|| format!("{{{}}}", Uuid::new_v4().to_string().to_uppercase()))
            .clone()
    });

    if cfg!(unix) {
        result.replace('\\', "/")
    } else {
        result.into_owned()
    }
}

fn is_non_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

fn io_error(path: &Path, e: std::io::Error) -> ArchigenError {
    ApplicationError::filesystem(path, e).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_keeps_command_name() {
        let json = r#"{ "commandName": "Project", "ns": "Project.WebAPI" }"#;
        let out = transform(".json", json, "Shop", &mut HashMap::new());
        assert_eq!(out, r#"{ "commandName": "Project", "ns": "Shop.WebAPI" }"#);
    }

    #[test]
    fn csproj_replaces_assembly_and_namespace() {
        let csproj = "<RootNamespace>Project.Domain</RootNamespace>\n<AssemblyName>Project</AssemblyName>\n<ProjectReference Include=\"..\\project.persistence\\x.csproj\" />";
        let out = transform(".csproj", csproj, "Shop", &mut HashMap::new());
        assert!(out.contains("<RootNamespace>Shop.Domain</RootNamespace>"));
        assert!(out.contains("<AssemblyName>Shop</AssemblyName>"));
        assert!(out.contains("<ProjectReference Include"));
        assert!(out.contains("Shop.Persistence"));
    }

    #[test]
    fn sln_guids_are_regenerated_consistently() {
        let sln = "\
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Project.Domain\", \"project\\Project.Domain\\Project.Domain.csproj\", \"{11111111-1111-1111-1111-111111111111}\"
Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"core\", \"core\", \"{22222222-2222-2222-2222-222222222222}\"
\t{11111111-1111-1111-1111-111111111111}.Debug|Any CPU.Build.0 = Debug|Any CPU
";
        let out = transform(".sln", sln, "Shop", &mut HashMap::new());

        assert!(out.contains("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}"));
        assert!(out.contains(SOLUTION_FOLDER_GUID));
        assert!(!out.contains("{11111111-1111-1111-1111-111111111111}"));
        assert!(!out.contains("{22222222-2222-2222-2222-222222222222}"));
        assert!(out.starts_with("Project(\""));
        assert!(out.contains("\"Shop.Domain\""));

        let regenerated: Vec<_> = GUID
            .find_iter(&out)
            .map(|m| m.as_str().to_string())
            .filter(|g| g != SOLUTION_FOLDER_GUID && !g.starts_with("{FAE04EC0"))
            .collect();
        assert_eq!(regenerated.len(), 3);
        assert_eq!(regenerated[0], regenerated[2]);
        assert_ne!(regenerated[0], regenerated[1]);
    }

    #[test]
    fn paths_and_extensions() {
        assert_eq!(
            rename_path(Path::new("project/Project.Domain/Project.Domain.csproj"), "Shop"),
            PathBuf::from("project/Shop.Domain/Shop.Domain.csproj")
        );
        assert_eq!(rename_path(Path::new("template.sln"), "Shop"), PathBuf::from("Shop.sln"));
        assert_eq!(extension(Path::new("a/.gitignore")), ".gitignore");
        assert_eq!(extension(Path::new("a/Logo.PNG")), ".png");
    }

    #[test]
    fn candidates_in_priority_order() {
        let search = TemplateSearch {
            env_override: Some("/env".into()),
            configured: Some("/cfg".into()),
            exe_dir: Some("/opt/archigen/bin".into()),
            cwd: Some("/work".into()),
        };
        let candidates = search.candidates();
        assert_eq!(candidates[0], PathBuf::from("/env"));
        assert_eq!(candidates[1], PathBuf::from("/cfg"));
        assert_eq!(candidates[2], PathBuf::from("/opt/archigen/bin/template"));
        assert_eq!(candidates[3], PathBuf::from("/opt/archigen/template"));
        assert_eq!(candidates.last(), Some(&PathBuf::from("/work/template")));
    }
}
