//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "archigen",
    bin_name = "archigen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Layered CRUD scaffolding for ASP.NET solutions",
    long_about = "Archigen generates the entity, repository, CQRS, DTO, mapping, \
                  validation, controller and configuration files for an entity, \
                  and patches the shared registration files of the solution.",
    after_help = "EXAMPLES:\n\
        \x20 archigen new Shop\n\
        \x20 archigen crud Shop Product --props \"Name:string,Price:decimal,IsActive:bool?\"\n\
        \x20 archigen add-property Shop Product Description string?\n\
        \x20 archigen migrate Shop --name AddProduct --update",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the full CRUD artifact set for an entity.
    #[command(
        visible_alias = "c",
        after_help = "EXAMPLES:\n\
            \x20 archigen crud Shop Product --props \"Name:string,Price:decimal\"\n\
            \x20 archigen crud Shop Order --props \"Total:decimal\" --id Guid --security\n\
            \x20 archigen crud Shop Product   # regenerate from Domain/Entities/Product.cs"
    )]
    Crud(CrudArgs),

    /// Add a property to an entity and the artifacts generated from it.
    #[command(
        visible_alias = "prop",
        after_help = "EXAMPLES:\n\
            \x20 archigen add-property Shop Product Description string?\n\
            \x20 archigen add-property Shop Product Stock int"
    )]
    AddProperty(AddPropertyArgs),

    /// Print the structure recovered from an entity source file.
    ParseEntity(ParseEntityArgs),

    /// Show where each layer of a solution lives.
    Layout(LayoutArgs),

    /// Create a new solution from the project template.
    #[command(
        visible_alias = "n",
        after_help = "EXAMPLES:\n\
            \x20 archigen new Shop\n\
            \x20 archigen new Shop --output ~/src --no-restore"
    )]
    New(NewArgs),

    /// Add an EF Core migration and optionally apply it.
    #[command(
        after_help = "EXAMPLES:\n\
            \x20 archigen migrate Shop --name AddProduct\n\
            \x20 archigen migrate Shop --name AddProduct --context BaseDbContext --update"
    )]
    Migrate(MigrateArgs),

    /// Generate shell completion scripts.
    #[command(
        after_help = "EXAMPLES:\n\
            \x20 archigen completions bash > ~/.local/share/bash-completion/completions/archigen\n\
            \x20 archigen completions zsh  > ~/.zfunc/_archigen\n\
            \x20 archigen completions fish > ~/.config/fish/completions/archigen.fish"
    )]
    Completions(CompletionsArgs),

    /// Read and write the configuration file.
    #[command(
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 archigen config get generation.db_context\n\
            \x20 archigen config set generation.id_type Guid\n\
            \x20 archigen config list"
    )]
    Config(ConfigCommands),
}

// ── crud ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CrudArgs {
    /// Project name, the prefix of every layer (`<PROJECT>.Domain`, ...).
    #[arg(value_name = "PROJECT")]
    pub project: String,

    #[arg(value_name = "ENTITY", help = "Entity name, e.g. Product")]
    pub entity: String,

    /// Comma-separated `Name:Type` list; the type defaults to `string`.
    ///
    /// Not needed when the entity file already exists.
    #[arg(short = 'p', long = "props", value_name = "SPEC")]
    pub props: Option<String>,

    #[arg(
        long = "dbcontext",
        visible_alias = "context",
        value_name = "NAME",
        help = "DbContext to register the entity in [config: generation.db_context]"
    )]
    pub db_context: Option<String>,

    #[arg(
        long = "id",
        value_name = "TYPE",
        help = "Primary key type [config: generation.id_type]"
    )]
    pub id_type: Option<String>,

    /// Also generate operation claims and seed them.
    #[arg(long = "security")]
    pub security: bool,
}

// ── add-property ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddPropertyArgs {
    #[arg(value_name = "PROJECT")]
    pub project: String,

    #[arg(value_name = "ENTITY")]
    pub entity: String,

    #[arg(value_name = "NAME", help = "Property name, e.g. Description")]
    pub name: String,

    /// C# type; append `?` for nullable (`string?`, `int?`).
    #[arg(value_name = "TYPE")]
    pub property_type: String,
}

// ── parse-entity / layout ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ParseEntityArgs {
    #[arg(value_name = "FILE", help = "Path to an entity .cs file")]
    pub file: std::path::PathBuf,
}

#[derive(Debug, Args)]
pub struct LayoutArgs {
    #[arg(value_name = "SOLUTION_ROOT")]
    pub solution_root: std::path::PathBuf,

    #[arg(value_name = "PROJECT")]
    pub project: String,
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Solution name; also replaces `Project` throughout the template.
    #[arg(value_name = "NAME")]
    pub name: String,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Parent directory (default: current directory)"
    )]
    pub output: Option<std::path::PathBuf>,

    #[arg(long = "force", help = "Write into a non-empty directory")]
    pub force: bool,

    #[arg(long = "no-restore", help = "Skip `dotnet restore` and `dotnet build`")]
    pub no_restore: bool,
}

// ── migrate ───────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Migration name; a timestamped name is used when omitted.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    #[arg(long = "context", value_name = "NAME", help = "DbContext to migrate")]
    pub context: Option<String>,

    #[arg(long = "update", help = "Apply the migration with `dotnet ef database update`")]
    pub update: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generation.db_context`.
        key: String,
    },
    /// Set a configuration key in the config file.
    Set {
        key: String,
        /// New value; empty clears an optional key.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_crud_command() {
        let cli = Cli::parse_from([
            "archigen",
            "crud",
            "Shop",
            "Product",
            "--props",
            "Name:string,Price:decimal",
            "--dbcontext",
            "ShopDbContext",
            "--solution",
            "/w",
        ]);
        assert_eq!(cli.global.solution.as_deref(), Some(std::path::Path::new("/w")));
        match cli.command {
            Commands::Crud(args) => {
                assert_eq!(args.entity, "Product");
                assert_eq!(args.db_context.as_deref(), Some("ShopDbContext"));
                assert!(!args.security);
            }
            other => panic!("expected crud, got {other:?}"),
        }
    }

    #[test]
    fn parse_add_property_with_nullable_type() {
        let cli = Cli::parse_from(["archigen", "add-property", "Shop", "Product", "Notes", "string?"]);
        match cli.command {
            Commands::AddProperty(args) => assert_eq!(args.property_type, "string?"),
            other => panic!("expected add-property, got {other:?}"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["archigen", "--quiet", "--verbose", "layout", ".", "Shop"]);
        assert!(result.is_err());
    }

    #[test]
    fn crud_requires_entity() {
        assert!(Cli::try_parse_from(["archigen", "crud", "Shop"]).is_err());
    }
}
