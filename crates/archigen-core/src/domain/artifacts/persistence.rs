use super::{ArtifactContext, SourceBuilder};
use crate::domain::{
    class_body::configuration_line,
    error::DomainError,
    patcher::{add_import_if_missing, insert_before_marker, replace_line},
    source::{PatchOutcome, SourceFile},
};

/// Marker every registration file ends its service list with.
pub(super) const RETURN_SERVICES: &str = "return services;";

pub(super) fn render_configuration(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let lc = ctx.entity.lambda_name();
    let mut sb = SourceBuilder::new();

    sb.line("using Microsoft.EntityFrameworkCore;")
        .line("using Microsoft.EntityFrameworkCore.Metadata.Builders;")
        .blank()
        .line(format!("using {}.Domain.Entities;", ctx.project()))
        .blank()
        .line(format!(
            "namespace {}.Persistence.EntityConfigurations;",
            ctx.project()
        ))
        .blank()
        .line(format!(
            "public class {name}Configuration : IEntityTypeConfiguration<{name}>"
        ))
        .line("{")
        .line(format!(
            "    public void Configure(EntityTypeBuilder<{name}> builder)"
        ))
        .line("    {")
        .line(format!(
            "        builder.ToTable(\"{}\").HasKey({lc} => {lc}.Id);",
            ctx.plural()
        ))
        .blank()
        .line(format!(
            "        builder.Property({lc} => {lc}.Id).HasColumnName(\"Id\").IsRequired();"
        ));

    for prop in ctx.properties() {
        sb.line(configuration_line(&lc, prop));
    }

    sb.line(format!(
        "        builder.Property({lc} => {lc}.CreatedDate).HasColumnName(\"CreatedDate\").IsRequired();"
    ))
    .line(format!(
        "        builder.Property({lc} => {lc}.UpdatedDate).HasColumnName(\"UpdatedDate\");"
    ))
    .line(format!(
        "        builder.Property({lc} => {lc}.DeletedDate).HasColumnName(\"DeletedDate\");"
    ))
    .blank()
    .line(format!(
        "        builder.HasQueryFilter({lc} => !{lc}.DeletedDate.HasValue);"
    ))
    .line("    }")
    .line("}")
    .finish()
}

pub(super) fn render_repository_interface(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let id = ctx.id_type();

    SourceBuilder::new()
        .line("using Core.Persistence.Repositories;")
        .line(format!("using {}.Domain.Entities;", ctx.project()))
        .blank()
        .line(format!(
            "namespace {}.Application.Services.Repositories;",
            ctx.project()
        ))
        .blank()
        .line(format!(
            "public interface I{name}Repository : IAsyncRepository<{name}, {id}>, IRepository<{name}, {id}> {{ }}"
        ))
        .finish()
}

pub(super) fn render_repository(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let project = ctx.project();
    let db = ctx.db_context;

    SourceBuilder::new()
        .line("using Core.Persistence.Repositories;")
        .line(format!("using {project}.Application.Services.Repositories;"))
        .line(format!("using {project}.Domain.Entities;"))
        .line(format!("using {project}.Persistence.Contexts;"))
        .blank()
        .line(format!("namespace {project}.Persistence.Repositories;"))
        .blank()
        .line(format!(
            "public class {name}Repository : EfRepositoryBase<{name}, {}, {db}>, I{name}Repository",
            ctx.id_type()
        ))
        .line("{")
        .line(format!("    public {name}Repository({db} context)"))
        .line("        : base(context) { }")
        .line("}")
        .finish()
}

/// Register the repository pair in `PersistenceServiceRegistration`.
///
/// A legacy `…Services.<Plural>;` using is rewritten to `…<Plural>Service;`
/// first.
pub fn patch_repository_registration(
    src: &mut SourceFile,
    ctx: &ArtifactContext<'_>,
) -> Result<PatchOutcome, DomainError> {
    let project = ctx.project();
    let plural = ctx.plural();
    let name = ctx.name();

    let legacy = format!("using {project}.Application.Services.{plural};");
    let corrected = format!("using {project}.Application.Services.{plural}Service;");

    let outcome = replace_line(src, &legacy, &corrected)
        .or(add_import_if_missing(
            src,
            &format!("using {project}.Application.Services.Repositories;"),
        ))
        .or(add_import_if_missing(
            src,
            &format!("using {project}.Persistence.Repositories;"),
        ));

    let registration = format!("        services.AddScoped<I{name}Repository, {name}Repository>();");
    Ok(outcome.or(insert_before_marker(src, RETURN_SERVICES, &registration)?))
}

/// Ensure the context exposes exactly one `DbSet<Entity> Plural` line.
///
/// Fully-qualified declarations and other short declarations of the same
/// set are dropped; the canonical line goes after the last existing DbSet,
/// or after the last line holding `{` when there is none.
pub fn patch_db_context(src: &mut SourceFile, ctx: &ArtifactContext<'_>) -> PatchOutcome {
    let name = ctx.name();
    let plural = ctx.plural();

    let mut outcome =
        add_import_if_missing(src, &format!("using {}.Domain.Entities;", ctx.project()));

    let target = format!("    public DbSet<{name}> {plural} {{ get; set; }}");
    let qualified = format!("DbSet<{}.Domain.Entities.{name}>", ctx.project());
    let short = format!("DbSet<{name}>");
    let property = format!(" {plural} ");

    let lines = src.lines_mut();
    let before = lines.len();
    lines.retain(|l| {
        let stale_short = l.contains(&short) && l.contains(&property) && !l.contains(&target);
        !l.contains(&qualified) && !stale_short
    });
    let mut changed = lines.len() != before;

    if let Some(first) = lines.iter().position(|l| l.contains(&target)) {
        let before = lines.len();
        let mut index = 0;
        lines.retain(|l| {
            let keep = index <= first || !l.contains(&target);
            index += 1;
            keep
        });
        changed |= lines.len() != before;
    } else {
        let anchor = lines
            .iter()
            .rposition(|l| l.contains("public DbSet"))
            .or_else(|| lines.iter().rposition(|l| l.contains('{')))
            .unwrap_or(lines.len().saturating_sub(1));
        let at = (anchor + 1).min(lines.len());
        lines.insert(at, target);
        changed = true;
    }

    if changed {
        outcome = PatchOutcome::Applied;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    const REGISTRATION: &str = "\
using Microsoft.Extensions.DependencyInjection;
using Shop.Application.Services.Products;

namespace Shop.Persistence;

public static class PersistenceServiceRegistration
{
    public static IServiceCollection AddPersistenceServices(this IServiceCollection services)
    {
        return services;
    }
}
";

    const CONTEXT: &str = "\
using Microsoft.EntityFrameworkCore;

namespace Shop.Persistence.Contexts;

public class BaseDbContext : DbContext
{
    public DbSet<User> Users { get; set; }
    public DbSet<Shop.Domain.Entities.Product> Products { get; set; }
}
";

    #[test]
    fn configuration_omits_required_for_nullable() {
        let layout = layout();
        let entity = product();
        let text = render_configuration(&context(&layout, &entity, false));

        assert!(text.contains(
            "        builder.Property(product => product.Name).HasColumnName(\"Name\").IsRequired();"
        ));
        assert!(text.contains(
            "        builder.Property(product => product.Price).HasColumnName(\"Price\").IsRequired();"
        ));
        assert!(text.contains(
            "        builder.Property(product => product.IsActive).HasColumnName(\"IsActive\");\n"
        ));
        assert!(text.contains("builder.ToTable(\"Products\").HasKey(product => product.Id);"));
        assert!(text.contains("builder.HasQueryFilter(product => !product.DeletedDate.HasValue);"));
    }

    #[test]
    fn repository_uses_context_and_id() {
        let layout = layout();
        let entity = product();
        let text = render_repository(&context(&layout, &entity, false));
        assert!(text.contains(
            "public class ProductRepository : EfRepositoryBase<Product, int, BaseDbContext>, IProductRepository"
        ));
        assert!(text.ends_with("        : base(context) { }\n}\n"));
    }

    #[test]
    fn registration_is_idempotent() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, false);
        let mut src = SourceFile::parse("PersistenceServiceRegistration.cs", REGISTRATION);

        assert!(patch_repository_registration(&mut src, &ctx).unwrap().is_applied());
        let once = src.render();
        assert!(once.contains("using Shop.Application.Services.ProductsService;"));
        assert!(once.contains("using Shop.Persistence.Repositories;"));
        assert!(once.contains(
            "        services.AddScoped<IProductRepository, ProductRepository>();\n        return services;"
        ));

        assert_eq!(
            patch_repository_registration(&mut src, &ctx).unwrap(),
            PatchOutcome::AlreadyPresent
        );
        assert_eq!(src.render(), once);
    }

    #[test]
    fn registration_without_return_is_marker_error() {
        let layout = layout();
        let entity = product();
        let mut src = SourceFile::parse("R.cs", "using A;\n");
        let err = patch_repository_registration(&mut src, &context(&layout, &entity, false))
            .unwrap_err();
        assert!(matches!(err, DomainError::MarkerNotFound { .. }));
    }

    #[test]
    fn db_context_keeps_one_short_dbset() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, false);
        let mut src = SourceFile::parse("BaseDbContext.cs", CONTEXT);

        assert!(patch_db_context(&mut src, &ctx).is_applied());
        let once = src.render();
        assert!(once.contains("using Shop.Domain.Entities;"));
        assert!(!once.contains("Shop.Domain.Entities.Product>"));
        assert_eq!(once.matches("public DbSet<Product> Products").count(), 1);
        assert!(once.contains(
            "    public DbSet<User> Users { get; set; }\n    public DbSet<Product> Products { get; set; }"
        ));

        assert_eq!(patch_db_context(&mut src, &ctx), PatchOutcome::AlreadyPresent);
        assert_eq!(src.render(), once);
    }

    #[test]
    fn db_context_collapses_duplicates() {
        let layout = layout();
        let entity = product();
        let text = "using Shop.Domain.Entities;\nclass C\n{\n    public DbSet<Product> Products { get; set; }\n    public DbSet<Product> Products { get; set; }\n}\n";
        let mut src = SourceFile::parse("C.cs", text);
        assert!(patch_db_context(&mut src, &context(&layout, &entity, false)).is_applied());
        assert_eq!(src.render().matches("DbSet<Product>").count(), 1);
    }
}
