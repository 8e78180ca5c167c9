use super::{ArtifactContext, SourceBuilder, persistence::RETURN_SERVICES};
use crate::domain::{
    error::DomainError,
    patcher::{add_import_if_missing, insert_before_marker},
    source::{PatchOutcome, SourceFile},
};

const QUERY_USINGS: [&str; 5] = [
    "using System.Linq.Expressions;",
    "",
    "using Core.Persistence.Paging;",
    "",
    "using Microsoft.EntityFrameworkCore.Query;",
];

pub(super) fn render_service_interface(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let camel = ctx.camel();
    let mut sb = SourceBuilder::new();

    sb.lines(QUERY_USINGS)
        .blank()
        .line(format!("using {}.Domain.Entities;", ctx.project()))
        .blank()
        .line(format!("namespace {};", service_namespace(ctx)))
        .blank()
        .line(format!("public interface I{name}Service"))
        .line("{");
    push_get_signature(&mut sb, name, "");
    sb.line("    );").blank();
    push_get_list_signature(&mut sb, name, "");
    sb.line("    );")
        .blank()
        .line(format!("    Task<{name}> AddAsync({name} {camel});"))
        .line(format!("    Task<{name}> UpdateAsync({name} {camel});"))
        .line(format!(
            "    Task<{name}> DeleteAsync({name} {camel}, bool permanent = false);"
        ))
        .line("}")
        .finish()
}

pub(super) fn render_service_manager(ctx: &ArtifactContext<'_>) -> String {
    let project = ctx.project();
    let name = ctx.name();
    let camel = ctx.camel();
    let mut sb = SourceBuilder::new();

    sb.lines(QUERY_USINGS)
        .blank()
        .line(format!("using {};", ctx.feature_namespace("Rules")))
        .line(format!("using {project}.Application.Services.Repositories;"))
        .line(format!("using {project}.Domain.Entities;"))
        .blank()
        .blank()
        .line(format!("namespace {};", service_namespace(ctx)))
        .blank()
        .line(format!("public class {name}Manager : I{name}Service"))
        .line("{")
        .line(format!(
            "    private readonly I{name}Repository _{camel}Repository;"
        ))
        .line(format!(
            "    private readonly {name}BusinessRules _{camel}BusinessRules;"
        ))
        .blank()
        .line(format!(
            "    public {name}Manager(I{name}Repository {camel}Repository, {name}BusinessRules {camel}BusinessRules)"
        ))
        .line("    {")
        .line(format!("        _{camel}Repository = {camel}Repository;"))
        .line(format!("        _{camel}BusinessRules = {camel}BusinessRules;"))
        .line("    }")
        .blank();

    push_get_signature(&mut sb, name, "public async ");
    sb.line("    )")
        .line("    {")
        .line(format!(
            "        {name}? {camel} = await _{camel}Repository.GetAsync(predicate, include, withDeleted, enableTracking, cancellationToken);"
        ))
        .line(format!("        return {camel};"))
        .line("    }")
        .blank();

    push_get_list_signature(&mut sb, name, "public async ");
    sb.line("    )")
        .line("    {")
        .line(format!(
            "        IPaginate<{name}>? {camel}List = await _{camel}Repository.GetListAsync("
        ))
        .lines(
            [
                "predicate,",
                "orderBy,",
                "include,",
                "index,",
                "size,",
                "withDeleted,",
                "enableTracking,",
                "cancellationToken",
            ]
            .map(|arg| format!("            {arg}")),
        )
        .line("        );")
        .line(format!("        return {camel}List;"))
        .line("    }");

    for (method, verb, extra) in [
        ("AddAsync", "added", ""),
        ("UpdateAsync", "updated", ""),
        ("DeleteAsync", "deleted", ", bool permanent = false"),
    ] {
        sb.blank()
            .line(format!(
                "    public async Task<{name}> {method}({name} {camel}{extra})"
            ))
            .line("    {")
            .line(format!(
                "        {name} {verb}{name} = await _{camel}Repository.{method}({camel});"
            ))
            .blank()
            .line(format!("        return {verb}{name};"))
            .line("    }");
    }

    sb.line("}").finish()
}

fn service_namespace(ctx: &ArtifactContext<'_>) -> String {
    format!(
        "{}.Application.Services.{}Service",
        ctx.project(),
        ctx.plural()
    )
}

fn push_get_signature(sb: &mut SourceBuilder, name: &str, modifiers: &str) {
    sb.line(format!("    {modifiers}Task<{name}?> GetAsync("))
        .line(format!("        Expression<Func<{name}, bool>> predicate,"))
        .line(format!(
            "        Func<IQueryable<{name}>, IIncludableQueryable<{name}, object>>? include = null,"
        ))
        .line("        bool withDeleted = false,")
        .line("        bool enableTracking = true,")
        .line("        CancellationToken cancellationToken = default");
}

fn push_get_list_signature(sb: &mut SourceBuilder, name: &str, modifiers: &str) {
    sb.line(format!(
        "    {modifiers}Task<IPaginate<{name}>?> GetListAsync("
    ))
    .line(format!("        Expression<Func<{name}, bool>>? predicate = null,"))
    .line(format!(
        "        Func<IQueryable<{name}>, IOrderedQueryable<{name}>>? orderBy = null,"
    ))
    .line(format!(
        "        Func<IQueryable<{name}>, IIncludableQueryable<{name}, object>>? include = null,"
    ))
    .line("        int index = 0,")
    .line("        int size = 10,")
    .line("        bool withDeleted = false,")
    .line("        bool enableTracking = true,")
    .line("        CancellationToken cancellationToken = default");
}

/// What to do with a pre-existing `Services/<Plural>/` folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyServiceFolder {
    Remove,
    Keep,
}

/// Classify the legacy folder from its entries (file name, text if it is a
/// readable file).
///
/// An empty folder goes. Otherwise it goes only when it holds nothing but
/// the two service files, at least one of them is an obsolete copy, and the
/// new `<Plural>Service` folder exists.
pub fn legacy_service_folder(
    ctx: &ArtifactContext<'_>,
    entries: &[(String, Option<String>)],
    new_folder_exists: bool,
) -> LegacyServiceFolder {
    if entries.is_empty() {
        return LegacyServiceFolder::Remove;
    }

    let name = ctx.name();
    let known = [format!("I{name}Service.cs"), format!("{name}Manager.cs")];
    if !entries.iter().all(|(file, _)| known.contains(file)) {
        return LegacyServiceFolder::Keep;
    }

    let legacy_namespace = format!("Application.Services.{};", ctx.plural());
    let obsolete = entries.iter().filter_map(|(_, text)| text.as_deref()).any(|text| {
        text.contains("global::") || (text.contains("namespace ") && text.contains(&legacy_namespace))
    });

    if obsolete && new_folder_exists {
        LegacyServiceFolder::Remove
    } else {
        LegacyServiceFolder::Keep
    }
}

/// Register the service pair in `ApplicationServiceRegistration`.
///
/// Usings of the form `…Application.Services.<X>;` are first rewritten to
/// `…<X>Service;` when `service_folder_exists("<X>Service")`; names already
/// ending in `Service` and `Repositories` are left alone.
pub fn patch_service_registration(
    src: &mut SourceFile,
    ctx: &ArtifactContext<'_>,
    service_folder_exists: impl Fn(&str) -> bool,
) -> Result<PatchOutcome, DomainError> {
    let project = ctx.project();
    let name = ctx.name();
    let root = format!("{project}.Application.Services.");

    let mut outcome = PatchOutcome::AlreadyPresent;
    for line in src.lines_mut() {
        let Some(namespace) = line
            .trim()
            .strip_prefix("using ")
            .and_then(|rest| rest.strip_suffix(';'))
            .map(str::trim)
        else {
            continue;
        };
        let Some(suffix) = namespace.strip_prefix(root.as_str()) else {
            continue;
        };
        if suffix.ends_with("Service") || suffix == "Repositories" {
            continue;
        }

        let folder = format!("{suffix}Service");
        if service_folder_exists(&folder) {
            *line = format!("using {root}{folder};");
            outcome = PatchOutcome::Applied;
        }
    }

    let outcome = outcome
        .or(add_import_if_missing(
            src,
            &format!("using {};", service_namespace(ctx)),
        ))
        .or(add_import_if_missing(
            src,
            &format!("using {project}.Application.Services.Repositories;"),
        ));

    let registration = format!("        services.AddScoped<I{name}Service, {name}Manager>();");
    Ok(outcome.or(insert_before_marker(src, RETURN_SERVICES, &registration)?))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    const REGISTRATION: &str = "\
using Microsoft.Extensions.DependencyInjection;
using Shop.Application.Services.Orders;
using Shop.Application.Services.Repositories;
using Shop.Application.Services.Legacy;

namespace Shop.Application;

public static class ApplicationServiceRegistration
{
    public static IServiceCollection AddApplicationServices(this IServiceCollection services)
    {
        return services;
    }
}
";

    #[test]
    fn interface_and_manager_share_namespace() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, false);

        let interface = render_service_interface(&ctx);
        assert!(interface.contains("namespace Shop.Application.Services.ProductsService;"));
        assert!(interface.contains("    Task<Product> DeleteAsync(Product product, bool permanent = false);"));
        assert!(interface.starts_with(
            "using System.Linq.Expressions;\n\nusing Core.Persistence.Paging;\n\nusing Microsoft.EntityFrameworkCore.Query;\n\nusing Shop.Domain.Entities;\n"
        ));

        let manager = render_service_manager(&ctx);
        assert!(manager.contains("using Shop.Domain.Entities;\n\n\nnamespace Shop.Application.Services.ProductsService;"));
        assert!(manager.contains("public class ProductManager : IProductService"));
        assert!(manager.contains(
            "        Product deletedProduct = await _productRepository.DeleteAsync(product);\n\n        return deletedProduct;"
        ));
        assert!(manager.contains("            cancellationToken\n        );\n        return productList;"));
    }

    #[test]
    fn registration_sweeps_legacy_usings() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, false);
        let mut src = SourceFile::parse("ApplicationServiceRegistration.cs", REGISTRATION);

        let outcome =
            patch_service_registration(&mut src, &ctx, |folder| folder == "OrdersService").unwrap();
        assert!(outcome.is_applied());

        let text = src.render();
        assert!(text.contains("using Shop.Application.Services.OrdersService;"));
        assert!(text.contains("using Shop.Application.Services.Legacy;"));
        assert!(text.contains("using Shop.Application.Services.ProductsService;"));
        assert_eq!(text.matches("Services.Repositories;").count(), 1);
        assert!(text.contains("        services.AddScoped<IProductService, ProductManager>();"));

        let again =
            patch_service_registration(&mut src, &ctx, |folder| folder == "OrdersService").unwrap();
        assert_eq!(again, PatchOutcome::AlreadyPresent);
    }

    #[test]
    fn legacy_folder_classification() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, false);
        let file = |name: &str, text: &str| (name.to_string(), Some(text.to_string()));

        assert_eq!(legacy_service_folder(&ctx, &[], false), LegacyServiceFolder::Remove);

        let obsolete = [file(
            "IProductService.cs",
            "namespace Shop.Application.Services.Products;",
        )];
        assert_eq!(legacy_service_folder(&ctx, &obsolete, true), LegacyServiceFolder::Remove);
        assert_eq!(legacy_service_folder(&ctx, &obsolete, false), LegacyServiceFolder::Keep);

        let edited = [file("ProductManager.cs", "namespace Custom;")];
        assert_eq!(legacy_service_folder(&ctx, &edited, true), LegacyServiceFolder::Keep);

        let foreign = [
            file("IProductService.cs", "global::X"),
            file("Notes.md", "mine"),
        ];
        assert_eq!(legacy_service_folder(&ctx, &foreign, true), LegacyServiceFolder::Keep);
    }
}
