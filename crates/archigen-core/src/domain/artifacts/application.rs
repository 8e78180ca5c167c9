//! Feature-folder renderers: CQRS commands and queries with their handlers,
//! responses, validators, constants, resources, rules and mapping profile.

use super::{
    ArtifactContext, SourceBuilder, push_assigning_constructor, push_default_constructor,
    push_properties,
};
use crate::domain::class_body::validation_rule;

// ── Commands ─────────────────────────────────────────────────────────────────

pub(super) fn render_create_command(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let camel = ctx.camel();
    let class = format!("Create{name}Command");
    let mut sb = SourceBuilder::new();

    push_command_header(&mut sb, ctx, "Create", "Created");
    push_properties(&mut sb, ctx.properties());
    sb.blank();
    push_default_constructor(&mut sb, &class, ctx.properties());
    sb.blank();
    push_assigning_constructor(&mut sb, &class, None, ctx.properties());
    push_roles(&mut sb, ctx, "Create");
    sb.blank();

    push_handler(&mut sb, ctx, "Create", "Command", "Created", true);
    sb.line(format!(
        "            {name} mapped{name} = _mapper.Map<{name}>(request);"
    ))
    .line(format!(
        "            {name} created{name} = await _{camel}Repository.AddAsync(mapped{name}, cancellationToken: cancellationToken);"
    ))
    .line(format!(
        "            Created{name}Response response = _mapper.Map<Created{name}Response>(created{name});"
    ));
    close_handler(&mut sb)
}

pub(super) fn render_update_command(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let camel = ctx.camel();
    let class = format!("Update{name}Command");
    let mut sb = SourceBuilder::new();

    push_command_header(&mut sb, ctx, "Update", "Updated");
    sb.line(format!("    public {} Id {{ get; set; }}", ctx.id_type()));
    push_properties(&mut sb, ctx.properties());
    sb.blank();
    push_default_constructor(&mut sb, &class, ctx.properties());
    sb.blank();
    push_assigning_constructor(&mut sb, &class, Some(ctx.id_type()), ctx.properties());
    push_roles(&mut sb, ctx, "Update");
    sb.blank();

    push_handler(&mut sb, ctx, "Update", "Command", "Updated", true);
    sb.line(format!(
        "            {name} mapped{name} = _mapper.Map<{name}>(request);"
    ))
    .line(format!(
        "            {name} updated{name} = await _{camel}Repository.UpdateAsync(mapped{name}, cancellationToken: cancellationToken);"
    ))
    .line(format!(
        "            Updated{name}Response response = _mapper.Map<Updated{name}Response>(updated{name});"
    ));
    close_handler(&mut sb)
}

pub(super) fn render_delete_command(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let camel = ctx.camel();
    let lower = camel.to_lowercase();
    let mut sb = SourceBuilder::new();

    push_command_header(&mut sb, ctx, "Delete", "Deleted");
    sb.line(format!("    public {} Id {{ get; set; }}", ctx.id_type()));
    push_roles(&mut sb, ctx, "Delete");
    sb.blank();

    push_handler(&mut sb, ctx, "Delete", "Command", "Deleted", true);
    sb.line(format!(
        "            {name}? {camel} = await _{camel}Repository.GetAsync(predicate: {lower} => {lower}.Id == request.Id, cancellationToken: cancellationToken);"
    ))
    .line(format!(
        "            await _{camel}BusinessRules.{name}ShouldExistWhenSelected({camel});"
    ))
    .blank()
    .line(format!(
        "            await _{camel}Repository.DeleteAsync({camel}!, cancellationToken: cancellationToken);"
    ))
    .blank()
    .line(format!(
        "            Deleted{name}Response response = _mapper.Map<Deleted{name}Response>({camel});"
    ));
    close_handler(&mut sb)
}

/// Usings, namespace and the request class line with its opening brace.
fn push_command_header(
    sb: &mut SourceBuilder,
    ctx: &ArtifactContext<'_>,
    action: &str,
    response_prefix: &str,
) {
    let project = ctx.project();
    let plural = ctx.plural();
    let name = ctx.name();

    sb.line("using AutoMapper;")
        .line("using MediatR;")
        .line(format!("using {project}.Domain.Entities;"))
        .line(format!("using {project}.Application.Services.Repositories;"))
        .line(format!("using {};", ctx.feature_namespace("Rules")));

    if ctx.enable_security {
        sb.line("using Core.Application.Pipelines.Authorization;")
            .line(format!("using {};", ctx.feature_namespace("Constants")))
            .blank()
            .line(format!(
                "using static {}.{plural}OperationClaims;",
                ctx.feature_namespace("Constants")
            ));
    }

    let response = format!("IRequest<{response_prefix}{name}Response>");
    let interfaces = if ctx.enable_security {
        format!("{response}, ISecuredRequest")
    } else {
        response
    };

    sb.blank()
        .line(format!(
            "namespace {};",
            ctx.feature_namespace(&format!("Commands.{action}"))
        ))
        .blank()
        .line(format!("public class {action}{name}Command : {interfaces}"))
        .line("{");
}

fn push_roles(sb: &mut SourceBuilder, ctx: &ArtifactContext<'_>, claim: &str) {
    if ctx.enable_security {
        sb.blank().line(format!(
            "    public string[] Roles => new[] {{ Admin, Write, {}OperationClaims.{claim} }};",
            ctx.plural()
        ));
    }
}

/// Nested handler class up to the first statement of `Handle`.
fn push_handler(
    sb: &mut SourceBuilder,
    ctx: &ArtifactContext<'_>,
    action: &str,
    request_kind: &str,
    response_prefix: &str,
    with_rules: bool,
) {
    let name = ctx.name();
    let camel = ctx.camel();
    let request = format!("{action}{name}{request_kind}");
    let response = if response_prefix == "GetList" {
        format!("GetListResponse<GetList{name}ListItemDto>")
    } else {
        format!("{response_prefix}{name}Response")
    };

    let mut params = vec![
        format!("I{name}Repository {camel}Repository"),
        "IMapper mapper".to_string(),
    ];
    if with_rules {
        params.push(format!("{name}BusinessRules {camel}BusinessRules"));
    }

    sb.line(format!(
        "    public class {request}Handler : IRequestHandler<{request}, {response}>"
    ))
    .line("    {")
    .line(format!(
        "        private readonly I{name}Repository _{camel}Repository;"
    ))
    .line("        private readonly IMapper _mapper;");
    if with_rules {
        sb.line(format!(
            "        private readonly {name}BusinessRules _{camel}BusinessRules;"
        ));
    }

    sb.blank()
        .line(format!("        public {request}Handler({})", params.join(", ")))
        .line("        {")
        .line(format!("            _{camel}Repository = {camel}Repository;"))
        .line("            _mapper = mapper;");
    if with_rules {
        sb.line(format!(
            "            _{camel}BusinessRules = {camel}BusinessRules;"
        ));
    }

    sb.line("        }")
        .blank()
        .line(format!(
            "        public async Task<{response}> Handle({request} request, CancellationToken cancellationToken)"
        ))
        .line("        {");
}

fn close_handler(sb: &mut SourceBuilder) -> String {
    sb.line("            return response;")
        .line("        }")
        .line("    }")
        .line("}")
        .finish()
}

// ── Responses and DTOs ───────────────────────────────────────────────────────

/// `<prefix><Entity>Response` carrying the identifier and every member.
pub(super) fn render_response(ctx: &ArtifactContext<'_>, namespace: &str, prefix: &str) -> String {
    let class = format!("{prefix}{}Response", ctx.name());
    let mut sb = SourceBuilder::new();

    sb.line("using Core.Application.Responses;")
        .blank()
        .line(format!("namespace {};", ctx.feature_namespace(namespace)))
        .blank()
        .line(format!("public class {class} : IResponse"))
        .line("{")
        .line(format!("    public {} Id {{ get; set; }}", ctx.id_type()));
    push_properties(&mut sb, ctx.properties());
    sb.blank();
    push_default_constructor(&mut sb, &class, ctx.properties());
    sb.blank();
    push_assigning_constructor(&mut sb, &class, Some(ctx.id_type()), ctx.properties());
    sb.line("}").finish()
}

pub(super) fn render_deleted_response(ctx: &ArtifactContext<'_>) -> String {
    let class = format!("Deleted{}Response", ctx.name());
    let id = ctx.id_type();

    SourceBuilder::new()
        .line("using Core.Application.Responses;")
        .blank()
        .line(format!(
            "namespace {};",
            ctx.feature_namespace("Commands.Delete")
        ))
        .blank()
        .line(format!("public class {class} : IResponse"))
        .line("{")
        .line(format!("    public {id} Id {{ get; set; }}"))
        .blank()
        .line(format!("    public {class}()"))
        .line("    {")
        .line("    }")
        .blank()
        .line(format!("    public {class}({id} id)"))
        .line("    {")
        .line("        Id = id;")
        .line("    }")
        .line("}")
        .finish()
}

pub(super) fn render_list_item_dto(ctx: &ArtifactContext<'_>) -> String {
    let class = format!("GetList{}ListItemDto", ctx.name());
    let mut sb = SourceBuilder::new();

    sb.line("using Core.Application.Dtos;")
        .blank()
        .line(format!(
            "namespace {};",
            ctx.feature_namespace("Queries.GetList")
        ))
        .blank()
        .line(format!("public class {class} : IDto"))
        .line("{")
        .line(format!("    public {} Id {{ get; set; }}", ctx.id_type()));
    push_properties(&mut sb, ctx.properties());
    sb.blank();
    push_default_constructor(&mut sb, &class, ctx.properties());
    sb.line("}").finish()
}

// ── Validators ───────────────────────────────────────────────────────────────

/// FluentValidation validator for the `action` command.
pub(super) fn render_validator(ctx: &ArtifactContext<'_>, action: &str) -> String {
    let command = format!("{action}{}Command", ctx.name());
    let mut sb = SourceBuilder::new();

    sb.line("using FluentValidation;")
        .blank()
        .line(format!(
            "namespace {};",
            ctx.feature_namespace(&format!("Commands.{action}"))
        ))
        .blank()
        .line(format!(
            "public class {command}Validator : AbstractValidator<{command}>"
        ))
        .line("{")
        .line(format!("    public {command}Validator()"))
        .line("    {");
    if action == "Update" {
        sb.line("        RuleFor(command => command.Id).NotEmpty();");
    }
    sb.lines(ctx.properties().iter().map(validation_rule))
        .line("    }")
        .line("}")
        .finish()
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub(super) fn render_get_by_id_query(ctx: &ArtifactContext<'_>) -> String {
    let project = ctx.project();
    let name = ctx.name();
    let camel = ctx.camel();
    let lower = camel.to_lowercase();
    let mut sb = SourceBuilder::new();

    sb.line("using AutoMapper;")
        .line("using MediatR;")
        .line(format!("using {project}.Domain.Entities;"))
        .line(format!("using {project}.Application.Services.Repositories;"))
        .blank()
        .line(format!(
            "namespace {};",
            ctx.feature_namespace("Queries.GetById")
        ))
        .blank()
        .line(format!(
            "public class GetById{name}Query : IRequest<GetById{name}Response>"
        ))
        .line("{")
        .line(format!("    public {} Id {{ get; set; }}", ctx.id_type()))
        .blank();

    push_handler(&mut sb, ctx, "GetById", "Query", "GetById", false);
    sb.line(format!(
        "            {name}? {camel} = await _{camel}Repository.GetAsync(predicate: {lower} => {lower}.Id == request.Id, cancellationToken: cancellationToken);"
    ))
    .line(format!(
        "            GetById{name}Response response = _mapper.Map<GetById{name}Response>({camel});"
    ));
    close_handler(&mut sb)
}

pub(super) fn render_get_list_query(ctx: &ArtifactContext<'_>) -> String {
    let project = ctx.project();
    let name = ctx.name();
    let camel = ctx.camel();
    let dto_list = format!("GetListResponse<GetList{name}ListItemDto>");
    let mut sb = SourceBuilder::new();

    sb.line("using AutoMapper;")
        .line("using MediatR;")
        .line("using Core.Application.Requests;")
        .line("using Core.Application.Responses;")
        .line("using Core.Persistence.Paging;")
        .line(format!("using {project}.Domain.Entities;"))
        .line(format!("using {project}.Application.Services.Repositories;"))
        .blank()
        .line(format!(
            "namespace {};",
            ctx.feature_namespace("Queries.GetList")
        ))
        .blank()
        .line(format!("public class GetList{name}Query : IRequest<{dto_list}>"))
        .line("{")
        .line("    public PageRequest PageRequest { get; set; } = new();")
        .blank();

    push_handler(&mut sb, ctx, "GetList", "Query", "GetList", false);
    sb.line(format!(
        "            IPaginate<{name}> {camel}s = await _{camel}Repository.GetListAsync("
    ))
    .line("                index: request.PageRequest.PageIndex,")
    .line("                size: request.PageRequest.PageSize,")
    .line("                cancellationToken: cancellationToken")
    .line("            );")
    .line(format!(
        "            {dto_list} response = _mapper.Map<{dto_list}>({camel}s);"
    ));
    close_handler(&mut sb)
}

// ── Constants, resources, rules, profiles ────────────────────────────────────

pub(super) fn render_operation_claims(ctx: &ArtifactContext<'_>) -> String {
    let plural = ctx.plural();
    let mut sb = SourceBuilder::new();

    sb.line(format!("namespace {};", ctx.feature_namespace("Constants")))
        .blank()
        .line(format!("public static class {plural}OperationClaims"))
        .line("{")
        .line(format!("    private const string Section = \"{plural}\";"))
        .blank();
    for claim in super::security::CLAIMS {
        sb.line(format!(
            "    public const string {claim} = $\"{{Section}}.{claim}\";"
        ));
    }
    sb.line("}").finish()
}

pub(super) fn render_messages(ctx: &ArtifactContext<'_>) -> String {
    let plural = ctx.plural();
    let name = ctx.name();

    SourceBuilder::new()
        .line(format!("namespace {};", ctx.feature_namespace("Constants")))
        .blank()
        .line(format!("public static class {plural}Messages"))
        .line("{")
        .line(format!("    public const string SectionName = \"{plural}\";"))
        .line(format!(
            "    public const string {name}NotExists = \"{name}NotExists\";"
        ))
        .line("}")
        .finish()
}

/// Single-entry locale file; written without a trailing newline.
pub(super) fn render_resource(ctx: &ArtifactContext<'_>, not_found: &str) -> String {
    let name = ctx.name();
    format!("{name}NotExists: \"{name} {not_found}\"")
}

pub(super) fn render_business_rules(ctx: &ArtifactContext<'_>) -> String {
    let project = ctx.project();
    let plural = ctx.plural();
    let name = ctx.name();
    let camel = ctx.camel();
    let lower = camel.to_lowercase();

    SourceBuilder::new()
        .line("using Core.Application.Rules;")
        .line("using Core.CrossCuttingConcerns.Exception.Types;")
        .line("using Core.Localization.Abstraction;")
        .line(format!("using {};", ctx.feature_namespace("Constants")))
        .line(format!("using {project}.Application.Services.Repositories;"))
        .line(format!("using {project}.Domain.Entities;"))
        .blank()
        .line(format!("namespace {};", ctx.feature_namespace("Rules")))
        .blank()
        .line(format!("public class {name}BusinessRules : BaseBusinessRules"))
        .line("{")
        .line(format!(
            "    private readonly I{name}Repository _{camel}Repository;"
        ))
        .line("    private readonly ILocalizationService _localizationService;")
        .blank()
        .line(format!("    public {name}BusinessRules("))
        .line(format!("        I{name}Repository {camel}Repository,"))
        .line("        ILocalizationService localizationService")
        .line("    )")
        .line("    {")
        .line(format!("        _{camel}Repository = {camel}Repository;"))
        .line("        _localizationService = localizationService;")
        .line("    }")
        .blank()
        .line("    private async Task throwBusinessException(string messageKey)")
        .line("    {")
        .line(format!(
            "        string message = await _localizationService.GetLocalizedAsync(messageKey, {plural}Messages.SectionName);"
        ))
        .line("        throw new BusinessException(message);")
        .line("    }")
        .blank()
        .line(format!(
            "    public async Task {name}ShouldExistWhenSelected({name}? {camel})"
        ))
        .line("    {")
        .line(format!("        if ({camel} == null)"))
        .line(format!(
            "            await throwBusinessException({plural}Messages.{name}NotExists);"
        ))
        .line("    }")
        .blank()
        .line(format!(
            "    public async Task {name}IdShouldExistWhenSelected({} id)",
            ctx.id_type()
        ))
        .line("    {")
        .line(format!(
            "        bool doesExist = await _{camel}Repository.AnyAsync(predicate: {lower} => {lower}.Id == id);"
        ))
        .line("        if (!doesExist)")
        .line(format!(
            "            await throwBusinessException({plural}Messages.{name}NotExists);"
        ))
        .line("    }")
        .line("}")
        .finish()
}

/// Namespaces of the five request folders, in the order they are imported.
pub(super) const FEATURE_FOLDERS: [&str; 5] = [
    "Commands.Create",
    "Commands.Update",
    "Commands.Delete",
    "Queries.GetById",
    "Queries.GetList",
];

pub(super) fn render_mapping_profiles(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let mut sb = SourceBuilder::new();

    sb.line("using AutoMapper;")
        .line("using Core.Application.Responses;")
        .line("using Core.Persistence.Paging;")
        .line(format!("using {}.Domain.Entities;", ctx.project()))
        .lines(
            FEATURE_FOLDERS
                .iter()
                .map(|folder| format!("using {};", ctx.feature_namespace(folder))),
        )
        .blank()
        .line(format!("namespace {};", ctx.feature_namespace("Profiles")))
        .blank()
        .line("public class MappingProfiles : Profile")
        .line("{")
        .line("    public MappingProfiles()")
        .line("    {");

    for target in [
        format!("Create{name}Command"),
        format!("Created{name}Response"),
        format!("Update{name}Command"),
        format!("Updated{name}Response"),
        format!("Delete{name}Command"),
        format!("Deleted{name}Response"),
        format!("GetById{name}Response"),
        format!("GetList{name}ListItemDto"),
    ] {
        sb.line(format!(
            "        CreateMap<{name}, {target}>().ReverseMap();"
        ));
    }

    sb.line(format!(
        "        CreateMap<IPaginate<{name}>, GetListResponse<GetList{name}ListItemDto>>().ReverseMap();"
    ))
    .line("    }")
    .line("}")
    .finish()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn create_command_shape() {
        let layout = layout();
        let entity = product();
        let text = render_create_command(&context(&layout, &entity, false));

        assert!(text.starts_with(
            "using AutoMapper;\nusing MediatR;\nusing Shop.Domain.Entities;\nusing Shop.Application.Services.Repositories;\nusing Shop.Application.Features.Products.Rules;\n\nnamespace Shop.Application.Features.Products.Commands.Create;\n"
        ));
        assert!(text.contains("public class CreateProductCommand : IRequest<CreatedProductResponse>\n{"));
        assert!(text.contains("    public CreateProductCommand()\n    {\n        Name = string.Empty;\n    }"));
        assert!(text.contains("    public CreateProductCommand(string name, decimal price, bool? isActive)"));
        assert!(text.contains(
            "        public CreateProductCommandHandler(IProductRepository productRepository, IMapper mapper, ProductBusinessRules productBusinessRules)"
        ));
        assert!(!text.contains("Roles"));
        assert!(text.ends_with("            return response;\n        }\n    }\n}\n"));
    }

    #[test]
    fn secured_commands_declare_roles() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, true);

        let create = render_create_command(&ctx);
        assert!(create.contains("IRequest<CreatedProductResponse>, ISecuredRequest"));
        assert!(create.contains(
            "using Shop.Application.Features.Products.Constants;\n\nusing static Shop.Application.Features.Products.Constants.ProductsOperationClaims;\n\nnamespace"
        ));
        assert!(create.contains(
            "    public string[] Roles => new[] { Admin, Write, ProductsOperationClaims.Create };"
        ));
        assert!(render_delete_command(&ctx).contains("ProductsOperationClaims.Delete }"));
    }

    #[test]
    fn update_command_leads_with_id() {
        let layout = layout();
        let entity = product();
        let text = render_update_command(&context(&layout, &entity, false));
        assert!(text.contains("{\n    public int Id { get; set; }\n    public string Name { get; set; }"));
        assert!(text.contains(
            "    public UpdateProductCommand(int id, string name, decimal price, bool? isActive)\n    {\n        Id = id;"
        ));
    }

    #[test]
    fn delete_handler_checks_existence() {
        let layout = layout();
        let entity = product();
        let text = render_delete_command(&context(&layout, &entity, false));
        assert!(text.contains(
            "            Product? product = await _productRepository.GetAsync(predicate: product => product.Id == request.Id, cancellationToken: cancellationToken);"
        ));
        assert!(text.contains("            await _productBusinessRules.ProductShouldExistWhenSelected(product);\n\n"));
        assert!(!text.contains("string name"));
    }

    #[test]
    fn queries_skip_business_rules() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, false);

        let by_id = render_get_by_id_query(&ctx);
        assert!(by_id.contains(
            "        public GetByIdProductQueryHandler(IProductRepository productRepository, IMapper mapper)"
        ));
        assert!(!by_id.contains("BusinessRules"));

        let list = render_get_list_query(&ctx);
        assert!(list.contains(
            "    public class GetListProductQueryHandler : IRequestHandler<GetListProductQuery, GetListResponse<GetListProductListItemDto>>"
        ));
        assert!(list.contains("            IPaginate<Product> products = await _productRepository.GetListAsync("));
    }

    #[test]
    fn responses_and_dto() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, false);

        let created = render_response(&ctx, "Commands.Create", "Created");
        assert!(created.contains("namespace Shop.Application.Features.Products.Commands.Create;"));
        assert!(created.contains(
            "    public CreatedProductResponse(int id, string name, decimal price, bool? isActive)"
        ));

        let deleted = render_deleted_response(&ctx);
        assert!(deleted.contains("    public DeletedProductResponse()\n    {\n    }"));
        assert!(!deleted.contains("Name"));

        let dto = render_list_item_dto(&ctx);
        assert!(dto.contains("public class GetListProductListItemDto : IDto"));
        assert_eq!(dto.matches("public GetListProductListItemDto(").count(), 1);
    }

    #[test]
    fn validators_use_rule_table() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, false);

        let create = render_validator(&ctx, "Create");
        assert!(create.contains(
            "public class CreateProductCommandValidator : AbstractValidator<CreateProductCommand>"
        ));
        assert!(create.contains(
            "        RuleFor(command => command.Name).NotEmpty().MinimumLength(1).MaximumLength(100);"
        ));
        assert!(create.contains("        RuleFor(command => command.Price).GreaterThan(0);"));
        assert!(!create.contains("command.Id"));

        let update = render_validator(&ctx, "Update");
        assert!(update.contains("        RuleFor(command => command.Id).NotEmpty();"));
    }

    #[test]
    fn constants_and_resources() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, true);

        let claims = render_operation_claims(&ctx);
        assert!(claims.contains("    private const string Section = \"Products\";"));
        assert!(claims.contains("    public const string Delete = $\"{Section}.Delete\";"));

        assert!(render_messages(&ctx).contains(
            "    public const string ProductNotExists = \"ProductNotExists\";"
        ));
        assert_eq!(
            render_resource(&ctx, "not found."),
            "ProductNotExists: \"Product not found.\""
        );
    }

    #[test]
    fn mapping_profiles_cover_every_request() {
        let layout = layout();
        let entity = product();
        let text = render_mapping_profiles(&context(&layout, &entity, false));
        assert_eq!(text.matches(".ReverseMap();").count(), 9);
        assert!(text.contains("using Shop.Application.Features.Products.Queries.GetList;"));
    }
}
