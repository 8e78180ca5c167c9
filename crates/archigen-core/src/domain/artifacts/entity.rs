use super::{
    ArtifactContext, SourceBuilder, push_assigning_constructor, push_default_constructor,
    push_properties,
};

pub(super) fn render_entity(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let props = ctx.properties();
    let mut sb = SourceBuilder::new();

    sb.line("using Core.Persistence.Repositories;")
        .blank()
        .line(format!("namespace {}.Domain.Entities;", ctx.project()))
        .blank()
        .line(format!("public class {name} : Entity<{}>", ctx.id_type()))
        .line("{");
    push_properties(&mut sb, props);
    sb.blank();
    push_default_constructor(&mut sb, name, props);

    if !props.is_empty() {
        sb.blank();
        push_assigning_constructor(&mut sb, name, None, props);
    }

    sb.line("}").finish()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::domain::{entities::EntityDefinition, parser::EntityParser};

    #[test]
    fn product_entity() {
        let layout = layout();
        let entity = product();
        let text = render_entity(&context(&layout, &entity, false));

        assert_eq!(
            text,
            "\
using Core.Persistence.Repositories;

namespace Shop.Domain.Entities;

public class Product : Entity<int>
{
    public string Name { get; set; }
    public decimal Price { get; set; }
    public bool? IsActive { get; set; }

    public Product()
    {
        Name = string.Empty;
    }

    public Product(string name, decimal price, bool? isActive)
    {
        Name = name;
        Price = price;
        IsActive = isActive;
    }
}
"
        );
    }

    #[test]
    fn entity_without_members_has_only_default_constructor() {
        let layout = layout();
        let entity = EntityDefinition::new("Tag", "Guid", vec![]).unwrap();
        let text = render_entity(&context(&layout, &entity, false));
        assert!(text.contains("public class Tag : Entity<Guid>"));
        assert_eq!(text.matches("public Tag(").count(), 1);
    }

    #[test]
    fn rendered_entity_parses_back() {
        let layout = layout();
        let entity = product();
        let text = render_entity(&context(&layout, &entity, false));
        assert_eq!(EntityParser::parse("Product.cs", &text).unwrap(), entity);
    }
}
