use super::ArtifactContext;
use crate::domain::{
    error::DomainError,
    patcher::add_import_if_missing,
    source::{PatchOutcome, SourceFile},
};

pub const OPERATION_CLAIM_SEED_FILE: &str = "OperationClaimConfiguration.cs";

/// Permission names seeded for every secured feature, in order.
pub(super) const CLAIMS: [&str; 6] = ["Admin", "Read", "Write", "Create", "Update", "Delete"];

const RETURN_CLAIMS: &str = "return featureOperationClaims;";

/// Seed the feature's claims into `OperationClaimConfiguration`.
///
/// `Ok(AlreadyPresent)` when a `region <Plural>` already exists;
/// `MarkerNotFound` (file untouched) when there is no
/// `return featureOperationClaims;` to anchor on.
pub fn patch_operation_claims(
    src: &mut SourceFile,
    ctx: &ArtifactContext<'_>,
) -> Result<PatchOutcome, DomainError> {
    let plural = ctx.plural();
    let region = format!("region {plural}");
    if src.contains(&region) {
        return Ok(PatchOutcome::AlreadyPresent);
    }

    let Some(anchor) = src.lines().iter().rposition(|l| l.contains(RETURN_CLAIMS)) else {
        return Err(DomainError::MarkerNotFound {
            marker: RETURN_CLAIMS.to_string(),
            file: src.display_name(),
        });
    };

    let mut block = vec![
        String::new(),
        format!("        #{region}"),
        "        featureOperationClaims.AddRange(".to_string(),
        "            [".to_string(),
    ];
    block.extend(CLAIMS.iter().map(|claim| {
        format!("                new() {{ Id = ++lastId, Name = {plural}OperationClaims.{claim} }},")
    }));
    block.extend([
        "            ]".to_string(),
        "        );".to_string(),
        "        #endregion".to_string(),
        String::new(),
    ]);
    src.insert_lines(anchor, &block);

    add_import_if_missing(src, &format!("using {};", ctx.feature_namespace("Constants")));
    Ok(PatchOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    const SEED: &str = "\
using Microsoft.EntityFrameworkCore;
using Shop.Application.Features.Users.Constants;

namespace Shop.Persistence.EntityConfigurations;

public class OperationClaimConfiguration
{
    private IEnumerable<OperationClaim> getFeatureOperationClaims(int initialId)
    {
        int lastId = initialId;
        List<OperationClaim> featureOperationClaims = new();
        return featureOperationClaims;
    }
}
";

    #[test]
    fn seeds_region_once() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, true);
        let mut src = SourceFile::parse(OPERATION_CLAIM_SEED_FILE, SEED);

        assert_eq!(patch_operation_claims(&mut src, &ctx).unwrap(), PatchOutcome::Applied);
        let text = src.render();
        assert!(text.contains(
            "using Shop.Application.Features.Users.Constants;\nusing Shop.Application.Features.Products.Constants;\n"
        ));
        assert!(text.contains(
            "\n\n        #region Products\n        featureOperationClaims.AddRange(\n            [\n"
        ));
        assert_eq!(text.matches("ProductsOperationClaims.").count(), 6);
        assert!(text.contains("        #endregion\n\n        return featureOperationClaims;"));

        assert_eq!(
            patch_operation_claims(&mut src, &ctx).unwrap(),
            PatchOutcome::AlreadyPresent
        );
        assert_eq!(src.render(), text);
    }

    #[test]
    fn import_goes_first_without_usings() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, true);
        let seed = &SEED[SEED.find("namespace").unwrap()..];
        let mut src = SourceFile::parse(OPERATION_CLAIM_SEED_FILE, seed);

        assert_eq!(patch_operation_claims(&mut src, &ctx).unwrap(), PatchOutcome::Applied);
        assert!(src
            .render()
            .starts_with("using Shop.Application.Features.Products.Constants;\nnamespace Shop.Persistence"));
    }

    #[test]
    fn missing_return_leaves_file() {
        let layout = layout();
        let entity = product();
        let ctx = context(&layout, &entity, true);
        let mut src = SourceFile::parse(OPERATION_CLAIM_SEED_FILE, "using A;\nclass C {}\n");

        assert!(matches!(
            patch_operation_claims(&mut src, &ctx),
            Err(DomainError::MarkerNotFound { .. })
        ));
        assert_eq!(src.render(), "using A;\nclass C {}\n");
    }
}
