use super::{ArtifactContext, SourceBuilder, application::FEATURE_FOLDERS};

pub(super) fn render_controller(ctx: &ArtifactContext<'_>) -> String {
    let name = ctx.name();
    let id = ctx.id_type();
    let mut sb = SourceBuilder::new();

    sb.line("using Microsoft.AspNetCore.Mvc;")
        .line("using Core.Application.Requests;")
        .line("using Core.Application.Responses;")
        .lines(
            FEATURE_FOLDERS
                .iter()
                .map(|folder| format!("using {};", ctx.feature_namespace(folder))),
        )
        .blank()
        .line(format!("namespace {}.WebAPI.Controllers;", ctx.project()))
        .blank()
        .line("[Route(\"api/[controller]\")]")
        .line("[ApiController]")
        .line(format!(
            "public class {}Controller : BaseController",
            ctx.plural()
        ))
        .line("{")
        .blank()
        .line("    [HttpPost]")
        .line(format!(
            "    public async Task<ActionResult<Created{name}Response>> Create(Create{name}Command command)"
        ))
        .line("    {")
        .line("        var response = await Mediator.Send(command);")
        .line("        return CreatedAtAction(nameof(GetById), new { id = response.Id }, response);")
        .line("    }")
        .blank()
        .line("    [HttpPut]")
        .line(format!(
            "    public async Task<ActionResult<Updated{name}Response>> Update(Update{name}Command command)"
        ))
        .line("    {")
        .line("        var response = await Mediator.Send(command);")
        .line("        return Ok(response);")
        .line("    }")
        .blank()
        .line("    [HttpDelete(\"{id}\")]")
        .line(format!(
            "    public async Task<ActionResult<Deleted{name}Response>> Delete({id} id)"
        ))
        .line("    {")
        .line(format!(
            "        var response = await Mediator.Send(new Delete{name}Command {{ Id = id }});"
        ))
        .line("        return Ok(response);")
        .line("    }")
        .blank()
        .line("    [HttpGet(\"{id}\")]")
        .line(format!(
            "    public async Task<ActionResult<GetById{name}Response>> GetById({id} id)"
        ))
        .line("    {")
        .line(format!(
            "        var response = await Mediator.Send(new GetById{name}Query {{ Id = id }});"
        ))
        .line("        return Ok(response);")
        .line("    }")
        .blank()
        .line("    [HttpGet]")
        .line(format!(
            "    public async Task<ActionResult<GetListResponse<GetList{name}ListItemDto>>> GetList([FromQuery] PageRequest pageRequest)"
        ))
        .line("    {")
        .line(format!(
            "        var query = new GetList{name}Query {{ PageRequest = pageRequest }};"
        ))
        .line("        var response = await Mediator.Send(query);")
        .line("        return Ok(response);")
        .line("    }")
        .line("}")
        .finish()
}
