use scorekeep_back::services::documentation::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let doc = ApiDoc::openapi();
    println!("{}", doc.to_pretty_json()?);
    Ok(())
}
