//! Print the OpenAPI document as JSON, or YAML with `--yaml`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::Write;

use color_eyre::eyre::{Context, Result};
use recipe_backend::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    let yaml = std::env::args().skip(1).any(|arg| arg == "--yaml");
    let doc = ApiDoc::openapi();
    let rendered = if yaml {
        doc.to_yaml().wrap_err("render OpenAPI YAML")?
    } else {
        doc.to_pretty_json().wrap_err("render OpenAPI JSON")?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").wrap_err("write OpenAPI document")?;
    Ok(())
}
