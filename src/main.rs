// Entrypoint for the CLI application.
// - Keeps `main` small: create an API client and a slug directory, then
//   hand both to the interactive loop.
// - Returns `anyhow::Result`; only a failed startup refresh aborts here.

use fiveable_cli::{api::ApiClient, catalog::SlugDirectory, ui};

fn main() -> anyhow::Result<()> {
    // Base URL comes from `FIVEABLE_BASE_URL` or defaults to the public
    // library site. See `api::ApiClient::from_env`.
    let api = ApiClient::from_env()?;
    let directory = SlugDirectory::new();

    // Start the interactive loop. This call blocks until the user exits.
    ui::run(api, directory)?;
    Ok(())
}
