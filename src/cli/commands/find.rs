//! Single-track lookup: search, show, add.

use tokio::runtime::Runtime;

use crate::catalog::{AppleMusicClient, DestinationCatalog, http};
use crate::config::Config;
use crate::error::ResultExt;

/// Find one track on Apple Music and add it to the library
pub fn cmd_find(rt: &Runtime, config: &Config, name: &str, no_add: bool) -> anyhow::Result<()> {
    let apple_config = config.apple_music(!no_add)?;
    let http_client = http::build_http_client(config.request_timeout())?;
    let client = AppleMusicClient::new(apple_config, http_client);

    rt.block_on(async {
        for line in find_track(&client, name, !no_add).await? {
            println!("{}", line);
        }
        Ok::<_, anyhow::Error>(())
    })
}

/// Run the lookup and return the lines to print.
///
/// Zero search results is an error.
pub(super) async fn find_track(
    destination: &dyn DestinationCatalog,
    name: &str,
    add: bool,
) -> anyhow::Result<Vec<String>> {
    let found = destination
        .search_one(name)
        .await
        .with_context(format!("searching for \"{}\"", name))?;
    let Some(track_id) = found.track_id else {
        anyhow::bail!("no Apple Music results for \"{}\"", name);
    };

    let mut lines = vec![format!("track ID: {}", track_id)];

    let metadata = destination
        .get_metadata(&track_id)
        .await
        .with_context(format!("looking up track {}", track_id))?;
    lines.push(metadata.to_string());

    if add {
        destination
            .add_to_library(&track_id)
            .await
            .with_context(format!("adding track {} to the library", track_id))?;
        tracing::info!(track_id = %track_id, "Added to library");
        lines.push("success".to_string());
    }

    Ok(lines)
}
