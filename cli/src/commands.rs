//! One-shot `search` and `detail` commands.

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, bail};
use gallery_core::{
    CollectionFetch, Config, DetailController, DetailEvent, DetailFetch, Executor,
    FetchCollectionService, FetchDetailService, Gallery, OverviewController, OverviewEvent,
    ReqwestTransport,
};
use tracing::debug;

use crate::render;

/// The fetch services every command and screen shares.
#[derive(Clone)]
pub struct Services {
    pub collection: Arc<dyn CollectionFetch>,
    pub detail: Arc<dyn DetailFetch>,
}

impl Services {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        let executor = Executor::new(Arc::new(transport));
        let client = config.client();
        Ok(Self {
            collection: Arc::new(
                FetchCollectionService::new(executor.clone(), client.clone())
                    .with_page_size(config.page_size),
            ),
            detail: Arc::new(FetchDetailService::new(executor, client)),
        })
    }
}

/// Load up to `pages` pages and print them grouped by section.
pub async fn search(
    services: &Services,
    query: Option<String>,
    pages: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let (controller, mut events) = OverviewController::spawn(Arc::clone(&services.collection), query);
    let mut gallery = Gallery::new();
    let mut loaded = 0;

    while let Some(event) = events.recv().await {
        match event {
            OverviewEvent::ItemBatch { mode, items } => {
                loaded += 1;
                let exhausted = items.is_empty();
                gallery.apply(mode, items);
                if exhausted || loaded >= pages {
                    break;
                }
                debug!(loaded, pages, "requesting next page");
                controller.on_reached_last_visible_item();
            }
            OverviewEvent::ErrorAlert(Some(alert)) => bail!(render::alert(&alert).trim_end().to_string()),
            _ => {}
        }
    }

    out.write_all(render::overview(controller.title(), &gallery).as_bytes())?;
    Ok(())
}

/// Load one object and print its rows.
pub async fn detail(services: &Services, id: String, out: &mut impl Write) -> anyhow::Result<()> {
    let (_controller, mut events) = DetailController::spawn(Arc::clone(&services.detail), id.clone());

    while let Some(event) = events.recv().await {
        match event {
            DetailEvent::Rows(rows) => {
                out.write_all(render::detail(&id, &rows).as_bytes())?;
                if rows.iter().any(|row| row.allows_search) {
                    writeln!(out, "(* searchable with `gallery browse`)")?;
                }
                return Ok(());
            }
            DetailEvent::ErrorAlert(Some(alert)) => bail!(render::alert(&alert).trim_end().to_string()),
            _ => {}
        }
    }
    Err(anyhow!("detail controller stopped before loading {id}"))
}
