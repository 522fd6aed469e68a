use gallery_engine::render::backends::cpu::CpuBackend;
use gallery_engine::render::share_backend;
use gallery_engine::session::GalleryEvent;
use anyhow::{anyhow, Context};
use gallery_engine::{Exhibits, GalleryConfig, GallerySession};
use std::time::Duration;

const LISTING: &str = r#"[
    {"id": 1, "title": "Homecoming", "image": "/artworks/homecoming.jpg", "category": "Digital", "description": "Arrival at dusk."},
    {"id": 2, "title": "Metaplane", "image": "/artworks/metaplane.jpg", "category": "Oil", "description": "A folded horizon."},
    {"id": 3, "title": "Late Signal", "category": "Ink", "description": "No image on file."}
]"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Assets are read from the directory given on the command line. Without one, a scratch
    // directory is used and every exhibit ends up with its fallback plate.
    let scratch = tempfile::tempdir().context("cannot create a scratch asset directory")?;
    let root_dir = std::env::args()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| scratch.path().to_path_buf());
    let root = url::Url::from_directory_path(&root_dir)
        .map_err(|_| anyhow!("not a directory: {}", root_dir.display()))?;

    let config = GalleryConfig::builder()
        .asset_root(root.as_str())?
        .settle_interval(Duration::from_millis(300))
        .build()?;

    let exhibits = Exhibits::from_json(LISTING)?;
    let backend = share_backend(CpuBackend::new());

    // Dump the first fallback plate so it can be looked at
    let plate = gallery_engine::render::fallback::synthesize_fallback(&exhibits[0], config.fallback_size, &backend)?;
    let out = std::env::temp_dir().join("gallery-fallback.png");
    std::fs::write(&out, plate.image.encode_png()?)
        .with_context(|| format!("cannot write fallback plate to {}", out.display()))?;
    println!("Fallback plate written to {}", out.display());

    let session = GallerySession::from_config(config, exhibits, backend)?;
    let mut event_rx = session.subscribe();
    let (gallery, join_handle) = session.start();

    // Walk the corridor: approach, move on, repeat until the portal shows up
    let walker = gallery.clone();
    tokio::spawn(async move {
        for _ in 0..8 {
            if walker.key("ArrowUp").await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
    });

    loop {
        tokio::select! {
            Ok(ev) = event_rx.recv() => {
                match ev {
                    GalleryEvent::StateChanged(view) => {
                        println!(
                            "[state] {:?} {} medium={} forward={}",
                            view.state, view.hud.position_label, view.hud.medium, view.hud.forward.label
                        );
                        if let Some(detail) = &view.detail {
                            println!("        {} {}", detail.heading, detail.title);
                        }
                    }
                    GalleryEvent::SequenceExhausted => {
                        println!("[event] sequence exhausted, portal open");
                        break;
                    }
                    other => println!("[event] {other:?}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Received Ctrl-C, shutting down...");
                break;
            }
        }
    }

    let view = gallery.view().await?;
    if let Some(notice) = view.portal_notice {
        println!("{}: {} -> {}", notice.title, notice.cta_label, notice.href);
    }

    gallery.shutdown().await?;
    if let Err(join_err) = join_handle.await {
        eprintln!("session task panicked: {join_err}");
    }

    Ok(())
}
